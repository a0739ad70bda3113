//! HTTP client backed by `reqwest` (blocking)

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::trace;

use crate::infrastructure::traits::{FetchError, HttpClient, HttpResponse};
use crate::infrastructure::{InfraError, InfraResult};

/// Real HTTP client.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(user_agent: &str) -> InfraResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| InfraError::Http {
                message: format!("build client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(to_fetch_error)?;

        let status = response.status();
        trace!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Ok(HttpResponse {
                status: status.as_u16(),
                body: Vec::new(),
            });
        }

        let body = response.bytes().map_err(to_fetch_error)?;
        Ok(HttpResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

fn to_fetch_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(e.to_string())
    }
}
