//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_yaml::Value;
use tempfile::TempDir;

use cardcat::application::ProgressObserver;
use cardcat::infrastructure::traits::{FetchError, HttpClient, HttpResponse, TemplateRenderer};

/// HTTP client answering from a fixed table; unknown URLs get a 404.
#[derive(Default)]
pub struct StubHttpClient {
    responses: HashMap<String, Result<HttpResponse, FetchError>>,
    requests: Mutex<Vec<String>>,
}

impl StubHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &str, status: u16, body: &[u8]) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(HttpResponse {
                status,
                body: body.to_vec(),
            }),
        );
        self
    }

    pub fn with_error(mut self, url: &str, error: FetchError) -> Self {
        self.responses.insert(url.to_string(), Err(error));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for StubHttpClient {
    fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses.get(url).cloned().unwrap_or(Ok(HttpResponse {
            status: 404,
            body: Vec::new(),
        }))
    }
}

/// Stub client that raises an interrupt flag once its first request completes,
/// like a Ctrl-C arriving during a download.
pub struct InterruptingHttpClient {
    inner: StubHttpClient,
    flag: Mutex<Option<Arc<AtomicBool>>>,
}

impl InterruptingHttpClient {
    pub fn new(inner: StubHttpClient) -> Self {
        Self {
            inner,
            flag: Mutex::new(None),
        }
    }

    pub fn arm(&self, flag: Arc<AtomicBool>) {
        *self.flag.lock().unwrap() = Some(flag);
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.requests()
    }
}

impl HttpClient for InterruptingHttpClient {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        let response = self.inner.get(url, timeout);
        if let Some(flag) = self.flag.lock().unwrap().as_ref() {
            flag.store(true, Ordering::SeqCst);
        }
        response
    }
}

/// Observer that keeps a log of events as short strings.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressObserver for RecordingObserver {
    fn section_entered(&self, path: &[String]) {
        self.push(format!("enter {}", path.join("/")));
    }

    fn section_rendered(&self, name: &str, level: usize) {
        self.push(format!("section {name} {level}"));
    }

    fn card_cached(&self, label: &str, _local_path: &str) {
        self.push(format!("cached {label}"));
    }

    fn card_downloaded(&self, label: &str, _url: &str, _local_path: &str) {
        self.push(format!("downloaded {label}"));
    }

    fn card_failed(&self, label: &str, _url: &str, reason: &str) {
        self.push(format!("failed {label}: {reason}"));
    }

    fn card_skipped(&self, label: &str) {
        self.push(format!("skipped {label}"));
    }

    fn page_written(&self, _path: &Path, cards: usize) {
        self.push(format!("page {cards}"));
    }
}

/// Renderer with hard-coded templates, so page tests need no template files.
pub struct FixedRenderer;

impl TemplateRenderer for FixedRenderer {
    fn render(&self, name: &str, data: &Value) -> Result<String, String> {
        match name {
            "index.header" => Ok("<html>\n".to_string()),
            "index.footer" => Ok("</html>\n".to_string()),
            "card" => {
                let label = data["label"].as_str().unwrap_or_default();
                let card = &data["card"];
                let src = card["local_path"]
                    .as_str()
                    .or_else(|| card["image_url"].as_str())
                    .unwrap_or_default();
                Ok(format!("<li>\n  <img src=\"{src}\" alt=\"{label}\">\n</li>\n"))
            }
            other => Err(format!("template '{other}.html' not found")),
        }
    }
}

/// Write `content` to `<dir>/<name>` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(&path, content).expect("write file");
    path
}

/// Temp project with a catalog document.
pub fn project_with_document(content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("temp dir");
    let document = write_file(temp.path(), "cards.yaml", content);
    (temp, document)
}

pub fn read_yaml(path: &Path) -> Value {
    serde_yaml::from_str(&std::fs::read_to_string(path).expect("read yaml")).expect("parse yaml")
}
