//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::time::Duration;

use serde_yaml::Value;
use thiserror::Error;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file (overwrite).
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Write raw bytes to file (overwrite).
    fn write_bytes(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Size of a regular file in bytes, `None` if it is missing or not a file.
    fn file_len(&self, path: &Path) -> Option<u64>;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Response of a completed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request that produced no response at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Transport(String),
}

/// Blocking HTTP GET abstraction.
pub trait HttpClient: Send + Sync {
    /// Fetch `url`, giving up after `timeout`.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError>;
}

/// Named-template renderer abstraction.
pub trait TemplateRenderer: Send + Sync {
    /// Render template `name` (logical name, no extension) with `data`,
    /// which must be a mapping.
    fn render(&self, name: &str, data: &Value) -> Result<String, String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn write_bytes(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn file_len(&self, path: &Path) -> Option<u64> {
        std::fs::metadata(path)
            .ok()
            .filter(|m| m.is_file())
            .map(|m| m.len())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}
