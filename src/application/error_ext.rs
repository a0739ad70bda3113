//! Error conversion helpers for filesystem operations

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Attach an action and a path to an `io::Result`.
pub trait IoResultExt<T> {
    /// ```ignore
    /// fs.write_bytes(&target, &body)
    ///     .with_path_context("write image", &target)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}
