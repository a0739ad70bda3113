//! Catalog document persistence
//!
//! Reads the YAML document into a classified [`Catalog`] and writes it back
//! in a single call.

use std::path::Path;
use std::sync::Arc;

use serde_yaml::Value;
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{expand_shorthand, Catalog};
use crate::infrastructure::traits::FileSystem;

/// Loads and saves catalog documents.
pub struct CatalogStore {
    fs: Arc<dyn FileSystem>,
}

impl CatalogStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Parse the document without classifying it.
    pub fn load_raw(&self, path: &Path) -> ApplicationResult<Value> {
        debug!("Loading {}", path.display());
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read document", path)?;
        serde_yaml::from_str(&content).map_err(|e| ApplicationError::Document {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse and classify the document.
    pub fn load(&self, path: &Path) -> ApplicationResult<Catalog> {
        let raw = self.load_raw(path)?;
        Ok(Catalog::from_value(&raw)?)
    }

    /// Overwrite the document with the catalog.
    pub fn save(&self, path: &Path, catalog: &Catalog) -> ApplicationResult<()> {
        self.save_value(path, &catalog.to_value())
    }

    fn save_value(&self, path: &Path, value: &Value) -> ApplicationResult<()> {
        let content = serde_yaml::to_string(value).map_err(|e| ApplicationError::Document {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.fs
            .write(path, &content)
            .with_path_context("write document", path)
    }

    /// Rewrite legacy bare-URL entries as card mappings.
    ///
    /// The document is only written if something was converted. Returns the
    /// number of converted entries.
    pub fn normalize(&self, path: &Path) -> ApplicationResult<usize> {
        let mut raw = self.load_raw(path)?;
        let converted = expand_shorthand(&mut raw)?;
        // the migrated document must classify cleanly before it is persisted
        Catalog::from_value(&raw)?;
        if converted > 0 {
            warn!("Converted {} entries, writing {}", converted, path.display());
            self.save_value(path, &raw)?;
        }
        Ok(converted)
    }
}
