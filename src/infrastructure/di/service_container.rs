//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::{CatalogStore, FetchOptions, ImageFetcher, PageBuilder};
use crate::application::{ProgressObserver, TracingObserver};
use crate::config::Settings;
use crate::infrastructure::http::ReqwestHttpClient;
use crate::infrastructure::templates::TeraRenderer;
use crate::infrastructure::traits::{FileSystem, HttpClient, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding settings and shared I/O dependencies.
///
/// Template renderer and HTTP client are built on demand, since they depend
/// on per-command arguments.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Progress sink shared by all services
    pub observer: Arc<dyn ProgressObserver>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(TracingObserver))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            observer,
        }
    }

    pub fn catalog_store(&self) -> CatalogStore {
        CatalogStore::new(Arc::clone(&self.fs))
    }

    /// Page builder over the Tera templates in `template_dir`.
    pub fn page_builder(&self, template_dir: &Path) -> InfraResult<PageBuilder> {
        let renderer = TeraRenderer::new(template_dir)?;
        Ok(PageBuilder::new(
            Arc::new(renderer),
            Arc::clone(&self.fs),
            Arc::clone(&self.observer),
        ))
    }

    /// Image fetcher using a real HTTP client.
    pub fn image_fetcher(&self, options: FetchOptions) -> InfraResult<ImageFetcher> {
        let http = ReqwestHttpClient::new(&self.settings.fetch.user_agent)?;
        Ok(self.image_fetcher_with(Arc::new(http), options))
    }

    /// Image fetcher using the given HTTP client.
    pub fn image_fetcher_with(
        &self,
        http: Arc<dyn HttpClient>,
        options: FetchOptions,
    ) -> ImageFetcher {
        ImageFetcher::new(
            Arc::clone(&self.fs),
            http,
            Arc::clone(&self.observer),
            options,
        )
    }
}
