//! Image mirroring
//!
//! Walks the catalog and makes sure every card with an `image_url` has a
//! local copy under `<web_dir>/<image_dir>/<section>/...`. Cards are updated
//! in place with the resolved `local_path` or a `has_error` marker, and the
//! document is written back only when something changed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use itertools::Itertools;
use tracing::{debug, instrument, trace, warn};

use crate::application::services::CatalogStore;
use crate::application::{ApplicationResult, IoResultExt, ProgressObserver};
use crate::config::FetchConfig;
use crate::domain::{check_segment, expand_shorthand, make_slug, Card, Catalog, Node, Section};
use crate::infrastructure::traits::{FileSystem, HttpClient};

/// Knobs of a fetch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// First path segment under the web directory
    pub image_dir: String,
    pub timeout: Duration,
    /// Leave cards marked `has_error` alone instead of retrying them
    pub skip_errored: bool,
    /// Migrate bare-URL entries before classification
    pub normalize_shorthand: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for FetchOptions {
    fn from(config: &FetchConfig) -> Self {
        Self {
            image_dir: config.image_dir.clone(),
            timeout: config.timeout(),
            skip_errored: config.skip_errored,
            normalize_shorthand: config.normalize_shorthand,
        }
    }
}

/// Tally of a fetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub downloaded: usize,
    pub cached: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Bare-URL entries converted to cards
    pub normalized: usize,
    /// Document needs to be (or was) written back
    pub changed: bool,
    /// Traversal stopped early on user request
    pub interrupted: bool,
}

/// Result of resolving one card.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FetchOutcome {
    Cached(String),
    Downloaded(String),
    Failed,
}

impl FetchOutcome {
    fn into_local_path(self) -> Option<String> {
        match self {
            FetchOutcome::Cached(path) | FetchOutcome::Downloaded(path) => Some(path),
            FetchOutcome::Failed => None,
        }
    }
}

/// Downloads card images and records the results in the catalog.
pub struct ImageFetcher {
    fs: Arc<dyn FileSystem>,
    http: Arc<dyn HttpClient>,
    observer: Arc<dyn ProgressObserver>,
    options: FetchOptions,
    interrupted: Arc<AtomicBool>,
}

impl ImageFetcher {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        http: Arc<dyn HttpClient>,
        observer: Arc<dyn ProgressObserver>,
        options: FetchOptions,
    ) -> Self {
        Self {
            fs,
            http,
            observer,
            options,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the traversal before the next card once raised.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Load `document`, mirror its images under `web_dir`, and write the
    /// document back if any card changed.
    ///
    /// An interruption stops the walk but still persists what was recorded
    /// so far. Filesystem errors abort without writing.
    #[instrument(skip(self))]
    pub fn sync_document(&self, document: &Path, web_dir: &Path) -> ApplicationResult<FetchReport> {
        let store = CatalogStore::new(Arc::clone(&self.fs));
        let mut raw = store.load_raw(document)?;
        let mut report = FetchReport::default();

        if self.options.normalize_shorthand {
            report.normalized = expand_shorthand(&mut raw)?;
            report.changed |= report.normalized > 0;
        }

        let mut catalog = Catalog::from_value(&raw)?;
        let segments = vec![self.options.image_dir.clone()];
        self.fetch_all(web_dir, catalog.root_mut(), &segments, &mut report)?;

        if report.interrupted {
            warn!("Interrupted, keeping changes made so far");
        }
        if report.changed {
            warn!("Writing changes back to {}", document.display());
            store.save(document, &catalog)?;
        } else {
            debug!("No changes, leaving {} untouched", document.display());
        }
        Ok(report)
    }

    /// Resolve every card below `section`, in document order.
    ///
    /// `segments` is the directory path of `section` relative to `web_dir`.
    pub fn fetch_all(
        &self,
        web_dir: &Path,
        section: &mut Section,
        segments: &[String],
        report: &mut FetchReport,
    ) -> ApplicationResult<()> {
        self.observer.section_entered(segments);

        for (name, node) in section.iter_mut() {
            if self.is_interrupted() {
                report.interrupted = true;
                return Ok(());
            }
            match node {
                Node::Absent => {}
                Node::Leaf(card) => self.fetch_card(web_dir, segments, name, card, report)?,
                Node::Branch(child) => {
                    let mut child_segments = segments.to_vec();
                    child_segments.push(name.clone());
                    self.fetch_all(web_dir, child, &child_segments, report)?;
                    if report.interrupted {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }

    fn fetch_card(
        &self,
        web_dir: &Path,
        segments: &[String],
        label: &str,
        card: &mut Card,
        report: &mut FetchReport,
    ) -> ApplicationResult<()> {
        if card.has_error && self.options.skip_errored {
            self.observer.card_skipped(label);
            report.skipped += 1;
            return Ok(());
        }
        let Some(url) = card.image_url.clone() else {
            trace!("No image_url for {:?}, nothing to fetch", label);
            return Ok(());
        };

        let slug = card.explicit_slug().map(str::to_string);
        let changed = match self.resolve(web_dir, segments, label, &url, slug.as_deref())? {
            FetchOutcome::Cached(path) => {
                report.cached += 1;
                card.record_success(path)
            }
            FetchOutcome::Downloaded(path) => {
                report.downloaded += 1;
                card.record_success(path)
            }
            FetchOutcome::Failed => {
                report.failed += 1;
                card.record_failure()
            }
        };
        report.changed |= changed;
        Ok(())
    }

    /// Make sure the image of one card is on disk.
    ///
    /// Returns its path relative to `web_dir` (`/`-separated), or `None` if
    /// the request timed out, failed, or returned a non-2xx status. Segments
    /// or a filename that would leave their directory are rejected with
    /// [`DomainError::UnsafeSegment`](crate::domain::DomainError::UnsafeSegment).
    pub fn fetch_one(
        &self,
        web_dir: &Path,
        segments: &[String],
        label: &str,
        url: &str,
        slug: Option<&str>,
    ) -> ApplicationResult<Option<String>> {
        self.resolve(web_dir, segments, label, url, slug)
            .map(FetchOutcome::into_local_path)
    }

    fn resolve(
        &self,
        web_dir: &Path,
        segments: &[String],
        label: &str,
        url: &str,
        slug: Option<&str>,
    ) -> ApplicationResult<FetchOutcome> {
        let slug = slug
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| make_slug(label));

        let filename = format!("{}{}", slug, url_extension(url));
        // directory and recorded path are built from the same checked names
        for name in segments.iter().map(String::as_str).chain([filename.as_str()]) {
            check_segment(name)?;
        }

        let dir = segments
            .iter()
            .fold(web_dir.to_path_buf(), |acc, segment| acc.join(segment));
        self.fs
            .create_dir_all(&dir)
            .with_path_context("create image directory", &dir)?;

        let target: PathBuf = dir.join(&filename);
        let local_path = segments
            .iter()
            .map(String::as_str)
            .chain([filename.as_str()])
            .join("/");

        // keyed by filename only: a changed URL under the same slug is not refetched
        if self.fs.file_len(&target).is_some_and(|len| len > 0) {
            self.observer.card_cached(label, &local_path);
            return Ok(FetchOutcome::Cached(local_path));
        }

        debug!("GET {}", url);
        let response = match self.http.get(url, self.options.timeout) {
            Ok(response) => response,
            Err(e) => {
                self.observer.card_failed(label, url, &e.to_string());
                return Ok(FetchOutcome::Failed);
            }
        };
        if !response.is_success() {
            self.observer
                .card_failed(label, url, &format!("HTTP {}", response.status));
            return Ok(FetchOutcome::Failed);
        }

        self.fs
            .write_bytes(&target, &response.body)
            .with_path_context("write image", &target)?;
        self.observer.card_downloaded(label, url, &local_path);
        Ok(FetchOutcome::Downloaded(local_path))
    }
}

/// Extension of the URL's path component, with the leading dot.
///
/// Query and fragment are ignored; no extension yields an empty string.
pub fn url_extension(url: &str) -> String {
    let path = match reqwest::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    Path::new(&path)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
