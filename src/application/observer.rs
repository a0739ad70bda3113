//! Progress reporting seam
//!
//! Services report what they do through an injected observer instead of a
//! process-wide logger. All hooks default to no-ops.

use std::path::Path;

use tracing::{debug, info, warn};

/// Receives progress events from the page builder and the image fetcher.
pub trait ProgressObserver: Send + Sync {
    /// Fetcher entered a section; `path` starts with the image directory.
    fn section_entered(&self, _path: &[String]) {}

    /// Page builder opened a section at nesting `level` (1 = top).
    fn section_rendered(&self, _name: &str, _level: usize) {}

    /// Image already on disk, no request made.
    fn card_cached(&self, _label: &str, _local_path: &str) {}

    /// Image fetched and written.
    fn card_downloaded(&self, _label: &str, _url: &str, _local_path: &str) {}

    /// Fetch failed; the card gets `has_error`.
    fn card_failed(&self, _label: &str, _url: &str, _reason: &str) {}

    /// Card not attempted because of a previous error.
    fn card_skipped(&self, _label: &str) {}

    /// Page written to disk.
    fn page_written(&self, _path: &Path, _cards: usize) {}
}

/// Observer that forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn section_entered(&self, path: &[String]) {
        info!("Visiting: {:?}", path);
    }

    fn section_rendered(&self, name: &str, level: usize) {
        debug!("Section: {} {:?}", "#".repeat(level), name);
    }

    fn card_cached(&self, label: &str, local_path: &str) {
        debug!("Image already downloaded for {:?}: {}", label, local_path);
    }

    fn card_downloaded(&self, label: &str, url: &str, local_path: &str) {
        info!("Downloaded {:?} from {} to {}", label, url, local_path);
    }

    fn card_failed(&self, label: &str, url: &str, reason: &str) {
        warn!("Fetching {:?} from {} failed: {}", label, url, reason);
    }

    fn card_skipped(&self, label: &str) {
        warn!("Skipping due to previous error: {:?}", label);
    }

    fn page_written(&self, path: &Path, cards: usize) {
        info!("Wrote {} cards to {}", cards, path.display());
    }
}
