//! Filesystem-safe names for mirrored images

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{DomainError, DomainResult};

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.()_+\-]").unwrap());

/// Replace every character outside `[A-Za-z0-9.()_+-]` with `-`.
///
/// One replacement per character, so `"A/B:C"` becomes `"A-B-C"` and
/// non-ASCII letters become a single `-` each.
pub fn make_slug(label: &str) -> String {
    UNSAFE_CHARS.replace_all(label, "-").into_owned()
}

/// Accept `segment` only if it names exactly one entry inside its parent
/// directory: no separators, no `.`/`..`, not empty, not absolute.
pub fn check_segment(segment: &str) -> DomainResult<&str> {
    let mut components = Path::new(segment).components();
    let single_name = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if single_name && !segment.contains(['/', '\\']) {
        Ok(segment)
    } else {
        Err(DomainError::UnsafeSegment {
            segment: segment.to_string(),
        })
    }
}
