//! Domain layer: the catalog tree and its pure transformations
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod shorthand;
pub mod slug;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use shorthand::expand_shorthand;
pub use slug::{check_segment, make_slug};

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Unknown variables leave the input untouched.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
