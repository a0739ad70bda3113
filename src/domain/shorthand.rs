//! Legacy shorthand migration
//!
//! Older documents store a card as a bare URL (`Cat: https://...`). This pass
//! rewrites those entries to `{image_url: <url>}` before classification.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::domain::entities::{child_path, describe, is_leaf_mapping, key_to_string, IMAGE_URL};
use crate::domain::{DomainError, DomainResult};

fn is_url(s: &str) -> bool {
    s.starts_with("https://") || s.starts_with("http://")
}

/// Convert bare URL strings into card mappings, in place.
///
/// Returns the number of converted entries. Any other scalar is rejected.
pub fn expand_shorthand(document: &mut Value) -> DomainResult<usize> {
    match document {
        Value::Null => Ok(0),
        Value::Mapping(map) => expand_mapping(map, ""),
        other => Err(DomainError::InvalidRoot {
            found: describe(other).to_string(),
        }),
    }
}

fn expand_mapping(map: &mut Mapping, path: &str) -> DomainResult<usize> {
    let mut converted = 0;
    for (key, value) in map.iter_mut() {
        let name = key_to_string(key, path)?;
        let here = child_path(path, &name);
        match value {
            Value::Null => {}
            Value::String(url) if is_url(url) => {
                debug!("Converting to card: {}", here);
                let mut card = Mapping::new();
                card.insert(IMAGE_URL.into(), Value::String(std::mem::take(url)));
                *value = Value::Mapping(card);
                converted += 1;
            }
            Value::Mapping(child) if is_leaf_mapping(child) => {}
            Value::Mapping(child) => converted += expand_mapping(child, &here)?,
            other => {
                return Err(DomainError::MalformedNode {
                    path: here,
                    found: describe(other).to_string(),
                })
            }
        }
    }
    Ok(converted)
}
