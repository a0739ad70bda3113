//! Domain entities: the catalog tree
//!
//! The raw YAML is classified exactly once into a tagged tree. Downstream
//! code matches on [`Node`] instead of probing mapping keys.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use crate::domain::{DomainError, DomainResult};

/// Remote image reference of a card.
pub const IMAGE_URL: &str = "image_url";
/// Previously resolved local copy, relative to the web directory.
pub const LOCAL_PATH: &str = "local_path";
/// Explicit filename stem override.
pub const SLUG: &str = "slug";
/// Set when the last fetch attempt failed.
pub const HAS_ERROR: &str = "has_error";

/// Shape of a node as seen by both pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `null` or an empty mapping: skipped entirely
    Absent,
    /// Mapping carrying `image_url` and/or `local_path`
    Leaf,
    /// Any other non-empty mapping: a named section
    Branch,
}

/// Classify a raw YAML value.
///
/// A mapping carrying `image_url` or `local_path` is a leaf, whatever else it
/// holds. Anything that is neither `null` nor a mapping is malformed; in
/// particular a bare URL string must be migrated first (see
/// [`crate::domain::expand_shorthand`]).
pub fn classify(value: &Value) -> DomainResult<NodeKind> {
    classify_at(value, "")
}

fn classify_at(value: &Value, path: &str) -> DomainResult<NodeKind> {
    match value {
        Value::Null => Ok(NodeKind::Absent),
        Value::Mapping(map) if is_leaf_mapping(map) => Ok(NodeKind::Leaf),
        Value::Mapping(map) if map.is_empty() => Ok(NodeKind::Absent),
        Value::Mapping(_) => Ok(NodeKind::Branch),
        other => Err(DomainError::MalformedNode {
            path: display_path(path),
            found: describe(other).to_string(),
        }),
    }
}

pub(crate) fn is_leaf_mapping(map: &Mapping) -> bool {
    map.contains_key(IMAGE_URL) || map.contains_key(LOCAL_PATH)
}

/// Human-readable name of a YAML value type, for error messages.
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

pub(crate) fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

/// Stringify a mapping key. Scalar keys (`2020:`, `true:`) become their text.
pub(crate) fn key_to_string(key: &Value, parent: &str) -> DomainResult<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(DomainError::InvalidKey {
            path: display_path(parent),
        }),
    }
}

/// A leaf of the catalog: one item with an image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Card {
    pub image_url: Option<String>,
    pub local_path: Option<String>,
    pub slug: Option<String>,
    pub has_error: bool,
    /// Keys not interpreted here (e.g. `title`), kept for templates and round-trips
    pub extra: Mapping,
}

impl Card {
    /// Card pointing at a remote image.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            ..Self::default()
        }
    }

    fn from_mapping(map: &Mapping, path: &str) -> DomainResult<Self> {
        let mut card = Card {
            image_url: string_field(map, IMAGE_URL, path)?,
            local_path: string_field(map, LOCAL_PATH, path)?,
            slug: string_field(map, SLUG, path)?,
            has_error: bool_field(map, HAS_ERROR, path)?,
            extra: Mapping::new(),
        };
        for (key, value) in map {
            let known = matches!(
                key.as_str(),
                Some(IMAGE_URL) | Some(LOCAL_PATH) | Some(SLUG) | Some(HAS_ERROR)
            );
            if !known {
                card.extra.insert(key.clone(), value.clone());
            }
        }
        Ok(card)
    }

    /// Serialize back to a mapping: known fields first, `has_error` only when set.
    pub fn to_mapping(&self) -> Mapping {
        let mut map = Mapping::new();
        if let Some(url) = &self.image_url {
            map.insert(IMAGE_URL.into(), url.as_str().into());
        }
        if let Some(path) = &self.local_path {
            map.insert(LOCAL_PATH.into(), path.as_str().into());
        }
        if let Some(slug) = &self.slug {
            map.insert(SLUG.into(), slug.as_str().into());
        }
        if self.has_error {
            map.insert(HAS_ERROR.into(), Value::Bool(true));
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        map
    }

    /// Mapping handed to card templates: every known field is present,
    /// `null` when unset, so templates can reference them unconditionally.
    pub fn template_mapping(&self) -> Mapping {
        let optional = |field: &Option<String>| {
            field
                .as_deref()
                .map_or(Value::Null, |s| Value::String(s.to_string()))
        };
        let mut map = Mapping::new();
        map.insert(IMAGE_URL.into(), optional(&self.image_url));
        map.insert(LOCAL_PATH.into(), optional(&self.local_path));
        map.insert(SLUG.into(), optional(&self.slug));
        map.insert(HAS_ERROR.into(), Value::Bool(self.has_error));
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        map
    }

    /// Explicit slug, ignoring an empty override.
    pub fn explicit_slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|s| !s.is_empty())
    }

    /// Mark the last fetch as failed. `local_path` is kept.
    ///
    /// Returns true if the card changed.
    pub fn record_failure(&mut self) -> bool {
        // only the transition counts: a repeat failure must not rewrite the document
        let changed = !self.has_error;
        self.has_error = true;
        changed
    }

    /// Record a resolved local copy and clear any previous failure.
    ///
    /// Returns true if the card changed.
    pub fn record_success(&mut self, local_path: String) -> bool {
        let mut changed = false;
        if self.local_path.as_deref() != Some(local_path.as_str()) {
            self.local_path = Some(local_path);
            changed = true;
        }
        if self.has_error {
            self.has_error = false;
            changed = true;
        }
        changed
    }
}

fn string_field(map: &Mapping, field: &str, path: &str) -> DomainResult<Option<String>> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DomainError::InvalidField {
            path: display_path(path),
            field: field.to_string(),
            expected: "string".to_string(),
        }),
    }
}

fn bool_field(map: &Mapping, field: &str, path: &str) -> DomainResult<bool> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(DomainError::InvalidField {
            path: display_path(path),
            field: field.to_string(),
            expected: "boolean".to_string(),
        }),
    }
}

/// A named node of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Absent,
    Leaf(Card),
    Branch(Section),
}

impl Node {
    fn from_value(value: &Value, path: &str) -> DomainResult<Self> {
        let kind = classify_at(value, path)?;
        let node = match (kind, value.as_mapping()) {
            (NodeKind::Leaf, Some(map)) => Node::Leaf(Card::from_mapping(map, path)?),
            (NodeKind::Branch, Some(map)) => Node::Branch(Section::from_mapping(map, path)?),
            _ => Node::Absent,
        };
        Ok(node)
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Absent => NodeKind::Absent,
            Node::Leaf(_) => NodeKind::Leaf,
            Node::Branch(_) => NodeKind::Branch,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Node::Absent => Value::Null,
            Node::Leaf(card) => Value::Mapping(card.to_mapping()),
            Node::Branch(section) => Value::Mapping(section.to_mapping()),
        }
    }
}

/// Ordered children of a branch. Iteration follows document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    children: IndexMap<String, Node>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_mapping(map: &Mapping, path: &str) -> DomainResult<Self> {
        let mut children = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            let name = key_to_string(key, path)?;
            let node = Node::from_value(value, &child_path(path, &name))?;
            children.insert(name, node);
        }
        Ok(Self { children })
    }

    pub fn to_mapping(&self) -> Mapping {
        self.children
            .iter()
            .map(|(name, node)| (Value::String(name.clone()), node.to_value()))
            .collect()
    }

    /// Append a child, replacing an existing one with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, node: Node) {
        self.children.insert(name.into(), node);
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.children.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Node)> {
        self.children.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaves in this subtree.
    pub fn card_count(&self) -> usize {
        self.children
            .values()
            .map(|node| match node {
                Node::Leaf(_) => 1,
                Node::Branch(section) => section.card_count(),
                Node::Absent => 0,
            })
            .sum()
    }
}

/// The whole document: a root branch of top-level sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    root: Section,
}

impl Catalog {
    pub fn new(root: Section) -> Self {
        Self { root }
    }

    /// Classify a parsed document. An empty document is an empty catalog.
    pub fn from_value(value: &Value) -> DomainResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(map) => Ok(Self {
                root: Section::from_mapping(map, "")?,
            }),
            other => Err(DomainError::InvalidRoot {
                found: describe(other).to_string(),
            }),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Mapping(self.root.to_mapping())
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.root
    }
}
