//! # Presence Tree
//!
//! The untyped, order-preserving decode of an input document. It is built
//! once per load from the same bytes as the typed record and is read-only
//! afterwards. Its only job is answering "was key K present at this path,
//! and which subtree does it map to".
//!
//! ## Cursor States
//!
//! Walkers never hold a `&PresenceNode` directly; they hold a [`Presence`]
//! cursor with three states:
//!
//! - `Node`: the key was present and maps to this subtree.
//! - `Absent`: the input proves the key (or one of its ancestors) missing.
//! - `Unknown`: there is no tree to consult; callers fall back to the
//!   zero-value heuristic.
//!
//! Structural divergence (a record expected where the input holds a scalar)
//! navigates to `Absent`, never panics. The one exception is sequence
//! indexing: a target element with no matching array element is reported
//! as a [`ShapeMismatch`].

use indexmap::IndexMap;
use serde_json::{Number, Value};
use thiserror::Error;

/// Leaf value of the presence tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarToken {
    Null,
    Bool(bool),
    Number(Number),
    /// A float JSON cannot hold (`.inf`, `-.inf` and `.nan` in YAML).
    NonFinite(f64),
    String(String),
}

/// Object node: the keys that were present, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresenceObject {
    entries: IndexMap<String, PresenceNode>,
}

impl PresenceObject {
    /// Create an empty object node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key. A repeated key replaces the earlier entry in place.
    pub fn insert(&mut self, key: String, node: PresenceNode) {
        self.entries.insert(key, node);
    }

    /// Look up the subtree for `key`.
    pub fn get(&self, key: &str) -> Option<&PresenceNode> {
        self.entries.get(key)
    }

    /// Returns true if `key` was present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in input order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PresenceNode)> {
        self.entries.iter().map(|(k, node)| (k.as_str(), node))
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the object has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, PresenceNode)> for PresenceObject {
    fn from_iter<I: IntoIterator<Item = (String, PresenceNode)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A node of the presence tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenceNode {
    Scalar(ScalarToken),
    Object(PresenceObject),
    Array(Vec<PresenceNode>),
}

impl PresenceNode {
    /// Build a presence tree from a decoded JSON value.
    ///
    /// Key order follows the value's map order, which is input order when
    /// `serde_json` is built with `preserve_order`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(ScalarToken::Null),
            Value::Bool(b) => Self::Scalar(ScalarToken::Bool(b)),
            Value::Number(n) => Self::Scalar(ScalarToken::Number(n)),
            Value::String(s) => Self::Scalar(ScalarToken::String(s)),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from_value).collect()),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_value(v)))
                    .collect(),
            ),
        }
    }

    /// Returns the object node, if this is one.
    pub fn as_object(&self) -> Option<&PresenceObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the array elements, if this is an array node.
    pub fn as_array(&self) -> Option<&[PresenceNode]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the node's shape, for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Scalar(ScalarToken::Null) => "null",
            Self::Scalar(_) => "scalar",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
        }
    }
}

impl From<Value> for PresenceNode {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// The target holds a sequence element the presence tree cannot account for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{detail}")]
pub struct ShapeMismatch {
    /// What diverged.
    pub detail: String,
}

/// Cursor into the presence tree at the walker's current structural path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence<'a> {
    /// The key was present and maps to this subtree.
    Node(&'a PresenceNode),
    /// The input proves the key missing.
    Absent,
    /// No tree context; fall back to zero-value reasoning.
    Unknown,
}

impl<'a> Presence<'a> {
    /// Returns true if the cursor proves absence.
    pub fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Move to the subtree for `key`.
    ///
    /// A node that is not an object has no keys, so every child of it is
    /// `Absent`. `Absent` and `Unknown` propagate unchanged.
    pub fn child(self, key: &str) -> Presence<'a> {
        match self {
            Self::Node(node) => node
                .as_object()
                .and_then(|object| object.get(key))
                .map_or(Self::Absent, Self::Node),
            other => other,
        }
    }

    /// Move to the array element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeMismatch`] if the cursor is on a node that is not an
    /// array, or on an array with no element at `index`.
    pub fn element(self, index: usize) -> Result<Presence<'a>, ShapeMismatch> {
        match self {
            Self::Node(PresenceNode::Array(items)) => {
                items.get(index).map(Self::Node).ok_or_else(|| ShapeMismatch {
                    detail: format!(
                        "target holds element {index} but the input array has {} element(s)",
                        items.len()
                    ),
                })
            }
            Self::Node(node) => Err(ShapeMismatch {
                detail: format!(
                    "target holds element {index} but the input holds {}",
                    node.shape_name()
                ),
            }),
            other => Ok(other),
        }
    }

    /// Whether the input supplied the key behind this cursor.
    ///
    /// `Unknown` defers to `is_zero`: a non-zero value counts as supplied.
    pub fn supplied(self, is_zero: impl FnOnce() -> bool) -> bool {
        match self {
            Self::Node(_) => true,
            Self::Absent => false,
            Self::Unknown => !is_zero(),
        }
    }
}
