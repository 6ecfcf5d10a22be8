//! # Field Paths
//!
//! Structural locations inside a target record, used to qualify every
//! error the engine reports. A path is built one segment at a time while
//! the walkers descend; it is never parsed back from text.

use std::fmt;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named field of a record.
    Field {
        /// Name of the record type that declares the field.
        record: &'static str,
        /// Wire name of the field.
        wire: &'static str,
    },
    /// An element of a sequence of records.
    Index(usize),
    /// An entry of a keyed map of records.
    Key(String),
}

/// Location of a field relative to the root record.
///
/// Displays as `parent[1].name` or `routes["api"].target`; the empty
/// path displays as `(root)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path, pointing at the root record.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns true if this path points at the root record.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the segments from the root down.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Extend the path with a record field.
    pub fn field(&self, record: &'static str, wire: &'static str) -> Self {
        self.with(PathSegment::Field { record, wire })
    }

    /// Extend the path with a sequence index.
    pub fn index(&self, index: usize) -> Self {
        self.with(PathSegment::Index(index))
    }

    /// Extend the path with a map key.
    pub fn key(&self, key: &str) -> Self {
        self.with(PathSegment::Key(key.to_owned()))
    }

    /// Wire names of every field segment, in order.
    pub fn wire_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Field { wire, .. } => Some(*wire),
            _ => None,
        })
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field { wire, .. } if i == 0 => write!(f, "{wire}")?,
                PathSegment::Field { wire, .. } => write!(f, ".{wire}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}
