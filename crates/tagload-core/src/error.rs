//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout tagload. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every failure of a load falls into one of three categories, exposed
//!   through [`LoadError::category`]: reading, required-field checking, or
//!   default assignment.
//! - Walker errors carry the [`FieldPath`] of the offending field, so a
//!   missing `name` inside `parent[1]` reports `parent[1].name`.
//! - Nothing is retried; every failure is deterministic for a given input
//!   and record shape.

use std::fmt;

use thiserror::Error;

use crate::path::FieldPath;
use crate::record::FieldKind;
use crate::scalar::{LiteralError, ScalarType};

/// Stable category of a load failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The document could not be read or decoded.
    ReadFailure,
    /// A required key was absent.
    RequiredFieldFailure,
    /// A default literal could not be assigned.
    DefaultAssignFailure,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadFailure => "read failure",
            Self::RequiredFieldFailure => "required field failure",
            Self::DefaultAssignFailure => "default assign failure",
        })
    }
}

/// Top-level error returned by a load.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The document could not be read or decoded.
    #[error("error while reading document: {0}")]
    Read(#[from] ReadError),

    /// A required key was absent.
    #[error("error while checking required fields: {0}")]
    Required(#[from] RequiredFieldError),

    /// A default literal could not be assigned.
    #[error("error while setting default fields: {0}")]
    Default(#[from] DefaultAssignError),
}

impl LoadError {
    /// The stable category of this failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Read(_) => ErrorCategory::ReadFailure,
            Self::Required(_) => ErrorCategory::RequiredFieldFailure,
            Self::Default(_) => ErrorCategory::DefaultAssignFailure,
        }
    }
}

/// The document could not be read or decoded.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The source file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Path of the source file.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The bytes are malformed or a value does not fit its field's type.
    #[error("cannot decode {origin}: {reason}")]
    Decode {
        /// Where the bytes came from.
        origin: String,
        /// Decoder diagnostic.
        reason: String,
    },

    /// The input holds a key the record shape does not declare.
    #[error("unknown field \"{key}\" at {path}; {record} expects one of: {expected}")]
    UnknownField {
        /// The undeclared key.
        key: String,
        /// Record the key was found in.
        record: &'static str,
        /// Path of the object holding the key.
        path: FieldPath,
        /// Comma-separated wire names the record declares.
        expected: String,
    },
}

/// A required key was absent, or the record shape cannot be checked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequiredFieldError {
    /// A required key was not supplied.
    #[error("required field \"{field}\" (wire name \"{wire}\") of {record} is missing at {path}")]
    Missing {
        /// Record declaring the field.
        record: &'static str,
        /// Rust field name.
        field: &'static str,
        /// Wire name of the field.
        wire: &'static str,
        /// Path of the field.
        path: FieldPath,
    },

    /// A map of bare records cannot be walked.
    #[error("field \"{field}\" of {record} at {path}: unaddressable field must be pointer")]
    Unaddressable {
        /// Record declaring the field.
        record: &'static str,
        /// Rust field name.
        field: &'static str,
        /// Path of the field.
        path: FieldPath,
    },

    /// The target and the presence tree diverge.
    #[error("presence tree does not match target at {path}: {detail}")]
    PresenceMismatch {
        /// Path of the element that has no presence counterpart.
        path: FieldPath,
        /// What diverged.
        detail: String,
    },
}

/// A default literal could not be assigned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefaultAssignError {
    /// The literal does not parse into the field's declared type.
    #[error("cannot parse default {literal:?} for field \"{field}\" (type {declared}) at {path}: {source}")]
    Parse {
        /// Rust field name.
        field: &'static str,
        /// The offending literal.
        literal: &'static str,
        /// Declared type of the field.
        declared: ScalarType,
        /// Path of the field.
        path: FieldPath,
        /// Parser failure.
        source: LiteralError,
    },

    /// A default literal is attached to a kind that cannot take one.
    #[error("field \"{field}\" ({kind}) does not support a default value, found {literal:?} at {path}")]
    Unsupported {
        /// Rust field name.
        field: &'static str,
        /// Declared kind of the field.
        kind: FieldKind,
        /// The attached literal.
        literal: &'static str,
        /// Path of the field.
        path: FieldPath,
    },

    /// A map of bare records cannot be walked.
    #[error("field \"{field}\" of {record} at {path}: unaddressable field must be pointer")]
    Unaddressable {
        /// Record declaring the field.
        record: &'static str,
        /// Rust field name.
        field: &'static str,
        /// Path of the field.
        path: FieldPath,
    },

    /// The target and the presence tree diverge.
    #[error("presence tree does not match target at {path}: {detail}")]
    PresenceMismatch {
        /// Path of the element that has no presence counterpart.
        path: FieldPath,
        /// What diverged.
        detail: String,
    },
}
