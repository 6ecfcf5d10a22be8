//! # tagload-core: Foundational Types for tagload
//!
//! This crate defines the vocabulary shared by the loader engine and its
//! callers. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Static descriptors instead of reflection.** Every record type exposes a
//!    `static` [`RecordDescriptor`] listing its fields: Rust name, wire name,
//!    `required` flag, optional default literal and a closed [`FieldKind`].
//!    The [`impl_record!`] macro generates the descriptor and the field
//!    accessors from one field list, so the two can never drift apart.
//!
//! 2. **Presence, not zero-ness.** A [`PresenceNode`] tree is decoded from the
//!    same bytes as the typed record. The [`Presence`] cursor answers "was this
//!    key in the input" at every structural path, which is what lets the
//!    engine tell `"age": 0` apart from an omitted `age`.
//!
//! 3. **Width-exact default literals.** [`Scalar::assign_literal`] parses a
//!    literal into the declared Rust type, so `"300"` on a `u8` is a range
//!    error rather than a silent truncation.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tagload-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod path;
pub mod presence;
pub mod record;
pub mod scalar;

// Re-export primary types for ergonomic imports.
pub use error::{
    DefaultAssignError, ErrorCategory, LoadError, ReadError, RequiredFieldError,
};
pub use path::{FieldPath, PathSegment};
pub use presence::{Presence, PresenceNode, PresenceObject, ScalarToken, ShapeMismatch};
pub use record::{
    BareRecordMap, FieldDescriptor, FieldKind, FieldMeta, FieldMut, Record, RecordDescriptor,
    RecordMap, RecordSeq, ScalarCollection,
};
pub use scalar::{LiteralError, Scalar, ScalarType};
