//! # tagload-loader: Presence-Aware Document Loading
//!
//! Loads a JSON or YAML document into a caller-defined record and enforces
//! the two contracts carried by the record's field metadata: which keys
//! the input must supply, and which default literal fills a key the input
//! omits.
//!
//! ## Pipeline
//!
//! - [`decode`] produces the typed record and a [`PresenceNode`] tree from
//!   the same bytes, and [`reject_unknown_fields`] audits the tree.
//! - [`check_required`] walks record and tree in lock-step and fails on the
//!   first required key the tree proves absent.
//! - [`DefaultSetter`] walks them again and assigns default literals where
//!   the tree proves the key absent.
//! - [`wire_drift`] checks, in a record's tests, that its declared wire
//!   names match the keys serde uses.
//!
//! The presence tree, not the decoded value, decides what was supplied, so
//! `"age": 0` is kept while an omitted `age` takes its default.
//!
//! ## Example
//!
//! ```
//! use serde::Deserialize;
//! use tagload_loader::{impl_record, load_from_str};
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct Person {
//!     name: String,
//!     age: u8,
//! }
//!
//! impl_record! {
//!     Person {
//!         name: scalar("name").required(),
//!         age: scalar("age").default("18"),
//!     }
//! }
//!
//! let mut person = Person::default();
//! load_from_str(r#"{"name": "Jin"}"#, &mut person).unwrap();
//! assert_eq!(person.age, 18);
//!
//! load_from_str(r#"{"name": "Jin", "age": 0}"#, &mut person).unwrap();
//! assert_eq!(person.age, 0);
//! ```

pub mod decode;
pub mod defaults;
pub mod loader;
pub mod options;
pub mod required;
pub mod wire;

pub use decode::{decode, reject_unknown_fields, Decoded, DocumentFormat};
pub use defaults::{apply_defaults, AbsentParentPolicy, DefaultSetter};
pub use loader::{load, load_from_slice, load_from_str, load_with, Loader};
pub use options::LoadOptions;
pub use required::check_required;
pub use wire::{wire_drift, WireDrift};

pub use tagload_core::{
    impl_record, DefaultAssignError, ErrorCategory, FieldPath, LoadError, Presence, PresenceNode,
    ReadError, Record, RequiredFieldError,
};
