//! # Record Descriptors
//!
//! The capability a caller-defined type must provide to be walked by the
//! required-field checker and the default-field setter.
//!
//! Each record type carries a `static` [`RecordDescriptor`]: one
//! [`FieldDescriptor`] per field with its wire name, `required` flag,
//! optional default literal and [`FieldKind`]. The kind is fixed when the
//! descriptor is built, so the walkers dispatch on a closed enum rather than
//! rediscovering the shape of every field at runtime.
//!
//! Mutable access goes through [`Record::fields_mut`], which hands out one
//! disjoint [`FieldMut`] borrow per descriptor, in descriptor order.
//!
//! ## Declaring a Record
//!
//! ```
//! use std::collections::HashMap;
//! use tagload_core::impl_record;
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     age: i32,
//! }
//!
//! #[derive(Debug, Default)]
//! struct Family {
//!     name: String,
//!     parents: HashMap<String, Option<Box<Person>>>,
//!     children: Vec<Person>,
//! }
//!
//! impl_record! {
//!     Person {
//!         name: scalar("name").required(),
//!         age: scalar("age").default("18"),
//!     }
//! }
//!
//! impl_record! {
//!     Family {
//!         name: scalar("name").required(),
//!         parents: record_map("parents").required(),
//!         children: record_seq("children"),
//!     }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::scalar::Scalar;

/// Declared kind of a field, resolved when the descriptor is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A leaf value or pointer-to-leaf (`Option<T>`).
    Scalar,
    /// A nested record, walked recursively.
    Record,
    /// A sequence of records, walked per element.
    RecordSeq,
    /// A string-keyed map of record pointers, walked per entry.
    RecordMap,
    /// A map holding bare records. Always rejected by the walkers.
    BareRecordMap,
    /// A sequence of scalars. Checked for presence only.
    ScalarSeq,
    /// A map of scalars. Checked for presence only.
    ScalarMap,
}

impl FieldKind {
    /// Returns true if a default literal may be attached to this kind.
    pub fn accepts_default(self) -> bool {
        matches!(self, Self::Scalar)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scalar => "scalar",
            Self::Record => "record",
            Self::RecordSeq => "sequence of records",
            Self::RecordMap => "map of record pointers",
            Self::BareRecordMap => "map of records",
            Self::ScalarSeq => "sequence of scalars",
            Self::ScalarMap => "map of scalars",
        })
    }
}

/// Wire-level metadata of one field, built with `const fn`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    wire: &'static str,
    required: bool,
    default: Option<&'static str>,
}

impl FieldMeta {
    /// Metadata for a field keyed by `wire` in the input.
    pub const fn new(wire: &'static str) -> Self {
        Self {
            wire,
            required: false,
            default: None,
        }
    }

    /// The input must supply this key.
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Literal to parse and assign when the input omits this key.
    pub const fn default(self, literal: &'static str) -> Self {
        Self {
            default: Some(literal),
            ..self
        }
    }
}

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub name: &'static str,
    /// Key used for this field in the input.
    pub wire: &'static str,
    /// The input must supply this key.
    pub required: bool,
    /// Literal applied when the input omits this key.
    pub default: Option<&'static str>,
    /// Declared kind.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Combine a field name, its kind and its wire metadata.
    pub const fn new(name: &'static str, kind: FieldKind, meta: FieldMeta) -> Self {
        Self {
            name,
            wire: meta.wire,
            required: meta.required,
            default: meta.default,
            kind,
        }
    }
}

/// Static description of a record type.
#[derive(Debug)]
pub struct RecordDescriptor {
    /// Record type name.
    pub name: &'static str,
    /// Fields in declaration order.
    pub fields: &'static [FieldDescriptor],
}

impl RecordDescriptor {
    /// Find the field keyed by `wire`.
    pub fn field_by_wire(&self, wire: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.wire == wire)
    }

    /// Wire names of every field, in declaration order.
    pub fn wire_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|field| field.wire)
    }
}

/// A record type the walkers can traverse.
///
/// Implement with [`impl_record!`](crate::impl_record) rather than by hand:
/// `fields_mut` must yield exactly one entry per descriptor field, in
/// descriptor order, with a variant matching the field's kind.
pub trait Record {
    /// The static descriptor of this record type.
    fn descriptor(&self) -> &'static RecordDescriptor;

    /// One mutable field handle per descriptor field, in descriptor order.
    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;

    /// Returns true if every field holds its zero value.
    fn is_zero(&self) -> bool;
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn descriptor(&self) -> &'static RecordDescriptor {
        (**self).descriptor()
    }

    fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
        (**self).fields_mut()
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

/// Mutable handle to one field, tagged by kind.
pub enum FieldMut<'a> {
    Scalar(&'a mut dyn Scalar),
    Record(&'a mut dyn Record),
    RecordSeq(&'a mut dyn RecordSeq),
    RecordMap(&'a mut dyn RecordMap),
    BareRecordMap(&'a dyn BareRecordMap),
    ScalarSeq(&'a dyn ScalarCollection),
    ScalarMap(&'a dyn ScalarCollection),
}

impl FieldMut<'_> {
    /// The kind this handle was built for.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Scalar(_) => FieldKind::Scalar,
            Self::Record(_) => FieldKind::Record,
            Self::RecordSeq(_) => FieldKind::RecordSeq,
            Self::RecordMap(_) => FieldKind::RecordMap,
            Self::BareRecordMap(_) => FieldKind::BareRecordMap,
            Self::ScalarSeq(_) => FieldKind::ScalarSeq,
            Self::ScalarMap(_) => FieldKind::ScalarMap,
        }
    }

    /// Returns true if the field holds its zero value.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Scalar(scalar) => scalar.is_zero(),
            Self::Record(record) => record.is_zero(),
            Self::RecordSeq(seq) => seq.is_empty(),
            Self::RecordMap(map) => map.is_empty(),
            Self::BareRecordMap(map) => map.is_empty(),
            Self::ScalarSeq(items) | Self::ScalarMap(items) => items.is_empty(),
        }
    }
}

/// A sequence of records.
pub trait RecordSeq {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns true if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutable handles to every element, in order.
    fn elements_mut(&mut self) -> Vec<&mut dyn Record>;
}

impl<R: Record> RecordSeq for Vec<R> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn elements_mut(&mut self) -> Vec<&mut dyn Record> {
        self.iter_mut().map(|r| r as &mut dyn Record).collect()
    }
}

/// A string-keyed map of record pointers.
pub trait RecordMap {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns true if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutable handles to every entry, sorted by key. `None` is a null pointer.
    fn entries_mut(&mut self) -> Vec<(&str, Option<&mut dyn Record>)>;
}

fn sorted_entries<'a>(
    entries: impl Iterator<Item = (&'a str, Option<&'a mut dyn Record>)>,
) -> Vec<(&'a str, Option<&'a mut dyn Record>)> {
    let mut entries: Vec<_> = entries.collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

impl<R: Record> RecordMap for HashMap<String, Option<Box<R>>> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries_mut(&mut self) -> Vec<(&str, Option<&mut dyn Record>)> {
        sorted_entries(self.iter_mut().map(|(k, v)| {
            (k.as_str(), v.as_deref_mut().map(|r| r as &mut dyn Record))
        }))
    }
}

impl<R: Record> RecordMap for BTreeMap<String, Option<Box<R>>> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries_mut(&mut self) -> Vec<(&str, Option<&mut dyn Record>)> {
        self.iter_mut()
            .map(|(k, v)| (k.as_str(), v.as_deref_mut().map(|r| r as &mut dyn Record)))
            .collect()
    }
}

impl<R: Record> RecordMap for HashMap<String, Box<R>> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries_mut(&mut self) -> Vec<(&str, Option<&mut dyn Record>)> {
        sorted_entries(
            self.iter_mut()
                .map(|(k, v)| (k.as_str(), Some(&mut **v as &mut dyn Record))),
        )
    }
}

impl<R: Record> RecordMap for BTreeMap<String, Box<R>> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries_mut(&mut self) -> Vec<(&str, Option<&mut dyn Record>)> {
        self.iter_mut()
            .map(|(k, v)| (k.as_str(), Some(&mut **v as &mut dyn Record)))
            .collect()
    }
}

/// A map holding bare records by value.
///
/// Only its length is observable: entries are not walkable, and the walkers
/// reject the field with an "unaddressable field must be pointer" error.
pub trait BareRecordMap {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns true if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, R: Record> BareRecordMap for HashMap<K, R> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl<K, R: Record> BareRecordMap for BTreeMap<K, R> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

/// A sequence or map of scalars. Entries carry no metadata of their own.
pub trait ScalarCollection {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns true if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Scalar> ScalarCollection for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<K, V: Scalar> ScalarCollection for HashMap<K, V> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl<K, V: Scalar> ScalarCollection for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

/// Implement [`Record`] for a struct from a list of its fields.
///
/// Each entry is `field: kind("wire")` followed by optional `.required()`
/// and `.default("literal")`. Kinds are `scalar`, `record`, `record_seq`,
/// `record_map`, `bare_record_map`, `scalar_seq` and `scalar_map`.
/// Fields that are not listed are invisible to the walkers and to the
/// unknown-key audit.
///
/// The wire name must be the key serde reads the field from, including any
/// `#[serde(rename)]` or `rename_all` on the struct. Nothing checks the two
/// against each other at compile time. A mismatch makes the field look
/// absent on every load: its default overwrites the decoded value, a
/// required field always fails, and the audit rejects the real key as
/// unknown. `tagload_loader::wire_drift` compares the two for a record
/// that also derives `Serialize`, and belongs in that record's tests.
#[macro_export]
macro_rules! impl_record {
    (
        $record:ident {
            $(
                $field:ident : $kind:ident ( $wire:literal )
                $( . $flag:ident ( $( $arg:literal )? ) )*
            ),* $(,)?
        }
    ) => {
        impl $crate::Record for $record {
            fn descriptor(&self) -> &'static $crate::RecordDescriptor {
                static DESCRIPTOR: $crate::RecordDescriptor = $crate::RecordDescriptor {
                    name: stringify!($record),
                    fields: &[
                        $(
                            $crate::FieldDescriptor::new(
                                stringify!($field),
                                $crate::__field_kind!($kind),
                                $crate::FieldMeta::new($wire) $( .$flag( $( $arg )? ) )*,
                            ),
                        )*
                    ],
                };
                &DESCRIPTOR
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<$crate::FieldMut<'_>> {
                ::std::vec![ $( $crate::__field_mut!($kind, self.$field) ),* ]
            }

            fn is_zero(&self) -> bool {
                true $( && $crate::__field_is_zero!($kind, self.$field) )*
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_kind {
    (scalar) => {
        $crate::FieldKind::Scalar
    };
    (record) => {
        $crate::FieldKind::Record
    };
    (record_seq) => {
        $crate::FieldKind::RecordSeq
    };
    (record_map) => {
        $crate::FieldKind::RecordMap
    };
    (bare_record_map) => {
        $crate::FieldKind::BareRecordMap
    };
    (scalar_seq) => {
        $crate::FieldKind::ScalarSeq
    };
    (scalar_map) => {
        $crate::FieldKind::ScalarMap
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_mut {
    (scalar, $($place:tt)+) => {
        $crate::FieldMut::Scalar(&mut $($place)+)
    };
    (record, $($place:tt)+) => {
        $crate::FieldMut::Record(&mut $($place)+)
    };
    (record_seq, $($place:tt)+) => {
        $crate::FieldMut::RecordSeq(&mut $($place)+)
    };
    (record_map, $($place:tt)+) => {
        $crate::FieldMut::RecordMap(&mut $($place)+)
    };
    (bare_record_map, $($place:tt)+) => {
        $crate::FieldMut::BareRecordMap(&$($place)+)
    };
    (scalar_seq, $($place:tt)+) => {
        $crate::FieldMut::ScalarSeq(&$($place)+)
    };
    (scalar_map, $($place:tt)+) => {
        $crate::FieldMut::ScalarMap(&$($place)+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_is_zero {
    (scalar, $($place:tt)+) => {
        $crate::Scalar::is_zero(&$($place)+)
    };
    (record, $($place:tt)+) => {
        $crate::Record::is_zero(&$($place)+)
    };
    (record_seq, $($place:tt)+) => {
        $crate::RecordSeq::is_empty(&$($place)+)
    };
    (record_map, $($place:tt)+) => {
        $crate::RecordMap::is_empty(&$($place)+)
    };
    (bare_record_map, $($place:tt)+) => {
        $crate::BareRecordMap::is_empty(&$($place)+)
    };
    (scalar_seq, $($place:tt)+) => {
        $crate::ScalarCollection::is_empty(&$($place)+)
    };
    (scalar_map, $($place:tt)+) => {
        $crate::ScalarCollection::is_empty(&$($place)+)
    };
}
