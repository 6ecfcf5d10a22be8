//! # Default-Field Setter
//!
//! Walks a typed record and its presence tree in lock-step and assigns each
//! scalar field's default literal when the input did not supply its key.
//!
//! ## Application Rule
//!
//! | Cursor    | Default applied when        |
//! |-----------|-----------------------------|
//! | `Node`    | never (the key was present) |
//! | `Absent`  | always                      |
//! | `Unknown` | the field holds zero        |
//!
//! An explicit `"age": 0` therefore keeps `0`, even when `age` defaults to
//! `18`. Running the setter a second time against a presence tree taken
//! from its own output changes nothing.
//!
//! ## Unsupported Kinds
//!
//! Only scalar fields take a default literal. A literal attached to a
//! record, sequence or map always fails, whatever the input holds.
//!
//! ## Partial Application
//!
//! The walk stops at the first failure. Defaults assigned before it stay
//! assigned.

use serde::Deserialize;
use tagload_core::{
    DefaultAssignError, FieldDescriptor, FieldMut, FieldPath, Presence, Record,
};

/// What to do with records whose key is absent from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentParentPolicy {
    /// Descend with an `Absent` cursor and apply the nested defaults.
    #[default]
    ApplyDefaults,
    /// Leave absent records at their zero value.
    Skip,
}

/// Applies default literals to a record.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSetter {
    absent_parents: AbsentParentPolicy,
}

impl DefaultSetter {
    /// Create a setter with the given policy for absent parent records.
    pub fn new(absent_parents: AbsentParentPolicy) -> Self {
        Self { absent_parents }
    }

    /// Returns the policy for absent parent records.
    pub fn absent_parents(&self) -> AbsentParentPolicy {
        self.absent_parents
    }

    /// Apply every default literal of `record` not contradicted by `presence`.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefaultAssignError`] found, in field declaration
    /// order, depth first.
    pub fn apply(&self, record: &mut dyn Record, presence: Presence<'_>) -> Result<(), DefaultAssignError> {
        self.apply_record(record, presence, &FieldPath::root())
    }

    fn descend(&self, presence: Presence<'_>) -> bool {
        !(presence.is_absent() && self.absent_parents == AbsentParentPolicy::Skip)
    }

    fn apply_record(
        &self,
        record: &mut dyn Record,
        presence: Presence<'_>,
        path: &FieldPath,
    ) -> Result<(), DefaultAssignError> {
        let descriptor = record.descriptor();

        for (field, slot) in descriptor.fields.iter().zip(record.fields_mut()) {
            let child = presence.child(field.wire);
            let field_path = path.field(descriptor.name, field.wire);

            match slot {
                FieldMut::Scalar(scalar) => {
                    let Some(literal) = field.default else {
                        continue;
                    };
                    if child.supplied(|| scalar.is_zero()) {
                        continue;
                    }
                    let declared = scalar.scalar_type();
                    scalar
                        .assign_literal(literal)
                        .map_err(|source| DefaultAssignError::Parse {
                            field: field.name,
                            literal,
                            declared,
                            path: field_path.clone(),
                            source,
                        })?;
                    tracing::debug!(
                        record = descriptor.name,
                        field = field.name,
                        literal,
                        path = %field_path,
                        "applied default"
                    );
                }
                FieldMut::Record(nested) => {
                    reject_literal(field, &field_path)?;
                    if self.descend(child) {
                        self.apply_record(nested, child, &field_path)?;
                    }
                }
                FieldMut::RecordSeq(seq) => {
                    reject_literal(field, &field_path)?;
                    for (index, element) in seq.elements_mut().into_iter().enumerate() {
                        if element.is_zero() {
                            continue;
                        }
                        let element_path = field_path.index(index);
                        let item = child.element(index).map_err(|mismatch| {
                            DefaultAssignError::PresenceMismatch {
                                path: element_path.clone(),
                                detail: mismatch.detail,
                            }
                        })?;
                        if self.descend(item) {
                            self.apply_record(element, item, &element_path)?;
                        }
                    }
                }
                FieldMut::RecordMap(map) => {
                    reject_literal(field, &field_path)?;
                    for (key, entry) in map.entries_mut() {
                        let Some(entry) = entry else {
                            continue;
                        };
                        let item = child.child(key);
                        if self.descend(item) {
                            self.apply_record(entry, item, &field_path.key(key))?;
                        }
                    }
                }
                FieldMut::BareRecordMap(_) => {
                    reject_literal(field, &field_path)?;
                    return Err(DefaultAssignError::Unaddressable {
                        record: descriptor.name,
                        field: field.name,
                        path: field_path,
                    });
                }
                FieldMut::ScalarSeq(_) | FieldMut::ScalarMap(_) => {
                    reject_literal(field, &field_path)?;
                }
            }
        }
        Ok(())
    }
}

fn reject_literal(field: &FieldDescriptor, path: &FieldPath) -> Result<(), DefaultAssignError> {
    match field.default {
        Some(literal) => Err(DefaultAssignError::Unsupported {
            field: field.name,
            kind: field.kind,
            literal,
            path: path.clone(),
        }),
        None => Ok(()),
    }
}

/// Apply default literals with the default [`AbsentParentPolicy`].
///
/// # Errors
///
/// See [`DefaultSetter::apply`].
pub fn apply_defaults(record: &mut dyn Record, presence: Presence<'_>) -> Result<(), DefaultAssignError> {
    DefaultSetter::default().apply(record, presence)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use serde_json::json;
    use tagload_core::{impl_record, FieldKind, LiteralError, PresenceNode, ScalarType};

    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Defaults {
        f1: i8,
        f2: String,
        f3: u8,
    }

    #[derive(Debug, Default)]
    struct WrongInt {
        f1: i32,
        f2: String,
        f3: u8,
    }

    #[derive(Debug, Default)]
    struct WrongByte {
        f1: i32,
        f2: String,
        f3: u8,
    }

    #[derive(Debug, Default)]
    struct WrongSeq {
        f1: Vec<i32>,
    }

    #[derive(Debug, Default)]
    struct WrongMap {
        f1: HashMap<String, String>,
    }

    #[derive(Debug, Default)]
    struct WrongRecord {
        f1: Defaults,
    }

    #[derive(Debug, Default)]
    struct Nested {
        f1: Defaults,
    }

    #[derive(Debug, Default)]
    struct PointerMap {
        f1: BTreeMap<String, Option<Box<Defaults>>>,
    }

    #[derive(Debug, Default)]
    struct Sequence {
        items: Vec<Defaults>,
    }

    #[derive(Debug, Default)]
    struct BareMap {
        f1: HashMap<String, Defaults>,
    }

    #[derive(Debug, Default)]
    struct BareMapWithLiteral {
        f1: HashMap<String, Defaults>,
    }

    #[derive(Debug, Default)]
    struct Widths {
        small: i16,
        big: u64,
        ratio: f32,
        precise: f64,
        enabled: bool,
        nick: Option<String>,
    }

    impl_record! {
        Defaults {
            f1: scalar("f1").default("127"),
            f2: scalar("f2").default("str"),
            f3: scalar("f3").default("16"),
        }
    }

    impl_record! {
        WrongInt {
            f1: scalar("f1").default("10a"),
            f2: scalar("f2").default("str"),
            f3: scalar("f3").default("16"),
        }
    }

    impl_record! {
        WrongByte {
            f1: scalar("f1").default("10"),
            f2: scalar("f2").default("str"),
            f3: scalar("f3").default("16a"),
        }
    }

    impl_record! { WrongSeq { f1: scalar_seq("f1").default("10") } }
    impl_record! { WrongMap { f1: scalar_map("f1").default("10") } }
    impl_record! { WrongRecord { f1: record("f1").default("10") } }
    impl_record! { Nested { f1: record("f1") } }
    impl_record! { PointerMap { f1: record_map("f1") } }
    impl_record! { Sequence { items: record_seq("items") } }
    impl_record! { BareMap { f1: bare_record_map("f1") } }
    impl_record! { BareMapWithLiteral { f1: bare_record_map("f1").default("x") } }

    impl_record! {
        Widths {
            small: scalar("small").default("-300"),
            big: scalar("big").default("18446744073709551615"),
            ratio: scalar("ratio").default("0.25"),
            precise: scalar("precise").default("2.718281828459045"),
            enabled: scalar("enabled").default("true"),
            nick: scalar("nick").default("anon"),
        }
    }

    fn filled() -> Defaults {
        Defaults {
            f1: 127,
            f2: "str".into(),
            f3: 16,
        }
    }

    fn apply(record: &mut dyn Record, input: serde_json::Value) -> Result<(), DefaultAssignError> {
        let tree = PresenceNode::from_value(input);
        apply_defaults(record, Presence::Node(&tree))
    }

    #[test]
    fn absent_scalars_receive_defaults() {
        let mut target = Defaults::default();
        apply(&mut target, json!({})).unwrap();
        assert_eq!(target, filled());
    }

    #[test]
    fn declared_widths_are_respected() {
        let mut target = Widths::default();
        apply(&mut target, json!({})).unwrap();
        assert_eq!(target.small, -300);
        assert_eq!(target.big, u64::MAX);
        assert_eq!(target.ratio, 0.25);
        assert_eq!(target.precise, 2.718281828459045);
        assert!(target.enabled);
        assert_eq!(target.nick.as_deref(), Some("anon"));
    }

    #[test]
    fn explicit_zero_input_is_kept() {
        let mut target = Defaults::default();
        apply(&mut target, json!({"f1": 0, "f2": "", "f3": 0})).unwrap();
        assert_eq!(target, Defaults::default());
    }

    #[test]
    fn malformed_integer_literal_names_field_and_type() {
        let mut target = WrongInt::default();
        let err = apply(&mut target, json!({})).unwrap_err();
        match &err {
            DefaultAssignError::Parse { field, literal, declared, source, .. } => {
                assert_eq!(*field, "f1");
                assert_eq!(*literal, "10a");
                assert_eq!(*declared, ScalarType::I32);
                assert!(matches!(source, LiteralError::Invalid { .. }));
            }
            other => panic!("Expected Parse, got: {other}"),
        }
        assert!(err.to_string().contains("i32"));
    }

    #[test]
    fn failure_keeps_earlier_defaults() {
        let mut target = WrongByte::default();
        let err = apply(&mut target, json!({})).unwrap_err();
        assert!(matches!(err, DefaultAssignError::Parse { field: "f3", declared: ScalarType::U8, .. }));
        assert_eq!(target.f1, 10);
        assert_eq!(target.f2, "str");
        assert_eq!(target.f3, 0);
    }

    #[test]
    fn literal_on_sequence_always_fails() {
        let mut target = WrongSeq::default();
        let err = apply(&mut target, json!({})).unwrap_err();
        assert!(matches!(err, DefaultAssignError::Unsupported { kind: FieldKind::ScalarSeq, .. }));

        let mut target = WrongSeq { f1: vec![1] };
        assert!(apply(&mut target, json!({"f1": [1]})).is_err());
    }

    #[test]
    fn literal_on_map_always_fails() {
        let mut target = WrongMap::default();
        let err = apply(&mut target, json!({"f1": {}})).unwrap_err();
        assert!(matches!(err, DefaultAssignError::Unsupported { kind: FieldKind::ScalarMap, .. }));
    }

    #[test]
    fn literal_on_record_always_fails() {
        let mut target = WrongRecord::default();
        let err = apply(&mut target, json!({})).unwrap_err();
        assert!(matches!(err, DefaultAssignError::Unsupported { kind: FieldKind::Record, .. }));
    }

    #[test]
    fn nested_record_defaults_apply_under_absent_parent() {
        let mut target = Nested::default();
        apply(&mut target, json!({})).unwrap();
        assert_eq!(target.f1, filled());
    }

    #[test]
    fn nested_record_defaults_follow_present_subtree() {
        let mut target = Nested::default();
        apply(&mut target, json!({"f1": {"f1": 0}})).unwrap();
        assert_eq!(target.f1.f1, 0);
        assert_eq!(target.f1.f2, "str");
    }

    #[test]
    fn skip_policy_leaves_absent_parents_zero() {
        let tree = PresenceNode::from_value(json!({}));
        let mut target = Nested::default();
        DefaultSetter::new(AbsentParentPolicy::Skip)
            .apply(&mut target, Presence::Node(&tree))
            .unwrap();
        assert_eq!(target.f1, Defaults::default());

        let tree = PresenceNode::from_value(json!({"f1": {}}));
        DefaultSetter::new(AbsentParentPolicy::Skip)
            .apply(&mut target, Presence::Node(&tree))
            .unwrap();
        assert_eq!(target.f1, filled());
    }

    #[test]
    fn pointer_map_entries_defaulted_against_their_subtree() {
        let mut target = PointerMap {
            f1: BTreeMap::from([
                ("foo".to_string(), Some(Box::default())),
                ("bar".to_string(), Some(Box::default())),
                ("nil".to_string(), None),
            ]),
        };
        apply(
            &mut target,
            json!({"f1": {"foo": {}, "bar": {"f3": 0}, "nil": null}}),
        )
        .unwrap();
        assert_eq!(target.f1["foo"].as_deref(), Some(&filled()));
        let bar = target.f1["bar"].as_deref().unwrap();
        assert_eq!(bar.f1, 127);
        assert_eq!(bar.f3, 0);
        assert!(target.f1["nil"].is_none());
    }

    #[test]
    fn sequence_elements_defaulted_per_index() {
        let mut target = Sequence {
            items: vec![
                Defaults { f1: 5, ..Default::default() },
                Defaults { f3: 9, ..Default::default() },
            ],
        };
        apply(
            &mut target,
            json!({"items": [{"f1": 5}, {"f2": "", "f3": 9}]}),
        )
        .unwrap();
        assert_eq!(target.items[0], Defaults { f1: 5, f2: "str".into(), f3: 16 });
        assert_eq!(target.items[1], Defaults { f1: 127, f2: String::new(), f3: 9 });
    }

    #[test]
    fn sequence_index_mismatch_is_hard_failure() {
        let mut target = Sequence {
            items: vec![Defaults { f1: 1, ..Default::default() }],
        };
        let err = apply(&mut target, json!({"items": []})).unwrap_err();
        assert!(matches!(err, DefaultAssignError::PresenceMismatch { .. }));
    }

    #[test]
    fn unknown_context_defaults_only_zero_fields() {
        let mut target = Defaults {
            f1: 3,
            ..Default::default()
        };
        apply_defaults(&mut target, Presence::Unknown).unwrap();
        assert_eq!(target, Defaults { f1: 3, f2: "str".into(), f3: 16 });
    }

    #[test]
    fn second_pass_over_own_output_is_noop() {
        let mut target = Nested::default();
        apply(&mut target, json!({})).unwrap();
        let once = target.f1.clone();
        apply(
            &mut target,
            json!({"f1": {"f1": once.f1, "f2": once.f2.clone(), "f3": once.f3}}),
        )
        .unwrap();
        assert_eq!(target.f1, once);
    }

    #[test]
    fn bare_record_map_is_unaddressable() {
        let mut target = BareMap::default();
        let err = apply(&mut target, json!({})).unwrap_err();
        assert!(matches!(
            err,
            DefaultAssignError::Unaddressable { record: "BareMap", field: "f1", .. }
        ));

        let mut target = BareMap::default();
        target.f1.insert("a".into(), Defaults::default());
        let err = apply(&mut target, json!({"f1": {"a": {}}})).unwrap_err();
        assert!(matches!(err, DefaultAssignError::Unaddressable { field: "f1", .. }));
        assert_eq!(target.f1["a"], Defaults::default());
    }

    #[test]
    fn literal_on_bare_record_map_is_unsupported_first() {
        let mut target = BareMapWithLiteral::default();
        let err = apply(&mut target, json!({})).unwrap_err();
        assert!(matches!(
            err,
            DefaultAssignError::Unsupported {
                field: "f1",
                kind: FieldKind::BareRecordMap,
                literal: "x",
                ..
            }
        ));
    }
}
