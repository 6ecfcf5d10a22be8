//! # Required-Field Checker
//!
//! Walks a typed record and its presence tree in lock-step and fails on
//! the first field tagged `required` whose key the input did not supply.
//!
//! ## Presence Rule
//!
//! A required field is missing iff the presence cursor proves its key
//! absent. Its decoded value is irrelevant: `"age": 0` satisfies a required
//! `age`. Only when the cursor is [`Presence::Unknown`] does the checker
//! fall back to treating a zero value as missing.
//!
//! ## Recursion
//!
//! - Nested records are checked against their own subtree when it exists.
//! - Sequence elements that are non-zero are checked against the array
//!   element at the same index; a missing array element is a hard error.
//! - Non-null map entries are checked against the object entry at the same
//!   key.
//! - Subtrees whose presence is `Absent` are not descended into; their
//!   absence is already reported through the parent's `required` flag.
//! - A map of bare records is rejected outright.

use tagload_core::{FieldMut, FieldPath, Presence, Record, RequiredFieldError};

/// Check every required field of `record` against `presence`.
///
/// Pass [`Presence::Unknown`] to check a record with no presence tree at
/// hand; required fields are then judged by zero-ness alone.
///
/// # Errors
///
/// Returns the first [`RequiredFieldError`] found, in field declaration
/// order, depth first.
pub fn check_required(record: &mut dyn Record, presence: Presence<'_>) -> Result<(), RequiredFieldError> {
    check_record(record, presence, &FieldPath::root())
}

fn check_record(
    record: &mut dyn Record,
    presence: Presence<'_>,
    path: &FieldPath,
) -> Result<(), RequiredFieldError> {
    let descriptor = record.descriptor();

    for (field, slot) in descriptor.fields.iter().zip(record.fields_mut()) {
        let child = presence.child(field.wire);
        let field_path = path.field(descriptor.name, field.wire);

        if field.required && !child.supplied(|| slot.is_zero()) {
            return Err(RequiredFieldError::Missing {
                record: descriptor.name,
                field: field.name,
                wire: field.wire,
                path: field_path,
            });
        }

        match slot {
            FieldMut::Record(nested) => {
                if child.is_absent() {
                    continue;
                }
                tracing::trace!(path = %field_path, "checking nested record");
                check_record(nested, child, &field_path)?;
            }
            FieldMut::RecordSeq(seq) => {
                if child.is_absent() {
                    continue;
                }
                for (index, element) in seq.elements_mut().into_iter().enumerate() {
                    if element.is_zero() {
                        continue;
                    }
                    let element_path = field_path.index(index);
                    let item = child.element(index).map_err(|mismatch| {
                        RequiredFieldError::PresenceMismatch {
                            path: element_path.clone(),
                            detail: mismatch.detail,
                        }
                    })?;
                    check_record(element, item, &element_path)?;
                }
            }
            FieldMut::RecordMap(map) => {
                if child.is_absent() {
                    continue;
                }
                for (key, entry) in map.entries_mut() {
                    let Some(entry) = entry else {
                        continue;
                    };
                    let item = child.child(key);
                    if item.is_absent() {
                        continue;
                    }
                    check_record(entry, item, &field_path.key(key))?;
                }
            }
            FieldMut::BareRecordMap(_) => {
                return Err(RequiredFieldError::Unaddressable {
                    record: descriptor.name,
                    field: field.name,
                    path: field_path,
                });
            }
            FieldMut::Scalar(_) | FieldMut::ScalarSeq(_) | FieldMut::ScalarMap(_) => {}
        }
    }
    Ok(())
}
