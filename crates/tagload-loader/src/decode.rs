//! # Raw-Tree Decoder
//!
//! Decodes one document twice: into the caller's typed record, and into an
//! untyped [`PresenceNode`] tree recording which keys the input actually
//! contained. The two passes are sequential and independent.
//!
//! ## Formats
//!
//! JSON is the primary format. YAML documents are accepted too; their
//! untyped decode is bridged into the same presence tree so the walkers
//! never see the difference.
//!
//! ## Unknown Keys
//!
//! [`reject_unknown_fields`] audits the presence tree against the record
//! descriptors. It does not rely on the caller remembering
//! `#[serde(deny_unknown_fields)]` on every nested struct.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Number;
use serde_yaml::Value as YamlValue;
use tagload_core::{
    FieldMut, FieldPath, PresenceNode, PresenceObject, ReadError, Record, ScalarToken,
};

/// Input document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Select a format from a file extension: `.yaml`/`.yml` is YAML,
    /// anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }

    /// Lowercase name of the format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Output of the decoder: the typed record and its presence tree.
#[derive(Debug)]
pub struct Decoded<T> {
    /// The typed record, with absent fields at their zero value.
    pub target: T,
    /// What the input actually contained.
    pub presence: PresenceNode,
}

/// Decode `bytes` into both a typed record and a presence tree.
///
/// `origin` names the source in error messages.
///
/// # Errors
///
/// Returns [`ReadError::Decode`] if the bytes are malformed or a value
/// cannot be coerced into its field's type.
pub fn decode<T: DeserializeOwned>(
    bytes: &[u8],
    format: DocumentFormat,
    origin: &str,
) -> Result<Decoded<T>, ReadError> {
    let decode_error = |reason: String| ReadError::Decode {
        origin: origin.to_owned(),
        reason,
    };

    match format {
        DocumentFormat::Json => {
            let target: T = serde_json::from_slice(bytes)
                .map_err(|e| decode_error(format!("invalid JSON: {e}")))?;
            let value: serde_json::Value = serde_json::from_slice(bytes)
                .map_err(|e| decode_error(format!("invalid JSON: {e}")))?;
            Ok(Decoded {
                target,
                presence: PresenceNode::from_value(value),
            })
        }
        DocumentFormat::Yaml => {
            let target: T = serde_yaml::from_slice(bytes)
                .map_err(|e| decode_error(format!("invalid YAML: {e}")))?;
            let value: YamlValue = serde_yaml::from_slice(bytes)
                .map_err(|e| decode_error(format!("invalid YAML: {e}")))?;
            let presence = yaml_to_presence(value)
                .map_err(|e| decode_error(format!("unsupported YAML structure: {e}")))?;
            Ok(Decoded { target, presence })
        }
    }
}

/// Build a presence tree from an untyped YAML value.
///
/// Tags are transparent. Scalar map keys are stringified the way the typed
/// pass sees them; sequence or mapping keys have no wire-name equivalent.
fn yaml_to_presence(value: YamlValue) -> Result<PresenceNode, String> {
    let node = match value {
        YamlValue::Null => PresenceNode::Scalar(ScalarToken::Null),
        YamlValue::Bool(b) => PresenceNode::Scalar(ScalarToken::Bool(b)),
        YamlValue::Number(n) => PresenceNode::Scalar(yaml_number(&n)),
        YamlValue::String(s) => PresenceNode::Scalar(ScalarToken::String(s)),
        YamlValue::Sequence(items) => PresenceNode::Array(
            items
                .into_iter()
                .map(yaml_to_presence)
                .collect::<Result<_, _>>()?,
        ),
        YamlValue::Mapping(map) => PresenceNode::Object(
            map.into_iter()
                .map(|(key, value)| Ok((yaml_key(key)?, yaml_to_presence(value)?)))
                .collect::<Result<_, String>>()?,
        ),
        YamlValue::Tagged(tagged) => yaml_to_presence(tagged.value)?,
    };
    Ok(node)
}

fn yaml_number(n: &serde_yaml::Number) -> ScalarToken {
    if let Some(i) = n.as_i64() {
        return ScalarToken::Number(i.into());
    }
    if let Some(u) = n.as_u64() {
        return ScalarToken::Number(u.into());
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    Number::from_f64(f).map_or(ScalarToken::NonFinite(f), ScalarToken::Number)
}

fn yaml_key(key: YamlValue) -> Result<String, String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_owned()),
        YamlValue::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(format!("map key {other:?} has no wire name")),
    }
}

/// Reject any input key that the record shape does not declare.
///
/// Walks the typed record and the presence tree in lock-step. Keys of
/// record maps and scalar maps are data, not field names, and are not
/// audited; the records held by a record map are.
///
/// # Errors
///
/// Returns [`ReadError::UnknownField`] for the first undeclared key found,
/// in input order.
pub fn reject_unknown_fields(record: &mut dyn Record, presence: &PresenceNode) -> Result<(), ReadError> {
    audit_record(record, presence, &FieldPath::root())
}

fn audit_record(record: &mut dyn Record, node: &PresenceNode, path: &FieldPath) -> Result<(), ReadError> {
    let Some(object) = node.as_object() else {
        return Ok(());
    };
    let descriptor = record.descriptor();

    if let Some(key) = object.keys().find(|key| descriptor.field_by_wire(key).is_none()) {
        return Err(ReadError::UnknownField {
            key: key.to_owned(),
            record: descriptor.name,
            path: path.clone(),
            expected: descriptor.wire_names().collect::<Vec<_>>().join(", "),
        });
    }

    for (field, slot) in descriptor.fields.iter().zip(record.fields_mut()) {
        let Some(child) = object.get(field.wire) else {
            continue;
        };
        let field_path = path.field(descriptor.name, field.wire);
        match slot {
            FieldMut::Record(nested) => audit_record(nested, child, &field_path)?,
            FieldMut::RecordSeq(seq) => {
                let Some(items) = child.as_array() else {
                    continue;
                };
                for (index, (element, item)) in seq.elements_mut().into_iter().zip(items).enumerate() {
                    audit_record(element, item, &field_path.index(index))?;
                }
            }
            FieldMut::RecordMap(map) => {
                let Some(entries) = child.as_object() else {
                    continue;
                };
                for (key, entry) in map.entries_mut() {
                    if let (Some(entry), Some(item)) = (entry, entries.get(key)) {
                        audit_record(entry, item, &field_path.key(key))?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}
