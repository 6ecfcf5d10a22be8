//! # Wire-Name Drift
//!
//! `impl_record!` repeats each field's wire name next to whatever serde
//! attributes the struct carries, and nothing ties the two together. When
//! they disagree the walkers look up a key serde never reads, so the field
//! is judged absent on every load.
//!
//! [`wire_drift`] catches this for records that also derive `Serialize`:
//! it serializes `T::default()` and compares the top-level keys serde
//! writes against the declared wire names. Only the record itself is
//! compared; call it once per nested record type.
//!
//! Keys serde skips on output (`skip_serializing`, `skip_serializing_if`)
//! show up as unserialized wire names even when decoding reads them.

use serde::Serialize;
use tagload_core::Record;

/// Disagreement between declared wire names and serialized keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireDrift {
    /// Keys serde writes that no field declares.
    pub undeclared: Vec<String>,
    /// Declared wire names serde does not write.
    pub unserialized: Vec<&'static str>,
}

impl WireDrift {
    /// Returns `true` when both sides agree.
    pub fn is_empty(&self) -> bool {
        self.undeclared.is_empty() && self.unserialized.is_empty()
    }
}

/// Compare the wire names `T` declares with the keys serde writes for it.
///
/// # Errors
///
/// Returns the serializer's error if `T::default()` cannot be serialized.
pub fn wire_drift<T>() -> Result<WireDrift, serde_json::Error>
where
    T: Record + Serialize + Default,
{
    let record = T::default();
    let descriptor = record.descriptor();
    let value = serde_json::to_value(&record)?;
    let keys: Vec<String> = match value {
        serde_json::Value::Object(map) => map.into_iter().map(|(key, _)| key).collect(),
        _ => Vec::new(),
    };

    let drift = WireDrift {
        undeclared: keys
            .iter()
            .filter(|key| descriptor.field_by_wire(key).is_none())
            .cloned()
            .collect(),
        unserialized: descriptor
            .wire_names()
            .filter(|wire| !keys.iter().any(|key| key == wire))
            .collect(),
    };
    if !drift.is_empty() {
        tracing::warn!(record = descriptor.name, ?drift, "wire names disagree with serde keys");
    }
    Ok(drift)
}
