//! # Load Options
//!
//! Knobs for a single load. The defaults reproduce the plain
//! `load(path, &mut target)` behaviour; every field can also be read from a
//! YAML or JSON options file, where omitted keys keep their default.

use serde::Deserialize;

use crate::decode::DocumentFormat;
use crate::defaults::AbsentParentPolicy;

/// Options controlling how a document is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// Input format. `None` selects by file extension.
    pub format: Option<DocumentFormat>,
    /// Fail when the input holds a key no record declares.
    pub deny_unknown_fields: bool,
    /// Whether defaults are applied inside records absent from the input.
    pub absent_parents: AbsentParentPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            deny_unknown_fields: true,
            absent_parents: AbsentParentPolicy::default(),
        }
    }
}

impl LoadOptions {
    /// Force the input format regardless of file extension.
    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Accept keys that no record declares.
    pub fn allow_unknown_fields(mut self) -> Self {
        self.deny_unknown_fields = false;
        self
    }

    /// Set the policy for records absent from the input.
    pub fn with_absent_parents(mut self, policy: AbsentParentPolicy) -> Self {
        self.absent_parents = policy;
        self
    }
}
