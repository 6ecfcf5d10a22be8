//! # Load Pipeline
//!
//! Runs the four stages of a load in order, each failing fast:
//!
//! 1. Read the source bytes.
//! 2. Decode them into a typed record and a presence tree, then audit the
//!    tree for undeclared keys.
//! 3. Check required fields against the presence tree.
//! 4. Apply default literals against the same tree.
//!
//! The caller's target is replaced only once stage 2 succeeds, so a read
//! failure leaves it untouched. A required-field failure leaves it holding
//! the decoded values with no defaults applied. A default failure leaves
//! the defaults assigned before the failing field in place.

use std::path::Path;

use serde::de::DeserializeOwned;
use tagload_core::{LoadError, Presence, ReadError, Record};

use crate::decode::{decode, reject_unknown_fields, Decoded, DocumentFormat};
use crate::defaults::DefaultSetter;
use crate::options::LoadOptions;
use crate::required::check_required;

/// Loads documents into typed records with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: LoadOptions,
}

impl Loader {
    /// Create a loader with the given options.
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Returns the options this loader runs with.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load the document at `path` into `target`.
    ///
    /// The format comes from [`LoadOptions::format`] when set, otherwise from
    /// the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if the file cannot be read or decoded,
    /// [`LoadError::Required`] if a required key is absent, and
    /// [`LoadError::Default`] if a default literal cannot be assigned.
    pub fn load_path<T>(&self, path: &Path, target: &mut T) -> Result<(), LoadError>
    where
        T: Record + DeserializeOwned,
    {
        let origin = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| ReadError::Io {
            path: origin.clone(),
            source,
        })?;
        let format = self
            .options
            .format
            .unwrap_or_else(|| DocumentFormat::from_path(path));

        tracing::debug!(path = %origin, format = format.as_str(), bytes = bytes.len(), "read document");
        self.run(&bytes, format, &origin, target)
    }

    /// Load an in-memory document into `target`.
    ///
    /// [`LoadOptions::format`] is ignored in favour of `format`.
    ///
    /// # Errors
    ///
    /// As [`Loader::load_path`], minus the IO failure.
    pub fn load_slice<T>(&self, bytes: &[u8], format: DocumentFormat, target: &mut T) -> Result<(), LoadError>
    where
        T: Record + DeserializeOwned,
    {
        self.run(bytes, format, "<memory>", target)
    }

    fn run<T>(&self, bytes: &[u8], format: DocumentFormat, origin: &str, target: &mut T) -> Result<(), LoadError>
    where
        T: Record + DeserializeOwned,
    {
        let Decoded {
            target: mut decoded,
            presence,
        } = decode::<T>(bytes, format, origin)?;

        if self.options.deny_unknown_fields {
            reject_unknown_fields(&mut decoded, &presence)?;
        }
        *target = decoded;

        let root = Presence::Node(&presence);
        check_required(target, root)?;
        tracing::debug!(origin, record = target.descriptor().name, "required fields present");

        DefaultSetter::new(self.options.absent_parents).apply(target, root)?;
        tracing::info!(origin, record = target.descriptor().name, "document loaded");
        Ok(())
    }
}

/// Load the document at `path` into `target` with default options.
///
/// This is the plain entry point: JSON unless the extension says YAML,
/// undeclared keys rejected, defaults applied inside absent records.
///
/// # Errors
///
/// See [`Loader::load_path`].
pub fn load<T>(path: impl AsRef<Path>, target: &mut T) -> Result<(), LoadError>
where
    T: Record + DeserializeOwned,
{
    Loader::default().load_path(path.as_ref(), target)
}

/// Load the document at `path` into `target` with explicit options.
///
/// # Errors
///
/// See [`Loader::load_path`].
pub fn load_with<T>(path: impl AsRef<Path>, target: &mut T, options: &LoadOptions) -> Result<(), LoadError>
where
    T: Record + DeserializeOwned,
{
    Loader::new(options.clone()).load_path(path.as_ref(), target)
}

/// Load an in-memory document into `target`.
///
/// # Errors
///
/// See [`Loader::load_slice`].
pub fn load_from_slice<T>(
    bytes: &[u8],
    format: DocumentFormat,
    target: &mut T,
    options: &LoadOptions,
) -> Result<(), LoadError>
where
    T: Record + DeserializeOwned,
{
    Loader::new(options.clone()).load_slice(bytes, format, target)
}

/// Load a JSON string into `target` with default options.
///
/// # Errors
///
/// See [`Loader::load_slice`].
pub fn load_from_str<T>(json: &str, target: &mut T) -> Result<(), LoadError>
where
    T: Record + DeserializeOwned,
{
    Loader::default().load_slice(json.as_bytes(), DocumentFormat::Json, target)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use tagload_core::{impl_record, ErrorCategory};

    use super::*;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Person {
        name: String,
        age: i32,
    }

    impl_record! {
        Person {
            name: scalar("name").required(),
            age: scalar("age").default("18"),
        }
    }

    #[test]
    fn defaults_fill_absent_keys() {
        let mut person = Person::default();
        load_from_str(r#"{"name": "Jin"}"#, &mut person).unwrap();
        assert_eq!(person, Person { name: "Jin".into(), age: 18 });
    }

    #[test]
    fn explicit_zero_survives() {
        let mut person = Person::default();
        load_from_str(r#"{"name": "Jin", "age": 0}"#, &mut person).unwrap();
        assert_eq!(person.age, 0);
    }

    #[test]
    fn read_failure_leaves_target_untouched() {
        let mut person = Person { name: "before".into(), age: 7 };
        let err = load_from_str(r#"{"name": "Jin", "age": "x"}"#, &mut person).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ReadFailure);
        assert_eq!(person, Person { name: "before".into(), age: 7 });

        let err = load_from_str(r#"{"name": "Jin", "height": 3}"#, &mut person).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ReadFailure);
        assert_eq!(person.name, "before");
    }

    #[test]
    fn required_failure_skips_defaulting() {
        let mut person = Person::default();
        let err = load_from_str(r#"{}"#, &mut person).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::RequiredFieldFailure);
        assert_eq!(person.age, 0);
    }

    #[test]
    fn unknown_keys_allowed_when_configured() {
        let mut person = Person::default();
        let options = LoadOptions::default().allow_unknown_fields();
        load_from_slice(br#"{"name": "Jin", "height": 3}"#, DocumentFormat::Json, &mut person, &options).unwrap();
        assert_eq!(person.age, 18);
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Gauge {
        ratio: f64,
        floor: f32,
    }

    impl_record! {
        Gauge {
            ratio: scalar("ratio").default("0.5"),
            floor: scalar("floor").default("1"),
        }
    }

    #[test]
    fn yaml_infinity_is_kept_not_defaulted() {
        let mut gauge = Gauge::default();
        load_from_slice(b"ratio: .inf\n", DocumentFormat::Yaml, &mut gauge, &LoadOptions::default()).unwrap();
        assert_eq!(gauge.ratio, f64::INFINITY);
        assert_eq!(gauge.floor, 1.0);
    }

    #[test]
    fn missing_file_is_read_failure() {
        let mut person = Person::default();
        let err = load("/definitely/not/here.json", &mut person).unwrap_err();
        assert!(matches!(err, LoadError::Read(ReadError::Io { .. })));
    }
}
