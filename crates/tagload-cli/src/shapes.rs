//! # Bundled Record Shapes
//!
//! The record shapes the CLI can load a document into. Each shape is an
//! ordinary caller-defined record: serde derives for decoding and output,
//! `impl_record!` for the field metadata.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tagload_core::{impl_record, Record, RecordDescriptor};
use tagload_loader::Loader;

/// A service configuration exercising every walkable field kind.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub port: u16,
    pub workers: u8,
    pub timeout_secs: f32,
    pub tls: Tls,
    pub upstreams: Vec<Upstream>,
    pub routes: HashMap<String, Option<Box<Route>>>,
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tls {
    pub cert_path: String,
    pub verify: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upstream {
    pub host: String,
    pub weight: u32,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    pub target: String,
    pub retries: u8,
}

impl_record! {
    ServiceConfig {
        name: scalar("name").required(),
        port: scalar("port").default("8080"),
        workers: scalar("workers").default("4"),
        timeout_secs: scalar("timeout_secs").default("2.5"),
        tls: record("tls"),
        upstreams: record_seq("upstreams"),
        routes: record_map("routes"),
        labels: scalar_map("labels"),
    }
}

impl_record! {
    Tls {
        cert_path: scalar("cert_path").required(),
        verify: scalar("verify").default("true"),
    }
}

impl_record! {
    Upstream {
        host: scalar("host").required(),
        weight: scalar("weight").default("1"),
    }
}

impl_record! {
    Route {
        target: scalar("target").required(),
        retries: scalar("retries").default("3"),
    }
}

/// A person with named parents, each a person again.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: String,
    pub age: i32,
    pub parents: HashMap<String, Option<Box<Person>>>,
}

impl_record! {
    Person {
        name: scalar("name").required(),
        age: scalar("age").default("18"),
        parents: record_map("parents"),
    }
}

/// Shapes selectable with `--shape`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    /// [`ServiceConfig`] and its nested records.
    Service,
    /// [`Person`] with nested parents.
    Person,
}

impl Shape {
    /// Every bundled shape.
    pub fn all() -> &'static [Shape] {
        &[Shape::Service, Shape::Person]
    }

    /// Command-line name of the shape.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Service => "service",
            Shape::Person => "person",
        }
    }

    /// Descriptors of every record type reachable from the shape's root.
    pub fn descriptors(self) -> Vec<&'static RecordDescriptor> {
        match self {
            Shape::Service => vec![
                ServiceConfig::default().descriptor(),
                Tls::default().descriptor(),
                Upstream::default().descriptor(),
                Route::default().descriptor(),
            ],
            Shape::Person => vec![Person::default().descriptor()],
        }
    }

    /// Load `path` into this shape and serialize the result back to JSON.
    ///
    /// # Errors
    ///
    /// A failed load surfaces as a [`tagload_core::LoadError`] inside the
    /// returned error, so callers can tell it apart from a failure to
    /// serialize the loaded record.
    pub fn load(self, loader: &Loader, path: &Path) -> Result<Loaded> {
        match self {
            Shape::Service => load_into::<ServiceConfig>(loader, path),
            Shape::Person => load_into::<Person>(loader, path),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A successfully loaded document, ready for output.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    /// Name of the root record.
    pub record: &'static str,
    /// The loaded record, serialized back to JSON.
    pub value: serde_json::Value,
}

fn load_into<T>(loader: &Loader, path: &Path) -> Result<Loaded>
where
    T: Record + Serialize + for<'de> Deserialize<'de> + Default,
{
    let mut target = T::default();
    loader.load_path(path, &mut target)?;
    let record = target.descriptor().name;
    let value = serde_json::to_value(&target)
        .with_context(|| format!("cannot serialize loaded {record}"))?;
    Ok(Loaded { record, value })
}

#[cfg(test)]
mod tests {
    use tagload_core::{ErrorCategory, LoadError};

    use super::*;

    /// Decodes like any record but refuses to serialize.
    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Opaque {
        name: String,
    }

    impl_record! { Opaque { name: scalar("name") } }

    impl Serialize for Opaque {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("opaque record"))
        }
    }

    #[test]
    fn serialize_failure_is_not_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opaque.json");
        std::fs::write(&path, r#"{"name": "x"}"#).unwrap();

        let err = load_into::<Opaque>(&Loader::default(), &path).unwrap_err();
        assert!(err.downcast_ref::<LoadError>().is_none());
        assert!(err.to_string().contains("cannot serialize loaded Opaque"), "{err}");
    }

    #[test]
    fn load_failure_keeps_its_category() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("person.json");
        std::fs::write(&path, r#"{"age": 3}"#).unwrap();

        let err = Shape::Person.load(&Loader::default(), &path).unwrap_err();
        let load_err = err.downcast_ref::<LoadError>().unwrap();
        assert_eq!(load_err.category(), ErrorCategory::RequiredFieldFailure);
    }

    #[test]
    fn shape_names_match_value_enum() {
        for shape in Shape::all() {
            let parsed = Shape::from_str(shape.name(), false).unwrap();
            assert_eq!(parsed, *shape);
        }
    }

    #[test]
    fn shape_wire_names_match_serde_keys() {
        use tagload_loader::wire_drift;

        assert!(wire_drift::<ServiceConfig>().unwrap().is_empty());
        assert!(wire_drift::<Tls>().unwrap().is_empty());
        assert!(wire_drift::<Upstream>().unwrap().is_empty());
        assert!(wire_drift::<Route>().unwrap().is_empty());
        assert!(wire_drift::<Person>().unwrap().is_empty());
    }

    #[test]
    fn service_descriptors_cover_nested_records() {
        let names: Vec<&str> = Shape::Service.descriptors().iter().map(|d| d.name).collect();
        assert_eq!(names, ["ServiceConfig", "Tls", "Upstream", "Route"]);
    }

    #[test]
    fn service_defaults_parse_into_declared_widths() {
        let mut config = ServiceConfig::default();
        tagload_loader::load_from_str(r#"{"name": "api", "tls": {"cert_path": "/c"}}"#, &mut config)
            .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, 4);
        assert_eq!(config.timeout_secs, 2.5);
        assert!(config.tls.verify);
    }

    #[test]
    fn nested_parents_are_checked_and_defaulted() {
        let mut person = Person::default();
        tagload_loader::load_from_str(
            r#"{"name": "Jin", "parents": {"pa": {"name": "Jo", "parents": {"gran": {"name": "Ada", "age": 0}}}}}"#,
            &mut person,
        )
        .unwrap();
        assert_eq!(person.age, 18);
        let pa = person.parents["pa"].as_deref().unwrap();
        assert_eq!(pa.age, 18);
        assert_eq!(pa.parents["gran"].as_deref().map(|g| g.age), Some(0));

        let err = tagload_loader::load_from_str(
            r#"{"name": "Jin", "parents": {"ma": {"age": 40}}}"#,
            &mut Person::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains(r#"parents["ma"].name"#), "{err}");
    }
}
