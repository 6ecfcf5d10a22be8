//! Record shapes and fixture helpers shared by the loader integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tagload_loader::impl_record;
use tempfile::TempDir;

/// Settings with every supported field kind and only well-formed defaults.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "byte-field")]
    pub byte: u8,
    #[serde(rename = "string-field")]
    pub text: String,
    #[serde(rename = "int-field")]
    pub number: i64,
    #[serde(rename = "slice-field")]
    pub tags: Vec<String>,
    #[serde(rename = "struct-field")]
    pub inner: Inner,
    #[serde(rename = "primitive-map-field")]
    pub counts: HashMap<String, i32>,
    #[serde(rename = "struct-map-field")]
    pub members: BTreeMap<String, Option<Box<Inner>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inner {
    #[serde(rename = "byte-field")]
    pub byte: u8,
    #[serde(rename = "string-field")]
    pub text: String,
    #[serde(rename = "int-field")]
    pub number: i64,
}

/// Same wire shape as [`Settings`], with a malformed integer default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BadIntDefault {
    #[serde(rename = "string-field")]
    pub text: String,
    #[serde(rename = "int-field")]
    pub number: i64,
    #[serde(rename = "other-int-field")]
    pub other: i32,
}

/// A sequence field carrying a default literal.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeqDefault {
    #[serde(rename = "slice-field")]
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    #[serde(rename = "slice-field")]
    pub entries: Vec<Inner>,
}

impl_record! {
    Settings {
        byte: scalar("byte-field"),
        text: scalar("string-field").required(),
        number: scalar("int-field").default("123"),
        tags: scalar_seq("slice-field").required(),
        inner: record("struct-field").required(),
        counts: scalar_map("primitive-map-field"),
        members: record_map("struct-map-field").required(),
    }
}

impl_record! {
    Inner {
        byte: scalar("byte-field"),
        text: scalar("string-field").required(),
        number: scalar("int-field").default("123"),
    }
}

impl_record! {
    BadIntDefault {
        text: scalar("string-field").required(),
        number: scalar("int-field").default("123"),
        other: scalar("other-int-field").default("foo"),
    }
}

impl_record! {
    SeqDefault {
        tags: scalar_seq("slice-field").required().default("what?"),
    }
}

impl_record! {
    Roster {
        entries: record_seq("slice-field").required(),
    }
}

/// A temporary directory holding named fixture documents.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write `contents` under `name` and return the full path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }
}

/// A complete document for [`Settings`] that omits only defaulted keys.
pub const SETTINGS_JSON: &str = r#"{
    "byte-field": 7,
    "string-field": "root",
    "slice-field": ["a", "b"],
    "struct-field": {"string-field": "inner"},
    "primitive-map-field": {"x": 1},
    "struct-map-field": {
        "first": {"string-field": "one", "int-field": 0},
        "second": {"string-field": "two"},
        "gone": null
    }
}"#;
