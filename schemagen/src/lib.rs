//! Schema generator: canonicalize an in-host introspection dump into the
//! versioned schema artifact.
//!
//! The capture pipeline has two halves. Inside the real application, a dump
//! step walks the live type registry through the host's reflection
//! facilities and writes its raw output as JSON, in whatever order the host
//! reports. Everything deterministic lives here: the dump is validated,
//! types are ordered by name, attribute declaration order is preserved, the
//! artifact format version is stamped, and the canonical bytes are written.
//! Regenerating from the same dump yields a byte-identical artifact.

use mayamock_core::{AttrType, Value};
use mayamock_schema::{AttrDef, BuildError, NodeTypeDef, SchemaError, SchemaStore};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors surfaced by the generator.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("cannot read introspection dump: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse introspection dump: {0}")]
    Dump(#[from] serde_json::Error),

    #[error("introspection dump is missing the application version")]
    MissingVersion,

    #[error("duplicate type '{0}' in introspection dump")]
    DuplicateType(String),

    #[error(transparent)]
    Invalid(#[from] BuildError),

    #[error(transparent)]
    Artifact(#[from] SchemaError),
}

/// Raw reflection output of the in-host dump step. Tolerant: unknown fields
/// are ignored, flags and defaults fall back, order is host order.
#[derive(Debug, Deserialize)]
pub struct RawDump {
    #[serde(default)]
    pub application_version: String,
    #[serde(default)]
    pub types: Vec<RawType>,
}

/// One reflected node type.
#[derive(Debug, Deserialize)]
pub struct RawType {
    pub name: String,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<RawAttr>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
}

/// One reflected attribute.
#[derive(Debug, Deserialize)]
pub struct RawAttr {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
    #[serde(default = "null_default")]
    pub default: Value,
    #[serde(default = "default_true")]
    pub readable: bool,
    #[serde(default = "default_true")]
    pub writable: bool,
    #[serde(default = "default_true")]
    pub connectable: bool,
    #[serde(default)]
    pub multi: bool,
}

fn default_true() -> bool {
    true
}

fn null_default() -> Value {
    Value::Null
}

/// Outcome of a successful generation, for progress reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Application version captured in the artifact.
    pub application_version: String,
    /// Number of types captured.
    pub type_count: usize,
}

impl From<RawAttr> for AttrDef {
    fn from(raw: RawAttr) -> Self {
        Self {
            name: raw.name,
            attr_type: raw.attr_type,
            default: raw.default,
            readable: raw.readable,
            writable: raw.writable,
            connectable: raw.connectable,
            multi: raw.multi,
        }
    }
}

/// Validate a parsed dump and produce the canonical artifact bytes.
pub fn generate(dump: RawDump) -> Result<String, GenerateError> {
    if dump.application_version.is_empty() {
        return Err(GenerateError::MissingVersion);
    }

    let mut seen = std::collections::HashSet::new();
    for ty in &dump.types {
        if !seen.insert(ty.name.clone()) {
            return Err(GenerateError::DuplicateType(ty.name.clone()));
        }
    }

    let defs: Vec<NodeTypeDef> = dump
        .types
        .into_iter()
        .map(|ty| NodeTypeDef {
            name: ty.name,
            parents: ty.parents,
            attrs: ty.attributes.into_iter().map(AttrDef::from).collect(),
            is_abstract: ty.is_abstract,
        })
        .collect();

    let store = SchemaStore::from_types(dump.application_version, defs)?;
    Ok(store.to_artifact_json()?)
}

/// Parse dump JSON and produce the canonical artifact bytes.
pub fn generate_from_json(dump_json: &str) -> Result<String, GenerateError> {
    let dump: RawDump = serde_json::from_str(dump_json)?;
    generate(dump)
}

/// Read a dump file, write the artifact file. The process entry point for
/// the binary.
pub fn run(input: &Path, output: &Path) -> Result<GenerateSummary, GenerateError> {
    let dump_json = std::fs::read_to_string(input)?;
    let artifact = generate_from_json(&dump_json)?;

    let store = SchemaStore::load(&artifact)?;
    let summary = GenerateSummary {
        application_version: store.version().to_string(),
        type_count: store.type_count(),
    };

    std::fs::write(output, artifact)?;
    log::info!(
        target: "mayamock",
        "captured {} types for application version {}",
        summary.type_count,
        summary.application_version
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "application_version": "2020.4",
        "host_build": "ignored-by-the-generator",
        "types": [
            {
                "name": "transform",
                "parents": ["dagNode"],
                "attributes": [
                    {"name": "translateX", "type": "Float"},
                    {"name": "visibility", "type": "Bool", "default": true}
                ]
            },
            {
                "name": "dagNode",
                "abstract": true,
                "attributes": [{"name": "visibility", "type": "Bool"}]
            }
        ]
    }"#;

    #[test]
    fn test_generate_is_idempotent() {
        let first = generate_from_json(DUMP).unwrap();
        let second = generate_from_json(DUMP).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_types_are_ordered_by_name() {
        let artifact = generate_from_json(DUMP).unwrap();
        let dag = artifact.find("\"dagNode\"").unwrap();
        let transform = artifact.find("\"transform\"").unwrap();
        assert!(dag < transform, "types must serialize name-sorted");
    }

    #[test]
    fn test_artifact_loads_and_resolves() {
        let artifact = generate_from_json(DUMP).unwrap();
        let store = SchemaStore::load(&artifact).unwrap();
        assert_eq!(store.version(), "2020.4");
        let attrs = store.resolved_attrs("transform").unwrap();
        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["visibility", "translateX"]);
        // transform redefines visibility with default true.
        assert_eq!(attrs[0].default, Value::Bool(true));
    }

    #[test]
    fn test_missing_version_rejected() {
        let err = generate_from_json(r#"{"types": []}"#).unwrap_err();
        assert!(matches!(err, GenerateError::MissingVersion));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let dump = r#"{
            "application_version": "2020",
            "types": [{"name": "transform"}, {"name": "transform"}]
        }"#;
        let err = generate_from_json(dump).unwrap_err();
        assert!(matches!(err, GenerateError::DuplicateType(_)));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let dump = r#"{
            "application_version": "2020",
            "types": [{"name": "transform", "parents": ["ghost"]}]
        }"#;
        let err = generate_from_json(dump).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Invalid(BuildError::UnknownParentType { .. })
        ));
    }

    #[test]
    fn test_malformed_dump_rejected() {
        let err = generate_from_json("{oops").unwrap_err();
        assert!(matches!(err, GenerateError::Dump(_)));
    }
}
