//! Versioned schema artifact (de)serialization.
//!
//! The artifact is a JSON document with an integer `format` gate, the
//! captured `application_version`, and a name-sorted `types` map. Reads are
//! forward compatible: older formats load, unknown fields are ignored, and
//! missing per-attribute flags fall back to the permissive defaults. A
//! `format` newer than [`ARTIFACT_FORMAT`] is rejected.

use crate::error::{SchemaError, SchemaResult};
use crate::store::SchemaStore;
use crate::types::{AttrDef, NodeTypeDef};
use mayamock_core::{AttrType, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Newest artifact format this engine writes and reads.
pub const ARTIFACT_FORMAT: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ArtifactData {
    format: u32,
    application_version: String,
    types: BTreeMap<String, TypeData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TypeData {
    #[serde(default)]
    parents: Vec<String>,
    #[serde(default)]
    attributes: Vec<AttrData>,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct AttrData {
    name: String,
    #[serde(rename = "type")]
    attr_type: AttrType,
    #[serde(default = "null_default")]
    default: Value,
    #[serde(default = "default_true")]
    readable: bool,
    #[serde(default = "default_true")]
    writable: bool,
    #[serde(default = "default_true")]
    connectable: bool,
    #[serde(default)]
    multi: bool,
}

fn default_true() -> bool {
    true
}

fn null_default() -> Value {
    Value::Null
}

impl From<AttrData> for AttrDef {
    fn from(data: AttrData) -> Self {
        Self {
            name: data.name,
            attr_type: data.attr_type,
            default: data.default,
            readable: data.readable,
            writable: data.writable,
            connectable: data.connectable,
            multi: data.multi,
        }
    }
}

impl From<&AttrDef> for AttrData {
    fn from(def: &AttrDef) -> Self {
        Self {
            name: def.name.clone(),
            attr_type: def.attr_type.clone(),
            default: def.default.clone(),
            readable: def.readable,
            writable: def.writable,
            connectable: def.connectable,
            multi: def.multi,
        }
    }
}

impl SchemaStore {
    /// Load a store from artifact JSON.
    ///
    /// Fails with [`SchemaError::Format`] on malformed or unversioned input,
    /// or when the artifact was written by a newer engine.
    pub fn load(json: &str) -> SchemaResult<SchemaStore> {
        let data: ArtifactData =
            serde_json::from_str(json).map_err(|e| SchemaError::format(e.to_string()))?;

        if data.format == 0 || data.format > ARTIFACT_FORMAT {
            return Err(SchemaError::format(format!(
                "unsupported artifact format {} (engine supports up to {})",
                data.format, ARTIFACT_FORMAT
            )));
        }
        if data.application_version.is_empty() {
            return Err(SchemaError::format("missing application version"));
        }

        let defs = data
            .types
            .into_iter()
            .map(|(name, ty)| NodeTypeDef {
                name,
                parents: ty.parents,
                attrs: ty.attributes.into_iter().map(AttrDef::from).collect(),
                is_abstract: ty.is_abstract,
            })
            .collect();

        SchemaStore::from_types(data.application_version, defs)
            .map_err(|e| SchemaError::format(e.to_string()))
    }

    /// Load a store from an artifact file on disk.
    pub fn load_path(path: impl AsRef<Path>) -> SchemaResult<SchemaStore> {
        let json = std::fs::read_to_string(path)?;
        Self::load(&json)
    }

    /// Serialize back to canonical artifact JSON: current format, types
    /// sorted by name, attributes in declaration order, trailing newline.
    /// Byte-identical for identical stores.
    pub fn to_artifact_json(&self) -> SchemaResult<String> {
        let mut types = BTreeMap::new();
        for name in self.type_names() {
            let def = self.resolve_type(name)?;
            types.insert(
                def.name.clone(),
                TypeData {
                    parents: def.parents.clone(),
                    attributes: def.attrs.iter().map(AttrData::from).collect(),
                    is_abstract: def.is_abstract,
                },
            );
        }
        let data = ArtifactData {
            format: ARTIFACT_FORMAT,
            application_version: self.version().to_string(),
            types,
        };
        let mut json =
            serde_json::to_string_pretty(&data).map_err(|e| SchemaError::format(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }
}
