//! The SchemaStore - immutable node type catalog with precomputed resolution.

use crate::error::{BuildError, SchemaError, SchemaResult};
use crate::types::{AttrDef, NodeTypeDef};
use std::collections::{HashMap, HashSet};

/// Immutable catalog of node type definitions for one emulated application
/// release.
///
/// Attribute resolution across the inheritance graph is computed once at
/// construction: for every type, the flattened attribute list is a
/// parent-first depth-first walk in which a redefinition in a more-derived
/// type replaces the inherited definition in place, keeping the inherited
/// position in the order.
#[derive(Debug)]
pub struct SchemaStore {
    /// Version tag of the captured application release.
    version: String,
    /// Type definitions by name.
    types: HashMap<String, NodeTypeDef>,
    /// Precomputed flattened attribute sets by type name.
    resolved: HashMap<String, Vec<AttrDef>>,
}

impl SchemaStore {
    /// Validating constructor over raw definitions, used by the builder, the
    /// artifact loader, and the schema generator. Definition order does not
    /// matter; parents are resolved by name across the whole set.
    pub fn from_types(
        version: impl Into<String>,
        defs: Vec<NodeTypeDef>,
    ) -> Result<Self, BuildError> {
        let version = version.into();
        if version.is_empty() {
            return Err(BuildError::EmptyVersion);
        }

        let mut types: HashMap<String, NodeTypeDef> = HashMap::new();
        for mut def in defs {
            if types.contains_key(&def.name) {
                return Err(BuildError::DuplicateTypeName(def.name));
            }
            normalize_defaults(&mut def)?;
            types.insert(def.name.clone(), def);
        }

        for def in types.values() {
            let mut seen = HashSet::new();
            for attr in &def.attrs {
                if !seen.insert(attr.name.as_str()) {
                    return Err(BuildError::duplicate_attribute(&def.name, &attr.name));
                }
            }
            for parent in &def.parents {
                if !types.contains_key(parent) {
                    return Err(BuildError::unknown_parent(&def.name, parent));
                }
            }
        }

        check_inheritance_cycles(&types)?;

        let mut resolved = HashMap::new();
        for name in types.keys() {
            let mut attrs = Vec::new();
            let mut visited = HashSet::new();
            flatten_into(&types, name, &mut attrs, &mut visited);
            resolved.insert(name.clone(), attrs);
        }

        Ok(Self {
            version,
            types,
            resolved,
        })
    }

    /// Version tag of the captured application release.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get a type definition by name.
    pub fn resolve_type(&self, name: &str) -> SchemaResult<&NodeTypeDef> {
        self.types
            .get(name)
            .ok_or_else(|| SchemaError::unknown_type(name))
    }

    /// Flattened attribute set for a type (own plus inherited, overrides
    /// applied). Precomputed; this is a map lookup.
    pub fn resolved_attrs(&self, name: &str) -> SchemaResult<&[AttrDef]> {
        self.resolved
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| SchemaError::unknown_type(name))
    }

    /// Look up one attribute in a type's resolved set.
    pub fn resolved_attr(&self, type_name: &str, attr: &str) -> SchemaResult<Option<&AttrDef>> {
        Ok(self
            .resolved_attrs(type_name)?
            .iter()
            .find(|a| a.name == attr))
    }

    /// Check if a type name resolves.
    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// All type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of types in the catalog.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

/// Replace Null defaults by the type's zero value and verify explicit
/// defaults conform to the declared type.
fn normalize_defaults(def: &mut NodeTypeDef) -> Result<(), BuildError> {
    for attr in &mut def.attrs {
        if attr.default.is_null() {
            attr.default = attr.attr_type.zero_value();
            continue;
        }
        match attr.attr_type.coerce(attr.default.clone()) {
            Ok(value) => attr.default = value,
            Err(e) => {
                return Err(BuildError::InvalidDefault {
                    type_name: def.name.clone(),
                    attr: attr.name.clone(),
                    message: e.to_string(),
                })
            }
        }
    }
    Ok(())
}

/// Depth-first cycle check over the parent graph.
fn check_inheritance_cycles(types: &HashMap<String, NodeTypeDef>) -> Result<(), BuildError> {
    // 0 = unvisited, 1 = in progress, 2 = done
    let mut state: HashMap<&str, u8> = HashMap::new();

    fn visit<'a>(
        types: &'a HashMap<String, NodeTypeDef>,
        state: &mut HashMap<&'a str, u8>,
        name: &'a str,
    ) -> Result<(), BuildError> {
        match state.get(name) {
            Some(1) => return Err(BuildError::InheritanceCycle(name.to_string())),
            Some(2) => return Ok(()),
            _ => {}
        }
        state.insert(name, 1);
        if let Some(def) = types.get(name) {
            for parent in &def.parents {
                visit(types, state, parent)?;
            }
        }
        state.insert(name, 2);
        Ok(())
    }

    for name in types.keys() {
        visit(types, &mut state, name)?;
    }
    Ok(())
}

/// Parent-first flattening with the override rule: a redefinition replaces
/// the inherited entry in place.
fn flatten_into<'a>(
    types: &'a HashMap<String, NodeTypeDef>,
    name: &'a str,
    out: &mut Vec<AttrDef>,
    visited: &mut HashSet<&'a str>,
) {
    if !visited.insert(name) {
        return;
    }
    let Some(def) = types.get(name) else {
        return;
    };
    for parent in &def.parents {
        flatten_into(types, parent, out, visited);
    }
    for attr in &def.attrs {
        if let Some(existing) = out.iter_mut().find(|a| a.name == attr.name) {
            *existing = attr.clone();
        } else {
            out.push(attr.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::SchemaBuilder;
    use mayamock_core::{AttrType, Value};

    use super::*;

    fn diamond_store() -> SchemaStore {
        let mut builder = SchemaBuilder::new("2020");
        builder
            .node_type("base")
            .attr(AttrDef::new("caching", AttrType::Bool))
            .attr(AttrDef::new("weight", AttrType::Float).with_default(1.0))
            .abstract_type()
            .done()
            .unwrap();
        builder
            .node_type("left")
            .extends("base")
            .attr(AttrDef::new("leftOnly", AttrType::Int))
            .done()
            .unwrap();
        builder
            .node_type("right")
            .extends("base")
            .attr(AttrDef::new("weight", AttrType::Float).with_default(2.0))
            .done()
            .unwrap();
        builder
            .node_type("leaf")
            .extends("left")
            .extends("right")
            .attr(AttrDef::new("leafOnly", AttrType::String))
            .done()
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_resolve_type_unknown_fails() {
        let store = diamond_store();
        let err = store.resolve_type("bogus").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { .. }));
    }

    #[test]
    fn test_flattening_keeps_inherited_position() {
        let store = diamond_store();
        let names: Vec<&str> = store
            .resolved_attrs("leaf")
            .unwrap()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["caching", "weight", "leftOnly", "leafOnly"]);
    }

    #[test]
    fn test_override_keeps_most_derived_default() {
        let store = diamond_store();
        // `right` redefines weight; the diamond resolves through it.
        let weight = store.resolved_attr("leaf", "weight").unwrap().unwrap();
        assert_eq!(weight.default, Value::Float(2.0));
        // `left` does not redefine it.
        let weight = store.resolved_attr("left", "weight").unwrap().unwrap();
        assert_eq!(weight.default, Value::Float(1.0));
    }

    #[test]
    fn test_diamond_base_not_duplicated() {
        let store = diamond_store();
        let count = store
            .resolved_attrs("leaf")
            .unwrap()
            .iter()
            .filter(|a| a.name == "caching")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_invalid_default_rejected() {
        let err = SchemaStore::from_types(
            "2020",
            vec![{
                let mut def = NodeTypeDef::new("broken");
                def.attrs
                    .push(AttrDef::new("count", AttrType::Int).with_default("three"));
                def
            }],
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::InvalidDefault { .. }));
    }

    #[test]
    fn test_inheritance_cycle_rejected() {
        let mut a = NodeTypeDef::new("a");
        a.parents.push("b".to_string());
        let mut b = NodeTypeDef::new("b");
        b.parents.push("a".to_string());
        let err = SchemaStore::from_types("2020", vec![a, b]).unwrap_err();
        assert!(matches!(err, BuildError::InheritanceCycle(_)));
    }

    #[test]
    fn test_empty_version_rejected() {
        let err = SchemaStore::from_types("", vec![]).unwrap_err();
        assert!(matches!(err, BuildError::EmptyVersion));
    }
}
