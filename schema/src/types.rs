//! Definition types for the node type catalog.

use mayamock_core::{AttrType, Value};

/// Definition of a single attribute within a node type.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrDef {
    /// Attribute name, unique within a resolved type's full attribute set.
    pub name: String,
    /// Declared semantic type.
    pub attr_type: AttrType,
    /// Default value applied to the plug at node creation.
    pub default: Value,
    /// Whether the attribute can act as a connection source and be read.
    pub readable: bool,
    /// Whether the attribute accepts direct sets and incoming connections.
    pub writable: bool,
    /// Whether the attribute participates in connections at all.
    pub connectable: bool,
    /// Whether the attribute is an indexed multi (array of elements, each an
    /// independently connectable destination).
    pub multi: bool,
}

impl AttrDef {
    /// Create a definition with the type's zero default and permissive flags.
    pub fn new(name: impl Into<String>, attr_type: AttrType) -> Self {
        let default = attr_type.zero_value();
        Self {
            name: name.into(),
            attr_type,
            default,
            readable: true,
            writable: true,
            connectable: true,
            multi: false,
        }
    }

    /// Set an explicit default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    /// Mark as read-only (computed outputs; direct sets are rejected).
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Exclude from connections.
    pub fn non_connectable(mut self) -> Self {
        self.connectable = false;
        self
    }

    /// Mark as an indexed multi attribute.
    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }
}

/// A node type definition: name, parent types, and its own attributes.
///
/// Immutable once the owning store is built. The full attribute set of a
/// type (own plus inherited) is resolved by the store, not stored here.
#[derive(Debug, Clone)]
pub struct NodeTypeDef {
    /// Type name.
    pub name: String,
    /// Parent type names, in declaration order (multiple inheritance).
    pub parents: Vec<String>,
    /// Own attribute definitions, in declaration order.
    pub attrs: Vec<AttrDef>,
    /// Whether this type can be instantiated directly.
    pub is_abstract: bool,
}

impl NodeTypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
            attrs: Vec::new(),
            is_abstract: false,
        }
    }

    /// Get an own (non-inherited) attribute definition by name.
    pub fn own_attr(&self, name: &str) -> Option<&AttrDef> {
        self.attrs.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_def_defaults_to_zero_value() {
        let def = AttrDef::new("translateX", AttrType::Float);
        assert_eq!(def.default, Value::Float(0.0));
        assert!(def.readable && def.writable && def.connectable);
        assert!(!def.multi);
    }

    #[test]
    fn test_attr_def_flag_chaining() {
        let def = AttrDef::new("output", AttrType::Float).read_only().multi();
        assert!(!def.writable);
        assert!(def.multi);
        assert!(def.readable);
    }
}
