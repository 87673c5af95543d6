//! SchemaBuilder for constructing an immutable SchemaStore.

use crate::error::BuildError;
use crate::store::SchemaStore;
use crate::types::{AttrDef, NodeTypeDef};

/// Builder for programmatic catalog construction (tests, embedded catalogs).
///
/// Parent types must be registered before the types that extend them, so a
/// finished builder can never hold an inheritance cycle.
#[derive(Debug)]
pub struct SchemaBuilder {
    version: String,
    types: Vec<NodeTypeDef>,
}

impl SchemaBuilder {
    /// Create a builder for the given application version tag.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            types: Vec::new(),
        }
    }

    /// Start a type definition.
    pub fn node_type(&mut self, name: impl Into<String>) -> TypeBuilder<'_> {
        TypeBuilder {
            builder: self,
            def: NodeTypeDef::new(name),
        }
    }

    /// Build the immutable SchemaStore.
    pub fn build(self) -> Result<SchemaStore, BuildError> {
        SchemaStore::from_types(self.version, self.types)
    }
}

/// Builder for a single type definition.
pub struct TypeBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    def: NodeTypeDef,
}

impl<'a> TypeBuilder<'a> {
    /// Add a parent type by name.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.def.parents.push(parent.into());
        self
    }

    /// Add an attribute definition.
    pub fn attr(mut self, attr: AttrDef) -> Self {
        self.def.attrs.push(attr);
        self
    }

    /// Mark as abstract (cannot be instantiated directly).
    pub fn abstract_type(mut self) -> Self {
        self.def.is_abstract = true;
        self
    }

    /// Finish building this type.
    pub fn done(self) -> Result<(), BuildError> {
        if self.builder.types.iter().any(|t| t.name == self.def.name) {
            return Err(BuildError::DuplicateTypeName(self.def.name));
        }
        for parent in &self.def.parents {
            if !self.builder.types.iter().any(|t| &t.name == parent) {
                return Err(BuildError::unknown_parent(&self.def.name, parent));
            }
        }
        self.builder.types.push(self.def);
        Ok(())
    }
}
