//! Schema error types.

use thiserror::Error;

/// Errors surfaced by the schema store and loader.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The artifact could not be read or is structurally invalid.
    #[error("invalid schema artifact: {message}")]
    Format { message: String },

    /// The artifact file could not be read.
    #[error("cannot read schema artifact: {0}")]
    Io(#[from] std::io::Error),

    /// A type name does not resolve in the store.
    #[error("unknown node type '{name}'")]
    UnknownType { name: String },
}

impl SchemaError {
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while constructing a [`crate::SchemaStore`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("duplicate attribute '{attr}' on type {type_name}")]
    DuplicateAttribute { type_name: String, attr: String },

    #[error("unknown parent type '{parent}' for type {type_name}")]
    UnknownParentType { type_name: String, parent: String },

    #[error("inheritance cycle detected involving type: {0}")]
    InheritanceCycle(String),

    #[error("default for attribute '{attr}' on type {type_name} does not match its type: {message}")]
    InvalidDefault {
        type_name: String,
        attr: String,
        message: String,
    },

    #[error("schema version tag is empty")]
    EmptyVersion,
}

impl BuildError {
    pub fn duplicate_attribute(type_name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::DuplicateAttribute {
            type_name: type_name.into(),
            attr: attr.into(),
        }
    }

    pub fn unknown_parent(type_name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::UnknownParentType {
            type_name: type_name.into(),
            parent: parent.into(),
        }
    }
}
