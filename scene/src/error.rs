//! Scene graph error types.

use thiserror::Error;

/// Result type for scene graph operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors that can occur during attribute graph operations.
///
/// All failures are synchronous and leave the graph unchanged; validation
/// runs before any mutation is applied.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown node type '{name}'")]
    UnknownType { name: String },

    #[error("node type '{name}' is abstract and cannot be created")]
    AbstractType { name: String },

    #[error("invalid node name: '{name}'")]
    InvalidName { name: String },

    #[error("node not found: {node}")]
    NodeNotFound { node: String },

    #[error("no attribute '{attr}' on node '{node}'")]
    NoSuchAttribute { node: String, attr: String },

    #[error("attribute '{plug}' is not settable")]
    ReadOnlyAttribute { plug: String },

    #[error("cannot convert {actual} to {expected} for '{plug}'")]
    TypeMismatch {
        plug: String,
        expected: String,
        actual: String,
    },

    #[error("attribute '{plug}' does not accept connections")]
    NotConnectable { plug: String },

    #[error("destination attribute '{plug}' already has an incoming connection")]
    AlreadyConnected { plug: String },

    #[error("no connection from '{src}' to '{dst}'")]
    NotConnected { src: String, dst: String },

    #[error("cycle detected involving '{0}'")]
    Cycle(String),

    #[error("cannot delete '{node}': node has children")]
    HasChildren { node: String },

    #[error("attribute '{attr}' already exists on node '{node}'")]
    AttributeExists { node: String, attr: String },

    #[error("attribute '{attr}' on node '{node}' is static and cannot be deleted")]
    StaticAttribute { node: String, attr: String },
}

impl SceneError {
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self::AbstractType { name: name.into() }
    }

    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    pub fn node_not_found(node: impl Into<String>) -> Self {
        Self::NodeNotFound { node: node.into() }
    }

    pub fn no_such_attribute(node: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::NoSuchAttribute {
            node: node.into(),
            attr: attr.into(),
        }
    }

    pub fn read_only(plug: impl Into<String>) -> Self {
        Self::ReadOnlyAttribute { plug: plug.into() }
    }

    pub fn type_mismatch(
        plug: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            plug: plug.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn not_connectable(plug: impl Into<String>) -> Self {
        Self::NotConnectable { plug: plug.into() }
    }

    pub fn already_connected(plug: impl Into<String>) -> Self {
        Self::AlreadyConnected { plug: plug.into() }
    }

    pub fn not_connected(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self::NotConnected {
            src: src.into(),
            dst: dst.into(),
        }
    }

    pub fn has_children(node: impl Into<String>) -> Self {
        Self::HasChildren { node: node.into() }
    }

    pub fn attribute_exists(node: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::AttributeExists {
            node: node.into(),
            attr: attr.into(),
        }
    }

    pub fn static_attribute(node: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::StaticAttribute {
            node: node.into(),
            attr: attr.into(),
        }
    }
}
