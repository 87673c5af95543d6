//! The attribute graph: live nodes, typed plugs, connections, hierarchy.
//!
//! A [`SceneGraph`] owns all node, plug, and connection state for one
//! session. Nodes are instantiated against a read-only
//! [`mayamock_schema::SchemaStore`]; plugs start at their declared defaults;
//! connections drive destination values by eager push propagation. External
//! code refers to entities by [`mayamock_core::NodeId`] or by name; both are
//! non-owning lookups that fail explicitly after deletion.

mod connection;
mod error;
mod graph;
pub mod naming;
mod node;

pub use connection::{Connection, PlugAddr};
pub use error::{SceneError, SceneResult};
pub use graph::SceneGraph;
pub use node::{Node, Plug};
