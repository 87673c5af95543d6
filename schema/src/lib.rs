//! Schema subsystem: the immutable catalog of node type definitions.
//!
//! A [`SchemaStore`] is loaded once per mock session from a versioned
//! artifact captured inside the real application (see the `schemagen`
//! crate), or built programmatically with [`SchemaBuilder`]. It is read-only
//! afterwards: node creation consults it for attribute definitions and
//! defaults, and the flattened per-type attribute sets are precomputed at
//! load time so instantiation never walks the inheritance graph.

mod artifact;
mod builder;
mod catalog;
mod error;
mod store;
mod types;

pub use artifact::ARTIFACT_FORMAT;
pub use builder::{SchemaBuilder, TypeBuilder};
pub use error::{BuildError, SchemaError, SchemaResult};
pub use store::SchemaStore;
pub use types::{AttrDef, NodeTypeDef};
