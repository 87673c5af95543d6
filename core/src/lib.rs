//! Core types for the mayamock engine.
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Identity types (NodeId)
//! - Value types (the Value enum with all scalar and container types)
//! - Semantic attribute types (AttrType) and the host's coercion rules

mod id;
mod value;

pub use id::*;
pub use value::*;
