//! Command-layer error types.
//!
//! Interpreter failures carry the host's wording where test code asserts on
//! message text; structural failures from the attribute graph are wrapped
//! with the triggering command name, never swallowed.

use mayamock_scene::SceneError;
use thiserror::Error;

/// Result type for command operations.
pub type CmdResult<T> = Result<T, CmdError>;

/// Errors surfaced by the command interpreter.
#[derive(Debug, Error)]
pub enum CmdError {
    #[error("No object matches name: {name}")]
    NoObjectMatches { name: String },

    #[error("The source attribute '{plug}' cannot be found.")]
    SourceAttrNotFound { plug: String },

    #[error("The destination attribute '{plug}' cannot be found.")]
    DestinationAttrNotFound { plug: String },

    #[error("There is no connection from '{src}' to '{dst}' to disconnect")]
    NotConnected { src: String, dst: String },

    /// Generic command failure, preceded by a script-editor warning with the
    /// actual cause.
    #[error("Maya command error")]
    CommandFailed,

    #[error("You must specify exactly one flag.")]
    MissingFlag,

    #[error("You cannot specify more than one flag.")]
    ConflictingFlags,

    #[error("New attribute needs either a long (-ln) or short (-sn) attribute name.")]
    MissingAttributeName,

    /// A structural failure from the attribute graph, with the command that
    /// triggered it.
    #[error("{command}: {source}")]
    Scene {
        command: &'static str,
        #[source]
        source: SceneError,
    },
}

impl CmdError {
    pub fn no_object_matches(name: impl Into<String>) -> Self {
        Self::NoObjectMatches { name: name.into() }
    }

    pub fn source_attr_not_found(plug: impl Into<String>) -> Self {
        Self::SourceAttrNotFound { plug: plug.into() }
    }

    pub fn destination_attr_not_found(plug: impl Into<String>) -> Self {
        Self::DestinationAttrNotFound { plug: plug.into() }
    }

    pub fn not_connected(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self::NotConnected {
            src: src.into(),
            dst: dst.into(),
        }
    }

    pub fn scene(command: &'static str, source: SceneError) -> Self {
        Self::Scene { command, source }
    }

    /// The underlying scene error, when this failure wraps one.
    pub fn scene_error(&self) -> Option<&SceneError> {
        match self {
            Self::Scene { source, .. } => Some(source),
            _ => None,
        }
    }
}
