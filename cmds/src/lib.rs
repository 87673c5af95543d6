//! The procedural command surface over one mock session.
//!
//! [`Session`] is the explicit stand-in for the host's global scene: it owns
//! one attribute graph and the current selection, and borrows the loaded
//! schema store for its lifetime. [`Cmds`] is the stateless command
//! interpreter over it, exposing one entry point per emulated command with
//! the host's argument, return, and error shapes.

mod backend;
mod cmds;
mod error;
mod path;
mod session;

pub use backend::Backend;
pub use cmds::{Cmds, ConnectionQuery};
pub use error::{CmdError, CmdResult};
pub use session::Session;
