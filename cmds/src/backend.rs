//! Mock-vs-live backend selection.

use std::env;

/// Which engine the external test runner should execute against.
///
/// The core never consults this itself; it exists for harnesses that run the
/// same suite against the mock and against a live application process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// The in-process mock engine (default).
    #[default]
    Mock,
    /// A live application process.
    Live,
}

impl Backend {
    /// Environment variable consulted by [`Backend::from_env`].
    pub const ENV_VAR: &'static str = "MAYAMOCK_BACKEND";

    /// Read the backend toggle from the environment. Anything other than
    /// `live` selects the mock.
    pub fn from_env() -> Backend {
        match env::var(Self::ENV_VAR).ok().as_deref() {
            Some(value) if value.eq_ignore_ascii_case("live") => Backend::Live,
            _ => Backend::Mock,
        }
    }
}
