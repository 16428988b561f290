//! Error types for match loading and the engine.

use thiserror::Error;

use lattice::{ConfigError, SourcePosition};

use crate::engine::{MatchId, MatchState};

/// A non-fatal diagnostic produced while a module loaded a match.
///
/// The declaration it points at was skipped; the rest of the match loaded.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[{module}] {error}")]
pub struct ModuleError {
    /// Name of the module that rejected the declaration
    pub module: &'static str,
    /// What was wrong with it
    #[source]
    pub error: ConfigError,
}

impl ModuleError {
    /// Tag a configuration error with the module that found it.
    #[must_use]
    pub fn new(module: &'static str, error: ConfigError) -> Self {
        Self { module, error }
    }

    /// Source position of the skipped declaration, when known.
    #[must_use]
    pub fn position(&self) -> Option<SourcePosition> {
        self.error.position()
    }
}

/// Errors returned by [`Engine`](crate::Engine) operations on a match.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No match with this id is loaded.
    #[error("match {0} is not loaded")]
    UnknownMatch(MatchId),

    /// The requested state change is not allowed from the current state.
    #[error("match {id} cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        /// Match id
        id: MatchId,
        /// Current state
        from: MatchState,
        /// Requested state
        to: MatchState,
    },
}
