//! Error types for registry access, generation, and resolution.

use thiserror::Error;
use village_id::{IdError, Kind};

/// Errors reported by an [`ItemRegistry`](crate::ItemRegistry) backend.
///
/// The in-process registry never fails; database-backed implementations
/// wrap connection and query errors here with context attached.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The storage backend failed.
    #[error("registry backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Errors from ID generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The supplied parent ID has the wrong kind for the requested
    /// operation. This is a caller bug, never retried.
    #[error("expected a {expected}-kind parent, got a {actual}-kind ID")]
    InvalidParent { expected: Kind, actual: Kind },

    /// Every retry drew an already-claimed segment value. Signals that the
    /// keyspace at this level is nearly saturated; operationally this
    /// should page, since it means the segment width itself is the limit.
    #[error("keyspace exhausted generating a {kind} segment after {attempts} attempts")]
    ExhaustedKeyspace { kind: Kind, attempts: u32 },

    /// The registry backend failed mid-generation.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl GenerateError {
    /// Returns true if this is the keyspace-exhaustion alert condition.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, GenerateError::ExhaustedKeyspace { .. })
    }
}

/// Errors from string-based resolution.
///
/// Distinguishes bad input (maps to a 400-class response) from backend
/// failure (5xx). A missing record is not an error; see
/// [`resolve_str`](crate::resolve_str).
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The input string is not a valid Village ID.
    #[error(transparent)]
    Id(#[from] IdError),

    /// The registry backend failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
