//! Error types for ID parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or constructing a Village ID.
///
/// The variants fall into two classes: *malformed* input (the string does
/// not have the fixed dashed-hex shape) and *invalid* input (the shape is
/// right but the bit pattern is impossible by construction). API layers
/// typically map both to a 400-class response but want distinct error
/// codes; use [`IdError::is_malformed`] to tell them apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The ID string is empty.
    #[error("ID cannot be empty")]
    Empty,

    /// The ID string is not exactly 18 characters.
    #[error("village ID must be 18 characters, got {actual}")]
    InvalidLength { actual: usize },

    /// A dash is missing from one of the two fixed positions.
    #[error("village ID must have '-' at position {position}")]
    MissingDash { position: usize },

    /// A segment contains a non-hexadecimal character.
    #[error("invalid hex digit in {segment} segment")]
    InvalidHex { segment: &'static str },

    /// The tenant segment is zero. Every ID belongs to some tenant, so no
    /// valid Village ID has a zero tenant segment.
    #[error("tenant segment is zero; every village ID belongs to a tenant")]
    ZeroTenant,

    /// The item segment is non-zero but the organization segment is zero.
    /// Items only exist under an organization.
    #[error("item segment set without an organization segment")]
    OrphanItem,
}

impl IdError {
    /// Returns true if the input did not have the dashed-hex shape at all.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            IdError::Empty
                | IdError::InvalidLength { .. }
                | IdError::MissingDash { .. }
                | IdError::InvalidHex { .. }
        )
    }

    /// Returns true if the input had the right shape but encodes an
    /// impossible ID.
    pub fn is_invalid(&self) -> bool {
        !self.is_malformed()
    }
}
