//! Domain validation errors

use thiserror::Error;

/// Errors raised when constructing domain values from untrusted input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A Claim move was built without a claim payload
    #[error("Claim move requires a claim payload")]
    MissingClaim,

    /// A Challenge or Accept move carried a claim payload
    #[error("{0} move must not carry a claim payload")]
    UnexpectedClaim(String),

    /// Unrecognized game phase name
    #[error("Unknown game phase: {0}")]
    UnknownPhase(String),

    /// Unrecognized move action name
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Unrecognized player type tag
    #[error("Unknown player type: {0}")]
    UnknownPlayerType(String),
}
