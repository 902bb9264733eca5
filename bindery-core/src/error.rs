//! Error types.
//!
//! The binding core itself has no failure modes: absent values and empty
//! displays are ordinary outcomes. Errors only appear where a caller asks
//! for something to be present.

use thiserror::Error;

/// Failure to resolve or claim a weak handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandleError {
    /// Nothing has claimed the handle yet.
    #[error("handle has not been claimed")]
    Unclaimed,

    /// The handle's target has been torn down.
    #[error("handle target has been released")]
    Released,

    /// The handle is already bound to a different live target.
    #[error("handle is already claimed by a live target")]
    AlreadyClaimed,
}
