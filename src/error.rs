//! Error types for generation.

use thiserror::Error;

/// Errors that abort generation.
///
/// All of these are raised synchronously at the point of detection; no
/// artifact is produced once one occurs.
#[derive(Debug, Error)]
pub enum GenError {
    /// Two structurally different types resolve to the same output slot.
    #[error("naming collision at `{key}`: already registered as {existing}, new registration is {incoming}")]
    NamingCollision {
        key: String,
        existing: String,
        incoming: String,
    },

    /// A hub descriptor is malformed and cannot produce a proxy surface.
    #[error("hub `{hub}` cannot be generated: {reason}")]
    UnresolvableHub { hub: String, reason: String },

    /// I/O error writing generated artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
