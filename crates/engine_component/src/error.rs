//! Component-level error types.

use crate::component::DefType;

/// Errors raised while materialising or encoding a single component.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// The payload could not be encoded to MessagePack.
    #[error("failed to encode component payload: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// The payload could not be decoded as the expected component type.
    #[error("failed to decode component payload: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// A system received a record whose type it does not handle.
    #[error("unsupported component type {0}")]
    Unsupported(DefType),

    /// A system rejected the component data.
    #[error("invalid component data: {0}")]
    Invalid(String),
}
