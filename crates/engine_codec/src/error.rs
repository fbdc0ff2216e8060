//! Codec error types.

use engine_component::DefType;

/// Errors that can occur while loading or finalizing binary entity definitions.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Failed to encode an entity definition to MessagePack.
    #[error("failed to encode entity definition: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode an entity definition from MessagePack.
    #[error("failed to decode entity definition: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// A component type has no entry in the type list, so it has no wire index.
    #[error("component type {0} is not in the type list")]
    UnregisteredDefType(DefType),
}
