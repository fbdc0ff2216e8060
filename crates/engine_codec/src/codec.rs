//! MessagePack codec helpers.
//!
//! Thin wrappers around `rmp-serde`. Entity definitions are written as
//! MessagePack maps so schemas can add optional fields (such as `children`)
//! without breaking older assets.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Encode a value to MessagePack bytes, keyed by field name.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialisation fails.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    rmp_serde::to_vec_named(value).map_err(CodecError::Encode)
}

/// Decode a value from MessagePack bytes, borrowing from `bytes` where the
/// target type allows it.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if deserialisation fails.
pub fn decode<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, CodecError> {
    rmp_serde::from_slice(bytes).map_err(CodecError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct TestDef {
        value: u32,
        name: String,
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let def = TestDef {
            value: 42,
            name: "hello".to_string(),
        };
        let bytes = encode(&def).unwrap();
        let restored: TestDef = decode(&bytes).unwrap();
        assert_eq!(def, restored);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let result: Result<TestDef, _> = decode(&[0xFF, 0xFF]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_borrows_str() {
        let bytes = encode(&"borrowed").unwrap();
        let value: &str = decode(&bytes).unwrap();
        assert_eq!(value, "borrowed");
    }
}
