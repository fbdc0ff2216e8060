//! Component type tags and schema-agnostic component records.
//!
//! ## Type tags
//!
//! [`DefType`] identifies a component's wire-format schema. It is derived from
//! the schema's **string name** using the FNV-1a 64-bit hash, so the same name
//! produces the same tag in every process and in every language that applies
//! the algorithm.
//!
//! ## Records
//!
//! A [`ComponentRecord`] pairs a [`DefType`] with the MessagePack payload of
//! one component. The payload is a [`ComponentData`], which either borrows from
//! the buffer of a loaded asset or owns bytes encoded in memory. Records are
//! routed by tag to the one system that knows how to decode them.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ComponentError;

/// Hash-derived tag identifying a component's wire-format schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct DefType(pub u64);

impl DefType {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute the [`DefType`] for a schema name using FNV-1a 64-bit.
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// The tag of a Rust component type, `DefType::from_name(T::type_name())`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::from_name(T::type_name())
    }
}

impl fmt::Display for DefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// A component type with a stable wire-level name.
///
/// # Examples
///
/// ```rust
/// use serde::{Serialize, Deserialize};
/// use engine_component::Component;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "HealthDef" }
/// }
/// ```
pub trait Component: Serialize + for<'de> Deserialize<'de> + 'static {
    /// The schema name this component is encoded under.
    fn type_name() -> &'static str;

    /// Returns the [`DefType`] tag for this component.
    fn def_type() -> DefType {
        DefType::from_name(Self::type_name())
    }
}

/// Encoded payload of one component.
///
/// Serialises as a MessagePack `bin` so the payload can be embedded in a
/// larger table and later borrowed straight out of that table's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentData<'a>(Cow<'a, [u8]>);

impl<'a> ComponentData<'a> {
    /// Wrap bytes borrowed from a longer-lived buffer.
    #[must_use]
    pub const fn borrowed(bytes: &'a [u8]) -> Self {
        Self(Cow::Borrowed(bytes))
    }

    /// Wrap an owned, already-encoded payload.
    #[must_use]
    pub fn owned(bytes: Vec<u8>) -> Self {
        Self(Cow::Owned(bytes))
    }

    /// Encode a component value with MessagePack.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Encode`] if serialisation fails.
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, ComponentError> {
        Ok(Self::owned(rmp_serde::to_vec_named(value)?))
    }

    /// The raw payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// A view of this payload borrowing from `self` rather than copying.
    #[must_use]
    pub fn reborrow(&self) -> ComponentData<'_> {
        ComponentData(Cow::Borrowed(&self.0))
    }

    /// Returns `true` if the bytes are borrowed from an external buffer.
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        matches!(self.0, Cow::Borrowed(_))
    }
}

impl Serialize for ComponentData<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de: 'a, 'a> Deserialize<'de> for ComponentData<'a> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DataVisitor<'a>(PhantomData<&'a ()>);

        impl<'de: 'a, 'a> Visitor<'de> for DataVisitor<'a> {
            type Value = ComponentData<'a>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("encoded component bytes")
            }

            fn visit_borrowed_bytes<E: de::Error>(self, v: &'de [u8]) -> Result<Self::Value, E> {
                Ok(ComponentData::borrowed(v))
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                Ok(ComponentData::owned(v.to_vec()))
            }

            fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
                Ok(ComponentData::owned(v))
            }

            // Formats without a native byte type encode bytes as an array.
            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element::<u8>()? {
                    bytes.push(byte);
                }
                Ok(ComponentData::owned(bytes))
            }
        }

        deserializer.deserialize_bytes(DataVisitor(PhantomData))
    }
}

/// One component's data in schema-agnostic form: a type tag plus its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRecord<'a> {
    def_type: DefType,
    data: ComponentData<'a>,
}

impl<'a> ComponentRecord<'a> {
    /// Pair a tag with a payload.
    #[must_use]
    pub fn new(def_type: DefType, data: ComponentData<'a>) -> Self {
        Self { def_type, data }
    }

    /// Encode a Rust component into an owned record.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Encode`] if serialisation fails.
    pub fn from_component<T: Component>(value: &T) -> Result<ComponentRecord<'static>, ComponentError> {
        Ok(ComponentRecord::new(T::def_type(), ComponentData::encode(value)?))
    }

    /// The schema tag of this record.
    #[must_use]
    pub fn def_type(&self) -> DefType {
        self.def_type
    }

    /// The encoded payload.
    #[must_use]
    pub fn data(&self) -> &ComponentData<'a> {
        &self.data
    }

    /// Decode the payload as component `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Unsupported`] if the record is tagged with a
    /// different type, or [`ComponentError::Decode`] if the bytes are not a
    /// valid `T`.
    pub fn decode<T: Component>(&self) -> Result<T, ComponentError> {
        if self.def_type != T::def_type() {
            return Err(ComponentError::Unsupported(self.def_type));
        }
        Ok(rmp_serde::from_slice(self.data.as_bytes())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Health {
        current: f32,
        max: f32,
    }

    impl Component for Health {
        fn type_name() -> &'static str {
            "HealthDef"
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Name(String);

    impl Component for Name {
        fn type_name() -> &'static str {
            "NameDef"
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapper<'a> {
        index: u32,
        #[serde(borrow)]
        def: ComponentData<'a>,
    }

    #[test]
    fn test_def_type_matches_from_name() {
        assert_eq!(Health::def_type(), DefType::from_name("HealthDef"));
        assert_eq!(DefType::of::<Health>(), Health::def_type());
    }

    #[test]
    fn test_def_types_differ_between_names() {
        assert_ne!(Health::def_type(), Name::def_type());
    }

    #[test]
    fn test_fnv1a_known_vector() {
        assert_eq!(DefType::from_name(""), DefType(0xcbf2_9ce4_8422_2325));
        // FNV-1a 64 of "a".
        assert_eq!(DefType::from_name("a"), DefType(0xaf63_dc4c_8601_ec8c));
    }

    #[test]
    fn test_record_decodes_its_component() {
        let health = Health {
            current: 80.0,
            max: 100.0,
        };
        let record = ComponentRecord::from_component(&health).unwrap();
        assert_eq!(record.def_type(), Health::def_type());
        assert_eq!(record.decode::<Health>().unwrap(), health);
    }

    #[test]
    fn test_record_rejects_other_type() {
        let record = ComponentRecord::from_component(&Name("crate".into())).unwrap();
        assert!(matches!(
            record.decode::<Health>(),
            Err(ComponentError::Unsupported(t)) if t == Name::def_type()
        ));
    }

    #[test]
    fn test_data_borrows_from_enclosing_buffer() {
        let payload = ComponentData::encode(&Name("borrowed".into())).unwrap();
        let wrapper = Wrapper {
            index: 3,
            def: payload.reborrow(),
        };
        let buffer = rmp_serde::to_vec_named(&wrapper).unwrap();

        let decoded: Wrapper<'_> = rmp_serde::from_slice(&buffer).unwrap();
        assert_eq!(decoded.index, 3);
        assert!(decoded.def.is_borrowed());
        assert_eq!(decoded.def.as_bytes(), payload.as_bytes());
    }
}
