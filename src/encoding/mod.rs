//! BACnet Encoding/Decoding Module
//!
//! This module implements the BACnet tag-length-value encoding (ASHRAE 135
//! clause 20.2) on top of the bit cursors in [`crate::io`].
//!
//! # Overview
//!
//! - [`header`]: the universal tag header with its extension ladder
//! - [`payload`]: primitive payloads (integers, strings, bit strings, dates, ...)
//! - [`application`]: self-describing application-tagged values
//! - [`context`]: context-tagged values whose type comes from the schema
//! - [`constructed`]: opening/closing tags, the closing-tag predicate, array
//!   and optional field helpers, and schema-less constructed values
//! - [`tagged`]: enumerated and bit-string values that may appear with either
//!   tag class
//!
//! Every encodable value implements [`Serializable`], which pairs the write
//! path with an exact length computation.
//!
//! # Example
//!
//! ```
//! use bacnet_codec::encoding::{ApplicationValue, PrimitiveValue, Serializable};
//! use bacnet_codec::io::ReadBuffer;
//!
//! let mut buffer = ReadBuffer::new(&[0x21, 0x05]);
//! let value = ApplicationValue::parse(&mut buffer).unwrap();
//! assert_eq!(value.value().as_unsigned(), Some(5));
//!
//! assert_eq!(ApplicationValue::unsigned(5).to_bytes().unwrap(), vec![0x21, 0x05]);
//! ```

pub mod application;
pub mod constructed;
pub mod context;
pub mod header;
pub mod payload;
pub mod tagged;
mod value;

pub use application::ApplicationValue;
pub use constructed::{
    is_closing_tag, read_count_array, read_optional, read_terminated_array, ClosingTag,
    ConstructedElement, ConstructedValue, Enclosed, OpeningTag,
};
pub use context::ContextValue;
pub use header::{TagClass, TagHeader};
pub use payload::{
    BitStringPayload, CharacterEncoding, CharacterStringPayload, DatePayload, EnumeratedPayload,
    SignedIntegerPayload, TimePayload, UnsignedIntegerPayload,
};
pub use tagged::{EnumeratedTagged, FlagsTagged, WireFlags};
pub use value::{DataType, PrimitiveValue};

use crate::error::{ParseError, SerializationError, SerializeResult};
use crate::io::WriteBuffer;


/// BACnet application tag numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ApplicationTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectIdentifier = 12,
}

impl TryFrom<u8> for ApplicationTag {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ApplicationTag::Null),
            1 => Ok(ApplicationTag::Boolean),
            2 => Ok(ApplicationTag::UnsignedInt),
            3 => Ok(ApplicationTag::SignedInt),
            4 => Ok(ApplicationTag::Real),
            5 => Ok(ApplicationTag::Double),
            6 => Ok(ApplicationTag::OctetString),
            7 => Ok(ApplicationTag::CharacterString),
            8 => Ok(ApplicationTag::BitString),
            9 => Ok(ApplicationTag::Enumerated),
            10 => Ok(ApplicationTag::Date),
            11 => Ok(ApplicationTag::Time),
            12 => Ok(ApplicationTag::ObjectIdentifier),
            _ => Err(ParseError::unsupported("ApplicationTag", value)),
        }
    }
}

/// Position of an element inside the sequence being measured
///
/// Some BACnet structures encode the last element of a list differently, so
/// the length of an element may depend on where it sits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthContext {
    pub is_last_item: bool,
}

impl LengthContext {
    pub fn last(is_last_item: bool) -> Self {
        Self { is_last_item }
    }
}

/// A value with a wire representation and an exact length
pub trait Serializable {
    /// Write the wire form of `self` into `buffer`
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()>;

    /// Exact number of bits [`serialize`](Self::serialize) writes
    fn length_in_bits(&self) -> u32;

    /// Length of `self` as an element of a sequence
    fn length_in_bits_with(&self, _context: LengthContext) -> u32 {
        self.length_in_bits()
    }

    fn length_in_bytes(&self) -> u32 {
        self.length_in_bits().div_ceil(8)
    }

    /// Serialize into a fresh buffer and check the result against the computed length
    fn to_bytes(&self) -> SerializeResult<Vec<u8>> {
        let mut buffer = WriteBuffer::with_capacity(self.length_in_bytes() as usize);
        self.serialize(&mut buffer)?;
        let written = buffer.as_bytes().len() as u32;
        let expected = self.length_in_bytes();
        if written != expected {
            return Err(SerializationError::invariant(format!(
                "wrote {} bytes but computed a length of {}",
                written, expected
            )));
        }
        Ok(buffer.into_vec())
    }
}

impl<T: Serializable> Serializable for Option<T> {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        match self {
            Some(value) => value.serialize(buffer),
            None => Ok(()),
        }
    }

    fn length_in_bits(&self) -> u32 {
        self.as_ref().map_or(0, Serializable::length_in_bits)
    }

    fn length_in_bits_with(&self, context: LengthContext) -> u32 {
        self.as_ref().map_or(0, |value| value.length_in_bits_with(context))
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        for item in self {
            item.serialize(buffer)?;
        }
        Ok(())
    }

    fn length_in_bits(&self) -> u32 {
        let count = self.len();
        self.iter()
            .enumerate()
            .map(|(i, item)| item.length_in_bits_with(LengthContext::last(i + 1 == count)))
            .sum()
    }
}

impl<T: Serializable + ?Sized> Serializable for Box<T> {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        (**self).serialize(buffer)
    }

    fn length_in_bits(&self) -> u32 {
        (**self).length_in_bits()
    }

    fn length_in_bits_with(&self, context: LengthContext) -> u32 {
        (**self).length_in_bits_with(context)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::io::ReadBuffer;
    use proptest::prelude::*;

    fn tag_class() -> impl Strategy<Value = TagClass> {
        prop_oneof![Just(TagClass::Application), Just(TagClass::ContextSpecific)]
    }

    proptest! {
        #[test]
        fn header_parse_is_inverse_of_serialize(
            class in tag_class(),
            number in 0u8..=254,
            length in any::<u32>(),
        ) {
            let header = TagHeader::balanced(class, number, length);
            let bytes = header.to_bytes().unwrap();
            prop_assert_eq!(bytes.len() as u32, header.length_in_bytes());

            let mut buffer = ReadBuffer::new(&bytes);
            let parsed = TagHeader::parse(&mut buffer).unwrap();
            prop_assert_eq!(parsed, header);
            prop_assert_eq!(parsed.actual_tag_number(), number);
            prop_assert_eq!(parsed.actual_length(), length);
        }

        #[test]
        fn unsigned_values_use_minimal_width(value in any::<u64>()) {
            let encoded = ApplicationValue::unsigned(value);
            let bytes = encoded.to_bytes().unwrap();
            let mut buffer = ReadBuffer::new(&bytes);
            let parsed = ApplicationValue::parse(&mut buffer).unwrap();
            prop_assert_eq!(parsed.value().as_unsigned(), Some(value));

            let significant = (64 - value.leading_zeros()).div_ceil(8).max(1);
            prop_assert_eq!(parsed.header().actual_length(), significant);
        }

        #[test]
        fn signed_values_survive(value in any::<i64>()) {
            let bytes = ApplicationValue::signed(value).to_bytes().unwrap();
            let mut buffer = ReadBuffer::new(&bytes);
            let parsed = ApplicationValue::parse(&mut buffer).unwrap();
            prop_assert_eq!(parsed.value().as_signed(), Some(value));
        }
    }
}
