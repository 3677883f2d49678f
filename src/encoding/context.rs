//! Context-tagged values.
//!
//! A context tag only carries a tag number; the caller names the payload type
//! it expects there.

use super::header::{TagClass, TagHeader, CLOSING_TAG, OPENING_TAG};
use super::payload::{
    BitStringPayload, CharacterStringPayload, DatePayload, EnumeratedPayload,
    SignedIntegerPayload, TimePayload, UnsignedIntegerPayload,
};
use super::value::{DataType, PrimitiveValue};
use super::Serializable;
use crate::error::{ParseError, ParseResult, SerializationError, SerializeResult};
use crate::io::{ReadBuffer, WriteBuffer};
use crate::object::ObjectIdentifier;
use std::fmt;


/// A context tag header together with its payload
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextValue {
    header: TagHeader,
    value: PrimitiveValue,
}

impl ContextValue {
    /// Wrap `value` under a minimal context header
    pub fn new(tag_number: u8, value: PrimitiveValue) -> Self {
        let header = TagHeader::balanced(
            TagClass::ContextSpecific,
            tag_number,
            value.header_value(TagClass::ContextSpecific),
        );
        Self { header, value }
    }

    pub fn null(tag_number: u8) -> Self {
        Self::new(tag_number, PrimitiveValue::Null)
    }

    pub fn boolean(tag_number: u8, value: bool) -> Self {
        Self::new(tag_number, PrimitiveValue::Boolean(value))
    }

    pub fn unsigned(tag_number: u8, value: u64) -> Self {
        Self::new(
            tag_number,
            PrimitiveValue::UnsignedInteger(UnsignedIntegerPayload::new(value)),
        )
    }

    pub fn signed(tag_number: u8, value: i64) -> Self {
        Self::new(
            tag_number,
            PrimitiveValue::SignedInteger(SignedIntegerPayload::new(value)),
        )
    }

    pub fn real(tag_number: u8, value: f32) -> Self {
        Self::new(tag_number, PrimitiveValue::Real(value))
    }

    pub fn double(tag_number: u8, value: f64) -> Self {
        Self::new(tag_number, PrimitiveValue::Double(value))
    }

    pub fn octet_string(tag_number: u8, octets: Vec<u8>) -> Self {
        Self::new(tag_number, PrimitiveValue::OctetString(octets))
    }

    /// UTF-8 character string
    pub fn character_string(tag_number: u8, value: &str) -> Self {
        Self::new(
            tag_number,
            PrimitiveValue::CharacterString(CharacterStringPayload::utf8(value)),
        )
    }

    pub fn bit_string(tag_number: u8, bits: &[bool]) -> Self {
        Self::new(tag_number, PrimitiveValue::BitString(BitStringPayload::new(bits)))
    }

    pub fn enumerated(tag_number: u8, value: u32) -> Self {
        Self::new(tag_number, PrimitiveValue::Enumerated(EnumeratedPayload::new(value)))
    }

    pub fn date(tag_number: u8, date: DatePayload) -> Self {
        Self::new(tag_number, PrimitiveValue::Date(date))
    }

    pub fn time(tag_number: u8, time: TimePayload) -> Self {
        Self::new(tag_number, PrimitiveValue::Time(time))
    }

    pub fn object_identifier(tag_number: u8, identifier: ObjectIdentifier) -> Self {
        Self::new(tag_number, PrimitiveValue::ObjectIdentifier(identifier))
    }

    /// Raw octets of a payload whose type is not known
    pub fn unknown(tag_number: u8, octets: Vec<u8>) -> Self {
        Self::new(tag_number, PrimitiveValue::Unknown(octets))
    }

    /// Parse context tag `tag_number` with a payload of `data_type`
    ///
    /// A different tag number, or an opening/closing tag in this position, is
    /// an assertion mismatch so optional fields read as absent.
    pub fn parse(buffer: &mut ReadBuffer, tag_number: u8, data_type: DataType) -> ParseResult<Self> {
        buffer.scoped("ContextTag", |buffer| {
            let header = TagHeader::parse(buffer)?;
            if header.actual_tag_number() != tag_number {
                return Err(ParseError::mismatch("tagNumber", "tagnumber doesn't match"));
            }
            if header.tag_class != TagClass::ContextSpecific {
                return Err(ParseError::validation("should be a context tag"));
            }
            if header.length_value_type == OPENING_TAG || header.length_value_type == CLOSING_TAG {
                return Err(ParseError::mismatch(
                    "lengthValueType",
                    "length 6 and 7 reserved for opening and closing tag",
                ));
            }
            let value = PrimitiveValue::parse_payload(buffer, data_type, &header)?;
            Ok(Self { header, value })
        })
    }

    pub fn header(&self) -> &TagHeader {
        &self.header
    }

    pub fn tag_number(&self) -> u8 {
        self.header.actual_tag_number()
    }

    pub fn value(&self) -> &PrimitiveValue {
        &self.value
    }

    pub fn into_value(self) -> PrimitiveValue {
        self.value
    }

    fn check(&self) -> SerializeResult<()> {
        if !self.header.is_context()
            || self.header.is_opening_tag()
            || self.header.is_closing_tag()
        {
            return Err(SerializationError::invariant(format!(
                "{} cannot carry a primitive payload",
                self.header
            )));
        }
        let expected_length = self.value.header_value(TagClass::ContextSpecific);
        if self.header.actual_length() != expected_length {
            return Err(SerializationError::invariant(format!(
                "header length {} differs from payload length {}",
                self.header.actual_length(),
                expected_length
            )));
        }
        Ok(())
    }
}

impl Serializable for ContextValue {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("ContextTag", |buffer| {
            self.check()?;
            self.header.serialize(buffer)?;
            self.value.serialize_payload(buffer, TagClass::ContextSpecific)
        })
    }

    fn length_in_bits(&self) -> u32 {
        self.header.length_in_bits() + self.value.payload_bits(TagClass::ContextSpecific)
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.tag_number(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectType;

    #[test]
    fn test_object_identifier_context_zero() {
        let bytes = [0x0C, 0x00, 0x00, 0x00, 0x01];
        let mut buffer = ReadBuffer::new(&bytes);
        let value = ContextValue::parse(&mut buffer, 0, DataType::ObjectIdentifier).unwrap();
        assert_eq!(
            value.value().as_object_identifier(),
            Some(ObjectIdentifier::new(ObjectType::AnalogInput, 1))
        );
        assert_eq!(value.to_bytes().unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_tag_number_mismatch_is_absence() {
        let mut buffer = ReadBuffer::new(&[0x19, 0x55]);
        let err = ContextValue::parse(&mut buffer, 2, DataType::UnsignedInteger).unwrap_err();
        assert_eq!(err, ParseError::mismatch("tagNumber", "tagnumber doesn't match"));
        assert!(err.is_absence());
    }

    #[test]
    fn test_application_tag_in_context_position() {
        let mut buffer = ReadBuffer::new(&[0x21, 0x05]);
        let err = ContextValue::parse(&mut buffer, 2, DataType::UnsignedInteger).unwrap_err();
        assert_eq!(err, ParseError::validation("should be a context tag"));
    }

    #[test]
    fn test_opening_tag_is_not_a_value() {
        let mut buffer = ReadBuffer::new(&[0x3E]);
        let err = ContextValue::parse(&mut buffer, 3, DataType::Unknown).unwrap_err();
        assert!(err.is_absence());
    }

    #[test]
    fn test_context_boolean() {
        let mut buffer = ReadBuffer::new(&[0x29, 0x01]);
        let value = ContextValue::parse(&mut buffer, 2, DataType::Boolean).unwrap();
        assert_eq!(value.value().as_bool(), Some(true));
        assert_eq!(ContextValue::boolean(2, true).to_bytes().unwrap(), vec![0x29, 0x01]);

        let mut buffer = ReadBuffer::new(&[0x29, 0x02]);
        assert!(ContextValue::parse(&mut buffer, 2, DataType::Boolean)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_unknown_keeps_octets() {
        let bytes = [0x5A, 0x12, 0x34];
        let mut buffer = ReadBuffer::new(&bytes);
        let value = ContextValue::parse(&mut buffer, 5, DataType::Unknown).unwrap();
        assert_eq!(value.value().as_octets(), Some(&[0x12, 0x34][..]));
        assert_eq!(value.to_bytes().unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_constructors() {
        assert_eq!(ContextValue::unsigned(1, 85).to_bytes().unwrap(), vec![0x19, 0x55]);
        assert_eq!(ContextValue::null(0).to_bytes().unwrap(), vec![0x08]);
        assert_eq!(
            ContextValue::octet_string(1, vec![1, 2, 3]).to_bytes().unwrap(),
            vec![0x1B, 1, 2, 3]
        );
        assert_eq!(ContextValue::real(1, 0.0).length_in_bytes(), 5);
    }
}
