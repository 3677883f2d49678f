//! Application-tagged values.
//!
//! The tag number of an application tag names the payload type, so these
//! values parse without any schema information.

use super::header::{TagClass, TagHeader};
use super::payload::{
    BitStringPayload, CharacterStringPayload, DatePayload, EnumeratedPayload,
    SignedIntegerPayload, TimePayload, UnsignedIntegerPayload,
};
use super::value::{DataType, PrimitiveValue};
use super::{ApplicationTag, Serializable};
use crate::error::{ParseError, ParseResult, SerializationError, SerializeResult};
use crate::io::{ReadBuffer, WriteBuffer};
use crate::object::ObjectIdentifier;
use std::fmt;


/// An application tag header together with its payload
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationValue {
    header: TagHeader,
    value: PrimitiveValue,
}

impl ApplicationValue {
    /// Wrap `value` under a minimal header; raw `Unknown` octets have no application tag
    pub fn new(value: PrimitiveValue) -> SerializeResult<Self> {
        let tag = value.data_type().application_tag().ok_or_else(|| {
            SerializationError::invariant("raw octets cannot be sent with an application tag")
        })?;
        Ok(Self::with_tag(tag, value))
    }

    fn with_tag(tag: ApplicationTag, value: PrimitiveValue) -> Self {
        let header = TagHeader::balanced(
            TagClass::Application,
            tag as u8,
            value.header_value(TagClass::Application),
        );
        Self { header, value }
    }

    pub fn null() -> Self {
        Self::with_tag(ApplicationTag::Null, PrimitiveValue::Null)
    }

    pub fn boolean(value: bool) -> Self {
        Self::with_tag(ApplicationTag::Boolean, PrimitiveValue::Boolean(value))
    }

    pub fn unsigned(value: u64) -> Self {
        Self::with_tag(
            ApplicationTag::UnsignedInt,
            PrimitiveValue::UnsignedInteger(UnsignedIntegerPayload::new(value)),
        )
    }

    pub fn signed(value: i64) -> Self {
        Self::with_tag(
            ApplicationTag::SignedInt,
            PrimitiveValue::SignedInteger(SignedIntegerPayload::new(value)),
        )
    }

    pub fn real(value: f32) -> Self {
        Self::with_tag(ApplicationTag::Real, PrimitiveValue::Real(value))
    }

    pub fn double(value: f64) -> Self {
        Self::with_tag(ApplicationTag::Double, PrimitiveValue::Double(value))
    }

    pub fn octet_string(octets: Vec<u8>) -> Self {
        Self::with_tag(ApplicationTag::OctetString, PrimitiveValue::OctetString(octets))
    }

    /// UTF-8 character string
    pub fn character_string(value: &str) -> Self {
        Self::with_tag(
            ApplicationTag::CharacterString,
            PrimitiveValue::CharacterString(CharacterStringPayload::utf8(value)),
        )
    }

    pub fn bit_string(bits: &[bool]) -> Self {
        Self::with_tag(
            ApplicationTag::BitString,
            PrimitiveValue::BitString(BitStringPayload::new(bits)),
        )
    }

    pub fn enumerated(value: u32) -> Self {
        Self::with_tag(
            ApplicationTag::Enumerated,
            PrimitiveValue::Enumerated(EnumeratedPayload::new(value)),
        )
    }

    pub fn date(date: DatePayload) -> Self {
        Self::with_tag(ApplicationTag::Date, PrimitiveValue::Date(date))
    }

    pub fn time(time: TimePayload) -> Self {
        Self::with_tag(ApplicationTag::Time, PrimitiveValue::Time(time))
    }

    pub fn object_identifier(identifier: ObjectIdentifier) -> Self {
        Self::with_tag(
            ApplicationTag::ObjectIdentifier,
            PrimitiveValue::ObjectIdentifier(identifier),
        )
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("ApplicationTag", |buffer| {
            let header = TagHeader::parse(buffer)?;
            if header.tag_class != TagClass::Application {
                return Err(ParseError::validation("should be a application tag"));
            }
            let tag = ApplicationTag::try_from(header.actual_tag_number())?;
            let value = PrimitiveValue::parse_payload(buffer, DataType::from(tag), &header)?;
            Ok(Self { header, value })
        })
    }

    /// Parse an application value of type `tag`
    ///
    /// Any other tag (including a context tag) is an assertion mismatch, so an
    /// optional field of this type reads as absent.
    pub fn parse_expecting(buffer: &mut ReadBuffer, tag: ApplicationTag) -> ParseResult<Self> {
        let header = buffer.peek(TagHeader::parse)?;
        if !header.is_application() || header.actual_tag_number() != tag as u8 {
            return Err(ParseError::mismatch(
                "tagNumber",
                format!("expected application tag {:?}, found {}", tag, header),
            ));
        }
        Self::parse(buffer)
    }

    pub fn header(&self) -> &TagHeader {
        &self.header
    }

    pub fn value(&self) -> &PrimitiveValue {
        &self.value
    }

    pub fn into_value(self) -> PrimitiveValue {
        self.value
    }

    pub fn tag(&self) -> ParseResult<ApplicationTag> {
        ApplicationTag::try_from(self.header.actual_tag_number())
    }

    /// Header and payload must agree before anything is written
    fn check(&self) -> SerializeResult<()> {
        let expected_tag = self.value.data_type().application_tag();
        if self.header.tag_class != TagClass::Application
            || expected_tag.map(|tag| tag as u8) != Some(self.header.actual_tag_number())
        {
            return Err(SerializationError::invariant(format!(
                "{} does not announce a {:?} payload",
                self.header,
                self.value.data_type()
            )));
        }
        let expected_length = self.value.header_value(TagClass::Application);
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

impl Serializable for ApplicationValue {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("ApplicationTag", |buffer| {
            self.check()?;
            self.header.serialize(buffer)?;
            self.value.serialize_payload(buffer, TagClass::Application)
        })
    }

    fn length_in_bits(&self) -> u32 {
        self.header.length_in_bits() + self.value.payload_bits(TagClass::Application)
    }
}

impl fmt::Display for ApplicationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
