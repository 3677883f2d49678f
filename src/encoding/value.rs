use super::header::{TagClass, TagHeader};
use super::payload::{
    parse_object_identifier, serialize_object_identifier, BitStringPayload,
    CharacterStringPayload, DatePayload, EnumeratedPayload, SignedIntegerPayload, TimePayload,
    UnsignedIntegerPayload,
};
use super::{ApplicationTag, Serializable};
use crate::error::{ParseError, ParseResult, SerializeResult};
use crate::io::{ReadBuffer, WriteBuffer};
use crate::object::ObjectIdentifier;
use std::fmt;


/// Payload type of a tagged value
///
/// Application tags carry it in the tag number; for context tags the caller
/// supplies it. `Unknown` reads the payload as raw octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    Null,
    Boolean,
    UnsignedInteger,
    SignedInteger,
    Real,
    Double,
    OctetString,
    CharacterString,
    BitString,
    Enumerated,
    Date,
    Time,
    ObjectIdentifier,
    Unknown,
}

impl DataType {
    /// Application tag announcing this type, if it has one
    pub fn application_tag(self) -> Option<ApplicationTag> {
        let tag = match self {
            DataType::Null => ApplicationTag::Null,
            DataType::Boolean => ApplicationTag::Boolean,
            DataType::UnsignedInteger => ApplicationTag::UnsignedInt,
            DataType::SignedInteger => ApplicationTag::SignedInt,
            DataType::Real => ApplicationTag::Real,
            DataType::Double => ApplicationTag::Double,
            DataType::OctetString => ApplicationTag::OctetString,
            DataType::CharacterString => ApplicationTag::CharacterString,
            DataType::BitString => ApplicationTag::BitString,
            DataType::Enumerated => ApplicationTag::Enumerated,
            DataType::Date => ApplicationTag::Date,
            DataType::Time => ApplicationTag::Time,
            DataType::ObjectIdentifier => ApplicationTag::ObjectIdentifier,
            DataType::Unknown => return None,
        };
        Some(tag)
    }
}

impl From<ApplicationTag> for DataType {
    fn from(tag: ApplicationTag) -> Self {
        match tag {
            ApplicationTag::Null => DataType::Null,
            ApplicationTag::Boolean => DataType::Boolean,
            ApplicationTag::UnsignedInt => DataType::UnsignedInteger,
            ApplicationTag::SignedInt => DataType::SignedInteger,
            ApplicationTag::Real => DataType::Real,
            ApplicationTag::Double => DataType::Double,
            ApplicationTag::OctetString => DataType::OctetString,
            ApplicationTag::CharacterString => DataType::CharacterString,
            ApplicationTag::BitString => DataType::BitString,
            ApplicationTag::Enumerated => DataType::Enumerated,
            ApplicationTag::Date => DataType::Date,
            ApplicationTag::Time => DataType::Time,
            ApplicationTag::ObjectIdentifier => DataType::ObjectIdentifier,
        }
    }
}

/// A primitive value, independent of the tag class it travels with
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveValue {
    Null,
    Boolean(bool),
    UnsignedInteger(UnsignedIntegerPayload),
    SignedInteger(SignedIntegerPayload),
    Real(f32),
    Double(f64),
    OctetString(Vec<u8>),
    CharacterString(CharacterStringPayload),
    BitString(BitStringPayload),
    Enumerated(EnumeratedPayload),
    Date(DatePayload),
    Time(TimePayload),
    ObjectIdentifier(ObjectIdentifier),
    /// Raw octets of a context tag whose type the schema leaves open
    Unknown(Vec<u8>),
}

fn expect_length(data_type: DataType, actual: u32, expected: u32) -> ParseResult<()> {
    if actual != expected {
        return Err(ParseError::validation(format!(
            "{:?} payload must be {} octets, header says {}",
            data_type, expected, actual
        )));
    }
    Ok(())
}

impl PrimitiveValue {
    pub fn data_type(&self) -> DataType {
        match self {
            PrimitiveValue::Null => DataType::Null,
            PrimitiveValue::Boolean(_) => DataType::Boolean,
            PrimitiveValue::UnsignedInteger(_) => DataType::UnsignedInteger,
            PrimitiveValue::SignedInteger(_) => DataType::SignedInteger,
            PrimitiveValue::Real(_) => DataType::Real,
            PrimitiveValue::Double(_) => DataType::Double,
            PrimitiveValue::OctetString(_) => DataType::OctetString,
            PrimitiveValue::CharacterString(_) => DataType::CharacterString,
            PrimitiveValue::BitString(_) => DataType::BitString,
            PrimitiveValue::Enumerated(_) => DataType::Enumerated,
            PrimitiveValue::Date(_) => DataType::Date,
            PrimitiveValue::Time(_) => DataType::Time,
            PrimitiveValue::ObjectIdentifier(_) => DataType::ObjectIdentifier,
            PrimitiveValue::Unknown(_) => DataType::Unknown,
        }
    }

    /// Read the payload announced by `header` as `data_type`
    pub(crate) fn parse_payload(
        buffer: &mut ReadBuffer,
        data_type: DataType,
        header: &TagHeader,
    ) -> ParseResult<Self> {
        let length = header.actual_length();
        let value = match data_type {
            DataType::Null => {
                expect_length(data_type, length, 0)?;
                PrimitiveValue::Null
            }
            DataType::Boolean if header.is_application() => match length {
                0 => PrimitiveValue::Boolean(false),
                1 => PrimitiveValue::Boolean(true),
                other => {
                    return Err(ParseError::validation(format!(
                        "application boolean carries {} in its header",
                        other
                    )))
                }
            },
            DataType::Boolean => {
                expect_length(data_type, length, 1)?;
                match buffer.read_u8(8)? {
                    0 => PrimitiveValue::Boolean(false),
                    1 => PrimitiveValue::Boolean(true),
                    other => {
                        return Err(ParseError::validation(format!(
                            "boolean value should be 0 or 1, got {}",
                            other
                        )))
                    }
                }
            }
            DataType::UnsignedInteger => {
                PrimitiveValue::UnsignedInteger(UnsignedIntegerPayload::parse(buffer, length)?)
            }
            DataType::SignedInteger => {
                PrimitiveValue::SignedInteger(SignedIntegerPayload::parse(buffer, length)?)
            }
            DataType::Real => {
                expect_length(data_type, length, 4)?;
                PrimitiveValue::Real(buffer.read_f32()?)
            }
            DataType::Double => {
                expect_length(data_type, length, 8)?;
                PrimitiveValue::Double(buffer.read_f64()?)
            }
            DataType::OctetString => PrimitiveValue::OctetString(buffer.read_bytes(length as usize)?),
            DataType::CharacterString => {
                PrimitiveValue::CharacterString(CharacterStringPayload::parse(buffer, length)?)
            }
            DataType::BitString => PrimitiveValue::BitString(BitStringPayload::parse(buffer, length)?),
            DataType::Enumerated => {
                PrimitiveValue::Enumerated(EnumeratedPayload::parse(buffer, length)?)
            }
            DataType::Date => {
                expect_length(data_type, length, 4)?;
                PrimitiveValue::Date(DatePayload::parse(buffer)?)
            }
            DataType::Time => {
                expect_length(data_type, length, 4)?;
                PrimitiveValue::Time(TimePayload::parse(buffer)?)
            }
            DataType::ObjectIdentifier => {
                expect_length(data_type, length, 4)?;
                PrimitiveValue::ObjectIdentifier(parse_object_identifier(buffer)?)
            }
            DataType::Unknown => PrimitiveValue::Unknown(buffer.read_bytes(length as usize)?),
        };
        Ok(value)
    }

    /// Value the tag header must carry in front of this payload
    pub(crate) fn header_value(&self, class: TagClass) -> u32 {
        match (self, class) {
            (PrimitiveValue::Boolean(value), TagClass::Application) => *value as u32,
            _ => self.payload_bits(class) / 8,
        }
    }

    pub(crate) fn payload_bits(&self, class: TagClass) -> u32 {
        match self {
            PrimitiveValue::Null => 0,
            PrimitiveValue::Boolean(_) => match class {
                TagClass::Application => 0,
                TagClass::ContextSpecific => 8,
            },
            PrimitiveValue::UnsignedInteger(payload) => payload.length_in_bits(),
            PrimitiveValue::SignedInteger(payload) => payload.length_in_bits(),
            PrimitiveValue::Real(_) => 32,
            PrimitiveValue::Double(_) => 64,
            PrimitiveValue::OctetString(octets) | PrimitiveValue::Unknown(octets) => {
                octets.len() as u32 * 8
            }
            PrimitiveValue::CharacterString(payload) => payload.length_in_bits(),
            PrimitiveValue::BitString(payload) => payload.length_in_bits(),
            PrimitiveValue::Enumerated(payload) => payload.length_in_bits(),
            PrimitiveValue::Date(payload) => payload.length_in_bits(),
            PrimitiveValue::Time(payload) => payload.length_in_bits(),
            PrimitiveValue::ObjectIdentifier(_) => 32,
        }
    }

    pub(crate) fn serialize_payload(
        &self,
        buffer: &mut WriteBuffer,
        class: TagClass,
    ) -> SerializeResult<()> {
        match self {
            PrimitiveValue::Null => Ok(()),
            PrimitiveValue::Boolean(value) => match class {
                TagClass::Application => Ok(()),
                TagClass::ContextSpecific => buffer.write_u8(8, *value as u8),
            },
            PrimitiveValue::UnsignedInteger(payload) => payload.serialize(buffer),
            PrimitiveValue::SignedInteger(payload) => payload.serialize(buffer),
            PrimitiveValue::Real(value) => buffer.write_f32(*value),
            PrimitiveValue::Double(value) => buffer.write_f64(*value),
            PrimitiveValue::OctetString(octets) | PrimitiveValue::Unknown(octets) => {
                buffer.write_bytes(octets)
            }
            PrimitiveValue::CharacterString(payload) => payload.serialize(buffer),
            PrimitiveValue::BitString(payload) => payload.serialize(buffer),
            PrimitiveValue::Enumerated(payload) => payload.serialize(buffer),
            PrimitiveValue::Date(payload) => payload.serialize(buffer),
            PrimitiveValue::Time(payload) => payload.serialize(buffer),
            PrimitiveValue::ObjectIdentifier(identifier) => {
                serialize_object_identifier(buffer, identifier)
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PrimitiveValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrimitiveValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            PrimitiveValue::UnsignedInteger(payload) => Some(payload.actual_value()),
            _ => None,
        }
    }

    pub fn as_signed(&self) -> Option<i64> {
        match self {
            PrimitiveValue::SignedInteger(payload) => Some(payload.actual_value()),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f32> {
        match self {
            PrimitiveValue::Real(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            PrimitiveValue::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_octets(&self) -> Option<&[u8]> {
        match self {
            PrimitiveValue::OctetString(octets) | PrimitiveValue::Unknown(octets) => Some(octets),
            _ => None,
        }
    }

    pub fn as_character_string(&self) -> Option<&CharacterStringPayload> {
        match self {
            PrimitiveValue::CharacterString(payload) => Some(payload),
            _ => None,
        }
    }

    /// Decoded text of a character string
    pub fn as_text(&self) -> Option<String> {
        self.as_character_string()
            .map(|payload| payload.value().into_owned())
    }

    pub fn as_bit_string(&self) -> Option<&BitStringPayload> {
        match self {
            PrimitiveValue::BitString(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_enumerated(&self) -> Option<u32> {
        match self {
            PrimitiveValue::Enumerated(payload) => Some(payload.actual_value()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DatePayload> {
        match self {
            PrimitiveValue::Date(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&TimePayload> {
        match self {
            PrimitiveValue::Time(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_object_identifier(&self) -> Option<ObjectIdentifier> {
        match self {
            PrimitiveValue::ObjectIdentifier(identifier) => Some(*identifier),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::Null => write!(f, "null"),
            PrimitiveValue::Boolean(value) => write!(f, "{}", value),
            PrimitiveValue::UnsignedInteger(payload) => write!(f, "{}", payload),
            PrimitiveValue::SignedInteger(payload) => write!(f, "{}", payload),
            PrimitiveValue::Real(value) => write!(f, "{}", value),
            PrimitiveValue::Double(value) => write!(f, "{}", value),
            PrimitiveValue::OctetString(octets) => write!(f, "0x{}", hex::encode(octets)),
            PrimitiveValue::CharacterString(payload) => write!(f, "{:?}", payload.value()),
            PrimitiveValue::BitString(payload) => {
                let bits: String = payload
                    .data
                    .iter()
                    .map(|bit| if *bit { '1' } else { '0' })
                    .collect();
                write!(f, "B'{}'", bits)
            }
            PrimitiveValue::Enumerated(payload) => write!(f, "{}", payload.actual_value()),
            PrimitiveValue::Date(payload) => write!(f, "{}", payload),
            PrimitiveValue::Time(payload) => write!(f, "{}", payload),
            PrimitiveValue::ObjectIdentifier(identifier) => write!(f, "{}", identifier),
            PrimitiveValue::Unknown(octets) => write!(f, "raw 0x{}", hex::encode(octets)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectType;

    #[test]
    fn test_data_type_tags() {
        assert_eq!(
            DataType::from(ApplicationTag::Enumerated).application_tag(),
            Some(ApplicationTag::Enumerated)
        );
        assert_eq!(DataType::Unknown.application_tag(), None);
    }

    #[test]
    fn test_boolean_header_value_depends_on_class() {
        let value = PrimitiveValue::Boolean(true);
        assert_eq!(value.header_value(TagClass::Application), 1);
        assert_eq!(value.payload_bits(TagClass::Application), 0);
        assert_eq!(value.header_value(TagClass::ContextSpecific), 1);
        assert_eq!(value.payload_bits(TagClass::ContextSpecific), 8);
    }

    #[test]
    fn test_display() {
        assert_eq!(PrimitiveValue::OctetString(vec![0xC0, 0xA8]).to_string(), "0xc0a8");
        assert_eq!(
            PrimitiveValue::ObjectIdentifier(ObjectIdentifier::new(ObjectType::AnalogValue, 3))
                .to_string(),
            "AnalogValue:3"
        );
        assert_eq!(
            PrimitiveValue::BitString(BitStringPayload::new(&[true, false])).to_string(),
            "B'10'"
        );
    }

    #[test]
    fn test_fixed_width_payloads_check_length() {
        let header = TagHeader::balanced(TagClass::Application, 4, 2);
        let mut buffer = ReadBuffer::new(&[0x00, 0x00]);
        let err = PrimitiveValue::parse_payload(&mut buffer, DataType::Real, &header).unwrap_err();
        assert!(err.is_validation());
    }
}
