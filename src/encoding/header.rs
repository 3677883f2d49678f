//! The universal BACnet tag header (clause 20.2.1).
//!
//! ```text
//!   7   6   5   4   3   2   1   0
//! +---+---+---+---+---+---+---+---+
//! |  tag number   | c |    LVT    |   c: 0 = application, 1 = context
//! +---+---+---+---+---+---+---+---+
//! | extended tag number           |   present when tag number == 0xF
//! | extended length (1, 3, 5)     |   present when LVT == 5
//! ```
//!
//! LVT 0..=4 is a literal length, 5 announces an extended length (one byte up
//! to 253, `0xFE` + u16, `0xFF` + u32), 6 marks an opening tag and 7 a
//! closing tag.

use super::Serializable;
use crate::error::{ParseResult, SerializationError, SerializeResult};
use crate::io::{ReadBuffer, WriteBuffer};
use std::fmt;


/// Tag number value announcing an extended tag number byte
pub const EXTENDED_TAG_NUMBER: u8 = 0x0F;
/// Length/value/type announcing an extended length
pub const EXTENDED_LENGTH: u8 = 5;
/// Length/value/type of an opening tag
pub const OPENING_TAG: u8 = 6;
/// Length/value/type of a closing tag
pub const CLOSING_TAG: u8 = 7;

const EXTENDED_LENGTH_U16: u8 = 254;
const EXTENDED_LENGTH_U32: u8 = 255;

/// Tag class bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagClass {
    /// Self-describing application tag
    Application = 0,
    /// Context-specific tag; the payload type comes from the schema
    ContextSpecific = 1,
}

impl TagClass {
    fn from_bit(bit: bool) -> Self {
        if bit {
            TagClass::ContextSpecific
        } else {
            TagClass::Application
        }
    }

    fn bit(self) -> bool {
        matches!(self, TagClass::ContextSpecific)
    }
}

impl fmt::Display for TagClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagClass::Application => write!(f, "application"),
            TagClass::ContextSpecific => write!(f, "context"),
        }
    }
}

/// Raw tag header fields as they appear on the wire
///
/// Parsing keeps every optional extension exactly as read, so serializing a
/// parsed header reproduces its bytes even for non-minimal encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagHeader {
    pub tag_number: u8,
    pub tag_class: TagClass,
    pub length_value_type: u8,
    pub ext_tag_number: Option<u8>,
    pub ext_length: Option<u8>,
    pub ext_ext_length: Option<u16>,
    pub ext_ext_ext_length: Option<u32>,
}

impl TagHeader {
    /// Shortest header for `tag_number` carrying the length (or value) `value`
    pub fn balanced(tag_class: TagClass, tag_number: u8, value: u32) -> Self {
        let (short_number, ext_tag_number) = split_tag_number(tag_number);

        let mut header = Self {
            tag_number: short_number,
            tag_class,
            length_value_type: 0,
            ext_tag_number,
            ext_length: None,
            ext_ext_length: None,
            ext_ext_ext_length: None,
        };

        if value <= 4 {
            header.length_value_type = value as u8;
        } else {
            header.length_value_type = EXTENDED_LENGTH;
            if value <= 253 {
                header.ext_length = Some(value as u8);
            } else if value <= u16::MAX as u32 {
                header.ext_length = Some(EXTENDED_LENGTH_U16);
                header.ext_ext_length = Some(value as u16);
            } else {
                header.ext_length = Some(EXTENDED_LENGTH_U32);
                header.ext_ext_ext_length = Some(value);
            }
        }
        header
    }

    /// Opening tag header for context tag `tag_number`
    pub fn opening(tag_number: u8) -> Self {
        Self::marker(tag_number, OPENING_TAG)
    }

    /// Closing tag header for context tag `tag_number`
    pub fn closing(tag_number: u8) -> Self {
        Self::marker(tag_number, CLOSING_TAG)
    }

    fn marker(tag_number: u8, length_value_type: u8) -> Self {
        let (short_number, ext_tag_number) = split_tag_number(tag_number);
        Self {
            tag_number: short_number,
            tag_class: TagClass::ContextSpecific,
            length_value_type,
            ext_tag_number,
            ext_length: None,
            ext_ext_length: None,
            ext_ext_ext_length: None,
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("TagHeader", |buffer| {
            let tag_number = buffer.read_u8(4)?;
            let tag_class = TagClass::from_bit(buffer.read_bit()?);
            let length_value_type = buffer.read_u8(3)?;

            let ext_tag_number = if tag_number == EXTENDED_TAG_NUMBER {
                Some(buffer.read_u8(8)?)
            } else {
                None
            };
            let ext_length = if length_value_type == EXTENDED_LENGTH {
                Some(buffer.read_u8(8)?)
            } else {
                None
            };
            let ext_ext_length = if ext_length == Some(EXTENDED_LENGTH_U16) {
                Some(buffer.read_u16(16)?)
            } else {
                None
            };
            let ext_ext_ext_length = if ext_length == Some(EXTENDED_LENGTH_U32) {
                Some(buffer.read_u32(32)?)
            } else {
                None
            };

            Ok(Self {
                tag_number,
                tag_class,
                length_value_type,
                ext_tag_number,
                ext_length,
                ext_ext_length,
                ext_ext_ext_length,
            })
        })
    }

    /// Tag number after resolving the extension byte
    pub fn actual_tag_number(&self) -> u8 {
        if self.tag_number < EXTENDED_TAG_NUMBER {
            self.tag_number
        } else {
            self.ext_tag_number.unwrap_or(self.tag_number)
        }
    }

    /// Length (or inline value) after resolving the extension ladder
    pub fn actual_length(&self) -> u32 {
        if self.length_value_type != EXTENDED_LENGTH {
            return self.length_value_type as u32;
        }
        match self.ext_length {
            Some(EXTENDED_LENGTH_U16) => self.ext_ext_length.unwrap_or_default() as u32,
            Some(EXTENDED_LENGTH_U32) => self.ext_ext_ext_length.unwrap_or_default(),
            Some(length) => length as u32,
            None => 0,
        }
    }

    pub fn is_context(&self) -> bool {
        self.tag_class == TagClass::ContextSpecific
    }

    pub fn is_application(&self) -> bool {
        self.tag_class == TagClass::Application
    }

    pub fn is_opening_tag(&self) -> bool {
        self.is_context() && self.length_value_type == OPENING_TAG
    }

    pub fn is_closing_tag(&self) -> bool {
        self.is_context() && self.length_value_type == CLOSING_TAG
    }

    /// Every optional slot must be present exactly when its marker asks for it
    fn check_consistency(&self) -> SerializeResult<()> {
        let consistent = self.ext_tag_number.is_some() == (self.tag_number == EXTENDED_TAG_NUMBER)
            && self.ext_length.is_some() == (self.length_value_type == EXTENDED_LENGTH)
            && self.ext_ext_length.is_some() == (self.ext_length == Some(EXTENDED_LENGTH_U16))
            && self.ext_ext_ext_length.is_some() == (self.ext_length == Some(EXTENDED_LENGTH_U32));
        if consistent {
            Ok(())
        } else {
            Err(SerializationError::invariant(format!(
                "tag header extensions do not match their markers: {:?}",
                self
            )))
        }
    }
}

fn split_tag_number(tag_number: u8) -> (u8, Option<u8>) {
    if tag_number < EXTENDED_TAG_NUMBER {
        (tag_number, None)
    } else {
        (EXTENDED_TAG_NUMBER, Some(tag_number))
    }
}

impl Serializable for TagHeader {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("TagHeader", |buffer| {
            self.check_consistency()?;
            buffer.write_u8(4, self.tag_number)?;
            buffer.write_bit(self.tag_class.bit())?;
            buffer.write_u8(3, self.length_value_type)?;
            if let Some(ext_tag_number) = self.ext_tag_number {
                buffer.write_u8(8, ext_tag_number)?;
            }
            if let Some(ext_length) = self.ext_length {
                buffer.write_u8(8, ext_length)?;
            }
            if let Some(ext_ext_length) = self.ext_ext_length {
                buffer.write_u16(16, ext_ext_length)?;
            }
            if let Some(ext_ext_ext_length) = self.ext_ext_ext_length {
                buffer.write_u32(32, ext_ext_ext_length)?;
            }
            Ok(())
        })
    }

    fn length_in_bits(&self) -> u32 {
        let mut bits = 8;
        if self.ext_tag_number.is_some() {
            bits += 8;
        }
        if self.ext_length.is_some() {
            bits += 8;
        }
        if self.ext_ext_length.is_some() {
            bits += 16;
        }
        if self.ext_ext_ext_length.is_some() {
            bits += 32;
        }
        bits
    }
}

impl fmt::Display for TagHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opening_tag() {
            write!(f, "opening tag {}", self.actual_tag_number())
        } else if self.is_closing_tag() {
            write!(f, "closing tag {}", self.actual_tag_number())
        } else {
            write!(
                f,
                "{} tag {} (length {})",
                self.tag_class,
                self.actual_tag_number(),
                self.actual_length()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(bytes: &[u8]) -> TagHeader {
        let mut buffer = ReadBuffer::new(bytes);
        let header = TagHeader::parse(&mut buffer).unwrap();
        assert!(buffer.is_at_end());
        header
    }

    #[test]
    fn test_short_form() {
        let header = parse(&[0x21]);
        assert_eq!(header.tag_class, TagClass::Application);
        assert_eq!(header.actual_tag_number(), 2);
        assert_eq!(header.actual_length(), 1);
        assert_eq!(header, TagHeader::balanced(TagClass::Application, 2, 1));
    }

    #[test]
    fn test_opening_and_closing() {
        let opening = TagHeader::opening(4);
        assert_eq!(opening.to_bytes().unwrap(), vec![0x4E]);
        assert!(parse(&[0x4E]).is_opening_tag());

        let closing = TagHeader::closing(4);
        assert_eq!(closing.to_bytes().unwrap(), vec![0x4F]);
        assert!(parse(&[0x4F]).is_closing_tag());
        assert_eq!(closing.to_string(), "closing tag 4");
    }

    #[test]
    fn test_extended_tag_number() {
        let header = TagHeader::balanced(TagClass::ContextSpecific, 33, 2);
        assert_eq!(header.to_bytes().unwrap(), vec![0xFA, 33]);
        assert_eq!(parse(&[0xFA, 33]).actual_tag_number(), 33);

        let opening = TagHeader::opening(200);
        assert_eq!(opening.to_bytes().unwrap(), vec![0xFE, 200]);
    }

    #[test]
    fn test_extended_length_ladder() {
        let one = TagHeader::balanced(TagClass::Application, 6, 253);
        assert_eq!(one.to_bytes().unwrap(), vec![0x65, 0xFD]);

        let three = TagHeader::balanced(TagClass::Application, 6, 254);
        assert_eq!(three.to_bytes().unwrap(), vec![0x65, 0xFE, 0x00, 0xFE]);
        assert_eq!(three.length_in_bits(), 32);

        let five = TagHeader::balanced(TagClass::Application, 6, 70_000);
        assert_eq!(
            five.to_bytes().unwrap(),
            vec![0x65, 0xFF, 0x00, 0x01, 0x11, 0x70]
        );
        assert_eq!(parse(&[0x65, 0xFF, 0x00, 0x01, 0x11, 0x70]).actual_length(), 70_000);
    }

    #[test]
    fn test_non_minimal_header_round_trips() {
        // length 3 announced through the extended form
        let bytes = [0x25, 0x03];
        let header = parse(&bytes);
        assert_eq!(header.actual_length(), 3);
        assert_eq!(header.to_bytes().unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_inconsistent_header_rejected() {
        let mut header = TagHeader::balanced(TagClass::Application, 2, 1);
        header.ext_length = Some(9);
        assert!(matches!(
            header.to_bytes(),
            Err(SerializationError::Invariant(_))
        ));
    }

    #[test]
    fn test_truncated_header() {
        let mut buffer = ReadBuffer::new(&[0x65, 0xFE, 0x01]);
        assert!(TagHeader::parse(&mut buffer).is_err());
        assert_eq!(buffer.context_depth(), 0);
    }
}
