//! Primitive payload codecs (clause 20.2.2 to 20.2.14).
//!
//! A payload never reads its own length: the caller resolves it from the tag
//! header and passes it in. Payload constructors pick the shortest encoding
//! that represents the value.

use super::Serializable;
use crate::error::{ParseError, ParseResult, SerializationError, SerializeResult};
use crate::generate_custom_enum;
use crate::io::{ReadBuffer, WriteBuffer};
use crate::object::{ObjectIdentifier, ObjectType};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use std::borrow::Cow;
use std::fmt;


/// Wildcard octet used by dates and times ("any")
pub const UNSPECIFIED: u8 = 0xFF;

/// Unsigned integer payload; the variant records the encoded width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnsignedIntegerPayload {
    U8(u8),
    U16(u16),
    U24(u32),
    U32(u32),
    U40(u64),
    U48(u64),
    U56(u64),
    U64(u64),
}

impl UnsignedIntegerPayload {
    /// Minimal-width payload for `value`
    pub fn new(value: u64) -> Self {
        match minimal_unsigned_octets(value) {
            1 => Self::U8(value as u8),
            2 => Self::U16(value as u16),
            3 => Self::U24(value as u32),
            4 => Self::U32(value as u32),
            5 => Self::U40(value),
            6 => Self::U48(value),
            7 => Self::U56(value),
            _ => Self::U64(value),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer, actual_length: u32) -> ParseResult<Self> {
        if !(1..=8).contains(&actual_length) {
            return Err(ParseError::validation("unmapped integer length"));
        }
        let bits = (actual_length * 8) as u8;
        let value = match actual_length {
            1 => Self::U8(buffer.read_u8(bits)?),
            2 => Self::U16(buffer.read_u16(bits)?),
            3 => Self::U24(buffer.read_u32(bits)?),
            4 => Self::U32(buffer.read_u32(bits)?),
            5 => Self::U40(buffer.read_u64(bits)?),
            6 => Self::U48(buffer.read_u64(bits)?),
            7 => Self::U56(buffer.read_u64(bits)?),
            8 => Self::U64(buffer.read_u64(bits)?),
            _ => return Err(ParseError::validation("unmapped integer length")),
        };
        Ok(value)
    }

    pub fn actual_value(&self) -> u64 {
        match *self {
            Self::U8(v) => v as u64,
            Self::U16(v) => v as u64,
            Self::U24(v) | Self::U32(v) => v as u64,
            Self::U40(v) | Self::U48(v) | Self::U56(v) | Self::U64(v) => v,
        }
    }

    /// Encoded width in octets
    pub fn actual_length(&self) -> u32 {
        match self {
            Self::U8(_) => 1,
            Self::U16(_) => 2,
            Self::U24(_) => 3,
            Self::U32(_) => 4,
            Self::U40(_) => 5,
            Self::U48(_) => 6,
            Self::U56(_) => 7,
            Self::U64(_) => 8,
        }
    }
}

impl Serializable for UnsignedIntegerPayload {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.write_unsigned((self.actual_length() * 8) as u8, self.actual_value())
    }

    fn length_in_bits(&self) -> u32 {
        self.actual_length() * 8
    }
}

impl From<u64> for UnsignedIntegerPayload {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for UnsignedIntegerPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.actual_value())
    }
}

/// Two's-complement signed integer payload; the variant records the encoded width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignedIntegerPayload {
    I8(i8),
    I16(i16),
    I24(i32),
    I32(i32),
    I40(i64),
    I48(i64),
    I56(i64),
    I64(i64),
}

impl SignedIntegerPayload {
    /// Minimal-width payload for `value`
    pub fn new(value: i64) -> Self {
        match minimal_signed_octets(value) {
            1 => Self::I8(value as i8),
            2 => Self::I16(value as i16),
            3 => Self::I24(value as i32),
            4 => Self::I32(value as i32),
            5 => Self::I40(value),
            6 => Self::I48(value),
            7 => Self::I56(value),
            _ => Self::I64(value),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer, actual_length: u32) -> ParseResult<Self> {
        if !(1..=8).contains(&actual_length) {
            return Err(ParseError::validation("unmapped integer length"));
        }
        let value = buffer.read_signed((actual_length * 8) as u8)?;
        Ok(match actual_length {
            1 => Self::I8(value as i8),
            2 => Self::I16(value as i16),
            3 => Self::I24(value as i32),
            4 => Self::I32(value as i32),
            5 => Self::I40(value),
            6 => Self::I48(value),
            7 => Self::I56(value),
            _ => Self::I64(value),
        })
    }

    pub fn actual_value(&self) -> i64 {
        match *self {
            Self::I8(v) => v as i64,
            Self::I16(v) => v as i64,
            Self::I24(v) | Self::I32(v) => v as i64,
            Self::I40(v) | Self::I48(v) | Self::I56(v) | Self::I64(v) => v,
        }
    }

    /// Encoded width in octets
    pub fn actual_length(&self) -> u32 {
        match self {
            Self::I8(_) => 1,
            Self::I16(_) => 2,
            Self::I24(_) => 3,
            Self::I32(_) => 4,
            Self::I40(_) => 5,
            Self::I48(_) => 6,
            Self::I56(_) => 7,
            Self::I64(_) => 8,
        }
    }
}

impl Serializable for SignedIntegerPayload {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.write_signed((self.actual_length() * 8) as u8, self.actual_value())
    }

    fn length_in_bits(&self) -> u32 {
        self.actual_length() * 8
    }
}

impl From<i64> for SignedIntegerPayload {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for SignedIntegerPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.actual_value())
    }
}

pub(crate) fn minimal_unsigned_octets(value: u64) -> u32 {
    (64 - value.leading_zeros()).div_ceil(8).max(1)
}

pub(crate) fn minimal_signed_octets(value: i64) -> u32 {
    // significant bits plus one sign bit
    let magnitude = if value < 0 { !value } else { value };
    (64 - magnitude.leading_zeros() + 1).div_ceil(8).max(1)
}

generate_custom_enum! {
    /// Character set octet of a character string (clause 20.2.9)
    CharacterEncoding {
        Utf8 = 0,
        IbmMicrosoftDbcs = 1,
        JisX0208 = 2,
        Ucs4 = 3,
        Ucs2 = 4,
        IsoLatin1 = 5,
    },
    u8
}

/// Character string payload: the encoding octet followed by the raw text
///
/// The raw octets are kept as received, so re-encoding never alters a
/// string even when it does not decode cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStringPayload {
    pub encoding: CharacterEncoding,
    pub raw: Vec<u8>,
}

impl CharacterStringPayload {
    /// UTF-8 encoded string
    pub fn utf8(value: &str) -> Self {
        Self {
            encoding: CharacterEncoding::Utf8,
            raw: value.as_bytes().to_vec(),
        }
    }

    /// Encode `value` with `encoding`; fails when the text is not representable
    pub fn encode(encoding: CharacterEncoding, value: &str) -> SerializeResult<Self> {
        let raw = match encoding {
            CharacterEncoding::Utf8 => value.as_bytes().to_vec(),
            CharacterEncoding::Ucs2 => {
                if value.chars().any(|c| c as u32 > 0xFFFF) {
                    return Err(SerializationError::invariant(
                        "UCS-2 cannot represent characters outside the basic multilingual plane",
                    ));
                }
                value.encode_utf16().flat_map(u16::to_be_bytes).collect()
            }
            CharacterEncoding::Ucs4 => value.chars().flat_map(|c| (c as u32).to_be_bytes()).collect(),
            CharacterEncoding::IsoLatin1 => {
                if !encoding_rs::mem::is_str_latin1(value) {
                    return Err(SerializationError::invariant(
                        "text contains characters outside ISO 8859-1",
                    ));
                }
                encoding_rs::mem::encode_latin1_lossy(value).into_owned()
            }
            CharacterEncoding::JisX0208 | CharacterEncoding::IbmMicrosoftDbcs => {
                let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(value);
                if had_errors {
                    return Err(SerializationError::invariant(
                        "text is not representable in a double byte character set",
                    ));
                }
                bytes.into_owned()
            }
            other => {
                return Err(SerializationError::invariant(format!(
                    "cannot encode text with character set {}",
                    other
                )))
            }
        };
        Ok(Self { encoding, raw })
    }

    pub fn parse(buffer: &mut ReadBuffer, actual_length: u32) -> ParseResult<Self> {
        if actual_length == 0 {
            return Err(ParseError::validation(
                "character string without an encoding octet",
            ));
        }
        let encoding = CharacterEncoding::from(buffer.read_u8(8)?);
        let raw = buffer.read_bytes(actual_length as usize - 1)?;
        Ok(Self { encoding, raw })
    }

    /// Decoded text; undecodable sequences become U+FFFD
    pub fn value(&self) -> Cow<'_, str> {
        match self.encoding {
            CharacterEncoding::Utf8 => encoding_rs::UTF_8.decode_without_bom_handling(&self.raw).0,
            CharacterEncoding::Ucs2 => {
                encoding_rs::UTF_16BE
                    .decode_without_bom_handling(&self.raw)
                    .0
            }
            CharacterEncoding::Ucs4 => Cow::Owned(
                self.raw
                    .chunks_exact(4)
                    .map(|chunk| {
                        let code = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                        char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
                    })
                    .collect(),
            ),
            CharacterEncoding::IsoLatin1 => encoding_rs::mem::decode_latin1(&self.raw),
            CharacterEncoding::JisX0208 | CharacterEncoding::IbmMicrosoftDbcs => {
                encoding_rs::SHIFT_JIS
                    .decode_without_bom_handling(&self.raw)
                    .0
            }
            _ => String::from_utf8_lossy(&self.raw),
        }
    }

    /// Encoded width in octets, including the encoding octet
    pub fn actual_length(&self) -> u32 {
        1 + self.raw.len() as u32
    }
}

impl Serializable for CharacterStringPayload {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.write_u8(8, u8::from(self.encoding))?;
        buffer.write_bytes(&self.raw)
    }

    fn length_in_bits(&self) -> u32 {
        self.actual_length() * 8
    }
}

impl fmt::Display for CharacterStringPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Bit string payload: unused-bit count, data bits, then the padding bits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitStringPayload {
    pub unused_bits: u8,
    pub data: Vec<bool>,
    pub unused: Vec<bool>,
}

impl BitStringPayload {
    /// Bit string holding `bits`, zero padded to a whole octet
    pub fn new(bits: &[bool]) -> Self {
        let unused_bits = ((8 - bits.len() % 8) % 8) as u8;
        Self {
            unused_bits,
            data: bits.to_vec(),
            unused: vec![false; unused_bits as usize],
        }
    }

    pub fn parse(buffer: &mut ReadBuffer, actual_length: u32) -> ParseResult<Self> {
        if actual_length == 0 {
            return Err(ParseError::validation(
                "bit string without an unused-bits octet",
            ));
        }
        let unused_bits = buffer.read_u8(8)?;
        if unused_bits > 7 {
            return Err(ParseError::validation(format!(
                "bit string declares {} unused bits",
                unused_bits
            )));
        }
        let total = (actual_length as usize - 1) * 8;
        if (unused_bits as usize) > total {
            return Err(ParseError::validation(
                "bit string declares unused bits without any data octets",
            ));
        }
        let data = (0..total - unused_bits as usize)
            .map(|_| buffer.read_bit())
            .collect::<ParseResult<Vec<_>>>()?;
        let unused = (0..unused_bits)
            .map(|_| buffer.read_bit())
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Self {
            unused_bits,
            data,
            unused,
        })
    }

    /// Encoded width in octets, including the unused-bits octet
    pub fn actual_length(&self) -> u32 {
        1 + (self.data.len() + self.unused.len()).div_ceil(8) as u32
    }

    pub fn bit(&self, index: usize) -> Option<bool> {
        self.data.get(index).copied()
    }
}

impl Serializable for BitStringPayload {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        if self.unused.len() != self.unused_bits as usize
            || (self.data.len() + self.unused.len()) % 8 != 0
        {
            return Err(SerializationError::invariant(format!(
                "bit string of {} bits does not fill whole octets with {} unused bits",
                self.data.len(),
                self.unused_bits
            )));
        }
        buffer.write_u8(8, self.unused_bits)?;
        for bit in self.data.iter().chain(self.unused.iter()) {
            buffer.write_bit(*bit)?;
        }
        Ok(())
    }

    fn length_in_bits(&self) -> u32 {
        self.actual_length() * 8
    }
}

/// Enumerated payload; the raw octets are kept to preserve non-minimal encodings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumeratedPayload {
    pub data: Vec<u8>,
}

impl EnumeratedPayload {
    pub fn new(value: u32) -> Self {
        let octets = minimal_unsigned_octets(value as u64) as usize;
        Self {
            data: value.to_be_bytes()[4 - octets..].to_vec(),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer, actual_length: u32) -> ParseResult<Self> {
        Ok(Self {
            data: buffer.read_bytes(actual_length as usize)?,
        })
    }

    /// Big-endian value of the raw octets
    pub fn actual_value(&self) -> u32 {
        self.data
            .iter()
            .fold(0u32, |acc, byte| acc.wrapping_shl(8) | *byte as u32)
    }

    pub fn actual_length(&self) -> u32 {
        self.data.len() as u32
    }
}

impl Serializable for EnumeratedPayload {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.write_bytes(&self.data)
    }

    fn length_in_bits(&self) -> u32 {
        self.actual_length() * 8
    }
}

/// Date payload (clause 20.2.12); any octet may be the `0xFF` wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatePayload {
    pub year_minus_1900: u8,
    pub month: u8,
    pub day_of_month: u8,
    pub day_of_week: u8,
}

impl DatePayload {
    pub const ODD_MONTHS: u8 = 13;
    pub const EVEN_MONTHS: u8 = 14;
    pub const LAST_DAY_OF_MONTH: u8 = 32;
    pub const ODD_DAYS: u8 = 33;
    pub const EVEN_DAYS: u8 = 34;

    /// Date from its parts; `None` for the year is the wildcard
    pub fn new(year: Option<u16>, month: u8, day_of_month: u8, day_of_week: u8) -> Self {
        let year_minus_1900 = match year {
            Some(year) if (1900..1900 + UNSPECIFIED as u16).contains(&year) => (year - 1900) as u8,
            _ => UNSPECIFIED,
        };
        Self {
            year_minus_1900,
            month,
            day_of_month,
            day_of_week,
        }
    }

    pub fn from_naive_date(date: NaiveDate) -> Self {
        Self::new(
            u16::try_from(date.year()).ok(),
            date.month() as u8,
            date.day() as u8,
            date.weekday().number_from_monday() as u8,
        )
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        Ok(Self {
            year_minus_1900: buffer.read_u8(8)?,
            month: buffer.read_u8(8)?,
            day_of_month: buffer.read_u8(8)?,
            day_of_week: buffer.read_u8(8)?,
        })
    }

    pub fn year(&self) -> Option<u16> {
        (self.year_minus_1900 != UNSPECIFIED).then(|| 1900 + self.year_minus_1900 as u16)
    }

    pub fn is_wildcard_year(&self) -> bool {
        self.year_minus_1900 == UNSPECIFIED
    }

    pub fn is_wildcard_month(&self) -> bool {
        self.month == UNSPECIFIED
    }

    pub fn is_odd_month(&self) -> bool {
        self.month == Self::ODD_MONTHS
    }

    pub fn is_even_month(&self) -> bool {
        self.month == Self::EVEN_MONTHS
    }

    pub fn is_wildcard_day_of_month(&self) -> bool {
        self.day_of_month == UNSPECIFIED
    }

    pub fn is_last_day_of_month(&self) -> bool {
        self.day_of_month == Self::LAST_DAY_OF_MONTH
    }

    pub fn is_odd_day_of_month(&self) -> bool {
        self.day_of_month == Self::ODD_DAYS
    }

    pub fn is_even_day_of_month(&self) -> bool {
        self.day_of_month == Self::EVEN_DAYS
    }

    pub fn is_wildcard_day_of_week(&self) -> bool {
        self.day_of_week == UNSPECIFIED
    }

    /// Calendar date, when every field is concrete
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            self.year()? as i32,
            self.month as u32,
            self.day_of_month as u32,
        )
    }
}

impl Serializable for DatePayload {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.write_u8(8, self.year_minus_1900)?;
        buffer.write_u8(8, self.month)?;
        buffer.write_u8(8, self.day_of_month)?;
        buffer.write_u8(8, self.day_of_week)
    }

    fn length_in_bits(&self) -> u32 {
        32
    }
}

impl fmt::Display for DatePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |value: u8| {
            if value == UNSPECIFIED {
                "*".to_string()
            } else {
                value.to_string()
            }
        };
        match self.year() {
            Some(year) => write!(f, "{}", year)?,
            None => write!(f, "*")?,
        }
        write!(f, "-{}-{}", part(self.month), part(self.day_of_month))
    }
}

/// Time payload (clause 20.2.13); any octet may be the `0xFF` wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimePayload {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub fractional: u8,
}

impl TimePayload {
    pub fn new(hour: u8, minute: u8, second: u8, fractional: u8) -> Self {
        Self {
            hour,
            minute,
            second,
            fractional,
        }
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self::new(
            time.hour() as u8,
            time.minute() as u8,
            time.second() as u8,
            (time.nanosecond() / 10_000_000).min(99) as u8,
        )
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        Ok(Self {
            hour: buffer.read_u8(8)?,
            minute: buffer.read_u8(8)?,
            second: buffer.read_u8(8)?,
            fractional: buffer.read_u8(8)?,
        })
    }

    pub fn is_wildcard_hour(&self) -> bool {
        self.hour == UNSPECIFIED
    }

    pub fn is_wildcard_minute(&self) -> bool {
        self.minute == UNSPECIFIED
    }

    pub fn is_wildcard_second(&self) -> bool {
        self.second == UNSPECIFIED
    }

    pub fn is_wildcard_fractional(&self) -> bool {
        self.fractional == UNSPECIFIED
    }

    /// Wall-clock time; a wildcard hundredths octet counts as zero
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        let hundredths = if self.is_wildcard_fractional() {
            0
        } else {
            self.fractional as u32
        };
        NaiveTime::from_hms_milli_opt(
            self.hour as u32,
            self.minute as u32,
            self.second as u32,
            hundredths * 10,
        )
    }
}

impl Serializable for TimePayload {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.write_u8(8, self.hour)?;
        buffer.write_u8(8, self.minute)?;
        buffer.write_u8(8, self.second)?;
        buffer.write_u8(8, self.fractional)
    }

    fn length_in_bits(&self) -> u32 {
        32
    }
}

impl fmt::Display for TimePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_naive_time() {
            Some(time) => write!(f, "{}", time.format("%H:%M:%S%.3f")),
            None => write!(
                f,
                "{:02x}:{:02x}:{:02x}.{:02x}",
                self.hour, self.minute, self.second, self.fractional
            ),
        }
    }
}

/// Read a 10-bit object type and a 22-bit instance number
pub(crate) fn parse_object_identifier(buffer: &mut ReadBuffer) -> ParseResult<ObjectIdentifier> {
    let object_type = ObjectType::from(buffer.read_u16(10)?);
    let instance = buffer.read_u32(22)?;
    Ok(ObjectIdentifier::new(object_type, instance))
}

pub(crate) fn serialize_object_identifier(
    buffer: &mut WriteBuffer,
    identifier: &ObjectIdentifier,
) -> SerializeResult<()> {
    buffer.write_u16(10, u16::from(identifier.object_type))?;
    buffer.write_u32(22, identifier.instance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with<T>(bytes: &[u8], f: impl FnOnce(&mut ReadBuffer) -> ParseResult<T>) -> T {
        let mut buffer = ReadBuffer::new(bytes);
        let value = f(&mut buffer).unwrap();
        assert!(buffer.is_at_end());
        value
    }

    #[test]
    fn test_unsigned_widths() {
        assert_eq!(UnsignedIntegerPayload::new(0), UnsignedIntegerPayload::U8(0));
        assert_eq!(UnsignedIntegerPayload::new(0xFF).actual_length(), 1);
        assert_eq!(UnsignedIntegerPayload::new(0x100).actual_length(), 2);
        assert_eq!(UnsignedIntegerPayload::new(0xFF_FFFF).actual_length(), 3);
        assert_eq!(UnsignedIntegerPayload::new(1 << 32).actual_length(), 5);
        assert_eq!(UnsignedIntegerPayload::new(u64::MAX).actual_length(), 8);

        let value = parse_with(&[0x01, 0x00, 0x00], |b| UnsignedIntegerPayload::parse(b, 3));
        assert_eq!(value, UnsignedIntegerPayload::U24(0x10000));
        assert_eq!(value.to_bytes().unwrap(), vec![0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_integer_length_out_of_range() {
        let mut buffer = ReadBuffer::new(&[0u8; 9]);
        let err = UnsignedIntegerPayload::parse(&mut buffer, 9).unwrap_err();
        assert_eq!(err, ParseError::validation("unmapped integer length"));
        assert!(SignedIntegerPayload::parse(&mut buffer, 0).unwrap_err().is_validation());
    }

    #[test]
    fn test_signed_widths() {
        assert_eq!(SignedIntegerPayload::new(-1), SignedIntegerPayload::I8(-1));
        assert_eq!(SignedIntegerPayload::new(127).actual_length(), 1);
        assert_eq!(SignedIntegerPayload::new(128).actual_length(), 2);
        assert_eq!(SignedIntegerPayload::new(-129).actual_length(), 2);
        assert_eq!(SignedIntegerPayload::new(-8_388_608).actual_length(), 3);
        assert_eq!(SignedIntegerPayload::new(i64::MIN).actual_length(), 8);

        let value = parse_with(&[0xFF, 0x7F], |b| SignedIntegerPayload::parse(b, 2));
        assert_eq!(value.actual_value(), -129);
    }

    #[test]
    fn test_character_string_encodings() {
        let utf8 = CharacterStringPayload::utf8("Zone 1");
        assert_eq!(utf8.actual_length(), 7);
        assert_eq!(utf8.to_bytes().unwrap()[0], 0x00);

        let ucs2 = CharacterStringPayload::encode(CharacterEncoding::Ucs2, "Aé").unwrap();
        assert_eq!(ucs2.raw, vec![0x00, 0x41, 0x00, 0xE9]);
        assert_eq!(ucs2.value(), "Aé");

        let ucs4 = CharacterStringPayload::encode(CharacterEncoding::Ucs4, "€").unwrap();
        assert_eq!(ucs4.raw, vec![0x00, 0x00, 0x20, 0xAC]);
        assert_eq!(ucs4.value(), "€");

        let latin1 = CharacterStringPayload::encode(CharacterEncoding::IsoLatin1, "Grüße").unwrap();
        assert_eq!(latin1.raw, b"Gr\xFC\xDFe".to_vec());
        assert_eq!(latin1.value(), "Grüße");
        assert!(CharacterStringPayload::encode(CharacterEncoding::IsoLatin1, "€").is_err());
    }

    #[test]
    fn test_character_string_parse() {
        let bytes = [0x00, b'A', b'H', b'U'];
        let value = parse_with(&bytes, |b| CharacterStringPayload::parse(b, 4));
        assert_eq!(value.encoding, CharacterEncoding::Utf8);
        assert_eq!(value.to_string(), "AHU");

        let mut buffer = ReadBuffer::new(&[]);
        assert!(CharacterStringPayload::parse(&mut buffer, 0)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_unknown_character_set_keeps_bytes() {
        let bytes = [0x09, 0x41, 0x42];
        let value = parse_with(&bytes, |b| CharacterStringPayload::parse(b, 3));
        assert!(!value.encoding.is_known());
        assert_eq!(value.to_bytes().unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_bit_string() {
        let value = BitStringPayload::new(&[true, false, true, true]);
        assert_eq!(value.unused_bits, 4);
        assert_eq!(value.to_bytes().unwrap(), vec![0x04, 0xB0]);

        let parsed = parse_with(&[0x04, 0xB0], |b| BitStringPayload::parse(b, 2));
        assert_eq!(parsed, value);
        assert_eq!(parsed.bit(2), Some(true));

        let empty = BitStringPayload::new(&[]);
        assert_eq!(empty.to_bytes().unwrap(), vec![0x00]);
    }

    #[test]
    fn test_bit_string_rejects_bad_unused_count() {
        let mut buffer = ReadBuffer::new(&[0x08, 0x00]);
        assert!(BitStringPayload::parse(&mut buffer, 2)
            .unwrap_err()
            .is_validation());

        let mut buffer = ReadBuffer::new(&[0x03]);
        assert!(BitStringPayload::parse(&mut buffer, 1)
            .unwrap_err()
            .is_validation());

        let mut value = BitStringPayload::new(&[true]);
        value.unused.pop();
        assert!(value.to_bytes().is_err());
    }

    #[test]
    fn test_enumerated() {
        assert_eq!(EnumeratedPayload::new(0).data, vec![0x00]);
        assert_eq!(EnumeratedPayload::new(256).data, vec![0x01, 0x00]);

        // a padded encoding keeps its width
        let parsed = parse_with(&[0x00, 0x00, 0x01], |b| EnumeratedPayload::parse(b, 3));
        assert_eq!(parsed.actual_value(), 1);
        assert_eq!(parsed.to_bytes().unwrap(), vec![0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_date_wildcards() {
        let date = DatePayload {
            year_minus_1900: 0xFF,
            month: DatePayload::EVEN_MONTHS,
            day_of_month: DatePayload::LAST_DAY_OF_MONTH,
            day_of_week: 0xFF,
        };
        assert!(date.is_wildcard_year());
        assert!(date.is_even_month());
        assert!(date.is_last_day_of_month());
        assert!(date.is_wildcard_day_of_week());
        assert_eq!(date.year(), None);
        assert_eq!(date.to_naive_date(), None);
        assert_eq!(date.to_string(), "*-14-32");
    }

    #[test]
    fn test_date_from_chrono() {
        let date = DatePayload::from_naive_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(date.to_bytes().unwrap(), vec![124, 3, 15, 5]);
        assert_eq!(
            date.to_naive_date(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(DatePayload::new(None, 1, 1, 0xFF).year_minus_1900, UNSPECIFIED);
    }

    #[test]
    fn test_time() {
        let time = TimePayload::from_naive_time(NaiveTime::from_hms_milli_opt(13, 45, 30, 250).unwrap());
        assert_eq!(time.to_bytes().unwrap(), vec![13, 45, 30, 25]);
        assert_eq!(time.to_string(), "13:45:30.250");

        let any = TimePayload::new(0xFF, 0xFF, 0xFF, 0xFF);
        assert!(any.is_wildcard_hour());
        assert_eq!(any.to_naive_time(), None);
    }

    #[test]
    fn test_object_identifier_bits() {
        let bytes = [0x02, 0x00, 0x00, 0x05];
        let mut buffer = ReadBuffer::new(&bytes);
        let id = parse_object_identifier(&mut buffer).unwrap();
        assert_eq!(id, ObjectIdentifier::new(ObjectType::Device, 5));

        let mut writer = WriteBuffer::new();
        serialize_object_identifier(&mut writer, &id).unwrap();
        assert_eq!(writer.as_bytes(), &bytes);
    }
}
