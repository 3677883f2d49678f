//! Opening/closing tags and the helpers every constructed type is built from.
//!
//! A constructed value is bracketed by an opening tag (LVT 6) and a closing
//! tag (LVT 7) with the same context tag number. Lists inside it run until
//! the matching closing tag; [`is_closing_tag`] answers that question without
//! consuming input.

use super::application::ApplicationValue;
use super::context::ContextValue;
use super::header::{TagClass, TagHeader, CLOSING_TAG, OPENING_TAG};
use super::value::DataType;
use super::Serializable;
use crate::config::CodecConfig;
use crate::error::{ParseError, ParseResult, SerializationError, SerializeResult};
use crate::io::{ReadBuffer, WriteBuffer};
use log::debug;
use std::fmt;


macro_rules! define_marker_tag {
    ($(#[$doc:meta])* $name:ident, $lvt:expr, $constructor:ident, $what:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            pub header: TagHeader,
        }

        impl $name {
            pub fn new(tag_number: u8) -> Self {
                Self {
                    header: TagHeader::$constructor(tag_number),
                }
            }

            pub fn parse(buffer: &mut ReadBuffer, tag_number: u8) -> ParseResult<Self> {
                buffer.scoped(stringify!($name), |buffer| {
                    let header = TagHeader::parse(buffer)?;
                    if header.actual_tag_number() != tag_number {
                        return Err(ParseError::mismatch("tagNumber", "tagnumber doesn't match"));
                    }
                    if header.tag_class != TagClass::ContextSpecific {
                        return Err(ParseError::validation("should be a context tag"));
                    }
                    if header.length_value_type != $lvt {
                        return Err(ParseError::mismatch(
                            "lengthValueType",
                            concat!($what, " tag should have a value of ", stringify!($lvt)),
                        ));
                    }
                    Ok(Self { header })
                })
            }

            pub fn tag_number(&self) -> u8 {
                self.header.actual_tag_number()
            }
        }

        impl Serializable for $name {
            fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
                if !self.header.is_context() || self.header.length_value_type != $lvt {
                    return Err(SerializationError::invariant(format!(
                        "{} is not an {} tag",
                        self.header, $what
                    )));
                }
                self.header.serialize(buffer)
            }

            fn length_in_bits(&self) -> u32 {
                self.header.length_in_bits()
            }
        }
    };
}

define_marker_tag!(
    /// Opening tag of a constructed value
    OpeningTag, 6, opening, "opening"
);
define_marker_tag!(
    /// Closing tag of a constructed value
    ClosingTag, 7, closing, "closing"
);

/// Whether the next header is the closing tag `expected_tag_number`
///
/// Never consumes input. A header that cannot be read (end of data included)
/// counts as terminated, so the caller's closing tag parse reports the real
/// error. `instant_terminate` short-circuits to `true`.
pub fn is_closing_tag(
    buffer: &mut ReadBuffer,
    instant_terminate: bool,
    expected_tag_number: u8,
) -> bool {
    if instant_terminate {
        return true;
    }
    match buffer.peek(TagHeader::parse) {
        Ok(header) => {
            header.is_context()
                && header.actual_tag_number() == expected_tag_number
                && header.length_value_type == CLOSING_TAG
        }
        Err(_) => true,
    }
}

/// Read elements until closing tag `tag_number` is next; the closing tag itself stays unread
pub fn read_terminated_array<T>(
    buffer: &mut ReadBuffer,
    tag_number: u8,
    mut parse_element: impl FnMut(&mut ReadBuffer) -> ParseResult<T>,
) -> ParseResult<Vec<T>> {
    let limit = buffer.config().max_array_elements;
    let mut items = Vec::new();
    while !is_closing_tag(buffer, false, tag_number) {
        if items.len() >= limit {
            return Err(ParseError::validation(format!(
                "list exceeds the configured maximum of {} elements",
                limit
            )));
        }
        items.push(parse_element(buffer)?);
    }
    Ok(items)
}

/// Read exactly `count` elements
pub fn read_count_array<T>(
    buffer: &mut ReadBuffer,
    count: u64,
    mut parse_element: impl FnMut(&mut ReadBuffer) -> ParseResult<T>,
) -> ParseResult<Vec<T>> {
    let limit = buffer.config().max_array_elements;
    if count > limit as u64 {
        return Err(ParseError::validation(format!(
            "array of {} elements exceeds the configured maximum of {}",
            count, limit
        )));
    }
    (0..count).map(|_| parse_element(buffer)).collect()
}

/// Parse an implicitly optional field
///
/// An assertion mismatch or end of data means "absent": the cursor is
/// rewound and `None` returned. Every other error propagates.
pub fn read_optional<T>(
    buffer: &mut ReadBuffer,
    parse: impl FnOnce(&mut ReadBuffer) -> ParseResult<T>,
) -> ParseResult<Option<T>> {
    let start = buffer.pos();
    match parse(buffer) {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_absence() => {
            debug!(
                "optional field absent at bit {} in '{}': {}",
                start,
                buffer.context_path(),
                err
            );
            buffer.reset(start);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Check a fixed-size array read without an array index
pub(crate) fn check_cardinality(
    config: &CodecConfig,
    field: &str,
    actual: usize,
    expected: usize,
    has_array_index: bool,
) -> ParseResult<()> {
    if has_array_index || !config.validate_cardinality || actual == expected {
        return Ok(());
    }
    Err(ParseError::validation(format!(
        "{} should have exactly {} values",
        field, expected
    )))
}

/// A single structured value bracketed by opening and closing tag `n`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enclosed<T> {
    pub opening_tag: OpeningTag,
    pub value: T,
    pub closing_tag: ClosingTag,
}

impl<T> Enclosed<T> {
    pub fn new(tag_number: u8, value: T) -> Self {
        Self {
            opening_tag: OpeningTag::new(tag_number),
            value,
            closing_tag: ClosingTag::new(tag_number),
        }
    }

    pub fn parse(
        buffer: &mut ReadBuffer,
        tag_number: u8,
        parse_value: impl FnOnce(&mut ReadBuffer) -> ParseResult<T>,
    ) -> ParseResult<Self> {
        let opening_tag = OpeningTag::parse(buffer, tag_number)?;
        let value = parse_value(buffer)?;
        let closing_tag = ClosingTag::parse(buffer, tag_number)?;
        Ok(Self {
            opening_tag,
            value,
            closing_tag,
        })
    }

    pub fn tag_number(&self) -> u8 {
        self.opening_tag.tag_number()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Serializable> Serializable for Enclosed<T> {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        if self.opening_tag.tag_number() != self.closing_tag.tag_number() {
            return Err(SerializationError::invariant(format!(
                "opening tag {} closed by tag {}",
                self.opening_tag.tag_number(),
                self.closing_tag.tag_number()
            )));
        }
        self.opening_tag.serialize(buffer)?;
        self.value.serialize(buffer)?;
        self.closing_tag.serialize(buffer)
    }

    fn length_in_bits(&self) -> u32 {
        self.opening_tag.length_in_bits() + self.value.length_in_bits() + self.closing_tag.length_in_bits()
    }
}

/// One element of a schema-less constructed value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstructedElement {
    Application(ApplicationValue),
    /// Primitive context tag, kept as raw octets
    Context(ContextValue),
    Constructed(ConstructedValue),
}

impl ConstructedElement {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let header = buffer.peek(TagHeader::parse)?;
        let tag_number = header.actual_tag_number();
        match (header.tag_class, header.length_value_type) {
            (TagClass::Application, _) => Ok(Self::Application(ApplicationValue::parse(buffer)?)),
            (TagClass::ContextSpecific, OPENING_TAG) => {
                Ok(Self::Constructed(ConstructedValue::parse(buffer, tag_number)?))
            }
            (TagClass::ContextSpecific, CLOSING_TAG) => Err(ParseError::validation(format!(
                "unbalanced closing tag {} in '{}'",
                tag_number,
                buffer.context_path()
            ))),
            (TagClass::ContextSpecific, _) => Ok(Self::Context(ContextValue::parse(
                buffer,
                tag_number,
                DataType::Unknown,
            )?)),
        }
    }
}

impl Serializable for ConstructedElement {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        match self {
            Self::Application(value) => value.serialize(buffer),
            Self::Context(value) => value.serialize(buffer),
            Self::Constructed(value) => value.serialize(buffer),
        }
    }

    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Application(value) => value.length_in_bits(),
            Self::Context(value) => value.length_in_bits(),
            Self::Constructed(value) => value.length_in_bits(),
        }
    }
}

/// A constructed value whose structure is not known in advance
///
/// Used for proprietary properties and for abstract-syntax positions that
/// may carry anything. Context primitives are kept as raw octets; nested
/// opening tags recurse, bounded by the configured nesting depth.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructedValue {
    pub opening_tag: OpeningTag,
    elements: Vec<ConstructedElement>,
    pub closing_tag: ClosingTag,
}

impl ConstructedValue {
    pub fn new(tag_number: u8, elements: Vec<ConstructedElement>) -> Self {
        Self {
            opening_tag: OpeningTag::new(tag_number),
            elements,
            closing_tag: ClosingTag::new(tag_number),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer, tag_number: u8) -> ParseResult<Self> {
        buffer.scoped("ConstructedValue", |buffer| {
            let opening_tag = OpeningTag::parse(buffer, tag_number)?;
            let elements = read_terminated_array(buffer, tag_number, ConstructedElement::parse)?;
            let closing_tag = ClosingTag::parse(buffer, tag_number)?;
            Ok(Self {
                opening_tag,
                elements,
                closing_tag,
            })
        })
    }

    pub fn tag_number(&self) -> u8 {
        self.opening_tag.tag_number()
    }

    pub fn elements(&self) -> &[ConstructedElement] {
        &self.elements
    }
}

impl Serializable for ConstructedValue {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("ConstructedValue", |buffer| {
            if self.opening_tag.tag_number() != self.closing_tag.tag_number() {
                return Err(SerializationError::invariant(format!(
                    "opening tag {} closed by tag {}",
                    self.opening_tag.tag_number(),
                    self.closing_tag.tag_number()
                )));
            }
            self.opening_tag.serialize(buffer)?;
            self.elements.serialize(buffer)?;
            self.closing_tag.serialize(buffer)
        })
    }

    fn length_in_bits(&self) -> u32 {
        self.opening_tag.length_in_bits()
            + self.elements.length_in_bits()
            + self.closing_tag.length_in_bits()
    }
}

impl fmt::Display for ConstructedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}:", self.tag_number())?;
        for element in &self.elements {
            match element {
                ConstructedElement::Application(value) => write!(f, " {}", value)?,
                ConstructedElement::Context(value) => write!(f, " {}", value)?,
                ConstructedElement::Constructed(value) => write!(f, " {}", value)?,
            }
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_and_closing_tags() {
        let mut buffer = ReadBuffer::new(&[0x3E, 0x3F]);
        assert_eq!(OpeningTag::parse(&mut buffer, 3).unwrap(), OpeningTag::new(3));
        assert_eq!(ClosingTag::parse(&mut buffer, 3).unwrap(), ClosingTag::new(3));

        let mut buffer = ReadBuffer::new(&[0x3E]);
        assert!(ClosingTag::parse(&mut buffer, 3).unwrap_err().is_absence());
        let mut buffer = ReadBuffer::new(&[0x2E]);
        assert!(OpeningTag::parse(&mut buffer, 3).unwrap_err().is_absence());
    }

    #[test]
    fn test_is_closing_tag_never_consumes() {
        let mut buffer = ReadBuffer::new(&[0x3F]);
        assert!(is_closing_tag(&mut buffer, false, 3));
        assert!(!is_closing_tag(&mut buffer, false, 2));
        assert_eq!(buffer.pos(), 0);

        let mut buffer = ReadBuffer::new(&[0x3E]);
        assert!(!is_closing_tag(&mut buffer, false, 3));
        assert!(is_closing_tag(&mut buffer, true, 3));

        let mut empty = ReadBuffer::new(&[]);
        assert!(is_closing_tag(&mut empty, false, 0));
    }

    #[test]
    fn test_closing_tag_with_extended_number() {
        let mut buffer = ReadBuffer::new(&[0xFF, 20]);
        assert!(is_closing_tag(&mut buffer, false, 20));
        assert!(!is_closing_tag(&mut buffer, false, 15));
    }

    #[test]
    fn test_enclosed_value() {
        let bytes = [0x2E, 0x44, 0x42, 0x90, 0x00, 0x00, 0x2F];
        let mut buffer = ReadBuffer::new(&bytes);
        let enclosed = Enclosed::parse(&mut buffer, 2, ApplicationValue::parse).unwrap();
        assert_eq!(enclosed.value.value().as_real(), Some(72.0));
        assert_eq!(enclosed.to_bytes().unwrap(), bytes.to_vec());
        assert_eq!(Enclosed::new(2, ApplicationValue::real(72.0)), enclosed);

        let mut buffer = ReadBuffer::new(&bytes);
        assert!(Enclosed::parse(&mut buffer, 1, ApplicationValue::parse)
            .unwrap_err()
            .is_absence());
    }

    #[test]
    fn test_terminated_array() {
        let bytes = [0x21, 0x01, 0x21, 0x02, 0x1F];
        let mut buffer = ReadBuffer::new(&bytes);
        let items = read_terminated_array(&mut buffer, 1, ApplicationValue::parse).unwrap();
        assert_eq!(items.len(), 2);
        assert!(ClosingTag::parse(&mut buffer, 1).is_ok());
    }

    #[test]
    fn test_terminated_array_limit() {
        let bytes = [0x21, 0x01, 0x21, 0x02, 0x21, 0x03, 0x1F];
        let config = CodecConfig::default().with_max_array_elements(2);
        let mut buffer = ReadBuffer::with_config(&bytes, config);
        let err = read_terminated_array(&mut buffer, 1, ApplicationValue::parse).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_count_array() {
        let bytes = [0x21, 0x01, 0x21, 0x02];
        let mut buffer = ReadBuffer::new(&bytes);
        let items = read_count_array(&mut buffer, 2, ApplicationValue::parse).unwrap();
        assert_eq!(items[1].value().as_unsigned(), Some(2));

        let mut buffer = ReadBuffer::new(&bytes);
        assert!(read_count_array(&mut buffer, 3, ApplicationValue::parse).is_err());
    }

    #[test]
    fn test_read_optional_rewinds() {
        let bytes = [0x29, 0x05];
        let mut buffer = ReadBuffer::new(&bytes);
        let absent = read_optional(&mut buffer, |b| {
            ContextValue::parse(b, 1, DataType::UnsignedInteger)
        })
        .unwrap();
        assert!(absent.is_none());
        assert_eq!(buffer.pos(), 0);

        let present = read_optional(&mut buffer, |b| {
            ContextValue::parse(b, 2, DataType::UnsignedInteger)
        })
        .unwrap();
        assert_eq!(present.unwrap().value().as_unsigned(), Some(5));

        let mut empty = ReadBuffer::new(&[]);
        let eof = read_optional(&mut empty, ApplicationValue::parse).unwrap();
        assert!(eof.is_none());
    }

    #[test]
    fn test_read_optional_propagates_validation() {
        let mut buffer = ReadBuffer::new(&[0x21, 0x05]);
        let err = read_optional(&mut buffer, |b| {
            ContextValue::parse(b, 2, DataType::UnsignedInteger)
        })
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_cardinality() {
        let strict = CodecConfig::default();
        assert!(check_cardinality(&strict, "priorityArray", 16, 16, false).is_ok());
        assert!(check_cardinality(&strict, "priorityArray", 15, 16, false)
            .unwrap_err()
            .is_validation());
        assert!(check_cardinality(&strict, "priorityArray", 1, 16, true).is_ok());

        let lenient = strict.with_cardinality_validation(false);
        assert!(check_cardinality(&lenient, "priorityArray", 15, 16, false).is_ok());
    }

    #[test]
    fn test_schema_less_constructed_value() {
        // {3: 42 [0]0x01 {1: true } }
        let bytes = [0x3E, 0x21, 0x2A, 0x09, 0x01, 0x1E, 0x11, 0x1F, 0x3F];
        let mut buffer = ReadBuffer::new(&bytes);
        let value = ConstructedValue::parse(&mut buffer, 3).unwrap();
        assert_eq!(value.elements().len(), 3);
        assert!(matches!(
            value.elements()[2],
            ConstructedElement::Constructed(_)
        ));
        assert_eq!(value.length_in_bytes() as usize, bytes.len());
        assert_eq!(value.to_bytes().unwrap(), bytes.to_vec());
        assert_eq!(value.to_string(), "{3: 42 [0] raw 0x01 {1: true } }");
    }

    #[test]
    fn test_unbalanced_closing_tag() {
        let bytes = [0x3E, 0x2F, 0x3F];
        let mut buffer = ReadBuffer::new(&bytes);
        assert!(ConstructedValue::parse(&mut buffer, 3)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_nesting_limit() {
        let bytes = [0x0E, 0x0E, 0x0E, 0x0F, 0x0F, 0x0F];
        let config = CodecConfig::default().with_max_nesting_depth(4);
        let mut buffer = ReadBuffer::with_config(&bytes, config);
        assert!(matches!(
            ConstructedValue::parse(&mut buffer, 0),
            Err(ParseError::NestingTooDeep { .. })
        ));

        let mut buffer = ReadBuffer::new(&bytes);
        assert!(ConstructedValue::parse(&mut buffer, 0).is_ok());
    }
}
