//! BACnet Event and Trend Log Module
//!
//! Discriminated families used by event enrollment, event notifications and
//! trend logs. Every family peeks the next tag header and picks its variant
//! from the tag number, so the variant a value decodes to is a property of
//! the wire data rather than of the caller. A tag number without a variant
//! fails with [`ParseError::UnsupportedCase`].
//!
//! # Overview
//!
//! - [`FaultParameter`] and [`FaultNormalValue`]: fault algorithm parameters
//! - [`NotificationParameters`]: event values of an event notification
//! - [`EventParameter`]: event algorithm parameters of an enrollment
//! - [`LogData`]: one datum of a multi-record trend log
//! - [`OptionalBinaryPV`]: a binary value that may be null
//!
//! # Example
//!
//! ```
//! use bacnet_codec::encoding::Serializable;
//! use bacnet_codec::event::EventParameter;
//! use bacnet_codec::io::ReadBuffer;
//!
//! // buffer-ready: notification threshold 10, previous count 0
//! let bytes = [0xAE, 0x09, 0x0A, 0x19, 0x00, 0xAF];
//! let mut buffer = ReadBuffer::new(&bytes);
//! let parameter = EventParameter::parse(&mut buffer).unwrap();
//! assert!(matches!(parameter, EventParameter::BufferReady(_)));
//! assert_eq!(parameter.peeked_tag_number(), 10);
//! assert_eq!(parameter.to_bytes().unwrap(), bytes.to_vec());
//! ```

mod notification;

pub use notification::*;

use crate::encoding::tagged::{
    BinaryPVTagged, ErrorClassTagged, ErrorCodeTagged, LifeSafetyModeTagged,
    LifeSafetyStateTagged, LogStatusTagged, VendorIdTagged,
};
use crate::encoding::{
    read_terminated_array, ApplicationTag, ApplicationValue, ClosingTag, ConstructedValue,
    ContextValue, DataType, Enclosed, EnumeratedPayload, OpeningTag, PrimitiveValue,
    Serializable, TagClass, TagHeader,
};
use crate::error::{ParseError, ParseResult, SerializationError, SerializeResult};
use crate::io::{ReadBuffer, WriteBuffer};
use crate::object::{BinaryPV, ErrorClass, ErrorCode, LogStatus};
use crate::property::{
    expect_application, DeviceObjectPropertyReference, DeviceObjectPropertyReferenceEnclosed,
};
use crate::util::impl_serializable_sequence;
use log::trace;


/// BACnetOptionalBinaryPV: application null or a binary value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionalBinaryPV {
    Null(ApplicationValue),
    Value(BinaryPVTagged),
}

impl OptionalBinaryPV {
    pub fn null() -> Self {
        Self::Null(ApplicationValue::null())
    }

    pub fn binary(value: BinaryPV) -> Self {
        Self::Value(BinaryPVTagged::application(value))
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("OptionalBinaryPV", |buffer| {
            let peeked = buffer.peek(TagHeader::parse)?;
            if peeked.is_application() && peeked.actual_tag_number() == ApplicationTag::Null as u8 {
                return Ok(Self::Null(ApplicationValue::parse(buffer)?));
            }
            Ok(Self::Value(BinaryPVTagged::parse(
                buffer,
                ApplicationTag::Enumerated as u8,
                TagClass::Application,
            )?))
        })
    }

    pub fn actual_value(&self) -> PrimitiveValue {
        match self {
            Self::Null(value) => value.value().clone(),
            Self::Value(value) => {
                PrimitiveValue::Enumerated(EnumeratedPayload::new(value.actual_value()))
            }
        }
    }
}

impl Serializable for OptionalBinaryPV {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        match self {
            Self::Null(value) => value.serialize(buffer),
            Self::Value(value) => value.serialize(buffer),
        }
    }

    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Null(value) => value.length_in_bits(),
            Self::Value(value) => value.length_in_bits(),
        }
    }
}

const NORMAL_VALUE_TAGS: [ApplicationTag; 4] = [
    ApplicationTag::Real,
    ApplicationTag::UnsignedInt,
    ApplicationTag::Double,
    ApplicationTag::SignedInt,
];

/// Minimum or maximum normal value of an out-of-range fault
///
/// One numeric application value between opening and closing tag `n`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultNormalValue {
    pub opening_tag: OpeningTag,
    pub value: ApplicationValue,
    pub closing_tag: ClosingTag,
}

impl FaultNormalValue {
    pub fn new(tag_number: u8, value: ApplicationValue) -> Self {
        Self {
            opening_tag: OpeningTag::new(tag_number),
            value,
            closing_tag: ClosingTag::new(tag_number),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer, tag_number: u8) -> ParseResult<Self> {
        buffer.scoped("FaultNormalValue", |buffer| {
            let opening_tag = OpeningTag::parse(buffer, tag_number)?;
            let peeked = buffer.peek(TagHeader::parse)?;
            if !peeked.is_application() {
                return Err(ParseError::validation("only application tags allowed"));
            }
            let tag = ApplicationTag::try_from(peeked.actual_tag_number())?;
            if !NORMAL_VALUE_TAGS.contains(&tag) {
                return Err(ParseError::unsupported("FaultNormalValue", format!("{:?}", tag)));
            }
            let value = ApplicationValue::parse(buffer)?;
            let closing_tag = ClosingTag::parse(buffer, tag_number)?;
            Ok(Self {
                opening_tag,
                value,
                closing_tag,
            })
        })
    }

    pub fn tag_number(&self) -> u8 {
        self.opening_tag.tag_number()
    }
}

impl Serializable for FaultNormalValue {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        match self.value.tag() {
            Ok(tag) if NORMAL_VALUE_TAGS.contains(&tag) => {}
            _ => {
                return Err(SerializationError::invariant(format!(
                    "{} is not a numeric normal value",
                    self.value.header()
                )))
            }
        }
        self.opening_tag.serialize(buffer)?;
        self.value.serialize(buffer)?;
        self.closing_tag.serialize(buffer)
    }

    fn length_in_bits(&self) -> u32 {
        self.opening_tag.length_in_bits()
            + self.value.length_in_bits()
            + self.closing_tag.length_in_bits()
    }
}

/// Fault values of the character string fault algorithm
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultCharacterString {
    pub list_of_fault_values: Enclosed<Vec<ApplicationValue>>,
}

impl FaultCharacterString {
    pub fn new(values: &[&str]) -> Self {
        let values = values
            .iter()
            .map(|value| ApplicationValue::character_string(value))
            .collect();
        Self {
            list_of_fault_values: Enclosed::new(0, values),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let list_of_fault_values = Enclosed::parse(buffer, 0, |buffer| {
            read_terminated_array(buffer, 0, |buffer| {
                expect_application(buffer, ApplicationTag::CharacterString)
            })
        })?;
        Ok(Self {
            list_of_fault_values,
        })
    }
}

impl_serializable_sequence!(
    FaultCharacterString,
    "FaultCharacterString",
    [list_of_fault_values]
);

/// Vendor-defined fault algorithm; the parameters are kept schema-less
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultExtended {
    pub vendor_id: VendorIdTagged,
    pub extended_fault_type: ContextValue,
    pub parameters: ConstructedValue,
}

impl FaultExtended {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let vendor_id = VendorIdTagged::parse(buffer, 0, TagClass::ContextSpecific)?;
        let extended_fault_type = ContextValue::parse(buffer, 1, DataType::UnsignedInteger)?;
        let parameters = ConstructedValue::parse(buffer, 2)?;
        Ok(Self {
            vendor_id,
            extended_fault_type,
            parameters,
        })
    }
}

impl_serializable_sequence!(
    FaultExtended,
    "FaultExtended",
    [vendor_id, extended_fault_type, parameters]
);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultLifeSafety {
    pub fault_values: Enclosed<Vec<LifeSafetyStateTagged>>,
    pub mode_values: Enclosed<Vec<LifeSafetyModeTagged>>,
    pub mode_property_reference: DeviceObjectPropertyReferenceEnclosed,
}

impl FaultLifeSafety {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let enumerated = ApplicationTag::Enumerated as u8;
        let fault_values = Enclosed::parse(buffer, 0, |buffer| {
            read_terminated_array(buffer, 0, |buffer| {
                LifeSafetyStateTagged::parse(buffer, enumerated, TagClass::Application)
            })
        })?;
        let mode_values = Enclosed::parse(buffer, 1, |buffer| {
            read_terminated_array(buffer, 1, |buffer| {
                LifeSafetyModeTagged::parse(buffer, enumerated, TagClass::Application)
            })
        })?;
        let mode_property_reference = parse_reference(buffer, 2)?;
        Ok(Self {
            fault_values,
            mode_values,
            mode_property_reference,
        })
    }
}

impl_serializable_sequence!(
    FaultLifeSafety,
    "FaultLifeSafety",
    [fault_values, mode_values, mode_property_reference]
);

/// Fault values of the state fault algorithm, as property states
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultState {
    pub fault_values: ConstructedValue,
}

impl FaultState {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        Ok(Self {
            fault_values: ConstructedValue::parse(buffer, 0)?,
        })
    }
}

impl_serializable_sequence!(FaultState, "FaultState", [fault_values]);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultStatusFlags {
    pub status_flags_reference: DeviceObjectPropertyReferenceEnclosed,
}

impl FaultStatusFlags {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        Ok(Self {
            status_flags_reference: parse_reference(buffer, 0)?,
        })
    }
}

impl_serializable_sequence!(FaultStatusFlags, "FaultStatusFlags", [status_flags_reference]);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultOutOfRange {
    pub min_normal_value: FaultNormalValue,
    pub max_normal_value: FaultNormalValue,
}

impl FaultOutOfRange {
    pub fn new(min: ApplicationValue, max: ApplicationValue) -> Self {
        Self {
            min_normal_value: FaultNormalValue::new(0, min),
            max_normal_value: FaultNormalValue::new(1, max),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let min_normal_value = FaultNormalValue::parse(buffer, 0)?;
        let max_normal_value = FaultNormalValue::parse(buffer, 1)?;
        Ok(Self {
            min_normal_value,
            max_normal_value,
        })
    }
}

impl_serializable_sequence!(
    FaultOutOfRange,
    "FaultOutOfRange",
    [min_normal_value, max_normal_value]
);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultListed {
    pub fault_list_reference: DeviceObjectPropertyReferenceEnclosed,
}

impl FaultListed {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        Ok(Self {
            fault_list_reference: parse_reference(buffer, 0)?,
        })
    }
}

impl_serializable_sequence!(FaultListed, "FaultListed", [fault_list_reference]);

fn parse_reference(
    buffer: &mut ReadBuffer,
    tag_number: u8,
) -> ParseResult<DeviceObjectPropertyReferenceEnclosed> {
    Enclosed::parse(buffer, tag_number, DeviceObjectPropertyReference::parse)
}

/// BACnetFaultParameter
///
/// Every variant except `None` sits between its own opening and closing tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaultParameter {
    /// Context 0 null
    None(ContextValue),
    CharacterString(Enclosed<FaultCharacterString>),
    Extended(Enclosed<FaultExtended>),
    LifeSafety(Enclosed<FaultLifeSafety>),
    State(Enclosed<FaultState>),
    StatusFlags(Enclosed<FaultStatusFlags>),
    OutOfRange(Enclosed<FaultOutOfRange>),
    Listed(Enclosed<FaultListed>),
}

impl FaultParameter {
    pub fn none() -> Self {
        Self::None(ContextValue::null(0))
    }

    pub fn character_string(values: &[&str]) -> Self {
        Self::CharacterString(Enclosed::new(1, FaultCharacterString::new(values)))
    }

    pub fn out_of_range(min: ApplicationValue, max: ApplicationValue) -> Self {
        Self::OutOfRange(Enclosed::new(6, FaultOutOfRange::new(min, max)))
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("FaultParameter", |buffer| {
            let peeked = buffer.peek(TagHeader::parse)?;
            trace!("FaultParameter peeked {}", peeked);
            match peeked.actual_tag_number() {
                0 => Ok(Self::None(ContextValue::parse(buffer, 0, DataType::Null)?)),
                1 => Ok(Self::CharacterString(Enclosed::parse(
                    buffer,
                    1,
                    FaultCharacterString::parse,
                )?)),
                2 => Ok(Self::Extended(Enclosed::parse(buffer, 2, FaultExtended::parse)?)),
                3 => Ok(Self::LifeSafety(Enclosed::parse(
                    buffer,
                    3,
                    FaultLifeSafety::parse,
                )?)),
                4 => Ok(Self::State(Enclosed::parse(buffer, 4, FaultState::parse)?)),
                5 => Ok(Self::StatusFlags(Enclosed::parse(
                    buffer,
                    5,
                    FaultStatusFlags::parse,
                )?)),
                6 => Ok(Self::OutOfRange(Enclosed::parse(
                    buffer,
                    6,
                    FaultOutOfRange::parse,
                )?)),
                7 => Ok(Self::Listed(Enclosed::parse(buffer, 7, FaultListed::parse)?)),
                other => Err(ParseError::unsupported("FaultParameter", other)),
            }
        })
    }

    /// Tag number the variant was selected by
    pub fn peeked_tag_number(&self) -> u8 {
        match self {
            Self::None(value) => value.tag_number(),
            Self::CharacterString(value) => value.tag_number(),
            Self::Extended(value) => value.tag_number(),
            Self::LifeSafety(value) => value.tag_number(),
            Self::State(value) => value.tag_number(),
            Self::StatusFlags(value) => value.tag_number(),
            Self::OutOfRange(value) => value.tag_number(),
            Self::Listed(value) => value.tag_number(),
        }
    }

    fn inner(&self) -> &dyn Serializable {
        match self {
            Self::None(value) => value,
            Self::CharacterString(value) => value,
            Self::Extended(value) => value,
            Self::LifeSafety(value) => value,
            Self::State(value) => value,
            Self::StatusFlags(value) => value,
            Self::OutOfRange(value) => value,
            Self::Listed(value) => value,
        }
    }
}

impl Serializable for FaultParameter {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("FaultParameter", |buffer| self.inner().serialize(buffer))
    }

    fn length_in_bits(&self) -> u32 {
        self.inner().length_in_bits()
    }
}

/// BACnetError as carried in a log record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorInfo {
    pub error_class: ErrorClassTagged,
    pub error_code: ErrorCodeTagged,
}

impl ErrorInfo {
    pub fn new(class: ErrorClass, code: ErrorCode) -> Self {
        Self {
            error_class: ErrorClassTagged::application(class),
            error_code: ErrorCodeTagged::application(code),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let enumerated = ApplicationTag::Enumerated as u8;
        let error_class = ErrorClassTagged::parse(buffer, enumerated, TagClass::Application)?;
        let error_code = ErrorCodeTagged::parse(buffer, enumerated, TagClass::Application)?;
        Ok(Self {
            error_class,
            error_code,
        })
    }
}

impl_serializable_sequence!(ErrorInfo, "ErrorInfo", [error_class, error_code]);

/// One entry of logged data, chosen by its context tag
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogDataEntry {
    BooleanValue(ContextValue),
    RealValue(ContextValue),
    EnumeratedValue(ContextValue),
    UnsignedValue(ContextValue),
    IntegerValue(ContextValue),
    BitStringValue(ContextValue),
    NullValue(ContextValue),
    Failure(Enclosed<ErrorInfo>),
    AnyValue(ConstructedValue),
}

impl LogDataEntry {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("LogDataEntry", |buffer| {
            let peeked = buffer.peek(TagHeader::parse)?;
            let tag_number = peeked.actual_tag_number();
            let primitive = |buffer: &mut ReadBuffer, data_type| {
                ContextValue::parse(buffer, tag_number, data_type)
            };
            match tag_number {
                0 => Ok(Self::BooleanValue(primitive(buffer, DataType::Boolean)?)),
                1 => Ok(Self::RealValue(primitive(buffer, DataType::Real)?)),
                2 => Ok(Self::EnumeratedValue(primitive(buffer, DataType::Enumerated)?)),
                3 => Ok(Self::UnsignedValue(primitive(buffer, DataType::UnsignedInteger)?)),
                4 => Ok(Self::IntegerValue(primitive(buffer, DataType::SignedInteger)?)),
                5 => Ok(Self::BitStringValue(primitive(buffer, DataType::BitString)?)),
                6 => Ok(Self::NullValue(primitive(buffer, DataType::Null)?)),
                7 => Ok(Self::Failure(Enclosed::parse(buffer, 7, ErrorInfo::parse)?)),
                8 => Ok(Self::AnyValue(ConstructedValue::parse(buffer, 8)?)),
                other => Err(ParseError::unsupported("LogDataEntry", other)),
            }
        })
    }

    fn inner(&self) -> &dyn Serializable {
        match self {
            Self::BooleanValue(value)
            | Self::RealValue(value)
            | Self::EnumeratedValue(value)
            | Self::UnsignedValue(value)
            | Self::IntegerValue(value)
            | Self::BitStringValue(value)
            | Self::NullValue(value) => value,
            Self::Failure(value) => value,
            Self::AnyValue(value) => value,
        }
    }
}

impl Serializable for LogDataEntry {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        self.inner().serialize(buffer)
    }

    fn length_in_bits(&self) -> u32 {
        self.inner().length_in_bits()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogDataBody {
    LogStatus(LogStatusTagged),
    LogData(Enclosed<Vec<LogDataEntry>>),
    /// Clock change in seconds, as a REAL
    TimeChange(ContextValue),
}

/// BACnetLogData between opening and closing tag `n`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogData {
    pub opening_tag: OpeningTag,
    pub body: LogDataBody,
    pub closing_tag: ClosingTag,
}

impl LogData {
    pub fn new(tag_number: u8, body: LogDataBody) -> Self {
        Self {
            opening_tag: OpeningTag::new(tag_number),
            body,
            closing_tag: ClosingTag::new(tag_number),
        }
    }

    pub fn log_status(tag_number: u8, status: LogStatus) -> Self {
        Self::new(tag_number, LogDataBody::LogStatus(LogStatusTagged::context(0, status)))
    }

    pub fn entries(tag_number: u8, entries: Vec<LogDataEntry>) -> Self {
        Self::new(tag_number, LogDataBody::LogData(Enclosed::new(1, entries)))
    }

    pub fn time_change(tag_number: u8, seconds: f32) -> Self {
        Self::new(tag_number, LogDataBody::TimeChange(ContextValue::real(2, seconds)))
    }

    pub fn parse(buffer: &mut ReadBuffer, tag_number: u8) -> ParseResult<Self> {
        buffer.scoped("LogData", |buffer| {
            let opening_tag = OpeningTag::parse(buffer, tag_number)?;
            let peeked = buffer.peek(TagHeader::parse)?;
            trace!("LogData peeked {}", peeked);
            let body = match peeked.actual_tag_number() {
                0 => LogDataBody::LogStatus(LogStatusTagged::parse(
                    buffer,
                    0,
                    TagClass::ContextSpecific,
                )?),
                1 => LogDataBody::LogData(Enclosed::parse(buffer, 1, |buffer| {
                    read_terminated_array(buffer, 1, LogDataEntry::parse)
                })?),
                2 => LogDataBody::TimeChange(ContextValue::parse(buffer, 2, DataType::Real)?),
                other => return Err(ParseError::unsupported("LogData", other)),
            };
            let closing_tag = ClosingTag::parse(buffer, tag_number)?;
            Ok(Self {
                opening_tag,
                body,
                closing_tag,
            })
        })
    }

    pub fn tag_number(&self) -> u8 {
        self.opening_tag.tag_number()
    }
}

impl Serializable for LogData {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("LogData", |buffer| {
            if self.opening_tag.tag_number() != self.closing_tag.tag_number() {
                return Err(SerializationError::invariant(format!(
                    "opening tag {} closed by tag {}",
                    self.opening_tag.tag_number(),
                    self.closing_tag.tag_number()
                )));
            }
            self.opening_tag.serialize(buffer)?;
            match &self.body {
                LogDataBody::LogStatus(value) => value.serialize(buffer)?,
                LogDataBody::LogData(value) => value.serialize(buffer)?,
                LogDataBody::TimeChange(value) => value.serialize(buffer)?,
            }
            self.closing_tag.serialize(buffer)
        })
    }

    fn length_in_bits(&self) -> u32 {
        let body = match &self.body {
            LogDataBody::LogStatus(value) => value.length_in_bits(),
            LogDataBody::LogData(value) => value.length_in_bits(),
            LogDataBody::TimeChange(value) => value.length_in_bits(),
        };
        self.opening_tag.length_in_bits() + body + self.closing_tag.length_in_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{
        LifeSafetyMode, LifeSafetyState, ObjectIdentifier, ObjectType, PropertyIdentifier,
    };

    fn bytes(text: &str) -> Vec<u8> {
        hex::decode(text).unwrap()
    }

    #[test]
    fn test_optional_binary_pv() {
        let mut buffer = ReadBuffer::new(&[0x00]);
        let value = OptionalBinaryPV::parse(&mut buffer).unwrap();
        assert_eq!(value, OptionalBinaryPV::null());
        assert_eq!(value.actual_value(), PrimitiveValue::Null);

        let mut buffer = ReadBuffer::new(&[0x91, 0x01]);
        let value = OptionalBinaryPV::parse(&mut buffer).unwrap();
        assert_eq!(value, OptionalBinaryPV::binary(BinaryPV::Active));
        assert_eq!(value.actual_value().as_enumerated(), Some(1));
        assert_eq!(value.to_bytes().unwrap(), vec![0x91, 0x01]);

        let mut buffer = ReadBuffer::new(&[0x21, 0x01]);
        assert!(OptionalBinaryPV::parse(&mut buffer).is_err());
    }

    #[test]
    fn test_fault_none_and_unknown() {
        let mut buffer = ReadBuffer::new(&[0x08]);
        let parameter = FaultParameter::parse(&mut buffer).unwrap();
        assert_eq!(parameter, FaultParameter::none());
        assert_eq!(parameter.peeked_tag_number(), 0);

        let mut buffer = ReadBuffer::new(&[0x8E, 0x8F]);
        assert!(matches!(
            FaultParameter::parse(&mut buffer),
            Err(ParseError::UnsupportedCase { .. })
        ));
    }

    #[test]
    fn test_fault_out_of_range() {
        let data = bytes("6E0E4442C800000F1E21051F6F");
        let mut buffer = ReadBuffer::new(&data);
        let parameter = FaultParameter::parse(&mut buffer).unwrap();
        assert_eq!(
            parameter,
            FaultParameter::out_of_range(ApplicationValue::real(100.0), ApplicationValue::unsigned(5))
        );
        assert_eq!(parameter.to_bytes().unwrap(), data);
    }

    #[test]
    fn test_fault_normal_value_tag_checks() {
        let data = bytes("0E09050F");
        let mut buffer = ReadBuffer::new(&data);
        assert!(FaultNormalValue::parse(&mut buffer, 0)
            .unwrap_err()
            .is_validation());

        let data = bytes("0E110F");
        let mut buffer = ReadBuffer::new(&data);
        assert!(matches!(
            FaultNormalValue::parse(&mut buffer, 0),
            Err(ParseError::UnsupportedCase { .. })
        ));

        let boolean = FaultNormalValue::new(0, ApplicationValue::boolean(true));
        assert!(boolean.to_bytes().is_err());
    }

    #[test]
    fn test_fault_character_string() {
        let parameter = FaultParameter::character_string(&["abc"]);
        let data = parameter.to_bytes().unwrap();
        assert_eq!(data, bytes("1E0E74006162630F1F"));

        let mut buffer = ReadBuffer::new(&data);
        assert_eq!(FaultParameter::parse(&mut buffer).unwrap(), parameter);

        let data = bytes("1E0E21010F1F");
        let mut buffer = ReadBuffer::new(&data);
        assert!(FaultParameter::parse(&mut buffer).unwrap_err().is_validation());
    }

    #[test]
    fn test_fault_status_flags_reference() {
        let data = bytes("5E0E0C0000000119550F5F");
        let mut buffer = ReadBuffer::new(&data);
        match FaultParameter::parse(&mut buffer).unwrap() {
            FaultParameter::StatusFlags(value) => {
                let reference = &value.value.status_flags_reference.value;
                assert_eq!(
                    reference.object(),
                    Some(ObjectIdentifier::new(ObjectType::AnalogInput, 1))
                );
                assert_eq!(value.to_bytes().unwrap(), data);
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_fault_life_safety() {
        let value = FaultLifeSafety {
            fault_values: Enclosed::new(
                0,
                vec![LifeSafetyStateTagged::application(LifeSafetyState::Fault)],
            ),
            mode_values: Enclosed::new(
                1,
                vec![LifeSafetyModeTagged::application(LifeSafetyMode::On)],
            ),
            mode_property_reference: Enclosed::new(
                2,
                DeviceObjectPropertyReference::new(
                    ObjectIdentifier::new(ObjectType::LifeSafetyPoint, 1),
                    PropertyIdentifier::PresentValue,
                    None,
                    None,
                ),
            ),
        };
        let parameter = FaultParameter::LifeSafety(Enclosed::new(3, value));
        let data = parameter.to_bytes().unwrap();
        assert_eq!(&data[..7], &bytes("3E0E91030F1E91")[..]);

        let mut buffer = ReadBuffer::new(&data);
        assert_eq!(FaultParameter::parse(&mut buffer).unwrap(), parameter);
    }

    #[test]
    fn test_log_data_status() {
        let data = bytes("0E0A05400F");
        let mut buffer = ReadBuffer::new(&data);
        let value = LogData::parse(&mut buffer, 0).unwrap();
        assert_eq!(value, LogData::log_status(0, LogStatus::BUFFER_PURGED));
        assert_eq!(value.to_bytes().unwrap(), data);
    }

    #[test]
    fn test_log_data_entries() {
        let data = bytes("0E1E1C42C800003907687E910291207F1F0F");
        let mut buffer = ReadBuffer::new(&data);
        let value = LogData::parse(&mut buffer, 0).unwrap();
        let expected = LogData::entries(
            0,
            vec![
                LogDataEntry::RealValue(ContextValue::real(1, 100.0)),
                LogDataEntry::UnsignedValue(ContextValue::unsigned(3, 7)),
                LogDataEntry::NullValue(ContextValue::null(6)),
                LogDataEntry::Failure(Enclosed::new(
                    7,
                    ErrorInfo::new(ErrorClass::Property, ErrorCode::UnknownProperty),
                )),
            ],
        );
        assert_eq!(value, expected);
        assert_eq!(expected.to_bytes().unwrap(), data);
    }

    #[test]
    fn test_log_data_time_change_and_unknown() {
        let data = bytes("0E2C3F8000000F");
        let mut buffer = ReadBuffer::new(&data);
        assert_eq!(LogData::parse(&mut buffer, 0).unwrap(), LogData::time_change(0, 1.0));

        let data = bytes("0E39000F");
        let mut buffer = ReadBuffer::new(&data);
        assert!(matches!(
            LogData::parse(&mut buffer, 0),
            Err(ParseError::UnsupportedCase { .. })
        ));
    }
}
