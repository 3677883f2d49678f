//! Notification parameters and event parameters, both selected by the tag
//! number of their first element.

use crate::encoding::tagged::StatusFlagsTagged;
use crate::encoding::{
    read_optional, read_terminated_array, ApplicationTag, ApplicationValue, ClosingTag,
    ConstructedValue, ContextValue, DataType, Enclosed, OpeningTag, Serializable, TagClass,
    TagHeader,
};
use crate::error::{ParseError, ParseResult, SerializationError, SerializeResult};
use crate::io::{ReadBuffer, WriteBuffer};
use crate::object::{EventType, ObjectType, StatusFlags};
use crate::property::{expect_application, ConstructedData, DateTime, DateTimeEnclosed};
use crate::util::impl_serializable_sequence;
use log::trace;


/// A bit string at tag 0 or a REAL at tag 1
///
/// Change-of-value criteria of an enrollment and the changed value of a
/// change-of-value notification share this shape.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CovValue {
    Bits(ContextValue),
    Real(ContextValue),
}

impl CovValue {
    pub fn bits(bits: &[bool]) -> Self {
        Self::Bits(ContextValue::bit_string(0, bits))
    }

    pub fn real(value: f32) -> Self {
        Self::Real(ContextValue::real(1, value))
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let peeked = buffer.peek(TagHeader::parse)?;
        match peeked.actual_tag_number() {
            0 => Ok(Self::Bits(ContextValue::parse(buffer, 0, DataType::BitString)?)),
            1 => Ok(Self::Real(ContextValue::parse(buffer, 1, DataType::Real)?)),
            other => Err(ParseError::unsupported("CovValue", other)),
        }
    }
}

impl Serializable for CovValue {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        match self {
            Self::Bits(value) | Self::Real(value) => value.serialize(buffer),
        }
    }

    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Bits(value) | Self::Real(value) => value.length_in_bits(),
        }
    }
}

fn parse_status_flags(buffer: &mut ReadBuffer, tag_number: u8) -> ParseResult<StatusFlagsTagged> {
    StatusFlagsTagged::parse(buffer, tag_number, TagClass::ContextSpecific)
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeOfBitstringNotification {
    pub referenced_bitstring: ContextValue,
    pub status_flags: StatusFlagsTagged,
}

impl ChangeOfBitstringNotification {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let referenced_bitstring = ContextValue::parse(buffer, 0, DataType::BitString)?;
        let status_flags = parse_status_flags(buffer, 1)?;
        Ok(Self {
            referenced_bitstring,
            status_flags,
        })
    }
}

impl_serializable_sequence!(
    ChangeOfBitstringNotification,
    "ChangeOfBitstringNotification",
    [referenced_bitstring, status_flags]
);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeOfValueNotification {
    pub new_value: Enclosed<CovValue>,
    pub status_flags: StatusFlagsTagged,
}

impl ChangeOfValueNotification {
    pub fn new(new_value: CovValue, flags: StatusFlags) -> Self {
        Self {
            new_value: Enclosed::new(0, new_value),
            status_flags: StatusFlagsTagged::context(1, flags),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let new_value = Enclosed::parse(buffer, 0, CovValue::parse)?;
        let status_flags = parse_status_flags(buffer, 1)?;
        Ok(Self {
            new_value,
            status_flags,
        })
    }
}

impl_serializable_sequence!(
    ChangeOfValueNotification,
    "ChangeOfValueNotification",
    [new_value, status_flags]
);

/// Commanded and feedback values of the monitored object, schema-less
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandFailureNotification {
    pub command_value: ConstructedData,
    pub status_flags: StatusFlagsTagged,
    pub feedback_value: ConstructedData,
}

impl CommandFailureNotification {
    pub fn parse(buffer: &mut ReadBuffer, object_type: Option<ObjectType>) -> ParseResult<Self> {
        let command_value = ConstructedData::parse_unspecified(buffer, 0, object_type)?;
        let status_flags = parse_status_flags(buffer, 1)?;
        let feedback_value = ConstructedData::parse_unspecified(buffer, 2, object_type)?;
        Ok(Self {
            command_value,
            status_flags,
            feedback_value,
        })
    }
}

impl_serializable_sequence!(
    CommandFailureNotification,
    "CommandFailureNotification",
    [command_value, status_flags, feedback_value]
);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutOfRangeNotification {
    pub exceeding_value: ContextValue,
    pub status_flags: StatusFlagsTagged,
    pub deadband: ContextValue,
    pub exceeded_limit: ContextValue,
}

impl OutOfRangeNotification {
    pub fn new(exceeding_value: f32, flags: StatusFlags, deadband: f32, exceeded_limit: f32) -> Self {
        Self {
            exceeding_value: ContextValue::real(0, exceeding_value),
            status_flags: StatusFlagsTagged::context(1, flags),
            deadband: ContextValue::real(2, deadband),
            exceeded_limit: ContextValue::real(3, exceeded_limit),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let exceeding_value = ContextValue::parse(buffer, 0, DataType::Real)?;
        let status_flags = parse_status_flags(buffer, 1)?;
        let deadband = ContextValue::parse(buffer, 2, DataType::Real)?;
        let exceeded_limit = ContextValue::parse(buffer, 3, DataType::Real)?;
        Ok(Self {
            exceeding_value,
            status_flags,
            deadband,
            exceeded_limit,
        })
    }
}

impl_serializable_sequence!(
    OutOfRangeNotification,
    "OutOfRangeNotification",
    [exceeding_value, status_flags, deadband, exceeded_limit]
);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeOfStatusFlagsNotification {
    pub present_value: Option<ConstructedData>,
    pub referenced_flags: StatusFlagsTagged,
}

impl ChangeOfStatusFlagsNotification {
    pub fn parse(buffer: &mut ReadBuffer, object_type: Option<ObjectType>) -> ParseResult<Self> {
        let present_value = read_optional(buffer, |buffer| {
            ConstructedData::parse_unspecified(buffer, 0, object_type)
        })?;
        let referenced_flags = parse_status_flags(buffer, 1)?;
        Ok(Self {
            present_value,
            referenced_flags,
        })
    }
}

impl_serializable_sequence!(
    ChangeOfStatusFlagsNotification,
    "ChangeOfStatusFlagsNotification",
    [present_value, referenced_flags]
);

/// New value of a change-of-discrete-value notification
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiscreteValue {
    Boolean(ApplicationValue),
    Unsigned(ApplicationValue),
    Integer(ApplicationValue),
    Enumerated(ApplicationValue),
    CharacterString(ApplicationValue),
    OctetString(ApplicationValue),
    Date(ApplicationValue),
    Time(ApplicationValue),
    ObjectIdentifier(ApplicationValue),
    DateTime(DateTimeEnclosed),
}

impl DiscreteValue {
    /// Wrap an application value; types without a discrete variant are rejected
    pub fn primitive(value: ApplicationValue) -> ParseResult<Self> {
        let variant = match value.tag()? {
            ApplicationTag::Boolean => Self::Boolean,
            ApplicationTag::UnsignedInt => Self::Unsigned,
            ApplicationTag::SignedInt => Self::Integer,
            ApplicationTag::Enumerated => Self::Enumerated,
            ApplicationTag::CharacterString => Self::CharacterString,
            ApplicationTag::OctetString => Self::OctetString,
            ApplicationTag::Date => Self::Date,
            ApplicationTag::Time => Self::Time,
            ApplicationTag::ObjectIdentifier => Self::ObjectIdentifier,
            other => return Err(ParseError::unsupported("DiscreteValue", format!("{:?}", other))),
        };
        Ok(variant(value))
    }

    pub fn date_time(value: DateTime) -> Self {
        Self::DateTime(Enclosed::new(0, value))
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("DiscreteValue", |buffer| {
            let peeked = buffer.peek(TagHeader::parse)?;
            if peeked.is_application() {
                return Self::primitive(ApplicationValue::parse(buffer)?);
            }
            match peeked.actual_tag_number() {
                0 => Ok(Self::DateTime(Enclosed::parse(buffer, 0, DateTime::parse)?)),
                other => Err(ParseError::unsupported("DiscreteValue", other)),
            }
        })
    }

    fn inner(&self) -> &dyn Serializable {
        match self {
            Self::Boolean(value)
            | Self::Unsigned(value)
            | Self::Integer(value)
            | Self::Enumerated(value)
            | Self::CharacterString(value)
            | Self::OctetString(value)
            | Self::Date(value)
            | Self::Time(value)
            | Self::ObjectIdentifier(value) => value,
            Self::DateTime(value) => value,
        }
    }
}

impl Serializable for DiscreteValue {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        self.inner().serialize(buffer)
    }

    fn length_in_bits(&self) -> u32 {
        self.inner().length_in_bits()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeOfDiscreteValueNotification {
    pub new_value: Enclosed<DiscreteValue>,
    pub status_flags: StatusFlagsTagged,
}

impl ChangeOfDiscreteValueNotification {
    pub fn new(new_value: DiscreteValue, flags: StatusFlags) -> Self {
        Self {
            new_value: Enclosed::new(0, new_value),
            status_flags: StatusFlagsTagged::context(1, flags),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let new_value = Enclosed::parse(buffer, 0, DiscreteValue::parse)?;
        let status_flags = parse_status_flags(buffer, 1)?;
        Ok(Self {
            new_value,
            status_flags,
        })
    }
}

impl_serializable_sequence!(
    ChangeOfDiscreteValueNotification,
    "ChangeOfDiscreteValueNotification",
    [new_value, status_flags]
);

/// Event values, selected by the tag number after the outer opening tag
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NotificationParametersBody {
    ChangeOfBitstring(Enclosed<ChangeOfBitstringNotification>),
    /// Kept as received, new state and status flags included
    ChangeOfState(ConstructedValue),
    ChangeOfValue(Enclosed<ChangeOfValueNotification>),
    CommandFailure(Enclosed<CommandFailureNotification>),
    OutOfRange(Enclosed<OutOfRangeNotification>),
    ChangeOfStatusFlags(Enclosed<ChangeOfStatusFlagsNotification>),
    ChangeOfDiscreteValue(Enclosed<ChangeOfDiscreteValueNotification>),
}

impl NotificationParametersBody {
    pub fn change_of_value(value: ChangeOfValueNotification) -> Self {
        Self::ChangeOfValue(Enclosed::new(2, value))
    }

    pub fn out_of_range(value: OutOfRangeNotification) -> Self {
        Self::OutOfRange(Enclosed::new(5, value))
    }

    pub fn change_of_discrete_value(value: ChangeOfDiscreteValueNotification) -> Self {
        Self::ChangeOfDiscreteValue(Enclosed::new(21, value))
    }

    fn parse(buffer: &mut ReadBuffer, object_type: Option<ObjectType>) -> ParseResult<Self> {
        let peeked = buffer.peek(TagHeader::parse)?;
        trace!("NotificationParameters peeked {}", peeked);
        match peeked.actual_tag_number() {
            0 => Ok(Self::ChangeOfBitstring(Enclosed::parse(
                buffer,
                0,
                ChangeOfBitstringNotification::parse,
            )?)),
            1 => Ok(Self::ChangeOfState(ConstructedValue::parse(buffer, 1)?)),
            2 => Ok(Self::ChangeOfValue(Enclosed::parse(
                buffer,
                2,
                ChangeOfValueNotification::parse,
            )?)),
            3 => Ok(Self::CommandFailure(Enclosed::parse(buffer, 3, |buffer| {
                CommandFailureNotification::parse(buffer, object_type)
            })?)),
            5 => Ok(Self::OutOfRange(Enclosed::parse(
                buffer,
                5,
                OutOfRangeNotification::parse,
            )?)),
            18 => Ok(Self::ChangeOfStatusFlags(Enclosed::parse(buffer, 18, |buffer| {
                ChangeOfStatusFlagsNotification::parse(buffer, object_type)
            })?)),
            21 => Ok(Self::ChangeOfDiscreteValue(Enclosed::parse(
                buffer,
                21,
                ChangeOfDiscreteValueNotification::parse,
            )?)),
            other => Err(ParseError::unsupported("NotificationParameters", other)),
        }
    }

    /// Tag number the variant was selected by
    pub fn peeked_tag_number(&self) -> u8 {
        match self {
            Self::ChangeOfBitstring(value) => value.tag_number(),
            Self::ChangeOfState(value) => value.tag_number(),
            Self::ChangeOfValue(value) => value.tag_number(),
            Self::CommandFailure(value) => value.tag_number(),
            Self::OutOfRange(value) => value.tag_number(),
            Self::ChangeOfStatusFlags(value) => value.tag_number(),
            Self::ChangeOfDiscreteValue(value) => value.tag_number(),
        }
    }

    /// Event algorithm the values belong to
    pub fn event_type(&self) -> EventType {
        EventType::from(self.peeked_tag_number() as u32)
    }

    fn inner(&self) -> &dyn Serializable {
        match self {
            Self::ChangeOfBitstring(value) => value,
            Self::ChangeOfState(value) => value,
            Self::ChangeOfValue(value) => value,
            Self::CommandFailure(value) => value,
            Self::OutOfRange(value) => value,
            Self::ChangeOfStatusFlags(value) => value,
            Self::ChangeOfDiscreteValue(value) => value,
        }
    }
}

/// BACnetNotificationParameters between opening and closing tag `n`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NotificationParameters {
    pub opening_tag: OpeningTag,
    pub body: NotificationParametersBody,
    pub closing_tag: ClosingTag,
}

impl NotificationParameters {
    pub fn new(tag_number: u8, body: NotificationParametersBody) -> Self {
        Self {
            opening_tag: OpeningTag::new(tag_number),
            body,
            closing_tag: ClosingTag::new(tag_number),
        }
    }

    /// `object_type` types the abstract values of command-failure and
    /// change-of-status-flags notifications
    pub fn parse(
        buffer: &mut ReadBuffer,
        tag_number: u8,
        object_type: Option<ObjectType>,
    ) -> ParseResult<Self> {
        buffer.scoped("NotificationParameters", |buffer| {
            let opening_tag = OpeningTag::parse(buffer, tag_number)?;
            let body = NotificationParametersBody::parse(buffer, object_type)?;
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

    pub fn event_type(&self) -> EventType {
        self.body.event_type()
    }
}

impl Serializable for NotificationParameters {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("NotificationParameters", |buffer| {
            if self.opening_tag.tag_number() != self.closing_tag.tag_number() {
                return Err(SerializationError::invariant(format!(
                    "opening tag {} closed by tag {}",
                    self.opening_tag.tag_number(),
                    self.closing_tag.tag_number()
                )));
            }
            self.opening_tag.serialize(buffer)?;
            self.body.inner().serialize(buffer)?;
            self.closing_tag.serialize(buffer)
        })
    }

    fn length_in_bits(&self) -> u32 {
        self.opening_tag.length_in_bits()
            + self.body.inner().length_in_bits()
            + self.closing_tag.length_in_bits()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeOfBitstringParameters {
    pub time_delay: ContextValue,
    pub bitmask: ContextValue,
    pub list_of_bitstring_values: Enclosed<Vec<ApplicationValue>>,
}

impl ChangeOfBitstringParameters {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let time_delay = ContextValue::parse(buffer, 0, DataType::UnsignedInteger)?;
        let bitmask = ContextValue::parse(buffer, 1, DataType::BitString)?;
        let list_of_bitstring_values = Enclosed::parse(buffer, 2, |buffer| {
            read_terminated_array(buffer, 2, |buffer| {
                expect_application(buffer, ApplicationTag::BitString)
            })
        })?;
        Ok(Self {
            time_delay,
            bitmask,
            list_of_bitstring_values,
        })
    }
}

impl_serializable_sequence!(
    ChangeOfBitstringParameters,
    "ChangeOfBitstringParameters",
    [time_delay, bitmask, list_of_bitstring_values]
);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeOfValueParameters {
    pub time_delay: ContextValue,
    pub cov_criteria: Enclosed<CovValue>,
}

impl ChangeOfValueParameters {
    pub fn new(time_delay: u64, cov_criteria: CovValue) -> Self {
        Self {
            time_delay: ContextValue::unsigned(0, time_delay),
            cov_criteria: Enclosed::new(1, cov_criteria),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let time_delay = ContextValue::parse(buffer, 0, DataType::UnsignedInteger)?;
        let cov_criteria = Enclosed::parse(buffer, 1, CovValue::parse)?;
        Ok(Self {
            time_delay,
            cov_criteria,
        })
    }
}

impl_serializable_sequence!(
    ChangeOfValueParameters,
    "ChangeOfValueParameters",
    [time_delay, cov_criteria]
);

/// Time delay, low and high limit and an optional deadband
///
/// Shared by the range algorithms; they differ only in the types of the
/// limits and the deadband, and unsigned-range has no deadband at all.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeParameters {
    pub time_delay: ContextValue,
    pub low_limit: ContextValue,
    pub high_limit: ContextValue,
    pub deadband: Option<ContextValue>,
}

impl RangeParameters {
    pub fn new(
        time_delay: u64,
        low_limit: ContextValue,
        high_limit: ContextValue,
        deadband: Option<ContextValue>,
    ) -> Self {
        Self {
            time_delay: ContextValue::unsigned(0, time_delay),
            low_limit,
            high_limit,
            deadband,
        }
    }

    pub fn parse(
        buffer: &mut ReadBuffer,
        limit_type: DataType,
        deadband_type: Option<DataType>,
    ) -> ParseResult<Self> {
        let time_delay = ContextValue::parse(buffer, 0, DataType::UnsignedInteger)?;
        let low_limit = ContextValue::parse(buffer, 1, limit_type)?;
        let high_limit = ContextValue::parse(buffer, 2, limit_type)?;
        let deadband = match deadband_type {
            Some(data_type) => Some(ContextValue::parse(buffer, 3, data_type)?),
            None => None,
        };
        Ok(Self {
            time_delay,
            low_limit,
            high_limit,
            deadband,
        })
    }
}

impl_serializable_sequence!(
    RangeParameters,
    "RangeParameters",
    [time_delay, low_limit, high_limit, deadband]
);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferReadyParameters {
    pub notification_threshold: ContextValue,
    pub previous_notification_count: ContextValue,
}

impl BufferReadyParameters {
    pub fn new(threshold: u64, previous_count: u64) -> Self {
        Self {
            notification_threshold: ContextValue::unsigned(0, threshold),
            previous_notification_count: ContextValue::unsigned(1, previous_count),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let notification_threshold = ContextValue::parse(buffer, 0, DataType::UnsignedInteger)?;
        let previous_notification_count =
            ContextValue::parse(buffer, 1, DataType::UnsignedInteger)?;
        Ok(Self {
            notification_threshold,
            previous_notification_count,
        })
    }
}

impl_serializable_sequence!(
    BufferReadyParameters,
    "BufferReadyParameters",
    [notification_threshold, previous_notification_count]
);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeOfStatusFlagsParameters {
    pub time_delay: ContextValue,
    pub selected_flags: StatusFlagsTagged,
}

impl ChangeOfStatusFlagsParameters {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let time_delay = ContextValue::parse(buffer, 0, DataType::UnsignedInteger)?;
        let selected_flags = parse_status_flags(buffer, 1)?;
        Ok(Self {
            time_delay,
            selected_flags,
        })
    }
}

impl_serializable_sequence!(
    ChangeOfStatusFlagsParameters,
    "ChangeOfStatusFlagsParameters",
    [time_delay, selected_flags]
);

/// BACnetEventParameter
///
/// Every variant except `None` sits between its own opening and closing tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventParameter {
    ChangeOfBitstring(Enclosed<ChangeOfBitstringParameters>),
    ChangeOfValue(Enclosed<ChangeOfValueParameters>),
    /// REAL limits and deadband
    OutOfRange(Enclosed<RangeParameters>),
    BufferReady(Enclosed<BufferReadyParameters>),
    /// Unsigned limits, no deadband
    UnsignedRange(Enclosed<RangeParameters>),
    /// Double limits and deadband
    DoubleOutOfRange(Enclosed<RangeParameters>),
    /// Signed limits, unsigned deadband
    SignedOutOfRange(Enclosed<RangeParameters>),
    /// Unsigned limits and deadband
    UnsignedOutOfRange(Enclosed<RangeParameters>),
    ChangeOfStatusFlags(Enclosed<ChangeOfStatusFlagsParameters>),
    /// Context 20 null
    None(ContextValue),
}

impl EventParameter {
    pub fn none() -> Self {
        Self::None(ContextValue::null(20))
    }

    pub fn buffer_ready(threshold: u64, previous_count: u64) -> Self {
        Self::BufferReady(Enclosed::new(
            10,
            BufferReadyParameters::new(threshold, previous_count),
        ))
    }

    pub fn out_of_range(time_delay: u64, low: f32, high: f32, deadband: f32) -> Self {
        Self::OutOfRange(Enclosed::new(
            5,
            RangeParameters::new(
                time_delay,
                ContextValue::real(1, low),
                ContextValue::real(2, high),
                Some(ContextValue::real(3, deadband)),
            ),
        ))
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        use DataType::{Double, Real, SignedInteger, UnsignedInteger};

        buffer.scoped("EventParameter", |buffer| {
            let peeked = buffer.peek(TagHeader::parse)?;
            trace!("EventParameter peeked {}", peeked);
            let range = |buffer: &mut ReadBuffer, tag_number, limit, deadband| {
                Enclosed::parse(buffer, tag_number, |buffer| {
                    RangeParameters::parse(buffer, limit, deadband)
                })
            };
            match peeked.actual_tag_number() {
                0 => Ok(Self::ChangeOfBitstring(Enclosed::parse(
                    buffer,
                    0,
                    ChangeOfBitstringParameters::parse,
                )?)),
                2 => Ok(Self::ChangeOfValue(Enclosed::parse(
                    buffer,
                    2,
                    ChangeOfValueParameters::parse,
                )?)),
                5 => Ok(Self::OutOfRange(range(buffer, 5, Real, Some(Real))?)),
                10 => Ok(Self::BufferReady(Enclosed::parse(
                    buffer,
                    10,
                    BufferReadyParameters::parse,
                )?)),
                11 => Ok(Self::UnsignedRange(range(buffer, 11, UnsignedInteger, None)?)),
                14 => Ok(Self::DoubleOutOfRange(range(buffer, 14, Double, Some(Double))?)),
                15 => Ok(Self::SignedOutOfRange(range(
                    buffer,
                    15,
                    SignedInteger,
                    Some(UnsignedInteger),
                )?)),
                16 => Ok(Self::UnsignedOutOfRange(range(
                    buffer,
                    16,
                    UnsignedInteger,
                    Some(UnsignedInteger),
                )?)),
                18 => Ok(Self::ChangeOfStatusFlags(Enclosed::parse(
                    buffer,
                    18,
                    ChangeOfStatusFlagsParameters::parse,
                )?)),
                20 => Ok(Self::None(ContextValue::parse(buffer, 20, DataType::Null)?)),
                other => Err(ParseError::unsupported("EventParameter", other)),
            }
        })
    }

    /// Tag number the variant was selected by
    pub fn peeked_tag_number(&self) -> u8 {
        match self {
            Self::ChangeOfBitstring(value) => value.tag_number(),
            Self::ChangeOfValue(value) => value.tag_number(),
            Self::OutOfRange(value)
            | Self::UnsignedRange(value)
            | Self::DoubleOutOfRange(value)
            | Self::SignedOutOfRange(value)
            | Self::UnsignedOutOfRange(value) => value.tag_number(),
            Self::BufferReady(value) => value.tag_number(),
            Self::ChangeOfStatusFlags(value) => value.tag_number(),
            Self::None(value) => value.tag_number(),
        }
    }

    pub fn event_type(&self) -> EventType {
        EventType::from(self.peeked_tag_number() as u32)
    }

    fn inner(&self) -> &dyn Serializable {
        match self {
            Self::ChangeOfBitstring(value) => value,
            Self::ChangeOfValue(value) => value,
            Self::OutOfRange(value)
            | Self::UnsignedRange(value)
            | Self::DoubleOutOfRange(value)
            | Self::SignedOutOfRange(value)
            | Self::UnsignedOutOfRange(value) => value,
            Self::BufferReady(value) => value,
            Self::ChangeOfStatusFlags(value) => value,
            Self::None(value) => value,
        }
    }
}

impl Serializable for EventParameter {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("EventParameter", |buffer| self.inner().serialize(buffer))
    }

    fn length_in_bits(&self) -> u32 {
        self.inner().length_in_bits()
    }
}
