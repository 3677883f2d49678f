//! BACnet Application Layer Services
//!
//! Service requests and acknowledgements as they appear inside an APDU. Every
//! service starts with a one-octet service choice followed by the service
//! parameters, and the length of the whole thing comes from the enclosing
//! PDU. That length only bounds the parameters: a service parses exactly the
//! octets it was given, and octets left over after the last parameter are a
//! validation failure.
//!
//! # Overview
//!
//! Three families are keyed by the service choice:
//!
//! - [`ConfirmedServiceRequest`]: SubscribeCOV, ReadProperty, WriteProperty,
//!   ConfirmedPrivateTransfer and ConfirmedTextMessage
//! - [`ServiceAck`]: GetEnrollmentSummary, AtomicReadFile, ReadProperty and
//!   ConfirmedPrivateTransfer
//! - [`UnconfirmedServiceRequest`]: I-Am, Who-Is and WriteGroup
//!
//! Any other choice fails with [`ParseError::UnsupportedCase`], even when the
//! choice names a service BACnet defines.
//!
//! Property values carried by ReadProperty and WriteProperty are decoded with
//! [`ConstructedData`], using the object type and property identifier parsed
//! just before them to pick the schema.
//!
//! # Example
//!
//! ```
//! use bacnet_codec::encoding::Serializable;
//! use bacnet_codec::io::ReadBuffer;
//! use bacnet_codec::service::{ConfirmedServiceChoice, ConfirmedServiceRequest};
//!
//! // ReadProperty analog-value,1 present-value
//! let bytes = [0x0C, 0x0C, 0x00, 0x80, 0x00, 0x01, 0x19, 0x55];
//! let mut buffer = ReadBuffer::new(&bytes);
//! let request = ConfirmedServiceRequest::parse(&mut buffer, bytes.len()).unwrap();
//! assert_eq!(request.service_choice(), ConfirmedServiceChoice::ReadProperty);
//! assert_eq!(request.to_bytes().unwrap(), bytes.to_vec());
//! ```

use crate::encoding::tagged::{
    EventStateTagged, EventTypeTagged, MessagePriorityTagged, PropertyIdentifierTagged,
    SegmentationTagged, VendorIdTagged,
};
use crate::encoding::{
    read_count_array, read_optional, read_terminated_array, ApplicationTag, ApplicationValue,
    ContextValue, DataType, Enclosed, PrimitiveValue, Serializable, TagClass, TagHeader,
    UnsignedIntegerPayload,
};
use crate::error::{ParseError, ParseResult, SerializationError, SerializeResult};
use crate::io::{ReadBuffer, WriteBuffer};
use crate::object::{
    EventState, EventType, MessagePriority, ObjectIdentifier, PropertyIdentifier, Segmentation,
    VendorId,
};
use crate::property::{expect_application, ConstructedData, LightingCommand};
use crate::util::impl_serializable_sequence;
use log::trace;


/// Confirmed service choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ConfirmedServiceChoice {
    // Alarm and Event Services
    AcknowledgeAlarm = 0,
    ConfirmedCOVNotification = 1,
    ConfirmedEventNotification = 2,
    GetAlarmSummary = 3,
    GetEnrollmentSummary = 4,
    SubscribeCOV = 5,
    LifeSafetyOperation = 27,
    SubscribeCOVProperty = 28,
    GetEventInformation = 29,

    // File Access Services
    AtomicReadFile = 6,
    AtomicWriteFile = 7,

    // Object Access Services
    AddListElement = 8,
    RemoveListElement = 9,
    CreateObject = 10,
    DeleteObject = 11,
    ReadProperty = 12,
    ReadPropertyMultiple = 14,
    WriteProperty = 15,
    WritePropertyMultiple = 16,
    ReadRange = 26,

    // Remote Device Management Services
    DeviceCommunicationControl = 17,
    ConfirmedPrivateTransfer = 18,
    ConfirmedTextMessage = 19,
    ReinitializeDevice = 20,

    // Virtual Terminal Services
    VtOpen = 21,
    VtClose = 22,
    VtData = 23,
}

impl TryFrom<u8> for ConfirmedServiceChoice {
    type Error = ParseError;

    fn try_from(value: u8) -> ParseResult<Self> {
        match value {
            0 => Ok(Self::AcknowledgeAlarm),
            1 => Ok(Self::ConfirmedCOVNotification),
            2 => Ok(Self::ConfirmedEventNotification),
            3 => Ok(Self::GetAlarmSummary),
            4 => Ok(Self::GetEnrollmentSummary),
            5 => Ok(Self::SubscribeCOV),
            6 => Ok(Self::AtomicReadFile),
            7 => Ok(Self::AtomicWriteFile),
            8 => Ok(Self::AddListElement),
            9 => Ok(Self::RemoveListElement),
            10 => Ok(Self::CreateObject),
            11 => Ok(Self::DeleteObject),
            12 => Ok(Self::ReadProperty),
            14 => Ok(Self::ReadPropertyMultiple),
            15 => Ok(Self::WriteProperty),
            16 => Ok(Self::WritePropertyMultiple),
            17 => Ok(Self::DeviceCommunicationControl),
            18 => Ok(Self::ConfirmedPrivateTransfer),
            19 => Ok(Self::ConfirmedTextMessage),
            20 => Ok(Self::ReinitializeDevice),
            21 => Ok(Self::VtOpen),
            22 => Ok(Self::VtClose),
            23 => Ok(Self::VtData),
            26 => Ok(Self::ReadRange),
            27 => Ok(Self::LifeSafetyOperation),
            28 => Ok(Self::SubscribeCOVProperty),
            29 => Ok(Self::GetEventInformation),
            _ => Err(ParseError::unsupported(
                "ConfirmedServiceChoice",
                format!("{:#04x}", value),
            )),
        }
    }
}

/// Unconfirmed service choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum UnconfirmedServiceChoice {
    IAm = 0,
    IHave = 1,
    UnconfirmedCOVNotification = 2,
    UnconfirmedEventNotification = 3,
    UnconfirmedPrivateTransfer = 4,
    UnconfirmedTextMessage = 5,
    TimeSynchronization = 6,
    WhoHas = 7,
    WhoIs = 8,
    UtcTimeSynchronization = 9,
    WriteGroup = 10,
    UnconfirmedCOVNotificationMultiple = 11,
    UnconfirmedAuditNotification = 12,
    WhoAmI = 13,
    YouAre = 14,
}

impl TryFrom<u8> for UnconfirmedServiceChoice {
    type Error = ParseError;

    fn try_from(value: u8) -> ParseResult<Self> {
        match value {
            0 => Ok(Self::IAm),
            1 => Ok(Self::IHave),
            2 => Ok(Self::UnconfirmedCOVNotification),
            3 => Ok(Self::UnconfirmedEventNotification),
            4 => Ok(Self::UnconfirmedPrivateTransfer),
            5 => Ok(Self::UnconfirmedTextMessage),
            6 => Ok(Self::TimeSynchronization),
            7 => Ok(Self::WhoHas),
            8 => Ok(Self::WhoIs),
            9 => Ok(Self::UtcTimeSynchronization),
            10 => Ok(Self::WriteGroup),
            11 => Ok(Self::UnconfirmedCOVNotificationMultiple),
            12 => Ok(Self::UnconfirmedAuditNotification),
            13 => Ok(Self::WhoAmI),
            14 => Ok(Self::YouAre),
            _ => Err(ParseError::unsupported(
                "UnconfirmedServiceChoice",
                format!("{:#04x}", value),
            )),
        }
    }
}

/// Read the choice octet and hand the remaining `length - 1` octets to `parse_body`
fn parse_service<T>(
    buffer: &mut ReadBuffer,
    family: &'static str,
    length: usize,
    parse_body: impl FnOnce(&mut ReadBuffer, u8) -> ParseResult<T>,
) -> ParseResult<T> {
    buffer.scoped(family, |buffer| {
        if length == 0 {
            return Err(ParseError::validation(format!(
                "{} needs at least the service choice octet",
                family
            )));
        }
        let choice = buffer.read_u8(8)?;
        trace!(
            "{} choice {:#04x} with {} octets of parameters",
            family,
            choice,
            length - 1
        );
        let mut body = buffer.split_off(length - 1)?;
        let value = parse_body(&mut body, choice)?;
        if !body.is_at_end() {
            return Err(ParseError::validation(format!(
                "{} bits left over after the service parameters",
                body.remaining_bits()
            )));
        }
        Ok(value)
    })
}

fn unsupported_choice(family: &'static str, choice: u8) -> ParseError {
    ParseError::unsupported(family, format!("choice {:#04x}", choice))
}

fn optional_context(
    buffer: &mut ReadBuffer,
    tag_number: u8,
    data_type: DataType,
) -> ParseResult<Option<ContextValue>> {
    read_optional(buffer, |buffer| ContextValue::parse(buffer, tag_number, data_type))
}

/// Application value of type `tag` if one is next, otherwise nothing is consumed
fn optional_application(
    buffer: &mut ReadBuffer,
    tag: ApplicationTag,
) -> ParseResult<Option<ApplicationValue>> {
    match buffer.peek(TagHeader::parse) {
        Ok(header) if header.is_application() && header.actual_tag_number() == tag as u8 => {
            expect_application(buffer, tag).map(Some)
        }
        _ => Ok(None),
    }
}

fn object_identifier_of(value: &ContextValue) -> ParseResult<ObjectIdentifier> {
    value.value().as_object_identifier().ok_or_else(|| {
        ParseError::validation(format!("expected an object identifier, found {}", value))
    })
}

fn unsigned_payload(value: Option<&ContextValue>) -> Option<&UnsignedIntegerPayload> {
    match value.map(ContextValue::value) {
        Some(PrimitiveValue::UnsignedInteger(payload)) => Some(payload),
        _ => None,
    }
}

/// SubscribeCOV; without the last two fields it cancels the subscription
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubscribeCovRequest {
    pub subscriber_process_identifier: ContextValue,
    pub monitored_object_identifier: ContextValue,
    pub issue_confirmed_notifications: Option<ContextValue>,
    pub lifetime: Option<ContextValue>,
}

impl SubscribeCovRequest {
    /// A cancellation
    pub fn new(process_identifier: u64, object: ObjectIdentifier) -> Self {
        Self {
            subscriber_process_identifier: ContextValue::unsigned(0, process_identifier),
            monitored_object_identifier: ContextValue::object_identifier(1, object),
            issue_confirmed_notifications: None,
            lifetime: None,
        }
    }

    pub fn with_subscription(mut self, confirmed: bool, lifetime: u64) -> Self {
        self.issue_confirmed_notifications = Some(ContextValue::boolean(2, confirmed));
        self.lifetime = Some(ContextValue::unsigned(3, lifetime));
        self
    }

    pub fn is_cancellation(&self) -> bool {
        self.issue_confirmed_notifications.is_none() && self.lifetime.is_none()
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let subscriber_process_identifier =
            ContextValue::parse(buffer, 0, DataType::UnsignedInteger)?;
        let monitored_object_identifier =
            ContextValue::parse(buffer, 1, DataType::ObjectIdentifier)?;
        let issue_confirmed_notifications = optional_context(buffer, 2, DataType::Boolean)?;
        let lifetime = optional_context(buffer, 3, DataType::UnsignedInteger)?;
        Ok(Self {
            subscriber_process_identifier,
            monitored_object_identifier,
            issue_confirmed_notifications,
            lifetime,
        })
    }
}

impl_serializable_sequence!(
    SubscribeCovRequest,
    "SubscribeCovRequest",
    [
        subscriber_process_identifier,
        monitored_object_identifier,
        issue_confirmed_notifications,
        lifetime
    ]
);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyRequest {
    pub object_identifier: ContextValue,
    pub property_identifier: PropertyIdentifierTagged,
    pub property_array_index: Option<ContextValue>,
}

impl ReadPropertyRequest {
    pub fn new(
        object: ObjectIdentifier,
        property: PropertyIdentifier,
        array_index: Option<u64>,
    ) -> Self {
        Self {
            object_identifier: ContextValue::object_identifier(0, object),
            property_identifier: PropertyIdentifierTagged::context(1, property),
            property_array_index: array_index.map(|index| ContextValue::unsigned(2, index)),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let object_identifier = ContextValue::parse(buffer, 0, DataType::ObjectIdentifier)?;
        let property_identifier =
            PropertyIdentifierTagged::parse(buffer, 1, TagClass::ContextSpecific)?;
        let property_array_index = optional_context(buffer, 2, DataType::UnsignedInteger)?;
        Ok(Self {
            object_identifier,
            property_identifier,
            property_array_index,
        })
    }

    pub fn array_index(&self) -> Option<u64> {
        unsigned_payload(self.property_array_index.as_ref()).map(|index| index.actual_value())
    }
}

impl_serializable_sequence!(
    ReadPropertyRequest,
    "ReadPropertyRequest",
    [object_identifier, property_identifier, property_array_index]
);

/// WriteProperty
///
/// The priority is carried as received; 1..=16 is a convention of the
/// receiving device, not of the encoding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WritePropertyRequest {
    pub object_identifier: ContextValue,
    pub property_identifier: PropertyIdentifierTagged,
    pub property_array_index: Option<ContextValue>,
    pub property_value: ConstructedData,
    pub priority: Option<ContextValue>,
}

impl WritePropertyRequest {
    pub fn new(
        object: ObjectIdentifier,
        property: PropertyIdentifier,
        array_index: Option<u64>,
        property_value: ConstructedData,
        priority: Option<u64>,
    ) -> Self {
        Self {
            object_identifier: ContextValue::object_identifier(0, object),
            property_identifier: PropertyIdentifierTagged::context(1, property),
            property_array_index: array_index.map(|index| ContextValue::unsigned(2, index)),
            property_value,
            priority: priority.map(|priority| ContextValue::unsigned(4, priority)),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let object_identifier = ContextValue::parse(buffer, 0, DataType::ObjectIdentifier)?;
        let property_identifier =
            PropertyIdentifierTagged::parse(buffer, 1, TagClass::ContextSpecific)?;
        let property_array_index = optional_context(buffer, 2, DataType::UnsignedInteger)?;
        let object = object_identifier_of(&object_identifier)?;
        let property_value = ConstructedData::parse(
            buffer,
            3,
            object.object_type,
            property_identifier.value,
            unsigned_payload(property_array_index.as_ref()),
        )?;
        let priority = optional_context(buffer, 4, DataType::UnsignedInteger)?;
        Ok(Self {
            object_identifier,
            property_identifier,
            property_array_index,
            property_value,
            priority,
        })
    }

    pub fn array_index(&self) -> Option<u64> {
        unsigned_payload(self.property_array_index.as_ref()).map(|index| index.actual_value())
    }

    pub fn priority(&self) -> Option<u64> {
        self.priority
            .as_ref()
            .and_then(|priority| priority.value().as_unsigned())
    }
}

impl_serializable_sequence!(
    WritePropertyRequest,
    "WritePropertyRequest",
    [
        object_identifier,
        property_identifier,
        property_array_index,
        property_value,
        priority
    ]
);

/// ConfirmedPrivateTransfer, request and acknowledgement alike
///
/// The parameters block is vendor defined and decoded schema-less.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrivateTransfer {
    pub vendor_id: VendorIdTagged,
    pub service_number: ContextValue,
    pub parameters: Option<ConstructedData>,
}

impl PrivateTransfer {
    pub fn new(
        vendor_id: VendorId,
        service_number: u64,
        parameters: Option<ConstructedData>,
    ) -> Self {
        Self {
            vendor_id: VendorIdTagged::context(0, vendor_id),
            service_number: ContextValue::unsigned(1, service_number),
            parameters,
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let vendor_id = VendorIdTagged::parse(buffer, 0, TagClass::ContextSpecific)?;
        let service_number = ContextValue::parse(buffer, 1, DataType::UnsignedInteger)?;
        let parameters =
            read_optional(buffer, |buffer| ConstructedData::parse_unspecified(buffer, 2, None))?;
        Ok(Self {
            vendor_id,
            service_number,
            parameters,
        })
    }
}

impl_serializable_sequence!(
    PrivateTransfer,
    "PrivateTransfer",
    [vendor_id, service_number, parameters]
);

/// Message class of a text message: a number at tag 0 or text at tag 1
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageClass {
    Numeric(ContextValue),
    Character(ContextValue),
}

impl MessageClass {
    pub fn numeric(class: u64) -> Self {
        Self::Numeric(ContextValue::unsigned(0, class))
    }

    pub fn character(class: &str) -> Self {
        Self::Character(ContextValue::character_string(1, class))
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let peeked = buffer.peek(TagHeader::parse)?;
        match peeked.actual_tag_number() {
            0 => Ok(Self::Numeric(ContextValue::parse(
                buffer,
                0,
                DataType::UnsignedInteger,
            )?)),
            1 => Ok(Self::Character(ContextValue::parse(
                buffer,
                1,
                DataType::CharacterString,
            )?)),
            other => Err(ParseError::unsupported("MessageClass", other)),
        }
    }
}

impl Serializable for MessageClass {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        match self {
            Self::Numeric(value) | Self::Character(value) => value.serialize(buffer),
        }
    }

    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Numeric(value) | Self::Character(value) => value.length_in_bits(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextMessageRequest {
    pub text_message_source_device: ContextValue,
    pub message_class: Option<Enclosed<MessageClass>>,
    pub message_priority: MessagePriorityTagged,
    pub message: ContextValue,
}

impl TextMessageRequest {
    pub fn new(
        source_device: ObjectIdentifier,
        message_class: Option<MessageClass>,
        priority: MessagePriority,
        message: &str,
    ) -> Self {
        Self {
            text_message_source_device: ContextValue::object_identifier(0, source_device),
            message_class: message_class.map(|class| Enclosed::new(1, class)),
            message_priority: MessagePriorityTagged::context(2, priority),
            message: ContextValue::character_string(3, message),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let text_message_source_device =
            ContextValue::parse(buffer, 0, DataType::ObjectIdentifier)?;
        let message_class =
            read_optional(buffer, |buffer| Enclosed::parse(buffer, 1, MessageClass::parse))?;
        let message_priority = MessagePriorityTagged::parse(buffer, 2, TagClass::ContextSpecific)?;
        let message = ContextValue::parse(buffer, 3, DataType::CharacterString)?;
        Ok(Self {
            text_message_source_device,
            message_class,
            message_priority,
            message,
        })
    }

    pub fn text(&self) -> Option<String> {
        self.message.value().as_text()
    }
}

impl_serializable_sequence!(
    TextMessageRequest,
    "TextMessageRequest",
    [
        text_message_source_device,
        message_class,
        message_priority,
        message
    ]
);

/// BACnet-Confirmed-Request-PDU service
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfirmedServiceRequest {
    SubscribeCov(SubscribeCovRequest),
    ReadProperty(ReadPropertyRequest),
    WriteProperty(WritePropertyRequest),
    ConfirmedPrivateTransfer(PrivateTransfer),
    ConfirmedTextMessage(TextMessageRequest),
}

impl ConfirmedServiceRequest {
    /// Parse a request of `service_request_length` octets, choice octet included
    pub fn parse(buffer: &mut ReadBuffer, service_request_length: usize) -> ParseResult<Self> {
        use ConfirmedServiceChoice as C;

        parse_service(
            buffer,
            "ConfirmedServiceRequest",
            service_request_length,
            |buffer, choice| match ConfirmedServiceChoice::try_from(choice).ok() {
                Some(C::SubscribeCOV) => Ok(Self::SubscribeCov(SubscribeCovRequest::parse(buffer)?)),
                Some(C::ReadProperty) => Ok(Self::ReadProperty(ReadPropertyRequest::parse(buffer)?)),
                Some(C::WriteProperty) => {
                    Ok(Self::WriteProperty(WritePropertyRequest::parse(buffer)?))
                }
                Some(C::ConfirmedPrivateTransfer) => {
                    Ok(Self::ConfirmedPrivateTransfer(PrivateTransfer::parse(buffer)?))
                }
                Some(C::ConfirmedTextMessage) => {
                    Ok(Self::ConfirmedTextMessage(TextMessageRequest::parse(buffer)?))
                }
                _ => Err(unsupported_choice("ConfirmedServiceRequest", choice)),
            },
        )
    }

    pub fn service_choice(&self) -> ConfirmedServiceChoice {
        match self {
            Self::SubscribeCov(_) => ConfirmedServiceChoice::SubscribeCOV,
            Self::ReadProperty(_) => ConfirmedServiceChoice::ReadProperty,
            Self::WriteProperty(_) => ConfirmedServiceChoice::WriteProperty,
            Self::ConfirmedPrivateTransfer(_) => ConfirmedServiceChoice::ConfirmedPrivateTransfer,
            Self::ConfirmedTextMessage(_) => ConfirmedServiceChoice::ConfirmedTextMessage,
        }
    }

    fn inner(&self) -> &dyn Serializable {
        match self {
            Self::SubscribeCov(request) => request,
            Self::ReadProperty(request) => request,
            Self::WriteProperty(request) => request,
            Self::ConfirmedPrivateTransfer(request) => request,
            Self::ConfirmedTextMessage(request) => request,
        }
    }
}

impl Serializable for ConfirmedServiceRequest {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("ConfirmedServiceRequest", |buffer| {
            buffer.write_u8(8, self.service_choice() as u8)?;
            self.inner().serialize(buffer)
        })
    }

    fn length_in_bits(&self) -> u32 {
        8 + self.inner().length_in_bits()
    }
}

/// One enrollment of a GetEnrollmentSummary result
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetEnrollmentSummaryAck {
    pub object_identifier: ApplicationValue,
    pub event_type: EventTypeTagged,
    pub event_state: EventStateTagged,
    pub priority: ApplicationValue,
    pub notification_class: Option<ApplicationValue>,
}

impl GetEnrollmentSummaryAck {
    pub fn new(
        object: ObjectIdentifier,
        event_type: EventType,
        event_state: EventState,
        priority: u64,
        notification_class: Option<u64>,
    ) -> Self {
        Self {
            object_identifier: ApplicationValue::object_identifier(object),
            event_type: EventTypeTagged::application(event_type),
            event_state: EventStateTagged::application(event_state),
            priority: ApplicationValue::unsigned(priority),
            notification_class: notification_class.map(ApplicationValue::unsigned),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let enumerated = ApplicationTag::Enumerated as u8;
        let object_identifier = expect_application(buffer, ApplicationTag::ObjectIdentifier)?;
        let event_type = EventTypeTagged::parse(buffer, enumerated, TagClass::Application)?;
        let event_state = EventStateTagged::parse(buffer, enumerated, TagClass::Application)?;
        let priority = expect_application(buffer, ApplicationTag::UnsignedInt)?;
        let notification_class = optional_application(buffer, ApplicationTag::UnsignedInt)?;
        Ok(Self {
            object_identifier,
            event_type,
            event_state,
            priority,
            notification_class,
        })
    }
}

impl_serializable_sequence!(
    GetEnrollmentSummaryAck,
    "GetEnrollmentSummaryAck",
    [
        object_identifier,
        event_type,
        event_state,
        priority,
        notification_class
    ]
);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamAccessResult {
    pub file_start_position: ApplicationValue,
    pub file_data: ApplicationValue,
}

impl StreamAccessResult {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let file_start_position = expect_application(buffer, ApplicationTag::SignedInt)?;
        let file_data = expect_application(buffer, ApplicationTag::OctetString)?;
        Ok(Self {
            file_start_position,
            file_data,
        })
    }
}

impl_serializable_sequence!(
    StreamAccessResult,
    "StreamAccessResult",
    [file_start_position, file_data]
);

/// Record access result; the record count says how many octet strings follow
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordAccessResult {
    pub file_start_record: ApplicationValue,
    pub returned_record_count: ApplicationValue,
    pub file_record_data: Vec<ApplicationValue>,
}

impl RecordAccessResult {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let file_start_record = expect_application(buffer, ApplicationTag::SignedInt)?;
        let returned_record_count = expect_application(buffer, ApplicationTag::UnsignedInt)?;
        let count = returned_record_count.value().as_unsigned().unwrap_or_default();
        let file_record_data = read_count_array(buffer, count, |buffer| {
            expect_application(buffer, ApplicationTag::OctetString)
        })?;
        Ok(Self {
            file_start_record,
            returned_record_count,
            file_record_data,
        })
    }
}

impl Serializable for RecordAccessResult {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("RecordAccessResult", |buffer| {
            let count = self.returned_record_count.value().as_unsigned();
            if count != Some(self.file_record_data.len() as u64) {
                return Err(SerializationError::invariant(format!(
                    "record count {:?} but {} records",
                    count,
                    self.file_record_data.len()
                )));
            }
            self.file_start_record.serialize(buffer)?;
            self.returned_record_count.serialize(buffer)?;
            self.file_record_data.serialize(buffer)
        })
    }

    fn length_in_bits(&self) -> u32 {
        self.file_start_record.length_in_bits()
            + self.returned_record_count.length_in_bits()
            + self.file_record_data.length_in_bits()
    }
}

/// Stream access at opening tag 0, record access at opening tag 1
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileAccessResult {
    Stream(Enclosed<StreamAccessResult>),
    Record(Enclosed<RecordAccessResult>),
}

impl FileAccessResult {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let peeked = buffer.peek(TagHeader::parse)?;
        match peeked.actual_tag_number() {
            0 => Ok(Self::Stream(Enclosed::parse(buffer, 0, StreamAccessResult::parse)?)),
            1 => Ok(Self::Record(Enclosed::parse(buffer, 1, RecordAccessResult::parse)?)),
            other => Err(ParseError::unsupported("FileAccessResult", other)),
        }
    }
}

impl Serializable for FileAccessResult {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        match self {
            Self::Stream(result) => result.serialize(buffer),
            Self::Record(result) => result.serialize(buffer),
        }
    }

    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Stream(result) => result.length_in_bits(),
            Self::Record(result) => result.length_in_bits(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtomicReadFileAck {
    pub end_of_file: ApplicationValue,
    pub access_method: FileAccessResult,
}

impl AtomicReadFileAck {
    pub fn stream(end_of_file: bool, file_start_position: i64, file_data: Vec<u8>) -> Self {
        Self {
            end_of_file: ApplicationValue::boolean(end_of_file),
            access_method: FileAccessResult::Stream(Enclosed::new(
                0,
                StreamAccessResult {
                    file_start_position: ApplicationValue::signed(file_start_position),
                    file_data: ApplicationValue::octet_string(file_data),
                },
            )),
        }
    }

    pub fn record(end_of_file: bool, file_start_record: i64, records: Vec<Vec<u8>>) -> Self {
        Self {
            end_of_file: ApplicationValue::boolean(end_of_file),
            access_method: FileAccessResult::Record(Enclosed::new(
                1,
                RecordAccessResult {
                    file_start_record: ApplicationValue::signed(file_start_record),
                    returned_record_count: ApplicationValue::unsigned(records.len() as u64),
                    file_record_data: records
                        .into_iter()
                        .map(ApplicationValue::octet_string)
                        .collect(),
                },
            )),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let end_of_file = expect_application(buffer, ApplicationTag::Boolean)?;
        let access_method = FileAccessResult::parse(buffer)?;
        Ok(Self {
            end_of_file,
            access_method,
        })
    }

    pub fn is_end_of_file(&self) -> bool {
        self.end_of_file.value().as_bool().unwrap_or(false)
    }
}

impl_serializable_sequence!(
    AtomicReadFileAck,
    "AtomicReadFileAck",
    [end_of_file, access_method]
);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyAck {
    pub object_identifier: ContextValue,
    pub property_identifier: PropertyIdentifierTagged,
    pub property_array_index: Option<ContextValue>,
    pub property_value: Option<ConstructedData>,
}

impl ReadPropertyAck {
    pub fn new(
        object: ObjectIdentifier,
        property: PropertyIdentifier,
        array_index: Option<u64>,
        property_value: Option<ConstructedData>,
    ) -> Self {
        Self {
            object_identifier: ContextValue::object_identifier(0, object),
            property_identifier: PropertyIdentifierTagged::context(1, property),
            property_array_index: array_index.map(|index| ContextValue::unsigned(2, index)),
            property_value,
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let object_identifier = ContextValue::parse(buffer, 0, DataType::ObjectIdentifier)?;
        let property_identifier =
            PropertyIdentifierTagged::parse(buffer, 1, TagClass::ContextSpecific)?;
        let property_array_index = optional_context(buffer, 2, DataType::UnsignedInteger)?;
        let object = object_identifier_of(&object_identifier)?;
        let property_value = read_optional(buffer, |buffer| {
            ConstructedData::parse(
                buffer,
                3,
                object.object_type,
                property_identifier.value,
                unsigned_payload(property_array_index.as_ref()),
            )
        })?;
        Ok(Self {
            object_identifier,
            property_identifier,
            property_array_index,
            property_value,
        })
    }

    pub fn array_index(&self) -> Option<u64> {
        unsigned_payload(self.property_array_index.as_ref()).map(|index| index.actual_value())
    }
}

impl_serializable_sequence!(
    ReadPropertyAck,
    "ReadPropertyAck",
    [
        object_identifier,
        property_identifier,
        property_array_index,
        property_value
    ]
);

/// BACnet-ComplexACK-PDU service
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ServiceAck {
    GetEnrollmentSummary(GetEnrollmentSummaryAck),
    AtomicReadFile(AtomicReadFileAck),
    ReadProperty(ReadPropertyAck),
    ConfirmedPrivateTransfer(PrivateTransfer),
}

impl ServiceAck {
    /// Parse an acknowledgement of `service_ack_length` octets, choice octet included
    pub fn parse(buffer: &mut ReadBuffer, service_ack_length: usize) -> ParseResult<Self> {
        use ConfirmedServiceChoice as C;

        parse_service(
            buffer,
            "ServiceAck",
            service_ack_length,
            |buffer, choice| match ConfirmedServiceChoice::try_from(choice).ok() {
                Some(C::GetEnrollmentSummary) => Ok(Self::GetEnrollmentSummary(
                    GetEnrollmentSummaryAck::parse(buffer)?,
                )),
                Some(C::AtomicReadFile) => {
                    Ok(Self::AtomicReadFile(AtomicReadFileAck::parse(buffer)?))
                }
                Some(C::ReadProperty) => Ok(Self::ReadProperty(ReadPropertyAck::parse(buffer)?)),
                Some(C::ConfirmedPrivateTransfer) => {
                    Ok(Self::ConfirmedPrivateTransfer(PrivateTransfer::parse(buffer)?))
                }
                _ => Err(unsupported_choice("ServiceAck", choice)),
            },
        )
    }

    pub fn service_choice(&self) -> ConfirmedServiceChoice {
        match self {
            Self::GetEnrollmentSummary(_) => ConfirmedServiceChoice::GetEnrollmentSummary,
            Self::AtomicReadFile(_) => ConfirmedServiceChoice::AtomicReadFile,
            Self::ReadProperty(_) => ConfirmedServiceChoice::ReadProperty,
            Self::ConfirmedPrivateTransfer(_) => ConfirmedServiceChoice::ConfirmedPrivateTransfer,
        }
    }

    fn inner(&self) -> &dyn Serializable {
        match self {
            Self::GetEnrollmentSummary(ack) => ack,
            Self::AtomicReadFile(ack) => ack,
            Self::ReadProperty(ack) => ack,
            Self::ConfirmedPrivateTransfer(ack) => ack,
        }
    }
}

impl Serializable for ServiceAck {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("ServiceAck", |buffer| {
            buffer.write_u8(8, self.service_choice() as u8)?;
            self.inner().serialize(buffer)
        })
    }

    fn length_in_bits(&self) -> u32 {
        8 + self.inner().length_in_bits()
    }
}

/// I-Am
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IAmRequest {
    pub device_identifier: ApplicationValue,
    pub maximum_apdu_length_accepted: ApplicationValue,
    pub segmentation_supported: SegmentationTagged,
    pub vendor_id: VendorIdTagged,
}

impl IAmRequest {
    pub fn new(
        device: ObjectIdentifier,
        max_apdu: u64,
        segmentation: Segmentation,
        vendor_id: VendorId,
    ) -> Self {
        Self {
            device_identifier: ApplicationValue::object_identifier(device),
            maximum_apdu_length_accepted: ApplicationValue::unsigned(max_apdu),
            segmentation_supported: SegmentationTagged::application(segmentation),
            vendor_id: VendorIdTagged::new(
                ApplicationTag::UnsignedInt as u8,
                TagClass::Application,
                vendor_id,
            ),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let device_identifier = expect_application(buffer, ApplicationTag::ObjectIdentifier)?;
        let maximum_apdu_length_accepted = expect_application(buffer, ApplicationTag::UnsignedInt)?;
        let segmentation_supported = SegmentationTagged::parse(
            buffer,
            ApplicationTag::Enumerated as u8,
            TagClass::Application,
        )?;
        let vendor_id = VendorIdTagged::parse(
            buffer,
            ApplicationTag::UnsignedInt as u8,
            TagClass::Application,
        )?;
        Ok(Self {
            device_identifier,
            maximum_apdu_length_accepted,
            segmentation_supported,
            vendor_id,
        })
    }

    pub fn device(&self) -> Option<ObjectIdentifier> {
        self.device_identifier.value().as_object_identifier()
    }
}

impl_serializable_sequence!(
    IAmRequest,
    "IAmRequest",
    [
        device_identifier,
        maximum_apdu_length_accepted,
        segmentation_supported,
        vendor_id
    ]
);

/// Who-Is; the instance range limits come both or not at all
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhoIsRequest {
    pub device_instance_range_low_limit: Option<ContextValue>,
    pub device_instance_range_high_limit: Option<ContextValue>,
}

impl WhoIsRequest {
    /// Who-Is for all devices
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_range(low: u64, high: u64) -> Self {
        Self {
            device_instance_range_low_limit: Some(ContextValue::unsigned(0, low)),
            device_instance_range_high_limit: Some(ContextValue::unsigned(1, high)),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let device_instance_range_low_limit =
            optional_context(buffer, 0, DataType::UnsignedInteger)?;
        let device_instance_range_high_limit = match device_instance_range_low_limit {
            Some(_) => Some(ContextValue::parse(buffer, 1, DataType::UnsignedInteger)?),
            None => None,
        };
        Ok(Self {
            device_instance_range_low_limit,
            device_instance_range_high_limit,
        })
    }

    /// Instance range asked for, `None` meaning every device
    pub fn range(&self) -> Option<(u64, u64)> {
        let low = self.device_instance_range_low_limit.as_ref()?.value().as_unsigned()?;
        let high = self.device_instance_range_high_limit.as_ref()?.value().as_unsigned()?;
        Some((low, high))
    }
}

impl Serializable for WhoIsRequest {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("WhoIsRequest", |buffer| {
            if self.device_instance_range_low_limit.is_some()
                != self.device_instance_range_high_limit.is_some()
            {
                return Err(SerializationError::invariant(
                    "Who-Is range needs both a low and a high limit",
                ));
            }
            self.device_instance_range_low_limit.serialize(buffer)?;
            self.device_instance_range_high_limit.serialize(buffer)
        })
    }

    fn length_in_bits(&self) -> u32 {
        self.device_instance_range_low_limit.length_in_bits()
            + self.device_instance_range_high_limit.length_in_bits()
    }
}

/// BACnetChannelValue: any application primitive, or a lighting command at opening tag 0
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelValue {
    Primitive(ApplicationValue),
    LightingCommand(Enclosed<LightingCommand>),
}

impl ChannelValue {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let peeked = buffer.peek(TagHeader::parse)?;
        if peeked.is_application() {
            return Ok(Self::Primitive(ApplicationValue::parse(buffer)?));
        }
        match peeked.actual_tag_number() {
            0 => Ok(Self::LightingCommand(Enclosed::parse(
                buffer,
                0,
                LightingCommand::parse,
            )?)),
            other => Err(ParseError::unsupported("ChannelValue", other)),
        }
    }
}

impl Serializable for ChannelValue {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        match self {
            Self::Primitive(value) => value.serialize(buffer),
            Self::LightingCommand(value) => value.serialize(buffer),
        }
    }

    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Primitive(value) => value.length_in_bits(),
            Self::LightingCommand(value) => value.length_in_bits(),
        }
    }
}

/// BACnetGroupChannelValue
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupChannelValue {
    pub channel: ContextValue,
    pub overriding_priority: Option<ContextValue>,
    pub value: ChannelValue,
}

impl GroupChannelValue {
    pub fn new(channel: u64, overriding_priority: Option<u64>, value: ChannelValue) -> Self {
        Self {
            channel: ContextValue::unsigned(0, channel),
            overriding_priority: overriding_priority
                .map(|priority| ContextValue::unsigned(1, priority)),
            value,
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let channel = ContextValue::parse(buffer, 0, DataType::UnsignedInteger)?;
        // an application BOOLEAN value shares tag number 1 with the priority
        let peeked = buffer.peek(TagHeader::parse)?;
        let overriding_priority = if peeked.is_context() {
            optional_context(buffer, 1, DataType::UnsignedInteger)?
        } else {
            None
        };
        let value = ChannelValue::parse(buffer)?;
        Ok(Self {
            channel,
            overriding_priority,
            value,
        })
    }
}

impl_serializable_sequence!(
    GroupChannelValue,
    "GroupChannelValue",
    [channel, overriding_priority, value]
);

/// WriteGroup
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteGroupRequest {
    pub group_number: ContextValue,
    pub write_priority: ContextValue,
    pub change_list: Enclosed<Vec<GroupChannelValue>>,
    pub inhibit_delay: Option<ContextValue>,
}

impl WriteGroupRequest {
    pub fn new(
        group_number: u64,
        write_priority: u64,
        change_list: Vec<GroupChannelValue>,
        inhibit_delay: Option<u64>,
    ) -> Self {
        Self {
            group_number: ContextValue::unsigned(0, group_number),
            write_priority: ContextValue::unsigned(1, write_priority),
            change_list: Enclosed::new(2, change_list),
            inhibit_delay: inhibit_delay.map(|delay| ContextValue::unsigned(3, delay)),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        let group_number = ContextValue::parse(buffer, 0, DataType::UnsignedInteger)?;
        let write_priority = ContextValue::parse(buffer, 1, DataType::UnsignedInteger)?;
        let change_list = Enclosed::parse(buffer, 2, |buffer| {
            read_terminated_array(buffer, 2, GroupChannelValue::parse)
        })?;
        let inhibit_delay = optional_context(buffer, 3, DataType::UnsignedInteger)?;
        Ok(Self {
            group_number,
            write_priority,
            change_list,
            inhibit_delay,
        })
    }
}

impl_serializable_sequence!(
    WriteGroupRequest,
    "WriteGroupRequest",
    [group_number, write_priority, change_list, inhibit_delay]
);

/// BACnet-Unconfirmed-Request-PDU service
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnconfirmedServiceRequest {
    IAm(IAmRequest),
    WhoIs(WhoIsRequest),
    WriteGroup(WriteGroupRequest),
}

impl UnconfirmedServiceRequest {
    /// Parse a request of `service_request_length` octets, choice octet included
    pub fn parse(buffer: &mut ReadBuffer, service_request_length: usize) -> ParseResult<Self> {
        use UnconfirmedServiceChoice as U;

        parse_service(
            buffer,
            "UnconfirmedServiceRequest",
            service_request_length,
            |buffer, choice| match UnconfirmedServiceChoice::try_from(choice).ok() {
                Some(U::IAm) => Ok(Self::IAm(IAmRequest::parse(buffer)?)),
                Some(U::WhoIs) => Ok(Self::WhoIs(WhoIsRequest::parse(buffer)?)),
                Some(U::WriteGroup) => Ok(Self::WriteGroup(WriteGroupRequest::parse(buffer)?)),
                _ => Err(unsupported_choice("UnconfirmedServiceRequest", choice)),
            },
        )
    }

    pub fn service_choice(&self) -> UnconfirmedServiceChoice {
        match self {
            Self::IAm(_) => UnconfirmedServiceChoice::IAm,
            Self::WhoIs(_) => UnconfirmedServiceChoice::WhoIs,
            Self::WriteGroup(_) => UnconfirmedServiceChoice::WriteGroup,
        }
    }

    fn inner(&self) -> &dyn Serializable {
        match self {
            Self::IAm(request) => request,
            Self::WhoIs(request) => request,
            Self::WriteGroup(request) => request,
        }
    }
}

impl Serializable for UnconfirmedServiceRequest {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("UnconfirmedServiceRequest", |buffer| {
            buffer.write_u8(8, self.service_choice() as u8)?;
            self.inner().serialize(buffer)
        })
    }

    fn length_in_bits(&self) -> u32 {
        8 + self.inner().length_in_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::tagged::BinaryPVTagged;
    use crate::encoding::ConstructedElement;
    use crate::object::{BinaryPV, LightingOperation, ObjectType};
    use crate::property::ConstructedDataBody;

    fn bytes(text: &str) -> Vec<u8> {
        hex::decode(text).unwrap()
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn confirmed(data: &[u8]) -> ParseResult<ConfirmedServiceRequest> {
        init_logging();
        ConfirmedServiceRequest::parse(&mut ReadBuffer::new(data), data.len())
    }

    fn ack(data: &[u8]) -> ParseResult<ServiceAck> {
        init_logging();
        ServiceAck::parse(&mut ReadBuffer::new(data), data.len())
    }

    fn unconfirmed(data: &[u8]) -> ParseResult<UnconfirmedServiceRequest> {
        init_logging();
        UnconfirmedServiceRequest::parse(&mut ReadBuffer::new(data), data.len())
    }

    #[test]
    fn test_service_choice_conversion() {
        assert_eq!(
            ConfirmedServiceChoice::try_from(15).unwrap(),
            ConfirmedServiceChoice::WriteProperty
        );
        assert_eq!(ConfirmedServiceChoice::ConfirmedTextMessage as u8, 19);
        assert!(ConfirmedServiceChoice::try_from(13).is_err());
        assert_eq!(
            UnconfirmedServiceChoice::try_from(10).unwrap(),
            UnconfirmedServiceChoice::WriteGroup
        );
        assert!(UnconfirmedServiceChoice::try_from(15).is_err());
    }

    #[test]
    fn test_write_property() {
        let data = bytes("0F0C0140000119553E91013F4908");
        let request = confirmed(&data).unwrap();
        assert_eq!(request.service_choice(), ConfirmedServiceChoice::WriteProperty);

        let object = ObjectIdentifier::new(ObjectType::BinaryValue, 1);
        let value = ConstructedData::new(
            3,
            ObjectType::BinaryValue,
            PropertyIdentifier::PresentValue,
            None,
            ConstructedDataBody::BinaryValuePresentValue(BinaryPVTagged::application(
                BinaryPV::Active,
            )),
        );
        let expected = ConfirmedServiceRequest::WriteProperty(WritePropertyRequest::new(
            object,
            PropertyIdentifier::PresentValue,
            None,
            value,
            Some(8),
        ));
        assert_eq!(request, expected);
        assert_eq!(expected.to_bytes().unwrap(), data);

        let ConfirmedServiceRequest::WriteProperty(request) = request else {
            panic!("expected WriteProperty");
        };
        assert_eq!(request.priority(), Some(8));
        assert_eq!(request.array_index(), None);
        assert_eq!(
            request.property_value.object_type(),
            Some(ObjectType::BinaryValue)
        );
        assert_eq!(
            request.property_value.actual_value().and_then(|v| v.as_enumerated()),
            Some(1)
        );
    }

    #[test]
    fn test_write_property_priority_carried_as_received() {
        let data = bytes("0F0C0140000119553E91013F4911");
        let ConfirmedServiceRequest::WriteProperty(request) = confirmed(&data).unwrap() else {
            panic!("expected WriteProperty");
        };
        assert_eq!(request.priority(), Some(17));
    }

    #[test]
    fn test_read_property_request() {
        let data = bytes("0C0C008000011955");
        let request = confirmed(&data).unwrap();
        let expected = ConfirmedServiceRequest::ReadProperty(ReadPropertyRequest::new(
            ObjectIdentifier::new(ObjectType::AnalogValue, 1),
            PropertyIdentifier::PresentValue,
            None,
        ));
        assert_eq!(request, expected);

        let indexed = ReadPropertyRequest::new(
            ObjectIdentifier::new(ObjectType::AnalogValue, 1),
            PropertyIdentifier::PriorityArray,
            Some(16),
        );
        assert_eq!(indexed.to_bytes().unwrap(), bytes("0C0080000119572910"));
        assert_eq!(indexed.array_index(), Some(16));
    }

    #[test]
    fn test_length_bounds_the_parameters() {
        let data = bytes("0C0C00800001195500");
        let err = confirmed(&data).unwrap_err();
        assert!(err.is_validation());

        // the trailing octet belongs to whatever follows the request
        let mut buffer = ReadBuffer::new(&data);
        let request = ConfirmedServiceRequest::parse(&mut buffer, 8).unwrap();
        assert_eq!(request.service_choice(), ConfirmedServiceChoice::ReadProperty);
        assert_eq!(buffer.remaining_bits(), 8);

        let short = bytes("0C0C0080");
        assert!(matches!(
            confirmed(&short),
            Err(ParseError::UnexpectedEndOfData { .. })
        ));
        assert!(ConfirmedServiceRequest::parse(&mut ReadBuffer::new(&short), 0)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_unknown_choice() {
        let data = bytes("630000");
        let err = confirmed(&data).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported case for discriminated type ConfirmedServiceRequest: choice 0x63"
        );

        // a real service without a decoder is just as unsupported
        let data = bytes("07");
        assert!(matches!(
            confirmed(&data),
            Err(ParseError::UnsupportedCase { .. })
        ));
        assert!(matches!(ack(&data), Err(ParseError::UnsupportedCase { .. })));
        assert!(matches!(
            unconfirmed(&bytes("02")),
            Err(ParseError::UnsupportedCase { .. })
        ));
    }

    #[test]
    fn test_subscribe_cov() {
        let object = ObjectIdentifier::new(ObjectType::AnalogInput, 10);

        let data = bytes("0509121C0000000A29013900");
        let request = confirmed(&data).unwrap();
        let expected = SubscribeCovRequest::new(18, object).with_subscription(true, 0);
        assert_eq!(request, ConfirmedServiceRequest::SubscribeCov(expected.clone()));
        assert!(!expected.is_cancellation());

        let data = bytes("0509121C0000000A");
        let ConfirmedServiceRequest::SubscribeCov(cancel) = confirmed(&data).unwrap() else {
            panic!("expected SubscribeCOV");
        };
        assert!(cancel.is_cancellation());
        assert_eq!(cancel, SubscribeCovRequest::new(18, object));
    }

    #[test]
    fn test_text_message() {
        let device = ObjectIdentifier::new(ObjectType::Device, 5);

        let data = bytes("130C020000051E09071F29003B006869");
        let request = confirmed(&data).unwrap();
        let expected = TextMessageRequest::new(
            device,
            Some(MessageClass::numeric(7)),
            MessagePriority::Normal,
            "hi",
        );
        assert_eq!(request, ConfirmedServiceRequest::ConfirmedTextMessage(expected.clone()));
        assert_eq!(expected.text().as_deref(), Some("hi"));

        let data = bytes("130C0200000529013B006869");
        let ConfirmedServiceRequest::ConfirmedTextMessage(request) = confirmed(&data).unwrap()
        else {
            panic!("expected ConfirmedTextMessage");
        };
        assert!(request.message_class.is_none());
        assert_eq!(request.message_priority.value, MessagePriority::Urgent);

        let classed = TextMessageRequest::new(
            device,
            Some(MessageClass::character("a")),
            MessagePriority::Normal,
            "",
        );
        assert_eq!(
            classed.to_bytes().unwrap(),
            bytes("0C020000051E1A00611F29003900")
        );
    }

    #[test]
    fn test_private_transfer() {
        let data = bytes("12091919082E4442C800002F");
        let request = confirmed(&data).unwrap();
        let ConfirmedServiceRequest::ConfirmedPrivateTransfer(transfer) = &request else {
            panic!("expected ConfirmedPrivateTransfer");
        };
        assert_eq!(transfer.vendor_id.actual_value(), 25);
        let parameters = transfer.parameters.as_ref().unwrap();
        assert_eq!(parameters.tag_number(), 2);
        assert_eq!(
            parameters.body,
            ConstructedDataBody::Unspecified(vec![ConstructedElement::Application(
                ApplicationValue::real(100.0)
            )])
        );
        assert_eq!(request.to_bytes().unwrap(), data);

        let data = bytes("1209191908");
        let ServiceAck::ConfirmedPrivateTransfer(transfer) = ack(&data).unwrap() else {
            panic!("expected ConfirmedPrivateTransfer");
        };
        assert_eq!(transfer, PrivateTransfer::new(VendorId::from(25u32), 8, None));
    }

    #[test]
    fn test_read_property_ack() {
        let data = bytes("0C0C0080000119553E4442C800003F");
        let response = ack(&data).unwrap();
        assert_eq!(response.service_choice(), ConfirmedServiceChoice::ReadProperty);
        let ServiceAck::ReadProperty(read) = &response else {
            panic!("expected ReadProperty");
        };
        let value = read.property_value.as_ref().unwrap();
        assert_eq!(value.property_identifier(), Some(PropertyIdentifier::PresentValue));
        assert_eq!(value.object_type(), Some(ObjectType::AnalogValue));
        assert_eq!(response.to_bytes().unwrap(), data);

        let data = bytes("0C0C008000011955");
        let ServiceAck::ReadProperty(read) = ack(&data).unwrap() else {
            panic!("expected ReadProperty");
        };
        assert!(read.property_value.is_none());
    }

    #[test]
    fn test_get_enrollment_summary_ack() {
        let object = ObjectIdentifier::new(ObjectType::AnalogInput, 1);
        let data = bytes("04C400000001910591002164");
        let response = ack(&data).unwrap();
        assert_eq!(
            response,
            ServiceAck::GetEnrollmentSummary(GetEnrollmentSummaryAck::new(
                object,
                EventType::OutOfRange,
                EventState::Normal,
                100,
                None
            ))
        );

        let data = bytes("04C4000000019105910021642103");
        let ServiceAck::GetEnrollmentSummary(summary) = ack(&data).unwrap() else {
            panic!("expected GetEnrollmentSummary");
        };
        assert_eq!(
            summary.notification_class.map(|class| class.into_value()),
            Some(PrimitiveValue::UnsignedInteger(UnsignedIntegerPayload::new(3)))
        );
    }

    #[test]
    fn test_atomic_read_file_stream() {
        let data = bytes("06110E3100636162630F");
        let response = ack(&data).unwrap();
        let expected = AtomicReadFileAck::stream(true, 0, b"abc".to_vec());
        assert_eq!(response, ServiceAck::AtomicReadFile(expected.clone()));
        assert!(expected.is_end_of_file());
        assert_eq!(response.to_bytes().unwrap(), data);
    }

    #[test]
    fn test_atomic_read_file_record() {
        let data = bytes("06101E310E2102610161021F");
        let response = ack(&data).unwrap();
        let expected = AtomicReadFileAck::record(false, 14, vec![vec![0x01], vec![0x02]]);
        assert_eq!(response, ServiceAck::AtomicReadFile(expected.clone()));
        assert!(!expected.is_end_of_file());

        // record count promises three records, only two follow
        let data = bytes("06101E310E2103610161021F");
        assert!(ack(&data).is_err());

        let mut broken = expected;
        if let FileAccessResult::Record(record) = &mut broken.access_method {
            record.value.file_record_data.pop();
        }
        assert!(broken.to_bytes().is_err());
    }

    #[test]
    fn test_i_am() {
        let data = bytes("00C4020004D22205C49103210F");
        let request = unconfirmed(&data).unwrap();
        let expected = IAmRequest::new(
            ObjectIdentifier::new(ObjectType::Device, 1234),
            1476,
            Segmentation::NoSegmentation,
            VendorId::from(15u32),
        );
        assert_eq!(request, UnconfirmedServiceRequest::IAm(expected.clone()));
        assert_eq!(
            expected.device(),
            Some(ObjectIdentifier::new(ObjectType::Device, 1234))
        );
        assert_eq!(request.to_bytes().unwrap(), data);
    }

    #[test]
    fn test_who_is() {
        let request = unconfirmed(&[0x08]).unwrap();
        assert_eq!(request, UnconfirmedServiceRequest::WhoIs(WhoIsRequest::new()));

        let data = bytes("0809011964");
        let UnconfirmedServiceRequest::WhoIs(who_is) = unconfirmed(&data).unwrap() else {
            panic!("expected WhoIs");
        };
        assert_eq!(who_is.range(), Some((1, 100)));
        assert_eq!(who_is, WhoIsRequest::for_range(1, 100));

        assert!(unconfirmed(&bytes("080901")).is_err());

        let half = WhoIsRequest {
            device_instance_range_low_limit: Some(ContextValue::unsigned(0, 1)),
            device_instance_range_high_limit: None,
        };
        assert!(half.to_bytes().is_err());
    }

    #[test]
    fn test_write_group() {
        let data = bytes("0A091719082E0A010C4440800000090C190A0E09011C42C800000F2F3901");
        let request = unconfirmed(&data).unwrap();
        let expected = WriteGroupRequest::new(
            23,
            8,
            vec![
                GroupChannelValue::new(
                    268,
                    None,
                    ChannelValue::Primitive(ApplicationValue::real(4.0)),
                ),
                GroupChannelValue::new(
                    12,
                    Some(10),
                    ChannelValue::LightingCommand(Enclosed::new(
                        0,
                        LightingCommand::new(LightingOperation::FadeTo).with_target_level(100.0),
                    )),
                ),
            ],
            Some(1),
        );
        assert_eq!(request, UnconfirmedServiceRequest::WriteGroup(expected));
        assert_eq!(request.to_bytes().unwrap(), data);
    }

    #[test]
    fn test_write_group_boolean_channel_value() {
        let data = bytes("0A091719082E0901112F");
        let UnconfirmedServiceRequest::WriteGroup(request) = unconfirmed(&data).unwrap() else {
            panic!("expected WriteGroup");
        };
        let entry = &request.change_list.value[0];
        assert!(entry.overriding_priority.is_none());
        assert_eq!(entry.value, ChannelValue::Primitive(ApplicationValue::boolean(true)));
    }
}
