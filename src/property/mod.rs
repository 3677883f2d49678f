//! BACnet Property Value Module
//!
//! A property value travels inside an opening/closing tag pair (tag 3 in
//! WriteProperty, for example). What sits between the tags depends on the
//! object type and property identifier of the request, so the caller threads
//! both into [`ConstructedData::parse`] together with the optional array
//! index. Properties without a dedicated layout fall back to
//! [`ConstructedDataBody::Unspecified`], a schema-less list of tagged values,
//! so proprietary properties still round-trip byte for byte.
//!
//! # Arrays
//!
//! Array properties ([`ArrayBody`]) read their elements until the closing
//! tag. When the request addressed array index 0 the body carries the array
//! length as an application Unsigned instead. Fixed-size arrays (priority
//! array: 16, state change values: 7) are checked only when no array index was
//! given, and only when [`CodecConfig::validate_cardinality`] is set.
//!
//! # Example
//!
//! ```
//! use bacnet_codec::encoding::Serializable;
//! use bacnet_codec::io::ReadBuffer;
//! use bacnet_codec::object::{ObjectType, PropertyIdentifier};
//! use bacnet_codec::property::{ConstructedData, ConstructedDataBody};
//!
//! // [3] { Enumerated 1 } [3]
//! let bytes = [0x3E, 0x91, 0x01, 0x3F];
//! let mut buffer = ReadBuffer::new(&bytes);
//! let data = ConstructedData::parse(
//!     &mut buffer,
//!     3,
//!     ObjectType::BinaryValue,
//!     PropertyIdentifier::PresentValue,
//!     None,
//! )
//! .unwrap();
//! assert!(matches!(data.body, ConstructedDataBody::BinaryValuePresentValue(_)));
//! assert_eq!(data.actual_value().and_then(|v| v.as_enumerated()), Some(1));
//! assert_eq!(data.to_bytes().unwrap(), bytes.to_vec());
//! ```

mod types;

pub use types::*;

pub(crate) use types::expect_application;

use crate::config::CodecConfig;
use crate::encoding::constructed::check_cardinality;
use crate::encoding::tagged::{
    AccessCredentialDisableTagged, BinaryPVTagged, DoorSecuredStatusTagged,
    EngineeringUnitsTagged, EscalatorOperationDirectionTagged,
};
use crate::encoding::{
    read_optional, read_terminated_array, ApplicationTag, ApplicationValue, ClosingTag,
    ConstructedElement, EnumeratedPayload, OpeningTag, PrimitiveValue, Serializable, TagClass,
    TagHeader, UnsignedIntegerPayload,
};
use crate::error::{ParseResult, SerializationError, SerializeResult};
use crate::event::OptionalBinaryPV;
use crate::io::{ReadBuffer, WriteBuffer};
use crate::object::{ObjectType, PropertyIdentifier};
use log::debug;


fn is_zero_index(array_index: Option<&UnsignedIntegerPayload>) -> bool {
    matches!(array_index, Some(index) if index.actual_value() == 0)
}

/// Body layout selected by an (object type, property identifier) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstructedDataKind {
    ActiveText,
    AnalogInputFaultHighLimit,
    AnalogValueFaultHighLimit,
    BbmdBroadcastDistributionTable,
    BinaryInputInterfaceValue,
    BinaryValuePresentValue,
    ControlledVariableUnits,
    CredentialDisable,
    DatePatternValueRelinquishDefault,
    DirectReading,
    DoorExtendedPulseTime,
    DoorMembers,
    FirmwareRevision,
    InputReference,
    LightingOutputTrackingValue,
    LoggingObject,
    NetworkAccessSecurityPolicies,
    NotificationThreshold,
    OperationDirection,
    PassengerAlarm,
    ProcessIdentifier,
    ProtocolRevision,
    SecuredStatus,
    SetpointReference,
    SlaveProxyEnable,
    StateChangeValues,
    UserInformationReference,
    PriorityArray,
    Unspecified,
}

impl ConstructedDataKind {
    /// Object-specific layouts win over the property-wide ones
    pub fn select(object_type: ObjectType, property: PropertyIdentifier) -> Self {
        use ObjectType as O;
        use PropertyIdentifier as P;

        match (object_type, property) {
            (O::AnalogInput, P::FaultHighLimit) => Self::AnalogInputFaultHighLimit,
            (O::AnalogValue, P::FaultHighLimit) => Self::AnalogValueFaultHighLimit,
            (O::BinaryInput, P::InterfaceValue) => Self::BinaryInputInterfaceValue,
            (O::BinaryValue, P::PresentValue) => Self::BinaryValuePresentValue,
            (O::DatePatternValue, P::RelinquishDefault) => Self::DatePatternValueRelinquishDefault,
            (O::LightingOutput, P::TrackingValue) => Self::LightingOutputTrackingValue,
            (_, P::ActiveText) => Self::ActiveText,
            (_, P::BbmdBroadcastDistributionTable) => Self::BbmdBroadcastDistributionTable,
            (_, P::ControlledVariableUnits) => Self::ControlledVariableUnits,
            (_, P::CredentialDisable) => Self::CredentialDisable,
            (_, P::DirectReading) => Self::DirectReading,
            (_, P::DoorExtendedPulseTime) => Self::DoorExtendedPulseTime,
            (_, P::DoorMembers) => Self::DoorMembers,
            (_, P::FirmwareRevision) => Self::FirmwareRevision,
            (_, P::InputReference) => Self::InputReference,
            (_, P::LoggingObject) => Self::LoggingObject,
            (_, P::NetworkAccessSecurityPolicies) => Self::NetworkAccessSecurityPolicies,
            (_, P::NotificationThreshold) => Self::NotificationThreshold,
            (_, P::OperationDirection) => Self::OperationDirection,
            (_, P::PassengerAlarm) => Self::PassengerAlarm,
            (_, P::ProcessIdentifier) => Self::ProcessIdentifier,
            (_, P::ProtocolRevision) => Self::ProtocolRevision,
            (_, P::SecuredStatus) => Self::SecuredStatus,
            (_, P::SetpointReference) => Self::SetpointReference,
            (_, P::SlaveProxyEnable) => Self::SlaveProxyEnable,
            (_, P::StateChangeValues) => Self::StateChangeValues,
            (_, P::UserInformationReference) => Self::UserInformationReference,
            (_, P::PriorityArray) => Self::PriorityArray,
            _ => Self::Unspecified,
        }
    }
}

/// Elements of an array property, or its length when index 0 was addressed
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayBody<T> {
    pub number_of_data_elements: Option<ApplicationValue>,
    pub elements: Vec<T>,
}

impl<T> ArrayBody<T> {
    pub fn new(elements: Vec<T>) -> Self {
        Self {
            number_of_data_elements: None,
            elements,
        }
    }

    /// The answer to a read of array index 0
    pub fn length_only(count: u64) -> Self {
        Self {
            number_of_data_elements: Some(ApplicationValue::unsigned(count)),
            elements: Vec::new(),
        }
    }

    pub fn number_of_data_elements(&self) -> Option<u64> {
        self.number_of_data_elements
            .as_ref()
            .and_then(|value| value.value().as_unsigned())
    }

    fn parse(
        buffer: &mut ReadBuffer,
        tag_number: u8,
        array_index: Option<&UnsignedIntegerPayload>,
        parse_element: impl FnMut(&mut ReadBuffer) -> ParseResult<T>,
    ) -> ParseResult<Self> {
        let number_of_data_elements = if is_zero_index(array_index) {
            read_optional(buffer, |buffer| {
                ApplicationValue::parse_expecting(buffer, ApplicationTag::UnsignedInt)
            })?
        } else {
            None
        };
        let elements = read_terminated_array(buffer, tag_number, parse_element)?;
        Ok(Self {
            number_of_data_elements,
            elements,
        })
    }

    fn check(
        &self,
        field: &str,
        array_index: Option<&UnsignedIntegerPayload>,
        cardinality: Option<usize>,
        config: &CodecConfig,
    ) -> SerializeResult<()> {
        if self.number_of_data_elements.is_some() && !is_zero_index(array_index) {
            return Err(SerializationError::invariant(
                "numberOfDataElements is only sent for array index 0",
            ));
        }
        if let Some(expected) = cardinality {
            check_cardinality(
                config,
                field,
                self.elements.len(),
                expected,
                array_index.is_some(),
            )
            .map_err(|err| SerializationError::invariant(err.to_string()))?;
        }
        Ok(())
    }
}

impl<T: Serializable> Serializable for ArrayBody<T> {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        self.number_of_data_elements.serialize(buffer)?;
        self.elements.serialize(buffer)
    }

    fn length_in_bits(&self) -> u32 {
        self.number_of_data_elements.length_in_bits() + self.elements.length_in_bits()
    }
}

/// The value between the opening and closing tag
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstructedDataBody {
    ActiveText(ApplicationValue),
    AnalogInputFaultHighLimit(ApplicationValue),
    AnalogValueFaultHighLimit(ApplicationValue),
    BbmdBroadcastDistributionTable(Vec<BdtEntry>),
    BinaryInputInterfaceValue(OptionalBinaryPV),
    BinaryValuePresentValue(BinaryPVTagged),
    ControlledVariableUnits(EngineeringUnitsTagged),
    CredentialDisable(AccessCredentialDisableTagged),
    DatePatternValueRelinquishDefault(ApplicationValue),
    DirectReading(ApplicationValue),
    DoorExtendedPulseTime(ApplicationValue),
    DoorMembers(ArrayBody<DeviceObjectReference>),
    FirmwareRevision(ApplicationValue),
    InputReference(ObjectPropertyReference),
    LightingOutputTrackingValue(ApplicationValue),
    LoggingObject(ApplicationValue),
    NetworkAccessSecurityPolicies(ArrayBody<NetworkSecurityPolicy>),
    NotificationThreshold(ApplicationValue),
    OperationDirection(EscalatorOperationDirectionTagged),
    PassengerAlarm(ApplicationValue),
    ProcessIdentifier(ApplicationValue),
    ProtocolRevision(ApplicationValue),
    SecuredStatus(DoorSecuredStatusTagged),
    SetpointReference(SetpointReference),
    SlaveProxyEnable(ApplicationValue),
    StateChangeValues(ArrayBody<TimerStateChangeValue>),
    UserInformationReference(ApplicationValue),
    PriorityArray(ArrayBody<PriorityValue>),
    Unspecified(Vec<ConstructedElement>),
}

impl ConstructedDataBody {
    fn parse(
        buffer: &mut ReadBuffer,
        tag_number: u8,
        kind: ConstructedDataKind,
        array_index: Option<&UnsignedIntegerPayload>,
    ) -> ParseResult<Self> {
        use ApplicationTag as A;
        use ConstructedDataKind as K;

        let enumerated = ApplicationTag::Enumerated as u8;
        let body = match kind {
            K::ActiveText => Self::ActiveText(expect_application(buffer, A::CharacterString)?),
            K::AnalogInputFaultHighLimit => {
                Self::AnalogInputFaultHighLimit(expect_application(buffer, A::Real)?)
            }
            K::AnalogValueFaultHighLimit => {
                Self::AnalogValueFaultHighLimit(expect_application(buffer, A::Real)?)
            }
            K::BbmdBroadcastDistributionTable => Self::BbmdBroadcastDistributionTable(
                read_terminated_array(buffer, tag_number, BdtEntry::parse)?,
            ),
            K::BinaryInputInterfaceValue => {
                Self::BinaryInputInterfaceValue(OptionalBinaryPV::parse(buffer)?)
            }
            K::BinaryValuePresentValue => Self::BinaryValuePresentValue(BinaryPVTagged::parse(
                buffer,
                enumerated,
                TagClass::Application,
            )?),
            K::ControlledVariableUnits => Self::ControlledVariableUnits(
                EngineeringUnitsTagged::parse(buffer, enumerated, TagClass::Application)?,
            ),
            K::CredentialDisable => Self::CredentialDisable(AccessCredentialDisableTagged::parse(
                buffer,
                enumerated,
                TagClass::Application,
            )?),
            K::DatePatternValueRelinquishDefault => {
                Self::DatePatternValueRelinquishDefault(expect_application(buffer, A::Date)?)
            }
            K::DirectReading => Self::DirectReading(expect_application(buffer, A::Real)?),
            K::DoorExtendedPulseTime => {
                Self::DoorExtendedPulseTime(expect_application(buffer, A::UnsignedInt)?)
            }
            K::DoorMembers => Self::DoorMembers(ArrayBody::parse(
                buffer,
                tag_number,
                array_index,
                DeviceObjectReference::parse,
            )?),
            K::FirmwareRevision => {
                Self::FirmwareRevision(expect_application(buffer, A::CharacterString)?)
            }
            K::InputReference => Self::InputReference(ObjectPropertyReference::parse(buffer)?),
            K::LightingOutputTrackingValue => {
                Self::LightingOutputTrackingValue(expect_application(buffer, A::Real)?)
            }
            K::LoggingObject => {
                Self::LoggingObject(expect_application(buffer, A::ObjectIdentifier)?)
            }
            K::NetworkAccessSecurityPolicies => Self::NetworkAccessSecurityPolicies(
                ArrayBody::parse(buffer, tag_number, array_index, NetworkSecurityPolicy::parse)?,
            ),
            K::NotificationThreshold => {
                Self::NotificationThreshold(expect_application(buffer, A::UnsignedInt)?)
            }
            K::OperationDirection => Self::OperationDirection(
                EscalatorOperationDirectionTagged::parse(buffer, enumerated, TagClass::Application)?,
            ),
            K::PassengerAlarm => Self::PassengerAlarm(expect_application(buffer, A::Boolean)?),
            K::ProcessIdentifier => {
                Self::ProcessIdentifier(expect_application(buffer, A::UnsignedInt)?)
            }
            K::ProtocolRevision => {
                Self::ProtocolRevision(expect_application(buffer, A::UnsignedInt)?)
            }
            K::SecuredStatus => Self::SecuredStatus(DoorSecuredStatusTagged::parse(
                buffer,
                enumerated,
                TagClass::Application,
            )?),
            K::SetpointReference => Self::SetpointReference(SetpointReference::parse(buffer)?),
            K::SlaveProxyEnable => {
                Self::SlaveProxyEnable(expect_application(buffer, A::Boolean)?)
            }
            K::StateChangeValues => {
                let body =
                    ArrayBody::parse(buffer, tag_number, array_index, TimerStateChangeValue::parse)?;
                check_cardinality(
                    buffer.config(),
                    "stateChangeValues",
                    body.elements.len(),
                    7,
                    array_index.is_some(),
                )?;
                Self::StateChangeValues(body)
            }
            K::UserInformationReference => {
                Self::UserInformationReference(expect_application(buffer, A::CharacterString)?)
            }
            K::PriorityArray => {
                let body = ArrayBody::parse(buffer, tag_number, array_index, PriorityValue::parse)?;
                check_cardinality(
                    buffer.config(),
                    "priorityValues",
                    body.elements.len(),
                    16,
                    array_index.is_some(),
                )?;
                Self::PriorityArray(body)
            }
            K::Unspecified => Self::Unspecified(read_terminated_array(
                buffer,
                tag_number,
                ConstructedElement::parse,
            )?),
        };
        Ok(body)
    }

    pub fn kind(&self) -> ConstructedDataKind {
        use ConstructedDataKind as K;

        match self {
            Self::ActiveText(_) => K::ActiveText,
            Self::AnalogInputFaultHighLimit(_) => K::AnalogInputFaultHighLimit,
            Self::AnalogValueFaultHighLimit(_) => K::AnalogValueFaultHighLimit,
            Self::BbmdBroadcastDistributionTable(_) => K::BbmdBroadcastDistributionTable,
            Self::BinaryInputInterfaceValue(_) => K::BinaryInputInterfaceValue,
            Self::BinaryValuePresentValue(_) => K::BinaryValuePresentValue,
            Self::ControlledVariableUnits(_) => K::ControlledVariableUnits,
            Self::CredentialDisable(_) => K::CredentialDisable,
            Self::DatePatternValueRelinquishDefault(_) => K::DatePatternValueRelinquishDefault,
            Self::DirectReading(_) => K::DirectReading,
            Self::DoorExtendedPulseTime(_) => K::DoorExtendedPulseTime,
            Self::DoorMembers(_) => K::DoorMembers,
            Self::FirmwareRevision(_) => K::FirmwareRevision,
            Self::InputReference(_) => K::InputReference,
            Self::LightingOutputTrackingValue(_) => K::LightingOutputTrackingValue,
            Self::LoggingObject(_) => K::LoggingObject,
            Self::NetworkAccessSecurityPolicies(_) => K::NetworkAccessSecurityPolicies,
            Self::NotificationThreshold(_) => K::NotificationThreshold,
            Self::OperationDirection(_) => K::OperationDirection,
            Self::PassengerAlarm(_) => K::PassengerAlarm,
            Self::ProcessIdentifier(_) => K::ProcessIdentifier,
            Self::ProtocolRevision(_) => K::ProtocolRevision,
            Self::SecuredStatus(_) => K::SecuredStatus,
            Self::SetpointReference(_) => K::SetpointReference,
            Self::SlaveProxyEnable(_) => K::SlaveProxyEnable,
            Self::StateChangeValues(_) => K::StateChangeValues,
            Self::UserInformationReference(_) => K::UserInformationReference,
            Self::PriorityArray(_) => K::PriorityArray,
            Self::Unspecified(_) => K::Unspecified,
        }
    }

    /// Single primitive carried by the body, if it has exactly one
    pub fn actual_value(&self) -> Option<PrimitiveValue> {
        let enumerated = |value: u32| PrimitiveValue::Enumerated(EnumeratedPayload::new(value));
        match self {
            Self::ActiveText(value)
            | Self::AnalogInputFaultHighLimit(value)
            | Self::AnalogValueFaultHighLimit(value)
            | Self::DatePatternValueRelinquishDefault(value)
            | Self::DirectReading(value)
            | Self::DoorExtendedPulseTime(value)
            | Self::FirmwareRevision(value)
            | Self::LightingOutputTrackingValue(value)
            | Self::LoggingObject(value)
            | Self::NotificationThreshold(value)
            | Self::PassengerAlarm(value)
            | Self::ProcessIdentifier(value)
            | Self::ProtocolRevision(value)
            | Self::SlaveProxyEnable(value)
            | Self::UserInformationReference(value) => Some(value.value().clone()),
            Self::BinaryInputInterfaceValue(value) => Some(value.actual_value()),
            Self::BinaryValuePresentValue(value) => Some(enumerated(value.actual_value())),
            Self::ControlledVariableUnits(value) => Some(enumerated(value.actual_value())),
            Self::CredentialDisable(value) => Some(enumerated(value.actual_value())),
            Self::OperationDirection(value) => Some(enumerated(value.actual_value())),
            Self::SecuredStatus(value) => Some(enumerated(value.actual_value())),
            Self::BbmdBroadcastDistributionTable(_)
            | Self::DoorMembers(_)
            | Self::InputReference(_)
            | Self::NetworkAccessSecurityPolicies(_)
            | Self::SetpointReference(_)
            | Self::StateChangeValues(_)
            | Self::PriorityArray(_)
            | Self::Unspecified(_) => None,
        }
    }

    fn check(
        &self,
        array_index: Option<&UnsignedIntegerPayload>,
        config: &CodecConfig,
    ) -> SerializeResult<()> {
        match self {
            Self::DoorMembers(body) => body.check("doorMembers", array_index, None, config),
            Self::NetworkAccessSecurityPolicies(body) => {
                body.check("networkAccessSecurityPolicies", array_index, None, config)
            }
            Self::StateChangeValues(body) => {
                body.check("stateChangeValues", array_index, Some(7), config)
            }
            Self::PriorityArray(body) => body.check("priorityValues", array_index, Some(16), config),
            _ => Ok(()),
        }
    }

    fn inner(&self) -> &dyn Serializable {
        match self {
            Self::ActiveText(value)
            | Self::AnalogInputFaultHighLimit(value)
            | Self::AnalogValueFaultHighLimit(value)
            | Self::DatePatternValueRelinquishDefault(value)
            | Self::DirectReading(value)
            | Self::DoorExtendedPulseTime(value)
            | Self::FirmwareRevision(value)
            | Self::LightingOutputTrackingValue(value)
            | Self::LoggingObject(value)
            | Self::NotificationThreshold(value)
            | Self::PassengerAlarm(value)
            | Self::ProcessIdentifier(value)
            | Self::ProtocolRevision(value)
            | Self::SlaveProxyEnable(value)
            | Self::UserInformationReference(value) => value,
            Self::BbmdBroadcastDistributionTable(value) => value,
            Self::BinaryInputInterfaceValue(value) => value,
            Self::BinaryValuePresentValue(value) => value,
            Self::ControlledVariableUnits(value) => value,
            Self::CredentialDisable(value) => value,
            Self::DoorMembers(value) => value,
            Self::InputReference(value) => value,
            Self::NetworkAccessSecurityPolicies(value) => value,
            Self::OperationDirection(value) => value,
            Self::SecuredStatus(value) => value,
            Self::SetpointReference(value) => value,
            Self::StateChangeValues(value) => value,
            Self::PriorityArray(value) => value,
            Self::Unspecified(value) => value,
        }
    }
}

impl Serializable for ConstructedDataBody {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        self.inner().serialize(buffer)
    }

    fn length_in_bits(&self) -> u32 {
        self.inner().length_in_bits()
    }
}

/// A property value bracketed by opening and closing tag `n`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructedData {
    pub opening_tag: OpeningTag,
    pub body: ConstructedDataBody,
    pub closing_tag: ClosingTag,
    object_type: Option<ObjectType>,
    property_identifier: Option<PropertyIdentifier>,
    array_index: Option<UnsignedIntegerPayload>,
}

impl ConstructedData {
    pub fn new(
        tag_number: u8,
        object_type: ObjectType,
        property_identifier: PropertyIdentifier,
        array_index: Option<UnsignedIntegerPayload>,
        body: ConstructedDataBody,
    ) -> Self {
        Self {
            opening_tag: OpeningTag::new(tag_number),
            body,
            closing_tag: ClosingTag::new(tag_number),
            object_type: Some(object_type),
            property_identifier: Some(property_identifier),
            array_index,
        }
    }

    /// Schema-less value whose property is not known to the caller
    pub fn unspecified(tag_number: u8, elements: Vec<ConstructedElement>) -> Self {
        Self {
            opening_tag: OpeningTag::new(tag_number),
            body: ConstructedDataBody::Unspecified(elements),
            closing_tag: ClosingTag::new(tag_number),
            object_type: None,
            property_identifier: None,
            array_index: None,
        }
    }

    pub fn parse(
        buffer: &mut ReadBuffer,
        tag_number: u8,
        object_type: ObjectType,
        property_identifier: PropertyIdentifier,
        array_index: Option<&UnsignedIntegerPayload>,
    ) -> ParseResult<Self> {
        let kind = ConstructedDataKind::select(object_type, property_identifier);
        let mut data = Self::parse_kind(buffer, tag_number, kind, array_index)?;
        data.object_type = Some(object_type);
        data.property_identifier = Some(property_identifier);
        Ok(data)
    }

    /// Parse a value whose property is not known, only the object it belongs to
    pub fn parse_unspecified(
        buffer: &mut ReadBuffer,
        tag_number: u8,
        object_type: Option<ObjectType>,
    ) -> ParseResult<Self> {
        let mut data =
            Self::parse_kind(buffer, tag_number, ConstructedDataKind::Unspecified, None)?;
        data.object_type = object_type;
        Ok(data)
    }

    fn parse_kind(
        buffer: &mut ReadBuffer,
        tag_number: u8,
        kind: ConstructedDataKind,
        array_index: Option<&UnsignedIntegerPayload>,
    ) -> ParseResult<Self> {
        buffer.scoped("ConstructedData", |buffer| {
            let opening_tag = OpeningTag::parse(buffer, tag_number)?;
            let peeked = buffer.peek(TagHeader::parse)?;
            debug!(
                "ConstructedData {:?} at tag {} starts with {}",
                kind, tag_number, peeked
            );
            let body = ConstructedDataBody::parse(buffer, tag_number, kind, array_index)?;
            let closing_tag = ClosingTag::parse(buffer, tag_number)?;
            Ok(Self {
                opening_tag,
                body,
                closing_tag,
                object_type: None,
                property_identifier: None,
                array_index: array_index.copied(),
            })
        })
    }

    pub fn tag_number(&self) -> u8 {
        self.opening_tag.tag_number()
    }

    pub fn object_type(&self) -> Option<ObjectType> {
        self.object_type
    }

    pub fn property_identifier(&self) -> Option<PropertyIdentifier> {
        self.property_identifier
    }

    pub fn array_index(&self) -> Option<u64> {
        self.array_index.map(|index| index.actual_value())
    }

    pub fn actual_value(&self) -> Option<PrimitiveValue> {
        self.body.actual_value()
    }

    /// Header of the first thing after the opening tag
    ///
    /// Recomputed from the body; an empty body yields the closing tag.
    pub fn peeked_tag_header(&self) -> Option<TagHeader> {
        let mut buffer = WriteBuffer::new();
        self.body.serialize(&mut buffer).ok()?;
        if buffer.as_bytes().is_empty() {
            return Some(self.closing_tag.header);
        }
        TagHeader::parse(&mut ReadBuffer::new(buffer.as_bytes())).ok()
    }

    fn check(&self, config: &CodecConfig) -> SerializeResult<()> {
        if self.opening_tag.tag_number() != self.closing_tag.tag_number() {
            return Err(SerializationError::invariant(format!(
                "opening tag {} closed by tag {}",
                self.opening_tag.tag_number(),
                self.closing_tag.tag_number()
            )));
        }
        let expected = match (self.object_type, self.property_identifier) {
            (Some(object_type), Some(property)) => {
                ConstructedDataKind::select(object_type, property)
            }
            _ => ConstructedDataKind::Unspecified,
        };
        if self.body.kind() != expected {
            return Err(SerializationError::invariant(format!(
                "{:?} body cannot carry {:?}",
                self.body.kind(),
                expected
            )));
        }
        self.body.check(self.array_index.as_ref(), config)
    }
}

impl Serializable for ConstructedData {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("ConstructedData", |buffer| {
            self.check(buffer.config())?;
            self.opening_tag.serialize(buffer)?;
            self.body.serialize(buffer)?;
            self.closing_tag.serialize(buffer)
        })
    }

    fn length_in_bits(&self) -> u32 {
        self.opening_tag.length_in_bits()
            + self.body.length_in_bits()
            + self.closing_tag.length_in_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::object::{BinaryPV, ObjectIdentifier};

    fn parse(
        data: &[u8],
        object_type: ObjectType,
        property: PropertyIdentifier,
        array_index: Option<u64>,
    ) -> ParseResult<ConstructedData> {
        let index = array_index.map(UnsignedIntegerPayload::new);
        let mut buffer = ReadBuffer::new(data);
        ConstructedData::parse(&mut buffer, 3, object_type, property, index.as_ref())
    }

    fn priority_array(slots: usize) -> Vec<u8> {
        let mut data = vec![0x3E];
        data.extend(std::iter::repeat(0x00).take(slots));
        data.push(0x3F);
        data
    }

    #[test]
    fn test_kind_selection() {
        use ConstructedDataKind as K;
        assert_eq!(
            K::select(ObjectType::BinaryValue, PropertyIdentifier::PresentValue),
            K::BinaryValuePresentValue
        );
        assert_eq!(
            K::select(ObjectType::AnalogValue, PropertyIdentifier::PresentValue),
            K::Unspecified
        );
        assert_eq!(
            K::select(ObjectType::AnalogInput, PropertyIdentifier::FaultHighLimit),
            K::AnalogInputFaultHighLimit
        );
        assert_eq!(
            K::select(ObjectType::Device, PropertyIdentifier::PriorityArray),
            K::PriorityArray
        );
        assert_eq!(
            K::select(ObjectType::Device, PropertyIdentifier::from(600u32)),
            K::Unspecified
        );
    }

    #[test]
    fn test_active_text() {
        let data = hex::decode("3E73004F6E3F").unwrap();
        let value = parse(&data, ObjectType::BinaryInput, PropertyIdentifier::ActiveText, None)
            .unwrap();
        assert_eq!(
            value.actual_value().and_then(|v| v.as_text()).as_deref(),
            Some("On")
        );
        assert_eq!(value.to_bytes().unwrap(), data);
        assert_eq!(value.length_in_bytes() as usize, data.len());

        let header = value.peeked_tag_header().unwrap();
        assert_eq!(header.actual_tag_number(), ApplicationTag::CharacterString as u8);
    }

    #[test]
    fn test_wrong_primitive_type_is_validation() {
        let data = [0x3E, 0x21, 0x05, 0x3F];
        let err = parse(&data, ObjectType::BinaryInput, PropertyIdentifier::ActiveText, None)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_binary_value_present_value() {
        let data = [0x3E, 0x91, 0x01, 0x3F];
        let value = parse(&data, ObjectType::BinaryValue, PropertyIdentifier::PresentValue, None)
            .unwrap();
        match &value.body {
            ConstructedDataBody::BinaryValuePresentValue(tagged) => {
                assert_eq!(tagged.value, BinaryPV::Active)
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_interface_value_null() {
        let data = [0x3E, 0x00, 0x3F];
        let value = parse(&data, ObjectType::BinaryInput, PropertyIdentifier::InterfaceValue, None)
            .unwrap();
        assert_eq!(value.actual_value(), Some(PrimitiveValue::Null));
        assert_eq!(value.to_bytes().unwrap(), data.to_vec());
    }

    #[test]
    fn test_priority_array_cardinality() {
        let value = parse(
            &priority_array(16),
            ObjectType::AnalogOutput,
            PropertyIdentifier::PriorityArray,
            None,
        )
        .unwrap();
        match &value.body {
            ConstructedDataBody::PriorityArray(body) => {
                assert_eq!(body.elements.len(), 16);
                assert!(body.elements.iter().all(PriorityValue::is_null));
            }
            other => panic!("unexpected body {:?}", other),
        }
        assert_eq!(value.to_bytes().unwrap(), priority_array(16));

        let err = parse(
            &priority_array(15),
            ObjectType::AnalogOutput,
            PropertyIdentifier::PriorityArray,
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ParseError::validation("priorityValues should have exactly 16 values")
        );

        // a single addressed element is not counted
        assert!(parse(
            &priority_array(1),
            ObjectType::AnalogOutput,
            PropertyIdentifier::PriorityArray,
            Some(8),
        )
        .is_ok());
    }

    #[test]
    fn test_cardinality_can_be_disabled() {
        let data = priority_array(3);
        let config = CodecConfig::default().with_cardinality_validation(false);
        let mut buffer = ReadBuffer::with_config(&data, config);
        let value = ConstructedData::parse(
            &mut buffer,
            3,
            ObjectType::AnalogOutput,
            PropertyIdentifier::PriorityArray,
            None,
        )
        .unwrap();

        assert!(value.to_bytes().is_err());
        let mut writer = WriteBuffer::with_config(config);
        value.serialize(&mut writer).unwrap();
        assert_eq!(writer.into_vec(), data);
    }

    #[test]
    fn test_array_index_zero_carries_length() {
        let data = [0x3E, 0x21, 0x10, 0x3F];
        let value = parse(
            &data,
            ObjectType::AnalogOutput,
            PropertyIdentifier::PriorityArray,
            Some(0),
        )
        .unwrap();
        match &value.body {
            ConstructedDataBody::PriorityArray(body) => {
                assert_eq!(body.number_of_data_elements(), Some(16));
                assert!(body.elements.is_empty());
            }
            other => panic!("unexpected body {:?}", other),
        }
        assert_eq!(value.array_index(), Some(0));
        assert_eq!(value.to_bytes().unwrap(), data.to_vec());

        // without the index the same bytes are one element and fail the count
        assert!(parse(&data, ObjectType::AnalogOutput, PropertyIdentifier::PriorityArray, None)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_state_change_values() {
        let mut data = vec![0x3E];
        data.extend([0x08, 0x11, 0x21, 0x05, 0x00, 0x44, 0x3F, 0x80, 0x00, 0x00, 0x10, 0x91, 0x02]);
        data.push(0x3F);
        let value = parse(&data, ObjectType::Timer, PropertyIdentifier::StateChangeValues, None)
            .unwrap();
        match &value.body {
            ConstructedDataBody::StateChangeValues(body) => {
                assert_eq!(body.elements.len(), 7);
                assert!(matches!(body.elements[0], TimerStateChangeValue::NoValue(_)));
            }
            other => panic!("unexpected body {:?}", other),
        }
        assert_eq!(value.to_bytes().unwrap(), data);
    }

    #[test]
    fn test_door_members() {
        let body = ConstructedDataBody::DoorMembers(ArrayBody::new(vec![
            DeviceObjectReference::new(None, ObjectIdentifier::new(ObjectType::AccessDoor, 1)),
            DeviceObjectReference::new(None, ObjectIdentifier::new(ObjectType::AccessDoor, 2)),
        ]));
        let value = ConstructedData::new(
            3,
            ObjectType::AccessZone,
            PropertyIdentifier::DoorMembers,
            None,
            body,
        );
        let data = value.to_bytes().unwrap();
        let parsed = parse(&data, ObjectType::AccessZone, PropertyIdentifier::DoorMembers, None)
            .unwrap();
        assert_eq!(parsed, value);
        assert_eq!(parsed.actual_value(), None);
    }

    #[test]
    fn test_unspecified_keeps_everything() {
        let data = hex::decode("3E21051A01024E91014F3F").unwrap();
        let value = parse(
            &data,
            ObjectType::Device,
            PropertyIdentifier::from(600u32),
            None,
        )
        .unwrap();
        match &value.body {
            ConstructedDataBody::Unspecified(elements) => assert_eq!(elements.len(), 3),
            other => panic!("unexpected body {:?}", other),
        }
        assert_eq!(value.to_bytes().unwrap(), data);

        let mut buffer = ReadBuffer::new(&data);
        let schema_less = ConstructedData::parse_unspecified(&mut buffer, 3, None).unwrap();
        assert_eq!(schema_less.body, value.body);
        assert_eq!(schema_less.property_identifier(), None);
    }

    #[test]
    fn test_empty_body_peeks_closing_tag() {
        let value = ConstructedData::unspecified(2, Vec::new());
        assert_eq!(value.to_bytes().unwrap(), vec![0x2E, 0x2F]);
        assert_eq!(value.peeked_tag_header(), Some(TagHeader::closing(2)));
    }

    #[test]
    fn test_serialize_invariants() {
        let mismatched = ConstructedData::new(
            3,
            ObjectType::BinaryValue,
            PropertyIdentifier::PresentValue,
            None,
            ConstructedDataBody::ActiveText(ApplicationValue::character_string("On")),
        );
        assert!(matches!(
            mismatched.to_bytes(),
            Err(SerializationError::Invariant(_))
        ));

        let stray_length = ConstructedData::new(
            3,
            ObjectType::AccessZone,
            PropertyIdentifier::DoorMembers,
            None,
            ConstructedDataBody::DoorMembers(ArrayBody::length_only(2)),
        );
        assert!(stray_length.to_bytes().is_err());

        let short = ConstructedData::new(
            3,
            ObjectType::AnalogOutput,
            PropertyIdentifier::PriorityArray,
            None,
            ConstructedDataBody::PriorityArray(ArrayBody::new(vec![PriorityValue::null()])),
        );
        assert!(short.to_bytes().is_err());
    }

    #[test]
    fn test_missing_closing_tag() {
        let data = [0x3E, 0x91, 0x01];
        assert!(parse(&data, ObjectType::BinaryValue, PropertyIdentifier::PresentValue, None)
            .is_err());
    }
}
