//! Structured values that appear inside property data.

use crate::encoding::tagged::{
    LightingOperationTagged, PropertyIdentifierTagged, SecurityLevelTagged,
};
use crate::encoding::{
    read_optional, ApplicationTag, ApplicationValue, ConstructedValue, ContextValue, DataType,
    DatePayload, Enclosed, Serializable, TagClass, TagHeader, TimePayload,
};
use crate::error::{ParseError, ParseResult, SerializeResult};
use crate::io::{ReadBuffer, WriteBuffer};
use crate::object::{LightingOperation, ObjectIdentifier, PropertyIdentifier, SecurityLevel};
use crate::util::impl_serializable_sequence;
use log::trace;


/// Application value of type `tag`; any other type is a validation failure
pub(crate) fn expect_application(
    buffer: &mut ReadBuffer,
    tag: ApplicationTag,
) -> ParseResult<ApplicationValue> {
    let value = ApplicationValue::parse(buffer)?;
    if value.tag()? != tag {
        return Err(ParseError::validation(format!(
            "expected application tag {:?}, found {}",
            tag,
            value.header()
        )));
    }
    Ok(value)
}

fn optional_context(
    buffer: &mut ReadBuffer,
    tag_number: u8,
    data_type: DataType,
) -> ParseResult<Option<ContextValue>> {
    read_optional(buffer, |buffer| ContextValue::parse(buffer, tag_number, data_type))
}

/// BACnetDeviceObjectReference
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceObjectReference {
    pub device_identifier: Option<ContextValue>,
    pub object_identifier: ContextValue,
}

impl DeviceObjectReference {
    pub fn new(device: Option<ObjectIdentifier>, object: ObjectIdentifier) -> Self {
        Self {
            device_identifier: device.map(|device| ContextValue::object_identifier(0, device)),
            object_identifier: ContextValue::object_identifier(1, object),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("DeviceObjectReference", |buffer| {
            let device_identifier = optional_context(buffer, 0, DataType::ObjectIdentifier)?;
            let object_identifier = ContextValue::parse(buffer, 1, DataType::ObjectIdentifier)?;
            Ok(Self {
                device_identifier,
                object_identifier,
            })
        })
    }

    pub fn device(&self) -> Option<ObjectIdentifier> {
        self.device_identifier
            .as_ref()
            .and_then(|value| value.value().as_object_identifier())
    }

    pub fn object(&self) -> Option<ObjectIdentifier> {
        self.object_identifier.value().as_object_identifier()
    }
}

impl_serializable_sequence!(
    DeviceObjectReference,
    "DeviceObjectReference",
    [device_identifier, object_identifier]
);

/// BACnetObjectPropertyReference
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectPropertyReference {
    pub object_identifier: ContextValue,
    pub property_identifier: PropertyIdentifierTagged,
    pub array_index: Option<ContextValue>,
}

impl ObjectPropertyReference {
    pub fn new(
        object: ObjectIdentifier,
        property: PropertyIdentifier,
        array_index: Option<u64>,
    ) -> Self {
        Self {
            object_identifier: ContextValue::object_identifier(0, object),
            property_identifier: PropertyIdentifierTagged::context(1, property),
            array_index: array_index.map(|index| ContextValue::unsigned(2, index)),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("ObjectPropertyReference", |buffer| {
            let object_identifier = ContextValue::parse(buffer, 0, DataType::ObjectIdentifier)?;
            let property_identifier =
                PropertyIdentifierTagged::parse(buffer, 1, TagClass::ContextSpecific)?;
            let array_index = optional_context(buffer, 2, DataType::UnsignedInteger)?;
            Ok(Self {
                object_identifier,
                property_identifier,
                array_index,
            })
        })
    }

    pub fn object(&self) -> Option<ObjectIdentifier> {
        self.object_identifier.value().as_object_identifier()
    }

    pub fn property(&self) -> PropertyIdentifier {
        self.property_identifier.value
    }

    pub fn array_index(&self) -> Option<u64> {
        self.array_index
            .as_ref()
            .and_then(|value| value.value().as_unsigned())
    }
}

impl_serializable_sequence!(
    ObjectPropertyReference,
    "ObjectPropertyReference",
    [object_identifier, property_identifier, array_index]
);

pub type ObjectPropertyReferenceEnclosed = Enclosed<ObjectPropertyReference>;

/// BACnetDeviceObjectPropertyReference
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceObjectPropertyReference {
    pub object_identifier: ContextValue,
    pub property_identifier: PropertyIdentifierTagged,
    pub array_index: Option<ContextValue>,
    pub device_identifier: Option<ContextValue>,
}

impl DeviceObjectPropertyReference {
    pub fn new(
        object: ObjectIdentifier,
        property: PropertyIdentifier,
        array_index: Option<u64>,
        device: Option<ObjectIdentifier>,
    ) -> Self {
        Self {
            object_identifier: ContextValue::object_identifier(0, object),
            property_identifier: PropertyIdentifierTagged::context(1, property),
            array_index: array_index.map(|index| ContextValue::unsigned(2, index)),
            device_identifier: device.map(|device| ContextValue::object_identifier(3, device)),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("DeviceObjectPropertyReference", |buffer| {
            let object_identifier = ContextValue::parse(buffer, 0, DataType::ObjectIdentifier)?;
            let property_identifier =
                PropertyIdentifierTagged::parse(buffer, 1, TagClass::ContextSpecific)?;
            let array_index = optional_context(buffer, 2, DataType::UnsignedInteger)?;
            let device_identifier = optional_context(buffer, 3, DataType::ObjectIdentifier)?;
            Ok(Self {
                object_identifier,
                property_identifier,
                array_index,
                device_identifier,
            })
        })
    }

    pub fn object(&self) -> Option<ObjectIdentifier> {
        self.object_identifier.value().as_object_identifier()
    }

    pub fn device(&self) -> Option<ObjectIdentifier> {
        self.device_identifier
            .as_ref()
            .and_then(|value| value.value().as_object_identifier())
    }
}

impl_serializable_sequence!(
    DeviceObjectPropertyReference,
    "DeviceObjectPropertyReference",
    [object_identifier, property_identifier, array_index, device_identifier]
);

pub type DeviceObjectPropertyReferenceEnclosed = Enclosed<DeviceObjectPropertyReference>;

/// BACnetSetpointReference: an optional enclosed reference at tag 0
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetpointReference {
    pub setpoint_reference: Option<ObjectPropertyReferenceEnclosed>,
}

impl SetpointReference {
    pub fn new(reference: Option<ObjectPropertyReference>) -> Self {
        Self {
            setpoint_reference: reference.map(|reference| Enclosed::new(0, reference)),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("SetpointReference", |buffer| {
            let setpoint_reference = read_optional(buffer, |buffer| {
                Enclosed::parse(buffer, 0, ObjectPropertyReference::parse)
            })?;
            Ok(Self { setpoint_reference })
        })
    }
}

impl_serializable_sequence!(SetpointReference, "SetpointReference", [setpoint_reference]);

/// BACnetDateTime: application date followed by application time
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateTime {
    pub date: ApplicationValue,
    pub time: ApplicationValue,
}

impl DateTime {
    pub fn new(date: DatePayload, time: TimePayload) -> Self {
        Self {
            date: ApplicationValue::date(date),
            time: ApplicationValue::time(time),
        }
    }

    pub fn from_naive(value: chrono::NaiveDateTime) -> Self {
        Self::new(
            DatePayload::from_naive_date(value.date()),
            TimePayload::from_naive_time(value.time()),
        )
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("DateTime", |buffer| {
            let date = expect_application(buffer, ApplicationTag::Date)?;
            let time = expect_application(buffer, ApplicationTag::Time)?;
            Ok(Self { date, time })
        })
    }

    /// `None` when either part holds a wildcard
    pub fn to_naive(&self) -> Option<chrono::NaiveDateTime> {
        let date = self.date.value().as_date()?.to_naive_date()?;
        let time = self.time.value().as_time()?.to_naive_time()?;
        Some(date.and_time(time))
    }
}

impl_serializable_sequence!(DateTime, "DateTime", [date, time]);

pub type DateTimeEnclosed = Enclosed<DateTime>;

/// BACnetLightingCommand
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightingCommand {
    pub lighting_operation: LightingOperationTagged,
    pub target_level: Option<ContextValue>,
    pub ramp_rate: Option<ContextValue>,
    pub step_increment: Option<ContextValue>,
    pub fade_time: Option<ContextValue>,
    pub priority: Option<ContextValue>,
}

impl LightingCommand {
    pub fn new(operation: LightingOperation) -> Self {
        Self {
            lighting_operation: LightingOperationTagged::context(0, operation),
            target_level: None,
            ramp_rate: None,
            step_increment: None,
            fade_time: None,
            priority: None,
        }
    }

    pub fn with_target_level(mut self, level: f32) -> Self {
        self.target_level = Some(ContextValue::real(1, level));
        self
    }

    pub fn with_ramp_rate(mut self, rate: f32) -> Self {
        self.ramp_rate = Some(ContextValue::real(2, rate));
        self
    }

    pub fn with_step_increment(mut self, increment: f32) -> Self {
        self.step_increment = Some(ContextValue::real(3, increment));
        self
    }

    pub fn with_fade_time(mut self, millis: u64) -> Self {
        self.fade_time = Some(ContextValue::unsigned(4, millis));
        self
    }

    pub fn with_priority(mut self, priority: u64) -> Self {
        self.priority = Some(ContextValue::unsigned(5, priority));
        self
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("LightingCommand", |buffer| {
            let lighting_operation =
                LightingOperationTagged::parse(buffer, 0, TagClass::ContextSpecific)?;
            let target_level = optional_context(buffer, 1, DataType::Real)?;
            let ramp_rate = optional_context(buffer, 2, DataType::Real)?;
            let step_increment = optional_context(buffer, 3, DataType::Real)?;
            let fade_time = optional_context(buffer, 4, DataType::UnsignedInteger)?;
            let priority = optional_context(buffer, 5, DataType::UnsignedInteger)?;
            Ok(Self {
                lighting_operation,
                target_level,
                ramp_rate,
                step_increment,
                fade_time,
                priority,
            })
        })
    }
}

impl_serializable_sequence!(
    LightingCommand,
    "LightingCommand",
    [
        lighting_operation,
        target_level,
        ramp_rate,
        step_increment,
        fade_time,
        priority
    ]
);

/// BACnetTimerStateChangeValue
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerStateChangeValue {
    /// Any application-tagged primitive
    Primitive(ApplicationValue),
    /// Context 0 null
    NoValue(ContextValue),
    ConstructedValue(ConstructedValue),
    DateTime(DateTimeEnclosed),
    LightingCommand(Enclosed<LightingCommand>),
}

impl TimerStateChangeValue {
    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("TimerStateChangeValue", |buffer| {
            let peeked = buffer.peek(TagHeader::parse)?;
            trace!("TimerStateChangeValue peeked {}", peeked);
            if peeked.is_application() {
                return Ok(Self::Primitive(ApplicationValue::parse(buffer)?));
            }
            match peeked.actual_tag_number() {
                0 => Ok(Self::NoValue(ContextValue::parse(buffer, 0, DataType::Null)?)),
                1 => Ok(Self::ConstructedValue(ConstructedValue::parse(buffer, 1)?)),
                2 => Ok(Self::DateTime(Enclosed::parse(buffer, 2, DateTime::parse)?)),
                3 => Ok(Self::LightingCommand(Enclosed::parse(
                    buffer,
                    3,
                    LightingCommand::parse,
                )?)),
                other => Err(ParseError::unsupported("TimerStateChangeValue", other)),
            }
        })
    }
}

impl Serializable for TimerStateChangeValue {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        buffer.scoped("TimerStateChangeValue", |buffer| match self {
            Self::Primitive(value) => value.serialize(buffer),
            Self::NoValue(value) => value.serialize(buffer),
            Self::ConstructedValue(value) => value.serialize(buffer),
            Self::DateTime(value) => value.serialize(buffer),
            Self::LightingCommand(value) => value.serialize(buffer),
        })
    }

    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Primitive(value) => value.length_in_bits(),
            Self::NoValue(value) => value.length_in_bits(),
            Self::ConstructedValue(value) => value.length_in_bits(),
            Self::DateTime(value) => value.length_in_bits(),
            Self::LightingCommand(value) => value.length_in_bits(),
        }
    }
}

/// BACnetPriorityValue, one slot of a priority array
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriorityValue {
    /// Any application-tagged primitive; null marks a relinquished slot
    Primitive(ApplicationValue),
    ConstructedValue(ConstructedValue),
    DateTime(DateTimeEnclosed),
}

impl PriorityValue {
    pub fn null() -> Self {
        Self::Primitive(ApplicationValue::null())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Primitive(value) if value.value().is_null())
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("PriorityValue", |buffer| {
            let peeked = buffer.peek(TagHeader::parse)?;
            if peeked.is_application() {
                return Ok(Self::Primitive(ApplicationValue::parse(buffer)?));
            }
            match peeked.actual_tag_number() {
                0 => Ok(Self::ConstructedValue(ConstructedValue::parse(buffer, 0)?)),
                1 => Ok(Self::DateTime(Enclosed::parse(buffer, 1, DateTime::parse)?)),
                other => Err(ParseError::unsupported("PriorityValue", other)),
            }
        })
    }
}

impl Serializable for PriorityValue {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        match self {
            Self::Primitive(value) => value.serialize(buffer),
            Self::ConstructedValue(value) => value.serialize(buffer),
            Self::DateTime(value) => value.serialize(buffer),
        }
    }

    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Primitive(value) => value.length_in_bits(),
            Self::ConstructedValue(value) => value.length_in_bits(),
            Self::DateTime(value) => value.length_in_bits(),
        }
    }
}

/// BACnetNetworkSecurityPolicy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkSecurityPolicy {
    pub port_id: ContextValue,
    pub security_level: SecurityLevelTagged,
}

impl NetworkSecurityPolicy {
    pub fn new(port_id: u8, level: SecurityLevel) -> Self {
        Self {
            port_id: ContextValue::unsigned(0, port_id as u64),
            security_level: SecurityLevelTagged::context(1, level),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("NetworkSecurityPolicy", |buffer| {
            let port_id = ContextValue::parse(buffer, 0, DataType::UnsignedInteger)?;
            let security_level = SecurityLevelTagged::parse(buffer, 1, TagClass::ContextSpecific)?;
            Ok(Self {
                port_id,
                security_level,
            })
        })
    }
}

impl_serializable_sequence!(
    NetworkSecurityPolicy,
    "NetworkSecurityPolicy",
    [port_id, security_level]
);

/// BACnetHostAddress
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HostAddress {
    None(ContextValue),
    IpAddress(ContextValue),
    Name(ContextValue),
}

impl HostAddress {
    pub fn none() -> Self {
        Self::None(ContextValue::null(0))
    }

    pub fn ip_address(octets: Vec<u8>) -> Self {
        Self::IpAddress(ContextValue::octet_string(1, octets))
    }

    pub fn name(name: &str) -> Self {
        Self::Name(ContextValue::character_string(2, name))
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("HostAddress", |buffer| {
            let peeked = buffer.peek(TagHeader::parse)?;
            match peeked.actual_tag_number() {
                0 => Ok(Self::None(ContextValue::parse(buffer, 0, DataType::Null)?)),
                1 => Ok(Self::IpAddress(ContextValue::parse(buffer, 1, DataType::OctetString)?)),
                2 => Ok(Self::Name(ContextValue::parse(buffer, 2, DataType::CharacterString)?)),
                other => Err(ParseError::unsupported("HostAddress", other)),
            }
        })
    }

    fn value(&self) -> &ContextValue {
        match self {
            Self::None(value) | Self::IpAddress(value) | Self::Name(value) => value,
        }
    }
}

impl Serializable for HostAddress {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        self.value().serialize(buffer)
    }

    fn length_in_bits(&self) -> u32 {
        self.value().length_in_bits()
    }
}

/// BACnetHostNPort
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostNPort {
    pub host: Enclosed<HostAddress>,
    pub port: ContextValue,
}

impl HostNPort {
    pub fn new(host: HostAddress, port: u16) -> Self {
        Self {
            host: Enclosed::new(0, host),
            port: ContextValue::unsigned(1, port as u64),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("HostNPort", |buffer| {
            let host = Enclosed::parse(buffer, 0, HostAddress::parse)?;
            let port = ContextValue::parse(buffer, 1, DataType::UnsignedInteger)?;
            Ok(Self { host, port })
        })
    }
}

impl_serializable_sequence!(HostNPort, "HostNPort", [host, port]);

/// BACnetBDTEntry, one row of a broadcast distribution table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BdtEntry {
    pub bbmd_address: Enclosed<HostNPort>,
    pub broadcast_mask: Option<ContextValue>,
}

impl BdtEntry {
    pub fn new(address: HostNPort, broadcast_mask: Option<Vec<u8>>) -> Self {
        Self {
            bbmd_address: Enclosed::new(0, address),
            broadcast_mask: broadcast_mask.map(|mask| ContextValue::octet_string(1, mask)),
        }
    }

    pub fn parse(buffer: &mut ReadBuffer) -> ParseResult<Self> {
        buffer.scoped("BDTEntry", |buffer| {
            let bbmd_address = Enclosed::parse(buffer, 0, HostNPort::parse)?;
            let broadcast_mask = optional_context(buffer, 1, DataType::OctetString)?;
            Ok(Self {
                bbmd_address,
                broadcast_mask,
            })
        })
    }
}

impl_serializable_sequence!(BdtEntry, "BDTEntry", [bbmd_address, broadcast_mask]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectType;

    fn bytes(text: &str) -> Vec<u8> {
        hex::decode(text).unwrap()
    }

    #[test]
    fn test_device_object_reference() {
        let data = bytes("0C020000011C00000005");
        let mut buffer = ReadBuffer::new(&data);
        let reference = DeviceObjectReference::parse(&mut buffer).unwrap();
        assert_eq!(
            reference.device(),
            Some(ObjectIdentifier::new(ObjectType::Device, 1))
        );
        assert_eq!(
            reference.object(),
            Some(ObjectIdentifier::new(ObjectType::AnalogInput, 5))
        );
        assert_eq!(reference.to_bytes().unwrap(), data);

        let data = bytes("1C00000005");
        let mut buffer = ReadBuffer::new(&data);
        let reference = DeviceObjectReference::parse(&mut buffer).unwrap();
        assert_eq!(reference.device(), None);
        assert_eq!(
            reference,
            DeviceObjectReference::new(None, ObjectIdentifier::new(ObjectType::AnalogInput, 5))
        );
    }

    #[test]
    fn test_object_property_reference() {
        let reference = ObjectPropertyReference::new(
            ObjectIdentifier::new(ObjectType::AnalogValue, 3),
            PropertyIdentifier::PresentValue,
            None,
        );
        let data = reference.to_bytes().unwrap();
        assert_eq!(data, bytes("0C008000031955"));

        let mut buffer = ReadBuffer::new(&data);
        let parsed = ObjectPropertyReference::parse(&mut buffer).unwrap();
        assert_eq!(parsed.property(), PropertyIdentifier::PresentValue);
        assert_eq!(parsed.array_index(), None);
        assert_eq!(parsed, reference);
    }

    #[test]
    fn test_setpoint_reference_absent_and_present() {
        let empty = SetpointReference::new(None);
        assert!(empty.to_bytes().unwrap().is_empty());

        let reference = SetpointReference::new(Some(ObjectPropertyReference::new(
            ObjectIdentifier::new(ObjectType::AnalogValue, 1),
            PropertyIdentifier::PresentValue,
            Some(2),
        )));
        let data = reference.to_bytes().unwrap();
        assert_eq!(data[0], 0x0E);
        assert_eq!(*data.last().unwrap(), 0x0F);

        let mut buffer = ReadBuffer::new(&data);
        assert_eq!(SetpointReference::parse(&mut buffer).unwrap(), reference);
    }

    #[test]
    fn test_date_time() {
        let data = bytes("A4780A0F04B40E1E0000");
        let mut buffer = ReadBuffer::new(&data);
        let value = DateTime::parse(&mut buffer).unwrap();
        let naive = value.to_naive().unwrap();
        assert_eq!(naive.to_string(), "2020-10-15 14:30:00");
        assert_eq!(DateTime::from_naive(naive), value);
        assert_eq!(value.to_bytes().unwrap(), data);

        let data = bytes("B40E1E0000A4780A0F04");
        let mut buffer = ReadBuffer::new(&data);
        assert!(DateTime::parse(&mut buffer).unwrap_err().is_validation());
    }

    #[test]
    fn test_lighting_command() {
        let command = LightingCommand::new(LightingOperation::FadeTo)
            .with_target_level(50.0)
            .with_fade_time(2000);
        let data = command.to_bytes().unwrap();
        assert_eq!(data, bytes("09011C424800004A07D0"));

        let mut buffer = ReadBuffer::new(&data);
        let parsed = LightingCommand::parse(&mut buffer).unwrap();
        assert!(parsed.ramp_rate.is_none());
        assert_eq!(parsed, command);
    }

    #[test]
    fn test_timer_state_change_value_dispatch() {
        let mut buffer = ReadBuffer::new(&[0x21, 0x07]);
        assert!(matches!(
            TimerStateChangeValue::parse(&mut buffer).unwrap(),
            TimerStateChangeValue::Primitive(_)
        ));

        let mut buffer = ReadBuffer::new(&[0x08]);
        assert!(matches!(
            TimerStateChangeValue::parse(&mut buffer).unwrap(),
            TimerStateChangeValue::NoValue(_)
        ));

        let data = bytes("2EA4780A0F04B40E1E00002F");
        let mut buffer = ReadBuffer::new(&data);
        let value = TimerStateChangeValue::parse(&mut buffer).unwrap();
        assert!(matches!(value, TimerStateChangeValue::DateTime(_)));
        assert_eq!(value.to_bytes().unwrap(), data);

        let mut buffer = ReadBuffer::new(&[0x49, 0x00]);
        assert!(matches!(
            TimerStateChangeValue::parse(&mut buffer),
            Err(ParseError::UnsupportedCase { .. })
        ));
    }

    #[test]
    fn test_priority_value() {
        let mut buffer = ReadBuffer::new(&[0x00]);
        assert!(PriorityValue::parse(&mut buffer).unwrap().is_null());

        let data = bytes("0E21010F");
        let mut buffer = ReadBuffer::new(&data);
        let value = PriorityValue::parse(&mut buffer).unwrap();
        assert!(matches!(value, PriorityValue::ConstructedValue(_)));
        assert_eq!(value.to_bytes().unwrap(), data);

        let mut buffer = ReadBuffer::new(&[0x2E, 0x2F]);
        assert!(matches!(
            PriorityValue::parse(&mut buffer),
            Err(ParseError::UnsupportedCase { .. })
        ));
    }

    #[test]
    fn test_bdt_entry() {
        let entry = BdtEntry::new(
            HostNPort::new(HostAddress::ip_address(vec![192, 168, 1, 10]), 47808),
            Some(vec![0xFF, 0xFF, 0xFF, 0xFF]),
        );
        let data = entry.to_bytes().unwrap();
        assert_eq!(
            data,
            bytes("0E0E1CC0A8010A0F1ABAC00F1CFFFFFFFF")
        );

        let mut buffer = ReadBuffer::new(&data);
        assert_eq!(BdtEntry::parse(&mut buffer).unwrap(), entry);
    }

    #[test]
    fn test_host_address_variants() {
        let mut buffer = ReadBuffer::new(&[0x08]);
        assert_eq!(HostAddress::parse(&mut buffer).unwrap(), HostAddress::none());

        let name = HostAddress::name("bbmd");
        let data = name.to_bytes().unwrap();
        let mut buffer = ReadBuffer::new(&data);
        assert_eq!(HostAddress::parse(&mut buffer).unwrap(), name);

        let mut buffer = ReadBuffer::new(&[0x39, 0x00]);
        assert!(HostAddress::parse(&mut buffer).is_err());
    }

    #[test]
    fn test_network_security_policy() {
        let policy = NetworkSecurityPolicy::new(1, SecurityLevel::Plain);
        let data = policy.to_bytes().unwrap();
        assert_eq!(data, vec![0x09, 0x01, 0x19, 0x01]);
        let mut buffer = ReadBuffer::new(&data);
        assert_eq!(NetworkSecurityPolicy::parse(&mut buffer).unwrap(), policy);
    }
}
