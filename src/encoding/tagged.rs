//! Enumerated and bit-string values that appear under either tag class.
//!
//! The same enumeration is sent as an application tag in one service and as
//! a context tag in the next, so these wrappers take the expected tag number
//! and class as parse arguments and keep the header they saw.

use super::header::{TagClass, TagHeader};
use super::payload::{minimal_unsigned_octets, BitStringPayload};
use super::{ApplicationTag, Serializable};
use crate::error::{ParseError, ParseResult, SerializationError, SerializeResult};
use crate::io::{ReadBuffer, WriteBuffer};
use crate::object::{
    AccessCredentialDisable, BinaryPV, DoorSecuredStatus, EngineeringUnits, ErrorClass,
    ErrorCode, EscalatorOperationDirection, EventState, EventType, LifeSafetyMode,
    LifeSafetyState, LightingOperation, LogStatus, MessagePriority, PropertyIdentifier,
    SecurityLevel, Segmentation, StatusFlags, VendorId,
};
use std::fmt;


/// Check tag number, class and LVT of a header read in a tagged position
fn check_header(header: &TagHeader, tag_number: u8, tag_class: TagClass) -> ParseResult<()> {
    if header.actual_tag_number() != tag_number {
        return Err(ParseError::mismatch("tagNumber", "tagnumber doesn't match"));
    }
    if header.tag_class != tag_class {
        return Err(ParseError::validation("tag class doesn't match"));
    }
    if header.is_opening_tag() || header.is_closing_tag() {
        return Err(ParseError::mismatch(
            "lengthValueType",
            "length 6 and 7 reserved for opening and closing tag",
        ));
    }
    Ok(())
}

/// Enumeration value with the header it travelled under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumeratedTagged<E> {
    pub header: TagHeader,
    pub value: E,
}

impl<E> EnumeratedTagged<E>
where
    E: Copy + From<u32> + Into<u32>,
{
    pub fn new(tag_number: u8, tag_class: TagClass, value: E) -> Self {
        let raw: u32 = value.into();
        let header = TagHeader::balanced(tag_class, tag_number, minimal_unsigned_octets(raw as u64));
        Self { header, value }
    }

    /// Application-tagged enumerated value
    pub fn application(value: E) -> Self {
        Self::new(ApplicationTag::Enumerated as u8, TagClass::Application, value)
    }

    pub fn context(tag_number: u8, value: E) -> Self {
        Self::new(tag_number, TagClass::ContextSpecific, value)
    }

    pub fn parse(buffer: &mut ReadBuffer, tag_number: u8, tag_class: TagClass) -> ParseResult<Self> {
        buffer.scoped("EnumeratedTagged", |buffer| {
            let header = TagHeader::parse(buffer)?;
            check_header(&header, tag_number, tag_class)?;
            let length = header.actual_length();
            if length > 4 {
                return Err(ParseError::validation(format!(
                    "enumerated value of {} octets does not fit 32 bits",
                    length
                )));
            }
            let raw = buffer.read_u32((length * 8) as u8)?;
            Ok(Self {
                header,
                value: E::from(raw),
            })
        })
    }

    pub fn actual_value(&self) -> u32 {
        self.value.into()
    }
}

impl<E> Serializable for EnumeratedTagged<E>
where
    E: Copy + From<u32> + Into<u32>,
{
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        let length = self.header.actual_length();
        if length > 4 || self.header.is_opening_tag() || self.header.is_closing_tag() {
            return Err(SerializationError::invariant(format!(
                "{} cannot carry an enumerated value",
                self.header
            )));
        }
        self.header.serialize(buffer)?;
        buffer.write_u32((length * 8) as u8, self.actual_value())
    }

    fn length_in_bits(&self) -> u32 {
        self.header.length_in_bits() + self.header.actual_length() * 8
    }
}

impl<E: fmt::Display> fmt::Display for EnumeratedTagged<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Named flag set carried as a bit string
pub trait WireFlags: Copy {
    fn from_bools(bits: &[bool]) -> Self;
    fn to_bools(&self) -> Vec<bool>;
}

impl WireFlags for StatusFlags {
    fn from_bools(bits: &[bool]) -> Self {
        StatusFlags::from_bools(bits)
    }

    fn to_bools(&self) -> Vec<bool> {
        StatusFlags::to_bools(self)
    }
}

impl WireFlags for LogStatus {
    fn from_bools(bits: &[bool]) -> Self {
        LogStatus::from_bools(bits)
    }

    fn to_bools(&self) -> Vec<bool> {
        LogStatus::to_bools(self)
    }
}

/// Bit-string flag set with the header it travelled under
///
/// The payload is kept as received; bits beyond the named flags survive a
/// round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlagsTagged<F> {
    pub header: TagHeader,
    pub payload: BitStringPayload,
    #[cfg_attr(feature = "serde", serde(skip))]
    marker: std::marker::PhantomData<F>,
}

impl<F: WireFlags> FlagsTagged<F> {
    pub fn new(tag_number: u8, tag_class: TagClass, flags: F) -> Self {
        let payload = BitStringPayload::new(&flags.to_bools());
        let header = TagHeader::balanced(tag_class, tag_number, payload.actual_length());
        Self {
            header,
            payload,
            marker: std::marker::PhantomData,
        }
    }

    /// Application-tagged bit string
    pub fn application(flags: F) -> Self {
        Self::new(ApplicationTag::BitString as u8, TagClass::Application, flags)
    }

    pub fn context(tag_number: u8, flags: F) -> Self {
        Self::new(tag_number, TagClass::ContextSpecific, flags)
    }

    pub fn parse(buffer: &mut ReadBuffer, tag_number: u8, tag_class: TagClass) -> ParseResult<Self> {
        buffer.scoped("FlagsTagged", |buffer| {
            let header = TagHeader::parse(buffer)?;
            check_header(&header, tag_number, tag_class)?;
            let payload = BitStringPayload::parse(buffer, header.actual_length())?;
            Ok(Self {
                header,
                payload,
                marker: std::marker::PhantomData,
            })
        })
    }

    pub fn flags(&self) -> F {
        F::from_bools(&self.payload.data)
    }
}

impl<F: WireFlags> Serializable for FlagsTagged<F> {
    fn serialize(&self, buffer: &mut WriteBuffer) -> SerializeResult<()> {
        if self.header.actual_length() != self.payload.actual_length() {
            return Err(SerializationError::invariant(format!(
                "{} does not match a bit string of {} octets",
                self.header,
                self.payload.actual_length()
            )));
        }
        self.header.serialize(buffer)?;
        self.payload.serialize(buffer)
    }

    fn length_in_bits(&self) -> u32 {
        self.header.length_in_bits() + self.payload.length_in_bits()
    }
}

pub type PropertyIdentifierTagged = EnumeratedTagged<PropertyIdentifier>;
pub type EngineeringUnitsTagged = EnumeratedTagged<EngineeringUnits>;
pub type BinaryPVTagged = EnumeratedTagged<BinaryPV>;
pub type EventStateTagged = EnumeratedTagged<EventState>;
pub type EventTypeTagged = EnumeratedTagged<EventType>;
pub type DoorSecuredStatusTagged = EnumeratedTagged<DoorSecuredStatus>;
pub type EscalatorOperationDirectionTagged = EnumeratedTagged<EscalatorOperationDirection>;
pub type AccessCredentialDisableTagged = EnumeratedTagged<AccessCredentialDisable>;
pub type SecurityLevelTagged = EnumeratedTagged<SecurityLevel>;
pub type MessagePriorityTagged = EnumeratedTagged<MessagePriority>;
pub type LightingOperationTagged = EnumeratedTagged<LightingOperation>;
pub type LifeSafetyStateTagged = EnumeratedTagged<LifeSafetyState>;
pub type LifeSafetyModeTagged = EnumeratedTagged<LifeSafetyMode>;
pub type ErrorClassTagged = EnumeratedTagged<ErrorClass>;
pub type ErrorCodeTagged = EnumeratedTagged<ErrorCode>;
pub type SegmentationTagged = EnumeratedTagged<Segmentation>;
pub type VendorIdTagged = EnumeratedTagged<VendorId>;
pub type StatusFlagsTagged = FlagsTagged<StatusFlags>;
pub type LogStatusTagged = FlagsTagged<LogStatus>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_identifier_context_one() {
        let bytes = [0x19, 0x55];
        let mut buffer = ReadBuffer::new(&bytes);
        let value = PropertyIdentifierTagged::parse(&mut buffer, 1, TagClass::ContextSpecific).unwrap();
        assert_eq!(value.value, PropertyIdentifier::PresentValue);
        assert_eq!(value.to_bytes().unwrap(), bytes.to_vec());
        assert_eq!(
            PropertyIdentifierTagged::context(1, PropertyIdentifier::PresentValue),
            value
        );
    }

    #[test]
    fn test_proprietary_value_survives() {
        let bytes = [0x92, 0x01, 0x2C];
        let mut buffer = ReadBuffer::new(&bytes);
        let value = EngineeringUnitsTagged::parse(&mut buffer, 9, TagClass::Application).unwrap();
        assert!(value.value.is_custom());
        assert_eq!(value.actual_value(), 300);
        assert_eq!(value.to_bytes().unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_vendor_id_as_application_unsigned() {
        let bytes = [0x21, 0x08];
        let mut buffer = ReadBuffer::new(&bytes);
        let value = VendorIdTagged::parse(&mut buffer, 2, TagClass::Application).unwrap();
        assert_eq!(value.value, VendorId::DeltaControlsInc);
        assert_eq!(
            VendorIdTagged::new(2, TagClass::Application, VendorId::DeltaControlsInc),
            value
        );
    }

    #[test]
    fn test_class_and_number_checks() {
        let mut buffer = ReadBuffer::new(&[0x91, 0x01]);
        assert!(BinaryPVTagged::parse(&mut buffer, 9, TagClass::ContextSpecific)
            .unwrap_err()
            .is_validation());

        let mut buffer = ReadBuffer::new(&[0x29, 0x01]);
        assert!(BinaryPVTagged::parse(&mut buffer, 3, TagClass::ContextSpecific)
            .unwrap_err()
            .is_absence());

        let mut buffer = ReadBuffer::new(&[0x95, 0x05, 0, 0, 0, 0, 1]);
        assert!(BinaryPVTagged::parse(&mut buffer, 9, TagClass::Application)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_status_flags() {
        let flags = StatusFlags::IN_ALARM | StatusFlags::OUT_OF_SERVICE;
        let tagged = StatusFlagsTagged::application(flags);
        assert_eq!(tagged.to_bytes().unwrap(), vec![0x82, 0x04, 0x90]);

        let bytes = [0x82, 0x04, 0x90];
        let mut buffer = ReadBuffer::new(&bytes);
        let parsed = StatusFlagsTagged::parse(&mut buffer, 8, TagClass::Application).unwrap();
        assert_eq!(parsed.flags(), flags);
    }

    #[test]
    fn test_log_status_context() {
        let tagged = LogStatusTagged::context(0, LogStatus::BUFFER_PURGED);
        let bytes = tagged.to_bytes().unwrap();
        assert_eq!(bytes, vec![0x0A, 0x05, 0x40]);
        let mut buffer = ReadBuffer::new(&bytes);
        let parsed = LogStatusTagged::parse(&mut buffer, 0, TagClass::ContextSpecific).unwrap();
        assert_eq!(parsed.flags(), LogStatus::BUFFER_PURGED);
    }
}
