//! BACnet Object Identification Module
//!
//! This module holds the object-level vocabulary the codec needs in order to
//! pick a decoding path: object types and property identifiers (which select
//! the constructed-data variant of a property value), the packed 32-bit
//! object identifier, and the enumerations carried by enumerated-tagged
//! values.
//!
//! Object behavior (property storage, COV processing, databases) is not part
//! of this crate; these types describe values on the wire only.
//!
//! # Object Identifiers
//!
//! Object identifiers pack a 10-bit object type and a 22-bit instance number
//! into one 32-bit word (clause 20.2.14):
//!
//! ```
//! use bacnet_codec::object::{ObjectIdentifier, ObjectType};
//!
//! let sensor = ObjectIdentifier::new(ObjectType::AnalogInput, 1);
//! assert_eq!(u32::from(sensor), 0x0000_0001);
//!
//! let device = ObjectIdentifier::from(0x0200_0123);
//! assert_eq!(device.object_type, ObjectType::Device);
//! assert_eq!(device.instance, 0x123);
//! ```
//!
//! # Status Flags
//!
//! The four status flags travel as a bit string; [`StatusFlags`] gives them
//! names:
//!
//! ```
//! use bacnet_codec::object::StatusFlags;
//!
//! let flags = StatusFlags::from_bools(&[false, true, false, true]);
//! assert_eq!(flags, StatusFlags::FAULT | StatusFlags::OUT_OF_SERVICE);
//! assert_eq!(flags.to_bools(), vec![false, true, false, true]);
//! ```

use bitflags::bitflags;
use std::fmt;


mod enumerations;

pub use enumerations::*;

/// Largest instance number (2^22 - 1, reserved as "uninitialized")
pub const MAX_INSTANCE: u32 = 0x3F_FFFF;

/// Object identifier (type + instance number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectIdentifier {
    pub object_type: ObjectType,
    pub instance: u32,
}

impl ObjectIdentifier {
    /// Create a new object identifier
    pub fn new(object_type: ObjectType, instance: u32) -> Self {
        Self {
            object_type,
            instance,
        }
    }

    /// Check if instance number fits its 22 bits
    pub fn is_valid(&self) -> bool {
        self.instance <= MAX_INSTANCE && u16::from(self.object_type) <= 0x3FF
    }
}

impl From<u32> for ObjectIdentifier {
    /// Convert from 32-bit object identifier.
    /// See clause 20.2.14 of the BACnet specification.
    fn from(value: u32) -> Self {
        let object_type = ((value >> 22) & 0x3FF) as u16;
        let instance = value & MAX_INSTANCE;
        Self::new(object_type.into(), instance)
    }
}

impl From<ObjectIdentifier> for u32 {
    /// Convert to 32-bit object identifier.
    /// See clause 20.2.14 of the BACnet specification.
    fn from(value: ObjectIdentifier) -> Self {
        let object_type: u16 = value.object_type.into();
        ((object_type as u32 & 0x3FF) << 22) | (value.instance & MAX_INSTANCE)
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.instance)
    }
}

bitflags! {
    /// Status flags bit string (BACnetStatusFlags); bit 0 is the first bit on the wire
    #[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
    pub struct StatusFlags: u8 {
        const IN_ALARM = 1 << 0;
        const FAULT = 1 << 1;
        const OVERRIDDEN = 1 << 2;
        const OUT_OF_SERVICE = 1 << 3;
    }
}

bitflags! {
    /// Log status bit string (BACnetLogStatus)
    #[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
    pub struct LogStatus: u8 {
        const LOG_DISABLED = 1 << 0;
        const BUFFER_PURGED = 1 << 1;
        const LOG_INTERRUPTED = 1 << 2;
    }
}

macro_rules! impl_bool_conversions {
    ($flags:ident, $width:expr) => {
        impl $flags {
            /// Number of bits this flag set occupies on the wire
            pub const WIRE_BITS: usize = $width;

            /// Build from wire order bits; bits past the known flags are dropped
            pub fn from_bools(bits: &[bool]) -> Self {
                let raw = bits
                    .iter()
                    .take(8)
                    .enumerate()
                    .fold(0u8, |acc, (i, bit)| if *bit { acc | (1 << i) } else { acc });
                Self::from_bits_truncate(raw)
            }

            /// Wire order bits
            pub fn to_bools(&self) -> Vec<bool> {
                (0..$width).map(|i| self.bits() & (1 << i) != 0).collect()
            }
        }
    };
}

impl_bool_conversions!(StatusFlags, 4);
impl_bool_conversions!(LogStatus, 3);
