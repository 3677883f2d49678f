#![doc = include_str!("../README.md")]

pub mod config;
pub mod encoding;
pub mod error;
pub mod event;
pub mod io;
pub mod object;
pub mod property;
pub mod service;
pub mod util;

// Re-export main types without glob imports to avoid conflicts
pub use config::CodecConfig;
pub use encoding::{ApplicationTag, Serializable, TagClass, TagHeader};
pub use error::{ParseError, ParseResult, SerializationError, SerializeResult};
pub use io::{ReadBuffer, WriteBuffer};
pub use object::{ObjectIdentifier, ObjectType, PropertyIdentifier};
pub use service::{
    ConfirmedServiceChoice, ConfirmedServiceRequest, ServiceAck, UnconfirmedServiceChoice,
    UnconfirmedServiceRequest,
};

/// Largest APDU a BACnet/IP device accepts
pub const BACNET_MAX_APDU: usize = 1476;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::ApplicationValue;

    #[test]
    fn test_reexports() {
        let tag = ApplicationTag::Boolean;
        assert_eq!(tag as u8, 1);

        let obj_id = ObjectIdentifier::new(ObjectType::Device, 123);
        assert_eq!(obj_id.instance, 123);
        assert!(obj_id.is_valid());

        let bytes = ApplicationValue::object_identifier(obj_id).to_bytes().unwrap();
        let mut buffer = ReadBuffer::new(&bytes);
        let header = TagHeader::parse(&mut buffer).unwrap();
        assert_eq!(header.tag_class, TagClass::Application);
        assert_eq!(header.actual_length(), 4);
    }

    #[test]
    fn test_i_am_fits_the_apdu() {
        let data = hex::decode("00C4020004D22205C49103210F").unwrap();
        let mut buffer = ReadBuffer::new(&data);
        let request = UnconfirmedServiceRequest::parse(&mut buffer, data.len()).unwrap();
        assert!((request.length_in_bytes() as usize) < BACNET_MAX_APDU);
        assert_eq!(request.service_choice(), UnconfirmedServiceChoice::IAm);
    }
}
