//! Bit-Addressable I/O Module
//!
//! This module provides the cursor types every codec routine reads from and
//! writes to. BACnet tag headers pack a 4-bit tag number, a 1-bit class and a
//! 3-bit length/value/type field into one octet, so the cursors address bits
//! rather than bytes. All multi-byte numbers are big-endian.
//!
//! # Overview
//!
//! - [`ReadBuffer`]: reads bits, integers of arbitrary width (up to 64 bits),
//!   IEEE-754 floats and byte arrays from a borrowed slice
//! - [`WriteBuffer`]: the mirrored write operations into a growable buffer
//! - Named diagnostic contexts: every constructed value opens a context, so a
//!   failure can be traced back to `ConfirmedServiceRequest/WriteProperty/...`
//!
//! Contexts are scoped by closures ([`ReadBuffer::scoped`],
//! [`WriteBuffer::scoped`]), which pop the context again on both the success
//! and the error path.
//!
//! # Example
//!
//! ```
//! use bacnet_codec::io::{ReadBuffer, WriteBuffer};
//!
//! let mut writer = WriteBuffer::new();
//! writer.write_unsigned(4, 2).unwrap();
//! writer.write_bit(false).unwrap();
//! writer.write_unsigned(3, 1).unwrap();
//! writer.write_u8(8, 0x05).unwrap();
//! assert_eq!(writer.as_bytes(), &[0x21, 0x05]);
//!
//! let bytes = writer.into_vec();
//! let mut reader = ReadBuffer::new(&bytes);
//! assert_eq!(reader.read_u8(4).unwrap(), 2);
//! assert!(!reader.read_bit().unwrap());
//! assert_eq!(reader.read_u8(3).unwrap(), 1);
//! assert_eq!(reader.read_u8(8).unwrap(), 5);
//! assert!(reader.is_at_end());
//! ```

mod read;
mod write;

pub use read::ReadBuffer;
pub use write::WriteBuffer;

use log::trace;

/// Stack of named diagnostic scopes shared by both cursor directions
#[derive(Debug, Clone, Default)]
pub(crate) struct ContextStack {
    names: Vec<&'static str>,
}

impl ContextStack {
    /// Push `name`, or return the depth that would have been reached
    pub(crate) fn push(&mut self, name: &'static str, limit: usize) -> Result<(), usize> {
        if self.names.len() >= limit {
            return Err(self.names.len() + 1);
        }
        self.names.push(name);
        trace!(">> {}", self.path());
        Ok(())
    }

    pub(crate) fn pop(&mut self, name: &'static str) {
        let popped = self.names.pop();
        debug_assert_eq!(popped, Some(name), "unbalanced context pop");
        trace!("<< {}", name);
    }

    pub(crate) fn depth(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn path(&self) -> String {
        self.names.join("/")
    }
}

/// Mask with the low `bits` bits set
pub(crate) fn low_mask(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use crate::error::{ParseError, SerializationError};

    #[test]
    fn test_bit_level_round_trip() {
        let mut writer = WriteBuffer::new();
        writer.write_unsigned(10, 8).unwrap();
        writer.write_unsigned(22, 1234).unwrap();
        writer.write_signed(24, -2).unwrap();
        writer.write_f32(72.5).unwrap();
        writer.write_f64(-1.25).unwrap();
        writer.write_bytes(&[0xDE, 0xAD]).unwrap();
        assert_eq!(writer.pos(), 32 + 24 + 32 + 64 + 16);

        let bytes = writer.into_vec();
        assert_eq!(&bytes[0..4], &[0x02, 0x00, 0x04, 0xD2]);
        assert_eq!(&bytes[4..7], &[0xFF, 0xFF, 0xFE]);

        let mut reader = ReadBuffer::new(&bytes);
        assert_eq!(reader.read_u16(10).unwrap(), 8);
        assert_eq!(reader.read_u32(22).unwrap(), 1234);
        assert_eq!(reader.read_signed(24).unwrap(), -2);
        assert_eq!(reader.read_f32().unwrap(), 72.5);
        assert_eq!(reader.read_f64().unwrap(), -1.25);
        assert_eq!(reader.read_bytes(2).unwrap(), vec![0xDE, 0xAD]);
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_unaligned_bytes() {
        let mut writer = WriteBuffer::new();
        writer.write_unsigned(4, 0xA).unwrap();
        writer.write_bytes(&[0xBC, 0xDE]).unwrap();
        writer.write_unsigned(4, 0xF).unwrap();
        assert_eq!(writer.as_bytes(), &[0xAB, 0xCD, 0xEF]);

        let bytes = writer.into_vec();
        let mut reader = ReadBuffer::new(&bytes);
        assert_eq!(reader.read_u8(4).unwrap(), 0xA);
        assert_eq!(reader.read_bytes(2).unwrap(), vec![0xBC, 0xDE]);
        assert_eq!(reader.read_u8(4).unwrap(), 0xF);
    }

    #[test]
    fn test_signed_sign_extension() {
        let data = [0x80, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut reader = ReadBuffer::new(&data);
        assert_eq!(reader.read_signed(8).unwrap(), -128);
        assert_eq!(reader.read_signed(8).unwrap(), 127);
        assert_eq!(reader.read_signed(48).unwrap(), -1);
    }

    #[test]
    fn test_read_past_end() {
        let data = [0x12];
        let mut reader = ReadBuffer::new(&data);
        reader.read_u8(4).unwrap();
        let err = reader.read_u8(8).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEndOfData {
                pos: 4,
                needed: 8,
                available: 4
            }
        );
        // a failed read does not move the cursor
        assert_eq!(reader.pos(), 4);
    }

    #[test]
    fn test_value_out_of_range() {
        let mut writer = WriteBuffer::new();
        assert_eq!(
            writer.write_unsigned(4, 16).unwrap_err(),
            SerializationError::ValueOutOfRange { bits: 4, value: 16 }
        );
        assert_eq!(
            writer.write_signed(8, 128).unwrap_err(),
            SerializationError::ValueOutOfRange {
                bits: 8,
                value: 128
            }
        );
        assert!(writer.write_signed(8, -128).is_ok());
    }

    #[test]
    fn test_scoped_contexts_balance_on_error() {
        let data = [0x01];
        let mut reader = ReadBuffer::new(&data);
        let result: Result<u8, ParseError> = reader.scoped("Outer", |reader| {
            reader.scoped("Inner", |reader| {
                assert_eq!(reader.context_path(), "Outer/Inner");
                reader.read_u8(8)?;
                reader.read_u8(8)
            })
        });
        assert!(result.is_err());
        assert_eq!(reader.context_path(), "");
        assert_eq!(reader.context_depth(), 0);
    }

    #[test]
    fn test_nesting_limit() {
        let data = [0u8; 4];
        let config = CodecConfig::default().with_max_nesting_depth(2);
        let mut reader = ReadBuffer::with_config(&data, config);
        let result = reader.scoped("a", |r| r.scoped("b", |r| r.scoped("c", |r| r.read_u8(8))));
        assert_eq!(result.unwrap_err(), ParseError::NestingTooDeep { depth: 3 });
        assert_eq!(reader.context_depth(), 0);

        let mut writer = WriteBuffer::with_config(config);
        let result = writer.scoped("a", |w| w.scoped("b", |w| w.scoped("c", |w| w.write_u8(8, 1))));
        assert_eq!(
            result.unwrap_err(),
            SerializationError::NestingTooDeep { depth: 3 }
        );
    }

    #[test]
    fn test_split_off() {
        let data = [0x0C, 0x19, 0x55, 0xAA];
        let mut reader = ReadBuffer::new(&data);
        reader.read_u8(8).unwrap();
        let mut body = reader
            .scoped("Request", |reader| {
                let body = reader.split_off(2)?;
                assert_eq!(body.context_path(), "Request");
                Ok(body)
            })
            .unwrap();
        assert_eq!(body.read_bytes(2).unwrap(), vec![0x19, 0x55]);
        assert!(body.is_at_end());
        assert_eq!(reader.read_u8(8).unwrap(), 0xAA);

        let mut reader = ReadBuffer::new(&data);
        assert!(reader.split_off(5).is_err());
        reader.read_u8(4).unwrap();
        assert!(reader.split_off(1).unwrap_err().is_validation());
    }

    #[test]
    fn test_peek_restores_position() {
        let data = [0x3E, 0x21, 0x05];
        let mut reader = ReadBuffer::new(&data);
        let first = reader.peek(|r| r.read_u8(8)).unwrap();
        assert_eq!(first, 0x3E);
        assert_eq!(reader.pos(), 0);

        reader.read_u8(8).unwrap();
        assert!(reader.peek(|r| r.read_bytes(5)).is_err());
        assert_eq!(reader.pos(), 8);
    }

    #[test]
    fn test_low_mask() {
        assert_eq!(low_mask(0), 0);
        assert_eq!(low_mask(3), 0b111);
        assert_eq!(low_mask(64), u64::MAX);
    }
}
