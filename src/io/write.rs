use super::{low_mask, ContextStack};
use crate::config::CodecConfig;
use crate::error::{SerializationError, SerializeResult};
use bytes::{BufMut, Bytes, BytesMut};
use log::trace;

/// Bit-addressable writer into a growable buffer
#[derive(Debug, Clone, Default)]
pub struct WriteBuffer {
    data: BytesMut,
    /// Number of bits written so far
    pos: usize,
    contexts: ContextStack,
    config: CodecConfig,
}

impl WriteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `bytes` octets
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(bytes),
            ..Self::default()
        }
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Number of bits written so far
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Written bytes; a trailing partial byte is zero padded
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data.to_vec()
    }

    fn push_bit(&mut self, bit: bool) {
        let offset = self.pos % 8;
        if offset == 0 {
            self.data.put_u8(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 0x80 >> offset;
        }
        self.pos += 1;
    }

    pub fn write_bit(&mut self, bit: bool) -> SerializeResult<()> {
        self.push_bit(bit);
        Ok(())
    }

    /// Write the low `bits` bits of `value`, big-endian
    pub fn write_unsigned(&mut self, bits: u8, value: u64) -> SerializeResult<()> {
        if bits > 64 || value & !low_mask(bits) != 0 {
            return Err(SerializationError::ValueOutOfRange {
                bits,
                value: value as i128,
            });
        }

        if self.pos % 8 == 0 && bits % 8 == 0 {
            let bytes = value.to_be_bytes();
            self.data.put_slice(&bytes[8 - bits as usize / 8..]);
            self.pos += bits as usize;
            return Ok(());
        }

        for shift in (0..bits).rev() {
            self.push_bit((value >> shift) & 0x01 == 1);
        }
        Ok(())
    }

    /// Write `value` as a two's-complement integer of `bits` width
    pub fn write_signed(&mut self, bits: u8, value: i64) -> SerializeResult<()> {
        let fits = match bits {
            0 => value == 0,
            1..=63 => {
                let min = -(1i64 << (bits - 1));
                let max = (1i64 << (bits - 1)) - 1;
                (min..=max).contains(&value)
            }
            64 => true,
            _ => false,
        };
        if !fits {
            return Err(SerializationError::ValueOutOfRange {
                bits,
                value: value as i128,
            });
        }
        self.write_unsigned(bits, value as u64 & low_mask(bits))
    }

    pub fn write_u8(&mut self, bits: u8, value: u8) -> SerializeResult<()> {
        self.write_unsigned(bits, value as u64)
    }

    pub fn write_u16(&mut self, bits: u8, value: u16) -> SerializeResult<()> {
        self.write_unsigned(bits, value as u64)
    }

    pub fn write_u32(&mut self, bits: u8, value: u32) -> SerializeResult<()> {
        self.write_unsigned(bits, value as u64)
    }

    pub fn write_f32(&mut self, value: f32) -> SerializeResult<()> {
        self.write_unsigned(32, value.to_bits() as u64)
    }

    pub fn write_f64(&mut self, value: f64) -> SerializeResult<()> {
        self.write_unsigned(64, value.to_bits())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> SerializeResult<()> {
        if self.pos % 8 == 0 {
            self.data.put_slice(bytes);
            self.pos += bytes.len() * 8;
            return Ok(());
        }
        for byte in bytes {
            self.write_unsigned(8, *byte as u64)?;
        }
        Ok(())
    }

    pub fn push_context(&mut self, name: &'static str) -> SerializeResult<()> {
        self.contexts
            .push(name, self.config.max_nesting_depth)
            .map_err(|depth| SerializationError::NestingTooDeep { depth })
    }

    pub fn pop_context(&mut self, name: &'static str) {
        self.contexts.pop(name);
    }

    pub fn context_path(&self) -> String {
        self.contexts.path()
    }

    /// Run `f` inside the context `name`; the context is closed whatever `f` returns
    pub fn scoped<T>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> SerializeResult<T>,
    ) -> SerializeResult<T> {
        self.push_context(name)?;
        let result = f(self);
        if let Err(err) = &result {
            trace!("{} failed at bit {}: {}", self.context_path(), self.pos, err);
        }
        self.pop_context(name);
        result
    }
}
