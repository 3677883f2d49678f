use super::ContextStack;
use crate::config::CodecConfig;
use crate::error::{ParseError, ParseResult};
use log::trace;

/// Bit-addressable reader over a borrowed byte slice
#[derive(Debug, Clone)]
pub struct ReadBuffer<'a> {
    data: &'a [u8],
    /// Current position in bits
    pos: usize,
    contexts: ContextStack,
    config: CodecConfig,
}

impl<'a> ReadBuffer<'a> {
    /// Create a new reader with the default configuration
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, CodecConfig::default())
    }

    /// Create a new reader with explicit limits
    pub fn with_config(data: &'a [u8], config: CodecConfig) -> Self {
        Self {
            data,
            pos: 0,
            contexts: ContextStack::default(),
            config,
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Current position in bits
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor back (or forward) to a bit position obtained from [`pos`](Self::pos)
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos.min(self.len_bits());
    }

    /// Total size of the underlying buffer in bits
    pub fn len_bits(&self) -> usize {
        self.data.len() * 8
    }

    pub fn remaining_bits(&self) -> usize {
        self.len_bits().saturating_sub(self.pos)
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining_bits() == 0
    }

    fn ensure(&self, bits: usize) -> ParseResult<()> {
        let available = self.remaining_bits();
        if bits > available {
            return Err(ParseError::UnexpectedEndOfData {
                pos: self.pos,
                needed: bits,
                available,
            });
        }
        Ok(())
    }

    fn next_bit(&mut self) -> bool {
        let byte = self.data[self.pos / 8];
        let bit = (byte >> (7 - (self.pos % 8))) & 0x01;
        self.pos += 1;
        bit == 1
    }

    /// Read a single bit
    pub fn read_bit(&mut self) -> ParseResult<bool> {
        self.ensure(1)?;
        Ok(self.next_bit())
    }

    /// Read an unsigned big-endian integer of `bits` width (at most 64)
    pub fn read_unsigned(&mut self, bits: u8) -> ParseResult<u64> {
        if bits > 64 {
            return Err(ParseError::validation(format!(
                "cannot read {} bits into a 64-bit integer",
                bits
            )));
        }
        self.ensure(bits as usize)?;

        if self.pos % 8 == 0 && bits % 8 == 0 {
            let start = self.pos / 8;
            let end = start + bits as usize / 8;
            let value = self.data[start..end]
                .iter()
                .fold(0u64, |acc, byte| (acc << 8) | *byte as u64);
            self.pos += bits as usize;
            return Ok(value);
        }

        let mut value = 0u64;
        for _ in 0..bits {
            value = (value << 1) | self.next_bit() as u64;
        }
        Ok(value)
    }

    /// Read a two's-complement integer of `bits` width, sign-extended to 64 bits
    pub fn read_signed(&mut self, bits: u8) -> ParseResult<i64> {
        let raw = self.read_unsigned(bits)?;
        if bits == 0 || bits >= 64 {
            return Ok(raw as i64);
        }
        let sign_bit = 1u64 << (bits - 1);
        if raw & sign_bit != 0 {
            Ok((raw | !super::low_mask(bits)) as i64)
        } else {
            Ok(raw as i64)
        }
    }

    pub fn read_u8(&mut self, bits: u8) -> ParseResult<u8> {
        self.read_narrow(bits, 8).map(|v| v as u8)
    }

    pub fn read_u16(&mut self, bits: u8) -> ParseResult<u16> {
        self.read_narrow(bits, 16).map(|v| v as u16)
    }

    pub fn read_u32(&mut self, bits: u8) -> ParseResult<u32> {
        self.read_narrow(bits, 32).map(|v| v as u32)
    }

    pub fn read_u64(&mut self, bits: u8) -> ParseResult<u64> {
        self.read_unsigned(bits)
    }

    fn read_narrow(&mut self, bits: u8, width: u8) -> ParseResult<u64> {
        if bits > width {
            return Err(ParseError::validation(format!(
                "cannot read {} bits into a {}-bit integer",
                bits, width
            )));
        }
        self.read_unsigned(bits)
    }

    /// Read an IEEE-754 single precision float
    pub fn read_f32(&mut self) -> ParseResult<f32> {
        Ok(f32::from_bits(self.read_unsigned(32)? as u32))
    }

    /// Read an IEEE-754 double precision float
    pub fn read_f64(&mut self) -> ParseResult<f64> {
        Ok(f64::from_bits(self.read_unsigned(64)?))
    }

    /// Read `count` bytes
    pub fn read_bytes(&mut self, count: usize) -> ParseResult<Vec<u8>> {
        self.ensure(count.saturating_mul(8))?;
        if self.pos % 8 == 0 {
            let start = self.pos / 8;
            self.pos += count * 8;
            return Ok(self.data[start..start + count].to_vec());
        }
        let mut bytes = Vec::with_capacity(count);
        for _ in 0..count {
            bytes.push(self.read_unsigned(8)? as u8);
        }
        Ok(bytes)
    }

    /// Hand the next `bytes` octets to a sub-reader and move past them
    ///
    /// The sub-reader shares the configuration and the open contexts, so
    /// errors inside it still report the full path.
    pub fn split_off(&mut self, bytes: usize) -> ParseResult<ReadBuffer<'a>> {
        if self.pos % 8 != 0 {
            return Err(ParseError::validation(format!(
                "cannot split at unaligned bit {}",
                self.pos
            )));
        }
        self.ensure(bytes.saturating_mul(8))?;
        let start = self.pos / 8;
        self.pos += bytes * 8;
        Ok(ReadBuffer {
            data: &self.data[start..start + bytes],
            pos: 0,
            contexts: self.contexts.clone(),
            config: self.config,
        })
    }

    /// Open a named diagnostic context
    pub fn push_context(&mut self, name: &'static str) -> ParseResult<()> {
        self.contexts
            .push(name, self.config.max_nesting_depth)
            .map_err(|depth| ParseError::NestingTooDeep { depth })
    }

    /// Close the innermost diagnostic context, which must be `name`
    pub fn pop_context(&mut self, name: &'static str) {
        self.contexts.pop(name);
    }

    pub fn context_depth(&self) -> usize {
        self.contexts.depth()
    }

    /// Slash separated names of the open contexts, outermost first
    pub fn context_path(&self) -> String {
        self.contexts.path()
    }

    /// Run `f` inside the context `name`; the context is closed whatever `f` returns
    pub fn scoped<T>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.push_context(name)?;
        let result = f(self);
        if let Err(err) = &result {
            trace!("{} failed at bit {}: {}", self.context_path(), self.pos, err);
        }
        self.pop_context(name);
        result
    }

    /// Run `f` and restore the cursor afterwards, whether it succeeded or not
    pub fn peek<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let start = self.pos;
        let result = f(self);
        self.pos = start;
        result
    }
}
