//! Byte cursor over an instruction stream

use crate::error::AvmError;
use crate::value::AvmString;

/// Read cursor over a borrowed instruction stream.
///
/// Multi-byte fields are little-endian. Every read that would run past the
/// end of the stream is a format error.
#[derive(Debug, Clone)]
pub struct ByteStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn seek(&mut self, pos: usize) -> Result<(), AvmError> {
        if pos > self.data.len() {
            return Err(AvmError::format_error(format!(
                "seek to {} past end of stream ({} bytes)",
                pos,
                self.data.len()
            )));
        }
        self.pos = pos;
        Ok(())
    }

    /// Move the cursor by a signed offset from its current position
    pub fn seek_relative(&mut self, offset: i64) -> Result<(), AvmError> {
        let target = self.pos as i64 + offset;
        if target < 0 {
            return Err(AvmError::format_error(format!(
                "branch to {} before start of stream",
                target
            )));
        }
        self.seek(target as usize)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], AvmError> {
        let data: &'a [u8] = self.data;
        let end = self
            .pos
            .checked_add(count)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                AvmError::format_error(format!(
                    "read of {} bytes at {} past end of stream",
                    count, self.pos
                ))
            })?;
        let bytes = data.get(self.pos..end).unwrap_or_default();
        self.pos = end;
        Ok(bytes)
    }

    pub fn skip(&mut self, count: usize) -> Result<(), AvmError> {
        self.read_bytes(count).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], AvmError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, AvmError> {
        Ok(u8::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16, AvmError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, AvmError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, AvmError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, AvmError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, AvmError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Read a double stored as two little-endian 32-bit words, high word
    /// first.
    pub fn read_swapped_f64(&mut self) -> Result<f64, AvmError> {
        let high = self.read_u32()? as u64;
        let low = self.read_u32()? as u64;
        Ok(f64::from_bits((high << 32) | low))
    }

    /// Read a null-terminated string. Invalid UTF-8 is replaced.
    pub fn read_string(&mut self) -> Result<AvmString, AvmError> {
        let rest = self.data.get(self.pos..).unwrap_or_default();
        let Some(nul) = rest.iter().position(|&b| b == 0) else {
            return Err(AvmError::format_error(format!(
                "unterminated string at {}",
                self.pos
            )));
        };
        let bytes = self.read_bytes(nul)?;
        self.pos += 1;
        Ok(AvmString::from(String::from_utf8_lossy(bytes).into_owned()))
    }
}

/// MSB-first reader over the bits of a flag field
#[derive(Debug, Clone)]
pub struct BitReader<'b> {
    bytes: &'b [u8],
    bit: usize,
}

impl<'b> BitReader<'b> {
    pub fn new(bytes: &'b [u8]) -> Self {
        Self { bytes, bit: 0 }
    }

    pub fn read_bit(&mut self) -> Result<bool, AvmError> {
        let byte = self
            .bytes
            .get(self.bit / 8)
            .ok_or_else(|| AvmError::format_error("bit field exhausted"))?;
        let set = byte & (0x80 >> (self.bit % 8)) != 0;
        self.bit += 1;
        Ok(set)
    }

    pub fn read_bits(&mut self, count: usize) -> Result<u32, AvmError> {
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u32;
        }
        Ok(value)
    }
}
