//! Cursor helpers for fixed-layout records.
//!
//! Records mirror a C struct on a little-endian 64-bit target: 4-byte
//! integers aligned to 4, 1-byte bools, NUL-terminated char buffers, zeroed
//! padding.

use byteorder::{ByteOrder, LittleEndian};

/// Writes fields into a zeroed record buffer.
pub struct RecordWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> RecordWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        buf.fill(0);
        Self { buf, pos: 0 }
    }

    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.align(4);
        LittleEndian::write_i32(&mut self.buf[self.pos..self.pos + 4], value);
        self.pos += 4;
        self
    }

    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.buf[self.pos] = u8::from(value);
        self.pos += 1;
        self
    }

    /// Copy `bytes` into a `width`-byte buffer, always leaving a NUL.
    pub fn text(&mut self, bytes: &[u8], width: usize) -> &mut Self {
        let len = bytes.len().min(width - 1);
        self.buf[self.pos..self.pos + len].copy_from_slice(&bytes[..len]);
        self.pos += width;
        self
    }

    /// Pad to the end of the record (struct tail alignment).
    pub fn finish(&mut self) {
        self.pos = self.buf.len();
    }

    fn align(&mut self, to: usize) {
        self.pos = self.pos.next_multiple_of(to);
    }

    #[cfg(test)]
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Reads fields back out of a record buffer.
pub struct RecordReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn i32(&mut self) -> i32 {
        self.pos = self.pos.next_multiple_of(4);
        let value = LittleEndian::read_i32(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        value
    }

    pub fn bool(&mut self) -> bool {
        let value = self.buf[self.pos] != 0;
        self.pos += 1;
        value
    }

    /// Bytes of a `width`-byte buffer up to the first NUL.
    pub fn bytes(&mut self, width: usize) -> Vec<u8> {
        let field = &self.buf[self.pos..self.pos + width];
        self.pos += width;
        let end = field.iter().position(|&b| b == 0).unwrap_or(width);
        field[..end].to_vec()
    }

    pub fn text(&mut self, width: usize) -> String {
        String::from_utf8_lossy(&self.bytes(width)).into_owned()
    }
}
