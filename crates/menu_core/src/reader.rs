use std::io;

/// Cursor over a fully loaded menu buffer. Integers are little-endian;
/// strings use the .NET BinaryReader framing: a 7-bit variable-length
/// byte count followed by that many bytes of UTF-8.
pub struct MenuReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> MenuReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let b = self.take(1)?;
        Ok(b[0])
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_string(&mut self) -> io::Result<String> {
        let len = self.read_7bit_length()?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn read_7bit_length(&mut self) -> io::Result<usize> {
        let mut value = 0usize;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            value |= usize::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            // 5 bytes encode up to 35 bits; anything longer is malformed
            if shift >= 35 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "string length prefix too long",
                ));
            }
        }
    }

    fn take(&mut self, n: usize) -> io::Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.bytes.len());
        let Some(end) = end else {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "unexpected end of menu buffer: need {n} bytes at offset {}, have {}",
                    self.pos,
                    self.remaining()
                ),
            ));
        };
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }
}
