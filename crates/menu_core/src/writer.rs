/// In-memory builder for menu buffers, the inverse of `MenuReader`.
/// The sink is a `Vec`, so every put is infallible; the property section
/// is assembled here first so its byte length can be emitted as a prefix
/// without seeking.
#[derive(Debug, Default)]
pub struct MenuWriter {
    bytes: Vec<u8>,
}

impl MenuWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn put_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn put_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_string(&mut self, value: &str) {
        self.put_7bit_length(value.len());
        self.bytes.extend_from_slice(value.as_bytes());
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn put_7bit_length(&mut self, mut len: usize) {
        while len >= 0x80 {
            self.bytes.push((len as u8 & 0x7F) | 0x80);
            len >>= 7;
        }
        self.bytes.push(len as u8);
    }
}
