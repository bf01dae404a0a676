// Growable buffer of 32-bit words, the backing store for the compressed
// bitmap. The bitmap lays out (gap, word) pairs flat in here; this type only
// knows about u32 storage, hashing, and the byte envelope.

use std::io::{Read, Write};

use crate::error::Result;

const INITIAL_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct IntBuf {
    data: Vec<u32>,
}

impl IntBuf {
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity.max(INITIAL_CAPACITY)),
        }
    }

    pub fn push(&mut self, value: u32) {
        self.data.push(value);
    }

    pub fn get(&self, index: usize) -> u32 {
        self.data[index]
    }

    pub fn set(&mut self, index: usize, value: u32) {
        self.data[index] = value;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Release unused capacity. Returns the new storage size in bytes.
    pub fn trim(&mut self) -> usize {
        self.data.shrink_to_fit();
        self.data.len() * 4
    }

    /// Deterministic rolling hash over the elements: h = 31*h + x, wrapping.
    pub fn hash_code(&self) -> u32 {
        self.data
            .iter()
            .fold(0u32, |h, &x| h.wrapping_mul(31).wrapping_add(x))
    }

    /// Write a big-endian element count followed by each element, big-endian.
    pub fn serialize_into<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(&(self.data.len() as u32).to_be_bytes())?;
        for &x in &self.data {
            out.write_all(&x.to_be_bytes())?;
        }
        Ok(())
    }

    /// Inverse of `serialize_into`. A truncated stream fails with the
    /// underlying io error.
    pub fn deserialize_from<R: Read>(input: &mut R) -> Result<Self> {
        let mut word = [0u8; 4];
        input.read_exact(&mut word)?;
        let len = u32::from_be_bytes(word) as usize;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len {
            input.read_exact(&mut word)?;
            data.push(u32::from_be_bytes(word));
        }
        Ok(Self { data })
    }
}

impl Default for IntBuf {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_get_set() {
        let mut buf = IntBuf::new();
        for k in 0..100 {
            buf.push(k * 3);
        }
        assert_eq!(buf.len(), 100);
        assert_eq!(buf.get(33), 99);
        buf.set(33, 7);
        assert_eq!(buf.get(33), 7);
        buf.clear();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_trim_reports_byte_size() {
        let mut buf = IntBuf::new();
        buf.push(1);
        buf.push(2);
        assert_eq!(buf.trim(), 8);
    }

    #[test]
    fn test_rolling_hash() {
        let mut buf = IntBuf::new();
        buf.push(1);
        buf.push(2);
        // 31 * (31 * 0 + 1) + 2
        assert_eq!(buf.hash_code(), 33);
        assert_eq!(buf.hash_code(), buf.clone().hash_code());
        assert_eq!(IntBuf::new().hash_code(), 0);
    }

    #[test]
    fn test_envelope_round_trip() {
        let mut buf = IntBuf::new();
        for x in [0, 1, u32::MAX, 1 << 31, 12345] {
            buf.push(x);
        }
        let mut bytes = Vec::new();
        buf.serialize_into(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 4 + 5 * 4);
        let reloaded = IntBuf::deserialize_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(reloaded, buf);
    }

    #[test]
    fn test_envelope_is_big_endian() {
        let mut buf = IntBuf::new();
        buf.push(0x0102_0304);
        let mut bytes = Vec::new();
        buf.serialize_into(&mut bytes).unwrap();
        assert_eq!(bytes, [0, 0, 0, 1, 1, 2, 3, 4]);
    }

    #[test]
    fn test_truncated_envelope_fails() {
        let mut buf = IntBuf::new();
        buf.push(9);
        buf.push(10);
        let mut bytes = Vec::new();
        buf.serialize_into(&mut bytes).unwrap();
        bytes.truncate(bytes.len() - 1);
        assert!(IntBuf::deserialize_from(&mut bytes.as_slice()).is_err());
    }
}
