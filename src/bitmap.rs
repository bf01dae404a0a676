// Gap-compressed sparse bitmap: a set of u32 positions stored as (gap, word)
// pairs, where each gap counts the empty 32-bit words skipped since the
// previous populated word. Beats a dense bit array when the set bits cluster
// into few words separated by long empty runs.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{Read, Write};

use crate::bit_iter::BitIter;
use crate::error::{Error, Result};
use crate::int_buf::IntBuf;
use crate::merge;
use crate::merge::WordSink;
use crate::skippable::WordCursor;

const WORD_SIZE: u32 = 32;

/// Two bitmaps are equal iff their pair buffers are identical. `set` keeps
/// the encoding canonical (no zero words, trailing-word bits OR-merged), so
/// equal sets built through `set` compare equal; mixing in expert `add` calls
/// can produce distinct encodings of the same set.
#[derive(Debug, Clone, Default, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct SparseBitmap {
    pub(crate) buffer: IntBuf,
    // One plus the absolute word index of the last pair; the word count is
    // fully determined by the buffer.
    pub(crate) size_in_words: u32,
}

impl SparseBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the backing buffer for `words` populated words.
    pub fn with_capacity(words: usize) -> Self {
        Self {
            buffer: IntBuf::with_capacity(2 * words),
            size_in_words: 0,
        }
    }

    /// Build a bitmap from positions sorted in non-decreasing order.
    pub fn from_sorted(positions: &[u32]) -> Result<Self> {
        let mut bitmap = Self::new();
        for &p in positions {
            bitmap.set(p)?;
        }
        Ok(bitmap)
    }

    /// Set bit `position`. Bits must be set in non-decreasing order: anything
    /// below the trailing word is rejected as out of order; within the
    /// trailing word the bit is OR-merged.
    pub fn set(&mut self, position: u32) -> Result<()> {
        let offset = position as i64 - self.size_in_words as i64 * WORD_SIZE as i64;
        if offset < -(WORD_SIZE as i64) {
            return Err(Error::OutOfOrder {
                position,
                size_in_words: self.size_in_words,
            });
        }
        if offset < 0 {
            let bit = (offset + WORD_SIZE as i64) as u32;
            let last = self.buffer.len() - 1;
            let merged = self.buffer.get(last) | 1 << bit;
            self.buffer.set(last, merged);
        } else {
            let empty_words = (offset as u32) / WORD_SIZE;
            let bit = (offset as u32) % WORD_SIZE;
            self.add(1 << bit, self.size_in_words + empty_words);
        }
        Ok(())
    }

    /// Expert append of a literal word at absolute word index `offset`, which
    /// must be at least `size_in_words`. Minimal checking; zero words are
    /// accepted but enumerate as nothing.
    pub fn add(&mut self, word: u32, offset: u32) {
        debug_assert!(
            offset >= self.size_in_words,
            "words must be appended in increasing order"
        );
        self.buffer.push(offset - self.size_in_words);
        self.buffer.push(word);
        self.size_in_words = offset + 1;
    }

    /// Number of set bits.
    pub fn cardinality(&self) -> usize {
        (1..self.buffer.len())
            .step_by(2)
            .map(|k| self.buffer.get(k).count_ones() as usize)
            .sum()
    }

    /// The set positions in ascending order.
    pub fn to_vec(&self) -> Vec<u32> {
        let mut positions = Vec::with_capacity(self.cardinality());
        positions.extend(self.iter());
        positions
    }

    /// Iterate over the set positions, lowest first.
    pub fn iter(&self) -> BitIter<'_> {
        BitIter::new(&self.buffer)
    }

    /// Cursor over the populated (offset, word) pairs, for skip-driven
    /// kernels.
    pub fn skippable_iterator(&self) -> WordCursor<'_> {
        WordCursor::new(&self.buffer)
    }

    /// One plus the absolute word index of the last populated word.
    pub fn size_in_words(&self) -> u32 {
        self.size_in_words
    }

    /// Storage used by the pair buffer, in bytes.
    pub fn size_in_bytes(&self) -> usize {
        self.buffer.len() * 4
    }

    /// Release unused buffer capacity. Returns the new storage size in bytes.
    pub fn trim(&mut self) -> usize {
        self.buffer.trim()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.size_in_words = 0;
    }

    /// Rolling hash of the pair buffer.
    pub fn hash_code(&self) -> u32 {
        self.buffer.hash_code()
    }

    /// Bit-wise intersection with another bitmap.
    pub fn and(&self, other: &SparseBitmap) -> SparseBitmap {
        let mut out = SparseBitmap::new();
        merge::and2by2(&mut out, self, other);
        out
    }

    /// Bit-wise union with another bitmap.
    pub fn or(&self, other: &SparseBitmap) -> SparseBitmap {
        let mut out = SparseBitmap::new();
        merge::or2by2(&mut out, self, other);
        out
    }

    /// Bit-wise symmetric difference with another bitmap.
    pub fn xor(&self, other: &SparseBitmap) -> SparseBitmap {
        let mut out = SparseBitmap::new();
        merge::xor2by2(&mut out, self, other);
        out
    }

    /// Persist as the buffer's byte envelope: big-endian length, then
    /// big-endian elements. No magic bytes, no version, no checksum.
    pub fn serialize_into<W: Write>(&self, out: &mut W) -> Result<()> {
        self.buffer.serialize_into(out)
    }

    /// Reload from the byte envelope, reconstructing the word count from the
    /// stored gaps.
    pub fn deserialize_from<R: Read>(input: &mut R) -> Result<Self> {
        let buffer = IntBuf::deserialize_from(input)?;
        if buffer.len() % 2 != 0 {
            return Err(Error::CorruptStream(buffer.len()));
        }
        let size_in_words = (0..buffer.len())
            .step_by(2)
            .map(|k| buffer.get(k) + 1)
            .sum();
        Ok(Self {
            buffer,
            size_in_words,
        })
    }

    /// Snapshot through bincode with the standard fixed-int config.
    pub fn encode(&self) -> Vec<u8> {
        let config = bincode::config::standard().with_fixed_int_encoding();
        bincode::encode_to_vec(self, config).unwrap()
    }

    /// Inverse of `encode`.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let config = bincode::config::standard().with_fixed_int_encoding();
        let (bitmap, _) = bincode::decode_from_slice(data, config)?;
        Ok(bitmap)
    }
}

impl WordSink for SparseBitmap {
    fn add(&mut self, word: u32, offset: u32) {
        SparseBitmap::add(self, word, offset);
    }
}

impl<'a> IntoIterator for &'a SparseBitmap {
    type Item = u32;
    type IntoIter = BitIter<'a>;

    fn into_iter(self) -> BitIter<'a> {
        self.iter()
    }
}

impl Hash for SparseBitmap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl fmt::Display for SparseBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut iter = self.iter();
        if let Some(first) = iter.next() {
            write!(f, "{first}")?;
        }
        for position in iter {
            write!(f, ",{position}")?;
        }
        write!(f, "}}")
    }
}
