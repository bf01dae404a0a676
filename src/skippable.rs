// Forward cursor over the (offset, word) pairs of a compressed bitmap.
// Skip-driven kernels are built on `advance_until`, which leaps over pairs
// without touching the words in between.

use crate::int_buf::IntBuf;

/// Forward-only, single-pass cursor over populated words in increasing
/// absolute word order. `current_word` and `current_word_offset` are only
/// meaningful while `has_value()` holds.
pub trait SkippableIterator {
    fn has_value(&self) -> bool;

    /// Step to the next populated word.
    fn advance(&mut self);

    /// Advance once, then keep advancing while the word offset is below
    /// `min`. Lands on the first populated word at or past `min` — or one
    /// word further when the cursor already was at or past it.
    fn advance_until(&mut self, min: u32);

    /// The word under the cursor, without advancing.
    fn current_word(&self) -> u32;

    /// Absolute word index of the word under the cursor.
    fn current_word_offset(&self) -> u32;
}

impl<T: SkippableIterator + ?Sized> SkippableIterator for Box<T> {
    fn has_value(&self) -> bool {
        (**self).has_value()
    }

    fn advance(&mut self) {
        (**self).advance()
    }

    fn advance_until(&mut self, min: u32) {
        (**self).advance_until(min)
    }

    fn current_word(&self) -> u32 {
        (**self).current_word()
    }

    fn current_word_offset(&self) -> u32 {
        (**self).current_word_offset()
    }
}

impl<T: SkippableIterator + ?Sized> SkippableIterator for &mut T {
    fn has_value(&self) -> bool {
        (**self).has_value()
    }

    fn advance(&mut self) {
        (**self).advance()
    }

    fn advance_until(&mut self, min: u32) {
        (**self).advance_until(min)
    }

    fn current_word(&self) -> u32 {
        (**self).current_word()
    }

    fn current_word_offset(&self) -> u32 {
        (**self).current_word_offset()
    }
}

/// Cursor over one bitmap's pair buffer.
pub struct WordCursor<'a> {
    buffer: &'a IntBuf,
    pos: usize,
    offset: u32,
}

impl<'a> WordCursor<'a> {
    pub(crate) fn new(buffer: &'a IntBuf) -> Self {
        let offset = if buffer.is_empty() { 0 } else { buffer.get(0) };
        Self {
            buffer,
            pos: 0,
            offset,
        }
    }
}

impl SkippableIterator for WordCursor<'_> {
    fn has_value(&self) -> bool {
        self.pos < self.buffer.len()
    }

    fn advance(&mut self) {
        self.pos += 2;
        if self.pos < self.buffer.len() {
            self.offset += self.buffer.get(self.pos) + 1;
        }
    }

    fn advance_until(&mut self, min: u32) {
        self.advance();
        while self.has_value() && self.offset < min {
            self.advance();
        }
    }

    fn current_word(&self) -> u32 {
        self.buffer.get(self.pos + 1)
    }

    fn current_word_offset(&self) -> u32 {
        self.offset
    }
}
