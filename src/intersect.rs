// Skip-driven intersection kernels. Where the merge kernels walk every pair
// on both sides, these leap-frog: each input is advanced directly to the
// frontier offset of the others, so long empty runs on the dense side are
// never scanned.

use crate::bitmap::SparseBitmap;
use crate::error::{Error, Result};
use crate::skippable::SkippableIterator;

pub type BoxedSkippable<'a> = Box<dyn SkippableIterator + 'a>;

/// Skippable cursors over a family of bitmaps, in order.
pub fn cursors(bitmaps: &[SparseBitmap]) -> Vec<BoxedSkippable<'_>> {
    bitmaps
        .iter()
        .map(|b| Box::new(b.skippable_iterator()) as BoxedSkippable<'_>)
        .collect()
}

/// Pairwise intersection of two skippable iterators.
pub fn and2by2<'a>(a: BoxedSkippable<'a>, b: BoxedSkippable<'a>) -> BoxedSkippable<'a> {
    Box::new(PairwiseAnd::new(a, b))
}

/// N-ary intersection that converges all inputs on a shared frontier offset.
pub fn and<'a>(inputs: Vec<BoxedSkippable<'a>>) -> Result<BoxedSkippable<'a>> {
    Ok(Box::new(NaryAnd::new(inputs)?))
}

/// N-ary intersection that tracks how many inputs already agree on the
/// frontier, sparing re-examination of inputs that are known to sit on it.
/// The result cannot seek (`advance_until` panics); use [`and`] when the
/// result must itself compose under deeper skip-driven kernels.
pub fn fast_and<'a>(inputs: Vec<BoxedSkippable<'a>>) -> Result<BoxedSkippable<'a>> {
    Ok(Box::new(FastAnd::new(inputs)?))
}

/// Balanced pairwise reduction: (0,1), (2,3), ... with an odd leftover
/// carried into the next round.
pub fn tree_and<'a>(mut inputs: Vec<BoxedSkippable<'a>>) -> Result<BoxedSkippable<'a>> {
    while inputs.len() > 1 {
        let mut reduced = Vec::with_capacity(inputs.len() / 2 + 1);
        let mut pairs = inputs.into_iter();
        while let Some(first) = pairs.next() {
            match pairs.next() {
                Some(second) => reduced.push(and2by2(first, second)),
                None => reduced.push(first),
            }
        }
        inputs = reduced;
    }
    inputs.pop().ok_or(Error::EmptyAggregate)
}

/// Left fold in input order.
pub fn flat_and<'a>(inputs: Vec<BoxedSkippable<'a>>) -> Result<BoxedSkippable<'a>> {
    let mut pairs = inputs.into_iter();
    let mut answer = pairs.next().ok_or(Error::EmptyAggregate)?;
    for input in pairs {
        answer = and2by2(answer, input);
    }
    Ok(answer)
}

/// Right fold.
pub fn reverse_flat_and<'a>(inputs: Vec<BoxedSkippable<'a>>) -> Result<BoxedSkippable<'a>> {
    let mut pairs = inputs.into_iter().rev();
    let mut answer = pairs.next().ok_or(Error::EmptyAggregate)?;
    for input in pairs {
        answer = and2by2(answer, input);
    }
    Ok(answer)
}

/// Drain a skippable iterator into a fresh bitmap.
pub fn materialize(mut it: impl SkippableIterator) -> SparseBitmap {
    let mut bitmap = SparseBitmap::new();
    while it.has_value() {
        bitmap.add(it.current_word(), it.current_word_offset());
        it.advance();
    }
    bitmap
}

/// Count set bits without materializing.
pub fn cardinality(mut it: impl SkippableIterator) -> usize {
    let mut total = 0;
    while it.has_value() {
        total += it.current_word().count_ones() as usize;
        it.advance();
    }
    total
}

struct PairwiseAnd<'a> {
    a: BoxedSkippable<'a>,
    b: BoxedSkippable<'a>,
    current_word: u32,
    has_value: bool,
}

impl<'a> PairwiseAnd<'a> {
    fn new(a: BoxedSkippable<'a>, b: BoxedSkippable<'a>) -> Self {
        let mut it = Self {
            a,
            b,
            current_word: 0,
            has_value: false,
        };
        it.resync();
        it
    }

    // Leap-frog both sides to the next offset where they agree on a non-zero
    // word.
    fn resync(&mut self) {
        self.has_value = false;
        if !self.a.has_value() || !self.b.has_value() {
            return;
        }
        loop {
            let pa = self.a.current_word_offset();
            let pb = self.b.current_word_offset();
            if pa < pb {
                self.a.advance_until(pb);
                if !self.a.has_value() {
                    return;
                }
            } else if pa > pb {
                self.b.advance_until(pa);
                if !self.b.has_value() {
                    return;
                }
            } else {
                let word = self.a.current_word() & self.b.current_word();
                if word != 0 {
                    self.current_word = word;
                    self.has_value = true;
                    return;
                }
                self.a.advance();
                if !self.a.has_value() {
                    return;
                }
                self.b.advance_until(self.a.current_word_offset());
                if !self.b.has_value() {
                    return;
                }
            }
        }
    }
}

impl SkippableIterator for PairwiseAnd<'_> {
    fn has_value(&self) -> bool {
        self.has_value
    }

    fn advance(&mut self) {
        self.a.advance();
        if self.a.has_value() {
            self.b.advance_until(self.a.current_word_offset());
            self.resync();
        } else {
            self.has_value = false;
        }
    }

    fn advance_until(&mut self, min: u32) {
        self.a.advance_until(min);
        if self.a.has_value() {
            self.b.advance_until(self.a.current_word_offset());
            self.resync();
        } else {
            self.has_value = false;
        }
    }

    fn current_word(&self) -> u32 {
        self.current_word
    }

    fn current_word_offset(&self) -> u32 {
        // both sides are parked on the same offset after a publish
        self.a.current_word_offset()
    }
}

struct NaryAnd<'a> {
    inputs: Vec<BoxedSkippable<'a>>,
    max_offset: u32,
    current_word: u32,
    has_value: bool,
}

impl<'a> NaryAnd<'a> {
    fn new(inputs: Vec<BoxedSkippable<'a>>) -> Result<Self> {
        if inputs.is_empty() {
            return Err(Error::EmptyAggregate);
        }
        let mut it = Self {
            inputs,
            max_offset: 0,
            current_word: 0,
            has_value: false,
        };
        if it.inputs.iter().all(|input| input.has_value()) {
            it.max_offset = it
                .inputs
                .iter()
                .map(|input| input.current_word_offset())
                .max()
                .unwrap_or(0);
            it.resync();
        }
        Ok(it)
    }

    // Sweep all inputs up to the frontier until a full pass moves nothing,
    // then AND the agreed words; a zero result steps everyone and retries.
    fn resync(&mut self) {
        self.has_value = false;
        loop {
            let mut stable = true;
            for k in 0..self.inputs.len() {
                if self.inputs[k].current_word_offset() < self.max_offset {
                    self.inputs[k].advance_until(self.max_offset);
                    if !self.inputs[k].has_value() {
                        return;
                    }
                    self.max_offset = self.inputs[k].current_word_offset();
                    stable = false;
                }
            }
            if !stable {
                continue;
            }
            let mut word = u32::MAX;
            for input in &self.inputs {
                word &= input.current_word();
            }
            if word != 0 {
                self.current_word = word;
                self.has_value = true;
                return;
            }
            if !self.step() {
                return;
            }
        }
    }

    // One step past the current frontier on every input. False on
    // exhaustion.
    fn step(&mut self) -> bool {
        for k in 0..self.inputs.len() {
            self.inputs[k].advance_until(self.max_offset);
            if !self.inputs[k].has_value() {
                return false;
            }
            self.max_offset = self.inputs[k].current_word_offset();
        }
        true
    }
}

impl SkippableIterator for NaryAnd<'_> {
    fn has_value(&self) -> bool {
        self.has_value
    }

    fn advance(&mut self) {
        if self.step() {
            self.resync();
        } else {
            self.has_value = false;
        }
    }

    fn advance_until(&mut self, min: u32) {
        let last = self.inputs.len() - 1;
        self.inputs[last].advance_until(min);
        if self.inputs[last].has_value() {
            self.max_offset = self.inputs[last].current_word_offset();
            self.resync();
        } else {
            self.has_value = false;
        }
    }

    fn current_word(&self) -> u32 {
        self.current_word
    }

    fn current_word_offset(&self) -> u32 {
        self.max_offset
    }
}

struct FastAnd<'a> {
    inputs: Vec<BoxedSkippable<'a>>,
    max_offset: u32,
    current_word: u32,
    has_value: bool,
    // number of inputs currently parked on max_offset
    agreeing: usize,
}

impl<'a> FastAnd<'a> {
    fn new(inputs: Vec<BoxedSkippable<'a>>) -> Result<Self> {
        if inputs.is_empty() {
            return Err(Error::EmptyAggregate);
        }
        let mut it = Self {
            inputs,
            max_offset: 0,
            current_word: 0,
            has_value: false,
            agreeing: 0,
        };
        if it.inputs.iter().all(|input| input.has_value()) {
            it.max_offset = it.inputs[0].current_word_offset();
            it.agreeing = 1;
            for k in 1..it.inputs.len() {
                let offset = it.inputs[k].current_word_offset();
                if offset > it.max_offset {
                    it.max_offset = offset;
                    it.agreeing = 1;
                } else if offset == it.max_offset {
                    it.agreeing += 1;
                }
            }
            it.resync();
        }
        Ok(it)
    }

    // Advance only the inputs sitting strictly behind the frontier until
    // every input agrees on it; an overshoot moves the frontier, resets the
    // agreement count, and restarts the sweep. Publishes the first agreement
    // with a non-zero AND.
    fn resync(&mut self) {
        self.has_value = false;
        loop {
            while self.agreeing < self.inputs.len() {
                for k in 0..self.inputs.len() {
                    if self.inputs[k].current_word_offset() < self.max_offset {
                        self.inputs[k].advance_until(self.max_offset);
                        if !self.inputs[k].has_value() {
                            return;
                        }
                        let offset = self.inputs[k].current_word_offset();
                        if offset > self.max_offset {
                            self.max_offset = offset;
                            self.agreeing = 1;
                            break;
                        }
                        self.agreeing += 1;
                    }
                }
            }
            let mut word = u32::MAX;
            for input in &self.inputs {
                word &= input.current_word();
            }
            if word != 0 {
                self.current_word = word;
                self.has_value = true;
                return;
            }
            if !self.step() {
                return;
            }
        }
    }

    // Step input 0 one pair, then re-seed the agreement count by syncing the
    // rest to it. False on exhaustion.
    fn step(&mut self) -> bool {
        self.inputs[0].advance();
        if !self.inputs[0].has_value() {
            return false;
        }
        self.max_offset = self.inputs[0].current_word_offset();
        self.agreeing = 1;
        for k in 1..self.inputs.len() {
            self.inputs[k].advance_until(self.max_offset);
            if !self.inputs[k].has_value() {
                return false;
            }
            let offset = self.inputs[k].current_word_offset();
            if offset > self.max_offset {
                self.max_offset = offset;
                self.agreeing = 1;
            } else {
                self.agreeing += 1;
            }
        }
        true
    }
}

impl SkippableIterator for FastAnd<'_> {
    fn has_value(&self) -> bool {
        self.has_value
    }

    fn advance(&mut self) {
        if self.step() {
            self.resync();
        } else {
            self.has_value = false;
        }
    }

    /// Unsupported: this iterator only moves forward one agreement at a
    /// time.
    fn advance_until(&mut self, _min: u32) {
        // todo: seek by re-seeding the agreement sweep from a full
        // advance_until pass over the inputs
        unimplemented!("fast_and iterators cannot seek");
    }

    fn current_word(&self) -> u32 {
        self.current_word
    }

    fn current_word_offset(&self) -> u32 {
        self.max_offset
    }
}
