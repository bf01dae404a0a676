// Multi-way aggregation over owned bitmaps. A size-ordered priority queue
// always combines the two smallest operands first, which keeps the
// intermediate results small when the input sizes vary.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use log::debug;

use crate::bitmap::SparseBitmap;

/// Bit-wise AND of all inputs. Zero inputs yield an empty bitmap.
pub fn and(bitmaps: Vec<SparseBitmap>) -> SparseBitmap {
    combine(bitmaps, SparseBitmap::and)
}

/// Bit-wise OR of all inputs. Zero inputs yield an empty bitmap.
pub fn or(bitmaps: Vec<SparseBitmap>) -> SparseBitmap {
    combine(bitmaps, SparseBitmap::or)
}

/// Bit-wise XOR of all inputs. Zero inputs yield an empty bitmap.
pub fn xor(bitmaps: Vec<SparseBitmap>) -> SparseBitmap {
    combine(bitmaps, SparseBitmap::xor)
}

fn combine(
    mut bitmaps: Vec<SparseBitmap>,
    op: impl Fn(&SparseBitmap, &SparseBitmap) -> SparseBitmap,
) -> SparseBitmap {
    if bitmaps.len() <= 2 {
        let second = bitmaps.pop();
        let first = bitmaps.pop();
        return match (first, second) {
            (Some(a), Some(b)) => op(&a, &b),
            (None, Some(only)) | (Some(only), None) => only,
            (None, None) => SparseBitmap::new(),
        };
    }
    debug!("aggregating {} bitmaps through a size-ordered queue", bitmaps.len());
    let mut queue: BinaryHeap<Reverse<BySize>> =
        bitmaps.into_iter().map(|b| Reverse(BySize(b))).collect();
    loop {
        let Some(Reverse(BySize(smallest))) = queue.pop() else {
            return SparseBitmap::new();
        };
        let Some(Reverse(BySize(second))) = queue.pop() else {
            return smallest;
        };
        queue.push(Reverse(BySize(op(&smallest, &second))));
    }
}

// Heap ordering by storage size; ties break arbitrarily.
struct BySize(SparseBitmap);

impl PartialEq for BySize {
    fn eq(&self, other: &Self) -> bool {
        self.0.size_in_bytes() == other.0.size_in_bytes()
    }
}

impl Eq for BySize {}

impl PartialOrd for BySize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BySize {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.size_in_bytes().cmp(&other.0.size_in_bytes())
    }
}
