// Merge-driven pairwise kernels: walk both pair buffers to completion,
// keeping the absolute word indices in sync, and emit into a sink.

use crate::bitmap::SparseBitmap;

/// Anything that accepts (word, offset) appends in increasing offset order.
pub trait WordSink {
    fn add(&mut self, word: u32, offset: u32);
}

/// Intersection. Emits only non-zero words.
pub fn and2by2(sink: &mut impl WordSink, a: &SparseBitmap, b: &SparseBitmap) {
    let (abuf, bbuf) = (&a.buffer, &b.buffer);
    if abuf.is_empty() || bbuf.is_empty() {
        return;
    }
    let mut it1 = 0;
    let mut it2 = 0;
    let mut p1 = abuf.get(0);
    let mut p2 = bbuf.get(0);
    loop {
        if p1 < p2 {
            it1 += 2;
            if it1 >= abuf.len() {
                break;
            }
            p1 += abuf.get(it1) + 1;
        } else if p1 > p2 {
            it2 += 2;
            if it2 >= bbuf.len() {
                break;
            }
            p2 += bbuf.get(it2) + 1;
        } else {
            let word = abuf.get(it1 + 1) & bbuf.get(it2 + 1);
            if word != 0 {
                sink.add(word, p1);
            }
            it1 += 2;
            it2 += 2;
            if it1 >= abuf.len() || it2 >= bbuf.len() {
                break;
            }
            p1 += abuf.get(it1) + 1;
            p2 += bbuf.get(it2) + 1;
        }
    }
}

/// Union. After the joint walk, drains whichever side survives.
pub fn or2by2(sink: &mut impl WordSink, a: &SparseBitmap, b: &SparseBitmap) {
    let (abuf, bbuf) = (&a.buffer, &b.buffer);
    let mut it1 = 0;
    let mut it2 = 0;
    let mut p1 = if abuf.is_empty() { 0 } else { abuf.get(0) };
    let mut p2 = if bbuf.is_empty() { 0 } else { bbuf.get(0) };
    if !abuf.is_empty() && !bbuf.is_empty() {
        loop {
            if p1 < p2 {
                sink.add(abuf.get(it1 + 1), p1);
                it1 += 2;
                if it1 >= abuf.len() {
                    break;
                }
                p1 += abuf.get(it1) + 1;
            } else if p1 > p2 {
                sink.add(bbuf.get(it2 + 1), p2);
                it2 += 2;
                if it2 >= bbuf.len() {
                    break;
                }
                p2 += bbuf.get(it2) + 1;
            } else {
                sink.add(abuf.get(it1 + 1) | bbuf.get(it2 + 1), p1);
                it1 += 2;
                it2 += 2;
                if it1 < abuf.len() {
                    p1 += abuf.get(it1) + 1;
                }
                if it2 < bbuf.len() {
                    p2 += bbuf.get(it2) + 1;
                }
                if it1 >= abuf.len() || it2 >= bbuf.len() {
                    break;
                }
            }
        }
    }
    // at most one of these drains runs
    while it1 < abuf.len() {
        sink.add(abuf.get(it1 + 1), p1);
        it1 += 2;
        if it1 < abuf.len() {
            p1 += abuf.get(it1) + 1;
        }
    }
    while it2 < bbuf.len() {
        sink.add(bbuf.get(it2 + 1), p2);
        it2 += 2;
        if it2 < bbuf.len() {
            p2 += bbuf.get(it2) + 1;
        }
    }
}

/// Symmetric difference. Equal offsets with equal words cancel out entirely.
pub fn xor2by2(sink: &mut impl WordSink, a: &SparseBitmap, b: &SparseBitmap) {
    let (abuf, bbuf) = (&a.buffer, &b.buffer);
    let mut it1 = 0;
    let mut it2 = 0;
    let mut p1 = if abuf.is_empty() { 0 } else { abuf.get(0) };
    let mut p2 = if bbuf.is_empty() { 0 } else { bbuf.get(0) };
    if !abuf.is_empty() && !bbuf.is_empty() {
        loop {
            if p1 < p2 {
                sink.add(abuf.get(it1 + 1), p1);
                it1 += 2;
                if it1 >= abuf.len() {
                    break;
                }
                p1 += abuf.get(it1) + 1;
            } else if p1 > p2 {
                sink.add(bbuf.get(it2 + 1), p2);
                it2 += 2;
                if it2 >= bbuf.len() {
                    break;
                }
                p2 += bbuf.get(it2) + 1;
            } else {
                let w1 = abuf.get(it1 + 1);
                let w2 = bbuf.get(it2 + 1);
                if w1 != w2 {
                    sink.add(w1 ^ w2, p1);
                }
                it1 += 2;
                it2 += 2;
                if it1 < abuf.len() {
                    p1 += abuf.get(it1) + 1;
                }
                if it2 < bbuf.len() {
                    p2 += bbuf.get(it2) + 1;
                }
                if it1 >= abuf.len() || it2 >= bbuf.len() {
                    break;
                }
            }
        }
    }
    while it1 < abuf.len() {
        sink.add(abuf.get(it1 + 1), p1);
        it1 += 2;
        if it1 < abuf.len() {
            p1 += abuf.get(it1) + 1;
        }
    }
    while it2 < bbuf.len() {
        sink.add(bbuf.get(it2 + 1), p2);
        it2 += 2;
        if it2 < bbuf.len() {
            p2 += bbuf.get(it2) + 1;
        }
    }
}

#[cfg(test)]
pub(crate) fn intersect_ref(a: &[u32], b: &[u32]) -> Vec<u32> {
    use std::collections::BTreeSet;
    let sa: BTreeSet<u32> = a.iter().copied().collect();
    let sb: BTreeSet<u32> = b.iter().copied().collect();
    sa.intersection(&sb).copied().collect()
}

#[cfg(test)]
pub(crate) fn unite_ref(a: &[u32], b: &[u32]) -> Vec<u32> {
    use std::collections::BTreeSet;
    let sa: BTreeSet<u32> = a.iter().copied().collect();
    let sb: BTreeSet<u32> = b.iter().copied().collect();
    sa.union(&sb).copied().collect()
}

#[cfg(test)]
pub(crate) fn xor_ref(a: &[u32], b: &[u32]) -> Vec<u32> {
    use std::collections::BTreeSet;
    let sa: BTreeSet<u32> = a.iter().copied().collect();
    let sb: BTreeSet<u32> = b.iter().copied().collect();
    sa.symmetric_difference(&sb).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bm(positions: &[u32]) -> SparseBitmap {
        SparseBitmap::from_sorted(positions).unwrap()
    }

    #[test]
    fn test_and_or_xor() {
        let b1 = bm(&[1, 2, 100, 150, 1000, 123_456]);
        let b2 = bm(&[1, 2, 3, 1000, 123_456, 1_234_567]);
        assert_eq!(b1.and(&b2).to_vec(), vec![1, 2, 1000, 123_456]);
        assert_eq!(
            b1.or(&b2).to_vec(),
            vec![1, 2, 3, 100, 150, 1000, 123_456, 1_234_567]
        );
        assert_eq!(b1.xor(&b2).to_vec(), vec![3, 100, 150, 1_234_567]);
    }

    #[test]
    fn test_empty_operands() {
        let empty = SparseBitmap::new();
        let b = bm(&[5, 64, 900]);
        assert_eq!(empty.and(&b).to_vec(), vec![]);
        assert_eq!(b.and(&empty).to_vec(), vec![]);
        assert_eq!(empty.or(&b).to_vec(), b.to_vec());
        assert_eq!(b.or(&empty).to_vec(), b.to_vec());
        assert_eq!(empty.xor(&b).to_vec(), b.to_vec());
        assert_eq!(b.xor(&empty).to_vec(), b.to_vec());
        assert_eq!(empty.and(&empty).to_vec(), vec![]);
        assert_eq!(empty.or(&empty).to_vec(), vec![]);
    }

    #[test]
    fn test_idempotence() {
        let b = bm(&[0, 31, 32, 77, 4096]);
        assert_eq!(b.and(&b), b);
        assert_eq!(b.or(&b), b);
        assert_eq!(b.xor(&b), SparseBitmap::new());
    }

    #[test]
    fn test_xor_cancels_single_shared_word() {
        // both words at offset 0 and equal: no pair may be emitted at all
        let b1 = bm(&[3, 900]);
        let b2 = bm(&[3]);
        assert_eq!(b1.xor(&b2).to_vec(), vec![900]);
        let b3 = bm(&[3]);
        assert_eq!(b3.xor(&b3).to_vec(), vec![]);
    }

    #[test]
    fn test_exhaustive_vs_reference() {
        let universe1 = [0u32, 1, 31, 32, 63, 200, 1000];
        let universe2 = [1u32, 31, 64, 200, 999, 1000, 4096];
        let mut gen = exhaustigen::Gen::new();
        while !gen.done() {
            let l1: Vec<u32> = gen.gen_subset(&universe1).copied().collect();
            let l2: Vec<u32> = gen.gen_subset(&universe2).copied().collect();
            let b1 = bm(&l1);
            let b2 = bm(&l2);
            assert_eq!(b1.and(&b2).to_vec(), intersect_ref(&l1, &l2));
            assert_eq!(b1.or(&b2).to_vec(), unite_ref(&l1, &l2));
            assert_eq!(b1.xor(&b2).to_vec(), xor_ref(&l1, &l2));
        }
    }
}
