/// Flat bit vector; used as the `visited` scratch during value assignment.
#[derive(Debug)]
pub(crate) struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    pub(crate) fn new(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(64)],
        }
    }

    #[inline]
    pub(crate) fn test(&self, idx: usize) -> bool {
        (self.words[idx >> 6] >> (idx & 63)) & 1 == 1
    }

    #[inline]
    pub(crate) fn set(&mut self, idx: usize) {
        self.words[idx >> 6] |= 1u64 << (idx & 63);
    }
}

#[cfg(test)]
mod tests {
    use super::BitSet;

    #[test]
    fn set_and_test_across_word_boundaries() {
        let mut bs = BitSet::new(130);
        for idx in [0usize, 1, 63, 64, 65, 127, 128, 129] {
            assert!(!bs.test(idx));
            bs.set(idx);
            assert!(bs.test(idx));
        }
        assert!(!bs.test(2));
        assert!(!bs.test(126));
    }
}
