/// Persistent per-atom selection, one bit per atom tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    words: Vec<u32>,
    len: usize,
}

impl Selection {
    /// Empty selection over `len` atoms.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(32)],
            len,
        }
    }

    /// Flip the bit for `tag`. Returns the new state, or `None` if `tag`
    /// is out of range.
    pub fn toggle(&mut self, tag: u32) -> Option<bool> {
        let (word, bit) = self.locate(tag)?;
        self.words[word] ^= bit;
        Some(self.words[word] & bit != 0)
    }

    /// Whether `tag` is selected.
    pub fn contains(&self, tag: u32) -> bool {
        self.locate(tag)
            .is_some_and(|(word, bit)| self.words[word] & bit != 0)
    }

    /// Deselect everything. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        let any = self.words.iter().any(|&w| w != 0);
        self.words.fill(0);
        any
    }

    /// Number of selected atoms.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Selected tags in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len as u32).filter(|&tag| self.contains(tag))
    }

    fn locate(&self, tag: u32) -> Option<(usize, u32)> {
        let tag = tag as usize;
        (tag < self.len).then(|| (tag / 32, 1u32 << (tag % 32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_one_bit() {
        let mut s = Selection::new(40);
        assert_eq!(s.toggle(33), Some(true));
        assert!(s.contains(33));
        assert!(!s.contains(32));
        assert!(!s.contains(1));
        assert_eq!(s.count(), 1);
        assert_eq!(s.toggle(33), Some(false));
        assert_eq!(s.count(), 0);
    }

    #[test]
    fn out_of_range_tags_are_ignored() {
        let mut s = Selection::new(3);
        assert_eq!(s.toggle(3), None);
        assert!(!s.contains(100));
    }

    #[test]
    fn clear_reports_change() {
        let mut s = Selection::new(8);
        assert!(!s.clear());
        let _ = s.toggle(2);
        let _ = s.toggle(5);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![2, 5]);
        assert!(s.clear());
        assert_eq!(s.count(), 0);
    }
}
