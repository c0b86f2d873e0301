use foundation::ids::RegionId;

/// Deterministic region selection backed by a bitset.
///
/// Membership is tracked by `RegionId::index()`.
///
/// Ordering contract:
/// - Iteration yields regions in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    words: Vec<u64>,
    len: usize,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, region: RegionId) -> bool {
        let (word, bit) = word_bit(region.index());
        self.words
            .get(word)
            .is_some_and(|w| (w & (1u64 << bit)) != 0)
    }

    /// True when any of `regions` is selected.
    pub fn contains_any(&self, regions: &[RegionId]) -> bool {
        regions.iter().any(|r| self.contains(*r))
    }

    /// Inserts `region` into the set.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, region: RegionId) -> bool {
        self.ensure_capacity(region.index());
        let (word, bit) = word_bit(region.index());
        let mask = 1u64 << bit;
        let w = &mut self.words[word];
        if (*w & mask) != 0 {
            return false;
        }
        *w |= mask;
        self.len += 1;
        true
    }

    /// Removes `region` from the set.
    ///
    /// Returns `true` if the set changed.
    pub fn remove(&mut self, region: RegionId) -> bool {
        let (word, bit) = word_bit(region.index());
        let Some(w) = self.words.get_mut(word) else {
            return false;
        };
        let mask = 1u64 << bit;
        if (*w & mask) == 0 {
            return false;
        }
        *w &= !mask;
        self.len -= 1;
        true
    }

    /// Adds `region` if absent, removes it if present.
    ///
    /// Returns `true` if the region is selected afterwards.
    pub fn toggle(&mut self, region: RegionId) -> bool {
        if self.remove(region) {
            false
        } else {
            self.insert(region)
        }
    }

    /// Iterates selected regions in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = RegionId> + '_ {
        SelectionIndexIter {
            words: &self.words,
            word_index: 0,
            current_word: 0,
            base_index: 0,
        }
        .map(RegionId)
    }

    fn ensure_capacity(&mut self, index: u32) {
        let (word, _bit) = word_bit(index);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
    }
}

impl FromIterator<RegionId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = RegionId>>(iter: I) -> Self {
        let mut s = SelectionSet::new();
        for r in iter {
            s.insert(r);
        }
        s
    }
}

fn word_bit(index: u32) -> (usize, u32) {
    let word = (index / 64) as usize;
    let bit = index % 64;
    (word, bit)
}

struct SelectionIndexIter<'a> {
    words: &'a [u64],
    word_index: usize,
    current_word: u64,
    base_index: u32,
}

impl Iterator for SelectionIndexIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let tz = self.current_word.trailing_zeros();
                self.current_word &= !(1u64 << tz);
                return Some(self.base_index + tz);
            }

            let w = *self.words.get(self.word_index)?;
            self.current_word = w;
            self.base_index = (self.word_index as u32) * 64;
            self.word_index += 1;
        }
    }
}
