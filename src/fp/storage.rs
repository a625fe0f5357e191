use crate::brute::Item;

/// Flat storage for itemsets of one size: items packed back to back, with
/// an `(offset, len)` and an absolute count per itemset.
#[derive(Debug, Clone, Default)]
pub struct ItemsetStorage {
    items: Vec<Item>,
    offsets: Vec<(usize, usize)>,
    counts: Vec<usize>,
}

/// Frequent itemsets of a single size.
#[derive(Debug, Clone)]
pub struct FrequentLevel {
    storage: ItemsetStorage,
    pub itemset_size: usize,
}

impl ItemsetStorage {
    pub fn add_itemset(&mut self, mut items: Vec<Item>, count: usize) -> usize {
        items.sort_unstable();
        items.dedup();

        let start = self.items.len();
        self.items.extend_from_slice(&items);
        self.offsets.push((start, items.len()));
        self.counts.push(count);
        self.offsets.len() - 1
    }

    pub fn get_itemset(&self, idx: usize) -> &[Item] {
        let (start, len) = self.offsets[idx];
        &self.items[start..start + len]
    }

    pub fn count(&self, idx: usize) -> usize {
        self.counts[idx]
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    fn append(&mut self, other: &ItemsetStorage) {
        let shift = self.items.len();
        self.items.extend_from_slice(&other.items);
        self.offsets
            .extend(other.offsets.iter().map(|&(start, len)| (start + shift, len)));
        self.counts.extend_from_slice(&other.counts);
    }
}

impl FrequentLevel {
    pub fn new(itemset_size: usize) -> Self {
        Self {
            storage: ItemsetStorage::default(),
            itemset_size,
        }
    }

    pub fn add_itemset(&mut self, items: Vec<Item>, count: usize) -> usize {
        debug_assert_eq!(items.len(), self.itemset_size);
        self.storage.add_itemset(items, count)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn get_itemset(&self, idx: usize) -> &[Item] {
        self.storage.get_itemset(idx)
    }

    pub fn count(&self, idx: usize) -> usize {
        self.storage.count(idx)
    }

    pub fn iter_itemsets(&self) -> impl Iterator<Item = (&[Item], usize)> {
        (0..self.storage.len()).map(move |idx| (self.get_itemset(idx), self.count(idx)))
    }
}

/// Records `pattern` in the level matching its size, growing `levels` as needed.
pub fn add_pattern(levels: &mut Vec<FrequentLevel>, pattern: Vec<Item>, count: usize) {
    let size = pattern.len();
    if size == 0 {
        return;
    }
    while levels.len() < size {
        levels.push(FrequentLevel::new(levels.len() + 1));
    }
    levels[size - 1].add_itemset(pattern, count);
}

/// Appends every level of `from` onto the same-sized level of `into`.
pub fn merge_levels(into: &mut Vec<FrequentLevel>, from: &[FrequentLevel]) {
    for level in from {
        let size = level.itemset_size;
        while into.len() < size {
            into.push(FrequentLevel::new(into.len() + 1));
        }
        into[size - 1].storage.append(&level.storage);
    }
}
