use std::fmt;

use serde::Serialize;

/// Opaque item identifier. Names live in the [`TransactionStore`](crate::store::TransactionStore).
pub type Item = usize;

/// A set of items in canonical (sorted, de-duplicated) form, so equal
/// sets compare and hash equal whatever order they were built in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Itemset(Vec<Item>);

impl Itemset {
    pub fn new(mut items: Vec<Item>) -> Self {
        items.sort_unstable();
        items.dedup();
        Self(items)
    }

    pub fn items(&self) -> &[Item] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, item: Item) -> bool {
        self.0.binary_search(&item).is_ok()
    }

    pub fn is_subset_of(&self, other: &Itemset) -> bool {
        is_sorted_subset(&self.0, &other.0)
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(&self, other: &Itemset) -> Itemset {
        Itemset(
            self.0
                .iter()
                .copied()
                .filter(|&item| !other.contains(item))
                .collect(),
        )
    }

    pub fn union(&self, other: &Itemset) -> Itemset {
        let mut items = self.0.clone();
        items.extend_from_slice(&other.0);
        Itemset::new(items)
    }

    pub fn is_disjoint(&self, other: &Itemset) -> bool {
        self.0.iter().all(|&item| !other.contains(item))
    }

    pub fn into_vec(self) -> Vec<Item> {
        self.0
    }
}

impl FromIterator<Item> for Itemset {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Itemset::new(iter.into_iter().collect())
    }
}

impl From<Vec<Item>> for Itemset {
    fn from(items: Vec<Item>) -> Self {
        Itemset::new(items)
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "}}")
    }
}

/// One basket. Items appear at most once; the set is fixed after loading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transaction {
    items: Vec<Item>,
}

impl Transaction {
    pub fn new(mut items: Vec<Item>) -> Self {
        items.sort_unstable();
        items.dedup();
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_all(&self, itemset: &Itemset) -> bool {
        is_sorted_subset(itemset.items(), &self.items)
    }
}

impl FromIterator<Item> for Transaction {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Transaction::new(iter.into_iter().collect())
    }
}

/// Merge walk over two sorted slices.
fn is_sorted_subset(needle: &[Item], haystack: &[Item]) -> bool {
    if needle.len() > haystack.len() {
        return false;
    }
    let mut rest = haystack.iter();
    'outer: for item in needle {
        for candidate in rest.by_ref() {
            if candidate == item {
                continue 'outer;
            }
            if candidate > item {
                return false;
            }
        }
        return false;
    }
    true
}
