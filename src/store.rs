use std::collections::HashMap;

use ndarray::{Array2, ArrayView2};
use tracing::warn;

use crate::brute::{Item, Itemset, Transaction};

/// Item catalogue plus the transactions that reference it.
///
/// Identifiers are dense: the catalogue's items come first, in file order,
/// followed by any names that only appear inside transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    names: Vec<String>,
    index: HashMap<String, Item>,
    catalogue_len: usize,
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a catalogue of item names and transactions of names.
    pub fn from_names<S, T>(catalogue: impl IntoIterator<Item = S>, transactions: T) -> Self
    where
        S: AsRef<str>,
        T: IntoIterator,
        T::Item: IntoIterator,
        <T::Item as IntoIterator>::Item: AsRef<str>,
    {
        let mut store = Self::new();
        for name in catalogue {
            store.intern(name.as_ref());
        }
        store.catalogue_len = store.names.len();
        for names in transactions {
            store.push_named(names);
        }
        store
    }

    /// Returns the identifier for `name`, registering it if unseen.
    pub fn intern(&mut self, name: &str) -> Item {
        if let Some(&item) = self.index.get(name) {
            return item;
        }
        let item = self.names.len();
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), item);
        item
    }

    pub fn push_named<I>(&mut self, names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut items = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if !self.index.contains_key(name) && self.catalogue_len > 0 {
                warn!(item = name, "transaction references an item missing from the catalogue");
            }
            items.push(self.intern(name));
        }
        self.transactions.push(Transaction::new(items));
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Number of known items, catalogue and extras.
    pub fn num_items(&self) -> usize {
        self.names.len()
    }

    pub fn catalogue_len(&self) -> usize {
        self.catalogue_len
    }

    pub fn name(&self, item: Item) -> Option<&str> {
        self.names.get(item).map(String::as_str)
    }

    pub fn item(&self, name: &str) -> Option<Item> {
        self.index.get(name).copied()
    }

    /// Member names of `itemset`, sorted.
    pub fn names_of(&self, itemset: &Itemset) -> Vec<&str> {
        let mut names: Vec<&str> = itemset
            .items()
            .iter()
            .map(|&item| self.name(item).unwrap_or("?"))
            .collect();
        names.sort_unstable();
        names
    }

    /// `{a, b, c}` with member names sorted.
    pub fn format_itemset(&self, itemset: &Itemset) -> String {
        format!("{{{}}}", self.names_of(itemset).join(", "))
    }

    /// Rows are transactions, columns are item identifiers, 1 marks presence.
    pub fn one_hot(&self) -> Array2<i32> {
        let mut matrix = Array2::<i32>::zeros((self.transactions.len(), self.names.len()));
        for (row, transaction) in self.transactions.iter().enumerate() {
            for &item in transaction.items() {
                matrix[[row, item]] = 1;
            }
        }
        matrix
    }
}

/// Reads transactions back out of a one-hot matrix; any non-zero cell is a member.
pub fn transactions_from_one_hot(matrix: ArrayView2<i32>) -> Vec<Transaction> {
    matrix
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, &cell)| cell != 0)
                .map(|(item, _)| item)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TransactionStore {
        TransactionStore::from_names(
            ["Milk", "Bread", "Eggs"],
            vec![
                vec!["Milk", "Bread"],
                vec!["Bread", " Eggs ", "Bread"],
                vec!["Jam"],
            ],
        )
    }

    #[test]
    fn test_catalogue_ids_come_first() {
        let store = store();
        assert_eq!(store.item("Milk"), Some(0));
        assert_eq!(store.item("Eggs"), Some(2));
        assert_eq!(store.item("Jam"), Some(3));
        assert_eq!(store.catalogue_len(), 3);
        assert_eq!(store.num_items(), 4);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_transactions_are_trimmed_and_deduped() {
        let store = store();
        assert_eq!(store.transactions()[1].items(), &[1, 2]);
    }

    #[test]
    fn test_format_itemset_sorts_names() {
        let store = store();
        let itemset = Itemset::new(vec![2, 0, 1]);
        assert_eq!(store.format_itemset(&itemset), "{Bread, Eggs, Milk}");
    }

    #[test]
    fn test_one_hot_round_trip() {
        let store = store();
        let matrix = store.one_hot();

        assert_eq!(matrix.shape(), &[3, 4]);
        assert_eq!(matrix[[0, 0]], 1);
        assert_eq!(matrix[[0, 2]], 0);
        assert_eq!(matrix[[2, 3]], 1);
        assert_eq!(transactions_from_one_hot(matrix.view()), store.transactions());
    }
}
