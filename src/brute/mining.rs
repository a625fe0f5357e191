use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use super::combinations::{binomial, for_each_combination, select};
use super::itemset::{Item, Itemset, Transaction};
use super::support::{fraction, support_count};
use crate::config::check_unit;
use crate::error::{BasketError, Result};

/// Itemsets whose support met the mining threshold, keyed canonically.
///
/// Equality ignores insertion order, so two runs over the same input compare
/// equal regardless of how the levels were traversed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequentItemsets {
    table: HashMap<Itemset, f64>,
    num_transactions: usize,
    max_size: usize,
}

impl FrequentItemsets {
    pub fn new(num_transactions: usize) -> Self {
        Self {
            table: HashMap::new(),
            num_transactions,
            max_size: 0,
        }
    }

    pub fn insert(&mut self, itemset: Itemset, support: f64) {
        self.max_size = self.max_size.max(itemset.len());
        self.table.insert(itemset, support);
    }

    pub fn support(&self, itemset: &Itemset) -> Option<f64> {
        self.table.get(itemset).copied()
    }

    pub fn contains(&self, itemset: &Itemset) -> bool {
        self.table.contains_key(itemset)
    }

    /// Absolute transaction count behind a stored support.
    pub fn count(&self, itemset: &Itemset) -> Option<usize> {
        self.support(itemset)
            .map(|support| (support * self.num_transactions as f64).round() as usize)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn num_transactions(&self) -> usize {
        self.num_transactions
    }

    /// Size of the largest stored itemset, 0 when empty.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Itemset, f64)> {
        self.table.iter().map(|(itemset, &support)| (itemset, support))
    }

    /// Itemsets of exactly `size` items.
    pub fn level(&self, size: usize) -> impl Iterator<Item = (&Itemset, f64)> {
        self.iter().filter(move |(itemset, _)| itemset.len() == size)
    }
}

/// Distinct items across all transactions, ascending.
pub fn universe(transactions: &[Transaction]) -> Vec<Item> {
    transactions
        .iter()
        .flat_map(|transaction| transaction.items().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Exhaustive level-wise mining.
///
/// Every k-combination of the universe is counted at every level; a level
/// only decides whether to continue (at least one frequent candidate), it
/// never narrows the next level's candidates.
pub fn mine(transactions: &[Transaction], min_support: f64) -> Result<FrequentItemsets> {
    let min_support = check_unit("min_support", min_support)?;
    if transactions.is_empty() {
        return Err(BasketError::EmptyTransactionSet);
    }

    let total = transactions.len();
    let items = universe(transactions);
    let mut frequent = FrequentItemsets::new(total);

    let mut k = 1;
    loop {
        let mut level_frequent = 0usize;

        for_each_combination(items.len(), k, &mut |indices: &[usize]| {
            let candidate = Itemset::new(select(&items, indices));
            let support = fraction(support_count(&candidate, transactions), total);
            if support >= min_support {
                frequent.insert(candidate, support);
                level_frequent += 1;
            }
        });

        debug!(
            k,
            candidates = binomial(items.len(), k),
            frequent = level_frequent,
            "mined level"
        );

        if level_frequent == 0 {
            break;
        }
        k += 1;
    }

    info!(
        transactions = total,
        universe = items.len(),
        itemsets = frequent.len(),
        min_support,
        "brute-force mining finished"
    );
    Ok(frequent)
}
