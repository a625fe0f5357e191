use super::itemset::{Itemset, Transaction};
use crate::error::{BasketError, Result};

/// Number of transactions that contain every member of `itemset`.
pub fn support_count(itemset: &Itemset, transactions: &[Transaction]) -> usize {
    transactions
        .iter()
        .filter(|transaction| transaction.contains_all(itemset))
        .count()
}

/// Fraction of `transactions` containing `itemset`.
pub fn support(itemset: &Itemset, transactions: &[Transaction]) -> Result<f64> {
    if transactions.is_empty() {
        return Err(BasketError::EmptyTransactionSet);
    }
    Ok(fraction(support_count(itemset, transactions), transactions.len()))
}

#[inline]
pub fn fraction(count: usize, total: usize) -> f64 {
    count as f64 / total as f64
}
