pub mod builder;
pub mod growth;
pub mod rules;
pub mod storage;
pub mod tree;

use ndarray::ArrayView2;

use crate::brute::support::fraction;
use crate::brute::{AssociationRule, Itemset};
use crate::error::{BasketError, Result};
use crate::harness::ReferenceMiner;

pub use growth::fp_growth;
pub use rules::association_rules;
pub use storage::{FrequentLevel, ItemsetStorage};
pub use tree::{FpNode, FpTree};

/// FP-growth plus library-style rule derivation, used as the reference
/// engine in comparisons.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpGrowth;

impl ReferenceMiner for FpGrowth {
    fn name(&self) -> &'static str {
        "FP-Growth"
    }

    fn frequent_itemsets(
        &self,
        one_hot: ArrayView2<i32>,
        min_support: f64,
    ) -> Result<Vec<(Itemset, f64)>> {
        if min_support <= 0.0 {
            return Err(BasketError::NonPositiveSupport { min_support });
        }
        let levels = fp_growth(one_hot, min_support)?;
        let itemsets = flatten_levels(&levels, one_hot.nrows());
        if itemsets.is_empty() {
            return Err(BasketError::NoFrequentItemsets { min_support });
        }
        Ok(itemsets)
    }

    fn association_rules(
        &self,
        itemsets: &[(Itemset, f64)],
        min_confidence: f64,
    ) -> Result<Vec<AssociationRule>> {
        association_rules(itemsets, min_confidence)
    }
}

/// Itemsets with fractional supports, smallest itemsets first.
pub fn flatten_levels(levels: &[FrequentLevel], num_transactions: usize) -> Vec<(Itemset, f64)> {
    levels
        .iter()
        .flat_map(|level| level.iter_itemsets())
        .map(|(items, count)| {
            (
                Itemset::new(items.to_vec()),
                fraction(count, num_transactions),
            )
        })
        .collect()
}
