use std::time::{Duration, Instant};

use ndarray::ArrayView2;
use serde::Serialize;
use tracing::{info, warn};

use crate::brute::{self, AssociationRule, FrequentItemsets, Itemset, RuleStats};
use crate::config::Thresholds;
use crate::error::Result;
use crate::store::TransactionStore;

/// An alternative itemset/rule engine fed the one-hot representation.
pub trait ReferenceMiner {
    fn name(&self) -> &'static str;

    fn frequent_itemsets(
        &self,
        one_hot: ArrayView2<i32>,
        min_support: f64,
    ) -> Result<Vec<(Itemset, f64)>>;

    fn association_rules(
        &self,
        itemsets: &[(Itemset, f64)],
        min_confidence: f64,
    ) -> Result<Vec<AssociationRule>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Timing {
    #[serde(rename = "frequent_itemsets_secs", serialize_with = "as_secs")]
    pub itemsets: Duration,
    #[serde(rename = "association_rules_secs", serialize_with = "as_secs")]
    pub rules: Duration,
}

impl Timing {
    pub fn total(&self) -> Duration {
        self.itemsets + self.rules
    }
}

fn as_secs<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

#[derive(Debug, Clone)]
pub struct BruteForceRun {
    pub itemsets: FrequentItemsets,
    pub rules: Vec<AssociationRule>,
    pub stats: RuleStats,
    pub timing: Timing,
}

#[derive(Debug, Clone)]
pub struct ReferenceRun {
    pub engine: &'static str,
    pub itemsets: Vec<(Itemset, f64)>,
    pub rules: Vec<AssociationRule>,
    pub timing: Timing,
}

/// Which engine finished first, by total time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Speedup {
    BruteForce(f64),
    Reference(f64),
    /// One side measured zero elapsed time.
    Unmeasurable,
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub thresholds: Thresholds,
    pub num_transactions: usize,
    pub brute: BruteForceRun,
    /// `Err` holds the reference engine's failure; the brute-force side is unaffected.
    pub reference: std::result::Result<ReferenceRun, String>,
}

impl Comparison {
    pub fn speedup(&self) -> Option<Speedup> {
        let reference = self.reference.as_ref().ok()?;
        let brute = self.brute.timing.total().as_secs_f64();
        let other = reference.timing.total().as_secs_f64();

        Some(if brute <= 0.0 || other <= 0.0 {
            Speedup::Unmeasurable
        } else if brute < other {
            Speedup::BruteForce(other / brute)
        } else {
            Speedup::Reference(brute / other)
        })
    }

    /// Same number of itemsets and of rules on both sides.
    pub fn counts_match(&self) -> Option<bool> {
        let reference = self.reference.as_ref().ok()?;
        Some(
            self.brute.itemsets.len() == reference.itemsets.len()
                && self.brute.rules.len() == reference.rules.len(),
        )
    }
}

/// Runs the brute-force miner and rule generator on `store`, timing each phase.
pub fn run_brute_force(store: &TransactionStore, thresholds: Thresholds) -> Result<BruteForceRun> {
    let start = Instant::now();
    let itemsets = brute::mine(store.transactions(), thresholds.min_support)?;
    let itemsets_time = start.elapsed();

    let start = Instant::now();
    let (rules, stats) = brute::generate_rules_with_stats(&itemsets, thresholds.min_confidence)?;
    let rules_time = start.elapsed();

    Ok(BruteForceRun {
        itemsets,
        rules,
        stats,
        timing: Timing {
            itemsets: itemsets_time,
            rules: rules_time,
        },
    })
}

pub fn run_reference<R: ReferenceMiner + ?Sized>(
    engine: &R,
    one_hot: ArrayView2<i32>,
    thresholds: Thresholds,
) -> Result<ReferenceRun> {
    let start = Instant::now();
    let itemsets = engine.frequent_itemsets(one_hot, thresholds.min_support)?;
    let itemsets_time = start.elapsed();

    let start = Instant::now();
    let rules = engine.association_rules(&itemsets, thresholds.min_confidence)?;
    let rules_time = start.elapsed();

    Ok(ReferenceRun {
        engine: engine.name(),
        itemsets,
        rules,
        timing: Timing {
            itemsets: itemsets_time,
            rules: rules_time,
        },
    })
}

/// Brute force first, then the reference engine over the one-hot encoding.
/// Only brute-force errors abort the comparison.
pub fn compare<R: ReferenceMiner + ?Sized>(
    store: &TransactionStore,
    thresholds: Thresholds,
    engine: &R,
) -> Result<Comparison> {
    let brute = run_brute_force(store, thresholds)?;
    info!(
        itemsets = brute.itemsets.len(),
        rules = brute.rules.len(),
        elapsed = ?brute.timing.total(),
        "brute force finished"
    );

    let one_hot = store.one_hot();
    let reference = match run_reference(engine, one_hot.view(), thresholds) {
        Ok(run) => {
            info!(
                engine = run.engine,
                itemsets = run.itemsets.len(),
                rules = run.rules.len(),
                elapsed = ?run.timing.total(),
                "reference finished"
            );
            Ok(run)
        }
        Err(error) => {
            warn!(engine = engine.name(), %error, "reference engine failed");
            Err(error.to_string())
        }
    };

    Ok(Comparison {
        thresholds,
        num_transactions: store.len(),
        brute,
        reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BasketError;
    use crate::fp::FpGrowth;

    struct Failing;

    impl ReferenceMiner for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn frequent_itemsets(&self, _: ArrayView2<i32>, min_support: f64) -> Result<Vec<(Itemset, f64)>> {
            Err(BasketError::NoFrequentItemsets { min_support })
        }

        fn association_rules(&self, _: &[(Itemset, f64)], _: f64) -> Result<Vec<AssociationRule>> {
            Ok(Vec::new())
        }
    }

    fn store() -> TransactionStore {
        TransactionStore::from_names(
            ["A", "B", "C"],
            vec![vec!["A", "B"], vec!["A", "B", "C"], vec!["A"], vec!["B", "C"]],
        )
    }

    #[test]
    fn test_compare_against_fp_growth() {
        let thresholds = Thresholds::new(0.5, 0.66).unwrap();
        let comparison = compare(&store(), thresholds, &FpGrowth).unwrap();

        assert_eq!(comparison.brute.itemsets.len(), 5);
        assert_eq!(comparison.brute.rules.len(), 4);
        assert_eq!(comparison.counts_match(), Some(true));
        assert!(comparison.speedup().is_some());
        assert_eq!(comparison.num_transactions, 4);
    }

    #[test]
    fn test_reference_failure_keeps_brute_force() {
        let thresholds = Thresholds::new(0.5, 0.5).unwrap();
        let comparison = compare(&store(), thresholds, &Failing).unwrap();

        assert_eq!(comparison.brute.itemsets.len(), 5);
        assert!(comparison.reference.is_err());
        assert_eq!(comparison.counts_match(), None);
        assert_eq!(comparison.speedup(), None);
    }

    #[test]
    fn test_brute_force_errors_abort() {
        let thresholds = Thresholds::new(0.5, 0.5).unwrap();
        let err = compare(&TransactionStore::new(), thresholds, &FpGrowth).unwrap_err();
        assert!(matches!(err, BasketError::EmptyTransactionSet));
    }
}
