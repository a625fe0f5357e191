use serde::Serialize;
use tracing::{debug, trace};

use super::combinations::{for_each_combination, select};
use super::itemset::Itemset;
use super::mining::FrequentItemsets;
use crate::config::check_unit;
use crate::error::Result;

/// `antecedent => consequent`, split from one frequent itemset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationRule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    /// Support of `antecedent ∪ consequent`.
    pub support: f64,
    pub confidence: f64,
}

impl AssociationRule {
    pub fn itemset(&self) -> Itemset {
        self.antecedent.union(&self.consequent)
    }
}

/// Tally of how every candidate split was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RuleStats {
    pub candidate_splits: usize,
    pub unknown_antecedent: usize,
    pub below_confidence: usize,
    pub unknown_consequent: usize,
    pub emitted: usize,
}

enum Split {
    Emit(AssociationRule),
    Empty,
    UnknownAntecedent,
    BelowConfidence,
    UnknownConsequent,
}

pub fn generate_rules(
    frequent: &FrequentItemsets,
    min_confidence: f64,
) -> Result<Vec<AssociationRule>> {
    generate_rules_with_stats(frequent, min_confidence).map(|(rules, _)| rules)
}

/// Every antecedent/consequent split of every frequent itemset of size 2 or
/// more, kept when its confidence reaches `min_confidence`.
///
/// Supports are looked up in `frequent`, never recounted. Splits whose
/// antecedent or consequent is missing from the table are skipped.
pub fn generate_rules_with_stats(
    frequent: &FrequentItemsets,
    min_confidence: f64,
) -> Result<(Vec<AssociationRule>, RuleStats)> {
    let min_confidence = check_unit("min_confidence", min_confidence)?;

    let mut sources: Vec<(&Itemset, f64)> = frequent
        .iter()
        .filter(|(itemset, _)| itemset.len() >= 2)
        .collect();
    sources.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut rules = Vec::new();
    let mut stats = RuleStats::default();

    for (itemset, support) in sources {
        let items = itemset.items();
        for antecedent_size in 1..items.len() {
            for_each_combination(items.len(), antecedent_size, &mut |indices: &[usize]| {
                stats.candidate_splits += 1;
                let antecedent = Itemset::new(select(items, indices));
                match evaluate_split(frequent, itemset, support, antecedent, min_confidence) {
                    Split::Emit(rule) => {
                        stats.emitted += 1;
                        rules.push(rule);
                    }
                    Split::Empty => {}
                    Split::UnknownAntecedent => stats.unknown_antecedent += 1,
                    Split::BelowConfidence => stats.below_confidence += 1,
                    Split::UnknownConsequent => stats.unknown_consequent += 1,
                }
            });
        }
    }

    debug!(
        candidates = stats.candidate_splits,
        emitted = stats.emitted,
        unknown_antecedent = stats.unknown_antecedent,
        unknown_consequent = stats.unknown_consequent,
        min_confidence,
        "generated rules"
    );
    Ok((rules, stats))
}

fn evaluate_split(
    frequent: &FrequentItemsets,
    itemset: &Itemset,
    support: f64,
    antecedent: Itemset,
    min_confidence: f64,
) -> Split {
    let consequent = itemset.difference(&antecedent);
    if antecedent.is_empty() || consequent.is_empty() {
        return Split::Empty;
    }

    let antecedent_support = match frequent.support(&antecedent) {
        Some(s) if s > 0.0 => s,
        _ => {
            trace!(%antecedent, %itemset, "antecedent not frequent");
            return Split::UnknownAntecedent;
        }
    };

    let confidence = support / antecedent_support;
    if confidence < min_confidence {
        return Split::BelowConfidence;
    }

    match frequent.support(&consequent) {
        Some(s) if s > 0.0 => {}
        _ => {
            trace!(%consequent, %itemset, "consequent not frequent");
            return Split::UnknownConsequent;
        }
    }

    Split::Emit(AssociationRule {
        antecedent,
        consequent,
        support,
        confidence,
    })
}
