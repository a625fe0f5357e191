use std::collections::HashMap;

use crate::brute::combinations::{for_each_combination, select};
use crate::brute::{AssociationRule, Itemset};
use crate::config::check_unit;
use crate::error::{BasketError, Result};

/// Confidence-filtered rules over a list of itemsets with supports.
///
/// Every antecedent and consequent must have a support in `itemsets`; a
/// missing one is an error rather than a skipped split.
pub fn association_rules(
    itemsets: &[(Itemset, f64)],
    min_confidence: f64,
) -> Result<Vec<AssociationRule>> {
    let min_confidence = check_unit("min_confidence", min_confidence)?;
    let supports: HashMap<&Itemset, f64> = itemsets
        .iter()
        .map(|(itemset, support)| (itemset, *support))
        .collect();

    let lookup = |role: &'static str, itemset: &Itemset| -> Result<f64> {
        supports
            .get(itemset)
            .copied()
            .ok_or_else(|| BasketError::MissingSupport {
                role,
                itemset: itemset.items().to_vec(),
            })
    };

    let mut rules = Vec::new();
    for (itemset, support) in itemsets.iter().filter(|(s, _)| s.len() >= 2) {
        let items = itemset.items();
        let mut splits = Vec::new();
        for antecedent_size in 1..items.len() {
            for_each_combination(items.len(), antecedent_size, &mut |indices: &[usize]| {
                splits.push(Itemset::new(select(items, indices)));
            });
        }

        for antecedent in splits {
            let consequent = itemset.difference(&antecedent);
            let antecedent_support = lookup("antecedent", &antecedent)?;
            lookup("consequent", &consequent)?;

            let confidence = support / antecedent_support;
            if confidence >= min_confidence {
                rules.push(AssociationRule {
                    antecedent,
                    consequent,
                    support: *support,
                    confidence,
                });
            }
        }
    }
    Ok(rules)
}
