pub mod combinations;
pub mod itemset;
pub mod mining;
pub mod rules;
pub mod support;

pub use itemset::{Item, Itemset, Transaction};
pub use mining::{mine, universe, FrequentItemsets};
pub use rules::{generate_rules, generate_rules_with_stats, AssociationRule, RuleStats};
pub use support::{support, support_count};
