//! Frequent itemset and association rule mining by exhaustive enumeration,
//! with an FP-growth reference engine to compare against.

pub mod brute;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fp;
pub mod harness;
pub mod report;
pub mod store;

#[cfg(feature = "python")]
mod python;

pub use brute::{
    generate_rules, mine, support, AssociationRule, FrequentItemsets, Item, Itemset, Transaction,
};
pub use config::Thresholds;
pub use error::{BasketError, Result};
pub use harness::{compare, Comparison, ReferenceMiner};
pub use store::TransactionStore;
