use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by mining, loading and comparison.
#[derive(Error, Debug)]
pub enum BasketError {
    // === Mining ===
    /// A support or confidence threshold outside `[0, 1]` (or NaN).
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// Support is undefined over zero transactions.
    #[error("cannot compute support over an empty transaction set")]
    EmptyTransactionSet,

    // === Reference engine ===
    /// The reference engine found nothing to derive rules from.
    #[error("no frequent itemsets at min_support={min_support}")]
    NoFrequentItemsets { min_support: f64 },

    /// FP-growth needs a positive support; zero would admit every absent itemset.
    #[error("FP-growth requires min_support > 0, got {min_support}")]
    NonPositiveSupport { min_support: f64 },

    /// A rule split referenced an itemset whose support was never mined.
    #[error("missing support for {role} {itemset:?}")]
    MissingSupport {
        role: &'static str,
        itemset: Vec<usize>,
    },

    // === Datasets ===
    /// Dataset selection outside the catalogue.
    #[error("unknown dataset '{choice}', expected a number between 1 and 5")]
    UnknownDataset { choice: String },

    /// A dataset file that should exist does not.
    #[error("cannot find data file '{path}'")]
    MissingDataFile { path: PathBuf },

    /// A CSV file lacks a required header.
    #[error("'{path}' has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A data row too short to reach a required column.
    #[error("'{path}' row {row} has no '{column}' field")]
    MalformedRow {
        path: PathBuf,
        row: usize,
        column: &'static str,
    },

    // === I/O ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BasketError>;

impl BasketError {
    /// True for failures caused by bad user input rather than the environment.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidThreshold { .. } | Self::UnknownDataset { .. }
        )
    }
}
