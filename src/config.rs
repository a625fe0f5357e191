use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{BasketError, Result};

pub const DEFAULT_DATA_DIR: &str = "./dataset";
pub const DATA_DIR_ENV: &str = "BASKET_DATA_DIR";

/// Validated mining thresholds. Both values lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub min_support: f64,
    pub min_confidence: f64,
}

impl Thresholds {
    pub fn new(min_support: f64, min_confidence: f64) -> Result<Self> {
        Ok(Self {
            min_support: check_unit("min_support", min_support)?,
            min_confidence: check_unit("min_confidence", min_confidence)?,
        })
    }
}

/// Rejects values outside `[0, 1]`. NaN fails the range test too.
pub fn check_unit(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(BasketError::InvalidThreshold { name, value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}', expected text or json")),
        }
    }
}

/// Flag value wins, then `BASKET_DATA_DIR`, then `./dataset`.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_accept_bounds() {
        let t = Thresholds::new(0.0, 1.0).unwrap();
        assert_eq!(t.min_support, 0.0);
        assert_eq!(t.min_confidence, 1.0);
    }

    #[test]
    fn test_thresholds_reject_out_of_range() {
        let err = Thresholds::new(1.5, 0.5).unwrap_err();
        assert!(matches!(
            err,
            BasketError::InvalidThreshold { name: "min_support", .. }
        ));

        let err = Thresholds::new(0.5, -0.1).unwrap_err();
        assert!(matches!(
            err,
            BasketError::InvalidThreshold { name: "min_confidence", .. }
        ));
    }

    #[test]
    fn test_thresholds_reject_nan() {
        assert!(Thresholds::new(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("TEXT".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_flag_overrides_data_dir() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/data")));
        assert_eq!(dir, PathBuf::from("/tmp/data"));
    }
}
