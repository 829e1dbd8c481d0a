use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::ticker::Ticker;
use crate::notice::Notice;
use crate::{CoreError, ValidationError};

/// Tolerance on the weight sum before a warning is raised.
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// A named set of ticker weights.
///
/// Weights are decimal fractions and are not required to sum exactly to
/// 1.0; a sum outside the tolerance produces an advisory notice, not an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    name: String,
    holdings: BTreeMap<Ticker, f64>,
}

impl Portfolio {
    pub fn new(
        name: impl Into<String>,
        holdings: BTreeMap<Ticker, f64>,
    ) -> Result<Self, ValidationError> {
        for (ticker, weight) in &holdings {
            if !weight.is_finite() {
                return Err(ValidationError::NonFiniteWeight {
                    ticker: ticker.to_string(),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            holdings,
        })
    }

    /// Equal-weight portfolio over the given tickers.
    pub fn equal_weighted(
        name: impl Into<String>,
        tickers: Vec<Ticker>,
    ) -> Result<Self, ValidationError> {
        if tickers.is_empty() {
            return Err(ValidationError::EmptyHoldings);
        }

        let weight = 1.0 / tickers.len() as f64;
        let holdings = tickers.into_iter().map(|t| (t, weight)).collect();
        Self::new(name, holdings)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn holdings(&self) -> &BTreeMap<Ticker, f64> {
        &self.holdings
    }

    pub fn tickers(&self) -> Vec<Ticker> {
        self.holdings.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn weight_sum(&self) -> f64 {
        self.holdings.values().sum()
    }

    /// Advisory notice when the weight sum drifts outside the tolerance.
    pub fn weight_notice(&self) -> Option<Notice> {
        if self.holdings.is_empty() {
            return None;
        }

        let total = self.weight_sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Some(Notice::new(
                "portfolio.weight_sum",
                format!(
                    "portfolio '{}' weights sum to {total:.4}, not 1.0; consider normalizing",
                    self.name
                ),
            ));
        }
        None
    }

    pub fn set_weight(&mut self, ticker: Ticker, weight: f64) -> Result<(), ValidationError> {
        if !weight.is_finite() {
            return Err(ValidationError::NonFiniteWeight {
                ticker: ticker.to_string(),
            });
        }
        self.holdings.insert(ticker, weight);
        Ok(())
    }

    pub fn remove(&mut self, ticker: &Ticker) -> Result<(), ValidationError> {
        self.holdings
            .remove(ticker)
            .map(|_| ())
            .ok_or_else(|| ValidationError::HoldingNotFound {
                ticker: ticker.to_string(),
            })
    }

    /// Rescale weights in place so they sum to 1.0.
    pub fn normalize_weights(&mut self) -> Result<(), ValidationError> {
        if self.holdings.is_empty() {
            return Ok(());
        }

        let total = self.weight_sum();
        if total == 0.0 {
            return Err(ValidationError::ZeroTotalWeight);
        }

        for weight in self.holdings.values_mut() {
            *weight /= total;
        }
        Ok(())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(s: &str) -> Ticker {
        Ticker::parse(s).expect("test ticker must parse")
    }

    #[test]
    fn equal_weighting_splits_evenly() {
        let portfolio =
            Portfolio::equal_weighted("tech", vec![ticker("AAPL"), ticker("MSFT"), ticker("NVDA")])
                .expect("must build");

        assert_eq!(portfolio.len(), 3);
        assert!((portfolio.weight_sum() - 1.0).abs() < 1e-12);
        assert!(portfolio.weight_notice().is_none());
    }

    #[test]
    fn drifted_weights_warn_but_do_not_fail() {
        let holdings = BTreeMap::from([(ticker("AAPL"), 0.5), (ticker("MSFT"), 0.6)]);
        let portfolio = Portfolio::new("lopsided", holdings).expect("must build");

        let notice = portfolio.weight_notice().expect("should warn");
        assert_eq!(notice.code, "portfolio.weight_sum");
    }

    #[test]
    fn normalizes_weights_to_unit_sum() {
        let holdings = BTreeMap::from([(ticker("AAPL"), 2.0), (ticker("MSFT"), 2.0)]);
        let mut portfolio = Portfolio::new("double", holdings).expect("must build");

        portfolio.normalize_weights().expect("must normalize");
        assert!((portfolio.weight_sum() - 1.0).abs() < 1e-12);
        assert_eq!(portfolio.holdings()[&ticker("AAPL")], 0.5);
    }

    #[test]
    fn json_round_trip_preserves_holdings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("portfolio.json");

        let holdings = BTreeMap::from([(ticker("AAPL"), 0.4), (ticker("SPY"), 0.6)]);
        let portfolio = Portfolio::new("mixed", holdings).expect("must build");
        portfolio.to_json_file(&path).expect("must write");

        let loaded = Portfolio::from_json_file(&path).expect("must load");
        assert_eq!(loaded, portfolio);
    }

    #[test]
    fn deserializing_lowercase_tickers_normalizes_them() {
        let loaded: Portfolio =
            serde_json::from_str(r#"{"name":"p","holdings":{"aapl":0.5,"msft":0.5}}"#)
                .expect("must parse");
        assert!(loaded.holdings().contains_key(&ticker("AAPL")));
    }
}
