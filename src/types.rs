use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One OHLC bar. Prices are already plain floats; any fixed-point or currency
/// conversion happens before this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Which price of a bar an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
    /// (High + Low) / 2
    Median,
    /// (High + Low + Close) / 3
    Typical,
}

impl PriceField {
    #[inline]
    pub fn extract(&self, bar: &PriceBar) -> f64 {
        match self {
            PriceField::Open => bar.open,
            PriceField::High => bar.high,
            PriceField::Low => bar.low,
            PriceField::Close => bar.close,
            PriceField::Median => (bar.high + bar.low) / 2.0,
            PriceField::Typical => (bar.high + bar.low + bar.close) / 3.0,
        }
    }
}

/// Extracts one price column, index-aligned with `bars`.
pub fn column(bars: &[PriceBar], field: PriceField) -> Vec<f64> {
    bars.iter().map(|bar| field.extract(bar)).collect()
}

/// Checks the collaborator contract: strictly increasing timestamps and finite
/// OHLC values.
pub fn validate_bars(bars: &[PriceBar]) -> Result<()> {
    for (index, bar) in bars.iter().enumerate() {
        if !bar.is_finite() {
            return Err(Error::NonFiniteBar { index });
        }
        if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
            return Err(Error::UnorderedTimestamps { index });
        }
    }
    Ok(())
}
