//! Moving-average crossover detection (golden / dead cross).
//!
//! diff[i] = fast[i] - slow[i]
//! Golden: diff[i-1] < 0 && diff[i] > 0
//! Dead:   diff[i-1] > 0 && diff[i] < 0
//!
//! Both comparisons are strict, so touching (diff == 0) never signals.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_aligned, check_window, Result};
use crate::indicators::sma;
use crate::types::{column, PriceBar, PriceField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossKind {
    /// Fast line crosses above the slow line.
    Golden,
    /// Fast line crosses below the slow line.
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossEvent {
    pub index: usize,
    pub timestamp: i64,
    pub kind: CrossKind,
    /// Close of the bar the cross completes on.
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossParams {
    pub fast_period: usize,
    pub slow_period: usize,
}

impl Default for CrossParams {
    fn default() -> Self {
        Self {
            fast_period: 5,
            slow_period: 25,
        }
    }
}

impl CrossParams {
    pub fn validate(&self) -> Result<()> {
        check_window(self.fast_period)?;
        check_window(self.slow_period)
    }
}

#[inline]
fn diff(fast: Option<f64>, slow: Option<f64>) -> Option<f64> {
    let d = fast? - slow?;
    d.is_finite().then_some(d)
}

/// Index-only scan of two aligned series. A missing value at `i` or `i - 1`
/// suppresses detection at `i`.
pub fn scan(fast: &[Option<f64>], slow: &[Option<f64>]) -> Result<Vec<(usize, CrossKind)>> {
    check_aligned(fast.len(), slow.len())?;
    let mut out = Vec::new();
    let mut prev: Option<f64> = None;
    for (i, (f, s)) in fast.iter().zip(slow).enumerate() {
        let cur = diff(*f, *s);
        if let (Some(p), Some(c)) = (prev, cur) {
            if p < 0.0 && c > 0.0 {
                out.push((i, CrossKind::Golden));
            } else if p > 0.0 && c < 0.0 {
                out.push((i, CrossKind::Dead));
            }
        }
        prev = cur;
    }
    Ok(out)
}

/// Cross events stamped with the bar's timestamp and close.
pub fn detect_crosses(
    bars: &[PriceBar],
    fast: &[Option<f64>],
    slow: &[Option<f64>],
) -> Result<Vec<CrossEvent>> {
    check_aligned(bars.len(), fast.len())?;
    let events: Vec<CrossEvent> = scan(fast, slow)?
        .into_iter()
        .map(|(index, kind)| CrossEvent {
            index,
            timestamp: bars[index].timestamp,
            kind,
            price: bars[index].close,
        })
        .collect();
    debug!(bars = bars.len(), events = events.len(), "cross scan");
    Ok(events)
}

/// SMA(close, fast) vs SMA(close, slow) crosses.
pub fn ma_crosses(bars: &[PriceBar], params: &CrossParams) -> Result<Vec<CrossEvent>> {
    params.validate()?;
    let close = column(bars, PriceField::Close);
    let fast = sma(&close, params.fast_period)?;
    let slow = sma(&close, params.slow_period)?;
    detect_crosses(bars, &fast, &slow)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrossSummary {
    pub golden: usize,
    pub dead: usize,
}

impl CrossSummary {
    pub fn from_events(events: &[CrossEvent]) -> Self {
        events.iter().fold(Self::default(), |mut acc, e| {
            match e.kind {
                CrossKind::Golden => acc.golden += 1,
                CrossKind::Dead => acc.dead += 1,
            }
            acc
        })
    }
}
