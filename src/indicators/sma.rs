//! Simple moving average (SMA), batch and streaming.

use tracing::debug;

use crate::error::Result;
use crate::rolling::{rolling_mean, RollingWindow};
use crate::series::{Series, SeriesValue};

/// Batch SMA; first `period - 1` values are `None`.
pub fn sma<T: SeriesValue>(data: &[T], period: usize) -> Result<Series> {
    rolling_mean(data, period)
}

/// Streaming SMA, O(1) per price.
#[derive(Debug, Clone)]
pub struct SmaStream {
    window: RollingWindow,
}

impl SmaStream {
    pub fn new(period: usize) -> Result<Self> {
        debug!(period, "sma stream created");
        Ok(Self {
            window: RollingWindow::new(period)?,
        })
    }

    pub fn period(&self) -> usize {
        self.window.window()
    }

    pub fn update(&mut self, price: f64) -> Option<f64> {
        self.window.update(price).map(|s| s.mean)
    }

    /// Latest average, if the window is warm.
    pub fn value(&self) -> Option<f64> {
        self.window.stats().map(|s| s.mean)
    }

    pub fn reset(&mut self) {
        self.window.reset();
    }
}
