//! Incremental rolling mean / standard deviation.
//!
//! O(1) per update via running sums of `d = v - shift`:
//! `sum += d_in - d_out`, `sum_sq += d_in² - d_out²`,
//! `mean = shift + sum/n`, `var = max(0, sum_sq/n - (sum/n)²)`.
//!
//! `shift` is the window mean at the last rebuild. A rebuild recomputes the sums
//! from the buffer once per `window` evictions, and early when the sums have
//! lost too much precision to describe what is left in the window (a large
//! value just left, or the window drifted far from `shift`).

use tracing::trace;

use super::batch::window_stats;
use crate::common::SeriesBuffer;
use crate::error::Result;

/// Rebuild once the window's variance falls this far below the magnitudes the
/// sums have carried since the last rebuild.
const PRECISION_RATIO: f64 = 1e4;

/// Mean and population standard deviation of a full window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Streaming window state. One instance per stream; not shared.
///
/// Non-finite observations occupy a slot but are kept out of the sums. While
/// one is inside the window `update` yields `None`.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    buffer: SeriesBuffer<f64>,
    shift: f64,
    sum: f64,
    sum_sq: f64,
    /// Largest `d²` absorbed since the last rebuild.
    peak_sq: f64,
    non_finite: usize,
    since_rebuild: usize,
}

impl RollingWindow {
    pub fn new(window: usize) -> Result<Self> {
        Ok(Self {
            buffer: SeriesBuffer::new(window)?,
            shift: 0.0,
            sum: 0.0,
            sum_sq: 0.0,
            peak_sq: 0.0,
            non_finite: 0,
            since_rebuild: 0,
        })
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.buffer.capacity()
    }

    #[inline]
    pub fn is_warm(&self) -> bool {
        self.buffer.is_full()
    }

    /// Observations currently held (≤ window).
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.buffer.to_vec()
    }

    /// Absorbs one observation. `None` during warm-up or while a non-finite
    /// value is inside the window.
    pub fn update(&mut self, v: f64) -> Option<WindowStats> {
        let was_warm = self.buffer.is_full();
        let evicted = self.buffer.push(v);
        let d_in = v.is_finite().then(|| v - self.shift);
        if d_in.is_none() {
            self.non_finite += 1;
        }
        let d_out = match evicted {
            Some(o) if o.is_finite() => Some(o - self.shift),
            Some(_) => {
                self.non_finite -= 1;
                None
            }
            None => None,
        };

        match (d_in, d_out) {
            (Some(a), Some(b)) => {
                self.sum += a - b;
                self.sum_sq += a * a - b * b;
            }
            (Some(a), None) => {
                self.sum += a;
                self.sum_sq += a * a;
            }
            (None, Some(b)) => {
                self.sum -= b;
                self.sum_sq -= b * b;
            }
            (None, None) => {}
        }
        if let Some(a) = d_in {
            self.peak_sq = self.peak_sq.max(a * a);
        }

        if !self.buffer.is_full() {
            return None;
        }
        if !was_warm {
            trace!(window = self.window(), "rolling window warmed up");
            self.rebuild();
        } else {
            self.since_rebuild += 1;
            if self.since_rebuild >= self.window() || self.precision_lost() {
                self.rebuild();
            }
        }
        self.stats()
    }

    /// Stats of the current window without mutating it.
    pub fn stats(&self) -> Option<WindowStats> {
        if !self.buffer.is_full() || self.non_finite > 0 {
            return None;
        }
        let n = self.window() as f64;
        let mean = self.sum / n;
        let variance = (self.sum_sq / n - mean * mean).max(0.0);
        Some(WindowStats {
            mean: self.shift + mean,
            std_dev: variance.sqrt(),
        })
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.shift = 0.0;
        self.sum = 0.0;
        self.sum_sq = 0.0;
        self.peak_sq = 0.0;
        self.non_finite = 0;
        self.since_rebuild = 0;
    }

    fn precision_lost(&self) -> bool {
        let count = self.buffer.len() - self.non_finite;
        if count == 0 {
            return false;
        }
        let n = count as f64;
        let mean = self.sum / n;
        let variance = self.sum_sq / n - mean * mean;
        variance * PRECISION_RATIO < self.peak_sq.max(mean * mean)
    }

    /// Recomputes the sums from the buffer around the current mean.
    fn rebuild(&mut self) {
        let finite: Vec<f64> = self.buffer.iter().filter(|v| v.is_finite()).collect();
        self.shift = if finite.is_empty() {
            0.0
        } else {
            window_stats(&finite).mean
        };
        self.sum = 0.0;
        self.sum_sq = 0.0;
        self.peak_sq = 0.0;
        for v in finite {
            let d = v - self.shift;
            self.sum += d;
            self.sum_sq += d * d;
            self.peak_sq = self.peak_sq.max(d * d);
        }
        self.since_rebuild = 0;
    }
}
