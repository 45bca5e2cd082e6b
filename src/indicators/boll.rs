//! Bollinger Bands (BOLL)
//!
//! Middle = SMA(close, period)
//! Upper  = Middle + dev_up   * StdDev(close, period)
//! Lower  = Middle - dev_down * StdDev(close, period)
//!
//! StdDev is the population form. Batch output is computed per window; the
//! pure step and the stream update running sums in O(1).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_aligned, check_multiplier, check_window, Result};
use crate::rolling::{rolling_moments, RollingWindow, WindowStats};
use crate::series::{Series, SeriesValue};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_DEVIATION: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerParams {
    pub period: usize,
    pub dev_up: f64,
    pub dev_down: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            dev_up: DEFAULT_DEVIATION,
            dev_down: DEFAULT_DEVIATION,
        }
    }
}

impl BollingerParams {
    pub fn new(period: usize, dev_up: f64, dev_down: f64) -> Result<Self> {
        let params = Self {
            period,
            dev_up,
            dev_down,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        check_window(self.period)?;
        check_multiplier("dev_up", self.dev_up)?;
        check_multiplier("dev_down", self.dev_down)
    }

    #[inline]
    fn bands(&self, mean: f64, std_dev: f64) -> BollingerBands {
        BollingerBands {
            upper: mean + self.dev_up * std_dev,
            middle: mean,
            lower: mean - self.dev_down * std_dev,
        }
    }
}

/// Band values at one index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    /// (upper - lower) / middle
    pub fn bandwidth(&self) -> Option<f64> {
        if self.middle == 0.0 {
            return None;
        }
        Some((self.upper - self.lower) / self.middle)
    }

    /// (price - lower) / (upper - lower)
    pub fn percent_b(&self, price: f64) -> Option<f64> {
        let range = self.upper - self.lower;
        if range == 0.0 {
            return None;
        }
        Some((price - self.lower) / range)
    }
}

/// Batch output: three aligned series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerSeries {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

impl BollingerSeries {
    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<BollingerBands> {
        Some(BollingerBands {
            upper: (*self.upper.get(i)?)?,
            middle: (*self.middle.get(i)?)?,
            lower: (*self.lower.get(i)?)?,
        })
    }
}

impl FromIterator<Option<BollingerBands>> for BollingerSeries {
    fn from_iter<I: IntoIterator<Item = Option<BollingerBands>>>(iter: I) -> Self {
        let mut out = BollingerSeries::default();
        for bands in iter {
            out.upper.push(bands.map(|b| b.upper));
            out.middle.push(bands.map(|b| b.middle));
            out.lower.push(bands.map(|b| b.lower));
        }
        out
    }
}

/// Batch Bollinger Bands over a full close series (raw or nullable).
pub fn bollinger<T: SeriesValue>(close: &[T], period: usize, dev_up: f64, dev_down: f64) -> Result<BollingerSeries> {
    let params = BollingerParams::new(period, dev_up, dev_down)?;
    debug!(len = close.len(), period, dev_up, dev_down, "batch bollinger");
    Ok(rolling_moments(close, params.period)?
        .into_iter()
        .map(|stats| stats.map(|s| params.bands(s.mean, s.std_dev)))
        .collect())
}

/// Running aggregates carried between single steps.
///
/// `sum` and `sum_sq` cover the finite prices in the caller's window;
/// `non_finite` counts the others. The sums carry rounding from every price
/// that has passed through, so a caller replaying a long or wildly scaled
/// history should reseed with [`BollingerState::from_window`] now and then.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerState {
    pub mean: f64,
    pub sum: f64,
    pub sum_sq: f64,
    pub non_finite: usize,
}

impl BollingerState {
    /// State after absorbing one full window of prices.
    pub fn from_window(prices: &[f64]) -> Self {
        let mut state = Self::default();
        for &p in prices {
            if p.is_finite() {
                state.sum += p;
                state.sum_sq += p * p;
            } else {
                state.non_finite += 1;
            }
        }
        state.mean = state.finite_mean(prices.len());
        state
    }

    /// Bands implied by the current aggregates, e.g. right after `from_window`.
    /// `None` while a non-finite price is inside the window.
    pub fn bands(&self, params: &BollingerParams) -> Option<BollingerBands> {
        if self.non_finite > 0 {
            return None;
        }
        let s = self.stats(params.period);
        Some(params.bands(s.mean, s.std_dev))
    }

    fn finite_mean(&self, period: usize) -> f64 {
        let count = period.saturating_sub(self.non_finite);
        if count == 0 {
            return 0.0;
        }
        self.sum / count as f64
    }

    fn stats(&self, period: usize) -> WindowStats {
        let n = period as f64;
        let mean = self.sum / n;
        let variance = (self.sum_sq / n - mean * mean).max(0.0);
        WindowStats {
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

/// One incremental step with no hidden state.
///
/// `oldest` is the price leaving the window; the caller owns the window. A
/// non-finite `price` is counted rather than summed, and a non-finite `oldest`
/// releases that count, so the state recovers once the bad price has left.
/// The bands are `None` while one is inside the window.
pub fn bollinger_step(
    price: f64,
    oldest: f64,
    prev: BollingerState,
    params: &BollingerParams,
) -> Result<(Option<BollingerBands>, BollingerState)> {
    params.validate()?;
    let mut next = prev;
    match (price.is_finite(), oldest.is_finite()) {
        (true, true) => {
            next.sum += price - oldest;
            next.sum_sq += price * price - oldest * oldest;
        }
        (true, false) => {
            next.sum += price;
            next.sum_sq += price * price;
            next.non_finite = next.non_finite.saturating_sub(1);
        }
        (false, true) => {
            next.sum -= oldest;
            next.sum_sq -= oldest * oldest;
            next.non_finite += 1;
        }
        (false, false) => {}
    }
    // a one-slot window holds nothing but `price`
    if params.period == 1 && price.is_finite() {
        next.sum = price;
        next.sum_sq = price * price;
        next.non_finite = 0;
    }
    next.mean = next.finite_mean(params.period);
    Ok((next.bands(params), next))
}

/// Streaming Bollinger Bands. Owns its window; one instance per price stream.
#[derive(Debug, Clone)]
pub struct BollingerStream {
    params: BollingerParams,
    window: RollingWindow,
    last: Option<BollingerBands>,
}

impl BollingerStream {
    pub fn new(params: BollingerParams) -> Result<Self> {
        params.validate()?;
        debug!(period = params.period, dev_up = params.dev_up, dev_down = params.dev_down, "bollinger stream created");
        Ok(Self {
            window: RollingWindow::new(params.period)?,
            params,
            last: None,
        })
    }

    /// Standard (20, 2.0, 2.0) bands.
    pub fn standard() -> Result<Self> {
        Self::new(BollingerParams::default())
    }

    pub fn params(&self) -> &BollingerParams {
        &self.params
    }

    /// `None` until `period` prices have been absorbed.
    pub fn update(&mut self, price: f64) -> Option<BollingerBands> {
        self.last = self
            .window
            .update(price)
            .map(|s| self.params.bands(s.mean, s.std_dev));
        self.last
    }

    pub fn last(&self) -> Option<BollingerBands> {
        self.last
    }

    pub fn reset(&mut self) {
        self.window.reset();
        self.last = None;
    }
}

/// Absolute differences for one band over indices where both sides exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DiffStats {
    pub count: usize,
    pub max_abs: Option<f64>,
    pub mean_abs: Option<f64>,
}

impl DiffStats {
    fn of(a: &[Option<f64>], b: &[Option<f64>]) -> Self {
        let diffs: Vec<f64> = a
            .iter()
            .zip(b)
            .filter_map(|(x, y)| Some((x.as_ref()? - y.as_ref()?).abs()))
            .collect();
        if diffs.is_empty() {
            return Self::default();
        }
        Self {
            count: diffs.len(),
            max_abs: Some(diffs.iter().copied().fold(0.0, f64::max)),
            mean_abs: Some(diffs.iter().sum::<f64>() / diffs.len() as f64),
        }
    }
}

/// Batch-vs-stream comparison summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BandDeviation {
    pub upper: DiffStats,
    pub middle: DiffStats,
    pub lower: DiffStats,
}

pub fn compare_bands(batch: &BollingerSeries, stream: &BollingerSeries) -> Result<BandDeviation> {
    check_aligned(batch.len(), stream.len())?;
    Ok(BandDeviation {
        upper: DiffStats::of(&batch.upper, &stream.upper),
        middle: DiffStats::of(&batch.middle, &stream.middle),
        lower: DiffStats::of(&batch.lower, &stream.lower),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SeriesBuffer;

    #[test]
    fn test_boll_calculation() {
        let out = bollinger(&[100.0, 102.0, 101.0], 3, 2.0, 2.0).unwrap();
        let b = out.get(2).unwrap();
        assert!((b.middle - 101.0).abs() < 1e-12);
        let sd = (2.0_f64 / 3.0).sqrt();
        assert!((b.upper - (101.0 + 2.0 * sd)).abs() < 1e-9);
        assert!((b.lower - (101.0 - 2.0 * sd)).abs() < 1e-9);
        assert_eq!(out.get(1), None);
    }

    #[test]
    fn test_asymmetric_deviation() {
        let out = bollinger(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8, 1.0, 3.0).unwrap();
        let b = out.get(7).unwrap();
        assert!((b.middle - 5.0).abs() < 1e-12);
        assert!((b.upper - 7.0).abs() < 1e-12);
        assert!((b.lower - -1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stream_matches_batch() {
        let close: Vec<f64> = (0..120).map(|i| 50.0 + (i as f64 * 0.37).cos() * 3.0 + i as f64 * 0.05).collect();
        let batch = bollinger(&close, 20, 2.0, 2.0).unwrap();
        let mut stream = BollingerStream::standard().unwrap();
        let streamed: BollingerSeries = close.iter().map(|&p| stream.update(p)).collect();

        let dev = compare_bands(&batch, &streamed).unwrap();
        assert_eq!(dev.middle.count, 101);
        assert!(dev.upper.max_abs.unwrap() < 1e-9);
        assert!(dev.lower.max_abs.unwrap() < 1e-9);
    }

    #[test]
    fn test_step_with_external_window() {
        let close: Vec<f64> = (0..60).map(|i| 10.0 + ((i * 7) % 11) as f64).collect();
        let params = BollingerParams::new(5, 2.0, 1.5).unwrap();
        let batch = bollinger(&close, 5, 2.0, 1.5).unwrap();

        let mut window = SeriesBuffer::new(5).unwrap();
        let mut state = BollingerState::default();
        for (i, &p) in close.iter().enumerate() {
            if !window.is_full() {
                window.push(p);
                if window.is_full() {
                    state = BollingerState::from_window(&window.to_vec());
                    let first = state.bands(&params).unwrap();
                    assert!((first.middle - batch.get(i).unwrap().middle).abs() < 1e-12);
                }
                continue;
            }
            let oldest = window.push(p).unwrap();
            let (bands, next) = bollinger_step(p, oldest, state, &params).unwrap();
            state = next;
            let bands = bands.unwrap();
            let want = batch.get(i).unwrap();
            assert!((bands.middle - want.middle).abs() <= 1e-9 * want.middle.abs());
            assert!((bands.upper - want.upper).abs() <= 1e-9 * want.upper.abs());
            assert!((bands.lower - want.lower).abs() <= 1e-9 * want.lower.abs().max(1.0));
        }
    }

    #[test]
    fn test_step_skips_non_finite_and_recovers() {
        let params = BollingerParams::new(3, 2.0, 2.0).unwrap();
        let mut window = SeriesBuffer::new(3).unwrap();
        for p in [1.0, 2.0, 3.0] {
            window.push(p);
        }
        let mut state = BollingerState::from_window(&window.to_vec());
        let mut out = Vec::new();
        for p in [f64::NAN, 4.0, 5.0, 6.0] {
            let oldest = window.push(p).unwrap();
            let (bands, next) = bollinger_step(p, oldest, state, &params).unwrap();
            assert!(next.sum.is_finite() && next.sum_sq.is_finite());
            state = next;
            out.push(bands);
        }
        // NaN sits in the window for three steps, then 4, 5, 6
        assert_eq!(out[..3], [None, None, None]);
        let b = out[3].unwrap();
        assert!((b.middle - 5.0).abs() < 1e-12);
        let sd = (2.0_f64 / 3.0).sqrt();
        assert!((b.upper - (5.0 + 2.0 * sd)).abs() < 1e-9);
        assert_eq!(state.non_finite, 0);
        assert!((state.mean - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_step_seeded_with_non_finite() {
        let params = BollingerParams::new(2, 1.0, 1.0).unwrap();
        let state = BollingerState::from_window(&[f64::INFINITY, 3.0]);
        assert_eq!(state.non_finite, 1);
        assert_eq!(state.mean, 3.0);
        assert_eq!(state.bands(&params), None);
        let (bands, _) = bollinger_step(5.0, f64::INFINITY, state, &params).unwrap();
        let b = bands.unwrap();
        assert_eq!(b.middle, 4.0);
        assert_eq!(b.upper, 5.0);
    }

    #[test]
    fn test_step_single_slot_window() {
        let params = BollingerParams::new(1, 2.0, 2.0).unwrap();
        let mut state = BollingerState::from_window(&[0.1]);
        let mut prev = 0.1;
        for p in [0.7, 1e9, 0.3] {
            let (bands, next) = bollinger_step(p, prev, state, &params).unwrap();
            let b = bands.unwrap();
            assert_eq!(b.middle, p);
            assert_eq!(b.upper, p);
            state = next;
            prev = p;
        }
    }

    #[test]
    fn test_batch_forgets_spike() {
        let close = [1e15, 10.0, 11.0, 12.0, 13.0];
        let out = bollinger(&close, 2, 2.0, 2.0).unwrap();
        let b = out.get(4).unwrap();
        assert!((b.middle - 12.5).abs() < 1e-12);
        assert!((b.upper - 13.5).abs() < 1e-12);

        let mut stream = BollingerStream::new(BollingerParams::new(2, 2.0, 2.0).unwrap()).unwrap();
        let last = close.iter().map(|&p| stream.update(p)).last().flatten().unwrap();
        assert!((last.middle - 12.5).abs() < 1e-9);
        assert!((last.upper - 13.5).abs() < 1e-9);
    }

    #[test]
    fn test_batch_over_nullable_series() {
        let sma = vec![None, Some(2.0), Some(4.0), Some(6.0)];
        let out = bollinger(&sma, 2, 1.0, 1.0).unwrap();
        assert_eq!(out.get(1), None);
        let b = out.get(3).unwrap();
        assert_eq!((b.lower, b.middle, b.upper), (4.0, 5.0, 6.0));
    }

    #[test]
    fn test_warm_up_none() {
        let mut s = BollingerStream::new(BollingerParams::new(3, 2.0, 2.0).unwrap()).unwrap();
        assert_eq!(s.update(1.0), None);
        assert_eq!(s.update(2.0), None);
        assert!(s.update(3.0).is_some());
        assert!(s.last().is_some());
        s.reset();
        assert_eq!(s.last(), None);
    }

    #[test]
    fn test_invalid_params() {
        assert!(bollinger(&[1.0], 0, 2.0, 2.0).is_err());
        assert!(bollinger(&[1.0], 3, -1.0, 2.0).is_err());
        assert!(BollingerParams::new(20, 2.0, f64::NAN).is_err());
        let bad = BollingerParams { period: 3, dev_up: -0.5, dev_down: 1.0 };
        assert!(BollingerStream::new(bad).is_err());
        assert!(bollinger_step(1.0, 1.0, BollingerState::default(), &bad).is_err());
    }

    #[test]
    fn test_short_input() {
        let out = bollinger(&[1.0, 2.0], 5, 2.0, 2.0).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.upper.iter().all(Option::is_none));
    }

    #[test]
    fn test_bandwidth_and_percent_b() {
        let b = BollingerBands { upper: 12.0, middle: 10.0, lower: 8.0 };
        assert_eq!(b.bandwidth(), Some(0.4));
        assert_eq!(b.percent_b(10.0), Some(0.5));
        assert_eq!(b.percent_b(12.0), Some(1.0));
        let flat = BollingerBands { upper: 5.0, middle: 5.0, lower: 5.0 };
        assert_eq!(flat.percent_b(5.0), None);
        let zero = BollingerBands { upper: 1.0, middle: 0.0, lower: -1.0 };
        assert_eq!(zero.bandwidth(), None);
    }

    #[test]
    fn test_compare_length_mismatch() {
        let a = bollinger(&[1.0, 2.0, 3.0], 2, 2.0, 2.0).unwrap();
        let b = bollinger(&[1.0, 2.0], 2, 2.0, 2.0).unwrap();
        assert!(compare_bands(&a, &b).is_err());
    }
}
