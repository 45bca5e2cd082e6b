//! Batch rolling statistics over a full history.
//!
//! Output has the input's length; the first `window - 1` positions are `None`,
//! as is any position whose window holds a missing or non-finite value. A
//! window longer than the input yields an all-`None` series.
//!
//! Inputs are raw prices (`&[f64]`) or nullable series (`&[Option<f64>]`).

use std::collections::VecDeque;

use tracing::debug;

use super::window::WindowStats;
use crate::error::{check_window, Result};
use crate::series::{Series, SeriesValue};

#[derive(Clone, Copy)]
enum Extremum {
    Max,
    Min,
}

impl Extremum {
    /// True when `candidate` makes `kept` useless for every later window.
    #[inline]
    fn dominates(self, candidate: f64, kept: f64) -> bool {
        match self {
            Extremum::Max => candidate >= kept,
            Extremum::Min => candidate <= kept,
        }
    }
}

/// Monotonic deque of (index, value); front is the current extremum.
fn rolling_extremum<T: SeriesValue>(data: &[T], window: usize, kind: Extremum) -> Result<Series> {
    check_window(window)?;
    let mut out = Vec::with_capacity(data.len());
    let mut deque: VecDeque<(usize, f64)> = VecDeque::with_capacity(window);
    let mut last_missing: Option<usize> = None;

    for (i, v) in data.iter().enumerate() {
        match v.value() {
            Some(v) => {
                while deque.back().is_some_and(|&(_, kept)| kind.dominates(v, kept)) {
                    deque.pop_back();
                }
                deque.push_back((i, v));
            }
            None => last_missing = Some(i),
        }

        if i + 1 < window {
            out.push(None);
            continue;
        }
        let start = i + 1 - window;
        while deque.front().is_some_and(|&(j, _)| j < start) {
            deque.pop_front();
        }
        let blocked = last_missing.is_some_and(|j| j >= start);
        out.push(if blocked {
            None
        } else {
            deque.front().map(|&(_, v)| v)
        });
    }
    Ok(out)
}

/// Trailing maximum over `[i - window + 1, i]`.
pub fn rolling_max<T: SeriesValue>(data: &[T], window: usize) -> Result<Series> {
    rolling_extremum(data, window, Extremum::Max)
}

/// Trailing minimum over `[i - window + 1, i]`.
pub fn rolling_min<T: SeriesValue>(data: &[T], window: usize) -> Result<Series> {
    rolling_extremum(data, window, Extremum::Min)
}

/// Two-pass mean and population standard deviation of a finite slice.
pub(crate) fn window_stats(values: &[f64]) -> WindowStats {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    WindowStats {
        mean,
        std_dev: variance.sqrt(),
    }
}

/// Mean and std-dev of every full window, each computed from the window
/// itself. Nothing carries over between positions, so a large value stops
/// affecting the output as soon as it leaves the window.
pub(crate) fn rolling_moments<T: SeriesValue>(data: &[T], window: usize) -> Result<Vec<Option<WindowStats>>> {
    check_window(window)?;
    debug!(len = data.len(), window, "batch rolling moments");
    let values: Vec<f64> = data.iter().map(|v| v.value().unwrap_or(f64::NAN)).collect();
    let mut last_missing: Option<usize> = None;

    Ok(values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if !v.is_finite() {
                last_missing = Some(i);
            }
            if i + 1 < window {
                return None;
            }
            let start = i + 1 - window;
            if last_missing.is_some_and(|j| j >= start) {
                return None;
            }
            Some(window_stats(&values[start..=i]))
        })
        .collect())
}

/// Simple moving average.
pub fn rolling_mean<T: SeriesValue>(data: &[T], window: usize) -> Result<Series> {
    Ok(rolling_moments(data, window)?
        .into_iter()
        .map(|s| s.map(|s| s.mean))
        .collect())
}

/// Population standard deviation (divides by `window`).
pub fn rolling_std_dev<T: SeriesValue>(data: &[T], window: usize) -> Result<Series> {
    Ok(rolling_moments(data, window)?
        .into_iter()
        .map(|s| s.map(|s| s.std_dev))
        .collect())
}
