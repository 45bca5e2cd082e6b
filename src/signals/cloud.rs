//! Splits the Ichimoku cloud into single-colored runs.
//!
//! polarity[i] = span1[i] > span2[i] (a missing side counts as false). Runs are
//! bounded by every index where polarity flips, so a fill never bleeds across a
//! crossover.

use serde::{Deserialize, Serialize};

use crate::error::{check_aligned, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Bullish,
    Bearish,
}

/// `[start_index, end_index)` with one polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudSegment {
    pub start_index: usize,
    pub end_index: usize,
    pub polarity: Polarity,
}

impl CloudSegment {
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.end_index == self.start_index
    }
}

#[inline]
fn numeric(v: &Option<f64>) -> bool {
    v.is_some_and(f64::is_finite)
}

#[inline]
fn bullish(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

pub fn segment_cloud(span1: &[Option<f64>], span2: &[Option<f64>]) -> Result<Vec<CloudSegment>> {
    check_aligned(span1.len(), span2.len())?;
    let len = span1.len();
    let polarity: Vec<bool> = span1.iter().zip(span2).map(|(a, b)| bullish(*a, *b)).collect();

    let mut bounds = vec![0];
    bounds.extend((1..len).filter(|&i| polarity[i] != polarity[i - 1]));
    bounds.push(len);

    let segments = bounds
        .windows(2)
        .filter(|w| w[0] < w[1])
        .filter_map(|w| {
            let (start, end) = (w[0], w[1]);
            let blank = !span1[start..end].iter().any(numeric) && !span2[start..end].iter().any(numeric);
            if blank {
                return None;
            }
            Some(CloudSegment {
                start_index: start,
                end_index: end,
                polarity: if polarity[start] {
                    Polarity::Bullish
                } else {
                    Polarity::Bearish
                },
            })
        })
        .collect();
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: usize, end: usize, polarity: Polarity) -> CloudSegment {
        CloudSegment { start_index: start, end_index: end, polarity }
    }

    #[test]
    fn test_two_crossovers() {
        let s1 = vec![Some(1.0), Some(3.0), Some(3.0), Some(1.0), Some(1.0)];
        let s2 = vec![Some(2.0); 5];
        let out = segment_cloud(&s1, &s2).unwrap();
        assert_eq!(
            out,
            vec![
                seg(0, 1, Polarity::Bearish),
                seg(1, 3, Polarity::Bullish),
                seg(3, 5, Polarity::Bearish),
            ]
        );
    }

    #[test]
    fn test_null_prefix_merges_into_first_bearish_run() {
        let s1 = vec![None, None, Some(1.0), Some(3.0)];
        let s2 = vec![None, None, Some(2.0), Some(2.0)];
        let out = segment_cloud(&s1, &s2).unwrap();
        assert_eq!(out, vec![seg(0, 3, Polarity::Bearish), seg(3, 4, Polarity::Bullish)]);
    }

    #[test]
    fn test_fully_blank_run_dropped() {
        let s1 = vec![Some(3.0), None, None];
        let s2 = vec![Some(1.0), None, None];
        assert_eq!(segment_cloud(&s1, &s2).unwrap(), vec![seg(0, 1, Polarity::Bullish)]);
    }

    #[test]
    fn test_one_side_numeric_keeps_run() {
        let s1 = vec![Some(3.0), Some(1.0), None];
        let s2 = vec![Some(1.0), None, None];
        // run [1, 3): span1 has a number, so it survives
        assert_eq!(
            segment_cloud(&s1, &s2).unwrap(),
            vec![seg(0, 1, Polarity::Bullish), seg(1, 3, Polarity::Bearish)]
        );
    }

    #[test]
    fn test_equal_spans_bearish() {
        let s = vec![Some(2.0); 3];
        assert_eq!(segment_cloud(&s, &s).unwrap(), vec![seg(0, 3, Polarity::Bearish)]);
    }

    #[test]
    fn test_empty_and_all_null() {
        assert!(segment_cloud(&[], &[]).unwrap().is_empty());
        assert!(segment_cloud(&[None, None], &[None, None]).unwrap().is_empty());
        assert!(segment_cloud(&[None], &[None, None]).is_err());
    }
}
