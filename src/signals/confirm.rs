//! Ichimoku three-line confirmation.
//!
//! Bullish at i when all of:
//! 1. conversion line above base line
//! 2. lagging span above the candle it is plotted against (close[i])
//! 3. close above the cloud
//!
//! Bearish is the mirror image. Anything else, including a missing input, is
//! no signal.

use serde::{Deserialize, Serialize};

use crate::error::{check_aligned, Result};
use crate::indicators::IchimokuResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudPosition {
    Above,
    Inside,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    Bullish,
    Bearish,
}

fn position(price: f64, a: Option<f64>, b: Option<f64>) -> Option<CloudPosition> {
    let (a, b) = (a?, b?);
    if !price.is_finite() {
        return None;
    }
    let (top, bottom) = (a.max(b), a.min(b));
    Some(if price > top {
        CloudPosition::Above
    } else if price < bottom {
        CloudPosition::Below
    } else {
        CloudPosition::Inside
    })
}

/// Where each close sits relative to the cloud at the same index.
pub fn cloud_position(
    close: &[f64],
    span1: &[Option<f64>],
    span2: &[Option<f64>],
) -> Result<Vec<Option<CloudPosition>>> {
    check_aligned(close.len(), span1.len())?;
    check_aligned(close.len(), span2.len())?;
    Ok(close
        .iter()
        .zip(span1.iter().zip(span2))
        .map(|(&c, (&a, &b))| position(c, a, b))
        .collect())
}

pub fn three_line_confirmations(
    lines: &IchimokuResult,
    close: &[f64],
) -> Result<Vec<Option<Confirmation>>> {
    for line in [
        &lines.conversion_line,
        &lines.base_line,
        &lines.leading_span1,
        &lines.leading_span2,
        &lines.lagging_span,
    ] {
        check_aligned(close.len(), line.len())?;
    }
    let positions = cloud_position(close, &lines.leading_span1, &lines.leading_span2)?;

    Ok((0..close.len())
        .map(|i| {
            let conv = lines.conversion_line[i]?;
            let base = lines.base_line[i]?;
            let lagging = lines.lagging_span[i]?;
            let c = close[i];
            match positions[i]? {
                CloudPosition::Above if conv > base && lagging > c => Some(Confirmation::Bullish),
                CloudPosition::Below if conv < base && lagging < c => Some(Confirmation::Bearish),
                _ => None,
            }
        })
        .collect())
}
