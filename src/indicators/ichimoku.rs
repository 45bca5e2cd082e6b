//! Ichimoku Kinko Hyo, five lines.
//!
//! conversion  = (max(high, 9)  + min(low, 9))  / 2
//! base        = (max(high, 26) + min(low, 26)) / 2
//! span1[i]    = ((conversion + base) / 2)[i - 26]              (plotted forward)
//! span2[i]    = ((max(high, 52) + min(low, 52)) / 2)[i - 26]   (plotted forward)
//! lagging[i]  = close[i + 26]                                  (plotted backward)
//!
//! The leading spans are padded with `None` at the front, the lagging span at
//! the back. The cloud and three-line signals depend on exactly this layout.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_aligned, check_window, Error, Result};
use crate::rolling::{rolling_max, rolling_min};
use crate::series::{from_values, midpoint, shift_backward, shift_forward, Series};
use crate::types::{column, PriceBar, PriceField};

pub const CONVERSION_WINDOW: usize = 9;
pub const BASE_WINDOW: usize = 26;
pub const SPAN_B_WINDOW: usize = 52;
pub const DISPLACEMENT: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IchimokuParams {
    pub conversion_window: usize,
    pub base_window: usize,
    pub span_b_window: usize,
    pub displacement: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            conversion_window: CONVERSION_WINDOW,
            base_window: BASE_WINDOW,
            span_b_window: SPAN_B_WINDOW,
            displacement: DISPLACEMENT,
        }
    }
}

impl IchimokuParams {
    /// Windows must be non-zero; a zero displacement is allowed (no shift).
    pub fn validate(&self) -> Result<()> {
        check_window(self.conversion_window)?;
        check_window(self.base_window)?;
        check_window(self.span_b_window)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IchimokuResult {
    pub conversion_line: Series,
    pub base_line: Series,
    pub leading_span1: Series,
    pub leading_span2: Series,
    pub lagging_span: Series,
}

impl IchimokuResult {
    pub fn len(&self) -> usize {
        self.conversion_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversion_line.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ichimoku {
    params: IchimokuParams,
}

impl Ichimoku {
    pub fn new(params: IchimokuParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &IchimokuParams {
        &self.params
    }

    /// All five lines for aligned high/low/close columns.
    pub fn calculate(&self, high: &[f64], low: &[f64], close: &[f64]) -> Result<IchimokuResult> {
        let len = high.len();
        check_aligned(len, low.len())?;
        check_aligned(len, close.len())?;
        let p = &self.params;
        debug!(len, displacement = p.displacement, "ichimoku");

        let channel_mid = |window: usize| -> Result<Series> {
            Ok(midpoint(&rolling_max(high, window)?, &rolling_min(low, window)?))
        };

        let conversion_line = channel_mid(p.conversion_window)?;
        let base_line = channel_mid(p.base_window)?;
        let raw_span1 = midpoint(&conversion_line, &base_line);
        let raw_span2 = channel_mid(p.span_b_window)?;

        Ok(IchimokuResult {
            leading_span1: shift_forward(&raw_span1, p.displacement),
            leading_span2: shift_forward(&raw_span2, p.displacement),
            lagging_span: shift_backward(&from_values(close), p.displacement),
            conversion_line,
            base_line,
        })
    }

    pub fn from_bars(&self, bars: &[PriceBar]) -> Result<IchimokuResult> {
        self.calculate(
            &column(bars, PriceField::High),
            &column(bars, PriceField::Low),
            &column(bars, PriceField::Close),
        )
    }
}

impl TryFrom<IchimokuParams> for Ichimoku {
    type Error = Error;

    fn try_from(params: IchimokuParams) -> Result<Self> {
        Self::new(params)
    }
}
