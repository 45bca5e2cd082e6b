//! hquant-ta: rolling-window technical indicators
//!
//! - Batch rolling max/min/mean/std-dev over a full price history
//! - O(1) amortized streaming updates that track the batch values
//! - Bollinger Bands (batch, pure step, stream) and the five-line Ichimoku family
//! - Golden/dead cross detection and bullish/bearish cloud segmentation
//!
//! Nullable series are `Vec<Option<f64>>`: `None` means warm-up, a non-finite
//! input inside the window, or a position shifted out of range.

pub mod common;
pub mod config;
pub mod error;
pub mod indicators;
pub mod rolling;
pub mod series;
pub mod signals;
pub mod types;

pub use common::SeriesBuffer;
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use indicators::{
    bollinger, bollinger_step, compare_bands, sma, BandDeviation, BollingerBands,
    BollingerParams, BollingerSeries, BollingerState, BollingerStream, Ichimoku,
    IchimokuParams, IchimokuResult, SmaStream,
};
pub use rolling::{rolling_max, rolling_mean, rolling_min, rolling_std_dev, RollingWindow, WindowStats};
pub use series::{shift_backward, shift_forward, Series, SeriesValue};
pub use signals::{
    cloud_position, detect_crosses, ma_crosses, segment_cloud, three_line_confirmations,
    CloudPosition, CloudSegment, Confirmation, CrossEvent, CrossKind, CrossParams, CrossSummary,
    Polarity,
};
pub use types::{column, validate_bars, PriceBar, PriceField};
