//! Indicator layer built on the rolling statistics.

pub mod boll;
pub mod ichimoku;
pub mod sma;

pub use boll::{
    bollinger, bollinger_step, compare_bands, BandDeviation, BollingerBands, BollingerParams,
    BollingerSeries, BollingerState, BollingerStream, DiffStats,
};
pub use ichimoku::{Ichimoku, IchimokuParams, IchimokuResult};
pub use sma::{sma, SmaStream};
