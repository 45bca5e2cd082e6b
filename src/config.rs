//! Engine parameters, loadable from JSON.
//!
//! Every section and field falls back to its default when omitted:
//!
//! ```json
//! {
//!   "bollinger": { "period": 20, "dev_up": 2.0, "dev_down": 2.0 },
//!   "ichimoku": { "conversion_window": 9, "base_window": 26, "span_b_window": 52, "displacement": 26 },
//!   "cross": { "fast_period": 5, "slow_period": 25 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::indicators::{BollingerParams, BollingerStream, Ichimoku, IchimokuParams};
use crate::signals::CrossParams;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub bollinger: BollingerParams,
    pub ichimoku: IchimokuParams,
    pub cross: CrossParams,
}

impl EngineConfig {
    /// Parses and validates.
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        debug!(?config, "engine config loaded");
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// First invalid field, reported as a config error.
    pub fn validate(&self) -> Result<()> {
        let section = |name: &str, r: Result<()>| r.map_err(|e| Error::Config(format!("{name}: {e}")));
        section("bollinger", self.bollinger.validate())?;
        section("ichimoku", self.ichimoku.validate())?;
        section("cross", self.cross.validate())
    }

    pub fn ichimoku(&self) -> Result<Ichimoku> {
        Ichimoku::new(self.ichimoku)
    }

    pub fn bollinger_stream(&self) -> Result<BollingerStream> {
        BollingerStream::new(self.bollinger)
    }
}
