//! Replays a synthetic daily history one bar at a time, the way a live feed
//! would drive the streaming API, then checks it against the batch result.
//!
//! RUST_LOG=debug cargo run --example stream_replay

use hquant_ta::common::SeriesBuffer;
use hquant_ta::indicators::{bollinger_step, BollingerState};
use hquant_ta::{
    bollinger, compare_bands, ma_crosses, segment_cloud, BollingerSeries, CrossSummary,
    EngineConfig, PriceBar,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn synthetic_bars(len: usize) -> Vec<PriceBar> {
    let mut close = 1_000.0_f64;
    (0..len)
        .map(|i| {
            let t = i as f64;
            close += (t * 0.11).sin() * 6.0 + (t * 0.029).cos() * 2.5;
            let spread = 4.0 + (t * 0.7).sin().abs() * 6.0;
            PriceBar::new(i as i64 * 86_400, close - 1.0, close + spread, close - spread, close)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = EngineConfig::default();
    let bars = synthetic_bars(500);
    let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let p = config.bollinger;

    // Poller-owned stream: one tick per bar.
    let mut stream = config.bollinger_stream()?;
    let streamed: BollingerSeries = close.iter().map(|&c| stream.update(c)).collect();

    // Same thing with the window managed here and only the pure step in the library.
    let mut window = SeriesBuffer::new(p.period)?;
    let mut state = BollingerState::default();
    let mut stepped = Vec::with_capacity(close.len());
    for &c in &close {
        match window.push(c) {
            Some(oldest) => {
                let (bands, next) = bollinger_step(c, oldest, state, &p)?;
                state = next;
                stepped.push(bands);
            }
            None if window.is_full() => {
                state = BollingerState::from_window(&window.to_vec());
                stepped.push(state.bands(&p));
            }
            None => stepped.push(None),
        }
    }
    let stepped: BollingerSeries = stepped.into_iter().collect();

    let batch = bollinger(&close, p.period, p.dev_up, p.dev_down)?;
    let vs_stream = compare_bands(&batch, &streamed)?;
    let vs_step = compare_bands(&batch, &stepped)?;
    info!(
        compared = vs_stream.middle.count,
        max_abs_upper = ?vs_stream.upper.max_abs,
        max_abs_lower = ?vs_stream.lower.max_abs,
        "batch vs stream"
    );
    info!(
        compared = vs_step.middle.count,
        max_abs_upper = ?vs_step.upper.max_abs,
        mean_abs_middle = ?vs_step.middle.mean_abs,
        "batch vs pure step"
    );

    let crosses = ma_crosses(&bars, &config.cross)?;
    let summary = CrossSummary::from_events(&crosses);
    info!(golden = summary.golden, dead = summary.dead, "moving-average crosses");

    let lines = config.ichimoku()?.from_bars(&bars)?;
    let segments = segment_cloud(&lines.leading_span1, &lines.leading_span2)?;
    for s in &segments {
        info!(start = s.start_index, end = s.end_index, polarity = ?s.polarity, "cloud segment");
    }
    Ok(())
}
