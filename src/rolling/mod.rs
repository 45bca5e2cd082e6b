//! Rolling-window statistics, batch and incremental.

mod batch;
mod window;

pub use batch::{rolling_max, rolling_mean, rolling_min, rolling_std_dev};
pub(crate) use batch::rolling_moments;
pub use window::{RollingWindow, WindowStats};
