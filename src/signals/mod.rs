//! Event detection over indicator output.

pub mod cloud;
pub mod confirm;
pub mod cross;

pub use cloud::{segment_cloud, CloudSegment, Polarity};
pub use confirm::{cloud_position, three_line_confirmations, CloudPosition, Confirmation};
pub use cross::{detect_crosses, ma_crosses, scan, CrossEvent, CrossKind, CrossParams, CrossSummary};
