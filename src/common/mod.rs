pub mod series_buffer;

pub use series_buffer::{Iter, SeriesBuffer};
