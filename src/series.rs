//! Nullable, index-aligned series and the shift helpers Ichimoku relies on.

/// `None` = warm-up, non-finite input, or shifted outside the range.
pub type Series = Vec<Option<f64>>;

/// Lifts raw values into a series, mapping NaN/Inf to `None`.
pub fn from_values(values: &[f64]) -> Series {
    values.iter().map(|&v| finite(v)).collect()
}

#[inline]
pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Element type the rolling kernels read: raw prices or nullable indicator
/// output, so one indicator can be rolled over another.
pub trait SeriesValue: Copy {
    /// `None` for a missing or non-finite value.
    fn value(self) -> Option<f64>;
}

impl SeriesValue for f64 {
    #[inline]
    fn value(self) -> Option<f64> {
        finite(self)
    }
}

impl SeriesValue for Option<f64> {
    #[inline]
    fn value(self) -> Option<f64> {
        self.and_then(finite)
    }
}

/// Moves every value `k` positions toward the future: `out[i] = s[i - k]`.
/// The first `k` positions are `None`.
pub fn shift_forward(series: &[Option<f64>], k: usize) -> Series {
    let len = series.len();
    let k = k.min(len);
    let mut out = vec![None; k];
    out.extend_from_slice(&series[..len - k]);
    out
}

/// Moves every value `k` positions toward the past: `out[i] = s[i + k]`.
/// The last `k` positions are `None`.
pub fn shift_backward(series: &[Option<f64>], k: usize) -> Series {
    let len = series.len();
    let k = k.min(len);
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(&series[k..]);
    out.resize(len, None);
    out
}

/// Element-wise combination; `None` on either side stays `None`.
pub(crate) fn zip_with<F>(a: &[Option<f64>], b: &[Option<f64>], f: F) -> Series
where
    F: Fn(f64, f64) -> f64,
{
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => finite(f(*x, *y)),
            _ => None,
        })
        .collect()
}

/// `(a + b) / 2` per index.
pub(crate) fn midpoint(a: &[Option<f64>], b: &[Option<f64>]) -> Series {
    zip_with(a, b, |x, y| (x + y) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_forward() {
        let s = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        assert_eq!(shift_forward(&s, 0), s);
        assert_eq!(shift_forward(&s, 1), vec![None, Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(shift_forward(&s, 4), vec![None; 4]);
        assert_eq!(shift_forward(&s, 10), vec![None; 4]);
    }

    #[test]
    fn test_shift_backward() {
        let s = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        assert_eq!(shift_backward(&s, 2), vec![Some(3.0), Some(4.0), None, None]);
        assert_eq!(shift_backward(&s, 5), vec![None; 4]);
        assert_eq!(shift_backward(&[], 3), Vec::<Option<f64>>::new());
    }

    #[test]
    fn test_round_trip_nulls_edges() {
        let s: Series = (0..6).map(|i| Some(i as f64)).collect();
        let back = shift_backward(&shift_forward(&s, 2), 2);
        assert_eq!(back, vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0), None, None]);
    }

    #[test]
    fn test_from_values_and_midpoint() {
        let s = from_values(&[1.0, f64::NAN, 3.0, f64::INFINITY]);
        assert_eq!(s, vec![Some(1.0), None, Some(3.0), None]);
        let m = midpoint(&s, &[Some(3.0), Some(1.0), None, Some(1.0)]);
        assert_eq!(m, vec![Some(2.0), None, None, None]);
    }

    #[test]
    fn test_series_value() {
        assert_eq!(2.5_f64.value(), Some(2.5));
        assert_eq!(f64::NAN.value(), None);
        assert_eq!(Some(1.0).value(), Some(1.0));
        assert_eq!(Some(f64::NEG_INFINITY).value(), None);
        assert_eq!(None::<f64>.value(), None);
    }
}
