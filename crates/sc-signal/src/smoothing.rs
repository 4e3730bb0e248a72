use crate::error::SignalError;

/// Centred moving average with boundary truncation.
///
/// For position `i` the window spans `[i - w/2, i + w/2]` clipped to the
/// series, so an even width averages one sample more than `w` (width 10
/// covers 5 samples on each side). Nothing outside the series is used:
/// near the ends the mean is taken over fewer samples instead of padding.
///
/// # Example
/// ```
/// use sc_signal::smoothing::Smoother;
/// let smoother = Smoother::new(2);
/// assert_eq!(smoother.smooth(&[0.0, 3.0, 6.0]), vec![1.5, 3.0, 4.5]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Smoother {
    half: usize,
}

impl Smoother {
    /// Create a smoother. A width of 0 behaves like 1 (identity).
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            half: window.max(1) / 2,
        }
    }

    /// Smooth a full series. Same length as the input.
    #[must_use]
    pub fn smooth(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let lo = i.saturating_sub(self.half);
            let hi = (i + self.half + 1).min(n);
            let sum: f64 = values[lo..hi].iter().sum();
            out.push(sum / (hi - lo) as f64);
        }
        out
    }

    /// Like [`Smoother::smooth`], but fails on the first non-finite output.
    ///
    /// # Errors
    /// Returns [`SignalError::NonFiniteSmoothed`] with the offending position.
    pub fn smooth_checked(&self, values: &[f64]) -> Result<Vec<f64>, SignalError> {
        let out = self.smooth(values);
        if let Some(position) = out.iter().position(|v| !v.is_finite()) {
            return Err(SignalError::NonFiniteSmoothed { position });
        }
        Ok(out)
    }
}
