use sc_core::metrics::ChannelSummary;

/// Magnitude statistics over the last `window` raw samples.
///
/// Returns `None` when fewer than `min_samples` samples are available.
///
/// # Example
/// ```
/// use sc_signal::summary::summarize;
/// let s = summarize(&[-2.0, 2.0, -4.0, 4.0], 4, 2).unwrap();
/// assert_eq!(s.mean_magnitude, 3.0);
/// assert_eq!(s.variability, 1.0);
/// ```
#[must_use]
pub fn summarize(values: &[f64], window: usize, min_samples: usize) -> Option<ChannelSummary> {
    let recent = &values[values.len().saturating_sub(window)..];
    if recent.is_empty() || recent.len() < min_samples {
        return None;
    }
    let n = recent.len() as f64;
    let mean = recent.iter().map(|v| v.abs()).sum::<f64>() / n;
    let var = recent
        .iter()
        .map(|v| (v.abs() - mean).powi(2))
        .sum::<f64>()
        / n;
    Some(ChannelSummary {
        mean_magnitude: mean,
        variability: var.sqrt(),
        samples: recent.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_samples_is_none() {
        assert!(summarize(&[1.0, 2.0], 20, 10).is_none());
        assert!(summarize(&[], 20, 1).is_none());
    }

    #[test]
    fn only_the_window_is_summarized() {
        let values = [100.0, -100.0, 5.0, -5.0, 5.0];
        let s = summarize(&values, 3, 1).unwrap_or_default();
        assert_eq!(s.samples, 3);
        assert!((s.mean_magnitude - 5.0).abs() < 1e-12);
        assert!(s.variability.abs() < 1e-12);
    }
}
