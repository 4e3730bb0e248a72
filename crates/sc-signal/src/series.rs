/// One accepted sample of a channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Per-channel counter, +1 per accepted sample.
    pub index: u64,
    pub value: f64,
}

/// Append-only buffer of one channel's samples.
///
/// Indices start at 0 and grow by exactly 1 per push. With a retention cap
/// the oldest samples fall off the front, but indices keep counting from
/// where they were.
///
/// # Example
/// ```
/// use sc_signal::series::SignalSeries;
/// let mut series = SignalSeries::new(None);
/// assert_eq!(series.push(4.0), 0);
/// assert_eq!(series.push(-2.0), 1);
/// assert_eq!(series.values(), &[4.0, -2.0]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SignalSeries {
    values: Vec<f64>,
    /// Index of `values[0]`.
    first_index: u64,
    cap: Option<usize>,
    /// Samples dropped by the latest push, restored by `pop_last`.
    evicted: Vec<f64>,
}

impl SignalSeries {
    #[must_use]
    pub fn new(cap: Option<usize>) -> Self {
        Self {
            values: Vec::with_capacity(cap.unwrap_or(256)),
            first_index: 0,
            cap: cap.map(|c| c.max(1)),
            evicted: Vec::new(),
        }
    }

    /// Appends a sample and returns its index.
    pub fn push(&mut self, value: f64) -> u64 {
        let index = self.next_index();
        self.values.push(value);
        self.evicted.clear();
        if let Some(cap) = self.cap
            && self.values.len() > cap
        {
            let excess = self.values.len() - cap;
            self.evicted.extend(self.values.drain(..excess));
            self.first_index += excess as u64;
        }
        index
    }

    /// Removes the newest sample. Used to roll back a failed frame.
    ///
    /// Samples the matching push evicted under a retention cap are put back
    /// at the front, so push then pop leaves the series as it was.
    pub fn pop_last(&mut self) -> Option<Measurement> {
        let value = self.values.pop()?;
        let index = self.first_index + self.values.len() as u64;
        if !self.evicted.is_empty() {
            self.first_index -= self.evicted.len() as u64;
            self.values.splice(0..0, self.evicted.drain(..));
        }
        Some(Measurement { index, value })
    }

    #[must_use]
    pub fn next_index(&self) -> u64 {
        self.first_index + self.values.len() as u64
    }

    /// Retained sample values, oldest first.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn last(&self) -> Option<Measurement> {
        self.values.last().map(|&value| Measurement {
            index: self.next_index() - 1,
            value,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Measurement> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &value)| Measurement {
                index: self.first_index + i as u64,
                value,
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_increase_by_one() {
        let mut series = SignalSeries::new(None);
        for v in [3.0, 1.0, 4.0, 1.0, 5.0] {
            series.push(v);
        }
        let indices: Vec<u64> = series.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(series.last(), Some(Measurement { index: 4, value: 5.0 }));
    }

    #[test]
    fn cap_evicts_oldest_and_keeps_counting() {
        let mut series = SignalSeries::new(Some(3));
        for v in 0..5 {
            series.push(f64::from(v));
        }
        assert_eq!(series.values(), &[2.0, 3.0, 4.0]);
        assert_eq!(series.iter().next().map(|m| m.index), Some(2));
        assert_eq!(series.push(9.0), 5);
        assert_eq!(series.values(), &[3.0, 4.0, 9.0]);
    }

    #[test]
    fn pop_last_undoes_push() {
        let mut series = SignalSeries::new(None);
        series.push(1.0);
        series.push(2.0);
        assert_eq!(series.pop_last(), Some(Measurement { index: 1, value: 2.0 }));
        assert_eq!(series.next_index(), 1);
        assert_eq!(series.push(7.0), 1);
    }

    #[test]
    fn pop_last_restores_sample_evicted_by_cap() {
        let mut series = SignalSeries::new(Some(3));
        for v in 0..3 {
            series.push(f64::from(v));
        }
        assert_eq!(series.push(3.0), 3);
        assert_eq!(series.values(), &[1.0, 2.0, 3.0]);

        assert_eq!(series.pop_last(), Some(Measurement { index: 3, value: 3.0 }));
        assert_eq!(series.values(), &[0.0, 1.0, 2.0]);
        assert_eq!(series.iter().next().map(|m| m.index), Some(0));
        assert_eq!(series.next_index(), 3);

        // A second pop has nothing left to restore.
        assert_eq!(series.pop_last(), Some(Measurement { index: 2, value: 2.0 }));
        assert_eq!(series.values(), &[0.0, 1.0]);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut series = SignalSeries::new(None);
        assert_eq!(series.pop_last(), None);
        assert_eq!(series.next_index(), 0);
    }
}
