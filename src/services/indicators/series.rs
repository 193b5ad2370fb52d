// File: src/services/indicators/series.rs

/// A derived series that only covers the tail of its input.
///
/// `values[0]` belongs to input position `first_index`, so two series built
/// from the same input can be aligned by comparing their first indices
/// instead of slicing by hand-computed offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    first_index: usize,
    values: Vec<f64>,
}

impl AlignedSeries {
    pub fn new(first_index: usize, values: Vec<f64>) -> Self {
        Self {
            first_index,
            values,
        }
    }

    pub fn first_index(&self) -> usize {
        self.first_index
    }

    /// Input position just past the last value.
    pub fn end_index(&self) -> usize {
        self.first_index + self.values.len()
    }

    /// Values from input position `index` onwards.
    pub fn from_index(&self, index: usize) -> &[f64] {
        debug_assert!(
            index >= self.first_index,
            "index {} precedes first valid index {}",
            index,
            self.first_index
        );
        let skip = index
            .saturating_sub(self.first_index)
            .min(self.values.len());
        &self.values[skip..]
    }

    /// Drops the values that lie before input position `index`.
    pub fn starting_at(&self, index: usize) -> Self {
        Self::new(index, self.from_index(index).to_vec())
    }

    /// Element-wise `self - other` over the range both series cover.
    pub fn difference(&self, other: &Self) -> Self {
        let start = self.first_index.max(other.first_index);
        let values = self
            .from_index(start)
            .iter()
            .zip(other.from_index(start))
            .map(|(a, b)| a - b)
            .collect();
        Self::new(start, values)
    }

    /// EMA of this series; the result is indexed against the same input.
    pub fn ema(&self, period: usize) -> Self {
        ema(&self.values, self.first_index, period)
    }

    /// Expands back to input length, undefined before `first_index`.
    pub fn into_padded(self, len: usize) -> Vec<Option<f64>> {
        debug_assert!(
            self.end_index() <= len,
            "series ends at {} past input length {}",
            self.end_index(),
            len
        );
        let mut padded = Vec::with_capacity(len);
        padded.resize(self.first_index.min(len), None);
        padded.extend(self.values.into_iter().map(Some));
        padded.resize(len, None);
        padded
    }
}

/// Exponential moving average seeded with the simple mean of the first
/// `period` values, then `ema = x * k + prev * (1 - k)` with
/// `k = 2 / (period + 1)`.
///
/// `offset` is the input position of `values[0]`; the first EMA value lands
/// at `offset + period - 1`. Shorter inputs give an empty series.
pub fn ema(values: &[f64], offset: usize, period: usize) -> AlignedSeries {
    debug_assert!(period > 0, "EMA period must be positive");
    let first_index = offset + period.saturating_sub(1);

    if period == 0 || values.len() < period {
        return AlignedSeries::new(first_index, Vec::new());
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &price in &values[period..] {
        prev = price * k + prev * (1.0 - k);
        result.push(prev);
    }

    AlignedSeries::new(first_index, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seed_is_simple_mean() {
        let series = ema(&[2.0, 4.0, 6.0, 8.0], 0, 3);
        assert_eq!(series.first_index(), 2);
        assert_eq!(series.values[0], 4.0);
        // k = 0.5
        assert_eq!(series.values[1], 8.0 * 0.5 + 4.0 * 0.5);
        assert_eq!(series.end_index(), 4);
    }

    #[test]
    fn test_ema_too_short_is_empty() {
        let series = ema(&[1.0, 2.0], 5, 3);
        assert!(series.values.is_empty());
        assert_eq!(series.first_index(), 7);
    }

    #[test]
    fn test_difference_aligns_on_later_start() {
        let a = AlignedSeries::new(1, vec![10.0, 20.0, 30.0, 40.0]);
        let b = AlignedSeries::new(3, vec![1.0, 2.0]);
        let diff = a.difference(&b);
        assert_eq!(diff.first_index(), 3);
        assert_eq!(diff.values, &[29.0, 38.0]);
    }

    #[test]
    fn test_into_padded_restores_length() {
        let padded = AlignedSeries::new(2, vec![1.5, 2.5]).into_padded(4);
        assert_eq!(padded, vec![None, None, Some(1.5), Some(2.5)]);
    }

    #[test]
    fn test_starting_at_trims_front() {
        let trimmed = AlignedSeries::new(1, vec![1.0, 2.0, 3.0]).starting_at(2);
        assert_eq!(trimmed, AlignedSeries::new(2, vec![2.0, 3.0]));
    }
}
