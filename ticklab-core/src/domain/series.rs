//! PriceSeries — immutable ordered sequence of ticks.

use crate::domain::tick::PriceSample;

/// The full tick history for one instrument, in arrival order.
///
/// Built once by a loader and then shared read-only: every worker thread in a
/// sweep borrows the same series without locking.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    samples: Vec<PriceSample>,
}

impl PriceSeries {
    pub fn new(samples: Vec<PriceSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PriceSample> {
        self.samples.get(index)
    }

    pub fn last(&self) -> Option<&PriceSample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceSample> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[PriceSample] {
        &self.samples
    }
}

impl FromIterator<PriceSample> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PriceSample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series() {
        let series = PriceSeries::default();
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert!(series.last().is_none());
    }

    #[test]
    fn ordered_access() {
        let series: PriceSeries = (0..3)
            .map(|i| PriceSample::new(100.0 + i as f64, 101.0 + i as f64))
            .collect();
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(1).unwrap().bid, 101.0);
        assert_eq!(series.last().unwrap().bid, 102.0);
    }
}
