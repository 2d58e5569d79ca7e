//! Observation space descriptions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::EnvironmentError;

/// A continuous box `[low, high]` of observation values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxSpec {
    low: Vec<f64>,
    high: Vec<f64>,
}

impl BoxSpec {
    /// Creates a box, checking that both bounds have the same length and
    /// that `low[i] <= high[i]` for every component.
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> Result<Self, EnvironmentError> {
        if low.len() != high.len() {
            return Err(EnvironmentError::SpecShapeMismatch {
                low: low.len(),
                high: high.len(),
            });
        }
        if let Some(dimension) = low.iter().zip(&high).position(|(lo, hi)| !(lo <= hi)) {
            return Err(EnvironmentError::InvertedSpec { dimension });
        }
        Ok(Self { low, high })
    }

    /// Builds a box from bounds already known to be well formed.
    pub(crate) fn from_parts(low: Vec<f64>, high: Vec<f64>) -> Self {
        debug_assert!(low.len() == high.len());
        Self { low, high }
    }

    /// A box of `len` components, all sharing the same bounds.
    pub fn uniform(len: usize, low: f64, high: f64) -> Result<Self, EnvironmentError> {
        Self::new(vec![low; len], vec![high; len])
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    /// Number of components in an observation.
    pub fn len(&self) -> usize {
        self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }

    /// Returns `true` if `obs` has the right length and lies inside the box.
    pub fn contains(&self, obs: &[f64]) -> bool {
        obs.len() == self.len()
            && obs
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(x, (lo, hi))| lo <= x && x <= hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_lengths() {
        assert_eq!(
            BoxSpec::new(vec![0.0], vec![1.0, 2.0]),
            Err(EnvironmentError::SpecShapeMismatch { low: 1, high: 2 })
        );
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert_eq!(
            BoxSpec::new(vec![0.0, 3.0], vec![1.0, 2.0]),
            Err(EnvironmentError::InvertedSpec { dimension: 1 })
        );
    }

    #[test]
    fn contains_checks_length_and_bounds() {
        let spec = BoxSpec::uniform(2, 0.0, 1.0).unwrap();
        assert!(spec.contains(&[0.0, 1.0]));
        assert!(!spec.contains(&[0.0]));
        assert!(!spec.contains(&[0.5, 1.5]));
    }
}
