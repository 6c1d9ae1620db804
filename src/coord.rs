//! Immutable points in n-dimensional space.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A point (or displacement) in n-dimensional space.
///
/// Every operation returns a new value; coordinates never mutate in place.
/// Equality is exact component-wise comparison, which is what the obstacle
/// and gate lookups rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coord(Vec<f64>);

/// Bit-exact lookup key for obstacle/gate membership tests.
///
/// `-0.0` is folded into `0.0` so the key relation matches `==` on floats.
pub(crate) type CoordKey = Vec<u64>;

impl Coord {
    pub fn new(components: Vec<f64>) -> Self {
        Coord(components)
    }

    /// All-zero coordinate of the given dimensionality.
    pub fn origin(n_dim: usize) -> Self {
        Coord(vec![0.0; n_dim])
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn components(&self) -> &[f64] {
        &self.0
    }

    /// Component-wise sum with a displacement of the same dimensionality.
    pub fn add(&self, delta: &Coord) -> Result<Coord, EngineError> {
        self.check_dim(delta)?;
        Ok(Coord(
            self.0
                .iter()
                .zip(delta.0.iter())
                .map(|(a, b)| a + b)
                .collect(),
        ))
    }

    /// Euclidean distance to another coordinate of the same dimensionality.
    pub fn distance_to(&self, other: &Coord) -> Result<f64, EngineError> {
        self.check_dim(other)?;
        let sum_sq: f64 = self
            .0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        Ok(sum_sq.sqrt())
    }

    /// Euclidean norm, i.e. distance from the origin.
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &Coord) -> Result<f64, EngineError> {
        self.check_dim(other)?;
        Ok(self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum())
    }

    /// Scale every component by `factor`.
    pub fn scale(&self, factor: f64) -> Coord {
        Coord(self.0.iter().map(|c| c * factor).collect())
    }

    pub(crate) fn key(&self) -> CoordKey {
        self.0
            .iter()
            .map(|c| {
                let c = if *c == 0.0 { 0.0_f64 } else { *c };
                c.to_bits()
            })
            .collect()
    }

    fn check_dim(&self, other: &Coord) -> Result<(), EngineError> {
        if self.dim() != other.dim() {
            return Err(EngineError::DimensionMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        Ok(())
    }
}

impl From<Vec<f64>> for Coord {
    fn from(components: Vec<f64>) -> Self {
        Coord(components)
    }
}

#[cfg(test)]
mod tests {
    use super::Coord;
    use crate::error::EngineError;
    use proptest::prelude::*;

    #[test]
    fn add_is_component_wise() {
        let a = Coord::new(vec![1.0, -2.0]);
        let b = Coord::new(vec![0.5, 3.0]);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum, Coord::new(vec![1.5, 1.0]));
    }

    #[test]
    fn add_rejects_mismatched_dimensions() {
        let a = Coord::new(vec![1.0, 2.0]);
        let b = Coord::new(vec![1.0, 2.0, 3.0]);
        let err = a.add(&b).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn distance_matches_euclidean_norm() {
        let a = Coord::new(vec![0.0, 0.0]);
        let b = Coord::new(vec![3.0, 4.0]);
        assert_eq!(a.distance_to(&b).unwrap(), 5.0);
        assert_eq!(b.norm(), 5.0);
    }

    #[test]
    fn negative_zero_shares_a_key_with_zero() {
        let a = Coord::new(vec![0.0, 1.0]);
        let b = Coord::new(vec![-0.0, 1.0]);
        assert_eq!(a.key(), b.key());
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            a in proptest::collection::vec(-1e6_f64..1e6, 3),
            b in proptest::collection::vec(-1e6_f64..1e6, 3),
        ) {
            let a = Coord::new(a);
            let b = Coord::new(b);
            let d_ab = a.distance_to(&b).unwrap();
            let d_ba = b.distance_to(&a).unwrap();
            prop_assert!((d_ab - d_ba).abs() < 1e-9);
        }

        #[test]
        fn adding_origin_is_identity(
            a in proptest::collection::vec(-1e6_f64..1e6, 4),
        ) {
            let a = Coord::new(a);
            let sum = a.add(&Coord::origin(4)).unwrap();
            prop_assert_eq!(sum, a);
        }
    }
}
