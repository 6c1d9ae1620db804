//! Completed walk paths and the statistics reported on them.

use crate::coord::Coord;
use crate::error::EngineError;

/// The full ordered position history of one completed run, starting at the
/// origin. Immutable once the run ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    positions: Vec<Coord>,
}

impl Trajectory {
    pub(crate) fn new(positions: Vec<Coord>) -> Self {
        debug_assert!(!positions.is_empty());
        Trajectory { positions }
    }

    pub fn positions(&self) -> &[Coord] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of steps taken; one less than the number of recorded positions.
    pub fn steps_taken(&self) -> usize {
        self.positions.len() - 1
    }

    pub fn final_position(&self) -> &Coord {
        // A trajectory always contains at least the origin.
        self.positions
            .last()
            .expect("trajectory contains at least the origin")
    }

    /// Distance from the origin after `n` steps.
    pub fn distance_from_origin_after(&self, n: usize) -> Result<f64, EngineError> {
        Ok(self.position_after(n)?.norm())
    }

    /// Distance from the line spanned by the unit vector `axis` after `n`
    /// steps, measured by rejecting the projection onto the axis.
    pub fn distance_from_axis_after(&self, axis: &Coord, n: usize) -> Result<f64, EngineError> {
        let position = self.position_after(n)?;
        let projection = axis.scale(position.dot(axis)?);
        let rejection: f64 = position
            .components()
            .iter()
            .zip(projection.components().iter())
            .map(|(p, q)| (p - q) * (p - q))
            .sum();
        Ok(rejection.sqrt())
    }

    /// How many times the second component changed sign over the first `n`
    /// steps. Requires at least two dimensions.
    pub fn times_crossed_y_axis_after(&self, n: usize) -> Result<usize, EngineError> {
        let end = self.position_after(n)?;
        if end.dim() < 2 {
            return Err(EngineError::DimensionMismatch {
                expected: 2,
                actual: end.dim(),
            });
        }
        let mut count = 0;
        for window in self.positions[..=n].windows(2) {
            let before = window[0].components()[1];
            let after = window[1].components()[1];
            if (before > 0.0 && after <= 0.0) || (before < 0.0 && after >= 0.0) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// First step index at which the walker was farther than `radius` from
    /// the origin, or `None` if it never left the radius.
    pub fn exited_radius_at(&self, radius: f64) -> Option<usize> {
        self.positions.iter().position(|p| p.norm() > radius)
    }

    fn position_after(&self, n: usize) -> Result<&Coord, EngineError> {
        self.positions.get(n).ok_or(EngineError::StepOutOfRange {
            index: n,
            len: self.positions.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Trajectory;
    use crate::coord::Coord;
    use crate::error::EngineError;

    fn path(points: &[&[f64]]) -> Trajectory {
        Trajectory::new(points.iter().map(|p| Coord::new(p.to_vec())).collect())
    }

    #[test]
    fn distance_from_origin_after_n_steps() {
        let t = path(&[&[0.0, 0.0], &[1.0, 0.0], &[3.0, 4.0]]);
        assert_eq!(t.distance_from_origin_after(0).unwrap(), 0.0);
        assert_eq!(t.distance_from_origin_after(2).unwrap(), 5.0);
    }

    #[test]
    fn out_of_range_step_is_an_error() {
        let t = path(&[&[0.0], &[1.0]]);
        assert!(matches!(
            t.distance_from_origin_after(5),
            Err(EngineError::StepOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn distance_from_axis_is_the_rejection_norm() {
        let t = path(&[&[0.0, 0.0], &[3.0, 4.0]]);
        let x_axis = Coord::new(vec![1.0, 0.0]);
        assert!((t.distance_from_axis_after(&x_axis, 1).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn y_axis_crossings_count_sign_changes() {
        let t = path(&[
            &[0.0, 1.0],
            &[0.0, -1.0],
            &[0.0, -2.0],
            &[0.0, 3.0],
            &[0.0, 0.0],
        ]);
        assert_eq!(t.times_crossed_y_axis_after(4).unwrap(), 3);
        assert_eq!(t.times_crossed_y_axis_after(1).unwrap(), 1);
    }

    #[test]
    fn crossings_need_two_dimensions() {
        let t = path(&[&[0.0], &[1.0]]);
        assert!(matches!(
            t.times_crossed_y_axis_after(1),
            Err(EngineError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn radius_exit_reports_the_first_step_outside() {
        let t = path(&[&[0.0], &[1.0], &[3.0], &[1.0]]);
        assert_eq!(t.exited_radius_at(2.0), Some(2));
        assert_eq!(t.exited_radius_at(10.0), None);
    }
}
