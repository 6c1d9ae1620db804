//! Static spatial configuration for one simulation: obstacles, magic gates,
//! dimensionality.

use std::collections::{HashMap, HashSet};

use crate::coord::{Coord, CoordKey};
use crate::error::EngineError;

/// Immutable per-simulation environment.
///
/// Obstacle membership and gate resolution are both bit-exact coordinate
/// lookups. A gate is applied at most once per step and its destination is
/// committed as-is: destinations are never re-checked against obstacles and
/// never chained into another gate.
#[derive(Debug, Clone)]
pub struct Environment {
    n_dim: usize,
    obstacles: HashSet<CoordKey>,
    gates: HashMap<CoordKey, Coord>,
}

impl Environment {
    /// Build an environment, validating every supplied coordinate.
    ///
    /// Fails with a configuration error when the gate placement and
    /// destination lists differ in length, when any coordinate has the wrong
    /// dimensionality, when a placement is listed twice, or when a coordinate
    /// is both an obstacle and a gate placement.
    pub fn new(
        n_dim: usize,
        obstacles: &[Coord],
        gate_placements: &[Coord],
        gate_dests: &[Coord],
    ) -> Result<Self, EngineError> {
        if n_dim == 0 {
            return Err(EngineError::config("n_dim must be positive"));
        }
        if gate_placements.len() != gate_dests.len() {
            return Err(EngineError::config(format!(
                "magic gates need one destination per placement ({} placements, {} destinations)",
                gate_placements.len(),
                gate_dests.len()
            )));
        }

        let mut obstacle_set = HashSet::with_capacity(obstacles.len());
        for obstacle in obstacles {
            check_dim(n_dim, obstacle, "obstacle")?;
            obstacle_set.insert(obstacle.key());
        }

        let mut gates = HashMap::with_capacity(gate_placements.len());
        for (placement, dest) in gate_placements.iter().zip(gate_dests.iter()) {
            check_dim(n_dim, placement, "gate placement")?;
            check_dim(n_dim, dest, "gate destination")?;
            if obstacle_set.contains(&placement.key()) {
                return Err(EngineError::config(format!(
                    "coordinate {:?} is both an obstacle and a gate placement",
                    placement.components()
                )));
            }
            if gates.insert(placement.key(), dest.clone()).is_some() {
                return Err(EngineError::config(format!(
                    "duplicate gate placement {:?}",
                    placement.components()
                )));
            }
        }

        Ok(Environment {
            n_dim,
            obstacles: obstacle_set,
            gates,
        })
    }

    /// Environment with no obstacles and no gates.
    pub fn empty(n_dim: usize) -> Result<Self, EngineError> {
        Environment::new(n_dim, &[], &[], &[])
    }

    pub fn n_dim(&self) -> usize {
        self.n_dim
    }

    /// Exact membership test against the obstacle set.
    pub fn is_obstacle(&self, coord: &Coord) -> bool {
        self.obstacles.contains(&coord.key())
    }

    /// Teleport through a magic gate if `coord` sits exactly on a placement;
    /// otherwise return `coord` unchanged.
    pub fn resolve(&self, coord: Coord) -> Coord {
        match self.gates.get(&coord.key()) {
            Some(dest) => dest.clone(),
            None => coord,
        }
    }
}

fn check_dim(n_dim: usize, coord: &Coord, what: &str) -> Result<(), EngineError> {
    if coord.dim() != n_dim {
        return Err(EngineError::config(format!(
            "{what} {:?} has {} components, expected {n_dim}",
            coord.components(),
            coord.dim()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Environment;
    use crate::coord::Coord;
    use crate::error::EngineError;

    #[test]
    fn obstacle_membership_is_exact() {
        let env = Environment::new(2, &[Coord::new(vec![1.0, 1.0])], &[], &[]).unwrap();
        assert!(env.is_obstacle(&Coord::new(vec![1.0, 1.0])));
        assert!(!env.is_obstacle(&Coord::new(vec![1.0, 1.0 + 1e-9])));
    }

    #[test]
    fn gate_resolves_to_destination() {
        let env = Environment::new(
            1,
            &[],
            &[Coord::new(vec![1.0])],
            &[Coord::new(vec![5.0])],
        )
        .unwrap();
        assert_eq!(env.resolve(Coord::new(vec![1.0])), Coord::new(vec![5.0]));
        assert_eq!(env.resolve(Coord::new(vec![2.0])), Coord::new(vec![2.0]));
    }

    #[test]
    fn gates_do_not_chain() {
        // 1 -> 2 and 2 -> 3 are both configured; landing on 1 must stop at 2.
        let env = Environment::new(
            1,
            &[],
            &[Coord::new(vec![1.0]), Coord::new(vec![2.0])],
            &[Coord::new(vec![2.0]), Coord::new(vec![3.0])],
        )
        .unwrap();
        assert_eq!(env.resolve(Coord::new(vec![1.0])), Coord::new(vec![2.0]));
    }

    #[test]
    fn mismatched_gate_lists_are_rejected() {
        let err = Environment::new(1, &[], &[Coord::new(vec![1.0])], &[]).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn wrong_dimensionality_is_rejected() {
        let err = Environment::new(2, &[Coord::new(vec![1.0])], &[], &[]).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn obstacle_as_gate_placement_is_rejected() {
        let err = Environment::new(
            1,
            &[Coord::new(vec![1.0])],
            &[Coord::new(vec![1.0])],
            &[Coord::new(vec![4.0])],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn duplicate_gate_placement_is_rejected() {
        let err = Environment::new(
            1,
            &[],
            &[Coord::new(vec![1.0]), Coord::new(vec![1.0])],
            &[Coord::new(vec![2.0]), Coord::new(vec![3.0])],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
