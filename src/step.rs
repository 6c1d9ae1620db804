//! Per-step movement rules, one variant per walker type.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::coord::Coord;
use crate::error::EngineError;

/// Default radius within which a Searcher counts its target as found.
pub const DEFAULT_TARGET_TOLERANCE: f64 = 0.5;

/// Movement rule for one walker variant.
///
/// `propose_delta` only produces a displacement; obstacle handling, gate
/// resolution, and restarts belong to the walker. Given the same RNG stream
/// a policy always proposes the same deltas.
#[derive(Debug, Clone)]
pub enum StepPolicy {
    /// Unit step in a uniformly random direction.
    Regular,
    /// Random direction with a step length drawn uniformly per step.
    Step { min_step_size: f64, max_step_size: f64 },
    /// Unit step along one axis, axis and sign uniform. A lattice walk.
    Grid,
    /// Random direction blended toward a preferred one. With no configured
    /// direction the bias points back at the origin.
    Biased {
        direction: Option<Coord>,
        strength: f64,
    },
    /// Moves like `Regular`; the walk terminates once the position comes
    /// within `tolerance` of `target`.
    Searcher { target: Coord, tolerance: f64 },
}

impl StepPolicy {
    /// Check the policy's own parameters against the walk dimensionality.
    pub fn validate(&self, n_dim: usize) -> Result<(), EngineError> {
        match self {
            StepPolicy::Regular | StepPolicy::Grid => Ok(()),
            StepPolicy::Step {
                min_step_size,
                max_step_size,
            } => {
                if *min_step_size <= 0.0 || *max_step_size <= 0.0 {
                    return Err(EngineError::config("step sizes must be positive"));
                }
                if min_step_size > max_step_size {
                    return Err(EngineError::config(
                        "min_step_size must not exceed max_step_size",
                    ));
                }
                Ok(())
            }
            StepPolicy::Biased {
                direction,
                strength,
            } => {
                if !(0.0..=1.0).contains(strength) {
                    return Err(EngineError::config(
                        "bias_strength must be between 0 and 1",
                    ));
                }
                if let Some(dir) = direction {
                    if dir.dim() != n_dim {
                        return Err(EngineError::config(format!(
                            "bias_direction has {} components, expected {n_dim}",
                            dir.dim()
                        )));
                    }
                    if (dir.norm() - 1.0).abs() > 1e-9 {
                        return Err(EngineError::config("bias_direction must be a unit vector"));
                    }
                }
                Ok(())
            }
            StepPolicy::Searcher { target, tolerance } => {
                if target.dim() != n_dim {
                    return Err(EngineError::config(format!(
                        "target has {} components, expected {n_dim}",
                        target.dim()
                    )));
                }
                if *tolerance <= 0.0 {
                    return Err(EngineError::config("target_tolerance must be positive"));
                }
                Ok(())
            }
        }
    }

    /// Produce the next displacement for a walker at `position`.
    pub fn propose_delta<R: Rng>(&self, position: &Coord, rng: &mut R) -> Coord {
        let n_dim = position.dim();
        match self {
            StepPolicy::Regular | StepPolicy::Searcher { .. } => random_unit_vector(n_dim, rng),
            StepPolicy::Step {
                min_step_size,
                max_step_size,
            } => {
                let length = rng.gen_range(*min_step_size..=*max_step_size);
                random_unit_vector(n_dim, rng).scale(length)
            }
            StepPolicy::Grid => {
                let axis = rng.gen_range(0..n_dim);
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                let mut delta = vec![0.0; n_dim];
                delta[axis] = sign;
                Coord::new(delta)
            }
            StepPolicy::Biased {
                direction,
                strength,
            } => biased_delta(position, direction.as_ref(), *strength, rng),
        }
    }

    /// Whether a Searcher at `position` has found its target. Always false
    /// for the other variants.
    pub fn reached_target(&self, position: &Coord) -> bool {
        match self {
            StepPolicy::Searcher { target, tolerance } => position
                .distance_to(target)
                .map(|d| d < *tolerance)
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// Uniformly random direction on the unit sphere, sampled as normalized
/// independent Gaussian components.
fn random_unit_vector<R: Rng>(n_dim: usize, rng: &mut R) -> Coord {
    loop {
        let components: Vec<f64> = (0..n_dim).map(|_| rng.sample(StandardNormal)).collect();
        let norm = components.iter().map(|c| c * c).sum::<f64>().sqrt();
        if norm > 1e-12 {
            return Coord::new(components.iter().map(|c| c / norm).collect());
        }
    }
}

fn biased_delta<R: Rng>(
    position: &Coord,
    direction: Option<&Coord>,
    strength: f64,
    rng: &mut R,
) -> Coord {
    let random_dir = random_unit_vector(position.dim(), rng);
    let bias_dir = match direction {
        Some(dir) => dir.clone(),
        // Unconfigured bias pulls back toward the origin; zero at the origin
        // itself, where there is no pull direction.
        None => {
            let toward_origin = position.scale(-1.0);
            let norm = toward_origin.norm();
            if norm > 1e-12 {
                toward_origin.scale(1.0 / norm)
            } else {
                Coord::origin(position.dim())
            }
        }
    };

    let blended = Coord::new(
        random_dir
            .components()
            .iter()
            .zip(bias_dir.components().iter())
            .map(|(r, b)| (1.0 - strength) * r + strength * b)
            .collect(),
    );
    let norm = blended.norm();
    if norm > 1e-12 {
        blended.scale(1.0 / norm)
    } else {
        // Full-strength bias with no pull direction degenerates; fall back to
        // the unbiased draw.
        random_dir
    }
}

#[cfg(test)]
mod tests {
    use super::{StepPolicy, DEFAULT_TARGET_TOLERANCE};
    use crate::coord::Coord;
    use crate::error::EngineError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn regular_delta_has_unit_norm() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let origin = Coord::origin(4);
        for _ in 0..50 {
            let delta = StepPolicy::Regular.propose_delta(&origin, &mut rng);
            assert!((delta.norm() - 1.0).abs() < 1e-9);
            assert_eq!(delta.dim(), 4);
        }
    }

    #[test]
    fn grid_delta_is_a_signed_basis_vector() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let origin = Coord::origin(3);
        for _ in 0..100 {
            let delta = StepPolicy::Grid.propose_delta(&origin, &mut rng);
            let nonzero: Vec<f64> = delta
                .components()
                .iter()
                .copied()
                .filter(|c| *c != 0.0)
                .collect();
            assert_eq!(nonzero.len(), 1);
            assert_eq!(nonzero[0].abs(), 1.0);
            assert_eq!(delta.norm(), 1.0);
        }
    }

    #[test]
    fn step_length_stays_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let policy = StepPolicy::Step {
            min_step_size: 0.5,
            max_step_size: 1.5,
        };
        let origin = Coord::origin(2);
        for _ in 0..100 {
            let norm = policy.propose_delta(&origin, &mut rng).norm();
            assert!((0.5..=1.5 + 1e-9).contains(&norm));
        }
    }

    #[test]
    fn full_strength_bias_follows_the_configured_direction() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let policy = StepPolicy::Biased {
            direction: Some(Coord::new(vec![1.0, 0.0])),
            strength: 1.0,
        };
        let delta = policy.propose_delta(&Coord::origin(2), &mut rng);
        assert!((delta.components()[0] - 1.0).abs() < 1e-9);
        assert!(delta.components()[1].abs() < 1e-9);
    }

    #[test]
    fn unconfigured_bias_pulls_toward_origin() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let policy = StepPolicy::Biased {
            direction: None,
            strength: 1.0,
        };
        let delta = policy.propose_delta(&Coord::new(vec![10.0, 0.0]), &mut rng);
        assert!((delta.components()[0] + 1.0).abs() < 1e-9);
    }

    #[test]
    fn same_seed_proposes_the_same_deltas() {
        let origin = Coord::origin(3);
        let mut a = ChaCha8Rng::seed_from_u64(21);
        let mut b = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..20 {
            let da = StepPolicy::Regular.propose_delta(&origin, &mut a);
            let db = StepPolicy::Regular.propose_delta(&origin, &mut b);
            assert_eq!(da, db);
        }
    }

    #[test]
    fn searcher_detects_the_target_within_tolerance() {
        let policy = StepPolicy::Searcher {
            target: Coord::new(vec![2.0, 0.0]),
            tolerance: DEFAULT_TARGET_TOLERANCE,
        };
        assert!(policy.reached_target(&Coord::new(vec![2.2, 0.0])));
        assert!(!policy.reached_target(&Coord::new(vec![3.0, 0.0])));
        assert!(!StepPolicy::Regular.reached_target(&Coord::origin(2)));
    }

    #[test]
    fn invalid_step_bounds_are_rejected() {
        let policy = StepPolicy::Step {
            min_step_size: 2.0,
            max_step_size: 1.0,
        };
        assert!(matches!(
            policy.validate(2),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn bias_direction_must_be_a_unit_vector_of_matching_dimension() {
        let wrong_norm = StepPolicy::Biased {
            direction: Some(Coord::new(vec![1.0, 1.0])),
            strength: 0.5,
        };
        assert!(wrong_norm.validate(2).is_err());

        let wrong_dim = StepPolicy::Biased {
            direction: Some(Coord::new(vec![1.0])),
            strength: 0.5,
        };
        assert!(wrong_dim.validate(2).is_err());
    }
}
