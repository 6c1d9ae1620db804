//! Repeated independent runs of one walker configuration, plus the
//! aggregate built from them.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{SimulationSpec, WalkerKind};
use crate::coord::Coord;
use crate::environment::Environment;
use crate::error::EngineError;
use crate::restart::RestartPolicy;
use crate::step::{StepPolicy, DEFAULT_TARGET_TOLERANCE};
use crate::trajectory::Trajectory;
use crate::walker::Walker;

/// Executes `times_to_run` independent walks of one configuration.
///
/// Environment and policies are built once and shared read-only across
/// runs; each run gets a fresh walker and its own seeded RNG stream, so any
/// single run can be replayed in isolation.
#[derive(Debug)]
pub struct SimulationRunner {
    name: String,
    spec: SimulationSpec,
    env: Environment,
    policy: StepPolicy,
    restart: RestartPolicy,
}

impl SimulationRunner {
    pub fn from_spec(name: &str, spec: &SimulationSpec) -> Result<Self, EngineError> {
        spec.validate()?;
        let env = Environment::new(
            spec.n_dim,
            &spec.obstacles,
            &spec.magic_gates_placements,
            &spec.magic_gates_dests,
        )?;
        let policy = build_policy(spec)?;
        let restart = RestartPolicy::new(spec.restart_chance, spec.restart_every)?;
        Ok(SimulationRunner {
            name: name.to_string(),
            spec: spec.clone(),
            env,
            policy,
            restart,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self) -> Result<SimulationResult, EngineError> {
        let mut trajectories = Vec::with_capacity(self.spec.times_to_run);
        for run_id in 0..self.spec.times_to_run {
            let mut rng = ChaCha8Rng::seed_from_u64(run_seed(self.spec.seed, run_id));
            let mut walker = Walker::new(
                &self.env,
                &self.policy,
                &self.restart,
                self.spec.num_of_steps,
            );
            walker.run_to_completion(&mut rng)?;
            trajectories.push(walker.into_trajectory());
        }
        SimulationResult::aggregate(self.name.clone(), self.spec.clone(), trajectories)
    }
}

/// Per-run seed derived from the configured base seed.
fn run_seed(base: u64, run_id: usize) -> u64 {
    base ^ (run_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn build_policy(spec: &SimulationSpec) -> Result<StepPolicy, EngineError> {
    let policy = match spec.walker_type {
        WalkerKind::Regular => StepPolicy::Regular,
        WalkerKind::Step => StepPolicy::Step {
            min_step_size: spec.min_step_size.unwrap_or(0.5),
            max_step_size: spec.max_step_size.unwrap_or(1.5),
        },
        WalkerKind::Grid => StepPolicy::Grid,
        WalkerKind::Biased => StepPolicy::Biased {
            direction: spec.bias_direction.clone(),
            strength: spec.bias_strength.unwrap_or(0.0),
        },
        WalkerKind::Searcher => StepPolicy::Searcher {
            target: spec
                .target
                .clone()
                .ok_or_else(|| EngineError::config("searcher walkers need a target"))?,
            tolerance: spec.target_tolerance.unwrap_or(DEFAULT_TARGET_TOLERANCE),
        },
    };
    policy.validate(spec.n_dim)?;
    Ok(policy)
}

/// Read-only aggregate over all runs of one configuration.
#[derive(Debug)]
pub struct SimulationResult {
    pub name: String,
    pub config: SimulationSpec,
    pub trajectories: Vec<Trajectory>,
    /// Final distance from origin, one entry per run.
    pub endpoint_distances: Vec<f64>,
    /// Steps taken before DONE, one entry per run. Shorter than
    /// `num_of_steps` only for Searcher walks that found their target.
    pub steps_to_completion: Vec<usize>,
}

impl SimulationResult {
    fn aggregate(
        name: String,
        config: SimulationSpec,
        trajectories: Vec<Trajectory>,
    ) -> Result<Self, EngineError> {
        let endpoint_distances = trajectories
            .iter()
            .map(|t| t.final_position().norm())
            .collect();
        let steps_to_completion = trajectories.iter().map(|t| t.steps_taken()).collect();
        Ok(SimulationResult {
            name,
            config,
            trajectories,
            endpoint_distances,
            steps_to_completion,
        })
    }

    pub fn times_run(&self) -> usize {
        self.trajectories.len()
    }

    pub fn n_dim(&self) -> usize {
        self.config.n_dim
    }

    pub fn mean_endpoint_distance(&self) -> f64 {
        mean(&self.endpoint_distances)
    }

    /// Population variance of the per-run endpoint distances.
    pub fn endpoint_distance_variance(&self) -> f64 {
        let mean = self.mean_endpoint_distance();
        mean_by(&self.endpoint_distances, |d| (d - mean) * (d - mean))
    }

    pub fn mean_steps_to_completion(&self) -> f64 {
        mean_by(&self.steps_to_completion, |s| *s as f64)
    }

    /// Average distance from origin after `n` steps. Runs that terminated
    /// earlier (Searcher finds) contribute their final position.
    pub fn mean_distance_from_origin_after(&self, n: usize) -> Result<f64, EngineError> {
        let mut sum = 0.0;
        for trajectory in &self.trajectories {
            sum += trajectory.distance_from_origin_after(n.min(trajectory.steps_taken()))?;
        }
        Ok(sum / self.times_run().max(1) as f64)
    }

    /// Average distance from the configured axis after `n` steps, or `None`
    /// when no axis was configured.
    pub fn mean_distance_from_axis_after(&self, n: usize) -> Result<Option<f64>, EngineError> {
        let Some(axis) = &self.config.axis else {
            return Ok(None);
        };
        let mut sum = 0.0;
        for trajectory in &self.trajectories {
            sum += trajectory.distance_from_axis_after(axis, n.min(trajectory.steps_taken()))?;
        }
        Ok(Some(sum / self.times_run().max(1) as f64))
    }

    /// Average number of y-axis crossings over each full run. `None` for
    /// one-dimensional walks, where the statistic is undefined.
    pub fn mean_times_crossed_y_axis(&self) -> Result<Option<f64>, EngineError> {
        if self.n_dim() < 2 {
            return Ok(None);
        }
        let mut sum = 0.0;
        for trajectory in &self.trajectories {
            sum += trajectory.times_crossed_y_axis_after(trajectory.steps_taken())? as f64;
        }
        Ok(Some(sum / self.times_run().max(1) as f64))
    }

    /// Average step index at which runs first left the configured radius,
    /// counting only runs that did leave it. `None` when no radius was
    /// configured or no run ever exited.
    pub fn mean_radius_exit_step(&self) -> Option<f64> {
        let radius = self.config.radius?;
        let exits: Vec<f64> = self
            .trajectories
            .iter()
            .filter_map(|t| t.exited_radius_at(radius))
            .map(|step| step as f64)
            .collect();
        if exits.is_empty() {
            return None;
        }
        Some(mean(&exits))
    }

    /// Position-wise mean path across runs, for plotting. Index `i` averages
    /// over every trajectory that recorded at least `i + 1` positions.
    pub fn average_path(&self) -> Vec<Coord> {
        let longest = self
            .trajectories
            .iter()
            .map(|t| t.len())
            .max()
            .unwrap_or(0);
        let n_dim = self.n_dim();
        let mut averaged = Vec::with_capacity(longest);

        for i in 0..longest {
            let mut sum = vec![0.0; n_dim];
            let mut count = 0.0;
            for trajectory in &self.trajectories {
                if let Some(position) = trajectory.positions().get(i) {
                    for (acc, c) in sum.iter_mut().zip(position.components()) {
                        *acc += c;
                    }
                    count += 1.0;
                }
            }
            averaged.push(Coord::new(sum.into_iter().map(|c| c / count).collect()));
        }
        averaged
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn mean_by<T>(values: &[T], f: impl Fn(&T) -> f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(f).sum::<f64>() / values.len() as f64
}
