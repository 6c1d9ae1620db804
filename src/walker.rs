//! The per-run step state machine.

use rand::Rng;

use crate::coord::Coord;
use crate::environment::Environment;
use crate::error::EngineError;
use crate::restart::RestartPolicy;
use crate::step::StepPolicy;
use crate::trajectory::Trajectory;

/// One simulated entity walking under a step policy inside an environment.
///
/// A walker starts ACTIVE at the origin and becomes DONE either when its
/// step budget is exhausted or, for Searcher policies, when it comes within
/// tolerance of the target. `advance` is a no-op once DONE.
#[derive(Debug)]
pub struct Walker<'a> {
    env: &'a Environment,
    policy: &'a StepPolicy,
    restart: &'a RestartPolicy,
    num_of_steps: usize,
    position: Coord,
    step_index: usize,
    done: bool,
    path: Vec<Coord>,
}

impl<'a> Walker<'a> {
    pub fn new(
        env: &'a Environment,
        policy: &'a StepPolicy,
        restart: &'a RestartPolicy,
        num_of_steps: usize,
    ) -> Self {
        let origin = Coord::origin(env.n_dim());
        Walker {
            env,
            policy,
            restart,
            num_of_steps,
            position: origin.clone(),
            step_index: 0,
            // A zero budget is already exhausted; the config path rejects it,
            // but `Walker` must terminate for any direct caller too.
            done: num_of_steps == 0,
            path: vec![origin],
        }
    }

    pub fn position(&self) -> &Coord {
        &self.position
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Take one step: propose a delta, reject it if it lands on an obstacle
    /// (the walker stays put but the step still counts), teleport through a
    /// gate if it lands on a placement, then let the restart policy override
    /// the committed position. Exactly one position is recorded per call.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        if self.done {
            return Ok(());
        }

        let delta = self.policy.propose_delta(&self.position, rng);
        let candidate = self.position.add(&delta)?;
        let mut next = if self.env.is_obstacle(&candidate) {
            self.position.clone()
        } else {
            self.env.resolve(candidate)
        };

        self.step_index += 1;
        if self.restart.should_restart(self.step_index, rng) {
            next = Coord::origin(self.env.n_dim());
        }

        self.position = next;
        self.path.push(self.position.clone());

        // Target distance is evaluated after a restart takes effect, so a
        // restart can prevent a premature find.
        if self.policy.reached_target(&self.position) {
            self.done = true;
        }
        if self.step_index >= self.num_of_steps {
            self.done = true;
        }
        Ok(())
    }

    /// Advance until DONE.
    pub fn run_to_completion<R: Rng>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        while !self.done {
            self.advance(rng)?;
        }
        Ok(())
    }

    pub fn into_trajectory(self) -> Trajectory {
        Trajectory::new(self.path)
    }
}
