//! Position restart rules, evaluated once per committed step.

use rand::Rng;

use crate::error::EngineError;

/// Decides whether a walker's position snaps back to the origin after a step.
///
/// Two independent triggers: a per-step probability and a periodic
/// step-count rule. A restart only overrides the recorded position; the step
/// index and step budget are untouched.
#[derive(Debug, Clone)]
pub struct RestartPolicy {
    chance: f64,
    every: Option<usize>,
}

impl RestartPolicy {
    pub fn new(chance: f64, every: Option<usize>) -> Result<Self, EngineError> {
        if !(0.0..=1.0).contains(&chance) {
            return Err(EngineError::config(
                "restart_chance must be between 0 and 1",
            ));
        }
        if every == Some(0) {
            return Err(EngineError::config("restart_every must be positive"));
        }
        Ok(RestartPolicy { chance, every })
    }

    /// Policy that never restarts.
    pub fn never() -> Self {
        RestartPolicy {
            chance: 0.0,
            every: None,
        }
    }

    /// Evaluate both triggers for the step that just committed.
    /// `step_index` is the 1-based count of steps taken so far.
    pub fn should_restart<R: Rng>(&self, step_index: usize, rng: &mut R) -> bool {
        if let Some(every) = self.every {
            if step_index % every == 0 {
                return true;
            }
        }
        self.chance > 0.0 && rng.gen_bool(self.chance)
    }
}

#[cfg(test)]
mod tests {
    use super::RestartPolicy;
    use crate::error::EngineError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn never_policy_never_triggers() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let policy = RestartPolicy::never();
        assert!((1..=100).all(|step| !policy.should_restart(step, &mut rng)));
    }

    #[test]
    fn certain_chance_always_triggers() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let policy = RestartPolicy::new(1.0, None).unwrap();
        assert!((1..=20).all(|step| policy.should_restart(step, &mut rng)));
    }

    #[test]
    fn periodic_trigger_fires_on_multiples_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let policy = RestartPolicy::new(0.0, Some(3)).unwrap();
        let fired: Vec<usize> = (1..=9)
            .filter(|step| policy.should_restart(*step, &mut rng))
            .collect();
        assert_eq!(fired, vec![3, 6, 9]);
    }

    #[test]
    fn out_of_range_chance_is_rejected() {
        assert!(matches!(
            RestartPolicy::new(1.5, None),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            RestartPolicy::new(-0.1, None),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn zero_period_is_rejected() {
        assert!(matches!(
            RestartPolicy::new(0.0, Some(0)),
            Err(EngineError::Config(_))
        ));
    }
}
