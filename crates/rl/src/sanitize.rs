//! Non-finite scrubbing for batched consumers.

use tracing::warn;

use crate::env::{Env, Observation, ResetOptions, Step};
use crate::error::EnvError;
use crate::space::BoxSpace;

/// Wraps an [`Env`] so that no NaN or infinity crosses its boundary.
///
/// Non-finite action entries are zeroed before they reach the inner
/// environment. A non-finite observation after a step is zeroed too, ends the
/// episode and costs `nan_penalty` reward.
pub struct Sanitized<E: Env> {
    inner: E,
    nan_penalty: f64,
}

impl<E: Env> Sanitized<E> {
    #[must_use]
    pub fn new(inner: E, nan_penalty: f64) -> Self {
        Self { inner, nan_penalty }
    }

    #[must_use]
    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> E {
        self.inner
    }

    #[must_use]
    pub fn nan_penalty(&self) -> f64 {
        self.nan_penalty
    }
}

impl<E: Env> Env for Sanitized<E> {
    fn reset(&mut self, options: ResetOptions) -> Result<Observation, EnvError> {
        let mut observation = self.inner.reset(options)?;
        if observation.sanitize() {
            warn!("non-finite values in the reset observation were zeroed");
        }
        Ok(observation)
    }

    fn step(&mut self, action: &[f64], obs_as_dict: bool) -> Result<Step, EnvError> {
        let mut scrubbed = false;
        let action: Vec<f64> = action
            .iter()
            .map(|&a| {
                if a.is_finite() {
                    a
                } else {
                    scrubbed = true;
                    0.0
                }
            })
            .collect();
        if scrubbed {
            warn!("non-finite action entries were zeroed");
        }

        let mut step = self.inner.step(&action, obs_as_dict)?;
        if step.observation.sanitize() {
            warn!(
                penalty = self.nan_penalty,
                "non-finite observation; ending the episode"
            );
            step.done = true;
            step.reward -= self.nan_penalty;
        }
        Ok(step)
    }

    fn observation_space(&self) -> BoxSpace {
        self.inner.observation_space()
    }

    fn action_space(&self) -> BoxSpace {
        self.inner.action_space()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Info;

    /// Echoes the last action as the observation.
    struct Echo {
        reward: f64,
    }

    impl Env for Echo {
        fn reset(&mut self, _options: ResetOptions) -> Result<Observation, EnvError> {
            Ok(Observation::Vector(vec![f64::NAN, 1.0]))
        }

        fn step(&mut self, action: &[f64], _obs_as_dict: bool) -> Result<Step, EnvError> {
            Ok(Step {
                observation: Observation::Vector(action.to_vec()),
                reward: self.reward,
                done: false,
                info: Info::new(),
            })
        }

        fn observation_space(&self) -> BoxSpace {
            BoxSpace::unbounded(2)
        }

        fn action_space(&self) -> BoxSpace {
            BoxSpace::uniform(2, 0.0, 1.0)
        }
    }

    /// Always reports a blown-up observation.
    struct Diverging;

    impl Env for Diverging {
        fn reset(&mut self, _options: ResetOptions) -> Result<Observation, EnvError> {
            Ok(Observation::Vector(vec![0.0, 0.0]))
        }

        fn step(&mut self, _action: &[f64], _obs_as_dict: bool) -> Result<Step, EnvError> {
            Ok(Step {
                observation: Observation::Vector(vec![f64::NAN, f64::NEG_INFINITY]),
                reward: 0.5,
                done: false,
                info: Info::new(),
            })
        }

        fn observation_space(&self) -> BoxSpace {
            BoxSpace::unbounded(2)
        }

        fn action_space(&self) -> BoxSpace {
            BoxSpace::uniform(1, 0.0, 1.0)
        }
    }

    #[test]
    fn diverged_observation_ends_episode_with_penalty() {
        let mut env = Sanitized::new(Diverging, 10.0);
        let step = env.step(&[0.0], false).unwrap();
        assert_eq!(step.observation, Observation::Vector(vec![0.0, 0.0]));
        assert!(step.done);
        assert_eq!(step.reward, 0.5 - 10.0);
    }

    #[test]
    fn reset_zeroes_nan() {
        let mut env = Sanitized::new(Echo { reward: 0.5 }, 10.0);
        let obs = env.reset(ResetOptions::vector()).unwrap();
        assert_eq!(obs, Observation::Vector(vec![0.0, 1.0]));
    }

    #[test]
    fn nan_action_is_zeroed_before_forwarding() {
        let mut env = Sanitized::new(Echo { reward: 0.5 }, 10.0);
        let step = env.step(&[f64::NAN, 0.3], false).unwrap();
        assert_eq!(step.observation, Observation::Vector(vec![0.0, 0.3]));
        assert!(!step.done);
        assert_eq!(step.reward, 0.5);
    }

    #[test]
    fn finite_step_passes_through_unchanged() {
        let mut env = Sanitized::new(Echo { reward: 0.25 }, 10.0);
        let step = env.step(&[0.1, 0.2], false).unwrap();
        assert_eq!(step.observation, Observation::Vector(vec![0.1, 0.2]));
        assert_eq!(step.reward, 0.25);
        assert!(!step.done);
        assert!(step.info.is_empty());
    }
}
