//! The environment interface.
//!
//! Modelled on the classic Gym loop: [`Env::reset`] starts an episode and
//! returns the first observation, [`Env::step`] applies one action and
//! returns a [`Step`] with the next observation, the reward, whether the
//! episode has finished and free-form diagnostics.

use std::collections::BTreeMap;

use physics::StateDesc;

use crate::error::EnvError;
use crate::space::BoxSpace;

/// Free-form per-step diagnostics.
pub type Info = BTreeMap<String, String>;

#[derive(Clone, Debug, PartialEq)]
pub enum Observation {
    /// Flat task-specific vector.
    Vector(Vec<f64>),
    /// Full name-keyed simulation snapshot.
    Dict(Box<StateDesc>),
}

impl Observation {
    #[must_use]
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Self::Vector(v) => Some(v.as_slice()),
            Self::Dict(_) => None,
        }
    }

    #[must_use]
    pub fn into_vector(self) -> Option<Vec<f64>> {
        match self {
            Self::Vector(v) => Some(v),
            Self::Dict(_) => None,
        }
    }

    #[must_use]
    pub fn as_dict(&self) -> Option<&StateDesc> {
        match self {
            Self::Vector(_) => None,
            Self::Dict(d) => Some(d.as_ref()),
        }
    }

    /// Replaces every non-finite number with zero. Returns whether anything
    /// was replaced.
    pub fn sanitize(&mut self) -> bool {
        let mut replaced = false;
        let mut scrub = |v: &mut f64| {
            if !v.is_finite() {
                *v = 0.0;
                replaced = true;
            }
        };
        match self {
            Self::Vector(values) => values.iter_mut().for_each(&mut scrub),
            Self::Dict(desc) => desc.for_each_value_mut(&mut scrub),
        }
        replaced
    }
}

/// Options accepted by [`Env::reset`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetOptions {
    /// Draw a fresh target before the episode starts.
    pub random_target: bool,
    /// Return [`Observation::Dict`] instead of [`Observation::Vector`].
    pub obs_as_dict: bool,
}

impl Default for ResetOptions {
    fn default() -> Self {
        Self {
            random_target: true,
            obs_as_dict: true,
        }
    }
}

impl ResetOptions {
    /// Random target, vector observation.
    #[must_use]
    pub fn vector() -> Self {
        Self {
            obs_as_dict: false,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: Info,
}

pub trait Env {
    fn reset(&mut self, options: ResetOptions) -> Result<Observation, EnvError>;

    /// Applies `action` for one simulation step.
    fn step(&mut self, action: &[f64], obs_as_dict: bool) -> Result<Step, EnvError>;

    fn observation_space(&self) -> BoxSpace;

    fn action_space(&self) -> BoxSpace;
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::MuscleDesc;

    #[test]
    fn sanitize_reports_replacements() {
        let mut obs = Observation::Vector(vec![1.0, f64::NAN, f64::INFINITY]);
        assert!(obs.sanitize());
        assert_eq!(obs.as_vector(), Some(&[1.0, 0.0, 0.0][..]));
        assert!(!obs.sanitize());
    }

    #[test]
    fn sanitize_reaches_into_dict() {
        let mut desc = StateDesc::default();
        desc.muscles.insert(
            "BIC".into(),
            MuscleDesc {
                activation: f64::NAN,
                excitation: 0.5,
                force: 1.0,
            },
        );
        let mut obs = Observation::Dict(Box::new(desc));
        assert!(obs.sanitize());
        assert_eq!(obs.as_dict().map(|d| d.muscles["BIC"].activation), Some(0.0));
    }

    #[test]
    fn default_options_follow_gym_defaults() {
        let options = ResetOptions::default();
        assert!(options.random_target);
        assert!(options.obs_as_dict);
        assert!(!ResetOptions::vector().obs_as_dict);
    }
}
