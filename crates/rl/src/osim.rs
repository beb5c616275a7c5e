//! Generic environment driver.

use physics::{MusculoSim, Simulation, StateDesc};
use tracing::{debug, info};

use crate::env::{Env, Info, Observation, ResetOptions, Step};
use crate::error::EnvError;
use crate::space::BoxSpace;
use crate::task::Task;

/// Couples a [`Simulation`] with a [`Task`].
///
/// The driver owns the simulation outright. It runs the task's construction
/// hooks, enforces `time_limit` and remembers the state snapshot taken
/// before the most recent step.
pub struct OsimEnv<T: Task, S: Simulation = MusculoSim> {
    sim: S,
    task: T,
    time_limit: usize,
    prev_state_desc: Option<StateDesc>,
}

impl<T: Task, S: Simulation> OsimEnv<T, S> {
    /// Attaches the task to an unfinalized simulation, initializes the
    /// system and resets it.
    pub fn new(mut sim: S, mut task: T, time_limit: usize) -> Result<Self, EnvError> {
        task.attach(&mut sim)?;
        sim.init_system()?;
        task.on_init(&mut sim)?;
        sim.reset()?;
        info!(
            actuators = sim.noutput(),
            observation = task.observation_space_size(),
            time_limit,
            "environment ready"
        );
        Ok(Self {
            sim,
            task,
            time_limit,
            prev_state_desc: None,
        })
    }

    #[must_use]
    pub fn sim(&self) -> &S {
        &self.sim
    }

    #[must_use]
    pub fn task(&self) -> &T {
        &self.task
    }

    pub fn task_mut(&mut self) -> &mut T {
        &mut self.task
    }

    #[must_use]
    pub fn time_limit(&self) -> usize {
        self.time_limit
    }

    /// Steps taken in the current episode.
    #[must_use]
    pub fn istep(&self) -> usize {
        self.sim.istep()
    }

    /// Snapshot taken just before the last [`Env::step`].
    #[must_use]
    pub fn prev_state_desc(&self) -> Option<&StateDesc> {
        self.prev_state_desc.as_ref()
    }

    pub fn seed(&mut self, seed: u64) {
        self.task.seed(seed);
    }

    pub fn get_state_desc(&self) -> Result<StateDesc, EnvError> {
        Ok(self.sim.state_desc()?)
    }

    #[must_use]
    pub fn get_observation_space_size(&self) -> usize {
        self.task.observation_space_size()
    }

    /// The task's flat observation of the current state.
    pub fn get_observation(&self) -> Result<Vec<f64>, EnvError> {
        self.vector_observation(&self.sim.state_desc()?)
    }

    pub fn reward(&self) -> Result<f64, EnvError> {
        self.task.reward(&self.sim.state_desc()?)
    }

    /// Rebuilds the integrator from the current state. Needed after editing
    /// state outside of [`Env::reset`].
    pub fn reset_manager(&mut self) -> Result<(), EnvError> {
        Ok(self.sim.reset_manager()?)
    }

    pub(crate) fn task_and_sim(&mut self) -> (&mut T, &mut S) {
        (&mut self.task, &mut self.sim)
    }

    fn vector_observation(&self, desc: &StateDesc) -> Result<Vec<f64>, EnvError> {
        let obs = self.task.observation(desc)?;
        let expected = self.task.observation_space_size();
        if obs.len() != expected {
            return Err(EnvError::ObservationSize {
                expected,
                actual: obs.len(),
            });
        }
        Ok(obs)
    }

    fn observe(&self, desc: StateDesc, as_dict: bool) -> Result<Observation, EnvError> {
        if as_dict {
            Ok(Observation::Dict(Box::new(desc)))
        } else {
            self.vector_observation(&desc).map(Observation::Vector)
        }
    }
}

impl<T: Task, S: Simulation> Env for OsimEnv<T, S> {
    fn reset(&mut self, options: ResetOptions) -> Result<Observation, EnvError> {
        self.sim.reset()?;
        self.prev_state_desc = None;
        self.task.on_reset(&mut self.sim, options.random_target)?;
        self.sim.reset_manager()?;
        debug!(random_target = options.random_target, "episode reset");
        let desc = self.sim.state_desc()?;
        self.observe(desc, options.obs_as_dict)
    }

    fn step(&mut self, action: &[f64], obs_as_dict: bool) -> Result<Step, EnvError> {
        self.prev_state_desc = Some(self.sim.state_desc()?);
        self.sim.actuate(action)?;
        self.sim.integrate()?;

        let desc = self.sim.state_desc()?;
        let reward = self.task.reward(&desc)?;
        let done = self.task.is_done(&desc) || self.sim.istep() >= self.time_limit;
        debug!(istep = self.sim.istep(), reward, done, "step");
        Ok(Step {
            observation: self.observe(desc, obs_as_dict)?,
            reward,
            done,
            info: Info::new(),
        })
    }

    fn observation_space(&self) -> BoxSpace {
        BoxSpace::unbounded(self.task.observation_space_size())
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace::uniform(self.sim.noutput(), 0.0, 1.0)
    }
}
