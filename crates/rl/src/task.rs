use physics::{Simulation, StateDesc};

use crate::error::EnvError;

/// Task-specific behaviour plugged into [`crate::OsimEnv`].
///
/// The driver owns the simulation; tasks only see it through these hooks.
pub trait Task {
    /// Adds task components to the model. Runs once, before the system is
    /// initialized.
    fn attach(&mut self, _sim: &mut dyn Simulation) -> Result<(), EnvError> {
        Ok(())
    }

    /// Runs once, right after the system is initialized.
    fn on_init(&mut self, _sim: &mut dyn Simulation) -> Result<(), EnvError> {
        Ok(())
    }

    /// Runs after the simulation has been reset to its default state and
    /// before the integrator is rebuilt, so state edits made here take effect.
    fn on_reset(&mut self, sim: &mut dyn Simulation, random: bool) -> Result<(), EnvError>;

    fn observation(&self, desc: &StateDesc) -> Result<Vec<f64>, EnvError>;

    fn observation_space_size(&self) -> usize;

    fn reward(&self, desc: &StateDesc) -> Result<f64, EnvError>;

    /// Task-level termination. The time limit is enforced by the driver.
    fn is_done(&self, _desc: &StateDesc) -> bool {
        false
    }

    /// Reseeds the task's random source.
    fn seed(&mut self, _seed: u64) {}
}
