//! Integration manager.
//!
//! A [`Manager`] owns its own working copy of the state, taken when it is
//! created. Edits made to the simulation state afterwards are invisible to
//! the manager until it is rebuilt with [`crate::Simulation::reset_manager`].

use crate::error::PhysicsError;
use crate::integrator::advance;
use crate::model::Model;
use crate::state::State;

#[derive(Clone, Debug)]
pub struct Manager {
    state: State,
    substeps: usize,
}

impl Manager {
    #[must_use]
    pub fn new(state: State, substeps: usize) -> Self {
        Self { state, substeps }
    }

    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Integrates the working state forward by `dt` and returns it.
    pub fn integrate(
        &mut self,
        model: &Model,
        excitations: &[f64],
        dt: f64,
    ) -> Result<&State, PhysicsError> {
        advance(model, &mut self.state, excitations, dt, self.substeps)?;
        Ok(&self.state)
    }
}
