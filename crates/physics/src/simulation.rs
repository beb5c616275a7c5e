//! # Simulation Handle
//!
//! [`Simulation`] is the capability surface environments are written
//! against: construction primitives, state get/set, integrator reset,
//! actuation, stepping and name-keyed state queries. [`MusculoSim`] is the
//! engine's implementation of it.

use crate::desc::{Elements, MarkerDesc, MuscleDesc, StateDesc};
use crate::error::PhysicsError;
use crate::kinematics::{body_poses, marker_positions};
use crate::manager::Manager;
use crate::model::{Body, Joint, Model};
use crate::state::{CoordinateHandle, State};

/// Default integration step in seconds.
pub const DEFAULT_STEP_SIZE: f64 = 0.01;
/// Default number of integrator substeps per step.
pub const DEFAULT_SUBSTEPS: usize = 10;

/// Operations an environment needs from a physics engine.
///
/// Joints, muscles and markers are always addressed by name; internal
/// indices are not part of the contract.
pub trait Simulation {
    /// Adds a body. Fails once the system is initialized.
    fn add_body(&mut self, body: Body) -> Result<usize, PhysicsError>;

    /// Adds a joint. Fails once the system is initialized.
    fn add_joint(&mut self, joint: Joint) -> Result<usize, PhysicsError>;

    /// Freezes the degree-of-freedom layout and creates the initial state.
    fn init_system(&mut self) -> Result<(), PhysicsError>;

    /// Restores the default state, zeroes controls and the step counter, and
    /// creates a fresh integration manager.
    fn reset(&mut self) -> Result<(), PhysicsError>;

    fn get_state(&self) -> Result<State, PhysicsError>;

    /// Replaces the current state without advancing time.
    ///
    /// The integration manager keeps integrating its own copy until
    /// [`Simulation::reset_manager`] is called.
    fn set_state(&mut self, state: State) -> Result<(), PhysicsError>;

    /// Rebuilds the integration manager from the current state.
    fn reset_manager(&mut self) -> Result<(), PhysicsError>;

    /// Sets muscle excitations for the following steps, clamped to `[0, 1]`.
    fn actuate(&mut self, excitations: &[f64]) -> Result<(), PhysicsError>;

    /// Advances simulated time by one step.
    fn integrate(&mut self) -> Result<(), PhysicsError>;

    fn state_desc(&self) -> Result<StateDesc, PhysicsError>;

    /// Handle to coordinate `dof` of the named joint.
    fn coordinate(&self, joint: &str, dof: usize) -> Result<CoordinateHandle, PhysicsError>;

    fn list_elements(&self) -> Elements;

    /// Number of actuators, i.e. the action dimension.
    fn noutput(&self) -> usize;

    /// Steps integrated since the last reset.
    fn istep(&self) -> usize;

    fn step_size(&self) -> f64;
}

/// The engine's [`Simulation`] implementation.
pub struct MusculoSim {
    model: Model,
    state: Option<State>,
    manager: Option<Manager>,
    excitations: Vec<f64>,
    step_size: f64,
    substeps: usize,
    istep: usize,
}

impl MusculoSim {
    #[must_use]
    pub fn new(model: Model) -> Self {
        Self {
            excitations: vec![0.0; model.muscles().len()],
            model,
            state: None,
            manager: None,
            step_size: DEFAULT_STEP_SIZE,
            substeps: DEFAULT_SUBSTEPS,
            istep: 0,
        }
    }

    #[must_use]
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    #[must_use]
    pub fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps.max(1);
        self
    }

    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    #[must_use]
    pub fn excitations(&self) -> &[f64] {
        &self.excitations
    }

    fn state_ref(&self) -> Result<&State, PhysicsError> {
        self.state.as_ref().ok_or(PhysicsError::NotInitialized)
    }
}

impl Simulation for MusculoSim {
    fn add_body(&mut self, body: Body) -> Result<usize, PhysicsError> {
        self.model.add_body(body)
    }

    fn add_joint(&mut self, joint: Joint) -> Result<usize, PhysicsError> {
        self.model.add_joint(joint)
    }

    fn init_system(&mut self) -> Result<(), PhysicsError> {
        self.model.init_system()?;
        self.excitations = vec![0.0; self.model.muscles().len()];
        self.reset()
    }

    fn reset(&mut self) -> Result<(), PhysicsError> {
        let state = self.model.default_state()?;
        self.manager = Some(Manager::new(state.clone(), self.substeps));
        self.state = Some(state);
        self.excitations.iter_mut().for_each(|e| *e = 0.0);
        self.istep = 0;
        Ok(())
    }

    fn get_state(&self) -> Result<State, PhysicsError> {
        self.state_ref().cloned()
    }

    fn set_state(&mut self, state: State) -> Result<(), PhysicsError> {
        let expected = self.model.num_coordinates();
        if state.num_coordinates() != expected {
            return Err(PhysicsError::StateMismatch {
                expected,
                actual: state.num_coordinates(),
            });
        }
        self.state = Some(state);
        Ok(())
    }

    fn reset_manager(&mut self) -> Result<(), PhysicsError> {
        let state = self.state_ref()?.clone();
        self.manager = Some(Manager::new(state, self.substeps));
        Ok(())
    }

    fn actuate(&mut self, excitations: &[f64]) -> Result<(), PhysicsError> {
        if excitations.len() != self.excitations.len() {
            return Err(PhysicsError::ExcitationCount {
                expected: self.excitations.len(),
                actual: excitations.len(),
            });
        }
        if let Some(i) = excitations.iter().position(|e| e.is_nan()) {
            return Err(PhysicsError::NanExcitation(i));
        }
        for (slot, &e) in self.excitations.iter_mut().zip(excitations) {
            *slot = e.clamp(0.0, 1.0);
        }
        Ok(())
    }

    fn integrate(&mut self) -> Result<(), PhysicsError> {
        let manager = self.manager.as_mut().ok_or(PhysicsError::NotInitialized)?;
        let next = manager.integrate(&self.model, &self.excitations, self.step_size)?;
        self.state = Some(next.clone());
        self.istep += 1;
        Ok(())
    }

    fn state_desc(&self) -> Result<StateDesc, PhysicsError> {
        let state = self.state_ref()?;
        let poses = body_poses(&self.model, &state.q)?;
        let mut desc = StateDesc {
            time: state.time,
            ..StateDesc::default()
        };

        for (j, joint) in self.model.joints().iter().enumerate() {
            let start = self.model.links[j].offset;
            let range = start..start + joint.kind.dof();
            desc.joint_pos.insert(joint.name.clone(), state.q[range.clone()].to_vec());
            desc.joint_vel.insert(joint.name.clone(), state.u[range.clone()].to_vec());
            desc.joint_acc.insert(joint.name.clone(), state.udot[range].to_vec());
        }
        for (body, pose) in self.model.bodies().iter().zip(&poses) {
            desc.body_pos.insert(body.name.clone(), pose.origin.to_array());
        }
        for ((muscle, &activation), &excitation) in self
            .model
            .muscles()
            .iter()
            .zip(&state.activations)
            .zip(&self.excitations)
        {
            desc.muscles.insert(
                muscle.name.clone(),
                MuscleDesc {
                    activation,
                    excitation,
                    force: activation * muscle.max_isometric_force,
                },
            );
        }
        for (marker, pos) in self
            .model
            .markers()
            .iter()
            .zip(marker_positions(&self.model, &poses))
        {
            desc.markers
                .insert(marker.name.clone(), MarkerDesc { pos: pos.to_array() });
        }
        Ok(desc)
    }

    fn coordinate(&self, joint: &str, dof: usize) -> Result<CoordinateHandle, PhysicsError> {
        if self.model.joint_index(joint).is_none() {
            return Err(PhysicsError::UnknownJoint(joint.to_owned()));
        }
        let index = self
            .model
            .coordinate_index(joint, dof)
            .ok_or_else(|| PhysicsError::UnknownCoordinate(format!("{joint}[{dof}]")))?;
        let name = self.model.coordinate_name(index).unwrap_or(joint);
        Ok(CoordinateHandle::new(index, name))
    }

    fn list_elements(&self) -> Elements {
        Elements {
            joints: self.model.joints().iter().map(|j| j.name.clone()).collect(),
            bodies: self.model.bodies().iter().map(|b| b.name.clone()).collect(),
            muscles: self.model.muscles().iter().map(|m| m.name.clone()).collect(),
            markers: self.model.markers().iter().map(|m| m.name.clone()).collect(),
        }
    }

    fn noutput(&self) -> usize {
        self.model.muscles().len()
    }

    fn istep(&self) -> usize {
        self.istep
    }

    fn step_size(&self) -> f64 {
        self.step_size
    }
}
