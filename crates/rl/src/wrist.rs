//! Thumb-to-target reaching with the forearm/hand model.
//!
//! A negligible-mass `target` body is hung from ground by a planar joint so
//! the target shows up in the model like any other body. Its `tx`
//! coordinate carries the target x, and its locked `ty` coordinate carries
//! the target y.

use fastrand::Rng;
use physics::{Body, Joint, MusculoSim, Simulation, StateDesc, Vec3, GROUND};
use tracing::info;

use crate::config::{TargetConfig, WristConfig};
use crate::error::EnvError;
use crate::osim::OsimEnv;
use crate::sanitize::Sanitized;
use crate::task::Task;

pub const OBSERVATION_SIZE: usize = 16;
/// Joints whose position, velocity and acceleration are observed, in order.
pub const OBSERVED_JOINTS: [&str; 2] = ["elbow", "radioulnar"];
pub const FINGERTIP_MARKER: &str = "thumb";
pub const TARGET_BODY: &str = "target";
pub const TARGET_JOINT: &str = "target-joint";

const TX: usize = 1;
const TY: usize = 2;

pub struct WristTask {
    config: TargetConfig,
    rng: Rng,
    target: (f64, f64),
}

impl WristTask {
    /// `seed` of `None` seeds the sampler from entropy.
    #[must_use]
    pub fn new(config: TargetConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            rng: seed.map_or_else(Rng::new, Rng::with_seed),
            target: (0.0, 0.0),
        }
    }

    /// Current target as `(x, y)`.
    #[must_use]
    pub fn target(&self) -> (f64, f64) {
        self.target
    }

    /// Draws a new target and writes it into the target joint.
    ///
    /// The integrator keeps its own copy of the state, so the new target only
    /// takes effect after [`Simulation::reset_manager`].
    pub fn generate_new_target(
        &mut self,
        sim: &mut dyn Simulation,
    ) -> Result<(f64, f64), EnvError> {
        let [angle_lo, angle_hi] = self.config.angle;
        let [radius_lo, radius_hi] = self.config.radius;
        let [cx, cy] = self.config.centre;
        let theta = angle_lo + self.rng.f64() * (angle_hi - angle_lo);
        let radius = radius_lo + self.rng.f64() * (radius_hi - radius_lo);
        self.target = (cx + theta.cos() * radius, cy - theta.sin() * radius);

        info!(x = self.target.0, y = self.target.1, "new target");
        place_target(sim, self.target)?;
        Ok(self.target)
    }

    fn distance_penalty(&self, desc: &StateDesc) -> Result<f64, EnvError> {
        let fingertip = desc
            .markers
            .get(FINGERTIP_MARKER)
            .ok_or_else(|| EnvError::missing("marker", FINGERTIP_MARKER))?;
        let (tx, ty) = self.target;
        let penalty = (fingertip.pos[0] - tx).powi(2) + (fingertip.pos[1] - ty).powi(2);
        Ok(if penalty.is_finite() { penalty } else { 1.0 })
    }
}

// ty stays locked so the target does not fall; it is unlocked only for the write.
fn place_target(sim: &mut dyn Simulation, (x, y): (f64, f64)) -> Result<(), EnvError> {
    let tx = sim.coordinate(TARGET_JOINT, TX)?;
    let ty = sim.coordinate(TARGET_JOINT, TY)?;
    let mut state = sim.get_state()?;
    tx.set_value(&mut state, x)?;
    ty.set_locked(&mut state, false)?;
    ty.set_value(&mut state, y)?;
    ty.set_locked(&mut state, true)?;
    sim.set_state(state)?;
    Ok(())
}

impl Task for WristTask {
    fn attach(&mut self, sim: &mut dyn Simulation) -> Result<(), EnvError> {
        sim.add_body(Body::new(TARGET_BODY, 0.0001).with_inertia(Vec3::new(1.0, 1.0, 0.0001)))?;
        let mut joint = Joint::planar(TARGET_JOINT, GROUND, TARGET_BODY)
            .with_location_in_child(Vec3::new(0.0, 0.0, -0.25));
        if let Some(ty) = joint.coordinates.get_mut(TY) {
            ty.default_locked = true;
        }
        sim.add_joint(joint)?;
        Ok(())
    }

    fn on_init(&mut self, sim: &mut dyn Simulation) -> Result<(), EnvError> {
        let elements = sim.list_elements();
        for joint in OBSERVED_JOINTS {
            if !elements.joints.iter().any(|j| j == joint) {
                return Err(EnvError::missing("joint", joint));
            }
        }
        if !elements.markers.iter().any(|m| m == FINGERTIP_MARKER) {
            return Err(EnvError::missing("marker", FINGERTIP_MARKER));
        }
        Ok(())
    }

    fn on_reset(&mut self, sim: &mut dyn Simulation, random: bool) -> Result<(), EnvError> {
        if random {
            self.generate_new_target(sim)?;
        } else {
            place_target(sim, self.target)?;
        }
        Ok(())
    }

    /// `[tx, ty]`, then position, velocity and acceleration of each observed
    /// joint, then muscle activations by name, then the fingertip `(x, y)`.
    fn observation(&self, desc: &StateDesc) -> Result<Vec<f64>, EnvError> {
        let mut obs = Vec::with_capacity(OBSERVATION_SIZE);
        obs.extend([self.target.0, self.target.1]);
        for joint in OBSERVED_JOINTS {
            for table in [&desc.joint_pos, &desc.joint_vel, &desc.joint_acc] {
                let values = table
                    .get(joint)
                    .ok_or_else(|| EnvError::missing("joint", joint))?;
                obs.extend_from_slice(values);
            }
        }
        obs.extend(desc.muscles.values().map(|m| m.activation));
        let fingertip = desc
            .markers
            .get(FINGERTIP_MARKER)
            .ok_or_else(|| EnvError::missing("marker", FINGERTIP_MARKER))?;
        obs.extend_from_slice(&fingertip.pos[..2]);
        Ok(obs)
    }

    fn observation_space_size(&self) -> usize {
        OBSERVATION_SIZE
    }

    fn reward(&self, desc: &StateDesc) -> Result<f64, EnvError> {
        Ok(1.0 - self.distance_penalty(desc)?)
    }

    fn seed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }
}

impl OsimEnv<WristTask> {
    /// Loads the configured model and builds the reaching environment.
    pub fn wrist(config: &WristConfig) -> Result<Self, EnvError> {
        let model = anatomy::load_model(&config.model_path).map_err(EnvError::ModelLoad)?;
        if config.visualize {
            info!("visualization requested but no viewer is available; running headless");
        }
        let sim = MusculoSim::new(model)
            .with_step_size(config.step_size)
            .with_substeps(config.integrator_substeps);
        Self::new(
            sim,
            WristTask::new(config.target.clone(), config.seed),
            config.time_limit,
        )
    }
}

impl<S: Simulation> OsimEnv<WristTask, S> {
    /// Draws a new target. Call [`OsimEnv::reset_manager`] before stepping
    /// so the integrator picks it up.
    pub fn generate_new_target(&mut self) -> Result<(f64, f64), EnvError> {
        let (task, sim) = self.task_and_sim();
        task.generate_new_target(sim)
    }
}

impl Sanitized<OsimEnv<WristTask>> {
    /// [`OsimEnv::wrist`] behind the sanitiser, using the configured penalty.
    pub fn wrist(config: &WristConfig) -> Result<Self, EnvError> {
        Ok(Self::new(crate::WristEnv::wrist(config)?, config.nan_penalty))
    }
}
