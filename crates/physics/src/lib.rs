#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! # Musculoskeletal Physics Engine
//!
//! A small planar musculoskeletal engine: rigid bodies hung from ground by
//! pin and planar joints, muscles that turn excitation into joint torque
//! through first-order activation dynamics, and markers fixed on bodies.
//!
//! ## Key Components
//!
//! -   **Model:** [`Model`] holds bodies, joints, muscles and markers. It is
//!     built with the methods in [`builder`] and frozen by
//!     [`Model::init_system`], after which the coordinate layout is fixed.
//! -   **State:** [`State`] carries generalized coordinates, speeds,
//!     accelerations, lock flags and muscle activations. Individual
//!     coordinates are edited through a [`CoordinateHandle`].
//! -   **Simulation:** [`Simulation`] is the name-indexed capability trait
//!     environments program against; [`MusculoSim`] implements it with a
//!     fixed-step [`Manager`].
//!
//! ## Usage
//!
//! ```rust
//! use physics::{Body, Joint, Marker, Model, Muscle, MusculoSim, Simulation, Vec3, GROUND};
//!
//! let mut model = Model::new("forearm");
//! model.add_body(Body::new("ulna", 1.0).with_com(Vec3::new(0.0, -0.2, 0.0)))?;
//! model.add_joint(Joint::pin("elbow", GROUND, "ulna", Vec3::Z))?;
//! model.add_muscle(Muscle::new("BIC", "elbow", 0.04, 100.0))?;
//! model.add_marker(Marker::new("thumb", "ulna", Vec3::new(0.0, -0.4, 0.0)))?;
//!
//! let mut sim = MusculoSim::new(model);
//! sim.init_system()?;
//! sim.actuate(&[1.0])?;
//! sim.integrate()?;
//! let desc = sim.state_desc()?;
//! assert!(desc.joint_pos["elbow"][0] > 0.0);
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod activation;
pub mod builder;
pub mod desc;
pub mod error;
pub mod integrator;
pub mod kinematics;
pub mod manager;
pub mod model;
pub mod simulation;
pub mod state;
pub mod types;

pub use activation::ActivationDynamics;
pub use desc::{Elements, MarkerDesc, MuscleDesc, StateDesc};
pub use error::PhysicsError;
pub use kinematics::Pose;
pub use manager::Manager;
pub use model::{Body, CoordinateDef, Joint, JointKind, Marker, Model, Muscle, GROUND};
pub use simulation::{MusculoSim, Simulation, DEFAULT_STEP_SIZE, DEFAULT_SUBSTEPS};
pub use state::{CoordinateHandle, State};
pub use types::{Mat3, Vec3};
