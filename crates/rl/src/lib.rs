#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! # Musculoskeletal RL Environments
//!
//! Gym-style environments driving a [`physics::Simulation`].
//!
//! -   [`OsimEnv`] is the generic driver. It owns the simulation, enforces
//!     the episode time limit and asks a [`Task`] for observations, rewards
//!     and reset behaviour.
//! -   [`WristTask`] asks the thumb of a forearm/hand model to reach a random
//!     point in the sagittal plane. [`WristEnv`] is the ready-made pairing.
//! -   [`Sanitized`] wraps any [`Env`] and scrubs non-finite numbers out of
//!     actions and observations for batched consumers.
//!
//! ```no_run
//! use rl::{Env, ResetOptions, WristConfig, WristEnv};
//!
//! let mut env = WristEnv::wrist(&WristConfig::default())?;
//! let obs = env.reset(ResetOptions::vector())?;
//! assert_eq!(obs.as_vector().map(<[f64]>::len), Some(16));
//! let action = vec![0.5; env.action_space().shape()];
//! let step = env.step(&action, false)?;
//! println!("reward {}", step.reward);
//! # Ok::<(), rl::EnvError>(())
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod osim;
pub mod sanitize;
pub mod space;
pub mod task;
pub mod wrist;

pub use config::{TargetConfig, WristConfig};
pub use env::{Env, Info, Observation, ResetOptions, Step};
pub use error::EnvError;
pub use osim::OsimEnv;
pub use sanitize::Sanitized;
pub use space::BoxSpace;
pub use task::Task;
pub use wrist::WristTask;

/// Wrist reaching over the bundled engine.
pub type WristEnv = OsimEnv<WristTask>;

/// [`WristEnv`] with non-finite actions and observations sanitised.
pub type WristVecEnv = Sanitized<WristEnv>;
