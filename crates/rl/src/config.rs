//! Environment configuration.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EnvError;

/// Where reaching targets are drawn from.
///
/// A target sits at `centre + radius * (cos(theta), -sin(theta))`, with
/// `theta` and `radius` drawn uniformly from the half-open ranges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Angle range in radians.
    pub angle: [f64; 2],
    pub radius: [f64; 2],
    pub centre: [f64; 2],
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            angle: [0.0, PI * 2.0 / 3.0],
            radius: [0.3, 0.65],
            centre: [0.0, 0.8],
        }
    }
}

/// Configuration for the wrist reaching environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WristConfig {
    /// Model description file.
    pub model_path: PathBuf,
    /// Steps per episode.
    pub time_limit: usize,
    /// Seconds per step.
    pub step_size: f64,
    pub integrator_substeps: usize,
    /// Seed for target sampling. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub target: TargetConfig,
    /// Subtracted from the reward when the sanitising wrapper has to scrub
    /// a non-finite observation.
    pub nan_penalty: f64,
    /// Accepted for compatibility; there is no viewer.
    pub visualize: bool,
}

impl Default for WristConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(anatomy::WRIST_HAND_MODEL),
            time_limit: 200,
            step_size: physics::DEFAULT_STEP_SIZE,
            integrator_substeps: physics::DEFAULT_SUBSTEPS,
            seed: None,
            target: TargetConfig::default(),
            nan_penalty: 10.0,
            visualize: false,
        }
    }
}

impl WristConfig {
    /// Parses a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, EnvError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EnvError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}
