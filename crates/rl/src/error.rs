use std::path::PathBuf;

use physics::PhysicsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error("failed to load model: {0:#}")]
    ModelLoad(anyhow::Error),
    #[error("model has no {kind} named `{name}`")]
    MissingElement { kind: &'static str, name: String },
    #[error("observation has {actual} entries but the space declares {expected}")]
    ObservationSize { expected: usize, actual: usize },
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EnvError {
    pub(crate) fn missing(kind: &'static str, name: &str) -> Self {
        Self::MissingElement {
            kind,
            name: name.to_owned(),
        }
    }
}
