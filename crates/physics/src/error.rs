use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("model system is already finalized; components can no longer be added")]
    SystemFinalized,
    #[error("model system has not been initialized")]
    NotInitialized,
    #[error("duplicate component name `{0}`")]
    DuplicateName(String),
    #[error("unknown body `{0}`")]
    UnknownBody(String),
    #[error("unknown joint `{0}`")]
    UnknownJoint(String),
    #[error("unknown coordinate `{0}`")]
    UnknownCoordinate(String),
    #[error("body `{0}` is not connected to ground")]
    Unattached(String),
    #[error("body `{0}` already has a parent joint")]
    MultipleParents(String),
    #[error("joint `{joint}` expects {expected} coordinates, got {actual}")]
    CoordinateCount {
        joint: String,
        expected: usize,
        actual: usize,
    },
    #[error("coordinate `{0}` is locked; unlock it before setting its value")]
    CoordinateLocked(String),
    #[error("expected {expected} excitations, got {actual}")]
    ExcitationCount { expected: usize, actual: usize },
    #[error("NaN passed in the excitation vector at index {0}; values in [0, 1] are required")]
    NanExcitation(usize),
    #[error("state describes {actual} coordinates but the model has {expected}")]
    StateMismatch { expected: usize, actual: usize },
}
