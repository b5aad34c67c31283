use rover_config::ParameterError;
use rover_store::StoreError;
use rover_trajectory::TrajectoryError;
use thiserror::Error;

/// Coarse outcome classes a transport maps onto its own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; nothing was created or changed.
    Validation,
    /// The referenced mission does not exist.
    NotFound,
    /// Nothing is deployed. An expected state, not a fault.
    NoneDeployed,
    /// Persistence failed; prior state is intact.
    Storage,
}

/// Top-level mission service error.
#[derive(Debug, Error)]
pub enum MissionError {
    #[error("invalid mission input: {0}")]
    Validation(#[from] TrajectoryError),
    #[error("invalid robot configuration: {0}")]
    Config(#[from] ParameterError),
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] serde_json::Error),
    #[error("mission '{0}' not found")]
    NotFound(String),
    #[error("no mission is currently deployed")]
    NoneDeployed,
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl MissionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Config(_) | Self::MalformedRequest(_) => {
                ErrorKind::Validation
            }
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NoneDeployed => ErrorKind::NoneDeployed,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<StoreError> for MissionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::NoneDeployed => Self::NoneDeployed,
            other => Self::Storage(other),
        }
    }
}
