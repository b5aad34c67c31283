//! Mission service façade: validation, trajectory generation, and storage as one unit of work.

mod error;
mod request;
mod service;
mod summary;

pub use error::{ErrorKind, MissionError};
pub use request::DeployRequest;
pub use service::MissionService;
pub use summary::MissionSummary;

pub use rover_store::{Mission, MissionStatus, MissionStore};
