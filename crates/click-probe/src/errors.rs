use thiserror::Error;

use wander_core_types::WanderError;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("page enumeration failed: {0}")]
    Enumerate(String),
    #[error("element {0} is gone")]
    Detached(String),
    #[error("page operation failed: {0}")]
    Page(String),
}

impl From<ProbeError> for WanderError {
    fn from(err: ProbeError) -> Self {
        WanderError::new(err.to_string())
    }
}
