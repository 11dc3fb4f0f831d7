use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a workflow action was refused. None of these are fatal: the session
/// is left as it was and the page shows the message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("No addresses found for '{query}'")]
    NoResultsFound { query: String },
    #[error("Address search is unavailable right now: {0}")]
    GeocoderUnavailable(String),
    #[error("({latitude:.5}, {longitude:.5}) is outside the service area")]
    OutsideServiceArea { latitude: f64, longitude: f64 },
    #[error("{0}")]
    ValidationFailed(String),
    #[error("Could not save the pub: {0}")]
    Store(String),
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }
}
