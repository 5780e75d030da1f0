use thiserror::Error;

use super::ConfigError;
use crate::store::StoreError;

/// System-level failures: startup, configuration and cross-domain reads.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SystemError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Service task failed: {0}")]
    ServiceFailed(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
