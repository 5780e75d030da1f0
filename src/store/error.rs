use thiserror::Error;

/// Errors raised by a [`DurableStore`](super::DurableStore) or while decoding its values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Store I/O error on key {key}: {message}")]
    Io { key: String, message: String },
    #[error("Corrupt value under key {key}: {message}")]
    Corrupt { key: String, message: String },
    #[error("Cannot encode value for key {key}: {message}")]
    Encode { key: String, message: String },
    #[error("Invalid store key: {0}")]
    InvalidKey(String),
    #[error("Store lock poisoned")]
    Poisoned,
}
