use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during promo code operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PromoError {
    #[error("Promo code not found: {0}")]
    NotFound(String),
    #[error("Promo code already exists: {0}")]
    DuplicateCode(String),
    #[error("Promo code validation error: {0}")]
    ValidationError(String),
    #[error("Promo code {0} is not active")]
    Inactive(String),
    #[error("Promo code {0} has reached its usage limit")]
    UsageLimitReached(String),
    #[error("Promo code {code} budget exceeded: discount {requested:.2}, remaining {remaining:.2}")]
    BudgetExceeded {
        code: String,
        requested: f64,
        remaining: f64,
    },
    #[error("Promo store error: {0}")]
    Store(#[from] StoreError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
