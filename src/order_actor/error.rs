use thiserror::Error;

use crate::domain::OrderStatus;
use crate::promo_actor::PromoError;
use crate::store::StoreError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Cannot change order status from {from} back to {to}")]
    StatusRegression { from: OrderStatus, to: OrderStatus },
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Promo code rejected: {0}")]
    Promo(#[from] PromoError),
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
