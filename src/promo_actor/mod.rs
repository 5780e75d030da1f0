//! Promo code ledger: creation rules, toggling and redemption accounting.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
