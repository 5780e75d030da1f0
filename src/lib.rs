//! # storefront-ledger
//!
//! Rules engine behind a small storefront's admin screens.
//!
//! All state lives in a [`DurableStore`](store::DurableStore) as JSON-encoded
//! collections. A single [`StorefrontService`](actors::StorefrontService) owns
//! the store and processes one request at a time; typed clients talk to it
//! over a channel.
//!
//! - Order status changes may not move backwards, except into `Cancelled`.
//! - Deleting an order puts its line item quantities back into stock.
//! - Promo codes carry a usage limit and a cumulative discount budget.
//! - Updates touching several keys go through an intent log so an interrupted
//!   write is finished on the next request.
//!
//! ```no_run
//! use storefront_ledger::app_system::{setup_tracing, StorefrontSystem, SystemConfig};
//!
//! # async fn run() -> Result<(), storefront_ledger::app_system::SystemError> {
//! let config = SystemConfig::from_env()?;
//! setup_tracing(&config.log_filter);
//! let system = StorefrontSystem::new(&config)?;
//! let summary = system.dashboard.summary().await?;
//! println!("{} orders", summary.total_orders);
//! system.shutdown().await
//! # }
//! ```

pub mod actors;
pub mod app_system;
pub mod clients;
pub mod domain;
pub mod entity;
pub mod messages;
pub mod order_actor;
pub mod product_actor;
pub mod promo_actor;
pub mod reconcile;
pub mod store;

#[cfg(test)]
mod mock_framework;
