//! Typed handles onto the storefront service.
//!
//! Every client wraps a clone of the same request channel, so they are cheap
//! to clone and share across tasks.

#[macro_use]
mod macros;

mod dashboard_client;
mod order_client;
mod product_client;
mod promo_client;

pub use dashboard_client::*;
pub use order_client::*;
pub use product_client::*;
pub use promo_client::*;

use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::app_system::SystemError;
use crate::messages::StorefrontRequest;

/// One client per domain, all talking to the same service.
#[derive(Clone)]
pub struct StorefrontClients {
    pub orders: OrderClient,
    pub products: ProductClient,
    pub promos: PromoClient,
    pub dashboard: DashboardClient,
    sender: mpsc::Sender<StorefrontRequest>,
}

impl StorefrontClients {
    pub fn new(sender: mpsc::Sender<StorefrontRequest>) -> Self {
        Self {
            orders: OrderClient::new(sender.clone()),
            products: ProductClient::new(sender.clone()),
            promos: PromoClient::new(sender.clone()),
            dashboard: DashboardClient::new(sender.clone()),
            sender,
        }
    }

    /// Asks the service to stop after the requests already queued.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), SystemError> {
        debug!("Sending shutdown");
        self.sender
            .send(StorefrontRequest::Shutdown)
            .await
            .map_err(|_| SystemError::ActorCommunicationError("Service closed".to_string()))
    }
}
