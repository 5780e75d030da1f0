use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use super::{SystemConfig, SystemError};
use crate::actors::StorefrontService;
use crate::clients::{DashboardClient, OrderClient, ProductClient, PromoClient, StorefrontClients};
use crate::store::DurableStore;

/// The running storefront: the service task plus the clients that talk to it.
///
/// Responsible for opening the store, starting the service, and handling
/// shutdown.
pub struct StorefrontSystem {
    pub orders: OrderClient,
    pub products: ProductClient,
    pub promos: PromoClient,
    pub dashboard: DashboardClient,
    clients: StorefrontClients,
    handle: JoinHandle<()>,
}

impl StorefrontSystem {
    /// Opens the configured store and starts the service on it.
    pub fn new(config: &SystemConfig) -> Result<Self, SystemError> {
        let store = config.open_store()?;
        info!(data_dir = ?config.data_dir, "Store opened");
        Ok(Self::with_store(store, config.channel_capacity))
    }

    pub fn with_store(store: Arc<dyn DurableStore>, channel_capacity: usize) -> Self {
        let (service, clients) = StorefrontService::new(channel_capacity, store);
        Self::start(service, clients)
    }

    /// Spawns an already built service, e.g. one with custom id generators.
    pub fn start(service: StorefrontService, clients: StorefrontClients) -> Self {
        let handle = tokio::spawn(service.run());
        info!("Storefront service started");

        Self {
            orders: clients.orders.clone(),
            products: clients.products.clone(),
            promos: clients.promos.clone(),
            dashboard: clients.dashboard.clone(),
            clients,
            handle,
        }
    }

    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        self.clients.shutdown().await?;

        if let Err(e) = self.handle.await {
            error!(error = %e, "Service task failed");
            return Err(SystemError::ServiceFailed(e.to_string()));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
