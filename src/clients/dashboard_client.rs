use tokio::sync::mpsc;

use crate::app_system::SystemError;
use crate::domain::DashboardSummary;
use crate::messages::StorefrontRequest;

/// Read-only client for the admin dashboard totals.
#[derive(Clone)]
pub struct DashboardClient {
    sender: mpsc::Sender<StorefrontRequest>,
}

impl DashboardClient {
    pub fn new(sender: mpsc::Sender<StorefrontRequest>) -> Self {
        Self { sender }
    }
}

client_method!(DashboardClient => fn summary() -> DashboardSummary as StorefrontRequest::Summary, Error = SystemError);
