use serde::Serialize;

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_users: usize,
    pub total_products: usize,
    pub total_orders: usize,
    /// Sum of every order total.
    pub total_revenue: f64,
}
