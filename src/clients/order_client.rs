use tokio::sync::mpsc;

use crate::domain::{Order, OrderDraft, OrderStatus, PaymentStatus};
use crate::messages::StorefrontRequest;
use crate::order_actor::OrderError;
use crate::reconcile::RestockReport;

/// Client for order placement and the admin order screens.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<StorefrontRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<StorefrontRequest>) -> Self {
        Self { sender }
    }
}

client_method!(OrderClient => fn place_order(draft: OrderDraft) -> Order as StorefrontRequest::PlaceOrder, Error = OrderError);
client_method!(OrderClient => fn get_order(order_number: String) -> Option<Order> as StorefrontRequest::GetOrder, Error = OrderError);
client_method!(OrderClient => fn list_orders() -> Vec<Order> as StorefrontRequest::ListOrders, Error = OrderError);
client_method!(OrderClient => fn search_orders(query: String) -> Vec<Order> as StorefrontRequest::SearchOrders, Error = OrderError);
client_method!(OrderClient => fn list_orders_for_user(user_id: String) -> Vec<Order> as StorefrontRequest::ListOrdersForUser, Error = OrderError);
client_method!(OrderClient => fn change_status(order_number: String, status: OrderStatus) -> Order as StorefrontRequest::ChangeStatus, Error = OrderError);
client_method!(OrderClient => fn change_payment_status(order_number: String, payment_status: PaymentStatus) -> Order as StorefrontRequest::ChangePaymentStatus, Error = OrderError);
client_method!(OrderClient => fn delete_order(order_number: String) -> Option<RestockReport> as StorefrontRequest::DeleteOrder, Error = OrderError);
