use tracing::info;

use serde_json::Map;

use crate::domain::{round_cents, Order, OrderCreate, OrderPatch, PaymentStatus};
use crate::entity::Entity;
use crate::store::ORDERS_KEY;

use super::{check_transition, OrderError};

impl Entity for Order {
    const COLLECTION_KEY: &'static str = ORDERS_KEY;
    type CreateParams = OrderCreate;
    type Patch = OrderPatch;
    type Action = (); // No custom actions for now
    type ActionResult = ();
    type Error = OrderError;

    fn id(&self) -> &str {
        &self.order_number
    }

    /// Creates a new Order from a priced checkout draft.
    ///
    /// # Notes
    /// The order starts `Pending` with payment `Pending`.
    fn from_create_params(order_number: String, params: OrderCreate) -> Result<Self, OrderError> {
        let OrderCreate {
            draft,
            discount,
            placed_at,
        } = params;

        if draft.items.is_empty() {
            return Err(OrderError::ValidationError("Order has no items".to_string()));
        }
        if let Some(item) = draft.items.iter().find(|item| item.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "Quantity for {} must be at least 1",
                item.product_id
            )));
        }
        if let Some(item) = draft.items.iter().find(|item| item.price.is_nan() || item.price < 0.0) {
            return Err(OrderError::ValidationError(format!(
                "Price for {} must not be negative",
                item.product_id
            )));
        }

        let subtotal = draft.subtotal();
        let discount = round_cents(discount.max(0.0).min(subtotal));

        Ok(Self {
            order_number,
            date: Some(placed_at.into()),
            total: round_cents(subtotal - discount),
            subtotal: Some(subtotal),
            discount: Some(discount),
            promo_code: draft.promo_code,
            status: Default::default(),
            payment_status: Default::default(),
            user_id: draft.user_id,
            shipping_info: draft.shipping_info,
            items: draft.items,
            extra: Map::new(),
        })
    }

    fn not_found(order_number: &str) -> OrderError {
        OrderError::NotFound(order_number.to_string())
    }

    /// Applies an operator edit. A status change must pass the transition guard;
    /// payment status may move between any known labels.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), OrderError> {
        if let Some(PaymentStatus::Unknown(label)) = &patch.payment_status {
            return Err(OrderError::ValidationError(format!(
                "Unknown payment status: {label}"
            )));
        }
        if let Some(status) = patch.status {
            check_transition(&self.status, &status)?;
            info!(from = %self.status, to = %status, "Order status changed");
            self.status = status;
        }
        if let Some(payment_status) = patch.payment_status {
            self.payment_status = payment_status;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), OrderError> {
        Ok(())
    }
}
