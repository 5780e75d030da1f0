//! Inventory reconciliation for removed orders.
//!
//! Deleting an order hands its line items back to stock. Only deletion
//! restocks; cancelling an order leaves stock where it is.

use tracing::debug;

use crate::domain::{Order, Product};
use crate::order_actor::OrderError;
use crate::product_actor::{ProductAction, ProductActionResult};
use crate::store::Collection;

/// Stock returned for one line item.
#[derive(Debug, Clone, PartialEq)]
pub struct RestockLine {
    pub product_id: String,
    pub quantity: u32,
    pub new_level: i64,
}

/// Outcome of removing one order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestockReport {
    pub order_number: String,
    pub restocked: Vec<RestockLine>,
    /// Product ids that were missing or had untracked stock.
    pub skipped: Vec<String>,
}

/// Adds every line item of `order` back onto the matching product.
///
/// Products that are missing or do not track stock are skipped without error.
pub fn restock_order(order: &Order, products: &mut Collection<Product>) -> RestockReport {
    let mut report = RestockReport {
        order_number: order.order_number.clone(),
        ..RestockReport::default()
    };

    for item in &order.items {
        match products.perform_action(&item.product_id, ProductAction::Restock(item.quantity)) {
            Ok(ProductActionResult::Restocked(Some(new_level))) => {
                report.restocked.push(RestockLine {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                    new_level,
                });
            }
            other => {
                debug!(product_id = %item.product_id, outcome = ?other, "Restock skipped");
                report.skipped.push(item.product_id.clone());
            }
        }
    }

    report
}

/// Removes `order_number` from `orders` and restocks `products` from it.
///
/// Returns `None` when the order is absent; both snapshots are then untouched.
pub fn remove_order(
    order_number: &str,
    orders: &mut Collection<Order>,
    products: &mut Collection<Product>,
) -> Result<Option<RestockReport>, OrderError> {
    let Some(order) = orders.remove(order_number)? else {
        return Ok(None);
    };
    Ok(Some(restock_order(&order, products)))
}
