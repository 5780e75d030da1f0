use storefront_ledger::app_system::{setup_tracing, StorefrontSystem, SystemConfig};
use storefront_ledger::domain::{LineItem, OrderDraft, OrderStatus, PaymentStatus, ProductCreate, PromoCreate, ShippingInfo};
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = SystemConfig::from_env().map_err(|e| e.to_string())?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_filter);

    info!("Starting storefront");

    let system = StorefrontSystem::new(&config).map_err(|e| e.to_string())?;

    // Seed the catalog and a promo code
    let product = system
        .products
        .create_product(ProductCreate::new("Ceramic Mug", 12.5, "Kitchen", 20))
        .await
        .map_err(|e| e.to_string())?;
    info!(product_id = %product.id, quantity = ?product.stock_level(), "Product created");

    let promo = system
        .promos
        .create_promo(PromoCreate::new("welcome10", 10.0, 50.0, 3))
        .await
        .map_err(|e| e.to_string())?;
    info!(code = %promo.code, "Promo code created");

    // Checkout
    let draft = OrderDraft::new(vec![LineItem::new(product.id.clone(), product.name.clone(), 4, product.price)])
        .with_user("demo-user")
        .with_shipping(ShippingInfo {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..ShippingInfo::default()
        })
        .with_promo_code("Welcome10");

    let span = tracing::info_span!("checkout");
    let order = async {
        info!("Placing order");
        system.orders.place_order(draft).await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;
    info!(order_number = %order.order_number, total = order.total, discount = ?order.discount, "Order placed");

    // Walk the order forward, then try to move it back
    let span = tracing::info_span!("fulfilment", order_number = %order.order_number);
    async {
        for status in [OrderStatus::Processing, OrderStatus::Shipping] {
            match system.orders.change_status(order.order_number.clone(), status).await {
                Ok(updated) => info!(status = %updated.status, "Status changed"),
                Err(e) => error!(error = %e, "Status change failed"),
            }
        }
        if let Err(e) = system
            .orders
            .change_status(order.order_number.clone(), OrderStatus::Pending)
            .await
        {
            warn!(error = %e, "Regression refused as expected");
        }
        if let Err(e) = system
            .orders
            .change_payment_status(order.order_number.clone(), PaymentStatus::Paid)
            .await
        {
            error!(error = %e, "Payment status change failed");
        }
    }
    .instrument(span)
    .await;

    match system.promos.toggle_promo(promo.code.clone()).await {
        Ok(toggled) => info!(code = %toggled.code, active = toggled.active, used = toggled.used, "Promo code toggled"),
        Err(e) => error!(error = %e, "Promo toggle failed"),
    }

    // Deleting the order hands its stock back
    match system.orders.delete_order(order.order_number.clone()).await {
        Ok(Some(report)) => info!(restocked = report.restocked.len(), "Order deleted"),
        Ok(None) => warn!("Order was already gone"),
        Err(e) => error!(error = %e, "Order deletion failed"),
    }

    match system.products.check_stock(product.id.clone()).await {
        Ok(level) => info!(quantity = ?level, "Stock after deletion"),
        Err(e) => error!(error = %e, "Stock check failed"),
    }

    let summary = system.dashboard.summary().await.map_err(|e| e.to_string())?;
    info!(
        users = summary.total_users,
        products = summary.total_products,
        orders = summary.total_orders,
        revenue = summary.total_revenue,
        "Dashboard"
    );

    // Shutdown system gracefully
    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Storefront demo completed");
    Ok(())
}
