use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::app_system::SystemError;
use crate::clients::StorefrontClients;
use crate::domain::{
    normalize_code, round_cents, DashboardSummary, Order, OrderCreate, OrderDraft, OrderPatch,
    OrderStatus, PaymentStatus, Product, ProductCreate, ProductPatch, PromoCode, PromoCreate,
};
use crate::messages::{ServiceResponse, StorefrontRequest};
use crate::order_actor::OrderError;
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use crate::promo_actor::{PromoAction, PromoActionResult, PromoError};
use crate::reconcile::{remove_order, RestockReport};
use crate::store::{read_json, Collection, DurableStore, IntentLog, StoreError, USERS_KEY};

type IdGenerator = Box<dyn Fn() -> String + Send + Sync>;

/// Generates ids of the form `{prefix}{n}` from a shared counter.
pub fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{prefix}{}", counter.fetch_add(1, Ordering::SeqCst))
}

fn random_order_number() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("ORD-{}", raw[..10].to_uppercase())
}

fn random_product_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// STOREFRONT SERVICE
// =============================================================================

/// The single owner of the durable store.
///
/// Requests are handled one at a time and each handler runs to completion,
/// so no two commands ever interleave inside this process. Every handler
/// re-reads the collections it needs, finishing any interrupted multi-key
/// update first.
pub struct StorefrontService {
    receiver: mpsc::Receiver<StorefrontRequest>,
    store: Arc<dyn DurableStore>,
    next_order_number: IdGenerator,
    next_product_id: IdGenerator,
}

impl StorefrontService {
    pub fn new(buffer_size: usize, store: Arc<dyn DurableStore>) -> (Self, StorefrontClients) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            store,
            next_order_number: Box::new(random_order_number),
            next_product_id: Box::new(random_product_id),
        };
        (service, StorefrontClients::new(sender))
    }

    /// Replaces the id generators, e.g. with [`sequential_ids`] for predictable ids.
    pub fn with_id_generators(
        mut self,
        next_order_number: impl Fn() -> String + Send + Sync + 'static,
        next_product_id: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.next_order_number = Box::new(next_order_number);
        self.next_product_id = Box::new(next_product_id);
        self
    }

    #[instrument(name = "storefront_service", skip(self))]
    pub async fn run(mut self) {
        info!("StorefrontService starting");

        if let Err(e) = self.recover() {
            error!(error = %e, "Startup recovery failed");
        }

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StorefrontRequest::PlaceOrder { draft, respond_to } => {
                    self.handle_place_order(draft, respond_to);
                }
                StorefrontRequest::GetOrder {
                    order_number,
                    respond_to,
                } => {
                    self.handle_get_order(order_number, respond_to);
                }
                StorefrontRequest::ListOrders { respond_to } => {
                    let _ = respond_to.send(self.query_orders(|_| true));
                }
                StorefrontRequest::SearchOrders { query, respond_to } => {
                    let _ = respond_to.send(self.query_orders(|order| order.matches_search(&query)));
                }
                StorefrontRequest::ListOrdersForUser {
                    user_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(
                        self.query_orders(|order| order.user_id.as_deref() == Some(user_id.as_str())),
                    );
                }
                StorefrontRequest::ChangeStatus {
                    order_number,
                    status,
                    respond_to,
                } => {
                    self.handle_change_status(order_number, status, respond_to);
                }
                StorefrontRequest::ChangePaymentStatus {
                    order_number,
                    payment_status,
                    respond_to,
                } => {
                    self.handle_change_payment_status(order_number, payment_status, respond_to);
                }
                StorefrontRequest::DeleteOrder {
                    order_number,
                    respond_to,
                } => {
                    self.handle_delete_order(order_number, respond_to);
                }
                StorefrontRequest::CreateProduct { params, respond_to } => {
                    self.handle_create_product(params, respond_to);
                }
                StorefrontRequest::GetProduct { id, respond_to } => {
                    let result = self.load_products().map(|products| products.get(&id).cloned());
                    let _ = respond_to.send(result);
                }
                StorefrontRequest::ListProducts { respond_to } => {
                    let _ = respond_to.send(self.load_products().map(Collection::into_items));
                }
                StorefrontRequest::UpdateProduct {
                    id,
                    patch,
                    respond_to,
                } => {
                    self.handle_update_product(id, patch, respond_to);
                }
                StorefrontRequest::DeleteProduct { id, respond_to } => {
                    self.handle_delete_product(id, respond_to);
                }
                StorefrontRequest::CheckStock { id, respond_to } => {
                    self.handle_check_stock(id, respond_to);
                }
                StorefrontRequest::CreatePromo { params, respond_to } => {
                    self.handle_create_promo(params, respond_to);
                }
                StorefrontRequest::TogglePromo { code, respond_to } => {
                    self.handle_toggle_promo(code, respond_to);
                }
                StorefrontRequest::ListPromos { respond_to } => {
                    let result = self
                        .recover()
                        .and_then(|_| Collection::<PromoCode>::load(self.store.as_ref()))
                        .map(Collection::into_items)
                        .map_err(PromoError::from);
                    let _ = respond_to.send(result);
                }
                StorefrontRequest::Summary { respond_to } => {
                    self.handle_summary(respond_to);
                }
                StorefrontRequest::Shutdown => {
                    info!("StorefrontService shutting down");
                    break;
                }
            }
        }

        info!("StorefrontService stopped");
    }

    fn store(&self) -> &dyn DurableStore {
        self.store.as_ref()
    }

    /// Finishes a multi-key update left behind by an earlier failure.
    fn recover(&self) -> Result<(), StoreError> {
        IntentLog::recover(self.store()).map(|_| ())
    }

    fn load_products(&self) -> Result<Collection<Product>, ProductError> {
        self.recover()?;
        Ok(Collection::load(self.store())?)
    }

    fn query_orders(&self, keep: impl Fn(&Order) -> bool) -> Result<Vec<Order>, OrderError> {
        self.recover()?;
        let orders = Collection::<Order>::load(self.store())?;
        let matched: Vec<Order> = orders.into_items().into_iter().filter(|order| keep(order)).collect();
        debug!(order_count = matched.len(), "Listed orders");
        Ok(matched)
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    #[instrument(fields(item_count = draft.items.len()), skip(self, draft, respond_to))]
    fn handle_place_order(&self, draft: OrderDraft, respond_to: ServiceResponse<Order, OrderError>) {
        debug!("Processing place_order request");

        let result = self.place_order(draft);
        match &result {
            Ok(order) => info!(order_number = %order.order_number, total = order.total, "Order placed"),
            Err(e) => warn!(error = %e, "Order rejected"),
        }

        let _ = respond_to.send(result);
    }

    fn place_order(&self, mut draft: OrderDraft) -> Result<Order, OrderError> {
        self.recover()?;
        let store = self.store();
        let mut orders = Collection::<Order>::load(store)?;
        let mut products = Collection::<Product>::load(store)?;

        // Step 1: Reserve stock for catalog products
        for item in &draft.items {
            if item.quantity == 0 {
                return Err(OrderError::ValidationError(format!(
                    "Quantity for {} must be at least 1",
                    item.product_id
                )));
            }
            match products.perform_action(&item.product_id, ProductAction::ReserveStock(item.quantity)) {
                Ok(_) => {}
                Err(ProductError::NotFound(_)) => {
                    debug!(product_id = %item.product_id, "Product outside admin catalog, stock not tracked");
                }
                Err(e @ ProductError::InsufficientStock { .. }) => {
                    return Err(OrderError::InsufficientStock(e.to_string()));
                }
                Err(e) => return Err(OrderError::ValidationError(e.to_string())),
            }
        }

        // Step 2: Redeem promo code
        draft.promo_code = draft
            .promo_code
            .as_deref()
            .map(normalize_code)
            .filter(|code| !code.is_empty());

        let mut promos = None;
        let mut discount = 0.0;
        if let Some(code) = draft.promo_code.clone() {
            let mut codes = Collection::<PromoCode>::load(store)?;
            let subtotal = draft.subtotal();
            match codes.perform_action(&code, PromoAction::Redeem { subtotal })? {
                PromoActionResult::Redeemed { amount, exhausted } => {
                    info!(code = %code, amount, exhausted, "Promo code redeemed");
                    discount = amount;
                }
                PromoActionResult::Toggled { .. } => {
                    return Err(OrderError::ActorCommunicationError("Unexpected result".to_string()));
                }
            }
            promos = Some(codes);
        }

        // Step 3: Create the order record
        let order_number = (self.next_order_number)();
        if orders.contains(&order_number) {
            return Err(OrderError::ValidationError(format!(
                "Order number already in use: {order_number}"
            )));
        }
        let order = orders
            .create(
                order_number,
                OrderCreate {
                    draft,
                    discount,
                    placed_at: Utc::now(),
                },
            )?
            .clone();

        // Step 4: Commit every touched collection together
        let mut writes = vec![products.stage()?];
        if let Some(codes) = &promos {
            writes.push(codes.stage()?);
        }
        writes.push(orders.stage()?);
        IntentLog::commit(store, "place_order", writes)?;

        Ok(order)
    }

    #[instrument(fields(order_number = %order_number), skip(self, respond_to))]
    fn handle_get_order(&self, order_number: String, respond_to: ServiceResponse<Option<Order>, OrderError>) {
        debug!("Processing get_order request");

        let result = self.recover().map_err(OrderError::from).and_then(|_| {
            let orders = Collection::<Order>::load(self.store())?;
            Ok(orders.get(&order_number).cloned())
        });
        match &result {
            Ok(Some(order)) => info!(total = order.total, status = %order.status, "Order found"),
            Ok(None) => debug!("Order not found"),
            Err(e) => error!(error = %e, "Order lookup failed"),
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(order_number = %order_number, status = %status), skip(self, respond_to))]
    fn handle_change_status(
        &self,
        order_number: String,
        status: OrderStatus,
        respond_to: ServiceResponse<Order, OrderError>,
    ) {
        debug!("Processing change_status request");

        let patch = OrderPatch {
            status: Some(status),
            payment_status: None,
        };
        let result = self.update_order(&order_number, patch);
        if let Err(e) = &result {
            warn!(error = %e, "Status change rejected");
        }

        let _ = respond_to.send(result);
    }

    #[instrument(
        fields(order_number = %order_number, payment_status = %payment_status),
        skip(self, respond_to)
    )]
    fn handle_change_payment_status(
        &self,
        order_number: String,
        payment_status: PaymentStatus,
        respond_to: ServiceResponse<Order, OrderError>,
    ) {
        debug!("Processing change_payment_status request");

        let patch = OrderPatch {
            status: None,
            payment_status: Some(payment_status),
        };
        let result = self.update_order(&order_number, patch);
        match &result {
            Ok(_) => info!("Payment status changed"),
            Err(e) => warn!(error = %e, "Payment status change rejected"),
        }

        let _ = respond_to.send(result);
    }

    fn update_order(&self, order_number: &str, patch: OrderPatch) -> Result<Order, OrderError> {
        self.recover()?;
        let mut orders = Collection::<Order>::load(self.store())?;
        let updated = orders.update(order_number, patch)?.clone();
        orders.save(self.store())?;
        Ok(updated)
    }

    #[instrument(fields(order_number = %order_number), skip(self, respond_to))]
    fn handle_delete_order(
        &self,
        order_number: String,
        respond_to: ServiceResponse<Option<RestockReport>, OrderError>,
    ) {
        debug!("Processing delete_order request");

        let result = self.delete_order(&order_number);
        match &result {
            Ok(Some(report)) => info!(
                restocked = report.restocked.len(),
                skipped = report.skipped.len(),
                "Order deleted and products restocked"
            ),
            Ok(None) => debug!("Order already absent"),
            Err(e) => error!(error = %e, "Order deletion failed"),
        }

        let _ = respond_to.send(result);
    }

    fn delete_order(&self, order_number: &str) -> Result<Option<RestockReport>, OrderError> {
        self.recover()?;
        let store = self.store();
        let mut orders = Collection::<Order>::load(store)?;
        let mut products = Collection::<Product>::load(store)?;

        let Some(report) = remove_order(order_number, &mut orders, &mut products)? else {
            return Ok(None);
        };

        IntentLog::commit(store, "delete_order", vec![products.stage()?, orders.stage()?])?;
        Ok(Some(report))
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    #[instrument(fields(product_name = %params.name), skip(self, params, respond_to))]
    fn handle_create_product(&self, params: ProductCreate, respond_to: ServiceResponse<Product, ProductError>) {
        debug!("Processing create_product request");

        let result = self.load_products().and_then(|mut products| {
            let id = (self.next_product_id)();
            if products.contains(&id) {
                return Err(ProductError::ValidationError(format!("Product id already in use: {id}")));
            }
            let created = products.create(id, params)?.clone();
            products.save(self.store())?;
            Ok(created)
        });
        match &result {
            Ok(product) => info!(product_id = %product.id, "Product created"),
            Err(e) => warn!(error = %e, "Product rejected"),
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_update_product(
        &self,
        id: String,
        patch: ProductPatch,
        respond_to: ServiceResponse<Product, ProductError>,
    ) {
        debug!("Processing update_product request");

        let result = self.load_products().and_then(|mut products| {
            let updated = products.update(&id, patch)?.clone();
            products.save(self.store())?;
            Ok(updated)
        });
        match &result {
            Ok(product) => info!(quantity = ?product.stock_level(), "Product updated"),
            Err(e) => warn!(error = %e, "Product update rejected"),
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_delete_product(&self, id: String, respond_to: ServiceResponse<(), ProductError>) {
        debug!("Processing delete_product request");

        let result = self.load_products().and_then(|mut products| match products.remove(&id)? {
            Some(_) => {
                products.save(self.store())?;
                info!("Product deleted");
                Ok(())
            }
            None => Err(ProductError::NotFound(id.clone())),
        });

        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_check_stock(&self, id: String, respond_to: ServiceResponse<Option<i64>, ProductError>) {
        debug!("Processing check_stock request");

        let result = self.load_products().and_then(|mut products| {
            match products.perform_action(&id, ProductAction::CheckStock)? {
                ProductActionResult::StockLevel(level) => Ok(level),
                _ => Err(ProductError::ActorCommunicationError("Unexpected result".to_string())),
            }
        });

        let _ = respond_to.send(result);
    }

    // -------------------------------------------------------------------------
    // Promo codes
    // -------------------------------------------------------------------------

    #[instrument(fields(code = %params.code), skip(self, params, respond_to))]
    fn handle_create_promo(&self, params: PromoCreate, respond_to: ServiceResponse<PromoCode, PromoError>) {
        debug!("Processing create_promo request");

        let result = self.create_promo(params);
        match &result {
            Ok(promo) => info!(code = %promo.code, usage_limit = promo.usage_limit, "Promo code created"),
            Err(e) => warn!(error = %e, "Promo code rejected"),
        }

        let _ = respond_to.send(result);
    }

    fn create_promo(&self, params: PromoCreate) -> Result<PromoCode, PromoError> {
        self.recover()?;
        let mut codes = Collection::<PromoCode>::load(self.store())?;

        let code = normalize_code(&params.code);
        if codes.contains(&code) {
            return Err(PromoError::DuplicateCode(code));
        }

        let created = codes.create(code, params)?.clone();
        codes.save(self.store())?;
        Ok(created)
    }

    #[instrument(fields(code = %code), skip(self, respond_to))]
    fn handle_toggle_promo(&self, code: String, respond_to: ServiceResponse<PromoCode, PromoError>) {
        debug!("Processing toggle_promo request");

        let result = self.toggle_promo(&code);
        match &result {
            Ok(promo) => info!(active = promo.active, "Promo code toggled"),
            Err(e) => warn!(error = %e, "Promo toggle rejected"),
        }

        let _ = respond_to.send(result);
    }

    fn toggle_promo(&self, code: &str) -> Result<PromoCode, PromoError> {
        self.recover()?;
        let mut codes = Collection::<PromoCode>::load(self.store())?;
        codes.perform_action(code, PromoAction::Toggle)?;
        codes.save(self.store())?;
        codes
            .get(code)
            .cloned()
            .ok_or_else(|| PromoError::NotFound(code.to_string()))
    }

    // -------------------------------------------------------------------------
    // Dashboard
    // -------------------------------------------------------------------------

    #[instrument(skip(self, respond_to))]
    fn handle_summary(&self, respond_to: ServiceResponse<DashboardSummary, SystemError>) {
        debug!("Processing summary request");

        let result = self.summary().map_err(SystemError::from);
        if let Ok(summary) = &result {
            info!(
                orders = summary.total_orders,
                revenue = summary.total_revenue,
                "Dashboard summary computed"
            );
        }

        let _ = respond_to.send(result);
    }

    fn summary(&self) -> Result<DashboardSummary, StoreError> {
        self.recover()?;
        let store = self.store();
        // User records are only counted, whatever their shape.
        let users = read_json::<Vec<serde_json::Value>>(store, USERS_KEY)?.unwrap_or_default();
        let products = Collection::<Product>::load(store)?;
        let orders = Collection::<Order>::load(store)?;

        Ok(DashboardSummary {
            total_users: users.len(),
            total_products: products.len(),
            total_orders: orders.len(),
            total_revenue: round_cents(orders.iter().map(|order| order.total).sum()),
        })
    }
}
