use tokio::sync::oneshot;

use crate::app_system::SystemError;
use crate::domain::{
    DashboardSummary, Order, OrderDraft, OrderStatus, PaymentStatus, Product, ProductCreate,
    ProductPatch, PromoCode, PromoCreate,
};
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::promo_actor::PromoError;
use crate::reconcile::RestockReport;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed messages for the storefront service. Each variant carries its
/// parameters and a oneshot channel for the response.
#[derive(Debug)]
pub enum StorefrontRequest {
    // --- Orders ---
    PlaceOrder {
        draft: OrderDraft,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    GetOrder {
        order_number: String,
        respond_to: ServiceResponse<Option<Order>, OrderError>,
    },
    ListOrders {
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    SearchOrders {
        query: String,
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    ListOrdersForUser {
        user_id: String,
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    ChangeStatus {
        order_number: String,
        status: OrderStatus,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    ChangePaymentStatus {
        order_number: String,
        payment_status: PaymentStatus,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    DeleteOrder {
        order_number: String,
        respond_to: ServiceResponse<Option<RestockReport>, OrderError>,
    },

    // --- Products ---
    CreateProduct {
        params: ProductCreate,
        respond_to: ServiceResponse<Product, ProductError>,
    },
    GetProduct {
        id: String,
        respond_to: ServiceResponse<Option<Product>, ProductError>,
    },
    ListProducts {
        respond_to: ServiceResponse<Vec<Product>, ProductError>,
    },
    UpdateProduct {
        id: String,
        patch: ProductPatch,
        respond_to: ServiceResponse<Product, ProductError>,
    },
    DeleteProduct {
        id: String,
        respond_to: ServiceResponse<(), ProductError>,
    },
    CheckStock {
        id: String,
        respond_to: ServiceResponse<Option<i64>, ProductError>,
    },

    // --- Promo codes ---
    CreatePromo {
        params: PromoCreate,
        respond_to: ServiceResponse<PromoCode, PromoError>,
    },
    TogglePromo {
        code: String,
        respond_to: ServiceResponse<PromoCode, PromoError>,
    },
    ListPromos {
        respond_to: ServiceResponse<Vec<PromoCode>, PromoError>,
    },

    // --- Dashboard ---
    Summary {
        respond_to: ServiceResponse<DashboardSummary, SystemError>,
    },

    Shutdown,
}
