use tokio::sync::mpsc;

use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::messages::StorefrontRequest;
use crate::product_actor::ProductError;

/// Client for the admin product catalog.
#[derive(Clone)]
pub struct ProductClient {
    sender: mpsc::Sender<StorefrontRequest>,
}

impl ProductClient {
    pub fn new(sender: mpsc::Sender<StorefrontRequest>) -> Self {
        Self { sender }
    }
}

client_method!(ProductClient => fn create_product(params: ProductCreate) -> Product as StorefrontRequest::CreateProduct, Error = ProductError);
client_method!(ProductClient => fn get_product(id: String) -> Option<Product> as StorefrontRequest::GetProduct, Error = ProductError);
client_method!(ProductClient => fn list_products() -> Vec<Product> as StorefrontRequest::ListProducts, Error = ProductError);
client_method!(ProductClient => fn update_product(id: String, patch: ProductPatch) -> Product as StorefrontRequest::UpdateProduct, Error = ProductError);
client_method!(ProductClient => fn delete_product(id: String) -> () as StorefrontRequest::DeleteProduct, Error = ProductError);
client_method!(ProductClient => fn check_stock(id: String) -> Option<i64> as StorefrontRequest::CheckStock, Error = ProductError);
