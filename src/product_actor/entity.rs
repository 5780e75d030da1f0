use serde_json::Map;

use crate::domain::{Product, ProductCreate, ProductPatch, Stock};
use crate::entity::Entity;
use crate::store::PRODUCTS_KEY;

use super::actions::{ProductAction, ProductActionResult};
use super::ProductError;

fn require_text(field: &str, value: &str) -> Result<(), ProductError> {
    if value.trim().is_empty() {
        return Err(ProductError::ValidationError(format!("{field} is required")));
    }
    Ok(())
}

fn require_price(field: &str, value: f64) -> Result<(), ProductError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ProductError::ValidationError(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(())
}

impl Entity for Product {
    const COLLECTION_KEY: &'static str = PRODUCTS_KEY;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &str {
        &self.id
    }

    /// Creates a new Product from the admin form.
    ///
    /// # Errors
    /// Name, category, a positive price and a positive quantity are required.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, ProductError> {
        require_text("Name", &params.name)?;
        require_text("Category", &params.category)?;
        require_price("Price", params.price)?;
        if let Some(original_price) = params.original_price {
            require_price("Original price", original_price)?;
        }
        if params.quantity == 0 {
            return Err(ProductError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            price: params.price,
            original_price: params.original_price,
            category: params.category.trim().to_string(),
            description: params.description,
            quantity: Some(Stock::count(i64::from(params.quantity))),
            extra: Map::new(),
        })
    }

    fn not_found(id: &str) -> ProductError {
        ProductError::NotFound(id.to_string())
    }

    /// Applies the admin edit form. Every present field is validated the same
    /// way as on creation.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        if let Some(name) = patch.name {
            require_text("Name", &name)?;
            self.name = name.trim().to_string();
        }
        if let Some(price) = patch.price {
            require_price("Price", price)?;
            self.price = price;
        }
        if let Some(original_price) = patch.original_price {
            require_price("Original price", original_price)?;
            self.original_price = Some(original_price);
        }
        if let Some(category) = patch.category {
            require_text("Category", &category)?;
            self.category = category.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = Some(Stock::count(i64::from(quantity)));
        }
        Ok(())
    }

    /// Handles stock actions.
    ///
    /// Untracked stock is never adjusted: reservations pass and restocks are
    /// reported as no change.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::StockLevel(self.stock_level())),
            ProductAction::ReserveStock(amount) => {
                let requested = i64::from(amount);
                match self.stock_level() {
                    Some(available) if available >= requested => {
                        self.quantity = self.quantity.as_ref().and_then(|stock| stock.adjusted(-requested));
                        Ok(ProductActionResult::Reserved)
                    }
                    Some(available) => Err(ProductError::InsufficientStock {
                        product_id: self.id.clone(),
                        requested: amount,
                        available,
                    }),
                    None => Ok(ProductActionResult::Reserved),
                }
            }
            ProductAction::Restock(amount) => {
                let Some(restocked) = self.quantity.as_ref().and_then(|stock| stock.adjusted(i64::from(amount))) else {
                    return Ok(ProductActionResult::Restocked(None));
                };
                self.quantity = Some(restocked);
                Ok(ProductActionResult::Restocked(self.stock_level()))
            }
        }
    }
}
