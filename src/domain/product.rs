use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::number_from;

/// Represents an admin-managed product in the inventory.
///
/// `quantity` is `None` when the record has no stock field at all. Fields this
/// crate does not model (images, sizes, ratings) live in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(deserialize_with = "super::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "super::lenient_money")]
    pub price: f64,
    #[serde(
        default,
        deserialize_with = "super::lenient_optional_money",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<Stock>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            original_price: None,
            category: String::new(),
            description: None,
            quantity: Some(Stock::count(i64::from(quantity))),
            extra: Map::new(),
        }
    }

    /// Whole units in stock, or `None` when stock is not tracked.
    pub fn stock_level(&self) -> Option<i64> {
        self.quantity.as_ref().and_then(Stock::level)
    }
}

/// A stock value exactly as stored.
///
/// Any number (numeric strings included) is tracked stock, even a negative
/// or fractional one. Anything else is untracked and is kept untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stock(Value);

impl Stock {
    pub fn count(quantity: i64) -> Self {
        Self(Value::from(quantity))
    }

    /// Whole units available; a fractional amount rounds down.
    pub fn level(&self) -> Option<i64> {
        if let Some(whole) = self.0.as_i64() {
            return Some(whole);
        }
        number_from(&self.0).map(|amount| amount.floor() as i64)
    }

    /// The stock moved by `delta` units, or `None` when untracked.
    pub fn adjusted(&self, delta: i64) -> Option<Stock> {
        let amount = number_from(&self.0)?;
        if amount.fract() == 0.0 {
            return Some(Stock::count((amount as i64).saturating_add(delta)));
        }
        Number::from_f64(amount + delta as f64).map(|n| Stock(Value::Number(n)))
    }
}

/// Payload for creating a product from the admin form.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub category: String,
    pub description: Option<String>,
    pub quantity: u32,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            original_price: None,
            category: category.into(),
            description: None,
            quantity,
        }
    }
}

/// Payload for editing an existing product.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_tracking() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[
                {"id":"P1","name":"Mug","price":9.5,"quantity":4},
                {"id":"P2","name":"Tee","price":15,"quantity":"lots"},
                {"id":"P3","name":"Cap","price":12},
                {"id":"P4","name":"Pin","price":1,"quantity":-2},
                {"id":"P5","name":"Bag","price":"7.25","quantity":"3"},
                {"id":"P6","name":"Pen","price":1,"quantity":2.5}
            ]"#,
        )
        .unwrap();

        let levels: Vec<Option<i64>> = products.iter().map(Product::stock_level).collect();
        assert_eq!(levels, vec![Some(4), None, None, Some(-2), Some(3), Some(2)]);
        assert_eq!(products[4].price, 7.25);
    }

    #[test]
    fn test_adjusting_stock() {
        assert_eq!(Stock::count(-2).adjusted(3), Some(Stock::count(1)));
        assert_eq!(Stock(Value::from("3")).adjusted(2), Some(Stock::count(5)));
        assert_eq!(Stock(Value::from(2.5)).adjusted(1), Some(Stock(Value::from(3.5))));
        assert_eq!(Stock(Value::from("lots")).adjusted(1), None);
        assert_eq!(Stock(Value::Null).level(), None);
    }

    #[test]
    fn test_unknown_fields_and_untracked_stock_survive_rewrite() {
        let raw = r#"{"id":"P2","name":"Tee","price":15.5,"image":"/tee.png","sizes":["S","M"],"rating":4.5,"quantity":"lots"}"#;
        let product: Product = serde_json::from_str(raw).unwrap();

        assert_eq!(product.extra.get("image"), Some(&Value::from("/tee.png")));
        assert_eq!(product.quantity, Some(Stock(Value::from("lots"))));

        let written: Value = serde_json::to_value(&product).unwrap();
        let original: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(written, original);
    }

    #[test]
    fn test_numeric_id_is_read_as_string() {
        let product: Product =
            serde_json::from_str(r#"{"id":1714557600000,"name":"Mug","price":9.5}"#).unwrap();
        assert_eq!(product.id, "1714557600000");
        assert_eq!(product.category, "");
        assert_eq!(product.quantity, None);
    }
}
