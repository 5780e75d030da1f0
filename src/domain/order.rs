use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::round_cents;

/// Fulfilment status of an order.
///
/// The first five variants form a chain ordered by [`OrderStatus::rank`];
/// `Cancelled` sits outside the chain and is reachable from anywhere. A label
/// this chain does not know is kept as `Unknown` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipping,
    Arrived,
    Completed,
    Cancelled,
    Unknown(String),
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipping,
        OrderStatus::Arrived,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Position on the fulfilment chain. `None` for `Cancelled` and unknown labels.
    pub fn rank(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Processing => Some(1),
            OrderStatus::Shipping => Some(2),
            OrderStatus::Arrived => Some(3),
            OrderStatus::Completed => Some(4),
            OrderStatus::Cancelled | OrderStatus::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipping => "Shipping",
            OrderStatus::Arrived => "Arrived",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Unknown(label) => label,
        }
    }

    /// Strict parse for operator input.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Stored records may carry no status or a label this chain does not know.
impl From<Option<String>> for OrderStatus {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(label) => OrderStatus::parse(&label).unwrap_or(OrderStatus::Unknown(label)),
            None => OrderStatus::Pending,
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Unknown(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// Payment state. Operators may move it freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
    Failed,
    Unknown(String),
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Refunded,
        PaymentStatus::Failed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Refunded => "Refunded",
            PaymentStatus::Failed => "Failed",
            PaymentStatus::Unknown(label) => label,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for PaymentStatus {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(label) => PaymentStatus::parse(&label).unwrap_or(PaymentStatus::Unknown(label)),
            None => PaymentStatus::Pending,
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Unknown(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// When an order was placed, exactly as stored.
///
/// Older records may hold any date format; it is parsed only when read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacedAt(Value);

impl PlacedAt {
    /// The instant, if stored as an RFC 3339 string or epoch milliseconds.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match &self.0 {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|date| date.with_timezone(&Utc)),
            Value::Number(n) => n
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
            _ => None,
        }
    }
}

impl From<DateTime<Utc>> for PlacedAt {
    fn from(date: DateTime<Utc>) -> Self {
        Self(Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true)))
    }
}

/// Shipping details captured at checkout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// State, zip code, country and anything else the checkout form collected.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ShippingInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One purchased product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "id", deserialize_with = "super::string_or_number")]
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "super::lenient_money")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    pub fn new(product_id: impl Into<String>, name: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            quantity,
            price,
            color: None,
            size: None,
            extra: Map::new(),
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A customer order, keyed by `order_number`.
///
/// `subtotal` and `discount` are only present on orders placed through
/// checkout here; older records carry just the `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_number: String,
    #[serde(
        default,
        deserialize_with = "super::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<PlacedAt>,
    #[serde(default, deserialize_with = "super::lenient_money")]
    pub total: f64,
    #[serde(
        default,
        deserialize_with = "super::lenient_optional_money",
        skip_serializing_if = "Option::is_none"
    )]
    pub subtotal: Option<f64>,
    #[serde(
        default,
        deserialize_with = "super::lenient_optional_money",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_info: Option<ShippingInfo>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// Case-insensitive match on order number or shipping name.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.order_number.to_lowercase().contains(&query)
            || self
                .shipping_info
                .as_ref()
                .is_some_and(|info| info.full_name().to_lowercase().contains(&query))
    }

    pub fn placed_at(&self) -> Option<DateTime<Utc>> {
        self.date.as_ref().and_then(PlacedAt::to_datetime)
    }
}

/// What a shopper submits at checkout.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub items: Vec<LineItem>,
    pub user_id: Option<String>,
    pub shipping_info: Option<ShippingInfo>,
    pub promo_code: Option<String>,
}

impl OrderDraft {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_shipping(mut self, info: ShippingInfo) -> Self {
        self.shipping_info = Some(info);
        self
    }

    pub fn with_promo_code(mut self, code: impl Into<String>) -> Self {
        self.promo_code = Some(code.into());
        self
    }

    pub fn subtotal(&self) -> f64 {
        round_cents(self.items.iter().map(LineItem::line_total).sum())
    }
}

/// Payload for creating an order record once pricing is settled.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub draft: OrderDraft,
    pub discount: f64,
    pub placed_at: DateTime<Utc>,
}

/// Operator edits to an existing order.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_are_kept() {
        let order: Order = serde_json::from_str(
            r#"{"orderNumber":"A1","date":"2024-05-01T10:00:00Z","total":5.0,"status":"Shipped","paymentStatus":"COD"}"#,
        )
        .unwrap();
        assert_eq!(order.status, OrderStatus::Unknown("Shipped".into()));
        assert_eq!(order.status.rank(), None);
        assert_eq!(order.payment_status, PaymentStatus::Unknown("COD".into()));
        assert!(order.items.is_empty());

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "Shipped");
        assert_eq!(json["paymentStatus"], "COD");

        let order: Order = serde_json::from_str(
            r#"{"orderNumber":"A2","date":"2024-05-01T10:00:00Z","total":5.0,"status":null}"#,
        )
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_stored_field_names() {
        let order = Order {
            order_number: "A1".into(),
            date: Some(PlacedAt::from("2024-05-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap())),
            total: 20.0,
            subtotal: Some(20.0),
            discount: Some(0.0),
            promo_code: None,
            status: OrderStatus::Shipping,
            payment_status: PaymentStatus::Paid,
            user_id: Some("alice@example.com".into()),
            shipping_info: None,
            items: vec![LineItem::new("P1", "Mug", 2, 10.0)],
            extra: Map::new(),
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderNumber"], "A1");
        assert_eq!(json["date"], "2024-05-01T10:00:00.000Z");
        assert_eq!(json["status"], "Shipping");
        assert_eq!(json["paymentStatus"], "Paid");
        assert_eq!(json["userId"], "alice@example.com");
        assert_eq!(json["items"][0]["id"], "P1");
        assert!(json.get("shippingInfo").is_none());
    }

    #[test]
    fn test_legacy_order_is_read_leniently_and_written_back_whole() {
        let raw = r#"{"orderNumber":"B","total":"19.90","status":"Delivered","shippingInfo":{"firstName":"Ada","lastName":"L","state":"CA","zipCode":"94016","country":"US"},"items":[{"id":7,"name":"Mug","quantity":"2","price":9.95,"image":"/mug.png"}],"trackingCode":"Z1"}"#;
        let order: Order = serde_json::from_str(raw).unwrap();

        assert_eq!(order.total, 19.9);
        assert_eq!(order.date, None);
        assert_eq!(order.subtotal, None);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.extra.get("trackingCode"), Some(&Value::from("Z1")));

        let written = serde_json::to_value(&order).unwrap();
        assert_eq!(written["shippingInfo"]["zipCode"], "94016");
        assert_eq!(written["items"][0]["image"], "/mug.png");
        assert_eq!(written["trackingCode"], "Z1");
        assert_eq!(written["status"], "Delivered");
        assert!(written.get("subtotal").is_none());
        assert!(written.get("date").is_none());
    }

    #[test]
    fn test_placed_at_formats() {
        let iso: PlacedAt = serde_json::from_str(r#""2024-05-01T10:00:00.000Z""#).unwrap();
        let millis: PlacedAt = serde_json::from_str("1714557600000").unwrap();
        let text: PlacedAt = serde_json::from_str(r#""5/1/2024""#).unwrap();

        assert_eq!(iso.to_datetime(), millis.to_datetime());
        assert!(iso.to_datetime().is_some());
        assert_eq!(text.to_datetime(), None);
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""5/1/2024""#);
    }

    #[test]
    fn test_line_item_accepts_numeric_product_id() {
        let item: LineItem =
            serde_json::from_str(r#"{"id":1714557600000,"name":"Mug","quantity":1,"price":9.5}"#).unwrap();
        assert_eq!(item.product_id, "1714557600000");
    }

    #[test]
    fn test_search_matches_number_or_name() {
        let mut order: Order = serde_json::from_str(
            r#"{"orderNumber":"ORD-7F3A","date":"2024-05-01T10:00:00Z","total":1.0}"#,
        )
        .unwrap();
        order.shipping_info = Some(ShippingInfo {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            ..ShippingInfo::default()
        });

        assert!(order.matches_search("7f3a"));
        assert!(order.matches_search("ada love"));
        assert!(!order.matches_search("babbage"));
    }

    #[test]
    fn test_draft_subtotal() {
        let draft = OrderDraft::new(vec![
            LineItem::new("P1", "Mug", 3, 3.33),
            LineItem::new("P2", "Tee", 1, 15.0),
        ]);
        assert_eq!(draft.subtotal(), 24.99);
    }
}
