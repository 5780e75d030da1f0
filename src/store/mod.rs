//! Durable key-value storage.
//!
//! Everything the storefront persists is a JSON document under a fixed key,
//! read and replaced as a whole. [`DurableStore`] is the seam: the service
//! only ever sees the trait, so the in-memory store used by tests and the
//! file-backed store used by the binary are interchangeable.

mod collection;
mod error;
mod file;
mod intent;
mod memory;

pub use collection::*;
pub use error::*;
pub use file::*;
pub use intent::*;
pub use memory::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key holding the order collection.
pub const ORDERS_KEY: &str = "orders";
/// Key holding the admin-managed product collection.
pub const PRODUCTS_KEY: &str = "adminProducts";
/// Key holding the promo code collection.
pub const PROMO_CODES_KEY: &str = "promoCodes";
/// Key holding registered users. Only read for display.
pub const USERS_KEY: &str = "users";

/// A process-wide string key-value store with whole-value writes.
///
/// A single `set` is atomic with respect to its key. Nothing is atomic across
/// keys; multi-key updates go through [`IntentLog::commit`].
pub trait DurableStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Reads and decodes the JSON document under `key`.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn DurableStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and stores it under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn DurableStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = encode_json(key, value)?;
    store.set(key, &raw)
}

pub(crate) fn encode_json<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Encode {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_missing_key() {
        let store = MemoryStore::new();
        let value: Option<Vec<u32>> = read_json(&store, "nothing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_read_json_reports_corrupt_value() {
        let store = MemoryStore::new();
        store.set(ORDERS_KEY, "{not json").unwrap();

        let err = read_json::<Vec<u32>>(&store, ORDERS_KEY).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == ORDERS_KEY));
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::new();
        write_json(&store, "numbers", &vec![1u32, 2, 3]).unwrap();

        let value: Option<Vec<u32>> = read_json(&store, "numbers").unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }
}
