use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::entity::Entity;

use super::{encode_json, read_json, DurableStore, StagedWrite, StoreError};

/// A typed snapshot of one whole collection read from the store.
///
/// Mutations apply to the snapshot only; nothing reaches the store until the
/// snapshot is saved (or staged into an intent). Updates and actions run on a
/// copy of the record, so a rejected hook leaves the snapshot untouched.
///
/// Records are written back exactly as they were read unless they changed.
/// A record that does not parse is kept as it is: it counts towards `len`
/// but no lookup sees it.
#[derive(Debug, Clone)]
pub struct Collection<T: Entity> {
    slots: Vec<Slot<T>>,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    /// The stored JSON, dropped once the record changes.
    raw: Option<Value>,
    item: Option<T>,
}

impl<T> Slot<T> {
    fn fresh(item: T) -> Self {
        Self {
            raw: None,
            item: Some(item),
        }
    }
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: Entity> Collection<T> {
    /// Reads the collection; a missing key is an empty collection.
    pub fn load(store: &dyn DurableStore) -> Result<Self, StoreError> {
        let raw = read_json::<Vec<Value>>(store, T::COLLECTION_KEY)?.unwrap_or_default();
        let slots = raw
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let item = match T::deserialize(&value) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        warn!(key = T::COLLECTION_KEY, index, error = %e, "Keeping unreadable record as is");
                        None
                    }
                };
                Slot {
                    raw: Some(value),
                    item,
                }
            })
            .collect();
        Ok(Self { slots })
    }

    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            slots: items.into_iter().map(Slot::fresh).collect(),
        }
    }

    /// Replaces the stored collection with this snapshot.
    pub fn save(&self, store: &dyn DurableStore) -> Result<(), StoreError> {
        let staged = self.stage()?;
        store.set(&staged.key, &staged.value)
    }

    /// Encodes the snapshot as a pending write for an intent.
    pub fn stage(&self) -> Result<StagedWrite, StoreError> {
        let values = self
            .slots
            .iter()
            .map(|slot| match (&slot.raw, &slot.item) {
                (Some(raw), _) => Ok(raw.clone()),
                (None, Some(item)) => serde_json::to_value(item).map_err(|e| StoreError::Encode {
                    key: T::COLLECTION_KEY.to_string(),
                    message: e.to_string(),
                }),
                (None, None) => Ok(Value::Null),
            })
            .collect::<Result<Vec<Value>, StoreError>>()?;
        Ok(StagedWrite {
            key: T::COLLECTION_KEY.to_string(),
            value: encode_json(T::COLLECTION_KEY, &values)?,
        })
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Readable records, in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.item.as_ref())
    }

    /// Number of stored records, unreadable ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.slots.into_iter().filter_map(|slot| slot.item).collect()
    }

    /// Builds a record through the create hooks and appends it.
    pub fn create(&mut self, id: String, params: T::CreateParams) -> Result<&T, T::Error> {
        let mut item = T::from_create_params(id, params)?;
        item.on_create()?;
        let id = item.id().to_string();
        self.slots.push(Slot::fresh(item));
        self.record(self.slots.len() - 1, &id)
    }

    pub fn update(&mut self, id: &str, patch: T::Patch) -> Result<&T, T::Error> {
        let index = self.position(id)?;
        let mut candidate = self.record(index, id)?.clone();
        candidate.on_update(patch)?;
        self.replace(index, candidate);
        self.record(index, id)
    }

    /// Removes a record. An absent id is not an error and yields `None`.
    pub fn remove(&mut self, id: &str) -> Result<Option<T>, T::Error> {
        let Some(index) = self.find(id) else {
            return Ok(None);
        };
        self.record(index, id)?.on_delete()?;
        Ok(self.slots.remove(index).item)
    }

    pub fn perform_action(&mut self, id: &str, action: T::Action) -> Result<T::ActionResult, T::Error> {
        let index = self.position(id)?;
        let mut candidate = self.record(index, id)?.clone();
        let result = candidate.handle_action(action)?;
        self.replace(index, candidate);
        Ok(result)
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.item.as_ref().is_some_and(|item| item.id() == id))
    }

    fn position(&self, id: &str) -> Result<usize, T::Error> {
        self.find(id).ok_or_else(|| T::not_found(id))
    }

    fn record(&self, index: usize, id: &str) -> Result<&T, T::Error> {
        self.slots[index].item.as_ref().ok_or_else(|| T::not_found(id))
    }

    fn replace(&mut self, index: usize, candidate: T) {
        let slot = &mut self.slots[index];
        if slot.item.as_ref() != Some(&candidate) {
            *slot = Slot::fresh(candidate);
        }
    }
}
