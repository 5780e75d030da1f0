use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{read_json, write_json, DurableStore, StoreError};

/// Key holding the in-flight multi-key intent, if any.
pub const INTENT_KEY: &str = "pendingIntent";

/// A full post-image for one store key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedWrite {
    pub key: String,
    pub value: String,
}

/// A set of writes that must land together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub id: String,
    pub label: String,
    pub writes: Vec<StagedWrite>,
}

/// Redo log for multi-key updates.
///
/// The intent (every key's complete new value) is persisted before any key is
/// touched and cleared after the last one. Replaying an intent rewrites the
/// same post-images, so recovery can run any number of times.
pub struct IntentLog;

impl IntentLog {
    pub fn commit(
        store: &dyn DurableStore,
        label: &str,
        writes: Vec<StagedWrite>,
    ) -> Result<(), StoreError> {
        if let [single] = writes.as_slice() {
            return store.set(&single.key, &single.value);
        }

        let intent = Intent {
            id: uuid::Uuid::new_v4().to_string(),
            label: label.to_string(),
            writes,
        };
        write_json(store, INTENT_KEY, &intent)?;
        debug!(intent_id = %intent.id, label, keys = intent.writes.len(), "Intent recorded");

        apply(store, &intent)?;
        store.remove(INTENT_KEY)
    }

    /// Re-applies a pending intent left by an interrupted commit.
    pub fn recover(store: &dyn DurableStore) -> Result<Option<Intent>, StoreError> {
        let Some(intent) = read_json::<Intent>(store, INTENT_KEY)? else {
            return Ok(None);
        };
        warn!(intent_id = %intent.id, label = %intent.label, "Replaying interrupted intent");
        apply(store, &intent)?;
        store.remove(INTENT_KEY)?;
        info!(intent_id = %intent.id, "Intent recovered");
        Ok(Some(intent))
    }
}

fn apply(store: &dyn DurableStore, intent: &Intent) -> Result<(), StoreError> {
    for write in &intent.writes {
        store.set(&write.key, &write.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that fails every `set` to one key, simulating a tab closed mid-update.
    struct InterruptedStore {
        inner: MemoryStore,
        fail_key: &'static str,
        attempts: AtomicUsize,
    }

    impl DurableStore for InterruptedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == self.fail_key {
                self.attempts.fetch_add(1, Ordering::SeqCst);
                return Err(StoreError::Io {
                    key: key.to_string(),
                    message: "interrupted".to_string(),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    fn write(key: &str, value: &str) -> StagedWrite {
        StagedWrite {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_commit_writes_all_keys_and_clears_intent() {
        let store = MemoryStore::new();
        IntentLog::commit(&store, "pair", vec![write("a", "1"), write("b", "2")]).unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get(INTENT_KEY).unwrap(), None);
    }

    #[test]
    fn test_single_write_skips_intent() {
        let store = MemoryStore::new();
        IntentLog::commit(&store, "single", vec![write("a", "1")]).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_interrupted_commit_is_recovered() {
        let memory = MemoryStore::new();
        let interrupted = InterruptedStore {
            inner: memory.clone(),
            fail_key: "b",
            attempts: AtomicUsize::new(0),
        };

        let result = IntentLog::commit(&interrupted, "pair", vec![write("a", "1"), write("b", "2")]);
        assert!(result.is_err());
        assert_eq!(interrupted.attempts.load(Ordering::SeqCst), 1);

        // First key landed, second did not, intent still present.
        assert_eq!(memory.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(memory.get("b").unwrap(), None);
        assert!(memory.get(INTENT_KEY).unwrap().is_some());

        let recovered = IntentLog::recover(&memory).unwrap().unwrap();
        assert_eq!(recovered.label, "pair");
        assert_eq!(memory.get("b").unwrap().as_deref(), Some("2"));
        assert_eq!(memory.get(INTENT_KEY).unwrap(), None);

        // Nothing left to replay.
        assert_eq!(IntentLog::recover(&memory).unwrap(), None);
    }

    #[test]
    fn test_replay_is_idempotent() {
        let store = MemoryStore::new();
        let intent = Intent {
            id: "i-1".into(),
            label: "pair".into(),
            writes: vec![write("a", "1"), write("b", "2")],
        };

        for _ in 0..2 {
            write_json(&store, INTENT_KEY, &intent).unwrap();
            IntentLog::recover(&store).unwrap();
        }

        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }
}
