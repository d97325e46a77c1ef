//! Saved segments in browser storage.
//!
//! The store is best effort: a missing or corrupt slot reads as "no segments"
//! and failed writes are logged and dropped, so the UI never breaks on
//! storage trouble. Writes never lose what they could not read: undecodable
//! records are carried through, and a slot that isn't an array is backed up
//! before it is replaced.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::types::Segment;

/// Storage key holding the JSON array of segments
pub const STORAGE_KEY: &str = "savedSegments";

/// Where a slot that isn't a JSON array is kept before it gets replaced
pub const BACKUP_KEY: &str = "savedSegments.unreadable";

/// A string key-value slot, e.g. `localStorage`
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

/// The browser's `localStorage`
///
/// The handle is looked up on every call, which keeps this type `Send + Sync`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage, String> {
        web_sys::window()
            .ok_or_else(|| "No window available".to_string())?
            .local_storage()
            .map_err(|e| format!("localStorage is not accessible: {:?}", e))?
            .ok_or_else(|| "localStorage is not available".to_string())
    }

    /// Whether `localStorage` can be reached at all
    pub fn is_available() -> bool {
        Self::storage().is_ok()
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| format!("Failed to write '{}': {:?}", key, e))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| format!("Failed to remove '{}': {:?}", key, e))
    }
}

/// Process-local storage for tests and for browsers with storage disabled
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.entries().remove(key);
        Ok(())
    }
}

/// One entry of the stored array. Entries that don't decode are carried
/// through writes untouched.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum Record {
    Segment(Segment),
    Unreadable(Value),
}

/// Handle returned by [`SegmentStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, Listener)>>,
}

/// CRUD over the saved segments plus change notifications.
///
/// Cloning is cheap; clones share the backing storage and the listener list.
#[derive(Clone)]
pub struct SegmentStore {
    storage: Arc<dyn KeyValueStorage>,
    listeners: Arc<Listeners>,
}

impl SegmentStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            listeners: Arc::new(Listeners::default()),
        }
    }

    /// Store over `localStorage`, or memory if the browser refuses storage
    pub fn browser() -> Self {
        if BrowserStorage::is_available() {
            Self::new(Arc::new(BrowserStorage))
        } else {
            log::warn!("localStorage unavailable, segments will not survive a reload");
            Self::new(Arc::new(MemoryStorage::new()))
        }
    }

    /// Every readable segment. Records that don't decode are left out here
    /// but stay in storage.
    pub fn load_all(&self) -> Vec<Segment> {
        self.read()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|record| match record {
                Record::Segment(segment) => Some(segment),
                Record::Unreadable(_) => None,
            })
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<Segment> {
        self.load_all().into_iter().find(|s| s.id == id)
    }

    /// Replace the segment with the same id in place, or append it.
    /// The timestamp is always set to now. Returns the stored record.
    pub fn upsert(&self, mut segment: Segment) -> Segment {
        segment.timestamp = Some(Utc::now());

        let mut records = self.read_for_write();
        let existing = records.iter_mut().find(|r| match r {
            Record::Segment(s) => s.id == segment.id,
            Record::Unreadable(_) => false,
        });
        match existing {
            Some(record) => *record = Record::Segment(segment.clone()),
            None => records.push(Record::Segment(segment.clone())),
        }

        self.write(&records);
        self.notify();
        segment
    }

    /// Remove the segment with this id. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let Some(mut records) = self.read() else {
            return false;
        };
        let before = records.len();
        records.retain(|r| !matches!(r, Record::Segment(s) if s.id == id));
        if records.len() == before {
            return false;
        }

        self.write(&records);
        self.notify();
        true
    }

    pub fn remove_all(&self) {
        if let Err(e) = self.storage.remove(STORAGE_KEY) {
            log::warn!("Failed to clear saved segments: {}", e);
        }
        self.notify();
    }

    /// Register a callback run after every change to the saved segments
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.listeners.next_id.fetch_add(1, Ordering::Relaxed));
        self.listener_entries().push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listener_entries().retain(|(sid, _)| *sid != id);
    }

    /// Decode the slot record by record. `None` when it isn't a JSON array.
    fn read(&self) -> Option<Vec<Record>> {
        let Some(raw) = self.storage.get(STORAGE_KEY) else {
            return Some(Vec::new());
        };
        let values = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Ignoring unreadable saved segments: {}", e);
                return None;
            }
        };

        Some(
            values
                .into_iter()
                .map(|value| match serde_json::from_value::<Segment>(value.clone()) {
                    Ok(segment) => Record::Segment(segment),
                    Err(e) => {
                        log::warn!("Skipping unreadable saved segment: {}", e);
                        Record::Unreadable(value)
                    }
                })
                .collect(),
        )
    }

    /// Like `read`, but a slot that isn't an array is copied to
    /// `BACKUP_KEY` first so the write that follows can't destroy it.
    fn read_for_write(&self) -> Vec<Record> {
        if let Some(records) = self.read() {
            return records;
        }
        if let Some(raw) = self.storage.get(STORAGE_KEY) {
            match self.storage.set(BACKUP_KEY, &raw) {
                Ok(()) => log::warn!("Moved unreadable saved segments to '{}'", BACKUP_KEY),
                Err(e) => log::warn!("Failed to back up unreadable saved segments: {}", e),
            }
        }
        Vec::new()
    }

    fn write(&self, records: &[Record]) {
        let result = serde_json::to_string(records)
            .map_err(|e| e.to_string())
            .and_then(|json| self.storage.set(STORAGE_KEY, &json));
        if let Err(e) = result {
            log::warn!("Failed to save segments: {}", e);
        }
    }

    fn notify(&self) {
        // Snapshot first so a listener may subscribe or unsubscribe while running
        let listeners: Vec<Listener> = self
            .listener_entries()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    fn listener_entries(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.listeners
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
