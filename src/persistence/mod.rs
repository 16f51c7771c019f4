//! Save/load of record sets through a key-value store
//!
//! Features:
//! - JSON wrappers `{ "boxes": [...] }` / `{ "placeholders": [...] }`
//! - Full-set replace (`save_all_boxes`) and single-box upsert (`save_box`)
//! - Empty or corrupt blobs load as "no saved data"
//! - Write verification; failures are logged, never returned

pub mod store;

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;
pub use store::{FileStore, MemoryStore, RecordStore};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::capture::{capture_all_placeholders, capture_all_stored_boxes, capture_box};
use crate::config::RestoreConfig;
use crate::error::StoreError;
use crate::records::{BoxRecord, BoxSet, PlaceholderRecord, PlaceholderSet, upsert_box_with};
use crate::world::{BoxId, World};

/// Reads and writes record sets, keeping the last known box set for the
/// rest of the session.
pub struct RecordRepository<S: RecordStore> {
    store: S,
    config: RestoreConfig,
    saved_boxes: Vec<BoxRecord>,
    on_cleared: Vec<Box<dyn FnMut()>>,
}

impl<S: RecordStore> RecordRepository<S> {
    pub fn new(store: S, config: RestoreConfig) -> Self {
        Self {
            store,
            config,
            saved_boxes: Vec::new(),
            on_cleared: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &RestoreConfig {
        &self.config
    }

    /// Box set as of the last load or save this session
    pub fn saved_boxes(&self) -> &[BoxRecord] {
        &self.saved_boxes
    }

    /// Register a listener fired by [`RecordRepository::clear_all`]
    pub fn on_data_cleared(&mut self, listener: impl FnMut() + 'static) {
        self.on_cleared.push(Box::new(listener));
    }

    // === Load ===

    /// Persisted box set; also becomes the session's `saved_boxes`
    pub fn load_boxes(&mut self) -> Vec<BoxRecord> {
        let set: BoxSet = self.read_set(&self.config.box_key);
        log::info!("Loaded {} saved boxes", set.boxes.len());
        self.saved_boxes = set.boxes.clone();
        set.boxes
    }

    pub fn load_placeholders(&self) -> Vec<PlaceholderRecord> {
        let set: PlaceholderSet = self.read_set(&self.config.placeholder_key);
        log::info!("Loaded {} saved placeholders", set.placeholders.len());
        set.placeholders
    }

    fn read_set<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(json) = self.store.get_string(key).filter(|s| !s.is_empty()) else {
            return T::default();
        };
        match serde_json::from_str(&json) {
            Ok(set) => set,
            Err(e) => {
                log::warn!("Saved data under '{}' is unreadable, ignoring: {}", key, e);
                T::default()
            }
        }
    }

    // === Save ===

    /// Incremental save of one box: replaces the persisted record with the
    /// same template and position (within tolerance) or appends.
    pub fn save_box(&mut self, world: &World, id: BoxId) -> bool {
        let Some(record) = world.box_entity(id).and_then(|b| capture_box(world, b)) else {
            return false;
        };
        log::debug!("Saving box with template: {}", record.template_name);

        let mut boxes = self.read_set::<BoxSet>(&self.config.box_key).boxes;
        upsert_box_with(&mut boxes, record, self.config.upsert_tolerance);
        self.write_boxes(boxes)
    }

    /// Replace the persisted box set with every active, stored box
    pub fn save_all_boxes(&mut self, world: &World) -> usize {
        let boxes = capture_all_stored_boxes(world);
        let n = boxes.len();
        self.write_boxes(boxes);
        n
    }

    /// Replace the persisted placeholder set with every non-empty anchor
    pub fn save_all_placeholders(&mut self, world: &World) -> usize {
        let set = PlaceholderSet {
            placeholders: capture_all_placeholders(world),
        };
        let n = set.placeholders.len();
        let key = self.config.placeholder_key.clone();
        match self.write_set(&key, &set) {
            Ok(()) => log::info!("Saved {} placeholders", n),
            Err(e) => log::error!("Placeholder save failed: {}", e),
        }
        n
    }

    fn write_boxes(&mut self, boxes: Vec<BoxRecord>) -> bool {
        let set = BoxSet { boxes };
        let key = self.config.box_key.clone();
        let ok = match self.write_set(&key, &set) {
            Ok(()) => {
                log::info!("Saved {} boxes", set.boxes.len());
                true
            }
            Err(e) => {
                log::error!("Box save failed: {}", e);
                false
            }
        };
        self.saved_boxes = set.boxes;
        ok
    }

    fn write_set<T: Serialize>(&mut self, key: &str, set: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(set)?;
        self.store.set_string(key, &json)?;
        if !self.store.has_key(key) {
            return Err(StoreError::WriteNotVisible {
                key: key.to_string(),
            });
        }
        self.store.flush()
    }

    // === Clear ===

    /// Forget the box set, in memory and in the store
    pub fn clear_boxes(&mut self) {
        self.saved_boxes.clear();
        self.store.delete_key(&self.config.box_key);
        if let Err(e) = self.store.flush() {
            log::error!("Flush after clearing boxes failed: {}", e);
        }
        log::info!("Cleared all box save data");
    }

    /// Delete both record sets and notify listeners
    pub fn clear_all(&mut self) {
        self.clear_boxes();
        self.store.delete_key(&self.config.placeholder_key);
        if let Err(e) = self.store.flush() {
            log::error!("Flush after clearing placeholders failed: {}", e);
        }
        for listener in &mut self.on_cleared {
            listener();
        }
    }
}
