//! Stockroom - box and shelf placement persistence
//!
//! Core modules:
//! - `records`: Persisted record shapes (wire contract) and upsert logic
//! - `persistence`: Key-value record stores and the record repository
//! - `catalog`: Template lookup by name
//! - `world`: Live world model (boxes, anchors, slots, items) and anchor registry
//! - `matcher`: Tolerance-based anchor lookup
//! - `capture`: Live world -> records
//! - `restore`: Records -> live world
//! - `sequencer`: Restore ordering against scene initialization
//! - `config`: Tunable keys, tolerances and registration barrier
//! - `error`: Store, catalog and config errors
//! - `platform`: Logging setup for web/native

pub mod capture;
pub mod catalog;
pub mod config;
pub mod error;
pub mod matcher;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod restore;
pub mod sequencer;
pub mod world;

pub use catalog::{Catalog, PlacementType, Template, TemplateCatalog};
pub use config::{RegistrationGate, RestoreConfig};
pub use error::{CatalogError, ConfigError, StoreError};
pub use persistence::{FileStore, MemoryStore, RecordRepository, RecordStore};
pub use records::{BoxRecord, Category, ItemRecord, PlaceholderRecord};
pub use restore::{RestoreReport, RestoreTally};
pub use sequencer::{RestoreEnv, RestoreSequencer, SequencerState, SessionMode};
pub use world::{AnchorId, AnchorRegistry, BoxId, ItemId, World};

use glam::{Quat, Vec3};

/// Matching and persistence constants
pub mod consts {
    /// Box upsert identity: same template within this distance is the same box
    pub const UPSERT_TOLERANCE: f32 = 0.1;
    /// Box -> anchor relink distance
    pub const BOX_ANCHOR_TOLERANCE: f32 = 0.1;
    /// Placeholder restore: position tolerance
    pub const ANCHOR_POSITION_TOLERANCE: f32 = 0.01;
    /// Placeholder restore: angular tolerance (degrees)
    pub const ANCHOR_ROTATION_TOLERANCE_DEG: f32 = 0.1;

    /// Store key for the box record set
    pub const SAVED_BOXES_KEY: &str = "SavedBoxes";
    /// Store key for the placeholder record set
    pub const SAVED_PLACEHOLDERS_KEY: &str = "SavedPlaceholders";

    /// Item offset above a bakery shelf slot
    pub const BAKERY_ITEM_LIFT: f32 = 0.15;
    /// Item offset above a fridge slot
    pub const FRIDGE_ITEM_LIFT: f32 = 0.45;
    /// Item offset above a regular shelf slot
    pub const SHELF_ITEM_LIFT: f32 = 0.235;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Angle between two rotations in degrees (0..=180)
#[inline]
pub fn angle_degrees(a: Quat, b: Quat) -> f32 {
    // atan2 form stays accurate near zero, where acos(dot) loses precision
    let rel = a.normalize().inverse() * b.normalize();
    (2.0 * rel.xyz().length().atan2(rel.w.abs())).to_degrees()
}
