//! Live world model
//!
//! The host environment owns rendering and physics; this is the view of
//! its boxes, anchors and shelf items that capture reads and restore
//! writes. Hosts mirror changes from here onto their scene objects.
//!
//! Iteration order is insertion order, which is also scan order for the
//! matcher (first match wins).

pub mod registry;

pub use registry::AnchorRegistry;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::records::Category;

/// Handle to a live box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoxId(pub u32);

/// Handle to a live anchor (shelf, fridge, pallet spot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub u32);

/// Handle to a live shelf item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Rigid body flags the host applies to its physics object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Physics {
    pub kinematic: bool,
    pub gravity: bool,
    pub collider: bool,
}

impl Physics {
    /// Simulated: falls, collides
    pub const DYNAMIC: Physics = Physics {
        kinematic: false,
        gravity: true,
        collider: true,
    };

    /// Held in place: kinematic, no gravity, collider off
    pub const FROZEN: Physics = Physics {
        kinematic: true,
        gravity: false,
        collider: false,
    };

    pub fn is_frozen(&self) -> bool {
        *self == Self::FROZEN
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::DYNAMIC
    }
}

/// A movable box
#[derive(Debug, Clone)]
pub struct BoxEntity {
    pub id: BoxId,
    /// Resolved template name; `None` if the box was spawned without one
    pub template: Option<String>,
    pub position: Vec3,
    pub rotation: Quat,
    pub category: Category,
    pub product_id: String,
    pub is_stored: bool,
    /// Inactive boxes are skipped by capture but still destroyed on restore
    pub active: bool,
    pub physics: Physics,
    /// Anchor this box is docked at
    pub docked_at: Option<AnchorId>,
}

/// Fill level of an anchor's slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillState {
    Empty,
    Partial,
    Full,
}

/// One item position on an anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// World-space slot position
    pub position: Vec3,
    pub occupant: Option<ItemId>,
}

/// A fixed placement site with an ordered, fixed-size list of slots
#[derive(Debug, Clone)]
pub struct Anchor {
    pub id: AnchorId,
    pub position: Vec3,
    pub rotation: Quat,
    /// Where a docked box sits (world space)
    pub attach_point: Vec3,
    pub slots: Vec<Slot>,
    pub is_empty: bool,
    pub assigned_template: Option<String>,
    pub category: Category,
    pub slot_id: String,
}

impl Anchor {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.occupant.is_some()).count()
    }

    pub fn fill_state(&self) -> FillState {
        match self.occupied() {
            0 => FillState::Empty,
            n if n >= self.capacity() => FillState::Full,
            _ => FillState::Partial,
        }
    }
}

/// An item instantiated into an anchor slot
#[derive(Debug, Clone)]
pub struct ItemEntity {
    pub id: ItemId,
    pub template: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub anchor: AnchorId,
    pub slot: usize,
}

/// All live boxes, anchors and shelf items
#[derive(Debug, Clone)]
pub struct World {
    boxes: Vec<BoxEntity>,
    anchors: Vec<Anchor>,
    items: Vec<ItemEntity>,
    next_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            boxes: Vec::new(),
            anchors: Vec::new(),
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID (shared across entity kinds)
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // === Boxes ===

    /// Spawn an active, dynamic box with default metadata
    pub fn spawn_box(&mut self, template: Option<&str>, position: Vec3, rotation: Quat) -> BoxId {
        let id = BoxId(self.next_entity_id());
        self.boxes.push(BoxEntity {
            id,
            template: template.map(str::to_string),
            position,
            rotation,
            category: Category::default(),
            product_id: String::new(),
            is_stored: false,
            active: true,
            physics: Physics::DYNAMIC,
            docked_at: None,
        });
        id
    }

    pub fn boxes(&self) -> &[BoxEntity] {
        &self.boxes
    }

    pub fn box_entity(&self, id: BoxId) -> Option<&BoxEntity> {
        self.boxes.iter().find(|b| b.id == id)
    }

    pub fn box_mut(&mut self, id: BoxId) -> Option<&mut BoxEntity> {
        self.boxes.iter_mut().find(|b| b.id == id)
    }

    /// Remove every box, active or not. Returns how many were removed.
    pub fn destroy_all_boxes(&mut self) -> usize {
        let n = self.boxes.len();
        self.boxes.clear();
        n
    }

    /// Parent a box to an anchor's attach point with zero local offset
    pub fn dock_box(&mut self, box_id: BoxId, anchor_id: AnchorId) -> bool {
        let Some(anchor) = self.anchors.iter_mut().find(|a| a.id == anchor_id) else {
            return false;
        };
        let Some(entity) = self.boxes.iter_mut().find(|b| b.id == box_id) else {
            return false;
        };

        entity.position = anchor.attach_point;
        entity.rotation = anchor.rotation;
        entity.docked_at = Some(anchor_id);
        anchor.is_empty = false;
        true
    }

    // === Anchors ===

    /// Add an empty anchor. The attach point defaults to the anchor position.
    pub fn add_anchor(&mut self, position: Vec3, rotation: Quat, slots: &[Vec3]) -> AnchorId {
        let id = AnchorId(self.next_entity_id());
        self.anchors.push(Anchor {
            id,
            position,
            rotation,
            attach_point: position,
            slots: slots
                .iter()
                .map(|&position| Slot {
                    position,
                    occupant: None,
                })
                .collect(),
            is_empty: true,
            assigned_template: None,
            category: Category::default(),
            slot_id: String::new(),
        });
        id
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.id == id)
    }

    pub fn anchor_mut(&mut self, id: AnchorId) -> Option<&mut Anchor> {
        self.anchors.iter_mut().find(|a| a.id == id)
    }

    // === Items ===

    pub fn items(&self) -> &[ItemEntity] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemEntity> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Instantiate an item into `slot` of `anchor`. Fails if the anchor or
    /// slot does not exist or the slot is already occupied.
    pub fn spawn_item(
        &mut self,
        anchor_id: AnchorId,
        slot: usize,
        template: &str,
        position: Vec3,
        rotation: Quat,
    ) -> Option<ItemId> {
        let id = ItemId(self.next_id);
        let anchor = self.anchors.iter_mut().find(|a| a.id == anchor_id)?;
        let target = anchor.slots.get_mut(slot)?;
        if target.occupant.is_some() {
            return None;
        }
        target.occupant = Some(id);
        anchor.is_empty = false;

        self.next_id += 1;
        self.items.push(ItemEntity {
            id,
            template: template.to_string(),
            position,
            rotation,
            anchor: anchor_id,
            slot,
        });
        Some(id)
    }

    /// Destroy every item in the anchor's slots. Returns how many were removed.
    pub fn clear_slots(&mut self, anchor_id: AnchorId) -> usize {
        let Some(anchor) = self.anchors.iter_mut().find(|a| a.id == anchor_id) else {
            return 0;
        };
        let mut removed = 0;
        for slot in &mut anchor.slots {
            if let Some(item_id) = slot.occupant.take() {
                self.items.retain(|i| i.id != item_id);
                removed += 1;
            }
        }
        // A docked box still occupies the anchor
        anchor.is_empty = !self.boxes.iter().any(|b| b.docked_at == Some(anchor_id));
        removed
    }
}
