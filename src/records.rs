//! Persisted record shapes
//!
//! These structs are the on-disk contract. Field names are camelCase and
//! must stay stable for external save editors. Records carry a template
//! name and a pose only; live identity is re-established on load.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::UPSERT_TOLERANCE;
use crate::distance;

/// Product category of a box or shelf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    Dairy,
    Bakery,
    Produce,
    Frozen,
    Beverages,
    Snacks,
    Household,
    #[default]
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dairy => "Dairy",
            Category::Bakery => "Bakery",
            Category::Produce => "Produce",
            Category::Frozen => "Frozen",
            Category::Beverages => "Beverages",
            Category::Snacks => "Snacks",
            Category::Household => "Household",
            Category::General => "General",
        }
    }
}

/// One movable box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxRecord {
    pub template_name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub category: Category,
    pub product_id: String,
    pub is_stored: bool,
    /// `Vec3::ZERO` means "not docked". An anchor sitting exactly at the
    /// world origin is indistinguishable from no anchor.
    #[serde(default)]
    pub anchor_position: Vec3,
}

impl BoxRecord {
    /// Docked anchor position, if any
    pub fn anchor(&self) -> Option<Vec3> {
        (self.anchor_position != Vec3::ZERO).then_some(self.anchor_position)
    }

    /// Whether `other` names the same box for upsert purposes
    pub fn same_box(&self, other: &BoxRecord, tolerance: f32) -> bool {
        self.template_name == other.template_name
            && distance(self.position, other.position) < tolerance
    }
}

/// One item sitting in a placeholder slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub template_name: String,
    pub position: Vec3,
    pub rotation: Quat,
}

/// A non-empty placeholder and its contents, in slot order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderRecord {
    pub template_name: String,
    pub slot_id: String,
    pub category: Category,
    pub position: Vec3,
    pub rotation: Quat,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

/// `{ "boxes": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxSet {
    #[serde(default)]
    pub boxes: Vec<BoxRecord>,
}

/// `{ "placeholders": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceholderSet {
    #[serde(default)]
    pub placeholders: Vec<PlaceholderRecord>,
}

/// Replace the record matching (template, position within tolerance) or
/// append. Only the first match is replaced.
pub fn upsert_box_with(set: &mut Vec<BoxRecord>, record: BoxRecord, tolerance: f32) {
    match set.iter().position(|b| b.same_box(&record, tolerance)) {
        Some(i) => set[i] = record,
        None => set.push(record),
    }
}

/// [`upsert_box_with`] at the default tolerance
pub fn upsert_box(set: &mut Vec<BoxRecord>, record: BoxRecord) {
    upsert_box_with(set, record, UPSERT_TOLERANCE);
}
