//! Records -> live world
//!
//! Nothing here fails hard. Unresolved templates and unmatched anchors are
//! skipped and counted; the counts are diagnostics only.

use glam::{EulerRot, Quat, Vec3};

use crate::catalog::{PlacementType, TemplateCatalog};
use crate::config::RestoreConfig;
use crate::consts::*;
use crate::matcher::{find_anchor_by_pose, find_anchor_by_position};
use crate::records::{BoxRecord, PlaceholderRecord};
use crate::world::{AnchorId, AnchorRegistry, Physics, World};

/// Success/failure counts for one restore phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreTally {
    pub succeeded: usize,
    pub failed: usize,
}

impl RestoreTally {
    fn record(&mut self, ok: bool) {
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Outcome of a full load pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Live boxes removed before restoring
    pub boxes_destroyed: usize,
    pub boxes: RestoreTally,
    /// Restored boxes that found their anchor
    pub boxes_docked: usize,
    pub placeholders: RestoreTally,
}

/// Replace every live box with the boxes described by `records`.
pub fn restore_boxes<C>(
    records: &[BoxRecord],
    catalog: &C,
    world: &mut World,
    config: &RestoreConfig,
) -> RestoreReport
where
    C: TemplateCatalog + ?Sized,
{
    let mut report = RestoreReport {
        boxes_destroyed: world.destroy_all_boxes(),
        ..Default::default()
    };

    for record in records {
        // Exact name only
        let Some(template) = catalog.resolve_by_name(&record.template_name) else {
            report.boxes.record(false);
            continue;
        };
        if template.box_asset.is_none() {
            report.boxes.record(false);
            continue;
        }

        let id = world.spawn_box(Some(&template.name), record.position, record.rotation);
        if let Some(entity) = world.box_mut(id) {
            entity.is_stored = record.is_stored;
            entity.category = record.category;
            entity.product_id = record.product_id.clone();
            if record.is_stored {
                entity.physics = Physics::FROZEN;
            }
        }

        if let Some(target) = record.anchor() {
            let tolerance = config.box_anchor_tolerance;
            if let Some(anchor) = find_anchor_by_position(world.anchors(), target, tolerance) {
                if world.dock_box(id, anchor) {
                    report.boxes_docked += 1;
                }
            }
        }

        // TODO: this undoes the FROZEN state set above for stored boxes;
        // decide whether docked/stored boxes should stay kinematic.
        if let Some(entity) = world.box_mut(id) {
            entity.physics = Physics::DYNAMIC;
        }

        report.boxes.record(true);
    }

    log::info!(
        "Restored {} boxes ({} skipped, {} docked, {} replaced)",
        report.boxes.succeeded,
        report.boxes.failed,
        report.boxes_docked,
        report.boxes_destroyed
    );
    report
}

/// Final pose of an item in a slot for the given placement rule
pub fn item_pose(placement: PlacementType, slot: Vec3, anchor_rotation: Quat) -> (Vec3, Quat) {
    match placement {
        PlacementType::BakeryShelf => {
            (slot + Vec3::new(0.0, BAKERY_ITEM_LIFT, 0.0), Quat::IDENTITY)
        }
        PlacementType::Fridge => {
            // Lay the item on its side facing out of the fridge
            let tilt = Quat::from_euler(
                EulerRot::YXZ,
                (-90.0f32).to_radians(),
                (-90.0f32).to_radians(),
                0.0,
            );
            (
                slot + Vec3::new(0.0, FRIDGE_ITEM_LIFT, 0.0),
                anchor_rotation * tilt,
            )
        }
        PlacementType::DefaultShelf => {
            (slot + Vec3::new(0.0, SHELF_ITEM_LIFT, 0.0), anchor_rotation)
        }
    }
}

/// Refill one anchor from its record. Returns `false` if the template does
/// not resolve or the anchor is gone; the anchor is untouched in that case.
pub fn restore_placeholder<C>(
    record: &PlaceholderRecord,
    anchor_id: AnchorId,
    catalog: &C,
    world: &mut World,
) -> bool
where
    C: TemplateCatalog + ?Sized,
{
    let Some(template) = catalog.resolve_by_name(&record.template_name) else {
        log::warn!("Unknown template '{}' for placeholder", record.template_name);
        return false;
    };
    let Some(anchor) = world.anchor(anchor_id) else {
        return false;
    };
    let rotation = anchor.rotation;
    let slots: Vec<Vec3> = anchor.slots.iter().map(|s| s.position).collect();

    world.clear_slots(anchor_id);
    if let Some(anchor) = world.anchor_mut(anchor_id) {
        anchor.assigned_template = Some(template.name.clone());
        anchor.category = record.category;
        anchor.slot_id = record.slot_id.clone();
    }

    // zip truncates to capacity; extra records are dropped
    for (i, (slot, _)) in slots.iter().zip(&record.items).enumerate() {
        let (position, rot) = item_pose(template.placement_type, *slot, rotation);
        world.spawn_item(anchor_id, i, &template.name, position, rot);
    }

    if record.items.len() > slots.len() {
        log::debug!(
            "Placeholder {} holds {} slots, dropped {} saved items",
            record.slot_id,
            slots.len(),
            record.items.len() - slots.len()
        );
    }
    true
}

/// Match every record to a registered anchor by pose and refill it
pub fn restore_placeholders<C>(
    records: &[PlaceholderRecord],
    registry: &AnchorRegistry,
    catalog: &C,
    world: &mut World,
    config: &RestoreConfig,
) -> RestoreTally
where
    C: TemplateCatalog + ?Sized,
{
    let mut tally = RestoreTally::default();

    for record in records {
        let anchor = find_anchor_by_pose(
            registry.anchors().iter().filter_map(|&id| world.anchor(id)),
            record.position,
            record.rotation,
            config.anchor_position_tolerance,
            config.anchor_rotation_tolerance_deg,
        );

        let Some(anchor) = anchor else {
            log::warn!(
                "No anchor matches placeholder '{}' at {}",
                record.template_name,
                record.position
            );
            for a in registry.anchors().iter().filter_map(|&id| world.anchor(id)) {
                log::debug!(
                    "- {} ({})",
                    a.position,
                    a.assigned_template.as_deref().unwrap_or("none")
                );
            }
            tally.record(false);
            continue;
        };

        tally.record(restore_placeholder(record, anchor, catalog, world));
    }

    log::info!(
        "Placeholder restore: {} succeeded, {} failed",
        tally.succeeded,
        tally.failed
    );
    tally
}

/// Boxes, then placeholders
pub fn restore_all<C>(
    boxes: &[BoxRecord],
    placeholders: &[PlaceholderRecord],
    registry: &AnchorRegistry,
    catalog: &C,
    world: &mut World,
    config: &RestoreConfig,
) -> RestoreReport
where
    C: TemplateCatalog + ?Sized,
{
    let mut report = restore_boxes(boxes, catalog, world, config);
    report.placeholders = restore_placeholders(placeholders, registry, catalog, world, config);
    report
}
