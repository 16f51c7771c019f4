//! Live world -> records

use glam::Vec3;

use crate::records::{BoxRecord, ItemRecord, PlaceholderRecord};
use crate::world::{Anchor, BoxEntity, FillState, World};

/// Snapshot one box. `None` (logged) if the box has no resolved template.
///
/// A docked box records its anchor's position; an undocked one records
/// `Vec3::ZERO`.
pub fn capture_box(world: &World, entity: &BoxEntity) -> Option<BoxRecord> {
    let Some(template) = entity.template.as_ref() else {
        log::error!("Box {:?} has no template, not saving", entity.id);
        return None;
    };

    let anchor_position = entity
        .docked_at
        .and_then(|id| world.anchor(id))
        .map(|a| a.position)
        .unwrap_or(Vec3::ZERO);

    Some(BoxRecord {
        template_name: template.clone(),
        position: entity.position,
        rotation: entity.rotation,
        category: entity.category,
        product_id: entity.product_id.clone(),
        is_stored: entity.is_stored,
        anchor_position,
    })
}

/// Snapshot every active, stored box
pub fn capture_all_stored_boxes(world: &World) -> Vec<BoxRecord> {
    world
        .boxes()
        .iter()
        .filter(|b| b.active && b.is_stored)
        .filter_map(|b| capture_box(world, b))
        .collect()
}

/// Snapshot one anchor's contents. `None` for empty anchors and anchors
/// without an assigned template.
pub fn capture_placeholder(world: &World, anchor: &Anchor) -> Option<PlaceholderRecord> {
    if anchor.fill_state() == FillState::Empty {
        return None;
    }
    let Some(template) = anchor.assigned_template.as_ref() else {
        log::warn!(
            "Placeholder at {} has no assigned template - skipping",
            anchor.position
        );
        return None;
    };

    // Occupied slots only, in slot order
    let items = anchor
        .slots
        .iter()
        .filter_map(|slot| slot.occupant.and_then(|id| world.item(id)))
        .map(|item| ItemRecord {
            template_name: template.clone(),
            position: item.position,
            rotation: item.rotation,
        })
        .collect();

    Some(PlaceholderRecord {
        template_name: template.clone(),
        slot_id: anchor.slot_id.clone(),
        category: anchor.category,
        position: anchor.position,
        rotation: anchor.rotation,
        items,
    })
}

/// Snapshot every full or partially full anchor
pub fn capture_all_placeholders(world: &World) -> Vec<PlaceholderRecord> {
    let records: Vec<PlaceholderRecord> = world
        .anchors()
        .iter()
        .filter_map(|a| capture_placeholder(world, a))
        .collect();

    let total_items: usize = records.iter().map(|r| r.items.len()).sum();
    log::debug!(
        "Captured {} placeholders with {} items",
        records.len(),
        total_items
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Category;
    use glam::Quat;

    fn stored_box(world: &mut World, template: Option<&str>, pos: Vec3) -> crate::BoxId {
        let id = world.spawn_box(template, pos, Quat::IDENTITY);
        let b = world.box_mut(id).unwrap();
        b.is_stored = true;
        b.category = Category::Dairy;
        b.product_id = "M1".into();
        id
    }

    #[test]
    fn test_capture_box_undocked_has_zero_anchor() {
        let mut world = World::new();
        let id = stored_box(&mut world, Some("Milk"), Vec3::new(1.0, 0.0, 2.0));
        let record = capture_box(&world, world.box_entity(id).unwrap()).unwrap();
        assert_eq!(record.template_name, "Milk");
        assert_eq!(record.anchor_position, Vec3::ZERO);
        assert!(record.is_stored);
    }

    #[test]
    fn test_capture_box_docked_records_anchor_position() {
        let mut world = World::new();
        let a = world.add_anchor(Vec3::new(4.0, 0.0, 4.0), Quat::IDENTITY, &[]);
        let id = stored_box(&mut world, Some("Milk"), Vec3::ZERO);
        world.dock_box(id, a);

        let record = capture_box(&world, world.box_entity(id).unwrap()).unwrap();
        assert_eq!(record.anchor_position, Vec3::new(4.0, 0.0, 4.0));
    }

    #[test]
    fn test_capture_box_without_template_fails() {
        let mut world = World::new();
        let id = stored_box(&mut world, None, Vec3::ONE);
        assert!(capture_box(&world, world.box_entity(id).unwrap()).is_none());
    }

    #[test]
    fn test_capture_all_stored_filters() {
        let mut world = World::new();
        stored_box(&mut world, Some("Milk"), Vec3::X);
        stored_box(&mut world, None, Vec3::Y);
        let inactive = stored_box(&mut world, Some("Milk"), Vec3::Z);
        world.box_mut(inactive).unwrap().active = false;
        world.spawn_box(Some("Milk"), Vec3::ONE, Quat::IDENTITY);

        let records = capture_all_stored_boxes(&world);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].position, Vec3::X);
    }

    #[test]
    fn test_empty_anchor_not_captured() {
        let mut world = World::new();
        let a = world.add_anchor(Vec3::ONE, Quat::IDENTITY, &[Vec3::ONE, Vec3::ONE]);
        world.anchor_mut(a).unwrap().assigned_template = Some("Bread".into());
        assert!(capture_all_placeholders(&world).is_empty());
    }

    #[test]
    fn test_anchor_without_template_skipped() {
        let mut world = World::new();
        let a = world.add_anchor(Vec3::ONE, Quat::IDENTITY, &[Vec3::ONE]);
        world.spawn_item(a, 0, "Bread", Vec3::ONE, Quat::IDENTITY);
        assert!(capture_all_placeholders(&world).is_empty());
    }

    #[test]
    fn test_partial_anchor_items_in_slot_order() {
        let mut world = World::new();
        let slots = [Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 1.0, 0.0)];
        let a = world.add_anchor(Vec3::new(0.0, 0.0, 3.0), Quat::IDENTITY, &slots);
        {
            let anchor = world.anchor_mut(a).unwrap();
            anchor.assigned_template = Some("Bread".into());
            anchor.slot_id = "A1".into();
            anchor.category = Category::Bakery;
        }
        world.spawn_item(a, 2, "Bread", slots[2], Quat::IDENTITY);
        world.spawn_item(a, 0, "Bread", slots[0], Quat::IDENTITY);

        let records = capture_all_placeholders(&world);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.slot_id, "A1");
        assert_eq!(record.category, Category::Bakery);
        assert_eq!(record.items.len(), 2);
        assert_eq!(record.items[0].position, slots[0]);
        assert_eq!(record.items[1].position, slots[2]);
    }
}
