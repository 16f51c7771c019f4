//! End-to-end save -> restart -> restore through a file-backed store.

use glam::{Quat, Vec3};
use stockroom::catalog::{Catalog, PlacementType, Template};
use stockroom::persistence::{FileStore, RecordRepository};
use stockroom::world::{AnchorId, AnchorRegistry, World};
use stockroom::{Category, RegistrationGate, RestoreConfig, RestoreEnv, RestoreSequencer};
use stockroom::{SequencerState, SessionMode};

fn catalog() -> Catalog {
    Catalog::new(vec![
        Template::new("Milk", PlacementType::Fridge),
        Template::new("Cereal", PlacementType::DefaultShelf),
        Template::new("Bread", PlacementType::BakeryShelf),
    ])
    .unwrap()
}

/// The fixed shop layout every session starts from
fn build_scene(world: &mut World) -> (AnchorId, AnchorId, AnchorId) {
    let pallet = world.add_anchor(Vec3::new(-3.0, 0.0, 1.0), Quat::IDENTITY, &[]);
    let fridge_rot = Quat::from_rotation_y(std::f32::consts::PI);
    let fridge_slots: Vec<Vec3> = (0..4)
        .map(|i| Vec3::new(6.0, 0.5 + i as f32 * 0.4, 2.0))
        .collect();
    let fridge = world.add_anchor(Vec3::new(6.0, 0.0, 2.0), fridge_rot, &fridge_slots);
    let bakery_slots: Vec<Vec3> = (0..3).map(|i| Vec3::new(i as f32 * 0.3, 1.0, 9.0)).collect();
    let bakery = world.add_anchor(Vec3::new(0.0, 0.0, 9.0), Quat::IDENTITY, &bakery_slots);
    (pallet, fridge, bakery)
}

fn play_and_save(path: &std::path::Path) {
    let mut world = World::new();
    let (pallet, fridge, _bakery) = build_scene(&mut world);

    let milk = world.spawn_box(Some("Milk"), Vec3::new(1.0, 0.0, 2.0), Quat::IDENTITY);
    {
        let b = world.box_mut(milk).unwrap();
        b.is_stored = true;
        b.category = Category::Dairy;
        b.product_id = "M1".into();
    }
    let cereal_rot = Quat::from_rotation_y(0.75);
    let cereal = world.spawn_box(Some("Cereal"), Vec3::new(-2.0, 0.0, 0.0), cereal_rot);
    {
        let b = world.box_mut(cereal).unwrap();
        b.is_stored = true;
        b.category = Category::Snacks;
        b.product_id = "C7".into();
    }
    world.dock_box(cereal, pallet);
    // Loose box on the floor: not stored, not saved
    world.spawn_box(Some("Milk"), Vec3::new(9.0, 0.0, 9.0), Quat::IDENTITY);

    {
        let a = world.anchor_mut(fridge).unwrap();
        a.assigned_template = Some("Milk".into());
        a.category = Category::Dairy;
        a.slot_id = "F2".into();
    }
    for slot in 0..3 {
        world.spawn_item(fridge, slot, "Milk", Vec3::ZERO, Quat::IDENTITY);
    }

    let mut repo = RecordRepository::new(FileStore::open(path), RestoreConfig::default());
    assert_eq!(repo.save_all_boxes(&world), 2);
    assert_eq!(repo.save_all_placeholders(&world), 1);
}

#[test]
fn test_full_session_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stockroom.json");
    play_and_save(&path);

    // New session
    let catalog = catalog();
    let mut world = World::new();
    let (pallet, fridge, bakery) = build_scene(&mut world);
    let mut registry = AnchorRegistry::new();
    let mut repo = RecordRepository::new(FileStore::open(&path), RestoreConfig::default());
    let mut sequencer = RestoreSequencer::new(RegistrationGate::ExpectedCount(3));

    assert!(sequencer.start(SessionMode::Gameplay, &mut registry));
    sequencer.notify_world_ready();
    for id in [pallet, fridge, bakery] {
        registry.register(id);
    }

    let mut state = SequencerState::Idle;
    for _ in 0..4 {
        let mut env = RestoreEnv {
            repository: &mut repo,
            catalog: &catalog,
            world: &mut world,
            registry: &registry,
        };
        state = sequencer.tick(&mut env);
    }
    assert_eq!(state, SequencerState::Done);

    // Boxes
    assert_eq!(world.boxes().len(), 2);
    let milk = world.boxes().iter().find(|b| b.product_id == "M1").unwrap();
    assert!((milk.position - Vec3::new(1.0, 0.0, 2.0)).length() < 1e-3);
    assert!(milk.rotation.abs_diff_eq(Quat::IDENTITY, 1e-3));
    assert_eq!(milk.category, Category::Dairy);
    assert!(milk.is_stored);
    assert_eq!(milk.docked_at, None);

    let cereal = world.boxes().iter().find(|b| b.product_id == "C7").unwrap();
    assert_eq!(cereal.docked_at, Some(pallet));
    assert_eq!(cereal.category, Category::Snacks);

    // Fridge refilled, bakery untouched
    let fridge = world.anchor(fridge).unwrap();
    assert_eq!(fridge.occupied(), 3);
    assert_eq!(fridge.assigned_template.as_deref(), Some("Milk"));
    assert_eq!(fridge.slot_id, "F2");
    assert!(world.anchor(bakery).unwrap().is_empty);

    let report = sequencer.report();
    assert_eq!(report.boxes.succeeded, 2);
    assert_eq!(report.placeholders.succeeded, 1);
    assert_eq!(report.placeholders.failed, 0);
}

#[test]
fn test_fresh_install_restores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let catalog = catalog();
    let mut world = World::new();
    let (_, fridge, bakery) = build_scene(&mut world);
    let mut registry = AnchorRegistry::new();
    let mut repo = RecordRepository::new(FileStore::open(&path), RestoreConfig::default());
    let mut sequencer = RestoreSequencer::from_config(&RestoreConfig::default().with_legacy_wait());

    sequencer.start(SessionMode::Gameplay, &mut registry);
    sequencer.notify_world_ready();
    for _ in 0..3 {
        let mut env = RestoreEnv {
            repository: &mut repo,
            catalog: &catalog,
            world: &mut world,
            registry: &registry,
        };
        sequencer.tick(&mut env);
    }

    assert!(sequencer.is_done());
    assert!(world.boxes().is_empty());
    assert!(world.anchor(fridge).unwrap().is_empty);
    assert!(world.anchor(bakery).unwrap().is_empty);
}
