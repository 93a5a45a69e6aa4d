use glam::IVec3;
use softvox::*;
use std::collections::HashSet;

/// Tests for the chunk window: recentering, block edits and face exposure

fn noise_world(radius: i32, center: IVec3) -> World {
    let mut world = World::new(WorldConfig { radius }, TerrainSource::default());
    world.recenter(center);
    world
}

#[test]
fn recenter_covers_the_cube_around_center() {
    for center in [IVec3::new(0, 1, 0), IVec3::new(-3, 0, 5), IVec3::new(9, 2, -9)] {
        let world = noise_world(1, center);
        let offsets: HashSet<IVec3> = world.chunks().iter().map(|c| c.offset).collect();

        assert_eq!(offsets.len(), 27, "Slots must hold distinct chunks");
        for (slot, chunk) in world.chunks().iter().enumerate() {
            let d = chunk.offset - center;
            assert!(d.abs().max_element() <= 1, "Chunk {:?} outside window", chunk.offset);
            assert_eq!(world.slot_of(chunk.offset), Some(slot));
        }
        assert_eq!(world.center(), Some(center));
    }
}

#[test]
fn recenter_is_repeatable() {
    let mut world = noise_world(1, IVec3::new(0, 1, 0));
    let before: Vec<(IVec3, Block)> = world.solid_blocks().collect();

    world.recenter(IVec3::new(4, 1, -2));
    world.recenter(IVec3::new(0, 1, 0));
    let after: Vec<(IVec3, Block)> = world.solid_blocks().collect();

    assert_eq!(before, after, "Returning to a chunk must regenerate the same blocks");
}

#[test]
fn exposed_faces_match_neighbour_occupancy() {
    let world = noise_world(1, IVec3::new(0, 1, 0));
    assert!(world.solid_count() > 0, "Default terrain should not be empty");

    for (pos, _) in world.solid_blocks() {
        let mask = world.exposed_faces(pos);
        for face in FaceDir::ALL {
            let neighbour_solid = world.is_solid(pos + face.offset());
            assert_eq!(
                mask.has(face),
                !neighbour_solid,
                "Face {:?} of {:?} disagrees with its neighbour",
                face,
                pos
            );
        }
    }
}

#[test]
fn shared_faces_are_hidden_from_both_sides() {
    let mut world = World::new(WorldConfig::default(), TerrainSource::Empty);
    world.recenter(IVec3::ZERO);

    // A pair straddling the chunk boundary on x.
    let a = IVec3::new(6, 3, 3);
    let b = IVec3::new(7, 3, 3);
    world.set_block(a, Block::SOLID);
    world.set_block(b, Block::SOLID);

    assert!(!world.face_exposed(a, FaceDir::PosX));
    assert!(!world.face_exposed(b, FaceDir::NegX));
    assert_eq!(world.exposed_faces(a).bits().count_ones(), 5);
    assert_eq!(world.exposed_faces(b).bits().count_ones(), 5);
}

#[test]
fn window_edge_faces_are_exposed() {
    let mut world = World::new(WorldConfig::default(), TerrainSource::Empty);
    world.recenter(IVec3::ZERO);

    // x = -7 is the first column of the window; its -X neighbour is unloaded.
    let edge = IVec3::new(-7, 0, 0);
    world.set_block(edge, Block::SOLID);
    world.set_block(edge - IVec3::X, Block::SOLID);

    assert!(!world.contains(edge - IVec3::X));
    assert!(world.face_exposed(edge, FaceDir::NegX));
}

#[test]
fn window_top_faces_are_exposed_and_drawn() {
    // Solid all the way through the window and beyond it.
    let mut world = World::new(WorldConfig::default(), TerrainSource::Flat { surface_y: 100 });
    world.recenter(IVec3::ZERO);

    let top = IVec3::new(0, 13, 0);
    assert!(world.is_solid(top));
    assert!(!world.contains(top + IVec3::Y));
    assert!(world.face_exposed(top, FaceDir::PosY));
    assert!(
        world.exposed_faces(top).has(FaceDir::PosY),
        "Top face under the unloaded layer must count as exposed"
    );

    // Seams inside the window are still sealed.
    let seam = IVec3::new(0, 6, 0);
    assert!(world.get_block(seam).is_some_and(Block::is_enclosed));
    assert!(world.exposed_faces(seam).is_empty());

    let mut visible = VisibleSet::new();
    visible.rebuild(&world);
    let candidate = visible
        .candidates()
        .iter()
        .find(|c| c.position == top)
        .expect("window-top block should be a candidate");
    assert!(candidate.faces.has(FaceDir::PosY));
    assert!(visible.candidates().iter().all(|c| c.position != seam));
}

#[test]
fn edits_outside_window_do_nothing() {
    let mut world = noise_world(1, IVec3::new(0, 1, 0));
    let revision = world.revision();
    let solids = world.solid_count();

    assert!(!world.set_block(IVec3::new(100, 10, 0), Block::SOLID));
    assert!(!world.set_block(IVec3::new(0, -50, 0), Block::Empty));
    assert_eq!(world.get_block(IVec3::new(100, 10, 0)), None);
    assert_eq!(world.revision(), revision);
    assert_eq!(world.solid_count(), solids);
}

#[test]
fn placing_and_removing_updates_enclosed_flags() {
    let mut world = World::new(WorldConfig::default(), TerrainSource::Flat { surface_y: 2 });
    world.recenter(IVec3::ZERO);

    let surface = IVec3::new(1, 2, 1);
    let above = surface + IVec3::Y;
    assert_eq!(world.get_block(surface), Some(Block::Solid { enclosed: false }));

    world.set_block(above, Block::SOLID);
    assert_eq!(world.get_block(surface), Some(Block::Solid { enclosed: true }));
    assert!(!world.exposed_faces(surface).has(FaceDir::PosY));

    world.set_block(above, Block::Empty);
    assert_eq!(world.get_block(surface), Some(Block::Solid { enclosed: false }));
    assert!(world.exposed_faces(surface).has(FaceDir::PosY));

    // Filling a hole under a solid block comes back enclosed.
    let buried = IVec3::new(1, 0, 1);
    world.set_block(buried, Block::Empty);
    world.set_block(buried, Block::SOLID);
    assert_eq!(world.get_block(buried), Some(Block::Solid { enclosed: true }));
}

#[test]
fn visible_set_follows_world_revision() {
    let mut world = World::new(WorldConfig::default(), TerrainSource::Empty);
    world.recenter(IVec3::ZERO);
    let mut visible = VisibleSet::new();

    assert!(visible.needs_rebuild(&world));
    visible.rebuild(&world);
    assert!(!visible.needs_rebuild(&world));
    assert!(visible.candidates().is_empty());

    world.set_block(IVec3::new(2, 2, 2), Block::SOLID);
    assert!(visible.needs_rebuild(&world));
    visible.rebuild(&world);
    assert_eq!(visible.candidates().len(), 1);
    assert_eq!(visible.candidates()[0].faces, FaceMask::all());
}
