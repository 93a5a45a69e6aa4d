use glam::{IVec3, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use softvox::*;
use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

/// Aim ray traversal and the mine/place editor driven through the engine

const TICK: Duration = Duration::from_millis(33);

/// Observer standing on flat ground at z = 3.5 looking down +Z, with a
/// target block three cells ahead at eye level.
fn aiming_engine() -> (Engine, Framebuffer) {
    let config = EngineConfig {
        terrain: TerrainSource::Flat { surface_y: 3 },
        camera: CameraConfig {
            spawn: Vec3::new(3.5, 5.0, 3.5),
            ..Default::default()
        },
        ..Default::default()
    };
    let mut engine = Engine::try_enter(config).expect("valid config");
    let mut framebuffer = Framebuffer::new(280, 240);
    engine.tick(TICK, Buttons::empty(), &mut framebuffer);
    engine.world_mut().set_block(IVec3::new(3, 5, 6), Block::SOLID);
    engine.tick(TICK, Buttons::empty(), &mut framebuffer);
    (engine, framebuffer)
}

#[test]
fn random_walks_are_face_adjacent() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    for _ in 0..300 {
        let origin = Vec3::new(
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-20.0..20.0),
        );
        let dir = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let walk = DdaWalk::new(origin, dir, 50);
        let mut prev = walk.origin_cell();
        let mut steps = 0;
        for cell in walk {
            let d = (cell - prev).abs();
            assert_eq!(d.x + d.y + d.z, 1, "Step {:?} -> {:?} skips a face", prev, cell);
            prev = cell;
            steps += 1;
        }
        if dir != Vec3::ZERO {
            assert_eq!(steps, 50);
        }
    }
}

#[test]
fn ray_reports_target_and_cell_before_it() {
    let (engine, _) = aiming_engine();
    let hit = engine.hit().copied().expect("block ahead should be hit");

    assert_eq!(hit.solid, IVec3::new(3, 5, 6));
    assert_eq!(hit.last_empty, IVec3::new(3, 5, 5));
    assert_eq!(
        engine.world().slot_of(IVec3::ZERO),
        Some(hit.solid_slot),
        "Both cells live in the center chunk"
    );
    assert_eq!(hit.last_empty_slot, Some(hit.solid_slot));
}

#[test]
fn ray_misses_beyond_step_budget() {
    let mut world = World::new(WorldConfig::default(), TerrainSource::Empty);
    world.recenter(IVec3::ZERO);
    world.set_block(IVec3::new(0, 0, 9), Block::SOLID);

    let origin = Vec3::new(0.5, 0.5, 0.5);
    assert!(cast_ray(&world, origin, Vec3::Z, 8).is_none());
    assert!(cast_ray(&world, origin, Vec3::Z, 9).is_some());
}

#[test]
fn ray_starting_inside_a_block_hits_it() {
    let mut world = World::new(WorldConfig::default(), TerrainSource::Empty);
    world.recenter(IVec3::ZERO);
    let inside = IVec3::new(0, 0, 0);
    world.set_block(inside, Block::SOLID);
    world.set_block(IVec3::new(0, 0, 3), Block::SOLID);

    let origin = Vec3::new(0.5, 0.5, 0.5);
    let hit = cast_ray(&world, origin, Vec3::Z, 50).expect("origin cell is solid");
    assert_eq!(hit.solid, inside, "The block around the eye comes first");
    assert_eq!(hit.last_empty, inside);
    assert_eq!(hit.last_empty_slot, Some(hit.solid_slot));

    // Even a ray that walks nowhere sees the cell it starts in.
    let still = cast_ray(&world, origin, Vec3::ZERO, 50).expect("origin cell is solid");
    assert_eq!(still.solid, inside);
}

#[test]
fn holding_mine_removes_only_the_target() {
    let (mut engine, mut framebuffer) = aiming_engine();
    let behind = IVec3::new(3, 5, 8);
    engine.world_mut().set_block(behind, Block::SOLID);
    let solids = engine.world().solid_count();

    let mut edits = 0;
    for _ in 0..40 {
        let stats = engine.tick(TICK, Buttons::MINE, &mut framebuffer);
        edits += stats.edited as u32;
    }

    assert_eq!(edits, 1, "Holding mine must edit exactly once");
    assert!(!engine.world().is_solid(IVec3::new(3, 5, 6)));
    assert!(engine.world().is_solid(behind));
    assert_eq!(engine.world().solid_count(), solids - 1);
    assert!(engine.editor().is_locked());

    // Releasing after a completed mine places nothing.
    let stats = engine.tick(TICK, Buttons::empty(), &mut framebuffer);
    assert!(!stats.edited);
    assert!(!engine.editor().is_locked());
    assert_eq!(engine.world().solid_count(), solids - 1);
}

#[test]
fn mining_threshold_is_exact() {
    let (mut engine, mut framebuffer) = aiming_engine();
    let target = IVec3::new(3, 5, 6);
    let threshold = engine.config().editor.mine_ticks;

    for _ in 1..threshold {
        engine.tick(TICK, Buttons::MINE, &mut framebuffer);
    }
    assert!(engine.world().is_solid(target));
    assert_eq!(engine.editor().timer(), threshold - 1);

    let stats = engine.tick(TICK, Buttons::MINE, &mut framebuffer);
    assert!(stats.edited);
    assert!(!engine.world().is_solid(target));
}

#[test]
fn tap_places_in_front_of_target() {
    let (mut engine, mut framebuffer) = aiming_engine();
    for _ in 0..3 {
        engine.tick(TICK, Buttons::MINE, &mut framebuffer);
    }
    let stats = engine.tick(TICK, Buttons::empty(), &mut framebuffer);

    assert!(stats.edited);
    assert!(engine.world().is_solid(IVec3::new(3, 5, 5)));
    assert!(engine.world().is_solid(IVec3::new(3, 5, 6)));
}

#[test]
fn place_refuses_cell_inside_player() {
    let (mut engine, mut framebuffer) = aiming_engine();
    engine.camera_mut().pitch = -FRAC_PI_2;
    engine.tick(TICK, Buttons::empty(), &mut framebuffer);

    let hit = engine.hit().copied().expect("ground below should be hit");
    assert_eq!(hit.solid, IVec3::new(3, 3, 3));
    assert_eq!(hit.last_empty, IVec3::new(3, 4, 3));

    let solids = engine.world().solid_count();
    let stats = engine.tick(TICK, Buttons::PLACE, &mut framebuffer);
    assert!(!stats.edited);
    assert_eq!(engine.world().solid_count(), solids);
}

#[test]
fn place_button_fires_once_per_press() {
    let (mut engine, mut framebuffer) = aiming_engine();
    let solids = engine.world().solid_count();

    for _ in 0..5 {
        engine.tick(TICK, Buttons::PLACE, &mut framebuffer);
    }
    assert_eq!(engine.world().solid_count(), solids + 1);
    assert!(engine.world().is_solid(IVec3::new(3, 5, 5)));
}
