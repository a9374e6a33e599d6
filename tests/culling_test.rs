use glam::Vec2;

use muster::engine::entity::Entity;
use muster::engine::scheduler::{make_stages, run_cycle, Stage};
use muster::engine::systems::System;
use muster::engine::types::Bundle;
use muster::engine::world::WorldManager;
use muster::sim::components::{CameraBounds, CullSpriteTag, Pivot, Scale2D, SpriteTag, WorldPosition2D};
use muster::sim::culling::{sprite_rect, CullSpritesSystem, UncullSpritesSystem};
use muster::sim::register_sim_components;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn culling_stages() -> Vec<Stage> {
    make_stages(vec![
        Box::new(CullSpritesSystem),
        Box::new(UncullSpritesSystem),
    ])
}

fn install_view(world: &WorldManager) {
    world.world_ref().data_mut().insert_resource(CameraBounds {
        min: Vec2::new(-10.0, -10.0),
        max: Vec2::new(10.0, 10.0),
    });
}

fn spawn_sprite(world: &WorldManager, position: Vec2) -> Entity {
    let bundle = Bundle::new()
        .with(SpriteTag)
        .with(WorldPosition2D(position))
        .with(Scale2D(Vec2::new(2.0, 2.0)))
        .with(Pivot(Vec2::new(0.5, 0.5)));
    world.world_ref().data_mut().spawn_with(bundle).unwrap()
}

fn move_sprite(world: &WorldManager, sprite: Entity, position: Vec2) {
    world
        .world_ref()
        .data_mut()
        .get_mut::<WorldPosition2D>(sprite)
        .unwrap()
        .0 = position;
}

#[test]
fn sprite_rect_uses_the_pivot_anchor() {
    let (min, max) = sprite_rect(
        Vec2::new(4.0, 6.0),
        Vec2::new(2.0, 4.0),
        Vec2::new(0.5, 0.5),
    );
    assert_eq!(min, Vec2::new(3.0, 4.0));
    assert_eq!(max, Vec2::new(5.0, 8.0));

    // A zero pivot anchors the rectangle at its lower-left corner.
    let (min, max) = sprite_rect(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0), Vec2::ZERO);
    assert_eq!(min, Vec2::new(1.0, 1.0));
    assert_eq!(max, Vec2::new(3.0, 3.0));
}

#[test]
fn sprites_outside_the_view_gain_the_cull_tag() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    install_view(&world);

    let inside = spawn_sprite(&world, Vec2::ZERO);
    let outside = spawn_sprite(&world, Vec2::new(100.0, 0.0));
    let straddling = spawn_sprite(&world, Vec2::new(10.0, 0.0));

    run_cycle(&world, &culling_stages()).unwrap();

    let data = world.world_ref().data();
    assert!(!data.has::<CullSpriteTag>(inside));
    assert!(data.has::<CullSpriteTag>(outside));
    // One corner at (9, -1)/(9, 1) is strictly inside, so it stays visible.
    assert!(!data.has::<CullSpriteTag>(straddling));
}

#[test]
fn boundary_touching_corners_do_not_count_as_inside() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    install_view(&world);

    // Rectangle [10, 12] x [-1, 1]: its nearest corners sit exactly on the
    // view edge x = 10, which the strict test rejects.
    let touching = spawn_sprite(&world, Vec2::new(11.0, 0.0));

    run_cycle(&world, &culling_stages()).unwrap();

    assert!(world.world_ref().data().has::<CullSpriteTag>(touching));
}

#[test]
fn culled_sprite_moving_back_inside_is_uncovered() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    install_view(&world);

    let sprite = spawn_sprite(&world, Vec2::new(100.0, 100.0));

    run_cycle(&world, &culling_stages()).unwrap();
    assert!(world.world_ref().data().has::<CullSpriteTag>(sprite));

    move_sprite(&world, sprite, Vec2::ZERO);

    run_cycle(&world, &culling_stages()).unwrap();
    assert!(!world.world_ref().data().has::<CullSpriteTag>(sprite));
}

#[test]
fn stationary_sprites_cause_no_tag_churn() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    install_view(&world);

    spawn_sprite(&world, Vec2::ZERO);
    spawn_sprite(&world, Vec2::new(100.0, 0.0));

    run_cycle(&world, &culling_stages()).unwrap();
    run_cycle(&world, &culling_stages()).unwrap();

    // Nothing moved after the first cycle; a further direct pass of either
    // system must record zero deferred edits.
    CullSpritesSystem.run(world.world_ref()).unwrap();
    UncullSpritesSystem.run(world.world_ref()).unwrap();
    assert_eq!(world.world_ref().data().deferred_len(), 0);
}

#[test]
fn missing_camera_bounds_is_a_noop() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();

    let sprite = spawn_sprite(&world, Vec2::new(1_000.0, 1_000.0));

    run_cycle(&world, &culling_stages()).unwrap();
    assert!(!world.world_ref().data().has::<CullSpriteTag>(sprite));
}

#[test]
fn shrinking_view_reculls_previously_visible_sprites() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    install_view(&world);

    let sprite = spawn_sprite(&world, Vec2::new(8.0, 8.0));

    run_cycle(&world, &culling_stages()).unwrap();
    assert!(!world.world_ref().data().has::<CullSpriteTag>(sprite));

    // The camera layer swaps in a tighter rectangle mid-run.
    world.world_ref().data_mut().insert_resource(CameraBounds {
        min: Vec2::new(-2.0, -2.0),
        max: Vec2::new(2.0, 2.0),
    });

    run_cycle(&world, &culling_stages()).unwrap();
    assert!(world.world_ref().data().has::<CullSpriteTag>(sprite));
}
