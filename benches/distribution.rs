use criterion::*;
use std::hint::black_box;

use glam::{IVec2, Vec2};

use muster::engine::random::SimRng;
use muster::engine::types::Bundle;
use muster::engine::world::WorldManager;
use muster::sim::components::{
    CameraBounds, MapSettings, Pivot, RequireSoldier, Scale2D, SoldierLink, SoldierTag,
    SpriteTag, SquadDefaultSettings, WorldPosition2D,
};
use muster::sim::{build_schedule, register_sim_components};

const SQUAD_COUNT: usize = 16;
const SOLDIERS_PER_SQUAD: u32 = 64;
const SPRITE_COUNT: usize = 4_096;

fn build_world(rng: &mut SimRng) -> WorldManager {
    let world = WorldManager::new();
    let data = world.world_ref().data_mut();

    data.insert_resource(MapSettings {
        min: Vec2::new(-100.0, -100.0),
        max: Vec2::new(100.0, 100.0),
    });
    data.insert_resource(SquadDefaultSettings {
        soldier_margin: Vec2::new(1.5, 1.5),
        min_resolution: IVec2::new(5, 5),
        max_resolution: IVec2::new(20, 20),
    });
    data.insert_resource(CameraBounds {
        min: Vec2::new(-40.0, -40.0),
        max: Vec2::new(40.0, 40.0),
    });

    for _ in 0..SQUAD_COUNT {
        data.spawn_with(
            Bundle::new()
                .with(RequireSoldier { count: SOLDIERS_PER_SQUAD })
                .with(SoldierLink::with_capacity(SOLDIERS_PER_SQUAD as usize)),
        )
        .unwrap();
    }
    for _ in 0..SQUAD_COUNT as u32 * SOLDIERS_PER_SQUAD {
        data.spawn_with(Bundle::new().with(SoldierTag)).unwrap();
    }
    for _ in 0..SPRITE_COUNT {
        let position = rng.vec2_in(Vec2::new(-100.0, -100.0), Vec2::new(100.0, 100.0));
        data.spawn_with(
            Bundle::new()
                .with(SpriteTag)
                .with(WorldPosition2D(position))
                .with(Scale2D(Vec2::new(2.0, 2.0)))
                .with(Pivot(Vec2::new(0.5, 0.5))),
        )
        .unwrap();
    }
    world
}

fn cycle_benchmark(c: &mut Criterion) {
    register_sim_components();

    let mut group = c.benchmark_group("cycle");
    group.throughput(Throughput::Elements(
        (SQUAD_COUNT as u32 * SOLDIERS_PER_SQUAD) as u64 + SPRITE_COUNT as u64,
    ));

    group.bench_function("distribute_and_cull", |b| {
        let mut setup_rng = SimRng::from_seed(1);
        b.iter_batched(
            || {
                let world = build_world(&mut setup_rng);
                let schedule = build_schedule(SimRng::from_seed(2));
                (world, schedule)
            },
            |(world, schedule)| {
                schedule.run_cycle(black_box(&world)).unwrap();
                world
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("steady_state_cycle", |b| {
        let mut setup_rng = SimRng::from_seed(3);
        let world = build_world(&mut setup_rng);
        let schedule = build_schedule(SimRng::from_seed(4));
        // First cycle drains the initial demand; later cycles measure the
        // settled per-cycle cost.
        schedule.run_cycle(&world).unwrap();
        b.iter(|| {
            schedule.run_cycle(black_box(&world)).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, cycle_benchmark);
criterion_main!(benches);
