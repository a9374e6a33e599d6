use muster::engine::scheduler::{make_stages, run_cycle, Stage};
use muster::engine::systems::System;
use muster::engine::types::Bundle;
use muster::engine::world::{WorldData, WorldManager};
use muster::engine::entity::Entity;
use muster::engine::query::QueryBuilder;
use muster::sim::components::{InSquadSoldierTag, RequireSoldier, SoldierLink, SoldierTag};
use muster::sim::distribution::SoldierDistributionSystem;
use muster::sim::register_sim_components;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn distribution_stages() -> Vec<Stage> {
    make_stages(vec![Box::new(SoldierDistributionSystem)])
}

fn spawn_squad(data: &mut WorldData, demand: u32) -> Entity {
    let bundle = Bundle::new()
        .with(RequireSoldier { count: demand })
        .with(SoldierLink::with_capacity(demand as usize));
    data.spawn_with(bundle).unwrap()
}

fn spawn_soldier(data: &mut WorldData) -> Entity {
    data.spawn_with(Bundle::new().with(SoldierTag)).unwrap()
}

fn assigned_total(data: &WorldData, squads: &[Entity]) -> usize {
    squads
        .iter()
        .map(|&squad| data.get::<SoldierLink>(squad).unwrap().soldiers.len())
        .sum()
}

#[test]
fn cursor_advances_across_squads() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    let data = world.world_ref().data_mut();

    let squad_a = spawn_squad(data, 3);
    let squad_b = spawn_squad(data, 2);
    let soldiers: Vec<Entity> = (0..4).map(|_| spawn_soldier(data)).collect();

    run_cycle(&world, &distribution_stages()).unwrap();

    let data = world.world_ref().data();

    // Squad A takes the first three soldiers and its demand record retires.
    let link_a = &data.get::<SoldierLink>(squad_a).unwrap().soldiers;
    assert_eq!(link_a.as_slice(), &soldiers[0..3]);
    assert!(!data.has::<RequireSoldier>(squad_a));

    // Squad B's window starts at the soldier cursor, not back at soldier 0.
    let link_b = &data.get::<SoldierLink>(squad_b).unwrap().soldiers;
    assert_eq!(link_b.as_slice(), &soldiers[3..4]);
    assert_eq!(data.get::<RequireSoldier>(squad_b).unwrap().count, 1);
}

#[test]
fn conservation_of_assignments() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    let data = world.world_ref().data_mut();

    let squads = vec![
        spawn_squad(data, 5),
        spawn_squad(data, 2),
        spawn_squad(data, 4),
    ];
    for _ in 0..6 {
        spawn_soldier(data);
    }

    let before = assigned_total(world.world_ref().data(), &squads);
    run_cycle(&world, &distribution_stages()).unwrap();
    let after = assigned_total(world.world_ref().data(), &squads);

    // Total demand 11, 6 soldiers available: exactly 6 new assignments.
    assert_eq!(before, 0);
    assert_eq!(after, before + 6);
}

#[test]
fn no_double_assignment_across_passes() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    let data = world.world_ref().data_mut();

    let squad_a = spawn_squad(data, 2);
    let soldiers: Vec<Entity> = (0..3).map(|_| spawn_soldier(data)).collect();

    run_cycle(&world, &distribution_stages()).unwrap();

    // A fresh demanding squad appears; only the untagged soldier is eligible.
    let data = world.world_ref().data_mut();
    let squad_b = spawn_squad(data, 5);

    run_cycle(&world, &distribution_stages()).unwrap();

    let data = world.world_ref().data();
    let link_a = &data.get::<SoldierLink>(squad_a).unwrap().soldiers;
    let link_b = &data.get::<SoldierLink>(squad_b).unwrap().soldiers;
    assert_eq!(link_a.len(), 2);
    assert_eq!(link_b.as_slice(), &soldiers[2..3]);

    for &soldier in &soldiers {
        let memberships = [link_a, link_b]
            .iter()
            .filter(|link| link.contains(&soldier))
            .count();
        assert_eq!(memberships, 1, "soldier assigned to exactly one squad");
        assert!(data.has::<InSquadSoldierTag>(soldier));
    }
}

#[test]
fn second_pass_without_new_soldiers_is_a_noop() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    let data = world.world_ref().data_mut();

    let squad = spawn_squad(data, 10);
    for _ in 0..4 {
        spawn_soldier(data);
    }

    run_cycle(&world, &distribution_stages()).unwrap();

    let data = world.world_ref().data();
    assert_eq!(data.get::<SoldierLink>(squad).unwrap().soldiers.len(), 4);
    assert_eq!(data.get::<RequireSoldier>(squad).unwrap().count, 6);

    // No free soldiers remain; the pass must record zero mutations.
    let system = SoldierDistributionSystem;
    system.run(world.world_ref()).unwrap();
    assert_eq!(world.world_ref().data().deferred_len(), 0);

    run_cycle(&world, &distribution_stages()).unwrap();
    let data = world.world_ref().data();
    assert_eq!(data.get::<SoldierLink>(squad).unwrap().soldiers.len(), 4);
    assert_eq!(data.get::<RequireSoldier>(squad).unwrap().count, 6);
}

#[test]
fn empty_pools_record_no_mutations() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    let data = world.world_ref().data_mut();

    // Soldiers but no demanding squads.
    for _ in 0..3 {
        spawn_soldier(data);
    }

    let system = SoldierDistributionSystem;
    system.run(world.world_ref()).unwrap();
    assert_eq!(world.world_ref().data().deferred_len(), 0);

    // Demanding squad but no soldiers.
    let world = WorldManager::new();
    spawn_squad(world.world_ref().data_mut(), 4);

    system.run(world.world_ref()).unwrap();
    assert_eq!(world.world_ref().data().deferred_len(), 0);
}

#[test]
fn oversubscribed_squad_keeps_persisted_remainder() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    let data = world.world_ref().data_mut();

    let squad = spawn_squad(data, 100);
    for _ in 0..7 {
        spawn_soldier(data);
    }

    run_cycle(&world, &distribution_stages()).unwrap();

    let data = world.world_ref().data();
    assert_eq!(data.get::<SoldierLink>(squad).unwrap().soldiers.len(), 7);
    assert_eq!(data.get::<RequireSoldier>(squad).unwrap().count, 93);

    // Reinforcements arrive; the next cycle resumes from the remainder.
    let data = world.world_ref().data_mut();
    for _ in 0..3 {
        spawn_soldier(data);
    }
    run_cycle(&world, &distribution_stages()).unwrap();

    let data = world.world_ref().data();
    assert_eq!(data.get::<SoldierLink>(squad).unwrap().soldiers.len(), 10);
    assert_eq!(data.get::<RequireSoldier>(squad).unwrap().count, 90);
}

#[test]
fn satisfied_demand_record_is_removed_not_zeroed() {
    init_logging();
    register_sim_components();
    let world = WorldManager::new();
    let data = world.world_ref().data_mut();

    let squad = spawn_squad(data, 2);
    for _ in 0..2 {
        spawn_soldier(data);
    }

    run_cycle(&world, &distribution_stages()).unwrap();

    let data = world.world_ref().data();
    assert!(!data.has::<RequireSoldier>(squad));
    assert_eq!(data.get::<SoldierLink>(squad).unwrap().soldiers.len(), 2);

    let demanding = QueryBuilder::new().read::<RequireSoldier>().count(data);
    assert_eq!(demanding, 0);
}
