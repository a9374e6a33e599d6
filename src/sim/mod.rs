//! Simulation layer: squad distribution, squad spawning, sprite culling.

pub mod components;
pub mod culling;
pub mod distribution;
pub mod spawner;

use crate::engine::component::register_component;
use crate::engine::random::SimRng;
use crate::engine::scheduler::Scheduler;
use crate::engine::systems::System;
use crate::sim::components::{
    CullSpriteTag, InSquadSoldierTag, Pivot, PrevWorldPosition2D, RequireSoldier, Scale2D,
    SoldierLink, SoldierTag, SpriteTag, SquadSettings, WorldPosition2D,
};
use crate::sim::culling::{CullSpritesSystem, UncullSpritesSystem};
use crate::sim::distribution::SoldierDistributionSystem;
use crate::sim::spawner::SpawnSquadSystem;


/// Registers all simulation component types.
///
/// Idempotent; call once before constructing worlds or schedules.
pub fn register_sim_components() {
    register_component::<WorldPosition2D>();
    register_component::<PrevWorldPosition2D>();
    register_component::<Scale2D>();
    register_component::<Pivot>();
    register_component::<SpriteTag>();
    register_component::<CullSpriteTag>();
    register_component::<SoldierTag>();
    register_component::<InSquadSoldierTag>();
    register_component::<RequireSoldier>();
    register_component::<SoldierLink>();
    register_component::<SquadSettings>();
}

/// Builds the standard simulation schedule.
///
/// Distribution, spawning, and the two culling passes are partitioned into
/// stages by declared access: the culling passes share the distribution
/// stage (no component overlap), while the spawner reads `RequireSoldier`
/// and is serialized into a later stage.
pub fn build_schedule(rng: SimRng) -> Scheduler {
    let systems: Vec<Box<dyn System>> = vec![
        Box::new(SoldierDistributionSystem),
        Box::new(SpawnSquadSystem::new(rng)),
        Box::new(CullSpritesSystem),
        Box::new(UncullSpritesSystem),
    ];
    Scheduler::new(systems)
}
