//! Squad spawning.
//!
//! Runs once per cycle as a cheap serial check. A new squad is created only
//! when no squad currently holds outstanding demand and both settings
//! resources are installed; anything less is a normal no-op.
//!
//! The squad's resolution is drawn per axis in
//! `[min_resolution, max_resolution)` (inclusive lower bound, exclusive
//! upper bound) and its demand is `resolution.x * resolution.y`. The spawn
//! itself goes through the deferred command log, so the squad becomes
//! visible to other systems at the next barrier.

use std::sync::Mutex;

use crate::engine::commands::Command;
use crate::engine::error::EngineResult;
use crate::engine::query::QueryBuilder;
use crate::engine::random::SimRng;
use crate::engine::systems::System;
use crate::engine::types::{AccessSets, Bundle, SystemID};
use crate::engine::world::WorldRef;
use crate::sim::components::{
    MapSettings, PrevWorldPosition2D, RequireSoldier, SoldierLink, SquadDefaultSettings,
    SquadSettings, WorldPosition2D,
};


/// Stable id of the spawner system.
pub const SPAWNER_SYSTEM_ID: SystemID = 1;

/// Creates one squad with randomized demand and position per qualifying cycle.
pub struct SpawnSquadSystem {
    rng: Mutex<SimRng>,
}

impl SpawnSquadSystem {
    /// Creates the spawner with an injected randomness source.
    pub fn new(rng: SimRng) -> Self {
        Self { rng: Mutex::new(rng) }
    }

    /// Creates the spawner seeded from the system clock.
    pub fn from_entropy() -> Self {
        Self::new(SimRng::from_entropy())
    }
}

impl System for SpawnSquadSystem {
    fn id(&self) -> SystemID {
        SPAWNER_SYSTEM_ID
    }

    fn access(&self) -> AccessSets {
        AccessSets::default().with_read::<RequireSoldier>()
    }

    fn run(&self, world: WorldRef<'_>) -> EngineResult<()> {
        let data = world.data();

        // Gate: some squad still wants soldiers, or settings are missing.
        if QueryBuilder::new().read::<RequireSoldier>().count(data) != 0 {
            return Ok(());
        }
        let Some(map) = data.resource::<MapSettings>() else {
            return Ok(());
        };
        let Some(defaults) = data.resource::<SquadDefaultSettings>() else {
            return Ok(());
        };

        let mut rng = self.rng.lock().unwrap();
        let position = rng.vec2_in(map.min, map.max);
        let resolution = rng.ivec2_in(defaults.min_resolution, defaults.max_resolution);
        debug_assert!(
            resolution.min_element() > 0,
            "squad resolution must be positive on both axes"
        );
        let soldier_count = (resolution.x * resolution.y) as u32;

        let bundle = Bundle::new()
            .with(SoldierLink::with_capacity(soldier_count as usize))
            .with(RequireSoldier { count: soldier_count })
            .with(SquadSettings {
                resolution,
                soldier_margin: defaults.soldier_margin,
            })
            .with(WorldPosition2D(position))
            .with(PrevWorldPosition2D(position));

        data.defer(Command::Spawn { bundle });
        log::debug!("spawned squad: resolution {resolution}, demand {soldier_count}");
        Ok(())
    }
}
