//! System scheduling and cycle execution.
//!
//! This module is responsible for:
//! * grouping systems into execution stages based on access compatibility,
//! * running compatible systems in parallel using Rayon,
//! * enforcing structural synchronization barriers between stages.
//!
//! ## Scheduling model
//!
//! Systems are assigned to **stages** such that:
//! * systems within the same stage do **not** conflict on component access,
//! * all systems in a stage may run in parallel,
//! * stages are executed sequentially.
//!
//! A stage boundary is the dependency combiner of the execution model: it
//! fires only after every system of the stage has finished, and the next
//! stage cannot start before it.
//!
//! ## Structural synchronization
//!
//! Deferred commands (spawns, despawns, tag mutations) are applied:
//! * **before** each stage begins,
//! * **after** the final stage completes.
//!
//! This ensures that structural changes never race with system execution
//! and that no system observes another system's structural edit mid-stage.

use rayon::prelude::*;

use crate::engine::error::EngineResult;
use crate::engine::systems::System;
use crate::engine::world::WorldManager;


/// A group of systems that can be executed in parallel.
///
/// ## Invariants
/// * All systems within a `Stage` have non-conflicting access sets.
/// * Stages themselves must be executed sequentially.
pub struct Stage {
    /// Systems scheduled to run in this stage.
    pub systems: Vec<Box<dyn System>>,
}

/// Partitions a list of systems into parallel execution stages.
///
/// ## Algorithm
/// Systems are processed in deterministic order (by system id) and assigned
/// greedily:
/// * Each system is placed into the first stage where it does not conflict
///   with existing systems.
/// * If no such stage exists, a new stage is created.
///
/// ## Determinism
/// Sorting by system id ensures that stage construction is stable and
/// reproducible across runs.
///
/// ## Complexity
/// O(n²) in the worst case; n is small for typical schedules.
pub fn make_stages(mut systems: Vec<Box<dyn System>>) -> Vec<Stage> {
    let mut stages: Vec<Stage> = Vec::new();

    systems.sort_by_key(|s| s.id());

    'next_system: for sys in systems.into_iter() {
        for stage in stages.iter_mut() {
            let conflict = stage.systems.iter()
                .any(|other| sys.access().conflicts_with(&other.access()));
            if !conflict {
                stage.systems.push(sys);
                continue 'next_system;
            }
        }
        stages.push(Stage { systems: vec![sys] });
    }
    stages
}

/// Executes one scheduling cycle over prebuilt stages.
///
/// For each stage: apply the deferred command barrier, then run the stage's
/// systems in parallel. A final barrier applies the commands recorded by the
/// last stage, so a completed cycle leaves no queued mutations behind.
///
/// ## Errors
/// The first system or barrier error aborts the cycle and is returned.
/// Started systems always run to completion; there is no cancellation.
pub fn run_cycle(manager: &WorldManager, stages: &[Stage]) -> EngineResult<()> {
    for (stage_index, stage) in stages.iter().enumerate() {
        manager.apply_deferred_commands()?;

        log::debug!("stage {stage_index}: running {} system(s)", stage.systems.len());
        stage.systems.par_iter().try_for_each(|sys| {
            let world = manager.world_ref();
            sys.run(world)
        })?;
    }

    manager.apply_deferred_commands()?;
    Ok(())
}

/// Prebuilt schedule wrapping stage construction and cycle execution.
pub struct Scheduler {
    stages: Vec<Stage>,
}

impl Scheduler {
    /// Builds a schedule from a list of systems.
    pub fn new(systems: Vec<Box<dyn System>>) -> Self {
        Self { stages: make_stages(systems) }
    }

    /// Returns the constructed stages.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Runs one full cycle: collect, compute, defer, barrier-apply.
    pub fn run_cycle(&self, manager: &WorldManager) -> EngineResult<()> {
        run_cycle(manager, &self.stages)
    }
}
