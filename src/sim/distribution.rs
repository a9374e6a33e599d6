//! Soldier-to-squad distribution.
//!
//! A single pass walks demanding squads and free soldiers with two cursors,
//! assigning soldiers in snapshot order until either pool is exhausted.
//!
//! ## Bookkeeping rules
//! * Appends to a squad's `SoldierLink` and the remainder write-back are
//!   in-place value updates; this system is the declared writer of both.
//! * Marking a soldier assigned (`InSquadSoldierTag`) and retiring a
//!   satisfied demand record are structural edits, recorded in the deferred
//!   command log and applied at the next barrier.
//! * Each squad's sub-append starts at the **current** soldier cursor, never
//!   back at the front of the soldier snapshot; restarting would hand the
//!   same soldiers to a later squad.
//!
//! A squad whose demand exceeds the remaining pool receives a partial
//! assignment and keeps a reduced, persisted remainder for the next cycle.

use crate::engine::commands::Command;
use crate::engine::error::EngineResult;
use crate::engine::query::QueryBuilder;
use crate::engine::systems::System;
use crate::engine::types::{AccessSets, SystemID};
use crate::engine::world::WorldRef;
use crate::sim::components::{InSquadSoldierTag, RequireSoldier, SoldierLink, SoldierTag};


/// Stable id of the distribution system.
pub const DISTRIBUTION_SYSTEM_ID: SystemID = 0;

/// Assigns free soldiers to demanding squads, one pass per cycle.
pub struct SoldierDistributionSystem;

impl System for SoldierDistributionSystem {
    fn id(&self) -> SystemID {
        DISTRIBUTION_SYSTEM_ID
    }

    fn access(&self) -> AccessSets {
        AccessSets::default()
            .with_read::<SoldierTag>()
            .with_read::<InSquadSoldierTag>()
            .with_write::<RequireSoldier>()
            .with_write::<SoldierLink>()
    }

    fn run(&self, world: WorldRef<'_>) -> EngineResult<()> {
        let data = world.data_mut();

        let (squads, demands) = QueryBuilder::new()
            .write::<RequireSoldier>()
            .collect_with1::<RequireSoldier>(data);

        let soldiers = QueryBuilder::new()
            .read::<SoldierTag>()
            .without::<InSquadSoldierTag>()
            .collect(data);

        // Either pool empty: nothing to do, no mutations recorded.
        if squads.is_empty() || soldiers.is_empty() {
            return Ok(());
        }

        let mut soldier_cursor = 0usize;

        for (&squad, demand) in squads.iter().zip(demands.iter()) {
            if soldier_cursor >= soldiers.len() {
                break;
            }
            debug_assert!(demand.count > 0, "zero demand record survived a barrier");

            let take = (soldiers.len() - soldier_cursor).min(demand.count as usize);
            let assigned = &soldiers[soldier_cursor..soldier_cursor + take];

            match data.get_mut::<SoldierLink>(squad) {
                Some(link) => {
                    link.soldiers.reserve(take);
                    link.soldiers.extend_from_slice(assigned);
                }
                None => {
                    debug_assert!(false, "demanding squad without an assignment list");
                    continue;
                }
            }

            for &soldier in assigned {
                debug_assert!(
                    !data.has::<InSquadSoldierTag>(soldier),
                    "soldier already assigned to a squad"
                );
                data.defer(Command::add_tag::<InSquadSoldierTag>(soldier));
            }

            soldier_cursor += take;
            let remaining = demand.count - take as u32;

            if remaining == 0 {
                // Squad is full; retire the demand record at the barrier.
                data.defer(Command::remove_component::<RequireSoldier>(squad));
            } else {
                // Pool exhausted before the squad filled. Persist the
                // remainder immediately so the next cycle resumes from the
                // correct count. This is a value update, not a structural
                // change, and this system is its only writer this cycle.
                if let Some(record) = data.get_mut::<RequireSoldier>(squad) {
                    record.count = remaining;
                }
                break;
            }
        }

        log::debug!(
            "distributed {} soldier(s) across {} squad(s)",
            soldier_cursor,
            squads.len()
        );
        Ok(())
    }
}
