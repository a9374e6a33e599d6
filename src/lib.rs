//! # muster
//!
//! Parallel ECS simulation core for squad mustering and 2D sprite culling.
//!
//! ## Design Goals
//! - Side-table storage keyed by a generational entity arena
//! - Deterministic, conflict-aware stage scheduling
//! - Parallel CPU execution with declared component access
//! - Structural mutations deferred to explicit barriers
//!
//! This crate builds as both:
//! - `rlib` (for Rust usage & integration tests)
//! - `cdylib` (for FFI / DLL usage)

#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![allow(clippy::module_inception)]

pub mod engine;
pub mod sim;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

// Core engine types

pub use engine::world::{
    WorldData,
    WorldManager,
    WorldRef,
};

pub use engine::entity::{
    Entities,
    Entity,
};

pub use engine::component::{
    register_component,
    freeze_components,
    component_id_of,
};

pub use engine::query::QueryBuilder;

pub use engine::systems::{FnSystem, System};
pub use engine::scheduler::{
    make_stages,
    run_cycle,
    Scheduler,
    Stage,
};

pub use engine::commands::Command;
pub use engine::random::SimRng;

pub use engine::error::{
    CapacityError,
    EngineError,
    EngineResult,
    SpawnError,
    StaleEntityError,
    TypeMismatchError,
};

pub use engine::types::{
    AccessSets,
    Bundle,
    ComponentID,
    EntityID,
    Signature,
    SystemID,
};

// ─────────────────────────────────────────────────────────────────────────────
// Prelude (Optional but recommended)
// ─────────────────────────────────────────────────────────────────────────────

/// Commonly used types.
///
/// Import with:
/// ```rust
/// use muster::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AccessSets,
        Bundle,
        Command,
        Entity,
        QueryBuilder,
        Scheduler,
        SimRng,
        System,
        WorldManager,
        WorldRef,
        component_id_of,
        freeze_components,
        register_component,
    };
}
