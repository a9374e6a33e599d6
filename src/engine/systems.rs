//! System abstractions.
//!
//! A **system** is a unit of logic that operates over the world. Systems:
//! - declare which components they read and write,
//! - are scheduled into stages based on access conflicts,
//! - may be executed sequentially or in parallel,
//! - operate through a controlled [`WorldRef`] rather than direct world
//!   access.
//!
//! ## Scheduling model
//!
//! Systems are scheduled using their declared access sets:
//!
//! - Systems with non-conflicting access may run in parallel.
//! - Systems with conflicting writes are serialized into later stages.
//! - Ordering is stabilized by system id.
//!
//! Structural mutations are never performed by a running system; they are
//! recorded in the deferred command log and applied at stage barriers, so
//! they do not participate in access declarations.
//!
//! ## Function-backed systems
//!
//! [`FnSystem`] defines a system from a closure without a dedicated type.
//! Simulation systems with state (for example an injected RNG) implement
//! [`System`] directly.

use crate::engine::error::EngineResult;
use crate::engine::types::{AccessSets, SystemID};
use crate::engine::world::WorldRef;


/// A unit of executable logic operating on the world.
///
/// Systems must be `Send + Sync` so they can be scheduled and executed in
/// parallel across threads.
pub trait System: Send + Sync {
    /// Returns the unique identifier of this system.
    fn id(&self) -> SystemID;

    /// Returns the component access sets required by this system.
    fn access(&self) -> AccessSets;

    /// Executes the system logic against the world.
    ///
    /// Missing preconditions (no matching entities, absent settings
    /// resources) are normal no-ops, not errors. Errors are reserved for
    /// environment-level failures.
    fn run(&self, world: WorldRef<'_>) -> EngineResult<()>;
}

/// A concrete [`System`] backed by a function or closure.
pub struct FnSystem<F>
where
    F: Fn(WorldRef<'_>) -> EngineResult<()> + Send + Sync + 'static,
{
    id: SystemID,
    name: &'static str,
    access: AccessSets,
    f: F,
}

impl<F> FnSystem<F>
where
    F: Fn(WorldRef<'_>) -> EngineResult<()> + Send + Sync + 'static,
{
    /// Creates a new function-backed system.
    ///
    /// # Parameters
    /// - `id`: Unique identifier for the system.
    /// - `name`: Human-readable name, useful for debugging and logging.
    /// - `access`: Declared component access used for scheduling.
    /// - `f`: The function or closure executed when the system runs.
    pub fn new(
        id: SystemID,
        name: &'static str,
        access: AccessSets,
        f: F,
    ) -> Self {
        Self { id, name, access, f }
    }

    /// Returns the human-readable name of this system.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<F> System for FnSystem<F>
where
    F: Fn(WorldRef<'_>) -> EngineResult<()> + Send + Sync + 'static,
{
    fn id(&self) -> SystemID {
        self.id
    }

    fn access(&self) -> AccessSets {
        self.access.clone()
    }

    fn run(&self, world: WorldRef<'_>) -> EngineResult<()> {
        (self.f)(world)
    }
}
