//! Filtered-view construction and snapshot collection.
//!
//! This module provides a builder-style API for constructing component
//! filters with explicit read/write access declarations, and for collecting
//! ordered snapshots of the matching entities and their component values.
//!
//! ## Design goals
//! * **Static intent:** Read/write/without component intent is encoded at
//!   build time and reusable as an [`AccessSets`] for scheduling.
//! * **Snapshot semantics:** Collection produces plain `Vec` snapshots owned
//!   by the caller. Because structural mutations are deferred, every snapshot
//!   taken in a cycle observes a consistent pre-barrier state.
//! * **Ordering:** Snapshots are in store iteration order, which is
//!   deterministic within a cycle but not guaranteed stable across cycles.
//!
//! ## Concurrency
//! This module does not perform parallel execution itself. It relies on the
//! scheduler to ensure non-overlapping write sets between concurrent systems.

use crate::engine::component::component_id_of;
use crate::engine::entity::Entity;
use crate::engine::types::{
    AccessSets, QuerySignature, set_read, set_without, set_write,
};
use crate::engine::world::WorldData;


/// Builder for filtered entity views.
///
/// `QueryBuilder` incrementally constructs a [`QuerySignature`] describing:
/// * which components must be present (read or write),
/// * which components must be absent.
///
/// ## Example
/// ```ignore
/// let (squads, demands) = QueryBuilder::new()
///     .read::<RequireSoldier>()
///     .collect_with1::<RequireSoldier>(data);
/// ```
#[derive(Default)]
pub struct QueryBuilder {
    signature: QuerySignature,
}

impl QueryBuilder {
    /// Creates a new, empty query builder.
    pub fn new() -> Self {
        Self { signature: QuerySignature::default() }
    }

    /// Declares a read-only dependency on component `T`.
    ///
    /// Adds `T` to the required set and marks it read-only for access
    /// conflict analysis.
    pub fn read<T: 'static + Send + Sync>(mut self) -> Self {
        set_read::<T>(&mut self.signature);
        self
    }

    /// Declares a mutable dependency on component `T`.
    ///
    /// Adds `T` to the required set and marks it write-access for conflict
    /// detection. Only one system with write access to a component may run
    /// in a stage.
    pub fn write<T: 'static + Send + Sync>(mut self) -> Self {
        set_write::<T>(&mut self.signature);
        self
    }

    /// Excludes entities carrying component `T`.
    pub fn without<T: 'static + Send + Sync>(mut self) -> Self {
        set_without::<T>(&mut self.signature);
        self
    }

    /// Returns the constructed query signature.
    pub fn signature(&self) -> &QuerySignature {
        &self.signature
    }

    /// Returns the read/write access sets declared by this query.
    ///
    /// Typically used by a system's `access()` implementation so declared
    /// scheduling access stays in sync with what the system actually touches.
    pub fn access_sets(&self) -> AccessSets {
        AccessSets { read: self.signature.read, write: self.signature.write }
    }

    /// Counts live entities matching the filter.
    pub fn count(&self, data: &WorldData) -> usize {
        data.collect_entities(&self.signature).len()
    }

    /// Collects matching entity handles in store iteration order.
    pub fn collect(&self, data: &WorldData) -> Vec<Entity> {
        data.collect_entities(&self.signature)
    }

    /// Collects matching entity handles and a parallel snapshot of their
    /// `T` values.
    ///
    /// `T` must be part of the declared filter, so every matched entity
    /// carries it; a missing value indicates a storage invariant violation
    /// and is guarded by a debug assertion.
    pub fn collect_with1<T: 'static + Send + Sync + Copy>(
        &self,
        data: &WorldData,
    ) -> (Vec<Entity>, Vec<T>) {
        debug_assert!(
            self.signature.read.has(component_id_of::<T>())
                || self.signature.write.has(component_id_of::<T>()),
            "snapshot component must be part of the filter"
        );

        let entities = data.collect_entities(&self.signature);
        let mut values = Vec::with_capacity(entities.len());
        for &entity in &entities {
            match data.get::<T>(entity) {
                Some(value) => values.push(*value),
                None => debug_assert!(false, "matched entity lost its component mid-collect"),
            }
        }
        (entities, values)
    }
}
