//! # Commands
//!
//! This module defines deferred commands used to mutate the world.
//!
//! ## Purpose
//! Commands provide an explicit, ordered representation of structural world
//! mutations such as entity creation, destruction, and component addition or
//! removal.
//!
//! Rather than mutating storage directly during system execution, systems
//! emit `Command` values that are applied later at a synchronization barrier.
//! This enables safe parallel system execution: no system observes another
//! system's structural edit mid-stage.
//!
//! ## Design
//! - Commands are plain data describing *what* change should occur, not *how*.
//! - Execution is handled centrally by the world at barrier points.
//! - Value updates to already-present components are **not** commands; a
//!   system that is the declared writer of a component mutates it in place.
//!
//! ## Invariants
//! - Commands must be executed in the order they are recorded.
//! - Commands targeting entities that died before the barrier are skipped.
//! - Component identifiers and values must be valid and registered.

use std::any::Any;

use crate::engine::entity::Entity;
use crate::engine::types::{ComponentID, Bundle};
use crate::engine::component::component_id_of;


/// A deferred structural mutation.
///
/// `Command` values describe structural changes that are recorded during
/// system execution and replayed, in recorded order, at the next barrier.
pub enum Command {
    /// Spawns a new entity carrying the bundled components.
    Spawn {
        /// Component values for the new entity.
        bundle: Bundle,
    },

    /// Despawns an existing entity and drops all of its components.
    Despawn {
        /// Entity to be removed from the world.
        entity: Entity,
    },

    /// Adds a component to an existing entity.
    Add {
        /// Target entity receiving the component.
        entity: Entity,
        /// Identifier of the component type to add.
        component_id: ComponentID,
        /// Component value to insert.
        ///
        /// Must match the registered component type for `component_id`.
        value: Box<dyn Any + Send>,
    },

    /// Removes a component from an existing entity. The value is dropped.
    Remove {
        /// Target entity losing the component.
        entity: Entity,
        /// Identifier of the component type to remove.
        component_id: ComponentID,
    },
}

impl Command {
    /// Builds an `Add` command for a marker component with a default value.
    pub fn add_tag<T: 'static + Send + Sync + Default>(entity: Entity) -> Self {
        Command::Add {
            entity,
            component_id: component_id_of::<T>(),
            value: Box::new(T::default()),
        }
    }

    /// Builds a `Remove` command for component type `T`.
    pub fn remove_component<T: 'static + Send + Sync>(entity: Entity) -> Self {
        Command::Remove {
            entity,
            component_id: component_id_of::<T>(),
        }
    }
}
