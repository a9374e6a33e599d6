//! World management and the synchronization barrier.
//!
//! This module defines the central orchestration layer, responsible for:
//!
//! * owning the entity arena and all component side tables,
//! * typed and type-erased component access,
//! * resource singletons (process-wide settings records),
//! * the deferred command log and its barrier application,
//! * providing shared and exclusive access to world state for systems.
//!
//! ## Concurrency model
//!
//! The world is internally mutable and uses `UnsafeCell` to allow aliasing
//! between shared (`&`) and exclusive (`&mut`) access paths. Safety is
//! enforced by *API discipline*, not the Rust borrow checker:
//!
//! * A system may only mutate components it declared in its write set.
//! * The scheduler never runs two systems with conflicting access sets in
//!   the same stage.
//! * Structural mutations go through the deferred command log, which is
//!   drained only at stage barriers when no system is running.
//!
//! The deferred log itself sits behind a `Mutex` so that systems running in
//! parallel append into a single recorded order; application replays that
//! order exactly, so a later recorded operation on the same entity wins.
//!
//! ## Safety
//!
//! This module contains unsafe code for interior mutability (`UnsafeCell`).
//! All unsafe blocks rely on the scheduling discipline above.

use std::any::{Any, TypeId};
use std::cell::UnsafeCell;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::engine::commands::Command;
use crate::engine::component::{component_id_of, make_empty_component};
use crate::engine::entity::{Entities, Entity};
use crate::engine::error::{EngineResult, SpawnError, StaleEntityError};
use crate::engine::storage::{Attribute, TypeErasedAttribute};
use crate::engine::types::{Bundle, ComponentID, DynamicBundle, QuerySignature, COMPONENT_CAP};


/// Thread-safe entry point to the world.
///
/// `WorldManager` owns the entire simulation state and provides controlled
/// access through lightweight references (`WorldRef`). It is designed to be
/// shared across worker threads while enforcing safety via interior
/// mutability and the scheduler's access discipline.
pub struct WorldManager {
    /// Interior-mutable world state.
    inner: UnsafeCell<WorldData>,
}

unsafe impl Sync for WorldManager {}

impl Default for WorldManager {
    fn default() -> Self { Self::new() }
}

impl WorldManager {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self {
            inner: UnsafeCell::new(WorldData::new()),
        }
    }

    /// Returns a lightweight reference handle to the world.
    ///
    /// ## Safety
    /// The returned reference permits both shared and mutable access via
    /// `WorldRef`, relying on scheduler discipline to avoid data races.
    #[inline]
    pub fn world_ref(&self) -> WorldRef<'_> {
        WorldRef { inner: &self.inner }
    }

    /// Applies all queued deferred commands.
    ///
    /// This is the synchronization barrier: structural changes requested
    /// during the previous stage are replayed here in recorded order.
    ///
    /// ## Errors
    /// Propagates capacity exhaustion and type mismatches as fatal. Commands
    /// targeting entities that died before the barrier are skipped silently.
    pub fn apply_deferred_commands(&self) -> EngineResult<usize> {
        unsafe { &mut *self.inner.get() }.apply_deferred_commands()
    }
}

/// A non-owning handle granting access to world data.
///
/// ## Safety
/// This type exposes raw access to `WorldData` via `UnsafeCell` and relies
/// on higher-level scheduling to avoid conflicting mutable accesses.
pub struct WorldRef<'a> {
    inner: &'a UnsafeCell<WorldData>,
}

impl<'a> WorldRef<'a> {
    /// Returns an immutable reference to world data.
    ///
    /// The borrow is tied to the owning manager, not to this handle, so it
    /// outlives a temporary `WorldRef`.
    #[inline]
    pub fn data(&self) -> &'a WorldData {
        unsafe { &*self.inner.get() }
    }

    /// Returns a mutable reference to world data.
    ///
    /// The borrow is tied to the owning manager, not to this handle.
    ///
    /// ## Safety
    /// The caller must be the declared writer of every component it mutates
    /// through this reference for the current stage.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub fn data_mut(&self) -> &'a mut WorldData {
        unsafe { &mut *self.inner.get() }
    }
}

/// Core world storage.
///
/// ## Responsibilities
/// * Owns the entity arena and one side table per registered component kind
/// * Owns resource singletons keyed by type
/// * Records and applies the deferred command log
///
/// ## Invariants
/// * An entity's signature bit for component `c` is set iff the `c` column
///   holds a value at the entity's index.
/// * Columns are created lazily from registry factories on first insert.
pub struct WorldData {
    entities: Entities,
    attributes: Vec<Option<Box<dyn TypeErasedAttribute>>>,
    resources: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    deferred: Mutex<Vec<Command>>,
}

impl Default for WorldData {
    fn default() -> Self { Self::new() }
}

impl WorldData {
    /// Creates empty world storage.
    pub fn new() -> Self {
        let mut attributes = Vec::with_capacity(COMPONENT_CAP);
        attributes.resize_with(COMPONENT_CAP, || None);
        Self {
            entities: Entities::new(),
            attributes,
            resources: HashMap::new(),
            deferred: Mutex::new(Vec::new()),
        }
    }

    /// Returns the entity arena.
    #[inline]
    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    /// Returns `true` if `entity` is live.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    fn ensure_attribute(&mut self, component_id: ComponentID) -> &mut dyn TypeErasedAttribute {
        let slot = &mut self.attributes[component_id as usize];
        if slot.is_none() {
            *slot = Some(make_empty_component(component_id));
        }
        slot.as_deref_mut().expect("column just ensured")
    }

    fn attribute<T: 'static + Send + Sync>(&self) -> Option<&Attribute<T>> {
        let component_id = component_id_of::<T>();
        self.attributes[component_id as usize]
            .as_deref()?
            .as_any()
            .downcast_ref::<Attribute<T>>()
    }

    fn attribute_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut Attribute<T>> {
        let component_id = component_id_of::<T>();
        self.attributes[component_id as usize]
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<Attribute<T>>()
    }

    /// Spawns an entity carrying the bundled components, immediately.
    ///
    /// Systems must not call this during a stage; they defer
    /// [`Command::Spawn`] instead. The barrier uses this path.
    pub fn spawn_with(&mut self, mut bundle: Bundle) -> Result<Entity, SpawnError> {
        let signature = bundle.signature();
        let entity = self.entities.spawn(signature)?;
        let index = entity.index();

        for component_id in signature.iterate_over_components() {
            if let Some(value) = bundle.take(component_id) {
                self.ensure_attribute(component_id)
                    .insert_dyn(component_id, index, value)?;
            }
        }
        Ok(entity)
    }

    /// Despawns an entity and drops all of its component values.
    ///
    /// Returns `false` for stale or dead handles.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let Some(signature) = self.entities.signature(entity).copied() else {
            return false;
        };
        for component_id in signature.iterate_over_components() {
            if let Some(column) = self.attributes[component_id as usize].as_deref_mut() {
                column.remove_dyn(entity.index());
            }
        }
        self.entities.despawn(entity)
    }

    /// Inserts a component value on a live entity, immediately.
    pub fn insert<T: 'static + Send + Sync>(
        &mut self,
        entity: Entity,
        value: T,
    ) -> Result<(), StaleEntityError> {
        if !self.entities.is_alive(entity) {
            return Err(StaleEntityError);
        }
        let component_id = component_id_of::<T>();
        self.ensure_attribute(component_id);
        let column = self
            .attribute_mut::<T>()
            .expect("registered column matches its component type");
        column.insert(entity.index(), value);
        if let Some(signature) = self.entities.signature_mut(entity) {
            signature.set(component_id);
        }
        Ok(())
    }

    /// Removes a component value from a live entity, immediately.
    pub fn remove<T: 'static + Send + Sync>(&mut self, entity: Entity) -> Option<T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        let component_id = component_id_of::<T>();
        let removed = self.attribute_mut::<T>()?.remove(entity.index());
        if removed.is_some() {
            if let Some(signature) = self.entities.signature_mut(entity) {
                signature.clear(component_id);
            }
        }
        removed
    }

    /// Returns a shared reference to `entity`'s `T` component, if any.
    #[inline]
    pub fn get<T: 'static + Send + Sync>(&self, entity: Entity) -> Option<&T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.attribute::<T>()?.get(entity.index())
    }

    /// Returns a mutable reference to `entity`'s `T` component, if any.
    ///
    /// The caller must be the declared writer of `T` for the current stage.
    #[inline]
    pub fn get_mut<T: 'static + Send + Sync>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.attribute_mut::<T>()?.get_mut(entity.index())
    }

    /// Returns `true` if `entity` is live and carries component `T`.
    #[inline]
    pub fn has<T: 'static + Send + Sync>(&self, entity: Entity) -> bool {
        self.entities
            .signature(entity)
            .map(|signature| signature.has(component_id_of::<T>()))
            .unwrap_or(false)
    }

    /// Installs or replaces the resource singleton of type `T`.
    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) {
        self.resources.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Returns the resource singleton of type `T`, if installed.
    pub fn resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.resources
            .get(&TypeId::of::<T>())?
            .downcast_ref::<T>()
    }

    /// Returns the resource singleton of type `T` mutably, if installed.
    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.resources
            .get_mut(&TypeId::of::<T>())?
            .downcast_mut::<T>()
    }

    /// Removes and returns the resource singleton of type `T`.
    pub fn remove_resource<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        let boxed = self.resources.remove(&TypeId::of::<T>())?;
        boxed.downcast::<T>().ok().map(|value| *value)
    }

    /// Queues a structural command for deferred execution.
    ///
    /// Takes `&self` so parallel systems can record commands concurrently;
    /// the log preserves the order in which records were appended.
    pub fn defer(&self, command: Command) {
        self.deferred.lock().unwrap().push(command);
    }

    /// Returns the number of queued, not yet applied commands.
    pub fn deferred_len(&self) -> usize {
        self.deferred.lock().unwrap().len()
    }

    /// Applies all queued deferred commands in recorded order.
    ///
    /// Returns the number of commands drained from the log. Commands
    /// addressing entities that died before the barrier are skipped.
    /// Capacity and type errors are propagated as fatal.
    pub fn apply_deferred_commands(&mut self) -> EngineResult<usize> {
        let queued = std::mem::take(&mut *self.deferred.lock().unwrap());
        let applied = queued.len();

        for command in queued {
            match command {
                Command::Spawn { bundle } => {
                    self.spawn_with(bundle)?;
                }
                Command::Despawn { entity } => {
                    self.despawn(entity);
                }
                Command::Add { entity, component_id, value } => {
                    if !self.entities.is_alive(entity) {
                        continue;
                    }
                    self.ensure_attribute(component_id)
                        .insert_dyn(component_id, entity.index(), value)?;
                    if let Some(signature) = self.entities.signature_mut(entity) {
                        signature.set(component_id);
                    }
                }
                Command::Remove { entity, component_id } => {
                    if !self.entities.is_alive(entity) {
                        continue;
                    }
                    if let Some(column) = self.attributes[component_id as usize].as_deref_mut() {
                        column.remove_dyn(entity.index());
                    }
                    if let Some(signature) = self.entities.signature_mut(entity) {
                        signature.clear(component_id);
                    }
                }
            }
        }

        if applied != 0 {
            log::trace!("barrier applied {applied} deferred commands");
        }
        Ok(applied)
    }

    /// Collects live entities matching `query` in store iteration order.
    pub fn collect_entities(&self, query: &QuerySignature) -> Vec<Entity> {
        self.entities
            .iter_alive()
            .filter(|entity| {
                self.entities
                    .signature(*entity)
                    .map(|signature| query.matches(signature))
                    .unwrap_or(false)
            })
            .collect()
    }
}
