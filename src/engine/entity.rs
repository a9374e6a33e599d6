//! Generational entity arena.
//!
//! Entities pack an arena index and a version counter into one id; the
//! version bumps on despawn so stale handles never resolve.

use crate::engine::types::{
    EntityID, IndexID, VersionID, EntityCount,
    INDEX_BITS, INDEX_MASK, INDEX_CAP,
    Signature,
};
use crate::engine::error::CapacityError;


/// Packed entity handle: version in the high bits, arena index in the low.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Entity(pub EntityID);

#[inline]
const fn make_id(index: IndexID, version: VersionID) -> EntityID {
    ((version as EntityID) << INDEX_BITS) | (index as EntityID)
}

#[inline]
fn make_entity(index: IndexID, version: VersionID) -> Entity {
    debug_assert!((index as EntityID) <= INDEX_MASK);
    Entity(make_id(index, version))
}

#[inline]
const fn split_entity(entity: Entity) -> (IndexID, VersionID) {
    let id = entity.0;
    let index = (id & INDEX_MASK) as IndexID;
    let version = (id >> INDEX_BITS) as VersionID;
    (index, version)
}

impl Entity {
    /// Splits the handle into `(index, version)`.
    #[inline] pub fn parts(self) -> (IndexID, VersionID) { split_entity(self) }
    /// Returns the arena index.
    #[inline] pub fn index(self) -> IndexID { (self.0 & INDEX_MASK) as IndexID }
    /// Returns the generation counter.
    #[inline] pub fn version(self) -> VersionID { (self.0 >> INDEX_BITS) as VersionID }
}

/// Generational entity arena.
///
/// Slots are reused in LIFO order; the version counter bumps on despawn so
/// stale handles never resolve. Each live slot carries the entity's component
/// `Signature`, which is the source of truth for filtered views.
#[derive(Default)]
pub struct Entities {
    versions: Vec<VersionID>,
    free_store: Vec<IndexID>,
    alive: Vec<bool>,
    signatures: Vec<Signature>,
}

impl Entities {
    /// Creates an empty arena.
    pub fn new() -> Self { Self::default() }

    fn ensure_capacity(&mut self, additional_entities: EntityCount) -> Result<(), CapacityError> {
        if additional_entities == 0 { return Ok(()); }

        let current_entity_count = self.versions.len() as EntityID;
        let entities_needed = current_entity_count + (additional_entities as EntityID);
        let capacity = INDEX_CAP as EntityID + 1;
        if entities_needed > capacity {
            return Err(CapacityError { entities_needed, capacity });
        }

        self.versions.resize(entities_needed as usize, 0);
        self.alive.resize(entities_needed as usize, false);
        self.signatures.resize(entities_needed as usize, Signature::default());

        // Reversed so lower indices are handed out first.
        for index in (current_entity_count..entities_needed).rev() {
            self.free_store.push(index as IndexID);
        }
        Ok(())
    }

    /// Claims a slot and returns its handle, growing the arena on demand.
    pub fn spawn(&mut self, signature: Signature) -> Result<Entity, CapacityError> {
        let index = if let Some(i) = self.free_store.pop() {
            i
        } else {
            self.ensure_capacity(1024)?;
            self.free_store.pop().expect("capacity added must yield a slot.")
        };

        let version = self.versions[index as usize];
        self.alive[index as usize] = true;
        self.signatures[index as usize] = signature;

        Ok(make_entity(index, version))
    }

    /// Frees a slot and bumps its version. Returns `false` for stale handles.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let (i, v) = split_entity(entity);
        let index = i as usize;
        match self.versions.get_mut(index) {
            Some(live) if *live == v && self.alive.get(index).copied().unwrap_or(false) => {
                *live = live.wrapping_add(1);
                self.alive[index] = false;
                self.signatures[index] = Signature::default();
                self.free_store.push(i);
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if the handle's slot is live and its version matches.
    pub fn is_alive(&self, entity: Entity) -> bool {
        let (i, v) = split_entity(entity);
        let index = i as usize;
        index < self.versions.len()
            && self.alive.get(index).copied().unwrap_or(false)
            && self.versions[index] == v
    }

    /// Returns a live entity's component signature.
    pub fn signature(&self, entity: Entity) -> Option<&Signature> {
        if self.is_alive(entity) {
            Some(&self.signatures[entity.index() as usize])
        } else {
            None
        }
    }

    /// Returns a live entity's component signature mutably.
    pub fn signature_mut(&mut self, entity: Entity) -> Option<&mut Signature> {
        if self.is_alive(entity) {
            Some(&mut self.signatures[entity.index() as usize])
        } else {
            None
        }
    }

    /// Counts live entities.
    pub fn live_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Iterates live entities in ascending index order.
    ///
    /// This is the store iteration order observed by filtered views; it is
    /// deterministic within a cycle but not guaranteed stable across spawns
    /// and despawns.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter_map(move |(index, &alive)| {
                if alive {
                    Some(make_entity(index as IndexID, self.versions[index]))
                } else {
                    None
                }
            })
    }
}
