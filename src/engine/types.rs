//! Core identifiers, bit layouts, and signatures.
//!
//! This module defines the fundamental types shared across all engine
//! subsystems: entity id packing, component identifiers, signature bitsets
//! used for filtering, and the access sets used by the scheduler to detect
//! conflicts between systems.
//!
//! ## Entity representation
//!
//! Entities are encoded as a packed 64-bit integer:
//!
//! ```text
//! | version | index |
//! ```
//!
//! - **Index** identifies the slot in the entity arena.
//! - **Version** is a generation counter that detects stale handles after a
//!   despawn.
//!
//! ## Components and filtering
//!
//! Component types are identified by compact [`ComponentID`] values assigned
//! by the registry. Per-entity component sets are described by [`Signature`]
//! bitsets, which support fast bitwise containment and disjointness tests.
//! [`QuerySignature`] describes what a filtered view requires (present,
//! absent) and how matched components are accessed (read, write), while
//! [`AccessSets`] describes the declared access of a whole system for
//! conflict-based scheduling.
//!
//! ## Bundles
//!
//! [`Bundle`] is a type-erased group of component values used when spawning
//! entities through the deferred command log.

use std::any::Any;

use crate::engine::component::component_id_of;


/// Bit-width type used for compile-time layout calculations.
pub type Bits = u8;

/// Globally unique entity identifier encoded as a packed 64-bit value.
pub type EntityID = u64;
/// Index into the entity arena.
pub type IndexID = u32;
/// Generation counter used to detect stale entities.
pub type VersionID = u32;
/// Count of live entities.
pub type EntityCount = u32;

/// Unique identifier for a system.
pub type SystemID = u16;
/// Simulation cycle counter.
pub type Tick = u64;

/// Total number of bits in an [`EntityID`].
pub const ENTITY_BITS: Bits = 64;
/// Number of bits reserved for entity versioning.
pub const VERSION_BITS: Bits = 32;
/// Number of bits reserved for the arena index.
pub const INDEX_BITS: Bits = ENTITY_BITS - VERSION_BITS;

const _: [(); 1] = [(); (VERSION_BITS < ENTITY_BITS) as usize];
const _: [(); 1] = [(); (INDEX_BITS > 0) as usize];

const fn mask(bits: Bits) -> EntityID {
    if bits == 0 { 0 } else { ((1 as EntityID) << bits) - 1 }
}

/// Mask selecting the index portion of an [`EntityID`].
pub const INDEX_MASK: EntityID = mask(INDEX_BITS);
/// Maximum number of entity slots in the arena.
pub const INDEX_CAP: IndexID = INDEX_MASK as IndexID;

/// Unique identifier for a component type.
pub type ComponentID = u16;

/// Maximum number of registered component types.
pub const COMPONENT_CAP: usize = 256;
/// Number of `u64` words required to represent a full component signature.
pub const SIGNATURE_SIZE: usize = (COMPONENT_CAP + 63) / 64;

/// Bitset representing a set of components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    /// Packed component bitset.
    pub components: [u64; SIGNATURE_SIZE],
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            components: [0u64; SIGNATURE_SIZE],
        }
    }
}

impl Signature {
    /// Sets the bit corresponding to `component_id`.
    #[inline]
    pub fn set(&mut self, component_id: ComponentID) {
        let index = (component_id as usize) / 64;
        let bits = (component_id as usize) % 64;
        self.components[index] |= 1u64 << bits;
    }

    /// Clears the bit corresponding to `component_id`.
    #[inline]
    pub fn clear(&mut self, component_id: ComponentID) {
        let index = (component_id as usize) / 64;
        let bits = (component_id as usize) % 64;
        self.components[index] &= !(1u64 << bits);
    }

    /// Returns `true` if `component_id` is present in this signature.
    #[inline]
    pub fn has(&self, component_id: ComponentID) -> bool {
        let index = (component_id as usize) / 64;
        let bits = (component_id as usize) % 64;
        (self.components[index] >> bits) & 1 == 1
    }

    /// Returns `true` if all components in `signature` are present.
    #[inline]
    pub fn contains_all(&self, signature: &Signature) -> bool {
        for (word_a, word_b) in self.components.iter().zip(signature.components.iter()) {
            if (word_a & word_b) != *word_b { return false; }
        }
        true
    }

    /// Returns `true` if no component is shared with `signature`.
    #[inline]
    pub fn disjoint_from(&self, signature: &Signature) -> bool {
        self.components
            .iter()
            .zip(signature.components.iter())
            .all(|(word_a, word_b)| (word_a & word_b) == 0)
    }

    /// Returns `true` if no bit is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.iter().all(|&word| word == 0)
    }

    /// Iterates over all component IDs set in this signature.
    pub fn iterate_over_components(&self) -> impl Iterator<Item = ComponentID> + '_ {
        self.components
            .iter()
            .enumerate()
            .flat_map(|(word_index, &word)| {
                let base = word_index * 64;
                let mut bits = word;
                std::iter::from_fn(move || {
                    if bits == 0 {
                        return None;
                    }
                    let tz = bits.trailing_zeros() as usize;
                    bits &= bits - 1;
                    Some((base + tz) as ComponentID)
                })
            })
    }
}

/// Builds a component signature from a list of component IDs.
pub fn build_signature(component_ids: &[ComponentID]) -> Signature {
    let mut signature = Signature::default();
    for &component_id in component_ids { signature.set(component_id); }
    signature
}

/// Component signature used for filtered-view matching.
///
/// `read` and `write` together form the *required* set; `without` excludes
/// entities carrying any of its components.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuerySignature {
    /// Components read by the view.
    pub read: Signature,

    /// Components written by the view.
    pub write: Signature,

    /// Components that must be absent.
    pub without: Signature,
}

impl QuerySignature {
    /// Returns `true` if an entity signature satisfies this query.
    #[inline]
    pub fn matches(&self, entity_signature: &Signature) -> bool {
        entity_signature.contains_all(&self.read)
            && entity_signature.contains_all(&self.write)
            && entity_signature.disjoint_from(&self.without)
    }
}

/// Marks a component type as read-only in a query signature.
pub fn set_read<T: 'static + Send + Sync>(signature: &mut QuerySignature) {
    signature.read.set(component_id_of::<T>());
}

/// Marks a component type as writable in a query signature.
pub fn set_write<T: 'static + Send + Sync>(signature: &mut QuerySignature) {
    signature.write.set(component_id_of::<T>());
}

/// Excludes a component type from a query signature.
pub fn set_without<T: 'static + Send + Sync>(signature: &mut QuerySignature) {
    signature.without.set(component_id_of::<T>());
}

/// Access mode for a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    /// Read-only access.
    Read,
    /// Exclusive write access.
    Write,
}

/// Declares the component access set of a system.
///
/// The scheduler uses declared access to place non-conflicting systems in
/// the same parallel stage. Deferred structural commands do not need to be
/// declared; they are applied at stage barriers where no system is running.
#[derive(Clone, Debug, Default)]
pub struct AccessSets {
    /// Components read by the system.
    pub read: Signature,
    /// Components written by the system.
    pub write: Signature,
}

impl AccessSets {
    /// Declares a read-only dependency on component `T`.
    pub fn with_read<T: 'static + Send + Sync>(mut self) -> Self {
        self.read.set(component_id_of::<T>());
        self
    }

    /// Declares an exclusive write dependency on component `T`.
    pub fn with_write<T: 'static + Send + Sync>(mut self) -> Self {
        self.write.set(component_id_of::<T>());
        self
    }

    /// Returns `true` if this access set conflicts with another.
    #[inline]
    pub fn conflicts_with(&self, other: &AccessSets) -> bool {
        // Conflicts if: (W ∩ W) or (W ∩ R) or (R ∩ W)
        for ((a_w, a_r), (b_w, b_r)) in self.write.components.iter().zip(self.read.components.iter())
            .zip(other.write.components.iter().zip(other.read.components.iter()))
        {
            if (a_w & b_w) != 0 { return true; }
            if (a_w & b_r) != 0 { return true; }
            if (a_r & b_w) != 0 { return true; }
        }
        false
    }
}

/// Type-erased container for component values.
pub trait DynamicBundle {
    /// Removes and returns the value for `component_id`, if present.
    fn take(&mut self, component_id: ComponentID) -> Option<Box<dyn Any + Send>>;
}

/// Concrete implementation of a dynamic component bundle.
///
/// Used by the deferred command log to describe the full component set of an
/// entity spawned at the next barrier.
pub struct Bundle {
    /// Component presence signature.
    signature: Signature,
    /// Sparse storage of component values.
    values: Vec<(ComponentID, Box<dyn Any + Send>)>,
}

impl Default for Bundle {
    fn default() -> Self { Self::new() }
}

impl Bundle {
    /// Creates an empty bundle.
    #[inline]
    pub fn new() -> Self {
        Self {
            signature: Signature::default(),
            values: Vec::new(),
        }
    }

    /// Inserts a component value into the bundle.
    ///
    /// `T` must already be registered; its id is resolved via the registry.
    #[inline]
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        let component_id = component_id_of::<T>();
        self.signature.set(component_id);
        self.values.push((component_id, Box::new(value)));
    }

    /// Builder-style variant of [`Bundle::insert`].
    #[inline]
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Builds a signature representing the components present in this bundle.
    #[inline]
    pub fn signature(&self) -> Signature {
        self.signature
    }
}

impl DynamicBundle for Bundle {
    #[inline]
    fn take(&mut self, component_id: ComponentID) -> Option<Box<dyn Any + Send>> {
        let index = self
            .values
            .iter()
            .position(|(cid, _)| *cid == component_id)?;

        let (_, value) = self.values.swap_remove(index);
        Some(value)
    }
}
