//! Typed side-table storage for component columns.
//!
//! This module implements [`Attribute<T>`], a sparse column keyed directly by
//! entity arena index, and [`TypeErasedAttribute`], the dynamically-typed
//! interface the world uses to manage heterogeneous columns without knowing
//! `T` at compile time.
//!
//! # Storage model
//!
//! Each component kind owns one side table:
//!
//! ```text
//! Vec<Option<T>>   // slot i holds entity index i's value, if any
//! ```
//!
//! Addressing by entity index keeps lookups `O(1)` and makes read
//! partitioning by component kind trivial: two systems touching disjoint
//! component kinds touch disjoint allocations. Presence truth lives in the
//! per-entity `Signature` bitset owned by the entity arena; the column's
//! `Option` mirrors it for the stored value.
//!
//! # Type erasure
//!
//! The world stores columns as `Box<dyn TypeErasedAttribute>` indexed by
//! `ComponentID`. Typed access goes through `as_any` / `as_any_mut`
//! downcasting; deferred commands insert values through `insert_dyn`, which
//! validates the dynamic type and reports [`TypeMismatchError`] on mismatch.

use std::any::{Any, TypeId, type_name};

use crate::engine::types::{ComponentID, IndexID};
use crate::engine::error::TypeMismatchError;


/// A sparse, typed component column keyed by entity index.
pub struct Attribute<T> {
    values: Vec<Option<T>>,
}

impl<T> Default for Attribute<T> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<T: 'static + Send + Sync> Attribute<T> {
    /// Creates an empty column.
    pub fn new() -> Self { Self::default() }

    #[inline]
    fn ensure_slot(&mut self, index: IndexID) {
        let needed = index as usize + 1;
        if self.values.len() < needed {
            self.values.resize_with(needed, || None);
        }
    }

    /// Inserts a value for `index`, returning the previous value if any.
    #[inline]
    pub fn insert(&mut self, index: IndexID, value: T) -> Option<T> {
        self.ensure_slot(index);
        self.values[index as usize].replace(value)
    }

    /// Removes and returns the value for `index`, if present.
    #[inline]
    pub fn remove(&mut self, index: IndexID) -> Option<T> {
        self.values.get_mut(index as usize)?.take()
    }

    /// Returns a shared reference to the value for `index`, if present.
    #[inline]
    pub fn get(&self, index: IndexID) -> Option<&T> {
        self.values.get(index as usize)?.as_ref()
    }

    /// Returns a mutable reference to the value for `index`, if present.
    #[inline]
    pub fn get_mut(&mut self, index: IndexID) -> Option<&mut T> {
        self.values.get_mut(index as usize)?.as_mut()
    }

    /// Returns the number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.values.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Dynamically-typed interface over a component column.
///
/// ## Invariants
/// * `element_type_id` matches the `T` of the underlying [`Attribute<T>`].
/// * `insert_dyn` only succeeds when the boxed value's dynamic type matches.
pub trait TypeErasedAttribute: Send + Sync {
    /// Returns the `TypeId` of the element type.
    fn element_type_id(&self) -> TypeId;

    /// Returns the Rust type name of the element type, for diagnostics.
    fn element_type_name(&self) -> &'static str;

    /// Upcasts to `Any` for typed downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to `Any` for typed mutable downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Inserts a type-erased value for `index`.
    ///
    /// ## Errors
    /// Returns [`TypeMismatchError`] if the boxed value's dynamic type does
    /// not match the column element type. The erroneous value is dropped.
    fn insert_dyn(
        &mut self,
        component_id: ComponentID,
        index: IndexID,
        value: Box<dyn Any + Send>,
    ) -> Result<(), TypeMismatchError>;

    /// Removes the value for `index`. Returns `true` if a value was present.
    fn remove_dyn(&mut self, index: IndexID) -> bool;
}

impl<T: 'static + Send + Sync> TypeErasedAttribute for Attribute<T> {
    fn element_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn element_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn insert_dyn(
        &mut self,
        component_id: ComponentID,
        index: IndexID,
        value: Box<dyn Any + Send>,
    ) -> Result<(), TypeMismatchError> {
        match value.downcast::<T>() {
            Ok(typed) => {
                self.insert(index, *typed);
                Ok(())
            }
            Err(_) => Err(TypeMismatchError {
                component_id,
                expected: type_name::<T>(),
            }),
        }
    }

    fn remove_dyn(&mut self, index: IndexID) -> bool {
        self.remove(index).is_some()
    }
}
