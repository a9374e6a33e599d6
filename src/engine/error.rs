//! Error types for entity spawning and attribute storage.
//!
//! This module declares focused, composable error types used across the
//! entity and component storage layers. Each error carries enough context to
//! make failures actionable while remaining small and cheap to pass around or
//! convert into higher-level variants like [`SpawnError`] and [`EngineError`].
//!
//! ## Goals
//! * **Specificity:** Each error type models a single failure mode (e.g.
//!   arena capacity exhaustion, stale entity handles, storage type
//!   mismatches).
//! * **Ergonomics:** All errors implement [`std::error::Error`] and
//!   [`fmt::Display`], and provide `From<T>` conversions into aggregate
//!   errors so callers can bubble failures with `?`.
//! * **Taxonomy:** Missing preconditions (no matching entities, absent
//!   settings resources) are *not* errors; systems treat them as no-ops.
//!   Errors here model environment-level failures and defects only.

use std::fmt;

use crate::engine::types::ComponentID;


/// Result alias used by systems and the scheduler.
pub type EngineResult<T> = Result<T, EngineError>;

/// Returned when the entity arena cannot grow to satisfy a spawn request.
///
/// Capacity exhaustion indicates an environment-level problem (the packed
/// index space is fully used) and is propagated as fatal rather than
/// recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {

    /// Total entity slots the operation attempted to allocate.
    pub entities_needed: u64,

    /// Current capacity limiting the operation.
    pub capacity: u64,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entity limit reached ({} needed; capacity {})",
            self.entities_needed, self.capacity
        )
    }
}

impl std::error::Error for CapacityError {}

/// Returned when an `Entity` handle is no longer valid, typically because it
/// was despawned and its version no longer matches live storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleEntityError;

impl fmt::Display for StaleEntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("stale or dead entity reference")
    }
}

impl std::error::Error for StaleEntityError {}

/// Returned when a type-erased value does not match the storage column it is
/// being inserted into.
///
/// This indicates a defect at a command-producing call site: the dynamic type
/// of a deferred value must match the registered type of its `ComponentID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatchError {

    /// Component id the operation targeted.
    pub component_id: ComponentID,

    /// Rust type name of the column's element type.
    pub expected: &'static str,
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value type mismatch for component {} (expected {})",
            self.component_id, self.expected
        )
    }
}

impl std::error::Error for TypeMismatchError {}

/// Aggregate error for entity spawning.
#[derive(Debug)]
pub enum SpawnError {
    /// The entity arena is out of slots.
    Capacity(CapacityError),

    /// A bundle value did not match its registered component type.
    TypeMismatch(TypeMismatchError),
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::Capacity(e) => write!(f, "spawn failed: {e}"),
            SpawnError::TypeMismatch(e) => write!(f, "spawn failed: {e}"),
        }
    }
}

impl std::error::Error for SpawnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpawnError::Capacity(e) => Some(e),
            SpawnError::TypeMismatch(e) => Some(e),
        }
    }
}

impl From<CapacityError> for SpawnError {
    fn from(e: CapacityError) -> Self { SpawnError::Capacity(e) }
}

impl From<TypeMismatchError> for SpawnError {
    fn from(e: TypeMismatchError) -> Self { SpawnError::TypeMismatch(e) }
}

/// Top-level engine error returned by systems and command application.
#[derive(Debug)]
pub enum EngineError {
    /// Entity creation failed.
    Spawn(SpawnError),

    /// A storage operation hit a type mismatch outside of spawning.
    TypeMismatch(TypeMismatchError),

    /// An operation required a live entity but the handle was stale.
    StaleEntity(StaleEntityError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Spawn(e) => write!(f, "{e}"),
            EngineError::TypeMismatch(e) => write!(f, "{e}"),
            EngineError::StaleEntity(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Spawn(e) => Some(e),
            EngineError::TypeMismatch(e) => Some(e),
            EngineError::StaleEntity(e) => Some(e),
        }
    }
}

impl From<SpawnError> for EngineError {
    fn from(e: SpawnError) -> Self { EngineError::Spawn(e) }
}

impl From<CapacityError> for EngineError {
    fn from(e: CapacityError) -> Self { EngineError::Spawn(SpawnError::Capacity(e)) }
}

impl From<TypeMismatchError> for EngineError {
    fn from(e: TypeMismatchError) -> Self { EngineError::TypeMismatch(e) }
}

impl From<StaleEntityError> for EngineError {
    fn from(e: StaleEntityError) -> Self { EngineError::StaleEntity(e) }
}
