//! # Engine Module
//!
//! Internal engine implementation.
//!
//! This module contains all core building blocks:
//! - Entity arena and component side tables
//! - Component registry
//! - Filtered views and snapshot collection
//! - Deferred command log
//! - Scheduling and systems
//!
//! Public API exposure is controlled by `lib.rs`.

pub mod types;
pub mod error;
pub mod component;
pub mod storage;
pub mod entity;
pub mod world;
pub mod query;
pub mod commands;
pub mod systems;
pub mod scheduler;
pub mod random;
