//! Simulation component and resource types.
//!
//! Components fall into three groups:
//! * squad bookkeeping (`RequireSoldier`, `SoldierLink`, `SquadSettings`),
//! * soldier markers (`SoldierTag`, `InSquadSoldierTag`),
//! * sprite spatial data and the cull flag.
//!
//! Marker polarity matters and is intentionally asymmetric:
//! * `InSquadSoldierTag` present = soldier is assigned.
//! * `CullSpriteTag` present = sprite is **hidden**; absence means visible.
//!
//! Resources are process-wide singletons read at spawn and cull time.

use glam::{IVec2, Vec2};

use crate::engine::entity::Entity;


/// 2D world position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPosition2D(pub Vec2);

/// World position of the previous cycle, for interpolation downstream.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PrevWorldPosition2D(pub Vec2);

/// 2D sprite size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale2D(pub Vec2);

/// Anchor offset within the sprite size, as a fraction in `[0, 1]` per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pivot(pub Vec2);

/// Marks an entity as renderable by the downstream sprite stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpriteTag;

/// Marks a sprite as culled. Absence means the sprite should render.
#[derive(Clone, Copy, Debug, Default)]
pub struct CullSpriteTag;

/// Marks an entity as a soldier eligible for squad assignment.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoldierTag;

/// Marks a soldier as already assigned to some squad.
#[derive(Clone, Copy, Debug, Default)]
pub struct InSquadSoldierTag;

/// Outstanding soldier demand of a squad.
///
/// Present only while demand is unsatisfied; removal of this component is
/// the "squad is full" signal. A completed distribution pass never leaves a
/// `RequireSoldier` with `count == 0` behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequireSoldier {
    /// Soldiers still needed.
    pub count: u32,
}

/// Ordered list of soldiers assigned to a squad.
///
/// Append-only from the squad's perspective; capacity is reserved before
/// bulk appends.
#[derive(Clone, Debug, Default)]
pub struct SoldierLink {
    /// Assigned soldier handles, in assignment order.
    pub soldiers: Vec<Entity>,
}

impl SoldierLink {
    /// Creates an empty list with capacity for `expected` soldiers.
    pub fn with_capacity(expected: usize) -> Self {
        Self { soldiers: Vec::with_capacity(expected) }
    }
}

/// Per-squad formation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquadSettings {
    /// Soldiers per row and number of rows.
    pub resolution: IVec2,
    /// Spacing margin between soldiers.
    pub soldier_margin: Vec2,
}

/// Playable area bounds. Resource singleton consumed by the spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapSettings {
    /// Lower-left corner of the playable area.
    pub min: Vec2,
    /// Upper-right corner of the playable area.
    pub max: Vec2,
}

/// Default squad parameters. Resource singleton consumed by the spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquadDefaultSettings {
    /// Spacing margin copied into each spawned squad's settings.
    pub soldier_margin: Vec2,
    /// Inclusive lower bound of the random squad resolution, per axis.
    pub min_resolution: IVec2,
    /// Exclusive upper bound of the random squad resolution, per axis.
    pub max_resolution: IVec2,
}

/// Camera-derived view rectangle for the current cycle.
///
/// Provided by the excluded camera layer; the core treats it purely as a
/// float rectangle. Resource singleton consumed by the culling passes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBounds {
    /// Lower-left corner of the view rectangle.
    pub min: Vec2,
    /// Upper-right corner of the view rectangle.
    pub max: Vec2,
}

impl CameraBounds {
    /// Returns `true` if `point` lies strictly inside the view rectangle.
    #[inline]
    pub fn contains_strict(&self, point: Vec2) -> bool {
        point.x > self.min.x
            && point.x < self.max.x
            && point.y > self.min.y
            && point.y < self.max.y
    }
}
