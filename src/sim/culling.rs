//! Sprite visibility culling.
//!
//! Two independently schedulable passes over sprite entities, partitioned by
//! disjoint filters so they can never write-conflict:
//!
//! * the cull pass visits sprites **without** `CullSpriteTag` and defers a
//!   tag add when the sprite's rectangle has left the view,
//! * the un-cull pass visits sprites **with** the tag and defers a tag
//!   remove when the rectangle is visible again.
//!
//! Both passes read the same `CameraBounds` value for the cycle and record
//! their edits into the shared deferred log; the log is applied once at the
//! cycle barrier after both passes finish.
//!
//! Visibility uses an any-corner test: a rectangle counts as visible when at
//! least one of its four corners lies strictly inside the view rectangle.
//! This is a cheap, intentionally approximate test, not exact rectangle
//! intersection; a sprite larger than the whole view can be culled even
//! while it covers the camera. Downstream consumers treat tag absence as
//! "should render".

use glam::Vec2;

use crate::engine::commands::Command;
use crate::engine::error::EngineResult;
use crate::engine::query::QueryBuilder;
use crate::engine::systems::System;
use crate::engine::types::{AccessSets, SystemID};
use crate::engine::world::WorldRef;
use crate::sim::components::{
    CameraBounds, CullSpriteTag, Pivot, Scale2D, SpriteTag, WorldPosition2D,
};


/// Stable id of the cull pass.
pub const CULL_SYSTEM_ID: SystemID = 2;
/// Stable id of the un-cull pass.
pub const UNCULL_SYSTEM_ID: SystemID = 3;

/// Computes a sprite's axis-aligned rectangle from its spatial record.
///
/// The pivot is an anchor fraction within the size, so the rectangle is
/// `[position - size * pivot, position - size * pivot + size]`. Returned as
/// `(min, max)` corners. Exposed for downstream rendering collaborators.
#[inline]
pub fn sprite_rect(position: Vec2, size: Vec2, pivot: Vec2) -> (Vec2, Vec2) {
    let min = position - size * pivot;
    (min, min + size)
}

/// Any-corner containment test against the view rectangle.
#[inline]
fn any_corner_inside(min: Vec2, max: Vec2, view: &CameraBounds) -> bool {
    view.contains_strict(min)
        || view.contains_strict(Vec2::new(min.x, max.y))
        || view.contains_strict(Vec2::new(max.x, min.y))
        || view.contains_strict(max)
}

fn spatial_record(
    world: &crate::engine::world::WorldData,
    entity: crate::engine::entity::Entity,
) -> Option<(Vec2, Vec2, Vec2)> {
    let position = world.get::<WorldPosition2D>(entity)?.0;
    let size = world.get::<Scale2D>(entity)?.0;
    let pivot = world.get::<Pivot>(entity)?.0;
    Some((position, size, pivot))
}

/// Defers the cull tag onto sprites that have left the view rectangle.
pub struct CullSpritesSystem;

impl System for CullSpritesSystem {
    fn id(&self) -> SystemID {
        CULL_SYSTEM_ID
    }

    fn access(&self) -> AccessSets {
        AccessSets::default()
            .with_read::<SpriteTag>()
            .with_read::<CullSpriteTag>()
            .with_read::<WorldPosition2D>()
            .with_read::<Scale2D>()
            .with_read::<Pivot>()
    }

    fn run(&self, world: WorldRef<'_>) -> EngineResult<()> {
        let data = world.data();
        let Some(view) = data.resource::<CameraBounds>().copied() else {
            return Ok(());
        };

        let visible_sprites = QueryBuilder::new()
            .read::<SpriteTag>()
            .read::<WorldPosition2D>()
            .read::<Scale2D>()
            .read::<Pivot>()
            .without::<CullSpriteTag>()
            .collect(data);

        for entity in visible_sprites {
            let Some((position, size, pivot)) = spatial_record(data, entity) else {
                continue;
            };
            let (min, max) = sprite_rect(position, size, pivot);
            if !any_corner_inside(min, max, &view) {
                data.defer(Command::add_tag::<CullSpriteTag>(entity));
            }
        }
        Ok(())
    }
}

/// Defers removal of the cull tag from sprites that are visible again.
pub struct UncullSpritesSystem;

impl System for UncullSpritesSystem {
    fn id(&self) -> SystemID {
        UNCULL_SYSTEM_ID
    }

    fn access(&self) -> AccessSets {
        AccessSets::default()
            .with_read::<SpriteTag>()
            .with_read::<CullSpriteTag>()
            .with_read::<WorldPosition2D>()
            .with_read::<Scale2D>()
            .with_read::<Pivot>()
    }

    fn run(&self, world: WorldRef<'_>) -> EngineResult<()> {
        let data = world.data();
        let Some(view) = data.resource::<CameraBounds>().copied() else {
            return Ok(());
        };

        let culled_sprites = QueryBuilder::new()
            .read::<SpriteTag>()
            .read::<CullSpriteTag>()
            .read::<WorldPosition2D>()
            .read::<Scale2D>()
            .read::<Pivot>()
            .collect(data);

        for entity in culled_sprites {
            let Some((position, size, pivot)) = spatial_record(data, entity) else {
                continue;
            };
            let (min, max) = sprite_rect(position, size, pivot);
            if any_corner_inside(min, max, &view) {
                data.defer(Command::remove_component::<CullSpriteTag>(entity));
            }
        }
        Ok(())
    }
}
