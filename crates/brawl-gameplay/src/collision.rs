//! Stateless collision and resolution between the two combatants.
//!
//! Nothing here owns an entity; every function works on what it is handed.

use brawl_common::{Rect, Vec2};

use crate::character::Character;
use crate::config::CombatConfig;
use crate::physics::Body;

/// AABB overlap test. Touching edges are not a collision.
#[must_use]
pub fn check_aabb(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// The overlapping region of two rectangles.
#[must_use]
pub fn overlap_rect(a: &Rect, b: &Rect) -> Option<Rect> {
    a.intersection(b)
}

/// Centroid of the overlap, for placing hit effects.
#[must_use]
pub fn hit_point(a: &Rect, b: &Rect) -> Option<Vec2> {
    overlap_rect(a, b).map(|overlap| overlap.center())
}

/// Pushes two overlapping bodies apart along X.
///
/// Each body moves by half the horizontal overlap. `a` moves left only when
/// it is strictly left of `b`, so bodies at the same X split with `a` going
/// right. A body pinned by a wall hands the rest of its share to the other
/// body, so the pair never stays overlapped against a wall.
///
/// Returns the overlap that was resolved.
pub fn separate_bodies(a: &mut Body, b: &mut Body, config: &CombatConfig) -> Option<f32> {
    let overlap = overlap_rect(&a.hurtbox(), &b.hurtbox())?;
    let half = overlap.width / 2.0;

    if a.position.x < b.position.x {
        a.position.x -= half;
        b.position.x += half;
    } else {
        a.position.x += half;
        b.position.x -= half;
    }

    b.position.x += wall_correction(a, config);
    a.position.x += wall_correction(b, config);
    a.resolve_bounds(config);
    Some(overlap.width)
}

/// Clamps `body` to the arena and returns how far the clamp moved it.
fn wall_correction(body: &mut Body, config: &CombatConfig) -> f32 {
    let before = body.position.x;
    body.resolve_bounds(config);
    body.position.x - before
}

/// Body-vs-body resolution between the two combatants.
pub fn resolve_body_collision(
    a: &mut Character,
    b: &mut Character,
    config: &CombatConfig,
) -> Option<f32> {
    separate_bodies(a.body_mut(), b.body_mut(), config)
}
