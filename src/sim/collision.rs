//! Axis-separated AABB collision resolution
//!
//! The body moves along X, gets pushed out of anything it entered, then moves
//! along Y and gets pushed out again. Resolving X before Y is what makes
//! ledges and corners behave: a body clipping a corner while falling lands on
//! the ledge instead of snagging on its side. Resolution is whole-tick AABB,
//! no sweeping.

use super::entity::Entity;
use super::rect::Rect;

/// Which surfaces the body touched during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResult {
    /// Pushed back out of a wall (horizontal pass)
    pub hit_wall: bool,
    /// Landed on top of a solid (vertical pass, falling)
    pub landed: bool,
    /// Bumped a ceiling (vertical pass, rising)
    pub hit_ceiling: bool,
}

/// Integrate one tick of motion for a physics-driven body
///
/// Gravity is folded into `vel.y` first, then each axis is integrated and
/// resolved in turn. Horizontal velocity is never zeroed by a wall hit; only
/// the position is corrected.
pub fn step_body(body: &mut Entity, solids: &[Rect], gravity: f32) -> CollisionResult {
    let mut result = CollisionResult::default();

    body.vel.y += gravity;

    body.pos.x += body.vel.x;
    resolve_horizontal(body, solids, &mut result);

    body.on_ground = false;
    body.pos.y += body.vel.y;
    resolve_vertical(body, solids, &mut result);

    result
}

fn resolve_horizontal(body: &mut Entity, solids: &[Rect], result: &mut CollisionResult) {
    for solid in solids {
        if !body.rect().intersects(solid) {
            continue;
        }
        if body.vel.x > 0.0 {
            body.pos.x = solid.left() - body.size.x;
            result.hit_wall = true;
        } else if body.vel.x < 0.0 {
            body.pos.x = solid.right();
            result.hit_wall = true;
        }
    }
}

fn resolve_vertical(body: &mut Entity, solids: &[Rect], result: &mut CollisionResult) {
    for solid in solids {
        if !body.rect().intersects(solid) {
            continue;
        }
        if body.vel.y > 0.0 {
            body.pos.y = solid.top() - body.size.y;
            body.vel.y = 0.0;
            body.on_ground = true;
            result.landed = true;
        } else if body.vel.y < 0.0 {
            body.pos.y = solid.bottom();
            body.vel.y = 0.0;
            result.hit_ceiling = true;
        }
    }
}
