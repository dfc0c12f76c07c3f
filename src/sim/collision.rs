//! Collision detection and response for axis-aligned boxes
//!
//! Overlaps are found by an explicit scan after each integration step
//! rather than engine callbacks. Terrain is one-way from above: bodies land
//! on the top face of platforms and the floor, and pass through from below.

use glam::Vec2;

use super::body::Body;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box centred on `center` with full extents `size`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Horizontal spans overlap
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }
}

/// Result of a landing check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// Whether the body came to rest on (or bounced off) the surface
    pub hit: bool,
    /// Vertical speed after the bounce
    pub rebound: f32,
}

impl Landing {
    pub fn miss() -> Self {
        Self {
            hit: false,
            rebound: 0.0,
        }
    }
}

/// Rebound speeds below this settle the body instead of bouncing
const REST_SPEED: f32 = 8.0;

/// Land `body` on the top face of `surface` if it crossed it this step.
///
/// `prev_bottom` is the body's bottom edge before integration. A hit snaps
/// the body onto the surface and reflects its vertical speed scaled by the
/// body's bounce.
pub fn land_on(body: &mut Body, prev_bottom: f32, surface: &Aabb) -> Landing {
    let aabb = body.aabb();
    if body.vel.y < 0.0 || !aabb.overlaps_x(surface) {
        return Landing::miss();
    }
    let top = surface.top();
    // Crossed (or resting exactly on) the top face during this step
    if prev_bottom > top + 0.5 || aabb.bottom() < top {
        return Landing::miss();
    }

    body.pos.y = top - body.size.y / 2.0;
    let rebound = -body.vel.y * body.bounce;
    body.vel.y = if rebound.abs() < REST_SPEED { 0.0 } else { rebound };
    body.grounded = true;
    Landing {
        hit: true,
        rebound: body.vel.y,
    }
}

/// Reflect off the top of the world (y = 0)
pub fn bounce_ceiling(body: &mut Body) -> bool {
    let top = body.pos.y - body.size.y / 2.0;
    if top < 0.0 && body.vel.y < 0.0 {
        body.pos.y = body.size.y / 2.0;
        body.vel.y = -body.vel.y * body.bounce;
        return true;
    }
    false
}

/// Reflect off the horizontal world edges `[left, right]`
pub fn bounce_walls(body: &mut Body, left: f32, right: f32) -> bool {
    let half = body.size.x / 2.0;
    if body.pos.x - half < left && body.vel.x < 0.0 {
        body.pos.x = left + half;
        body.vel.x = -body.vel.x * body.bounce;
        return true;
    }
    if body.pos.x + half > right && body.vel.x > 0.0 {
        body.pos.x = right - half;
        body.vel.x = -body.vel.x * body.bounce;
        return true;
    }
    false
}
