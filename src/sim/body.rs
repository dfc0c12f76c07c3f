//! Kinematic bodies
//!
//! A minimal arcade integration step: gravity, velocity, restitution.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// A moving box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Centre position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Full extents
    pub size: Vec2,
    /// Restitution on landing (0 = stop, 1 = perfect bounce)
    pub bounce: f32,
    /// Affected by world gravity
    pub gravity: bool,
    /// Resting on a surface after the last step
    pub grounded: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            bounce: 0.0,
            gravity: true,
            grounded: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn without_gravity(mut self) -> Self {
        self.gravity = false;
        self
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Advance by `dt`, returning the bottom edge before the move
    pub fn integrate(&mut self, dt: f32, gravity: f32) -> f32 {
        let prev_bottom = self.aabb().bottom();
        if self.gravity {
            self.vel.y += gravity * dt;
        }
        self.pos += self.vel * dt;
        self.grounded = false;
        prev_bottom
    }
}
