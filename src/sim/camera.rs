//! Viewport window that follows the player's head
//!
//! Derived once per frame from the head position and never fed back into the
//! simulation, except to turn viewport-space pointer input into world space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    /// World position of the viewport's top-left corner
    pub top_left: Vec2,
    /// Viewport size in world units
    pub viewport: Vec2,
}

impl Camera {
    /// Center the viewport on `focus`, clamped so it never leaves a world of `world_size`
    pub fn follow(focus: Vec2, viewport: Vec2, world_size: f32) -> Self {
        let max = (Vec2::splat(world_size) - viewport).max(Vec2::ZERO);
        let top_left = (focus - viewport / 2.0).max(Vec2::ZERO).min(max);
        Self { top_left, viewport }
    }

    /// Convert a point in viewport pixels to world coordinates
    pub fn viewport_to_world(&self, point: Vec2) -> Vec2 {
        point + self.top_left
    }

    pub fn world_to_viewport(&self, point: Vec2) -> Vec2 {
        point - self.top_left
    }

    /// Whether a world point (grown by `margin`) would land on screen
    pub fn is_visible(&self, point: Vec2, margin: f32) -> bool {
        let p = self.world_to_viewport(point);
        p.x >= -margin
            && p.y >= -margin
            && p.x <= self.viewport.x + margin
            && p.y <= self.viewport.y + margin
    }

    /// Scale from world units to a square minimap of `minimap_size` pixels
    pub fn minimap_scale(minimap_size: f32, world_size: f32) -> f32 {
        minimap_size / world_size
    }
}
