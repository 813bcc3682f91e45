//! The square arena all entities live in

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Square world spanning `[0, size]` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub size: f32,
}

impl World {
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::splat(self.size / 2.0)
    }

    /// Inclusive bounds check; the edges themselves are still inside
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.size).contains(&point.x) && (0.0..=self.size).contains(&point.y)
    }

    /// Uniform random point inside the world
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.random::<f32>() * self.size,
            rng.random::<f32>() * self.size,
        )
    }
}
