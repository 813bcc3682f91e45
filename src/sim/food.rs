//! Collectible food scattered across the world
//!
//! The pool has a fixed size: every item eaten is replaced by a fresh one at a
//! random position, drawn from the same small/large distribution.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::world::World;
use crate::consts::LARGE_FOOD_CHANCE;

/// Food size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodKind {
    /// Worth 1 segment
    Small,
    /// Worth 5 segments
    Large,
}

impl FoodKind {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(LARGE_FOOD_CHANCE) {
            FoodKind::Large
        } else {
            FoodKind::Small
        }
    }

    /// Segments gained (and score) when eaten
    pub fn value(self) -> u32 {
        match self {
            FoodKind::Small => 1,
            FoodKind::Large => 5,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            FoodKind::Small => "#ff0000",
            FoodKind::Large => "#ff5500",
        }
    }

    /// Drawn radius
    pub fn radius(self) -> f32 {
        match self {
            FoodKind::Small => 6.0,
            FoodKind::Large => 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub pos: Vec2,
    pub kind: FoodKind,
}

impl FoodItem {
    pub fn random<R: Rng + ?Sized>(world: &World, rng: &mut R) -> Self {
        Self {
            pos: world.random_point(rng),
            kind: FoodKind::random(rng),
        }
    }
}

/// The bag of food items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodField {
    items: Vec<FoodItem>,
}

impl FoodField {
    /// Scatter `count` items uniformly over the world
    pub fn scatter<R: Rng + ?Sized>(world: &World, count: usize, rng: &mut R) -> Self {
        Self {
            items: (0..count).map(|_| FoodItem::random(world, rng)).collect(),
        }
    }

    pub fn from_items(items: Vec<FoodItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Nearest item to `point` by Euclidean distance
    pub fn nearest(&self, point: Vec2) -> Option<&FoodItem> {
        self.items.iter().min_by(|a, b| {
            a.pos
                .distance_squared(point)
                .partial_cmp(&b.pos.distance_squared(point))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Eat the first item within `radius` of `point` and spawn its replacement.
    ///
    /// Returns the kind eaten. The pool size is unchanged.
    pub fn consume_near<R: Rng + ?Sized>(
        &mut self,
        point: Vec2,
        radius: f32,
        world: &World,
        rng: &mut R,
    ) -> Option<FoodKind> {
        let index = self
            .items
            .iter()
            .position(|item| item.pos.distance(point) < radius)?;
        let eaten = self.items.remove(index);
        self.items.push(FoodItem::random(world, rng));
        Some(eaten.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn value_distribution_averages_near_1_8() {
        let world = World::new(2000.0);
        let mut rng = Pcg32::seed_from_u64(2024);
        let total: u32 = (0..10_000)
            .map(|_| FoodItem::random(&world, &mut rng).kind.value())
            .sum();
        let mean = total as f64 / 10_000.0;
        assert!((mean - 1.8).abs() < 0.1, "mean value {mean}");
    }

    #[test]
    fn scatter_initial_pool() {
        let world = World::new(2000.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let field = FoodField::scatter(&world, 50, &mut rng);
        assert_eq!(field.len(), 50);
        assert!(field.items().iter().all(|f| world.contains(f.pos)));
    }

    #[test]
    fn consume_replaces_item() {
        let world = World::new(2000.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = FoodField::from_items(vec![
            FoodItem {
                pos: Vec2::new(100.0, 100.0),
                kind: FoodKind::Small,
            },
            FoodItem {
                pos: Vec2::new(500.0, 500.0),
                kind: FoodKind::Large,
            },
        ]);

        assert_eq!(field.consume_near(Vec2::new(300.0, 300.0), 10.0, &world, &mut rng), None);
        assert_eq!(field.len(), 2);

        let eaten = field.consume_near(Vec2::new(504.0, 503.0), 10.0, &world, &mut rng);
        assert_eq!(eaten, Some(FoodKind::Large));
        assert_eq!(field.len(), 2);
        // The small item survives; only the eaten one was removed
        assert_eq!(field.items()[0].pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn nearest_picks_closest() {
        let field = FoodField::from_items(vec![
            FoodItem {
                pos: Vec2::new(0.0, 0.0),
                kind: FoodKind::Small,
            },
            FoodItem {
                pos: Vec2::new(40.0, 0.0),
                kind: FoodKind::Small,
            },
        ]);
        let nearest = field.nearest(Vec2::new(30.0, 0.0)).unwrap();
        assert_eq!(nearest.pos, Vec2::new(40.0, 0.0));
        assert!(FoodField::default().nearest(Vec2::ZERO).is_none());
    }
}
