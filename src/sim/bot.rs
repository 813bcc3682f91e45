//! Autonomous snakes
//!
//! Each bot re-plans on its own timer (the think cycle) and in between only
//! turns toward its planned heading at a bounded rate. Bots never die.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::food::{FoodField, FoodKind};
use super::locomotion::SegmentChain;
use super::player::Hue;
use super::world::World;
use crate::consts::*;
use crate::{heading_toward, normalize_angle};

/// Names handed out to bots at spawn
pub const BOT_NAMES: [&str; 15] = [
    "Slithery", "Wiggles", "Fangs", "Hissy", "Scales", "Venom", "Coily", "Noodle", "Zigzag",
    "Crusher", "Twisty", "Speedy", "Sneaky", "Slinky", "Striker",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub chain: SegmentChain,
    /// Current heading (radians, normalized)
    pub heading: f32,
    /// Heading chosen by the last think cycle
    pub target_heading: f32,
    pub speed: f32,
    /// Maximum heading change per tick
    pub turn_rate: f32,
    pub hue: Hue,
    pub name: String,
    /// Host timestamp of the last think cycle; `None` until the first one
    pub last_decision_ms: Option<f64>,
    pub decision_interval_ms: f64,
}

impl Bot {
    /// Spawn at a random spot with randomized speed, agility, length and look
    pub fn spawn<R: Rng + ?Sized>(world: &World, rng: &mut R) -> Self {
        let head = world.random_point(rng);
        let heading = rng.random::<f32>() * TAU;
        let length = rng.random_range(BOT_LENGTH_MIN..BOT_LENGTH_MAX);
        let name = BOT_NAMES.choose(rng).copied().unwrap_or(BOT_NAMES[0]);

        Self {
            chain: SegmentChain::straight(head, heading, length),
            heading,
            target_heading: rng.random::<f32>() * TAU,
            speed: rng.random_range(BOT_SPEED_MIN..BOT_SPEED_MAX),
            turn_rate: rng.random_range(BOT_TURN_RATE_MIN..BOT_TURN_RATE_MAX),
            hue: Hue::random(rng),
            name: name.to_string(),
            last_decision_ms: None,
            decision_interval_ms: rng.random_range(BOT_THINK_MIN_MS..BOT_THINK_MAX_MS),
        }
    }

    pub fn head_pos(&self) -> Vec2 {
        self.chain.head().pos
    }

    /// Whether the think cycle is due at `now_ms`
    pub fn should_think(&self, now_ms: f64) -> bool {
        match self.last_decision_ms {
            None => true,
            Some(last) => now_ms - last >= self.decision_interval_ms,
        }
    }

    /// Re-plan `target_heading` if the think cycle is due
    pub fn think<R: Rng + ?Sized>(
        &mut self,
        food: &FoodField,
        world: &World,
        now_ms: f64,
        rng: &mut R,
    ) {
        if !self.should_think(now_ms) {
            return;
        }
        self.target_heading = plan_heading(self.head_pos(), self.heading, food, world, rng);
        self.last_decision_ms = Some(now_ms);
        log::trace!(
            "bot {} re-planned heading {:.2} at {:?}",
            self.name,
            self.target_heading,
            self.head_pos()
        );
    }

    /// Turn toward `target_heading` by at most `turn_rate`, the short way round
    pub fn steer(&mut self) {
        let diff = normalize_angle(self.target_heading - self.heading);
        if diff.abs() > STEER_DEADBAND {
            let step = diff.clamp(-self.turn_rate, self.turn_rate);
            self.heading = normalize_angle(self.heading + step);
        }
    }

    /// One full bot frame: think, steer, move, then try to eat.
    ///
    /// Returns the food eaten this frame, if any.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        food: &mut FoodField,
        world: &World,
        now_ms: f64,
        rng: &mut R,
    ) -> Option<FoodKind> {
        self.think(food, world, now_ms, rng);
        self.steer();
        self.chain.advance(self.heading, self.speed);

        let eaten = food.consume_near(self.head_pos(), FOOD_PICKUP_RADIUS, world, rng)?;
        self.chain.grow(eaten.value() as usize);
        Some(eaten)
    }
}

/// Heading a bot-like mind picks from `head`: nearest food, a random swerve of up
/// to 90° when there is none, and wall avoidance overriding both.
pub fn plan_heading<R: Rng + ?Sized>(
    head: Vec2,
    heading: f32,
    food: &FoodField,
    world: &World,
    rng: &mut R,
) -> f32 {
    let seek = food
        .nearest(head)
        .and_then(|item| heading_toward(head, item.pos));
    let planned = match seek {
        Some(toward_food) => toward_food,
        None => heading + (rng.random::<f32>() * 2.0 - 1.0) * FRAC_PI_2,
    };
    wall_avoidance(head, world).unwrap_or(planned)
}

/// Forced heading when `head` is within `WALL_MARGIN` of an edge.
/// West edge wins over east, then north over south.
pub fn wall_avoidance(head: Vec2, world: &World) -> Option<f32> {
    let far = world.size - WALL_MARGIN;
    if head.x < WALL_MARGIN {
        Some(0.0)
    } else if head.x > far {
        Some(PI)
    } else if head.y < WALL_MARGIN {
        Some(FRAC_PI_2)
    } else if head.y > far {
        Some(3.0 * FRAC_PI_2)
    } else {
        None
    }
}
