//! The player-controlled snake
//!
//! The heading comes from an external steering target. Until one is supplied
//! the snake keeps its spawn heading (due east).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::locomotion::SegmentChain;
use crate::consts::{PLAYER_SPEED, PLAYER_START_LENGTH};
use crate::heading_toward;

/// Body colour class, rendered as `hsl(hue, 80%, 60%)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hue(pub u16);

impl Hue {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Hue(rng.random_range(0..360))
    }

    pub fn css(self) -> String {
        format!("hsl({}, 80%, 60%)", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub chain: SegmentChain,
    pub hue: Hue,
    pub name: String,
    pub speed: f32,
    /// Last heading applied; kept when the steering target is degenerate
    pub heading: f32,
    /// Food value collected (display only, survival time is the real score)
    pub score: u32,
}

impl PlayerState {
    /// Spawn at `center` facing east with the starting body laid out behind
    pub fn spawn<R: Rng + ?Sized>(center: Vec2, name: &str, rng: &mut R) -> Self {
        Self {
            chain: SegmentChain::straight(center, 0.0, PLAYER_START_LENGTH),
            hue: Hue::random(rng),
            name: name.to_string(),
            speed: PLAYER_SPEED,
            heading: 0.0,
            score: 0,
        }
    }

    pub fn head_pos(&self) -> Vec2 {
        self.chain.head().pos
    }

    /// Steer toward `target` (world space) and move one tick.
    ///
    /// With no target, or a target sitting on the head, the previous heading is reused.
    pub fn steer(&mut self, target: Option<Vec2>) {
        if let Some(heading) = target.and_then(|t| heading_toward(self.head_pos(), t)) {
            self.heading = heading;
        }
        self.chain.advance(self.heading, self.speed);
    }

    /// Grow by the value of food just eaten
    pub fn feed(&mut self, value: u32) {
        self.chain.grow(value as usize);
        self.score += value;
    }
}
