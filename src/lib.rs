//! Snake Survival - a single-player snake arena against steering bots
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (locomotion, bot AI, collisions, game phase)
//! - `settings`: Arena configuration and presets
//! - `scoreboard`: Game-over collaborator and survival leaderboard
//! - `session`: Simulation + score sink glue for hosts
//! - `platform`: Frame drivers (headless native, requestAnimationFrame on web)

pub mod platform;
pub mod scoreboard;
pub mod session;
pub mod settings;
pub mod sim;

pub use scoreboard::{ScoreSink, SurvivalBoard};
pub use session::Session;
pub use settings::{ArenaPreset, ConfigError, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Distance kept between consecutive segments of a chain
    pub const SEGMENT_SPACING: f32 = 5.0;
    /// Per-tick interpolation factor from position toward target position
    pub const SMOOTHING: f32 = 0.2;

    /// Arena defaults
    pub const DEFAULT_WORLD_SIZE: f32 = 2000.0;
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;
    pub const DEFAULT_FOOD_COUNT: usize = 50;
    pub const DEFAULT_BOT_COUNT: usize = 10;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_START_LENGTH: usize = 10;

    /// Bot spawn ranges (half-open, drawn once per bot)
    pub const BOT_SPEED_MIN: f32 = 2.0;
    pub const BOT_SPEED_MAX: f32 = 3.5;
    pub const BOT_TURN_RATE_MIN: f32 = 0.05;
    pub const BOT_TURN_RATE_MAX: f32 = 0.10;
    pub const BOT_THINK_MIN_MS: f64 = 500.0;
    pub const BOT_THINK_MAX_MS: f64 = 1500.0;
    pub const BOT_LENGTH_MIN: usize = 5;
    pub const BOT_LENGTH_MAX: usize = 15;
    /// Bots steer away from walls once their head is this close
    pub const WALL_MARGIN: f32 = 100.0;
    /// Angular differences below this are not worth turning for
    pub const STEER_DEADBAND: f32 = 0.01;

    /// Head-to-food pickup distance
    pub const FOOD_PICKUP_RADIUS: f32 = 10.0;
    /// Player head to bot segment contact distance
    pub const BOT_CONTACT_RADIUS: f32 = 8.0;
    /// Probability that a spawned food item is the large kind
    pub const LARGE_FOOD_CHANCE: f64 = 0.2;

    /// Side of the square minimap, in screen pixels
    pub const MINIMAP_SIZE: f32 = 150.0;

    /// Nominal host frame spacing (~60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Normalize angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    angle %= TAU;
    if angle > PI {
        angle -= TAU;
    } else if angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Heading from `from` to `to`, or `None` when the points coincide
#[inline]
pub fn heading_toward(from: Vec2, to: Vec2) -> Option<f32> {
    let delta = to - from;
    if delta.length_squared() <= f32::EPSILON {
        None
    } else {
        Some(delta.y.atan2(delta.x))
    }
}

/// Offset of length `distance` in direction `heading`
#[inline]
pub fn polar_offset(distance: f32, heading: f32) -> Vec2 {
    Vec2::new(distance * heading.cos(), distance * heading.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn normalize_angle_range() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn heading_toward_guards_zero_length() {
        let p = Vec2::new(10.0, 10.0);
        assert_eq!(heading_toward(p, p), None);
        let east = heading_toward(p, Vec2::new(20.0, 10.0)).unwrap();
        assert!(east.abs() < 1e-6);
        let south = heading_toward(p, Vec2::new(10.0, 30.0)).unwrap();
        assert!((south - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn polar_offset_matches_heading() {
        let v = polar_offset(5.0, PI);
        assert!((v.x + 5.0).abs() < 1e-5);
        assert!(v.y.abs() < 1e-5);
    }
}
