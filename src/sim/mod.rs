//! Arena simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform code:
//! - One `tick` per host frame, driven by host timestamps
//! - Seeded RNG only
//! - Stable iteration order (bots by index, food by insertion)

pub mod bot;
pub mod camera;
pub mod collision;
pub mod food;
pub mod locomotion;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod world;

pub use bot::{BOT_NAMES, Bot, plan_heading, wall_avoidance};
pub use camera::Camera;
pub use collision::{CollisionReport, GameOverCause, bot_contact, out_of_bounds, resolve_player};
pub use food::{FoodField, FoodItem, FoodKind};
pub use locomotion::{Segment, SegmentChain, max_link_length};
pub use player::{Hue, PlayerState};
pub use snapshot::{FoodView, PlayerView, SegmentView, SnakeView, Snapshot};
pub use state::{Eater, GameEvent, GamePhase, Simulation, SimulationClock, SteeringTarget};
pub use tick::{TickInput, tick};
pub use world::World;
