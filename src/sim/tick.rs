//! Per-frame simulation step
//!
//! Frame order: clock, player move, bots (think/steer/move/feed), player
//! collisions, camera. Movement is per frame, not per millisecond: a host that
//! ticks at 30 Hz gets a snake half as fast in wall-clock terms.

use glam::Vec2;

use super::bot::plan_heading;
use super::camera::Camera;
use super::collision::resolve_player;
use super::state::{Eater, GameEvent, GamePhase, Simulation, SteeringTarget};
use crate::polar_offset;

/// How far ahead of the head the autopilot places its steering target
const AUTOPILOT_LOOKAHEAD: f32 = 100.0;

/// Input sampled at the start of a frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New steering target, if the pointer moved since last frame
    pub steering: Option<SteeringTarget>,
    /// Demo mode - the player steers itself like a bot
    pub autopilot: bool,
}

/// Advance the simulation by one frame at host time `now_ms`
pub fn tick(sim: &mut Simulation, input: &TickInput, now_ms: f64) {
    sim.events.clear();
    if let Some(target) = input.steering {
        sim.set_steering_target(target);
    }

    // Nothing moves before the start or after the end of a run
    if sim.phase() != GamePhase::Running {
        return;
    }

    sim.time_ticks += 1;
    sim.clock.update(now_ms);

    // Player
    let target = if input.autopilot {
        Some(autopilot_target(sim))
    } else {
        sim.steering_world_target()
    };
    sim.player.steer(target);

    // Bots
    for (index, bot) in sim.bots.iter_mut().enumerate() {
        if let Some(kind) = bot.update(&mut sim.food, &sim.world, now_ms, &mut sim.rng) {
            sim.events.push(GameEvent::FoodEaten {
                eater: Eater::Bot(index),
                value: kind.value(),
            });
        }
    }

    // Player collisions
    let report = resolve_player(
        &mut sim.player,
        &sim.bots,
        &mut sim.food,
        &sim.world,
        &mut sim.rng,
    );
    if let Some(kind) = report.eaten {
        sim.events.push(GameEvent::FoodEaten {
            eater: Eater::Player,
            value: kind.value(),
        });
    }
    if let Some(cause) = report.terminal {
        sim.end_run(cause);
    }

    sim.camera = Camera::follow(sim.player.head_pos(), sim.viewport(), sim.world.size);
}

/// World point the autopilot steers at: toward the nearest food, away from walls
fn autopilot_target(sim: &mut Simulation) -> Vec2 {
    let head = sim.player.head_pos();
    let heading = plan_heading(head, sim.player.heading, &sim.food, &sim.world, &mut sim.rng);
    head + polar_offset(AUTOPILOT_LOOKAHEAD, heading)
}
