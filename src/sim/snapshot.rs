//! Read-only projection of the simulation for presentation
//!
//! Serialized to camelCase JSON for the web host. Nothing here feeds back into
//! the simulation.

use glam::Vec2;
use serde::Serialize;

use super::camera::Camera;
use super::food::FoodKind;
use super::locomotion::SegmentChain;
use super::state::{GamePhase, Simulation};
use crate::consts::MINIMAP_SIZE;

/// Body radius shrink per segment index for the player and for bots
const PLAYER_TAPER: f32 = 0.02;
const BOT_TAPER: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentView {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    /// Drawn radius: 10 for the head, tapering body, never below 4
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeView {
    pub segments: Vec<SegmentView>,
    pub color_class: String,
    pub name: String,
}

/// The player's body; same shape as a bot's but labelled `displayName`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub segments: Vec<SegmentView>,
    pub color_class: String,
    pub display_name: String,
}

fn project_segments(chain: &SegmentChain, taper: f32) -> Vec<SegmentView> {
    chain
        .segments()
        .iter()
        .enumerate()
        .map(|(i, seg)| SegmentView {
            x: seg.pos.x,
            y: seg.pos.y,
            angle: seg.angle,
            radius: segment_radius(i, taper),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodView {
    pub position: Vec2,
    pub size_class: FoodKind,
    pub color: &'static str,
    pub radius: f32,
}

/// Everything a presenter needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub camera: Camera,
    pub world_size: f32,
    /// World units to minimap pixels
    pub minimap_scale: f32,
    pub player: PlayerView,
    pub bots: Vec<SnakeView>,
    pub food: Vec<FoodView>,
    pub elapsed_seconds: u32,
    pub phase: GamePhase,
    /// HUD: collected food value
    pub score: u32,
    /// HUD: player segment count
    pub length: usize,
}

impl Snapshot {
    pub fn capture(sim: &Simulation) -> Self {
        let player = &sim.player;
        Self {
            camera: sim.camera,
            world_size: sim.world.size,
            minimap_scale: Camera::minimap_scale(MINIMAP_SIZE, sim.world.size),
            player: PlayerView {
                segments: project_segments(&player.chain, PLAYER_TAPER),
                color_class: player.hue.css(),
                display_name: player.name.clone(),
            },
            bots: sim
                .bots
                .iter()
                .map(|bot| SnakeView {
                    segments: project_segments(&bot.chain, BOT_TAPER),
                    color_class: bot.hue.css(),
                    name: bot.name.clone(),
                })
                .collect(),
            food: sim
                .food
                .items()
                .iter()
                .map(|item| FoodView {
                    position: item.pos,
                    size_class: item.kind,
                    color: item.kind.color(),
                    radius: item.kind.radius(),
                })
                .collect(),
            elapsed_seconds: sim.clock.elapsed_secs,
            phase: sim.clock.phase,
            score: player.score,
            length: player.chain.len(),
        }
    }

    /// Food items that would land on screen (with a small margin)
    pub fn visible_food(&self) -> impl Iterator<Item = &FoodView> {
        self.food
            .iter()
            .filter(|f| self.camera.is_visible(f.position, 20.0))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn segment_radius(index: usize, taper: f32) -> f32 {
    if index == 0 {
        10.0
    } else {
        (8.0 - index as f32 * taper).max(4.0)
    }
}
