//! Proximity tests between heads, food, bot bodies and the world edge
//!
//! Everything is a plain radius check against every segment; there is no
//! spatial index. At 10 bots of ~50 segments and 50 food items that is a few
//! hundred distance checks per frame. Larger arenas would want a grid.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bot::Bot;
use super::food::{FoodField, FoodKind};
use super::player::PlayerState;
use super::world::World;
use crate::consts::{BOT_CONTACT_RADIUS, FOOD_PICKUP_RADIUS};

/// Why the player's run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameOverCause {
    /// Head touched a segment of the bot at this index
    BotCollision { bot: usize },
    /// Head left the world
    OutOfBounds,
}

/// Outcome of the player's collision pass for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionReport {
    /// Food the player ate this frame
    pub eaten: Option<FoodKind>,
    /// Terminal collision, if any
    pub terminal: Option<GameOverCause>,
}

/// Strict proximity test: touching at exactly `radius` does not count
#[inline]
pub fn within(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Index of the first bot with any segment (head or body) within contact range of `head`
pub fn bot_contact(head: Vec2, bots: &[Bot]) -> Option<usize> {
    bots.iter().position(|bot| {
        bot.chain
            .segments()
            .iter()
            .any(|seg| within(head, seg.pos, BOT_CONTACT_RADIUS))
    })
}

/// Whether `head` is outside the world on either axis
pub fn out_of_bounds(head: Vec2, world: &World) -> bool {
    !world.contains(head)
}

/// Run the player's checks in order: food, bot bodies, world edge.
///
/// Food is eaten (and the player grows) even on the frame the run ends.
pub fn resolve_player<R: Rng + ?Sized>(
    player: &mut PlayerState,
    bots: &[Bot],
    food: &mut FoodField,
    world: &World,
    rng: &mut R,
) -> CollisionReport {
    let eaten = food.consume_near(player.head_pos(), FOOD_PICKUP_RADIUS, world, rng);
    if let Some(kind) = eaten {
        player.feed(kind.value());
    }

    let head = player.head_pos();
    let terminal = if let Some(bot) = bot_contact(head, bots) {
        Some(GameOverCause::BotCollision { bot })
    } else if out_of_bounds(head, world) {
        Some(GameOverCause::OutOfBounds)
    } else {
        None
    };

    CollisionReport { eaten, terminal }
}
