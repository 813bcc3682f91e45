//! Simulation state and game phases
//!
//! `Simulation` exclusively owns every entity. Hosts mutate it only through
//! `start`/`restart`/`set_steering_target` and the per-frame `tick`, and read
//! it back through `snapshot`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bot::Bot;
use super::camera::Camera;
use super::collision::GameOverCause;
use super::food::FoodField;
use super::player::PlayerState;
use super::snapshot::Snapshot;
use super::tick::{TickInput, tick};
use super::world::World;
use crate::settings::{ConfigError, Settings};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// World spawned, waiting for `start`
    NotStarted,
    /// Active gameplay
    Running,
    /// Player died; survival time is frozen
    Over,
}

/// Who ate a food item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eater {
    Player,
    Bot(usize),
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    FoodEaten { eater: Eater, value: u32 },
    /// Emitted once per run, on the Running -> Over transition
    GameOver {
        survival_secs: u32,
        cause: GameOverCause,
    },
}

/// Where the player wants to go
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SteeringTarget {
    /// Pointer position in viewport pixels (converted through the camera)
    Viewport(Vec2),
    /// Absolute world position
    World(Vec2),
}

/// Phase plus survival timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    pub phase: GamePhase,
    /// Host timestamp (ms) when the current run started
    pub start_ms: Option<f64>,
    /// Whole seconds survived; frozen once the run is over
    pub elapsed_secs: u32,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            phase: GamePhase::NotStarted,
            start_ms: None,
            elapsed_secs: 0,
        }
    }
}

impl SimulationClock {
    /// Begin a fresh run at `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.phase = GamePhase::Running;
        self.start_ms = Some(now_ms);
        self.elapsed_secs = 0;
    }

    /// Recompute elapsed seconds while running. Never goes backwards, even if
    /// the host clock does.
    pub fn update(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Running {
            return;
        }
        let Some(start) = self.start_ms else { return };
        let secs = ((now_ms - start) / 1000.0).floor();
        if secs.is_finite() && secs > 0.0 {
            self.elapsed_secs = self.elapsed_secs.max(secs as u32);
        }
    }

    /// Stop the clock; returns the frozen survival time
    pub fn finish(&mut self) -> u32 {
        self.phase = GamePhase::Over;
        self.elapsed_secs
    }
}

/// The whole game: world, entities, clock and RNG
#[derive(Debug, Clone)]
pub struct Simulation {
    pub settings: Settings,
    /// Seed the RNG was created from
    pub seed: u64,
    pub world: World,
    pub clock: SimulationClock,
    pub player: PlayerState,
    pub bots: Vec<Bot>,
    pub food: FoodField,
    pub camera: Camera,
    /// Latest steering input; sticky until replaced
    pub steering: Option<SteeringTarget>,
    /// Ticks processed while running (this run)
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl Simulation {
    /// Validate `settings` and spawn a fresh, not-yet-started world
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = World::new(settings.world_size);
        let viewport = Vec2::new(settings.viewport_width, settings.viewport_height);
        let player = PlayerState::spawn(world.center(), &settings.player_name, &mut rng);
        let camera = Camera::follow(player.head_pos(), viewport, world.size);

        let mut sim = Self {
            settings,
            seed,
            world,
            clock: SimulationClock::default(),
            player,
            bots: Vec::new(),
            food: FoodField::default(),
            camera,
            steering: None,
            time_ticks: 0,
            rng,
            events: Vec::new(),
        };
        sim.populate();
        log::debug!(
            "Simulation created: seed={}, world={}, bots={}, food={}",
            seed,
            sim.world.size,
            sim.bots.len(),
            sim.food.len()
        );
        Ok(sim)
    }

    /// Re-randomize every entity (player, bots, food, camera, steering)
    fn respawn(&mut self) {
        self.player = PlayerState::spawn(
            self.world.center(),
            &self.settings.player_name,
            &mut self.rng,
        );
        self.camera = Camera::follow(self.player.head_pos(), self.viewport(), self.world.size);
        self.steering = None;
        self.time_ticks = 0;
        self.events.clear();
        self.populate();
    }

    /// Spawn bots then food; the player is always drawn first
    fn populate(&mut self) {
        let rng = &mut self.rng;
        self.bots = (0..self.settings.bot_count)
            .map(|_| Bot::spawn(&self.world, rng))
            .collect();
        self.food = FoodField::scatter(&self.world, self.settings.food_count, rng);
    }

    pub fn phase(&self) -> GamePhase {
        self.clock.phase
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.clock.elapsed_secs
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.settings.viewport_width, self.settings.viewport_height)
    }

    /// Begin play. From `Over` this is a full restart; while running it does nothing.
    pub fn start(&mut self, now_ms: f64) {
        match self.clock.phase {
            GamePhase::NotStarted => {
                self.clock.start(now_ms);
                log::info!("Run started (seed {})", self.seed);
            }
            GamePhase::Over => self.restart(now_ms),
            GamePhase::Running => log::debug!("start() ignored, run already in progress"),
        }
    }

    /// Throw away the current world and begin a new run immediately.
    ///
    /// A run abandoned this way does not produce a `GameOver` event.
    pub fn restart(&mut self, now_ms: f64) {
        if self.clock.phase == GamePhase::Running {
            log::info!("Run abandoned after {}s", self.clock.elapsed_secs);
        }
        self.respawn();
        self.clock.start(now_ms);
        log::info!("Run restarted");
    }

    /// Replace the sticky steering input
    pub fn set_steering_target(&mut self, target: SteeringTarget) {
        self.steering = Some(target);
    }

    /// Resolve the current steering input to a world point
    pub fn steering_world_target(&self) -> Option<Vec2> {
        self.steering.map(|target| match target {
            SteeringTarget::Viewport(p) => self.camera.viewport_to_world(p),
            SteeringTarget::World(p) => p,
        })
    }

    /// End the run (terminal collision). Only the first call per run has any effect.
    pub(crate) fn end_run(&mut self, cause: GameOverCause) {
        if self.clock.phase != GamePhase::Running {
            return;
        }
        let survival_secs = self.clock.finish();
        log::info!(
            "Game over after {}s (length {}, cause {:?})",
            survival_secs,
            self.player.chain.len(),
            cause
        );
        self.events.push(GameEvent::GameOver {
            survival_secs,
            cause,
        });
    }

    /// Run one frame and return what presentation should draw
    pub fn advance(&mut self, input: &TickInput, now_ms: f64) -> Snapshot {
        tick(self, input, now_ms);
        self.snapshot()
    }

    /// Read-only projection of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Take the events produced by the most recent frame.
    ///
    /// Each `tick` starts from an empty queue, so hosts that never drain do not
    /// accumulate history.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> Simulation {
        Simulation::new(Settings::default(), 42).unwrap()
    }

    #[test]
    fn new_spawns_configured_world() {
        let sim = sim();
        assert_eq!(sim.phase(), GamePhase::NotStarted);
        assert_eq!(sim.bots.len(), 10);
        assert_eq!(sim.food.len(), 50);
        assert_eq!(sim.player.chain.len(), 10);
        assert_eq!(sim.player.head_pos(), Vec2::new(1000.0, 1000.0));
        assert_eq!(sim.camera.top_left, Vec2::new(600.0, 700.0));
    }

    #[test]
    fn rejects_invalid_settings() {
        let settings = Settings {
            viewport_width: 5000.0,
            ..Settings::default()
        };
        assert!(Simulation::new(settings, 1).is_err());
    }

    #[test]
    fn same_seed_same_world() {
        let a = sim();
        let b = sim();
        assert_eq!(a.player.hue, b.player.hue);
        assert_eq!(a.food.items(), b.food.items());
        for (x, y) in a.bots.iter().zip(&b.bots) {
            assert_eq!(x.head_pos(), y.head_pos());
            assert_eq!(x.name, y.name);
        }
    }

    #[test]
    fn start_transitions() {
        let mut sim = sim();
        sim.start(1000.0);
        assert_eq!(sim.phase(), GamePhase::Running);
        assert_eq!(sim.clock.start_ms, Some(1000.0));

        // Second start while running is ignored
        sim.start(5000.0);
        assert_eq!(sim.clock.start_ms, Some(1000.0));
    }

    #[test]
    fn end_run_emits_once() {
        let mut sim = sim();
        sim.start(0.0);
        sim.clock.update(3500.0);
        sim.end_run(GameOverCause::OutOfBounds);
        sim.end_run(GameOverCause::BotCollision { bot: 0 });
        let events = sim.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::GameOver {
                survival_secs: 3,
                cause: GameOverCause::OutOfBounds
            }]
        );
        assert_eq!(sim.phase(), GamePhase::Over);
    }

    #[test]
    fn clock_is_monotonic_and_freezes() {
        let mut clock = SimulationClock::default();
        clock.update(10_000.0);
        assert_eq!(clock.elapsed_secs, 0);

        clock.start(1_000.0);
        clock.update(4_999.0);
        assert_eq!(clock.elapsed_secs, 3);
        clock.update(2_000.0);
        assert_eq!(clock.elapsed_secs, 3);

        assert_eq!(clock.finish(), 3);
        clock.update(60_000.0);
        assert_eq!(clock.elapsed_secs, 3);
    }

    #[test]
    fn player_takes_the_first_draws() {
        let sim = sim();
        let mut rng = Pcg32::seed_from_u64(42);
        let fresh = PlayerState::spawn(Vec2::new(1000.0, 1000.0), "Player", &mut rng);
        assert_eq!(sim.player.hue, fresh.hue);
        let first_bot = Bot::spawn(&sim.world, &mut rng);
        assert_eq!(sim.bots[0].head_pos(), first_bot.head_pos());
    }

    #[test]
    fn restart_discards_pending_events() {
        let mut sim = sim();
        sim.start(0.0);
        sim.events.push(GameEvent::FoodEaten {
            eater: Eater::Player,
            value: 1,
        });
        sim.restart(10.0);
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn viewport_steering_uses_camera() {
        let mut sim = sim();
        sim.set_steering_target(SteeringTarget::Viewport(Vec2::new(400.0, 0.0)));
        assert_eq!(sim.steering_world_target(), Some(Vec2::new(1000.0, 700.0)));
        sim.set_steering_target(SteeringTarget::World(Vec2::new(5.0, 6.0)));
        assert_eq!(sim.steering_world_target(), Some(Vec2::new(5.0, 6.0)));
    }
}
