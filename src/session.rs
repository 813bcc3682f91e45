//! A simulation wired to its score sink
//!
//! Hosts drive a `Session` rather than a bare `Simulation` so that every
//! finished run reaches the sink exactly once, whichever host is ticking.

use crate::scoreboard::{RunResult, ScoreSink};
use crate::settings::{ConfigError, Settings};
use crate::sim::{GameEvent, GamePhase, Simulation, Snapshot, SteeringTarget, TickInput};

pub struct Session<S: ScoreSink> {
    sim: Simulation,
    sink: S,
    input: TickInput,
    /// Events from the most recent frame, for hosts that want them
    last_events: Vec<GameEvent>,
}

impl<S: ScoreSink> Session<S> {
    pub fn new(settings: Settings, seed: u64, sink: S) -> Result<Self, ConfigError> {
        Ok(Self {
            sim: Simulation::new(settings, seed)?,
            sink,
            input: TickInput::default(),
            last_events: Vec::new(),
        })
    }

    pub fn start(&mut self, now_ms: f64) {
        self.sim.start(now_ms);
    }

    pub fn restart(&mut self, now_ms: f64) {
        self.sim.restart(now_ms);
    }

    /// Queue a steering target for the next frame
    pub fn set_steering_target(&mut self, target: SteeringTarget) {
        self.input.steering = Some(target);
    }

    /// Let the player steer itself (demo / headless runs)
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    pub fn autopilot(&self) -> bool {
        self.input.autopilot
    }

    /// Run one frame, forward a finished run to the sink, return the frame to draw
    pub fn advance(&mut self, now_ms: f64) -> Snapshot {
        let snapshot = self.sim.advance(&self.input, now_ms);
        // Steering is sticky inside the simulation; the pending input is one-shot
        self.input.steering = None;

        self.last_events = self.sim.drain_events();
        for event in &self.last_events {
            if let GameEvent::GameOver {
                survival_secs,
                cause,
            } = *event
            {
                let result = RunResult {
                    player_name: self.sim.player.name.clone(),
                    survival_secs,
                    length: self.sim.player.chain.len(),
                    cause,
                    ended_at_ms: now_ms,
                };
                self.sink.submit_survival(&result);
            }
        }
        snapshot
    }

    pub fn phase(&self) -> GamePhase {
        self.sim.phase()
    }

    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::scoreboard::SurvivalBoard;
    use crate::sim::{FoodField, FoodItem, FoodKind, GameOverCause, SegmentChain};
    use glam::Vec2;

    /// Park the bots in a corner and leave one food item far away
    fn quiet_arena(sim: &mut Simulation) {
        for bot in &mut sim.bots {
            bot.chain = SegmentChain::straight(Vec2::new(150.0, 150.0), 0.0, 5);
            bot.speed = 0.0;
        }
        sim.food = FoodField::from_items(vec![FoodItem {
            pos: Vec2::new(1900.0, 1900.0),
            kind: FoodKind::Small,
        }]);
    }

    fn doomed(sink: SurvivalBoard) -> Session<SurvivalBoard> {
        let mut session = Session::new(Settings::default(), 12, sink).unwrap();
        session.start(0.0);
        let sim = session.sim_mut();
        quiet_arena(sim);
        sim.player.chain = SegmentChain::straight(Vec2::new(1999.9, 1000.0), 0.0, 10);
        session
    }

    #[test]
    fn game_over_reaches_sink_once() {
        let mut session = doomed(SurvivalBoard::new());
        let mut now = 0.0;
        while session.phase() == GamePhase::Running {
            now += 1500.0;
            session.advance(now);
        }
        for _ in 0..20 {
            now += FRAME_MS;
            session.advance(now);
        }
        let board = session.into_sink();
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.entries[0].survival_secs, 1);
        assert_eq!(board.entries[0].name, "Player");
    }

    #[test]
    fn restart_while_running_submits_nothing() {
        let mut results = Vec::new();
        {
            let mut session =
                Session::new(Settings::default(), 13, |r: &RunResult| results.push(r.clone()))
                    .unwrap();
            session.start(0.0);
            quiet_arena(session.sim_mut());
            for frame in 1..=30 {
                session.advance(frame as f64 * FRAME_MS);
            }
            assert_eq!(session.phase(), GamePhase::Running);
            session.restart(1_000.0);
            assert_eq!(session.phase(), GamePhase::Running);
            assert!(session.last_events().iter().all(|e| !matches!(e, GameEvent::GameOver { .. })));
        }
        assert!(results.is_empty());
    }

    #[test]
    fn result_carries_cause_and_length() {
        let mut results = Vec::new();
        {
            let mut session =
                Session::new(Settings::default(), 14, |r: &RunResult| results.push(r.clone()))
                    .unwrap();
            session.start(0.0);
            let sim = session.sim_mut();
            quiet_arena(sim);
            sim.player.chain = SegmentChain::straight(Vec2::new(0.3, 1000.0), 0.0, 12);
            session.set_steering_target(SteeringTarget::World(Vec2::new(-500.0, 1000.0)));
            let mut now = 0.0;
            while session.phase() == GamePhase::Running {
                now += 2500.0;
                session.advance(now);
            }
            assert!(session
                .last_events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. })));
        }
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].cause, GameOverCause::OutOfBounds);
        assert_eq!(results[0].length, 12);
        assert_eq!(results[0].survival_secs, 2);
    }

    #[test]
    fn steering_input_is_one_shot_but_sticky() {
        let mut session = Session::new(Settings::default(), 15, SurvivalBoard::new()).unwrap();
        session.start(0.0);
        session.set_steering_target(SteeringTarget::World(Vec2::new(1000.0, 1900.0)));
        session.advance(FRAME_MS);
        assert!(session.input.steering.is_none());
        assert_eq!(
            session.sim().steering,
            Some(SteeringTarget::World(Vec2::new(1000.0, 1900.0)))
        );
    }
}
