//! Host drivers
//!
//! The simulation only needs a monotonic millisecond timestamp per frame. The
//! browser supplies one through `requestAnimationFrame`; the headless driver
//! fabricates one at a fixed frame rate for native runs and tests.

use crate::consts::FRAME_MS;
use crate::scoreboard::ScoreSink;
use crate::session::Session;
use crate::sim::GamePhase;

/// Fixed-step clock for running a session without a browser
#[derive(Debug, Clone, Copy)]
pub struct HeadlessDriver {
    pub frame_ms: f64,
    pub now_ms: f64,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self {
            frame_ms: FRAME_MS,
            now_ms: 0.0,
        }
    }
}

impl HeadlessDriver {
    pub fn new(frame_ms: f64) -> Self {
        Self {
            frame_ms,
            now_ms: 0.0,
        }
    }

    /// Advance one frame
    pub fn step<S: ScoreSink>(&mut self, session: &mut Session<S>) {
        self.now_ms += self.frame_ms;
        session.advance(self.now_ms);
    }

    /// Start the session if needed and run until the game ends or `max_frames` pass.
    ///
    /// Returns the frozen survival time, or `None` if the player was still alive.
    pub fn run_until_over<S: ScoreSink>(
        &mut self,
        session: &mut Session<S>,
        max_frames: u64,
    ) -> Option<u32> {
        if session.phase() != GamePhase::Running {
            session.start(self.now_ms);
        }
        for _ in 0..max_frames {
            self.step(session);
            if session.phase() == GamePhase::Over {
                return Some(session.sim().elapsed_secs());
            }
        }
        log::debug!(
            "Still alive after {} frames ({}s)",
            max_frames,
            session.sim().elapsed_secs()
        );
        None
    }
}

/// What a frame loop should do when the page's visibility changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCommand {
    Stop,
    Resume,
    Keep,
}

/// Hidden pages stop ticking; a page that comes back resumes a stopped loop
pub fn on_visibility_change(hidden: bool, loop_running: bool) -> LoopCommand {
    match (hidden, loop_running) {
        (true, true) => LoopCommand::Stop,
        (false, false) => LoopCommand::Resume,
        _ => LoopCommand::Keep,
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AnimationLoop;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    type FrameClosure = Closure<dyn FnMut(f64)>;

    /// `requestAnimationFrame` loop that can be cancelled.
    ///
    /// The callback receives the rAF timestamp. Dropping the loop cancels the
    /// pending frame and releases the callback; a loop dropped from inside its
    /// own callback releases it once that frame returns.
    pub struct AnimationLoop {
        handle: Rc<Cell<Option<i32>>>,
        closure: Rc<RefCell<Option<FrameClosure>>>,
        in_frame: Rc<Cell<bool>>,
    }

    impl AnimationLoop {
        pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
            let handle = Rc::new(Cell::new(None));
            let closure: Rc<RefCell<Option<FrameClosure>>> = Rc::new(RefCell::new(None));
            let in_frame = Rc::new(Cell::new(false));

            let next_handle = handle.clone();
            let self_ref = closure.clone();
            let frame_flag = in_frame.clone();
            *closure.borrow_mut() = Some(Closure::new(move |time: f64| {
                frame_flag.set(true);
                on_frame(time);
                frame_flag.set(false);
                // Stopped while the frame ran
                if next_handle.get().is_none() {
                    return;
                }
                if let Some(cb) = self_ref.borrow().as_ref() {
                    next_handle.set(request_frame(cb).ok());
                }
            }));

            let first = match closure.borrow().as_ref() {
                Some(cb) => request_frame(cb)?,
                None => return Err(JsValue::from_str("animation callback missing")),
            };
            handle.set(Some(first));
            Ok(Self {
                handle,
                closure,
                in_frame,
            })
        }

        pub fn is_running(&self) -> bool {
            self.handle.get().is_some()
        }

        /// Cancel the pending frame; the callback never runs again
        pub fn stop(&self) {
            if let Some(id) = self.handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
        }
    }

    impl Drop for AnimationLoop {
        fn drop(&mut self) {
            self.stop();
            // Breaks the closure's reference to itself
            let closure = self.closure.borrow_mut().take();
            if self.in_frame.get() {
                // Still executing: free it after the callback returns
                wasm_bindgen_futures::spawn_local(async move { drop(closure) });
            }
        }
    }

    fn request_frame(cb: &FrameClosure) -> Result<i32, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        window.request_animation_frame(cb.as_ref().unchecked_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoreboard::SurvivalBoard;
    use crate::settings::Settings;
    use crate::sim::SegmentChain;
    use glam::Vec2;

    #[test]
    fn fixed_steps() {
        let mut session = Session::new(Settings::default(), 1, SurvivalBoard::new()).unwrap();
        session.start(0.0);
        let mut driver = HeadlessDriver::new(10.0);
        for _ in 0..5 {
            driver.step(&mut session);
        }
        assert_eq!(driver.now_ms, 50.0);
        assert_eq!(session.sim().time_ticks, 5);
    }

    #[test]
    fn runs_until_over() {
        let mut session = Session::new(Settings::default(), 2, SurvivalBoard::new()).unwrap();
        let sim = session.sim_mut();
        for bot in &mut sim.bots {
            bot.speed = 0.0;
            bot.chain = SegmentChain::straight(Vec2::new(150.0, 150.0), 0.0, 5);
        }
        let mut driver = HeadlessDriver::default();
        // Heading east from the centre at 3 px/frame leaves the world well inside 600 frames
        let secs = driver.run_until_over(&mut session, 600);
        assert!(secs.is_some());
        assert_eq!(session.phase(), GamePhase::Over);
        assert_eq!(session.sink().best(), secs.filter(|&s| s > 0));
    }

    #[test]
    fn visibility_stops_and_resumes() {
        assert_eq!(on_visibility_change(true, true), LoopCommand::Stop);
        assert_eq!(on_visibility_change(false, false), LoopCommand::Resume);
        assert_eq!(on_visibility_change(true, false), LoopCommand::Keep);
        assert_eq!(on_visibility_change(false, true), LoopCommand::Keep);
    }

    #[test]
    fn gives_up_after_max_frames() {
        let mut session = Session::new(Settings::default(), 3, SurvivalBoard::new()).unwrap();
        let mut driver = HeadlessDriver::default();
        assert_eq!(driver.run_until_over(&mut session, 0), None);
        assert_eq!(session.phase(), GamePhase::Running);
    }
}
