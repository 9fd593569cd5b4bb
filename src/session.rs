//! Frame driver shared by the web and native shells
//!
//! One call to [`Session::frame`] per display frame: clock -> input -> tick ->
//! effects -> best-score persistence. Never re-entrant.

use glam::Vec2;

use crate::best::{BEST_KEY, BestScore, BestScoreStore};
use crate::sim::{
    Difficulty, EffectsSink, FrameClock, GameState, RoundPhase, Snapshot, TickInput, tick,
};
use crate::tuning::Tuning;

/// A game plus the things around it: clock, latched input, best-score store
pub struct Session<S: BestScoreStore> {
    pub state: GameState,
    clock: FrameClock,
    input: TickInput,
    best: BestScore,
    store: S,
}

impl<S: BestScoreStore> Session<S> {
    pub fn new(seed: u64, tuning: Tuning, store: S) -> Self {
        let clock = FrameClock::new(tuning.max_frame_dt);
        let mut state = GameState::with_tuning(seed, tuning);
        let best = BestScore::load(&store, BEST_KEY);
        state.best = best.value();
        Self {
            state,
            clock,
            input: TickInput::default(),
            best,
            store,
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.state.set_difficulty(difficulty);
    }

    /// Queue a round start for the next frame
    pub fn start(&mut self) {
        self.input.start = true;
        self.clock.restart();
    }

    /// Queue a return to Idle for the next frame
    pub fn reset(&mut self) {
        self.input.reset = true;
    }

    /// Queue a shot for the next frame
    pub fn fire(&mut self) {
        self.input.fire = true;
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.input.pointer = Some(pos);
    }

    pub fn set_left(&mut self, held: bool) {
        self.input.left = held;
    }

    pub fn set_right(&mut self, held: bool) {
        self.input.right = held;
    }

    pub fn set_idle_mode(&mut self, on: bool) {
        self.input.idle_mode = on;
    }

    /// Wipe the stored best score
    pub fn clear_best(&mut self) {
        self.best.clear(&mut self.store);
        // A running round keeps best >= score
        self.state.best = if self.state.is_running() {
            self.state.score
        } else {
            0
        };
    }

    pub fn best(&self) -> u64 {
        self.best.value()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    /// Advance one display frame at wall-clock time `now_ms`
    pub fn frame(&mut self, now_ms: f64, sink: &mut dyn EffectsSink) {
        let dt = self.clock.tick(now_ms);
        tick(&mut self.state, &self.input, dt);

        // One-shot inputs are consumed by the frame
        self.input.fire = false;
        self.input.start = false;
        self.input.reset = false;
        self.input.pointer = None;

        for event in self.state.drain_events() {
            sink.emit(event);
        }

        if self.state.best > self.best.value() {
            self.best.submit(&mut self.store, self.state.best);
        }
    }
}
