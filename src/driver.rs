//! Frame driver
//!
//! Decouples simulation from presentation. The host calls `Session::frame` once
//! per display refresh; the session applies queued input, runs as many fixed
//! ticks as the elapsed time allows and hands the renderer a snapshot.
//!
//! Each armed loop gets a generation number. Stopping or re-arming the session
//! bumps it, so a frame callback left over from an old loop is recognized and
//! does nothing.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::settings::Rules;
use crate::sim::{CanvasBounds, Command, GameState, Snapshot, apply_command, tick};

/// Anything that can draw a frame
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot);
}

/// Outcome of a frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Frame was simulated and rendered; schedule the next one
    Continue,
    /// Callback belongs to a stopped or replaced loop; do not reschedule
    Stale,
}

/// Fixed timestep accumulator: wall-clock frame times in, whole ticks out
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
    last_time: Option<f64>,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget timing history (the next frame runs exactly one tick)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    /// Number of ticks to run for a frame at `now_ms`
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (((now_ms - last) / 1000.0) as f32)
                .max(0.0)
                .min(MAX_FRAME_DT),
            None => SIM_DT,
        };
        self.last_time = Some(now_ms);
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = 0.0;
        }
        ticks
    }
}

/// A running game: owns the only `GameState` and the input queue
#[derive(Debug)]
pub struct Session {
    state: GameState,
    pending: Vec<Command>,
    step: FixedStep,
    generation: u64,
    running: bool,
}

impl Session {
    pub fn new(rules: Rules, bounds: CanvasBounds) -> Self {
        Self {
            state: GameState::new(rules, bounds),
            pending: Vec::new(),
            step: FixedStep::new(),
            generation: 0,
            running: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Queue input; it is applied at the start of the next frame
    pub fn push(&mut self, command: Command) {
        self.pending.push(command);
    }

    /// Begin a new frame loop, invalidating any previous one.
    /// Returns the generation the loop's callbacks must present.
    pub fn arm(&mut self) -> u64 {
        self.generation += 1;
        self.running = true;
        self.step.reset();
        log::debug!("Frame loop armed (generation {})", self.generation);
        self.generation
    }

    /// Stop the loop; outstanding callbacks become stale
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Frame loop stopped (generation {})", self.generation);
        }
        self.generation += 1;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.running && generation == self.generation
    }

    /// Run one display frame
    pub fn frame<R: Renderer + ?Sized>(
        &mut self,
        generation: u64,
        now_ms: f64,
        renderer: &mut R,
    ) -> FrameStatus {
        if !self.is_current(generation) {
            log::debug!("Dropping stale frame (generation {})", generation);
            return FrameStatus::Stale;
        }

        for command in self.pending.drain(..) {
            apply_command(&mut self.state, command);
        }

        let ticks = self.step.advance(now_ms);
        for _ in 0..ticks {
            if tick(&mut self.state).finished.is_some() {
                break;
            }
        }

        renderer.render(&self.state.snapshot());
        FrameStatus::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MatchState;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Snapshot>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, snapshot: &Snapshot) {
            self.frames.push(snapshot.clone());
        }
    }

    fn session() -> Session {
        Session::new(Rules::default(), CanvasBounds::new(420.0, 600.0))
    }

    #[test]
    fn test_first_frame_runs_one_tick() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance(1234.0), 1);
    }

    #[test]
    fn test_steady_frames_average_one_tick() {
        let mut step = FixedStep::new();
        let mut total = 0;
        for i in 0..120 {
            total += step.advance(i as f64 * FRAME_MS);
        }
        assert!((119..=121).contains(&total), "ran {} ticks", total);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut step = FixedStep::new();
        step.advance(0.0);
        let ticks = step.advance(5_000.0);
        assert!(ticks > 0 && ticks <= MAX_SUBSTEPS);
        // Backlog is not carried into the next frame
        assert!(step.advance(5_000.0 + FRAME_MS) <= 2);
    }

    #[test]
    fn test_time_going_backwards() {
        let mut step = FixedStep::new();
        step.advance(1000.0);
        assert_eq!(step.advance(500.0), 0);
        assert_eq!(step.advance(f64::NAN), 0);
    }

    #[test]
    fn test_frame_applies_input_then_renders() {
        let mut session = session();
        let mut recorder = Recorder::default();
        let generation = session.arm();

        session.push(Command::StartGame);
        let status = session.frame(generation, 0.0, &mut recorder);

        assert_eq!(status, FrameStatus::Continue);
        assert_eq!(recorder.frames.len(), 1);
        assert_eq!(recorder.frames[0].match_state, MatchState::Playing);
        assert_eq!(session.state().time_ticks, 1);
    }

    #[test]
    fn test_stale_generation_does_nothing() {
        let mut session = session();
        let mut recorder = Recorder::default();
        let old = session.arm();
        session.push(Command::StartGame);
        session.frame(old, 0.0, &mut recorder);

        let new = session.arm();
        let ticks_before = session.state().time_ticks;
        let ball_before = session.state().ball;

        assert_eq!(session.frame(old, FRAME_MS, &mut recorder), FrameStatus::Stale);
        assert_eq!(session.state().time_ticks, ticks_before);
        assert_eq!(session.state().ball, ball_before);
        assert_eq!(recorder.frames.len(), 1);

        assert_eq!(session.frame(new, FRAME_MS, &mut recorder), FrameStatus::Continue);
    }

    #[test]
    fn test_stop_cancels_loop() {
        let mut session = session();
        let mut recorder = Recorder::default();
        let generation = session.arm();
        session.stop();

        assert!(!session.is_running());
        assert_eq!(
            session.frame(generation, 0.0, &mut recorder),
            FrameStatus::Stale
        );
        assert!(recorder.frames.is_empty());
    }

    #[test]
    fn test_rearm_after_stop_applies_queued_input() {
        let mut session = session();
        let mut recorder = Recorder::default();
        let old = session.arm();
        session.frame(old, 0.0, &mut recorder);
        session.stop();

        // Input that arrives while stopped waits in the queue
        session.push(Command::StartGame);
        assert_eq!(session.frame(old, FRAME_MS, &mut recorder), FrameStatus::Stale);
        assert_eq!(session.state().phase, MatchState::Start);

        let new = session.arm();
        assert_ne!(new, old);
        assert!(session.is_running());
        assert_eq!(
            session.frame(new, 2.0 * FRAME_MS, &mut recorder),
            FrameStatus::Continue
        );
        assert_eq!(session.state().phase, MatchState::Playing);
        assert_eq!(session.state().time_ticks, 1);
        assert_eq!(
            recorder.frames.last().map(|s| s.match_state),
            Some(MatchState::Playing)
        );
    }

    #[test]
    fn test_paused_frames_render_without_ticking() {
        let mut session = session();
        let mut recorder = Recorder::default();
        let generation = session.arm();
        session.push(Command::StartGame);
        session.frame(generation, 0.0, &mut recorder);

        session.push(Command::TogglePause);
        let ticks = session.state().time_ticks;
        for i in 1..10 {
            session.frame(generation, i as f64 * FRAME_MS, &mut recorder);
        }
        assert_eq!(session.state().time_ticks, ticks);
        assert_eq!(recorder.frames.len(), 10);
        assert_eq!(
            recorder.frames.last().map(|s| s.match_state),
            Some(MatchState::Paused)
        );
    }
}
