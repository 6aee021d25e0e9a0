//! Fixed-step simulation tick
//!
//! Core game loop that advances the match deterministically. Input arrives as
//! `Command`s applied between ticks, never in the middle of one.

use super::ai;
use super::collision::{self, PaddleHit};
use super::state::{GameState, MatchState, Side};

/// A request from the input layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Nudge the player paddle by a signed offset along its axis
    MovePlayer(f32),
    TogglePause,
    StartGame,
    Restart,
    ReturnToMenu,
    /// Viewport changed; new canvas size in pixels
    Resize { width: f32, height: f32 },
}

/// Apply one input command. Returns whether it changed anything.
pub fn apply_command(state: &mut GameState, command: Command) -> bool {
    match command {
        Command::MovePlayer(delta) => state.move_player(delta),
        Command::TogglePause => state.toggle_pause(),
        Command::StartGame => state.start_game(),
        Command::Restart => state.restart(),
        Command::ReturnToMenu => state.return_to_menu(),
        Command::Resize { width, height } => {
            state.resize(width, height);
            true
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// False when the match was not playing and nothing moved
    pub ticked: bool,
    pub wall_bounce: bool,
    pub paddle_hit: Option<PaddleHit>,
    /// Who scored, if the ball left the field
    pub scored: Option<Side>,
    /// Winner, if this tick ended the match
    pub finished: Option<Side>,
}

/// Advance the match by one fixed step
pub fn tick(state: &mut GameState) -> TickReport {
    let mut report = TickReport::default();

    // Only a live match moves
    if state.phase != MatchState::Playing {
        return report;
    }
    report.ticked = true;
    state.time_ticks += 1;

    let layout = state.layout;
    let lane = layout.orientation;
    let mut pos = lane.to_lane(state.ball.pos);
    let mut vel = lane.to_lane(state.ball.vel);

    collision::integrate(&mut pos, vel);
    report.wall_bounce =
        collision::reflect_walls(&mut pos, &mut vel, layout.ball_radius, layout.along);

    // AI reacts to the ball's new position before the paddle checks
    state.ai.pos = ai::track(state.ai.pos, pos.x, &layout, &state.rules);

    report.paddle_hit =
        collision::paddle_collision(&mut pos, &mut vel, &layout, state.ai.pos, state.player.pos);

    if report.paddle_hit.is_none() {
        report.scored = collision::detect_exit(pos, layout.ball_radius, layout.across);
    }

    match report.scored {
        Some(scorer) => {
            state.serve_ball();
            report.finished = state.record_point(scorer);
        }
        None => {
            state.ball.pos = lane.to_screen(pos);
            state.ball.vel = lane.to_screen(vel);
        }
    }

    report
}
