//! Game state and match state machine
//!
//! `GameState` is the single owned source of truth for a match. Everything the
//! renderer sees is copied out of it through `snapshot()`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{CanvasBounds, Layout};
use super::snapshot::Snapshot;
use crate::settings::Rules;

/// One of the two competitors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

/// Outcome of a finished match, from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Lose,
}

/// Current screen of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    /// Title screen, nothing simulated yet
    Start,
    /// Active gameplay
    Playing,
    /// Frozen mid-match
    Paused,
    /// Someone reached the win score
    Ended { winner: Side },
}

impl MatchState {
    pub fn result(&self) -> Option<MatchResult> {
        match self {
            MatchState::Ended { winner: Side::Player } => Some(MatchResult::Win),
            MatchState::Ended { winner: Side::Ai } => Some(MatchResult::Lose),
            _ => None,
        }
    }
}

/// The ball, in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    /// A ball at the canvas center moving with the serve velocity
    pub fn served(bounds: CanvasBounds, layout: &Layout, rules: &Rules) -> Self {
        Self {
            pos: bounds.center(),
            vel: layout.orientation.to_screen(rules.serve_velocity),
        }
    }
}

/// A paddle; only its offset along the paddle axis moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: f32,
}

impl Paddle {
    /// Center of the paddle on its axis
    #[inline]
    pub fn center(&self, length: f32) -> f32 {
        self.pos + length / 2.0
    }
}

/// Points scored this match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub ai: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Ai => self.ai,
        }
    }

    /// Add one point for `side`, returning its new total
    pub fn award(&mut self, side: Side) -> u32 {
        let slot = match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        };
        *slot = slot.saturating_add(1);
        *slot
    }
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone)]
pub struct GameState {
    pub rules: Rules,
    pub bounds: CanvasBounds,
    pub layout: Layout,
    pub ball: Ball,
    pub player: Paddle,
    pub ai: Paddle,
    pub score: Score,
    pub phase: MatchState,
    /// Ticks simulated this match
    pub time_ticks: u64,
}

impl GameState {
    /// Create a match sitting on the start screen
    pub fn new(rules: Rules, bounds: CanvasBounds) -> Self {
        let layout = Layout::new(bounds, rules.orientation);
        let center = layout.centered_paddle();
        Self {
            ball: Ball::served(bounds, &layout, &rules),
            player: Paddle { pos: center },
            ai: Paddle { pos: center },
            score: Score::default(),
            phase: MatchState::Start,
            time_ticks: 0,
            rules,
            bounds,
            layout,
        }
    }

    /// Put the ball back at the center with the serve velocity
    pub fn serve_ball(&mut self) {
        self.ball = Ball::served(self.bounds, &self.layout, &self.rules);
    }

    /// Fresh score, centered paddles and ball, playing
    fn reset_match(&mut self) {
        let center = self.layout.centered_paddle();
        self.score = Score::default();
        self.player.pos = center;
        self.ai.pos = center;
        self.time_ticks = 0;
        self.serve_ball();
        self.phase = MatchState::Playing;
    }

    /// Start a match from the title or end screen
    pub fn start_game(&mut self) -> bool {
        match self.phase {
            MatchState::Start | MatchState::Ended { .. } => {
                self.reset_match();
                log::info!(
                    "Match started ({} paddles, first to {})",
                    self.rules.orientation.as_str(),
                    self.rules.win_score
                );
                true
            }
            phase => {
                log::debug!("start_game ignored in {:?}", phase);
                false
            }
        }
    }

    /// Throw away the current match and play a new one
    pub fn restart(&mut self) -> bool {
        match self.phase {
            MatchState::Playing | MatchState::Paused | MatchState::Ended { .. } => {
                self.reset_match();
                log::info!("Match restarted");
                true
            }
            MatchState::Start => {
                log::debug!("restart ignored on the start screen");
                false
            }
        }
    }

    /// Leave a finished or paused match for the title screen
    pub fn return_to_menu(&mut self) -> bool {
        match self.phase {
            MatchState::Ended { .. } | MatchState::Paused => {
                *self = Self::new(self.rules.clone(), self.bounds);
                true
            }
            phase => {
                log::debug!("return_to_menu ignored in {:?}", phase);
                false
            }
        }
    }

    /// Playing <-> Paused
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            MatchState::Playing => MatchState::Paused,
            MatchState::Paused => MatchState::Playing,
            phase => {
                log::debug!("toggle_pause ignored in {:?}", phase);
                return false;
            }
        };
        true
    }

    /// Nudge the player paddle by a signed offset, clamped to the field
    pub fn move_player(&mut self, delta: f32) -> bool {
        if self.phase != MatchState::Playing {
            return false;
        }
        let delta = if delta.is_nan() { 0.0 } else { delta };
        self.player.pos = self.layout.clamp_paddle(self.player.pos + delta);
        true
    }

    /// React to a viewport change: new bounds, new sizes, everything re-clamped
    pub fn resize(&mut self, width: f32, height: f32) {
        let orientation = self.rules.orientation;
        let bounds = CanvasBounds::new(width, height);
        let layout = Layout::new(bounds, orientation);

        self.bounds = bounds;
        self.layout = layout;
        self.player.pos = layout.clamp_paddle(self.player.pos);
        self.ai.pos = layout.clamp_paddle(self.ai.pos);

        let lane_pos = layout.clamp_ball(orientation.to_lane(self.ball.pos));
        self.ball.pos = orientation.to_screen(lane_pos);

        log::info!("Canvas resized to {}x{}", bounds.width, bounds.height);
    }

    /// Credit a point and end the match if it reached the win score.
    ///
    /// Returns the winner when this point finished the match.
    pub fn record_point(&mut self, scorer: Side) -> Option<Side> {
        if self.phase != MatchState::Playing {
            return None;
        }

        let total = self.score.award(scorer);
        log::info!(
            "Point to {:?} ({} - {})",
            scorer,
            self.score.player,
            self.score.ai
        );

        if total >= self.rules.win_score {
            self.phase = MatchState::Ended { winner: scorer };
            log::info!(
                "Match over: {:?} wins {} - {}",
                scorer,
                self.score.player,
                self.score.ai
            );
            Some(scorer)
        } else {
            None
        }
    }

    /// Immutable view for this frame's renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bounds: self.bounds,
            orientation: self.layout.orientation,
            ball: self.ball,
            ball_radius: self.layout.ball_radius,
            player_paddle: self.layout.player_rect(self.player.pos),
            ai_paddle: self.layout.ai_rect(self.ai.pos),
            score: self.score,
            match_state: self.phase,
            win_score: self.rules.win_score,
        }
    }
}
