//! Per-frame render view

use serde::{Deserialize, Serialize};

use super::geometry::{CanvasBounds, Orientation, Rect};
use super::state::{Ball, MatchState, Score};

/// Immutable copy of everything a renderer needs for one frame.
/// Paddle rectangles are already in canvas space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub bounds: CanvasBounds,
    pub orientation: Orientation,
    pub ball: Ball,
    pub ball_radius: f32,
    pub player_paddle: Rect,
    pub ai_paddle: Rect,
    pub score: Score,
    pub match_state: MatchState,
    pub win_score: u32,
}
