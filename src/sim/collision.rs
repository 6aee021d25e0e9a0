//! Collision detection and response for the rectangular field
//!
//! Everything here works in lane space (see `geometry`): `x` runs along the
//! paddles, `y` runs from the AI's edge (0) to the player's edge (`across`).
//! Only axis-aligned reflection, no spin and no speed changes.

use glam::Vec2;

use super::geometry::{Layout, in_span};
use super::state::Side;

/// A paddle returned the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleHit {
    pub side: Side,
    /// How far the ball was pushed back out of the paddle
    pub penetration: f32,
}

/// Explicit Euler step, one tick, no dt scaling
#[inline]
pub fn integrate(pos: &mut Vec2, vel: Vec2) {
    *pos += vel;
}

/// Bounce off the side walls that run parallel to the attack axis.
///
/// The ball is clamped back onto the wall and its velocity points away from it.
/// Returns true if a wall was hit.
pub fn reflect_walls(pos: &mut Vec2, vel: &mut Vec2, radius: f32, along: f32) -> bool {
    if pos.x - radius < 0.0 {
        pos.x = radius;
        vel.x = vel.x.abs();
        true
    } else if pos.x + radius > along {
        pos.x = along - radius;
        vel.x = -vel.x.abs();
        true
    } else {
        false
    }
}

/// Check both paddles. On a hit the ball is placed just outside the paddle face
/// (so it cannot tunnel or stick) and sent back toward the other side.
pub fn paddle_collision(
    pos: &mut Vec2,
    vel: &mut Vec2,
    layout: &Layout,
    ai_pos: f32,
    player_pos: f32,
) -> Option<PaddleHit> {
    let r = layout.ball_radius;
    let t = layout.paddle_thickness;
    let len = layout.paddle_length;

    // AI paddle face at y = t
    if pos.y - r < t && in_span(pos.x, ai_pos, len) {
        let penetration = t - (pos.y - r);
        vel.y = vel.y.abs();
        pos.y = t + r;
        return Some(PaddleHit {
            side: Side::Ai,
            penetration,
        });
    }

    // Player paddle face at y = across - t
    let face = layout.across - t;
    if pos.y + r > face && in_span(pos.x, player_pos, len) {
        let penetration = pos.y + r - face;
        vel.y = -vel.y.abs();
        pos.y = face - r;
        return Some(PaddleHit {
            side: Side::Player,
            penetration,
        });
    }

    None
}

/// Did the ball leave through an end line? Returns who scored.
pub fn detect_exit(pos: Vec2, radius: f32, across: f32) -> Option<Side> {
    if pos.y + radius > across {
        // Got past the player
        Some(Side::Ai)
    } else if pos.y - radius < 0.0 {
        Some(Side::Player)
    } else {
        None
    }
}
