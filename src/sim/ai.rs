//! Opponent paddle controller
//!
//! A proportional controller with a dead zone: the AI reacts to where the ball
//! is right now, never to where it is heading.

use super::geometry::Layout;
use crate::settings::Rules;

/// Step a paddle toward `target` along its axis.
///
/// Moves by `speed` when the paddle center trails or leads the target by more
/// than `dead_zone`, otherwise holds. The result is clamped to `[0, max]`.
pub fn pursue(pos: f32, length: f32, target: f32, dead_zone: f32, speed: f32, max: f32) -> f32 {
    let center = pos + length / 2.0;
    let next = if center < target - dead_zone {
        pos + speed
    } else if center > target + dead_zone {
        pos - speed
    } else {
        pos
    };
    next.clamp(0.0, max.max(0.0))
}

/// Next AI paddle position given the ball's coordinate along the paddle axis
pub fn track(pos: f32, ball_along: f32, layout: &Layout, rules: &Rules) -> f32 {
    pursue(
        pos,
        layout.paddle_length,
        ball_along,
        rules.ai_dead_zone,
        rules.ai_speed,
        layout.paddle_max(),
    )
}
