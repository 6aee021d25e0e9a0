//! Canvas geometry for the play field
//!
//! Physics runs in *lane space*: `x` is the axis the paddles slide along and `y`
//! is the axis the ball attacks on. The AI defends the low edge of the attack
//! axis (`y = 0`), the player the high edge. `Orientation` maps between lane
//! space and canvas (screen) space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which canvas edges the paddles sit on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Orientation {
    /// Paddles on the top (AI) and bottom (player) edges
    #[default]
    Horizontal,
    /// Paddles on the left (AI) and right (player) edges
    Vertical,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "horizontal" | "h" => Some(Orientation::Horizontal),
            "vertical" | "v" => Some(Orientation::Vertical),
            _ => None,
        }
    }

    /// Map a canvas-space vector into lane space
    #[inline]
    pub fn to_lane(self, v: Vec2) -> Vec2 {
        match self {
            Orientation::Horizontal => v,
            Orientation::Vertical => Vec2::new(v.y, v.x),
        }
    }

    /// Map a lane-space vector back to canvas space (the axis swap is its own inverse)
    #[inline]
    pub fn to_screen(self, v: Vec2) -> Vec2 {
        self.to_lane(v)
    }
}

/// Size of the play area in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub width: f32,
    pub height: f32,
}

impl CanvasBounds {
    /// Build bounds, clamping each extent into the supported range.
    /// Non-finite or negative input collapses to the minimum extent.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: clamp_extent(width),
            height: clamp_extent(height),
        }
    }

    /// Fit the canvas to a browser viewport: phones get the full width,
    /// desktops get a portrait-sized canvas.
    pub fn fit_viewport(viewport_width: f32, viewport_height: f32) -> Self {
        let vw = viewport_width.max(0.0);
        let vh = viewport_height.max(0.0);
        if vw < MOBILE_BREAKPOINT {
            Self::new(vw, vh * MOBILE_HEIGHT_RATIO)
        } else {
            Self::new(
                (vw * DESKTOP_WIDTH_RATIO).min(DESKTOP_MAX_WIDTH),
                (vh * DESKTOP_HEIGHT_RATIO).min(DESKTOP_MAX_HEIGHT),
            )
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }
}

fn clamp_extent(v: f32) -> f32 {
    // f32::max maps NaN to the other operand
    v.max(MIN_CANVAS_EXTENT).min(MAX_CANVAS_EXTENT)
}

/// Axis-aligned rectangle in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Half-open span test: `start <= value < start + len`
#[inline]
pub fn in_span(value: f32, start: f32, len: f32) -> bool {
    value >= start && value < start + len
}

/// Sizes derived from the canvas, expressed in lane space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub orientation: Orientation,
    /// Extent of the paddle axis
    pub along: f32,
    /// Extent of the attack axis
    pub across: f32,
    pub paddle_length: f32,
    pub paddle_thickness: f32,
    pub ball_radius: f32,
    /// Distance one button press moves the player paddle
    pub nudge_step: f32,
}

impl Layout {
    pub fn new(bounds: CanvasBounds, orientation: Orientation) -> Self {
        let extent = orientation.to_lane(bounds.size());
        let (along, across) = (extent.x, extent.y);

        Self {
            orientation,
            along,
            across,
            paddle_length: (along * PADDLE_LENGTH_RATIO)
                .max(PADDLE_MIN_LENGTH)
                .min(along),
            paddle_thickness: (across * PADDLE_THICKNESS_RATIO)
                .max(PADDLE_MIN_THICKNESS)
                .min(across / 8.0),
            ball_radius: (along * BALL_RADIUS_RATIO)
                .max(BALL_MIN_RADIUS)
                .min(along.min(across) / 4.0),
            nudge_step: along * NUDGE_RATIO,
        }
    }

    /// Largest valid paddle position
    #[inline]
    pub fn paddle_max(&self) -> f32 {
        (self.along - self.paddle_length).max(0.0)
    }

    /// Clamp a paddle position into `[0, paddle_max]`
    #[inline]
    pub fn clamp_paddle(&self, pos: f32) -> f32 {
        pos.clamp(0.0, self.paddle_max())
    }

    /// Paddle position that centers it on the paddle axis
    #[inline]
    pub fn centered_paddle(&self) -> f32 {
        self.paddle_max() / 2.0
    }

    /// Clamp a lane-space ball center so its edges stay inside the field
    pub fn clamp_ball(&self, pos: Vec2) -> Vec2 {
        let r = self.ball_radius;
        Vec2::new(
            pos.x.clamp(r, self.along - r),
            pos.y.clamp(r, self.across - r),
        )
    }

    /// Canvas rectangle of the AI paddle (low edge of the attack axis)
    pub fn ai_rect(&self, pos: f32) -> Rect {
        self.lane_rect(pos, 0.0)
    }

    /// Canvas rectangle of the player paddle (high edge of the attack axis)
    pub fn player_rect(&self, pos: f32) -> Rect {
        self.lane_rect(pos, self.across - self.paddle_thickness)
    }

    fn lane_rect(&self, along: f32, across: f32) -> Rect {
        let origin = self.orientation.to_screen(Vec2::new(along, across));
        let size = self
            .orientation
            .to_screen(Vec2::new(self.paddle_length, self.paddle_thickness));
        Rect {
            x: origin.x,
            y: origin.y,
            w: size.x,
            h: size.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_portrait_sizes() {
        let layout = Layout::new(CanvasBounds::new(420.0, 600.0), Orientation::Horizontal);
        assert_eq!(layout.along, 420.0);
        assert_eq!(layout.across, 600.0);
        assert!((layout.paddle_length - 84.0).abs() < 1e-4);
        assert!((layout.paddle_thickness - 10.0).abs() < 1e-4);
        assert!((layout.ball_radius - 10.5).abs() < 1e-4);
        assert!((layout.nudge_step - 63.0).abs() < 1e-4);
    }

    #[test]
    fn test_layout_floors_apply_on_small_canvas() {
        let layout = Layout::new(CanvasBounds::new(200.0, 300.0), Orientation::Horizontal);
        assert_eq!(layout.paddle_length, PADDLE_MIN_LENGTH);
        assert_eq!(layout.ball_radius, BALL_MIN_RADIUS);
    }

    #[test]
    fn test_vertical_swaps_axes() {
        let layout = Layout::new(CanvasBounds::new(800.0, 400.0), Orientation::Vertical);
        assert_eq!(layout.along, 400.0);
        assert_eq!(layout.across, 800.0);

        // AI on the left edge, player on the right edge, paddles standing up
        let ai = layout.ai_rect(10.0);
        assert_eq!(ai.x, 0.0);
        assert_eq!(ai.y, 10.0);
        assert!(ai.h > ai.w);

        let player = layout.player_rect(10.0);
        assert!((player.right() - 800.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounds_clamp_garbage() {
        let b = CanvasBounds::new(f32::NAN, -5.0);
        assert_eq!(b.width, MIN_CANVAS_EXTENT);
        assert_eq!(b.height, MIN_CANVAS_EXTENT);

        let b = CanvasBounds::new(f32::INFINITY, 500.0);
        assert_eq!(b.width, MAX_CANVAS_EXTENT);
        assert_eq!(b.height, 500.0);
    }

    #[test]
    fn test_fit_viewport() {
        // Phone: full width, 80% height
        let b = CanvasBounds::fit_viewport(390.0, 800.0);
        assert_eq!(b.width, 390.0);
        assert!((b.height - 640.0).abs() < 1e-3);

        // Desktop: capped portrait canvas
        let b = CanvasBounds::fit_viewport(1920.0, 1080.0);
        assert_eq!(b.width, DESKTOP_MAX_WIDTH);
        assert_eq!(b.height, DESKTOP_MAX_HEIGHT);
    }

    #[test]
    fn test_in_span_is_half_open() {
        assert!(in_span(10.0, 10.0, 5.0));
        assert!(in_span(14.9, 10.0, 5.0));
        assert!(!in_span(15.0, 10.0, 5.0));
        assert!(!in_span(9.99, 10.0, 5.0));
    }

    #[test]
    fn test_clamp_paddle() {
        let layout = Layout::new(CanvasBounds::new(420.0, 600.0), Orientation::Horizontal);
        assert_eq!(layout.clamp_paddle(-50.0), 0.0);
        assert_eq!(layout.clamp_paddle(1000.0), layout.paddle_max());
        assert!((layout.centered_paddle() - 168.0).abs() < 1e-4);
    }
}
