//! Pocket Pong - a responsive browser Pong match against a reactive AI paddle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, AI paddle, match state machine)
//! - `settings`: Rule presets and configuration loading
//! - `driver`: Fixed-rate frame driver feeding a renderer

pub mod driver;
pub mod settings;
pub mod sim;

pub use driver::{FixedStep, FrameStatus, Renderer, Session};
pub use settings::{Rules, RulesPreset};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Canvas extent limits (pixels)
    pub const MIN_CANVAS_EXTENT: f32 = 80.0;
    pub const MAX_CANVAS_EXTENT: f32 = 16384.0;

    /// Paddle length as a fraction of the paddle axis, with a floor
    pub const PADDLE_LENGTH_RATIO: f32 = 0.2;
    pub const PADDLE_MIN_LENGTH: f32 = 60.0;
    /// Paddle thickness as a fraction of the attack axis, with a floor
    pub const PADDLE_THICKNESS_RATIO: f32 = 0.015;
    pub const PADDLE_MIN_THICKNESS: f32 = 10.0;

    /// Ball radius as a fraction of the paddle axis, with a floor
    pub const BALL_RADIUS_RATIO: f32 = 0.025;
    pub const BALL_MIN_RADIUS: f32 = 8.0;

    /// One button press moves the player paddle by this fraction of the paddle axis
    pub const NUDGE_RATIO: f32 = 0.15;

    /// AI paddle speed (pixels per tick)
    pub const AI_SPEED: f32 = 4.0;

    /// Viewport fitting: narrower viewports are treated as phones
    pub const MOBILE_BREAKPOINT: f32 = 600.0;
    pub const MOBILE_HEIGHT_RATIO: f32 = 0.8;
    pub const DESKTOP_WIDTH_RATIO: f32 = 0.95;
    pub const DESKTOP_MAX_WIDTH: f32 = 420.0;
    pub const DESKTOP_HEIGHT_RATIO: f32 = 0.7;
    pub const DESKTOP_MAX_HEIGHT: f32 = 600.0;
}
