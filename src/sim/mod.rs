//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step only (no delta-time scaling)
//! - No randomness
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod geometry;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::PaddleHit;
pub use geometry::{CanvasBounds, Layout, Orientation, Rect, in_span};
pub use snapshot::Snapshot;
pub use state::{Ball, GameState, MatchResult, MatchState, Paddle, Score, Side};
pub use tick::{Command, TickReport, apply_command, tick};
