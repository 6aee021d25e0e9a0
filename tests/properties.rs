//! Invariants that must hold for any sequence of input and ticks

use pocket_pong::sim::{CanvasBounds, Command, GameState, MatchState, apply_command, tick};
use pocket_pong::{Rules, RulesPreset};
use proptest::prelude::*;

const EPS: f32 = 1e-3;

#[derive(Debug, Clone)]
enum Op {
    Ticks(u16),
    Move(f32),
    Pause,
    Start,
    Restart,
    Menu,
    Resize(f32, f32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (1u16..400).prop_map(Op::Ticks),
        3 => (-800.0f32..800.0).prop_map(Op::Move),
        1 => Just(Op::Pause),
        1 => Just(Op::Start),
        1 => Just(Op::Restart),
        1 => Just(Op::Menu),
        2 => (0.0f32..2000.0, 0.0f32..2000.0).prop_map(|(w, h)| Op::Resize(w, h)),
    ]
}

fn preset() -> impl Strategy<Value = RulesPreset> {
    prop_oneof![Just(RulesPreset::Portrait), Just(RulesPreset::Landscape)]
}

fn command(op: &Op) -> Option<Command> {
    match *op {
        Op::Ticks(_) => None,
        Op::Move(delta) => Some(Command::MovePlayer(delta)),
        Op::Pause => Some(Command::TogglePause),
        Op::Start => Some(Command::StartGame),
        Op::Restart => Some(Command::Restart),
        Op::Menu => Some(Command::ReturnToMenu),
        Op::Resize(width, height) => Some(Command::Resize { width, height }),
    }
}

fn check_positions(state: &GameState) -> Result<(), TestCaseError> {
    let layout = state.layout;
    let max = layout.paddle_max();
    prop_assert!((0.0..=max).contains(&state.player.pos), "player at {}", state.player.pos);
    prop_assert!((0.0..=max).contains(&state.ai.pos), "ai at {}", state.ai.pos);

    let r = layout.ball_radius;
    let pos = state.ball.pos;
    prop_assert!(pos.x - r >= -EPS && pos.x + r <= state.bounds.width + EPS, "ball x {}", pos.x);
    prop_assert!(pos.y - r >= -EPS && pos.y + r <= state.bounds.height + EPS, "ball y {}", pos.y);
    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold(preset in preset(), ops in prop::collection::vec(op(), 1..60)) {
        let mut state = GameState::new(preset.rules(), CanvasBounds::new(420.0, 600.0));
        state.start_game();

        for op in &ops {
            if let Some(cmd) = command(op) {
                apply_command(&mut state, cmd);
                check_positions(&state)?;
                continue;
            }

            let Op::Ticks(n) = *op else { continue };
            for _ in 0..n {
                let before_score = state.score;
                let before_phase = state.phase;
                let before_ball = state.ball;

                let report = tick(&mut state);
                check_positions(&state)?;

                // Monotone, and at most one side scores per tick
                prop_assert!(state.score.player >= before_score.player);
                prop_assert!(state.score.ai >= before_score.ai);
                let gained = (state.score.player - before_score.player)
                    + (state.score.ai - before_score.ai);
                prop_assert!(gained <= 1);
                prop_assert_eq!(gained == 1, report.scored.is_some());

                // A scoring exit is immediately followed by a centered serve
                if report.scored.is_some() {
                    prop_assert_eq!(state.ball.pos, state.bounds.center());
                }

                // Nothing moves outside Playing
                if before_phase != MatchState::Playing {
                    prop_assert!(!report.ticked);
                    prop_assert_eq!(state.ball, before_ball);
                    prop_assert_eq!(state.phase, before_phase);
                }

                // Ended is entered exactly when the win score is reached
                if let MatchState::Ended { winner } = state.phase {
                    if before_phase == MatchState::Playing {
                        prop_assert_eq!(report.finished, Some(winner));
                        prop_assert_eq!(state.score.get(winner), state.rules.win_score);
                    }
                } else {
                    prop_assert!(report.finished.is_none());
                    prop_assert!(state.score.player < state.rules.win_score);
                    prop_assert!(state.score.ai < state.rules.win_score);
                }
            }
        }
    }

    #[test]
    fn move_player_never_leaves_field(deltas in prop::collection::vec(-5000.0f32..5000.0, 1..100)) {
        let mut state = GameState::new(Rules::default(), CanvasBounds::new(420.0, 600.0));
        state.start_game();
        for delta in deltas {
            state.move_player(delta);
            prop_assert!(state.player.pos >= 0.0);
            prop_assert!(state.player.pos <= state.layout.paddle_max());
        }
    }

    #[test]
    fn fitted_canvas_is_always_valid(w in -100.0f32..5000.0, h in -100.0f32..5000.0) {
        let bounds = CanvasBounds::fit_viewport(w, h);
        prop_assert!(bounds.width.is_finite() && bounds.width > 0.0);
        prop_assert!(bounds.height.is_finite() && bounds.height > 0.0);
    }
}
