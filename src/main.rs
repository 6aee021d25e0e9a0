//! Pocket Pong entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, Window};

    use pocket_pong::sim::{CanvasBounds, Command, MatchResult, MatchState, Orientation, Snapshot};
    use pocket_pong::{FrameStatus, Renderer, Rules, Session};

    const PLAYER_COLOR: &str = "#00ff99";
    const AI_COLOR: &str = "#ff0055";
    const BALL_COLOR: &str = "white";
    const FIELD_COLOR: &str = "black";
    const TEXT_COLOR: &str = "#ffffff";

    /// Draws snapshots on a 2D canvas and mirrors score/screens into the DOM
    struct CanvasRenderer {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        document: Document,
        last_state: Option<MatchState>,
    }

    impl CanvasRenderer {
        fn draw(&self, snap: &Snapshot) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let w = snap.bounds.width as f64;
            let h = snap.bounds.height as f64;

            ctx.set_fill_style_str(FIELD_COLOR);
            ctx.fill_rect(0.0, 0.0, w, h);

            if snap.match_state == MatchState::Start {
                self.banner(snap, "PONG", PLAYER_COLOR)?;
                return self.caption(
                    snap,
                    &format!("First to {} points wins", snap.win_score),
                );
            }

            for (rect, color) in [(snap.ai_paddle, AI_COLOR), (snap.player_paddle, PLAYER_COLOR)] {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            }

            ctx.set_fill_style_str(BALL_COLOR);
            ctx.begin_path();
            ctx.arc(
                snap.ball.pos.x as f64,
                snap.ball.pos.y as f64,
                snap.ball_radius as f64,
                0.0,
                TAU,
            )?;
            ctx.fill();

            match snap.match_state.result() {
                Some(MatchResult::Win) => self.banner(snap, "You win!", PLAYER_COLOR)?,
                Some(MatchResult::Lose) => self.banner(snap, "You lose!", AI_COLOR)?,
                None if snap.match_state == MatchState::Paused => {
                    self.banner(snap, "Paused", TEXT_COLOR)?
                }
                None => {}
            }
            Ok(())
        }

        fn banner(&self, snap: &Snapshot, text: &str, color: &str) -> Result<(), JsValue> {
            let size = (snap.bounds.width as f64 * 0.12).clamp(20.0, 48.0);
            self.ctx.set_font(&format!("bold {}px monospace", size));
            self.ctx.set_text_align("center");
            self.ctx.set_fill_style_str(color);
            self.ctx.fill_text(
                text,
                snap.bounds.width as f64 / 2.0,
                snap.bounds.height as f64 * 0.4,
            )
        }

        fn caption(&self, snap: &Snapshot, text: &str) -> Result<(), JsValue> {
            self.ctx.set_font("16px monospace");
            self.ctx.set_text_align("center");
            self.ctx.set_fill_style_str(TEXT_COLOR);
            self.ctx.fill_text(
                text,
                snap.bounds.width as f64 / 2.0,
                snap.bounds.height as f64 * 0.55,
            )
        }

        fn show(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, snap: &Snapshot) {
            self.set_text("score-player", &snap.score.player.to_string());
            self.set_text("score-ai", &snap.score.ai.to_string());

            if self.last_state == Some(snap.match_state) {
                return;
            }
            self.last_state = Some(snap.match_state);

            let state = snap.match_state;
            self.show("start-screen", state == MatchState::Start);
            self.show(
                "game-controls",
                matches!(state, MatchState::Playing | MatchState::Paused),
            );
            self.show("end-screen", matches!(state, MatchState::Ended { .. }));
            self.set_text(
                "pause-btn",
                if state == MatchState::Paused { "▶ Play" } else { "⏸ Pause" },
            );
            if let Some(result) = state.result() {
                let text = match result {
                    MatchResult::Win => "You win!",
                    MatchResult::Lose => "You lose!",
                };
                self.set_text("result-text", text);
                self.set_text(
                    "final-score",
                    &format!("{} - {}", snap.score.player, snap.score.ai),
                );
            }
        }
    }

    impl Renderer for CanvasRenderer {
        fn render(&mut self, snapshot: &Snapshot) {
            let w = snapshot.bounds.width as u32;
            let h = snapshot.bounds.height as u32;
            if self.canvas.width() != w || self.canvas.height() != h {
                self.canvas.set_width(w);
                self.canvas.set_height(h);
            }
            if let Err(e) = self.draw(snapshot) {
                log::warn!("Render error: {:?}", e);
            }
            self.update_hud(snapshot);
        }
    }

    /// Game instance holding all state
    struct App {
        session: Session,
        renderer: CanvasRenderer,
        /// Pending requestAnimationFrame handle
        frame_handle: Option<i32>,
    }

    fn viewport_bounds(window: &Window) -> CanvasBounds {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        CanvasBounds::fit_viewport(w as f32, h as f32)
    }

    /// `?rules=landscape&orientation=horizontal` picks the rules
    fn rules_from_location(window: &Window) -> Rules {
        Rules::from_query(&window.location().search().unwrap_or_default())
    }

    /// Boot the browser front end.
    ///
    /// The host page must provide a `<canvas id="canvas">`. These elements are
    /// wired up when present (missing ones are skipped):
    /// - buttons `start-btn`, `restart-btn`, `menu-btn`, `pause-btn`, `left-btn`, `right-btn`
    /// - score text `score-player`, `score-ai`
    /// - screens `start-screen`, `game-controls`, `end-screen` (toggled with the `hidden` class)
    /// - end-screen text `result-text`, `final-score`
    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&format!("Failed to init logger: {}", e)))?;

        log::info!("Pocket Pong starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let rules = rules_from_location(&window);
        let bounds = viewport_bounds(&window);
        let app = Rc::new(RefCell::new(App {
            session: Session::new(rules, bounds),
            renderer: CanvasRenderer {
                canvas,
                ctx,
                document: document.clone(),
                last_state: None,
            },
            frame_handle: None,
        }));

        setup_buttons(&document, app.clone());
        setup_keyboard(&window, app.clone())?;
        setup_resize(&window, app.clone())?;
        setup_auto_pause(&window, &document, app.clone())?;
        setup_teardown(&window, app.clone())?;

        start_loop(&app);

        log::info!("Pocket Pong running!");
        Ok(())
    }

    fn start_loop(app: &Rc<RefCell<App>>) {
        let generation = {
            let mut a = app.borrow_mut();
            cancel_pending_frame(&mut a);
            a.session.arm()
        };
        request_animation_frame(app.clone(), generation);
    }

    fn stop_loop(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        cancel_pending_frame(&mut a);
        a.session.stop();
    }

    fn cancel_pending_frame(app: &mut App) {
        if let Some(handle) = app.frame_handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>, generation: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback_app = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(callback_app, generation, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => app.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, generation: u64, time: f64) {
        let status = {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            a.frame_handle = None;
            a.session.frame(generation, time, &mut a.renderer)
        };

        if status == FrameStatus::Continue {
            request_animation_frame(app, generation);
        }
    }

    fn on_click<F>(document: &Document, id: &str, app: Rc<RefCell<App>>, handler: F)
    where
        F: Fn(&Rc<RefCell<App>>) + 'static,
    {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Button #{} not found", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            handler(&app);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn nudge(app: &Rc<RefCell<App>>, direction: f32) {
        let mut a = app.borrow_mut();
        let step = a.session.state().layout.nudge_step;
        a.session.push(Command::MovePlayer(direction * step));
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        on_click(document, "start-btn", app.clone(), |app| {
            app.borrow_mut().session.push(Command::StartGame);
        });
        on_click(document, "restart-btn", app.clone(), |app| {
            app.borrow_mut().session.push(Command::Restart);
            // Fresh loop; the old pending frame is cancelled
            start_loop(app);
        });
        on_click(document, "menu-btn", app.clone(), |app| {
            app.borrow_mut().session.push(Command::ReturnToMenu);
        });
        on_click(document, "pause-btn", app.clone(), |app| {
            app.borrow_mut().session.push(Command::TogglePause);
        });
        on_click(document, "left-btn", app.clone(), |app| nudge(app, -1.0));
        on_click(document, "right-btn", app, |app| nudge(app, 1.0));
    }

    fn setup_keyboard(window: &Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let orientation = app.borrow().session.state().rules.orientation;
            let key = event.key();
            let direction = match (orientation, key.as_str()) {
                (Orientation::Horizontal, "ArrowLeft") | (Orientation::Vertical, "ArrowUp") => {
                    Some(-1.0)
                }
                (Orientation::Horizontal, "ArrowRight")
                | (Orientation::Vertical, "ArrowDown") => Some(1.0),
                _ => None,
            };
            if let Some(direction) = direction {
                event.prevent_default();
                nudge(&app, direction);
                return;
            }

            let command = match key.as_str() {
                " " | "Escape" => Some(Command::TogglePause),
                "Enter" => Some(Command::StartGame),
                _ => None,
            };
            if let Some(command) = command {
                event.prevent_default();
                app.borrow_mut().session.push(command);
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_resize(window: &Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let bounds = viewport_bounds(&window);
            app.borrow_mut().session.push(Command::Resize {
                width: bounds.width,
                height: bounds.height,
            });
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_auto_pause(
        window: &Window,
        document: &Document,
        app: Rc<RefCell<App>>,
    ) -> Result<(), JsValue> {
        fn pause_if_playing(app: &Rc<RefCell<App>>, reason: &str) {
            let mut a = app.borrow_mut();
            if a.session.state().phase == MatchState::Playing {
                a.session.push(Command::TogglePause);
                log::info!("Auto-paused ({})", reason);
            }
        }

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    pause_if_playing(&app, "tab hidden");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                pause_if_playing(&app, "window blur");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Navigating away must not leave a frame callback mutating a dead match.
    /// A page restored from the back/forward cache gets a fresh loop.
    fn setup_teardown(window: &Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                stop_loop(&app);
                log::info!("Frame loop stopped (page hidden)");
            });
            window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if !app.borrow().session.is_running() {
                start_loop(&app);
                log::info!("Frame loop restarted (page shown)");
            }
        });
        window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pocket Pong (native) starting...");
    log::info!("Native mode plays a headless autopilot match");

    let preset = std::env::args().nth(1);
    let rules = pocket_pong::Rules::load(preset.as_deref(), None);
    headless::run(rules);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use pocket_pong::sim::{CanvasBounds, Command, MatchResult, Orientation, Snapshot, ai};
    use pocket_pong::{Renderer, Rules, Session};

    /// Ten minutes of 60 Hz frames
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// The autopilot is a little slower and sloppier than the AI
    const AUTOPILOT_SPEED: f32 = 3.0;
    const AUTOPILOT_DEAD_ZONE: f32 = 25.0;

    #[derive(Default)]
    struct LastFrame {
        snapshot: Option<Snapshot>,
        frames: u32,
    }

    impl Renderer for LastFrame {
        fn render(&mut self, snapshot: &Snapshot) {
            self.snapshot = Some(snapshot.clone());
            self.frames += 1;
        }
    }

    pub fn run(rules: Rules) {
        let bounds = match rules.orientation {
            Orientation::Horizontal => CanvasBounds::new(420.0, 600.0),
            Orientation::Vertical => CanvasBounds::new(600.0, 420.0),
        };
        let mut session = Session::new(rules, bounds);
        let mut screen = LastFrame::default();
        let generation = session.arm();
        session.push(Command::StartGame);

        for frame in 0..MAX_FRAMES {
            // Steer the player paddle with the same pursuit rule the AI uses
            let state = session.state();
            let layout = state.layout;
            let ball_along = layout.orientation.to_lane(state.ball.pos).x;
            let target = ai::pursue(
                state.player.pos,
                layout.paddle_length,
                ball_along,
                AUTOPILOT_DEAD_ZONE,
                AUTOPILOT_SPEED,
                layout.paddle_max(),
            );
            let delta = target - state.player.pos;
            if delta != 0.0 {
                session.push(Command::MovePlayer(delta));
            }

            session.frame(generation, frame as f64 * FRAME_MS, &mut screen);

            let result = screen
                .snapshot
                .as_ref()
                .and_then(|s| s.match_state.result().map(|r| (r, s.score)));
            if let Some((result, score)) = result {
                let verdict = match result {
                    MatchResult::Win => "Autopilot wins",
                    MatchResult::Lose => "AI wins",
                };
                println!(
                    "{} {} - {} after {} frames",
                    verdict, score.player, score.ai, screen.frames
                );
                session.stop();
                return;
            }
        }

        session.stop();
        if let Some(s) = screen.snapshot {
            println!(
                "No winner after {} frames ({} - {})",
                screen.frames, s.score.player, s.score.ai
            );
        }
    }
}
