//! Aero Dash entry point
//!
//! The browser shell: drives one simulation tick per animation frame,
//! translates keyboard/touch events into steer/jump input, blits the render
//! snapshot onto a 2D canvas and runs the game-over modal. On native there
//! is no window; `main` runs a scripted headless flight instead.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent,
        TouchEvent,
    };

    use aero_dash::Tuning;
    use aero_dash::consts::FALLBACK_VIEWPORT;
    use aero_dash::sim::{
        GameEvent, GameState, RenderSnapshot, SpriteKey, Steer, TickInput, Viewport, tick,
    };

    /// Images the shell blits. Loaded once at startup; the browser simply
    /// draws nothing for an image that has not finished loading yet.
    struct Sprites {
        background: HtmlImageElement,
        airplane: HtmlImageElement,
        obstacle: HtmlImageElement,
        explosion: HtmlImageElement,
    }

    impl Sprites {
        fn load() -> Self {
            let load_one = |src: &str| {
                let img = HtmlImageElement::new().expect("image element");
                img.set_src(src);
                img
            };
            Self {
                background: load_one("background.png"),
                airplane: load_one("airplane.png"),
                obstacle: load_one("obstacle.png"),
                explosion: load_one("explosion.png"),
            }
        }

        fn for_key(&self, key: SpriteKey) -> &HtmlImageElement {
            match key {
                SpriteKey::Airplane => &self.airplane,
                SpriteKey::Obstacle => &self.obstacle,
                SpriteKey::Explosion => &self.explosion,
            }
        }
    }

    /// Game instance holding simulation and presentation state.
    struct Game {
        state: GameState,
        tuning: Tuning,
        input: TickInput,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        sprites: Sprites,
        /// First touch position, for drag direction detection
        touch_origin: Option<(f32, f32)>,
    }

    impl Game {
        fn new(seed: u64, canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
            let tuning = Tuning::default().validated();
            let viewport = current_viewport();
            canvas.set_width(viewport.width as u32);
            canvas.set_height(viewport.height as u32);
            Self {
                state: GameState::new(seed, viewport, &tuning),
                tuning,
                input: TickInput::default(),
                canvas,
                ctx,
                sprites: Sprites::load(),
                touch_origin: None,
            }
        }

        /// Run exactly one tick. The rAF cadence IS the tick rate: tuning
        /// values are per-tick deltas, so there is no accumulator here.
        fn frame(&mut self) -> Vec<GameEvent> {
            tick(&mut self.state, &self.input, &self.tuning);
            // Jump is a one-shot request
            self.input.jump = false;
            self.state.take_events()
        }

        fn render(&self) {
            let snap: RenderSnapshot = self.state.snapshot();
            let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
            let ctx = &self.ctx;

            ctx.clear_rect(0.0, 0.0, w, h);
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &self.sprites.background,
                0.0,
                0.0,
                w,
                h,
            );

            ctx.set_fill_style_str("red");
            ctx.fill_rect(
                snap.ground.left() as f64,
                snap.ground.top() as f64,
                snap.ground.size.x as f64,
                snap.ground.size.y as f64,
            );

            for sprite in snap.obstacles.iter().chain(std::iter::once(&snap.character)) {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    self.sprites.for_key(sprite.sprite),
                    sprite.rect.left() as f64,
                    sprite.rect.top() as f64,
                    sprite.rect.size.x as f64,
                    sprite.rect.size.y as f64,
                );
            }

            if let Some(el) = document().get_element_by_id("score") {
                el.set_text_content(Some(&format!("Score: {}", snap.score)));
            }
        }

        fn resize(&mut self) {
            let viewport = current_viewport();
            self.canvas.set_width(viewport.width as u32);
            self.canvas.set_height(viewport.height as u32);
            self.state.resize(viewport, &self.tuning);
        }
    }

    fn window() -> web_sys::Window {
        web_sys::window().expect("no window")
    }

    fn document() -> web_sys::Document {
        window().document().expect("no document")
    }

    /// Current window size, clamped by `Viewport::new`; falls back to a
    /// fixed size if the host reports nothing usable.
    fn current_viewport() -> Viewport {
        let win = window();
        let w = win
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(FALLBACK_VIEWPORT.0 as f64);
        let h = win
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(FALLBACK_VIEWPORT.1 as f64);
        Viewport::new(w as f32, h as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Aero Dash starting...");

        let canvas: HtmlCanvasElement = document()
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("2d context")
            .expect("2d context unavailable")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, canvas, ctx)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_resize_handler(game.clone());
        setup_modal(game.clone());

        // Start the game loop
        request_animation_frame(game);

        log::info!("Aero Dash running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let win = window();

        // Keyboard: arrows steer and jump, anything else is ignored
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowRight" | "Right" => g.input.steer = Some(Steer::Right),
                    "ArrowLeft" | "Left" => g.input.steer = Some(Steer::Left),
                    "ArrowUp" | "Up" => g.input.jump = true,
                    _ => {}
                }
            });
            let _ = win.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key release only clears the direction it was driving; releasing a
        // stale key while the other arrow is held must not stop the plane.
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowRight" | "Right" if g.input.steer == Some(Steer::Right) => {
                        g.input.steer = None;
                    }
                    "ArrowLeft" | "Left" if g.input.steer == Some(Steer::Left) => {
                        g.input.steer = None;
                    }
                    _ => {}
                }
            });
            let _ = win.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let canvas = game.borrow().canvas.clone();

        // Touch start: remember the drag origin
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut().touch_origin =
                        Some((touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move: horizontal drag steers, upward drag jumps.
        // Zero-delta moves are stray events and are ignored.
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let Some((ox, oy)) = g.touch_origin else {
                        return;
                    };
                    let dx = touch.client_x() as f32 - ox;
                    let dy = touch.client_y() as f32 - oy;
                    if dx > 0.0 {
                        g.input.steer = Some(Steer::Right);
                    } else if dx < 0.0 {
                        g.input.steer = Some(Steer::Left);
                    }
                    if dy < 0.0 {
                        g.input.jump = true;
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: stop steering
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                let mut g = game.borrow_mut();
                g.input.steer = None;
                g.touch_origin = None;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window().add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Game-over modal: shown once per death with the final score; clicking
    /// it (or its close button) dismisses it and restarts the run.
    fn setup_modal(game: Rc<RefCell<Game>>) {
        let Some(modal) = document().get_element_by_id("endModal") else {
            log::warn!("no endModal element; restart via reload only");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            hide_modal();
            let mut g = game.borrow_mut();
            if !g.state.is_running() {
                // Fresh seed per retry: a new obstacle sequence every run
                let seed = js_sys::Date::now() as u64;
                let tuning = g.tuning.clone();
                g.state.restart(seed, &tuning);
                g.input = TickInput::default();
                drop(g);
                // Death stopped the loop; schedule it again
                request_animation_frame(game.clone());
                log::info!("run restarted with seed: {}", seed);
            }
        });
        let _ = modal.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn show_modal(score: u64) {
        let document = document();
        if let Some(el) = document.get_element_by_id("finalScore") {
            el.set_text_content(Some(&score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("endModal") {
            let _ = el.set_attribute("class", "modal");
        }
    }

    fn hide_modal() {
        if let Some(el) = document().get_element_by_id("endModal") {
            let _ = el.set_attribute("class", "modal hidden");
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window().request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let running = {
            let mut g = game.borrow_mut();
            let events = g.frame();
            // Render after the tick so the death frame shows the explosion
            g.render();
            for event in events {
                if let GameEvent::GameOver { score } = event {
                    show_modal(score);
                }
            }
            g.state.is_running()
        };

        // Stop scheduling once the run is over; the modal restarts the loop.
        if running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use aero_dash::Tuning;
    use aero_dash::consts::{ASSUMED_TICK_HZ, FALLBACK_VIEWPORT};
    use aero_dash::sim::{GameState, TickInput, Viewport, tick};
    use std::time::{SystemTime, UNIX_EPOCH};

    env_logger::init();
    log::info!(
        "Aero Dash (native) starting headless flight ({} ticks ~ 1 simulated second)",
        ASSUMED_TICK_HZ
    );

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let tuning = Tuning::default().validated();
    let viewport = Viewport::new(FALLBACK_VIEWPORT.0, FALLBACK_VIEWPORT.1);
    let mut state = GameState::new(seed, viewport, &tuning);

    // Naive autopilot: hop whenever an obstacle closes in from the right.
    let mut input = TickInput::default();
    while state.is_running() && state.frame < 200_000 {
        input.jump = state.obstacles.iter().any(|o| {
            let gap = o.rect.left() - state.character.rect.right();
            (0.0..250.0).contains(&gap)
        }) && !state.character.jumping;
        tick(&mut state, &input, &tuning);
    }

    log::info!(
        "flight over: seed {} survived {} ticks, final score {}",
        seed,
        state.frame,
        state.display_score()
    );
    println!("Final score: {}", state.display_score());
}
