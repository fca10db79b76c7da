//! Flashburst entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use flashburst::consts::{MIN_VIEWPORT_HEIGHT, MIN_VIEWPORT_WIDTH};
    use flashburst::hud::{HudBridge, HudSnapshot};
    use flashburst::renderer::SdfRenderState;
    use flashburst::{Game, Settings};

    /// Keys whose browser default (scrolling) is suppressed
    const CAPTURED_KEYS: [&str; 5] = [" ", "ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"];

    /// HUD bridge writing into the page's DOM elements
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    impl HudBridge for DomHud {
        fn update_hud(&mut self, hud: &HudSnapshot) {
            self.set_text("score", &hud.score_text());
            self.set_text("charge", &hud.charge_text());
            self.set_text("health", &hud.health_text());
            self.set_text("time", &hud.time_text());
        }

        fn set_overlay(&mut self, title: &str, body: &str) {
            self.set_text("overlayTitle", title);
            self.set_text("overlayBody", body);
            if let Some(el) = self.document.get_element_by_id("overlay") {
                let _ = el.class_list().remove_1("hidden");
            }
        }

        fn hide_overlay(&mut self) {
            if let Some(el) = self.document.get_element_by_id("overlay") {
                let _ = el.class_list().add_1("hidden");
            }
        }
    }

    /// Everything the frame loop touches
    struct App {
        game: Game,
        hud: DomHud,
        render_state: Option<SdfRenderState>,
        settings: Settings,
        canvas: HtmlCanvasElement,
    }

    impl App {
        /// Match the canvas backing store to its CSS box
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio().max(1.0);
            let rect = self.canvas.get_bounding_client_rect();
            let width = (rect.width().floor() as f32).max(MIN_VIEWPORT_WIDTH);
            let height = (rect.height().floor() as f32).max(MIN_VIEWPORT_HEIGHT);
            let px_w = (width as f64 * dpr).floor() as u32;
            let px_h = (height as f64 * dpr).floor() as u32;
            self.canvas.set_width(px_w);
            self.canvas.set_height(px_h);

            self.game.resize(width, height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(px_w, px_h);
            }
        }

        fn frame(&mut self, time: f64) {
            self.game.frame(time, &mut self.hud);
            self.render();
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.game.state, &self.settings) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
            .dyn_into::<T>()
            .map_err(|_| JsValue::from_str(&format!("#{id} has the wrong element type")))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Flashburst starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = element(&document, "game")?;

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            game: Game::new(seed, MIN_VIEWPORT_WIDTH, MIN_VIEWPORT_HEIGHT),
            hud: DomHud {
                document: document.clone(),
            },
            render_state: None,
            settings,
            canvas: canvas.clone(),
        }));
        log::info!("Game initialized with seed: {}", seed);

        {
            let mut a = app.borrow_mut();
            a.resize();
            // Start overlay and initial HUD values
            let App { game, hud, .. } = &mut *a;
            game.sync(hud);
        }

        // Initialize WebGPU; without it the game still runs, just undrawn
        match init_renderer(&canvas).await {
            Ok(render_state) => {
                let mut a = app.borrow_mut();
                a.render_state = Some(render_state);
                a.resize();
            }
            Err(e) => log::error!("WebGPU unavailable: {}", e),
        }

        setup_input_handlers(app.clone())?;
        setup_resize_handler(app.clone())?;
        setup_focus_handler(app.clone())?;

        request_animation_frame(app);

        log::info!("Flashburst running!");
        Ok(())
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
    ) -> Result<SdfRenderState, flashburst::renderer::RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let width = canvas.width();
        let height = canvas.height();
        SdfRenderState::new(surface, &adapter, width, height).await
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if CAPTURED_KEYS.contains(&key.as_str()) {
                    event.prevent_default();
                }
                app.borrow_mut().game.input.key_down(&key, event.repeat());
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.input.key_up(&event.key());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize_handler(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Release held keys when the window loses focus so nothing sticks
    fn setup_focus_handler(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().game.suspend();
            log::debug!("Window blurred, input released");
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flashburst (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let _ = autoplay::run(seed, 90.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a simple bot plays one run and the result is logged
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use flashburst::Game;
    use flashburst::hud::NullHud;
    use flashburst::sim::{GamePhase, GameState};
    use glam::Vec2;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Shadows closer than this trigger a flash
    const PANIC_DISTANCE: f32 = 90.0;

    const MOVE_KEYS: [(&str, Vec2); 4] = [
        ("a", Vec2::NEG_X),
        ("d", Vec2::X),
        ("w", Vec2::NEG_Y),
        ("s", Vec2::Y),
    ];

    /// Play one run and return the final game
    pub fn run(seed: u64, max_secs: f32) -> Game {
        let mut game = Game::new(seed, 960.0, 640.0);
        let mut hud = NullHud;
        game.sync(&mut hud);
        game.input.key_down("Enter", false);

        let mut time_ms = 0.0;
        let mut flash_held = false;
        while game.state.phase != GamePhase::Over && game.state.elapsed < max_secs {
            let dir = desired_direction(&game.state);
            steer(&mut game, dir);

            if flash_held {
                game.input.key_up(" ");
                flash_held = false;
            } else if game.state.charge > 0 && shadow_nearby(&game.state) {
                game.input.key_down(" ", false);
                flash_held = true;
            }

            game.frame(time_ms, &mut hud);
            time_ms += FRAME_MS;
        }

        log::info!(
            "Autoplay seed {} finished: score {} health {} after {:.1}s",
            seed,
            game.state.score,
            game.state.health,
            game.state.elapsed
        );
        game
    }

    /// Head for the nearest spark, or idle toward the centre
    fn desired_direction(state: &GameState) -> Vec2 {
        let player = state.player.pos;
        let target = state
            .sparks
            .iter()
            .map(|s| s.pos)
            .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)))
            .unwrap_or(state.viewport.size() * 0.5);
        (target - player).normalize_or_zero()
    }

    fn shadow_nearby(state: &GameState) -> bool {
        state
            .shadows
            .iter()
            .any(|s| s.pos.distance(state.player.pos) < PANIC_DISTANCE)
    }

    fn steer(game: &mut Game, dir: Vec2) {
        for (key, axis) in MOVE_KEYS {
            if dir.dot(axis) > 0.3 {
                game.input.key_down(key, false);
            } else {
                game.input.key_up(key);
            }
        }
    }

}
