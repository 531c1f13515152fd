//! Glitch Arcade entry point
//!
//! In the browser: canvas surface, sprite loading, input wiring and the
//! animation-frame loop. Natively: a headless autopilot match.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, KeyboardEvent,
        MouseEvent, TouchEvent,
    };

    use glitch_arcade::audio::web::WebAudio;
    use glitch_arcade::host::{SessionTicket, Sessions};
    use glitch_arcade::renderer::vertex::to_css;
    use glitch_arcade::renderer::{Renderer, SpriteId, SpriteSet, SpriteStatus, Surface, Vertex};
    use glitch_arcade::sim::{GamePhase, GameStats, Player};
    use glitch_arcade::{Engine, GameConfig, Key, QualityPreset, Settings};
    use glam::Vec2;

    /// `Surface` over a canvas 2D context
    struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
        images: Vec<(SpriteId, HtmlImageElement)>,
        size: Vec2,
        dpr: f64,
    }

    impl CanvasSurface {
        fn resize(&mut self, size: Vec2, dpr: f64) {
            self.size = size;
            self.dpr = dpr;
        }

        fn image(&self, id: SpriteId) -> Option<&HtmlImageElement> {
            self.images.iter().find(|(i, _)| *i == id).map(|(_, img)| img)
        }
    }

    impl Surface for CanvasSurface {
        fn size(&self) -> Vec2 {
            self.size
        }

        fn clear(&mut self, color: [f32; 4]) {
            let _ = self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
            self.ctx.set_global_alpha(1.0);
            self.ctx.set_fill_style_str(&to_css(color));
            self.ctx
                .fill_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
        }

        fn set_offset(&mut self, offset: Vec2) {
            let _ = self.ctx.set_transform(
                self.dpr,
                0.0,
                0.0,
                self.dpr,
                offset.x as f64 * self.dpr,
                offset.y as f64 * self.dpr,
            );
        }

        fn fill_triangles(&mut self, vertices: &[Vertex]) {
            // Consecutive triangles of one color share a path
            let mut current: Option<[f32; 4]> = None;
            for tri in vertices.chunks_exact(3) {
                let color = tri[0].color;
                if current != Some(color) {
                    if current.is_some() {
                        self.ctx.fill();
                    }
                    self.ctx.set_fill_style_str(&to_css(color));
                    self.ctx.begin_path();
                    current = Some(color);
                }
                let [a, b, c] = [tri[0].position, tri[1].position, tri[2].position];
                self.ctx.move_to(a[0] as f64, a[1] as f64);
                self.ctx.line_to(b[0] as f64, b[1] as f64);
                self.ctx.line_to(c[0] as f64, c[1] as f64);
                self.ctx.close_path();
            }
            if current.is_some() {
                self.ctx.fill();
            }
        }

        fn draw_sprite(&mut self, id: SpriteId, center: Vec2, size: Vec2, alpha: f32) {
            let Some(img) = self.image(id) else { return };
            let min = center - size * 0.5;
            self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                min.x as f64,
                min.y as f64,
                size.x as f64,
                size.y as f64,
            );
            self.ctx.set_global_alpha(1.0);
        }

        fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: [f32; 4]) {
            self.ctx.set_font(&format!("bold {}px monospace", size.round()));
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("middle");
            self.ctx.set_fill_style_str(&to_css(color));
            let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
        }
    }

    /// Game instance holding all state
    struct Game {
        engine: Engine,
        renderer: Renderer,
        sprites: SpriteSet,
        surface: CanvasSurface,
        sessions: Sessions,
        canvas: HtmlCanvasElement,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let dt = self.engine.frame(time);
            let frame = self.renderer.render(self.engine.state(), &self.sprites, dt);
            frame.present(&mut self.surface);
            update_player_hud(self.engine.player());
        }

        /// Match the canvas backing store to its CSS size
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let (w, h) = css_size(&self.canvas);
            self.canvas.set_width((w as f64 * dpr) as u32);
            self.canvas.set_height((h as f64 * dpr) as u32);
            self.engine.resize(w, h);
            let bounds = self.engine.state().bounds();
            self.surface.resize(bounds, dpr);
        }

        /// Start a fresh run; the returned ticket owns the new frame loop
        fn restart(&mut self, seed: u64) -> SessionTicket {
            self.engine.restart(seed);
            log::info!("Game restarted with seed: {}", seed);
            self.sessions.start()
        }

        fn toggle_mute(&mut self) {
            let mut settings = self.engine.settings().clone();
            settings.muted = !settings.muted;
            log::info!("Muted: {}", settings.muted);
            self.engine.apply_settings(settings);
        }
    }

    fn css_size(canvas: &HtmlCanvasElement) -> (f32, f32) {
        (canvas.client_width() as f32, canvas.client_height() as f32)
    }

    /// Initial settings from the page's media queries
    fn detect_settings(window: &web_sys::Window) -> Settings {
        let matches = |query: &str| {
            window
                .match_media(query)
                .ok()
                .flatten()
                .is_some_and(|mq| mq.matches())
        };
        let mut settings = if matches("(max-width: 600px)") {
            Settings::from_preset(QualityPreset::Medium)
        } else {
            Settings::default()
        };
        settings.reduced_motion = matches("(prefers-reduced-motion: reduce)");
        settings
    }

    fn set_class(document: &Document, id: &str, class: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn page_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn update_player_hud(player: &Player) {
        let Some(document) = page_document() else { return };
        set_text(&document, "#hud-health .hud-value", &player.health.max(0).to_string());
        set_text(&document, "#hud-bombs .hud-value", &player.bombs.to_string());
        let class = if player.shielded { "hud-item" } else { "hud-item hidden" };
        set_class(&document, "hud-shield", class);
    }

    fn update_stats_hud(stats: &GameStats) {
        let Some(document) = page_document() else { return };
        set_text(&document, "#hud-score .hud-value", &stats.score.to_string());
        set_text(
            &document,
            "#hud-timer .hud-value",
            &format!("{:.0}", stats.wave_timer.max(0.0).ceil()),
        );

        if let Some(el) = document.get_element_by_id("hud-combo") {
            if stats.current_combo > 1 {
                let _ = el.set_attribute("class", "hud-item");
                set_text(&document, "#hud-combo .hud-value", &stats.current_combo.to_string());
                set_text(
                    &document,
                    "#hud-combo .multiplier",
                    &format!("x{}", stats.combo_multiplier()),
                );
            } else {
                let _ = el.set_attribute("class", "hud-item hidden");
            }
        }
    }

    fn update_phase_overlays(phase: GamePhase, last: &GameStats) {
        let Some(document) = page_document() else { return };
        let shown = |on: bool| if on { "" } else { "hidden" };

        set_class(&document, "hud", shown(phase != GamePhase::Glitch));
        set_class(&document, "pause-menu", shown(phase == GamePhase::Paused));
        set_class(&document, "game-over", shown(phase.is_terminal()));

        if phase.is_terminal() {
            let title = if phase == GamePhase::Victory {
                "VICTORY"
            } else {
                "DEFEAT"
            };
            set_text(&document, "#final-title", title);
            set_text(&document, "#final-score", &last.score.to_string());
            set_text(&document, "#final-kills", &last.enemies_killed.to_string());
            set_text(&document, "#final-combo", &last.max_combo.to_string());
            if let Ok(json) = serde_json::to_string(last) {
                log::info!("Final stats: {}", json);
            }
        }
    }

    /// Create the sprite images; load callbacks are attached once the game exists
    fn create_images() -> Vec<(SpriteId, HtmlImageElement)> {
        SpriteId::ALL
            .iter()
            .filter_map(|id| Some((*id, HtmlImageElement::new().ok()?)))
            .collect()
    }

    fn load_sprites(game: &Rc<RefCell<Game>>) {
        let images = game.borrow().surface.images.clone();
        for (id, img) in images {
            let on_load = {
                let game = game.clone();
                Closure::<dyn FnMut()>::new(move || {
                    game.borrow_mut().sprites.set_status(id, SpriteStatus::Ready);
                })
            };
            let on_error = {
                let game = game.clone();
                Closure::<dyn FnMut()>::new(move || {
                    game.borrow_mut().sprites.set_status(id, SpriteStatus::Failed);
                })
            };
            img.set_onload(Some(on_load.as_ref().unchecked_ref()));
            img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
            on_load.forget();
            on_error.forget();
            img.set_src(id.asset_path());
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Glitch Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        set_class(&document, "loading", "hidden");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let (width, height) = css_size(&canvas);
        let config = GameConfig {
            width,
            height,
            ..Default::default()
        }
        .sanitized();

        let seed = js_sys::Date::now() as u64;
        let mut engine = Engine::new(config.clone(), Box::new(WebAudio::new()), seed);
        let settings = detect_settings(&window);
        let mut renderer = Renderer::new(config.width, config.height, seed ^ 0x5eed);
        renderer.set_quality(settings.quality);
        engine.apply_settings(settings);

        // Final stats for the game-over panel
        let last_stats = Rc::new(RefCell::new(GameStats::default()));
        {
            let last_stats = last_stats.clone();
            engine.on_stats(move |stats| {
                update_stats_hud(stats);
                *last_stats.borrow_mut() = stats.clone();
            });
        }
        engine.on_phase_change(move |phase| update_phase_overlays(phase, &last_stats.borrow()));

        let mut sessions = Sessions::new();
        let ticket = sessions.start();
        let game = Rc::new(RefCell::new(Game {
            engine,
            renderer,
            sprites: SpriteSet::new(),
            surface: CanvasSurface {
                ctx,
                images: create_images(),
                size: Vec2::new(config.width, config.height),
                dpr: window.device_pixel_ratio(),
            },
            sessions,
            canvas: canvas.clone(),
        }));
        game.borrow_mut().fit_canvas();
        log::info!("Game initialized with seed: {}", seed);

        load_sprites(&game);
        setup_input_handlers(&canvas, game.clone())?;
        setup_buttons(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone())?;

        request_animation_frame(game, ticket);
        log::info!("Glitch Arcade running!");
        Ok(())
    }

    fn on_key_down(game: &Rc<RefCell<Game>>, event: &KeyboardEvent) {
        let mut g = game.borrow_mut();
        match event.key().as_str() {
            "Escape" => {
                if g.engine.phase() == GamePhase::Glitch {
                    g.engine.skip_glitch();
                } else {
                    g.engine.toggle_pause();
                }
            }
            "m" | "M" => g.toggle_mute(),
            "i" | "I" => {
                let on = !g.engine.autopilot();
                g.engine.set_autopilot(on);
                log::info!("Autopilot: {}", on);
            }
            key => {
                if let Some(key) = Key::from_browser(key) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                    g.engine.key_down(key);
                }
            }
        }
    }

    /// Pointer position in playfield pixels for a touch
    fn touch_point(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some((
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                on_key_down(&game, &event);
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_browser(&event.key()) {
                    game.borrow_mut().engine.key_up(key);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse drag steers
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .engine
                    .pointer(event.offset_x() as f32, event.offset_y() as f32);
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.buttons() & 1 == 1 {
                    game.borrow_mut()
                        .engine
                        .pointer(event.offset_x() as f32, event.offset_y() as f32);
                }
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_point(&canvas_clone, &event) {
                    game.borrow_mut().engine.pointer(x, y);
                }
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Releasing stops steering
        let releases: [(&web_sys::EventTarget, &str); 4] = [
            (window.as_ref(), "mouseup"),
            (canvas.as_ref(), "mouseleave"),
            (canvas.as_ref(), "touchend"),
            (canvas.as_ref(), "touchcancel"),
        ];
        for (target, name) in releases {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().engine.release_pointer();
            });
            target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().fit_canvas();
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let ticket = game.borrow_mut().restart(seed);
                request_animation_frame(game.clone(), ticket);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().engine.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for id in ["quit-btn", "pause-quit-btn"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().sessions.quit();
                if let Some(document) = page_document() {
                    set_class(&document, "game-root", "hidden");
                }
                log::info!("Game closed");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && game.borrow_mut().engine.pause()
                {
                    log::info!("Auto-paused (tab hidden)");
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
                if game.borrow_mut().engine.pause() {
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, ticket: SessionTicket) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, ticket, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, ticket: SessionTicket, time: f64) {
        {
            let mut g = game.borrow_mut();
            // A restart or quit since this frame was scheduled ends this loop
            if !g.sessions.is_current(ticket) {
                return;
            }
            g.frame(time);
        }

        request_animation_frame(game, ticket);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Glitch Arcade failed to start: {:?}", e);
    }
}

/// Headless match flown by the autopilot
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glitch_arcade::audio::NullAudio;
    use glitch_arcade::renderer::{Renderer, SpriteSet};
    use glitch_arcade::{Engine, GameConfig};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    log::info!("Glitch Arcade (native) starting with seed {}...", seed);
    log::info!("Native mode runs an autopilot match - use the web build to play");

    let config = GameConfig::default();
    let mut engine = Engine::new(config.clone(), Box::new(NullAudio), seed);
    let mut renderer = Renderer::new(config.width, config.height, seed);
    let sprites = SpriteSet::new();
    engine.set_autopilot(true);
    engine.on_phase_change(|phase| log::info!("Phase: {}", phase.as_str()));

    const DT: f32 = 1.0 / 60.0;
    const MAX_SECONDS: f32 = 300.0;
    let mut elapsed = 0.0;
    let mut commands = 0;
    while !engine.phase().is_terminal() && elapsed < MAX_SECONDS {
        engine.step(DT);
        commands += renderer.render(engine.state(), &sprites, DT).commands().count();
        elapsed += DT;
    }

    let stats = engine.stats();
    println!(
        "{} after {:.1}s: score {}, kills {}, bombs {}, max combo {}, player hp {}",
        engine.phase().as_str(),
        elapsed,
        stats.score,
        stats.enemies_killed,
        stats.bombs_used,
        stats.max_combo,
        engine.player().health,
    );
    log::debug!("{} draw commands built", commands);
    match serde_json::to_string(stats) {
        Ok(json) => log::info!("Stats: {}", json),
        Err(e) => log::warn!("Could not serialize stats: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
