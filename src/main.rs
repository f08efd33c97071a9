//! Retro Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use retro_arcade::audio::AudioManager;
    use retro_arcade::platform::{InputEvent, Key, WebStore};
    use retro_arcade::renderer::RenderState;
    use retro_arcade::tuning::ShooterTuning;
    use retro_arcade::{App, GameKind};

    /// Game instance holding all state
    struct Game {
        app: App,
        render_state: Option<RenderState>,
        audio: AudioManager,
        store: Option<WebStore>,
        last_time: f64,
        exited: bool,
    }

    impl Game {
        fn new(app: App, store: Option<WebStore>) -> Self {
            Self {
                app,
                render_state: None,
                audio: AudioManager::new(),
                store,
                last_time: 0.0,
                exited: false,
            }
        }

        fn update(&mut self, dt: f32, time: f64) {
            self.app.update(dt, time);
            self.audio.set_volume(self.app.settings.effective_volume());
            for effect in self.app.take_sounds() {
                self.audio.play(effect);
            }
            if self.app.should_exit() && !self.exited {
                self.exited = true;
                self.save();
                log::info!("Game exited; reload the page to play again");
            }
        }

        fn render(&mut self) {
            let vertices = self.app.vertices();
            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(&vertices) {
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

        /// Save settings and high scores to LocalStorage
        fn save(&self) {
            if let Some(store) = &self.store {
                if let Err(e) = self.app.persist(store) {
                    log::warn!("Save failed: {}", e);
                }
            }
        }

        /// Canvas-relative CSS pixels to game pixels
        fn pointer(&self, canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
            let size = Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32);
            let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
            self.app.to_logical(pos, size)
        }
    }

    /// `?game=kingdom` selects Demon Kingdom; anything else runs Square Shooter
    fn game_from_url(window: &web_sys::Window) -> GameKind {
        let search = window.location().search().unwrap_or_default();
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.strip_prefix("game="))
            .find_map(|value| value.parse().ok())
            .unwrap_or(GameKind::Shooter)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Retro Arcade starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let kind = game_from_url(&window);
        document.set_title(kind.title());

        // Backing store at device resolution, CSS size at game resolution
        let (logical_w, logical_h) = kind.logical_size();
        let dpr = window.device_pixel_ratio();
        let width = (logical_w as f64 * dpr) as u32;
        let height = (logical_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let _ = canvas.set_attribute(
            "style",
            &format!("width: {}px; height: {}px", logical_w, logical_h),
        );

        let store = match WebStore::open() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({}); progress will not be saved", e);
                None
            }
        };
        let seed = js_sys::Date::now() as u64;
        let app = match &store {
            Some(store) => App::load(kind, seed, ShooterTuning::default(), store),
            None => App::new(
                kind,
                seed,
                ShooterTuning::default(),
                Default::default(),
                Default::default(),
            ),
        };
        let game = Rc::new(RefCell::new(Game::new(app, store)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, kind.logical_size())
            .await
            .expect("Failed to set up renderer");
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("{} running!", kind.title());
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let mut g = game.borrow_mut();
                // Audio may only start after a user gesture
                g.audio.resume();
                let pos = g.pointer(&canvas_clone, &event);
                g.app.handle(InputEvent::PointerDown(pos));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let mut g = game.borrow_mut();
                let pos = g.pointer(&canvas_clone, &event);
                g.app.handle(InputEvent::PointerUp(pos));
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.app.handle(InputEvent::KeyDown(Key::from_web(&event.key())));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut()
                    .app
                    .handle(InputEvent::KeyUp(Key::from_web(&event.key())));
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                g.app.kind().sim_dt()
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize): pause and save
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.app.focus_lost();
                    g.save();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().app.focus_lost();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Leaving the page
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow().save();
            });
            let _ =
                window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;
    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event::{ElementState, MouseButton, WindowEvent};
    use winit::event_loop::{ActiveEventLoop, EventLoop};
    use winit::keyboard::{Key as WinitKey, NamedKey};
    use winit::window::{Window, WindowId};

    use retro_arcade::audio::AudioManager;
    use retro_arcade::platform::{FileStore, InputEvent, Key, now_millis};
    use retro_arcade::renderer::RenderState;
    use retro_arcade::tuning::ShooterTuning;
    use retro_arcade::{App, GameKind};

    /// Two single-screen arcade games
    #[derive(Parser, Debug)]
    #[command(name = "retro-arcade", version, about)]
    pub struct Cli {
        /// Which game to play
        #[arg(short, long, value_enum, default_value = "shooter")]
        game: GameKind,

        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,

        /// JSON file overriding Square Shooter balance values
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Directory for settings and high scores
        #[arg(long)]
        data_dir: Option<PathBuf>,
    }

    struct Arcade {
        app: App,
        store: FileStore,
        audio: AudioManager,
        window: Option<Arc<Window>>,
        render_state: Option<RenderState>,
        /// Cursor in physical pixels
        cursor: Vec2,
        last_frame: Option<Instant>,
        started: Instant,
        error: Option<anyhow::Error>,
    }

    impl Arcade {
        fn new(app: App, store: FileStore) -> Self {
            let mut audio = AudioManager::new();
            audio.set_volume(app.settings.effective_volume());
            Self {
                app,
                store,
                audio,
                window: None,
                render_state: None,
                cursor: Vec2::ZERO,
                last_frame: None,
                started: Instant::now(),
                error: None,
            }
        }

        fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
            let (w, h) = self.app.logical_size();
            let attrs = Window::default_attributes()
                .with_title(self.app.kind().title())
                .with_inner_size(LogicalSize::new(w, h))
                .with_resizable(false);
            let window = Arc::new(
                event_loop
                    .create_window(attrs)
                    .context("failed to create window")?,
            );

            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let surface = instance
                .create_surface(window.clone())
                .context("failed to create surface")?;
            let adapter = pollster::block_on(instance.request_adapter(
                &wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                },
            ))
            .context("no suitable GPU adapter")?;
            log::info!("Using adapter: {:?}", adapter.get_info().name);

            let size = window.inner_size();
            let render_state = pollster::block_on(RenderState::new(
                surface,
                &adapter,
                size.width,
                size.height,
                (w, h),
            ))?;

            self.render_state = Some(render_state);
            self.window = Some(window);
            Ok(())
        }

        fn cursor_logical(&self) -> Vec2 {
            let size = self
                .window
                .as_ref()
                .map(|w| w.inner_size())
                .map(|s| Vec2::new(s.width as f32, s.height as f32))
                .unwrap_or(Vec2::ZERO);
            self.app.to_logical(self.cursor, size)
        }

        fn frame(&mut self) {
            let now = Instant::now();
            let dt = self
                .last_frame
                .map(|last| now.duration_since(last).as_secs_f32())
                .unwrap_or_else(|| self.app.kind().sim_dt());
            self.last_frame = Some(now);

            let time = now.duration_since(self.started).as_secs_f64() * 1000.0 + 1.0;
            self.app.update(dt, time);

            self.audio.set_volume(self.app.settings.effective_volume());
            for effect in self.app.take_sounds() {
                self.audio.play(effect);
            }

            let vertices = self.app.vertices();
            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(&vertices) {
                    Ok(()) => {}
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

        fn save(&self) {
            if let Err(e) = self.app.persist(&self.store) {
                log::warn!("Save failed: {}", e);
            }
        }

        fn key(key: &WinitKey) -> Key {
            match key {
                WinitKey::Named(NamedKey::Escape) => Key::Escape,
                WinitKey::Character(text) => Key::from_text(text),
                _ => Key::Other,
            }
        }
    }

    impl ApplicationHandler for Arcade {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }
            if let Err(e) = self.init_graphics(event_loop) {
                self.error = Some(e);
                event_loop.exit();
            }
        }

        fn window_event(
            &mut self,
            event_loop: &ActiveEventLoop,
            _window_id: WindowId,
            event: WindowEvent,
        ) {
            match event {
                WindowEvent::CloseRequested => {
                    self.save();
                    event_loop.exit();
                }
                WindowEvent::Resized(size) => {
                    if let Some(render_state) = self.render_state.as_mut() {
                        render_state.resize(size.width, size.height);
                    }
                }
                WindowEvent::Focused(false) => self.app.focus_lost(),
                WindowEvent::CursorMoved { position, .. } => {
                    self.cursor = Vec2::new(position.x as f32, position.y as f32);
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    let pos = self.cursor_logical();
                    let event = match state {
                        ElementState::Pressed => InputEvent::PointerDown(pos),
                        ElementState::Released => InputEvent::PointerUp(pos),
                    };
                    self.app.handle(event);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    let key = Self::key(&event.logical_key);
                    match event.state {
                        ElementState::Pressed if !event.repeat => {
                            self.app.handle(InputEvent::KeyDown(key))
                        }
                        ElementState::Released => self.app.handle(InputEvent::KeyUp(key)),
                        _ => {}
                    }
                }
                WindowEvent::RedrawRequested => {
                    self.frame();
                    if self.app.should_exit() {
                        self.save();
                        event_loop.exit();
                    }
                }
                _ => {}
            }
        }

        fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();

        let tuning = match &cli.tuning {
            Some(path) => ShooterTuning::load(path)?,
            None => ShooterTuning::default(),
        };
        let store = match cli.data_dir {
            Some(dir) => FileStore::with_root(dir),
            None => FileStore::user_default(),
        };
        let seed = cli.seed.unwrap_or_else(|| now_millis() as u64);
        let app = App::load(cli.game, seed, tuning, &store);

        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut arcade = Arcade::new(app, store);
        event_loop
            .run_app(&mut arcade)
            .context("event loop failed")?;

        match arcade.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
