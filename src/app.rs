//! Fixed-timestep driver shared by the native and web front ends
//!
//! The front end feeds platform-neutral input and wall-clock deltas; the
//! app turns them into deterministic ticks of the active game.

use std::str::FromStr;

use glam::Vec2;

use crate::audio::SoundEffect;
use crate::consts::{self, MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::error::{ArcadeError, Result};
use crate::highscores::HighScores;
use crate::platform::{InputEvent, Key, KeyValueStore, now_millis};
use crate::renderer::{Vertex, fps_overlay, kingdom_frame, shooter_frame};
use crate::settings::Settings;
use crate::sim::kingdom::{self, KingdomInput, KingdomWorld};
use crate::sim::shooter::{self, ShooterEvent, ShooterPhase, ShooterWorld, TickInput};
use crate::tuning::ShooterTuning;
use crate::map_to_unit;

/// Frames averaged by the FPS counter
const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "wasm32"), derive(clap::ValueEnum))]
pub enum GameKind {
    /// Square Shooter
    Shooter,
    /// Demon Kingdom
    Kingdom,
}

impl GameKind {
    pub fn title(self) -> &'static str {
        match self {
            GameKind::Shooter => "Square Shooter",
            GameKind::Kingdom => "Demon Kingdom",
        }
    }

    /// Window size in logical pixels
    pub fn logical_size(self) -> (f32, f32) {
        match self {
            GameKind::Shooter => (
                consts::shooter::WINDOW_WIDTH,
                consts::shooter::WINDOW_HEIGHT,
            ),
            GameKind::Kingdom => (
                consts::kingdom::WINDOW_WIDTH as f32,
                consts::kingdom::WINDOW_HEIGHT as f32,
            ),
        }
    }

    pub fn sim_dt(self) -> f32 {
        match self {
            GameKind::Shooter => consts::shooter::SIM_DT,
            GameKind::Kingdom => consts::kingdom::SIM_DT,
        }
    }
}

impl FromStr for GameKind {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shooter" | "square-shooter" => Ok(GameKind::Shooter),
            "kingdom" | "demon-kingdom" => Ok(GameKind::Kingdom),
            other => Err(ArcadeError::UnknownGame(other.to_string())),
        }
    }
}

enum World {
    Shooter(Box<ShooterWorld>),
    Kingdom(Box<KingdomWorld>),
}

/// One running game plus everything around it
pub struct App {
    world: World,
    shooter_input: TickInput,
    kingdom_input: KingdomInput,
    pub settings: Settings,
    pub highscores: HighScores,
    accumulator: f32,
    // FPS tracking
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
    sounds: Vec<SoundEffect>,
}

impl App {
    pub fn new(
        kind: GameKind,
        seed: u64,
        tuning: ShooterTuning,
        settings: Settings,
        highscores: HighScores,
    ) -> Self {
        let world = match kind {
            GameKind::Shooter => {
                let best = highscores.top_score().unwrap_or(0);
                World::Shooter(Box::new(
                    ShooterWorld::new(seed, tuning).with_records(best, highscores.max_level),
                ))
            }
            GameKind::Kingdom => World::Kingdom(Box::new(KingdomWorld::new(seed))),
        };
        log::info!("Starting {} (seed {})", kind.title(), seed);

        Self {
            world,
            shooter_input: TickInput::default(),
            kingdom_input: KingdomInput::default(),
            settings,
            highscores,
            accumulator: 0.0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
            sounds: Vec::new(),
        }
    }

    /// Load settings and the leaderboard from `store`, then start `kind`
    pub fn load(kind: GameKind, seed: u64, tuning: ShooterTuning, store: &dyn KeyValueStore) -> Self {
        Self::new(
            kind,
            seed,
            tuning,
            Settings::load(store),
            HighScores::load(store),
        )
    }

    pub fn kind(&self) -> GameKind {
        match self.world {
            World::Shooter(_) => GameKind::Shooter,
            World::Kingdom(_) => GameKind::Kingdom,
        }
    }

    pub fn logical_size(&self) -> (f32, f32) {
        self.kind().logical_size()
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Queue one input event for the next tick
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyUp(Key::Char('f')) => {
                self.settings.toggle_fps();
                return;
            }
            InputEvent::KeyUp(Key::Char('m')) => {
                self.settings.toggle_mute();
                log::info!("Sound {}", if self.settings.muted { "off" } else { "on" });
                return;
            }
            _ => {}
        }

        match self.world {
            World::Shooter(_) => {
                let input = &mut self.shooter_input;
                match event {
                    // Square Shooter keys act on release
                    InputEvent::KeyUp(Key::Escape) => input.exit = true,
                    InputEvent::KeyUp(Key::Char('q')) => input.quit = true,
                    InputEvent::KeyUp(Key::Char('p')) => input.play_pause = true,
                    InputEvent::PointerDown(pos) => input.fire_at = Some(map_to_unit(pos)),
                    InputEvent::PointerUp(_) => input.release = true,
                    _ => {}
                }
            }
            World::Kingdom(_) => {
                let input = &mut self.kingdom_input;
                match event {
                    InputEvent::KeyDown(Key::Escape) => input.exit = true,
                    InputEvent::KeyDown(Key::Char(c)) => input.hotkey = Some(c),
                    InputEvent::PointerDown(pos) => input.click = Some(pos.as_ivec2()),
                    _ => {}
                }
            }
        }
    }

    /// The window lost focus
    pub fn focus_lost(&mut self) {
        if !self.settings.pause_on_blur {
            return;
        }
        if let World::Shooter(world) = &mut self.world {
            if world.is_playing() {
                world.phase = ShooterPhase::Paused;
                log::info!("Auto-paused on focus loss");
            }
        }
    }

    /// Run simulation ticks for `dt` seconds of wall time
    ///
    /// `time` is a millisecond timestamp used only for the FPS counter.
    pub fn update(&mut self, dt: f32, time: f64) {
        let sim_dt = self.kind().sim_dt();
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= sim_dt && substeps < MAX_SUBSTEPS {
            match &mut self.world {
                World::Shooter(world) => {
                    let input = std::mem::take(&mut self.shooter_input);
                    shooter::tick(world, &input, sim_dt);
                }
                World::Kingdom(world) => {
                    let input = std::mem::take(&mut self.kingdom_input);
                    kingdom::tick(world, &input);
                }
            }
            self.accumulator -= sim_dt;
            substeps += 1;
            self.drain_events();
        }
        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(sim_dt);
        }

        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample sits at the next write position
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW as f64 - 1.0) * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    fn drain_events(&mut self) {
        match &mut self.world {
            World::Shooter(world) => {
                for event in world.drain_events() {
                    if let ShooterEvent::GameOver { score, level }
                    | ShooterEvent::RunAbandoned { score, level } = event
                    {
                        if let Some(rank) = self.highscores.record(score, level, now_millis()) {
                            log::info!("New high score #{}: {}", rank, score);
                        }
                    }
                    if let Some(effect) = SoundEffect::for_shooter(&event) {
                        self.sounds.push(effect);
                    }
                }
            }
            World::Kingdom(world) => {
                for event in world.drain_events() {
                    log::debug!("{:?}", event);
                    if let Some(effect) = SoundEffect::for_kingdom(&event) {
                        self.sounds.push(effect);
                    }
                }
            }
        }
    }

    /// Sound effects triggered since the last call
    pub fn take_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.sounds)
    }

    /// Build the current frame in logical pixels
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut out = match &self.world {
            World::Shooter(world) => shooter_frame(world),
            World::Kingdom(world) => kingdom_frame(world),
        };
        if self.settings.show_fps {
            fps_overlay(&mut out, self.fps);
        }
        out
    }

    pub fn should_exit(&self) -> bool {
        match &self.world {
            World::Shooter(world) => world.exit_requested,
            World::Kingdom(world) => world.exit_requested,
        }
    }

    /// Save settings and the leaderboard
    pub fn persist(&self, store: &dyn KeyValueStore) -> Result<()> {
        self.settings.save(store)?;
        self.highscores.save(store)?;
        log::info!("Saved settings and high scores");
        Ok(())
    }

    /// Pointer position in logical pixels from a position in a surface of `size`
    pub fn to_logical(&self, pos: Vec2, size: Vec2) -> Vec2 {
        let (w, h) = self.logical_size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return pos;
        }
        Vec2::new(pos.x * w / size.x, pos.y * h / size.y)
    }
}
