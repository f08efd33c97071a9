//! Retro Arcade - Square Shooter and Demon Kingdom
//!
//! Core modules:
//! - `sim`: Deterministic simulation for both games (physics, collisions, waves)
//! - `tuning`: Data-driven game balance
//! - `app`: Fixed-timestep driver shared by the native and web front ends
//! - `renderer`: WebGPU rendering pipeline and scene building
//! - `platform`: Input events, storage and time
//! - `audio`: Synthesised sound effects

pub mod app;
pub mod audio;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use app::{App, GameKind};
pub use error::{ArcadeError, Result};
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Square Shooter layout and timing
    pub mod shooter {
        /// Fixed simulation timestep (60 ticks per second)
        pub const SIM_DT: f32 = 1.0 / 60.0;

        pub const WINDOW_WIDTH: f32 = 640.0;
        pub const WINDOW_HEIGHT: f32 = 480.0;

        /// The playfield leaves a 160px HUD panel on the right
        pub const MAP_WIDTH: f32 = WINDOW_WIDTH - 160.0;
        pub const MAP_HEIGHT: f32 = WINDOW_HEIGHT;
        /// Scale used for radii (max of both map dimensions)
        pub const MAP_SIZE: f32 = if MAP_WIDTH > MAP_HEIGHT {
            MAP_WIDTH
        } else {
            MAP_HEIGHT
        };
    }

    /// Demon Kingdom layout and timing
    pub mod kingdom {
        /// Fixed simulation timestep (20 ticks per second)
        pub const SIM_DT: f32 = 1.0 / 20.0;

        pub const MAP_WIDTH: i32 = 600;
        pub const MAP_HEIGHT: i32 = 360;
        pub const SIDEBAR_HEIGHT: i32 = 120;
        pub const WINDOW_WIDTH: i32 = MAP_WIDTH;
        pub const WINDOW_HEIGHT: i32 = MAP_HEIGHT + SIDEBAR_HEIGHT;

        /// Animation clock units added per tick
        pub const CLOCK_STEP: u32 = 15;
        /// Animation clock units between sprite frames
        pub const FRAME_RATE: u32 = 30;
        /// Ticks a level/final-wave title card stays up (1.75 s)
        pub const TITLE_CARD_TICKS: u32 = 35;
        /// Line spacing of scrolling story text
        pub const STORY_LINE_HEIGHT: i32 = 26;
    }
}

/// Map a unit-square position to playfield pixels
#[inline]
pub fn unit_to_map(pos: glam::Vec2) -> glam::Vec2 {
    use consts::shooter::{MAP_HEIGHT, MAP_WIDTH};
    glam::Vec2::new(pos.x * MAP_WIDTH, pos.y * MAP_HEIGHT)
}

/// Map playfield pixels to the unit square (inverse of [`unit_to_map`])
#[inline]
pub fn map_to_unit(pixels: glam::Vec2) -> glam::Vec2 {
    use consts::shooter::{MAP_HEIGHT, MAP_WIDTH};
    glam::Vec2::new(pixels.x / MAP_WIDTH, pixels.y / MAP_HEIGHT)
}
