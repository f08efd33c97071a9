//! Data-driven game balance
//!
//! Square Shooter's numbers live in [`ShooterTuning`], which can be
//! overridden from a JSON file. Demon Kingdom's monster, level and spell
//! tables are fixed data.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::{ArcadeError, Result};
use crate::sim::kingdom::{MonsterKind, SpellKind};
use crate::sim::shooter::BubbleKind;
use MonsterKind::*;

// ============================================================================
// SQUARE SHOOTER
// ============================================================================

/// Per-size bubble numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleTuning {
    /// Radius in map units
    pub radius: f32,
    /// Maximum speed per axis (map units per second)
    pub speed: f32,
    /// Points for popping it
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterTuning {
    pub big: BubbleTuning,
    pub medium: BubbleTuning,
    pub small: BubbleTuning,

    pub ship_radius: f32,
    pub bullet_radius: f32,
    pub powerup_radius: f32,

    /// Velocity multiplier applied every tick (0-1)
    pub deceleration: f32,
    /// Acceleration gained per unit of distance to the thrust target
    pub thrust_factor: f32,

    /// Bullet velocity per unit of distance to the click
    pub bullet_speed_factor: f32,
    /// Clicks closer than this (per axis) to the ship get boosted bullets
    pub close_shot_threshold: f32,
    pub close_shot_boost: f32,
    pub shotgun_pellets: u32,
    /// Per-axis velocity jitter of shotgun pellets
    pub shotgun_spread: f32,
    /// No new shots while this many bullets are in flight
    pub max_live_bullets: usize,
    /// How far a super bullet is pushed (in ticks) after popping a bubble
    pub super_bullet_push: f32,

    /// Seconds each power-up pickup adds
    pub powerup_secs: f32,
    /// Chance a popped small bubble leaves a power-up
    pub powerup_drop_chance: f64,
    /// Seconds before an uncollected power-up vanishes
    pub max_powerup_age: f32,
    /// Power-up pickups score `level * powerup_score_per_level`
    pub powerup_score_per_level: u64,

    /// Explosions are removed once their radius exceeds this
    pub max_explosion_radius: f32,
    /// Seconds between clearing the last bubble and the next level
    pub level_clear_delay: f32,
    /// Seconds between losing a ship and respawning
    pub respawn_delay: f32,
    pub starting_lives: u32,
}

impl Default for ShooterTuning {
    fn default() -> Self {
        Self {
            big: BubbleTuning {
                radius: 0.1,
                speed: 0.1,
                score: 1,
            },
            medium: BubbleTuning {
                radius: 0.075,
                speed: 0.15,
                score: 2,
            },
            small: BubbleTuning {
                radius: 0.05,
                speed: 0.25,
                score: 5,
            },
            ship_radius: 0.04,
            bullet_radius: 0.01,
            powerup_radius: 0.03,
            deceleration: 0.99,
            thrust_factor: 0.03,
            bullet_speed_factor: 3.0,
            close_shot_threshold: 0.1,
            close_shot_boost: 30.0,
            shotgun_pellets: 5,
            shotgun_spread: 0.15,
            max_live_bullets: 6,
            super_bullet_push: 5.0,
            powerup_secs: 6.0,
            powerup_drop_chance: 0.25,
            max_powerup_age: 9.0,
            powerup_score_per_level: 10,
            max_explosion_radius: 0.5,
            level_clear_delay: 3.0,
            respawn_delay: 3.0,
            starting_lives: 1,
        }
    }
}

impl ShooterTuning {
    pub fn bubble(&self, kind: BubbleKind) -> &BubbleTuning {
        match kind {
            BubbleKind::Big => &self.big,
            BubbleKind::Medium => &self.medium,
            BubbleKind::Small => &self.small,
        }
    }

    /// Parse overrides; missing fields keep their defaults
    pub fn from_json(key: &str, json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json).map_err(|source| ArcadeError::Json {
            key: key.to_string(),
            source,
        })?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<()> {
        fn check(field: &'static str, value: f64, ok: bool) -> Result<()> {
            if ok && value.is_finite() {
                Ok(())
            } else {
                Err(ArcadeError::InvalidTuning { field, value })
            }
        }
        fn non_negative(field: &'static str, value: f32) -> Result<()> {
            check(field, value.into(), value >= 0.0)
        }
        fn positive(field: &'static str, value: f32) -> Result<()> {
            check(field, value.into(), value > 0.0)
        }
        fn unit(field: &'static str, value: f64) -> Result<()> {
            check(field, value, (0.0..=1.0).contains(&value))
        }

        for (radius, speed, bubble) in [
            ("big.radius", "big.speed", &self.big),
            ("medium.radius", "medium.speed", &self.medium),
            ("small.radius", "small.speed", &self.small),
        ] {
            positive(radius, bubble.radius)?;
            non_negative(speed, bubble.speed)?;
        }
        positive("ship_radius", self.ship_radius)?;
        positive("bullet_radius", self.bullet_radius)?;
        positive("powerup_radius", self.powerup_radius)?;
        unit("deceleration", self.deceleration.into())?;
        non_negative("thrust_factor", self.thrust_factor)?;
        non_negative("bullet_speed_factor", self.bullet_speed_factor)?;
        non_negative("close_shot_threshold", self.close_shot_threshold)?;
        non_negative("close_shot_boost", self.close_shot_boost)?;
        non_negative("shotgun_spread", self.shotgun_spread)?;
        non_negative("super_bullet_push", self.super_bullet_push)?;
        non_negative("powerup_secs", self.powerup_secs)?;
        unit("powerup_drop_chance", self.powerup_drop_chance)?;
        non_negative("max_powerup_age", self.max_powerup_age)?;
        non_negative("max_explosion_radius", self.max_explosion_radius)?;
        non_negative("level_clear_delay", self.level_clear_delay)?;
        non_negative("respawn_delay", self.respawn_delay)?;
        Ok(())
    }

    /// Load overrides from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let key = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|source| ArcadeError::Storage {
            key: key.clone(),
            source,
        })?;
        let tuning = Self::from_json(&key, &json)?;
        log::info!("Loaded shooter tuning from {}", key);
        Ok(tuning)
    }
}

// ============================================================================
// DEMON KINGDOM
// ============================================================================

/// Frame layout of a sprite sheet (frames read row by row)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub frame_width: i32,
    pub frame_height: i32,
    pub columns: u32,
    /// Total frames in the sheet
    pub frames: u32,
}

impl SheetLayout {
    /// A single-row sheet
    pub const fn row(frame_width: i32, frame_height: i32, columns: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            columns,
            frames: columns,
        }
    }

    pub fn frame_size(&self) -> IVec2 {
        IVec2::new(self.frame_width, self.frame_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterStats {
    pub sheet: SheetLayout,
    pub life: u32,
    /// Pixels moved right per tick
    pub speed: i32,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 15] = [
        MonsterKind::Bat,
        MonsterKind::Demon,
        MonsterKind::DemonLord,
        MonsterKind::Dino,
        MonsterKind::Genie,
        MonsterKind::Golem,
        MonsterKind::Ogre,
        MonsterKind::Orc,
        MonsterKind::Orc2,
        MonsterKind::Plant,
        MonsterKind::Skeleton,
        MonsterKind::Slime,
        MonsterKind::SoulTree,
        MonsterKind::Tablet,
        MonsterKind::Tree,
    ];

    pub const fn stats(self) -> MonsterStats {
        let (w, h, columns, life, speed) = match self {
            MonsterKind::Bat => (30, 29, 5, 1, 3),
            MonsterKind::Demon => (49, 68, 6, 25, 2),
            MonsterKind::DemonLord => (37, 42, 4, 27, 3),
            MonsterKind::Dino => (31, 36, 6, 4, 2),
            MonsterKind::Genie => (79, 93, 2, 10, 4),
            MonsterKind::Golem => (57, 99, 12, 15, 2),
            MonsterKind::Ogre => (50, 58, 6, 6, 2),
            MonsterKind::Orc => (34, 47, 6, 2, 2),
            MonsterKind::Orc2 => (34, 48, 6, 3, 2),
            MonsterKind::Plant => (48, 48, 5, 4, 1),
            MonsterKind::Skeleton => (32, 41, 6, 2, 3),
            MonsterKind::Slime => (30, 36, 12, 5, 2),
            MonsterKind::SoulTree => (69, 86, 4, 10, 3),
            MonsterKind::Tablet => (37, 54, 4, 15, 3),
            MonsterKind::Tree => (62, 65, 6, 8, 1),
        };
        MonsterStats {
            sheet: SheetLayout::row(w, h, columns),
            life,
            speed,
        }
    }
}

/// One line of a final wave: `count` monsters starting at x in `[min_x, max_x]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalWaveEntry {
    pub kind: MonsterKind,
    pub count: u32,
    pub min_x: i32,
    pub max_x: i32,
}

const fn fw(kind: MonsterKind, count: u32, min_x: i32, max_x: i32) -> FinalWaveEntry {
    FinalWaveEntry {
        kind,
        count,
        min_x,
        max_x,
    }
}

/// Everything needed to populate one level
#[derive(Debug, Clone, Copy)]
pub struct LevelPlan {
    pub name: &'static str,
    /// Weighted monster mix of the random wave
    pub ratios: &'static [(MonsterKind, u32)],
    /// Inclusive size range of the random wave
    pub random_amount: (u32, u32),
    pub final_wave: &'static [FinalWaveEntry],
}

pub const LEVELS: [LevelPlan; 6] = [
    LevelPlan {
        name: "Level I - The Dungeon of Stone",
        ratios: &[(Bat, 4), (Plant, 3), (Orc, 2), (Orc2, 1), (Slime, 1)],
        random_amount: (10, 20),
        final_wave: &[
            fw(Bat, 7, -100, -1),
            fw(Slime, 9, -60, -30),
            fw(Golem, 1, -60, -30),
        ],
    },
    LevelPlan {
        name: "Level II - The Field of the Flowers",
        ratios: &[(Bat, 2), (Tree, 1), (Plant, 4), (Orc2, 2), (Slime, 2)],
        random_amount: (35, 40),
        final_wave: &[
            fw(Bat, 5, -100, -1),
            fw(Plant, 14, -70, -20),
            fw(Tree, 18, -60, -30),
            fw(Genie, 3, -60, -30),
        ],
    },
    LevelPlan {
        name: "Level III - The Ice Lands",
        ratios: &[
            (Dino, 4),
            (Orc2, 2),
            (Ogre, 2),
            (Plant, 1),
            (Orc, 1),
            (Slime, 1),
        ],
        random_amount: (25, 30),
        final_wave: &[
            fw(Dino, 18, -80, -10),
            fw(Ogre, 20, -60, -30),
            fw(Tablet, 1, -60, -30),
        ],
    },
    LevelPlan {
        name: "Level IV - The Demon's Home",
        ratios: &[
            (Bat, 2),
            (Ogre, 2),
            (Skeleton, 4),
            (Orc, 2),
            (Slime, 2),
            (Tree, 1),
            (Orc2, 1),
        ],
        random_amount: (45, 65),
        final_wave: &[
            fw(Bat, 8, -100, -1),
            fw(Skeleton, 16, -100, -1),
            fw(Ogre, 18, -60, -30),
            fw(Demon, 1, -60, -30),
            fw(Genie, 1, -200, -200),
            fw(Golem, 1, -200, -200),
        ],
    },
    LevelPlan {
        name: "Level V - The Desert",
        ratios: &[(Golem, 1), (Plant, 1), (Genie, 2), (Orc, 2), (Skeleton, 2)],
        random_amount: (12, 16),
        final_wave: &[
            fw(Skeleton, 9, -100, -1),
            fw(Demon, 1, -60, -30),
            fw(SoulTree, 1, -60, -30),
        ],
    },
    LevelPlan {
        name: "Level VI - The Caves of the Demon Lord",
        ratios: &[
            (Bat, 4),
            (Orc2, 4),
            (Slime, 6),
            (Skeleton, 4),
            (Ogre, 6),
            (Dino, 2),
            (Demon, 1),
            (Tablet, 1),
        ],
        random_amount: (38, 43),
        final_wave: &[
            fw(Bat, 5, -100, -1),
            fw(Skeleton, 9, -100, -1),
            fw(Ogre, 12, -80, -20),
            fw(Demon, 2, -60, -30),
            fw(DemonLord, 1, -60, -30),
        ],
    },
];

/// Number of levels in a full run
pub const LEVEL_COUNT: u32 = LEVELS.len() as u32;

/// Plan for a 1-based level number (clamped into range)
pub fn level_plan(level: u32) -> &'static LevelPlan {
    let index = level.clamp(1, LEVEL_COUNT) as usize - 1;
    &LEVELS[index]
}

/// Spell icon edge length in the sidebar
pub const SPELL_ICON_SIZE: i32 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellStats {
    pub cost: u32,
    pub hotkey: char,
    /// Top-left corner of the sidebar icon
    pub icon_pos: IVec2,
    /// Number of effects launched per cast
    pub pool_size: usize,
    pub sheet: SheetLayout,
    /// Pixels moved per tick
    pub velocity: IVec2,
    pub name: &'static str,
}

impl SpellKind {
    pub const ALL: [SpellKind; 3] = [SpellKind::Fireball, SpellKind::Whirlwind, SpellKind::Ghost];

    pub const fn stats(self) -> SpellStats {
        use crate::consts::kingdom::MAP_HEIGHT;
        match self {
            SpellKind::Fireball => SpellStats {
                cost: 5,
                hotkey: '1',
                icon_pos: IVec2::new(100, MAP_HEIGHT + 30),
                pool_size: 4,
                sheet: SheetLayout::row(16, 48, 6),
                velocity: IVec2::new(0, 5),
                name: "Fireball",
            },
            SpellKind::Whirlwind => SpellStats {
                cost: 8,
                hotkey: '2',
                icon_pos: IVec2::new(170, MAP_HEIGHT + 30),
                pool_size: 1,
                sheet: SheetLayout::row(29, 32, 2),
                velocity: IVec2::new(-10, 0),
                name: "Whirlwind",
            },
            SpellKind::Ghost => SpellStats {
                cost: 10,
                hotkey: '3',
                icon_pos: IVec2::new(240, MAP_HEIGHT + 30),
                pool_size: 6,
                sheet: SheetLayout::row(32, 32, 2),
                velocity: IVec2::new(12, 0),
                name: "Summon Ghost",
            },
        }
    }

    pub fn from_hotkey(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.stats().hotkey == key)
    }
}

/// Gem sprite sheet
pub const GEM_SHEET: SheetLayout = SheetLayout::row(18, 32, 6);

/// Fireball damage per monster hit
pub const FIREBALL_DAMAGE: u32 = 3;
/// Whirlwinds destroy monsters with at most this much life
pub const WHIRLWIND_MAX_LIFE: u32 = 5;
/// Pixels a ghost pushes a monster back
pub const GHOST_PUSHBACK: i32 = 140;
/// One random gem appears when a roll in `0..=GEM_SPAWN_ODDS` hits the top
pub const GEM_SPAWN_ODDS: u32 = 150;
