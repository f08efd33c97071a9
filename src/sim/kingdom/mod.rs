//! Demon Kingdom: defend the right edge of the map against waves of monsters
//!
//! Click monsters to hit them, collect the gems they drop and spend gems on
//! spells. Each of the six levels is a random wave followed by a fixed final
//! wave.

pub mod state;
pub mod story;
pub mod tick;
pub mod waves;

pub use state::{
    Animation, Gem, KingdomEvent, KingdomPhase, KingdomWorld, Monster, MonsterKind, SpellEffect,
    SpellKind, TitleCard, Wave, spell_icon_rect,
};
pub use story::Script;
pub use tick::{KingdomInput, tick};
