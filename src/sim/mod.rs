//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the entity lists)
//! - No rendering or platform dependencies

pub mod collision;
pub mod kingdom;
pub mod shooter;

pub use collision::{Rect, circles_overlap, is_outside_unit, wrap_unit};
