//! Square Shooter: an Asteroids-like game on a wrapping unit square
//!
//! The player's ship thrusts toward the mouse while the button is held and
//! fires at the click. Bubbles split when shot; small ones sometimes leave
//! power-ups behind.

pub mod state;
pub mod tick;

pub use state::{
    Bubble, BubbleKind, Bullet, Explosion, Powerup, PowerupKind, PowerupTimers, Ship,
    ShooterEvent, ShooterPhase, ShooterWorld,
};
pub use tick::{TickInput, tick};
