//! Fixed timestep Square Shooter tick
//!
//! Applies one frame's worth of input, then advances the world.

use glam::Vec2;

use super::state::{ShooterEvent, ShooterPhase, ShooterWorld};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Mouse button pressed at this map position (unit square)
    pub fire_at: Option<Vec2>,
    /// Mouse button released
    pub release: bool,
    /// P: play from the title screen, otherwise toggle pause
    pub play_pause: bool,
    /// Q: back to the title screen, or exit from it
    pub quit: bool,
    /// Esc
    pub exit: bool,
}

/// Advance the game by one fixed timestep
pub fn tick(world: &mut ShooterWorld, input: &TickInput, dt: f32) {
    if input.exit {
        world.exit_requested = true;
        return;
    }

    if input.quit {
        if world.level == 0 {
            world.exit_requested = true;
        } else {
            log::info!("Square Shooter: back to title");
            let event = ShooterEvent::RunAbandoned {
                score: world.score,
                level: world.level,
            };
            world.end_game();
            world.push_event(event);
        }
        return;
    }

    if input.play_pause {
        match world.phase {
            ShooterPhase::Title => world.start_game(),
            ShooterPhase::Playing => {
                world.phase = ShooterPhase::Paused;
                log::debug!("paused");
            }
            ShooterPhase::Paused => {
                world.phase = ShooterPhase::Playing;
                log::debug!("resumed");
            }
        }
    }

    if let Some(target) = input.fire_at {
        world.fire_at(target);
    }
    if input.release {
        world.release_thrust();
    }

    if world.is_playing() {
        world.update(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::shooter::SIM_DT;
    use crate::tuning::ShooterTuning;

    fn play() -> TickInput {
        TickInput {
            play_pause: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_title_to_playing() {
        let mut world = ShooterWorld::new(12345, ShooterTuning::default());
        assert_eq!(world.level, 0);

        // Nothing moves on the title screen
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.phase, ShooterPhase::Title);
        assert!(world.ship.is_none());

        tick(&mut world, &play(), SIM_DT);
        assert_eq!(world.phase, ShooterPhase::Playing);
        assert_eq!(world.level, 1);
        assert_eq!(world.lives, 1);
        assert_eq!(world.score, 0);
        assert_eq!(world.bubbles.len(), 1);
        assert!(world.drain_events().contains(&ShooterEvent::GameStarted));
    }

    #[test]
    fn test_pause_toggle() {
        let mut world = ShooterWorld::new(1, ShooterTuning::default());
        tick(&mut world, &play(), SIM_DT);

        tick(&mut world, &play(), SIM_DT);
        assert_eq!(world.phase, ShooterPhase::Paused);
        let frozen = world.bubbles[0].pos;
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.bubbles[0].pos, frozen);

        // Firing while paused does nothing
        let fire = TickInput {
            fire_at: Some(Vec2::new(0.9, 0.9)),
            ..Default::default()
        };
        tick(&mut world, &fire, SIM_DT);
        assert!(world.bullets.is_empty());

        tick(&mut world, &play(), SIM_DT);
        assert_eq!(world.phase, ShooterPhase::Playing);
    }

    #[test]
    fn test_fire_and_release() {
        let mut world = ShooterWorld::new(3, ShooterTuning::default());
        tick(&mut world, &play(), SIM_DT);
        // Keep the only bubble out of the way
        world.bubbles[0].pos = Vec2::new(0.05, 0.95);
        world.bubbles[0].vel = Vec2::ZERO;

        let fire = TickInput {
            fire_at: Some(Vec2::new(0.5, 0.1)),
            ..Default::default()
        };
        tick(&mut world, &fire, SIM_DT);
        assert_eq!(world.bullets.len(), 1);
        assert!(world.ship.as_ref().unwrap().accel.y < 0.0);

        let release = TickInput {
            release: true,
            ..Default::default()
        };
        tick(&mut world, &release, SIM_DT);
        assert_eq!(world.ship.as_ref().unwrap().accel, Vec2::ZERO);
    }

    #[test]
    fn test_bullet_cap() {
        let mut world = ShooterWorld::new(3, ShooterTuning::default());
        tick(&mut world, &play(), SIM_DT);
        world.bubbles[0].pos = Vec2::new(0.05, 0.95);
        world.bubbles[0].vel = Vec2::ZERO;

        // Slow bullets so none leave the map during the test
        let fire = TickInput {
            fire_at: Some(Vec2::new(0.52, 0.5)),
            ..Default::default()
        };
        world.tuning.close_shot_boost = 1.0;
        for _ in 0..10 {
            tick(&mut world, &fire, SIM_DT);
        }
        assert_eq!(world.bullets.len(), 6);
    }

    #[test]
    fn test_quit_from_game_then_title() {
        let mut world = ShooterWorld::new(5, ShooterTuning::default());
        tick(&mut world, &play(), SIM_DT);
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        world.score = 40;
        tick(&mut world, &quit, SIM_DT);
        assert_eq!(world.level, 0);
        assert_eq!(world.phase, ShooterPhase::Title);
        assert!(!world.exit_requested);
        assert!(world.drain_events().contains(&ShooterEvent::RunAbandoned {
            score: 40,
            level: 1
        }));

        tick(&mut world, &quit, SIM_DT);
        assert!(world.exit_requested);
    }

    #[test]
    fn test_escape_exits() {
        let mut world = ShooterWorld::new(5, ShooterTuning::default());
        tick(&mut world, &play(), SIM_DT);
        let exit = TickInput {
            exit: true,
            ..Default::default()
        };
        tick(&mut world, &exit, SIM_DT);
        assert!(world.exit_requested);
    }

    #[test]
    fn test_determinism() {
        let mut a = ShooterWorld::new(99999, ShooterTuning::default());
        let mut b = ShooterWorld::new(99999, ShooterTuning::default());

        let inputs = [
            play(),
            TickInput {
                fire_at: Some(Vec2::new(0.2, 0.3)),
                ..Default::default()
            },
            TickInput {
                release: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                fire_at: Some(Vec2::new(0.8, 0.6)),
                ..Default::default()
            },
        ];

        for _ in 0..20 {
            for input in &inputs[1..] {
                tick(&mut a, input, SIM_DT);
                tick(&mut b, input, SIM_DT);
            }
        }
        tick(&mut a, &inputs[0], SIM_DT);
        tick(&mut b, &inputs[0], SIM_DT);
        for _ in 0..120 {
            for input in &inputs[1..] {
                tick(&mut a, input, SIM_DT);
                tick(&mut b, input, SIM_DT);
            }
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.level, b.level);
        assert_eq!(a.bubbles.len(), b.bubbles.len());
        for (x, y) in a.bubbles.iter().zip(&b.bubbles) {
            assert_eq!(x.pos, y.pos);
        }
    }
}
