//! Fixed timestep Demon Kingdom tick

use glam::IVec2;

use super::state::{KingdomPhase, KingdomWorld, SpellKind};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct KingdomInput {
    /// Mouse click in window pixels
    pub click: Option<IVec2>,
    /// Character key pressed (spell hotkeys)
    pub hotkey: Option<char>,
    /// Esc
    pub exit: bool,
}

/// Advance the game by one fixed timestep
pub fn tick(world: &mut KingdomWorld, input: &KingdomInput) {
    if input.exit {
        world.exit_requested = true;
        return;
    }

    match world.phase {
        KingdomPhase::Story { script, y } => {
            // The frame at `y` has been shown; scroll only if the text is still below the top
            if input.click.is_some() || y <= 0 {
                world.finish_story(script);
            } else {
                world.phase = KingdomPhase::Story { script, y: y - 1 };
            }
        }
        KingdomPhase::Card { card, ticks_left } => {
            if ticks_left <= 1 {
                world.finish_card(card);
            } else {
                world.phase = KingdomPhase::Card {
                    card,
                    ticks_left: ticks_left - 1,
                };
            }
        }
        KingdomPhase::Playing => {
            if let Some(kind) = input.hotkey.and_then(SpellKind::from_hotkey) {
                world.cast(kind);
            }
            if let Some(point) = input.click {
                world.click(point);
            }
            world.update();
        }
        KingdomPhase::GameOver { .. } => {
            if input.click.is_some() {
                log::info!("Demon Kingdom: new run");
                world.restart();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::kingdom::TITLE_CARD_TICKS;
    use crate::sim::kingdom::story::Script;
    use crate::sim::kingdom::state::{KingdomEvent, TitleCard, Wave};

    fn click() -> KingdomInput {
        KingdomInput {
            click: Some(IVec2::new(300, 200)),
            ..Default::default()
        }
    }

    #[test]
    fn test_intro_and_help_skip_to_level_one() {
        let mut world = KingdomWorld::new(7);
        tick(&mut world, &KingdomInput::default());
        assert!(matches!(
            world.phase,
            KingdomPhase::Story {
                script: Script::Intro,
                y: 562
            }
        ));

        tick(&mut world, &click());
        assert!(matches!(
            world.phase,
            KingdomPhase::Story {
                script: Script::Help,
                ..
            }
        ));

        tick(&mut world, &click());
        assert!(matches!(
            world.phase,
            KingdomPhase::Card {
                card: TitleCard::Level(1),
                ..
            }
        ));
        assert!(world.drain_events().contains(&KingdomEvent::LevelStarted(1)));
    }

    #[test]
    fn test_story_scrolls_off_by_itself() {
        let mut world = KingdomWorld::new(7);
        for _ in 0..Script::Intro.start_y() {
            tick(&mut world, &KingdomInput::default());
        }
        // The last line still gets a frame at the very top
        assert_eq!(
            world.phase,
            KingdomPhase::Story {
                script: Script::Intro,
                y: 0
            }
        );

        tick(&mut world, &KingdomInput::default());
        assert!(matches!(
            world.phase,
            KingdomPhase::Story {
                script: Script::Help,
                ..
            }
        ));
    }

    #[test]
    fn test_card_releases_random_wave() {
        let mut world = KingdomWorld::new(7);
        world.restart();
        for _ in 0..TITLE_CARD_TICKS {
            assert!(world.monsters.is_empty());
            tick(&mut world, &KingdomInput::default());
        }
        assert_eq!(world.phase, KingdomPhase::Playing);
        assert_eq!(world.wave, Wave::Random);
        assert!(world.monsters.len() >= 10);
    }

    #[test]
    fn test_hotkey_casts_when_affordable() {
        let mut world = KingdomWorld::new(7);
        world.phase = KingdomPhase::Playing;
        world.monsters = super::super::waves::random_wave(1, &mut world.rng);
        world.gems_held = 8;
        let input = KingdomInput {
            hotkey: Some('2'),
            ..Default::default()
        };
        tick(&mut world, &input);
        assert_eq!(world.gems_held, 0);
        assert!(
            world
                .drain_events()
                .contains(&KingdomEvent::SpellCast(SpellKind::Whirlwind))
        );

        let input = KingdomInput {
            hotkey: Some('x'),
            ..Default::default()
        };
        tick(&mut world, &input);
        assert!(world.drain_events().iter().all(|e| !matches!(e, KingdomEvent::SpellCast(_))));
    }

    #[test]
    fn test_click_after_game_over_restarts() {
        let mut world = KingdomWorld::new(7);
        world.level = 3;
        world.phase = KingdomPhase::GameOver { won: false };
        tick(&mut world, &KingdomInput::default());
        assert_eq!(world.phase, KingdomPhase::GameOver { won: false });

        tick(&mut world, &click());
        assert_eq!(world.level, 1);
        assert!(matches!(world.phase, KingdomPhase::Card { .. }));
    }

    #[test]
    fn test_escape_exits() {
        let mut world = KingdomWorld::new(7);
        let input = KingdomInput {
            exit: true,
            ..Default::default()
        };
        tick(&mut world, &input);
        assert!(world.exit_requested);
    }

    #[test]
    fn test_determinism() {
        let mut a = KingdomWorld::new(2024);
        let mut b = KingdomWorld::new(2024);
        a.restart();
        b.restart();

        for i in 0..400 {
            let input = if i % 7 == 0 { click() } else { KingdomInput::default() };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.monsters, b.monsters);
        assert_eq!(a.gems, b.gems);
        assert_eq!(a.gems_held, b.gems_held);
    }
}
