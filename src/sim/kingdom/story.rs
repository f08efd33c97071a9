//! Scrolling story screens and title card text

use serde::{Deserialize, Serialize};

use crate::consts::kingdom::{STORY_LINE_HEIGHT, WINDOW_HEIGHT};

pub const SKIP_HINT: &str = "(click anywhere to skip)";
pub const FINAL_WAVE_TITLE: &str = "Now for the final wave...";
pub const WIN_TEXT: &str = "You Win!";
pub const LOSE_TEXT: &str = "You Lose!";

const INTRO: &[&str] = &[
    SKIP_HINT,
    "The Demon of Gar-noth has risen.",
    "The whole land is in danger!",
    "You must defeat the demon and his forces.",
];

const HELP: &[&str] = &[
    SKIP_HINT,
    "Click on creatures to attack them.",
    "Collect gems to cast spells.",
    "To cast a spell either click the icon",
    "or use their hot keys:",
    "1 - Fireball, 2 - Whirlwind, 3 - Summon Ghost.",
    "Don't let any of the monsters get off",
    "the edge of the screen.",
];

const DEMON_SLAIN: &[&str] = &[
    SKIP_HINT,
    "You have defeated The Demon of Gar-noth!",
    "His forces are destroyed.",
    "But you know the land is still in danger...",
    "The Demon Lord has heard about the defeat",
    "of The Demon of Gar-noth.",
    "Knowing this you set out to the land of demons,",
    "to destroy the demons once and for all.",
];

const DEMON_LORD_SLAIN: &[&str] = &[
    SKIP_HINT,
    "Once again you have defeated your enemy!",
    "You are now the hero of the land!",
];

/// The text screens that scroll up between levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Script {
    /// Opening story
    Intro,
    /// Controls
    Help,
    /// After the final wave of level IV
    DemonSlain,
    /// After the final wave of level VI; the game is won
    DemonLordSlain,
}

impl Script {
    pub fn lines(self) -> &'static [&'static str] {
        match self {
            Script::Intro => INTRO,
            Script::Help => HELP,
            Script::DemonSlain => DEMON_SLAIN,
            Script::DemonLordSlain => DEMON_LORD_SLAIN,
        }
    }

    /// Baseline of the last line when the screen starts (just below the window)
    pub fn start_y(self) -> i32 {
        let extra = match self {
            Script::Intro => 26 * 3,
            Script::Help => 26 * 7,
            Script::DemonSlain => 27 * 6,
            Script::DemonLordSlain => 27 * 2,
        };
        WINDOW_HEIGHT + extra + 5
    }

    /// Each line with its y coordinate while the last line sits at `y`
    pub fn layout(self, y: i32) -> impl Iterator<Item = (i32, &'static str)> {
        let lines = self.lines();
        let last = lines.len() as i32 - 1;
        lines
            .iter()
            .enumerate()
            .map(move |(i, line)| (y - STORY_LINE_HEIGHT * (last - i as i32), *line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_start_below_window() {
        for script in [
            Script::Intro,
            Script::Help,
            Script::DemonSlain,
            Script::DemonLordSlain,
        ] {
            let first_line = script.layout(script.start_y()).next().unwrap();
            assert!(first_line.0 > 0, "{:?} starts off screen", script);
            assert_eq!(first_line.1, SKIP_HINT);
        }
        assert_eq!(Script::Intro.start_y(), 563);
        assert_eq!(Script::Help.start_y(), 667);
    }

    #[test]
    fn test_layout_spacing() {
        let ys: Vec<i32> = Script::Intro.layout(100).map(|(y, _)| y).collect();
        assert_eq!(ys, vec![22, 48, 74, 100]);
    }
}
