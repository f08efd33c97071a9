//! Platform-neutral input events
//!
//! The web front end builds these from DOM events, the native one from
//! winit. Pointer positions are in logical window pixels.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable key, lower-cased
    Char(char),
    Escape,
    Other,
}

impl Key {
    /// From a DOM `KeyboardEvent.key` string
    pub fn from_web(key: &str) -> Self {
        if key == "Escape" {
            return Key::Escape;
        }
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
            _ => Key::Other,
        }
    }

    /// From the text a native key press produced
    pub fn from_text(text: &str) -> Self {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown(Vec2),
    PointerUp(Vec2),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_keys() {
        assert_eq!(Key::from_web("Escape"), Key::Escape);
        assert_eq!(Key::from_web("P"), Key::Char('p'));
        assert_eq!(Key::from_web("1"), Key::Char('1'));
        assert_eq!(Key::from_web("Shift"), Key::Other);
        assert_eq!(Key::from_web(""), Key::Other);
    }

    #[test]
    fn test_text_keys() {
        assert_eq!(Key::from_text("q"), Key::Char('q'));
        assert_eq!(Key::from_text("ab"), Key::Other);
    }
}
