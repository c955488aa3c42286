//! Keyboard and touch input state
//!
//! Event handlers record raw state here; the frame loop converts it into one
//! `TickInput` per simulation tick.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

const LEFT: [&str; 2] = ["a", "arrowleft"];
const RIGHT: [&str; 2] = ["d", "arrowright"];
const UP: [&str; 2] = ["w", "arrowup"];
const DOWN: [&str; 2] = ["s", "arrowdown"];
const FIRE: &str = " ";
const PAUSE: &str = "escape";

/// An active touch drag on the virtual joystick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchDrag {
    pub start: Vec2,
    pub current: Vec2,
}

impl TouchDrag {
    pub fn delta(&self) -> Vec2 {
        self.current - self.start
    }
}

/// Accumulated input between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Held keys, lowercase `KeyboardEvent.key` names
    held: HashSet<String>,
    touch: Option<TouchDrag>,
    /// Fire button tapped since the last tick
    fire_tapped: bool,
    /// Escape pressed since the last tick
    pause_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns true if the key is used by the game
    /// (callers suppress the browser default for those).
    pub fn key_down(&mut self, key: &str) -> bool {
        let key = key.to_lowercase();
        if key == PAUSE {
            self.pause_requested = true;
        }
        let used = is_game_key(&key);
        self.held.insert(key);
        used
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    fn any_held(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }

    pub fn touch_start(&mut self, pos: Vec2) {
        self.touch = Some(TouchDrag {
            start: pos,
            current: pos,
        });
    }

    pub fn touch_move(&mut self, pos: Vec2) {
        if let Some(touch) = &mut self.touch {
            touch.current = pos;
        }
    }

    pub fn touch_end(&mut self) {
        self.touch = None;
    }

    /// Mobile fire button
    pub fn tap_fire(&mut self) {
        self.fire_tapped = true;
    }

    /// Drop everything held, e.g. when the window loses focus
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Horizontal and vertical key direction; left and up win over right and down
    pub fn key_axis(&self) -> Vec2 {
        let x = if self.any_held(&LEFT) {
            -1.0
        } else if self.any_held(&RIGHT) {
            1.0
        } else {
            0.0
        };
        let y = if self.any_held(&UP) {
            -1.0
        } else if self.any_held(&DOWN) {
            1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    }

    /// Build the command for the next tick, consuming one-shot presses.
    /// While dragging, keyboard fire is ignored and only the fire button shoots.
    pub fn take_tick_input(&mut self) -> TickInput {
        let drag = self.touch.map(|t| t.delta());
        let fire = self.fire_tapped || (drag.is_none() && self.is_held(FIRE));
        let input = TickInput {
            axis: self.key_axis(),
            drag,
            fire,
            pause: self.pause_requested,
        };
        self.fire_tapped = false;
        self.pause_requested = false;
        input
    }
}

/// Keys whose browser default (scrolling) should be suppressed
pub fn is_game_key(key: &str) -> bool {
    key == FIRE
        || key == PAUSE
        || LEFT.contains(&key)
        || RIGHT.contains(&key)
        || UP.contains(&key)
        || DOWN.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_axis() {
        let mut input = InputState::new();
        assert_eq!(input.key_axis(), Vec2::ZERO);

        input.key_down("ArrowRight");
        input.key_down("w");
        assert_eq!(input.key_axis(), Vec2::new(1.0, -1.0));

        // Left wins over right
        input.key_down("A");
        assert_eq!(input.key_axis().x, -1.0);

        input.key_up("a");
        input.key_up("arrowright");
        assert_eq!(input.key_axis().x, 0.0);
    }

    #[test]
    fn test_space_fires_while_held() {
        let mut input = InputState::new();
        assert!(input.key_down(" "));
        assert!(input.take_tick_input().fire);
        assert!(input.take_tick_input().fire);
        input.key_up(" ");
        assert!(!input.take_tick_input().fire);
    }

    #[test]
    fn test_escape_is_one_shot() {
        let mut input = InputState::new();
        input.key_down("Escape");
        assert!(input.take_tick_input().pause);
        assert!(!input.take_tick_input().pause);
    }

    #[test]
    fn test_touch_drag_delta() {
        let mut input = InputState::new();
        input.touch_start(Vec2::new(50.0, 50.0));
        input.touch_move(Vec2::new(80.0, 40.0));
        let tick = input.take_tick_input();
        assert_eq!(tick.drag, Some(Vec2::new(30.0, -10.0)));

        input.touch_end();
        assert_eq!(input.take_tick_input().drag, None);
    }

    #[test]
    fn test_drag_ignores_keyboard_fire() {
        let mut input = InputState::new();
        input.key_down(" ");
        input.touch_start(Vec2::ZERO);
        assert!(!input.take_tick_input().fire);

        input.tap_fire();
        assert!(input.take_tick_input().fire);
        assert!(!input.take_tick_input().fire);
    }

    #[test]
    fn test_game_keys() {
        assert!(is_game_key("arrowdown"));
        assert!(is_game_key(" "));
        assert!(!is_game_key("q"));
    }
}
