//! Input state management for mouse and keyboard events.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub const fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

/// Keyboard event carrying a key name ("Control", "Enter", "a", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Tracks buttons, latched modifiers and middle-button panning.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
    /// Currently pressed keys.
    pressed_keys: HashSet<String>,
    /// Modifier keys, latched from key events.
    pub modifiers: Modifiers,
    /// Last screen position of an in-progress middle-button pan.
    pan_anchor: Option<Point>,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    ///
    /// Returns the screen-space pan delta while the middle button is held.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> Option<Vec2> {
        match *event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.insert(button);
                if button == MouseButton::Middle {
                    self.pan_anchor = Some(position);
                }
                None
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.remove(&button);
                if button == MouseButton::Middle {
                    self.pan_anchor = None;
                }
                None
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
                let anchor = self.pan_anchor.as_mut()?;
                let delta = position - *anchor;
                *anchor = position;
                Some(delta)
            }
            PointerEvent::Scroll { position, .. } => {
                self.pointer_position = position;
                None
            }
        }
    }

    /// Process a key event, latching Control/Shift/Alt/Meta.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        let (key, down) = match event {
            KeyEvent::Pressed(key) => (key, true),
            KeyEvent::Released(key) => (key, false),
        };
        match key.as_str() {
            "Control" => self.modifiers.ctrl = down,
            "Shift" => self.modifiers.shift = down,
            "Alt" => self.modifiers.alt = down,
            "Meta" => self.modifiers.meta = down,
            _ => {}
        }
        if down {
            self.pressed_keys.insert(key.clone());
        } else {
            self.pressed_keys.remove(key);
        }
    }

    /// Update modifier keys state from a platform report.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Check if a key is currently pressed.
    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    /// Whether a middle-button pan is in progress.
    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }
}
