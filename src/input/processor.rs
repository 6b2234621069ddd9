//! Converts raw platform events into viewer commands.
//!
//! The `InputProcessor` owns the transient input state (last cursor
//! position) and the key-binding map. It is the only thing that sits
//! between raw window events and
//! [`ViewerCommand::apply`](crate::command::ViewerCommand::apply).

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::InputEvent;
use crate::command::ViewerCommand;

/// Maps physical key strings to [`ViewerCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyP"`, `"Escape"`, etc.
///
/// Only parameterless commands make sense as key bindings. Pointer and
/// zoom commands come from the mouse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the subset of [`ViewerCommand`] that can be
/// key-bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Flip between auto-rotation and manual drag rotation.
    TogglePanning,
    /// Close the viewer.
    Quit,
}

impl KeyCommandTag {
    fn to_command(self) -> ViewerCommand {
        match self {
            Self::TogglePanning => ViewerCommand::TogglePanning,
            Self::Quit => ViewerCommand::Quit,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyP".into(), KeyCommandTag::TogglePanning),
            ("Escape".into(), KeyCommandTag::Quit),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<ViewerCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }

    /// Remove the binding for `key`, if any.
    pub fn unbind(&mut self, key: &str) {
        let _ = self.bindings.remove(key);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`ViewerCommand`]s.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// if let Some(cmd) = input.handle_event(event) {
///     cmd.apply(&mut controller);
/// }
///
/// if let Some(cmd) = input.handle_key_press("KeyP") {
///     cmd.apply(&mut controller);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    /// Last observed cursor position, `None` until the first move.
    last_cursor: Option<Vec2>,
    /// Key string → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Last observed cursor position in physical pixels.
    #[must_use]
    pub fn cursor(&self) -> Option<Vec2> {
        self.last_cursor
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.key_bindings
    }

    /// Forget the last cursor position, e.g. when the cursor leaves the
    /// window, so re-entry does not produce a jump.
    pub fn reset_cursor(&mut self) {
        self.last_cursor = None;
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<ViewerCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ViewerCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            // Every button drags, matching a document-wide mousedown.
            InputEvent::MouseButton { pressed: true, .. } => {
                Some(ViewerCommand::PointerDown)
            }
            InputEvent::MouseButton { pressed: false, .. } => {
                Some(ViewerCommand::PointerUp)
            }
            InputEvent::Scroll { delta } => Some(ViewerCommand::Zoom { delta }),
        }
    }

    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<ViewerCommand> {
        let pos = Vec2::new(x, y);
        let previous = self.last_cursor.replace(pos)?;
        let delta = pos - previous;
        if delta == Vec2::ZERO {
            return None;
        }
        Some(ViewerCommand::PointerMoved { delta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;

    #[test]
    fn first_cursor_observation_only_records_position() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 10.0, y: 20.0 }),
            None
        );
        assert_eq!(input.cursor(), Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn cursor_moves_report_deltas() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 10.0, y: 20.0 });
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 20.0, y: 15.0 }),
            Some(ViewerCommand::PointerMoved {
                delta: Vec2::new(10.0, -5.0)
            })
        );
    }

    #[test]
    fn reset_cursor_suppresses_jump() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        input.reset_cursor();
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 400.0, y: 300.0 }),
            None
        );
    }

    #[test]
    fn any_button_drags() {
        let mut input = InputProcessor::new();
        for button in [MouseButton::Left, MouseButton::Right, MouseButton::Middle]
        {
            assert_eq!(
                input.handle_event(InputEvent::MouseButton {
                    button,
                    pressed: true
                }),
                Some(ViewerCommand::PointerDown)
            );
            assert_eq!(
                input.handle_event(InputEvent::MouseButton {
                    button,
                    pressed: false
                }),
                Some(ViewerCommand::PointerUp)
            );
        }
    }

    #[test]
    fn scroll_zooms() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::Scroll { delta: 1.5 }),
            Some(ViewerCommand::Zoom { delta: 1.5 })
        );
    }

    #[test]
    fn rebinding_keys() {
        let mut input = InputProcessor::new();
        input.key_bindings_mut().unbind("KeyP");
        input
            .key_bindings_mut()
            .bind("Space", KeyCommandTag::TogglePanning);
        assert_eq!(input.handle_key_press("KeyP"), None);
        assert_eq!(
            input.handle_key_press("Space"),
            Some(ViewerCommand::TogglePanning)
        );
    }
}
