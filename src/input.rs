//! Keyboard and pointer handling for the host window.
//!
//! Raw winit events are folded into [`Input`], which turns key presses into
//! [`Command`]s and keeps the pointer state needed for camera dragging and
//! pointer attraction.
//!
//! | Key | Command |
//! |-----|---------|
//! | Space | play / pause |
//! | 1 / 2 / 3 | slow / normal / fast |
//! | H | toggle heat map |
//! | + / - (or scroll) | camera closer / farther |
//! | P | next particle species |
//! | R | reset |
//! | Tab | next scene |
//! | Esc | quit |

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::time::TimeScale;

/// A host-level action triggered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePlay,
    SetTimeScale(TimeScale),
    ToggleHeatmap,
    ZoomIn,
    ZoomOut,
    CycleSpecies,
    Reset,
    NextScene,
    Quit,
}

pub fn command_for_key(key: KeyCode) -> Option<Command> {
    let command = match key {
        KeyCode::Space => Command::TogglePlay,
        KeyCode::Digit1 | KeyCode::Numpad1 => Command::SetTimeScale(TimeScale::Slow),
        KeyCode::Digit2 | KeyCode::Numpad2 => Command::SetTimeScale(TimeScale::Normal),
        KeyCode::Digit3 | KeyCode::Numpad3 => Command::SetTimeScale(TimeScale::Fast),
        KeyCode::KeyH => Command::ToggleHeatmap,
        KeyCode::Equal | KeyCode::NumpadAdd => Command::ZoomIn,
        KeyCode::Minus | KeyCode::NumpadSubtract => Command::ZoomOut,
        KeyCode::KeyP => Command::CycleSpecies,
        KeyCode::KeyR => Command::Reset,
        KeyCode::Tab => Command::NextScene,
        KeyCode::Escape => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Pointer and keyboard state between frames.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    dragging: bool,
    pointer: Option<Vec2>,
    drag_delta: Vec2,
    scroll_delta: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer position in surface pixels, `None` once it leaves the window.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Drag movement accumulated since the last call.
    pub fn take_drag(&mut self) -> Vec2 {
        std::mem::take(&mut self.drag_delta)
    }

    /// Scroll accumulated since the last call; positive is away from the user.
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll_delta)
    }

    /// Process a winit window event, returning the command it triggers.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<Command> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                self.key(code, event.state == ElementState::Pressed)
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.button(*state == ElementState::Pressed);
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
                None
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor_left();
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                None
            }
            _ => None,
        }
    }

    /// A key went down or up. Held keys do not repeat their command.
    pub(crate) fn key(&mut self, code: KeyCode, pressed: bool) -> Option<Command> {
        if !pressed {
            self.keys_held.remove(&code);
            return None;
        }
        if !self.keys_held.insert(code) {
            return None;
        }
        command_for_key(code)
    }

    pub(crate) fn button(&mut self, pressed: bool) {
        self.dragging = pressed;
    }

    pub(crate) fn cursor_moved(&mut self, position: Vec2) {
        if let (true, Some(last)) = (self.dragging, self.pointer) {
            self.drag_delta += position - last;
        }
        self.pointer = Some(position);
    }

    pub(crate) fn cursor_left(&mut self) {
        self.pointer = None;
        self.dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(command_for_key(KeyCode::Space), Some(Command::TogglePlay));
        assert_eq!(
            command_for_key(KeyCode::Digit3),
            Some(Command::SetTimeScale(TimeScale::Fast))
        );
        assert_eq!(command_for_key(KeyCode::KeyH), Some(Command::ToggleHeatmap));
        assert_eq!(command_for_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn held_key_fires_once() {
        let mut input = Input::new();
        assert_eq!(input.key(KeyCode::KeyR, true), Some(Command::Reset));
        assert_eq!(input.key(KeyCode::KeyR, true), None);
        assert_eq!(input.key(KeyCode::KeyR, false), None);
        assert_eq!(input.key(KeyCode::KeyR, true), Some(Command::Reset));
    }

    #[test]
    fn drag_accumulates_only_while_pressed() {
        let mut input = Input::new();
        input.cursor_moved(Vec2::new(10.0, 10.0));
        input.cursor_moved(Vec2::new(20.0, 10.0));
        assert_eq!(input.take_drag(), Vec2::ZERO);

        input.button(true);
        input.cursor_moved(Vec2::new(25.0, 12.0));
        input.cursor_moved(Vec2::new(30.0, 14.0));
        assert_eq!(input.take_drag(), Vec2::new(10.0, 4.0));
        assert_eq!(input.take_drag(), Vec2::ZERO);
    }

    #[test]
    fn leaving_window_clears_pointer() {
        let mut input = Input::new();
        input.button(true);
        input.cursor_moved(Vec2::new(5.0, 5.0));
        input.cursor_left();
        assert_eq!(input.pointer(), None);

        // The drag ended with the pointer; coming back does not resume it.
        input.take_drag();
        input.cursor_moved(Vec2::new(9.0, 9.0));
        input.cursor_moved(Vec2::new(20.0, 20.0));
        assert_eq!(input.take_drag(), Vec2::ZERO);
    }
}
