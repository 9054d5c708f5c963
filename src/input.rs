//! Input events, sources, and per-frame state tracking.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// A platform input event, already translated out of the windowing layer.
///
/// Key and button identifiers reuse winit's types; the embedding runtime is
/// expected to map its native events into these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The user asked to close the window.
    CloseRequested,
    Key { code: KeyCode, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool },
    MouseMoved(Vec2),
    Scroll(Vec2),
}

/// Where input events come from.
///
/// Polled exactly once per frame by the runtime loop. The absolute-state
/// queries exist for collaborators that want the platform's view directly
/// rather than the event-derived [`Input`] tracker.
pub trait InputSource {
    /// Drain all events that arrived since the last poll.
    fn poll(&mut self) -> Vec<Event>;

    /// Current pointer position in window coordinates.
    fn mouse_position(&self) -> Vec2;

    /// Whether a mouse button is currently held.
    fn mouse_down(&self, button: MouseButton) -> bool;

    /// Whether a key is currently held.
    fn key_down(&self, key: KeyCode) -> bool;
}

/// Tracks input state for keyboard and mouse across a frame.
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    mouse_buttons_down: HashSet<MouseButton>,
    mouse_buttons_pressed: HashSet<MouseButton>,
    mouse_buttons_released: HashSet<MouseButton>,
    mouse_position: Vec2,
    mouse_delta: Vec2,
    scroll_delta: Vec2,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            keys_released: HashSet::new(),
            mouse_buttons_down: HashSet::new(),
            mouse_buttons_pressed: HashSet::new(),
            mouse_buttons_released: HashSet::new(),
            mouse_position: Vec2::ZERO,
            mouse_delta: Vec2::ZERO,
            scroll_delta: Vec2::ZERO,
        }
    }
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_buttons_pressed.clear();
        self.mouse_buttons_released.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    /// Fold one event into the frame's state.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key { code, pressed } => {
                if *pressed {
                    if !self.keys_down.contains(code) {
                        self.keys_pressed.insert(*code);
                    }
                    self.keys_down.insert(*code);
                } else {
                    self.keys_down.remove(code);
                    self.keys_released.insert(*code);
                }
            }
            Event::MouseButton { button, pressed } => {
                if *pressed {
                    if !self.mouse_buttons_down.contains(button) {
                        self.mouse_buttons_pressed.insert(*button);
                    }
                    self.mouse_buttons_down.insert(*button);
                } else {
                    self.mouse_buttons_down.remove(button);
                    self.mouse_buttons_released.insert(*button);
                }
            }
            Event::MouseMoved(position) => {
                self.mouse_delta += *position - self.mouse_position;
                self.mouse_position = *position;
            }
            Event::Scroll(delta) => {
                self.scroll_delta += *delta;
            }
            Event::CloseRequested => {}
        }
    }

    /// Overwrite the pointer position with the source's absolute reading.
    ///
    /// Called once per pump after events are folded in, so the tracker can't
    /// drift from the platform between move events.
    pub fn sync_pointer(&mut self, position: Vec2) {
        self.mouse_position = position;
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Returns true if the mouse button is currently held down.
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button)
    }

    /// Returns true if the mouse button was pressed this frame.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons_pressed.contains(&button)
    }

    /// Returns true if the mouse button was released this frame.
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_buttons_released.contains(&button)
    }

    /// Current mouse position in window coordinates.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Mouse movement delta this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll wheel delta this frame.
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_edges_last_one_frame() {
        let mut input = Input::new();
        input.handle_event(&Event::Key {
            code: KeyCode::Space,
            pressed: true,
        });
        assert!(input.key_pressed(KeyCode::Space));
        assert!(input.key_down(KeyCode::Space));

        input.begin_frame();
        assert!(!input.key_pressed(KeyCode::Space));
        assert!(input.key_down(KeyCode::Space));

        input.handle_event(&Event::Key {
            code: KeyCode::Space,
            pressed: false,
        });
        assert!(input.key_released(KeyCode::Space));
        assert!(!input.key_down(KeyCode::Space));
    }

    #[test]
    fn repeated_press_events_do_not_retrigger() {
        let mut input = Input::new();
        input.handle_event(&Event::Key {
            code: KeyCode::KeyW,
            pressed: true,
        });
        input.begin_frame();
        input.handle_event(&Event::Key {
            code: KeyCode::KeyW,
            pressed: true,
        });
        assert!(!input.key_pressed(KeyCode::KeyW));
    }

    #[test]
    fn mouse_delta_accumulates_within_a_frame() {
        let mut input = Input::new();
        input.handle_event(&Event::MouseMoved(Vec2::new(10.0, 0.0)));
        input.handle_event(&Event::MouseMoved(Vec2::new(15.0, 5.0)));
        assert_eq!(input.mouse_delta(), Vec2::new(15.0, 5.0));
        assert_eq!(input.mouse_position(), Vec2::new(15.0, 5.0));

        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn sync_pointer_overrides_event_position() {
        let mut input = Input::new();
        input.handle_event(&Event::MouseMoved(Vec2::new(3.0, 3.0)));
        input.sync_pointer(Vec2::new(7.0, 9.0));
        assert_eq!(input.mouse_position(), Vec2::new(7.0, 9.0));
    }
}
