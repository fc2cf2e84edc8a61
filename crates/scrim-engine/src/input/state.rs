use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{InputEvent, Key, MouseButton};

pub const MOUSE_BUTTON_COUNT: usize = 5;

/// Current input state, updated by draining the event queue at `new_frame`.
///
/// Holds "is down" information plus the per-frame accumulators (wheel,
/// character stream) that the context clears at `end_frame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Pointer position in the draw coordinate space; `None` while the
    /// pointer is off-surface.
    pub mouse_pos: Option<Vec2>,
    pub mouse_down: [bool; MOUSE_BUTTON_COUNT],
    /// Wheel ticks accumulated since the last `end_frame`.
    pub mouse_wheel: Vec2,
    /// Committed characters received since the last `end_frame`.
    pub chars: Vec<char>,
    pub keys_down: HashSet<Key>,
    pub focused: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one queued event. Events must be applied in queue order so
    /// same-frame press/release pairs keep both transitions.
    pub fn apply_event(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::MousePos(pos) => {
                self.mouse_pos = Some(pos);
            }
            InputEvent::MouseLeft => {
                self.mouse_pos = None;
            }
            InputEvent::MouseButton { button, down } => {
                self.mouse_down[button.index()] = down;
            }
            InputEvent::MouseWheel(delta) => {
                self.mouse_wheel = self.mouse_wheel + delta;
            }
            InputEvent::Key { key, down } => {
                if down {
                    self.keys_down.insert(key);
                } else {
                    self.keys_down.remove(&key);
                }
            }
            InputEvent::Char(c) => {
                self.chars.push(c);
            }
            InputEvent::Focus(focused) => {
                self.focused = focused;
                if !focused {
                    // On focus loss, release everything. Avoids stuck
                    // keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.mouse_down = [false; MOUSE_BUTTON_COUNT];
                }
            }
        }
    }

    /// Clears the per-frame accumulators. Down-state persists across frames.
    pub fn clear_frame_accumulators(&mut self) {
        self.mouse_wheel = Vec2::zero();
        self.chars.clear();
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.mouse_down[button.index()]
    }
}
