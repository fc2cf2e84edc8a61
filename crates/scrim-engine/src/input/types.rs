use crate::coords::Vec2;

/// Keyboard key identifier.
///
/// Intentionally minimal: the frame machine only tracks down/up state, it
/// does not do text editing or navigation. Backends map platform keycodes
/// into these variants and use `Key::Unknown` with a stable platform code
/// for the rest.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,
    Delete,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Super,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

/// Mouse button identifier. `index()` addresses the fixed per-button state
/// array in [`InputState`](super::InputState).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

impl MouseButton {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Input events queued by the backend and drained at `new_frame`.
///
/// Events are applied in queue order, so a press and release of the same
/// button queued within one frame still produces both transitions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse moved, position in the draw coordinate space.
    MousePos(Vec2),
    /// Mouse left the surface; position becomes unknown.
    MouseLeft,
    MouseButton { button: MouseButton, down: bool },
    /// Wheel ticks; accumulates over the frame, cleared at `end_frame`.
    MouseWheel(Vec2),
    Key { key: Key, down: bool },
    /// Committed text input; queued per frame, cleared at `end_frame`.
    Char(char),
    /// Surface focus change.
    Focus(bool),
}
