use crate::coords::Vec2;
use crate::input::{InputEvent, InputState, Key, MouseButton};

/// Runtime configuration and input surface of a context.
///
/// The application writes the configuration fields (display size, delta
/// time, backend flags) before `new_frame`, queues input through the
/// `add_*_event` methods at any time, and reads `state` plus the metrics
/// after the frame.
#[derive(Debug)]
pub struct Io {
    /// Time since the last frame, in seconds. Must be > 0 from the second
    /// frame on; a [`FrameClock`](crate::time::FrameClock) guarantees that.
    pub delta_time: f32,
    /// Size of the main viewport, in draw coordinates. Must be >= 0.
    pub display_size: Vec2,
    /// Draw-coordinate-to-framebuffer-pixel scale of the main viewport.
    pub display_framebuffer_scale: Vec2,

    /// Set by backends that honor `DrawCmd::vtx_offset`; lets draw lists
    /// grow past 64K vertices with 16-bit indices.
    pub backend_renderer_has_vtx_offset: bool,

    /// While false, `add_*_event` calls are dropped. Backends clear this
    /// around shutdown so late window-system events don't queue up.
    pub app_accepting_events: bool,

    /// Input state as of the last `new_frame` drain.
    pub state: InputState,

    // Written by `render`.
    pub metrics_render_vertices: usize,
    pub metrics_render_indices: usize,
    /// Live `Buffer` allocations, mirrored from the process-wide counter at
    /// `new_frame`.
    pub metrics_active_allocations: isize,

    events: Vec<InputEvent>,
}

impl Io {
    pub fn new() -> Self {
        Self {
            delta_time: 1.0 / 60.0,
            display_size: Vec2::zero(),
            display_framebuffer_scale: Vec2::splat(1.0),
            backend_renderer_has_vtx_offset: false,
            app_accepting_events: true,
            state: InputState::new(),
            metrics_render_vertices: 0,
            metrics_render_indices: 0,
            metrics_active_allocations: 0,
            events: Vec::new(),
        }
    }

    // ── event intake ──────────────────────────────────────────────────────

    pub fn add_event(&mut self, ev: InputEvent) {
        if !self.app_accepting_events {
            return;
        }
        self.events.push(ev);
    }

    pub fn add_mouse_pos_event(&mut self, pos: Vec2) {
        self.add_event(InputEvent::MousePos(pos));
    }

    pub fn add_mouse_left_event(&mut self) {
        self.add_event(InputEvent::MouseLeft);
    }

    pub fn add_mouse_button_event(&mut self, button: MouseButton, down: bool) {
        self.add_event(InputEvent::MouseButton { button, down });
    }

    pub fn add_mouse_wheel_event(&mut self, delta: Vec2) {
        self.add_event(InputEvent::MouseWheel(delta));
    }

    pub fn add_key_event(&mut self, key: Key, down: bool) {
        self.add_event(InputEvent::Key { key, down });
    }

    pub fn add_char_event(&mut self, c: char) {
        self.add_event(InputEvent::Char(c));
    }

    pub fn add_focus_event(&mut self, focused: bool) {
        self.add_event(InputEvent::Focus(focused));
    }

    /// Number of events waiting for the next `new_frame`.
    pub fn queued_events(&self) -> usize {
        self.events.len()
    }

    /// Applies the queued events to `state` in queue order.
    pub(crate) fn drain_events(&mut self) {
        for ev in self.events.drain(..) {
            self.state.apply_event(ev);
        }
    }
}

impl Default for Io {
    fn default() -> Self {
        Self::new()
    }
}
