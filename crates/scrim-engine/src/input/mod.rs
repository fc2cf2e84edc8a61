//! Platform-agnostic input events and the per-frame state they are drained
//! into. Backends translate window-system events into [`InputEvent`]s; the
//! context queues them and applies the queue at the top of each frame.

mod state;
mod types;

pub use state::{InputState, MOUSE_BUTTON_COUNT};
pub use types::{InputEvent, Key, MouseButton};
