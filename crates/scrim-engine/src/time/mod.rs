//! Frame timing. A driver loop ticks a [`FrameClock`] once per iteration and
//! feeds the resulting delta into `Io::delta_time` before `new_frame`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
