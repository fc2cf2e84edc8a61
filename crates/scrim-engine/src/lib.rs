//! Scrim engine crate.
//!
//! This crate owns the per-frame draw-command batching core: draw lists,
//! per-viewport draw-data composition, and the `new_frame`/`render` lifecycle
//! that external renderer backends are driven by.

pub mod alloc;
pub mod buffer;
pub mod storage;

pub mod coords;
pub mod draw;

pub mod atlas;
pub mod context;
pub mod input;
pub mod viewport;

pub mod logging;
pub mod time;
