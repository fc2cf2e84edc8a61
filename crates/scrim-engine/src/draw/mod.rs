//! Draw-command batching: vertices, commands, lists, and the per-viewport
//! draw-data composition consumed by renderer backends.

mod cmd;
mod data;
mod list;
mod shared;
mod vert;

pub use cmd::{DrawCallback, DrawCmd, DrawCmdHeader, TextureId};
pub use data::{DrawData, DrawDataBuilder, DrawLayer, DrawListId, LAYER_COUNT};
pub use list::{DrawList, DrawListFlags};
pub use shared::{DrawListSharedData, ARC_FAST_SAMPLE_MAX};
pub use vert::{col32, DrawIdx, DrawVert, COL32_A_MASK, COL32_WHITE};
