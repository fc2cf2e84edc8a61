use crate::coords::Rect;

use super::list::DrawList;

/// Opaque texture handle, forwarded untouched to the renderer backend.
pub type TextureId = u64;

/// User callback carried by a draw command. The renderer must invoke it
/// instead of rendering the command's triangles; `DrawCmd::user_data` is
/// passed through for the callback's own use.
pub type DrawCallback = fn(draw_list: &DrawList, cmd: &DrawCmd);

/// State a draw command is opened with: the part of a command that decides
/// whether new geometry can be appended to it or needs a fresh command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCmdHeader {
    pub clip_rect: Rect,
    pub texture_id: TextureId,
    pub vtx_offset: u32,
}

impl Default for DrawCmdHeader {
    fn default() -> Self {
        Self {
            clip_rect: Rect::from_coords(0.0, 0.0, 0.0, 0.0),
            texture_id: 0,
            vtx_offset: 0,
        }
    }
}

/// One GPU draw call (or one callback invocation).
///
/// `elem_count` indices are consumed starting at `idx_offset`; each index is
/// relative to `vtx_offset` within the list's vertex buffer. `elem_count` is
/// always a multiple of 3 (triangle-list topology).
#[derive(Debug, Copy, Clone)]
pub struct DrawCmd {
    /// Scissor rectangle in viewport absolute coordinates.
    pub clip_rect: Rect,
    pub texture_id: TextureId,
    /// Nonzero only when the backend advertised vertex-offset support.
    pub vtx_offset: u32,
    pub idx_offset: u32,
    pub elem_count: u32,
    pub callback: Option<DrawCallback>,
    pub user_data: usize,
}

impl DrawCmd {
    /// Opens a fresh, empty command carrying `header`, with indices starting
    /// at `idx_offset`.
    pub fn with_header(header: &DrawCmdHeader, idx_offset: u32) -> Self {
        Self {
            clip_rect: header.clip_rect,
            texture_id: header.texture_id,
            vtx_offset: header.vtx_offset,
            idx_offset,
            elem_count: 0,
            callback: None,
            user_data: 0,
        }
    }

    /// True when this command was opened under exactly `header`
    /// (clip rect, texture, vertex offset).
    #[inline]
    pub fn header_eq(&self, header: &DrawCmdHeader) -> bool {
        self.clip_rect == header.clip_rect
            && self.texture_id == header.texture_id
            && self.vtx_offset == header.vtx_offset
    }

    /// True when `next`'s index range starts exactly where `self`'s ends,
    /// i.e. the two ranges are contiguous in the index buffer.
    #[inline]
    pub fn is_sequential_with(&self, next: &DrawCmd) -> bool {
        self.idx_offset + self.elem_count == next.idx_offset
    }
}
