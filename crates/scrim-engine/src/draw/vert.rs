use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;

/// Vertex index type.
///
/// 16-bit by default for maximum renderer-backend compatibility; the
/// `index32` cargo feature switches to 32-bit for backends that prefer large
/// meshes over the `vtx_offset` mechanism.
#[cfg(not(feature = "index32"))]
pub type DrawIdx = u16;
#[cfg(feature = "index32")]
pub type DrawIdx = u32;

/// One vertex as uploaded to the GPU: position, texture coordinate, packed
/// 32-bit color. Written once, append-only.
///
/// The layout is part of the renderer-backend contract and must not change:
/// `pos` at offset 0, `uv` at 8, `col` at 16, stride 20.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct DrawVert {
    pub pos: Vec2,
    pub uv: Vec2,
    pub col: u32,
}

/// Alpha byte mask of a packed color. A color with zero alpha is fully
/// transparent and primitives using it are skipped at submission.
pub const COL32_A_MASK: u32 = 0xFF00_0000;

pub const COL32_WHITE: u32 = 0xFFFF_FFFF;

/// Packs RGBA bytes into the shader-facing color format
/// (R in the low byte, A in the high byte).
#[inline]
pub const fn col32(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_fixed() {
        assert_eq!(core::mem::size_of::<DrawVert>(), 20);
        assert_eq!(core::mem::offset_of!(DrawVert, pos), 0);
        assert_eq!(core::mem::offset_of!(DrawVert, uv), 8);
        assert_eq!(core::mem::offset_of!(DrawVert, col), 16);
    }

    #[test]
    fn col32_packs_channels() {
        assert_eq!(col32(0xFF, 0xFF, 0xFF, 0xFF), COL32_WHITE);
        assert_eq!(col32(0x11, 0x22, 0x33, 0x44), 0x4433_2211);
        assert_eq!(col32(0, 0, 0, 0xFF) & COL32_A_MASK, COL32_A_MASK);
    }
}
