use crate::coords::{Rect, Vec2};
use crate::draw::{DrawData, DrawDataBuilder, DrawListId};

/// Viewport behavior flags.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ViewportFlags {
    /// Platform window is created and sized by the application, not the
    /// engine. Always true for the main viewport.
    pub owned_by_app: bool,
}

/// One platform surface the engine composes draw data for.
///
/// The public face carries what backends read: flags, placement, and the
/// work area (the part of the surface not covered by host chrome such as
/// menu bars or task bars). The per-frame composition state lives in the
/// crate-private [`ViewportData`] alongside it.
#[derive(Debug)]
pub struct Viewport {
    pub flags: ViewportFlags,
    /// Top-left corner, in the same coordinate space as draw commands.
    pub pos: Vec2,
    pub size: Vec2,
    /// Scale from draw coordinates to framebuffer pixels.
    pub framebuffer_scale: Vec2,

    pub(crate) data: ViewportData,
}

impl Viewport {
    pub(crate) fn new(flags: ViewportFlags) -> Self {
        Self {
            flags,
            pos: Vec2::zero(),
            size: Vec2::zero(),
            framebuffer_scale: Vec2::splat(1.0),
            data: ViewportData::new(),
        }
    }

    #[inline]
    pub fn main_rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Usable area: the surface minus the work-offset insets.
    pub fn work_rect(&self) -> Rect {
        Rect::new(
            self.pos + self.data.work_offset_min,
            self.pos + self.size + self.data.work_offset_max,
        )
        .clamped()
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Shrinks next frame's work area. `offset_min` grows the top-left
    /// inset, `offset_max` (negative components) the bottom-right one.
    /// Applied at the next `new_frame`.
    pub fn reserve_work_area(&mut self, offset_min: Vec2, offset_max: Vec2) {
        self.data.build_work_offset_min = self.data.build_work_offset_min + offset_min;
        self.data.build_work_offset_max = self.data.build_work_offset_max + offset_max;
    }
}

/// Frame-composition state of a viewport: the background/foreground
/// draw-list handles, their last-used frame stamps, and the draw-data
/// accumulator and output.
#[derive(Debug)]
pub(crate) struct ViewportData {
    /// Handles for the background (0) and foreground (1) overlay lists,
    /// created on first use and reused for the context's lifetime.
    pub overlay_lists: [Option<DrawListId>; 2],
    /// Frame count at which each overlay list was last reset; a stale stamp
    /// means the list needs a reset before handing it out this frame.
    pub overlay_lists_last_frame: [u64; 2],
    pub draw_data: DrawData,
    pub builder: DrawDataBuilder,

    /// Work-area insets applied this frame.
    pub work_offset_min: Vec2,
    pub work_offset_max: Vec2,
    /// Insets accumulated during this frame, promoted at the next
    /// `new_frame`.
    pub build_work_offset_min: Vec2,
    pub build_work_offset_max: Vec2,
}

impl ViewportData {
    fn new() -> Self {
        Self {
            overlay_lists: [None; 2],
            overlay_lists_last_frame: [0; 2],
            draw_data: DrawData::default(),
            builder: DrawDataBuilder::new(),
            work_offset_min: Vec2::zero(),
            work_offset_max: Vec2::zero(),
            build_work_offset_min: Vec2::zero(),
            build_work_offset_max: Vec2::zero(),
        }
    }

    /// Promotes the accumulated work offsets for the new frame and restarts
    /// accumulation.
    pub fn promote_work_offsets(&mut self) {
        self.work_offset_min = self.build_work_offset_min;
        self.work_offset_max = self.build_work_offset_max;
        self.build_work_offset_min = Vec2::zero();
        self.build_work_offset_max = Vec2::zero();
    }
}
