use crate::buffer::Buffer;
use crate::coords::Vec2;

/// Handle to a draw list in the context's arena. Handles stay valid for the
/// lifetime of the context; the lists themselves are reset every frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DrawListId(pub(crate) u32);

impl DrawListId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Compositing layers a viewport collects draw lists into, back to front.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawLayer {
    /// Seeded with the viewport's background list at render time.
    Background = 0,
    /// Receives lists submitted during the frame, in submission order.
    Content = 1,
    /// Seeded with the viewport's foreground list at render time.
    Foreground = 2,
}

pub const LAYER_COUNT: usize = 3;

/// Per-viewport accumulator of draw-list handles, bucketed by layer.
///
/// Cleared at the start of every frame; at render time the layers are
/// flattened into a single back-to-front sequence handed to [`DrawData`].
#[derive(Debug, Default)]
pub struct DrawDataBuilder {
    layers: [Buffer<DrawListId>; LAYER_COUNT],
}

impl DrawDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    pub fn add(&mut self, layer: DrawLayer, id: DrawListId) {
        self.layers[layer as usize].push(id);
    }

    pub fn layer(&self, layer: DrawLayer) -> &[DrawListId] {
        &self.layers[layer as usize]
    }

    pub fn total_list_count(&self) -> usize {
        self.layers.iter().map(|l| l.len()).sum()
    }

    /// Concatenates every layer onto layer 0 in layer order and empties the
    /// rest. Idempotent: a second call finds the upper layers empty and moves
    /// nothing. Bulk copies, O(total handle count).
    pub fn flatten_into_single_layer(&mut self) -> &[DrawListId] {
        let (base, rest) = self.layers.split_at_mut(1);
        for layer in rest {
            base[0].extend_from_slice(layer);
            layer.clear();
        }
        &base[0]
    }
}

/// Everything a renderer backend needs to draw one viewport for one frame:
/// the flattened draw-list handles (back to front), aggregate buffer sizes
/// for upfront GPU allocation, and the viewport's position/scale mapping.
///
/// `valid` is true only between `render` and the next `new_frame`; backends
/// must not touch stale draw data.
#[derive(Debug, Default)]
pub struct DrawData {
    pub valid: bool,
    pub cmd_lists: Vec<DrawListId>,
    /// Sum of `elem_count` over every command in every list.
    pub total_idx_count: usize,
    pub total_vtx_count: usize,
    /// Top-left of the viewport, in the same coordinate space as the draw
    /// commands' clip rects.
    pub display_pos: Vec2,
    pub display_size: Vec2,
    /// Coordinate-to-framebuffer-pixel scale (>1 on hiDPI displays).
    pub framebuffer_scale: Vec2,
}

impl DrawData {
    /// Invalidates and forgets last frame's lists. Totals and display fields
    /// are rewritten at the next composition.
    pub fn clear(&mut self) {
        self.valid = false;
        self.cmd_lists.clear();
        self.total_idx_count = 0;
        self.total_vtx_count = 0;
    }
}
