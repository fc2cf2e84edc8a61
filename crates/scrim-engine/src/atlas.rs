use crate::coords::Vec2;
use crate::draw::TextureId;

/// Texture atlas handle shared by every draw list in a context.
///
/// Rasterization lives in backend territory; this side owns the pixel
/// storage, the white-pixel UV untextured primitives sample from, and the
/// build/lock contract the frame machine enforces:
///
/// - `build()` must have run before the first `new_frame`.
/// - The atlas is locked between `new_frame` and `end_frame`; modifying it
///   mid-frame would desync draw lists already holding its UVs.
#[derive(Debug)]
pub struct FontAtlas {
    /// Backend texture handle, set by the renderer after uploading
    /// [`pixels`](Self::pixels).
    pub tex_id: TextureId,
    /// True between `new_frame` and `end_frame`.
    pub locked: bool,

    tex_width: usize,
    tex_height: usize,
    /// RGBA32, row-major, `tex_width * tex_height * 4` bytes once built.
    pixels: Vec<u8>,
    tex_uv_white_pixel: Vec2,
    built: bool,
}

const WHITE_PIXEL_X: usize = 0;
const WHITE_PIXEL_Y: usize = 0;

impl FontAtlas {
    pub fn new() -> Self {
        Self {
            tex_id: 0,
            locked: false,
            tex_width: 0,
            tex_height: 0,
            pixels: Vec::new(),
            tex_uv_white_pixel: Vec2::zero(),
            built: false,
        }
    }

    /// Bakes the atlas texture. Currently that is a minimal surface holding
    /// the opaque white pixel; glyph packing would extend this same texture.
    /// Idempotent, and returns normally on every path.
    pub fn build(&mut self) {
        debug_assert!(!self.locked, "cannot build the atlas mid-frame");
        if self.built {
            return;
        }

        self.tex_width = 4;
        self.tex_height = 4;
        self.pixels = vec![0xFF; self.tex_width * self.tex_height * 4];

        // Sample the center of the white pixel's texel.
        self.tex_uv_white_pixel = Vec2::new(
            (WHITE_PIXEL_X as f32 + 0.5) / self.tex_width as f32,
            (WHITE_PIXEL_Y as f32 + 0.5) / self.tex_height as f32,
        );
        self.built = true;
        log::debug!(
            "font atlas built: {}x{} rgba32",
            self.tex_width,
            self.tex_height
        );
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        self.built
    }

    #[inline]
    pub fn uv_white_pixel(&self) -> Vec2 {
        self.tex_uv_white_pixel
    }

    /// Pixel data for the backend to upload, with dimensions.
    /// Empty until [`build`](Self::build) has run.
    pub fn pixels_rgba32(&self) -> (&[u8], usize, usize) {
        (&self.pixels, self.tex_width, self.tex_height)
    }

    /// Releases pixel storage after the backend has uploaded it. The atlas
    /// stays built; only the CPU copy is dropped.
    pub fn clear_tex_data(&mut self) {
        self.pixels = Vec::new();
    }
}

impl Default for FontAtlas {
    fn default() -> Self {
        Self::new()
    }
}
