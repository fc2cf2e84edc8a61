use std::f32::consts::PI;

use crate::coords::{Rect, Vec2};

use super::cmd::TextureId;
use super::list::DrawListFlags;

/// Number of precomputed unit-circle samples in the arc-fast table. One full
/// turn of the table equals one full circle.
pub const ARC_FAST_SAMPLE_MAX: usize = 48;

const CIRCLE_AUTO_SEGMENT_MIN: u32 = 4;
const CIRCLE_AUTO_SEGMENT_MAX: u32 = 512;

/// Number of cached per-radius segment counts (covers radii up to 64px;
/// larger radii fall back to the closed-form calculation).
const CIRCLE_SEGMENT_COUNTS: usize = 64;

/// Tessellation parameters and per-frame constants shared by every draw list
/// in a context.
///
/// Each draw list takes a copy at `reset_for_new_frame` time; the struct is
/// small and `Clone`, which keeps the lists free of borrow ties to the
/// context.
#[derive(Debug, Clone)]
pub struct DrawListSharedData {
    /// UV of a white pixel in the font atlas, used by untextured primitives.
    pub tex_uv_white_pixel: Vec2,
    /// Texture every fresh draw list starts with.
    pub font_tex_id: TextureId,
    /// Clip rect restored by `pop_clip_rect` on an empty stack; covers the
    /// union of all viewport rects. Refreshed every frame.
    pub clip_rect_fullscreen: Rect,
    /// Flags stamped onto draw lists at reset.
    pub initial_flags: DrawListFlags,

    /// Precomputed unit-circle samples, counter-clockwise from +X.
    pub arc_fast_vtx: [Vec2; ARC_FAST_SAMPLE_MAX],
    /// Radius at which the fast table alone no longer meets the max-error
    /// target.
    pub arc_fast_radius_cutoff: f32,

    circle_segment_counts: [u8; CIRCLE_SEGMENT_COUNTS],
    circle_segment_max_error: f32,
}

impl DrawListSharedData {
    pub fn new() -> Self {
        let mut arc_fast_vtx = [Vec2::zero(); ARC_FAST_SAMPLE_MAX];
        for (i, v) in arc_fast_vtx.iter_mut().enumerate() {
            let a = (i as f32 * 2.0 * PI) / ARC_FAST_SAMPLE_MAX as f32;
            *v = Vec2::new(a.cos(), a.sin());
        }

        let mut data = Self {
            tex_uv_white_pixel: Vec2::zero(),
            font_tex_id: 0,
            clip_rect_fullscreen: Rect::from_coords(-8192.0, -8192.0, 8192.0, 8192.0),
            initial_flags: DrawListFlags::default(),
            arc_fast_vtx,
            arc_fast_radius_cutoff: 0.0,
            circle_segment_counts: [0; CIRCLE_SEGMENT_COUNTS],
            circle_segment_max_error: 0.0,
        };
        data.set_circle_tessellation_max_error(0.30);
        data
    }

    /// Sets the maximum distance between the true circle and its polygon
    /// approximation, and rebuilds the per-radius segment cache.
    pub fn set_circle_tessellation_max_error(&mut self, max_error: f32) {
        if self.circle_segment_max_error == max_error {
            return;
        }
        debug_assert!(max_error > 0.0);

        self.circle_segment_max_error = max_error;
        for (i, count) in self.circle_segment_counts.iter_mut().enumerate() {
            let radius = i as f32;
            *count = if i > 0 {
                calc_circle_segment_count(radius, max_error).min(255) as u8
            } else {
                ARC_FAST_SAMPLE_MAX as u8
            };
        }
        self.arc_fast_radius_cutoff =
            circle_auto_segment_calc_radius(ARC_FAST_SAMPLE_MAX as f32, max_error);
    }

    /// Segment count for a circle of `radius` honoring the max-error target.
    /// Cached for small radii, computed for large ones.
    pub fn calc_circle_auto_segment_count(&self, radius: f32) -> u32 {
        // Ceil to never undershoot the cache slot for a fractional radius.
        let radius_idx = (radius + 0.999_999) as usize;
        if radius_idx < self.circle_segment_counts.len() {
            self.circle_segment_counts[radius_idx] as u32
        } else {
            calc_circle_segment_count(radius, self.circle_segment_max_error)
        }
    }
}

impl Default for DrawListSharedData {
    fn default() -> Self {
        Self::new()
    }
}

/// Closed form: number of segments needed so the sagitta of each arc stays
/// under `max_error`, rounded up to even, clamped to [4, 512].
fn calc_circle_segment_count(radius: f32, max_error: f32) -> u32 {
    let n = (PI / (1.0 - max_error.min(radius) / radius).acos()).ceil() as u32;
    let n = n.div_ceil(2) * 2;
    n.clamp(CIRCLE_AUTO_SEGMENT_MIN, CIRCLE_AUTO_SEGMENT_MAX)
}

/// Inverse of the above: the largest radius a fixed segment count can cover
/// within `max_error`.
fn circle_auto_segment_calc_radius(segment_count: f32, max_error: f32) -> f32 {
    max_error / (1.0 - (PI / segment_count.max(PI)).cos())
}
