use std::f32::consts::PI;

use crate::buffer::Buffer;
use crate::coords::{Rect, Vec2};

use super::cmd::{DrawCallback, DrawCmd, DrawCmdHeader, TextureId};
use super::shared::{DrawListSharedData, ARC_FAST_SAMPLE_MAX};
use super::vert::{DrawIdx, DrawVert, COL32_A_MASK};

/// Per-list behavior flags, stamped from the shared data at reset.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct DrawListFlags {
    /// The backend handles `DrawCmd::vtx_offset`, so the list may keep
    /// growing past 64K vertices by rolling the offset forward.
    pub allow_vtx_offset: bool,
}

/// Accumulates vertices, indices, and draw commands for one drawable entity
/// per frame, coalescing adjacent submissions into as few GPU draw calls as
/// possible.
///
/// The list always keeps one (possibly empty) command at the back of
/// `cmd_buffer`, opened with the current header (clip rect, texture, vertex
/// offset). Primitive-adding functions append into that command without any
/// branching; deciding whether a state change needs a new command, or allows
/// merging back into the previous one, happens only in the `on_changed_*`
/// reconciliation paths.
///
/// Primitives are always added, never culled; callers are expected to
/// coarse-clip before reaching this layer.
#[derive(Debug)]
pub struct DrawList {
    // What the renderer consumes.
    pub cmd_buffer: Buffer<DrawCmd>,
    pub idx_buffer: Buffer<DrawIdx>,
    pub vtx_buffer: Buffer<DrawVert>,
    pub flags: DrawListFlags,

    // Build-time state.
    data: DrawListSharedData,
    owner_name: &'static str,
    /// Running vertex index; equals `vtx_buffer.len()` until a vertex-offset
    /// roll resets it to 0.
    vtx_current_idx: u32,
    /// Write cursors advanced by `prim_write_*`; must land exactly at the end
    /// of their buffers when the frame is composed.
    vtx_write: usize,
    idx_write: usize,
    clip_rect_stack: Buffer<Rect>,
    texture_id_stack: Buffer<TextureId>,
    path: Buffer<Vec2>,
    /// State applied to the *next* command. Fields mirror
    /// `cmd_buffer.back()` between reconciliations.
    cmd_header: DrawCmdHeader,
}

impl DrawList {
    pub fn new(shared: &DrawListSharedData, owner_name: &'static str) -> Self {
        let mut list = Self {
            cmd_buffer: Buffer::new(),
            idx_buffer: Buffer::new(),
            vtx_buffer: Buffer::new(),
            flags: DrawListFlags::default(),
            data: shared.clone(),
            owner_name,
            vtx_current_idx: 0,
            vtx_write: 0,
            idx_write: 0,
            clip_rect_stack: Buffer::new(),
            texture_id_stack: Buffer::new(),
            path: Buffer::new(),
            cmd_header: DrawCmdHeader::default(),
        };
        list.reset_for_new_frame(shared);
        list
    }

    pub fn owner_name(&self) -> &'static str {
        self.owner_name
    }

    pub fn shared_data(&self) -> &DrawListSharedData {
        &self.data
    }

    /// Number of vertices emitted since the last vertex-offset roll; what a
    /// 16-bit list has consumed toward the 64K ceiling.
    pub fn vtx_current_idx(&self) -> u32 {
        self.vtx_current_idx
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Prepares the list for a new frame: empties all buffers (keeping their
    /// capacity), takes a fresh copy of the shared data, and re-establishes
    /// the always-one-ready-command invariant.
    pub fn reset_for_new_frame(&mut self, shared: &DrawListSharedData) {
        self.cmd_buffer.clear();
        self.idx_buffer.clear();
        self.vtx_buffer.clear();
        self.data = shared.clone();
        self.flags = shared.initial_flags;
        self.vtx_current_idx = 0;
        self.vtx_write = 0;
        self.idx_write = 0;
        self.clip_rect_stack.clear();
        self.texture_id_stack.clear();
        self.path.clear();
        self.cmd_header = DrawCmdHeader {
            clip_rect: shared.clip_rect_fullscreen,
            texture_id: shared.font_tex_id,
            vtx_offset: 0,
        };
        self.cmd_buffer.push(DrawCmd::with_header(&self.cmd_header, 0));
    }

    /// Releases all heap storage. The list is unusable until the next
    /// `reset_for_new_frame`.
    pub fn clear_free_memory(&mut self) {
        self.cmd_buffer.clear_free_memory();
        self.idx_buffer.clear_free_memory();
        self.vtx_buffer.clear_free_memory();
        self.clip_rect_stack.clear_free_memory();
        self.texture_id_stack.clear_free_memory();
        self.path.clear_free_memory();
    }

    // ── clip rect / texture state ─────────────────────────────────────────

    /// Pushes a scissor rect (viewport absolute coordinates), optionally
    /// intersected with the current one. Clamped so `max >= min` per axis.
    ///
    /// This is render-level scissoring handed to the backend; it does not
    /// cull primitives CPU-side.
    pub fn push_clip_rect(&mut self, cr_min: Vec2, cr_max: Vec2, intersect_with_current: bool) {
        let mut cr = Rect::new(cr_min, cr_max);
        if intersect_with_current {
            cr = cr.intersect(self.cmd_header.clip_rect);
        } else {
            cr = cr.clamped();
        }
        self.clip_rect_stack.push(cr);
        self.cmd_header.clip_rect = cr;
        self.on_changed_clip_rect();
    }

    pub fn push_clip_rect_fullscreen(&mut self) {
        let fullscreen = self.data.clip_rect_fullscreen;
        self.push_clip_rect(fullscreen.min, fullscreen.max, false);
    }

    /// Restores the previous clip rect (fullscreen when the stack empties).
    pub fn pop_clip_rect(&mut self) {
        debug_assert!(
            !self.clip_rect_stack.is_empty(),
            "pop_clip_rect called without matching push_clip_rect"
        );
        self.clip_rect_stack.pop();
        self.cmd_header.clip_rect = self
            .clip_rect_stack
            .back()
            .copied()
            .unwrap_or(self.data.clip_rect_fullscreen);
        self.on_changed_clip_rect();
    }

    pub fn current_clip_rect(&self) -> Rect {
        self.cmd_header.clip_rect
    }

    pub fn push_texture_id(&mut self, texture_id: TextureId) {
        self.texture_id_stack.push(texture_id);
        self.cmd_header.texture_id = texture_id;
        self.on_changed_texture_id();
    }

    pub fn pop_texture_id(&mut self) {
        debug_assert!(
            !self.texture_id_stack.is_empty(),
            "pop_texture_id called without matching push_texture_id"
        );
        self.texture_id_stack.pop();
        self.cmd_header.texture_id = self
            .texture_id_stack
            .back()
            .copied()
            .unwrap_or(self.data.font_tex_id);
        self.on_changed_texture_id();
    }

    // ── command management ────────────────────────────────────────────────

    /// Forcibly terminates the current command and opens a fresh one carrying
    /// the current header. Use when a batching break is required regardless
    /// of mergeability (e.g. around dependent rendering).
    pub fn add_draw_cmd(&mut self) {
        let cmd = DrawCmd::with_header(&self.cmd_header, self.idx_buffer.len() as u32);
        debug_assert!(
            cmd.clip_rect.min.x <= cmd.clip_rect.max.x
                && cmd.clip_rect.min.y <= cmd.clip_rect.max.y
        );
        self.cmd_buffer.push(cmd);
    }

    /// Attaches a render callback. The current command is terminated if it
    /// already holds geometry, the callback gets a command of its own, and a
    /// fresh command is opened after it — callbacks never merge.
    pub fn add_callback(&mut self, callback: DrawCallback, user_data: usize) {
        debug_assert!(!self.cmd_buffer.is_empty());
        if self.cmd_buffer.back().is_some_and(|c| c.elem_count != 0) {
            self.add_draw_cmd();
        }
        let curr_i = self.cmd_buffer.len() - 1;
        let curr = &mut self.cmd_buffer[curr_i];
        debug_assert!(curr.callback.is_none());
        curr.callback = Some(callback);
        curr.user_data = user_data;
        self.add_draw_cmd(); // force a new command after the callback
    }

    /// Strips trailing commands with no elements and no callback, from the
    /// back. Called before the list is exposed for rendering; afterwards the
    /// always-ready invariant no longer holds, so no further primitives may
    /// be added this frame.
    pub fn pop_unused_draw_cmd(&mut self) {
        while let Some(curr) = self.cmd_buffer.back() {
            if curr.elem_count != 0 || curr.callback.is_some() {
                return;
            }
            self.cmd_buffer.pop();
        }
    }

    /// Reconciliation after a clip-rect header change.
    ///
    /// If the current command already committed geometry under the old rect,
    /// a new command is opened — no merge attempt. Otherwise the (empty)
    /// current command either merges backward into the previous command when
    /// that one was opened under an identical header, is contiguous, and has
    /// no callback, or simply adopts the new rect in place.
    fn on_changed_clip_rect(&mut self) {
        debug_assert!(!self.cmd_buffer.is_empty());
        let curr_i = self.cmd_buffer.len() - 1;
        if self.cmd_buffer[curr_i].elem_count != 0
            && self.cmd_buffer[curr_i].clip_rect != self.cmd_header.clip_rect
        {
            self.add_draw_cmd();
            return;
        }
        debug_assert!(self.cmd_buffer[curr_i].callback.is_none());

        if self.cmd_buffer[curr_i].elem_count == 0 && curr_i >= 1 {
            let prev = &self.cmd_buffer[curr_i - 1];
            if prev.header_eq(&self.cmd_header)
                && prev.is_sequential_with(&self.cmd_buffer[curr_i])
                && prev.callback.is_none()
            {
                self.cmd_buffer.pop();
                return;
            }
        }

        self.cmd_buffer[curr_i].clip_rect = self.cmd_header.clip_rect;
    }

    /// Same reconciliation as [`on_changed_clip_rect`](Self::on_changed_clip_rect),
    /// keyed on the texture field.
    fn on_changed_texture_id(&mut self) {
        debug_assert!(!self.cmd_buffer.is_empty());
        let curr_i = self.cmd_buffer.len() - 1;
        if self.cmd_buffer[curr_i].elem_count != 0
            && self.cmd_buffer[curr_i].texture_id != self.cmd_header.texture_id
        {
            self.add_draw_cmd();
            return;
        }
        debug_assert!(self.cmd_buffer[curr_i].callback.is_none());

        if self.cmd_buffer[curr_i].elem_count == 0 && curr_i >= 1 {
            let prev = &self.cmd_buffer[curr_i - 1];
            if prev.header_eq(&self.cmd_header)
                && prev.is_sequential_with(&self.cmd_buffer[curr_i])
                && prev.callback.is_none()
            {
                self.cmd_buffer.pop();
                return;
            }
        }

        self.cmd_buffer[curr_i].texture_id = self.cmd_header.texture_id;
    }

    /// Vertex offsets only grow, so there is no merge-backward path here:
    /// either the current command is retired (has geometry) or it adopts the
    /// new offset in place.
    fn on_changed_vtx_offset(&mut self) {
        self.vtx_current_idx = 0;
        debug_assert!(!self.cmd_buffer.is_empty());
        let curr_i = self.cmd_buffer.len() - 1;
        let curr = &mut self.cmd_buffer[curr_i];
        if curr.elem_count != 0 {
            self.add_draw_cmd();
            return;
        }
        debug_assert!(curr.callback.is_none());
        curr.vtx_offset = self.cmd_header.vtx_offset;
    }

    // ── low-level primitive plumbing ──────────────────────────────────────

    /// Reserves space for `idx_count` indices and `vtx_count` vertices in the
    /// current command and positions the write cursors. `idx_count` must be a
    /// multiple of 3.
    ///
    /// When 16-bit indices are in use and the reservation would cross the 64K
    /// vertex ceiling, a backend with vertex-offset support gets the header's
    /// offset rolled forward instead; without that support the overflow is
    /// caught fatally at composition time.
    pub fn prim_reserve(&mut self, idx_count: usize, vtx_count: usize) {
        debug_assert!(idx_count % 3 == 0);

        if size_of::<DrawIdx>() == 2
            && self.vtx_current_idx as usize + vtx_count >= (1 << 16)
            && self.flags.allow_vtx_offset
        {
            self.cmd_header.vtx_offset = self.vtx_buffer.len() as u32;
            self.on_changed_vtx_offset();
        }

        let curr_i = self.cmd_buffer.len() - 1;
        self.cmd_buffer[curr_i].elem_count += idx_count as u32;

        self.vtx_write = self.vtx_buffer.len();
        self.vtx_buffer.resize(self.vtx_write + vtx_count);
        self.idx_write = self.idx_buffer.len();
        self.idx_buffer.resize(self.idx_write + idx_count);
    }

    /// Releases the *unwritten* tail of an earlier reservation.
    pub fn prim_unreserve(&mut self, idx_count: usize, vtx_count: usize) {
        let curr_i = self.cmd_buffer.len() - 1;
        let curr = &mut self.cmd_buffer[curr_i];
        debug_assert!(curr.elem_count as usize >= idx_count);
        curr.elem_count -= idx_count as u32;
        self.vtx_buffer.truncate(self.vtx_buffer.len() - vtx_count);
        self.idx_buffer.truncate(self.idx_buffer.len() - idx_count);
    }

    #[inline]
    fn prim_write_vtx(&mut self, pos: Vec2, uv: Vec2, col: u32) {
        self.vtx_buffer[self.vtx_write] = DrawVert { pos, uv, col };
        self.vtx_write += 1;
        self.vtx_current_idx += 1;
    }

    #[inline]
    fn prim_write_idx(&mut self, idx: u32) {
        self.idx_buffer[self.idx_write] = idx as DrawIdx;
        self.idx_write += 1;
    }

    /// Writes an axis-aligned quad (two triangles) between corners `a` and
    /// `c` into space already reserved via `prim_reserve(6, 4)`.
    pub fn prim_rect(&mut self, a: Vec2, c: Vec2, col: u32) {
        let b = Vec2::new(c.x, a.y);
        let d = Vec2::new(a.x, c.y);
        let uv = self.data.tex_uv_white_pixel;
        let base = self.vtx_current_idx;
        self.prim_write_idx(base);
        self.prim_write_idx(base + 1);
        self.prim_write_idx(base + 2);
        self.prim_write_idx(base);
        self.prim_write_idx(base + 2);
        self.prim_write_idx(base + 3);
        self.prim_write_vtx(a, uv, col);
        self.prim_write_vtx(b, uv, col);
        self.prim_write_vtx(c, uv, col);
        self.prim_write_vtx(d, uv, col);
    }

    // ── polyline / polygon ────────────────────────────────────────────────

    /// Strokes a polyline as solid quads (one per segment, butt joints).
    /// Fully transparent colors and degenerate point counts are skipped.
    pub fn add_polyline(&mut self, points: &[Vec2], col: u32, closed: bool, thickness: f32) {
        if points.len() < 2 || (col & COL32_A_MASK) == 0 {
            return;
        }

        let count = if closed { points.len() } else { points.len() - 1 };
        let uv = self.data.tex_uv_white_pixel;
        let half = thickness.max(1.0) * 0.5;

        self.prim_reserve(count * 6, count * 4);
        for i1 in 0..count {
            let i2 = (i1 + 1) % points.len();
            let p1 = points[i1];
            let p2 = points[i2];
            let d = (p2 - p1).normalized_or_zero() * half;
            let n = Vec2::new(d.y, -d.x);

            let base = self.vtx_current_idx;
            self.prim_write_idx(base);
            self.prim_write_idx(base + 1);
            self.prim_write_idx(base + 2);
            self.prim_write_idx(base);
            self.prim_write_idx(base + 2);
            self.prim_write_idx(base + 3);
            self.prim_write_vtx(p1 + n, uv, col);
            self.prim_write_vtx(p2 + n, uv, col);
            self.prim_write_vtx(p2 - n, uv, col);
            self.prim_write_vtx(p1 - n, uv, col);
        }
    }

    /// Fills a convex polygon as a triangle fan anchored on the first point.
    pub fn add_convex_poly_filled(&mut self, points: &[Vec2], col: u32) {
        if points.len() < 3 || (col & COL32_A_MASK) == 0 {
            return;
        }

        let uv = self.data.tex_uv_white_pixel;
        self.prim_reserve((points.len() - 2) * 3, points.len());
        let base = self.vtx_current_idx;
        for &p in points {
            self.prim_write_vtx(p, uv, col);
        }
        for i in 2..points.len() as u32 {
            self.prim_write_idx(base);
            self.prim_write_idx(base + i - 1);
            self.prim_write_idx(base + i);
        }
    }

    // ── stateful path API ─────────────────────────────────────────────────

    #[inline]
    pub fn path_clear(&mut self) {
        self.path.clear();
    }

    #[inline]
    pub fn path_line_to(&mut self, pos: Vec2) {
        self.path.push(pos);
    }

    #[inline]
    pub fn path_line_to_merge_duplicate(&mut self, pos: Vec2) {
        if self.path.back() != Some(&pos) {
            self.path.push(pos);
        }
    }

    /// Strokes and clears the current path.
    pub fn path_stroke(&mut self, col: u32, closed: bool, thickness: f32) {
        let path = std::mem::take(&mut self.path);
        self.add_polyline(&path, col, closed, thickness);
        self.path = path;
        self.path.clear();
    }

    /// Fills the current path as a convex polygon and clears it.
    pub fn path_fill_convex(&mut self, col: u32) {
        let path = std::mem::take(&mut self.path);
        self.add_convex_poly_filled(&path, col);
        self.path = path;
        self.path.clear();
    }

    /// Appends an arc sampled at `num_segments + 1` explicit angles.
    pub fn path_arc_to(
        &mut self,
        center: Vec2,
        radius: f32,
        a_min: f32,
        a_max: f32,
        num_segments: usize,
    ) {
        if radius < 0.5 {
            self.path.push(center);
            return;
        }
        debug_assert!(num_segments > 0);
        for i in 0..=num_segments {
            let a = a_min + (i as f32 / num_segments as f32) * (a_max - a_min);
            self.path.push(center + Vec2::new(a.cos(), a.sin()) * radius);
        }
    }

    /// Appends an arc from the precomputed sample table, with angles in
    /// twelfths of a circle (0 at +X, 3 at +Y, 6 at -X). Coarser than
    /// [`path_arc_to`](Self::path_arc_to) but with no trig at call time;
    /// suited for rounded corners.
    pub fn path_arc_to_fast(
        &mut self,
        center: Vec2,
        radius: f32,
        a_min_of_12: i32,
        a_max_of_12: i32,
    ) {
        if radius < 0.5 {
            self.path.push(center);
            return;
        }
        debug_assert!(a_min_of_12 <= a_max_of_12);
        let step = (ARC_FAST_SAMPLE_MAX / 12) as i32;
        let mut s = a_min_of_12 * step;
        while s <= a_max_of_12 * step {
            let i = s.rem_euclid(ARC_FAST_SAMPLE_MAX as i32) as usize;
            let v = self.data.arc_fast_vtx[i];
            self.path.push(center + v * radius);
            s += step;
        }
    }

    /// Appends a full-circle arc from the precomputed sample table, choosing
    /// the step from the auto segment count. Produces a closing duplicate of
    /// the start point, which circle helpers pop before stroking/filling.
    fn path_arc_to_fast_full(&mut self, center: Vec2, radius: f32) {
        if radius < 0.5 {
            self.path.push(center);
            return;
        }
        let segments = self.data.calc_circle_auto_segment_count(radius);
        let step = ((ARC_FAST_SAMPLE_MAX as u32 / segments).max(1) as usize)
            .min(ARC_FAST_SAMPLE_MAX / 4);

        let mut sample = 0;
        while sample < ARC_FAST_SAMPLE_MAX {
            let v = self.data.arc_fast_vtx[sample];
            self.path.push(center + v * radius);
            sample += step;
        }
        // Closing duplicate of sample 0.
        let v = self.data.arc_fast_vtx[0];
        self.path.push(center + v * radius);
    }

    /// Appends an axis-aligned rectangle outline to the path.
    pub fn path_rect(&mut self, a: Vec2, b: Vec2) {
        self.path_line_to(a);
        self.path_line_to(Vec2::new(b.x, a.y));
        self.path_line_to(b);
        self.path_line_to(Vec2::new(a.x, b.y));
    }

    // ── high-level primitives ─────────────────────────────────────────────

    /// Adds a line segment. The half-pixel offset centers 1px lines on the
    /// pixel grid.
    pub fn add_line(&mut self, p1: Vec2, p2: Vec2, col: u32, thickness: f32) {
        if (col & COL32_A_MASK) == 0 {
            return;
        }
        self.path_line_to(p1 + Vec2::splat(0.5));
        self.path_line_to(p2 + Vec2::splat(0.5));
        self.path_stroke(col, false, thickness);
    }

    /// Adds a rectangle outline.
    pub fn add_rect(&mut self, p_min: Vec2, p_max: Vec2, col: u32, thickness: f32) {
        if (col & COL32_A_MASK) == 0 {
            return;
        }
        self.path_rect(p_min + Vec2::splat(0.5), p_max - Vec2::splat(0.5));
        self.path_stroke(col, true, thickness);
    }

    /// Adds a filled rectangle.
    pub fn add_rect_filled(&mut self, p_min: Vec2, p_max: Vec2, col: u32) {
        if (col & COL32_A_MASK) == 0 {
            return;
        }
        self.prim_reserve(6, 4);
        self.prim_rect(p_min, p_max, col);
    }

    /// Adds a triangle outline.
    pub fn add_triangle(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, col: u32, thickness: f32) {
        if (col & COL32_A_MASK) == 0 {
            return;
        }
        self.path_line_to(p1);
        self.path_line_to(p2);
        self.path_line_to(p3);
        self.path_stroke(col, true, thickness);
    }

    /// Adds a filled triangle.
    pub fn add_triangle_filled(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, col: u32) {
        if (col & COL32_A_MASK) == 0 {
            return;
        }
        self.path_line_to(p1);
        self.path_line_to(p2);
        self.path_line_to(p3);
        self.path_fill_convex(col);
    }

    /// Adds a circle outline. `num_segments == 0` picks the count
    /// automatically from the radius and tessellation error target.
    pub fn add_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        col: u32,
        num_segments: usize,
        thickness: f32,
    ) {
        if (col & COL32_A_MASK) == 0 || radius < 0.5 {
            return;
        }
        if num_segments == 0 {
            self.path_arc_to_fast_full(center, radius - 0.5);
            self.path.pop();
        } else {
            let n = num_segments.clamp(3, 512);
            let a_max = (PI * 2.0) * (n as f32 - 1.0) / n as f32;
            self.path_arc_to(center, radius - 0.5, 0.0, a_max, n - 1);
        }
        self.path_stroke(col, true, thickness);
    }

    /// Adds a filled circle. `num_segments == 0` picks the count
    /// automatically.
    pub fn add_circle_filled(&mut self, center: Vec2, radius: f32, col: u32, num_segments: usize) {
        if (col & COL32_A_MASK) == 0 || radius < 0.5 {
            return;
        }
        if num_segments == 0 {
            self.path_arc_to_fast_full(center, radius);
            self.path.pop();
        } else {
            let n = num_segments.clamp(3, 512);
            let a_max = (PI * 2.0) * (n as f32 - 1.0) / n as f32;
            self.path_arc_to(center, radius, 0.0, a_max, n - 1);
        }
        self.path_fill_convex(col);
    }

    // ── composition-time checks ───────────────────────────────────────────

    /// Hard sanity checks run before the list is handed to a renderer.
    ///
    /// A mismatch between the write cursors and buffer lengths means a
    /// `prim_reserve` reservation was not fully written; continuing would let
    /// the GPU read garbage, so this is fatal rather than recoverable.
    pub(crate) fn validate_for_render(&self) {
        assert!(
            self.vtx_buffer.is_empty() || self.vtx_write == self.vtx_buffer.len(),
            "draw list '{}': vertex write cursor does not match buffer end",
            self.owner_name
        );
        assert!(
            self.idx_buffer.is_empty() || self.idx_write == self.idx_buffer.len(),
            "draw list '{}': index write cursor does not match buffer end",
            self.owner_name
        );
        if !self.flags.allow_vtx_offset {
            assert!(
                self.vtx_current_idx as usize == self.vtx_buffer.len(),
                "draw list '{}': vertex index counter diverged from buffer size",
                self.owner_name
            );
        }
        if size_of::<DrawIdx>() == 2 {
            assert!(
                self.vtx_current_idx < (1 << 16),
                "draw list '{}': too many vertices for 16-bit indices; enable \
                 vertex-offset support or split submissions across lists",
                self.owner_name
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::vert::col32;

    const WHITE: u32 = col32(255, 255, 255, 255);
    const RED: u32 = col32(255, 0, 0, 255);

    fn test_list() -> DrawList {
        let mut shared = DrawListSharedData::new();
        shared.clip_rect_fullscreen = Rect::from_coords(0.0, 0.0, 800.0, 600.0);
        let mut list = DrawList::new(&shared, "test");
        list.push_clip_rect_fullscreen();
        list.push_texture_id(1);
        list
    }

    fn drawable_cmds(list: &DrawList) -> Vec<&DrawCmd> {
        list.cmd_buffer
            .iter()
            .filter(|c| c.elem_count != 0 || c.callback.is_some())
            .collect()
    }

    // ── always-ready invariant ────────────────────────────────────────────

    #[test]
    fn fresh_list_has_one_empty_command() {
        let list = test_list();
        assert!(!list.cmd_buffer.is_empty());
        let back = list.cmd_buffer.back().unwrap();
        assert_eq!(back.elem_count, 0);
        assert!(back.callback.is_none());
    }

    #[test]
    fn reset_restores_invariant_after_use() {
        let mut list = test_list();
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        let shared = DrawListSharedData::new();
        list.reset_for_new_frame(&shared);
        assert_eq!(list.cmd_buffer.len(), 1);
        assert_eq!(list.vtx_buffer.len(), 0);
        assert_eq!(list.idx_buffer.len(), 0);
        assert_eq!(list.cmd_buffer[0].elem_count, 0);
    }

    // ── merge correctness ─────────────────────────────────────────────────

    #[test]
    fn consecutive_primitives_share_one_command() {
        let mut list = test_list();
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        list.add_rect_filled(Vec2::new(20.0, 0.0), Vec2::new(30.0, 10.0), RED);
        list.add_line(Vec2::zero(), Vec2::new(5.0, 5.0), WHITE, 1.0);
        list.pop_unused_draw_cmd();

        let cmds = drawable_cmds(&list);
        assert_eq!(cmds.len(), 1);
        // 2 quads + 1 line quad = 18 indices, all in the one command.
        assert_eq!(cmds[0].elem_count, 18);
        assert_eq!(cmds[0].elem_count as usize, list.idx_buffer.len());
    }

    #[test]
    fn redundant_clip_push_merges_backward() {
        let mut list = test_list();
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        // Same rect as the current header: the fresh empty command must merge
        // back into the previous one instead of surviving as a split.
        let cr = list.current_clip_rect();
        list.push_clip_rect(cr.min, cr.max, false);
        list.add_rect_filled(Vec2::new(20.0, 0.0), Vec2::new(30.0, 10.0), WHITE);
        list.pop_clip_rect();
        list.pop_unused_draw_cmd();

        assert_eq!(drawable_cmds(&list).len(), 1);
    }

    #[test]
    fn empty_clip_scope_merges_back_into_previous_command() {
        let mut list = test_list();
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        // Differing rect splits off a new command; popping it with nothing
        // drawn must fold the empty command back into the previous one.
        list.push_clip_rect(Vec2::zero(), Vec2::new(50.0, 50.0), true);
        assert_eq!(list.cmd_buffer.len(), 2);
        list.pop_clip_rect();
        assert_eq!(list.cmd_buffer.len(), 1);

        list.add_rect_filled(Vec2::new(20.0, 0.0), Vec2::new(30.0, 10.0), WHITE);
        list.pop_unused_draw_cmd();
        assert_eq!(drawable_cmds(&list).len(), 1);
    }

    // ── no spurious merge ─────────────────────────────────────────────────

    #[test]
    fn differing_clip_rects_never_coalesce() {
        let mut list = test_list();
        list.push_clip_rect(Vec2::zero(), Vec2::new(100.0, 100.0), false);
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        list.pop_clip_rect();
        list.push_clip_rect(Vec2::new(200.0, 200.0), Vec2::new(300.0, 300.0), false);
        list.add_rect_filled(Vec2::new(210.0, 210.0), Vec2::new(220.0, 220.0), WHITE);
        list.pop_clip_rect();
        list.pop_unused_draw_cmd();

        let cmds = drawable_cmds(&list);
        assert_eq!(cmds.len(), 2);
        assert_ne!(cmds[0].clip_rect, cmds[1].clip_rect);
        // Index ranges are contiguous but headers differ: no merge.
        assert_eq!(cmds[0].idx_offset + cmds[0].elem_count, cmds[1].idx_offset);
    }

    #[test]
    fn texture_change_splits_commands() {
        let mut list = test_list();
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        list.push_texture_id(7);
        list.add_rect_filled(Vec2::new(20.0, 0.0), Vec2::new(30.0, 10.0), WHITE);
        list.pop_texture_id();
        list.pop_unused_draw_cmd();

        let cmds = drawable_cmds(&list);
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].texture_id, 1);
        assert_eq!(cmds[1].texture_id, 7);
    }

    // ── explicit breaks and callbacks ─────────────────────────────────────

    #[test]
    fn add_draw_cmd_forces_a_split() {
        let mut list = test_list();
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        list.add_draw_cmd();
        list.add_rect_filled(Vec2::new(20.0, 0.0), Vec2::new(30.0, 10.0), WHITE);
        list.pop_unused_draw_cmd();
        assert_eq!(drawable_cmds(&list).len(), 2);
    }

    fn noop_callback(_list: &DrawList, _cmd: &DrawCmd) {}

    #[test]
    fn callback_gets_its_own_command() {
        let mut list = test_list();
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        list.add_callback(noop_callback, 42);
        list.add_rect_filled(Vec2::new(20.0, 0.0), Vec2::new(30.0, 10.0), WHITE);
        list.pop_unused_draw_cmd();

        let cmds = drawable_cmds(&list);
        assert_eq!(cmds.len(), 3);
        assert!(cmds[1].callback.is_some());
        assert_eq!(cmds[1].user_data, 42);
        assert_eq!(cmds[1].elem_count, 0);
    }

    #[test]
    fn trailing_callback_survives_pop_unused() {
        let mut list = test_list();
        list.add_callback(noop_callback, 0);
        list.pop_unused_draw_cmd();
        let back = list.cmd_buffer.back().unwrap();
        assert!(back.callback.is_some());
    }

    // ── trailing-empty invariant ──────────────────────────────────────────

    #[test]
    fn pop_unused_strips_all_trailing_empties() {
        let mut list = test_list();
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        list.add_draw_cmd();
        list.add_draw_cmd();
        list.pop_unused_draw_cmd();

        assert!(!list.cmd_buffer.is_empty());
        for cmd in &list.cmd_buffer {
            assert!(cmd.elem_count != 0 || cmd.callback.is_some());
        }
    }

    #[test]
    fn pop_unused_on_empty_list_leaves_nothing() {
        let mut list = test_list();
        list.pop_unused_draw_cmd();
        assert_eq!(list.cmd_buffer.len(), 0);
    }

    // ── degenerate input is filtered, not an error ────────────────────────

    #[test]
    fn transparent_color_is_skipped() {
        let mut list = test_list();
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), col32(255, 0, 0, 0));
        list.add_circle_filled(Vec2::new(5.0, 5.0), 4.0, col32(0, 0, 0, 0), 0);
        assert_eq!(list.vtx_buffer.len(), 0);
    }

    #[test]
    fn tiny_radius_circle_is_skipped() {
        let mut list = test_list();
        list.add_circle_filled(Vec2::zero(), 0.25, WHITE, 0);
        assert_eq!(list.vtx_buffer.len(), 0);
    }

    #[test]
    fn clip_rect_is_clamped_never_inverted() {
        let mut list = test_list();
        list.push_clip_rect(Vec2::new(50.0, 50.0), Vec2::new(10.0, 80.0), false);
        let cr = list.current_clip_rect();
        assert!(cr.max.x >= cr.min.x && cr.max.y >= cr.min.y);
        list.pop_clip_rect();
    }

    // ── tessellation counts ───────────────────────────────────────────────

    #[test]
    fn explicit_segment_circle_has_predictable_counts() {
        let mut list = test_list();
        list.add_circle_filled(Vec2::new(10.0, 10.0), 5.0, WHITE, 12);
        assert_eq!(list.vtx_buffer.len(), 12);
        assert_eq!(list.idx_buffer.len(), (12 - 2) * 3);
    }

    #[test]
    fn line_is_one_quad() {
        let mut list = test_list();
        list.add_line(Vec2::zero(), Vec2::new(1.0, 1.0), WHITE, 1.0);
        assert_eq!(list.vtx_buffer.len(), 4);
        assert_eq!(list.idx_buffer.len(), 6);
    }

    #[test]
    fn index_count_is_triangle_list_topology() {
        let mut list = test_list();
        list.add_circle_filled(Vec2::new(10.0, 10.0), 5.0, WHITE, 0);
        list.add_line(Vec2::zero(), Vec2::new(1.0, 1.0), WHITE, 1.0);
        list.add_triangle_filled(
            Vec2::zero(),
            Vec2::new(4.0, 0.0),
            Vec2::new(2.0, 3.0),
            WHITE,
        );
        assert_eq!(list.idx_buffer.len() % 3, 0);
    }

    #[test]
    fn fast_arc_quarter_turn_hits_the_axes() {
        let mut list = test_list();
        list.path_arc_to_fast(Vec2::zero(), 10.0, 0, 3);
        // Twelfths 0..=3 inclusive: 4 points from +X around to +Y.
        assert_eq!(list.path.len(), 4);
        let first = list.path[0];
        let last = list.path[3];
        assert!((first.x - 10.0).abs() < 1e-4 && first.y.abs() < 1e-4);
        assert!(last.x.abs() < 1e-4 && (last.y - 10.0).abs() < 1e-4);
        list.path_clear();
    }

    // ── write-cursor integrity ────────────────────────────────────────────

    #[test]
    fn validate_passes_after_normal_use() {
        let mut list = test_list();
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        list.add_circle(Vec2::new(40.0, 40.0), 10.0, WHITE, 0, 2.0);
        list.validate_for_render();
    }

    #[test]
    #[should_panic(expected = "write cursor")]
    fn unwritten_reservation_is_fatal() {
        let mut list = test_list();
        list.prim_reserve(6, 4);
        // Reserved but never wrote: cursors lag the buffer ends.
        list.validate_for_render();
    }

    #[test]
    fn prim_unreserve_rolls_back_reservation() {
        let mut list = test_list();
        list.prim_reserve(6, 4);
        list.prim_unreserve(6, 4);
        list.validate_for_render();
        assert_eq!(list.vtx_buffer.len(), 0);
        assert_eq!(list.cmd_buffer.back().unwrap().elem_count, 0);
    }

    // ── 16-bit index ceiling ──────────────────────────────────────────────

    #[cfg(not(feature = "index32"))]
    #[test]
    #[should_panic(expected = "too many vertices")]
    fn exceeding_64k_vertices_without_offset_support_is_fatal() {
        let mut list = test_list();
        // 16500 quads * 4 vertices = 66000 > 65536.
        for i in 0..16_500 {
            let x = (i % 100) as f32;
            let y = (i / 100) as f32;
            list.add_rect_filled(Vec2::new(x, y), Vec2::new(x + 0.5, y + 0.5), WHITE);
        }
        list.validate_for_render();
    }

    #[cfg(not(feature = "index32"))]
    #[test]
    fn vtx_offset_rolls_forward_when_backend_supports_it() {
        let mut shared = DrawListSharedData::new();
        shared.initial_flags = DrawListFlags { allow_vtx_offset: true };
        let mut list = DrawList::new(&shared, "large");
        list.push_clip_rect_fullscreen();

        for i in 0..16_500 {
            let x = (i % 100) as f32;
            let y = (i / 100) as f32;
            list.add_rect_filled(Vec2::new(x, y), Vec2::new(x + 0.5, y + 0.5), WHITE);
        }
        list.validate_for_render();
        list.pop_unused_draw_cmd();

        let cmds: Vec<_> = list.cmd_buffer.iter().collect();
        assert!(cmds.len() >= 2, "expected a vertex-offset split");
        assert_eq!(cmds[0].vtx_offset, 0);
        assert!(cmds[1].vtx_offset > 0);
        // Indices restart relative to the new offset.
        assert!(list.vtx_current_idx() < (1 << 16));
        // Commands cover the whole index buffer contiguously.
        let total: u32 = cmds.iter().map(|c| c.elem_count).sum();
        assert_eq!(total as usize, list.idx_buffer.len());
    }
}
