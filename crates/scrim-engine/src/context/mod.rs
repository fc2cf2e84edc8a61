//! The engine context: frame state machine, draw-list arena, per-viewport
//! draw-data composition, and lifecycle hooks.

mod hooks;
mod io;

pub use hooks::{ContextHook, ContextHookCallback, ContextHookType};
pub use io::Io;

use crate::alloc;
use crate::atlas::FontAtlas;
use crate::buffer::Buffer;
use crate::coords::{Rect, Vec2};
use crate::draw::{DrawData, DrawLayer, DrawList, DrawListFlags, DrawListId, DrawListSharedData};
use crate::storage::Storage;
use crate::viewport::{Viewport, ViewportFlags};

/// Owns everything one engine instance needs for a frame: configuration and
/// input ([`Io`]), the draw-list arena, the viewport list, the font atlas,
/// lifecycle hooks, and a general-purpose [`Storage`].
///
/// There is no implicit current context; every operation goes through an
/// explicit `&mut Context`. A context belongs to one thread for its whole
/// life — run one context per thread rather than sharing one.
///
/// Frame protocol: `new_frame` → submit geometry → `render` (which runs
/// `end_frame` if the caller didn't). Draw data is valid from `render` until
/// the next `new_frame`.
#[derive(Debug)]
pub struct Context {
    pub io: Io,
    pub storage: Storage,
    /// Must be built (`atlas.build()`) before the first `new_frame`.
    pub atlas: FontAtlas,

    shared_data: DrawListSharedData,
    /// Draw-list arena; [`DrawListId`]s index into it and stay valid for the
    /// context's lifetime.
    draw_lists: Vec<DrawList>,
    /// Frame stamp of each arena entry's last reset.
    draw_list_frames: Vec<u64>,
    viewports: Vec<Viewport>,

    /// Seconds accumulated from `Io::delta_time` across frames.
    time: f64,
    frame_count: u64,
    frame_count_ended: u64,
    frame_count_rendered: u64,

    hooks: Buffer<ContextHook>,
    hook_id_next: u32,
    initialized: bool,
}

impl Context {
    pub fn new() -> Self {
        log::debug!("context created");
        Self {
            io: Io::new(),
            storage: Storage::new(),
            atlas: FontAtlas::new(),
            shared_data: DrawListSharedData::new(),
            draw_lists: Vec::new(),
            draw_list_frames: Vec::new(),
            viewports: vec![Viewport::new(ViewportFlags { owned_by_app: true })],
            time: 0.0,
            frame_count: 0,
            frame_count_ended: 0,
            frame_count_rendered: 0,
            hooks: Buffer::new(),
            hook_id_next: 0,
            initialized: true,
        }
    }

    // ── simple accessors ──────────────────────────────────────────────────

    /// Accumulated time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Frames started so far; 0 before the first `new_frame`.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn main_viewport(&self) -> &Viewport {
        &self.viewports[0]
    }

    pub fn main_viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewports[0]
    }

    pub fn shared_data(&self) -> &DrawListSharedData {
        &self.shared_data
    }

    /// Main viewport's draw data; `None` outside the `render` → `new_frame`
    /// validity window.
    pub fn draw_data(&self) -> Option<&DrawData> {
        let dd = &self.viewports[0].data.draw_data;
        dd.valid.then_some(dd)
    }

    // ── frame lifecycle ───────────────────────────────────────────────────

    /// Starts a new frame. Fatal if the previous frame was never ended, the
    /// delta time is not positive (after the first frame), the display size
    /// is negative, or the atlas was never built.
    pub fn new_frame(&mut self) {
        assert!(self.initialized);

        // Sweep hooks removed since the last frame. Reverse order keeps the
        // remaining indices stable while removing.
        let mut i = self.hooks.len();
        while i > 0 {
            i -= 1;
            if self.hooks[i].hook_type == ContextHookType::PendingRemoval {
                self.hooks.remove(i);
            }
        }

        self.call_hooks(ContextHookType::NewFramePre);
        self.check_new_frame_sanity();

        self.time += self.io.delta_time as f64;
        self.frame_count += 1;

        self.update_viewports_new_frame();

        // Draw lists hold the atlas's UVs for the whole frame.
        self.atlas.locked = true;
        self.refresh_shared_data();

        self.io.drain_events();
        self.io.metrics_active_allocations = alloc::active_allocations();

        self.call_hooks(ContextHookType::NewFramePost);
        log::trace!("new_frame {}", self.frame_count);
    }

    fn check_new_frame_sanity(&self) {
        assert!(
            self.io.delta_time > 0.0 || self.frame_count == 0,
            "Io::delta_time must be positive after the first frame"
        );
        assert!(
            self.frame_count == 0 || self.frame_count_ended == self.frame_count,
            "new_frame called again without end_frame/render finishing the previous frame"
        );
        assert!(
            self.io.display_size.x >= 0.0 && self.io.display_size.y >= 0.0,
            "Io::display_size must be non-negative"
        );
        assert!(
            self.atlas.is_built(),
            "font atlas not built; call atlas.build() before the first frame"
        );
    }

    fn update_viewports_new_frame(&mut self) {
        // The main viewport tracks the application display verbatim.
        let vp = &mut self.viewports[0];
        vp.pos = Vec2::zero();
        vp.size = self.io.display_size;
        vp.framebuffer_scale = self.io.display_framebuffer_scale;

        for vp in &mut self.viewports {
            vp.data.promote_work_offsets();
            // Clear before any contribution of the new frame is collected;
            // this also invalidates last frame's draw data.
            vp.data.builder.clear();
            vp.data.draw_data.clear();
        }
    }

    fn refresh_shared_data(&mut self) {
        let mut fullscreen = Rect::nothing();
        for vp in &self.viewports {
            fullscreen = fullscreen.add(vp.main_rect());
        }
        self.shared_data.clip_rect_fullscreen = fullscreen.clamped();
        self.shared_data.tex_uv_white_pixel = self.atlas.uv_white_pixel();
        self.shared_data.font_tex_id = self.atlas.tex_id;
        self.shared_data.initial_flags = DrawListFlags {
            allow_vtx_offset: self.io.backend_renderer_has_vtx_offset,
        };
    }

    /// Ends the current frame: unlocks the atlas and clears the per-frame
    /// input accumulators (wheel, character queue). Idempotent — calling it
    /// again in the same frame, or before the first frame, does nothing.
    pub fn end_frame(&mut self) {
        assert!(self.initialized);
        if self.frame_count_ended == self.frame_count {
            return;
        }
        self.call_hooks(ContextHookType::EndFramePre);

        self.atlas.locked = false;
        self.io.state.clear_frame_accumulators();
        self.frame_count_ended = self.frame_count;

        self.call_hooks(ContextHookType::EndFramePost);
        log::trace!("end_frame {}", self.frame_count);
    }

    /// Composes each viewport's draw data from its layers. Runs `end_frame`
    /// first when the caller didn't. After this, [`draw_data`](Self::draw_data)
    /// is valid until the next `new_frame`.
    pub fn render(&mut self) {
        assert!(self.initialized);
        assert!(self.frame_count > 0, "render called before the first new_frame");
        if self.frame_count_ended != self.frame_count {
            self.end_frame();
        }
        // A repeat render of the same frame recomposes the existing batches;
        // the overlays are already seeded and must not be added twice.
        let first_render_of_frame = self.frame_count_rendered != self.frame_count;
        self.frame_count_rendered = self.frame_count;
        self.call_hooks(ContextHookType::RenderPre);

        let mut total_vtx = 0;
        let mut total_idx = 0;
        for vp_i in 0..self.viewports.len() {
            // Seed the overlay lists used this frame, then flatten all
            // layers back-to-front into layer 0.
            let frame = self.frame_count;
            let vpd = &mut self.viewports[vp_i].data;
            if first_render_of_frame {
                for (slot, layer) in [(0, DrawLayer::Background), (1, DrawLayer::Foreground)] {
                    if let Some(id) = vpd.overlay_lists[slot] {
                        if vpd.overlay_lists_last_frame[slot] == frame {
                            vpd.builder.add(layer, id);
                        }
                    }
                }
            }
            vpd.builder.flatten_into_single_layer();
            let list_count = vpd.builder.total_list_count();
            vpd.draw_data.cmd_lists.clear();

            let mut vtx = 0;
            let mut idx = 0;
            for i in 0..list_count {
                // Post-flatten, layer 0 holds the full back-to-front order.
                let id = self.viewports[vp_i].data.builder.layer(DrawLayer::Background)[i];
                let list = &mut self.draw_lists[id.index()];
                list.pop_unused_draw_cmd();
                if list.cmd_buffer.is_empty() {
                    // Nothing drawable in this batch; skip it entirely.
                    continue;
                }
                list.validate_for_render();
                vtx += list.vtx_buffer.len();
                idx += list.idx_buffer.len();
                self.viewports[vp_i].data.draw_data.cmd_lists.push(id);
            }

            let vp = &mut self.viewports[vp_i];
            let dd = &mut vp.data.draw_data;
            dd.total_vtx_count = vtx;
            dd.total_idx_count = idx;
            dd.display_pos = vp.pos;
            dd.display_size = vp.size;
            dd.framebuffer_scale = vp.framebuffer_scale;
            dd.valid = true;
            total_vtx += vtx;
            total_idx += idx;
        }

        self.io.metrics_render_vertices = total_vtx;
        self.io.metrics_render_indices = total_idx;
        self.call_hooks(ContextHookType::RenderPost);
        log::trace!(
            "render {}: {} vtx, {} idx",
            self.frame_count,
            total_vtx,
            total_idx
        );
    }

    // ── draw lists ────────────────────────────────────────────────────────

    /// Draw list rendered behind everything in the main viewport. Created on
    /// first use, reset once per frame.
    pub fn background_draw_list(&mut self) -> &mut DrawList {
        self.overlay_draw_list(0, "##background")
    }

    /// Draw list rendered over everything in the main viewport.
    pub fn foreground_draw_list(&mut self) -> &mut DrawList {
        self.overlay_draw_list(1, "##foreground")
    }

    fn overlay_draw_list(&mut self, slot: usize, name: &'static str) -> &mut DrawList {
        assert!(self.frame_count > 0, "overlay draw lists require an active frame");
        let id = match self.viewports[0].data.overlay_lists[slot] {
            Some(id) => id,
            None => {
                let id = self.alloc_draw_list(name);
                self.viewports[0].data.overlay_lists[slot] = Some(id);
                id
            }
        };
        if self.viewports[0].data.overlay_lists_last_frame[slot] != self.frame_count {
            let vp_rect = self.viewports[0].main_rect();
            let list = &mut self.draw_lists[id.index()];
            list.reset_for_new_frame(&self.shared_data);
            list.push_texture_id(self.shared_data.font_tex_id);
            list.push_clip_rect(vp_rect.min, vp_rect.max, false);
            self.viewports[0].data.overlay_lists_last_frame[slot] = self.frame_count;
            self.draw_list_frames[id.index()] = self.frame_count;
        }
        &mut self.draw_lists[id.index()]
    }

    fn alloc_draw_list(&mut self, name: &'static str) -> DrawListId {
        let id = DrawListId(self.draw_lists.len() as u32);
        self.draw_lists.push(DrawList::new(&self.shared_data, name));
        self.draw_list_frames.push(0);
        id
    }

    /// Allocates a content draw list in the arena. The handle stays valid
    /// for the context's lifetime; the list is reset lazily on the first
    /// [`draw_list_mut`](Self::draw_list_mut) access of each frame.
    pub fn create_draw_list(&mut self, name: &'static str) -> DrawListId {
        self.alloc_draw_list(name)
    }

    pub fn draw_list(&self, id: DrawListId) -> &DrawList {
        &self.draw_lists[id.index()]
    }

    /// Mutable access to an arena list, resetting it on first touch each
    /// frame (fresh clip/texture state, empty buffers).
    pub fn draw_list_mut(&mut self, id: DrawListId) -> &mut DrawList {
        assert!(self.frame_count > 0, "draw lists require an active frame");
        if self.draw_list_frames[id.index()] != self.frame_count {
            let list = &mut self.draw_lists[id.index()];
            list.reset_for_new_frame(&self.shared_data);
            list.push_texture_id(self.shared_data.font_tex_id);
            list.push_clip_rect_fullscreen();
            self.draw_list_frames[id.index()] = self.frame_count;
        }
        &mut self.draw_lists[id.index()]
    }

    /// Queues a content list for this frame's composition, in submission
    /// order, between the background and foreground overlays.
    pub fn submit_draw_list(&mut self, id: DrawListId) {
        assert!(
            self.frame_count > 0 && self.frame_count_ended != self.frame_count,
            "submit_draw_list outside the new_frame..end_frame scope"
        );
        debug_assert!(
            self.draw_list_frames[id.index()] == self.frame_count,
            "submitting a draw list that was not touched this frame"
        );
        self.viewports[0].data.builder.add(DrawLayer::Content, id);
    }

    // ── hooks ─────────────────────────────────────────────────────────────

    /// Installs a lifecycle hook; returns its id. Hooks of the same type run
    /// in registration order.
    pub fn add_hook(
        &mut self,
        hook_type: ContextHookType,
        callback: ContextHookCallback,
        user_data: usize,
    ) -> u32 {
        assert!(hook_type != ContextHookType::PendingRemoval);
        self.hook_id_next += 1;
        let id = self.hook_id_next;
        self.hooks.push(ContextHook { id, hook_type, callback, user_data });
        id
    }

    /// Deactivates a hook immediately; the registry slot is reclaimed at the
    /// next `new_frame`. Safe to call from inside a hook callback.
    pub fn remove_hook(&mut self, id: u32) {
        debug_assert!(id != 0);
        for hook in self.hooks.as_mut_slice() {
            if hook.id == id {
                hook.hook_type = ContextHookType::PendingRemoval;
            }
        }
    }

    fn call_hooks(&mut self, hook_type: ContextHookType) {
        // Copy each hook out before invoking so callbacks can add or remove
        // hooks on this same context. Hooks added during dispatch of their
        // own type also run, at the end.
        let mut i = 0;
        while i < self.hooks.len() {
            let hook = self.hooks[i];
            if hook.hook_type == hook_type {
                (hook.callback)(self, &hook);
            }
            i += 1;
        }
    }

    #[cfg(test)]
    fn hook_count(&self) -> usize {
        self.hooks.len()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.call_hooks(ContextHookType::Shutdown);
        self.initialized = false;
        log::debug!("context destroyed after {} frames", self.frame_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::col32;
    use crate::input::MouseButton;

    const WHITE: u32 = col32(255, 255, 255, 255);

    fn ready_context() -> Context {
        let mut ctx = Context::new();
        ctx.io.display_size = Vec2::new(800.0, 600.0);
        ctx.atlas.build();
        ctx
    }

    fn count_key(hook: &ContextHook) -> u32 {
        hook.user_data as u32
    }

    fn counting_hook(ctx: &mut Context, hook: &ContextHook) {
        *ctx.storage.int_ref(count_key(hook), 0) += 1;
    }

    // ── frame ordering ────────────────────────────────────────────────────

    #[test]
    fn frame_and_time_advance() {
        let mut ctx = ready_context();
        ctx.io.delta_time = 0.25;
        assert_eq!(ctx.frame_count(), 0);

        ctx.new_frame();
        ctx.render();
        ctx.new_frame();
        ctx.render();

        assert_eq!(ctx.frame_count(), 2);
        assert!((ctx.time() - 0.5).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "without end_frame")]
    fn double_new_frame_is_fatal() {
        let mut ctx = ready_context();
        ctx.new_frame();
        ctx.new_frame();
    }

    #[test]
    #[should_panic(expected = "delta_time")]
    fn zero_delta_time_is_fatal_after_first_frame() {
        let mut ctx = ready_context();
        ctx.io.delta_time = 0.0;
        ctx.new_frame(); // allowed on the very first frame
        ctx.end_frame();
        ctx.new_frame();
    }

    #[test]
    #[should_panic(expected = "atlas")]
    fn unbuilt_atlas_is_fatal() {
        let mut ctx = Context::new();
        ctx.io.display_size = Vec2::new(100.0, 100.0);
        ctx.new_frame();
    }

    #[test]
    #[should_panic(expected = "display_size")]
    fn negative_display_size_is_fatal() {
        let mut ctx = ready_context();
        ctx.io.display_size = Vec2::new(-1.0, 100.0);
        ctx.new_frame();
    }

    #[test]
    fn end_frame_before_first_frame_is_a_no_op() {
        let mut ctx = ready_context();
        ctx.end_frame();
        assert_eq!(ctx.frame_count(), 0);
    }

    #[test]
    fn end_frame_is_idempotent() {
        let mut ctx = ready_context();
        let key = 77u32;
        ctx.add_hook(ContextHookType::EndFramePost, counting_hook, key as usize);

        ctx.new_frame();
        ctx.end_frame();
        ctx.end_frame();
        ctx.render(); // must not end the frame a second time

        assert_eq!(ctx.storage.get_int(key, 0), 1);
    }

    #[test]
    fn render_ends_the_frame_when_caller_did_not() {
        let mut ctx = ready_context();
        let key = 78u32;
        ctx.add_hook(ContextHookType::EndFramePost, counting_hook, key as usize);

        ctx.new_frame();
        ctx.render();
        assert_eq!(ctx.storage.get_int(key, 0), 1);

        // Next frame is accepted: render ended the previous one.
        ctx.new_frame();
        ctx.render();
        assert_eq!(ctx.storage.get_int(key, 0), 2);
    }

    // ── atlas lock discipline ─────────────────────────────────────────────

    #[test]
    fn atlas_locked_exactly_during_frame() {
        let mut ctx = ready_context();
        assert!(!ctx.atlas.locked);
        ctx.new_frame();
        assert!(ctx.atlas.locked);
        ctx.end_frame();
        assert!(!ctx.atlas.locked);
    }

    // ── input drain / accumulator clearing ────────────────────────────────

    #[test]
    fn events_drain_at_new_frame_and_wheel_clears_at_end() {
        let mut ctx = ready_context();
        ctx.io.add_mouse_wheel_event(Vec2::new(0.0, 2.0));
        ctx.io.add_char_event('q');
        ctx.io.add_mouse_button_event(MouseButton::Left, true);

        ctx.new_frame();
        assert_eq!(ctx.io.state.mouse_wheel, Vec2::new(0.0, 2.0));
        assert_eq!(ctx.io.state.chars, vec!['q']);
        assert!(ctx.io.state.button_down(MouseButton::Left));

        ctx.end_frame();
        assert_eq!(ctx.io.state.mouse_wheel, Vec2::zero());
        assert!(ctx.io.state.chars.is_empty());
        // Down-state persists.
        assert!(ctx.io.state.button_down(MouseButton::Left));
    }

    // ── hooks ─────────────────────────────────────────────────────────────

    #[test]
    fn hooks_dispatch_in_registration_order() {
        fn order_hook(ctx: &mut Context, hook: &ContextHook) {
            let seq = ctx.storage.get_int(0, 0);
            ctx.storage.set_int(hook.user_data as u32, seq);
            ctx.storage.set_int(0, seq + 1);
        }

        let mut ctx = ready_context();
        ctx.add_hook(ContextHookType::NewFramePost, order_hook, 10);
        ctx.add_hook(ContextHookType::NewFramePost, order_hook, 11);
        ctx.new_frame();

        assert_eq!(ctx.storage.get_int(10, -1), 0);
        assert_eq!(ctx.storage.get_int(11, -1), 1);
        ctx.render();
    }

    #[test]
    fn removed_hook_is_swept_not_dispatched() {
        let mut ctx = ready_context();
        let key = 5u32;
        let id = ctx.add_hook(ContextHookType::NewFramePre, counting_hook, key as usize);

        ctx.new_frame();
        ctx.render();
        assert_eq!(ctx.storage.get_int(key, 0), 1);

        ctx.remove_hook(id);
        assert_eq!(ctx.hook_count(), 1); // deactivated, not yet reclaimed
        ctx.new_frame();
        ctx.render();
        assert_eq!(ctx.storage.get_int(key, 0), 1);
        assert_eq!(ctx.hook_count(), 0); // swept at new_frame
    }

    #[test]
    fn hook_can_remove_itself_from_its_own_callback() {
        fn once_hook(ctx: &mut Context, hook: &ContextHook) {
            *ctx.storage.int_ref(hook.user_data as u32, 0) += 1;
            ctx.remove_hook(hook.id);
        }

        let mut ctx = ready_context();
        let key = 6u32;
        ctx.add_hook(ContextHookType::NewFramePost, once_hook, key as usize);

        ctx.new_frame();
        ctx.render();
        ctx.new_frame();
        ctx.render();
        assert_eq!(ctx.storage.get_int(key, 0), 1);
    }

    fn shutdown_flag_hook(ctx: &mut Context, hook: &ContextHook) {
        ctx.storage.set_bool(hook.user_data as u32, true);
        // Storage dies with the context, so surface the call where the test
        // can see it.
        SHUTDOWN_RAN.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    static SHUTDOWN_RAN: std::sync::atomic::AtomicBool =
        std::sync::atomic::AtomicBool::new(false);

    #[test]
    fn shutdown_hook_runs_on_drop() {
        {
            let mut ctx = ready_context();
            ctx.add_hook(ContextHookType::Shutdown, shutdown_flag_hook, 9);
        }
        assert!(SHUTDOWN_RAN.load(std::sync::atomic::Ordering::SeqCst));
    }

    // ── draw-data composition ─────────────────────────────────────────────

    #[test]
    fn draw_data_valid_only_between_render_and_new_frame() {
        let mut ctx = ready_context();
        ctx.new_frame();
        assert!(ctx.draw_data().is_none());
        ctx.background_draw_list()
            .add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        ctx.render();
        assert!(ctx.draw_data().is_some());

        ctx.new_frame();
        assert!(ctx.draw_data().is_none());
        ctx.render();
    }

    #[test]
    fn composition_sums_totals_and_fills_display_fields() {
        let mut ctx = ready_context();
        ctx.new_frame();
        ctx.background_draw_list()
            .add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        ctx.foreground_draw_list()
            .add_line(Vec2::zero(), Vec2::new(5.0, 5.0), WHITE, 1.0);
        ctx.render();

        let dd = ctx.draw_data().unwrap();
        assert_eq!(dd.cmd_lists.len(), 2);
        assert_eq!(dd.total_vtx_count, 8);
        assert_eq!(dd.total_idx_count, 12);
        assert_eq!(dd.display_size, Vec2::new(800.0, 600.0));
        assert_eq!(ctx.io.metrics_render_vertices, 8);
        assert_eq!(ctx.io.metrics_render_indices, 12);
    }

    #[test]
    fn empty_batches_are_skipped() {
        let mut ctx = ready_context();
        ctx.new_frame();
        // Touch the background list without adding geometry.
        let _ = ctx.background_draw_list();
        ctx.render();

        let dd = ctx.draw_data().unwrap();
        assert!(dd.valid);
        assert!(dd.cmd_lists.is_empty());
        assert_eq!(dd.total_vtx_count, 0);
    }

    #[test]
    fn content_lists_compose_between_background_and_foreground() {
        let mut ctx = ready_context();
        let content = ctx.create_draw_list("scene");

        ctx.new_frame();
        ctx.background_draw_list()
            .add_rect_filled(Vec2::zero(), Vec2::new(1.0, 1.0), WHITE);
        ctx.draw_list_mut(content)
            .add_rect_filled(Vec2::zero(), Vec2::new(2.0, 2.0), WHITE);
        ctx.submit_draw_list(content);
        ctx.foreground_draw_list()
            .add_rect_filled(Vec2::zero(), Vec2::new(3.0, 3.0), WHITE);
        ctx.render();

        let dd = ctx.draw_data().unwrap();
        assert_eq!(dd.cmd_lists.len(), 3);
        assert_eq!(dd.cmd_lists[1], content);
        assert_eq!(dd.total_vtx_count, 12);
    }

    #[test]
    fn content_list_resets_on_first_touch_each_frame() {
        let mut ctx = ready_context();
        let content = ctx.create_draw_list("scene");

        ctx.new_frame();
        ctx.draw_list_mut(content)
            .add_rect_filled(Vec2::zero(), Vec2::new(2.0, 2.0), WHITE);
        ctx.submit_draw_list(content);
        ctx.render();
        assert_eq!(ctx.draw_list(content).vtx_buffer.len(), 4);

        // Not submitted this frame: fresh and excluded from draw data.
        ctx.new_frame();
        assert_eq!(ctx.draw_list_mut(content).vtx_buffer.len(), 0);
        ctx.render();
        assert!(ctx.draw_data().unwrap().cmd_lists.is_empty());
    }

    #[test]
    fn batched_scene_merges_into_one_command() {
        let mut ctx = ready_context();
        ctx.new_frame();
        let list = ctx.background_draw_list();
        list.add_circle_filled(Vec2::new(100.0, 100.0), 20.0, WHITE, 0);
        list.add_line(Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0), WHITE, 2.0);
        ctx.render();

        let dd = ctx.draw_data().unwrap();
        let list = ctx.draw_list(dd.cmd_lists[0]);
        // Same clip rect and texture throughout: one merged command.
        assert_eq!(list.cmd_buffer.len(), 1);
        assert_eq!(list.cmd_buffer[0].elem_count as usize, dd.total_idx_count);
    }

    #[test]
    fn two_clip_regions_make_exactly_two_commands() {
        let mut ctx = ready_context();
        ctx.new_frame();
        let list = ctx.background_draw_list();
        list.push_clip_rect(Vec2::zero(), Vec2::new(100.0, 100.0), true);
        list.add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        list.pop_clip_rect();
        list.push_clip_rect(Vec2::new(200.0, 0.0), Vec2::new(300.0, 100.0), true);
        list.add_rect_filled(Vec2::new(210.0, 10.0), Vec2::new(220.0, 20.0), WHITE);
        list.pop_clip_rect();
        ctx.render();

        let dd = ctx.draw_data().unwrap();
        let list = ctx.draw_list(dd.cmd_lists[0]);
        assert_eq!(list.cmd_buffer.len(), 2);
    }

    #[test]
    fn repeat_render_recomposes_identical_draw_data() {
        let mut ctx = ready_context();
        ctx.new_frame();
        ctx.background_draw_list()
            .add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        ctx.render();
        let (lists, vtx, idx) = {
            let dd = ctx.draw_data().unwrap();
            (dd.cmd_lists.clone(), dd.total_vtx_count, dd.total_idx_count)
        };

        // Rendering the same frame again must not seed the overlays twice.
        ctx.render();
        let dd = ctx.draw_data().unwrap();
        assert_eq!(dd.cmd_lists, lists);
        assert_eq!(dd.total_vtx_count, vtx);
        assert_eq!(dd.total_idx_count, idx);
    }

    #[test]
    fn allocation_metric_is_mirrored() {
        let mut ctx = ready_context();
        ctx.new_frame();
        ctx.background_draw_list()
            .add_rect_filled(Vec2::zero(), Vec2::new(10.0, 10.0), WHITE);
        ctx.render();
        ctx.new_frame();
        assert!(ctx.io.metrics_active_allocations > 0);
        ctx.render();
    }

    #[test]
    #[should_panic(expected = "outside the new_frame")]
    fn submitting_outside_a_frame_is_fatal() {
        let mut ctx = ready_context();
        let content = ctx.create_draw_list("scene");
        ctx.new_frame();
        let _ = ctx.draw_list_mut(content);
        ctx.render();
        ctx.submit_draw_list(content);
    }
}
