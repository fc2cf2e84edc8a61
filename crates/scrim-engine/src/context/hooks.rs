use super::Context;

/// Lifecycle points a hook can attach to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContextHookType {
    NewFramePre,
    NewFramePost,
    EndFramePre,
    EndFramePost,
    RenderPre,
    RenderPost,
    /// Dispatched once when the context is destroyed.
    Shutdown,
    /// Internal sentinel: hook was removed and awaits the sweep at the next
    /// `new_frame`. Never dispatched.
    PendingRemoval,
}

pub type ContextHookCallback = fn(ctx: &mut Context, hook: &ContextHook);

/// An installed lifecycle hook.
///
/// `Copy` on purpose: dispatch copies the hook out of the registry before
/// invoking it, so a callback may freely add or remove hooks on the same
/// context.
#[derive(Debug, Copy, Clone)]
pub struct ContextHook {
    /// Registry id, assigned by `add_hook`, unique per context.
    pub id: u32,
    pub hook_type: ContextHookType,
    pub callback: ContextHookCallback,
    /// Passed through untouched; a callback can use it to find its own
    /// state.
    pub user_data: usize,
}
