use std::cell::Cell;

thread_local! {
    /// Count of live heap blocks owned by [`Buffer`](crate::buffer::Buffer)
    /// instances on this thread.
    ///
    /// Diagnostics only need the number of allocations currently alive, so
    /// this is an explicit counter rather than an allocator hook.
    /// Thread-local because a context and everything it owns live on one
    /// logical thread.
    static ACTIVE_ALLOCATIONS: Cell<isize> = const { Cell::new(0) };
}

/// Records one new heap allocation.
#[inline]
pub(crate) fn note_alloc() {
    ACTIVE_ALLOCATIONS.with(|c| c.set(c.get() + 1));
}

/// Records one released heap allocation.
#[inline]
pub(crate) fn note_free() {
    ACTIVE_ALLOCATIONS.with(|c| c.set(c.get() - 1));
}

/// Returns the number of currently live allocations on this thread.
///
/// Mirrored into `Io::metrics_active_allocations` once per frame; callable
/// directly for debugging.
#[inline]
pub fn active_allocations() -> isize {
    ACTIVE_ALLOCATIONS.with(|c| c.get())
}
