use core::ops::{Deref, DerefMut};

use crate::alloc;

/// Growable contiguous storage used for every dynamic collection in the engine
/// (command buffers, vertex/index buffers, key-value tables, hook lists).
///
/// Growth policy: capacity grows geometrically (×1.5, minimum 8) and is never
/// shrunk implicitly — per-frame collections reach a steady-state capacity and
/// then stop allocating. Call [`clear_free_memory`](Self::clear_free_memory)
/// to actually release storage.
///
/// Unlike the raw-byte container this replaces, elements are properly
/// constructed and dropped; [`resize`](Self::resize) fills new slots with
/// `T::default()` instead of leaving them uninitialized.
///
/// Indexing out of `[0, len)` is a programmer error and panics.
#[derive(Debug)]
pub struct Buffer<T> {
    data: Vec<T>,
    // True once we reported a live allocation to the alloc counter.
    counted: bool,
}

impl<T> Buffer<T> {
    #[inline]
    pub const fn new() -> Self {
        Self { data: Vec::new(), counted: false }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Next capacity for a request of `needed` slots: ×1.5 growth, minimum 8.
    #[inline]
    fn grow_capacity(&self, needed: usize) -> usize {
        let cap = self.data.capacity();
        let next = if cap > 0 { cap + cap / 2 } else { 8 };
        next.max(needed)
    }

    /// Grows capacity to at least `new_capacity` without changing length.
    /// Never shrinks.
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity <= self.data.capacity() {
            return;
        }
        let was_empty = self.data.capacity() == 0;
        self.data.reserve_exact(new_capacity - self.data.len());
        if was_empty && !self.counted {
            alloc::note_alloc();
            self.counted = true;
        }
    }

    #[inline]
    fn grow_for(&mut self, needed: usize) {
        if needed > self.data.capacity() {
            let cap = self.grow_capacity(needed);
            self.reserve(cap);
        }
    }

    pub fn push(&mut self, value: T) {
        self.grow_for(self.data.len() + 1);
        self.data.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.data.pop()
    }

    /// Inserts at `index`, shifting later elements right. O(n).
    pub fn insert(&mut self, index: usize, value: T) {
        self.grow_for(self.data.len() + 1);
        self.data.insert(index, value);
    }

    /// Removes at `index`, shifting later elements left. O(n).
    #[inline]
    pub fn remove(&mut self, index: usize) -> T {
        self.data.remove(index)
    }

    /// Removes at `index` by swapping with the last element. O(1), reorders.
    #[inline]
    pub fn swap_remove(&mut self, index: usize) -> T {
        self.data.swap_remove(index)
    }

    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Resets length to 0. Capacity is retained for reuse next frame.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Releases the backing storage entirely.
    pub fn clear_free_memory(&mut self) {
        if self.counted {
            alloc::note_free();
            self.counted = false;
        }
        self.data = Vec::new();
    }

    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.data.last()
    }

    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.data.last_mut()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Clone + Default> Buffer<T> {
    /// Sets the logical length to `new_len`, growing storage if needed.
    /// New slots are filled with `T::default()`.
    pub fn resize(&mut self, new_len: usize) {
        if new_len > self.data.capacity() {
            let cap = self.grow_capacity(new_len);
            self.reserve(cap);
        }
        self.data.resize(new_len, T::default());
    }
}

impl<T: Copy> Buffer<T> {
    /// Bulk append. One `memcpy` for `Copy` payloads; used by the draw-data
    /// flatten pass which must be O(total count), not per-element.
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.grow_for(self.data.len() + other.len());
        self.data.extend_from_slice(other);
    }
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Buffer<T> {
    fn drop(&mut self) {
        if self.counted {
            alloc::note_free();
        }
    }
}

impl<T> Deref for Buffer<T> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for Buffer<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<'a, T> IntoIterator for &'a Buffer<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
