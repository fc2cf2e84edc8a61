use crate::buffer::Buffer;

/// 32-bit key, typically a hash of a caller-chosen identifier.
pub type StoreId = u32;

/// Value slot for [`Storage`].
///
/// A tagged enum rather than a raw union: a read through the wrong
/// accessor is well-defined and yields the caller's default.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StoreValue {
    Int(i32),
    Float(f32),
    /// Opaque caller-managed handle (e.g. an index or a pointer address).
    Ptr(usize),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StoragePair {
    pub key: StoreId,
    pub value: StoreValue,
}

/// Associative container for persistent per-identifier state that must
/// survive across frames (collapse state, cached values).
///
/// The backing buffer is kept sorted by key: queries are a binary search
/// (O(log n)), insertion shifts (O(n)) and is expected to be rare — typically
/// tied to a user interaction, at most once a frame.
///
/// Sortedness is a silent correctness contract. Lookups do not re-verify it;
/// the only moment the buffer may be unsorted is between bulk `push`-style
/// population and an explicit [`build_sort_by_key`](Self::build_sort_by_key).
#[derive(Debug, Default)]
pub struct Storage {
    data: Buffer<StoragePair>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Index of the first pair with `pair.key >= key`.
    #[inline]
    fn lower_bound(&self, key: StoreId) -> usize {
        self.data.as_slice().partition_point(|p| p.key < key)
    }

    fn find(&self, key: StoreId) -> Option<&StoragePair> {
        let i = self.lower_bound(key);
        self.data.as_slice().get(i).filter(|p| p.key == key)
    }

    /// Finds the pair for `key`, inserting `default` at the sorted position
    /// if absent. The returned index is only valid until the next insert.
    fn find_or_insert(&mut self, key: StoreId, default: StoreValue) -> usize {
        let i = self.lower_bound(key);
        if self.data.as_slice().get(i).is_none_or(|p| p.key != key) {
            self.data.insert(i, StoragePair { key, value: default });
        }
        i
    }

    // ── reads (never insert) ──────────────────────────────────────────────

    pub fn get_int(&self, key: StoreId, default: i32) -> i32 {
        match self.find(key) {
            Some(StoragePair { value: StoreValue::Int(v), .. }) => *v,
            _ => default,
        }
    }

    pub fn get_bool(&self, key: StoreId, default: bool) -> bool {
        self.get_int(key, default as i32) != 0
    }

    pub fn get_float(&self, key: StoreId, default: f32) -> f32 {
        match self.find(key) {
            Some(StoragePair { value: StoreValue::Float(v), .. }) => *v,
            _ => default,
        }
    }

    pub fn get_ptr(&self, key: StoreId, default: usize) -> usize {
        match self.find(key) {
            Some(StoragePair { value: StoreValue::Ptr(v), .. }) => *v,
            _ => default,
        }
    }

    // ── writes (insert-or-update) ─────────────────────────────────────────

    pub fn set_int(&mut self, key: StoreId, val: i32) {
        let i = self.find_or_insert(key, StoreValue::Int(val));
        self.data[i].value = StoreValue::Int(val);
    }

    pub fn set_bool(&mut self, key: StoreId, val: bool) {
        self.set_int(key, val as i32);
    }

    pub fn set_float(&mut self, key: StoreId, val: f32) {
        let i = self.find_or_insert(key, StoreValue::Float(val));
        self.data[i].value = StoreValue::Float(val);
    }

    pub fn set_ptr(&mut self, key: StoreId, val: usize) {
        let i = self.find_or_insert(key, StoreValue::Ptr(val));
        self.data[i].value = StoreValue::Ptr(val);
    }

    /// Overwrites every stored value with `Int(val)`. Useful for stores known
    /// to hold only ints (e.g. open/close all tree nodes).
    pub fn set_all_int(&mut self, val: i32) {
        for pair in self.data.as_mut_slice() {
            pair.value = StoreValue::Int(val);
        }
    }

    // ── reference accessors (insert on demand) ────────────────────────────
    //
    // Convenient for read-modify-write. The returned reference is invalidated
    // by any subsequent insert; the borrow checker enforces that.

    pub fn int_ref(&mut self, key: StoreId, default: i32) -> &mut i32 {
        let i = self.find_or_insert(key, StoreValue::Int(default));
        if !matches!(self.data[i].value, StoreValue::Int(_)) {
            self.data[i].value = StoreValue::Int(default);
        }
        match &mut self.data[i].value {
            StoreValue::Int(v) => v,
            _ => unreachable!(),
        }
    }

    pub fn float_ref(&mut self, key: StoreId, default: f32) -> &mut f32 {
        let i = self.find_or_insert(key, StoreValue::Float(default));
        if !matches!(self.data[i].value, StoreValue::Float(_)) {
            self.data[i].value = StoreValue::Float(default);
        }
        match &mut self.data[i].value {
            StoreValue::Float(v) => v,
            _ => unreachable!(),
        }
    }

    pub fn ptr_ref(&mut self, key: StoreId, default: usize) -> &mut usize {
        let i = self.find_or_insert(key, StoreValue::Ptr(default));
        if !matches!(self.data[i].value, StoreValue::Ptr(_)) {
            self.data[i].value = StoreValue::Ptr(default);
        }
        match &mut self.data[i].value {
            StoreValue::Ptr(v) => v,
            _ => unreachable!(),
        }
    }

    // ── bulk population ───────────────────────────────────────────────────

    /// Appends without maintaining sort order. Must be followed by
    /// [`build_sort_by_key`](Self::build_sort_by_key) before any lookup.
    pub fn push_unsorted(&mut self, key: StoreId, value: StoreValue) {
        self.data.push(StoragePair { key, value });
    }

    /// Re-sorts the entire backing buffer. Pays the sort cost once instead of
    /// an O(n) shift per insert during bulk population.
    pub fn build_sort_by_key(&mut self) {
        self.data.as_mut_slice().sort_unstable_by_key(|p| p.key);
    }

    #[cfg(test)]
    fn is_sorted(&self) -> bool {
        self.data.as_slice().windows(2).all(|w| w[0].key <= w[1].key)
    }
}
