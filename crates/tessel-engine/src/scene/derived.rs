/// Lazily recomputed value that depends on the node and its parent chain.
///
/// `stamp` identifies the current value scene-wide; `parent_stamp` records
/// which parent value it was computed from (`0` = no parent contribution).
/// A value is reusable while it is valid and the parent still reports the
/// same stamp, so ancestor changes are noticed without walking children.
#[derive(Debug, Clone)]
pub(crate) struct Derived<T> {
    value: T,
    stamp: u64,
    parent_stamp: u64,
    valid: bool,
}

impl<T: Copy> Derived<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            stamp: 0,
            parent_stamp: 0,
            valid: false,
        }
    }

    /// Cached value and its stamp, if still current for `parent_stamp`.
    #[inline]
    pub(crate) fn get(&self, parent_stamp: u64) -> Option<(T, u64)> {
        (self.valid && self.parent_stamp == parent_stamp).then_some((self.value, self.stamp))
    }

    #[inline]
    pub(crate) fn store(&mut self, value: T, stamp: u64, parent_stamp: u64) {
        self.value = value;
        self.stamp = stamp;
        self.parent_stamp = parent_stamp;
        self.valid = true;
    }

    #[inline]
    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
    }
}
