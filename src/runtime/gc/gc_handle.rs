/// Handle into the GC heap.
///
/// A `GcHandle` is a lightweight, copyable reference to a heap slot. The
/// generation tag is bumped every time a slot is vacated, so a handle
/// held past the sweep that freed its slot stops resolving instead of
/// aliasing whatever the slot is reused for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GcHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl GcHandle {
    /// Returns the raw heap slot index backing this handle.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Returns the slot generation this handle was issued for.
    pub fn generation(self) -> u32 {
        self.generation
    }

    #[cfg(test)]
    pub fn new_for_test(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}
