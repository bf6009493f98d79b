use std::cell::Cell;

/// A counter that can be bumped through a shared reference.
///
/// Read-path operations (`top`, `peek`, `contains`) only take `&self`, so
/// their counters live in a `Cell`. Queues are single-threaded; holding a
/// `MetricsCell` makes the owning queue `!Sync`.
#[repr(transparent)]
#[derive(Debug, Default, Clone)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }
}
