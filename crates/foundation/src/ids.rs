use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic source of opaque ids.
///
/// Values are never reused for the lifetime of the process, so an id minted
/// for one object can't alias a later one even after the first is dropped.
#[derive(Debug)]
pub struct IdSource {
    next: AtomicU64,
}

impl IdSource {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdSource {
    fn default() -> Self {
        Self::new()
    }
}
