#![forbid(unsafe_code)]

//! Frame scheduling abstraction.
//!
//! Each effect owns its own scheduler instance; there is no shared or global
//! scheduling state. A scheduler hands out one opaque [`FrameHandle`] per
//! request and forgets it on cancel or delivery.

use std::collections::BTreeSet;

/// Opaque id of one pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u64);

/// Host paint-synchronized scheduling primitive.
pub trait FrameScheduler {
    /// Ask for one callback at the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a pending request. Unknown or already-delivered handles are
    /// ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Host-driven deterministic scheduler.
///
/// Nothing fires on its own: the host (or a test) observes
/// [`ManualScheduler::pending`] and delivers frames by calling the animation
/// loop directly, then acknowledges with [`ManualScheduler::deliver`].
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    next_id: u64,
    pending: BTreeSet<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 1,
            pending: BTreeSet::new(),
            requested: 0,
            cancelled: 0,
        }
    }

    /// Handles requested and not yet cancelled or delivered.
    pub fn pending(&self) -> impl Iterator<Item = FrameHandle> + '_ {
        self.pending.iter().copied()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Mark a frame as fired. Returns `false` if it was not pending.
    pub fn deliver(&mut self, handle: FrameHandle) -> bool {
        self.pending.remove(&handle)
    }

    /// Total requests ever made.
    #[must_use]
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total cancellations that hit a pending request.
    #[must_use]
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        // `Default` starts at 0; skip it so handle 0 is never issued.
        self.next_id = self.next_id.max(1);
        let handle = FrameHandle(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.requested += 1;
        self.pending.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.remove(&handle) {
            self.cancelled += 1;
        }
    }
}
