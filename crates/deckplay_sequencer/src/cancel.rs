// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cooperative cancellation handles.

use std::cell::Cell;
use std::rc::Rc;

/// Handle returned by a long-running operation (sequencer run, timer).
///
/// Clones share the same flag. The owner checks the flag at every wave
/// boundary and on every update, so cancelling from any clone stops the run
/// at its next yield point. Playback is single-threaded, so the flag is not
/// `Send`.
#[derive(Debug, Clone, Default)]
pub struct CancellationHandle {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationHandle {
    /// Create a fresh, uncancelled handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}
