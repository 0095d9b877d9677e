//! Animation-frame scheduling.
//!
//! Work that must wait for the next paint (measuring a freshly opened overlay,
//! scrolling the highlighted option into view) is queued here. The shell calls
//! [`FrameScheduler::run_frame`] after it has painted.

use std::sync::{Arc, Mutex};

type FrameCallback = Box<dyn FnOnce() + Send>;

/// Handle to a requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Default)]
struct SchedulerInner {
    next_id: u64,
    pending: Vec<(FrameHandle, FrameCallback)>,
}

#[derive(Clone, Default)]
pub struct FrameScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a callback for the next frame.
    pub fn request(&self, callback: impl FnOnce() + Send + 'static) -> Option<FrameHandle> {
        let mut guard = self.inner.lock().ok()?;
        guard.next_id += 1;
        let handle = FrameHandle(guard.next_id);
        guard.pending.push((handle, Box::new(callback)));
        Some(handle)
    }

    /// Cancel a pending callback. Returns true if it had not run yet.
    pub fn cancel(&self, handle: FrameHandle) -> bool {
        let Ok(mut guard) = self.inner.lock() else {
            return false;
        };
        let before = guard.pending.len();
        guard.pending.retain(|(h, _)| *h != handle);
        before != guard.pending.len()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.inner
            .lock()
            .map(|g| g.pending.iter().any(|(h, _)| *h == handle))
            .unwrap_or(false)
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().map(|g| g.pending.len()).unwrap_or(0)
    }

    /// Run every callback queued before this call.
    ///
    /// Callbacks requested while the frame runs are deferred to the next
    /// frame; callbacks cancelled by an earlier callback of the same frame do
    /// not run. Returns the number of callbacks run.
    pub fn run_frame(&self) -> usize {
        let handles: Vec<FrameHandle> = match self.inner.lock() {
            Ok(guard) => guard.pending.iter().map(|(h, _)| *h).collect(),
            Err(_) => return 0,
        };
        let mut count = 0;
        for handle in handles {
            let callback = match self.inner.lock() {
                Ok(mut guard) => guard
                    .pending
                    .iter()
                    .position(|(h, _)| *h == handle)
                    .map(|index| guard.pending.remove(index).1),
                Err(_) => None,
            };
            if let Some(callback) = callback {
                callback();
                count += 1;
            }
        }
        count
    }
}
