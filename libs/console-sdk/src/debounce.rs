//! Single-slot delayed task.
//!
//! A [`DebounceSlot`] holds at most one scheduled task. Scheduling a new task
//! aborts the pending one and restarts the delay; nothing is ever queued.

use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Default)]
pub struct DebounceSlot {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebounceSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`, superseding whatever is pending.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.pending.lock();
        if let Some(prev) = slot.take()
            && !prev.is_finished()
        {
            prev.abort();
            tracing::trace!("superseded pending debounced task");
        }
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Abort the pending task. Returns `true` if one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebounceSlot {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}
