use futures::future::{AbortHandle, Abortable};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Cancels the image currently being processed, or the whole batch.
#[derive(Default)]
pub struct BatchCancellation {
    batch_cancelled: AtomicBool,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl BatchCancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborts the in-flight image only; the batch moves on to the next one.
    pub fn cancel_current(&self) {
        if let Some(handle) = self.in_flight_slot().as_ref() {
            log::info!("[CANCELLATION] Cancelling in-flight image");
            handle.abort();
        }
    }

    pub fn cancel_batch(&self) {
        log::info!("[CANCELLATION] Cancelling batch");
        self.batch_cancelled.store(true, Ordering::SeqCst);
        self.cancel_current();
    }

    pub fn is_batch_cancelled(&self) -> bool {
        self.batch_cancelled.load(Ordering::SeqCst)
    }

    /// Runs `task` until it finishes or is aborted. `None` means aborted.
    pub async fn run<F: Future>(&self, task: F) -> Option<F::Output> {
        let (abort_handle, registration) = AbortHandle::new_pair();
        *self.in_flight_slot() = Some(abort_handle.clone());

        if self.is_batch_cancelled() {
            abort_handle.abort();
        }

        let outcome = Abortable::new(task, registration).await.ok();
        *self.in_flight_slot() = None;
        outcome
    }

    fn in_flight_slot(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
