//! Cancellable delayed tasks for search-as-you-type.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Runs only the last of a burst of scheduled tasks.
///
/// Every schedule aborts the pending task and bumps a generation counter.
/// The task receives its generation so results can be tagged and any that
/// arrive after a newer request was issued can be dropped with
/// [`Debouncer::is_current`].
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    generation: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            generation: 0,
        }
    }

    /// Run `task` after the quiet period unless another call supersedes it.
    pub fn schedule<F, Fut>(&mut self, handle: &Handle, task: F) -> u64
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.advance();
        let delay = self.delay;
        self.pending = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task(generation).await;
        }));
        generation
    }

    /// Run `task` right away, superseding anything pending.
    pub fn fire_now<F, Fut>(&mut self, handle: &Handle, task: F) -> u64
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.advance();
        handle.spawn(task(generation));
        generation
    }

    /// Abort the pending task, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// Abort the pending task and retire every outstanding generation.
    pub fn invalidate(&mut self) {
        self.advance();
    }

    /// Whether a result tagged `generation` is from the latest request.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }

    fn advance(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;
        self.generation
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_only_last_of_burst_runs() {
        let handle = Handle::current();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        let runs = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicU64::new(0));

        let mut latest = 0;
        for _ in 0..3 {
            let runs = runs.clone();
            let last = last.clone();
            latest = debouncer.schedule(&handle, move |generation| async move {
                runs.fetch_add(1, Ordering::SeqCst);
                last.store(generation, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), latest);
        assert!(debouncer.is_current(latest));
    }

    #[tokio::test]
    async fn test_cancel_stops_pending_task() {
        let handle = Handle::current();
        let mut debouncer = Debouncer::new(Duration::from_millis(30));
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        debouncer.schedule(&handle, move |_| async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.is_pending());
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test]
    async fn test_fire_now_supersedes_pending() {
        let handle = Handle::current();
        let mut debouncer = Debouncer::new(Duration::from_millis(30));
        let runs = Arc::new(AtomicUsize::new(0));

        let delayed = runs.clone();
        let stale = debouncer.schedule(&handle, move |_| async move {
            delayed.fetch_add(10, Ordering::SeqCst);
        });
        let immediate = runs.clone();
        let fresh = debouncer.fire_now(&handle, move |_| async move {
            immediate.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_current(stale));
        assert!(debouncer.is_current(fresh));
    }

    #[tokio::test]
    async fn test_invalidate_retires_in_flight_generation() {
        let handle = Handle::current();
        let mut debouncer = Debouncer::new(Duration::from_millis(30));

        let in_flight = debouncer.fire_now(&handle, |_| async {});
        debouncer.invalidate();

        assert!(!debouncer.is_current(in_flight));
        assert!(!debouncer.is_pending());
    }
}
