use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Counts messages that were enqueued but not yet handled
///
/// One tracker is shared by every endpoint of a registry. `ring` adds one per
/// enqueue, workers subtract one per handler call, and `wait` blocks until the
/// count drains to zero.
#[derive(Debug, Default)]
pub(crate) struct CompletionTracker {
    pending: Mutex<usize>,
    drained: Condvar,
}

impl CompletionTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&self) {
        *self.lock() += 1;
    }

    pub(crate) fn done(&self) {
        let mut pending = self.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    pub(crate) fn pending(&self) -> usize {
        *self.lock()
    }

    /// Blocks until no message is outstanding
    pub(crate) fn wait(&self) {
        let guard = self.lock();
        let _drained = self
            .drained
            .wait_while(guard, |pending| *pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    // The counter stays consistent across a panic, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wait_returns_immediately_when_idle() {
        let tracker = CompletionTracker::new();
        tracker.wait();
        assert_eq!(tracker.pending(), 0);
    }

    #[test]
    fn test_add_and_done_balance() {
        let tracker = CompletionTracker::new();
        tracker.add();
        tracker.add();
        assert_eq!(tracker.pending(), 2);

        tracker.done();
        tracker.done();
        assert_eq!(tracker.pending(), 0);

        // Extra completions never underflow
        tracker.done();
        assert_eq!(tracker.pending(), 0);
    }

    #[test]
    fn test_wait_blocks_until_drained() {
        let tracker = Arc::new(CompletionTracker::new());
        tracker.add();

        let (tx, rx) = mpsc::channel();
        let waiter = {
            let tracker = tracker.clone();
            thread::spawn(move || {
                tracker.wait();
                tx.send(()).unwrap();
            })
        };

        assert!(
            rx.recv_timeout(Duration::from_millis(50)).is_err(),
            "wait should block while work is pending"
        );

        tracker.done();
        rx.recv_timeout(Duration::from_secs(5))
            .expect("wait should return once drained");
        waiter.join().unwrap();
    }
}
