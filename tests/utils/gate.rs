use bell::EventHandler;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::setup::GENEROUS;

/// Handler that parks every call until the test hands out a permit
///
/// Lets a test hold workers busy so queue capacity and back-pressure become
/// observable.
#[derive(Clone)]
pub struct Gate {
    permits_tx: Sender<()>,
    permits_rx: Receiver<()>,
    started_tx: Sender<()>,
    started_rx: Receiver<()>,
    handled: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl Gate {
    pub fn new() -> Self {
        let (permits_tx, permits_rx) = unbounded();
        let (started_tx, started_rx) = unbounded();
        Self {
            permits_tx,
            permits_rx,
            started_tx,
            started_rx,
            handled: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Lets `n` parked or future handler calls finish
    pub fn release(&self, n: usize) {
        for _ in 0..n {
            self.permits_tx.send(()).unwrap();
        }
    }

    /// Waits until one more handler call has started
    pub fn await_started(&self) {
        self.started_rx
            .recv_timeout(GENEROUS)
            .expect("handler should have started");
    }

    /// Whether another handler call starts within `timeout`
    pub fn starts_within(&self, timeout: Duration) -> bool {
        self.started_rx.recv_timeout(timeout).is_ok()
    }

    pub fn handled(&self) -> usize {
        self.handled.load(Ordering::SeqCst)
    }
}

impl<T> EventHandler<T> for Gate {
    fn handle(&self, _message: T) {
        let _ = self.started_tx.send(());
        let _ = self.permits_rx.recv();
        self.handled.fetch_add(1, Ordering::SeqCst);
    }

    fn name(&self) -> &'static str {
        "Gate"
    }
}
