use crossbeam_channel::Receiver;
use std::thread;
use std::time::Duration;

/// How long to watch a call to decide that it is blocked
#[allow(dead_code)]
pub const BLOCK_CHECK: Duration = Duration::from_millis(150);

/// Upper bound for things that are expected to happen promptly
#[allow(dead_code)]
pub const GENEROUS: Duration = Duration::from_secs(5);

/// Installs a test-friendly subscriber; later calls are no-ops
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::new("bell=debug"))
        .try_init();
}

/// Runs `f` on its own thread; the receiver yields its result once it returns
#[allow(dead_code)]
pub fn in_background<R, F>(f: F) -> Receiver<R>
where
    R: Send + 'static,
    F: FnOnce() -> R + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx
}
