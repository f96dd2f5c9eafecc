use crossbeam_channel::SendError;
use tracing::warn;

use super::endpoint::Endpoint;
use super::tracker::CompletionTracker;

/// Fans one message out to every endpoint of an event, in registration order
///
/// The tracker is bumped before each send so a worker can never finish the
/// message before it was counted. A send blocks while the target queue is
/// full, which is how slow endpoints push back on the caller. Returns how many
/// endpoints accepted the message.
pub(crate) fn broadcast<T: Clone>(
    event: &str,
    endpoints: &[Endpoint<T>],
    message: T,
    tracker: &CompletionTracker,
) -> usize {
    let mut delivered = 0;

    for endpoint in endpoints {
        tracker.add();
        match endpoint.send(message.clone()) {
            Ok(()) => delivered += 1,
            Err(SendError(_)) => {
                tracker.done();
                warn!(
                    event = %event,
                    endpoint = %endpoint.id(),
                    "Endpoint queue closed - message dropped"
                );
            }
        }
    }

    delivered
}
