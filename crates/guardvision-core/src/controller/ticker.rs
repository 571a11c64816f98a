//! Rotating status line shown while a run is active.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const SCAN_MESSAGES: [&str; 6] = [
    "Initialising vision core...",
    "Probing text layers in the image...",
    "Matching against the industry terminology list...",
    "Checking spelling in context...",
    "Evaluating brand tone and professionalism...",
    "Compiling the diagnostic report...",
];

pub const TICK_INTERVAL: Duration = Duration::from_secs(2);

/// Publishes the next [`SCAN_MESSAGES`] entry every interval until stopped.
///
/// The first message appears one interval after start. Dropping the ticker
/// aborts its task.
pub struct ScanTicker {
    task: JoinHandle<()>,
}

impl ScanTicker {
    pub fn start(sink: Arc<watch::Sender<String>>, period: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately
            interval.tick().await;
            for message in SCAN_MESSAGES.iter().cycle() {
                interval.tick().await;
                sink.send_replace((*message).to_string());
            }
        });
        Self { task }
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for ScanTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
