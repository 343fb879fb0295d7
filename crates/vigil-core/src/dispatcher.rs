//! Speech delivery queue.
//!
//! The sampling loop produces alert text; a speech sink consumes it. The
//! two must never share timing: speech synthesis can take seconds, and a
//! blocked sink must not stall observation ticks. The dispatcher owns a
//! dedicated worker thread fed through an unbounded channel, so `enqueue`
//! always returns immediately and delivery stays strictly in order, one
//! message in flight at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

/// Errors a sink may surface. Kept open so callers can wrap anything.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Destination for spoken text. Implementations may block; they run on
/// the dispatcher's private thread.
pub trait SpeechSink: Send {
    fn deliver(&mut self, text: &str) -> Result<(), SinkError>;
}

/// One spoken line, owned by the queue once enqueued.
#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub text: String,
    pub enqueued_at: Instant,
}

enum QueueItem {
    Message(AlertMessage),
    Shutdown,
}

/// Producer handle. Cheap to clone; all clones share the mute flag.
#[derive(Clone)]
pub struct Notifier {
    tx: Sender<QueueItem>,
    muted: Arc<AtomicBool>,
}

impl Notifier {
    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Queue text for delivery. Returns whether it was accepted.
    ///
    /// Mute is checked here, at enqueue time. Messages already in the
    /// queue when mute flips on are still delivered.
    pub fn enqueue(&self, text: impl Into<String>) -> bool {
        if self.is_muted() {
            return false;
        }
        let message = AlertMessage {
            text: text.into(),
            enqueued_at: Instant::now(),
        };
        if self.tx.send(QueueItem::Message(message)).is_err() {
            warn!("speech queue closed, dropping message");
            return false;
        }
        true
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }
}

/// Owns the worker thread. Dropping it shuts the worker down cleanly.
pub struct Dispatcher {
    tx: Sender<QueueItem>,
    muted: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Dispatcher {
    /// Start the worker thread around the given sink.
    pub fn spawn(sink: Box<dyn SpeechSink>) -> Self {
        let (tx, rx) = unbounded();
        let worker = thread::spawn(move || worker_loop(rx, sink));
        Self {
            tx,
            muted: Arc::new(AtomicBool::new(false)),
            worker: Some(worker),
        }
    }

    /// A producer handle sharing this dispatcher's queue and mute flag.
    pub fn notifier(&self) -> Notifier {
        Notifier {
            tx: self.tx.clone(),
            muted: Arc::clone(&self.muted),
        }
    }

    /// Drain the queue and stop the worker. Messages enqueued before the
    /// call are delivered first; the sentinel bypasses the mute flag. Safe
    /// to call twice, the second call is a no-op.
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.tx.send(QueueItem::Shutdown);
            let _ = worker.join();
            debug!("speech worker stopped");
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(rx: Receiver<QueueItem>, mut sink: Box<dyn SpeechSink>) {
    for item in rx {
        match item {
            QueueItem::Message(message) => {
                // Sink failures are per-message: log and keep going.
                if let Err(e) = sink.deliver(&message.text) {
                    warn!(error = %e, text = %message.text, "speech delivery failed");
                }
            }
            QueueItem::Shutdown => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Captures delivered text into a shared list.
    struct RecordingSink {
        delivered: Arc<Mutex<Vec<String>>>,
        delay: Duration,
        fail_on: Option<String>,
    }

    impl RecordingSink {
        fn new(delivered: Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                delivered,
                delay: Duration::ZERO,
                fail_on: None,
            }
        }
    }

    impl SpeechSink for RecordingSink {
        fn deliver(&mut self, text: &str) -> Result<(), SinkError> {
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            if self.fail_on.as_deref() == Some(text) {
                return Err("synthetic sink failure".into());
            }
            self.delivered.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn delivers_in_enqueue_order() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::spawn(Box::new(RecordingSink::new(delivered.clone())));
        let notifier = dispatcher.notifier();

        for i in 0..10 {
            assert!(notifier.enqueue(format!("line {i}")));
        }
        dispatcher.shutdown();

        let got = delivered.lock().unwrap();
        assert_eq!(got.len(), 10);
        assert_eq!(got[0], "line 0");
        assert_eq!(got[9], "line 9");
    }

    #[test]
    fn slow_sink_never_blocks_the_producer() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let mut sink = RecordingSink::new(delivered.clone());
        sink.delay = Duration::from_millis(50);
        let mut dispatcher = Dispatcher::spawn(Box::new(sink));
        let notifier = dispatcher.notifier();

        let started = Instant::now();
        for i in 0..5 {
            notifier.enqueue(format!("slow {i}"));
        }
        // Five 50 ms deliveries are pending; enqueue must return at once.
        assert!(started.elapsed() < Duration::from_millis(50));

        dispatcher.shutdown();
        assert_eq!(delivered.lock().unwrap().len(), 5);
    }

    #[test]
    fn sink_failure_does_not_stop_the_worker() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let mut sink = RecordingSink::new(delivered.clone());
        sink.fail_on = Some("bad".to_string());
        let mut dispatcher = Dispatcher::spawn(Box::new(sink));
        let notifier = dispatcher.notifier();

        notifier.enqueue("first");
        notifier.enqueue("bad");
        notifier.enqueue("last");
        dispatcher.shutdown();

        assert_eq!(*delivered.lock().unwrap(), vec!["first", "last"]);
    }

    #[test]
    fn test_mute_applies_at_enqueue_time() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::spawn(Box::new(RecordingSink::new(delivered.clone())));
        let notifier = dispatcher.notifier();

        assert!(notifier.enqueue("before"));
        notifier.set_muted(true);
        assert!(!notifier.enqueue("while muted"));
        notifier.set_muted(false);
        assert!(notifier.enqueue("after"));
        dispatcher.shutdown();

        assert_eq!(*delivered.lock().unwrap(), vec!["before", "after"]);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::spawn(Box::new(RecordingSink::new(delivered.clone())));
        let notifier = dispatcher.notifier();

        notifier.enqueue("only");
        dispatcher.shutdown();
        dispatcher.shutdown();

        assert_eq!(delivered.lock().unwrap().len(), 1);
        // Post-shutdown enqueues are rejected, not panics.
        assert!(!notifier.enqueue("late"));
    }

    #[test]
    fn drop_drains_the_queue() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        {
            let dispatcher = Dispatcher::spawn(Box::new(RecordingSink::new(delivered.clone())));
            let notifier = dispatcher.notifier();
            notifier.enqueue("a");
            notifier.enqueue("b");
        }
        assert_eq!(*delivered.lock().unwrap(), vec!["a", "b"]);
    }
}
