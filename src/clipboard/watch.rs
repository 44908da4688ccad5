//! Clipboard change watcher — a dedicated thread that polls the system
//! clipboard and forwards changed payloads to the owning task.
//!
//! The thread owns its clipboard handle outright; the owning task only
//! sees the channel. The payload present at startup primes the diff and is
//! not forwarded — history records changes, not the initial state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use arboard::Clipboard;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use super::payload::Payload;

/// Owning-side handle to the watcher thread.
pub struct ClipboardWatcher {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ClipboardWatcher {
    /// Request cooperative shutdown. Observed within one poll interval.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Join the watcher thread.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Spawn the watcher thread polling every `interval`.
///
/// If the clipboard cannot be opened the thread logs and exits — the
/// channel then closes and the daemon continues without history capture.
pub fn spawn(interval: Duration) -> (ClipboardWatcher, UnboundedReceiver<Payload>) {
    let (tx, rx) = unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));

    let stop_flag = stop.clone();
    let thread = std::thread::Builder::new()
        .name("clipboard-watch".into())
        .spawn(move || {
            let mut clipboard = match Clipboard::new() {
                Ok(clipboard) => clipboard,
                Err(e) => {
                    tracing::warn!(error = %e, "clipboard unavailable — history capture disabled");
                    return;
                }
            };

            let mut last = Payload::read(&mut clipboard);

            while !stop_flag.load(Ordering::Relaxed) {
                std::thread::sleep(interval);

                let current = Payload::read(&mut clipboard);
                if current == last {
                    continue;
                }
                last = current.clone();

                // Transient empty states still advance the diff but record
                // nothing.
                if current.is_empty() {
                    continue;
                }

                if tx.send(current).is_err() {
                    // Receiver dropped — shut down.
                    return;
                }
            }
        })
        .expect("failed to spawn clipboard watch thread");

    (
        ClipboardWatcher {
            stop,
            thread: Some(thread),
        },
        rx,
    )
}
