//! Listener thread — owns the grab for its whole lifetime and bridges
//! activations to the owning task.
//!
//! Lifecycle: the thread connects and registers on start; a failure there
//! emits exactly one `Completed` and the thread exits without ever sending
//! `Activated`. While running, each iteration observes the stop flag once
//! and then pumps the backend with a 20 ms timeout, so worst-case shutdown
//! latency is one interval. The grab and connection are released before
//! `Completed` is sent, making it safe for the owner to join afterwards.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use super::HotkeyError;
use super::binding::KeyCombination;
use super::x11::X11Context;

/// Event pump timeout. Bounds both input latency and shutdown latency.
pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Notification from the listener thread to the owning task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerEvent {
    /// The grabbed combination was pressed.
    Activated,
    /// The listener released its platform resources; the thread may be
    /// joined. Terminal — sent exactly once, whatever the exit path.
    Completed,
}

/// Platform seam for the listener loop.
///
/// The production implementation is [`X11Context`]; tests script a fake so
/// lifecycle properties run without a display. The backend is constructed
/// on the listener thread and never leaves it.
pub(crate) trait HotkeyBackend {
    type Grab;

    /// Acquire the grab for `combo`.
    fn register(&self, combo: &KeyCombination) -> Result<Self::Grab, HotkeyError>;

    /// Wait up to `timeout` for input and return how many presses of the
    /// grabbed combination arrived.
    fn pump(&self, grab: &Self::Grab, timeout: Duration) -> Result<usize, HotkeyError>;

    /// Release the grab. Idempotent, best-effort.
    fn unregister(&self, grab: &Self::Grab);
}

/// Owning-side handle to the listener thread.
///
/// Exposes only the lifecycle surface — the X11 connection and grab state
/// stay private to the thread.
pub struct HotkeyListener {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl HotkeyListener {
    /// Request cooperative shutdown. Observed within one poll interval.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Join the listener thread. Call only after `Completed` was received
    /// (or the channel closed) — joining earlier races the teardown.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Spawn the X11 listener thread for `combo`.
pub fn spawn(combo: KeyCombination) -> (HotkeyListener, UnboundedReceiver<ListenerEvent>) {
    spawn_with(X11Context::connect, combo)
}

/// Spawn the listener loop over an arbitrary backend factory.
///
/// The factory runs on the listener thread, so the backend (and the
/// platform connection inside it) is created and dropped there.
pub(crate) fn spawn_with<B, F>(
    connect: F,
    combo: KeyCombination,
) -> (HotkeyListener, UnboundedReceiver<ListenerEvent>)
where
    B: HotkeyBackend,
    F: FnOnce() -> Result<B, HotkeyError> + Send + 'static,
{
    let (tx, rx) = unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));

    let stop_flag = stop.clone();
    let thread = std::thread::Builder::new()
        .name("hotkey-listener".into())
        .spawn(move || run(connect, combo, stop_flag, tx))
        .expect("failed to spawn hotkey listener thread");

    (
        HotkeyListener {
            stop,
            thread: Some(thread),
        },
        rx,
    )
}

fn run<B, F>(
    connect: F,
    combo: KeyCombination,
    stop: Arc<AtomicBool>,
    tx: UnboundedSender<ListenerEvent>,
) where
    B: HotkeyBackend,
    F: FnOnce() -> Result<B, HotkeyError>,
{
    let backend = match connect() {
        Ok(backend) => backend,
        Err(e) => {
            tracing::warn!(error = %e, "hotkey unavailable — listener exiting");
            let _ = tx.send(ListenerEvent::Completed);
            return;
        }
    };

    let grab = match backend.register(&combo) {
        Ok(grab) => grab,
        Err(e) => {
            tracing::warn!(error = %e, "hotkey registration failed — listener exiting");
            drop(backend);
            let _ = tx.send(ListenerEvent::Completed);
            return;
        }
    };

    tracing::info!(
        keysym = combo.keysym,
        modifiers = combo.modifiers,
        "global hotkey registered"
    );

    'poll: while !stop.load(Ordering::Relaxed) {
        match backend.pump(&grab, POLL_INTERVAL) {
            Ok(presses) => {
                for _ in 0..presses {
                    if tx.send(ListenerEvent::Activated).is_err() {
                        // Receiver dropped — nothing left to notify.
                        break 'poll;
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "event pump failed — listener exiting");
                break;
            }
        }
    }

    backend.unregister(&grab);
    drop(grab);
    drop(backend);
    let _ = tx.send(ListenerEvent::Completed);
}
