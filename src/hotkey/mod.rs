//! Global recall hotkey — X11 key grabs, lock-modifier discovery, and the
//! listener thread.
//!
//! Only the listener thread ever touches the X11 connection. The owning
//! task sees the opaque [`HotkeyListener`] handle and the
//! [`ListenerEvent`] channel, nothing else.

pub mod binding;
pub mod listener;
pub mod mapping;
pub mod x11;

use thiserror::Error;

pub use binding::KeyCombination;
pub use listener::{HotkeyListener, ListenerEvent};

/// Hotkey subsystem error.
///
/// None of these are retried. A missing display or a fully refused grab is
/// an environment precondition — the listener reports it through a single
/// `Completed` event and the rest of the daemon continues without hotkey
/// capability.
#[derive(Debug, Error)]
pub enum HotkeyError {
    /// No X display to connect to (e.g. no active session).
    #[error("cannot open X display: {0}")]
    NoDisplay(String),

    /// The target keysym is not produced by any keycode on this keyboard.
    #[error("no keycode produces keysym {0:#06x} on this keyboard")]
    NoKeycode(u32),

    /// Every lock-state grab request was refused.
    #[error("all key grabs were refused")]
    GrabFailed,

    /// An X11 request or the connection itself failed.
    #[error("X11 request failed: {0}")]
    X11(String),
}
