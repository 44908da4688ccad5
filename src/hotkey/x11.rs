//! X11 integration — connection, key grabs, and the event pump.
//!
//! Wraps `x11rb::rust_connection::RustConnection` for hotkey registration
//! and the timed event pump driven by the listener thread. The context is
//! owned exclusively by that thread; dropping it closes the connection.

use std::os::fd::{AsRawFd, BorrowedFd};
use std::time::Duration;

use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{self, GrabMode, ModMask, Window};
use x11rb::rust_connection::RustConnection;

use super::HotkeyError;
use super::binding::{KeyCombination, MOD_CAPS_LOCK};
use super::listener::HotkeyBackend;
use super::mapping;

/// The grabs actually held with the server: one keycode registered under
/// every lock-state modifier mask that was granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredGrab {
    pub keycode: u8,
    pub masks: Vec<u16>,
}

/// X11 connection context for the listener thread.
pub struct X11Context {
    conn: RustConnection,
    root: Window,
}

impl X11Context {
    /// Connect to the display named by `$DISPLAY`.
    ///
    /// Failure means there is no active X session; it is reported once and
    /// never retried.
    pub fn connect() -> Result<Self, HotkeyError> {
        let (conn, screen_num) =
            RustConnection::connect(None).map_err(|e| HotkeyError::NoDisplay(e.to_string()))?;

        let root = conn.setup().roots[screen_num].root;

        Ok(Self { conn, root })
    }
}

/// Lock-state mask permutations to grab for a base modifier mask.
///
/// Always the base mask and base|CapsLock; additionally base|NumLock and
/// base|CapsLock|NumLock when a NumLock mask was discovered. The hotkey
/// then fires regardless of lock key state.
fn grab_masks(base: u16, num_lock: Option<u16>) -> Vec<u16> {
    let mut masks = vec![base, base | MOD_CAPS_LOCK];
    if let Some(num) = num_lock {
        masks.push(base | num);
        masks.push(base | MOD_CAPS_LOCK | num);
    }
    masks
}

impl HotkeyBackend for X11Context {
    type Grab = RegisteredGrab;

    /// Register the key grab on the root window under every lock-state
    /// mask.
    ///
    /// Each request is checked synchronously so conflicts surface here
    /// rather than queueing silently. A refused mask is logged and skipped;
    /// zero granted masks is fatal.
    fn register(&self, combo: &KeyCombination) -> Result<RegisteredGrab, HotkeyError> {
        let keycode = mapping::keysym_to_keycode(&self.conn, combo.keysym)?
            .ok_or(HotkeyError::NoKeycode(combo.keysym))?;
        let num_lock = mapping::num_lock_mask(&self.conn)?;

        let mut granted = Vec::new();
        for mask in grab_masks(combo.modifiers, num_lock) {
            let cookie = xproto::grab_key(
                &self.conn,
                true, // owner_events
                self.root,
                ModMask::from(mask),
                keycode,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
            )
            .map_err(|e| HotkeyError::X11(format!("grab_key send: {e}")))?;

            // check() forces a round trip per request.
            match cookie.check() {
                Ok(()) => granted.push(mask),
                Err(e) => tracing::warn!(
                    mask,
                    keycode,
                    error = %e,
                    "XGrabKey refused — combination may be held by another client"
                ),
            }
        }

        if granted.is_empty() {
            return Err(HotkeyError::GrabFailed);
        }

        Ok(RegisteredGrab {
            keycode,
            masks: granted,
        })
    }

    /// Wait up to `timeout` for input on the connection, then drain all
    /// pending events and count key presses matching the grab.
    fn pump(&self, grab: &RegisteredGrab, timeout: Duration) -> Result<usize, HotkeyError> {
        let raw_fd = self.conn.stream().as_raw_fd();
        // SAFETY: raw_fd is the X11 connection fd, valid while conn is alive.
        let borrowed = unsafe { BorrowedFd::borrow_raw(raw_fd) };
        let mut fds = [PollFd::new(borrowed, PollFlags::POLLIN)];

        match poll(&mut fds, PollTimeout::from(timeout.as_millis() as u16)) {
            Ok(0) => Ok(0),
            Ok(_) => {
                let mut presses = 0;
                loop {
                    match self.conn.poll_for_event() {
                        Ok(Some(Event::KeyPress(key))) if key.detail == grab.keycode => {
                            presses += 1;
                        }
                        Ok(Some(_)) => {}
                        Ok(None) => break,
                        Err(e) => {
                            return Err(HotkeyError::X11(format!("poll_for_event: {e}")));
                        }
                    }
                }
                Ok(presses)
            }
            Err(nix::Error::EINTR) => Ok(0),
            Err(e) => Err(HotkeyError::X11(format!("poll on X11 fd: {e}"))),
        }
    }

    /// Release the grab. `AnyModifier` covers every lock-state variant in
    /// one request; safe to call when nothing is held. Best-effort — errors
    /// are logged.
    fn unregister(&self, grab: &RegisteredGrab) {
        tracing::debug!(
            keycode = grab.keycode,
            masks = grab.masks.len(),
            "releasing key grabs"
        );

        if let Err(e) = xproto::ungrab_key(&self.conn, grab.keycode, self.root, ModMask::ANY) {
            tracing::debug!(error = %e, "XUngrabKey failed");
        }

        if let Err(e) = self.conn.flush() {
            tracing::debug!(error = %e, "flush after ungrab failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::binding::{MOD_ALT, MOD_CONTROL};

    const BASE: u16 = MOD_CONTROL | MOD_ALT;

    #[test]
    fn four_masks_when_num_lock_discovered() {
        let masks = grab_masks(BASE, Some(0x10));
        assert_eq!(
            masks,
            vec![BASE, BASE | 0x02, BASE | 0x10, BASE | 0x02 | 0x10]
        );
    }

    #[test]
    fn two_masks_when_num_lock_absent() {
        let masks = grab_masks(BASE, None);
        assert_eq!(masks, vec![BASE, BASE | 0x02]);
    }

    #[test]
    fn base_mask_is_always_first() {
        assert_eq!(grab_masks(BASE, Some(0x80))[0], BASE);
        assert_eq!(grab_masks(BASE, None)[0], BASE);
    }
}
