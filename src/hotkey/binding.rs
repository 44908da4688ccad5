//! The activation key combination.
//!
//! The combination is fixed at Ctrl+Alt+V. Modifier bits are the X11 core
//! protocol values, carried as raw `u16` and converted to `ModMask` at the
//! grab call sites.

/// X11 keysym for lowercase `v`.
pub const XK_V: u32 = 0x0076;
/// X11 keysym for `Num_Lock`.
pub const XK_NUM_LOCK: u32 = 0xff7f;

/// ControlMask (bit 2).
pub const MOD_CONTROL: u16 = 0x0004;
/// Mod1Mask (bit 3) — Alt on stock layouts.
pub const MOD_ALT: u16 = 0x0008;
/// LockMask (bit 1) — CapsLock.
pub const MOD_CAPS_LOCK: u16 = 0x0002;

/// A key plus its base modifier mask.
///
/// Immutable once chosen; resolved to a platform keycode at registration
/// time, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombination {
    pub keysym: u32,
    pub modifiers: u16,
}

impl KeyCombination {
    /// The recall combination: Ctrl+Alt+V.
    pub fn ctrl_alt_v() -> Self {
        Self {
            keysym: XK_V,
            modifiers: MOD_CONTROL | MOD_ALT,
        }
    }
}
