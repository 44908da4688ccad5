//! Keyboard and modifier mapping queries — keysym resolution and runtime
//! NumLock discovery.
//!
//! Which modifier bit carries NumLock depends on the current keyboard
//! mapping, so it is looked up from the server's modifier table at
//! registration time instead of being hard-coded.

use x11rb::connection::Connection;
use x11rb::protocol::xproto;

use super::HotkeyError;
use super::binding::XK_NUM_LOCK;

/// Resolve an X11 keysym to a keycode by scanning the keyboard mapping
/// for the full `[min_keycode, max_keycode]` range.
///
/// Returns `Ok(None)` if no keycode produces the keysym (the symbol is
/// absent from this keyboard).
pub fn keysym_to_keycode(
    conn: &impl Connection,
    keysym: u32,
) -> Result<Option<u8>, HotkeyError> {
    let setup = conn.setup();
    let min = setup.min_keycode;
    let max = setup.max_keycode;

    let reply = xproto::get_keyboard_mapping(conn, min, max - min + 1)
        .map_err(|e| HotkeyError::X11(format!("get_keyboard_mapping send: {e}")))?
        .reply()
        .map_err(|e| HotkeyError::X11(format!("get_keyboard_mapping reply: {e}")))?;

    let per = reply.keysyms_per_keycode as usize;
    if per == 0 {
        return Ok(None);
    }

    for (i, row) in reply.keysyms.chunks(per).enumerate() {
        if row.contains(&keysym) {
            return Ok(Some(min + i as u8));
        }
    }

    Ok(None)
}

/// Discover the modifier bitmask currently mapped to NumLock.
///
/// Returns `Ok(None)` when the keyboard maps no `Num_Lock` keysym — the
/// caller then registers only the CapsLock grab variants.
pub fn num_lock_mask(conn: &impl Connection) -> Result<Option<u16>, HotkeyError> {
    let Some(keycode) = keysym_to_keycode(conn, XK_NUM_LOCK)? else {
        return Ok(None);
    };

    let reply = xproto::get_modifier_mapping(conn)
        .map_err(|e| HotkeyError::X11(format!("get_modifier_mapping send: {e}")))?
        .reply()
        .map_err(|e| HotkeyError::X11(format!("get_modifier_mapping reply: {e}")))?;

    Ok(mask_for_keycode(
        &reply.keycodes,
        reply.keycodes_per_modifier() as usize,
        keycode,
    ))
}

/// Scan the 8-row modifier table for `keycode` and return the mask of the
/// row holding it (`1 << row`).
///
/// A well-formed mapping lists a keycode in at most one row; if it appears
/// in several, the last match wins.
fn mask_for_keycode(table: &[u8], keycodes_per_modifier: usize, keycode: u8) -> Option<u16> {
    if keycodes_per_modifier == 0 {
        return None;
    }

    let mut mask = None;
    for (row, entries) in table.chunks(keycodes_per_modifier).enumerate().take(8) {
        if entries.contains(&keycode) {
            mask = Some(1 << row);
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an 8-row table with `keycode` placed in the given rows.
    fn table(keycodes_per_modifier: usize, keycode: u8, rows: &[usize]) -> Vec<u8> {
        let mut table = vec![0u8; 8 * keycodes_per_modifier];
        for &row in rows {
            table[row * keycodes_per_modifier] = keycode;
        }
        table
    }

    #[test]
    fn keycode_in_mod2_row_yields_mod2_mask() {
        let table = table(2, 77, &[4]);
        assert_eq!(mask_for_keycode(&table, 2, 77), Some(0x10));
    }

    #[test]
    fn keycode_in_second_column_is_found() {
        let mut table = vec![0u8; 8 * 4];
        table[5 * 4 + 3] = 92;
        assert_eq!(mask_for_keycode(&table, 4, 92), Some(0x20));
    }

    #[test]
    fn absent_keycode_yields_none() {
        let table = table(2, 77, &[4]);
        assert_eq!(mask_for_keycode(&table, 2, 99), None);
    }

    #[test]
    fn duplicate_rows_last_match_wins() {
        let table = table(2, 77, &[1, 6]);
        assert_eq!(mask_for_keycode(&table, 2, 77), Some(0x40));
    }

    #[test]
    fn empty_table_yields_none() {
        assert_eq!(mask_for_keycode(&[], 0, 77), None);
    }
}
