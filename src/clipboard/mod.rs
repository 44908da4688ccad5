//! Clipboard capture and restore — payload reading, content arbitration,
//! change watching, and writing history entries back.

pub mod arbiter;
pub mod payload;
pub mod snapshot;
pub mod watch;

use std::borrow::Cow;

use arboard::Clipboard;

use snapshot::Snapshot;

/// Write a history entry back to the system clipboard.
///
/// The watcher observes the write like any other clipboard change, so
/// restoring an entry that is not the current front creates a new front
/// entry in history.
pub fn restore(clipboard: &mut Clipboard, snapshot: &Snapshot) -> Result<(), arboard::Error> {
    match snapshot {
        Snapshot::Text(text) => clipboard.set_text(text.as_str()),
        Snapshot::Image(image) => clipboard.set_image(arboard::ImageData {
            width: image.width,
            height: image.height,
            bytes: Cow::Borrowed(&image.bytes),
        }),
    }
}
