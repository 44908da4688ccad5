//! Arbitrated clipboard content — one immutable snapshot per change.

/// Raw RGBA8 pixels plus dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: usize,
    pub height: usize,
    pub bytes: Vec<u8>,
}

impl ImageData {
    /// A degenerate image (zero dimension or no pixels) never becomes a
    /// snapshot — some applications briefly publish such payloads while
    /// clearing the clipboard.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0 || self.bytes.is_empty()
    }
}

/// One arbitrated clipboard state. Equality is tag plus content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    Text(String),
    Image(ImageData),
}

impl Snapshot {
    /// Single-line caption for list rendering: the first line of a text
    /// entry (trimmed, at most 80 chars), or the image dimensions.
    pub fn label(&self) -> String {
        match self {
            Snapshot::Text(text) => {
                let first = text.lines().next().unwrap_or_default().trim();
                let mut label: String = first.chars().take(80).collect();
                if first.chars().count() > 80 {
                    label.push_str("...");
                }
                label
            }
            Snapshot::Image(image) => format!("image {}x{}", image.width, image.height),
        }
    }
}
