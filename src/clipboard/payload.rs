//! What the clipboard currently exposes, before arbitration.

use std::path::PathBuf;

use arboard::Clipboard;

use super::snapshot::ImageData;

/// The representations offered by the current clipboard owner. Any subset
/// may be present; arbitration picks at most one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub image: Option<ImageData>,
    pub files: Vec<PathBuf>,
    pub text: Option<String>,
}

impl Payload {
    /// Read every representation the clipboard offers right now.
    ///
    /// An absent representation and a failed read look the same here —
    /// both leave the field empty and arbitration decides what remains.
    pub fn read(clipboard: &mut Clipboard) -> Self {
        let image = clipboard.get_image().ok().map(|image| ImageData {
            width: image.width,
            height: image.height,
            bytes: image.bytes.into_owned(),
        });
        let files = clipboard.get().file_list().unwrap_or_default();
        let text = clipboard.get_text().ok();

        Self { image, files, text }
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.files.is_empty() && self.text.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_payload_is_empty() {
        assert!(Payload::default().is_empty());
    }

    #[test]
    fn any_representation_makes_it_non_empty() {
        let with_text = Payload {
            text: Some(String::new()),
            ..Payload::default()
        };
        assert!(!with_text.is_empty());

        let with_files = Payload {
            files: vec![PathBuf::from("/tmp/a.png")],
            ..Payload::default()
        };
        assert!(!with_files.is_empty());
    }
}
