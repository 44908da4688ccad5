//! Content arbitration — pick the single representation a clipboard
//! change contributes to history.

use std::path::Path;

use super::payload::Payload;
use super::snapshot::{ImageData, Snapshot};

/// Decide which representation of `payload` is "the" content.
///
/// Priority, first match wins: raw image, then an image decoded from the
/// first file reference, then text. A degenerate candidate (zero-dimension
/// image, undecodable file, empty string) does not match its clause and the
/// next representation is considered. `None` means the change records
/// nothing.
pub fn arbitrate(payload: &Payload) -> Option<Snapshot> {
    if let Some(image) = &payload.image {
        if !image.is_degenerate() {
            return Some(Snapshot::Image(image.clone()));
        }
    }

    if let Some(path) = payload.files.first() {
        if let Some(image) = image_from_file(path) {
            return Some(Snapshot::Image(image));
        }
    }

    if let Some(text) = &payload.text {
        if !text.is_empty() {
            return Some(Snapshot::Text(text.clone()));
        }
    }

    None
}

/// Decode a local file reference as RGBA8 pixels.
///
/// Only the first reference of a payload is ever consulted; anything that
/// fails to open or decode simply yields `None`.
fn image_from_file(path: &Path) -> Option<ImageData> {
    let decoded = image::ImageReader::open(path).ok()?.decode().ok()?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let image = ImageData {
        width: width as usize,
        height: height as usize,
        bytes: rgba.into_raw(),
    };

    if image.is_degenerate() { None } else { Some(image) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn image(width: usize, height: usize) -> ImageData {
        ImageData {
            width,
            height,
            bytes: vec![0xAB; width * height * 4],
        }
    }

    /// Write a real decodable PNG under a temp dir and return its path.
    fn png_fixture(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let pixels = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        pixels.save(&path).expect("failed to write PNG fixture");
        path
    }

    #[test]
    fn image_wins_over_text() {
        let payload = Payload {
            image: Some(image(4, 4)),
            files: Vec::new(),
            text: Some("also present".into()),
        };
        assert!(matches!(arbitrate(&payload), Some(Snapshot::Image(_))));
    }

    #[test]
    fn text_only_yields_text() {
        let payload = Payload {
            text: Some("plain".into()),
            ..Payload::default()
        };
        assert_eq!(arbitrate(&payload), Some(Snapshot::Text("plain".into())));
    }

    #[test]
    fn empty_string_yields_none() {
        let payload = Payload {
            text: Some(String::new()),
            ..Payload::default()
        };
        assert_eq!(arbitrate(&payload), None);
    }

    #[test]
    fn empty_payload_yields_none() {
        assert_eq!(arbitrate(&Payload::default()), None);
    }

    #[test]
    fn degenerate_image_falls_through_to_text() {
        let payload = Payload {
            image: Some(image(0, 4)),
            files: Vec::new(),
            text: Some("fallback".into()),
        };
        assert_eq!(arbitrate(&payload), Some(Snapshot::Text("fallback".into())));
    }

    #[test]
    fn file_reference_decoding_as_image_wins_over_text() {
        let dir = tempfile::tempdir().unwrap();
        let payload = Payload {
            image: None,
            files: vec![png_fixture(&dir, "shot.png")],
            text: Some("also present".into()),
        };

        match arbitrate(&payload) {
            Some(Snapshot::Image(image)) => {
                assert_eq!((image.width, image.height), (3, 2));
            }
            other => panic!("expected image snapshot, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_file_falls_through_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not an image").unwrap();

        let payload = Payload {
            image: None,
            files: vec![path],
            text: Some("fallback".into()),
        };
        assert_eq!(arbitrate(&payload), Some(Snapshot::Text("fallback".into())));
    }

    #[test]
    fn only_the_first_file_reference_is_consulted() {
        let dir = tempfile::tempdir().unwrap();
        let decodable = png_fixture(&dir, "second.png");
        let missing = dir.path().join("first-missing.png");

        let payload = Payload {
            image: None,
            files: vec![missing, decodable],
            text: None,
        };
        assert_eq!(arbitrate(&payload), None);
    }

    #[test]
    fn missing_file_without_text_yields_none() {
        let payload = Payload {
            image: None,
            files: vec![PathBuf::from("/nonexistent/clip.png")],
            text: None,
        };
        assert_eq!(arbitrate(&payload), None);
    }
}
