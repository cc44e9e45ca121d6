//! Accepting and decoding user uploads.
//!
//! Decode success is the only acceptance gate: no dimension or content checks
//! are made beyond the declared extension and the codec itself.

use std::path::Path;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// File extensions the upload control accepts (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Raw upload as received: bytes plus the name the client declared.
/// Lives for one request only.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedImage { file_name: file_name.into(), bytes }
    }

    /// Reads an upload from disk, keeping the path's file name as the declared name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_owned();
        Ok(UploadedImage { file_name, bytes })
    }

    /// Lower-cased extension of the declared file name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
    }

    /// Rejects anything outside jpg/jpeg/png, then decodes with the image codec.
    pub fn decode(&self) -> Result<DynamicImage> {
        match self.extension() {
            Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => {}
            other => {
                warn!(file = %self.file_name, "rejected upload with unsupported extension");
                return Err(Error::Decode(format!(
                    "unsupported file type '{}'; expected one of: {}",
                    other.unwrap_or_default(),
                    SUPPORTED_EXTENSIONS.join(", ")
                )));
            }
        }

        let img = image::load_from_memory(&self.bytes).map_err(|e| {
            warn!(file = %self.file_name, error = %e, "upload could not be decoded");
            Error::Decode(format!("'{}' is not a readable image: {}", self.file_name, e))
        })?;
        debug!(
            file = %self.file_name,
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "decoded upload"
        );
        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, image::Rgb([10, 200, 30])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageOutputFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decodes_png_with_uppercase_extension() {
        let img = UploadedImage::new("LEAF.PNG", png_bytes()).decode().unwrap();
        assert_eq!((img.width(), img.height()), (8, 6));
    }

    #[test]
    fn rejects_unsupported_extension() {
        let err = UploadedImage::new("leaf.gif", png_bytes()).decode().unwrap_err();
        assert!(matches!(err, Error::Decode(msg) if msg.contains("unsupported file type")));
    }

    #[test]
    fn rejects_missing_extension() {
        let err = UploadedImage::new("leaf", png_bytes()).decode().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn rejects_corrupted_bytes() {
        let err = UploadedImage::new("leaf.jpg", b"definitely not a jpeg".to_vec())
            .decode()
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn from_path_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        std::fs::write(&path, png_bytes()).unwrap();
        let upload = UploadedImage::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "sample.png");
        assert_eq!(upload.extension().as_deref(), Some("png"));
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = UploadedImage::from_path(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
