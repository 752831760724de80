//! Image validation.
//!
//! Every upload is checked here before any network call is made: the
//! file must exist, be non-empty, carry a supported extension, and
//! decode far enough to yield pixel dimensions.

use std::path::Path;

use pantrysnap_core::PantryError;

/// Extensions accepted for conversion.
pub const SUPPORTED_EXTENSIONS: [&str; 8] =
    ["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"];

/// Detect MIME type by file extension. `None` for anything outside the
/// supported set.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Preferred file extension for a MIME type. Used to stage uploads that
/// arrive with a content type but no usable filename.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/bmp" => Some("bmp"),
        "image/tiff" => Some("tif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// What probing a valid image file yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

/// Validate an image file on disk and read its dimensions.
pub fn probe_image(path: &Path) -> Result<ImageInfo, PantryError> {
    let metadata = std::fs::metadata(path).map_err(|_| {
        PantryError::InvalidImage(format!("image file not found: {}", path.display()))
    })?;
    if !metadata.is_file() {
        return Err(PantryError::InvalidImage(format!(
            "not a regular file: {}",
            path.display()
        )));
    }
    if metadata.len() == 0 {
        return Err(PantryError::InvalidImage(format!(
            "image file is empty: {}",
            path.display()
        )));
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let mime_type = mime_for_extension(ext).ok_or_else(|| {
        PantryError::InvalidImage(format!(
            "unsupported image extension {:?} (supported: {})",
            ext,
            SUPPORTED_EXTENSIONS.join(", ")
        ))
    })?;

    let (width, height) = image::ImageReader::open(path)
        .map_err(|e| PantryError::InvalidImage(format!("cannot open {}: {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| PantryError::InvalidImage(format!("cannot read {}: {e}", path.display())))?
        .into_dimensions()
        .map_err(|e| PantryError::InvalidImage(format!("not a decodable image: {e}")))?;

    Ok(ImageInfo {
        mime_type,
        width,
        height,
        size_bytes: metadata.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn mime_table_covers_supported_set() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(mime_for_extension(ext).is_some(), "no mime for {ext}");
        }
        assert_eq!(mime_for_extension("TIF"), Some("image/tiff"));
        assert_eq!(mime_for_extension("txt"), None);
        assert_eq!(mime_for_extension(""), None);
    }

    #[test]
    fn extension_for_mime_is_inverse_enough() {
        assert_eq!(extension_for_mime("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for_mime("image/png"), Some("png"));
        assert_eq!(extension_for_mime("application/pdf"), None);
    }

    #[test]
    fn probes_a_real_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pantry.png");
        RgbImage::from_pixel(3, 2, Rgb([200, 180, 90]))
            .save(&path)
            .unwrap();

        let info = probe_image(&path).unwrap();
        assert_eq!(info.mime_type, "image/png");
        assert_eq!((info.width, info.height), (3, 2));
        assert!(info.size_bytes > 0);
    }

    #[test]
    fn missing_file_is_invalid() {
        let err = probe_image(std::path::Path::new("/nonexistent/receipt.jpg")).unwrap_err();
        assert!(matches!(err, PantryError::InvalidImage(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn zero_byte_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.jpg");
        std::fs::write(&path, b"").unwrap();

        let err = probe_image(&path).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn unsupported_extension_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.txt");
        std::fs::write(&path, b"not an image").unwrap();

        let err = probe_image(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported image extension"));
    }

    #[test]
    fn garbage_bytes_are_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = probe_image(&path).unwrap_err();
        assert!(matches!(err, PantryError::InvalidImage(_)));
    }
}
