//! Upload checks and stored-file naming.
//!
//! An upload is accepted when the client file name carries an image
//! extension we serve AND the bytes themselves sniff as one of those formats.
//! The stored name is generated from the sniffed format, never from the
//! client-supplied name.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};
use uuid::Uuid;

use crate::error::CoreError;

/// Sub-directory of the media root holding uploaded images.
pub const UPLOAD_DIR: &str = "uploads";

/// Client file extensions accepted on upload.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// What the sniffer learned about an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffedImage {
    /// Canonical extension for the detected format (e.g. `png`, `jpg`).
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Lower-cased extension of a client file name, if it is one we accept.
pub fn validate_upload_extension(file_name: &str) -> Result<String, CoreError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::Validation(format!(
            "File extension '{ext}' is not allowed. Allowed extensions are: {}.",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        )))
    }
}

/// Sniff the format and read the header dimensions of uploaded bytes.
pub fn sniff_image(bytes: &[u8]) -> Result<SniffedImage, CoreError> {
    const NOT_AN_IMAGE: &str =
        "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

    if bytes.is_empty() {
        return Err(CoreError::Validation("The submitted file is empty.".into()));
    }

    let format =
        image::guess_format(bytes).map_err(|_| CoreError::Validation(NOT_AN_IMAGE.into()))?;
    if !ALLOWED_FORMATS.contains(&format) {
        return Err(CoreError::Validation(NOT_AN_IMAGE.into()));
    }

    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(|_| CoreError::Validation(NOT_AN_IMAGE.into()))?;

    let extension = format.extensions_str().first().copied().unwrap_or("bin");

    Ok(SniffedImage {
        extension,
        width,
        height,
    })
}

/// Relative path (under the media root) for a freshly stored upload.
pub fn stored_file_path(extension: &str) -> String {
    format!("{UPLOAD_DIR}/{}.{extension}", Uuid::new_v4())
}

/// Reject stored paths that could escape the media root.
pub fn validate_stored_path(path: &str) -> Result<(), CoreError> {
    let escapes = path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg == ".." || seg.is_empty());
    if escapes {
        return Err(CoreError::Internal(format!(
            "Refusing media path outside the media root: {path}"
        )));
    }
    Ok(())
}
