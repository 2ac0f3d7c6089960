//! Photo attachment encoding and image URL normalization.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;

use crate::error::ApiError;

/// JPEG quality used for uploads.
pub const JPEG_QUALITY: u8 = 70;

pub const UPLOAD_FILENAME: &str = "image.jpg";
pub const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

/// Decode a picked photo (JPEG, PNG or WebP) and re-encode it as a
/// compressed JPEG ready for upload.
pub fn encode_jpeg(raw: &[u8]) -> Result<Vec<u8>, ApiError> {
    let decoded = image::load_from_memory(raw).map_err(|e| ApiError::InvalidImage(e.to_string()))?;
    let rgb = decoded.to_rgb8();

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| ApiError::InvalidImage(e.to_string()))?;

    tracing::debug!(
        width = rgb.width(),
        height = rgb.height(),
        input_bytes = raw.len(),
        output_bytes = out.get_ref().len(),
        "encoded upload photo"
    );
    Ok(out.into_inner())
}

/// Turn an `imageUrl` from the service into something a client can fetch.
///
/// `http://` is upgraded to `https://`, `https://` is kept, anything else is
/// treated as a path relative to `base_url`.
pub fn normalize_image_url(base_url: &str, image_url: &str) -> String {
    if let Some(rest) = image_url.strip_prefix("http://") {
        return format!("https://{rest}");
    }
    if image_url.starts_with("https://") {
        return image_url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        image_url.trim_start_matches('/')
    )
}
