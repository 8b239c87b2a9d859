//! Image upload validation and data-URL helpers

use crate::{ImageUpload, Result, SightingImage, WildlifeError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};

/// Largest accepted image, measured on the decoded payload
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Decoded size of a data URL's payload, estimated from its base64 length
pub fn estimated_size(data_url: &str) -> u64 {
    let payload = data_url
        .split_once(',')
        .map(|(_, payload)| payload)
        .unwrap_or(data_url);
    (payload.len() as u64 * 3) / 4
}

/// Validate uploads in order and stamp them with `uploaded_at`.
///
/// The first invalid upload fails the whole batch.
pub fn validate_uploads(
    uploads: &[ImageUpload],
    uploaded_at: DateTime<Utc>,
) -> Result<Vec<SightingImage>> {
    uploads
        .iter()
        .enumerate()
        .map(|(index, upload)| validate_upload(index, upload, uploaded_at))
        .collect()
}

fn validate_upload(
    index: usize,
    upload: &ImageUpload,
    uploaded_at: DateTime<Utc>,
) -> Result<SightingImage> {
    let (name, mime_type, data) = match (
        present(&upload.name),
        present(&upload.mime_type),
        present(&upload.data),
    ) {
        (Some(name), Some(mime_type), Some(data)) => (name, mime_type, data),
        _ => {
            return Err(WildlifeError::validation(format!(
                "Invalid image data at index {}",
                index
            )))
        }
    };

    let estimated = estimated_size(data);
    if estimated > MAX_IMAGE_BYTES {
        return Err(WildlifeError::validation(format!(
            "Image {} exceeds 10MB limit",
            name
        )));
    }

    Ok(SightingImage {
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        size: upload.size.unwrap_or(estimated),
        inline_data: data.to_string(),
        uploaded_at,
    })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Encode raw bytes as a base64 data URL
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Decode a base64 data URL into its MIME type and bytes
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>)> {
    let (header, payload) = data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| WildlifeError::validation("Not a data URL"))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| WildlifeError::validation("Data URL is not base64 encoded"))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| WildlifeError::validation(format!("Invalid base64 payload: {}", e)))?;
    Ok((mime_type.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, data: &str) -> ImageUpload {
        ImageUpload {
            name: Some(name.to_string()),
            mime_type: Some("image/png".to_string()),
            size: None,
            data: Some(data.to_string()),
        }
    }

    #[test]
    fn test_valid_uploads_are_stamped() {
        let now = Utc::now();
        let data = to_data_url("image/png", b"\x89PNG....");
        let images = validate_uploads(&[upload("a.png", &data)], now).unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].name, "a.png");
        assert_eq!(images[0].uploaded_at, now);
        assert_eq!(images[0].size, estimated_size(&data));
    }

    #[test]
    fn test_missing_fields_report_index() {
        let mut broken = upload("b.png", "data:image/png;base64,AAAA");
        broken.mime_type = None;

        let err = validate_uploads(
            &[upload("a.png", "data:image/png;base64,AAAA"), broken],
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid image data at index 1");
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        let payload = "A".repeat((MAX_IMAGE_BYTES as usize / 3) * 4 + 8);
        let data = format!("data:image/png;base64,{}", payload);

        let err = validate_uploads(&[upload("huge.png", &data)], Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "Image huge.png exceeds 10MB limit");
    }

    #[test]
    fn test_data_url_round_trip() {
        let url = to_data_url("image/jpeg", b"hornbill");
        tokio_test::assert_ok!(decode_data_url(&url));
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, b"hornbill");
        assert!(decode_data_url("hornbill").is_err());
    }
}
