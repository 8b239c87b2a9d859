//! Reading image files for upload

use anyhow::{Context, Result};
use std::path::Path;
use wildlife_core::images::{to_data_url, MAX_IMAGE_BYTES};
use wildlife_core::ImageUpload;

/// MIME type guessed from the file extension
pub fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Read an image file into an upload carrying a base64 data URL
pub async fn load_image(path: &Path) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;

    if bytes.len() as u64 > MAX_IMAGE_BYTES {
        anyhow::bail!("Image {} exceeds 10MB limit", path.display());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let mime_type = mime_type_for(path);

    Ok(ImageUpload {
        name: Some(name),
        mime_type: Some(mime_type.to_string()),
        size: Some(bytes.len() as u64),
        data: Some(to_data_url(mime_type, &bytes)),
    })
}

pub async fn load_images(paths: &[std::path::PathBuf]) -> Result<Vec<ImageUpload>> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        uploads.push(load_image(path).await?);
    }
    Ok(uploads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("otter.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("a/b/heron.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("notes")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_load_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hornbill.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let upload = load_image(&path).await.unwrap();
        assert_eq!(upload.name.as_deref(), Some("hornbill.png"));
        assert_eq!(upload.mime_type.as_deref(), Some("image/png"));
        assert_eq!(upload.size, Some(3));
        assert_eq!(upload.data.as_deref(), Some("data:image/png;base64,AQID"));
    }

    #[tokio::test]
    async fn test_missing_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_image(&dir.path().join("missing.jpg")).await;
        tokio_test::assert_err!(result);
    }
}
