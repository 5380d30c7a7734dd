//! Upload intake rules and image storage
//!
//! Incoming photos arrive as multipart form data. The file is accepted only
//! when both its file extension and its declared content type are on the
//! image allow-lists and the payload fits the size cap; everything else is
//! rejected before any bytes reach disk or the document store.

use std::path::{Path, PathBuf};

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Multipart field the client uploads the photo under
pub const IMAGE_FIELD: &str = "myImage";

/// Upper bound on an uploaded image, in bytes
pub const MAX_UPLOAD_BYTES: usize = 1_000_000;

/// Request body limit for the upload route, the image cap plus room for the
/// multipart framing around it
pub const UPLOAD_BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// File extensions accepted for uploads, lower case
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Content types accepted for uploads
pub const ALLOWED_IMAGE_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Match `file_name`'s extension against the allow-list, case-insensitively
///
/// Returns the canonical lower-case extension, used later to build the
/// storage key.
pub fn image_extension(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;
    ALLOWED_IMAGE_EXTENSIONS
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(extension))
        .copied()
}

fn is_allowed_mime(content_type: &str) -> bool {
    ALLOWED_IMAGE_MIME_TYPES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(content_type))
}

/// Check an upload against the intake rules
///
/// Both the extension and the content type must pass. A payload over the cap
/// is rejected even when its type checks out; a payload of exactly
/// `MAX_UPLOAD_BYTES` is accepted.
pub fn validate_image(file_name: &str, content_type: &str, size: usize) -> ApiResult<&'static str> {
    let Some(extension) = image_extension(file_name) else {
        return Err(ApiError::UnsupportedMediaType(file_name.to_string()));
    };

    if !is_allowed_mime(content_type) {
        return Err(ApiError::UnsupportedMediaType(content_type.to_string()));
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(ApiError::PayloadTooLarge(MAX_UPLOAD_BYTES));
    }

    Ok(extension)
}

/// Build a fresh storage key for an accepted upload
///
/// The client-supplied file name never becomes a path; only its vetted
/// extension survives.
pub fn storage_key(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extension)
}

/// Map a multipart read failure into the API error space
///
/// A read that trips the request body limit counts as an oversized payload,
/// not a malformed body.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge(MAX_UPLOAD_BYTES);
    }
    ApiError::Validation(format!("Malformed multipart body: {}", e))
}

/// Pull the image field out of a multipart request
///
/// Returns the original file name, the declared content type and the raw
/// bytes. Fields under other names are skipped. A body over the route's
/// limit surfaces here as `PayloadTooLarge`.
pub async fn read_image_field(multipart: &mut Multipart) -> ApiResult<(String, String, Bytes)> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .ok_or_else(|| ApiError::Validation("Image field is missing a file name".to_string()))?
            .to_string();
        let content_type = field
            .content_type()
            .ok_or_else(|| {
                ApiError::Validation("Image field is missing a content type".to_string())
            })?
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok((file_name, content_type, bytes));
    }

    Err(ApiError::Validation(format!(
        "No {} file supplied",
        IMAGE_FIELD
    )))
}

/// Directory-backed image storage
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Open the store, creating the root directory if needed
    pub async fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an accepted upload under its storage key
    pub async fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.root.join(key);
        tokio::fs::write(&path, bytes).await?;
        info!("Stored image {} ({} bytes)", key, bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_type_at_size_cap() {
        let result = validate_image("photo.jpg", "image/jpeg", MAX_UPLOAD_BYTES);
        assert_eq!(result.unwrap(), "jpg");
    }

    #[test]
    fn test_extension_and_mime_match_case_insensitively() {
        let result = validate_image("SHOT.PNG", "IMAGE/PNG", 10);
        assert_eq!(result.unwrap(), "png");
    }

    #[test]
    fn test_rejects_disallowed_extension_despite_image_mime() {
        let result = validate_image("notes.txt", "image/png", 10);
        assert!(matches!(result, Err(ApiError::UnsupportedMediaType(_))));
    }

    #[test]
    fn test_rejects_disallowed_mime_despite_image_extension() {
        let result = validate_image("shot.png", "text/plain", 10);
        assert!(matches!(result, Err(ApiError::UnsupportedMediaType(_))));
    }

    #[test]
    fn test_rejects_file_name_without_extension() {
        let result = validate_image("shot", "image/png", 10);
        assert!(matches!(result, Err(ApiError::UnsupportedMediaType(_))));
    }

    #[test]
    fn test_rejects_payload_over_the_cap() {
        let result = validate_image("shot.png", "image/png", MAX_UPLOAD_BYTES + 1);
        assert!(matches!(
            result,
            Err(ApiError::PayloadTooLarge(MAX_UPLOAD_BYTES))
        ));
    }

    #[test]
    fn test_storage_keys_keep_the_extension_and_never_collide() {
        let first = storage_key("png");
        let second = storage_key("png");
        assert!(first.ends_with(".png"));
        assert!(second.ends_with(".png"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_store_writes_under_its_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::init(dir.path()).await.unwrap();

        store.save("abc.png", b"not really a png").await.unwrap();

        let stored = tokio::fs::read(dir.path().join("abc.png")).await.unwrap();
        assert_eq!(stored, b"not really a png");
    }

    #[tokio::test]
    async fn test_init_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("images").join("live");

        let store = ImageStore::init(&nested).await.unwrap();
        assert_eq!(store.root(), nested.as_path());
        assert!(tokio::fs::metadata(&nested).await.unwrap().is_dir());
    }
}
