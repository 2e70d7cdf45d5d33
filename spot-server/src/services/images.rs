//! Spot image storage
//!
//! Accepts PNG and JPEG uploads, stores them under `{work_dir}/uploads` with a
//! sanitised name prefixed by a content hash, and serves them back.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::utils::{AppError, AppResult};

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg"];

/// Hex chars of the content hash kept in the stored name
const HASH_PREFIX_LEN: usize = 16;

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Reduce a client filename to ASCII alphanumerics, `.`, `_` and `-`
///
/// Path separators and whitespace become `_`; leading and trailing dots and
/// underscores are stripped. Returns `None` when nothing is left.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let spaced: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Lower-cased extension if it is one we accept
pub fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    SUPPORTED_FORMATS.contains(&ext.as_str()).then_some(ext)
}

/// Filename safe to join onto the uploads dir
fn is_safe_stored_name(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains("..")
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.starts_with('.')
}

/// An image that passed validation and is ready to be written
#[derive(Debug, Clone)]
pub struct ValidatedImage {
    pub stored_name: String,
    pub data: Vec<u8>,
}

/// Result of [`ImageStore::store`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub name: String,
    /// Written by this call rather than already on disk
    pub fresh: bool,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    /// Check name, size and content without touching the disk
    pub fn validate(&self, filename: &str, data: Vec<u8>) -> AppResult<ValidatedImage> {
        let safe_name = sanitize_filename(filename)
            .ok_or_else(|| AppError::validation(format!("Invalid filename: '{}'", filename)))?;

        let ext = allowed_extension(&safe_name).ok_or_else(|| {
            AppError::validation(format!(
                "Unsupported file format. Supported: {}",
                SUPPORTED_FORMATS.join(", ")
            ))
        })?;

        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }

        if data.len() > self.max_bytes {
            return Err(AppError::validation(format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                self.max_bytes,
                self.max_bytes / 1024 / 1024
            )));
        }

        // Verify it's actually an image by trying to load it
        if let Err(e) = image::load_from_memory(&data) {
            return Err(AppError::validation(format!(
                "Invalid image file ({}): {}",
                ext, e
            )));
        }

        let hash = calculate_hash(&data);
        let stored_name = format!("{}_{}", &hash[..HASH_PREFIX_LEN], safe_name);
        Ok(ValidatedImage { stored_name, data })
    }

    /// Write a validated image; identical uploads map to the same file
    pub async fn store(&self, image: ValidatedImage) -> AppResult<StoredImage> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create uploads directory: {}", e)))?;

        let path = self.dir.join(&image.stored_name);
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| AppError::internal(format!("Failed to check stored image: {}", e)))?;
        if exists {
            tracing::debug!(file = %image.stored_name, "Image already stored");
            return Ok(StoredImage {
                name: image.stored_name,
                fresh: false,
            });
        }

        tokio::fs::write(&path, &image.data)
            .await
            .map_err(|e| AppError::internal(format!("Failed to save image: {}", e)))?;

        tracing::info!(file = %image.stored_name, size = image.data.len(), "Image stored");
        Ok(StoredImage {
            name: image.stored_name,
            fresh: true,
        })
    }

    /// Undo a [`store`](Self::store) whose spot write failed
    ///
    /// Only a file this store call created is removed; a deduplicated file
    /// may belong to another spot.
    pub async fn discard(&self, image: &StoredImage) {
        if !image.fresh {
            return;
        }
        match tokio::fs::remove_file(self.dir.join(&image.name)).await {
            Ok(()) => tracing::info!(file = %image.name, "Orphaned image removed"),
            Err(e) => tracing::error!(file = %image.name, error = %e, "Failed to remove orphaned image"),
        }
    }

    /// Read a stored image with its content type
    pub async fn read(&self, filename: &str) -> AppResult<(Vec<u8>, String)> {
        if !is_safe_stored_name(filename) {
            return Err(AppError::validation("Invalid filename"));
        }

        let path = self.dir.join(filename);
        let content = tokio::fs::read(&path)
            .await
            .map_err(|_| AppError::not_found(format!("File {}", filename)))?;
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok((content, mime))
    }
}
