// ABOUTME: Image storage for uploaded recipe pictures
// ABOUTME: Decodes base64 data URLs and writes them under the media root
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Image Storage
//!
//! Clients upload images inline as `data:image/<type>;base64,<payload>`. The store decodes
//! the payload, writes it to a file with a random name and returns the public reference
//! that is saved on the recipe or user. Each [`ImageKind`] has its own directory, accepted
//! formats and size limit.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::constants::limits::MAX_AVATAR_BYTES;
use crate::constants::media::{AVATARS_DIR, RECIPE_IMAGES_DIR};
use crate::constants::messages::{AVATAR_FORMAT, AVATAR_TOO_LARGE};
use crate::errors::{AppError, AppResult};

/// What an uploaded image is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Recipe picture
    Recipe,
    /// User avatar: PNG or JPEG, at most 5 MiB
    Avatar,
}

impl ImageKind {
    const ALL: [Self; 2] = [Self::Recipe, Self::Avatar];

    /// Directory below the media root
    #[must_use]
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Recipe => RECIPE_IMAGES_DIR,
            Self::Avatar => AVATARS_DIR,
        }
    }

    /// Request field validation errors are reported under
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Recipe => "image",
            Self::Avatar => "avatar",
        }
    }

    fn check(self, image: &DecodedImage) -> AppResult<()> {
        match self {
            Self::Recipe => Ok(()),
            Self::Avatar if !matches!(image.extension, "png" | "jpg") => {
                Err(AppError::validation(self.field(), AVATAR_FORMAT))
            }
            Self::Avatar if image.bytes.len() > MAX_AVATAR_BYTES => {
                Err(AppError::validation(self.field(), AVATAR_TOO_LARGE))
            }
            Self::Avatar => Ok(()),
        }
    }
}

/// Storage backend for uploaded images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store a data-URL payload and return its public reference
    async fn store(&self, kind: ImageKind, payload: &str) -> AppResult<String>;

    /// Delete a previously stored image; unknown references are ignored
    async fn remove(&self, reference: &str) -> AppResult<()>;
}

/// Remove a stored image, logging instead of failing
///
/// Used after the owning row has already been updated or deleted.
pub async fn discard_image(images: &dyn ImageStore, reference: &str) {
    if let Err(e) = images.remove(reference).await {
        warn!(image = reference, error = %e, "Failed to remove stored image");
    }
}

/// Decoded upload
#[derive(Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// File extension derived from the media type
    pub extension: &'static str,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

/// Parse and decode a `data:image/...;base64,...` URL
///
/// # Errors
///
/// Returns a validation error on the kind's field for anything that is not a base64 data
/// URL of a supported image type
pub fn decode_data_url(kind: ImageKind, payload: &str) -> AppResult<DecodedImage> {
    let invalid = |message: &str| AppError::validation(kind.field(), message);

    let rest = payload
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| invalid("image must be a data URL"))?;
    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| invalid("image data URL has no payload"))?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| invalid("image data URL must be base64 encoded"))?;

    let extension = match media_type.to_ascii_lowercase().as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => return Err(invalid("unsupported image type")),
    };

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|_| invalid("image payload is not valid base64"))?;
    if bytes.is_empty() {
        return Err(invalid("image payload is empty"));
    }

    let image = DecodedImage { extension, bytes };
    kind.check(&image)?;
    Ok(image)
}

/// Stores images on the local filesystem
pub struct LocalImageStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalImageStore {
    /// Create a store writing under `root` and referencing files as `<url_prefix>...`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
        }
    }

    fn path_for(&self, reference: &str) -> Option<PathBuf> {
        let relative = reference.strip_prefix(&self.url_prefix)?;
        // Only files this store wrote, never arbitrary paths
        ImageKind::ALL.iter().find_map(|kind| {
            let file_name = relative.strip_prefix(kind.dir())?.strip_prefix('/')?;
            if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
                return None;
            }
            Some(self.root.join(kind.dir()).join(file_name))
        })
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, kind: ImageKind, payload: &str) -> AppResult<String> {
        let image = decode_data_url(kind, payload)?;

        let dir = self.root.join(kind.dir());
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::storage(format!("Failed to create image directory: {e}")))?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), image.extension);
        fs::write(dir.join(&file_name), &image.bytes)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write image: {e}")))?;

        debug!(file = %file_name, kind = ?kind, bytes = image.bytes.len(), "Stored image");
        Ok(format!("{}{}/{file_name}", self.url_prefix, kind.dir()))
    }

    async fn remove(&self, reference: &str) -> AppResult<()> {
        let Some(path) = self.path_for(reference) else {
            return Ok(());
        };

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(path = %path.display(), "Failed to delete image: {e}");
                Err(AppError::storage(format!("Failed to delete image: {e}")))
            }
        }
    }
}
