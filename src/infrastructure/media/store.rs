use async_trait::async_trait;
use infer::MatcherType;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::{entities::media::MediaType, errors::AppError};

/// An uploaded file as received from the multipart layer.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content: Vec<u8>,
}

/// What the store persisted: the reference to hand to the database and the
/// media type sniffed from the content.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMedia {
    pub url: String,
    pub media_type: MediaType,
}

/// Content store for amenity media.
///
/// `save` returns `Ok(None)` when the upload is rejected (empty body or
/// content that is neither image nor video) — the caller creates no media row
/// for it. An `Err` is a real storage failure and must fail the request.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn save(&self, upload: &UploadedImage) -> Result<Option<StoredMedia>, AppError>;
    async fn delete(&self, url: &str) -> Result<(), AppError>;
}

/// Filesystem-backed store. Files are written under a single root directory
/// with generated names; the stored `url` is the bare filename.
#[derive(Clone)]
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsMediaStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn classify(content: &[u8]) -> Option<(MediaType, &'static str)> {
        let kind = infer::get(content)?;
        match kind.matcher_type() {
            MatcherType::Image => Some((MediaType::Image, kind.extension())),
            MatcherType::Video => Some((MediaType::Video, kind.extension())),
            _ => None,
        }
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn save(&self, upload: &UploadedImage) -> Result<Option<StoredMedia>, AppError> {
        if upload.content.is_empty() {
            tracing::debug!(file_name = ?upload.file_name, "Skipping empty upload");
            return Ok(None);
        }

        let Some((media_type, extension)) = Self::classify(&upload.content) else {
            tracing::debug!(file_name = ?upload.file_name, "Skipping upload with unrecognized content");
            return Ok(None);
        };

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        fs::write(self.root.join(&filename), &upload.content).await?;

        Ok(Some(StoredMedia {
            url: filename,
            media_type,
        }))
    }

    async fn delete(&self, url: &str) -> Result<(), AppError> {
        // Stored urls are bare filenames; anything else is not ours to touch.
        if Path::new(url).file_name().and_then(|n| n.to_str()) != Some(url) {
            return Err(AppError::InvalidInput(format!(
                "Refusing to delete non-local media reference: {}",
                url
            )));
        }

        match fs::remove_file(self.root.join(url)).await {
            Ok(()) => Ok(()),
            // Already gone: deletion is idempotent.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
