use std::collections::HashMap;

use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        amenity::{Amenity, AmenityDeletedResponse, AmenityResponse, NewAmenityRequest, UpdateAmenityRequest},
        media::{Media, MediaInsert},
    },
    errors::AppError,
    infrastructure::media::store::{MediaStore, UploadedImage},
    repositories::{amenity::AmenityRepository, category::CategoryRepository},
};

/// Orchestrates the amenity lifecycle: creation, update and deletion of an
/// amenity together with its media, enforcing ownership and keeping media
/// rows and stored content consistent with each other.
pub struct AmenityHandler<A, C, S>
where
    A: AmenityRepository,
    C: CategoryRepository,
    S: MediaStore,
{
    pub amenity_repo: A,
    pub category_repo: C,
    pub media_store: S,
}

impl<A, C, S> AmenityHandler<A, C, S>
where
    A: AmenityRepository,
    C: CategoryRepository,
    S: MediaStore,
{
    pub fn new(amenity_repo: A, category_repo: C, media_store: S) -> Self {
        AmenityHandler {
            amenity_repo,
            category_repo,
            media_store,
        }
    }

    /// Lists all amenities with their media attached.
    pub async fn list_amenities(&self) -> Result<Vec<AmenityResponse>, AppError> {
        let amenities = self.amenity_repo.list_amenities().await?;
        if amenities.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = amenities.iter().map(|a| a.id).collect();
        let mut media_by_amenity: HashMap<Uuid, Vec<Media>> = HashMap::new();
        for media in self.amenity_repo.list_media_for_amenities(&ids).await? {
            media_by_amenity.entry(media.amenity_id).or_default().push(media);
        }

        Ok(amenities
            .into_iter()
            .map(|amenity| {
                let images = media_by_amenity.remove(&amenity.id).unwrap_or_default();
                amenity.into_response(images)
            })
            .collect())
    }

    /// Retrieves a single amenity by its ID
    pub async fn get_amenity(&self, id: &Uuid) -> Result<AmenityResponse, AppError> {
        let amenity = self.require_amenity(id).await?;
        let images = self.amenity_repo.list_media(id).await?;
        Ok(amenity.into_response(images))
    }

    /// Creates a new amenity owned by the caller, storing each accepted
    /// upload and linking it as a media row. The category name must resolve
    /// before anything is written; a storage failure mid-way unwinds the
    /// rows and files already created.
    pub async fn create_amenity(
        &self,
        owner_id: Uuid,
        request: NewAmenityRequest,
        uploads: Vec<UploadedImage>,
    ) -> Result<AmenityResponse, AppError> {
        request.validate()?;

        let category = self
            .category_repo
            .get_category_by_name(&request.category)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Category '{}' not found", request.category))
            })?;

        let amenity = self
            .amenity_repo
            .create_amenity(&request.prepare_for_insert(category.id, owner_id))
            .await?;

        let mut attached = Vec::new();
        if let Err(e) = self.attach_uploads(amenity.id, &uploads, &mut attached).await {
            self.unwind_creation(amenity.id, &attached).await;
            return Err(e);
        }

        tracing::info!(
            amenity_id = %amenity.id,
            media_count = attached.len(),
            "Amenity created"
        );

        Ok(amenity.into_response(attached))
    }

    /// Updates an amenity owned by the caller. Absent fields keep their
    /// stored value. When `purge_images` is set, every existing media row and
    /// its backing content is removed before new uploads are attached.
    pub async fn update_amenity(
        &self,
        id: &Uuid,
        caller_id: Uuid,
        changes: UpdateAmenityRequest,
        purge_images: bool,
        uploads: Vec<UploadedImage>,
    ) -> Result<AmenityResponse, AppError> {
        let amenity = self.require_amenity(id).await?;
        if amenity.owner_id != caller_id {
            return Err(AppError::ForbiddenAccess);
        }

        let updated = if changes.is_noop() {
            amenity
        } else {
            self.amenity_repo.update_amenity(id, &changes).await?
        };

        if purge_images {
            let media = self.amenity_repo.list_media(id).await?;
            for item in &media {
                if let Err(e) = self.media_store.delete(&item.url).await {
                    tracing::warn!("Failed to delete media file {}: {}", item.url, e);
                }
            }
            self.amenity_repo.delete_media_for_amenity(id).await?;
        }

        let mut attached = Vec::new();
        self.attach_uploads(updated.id, &uploads, &mut attached).await?;

        let images = self.amenity_repo.list_media(id).await?;
        Ok(updated.into_response(images))
    }

    /// Deletes an amenity owned by the caller. Backing content is removed
    /// while the media rows are still enumerable, then rows and amenity go
    /// in one transaction.
    pub async fn delete_amenity(
        &self,
        id: &Uuid,
        caller_id: Uuid,
    ) -> Result<AmenityDeletedResponse, AppError> {
        let amenity = self.require_amenity(id).await?;
        if amenity.owner_id != caller_id {
            return Err(AppError::ForbiddenAccess);
        }

        self.remove_amenity_with_media(id).await?;

        Ok(AmenityDeletedResponse {
            message: "Amenity deleted successfully".to_string(),
        })
    }

    async fn remove_amenity_with_media(&self, id: &Uuid) -> Result<(), AppError> {
        let media = self.amenity_repo.list_media(id).await?;
        for item in &media {
            if let Err(e) = self.media_store.delete(&item.url).await {
                tracing::warn!("Failed to delete media file {}: {}", item.url, e);
            }
        }

        self.amenity_repo.delete_amenity(id).await
    }

    async fn require_amenity(&self, id: &Uuid) -> Result<Amenity, AppError> {
        self.amenity_repo
            .get_amenity(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Amenity not found".to_string()))
    }

    /// Stores each upload and links the accepted ones as media rows. Rejected
    /// uploads (content the store does not recognize) are skipped. A storage
    /// or database failure stops the loop; media attached so far is reported
    /// back through `attached` so the caller can decide what to unwind.
    async fn attach_uploads(
        &self,
        amenity_id: Uuid,
        uploads: &[UploadedImage],
        attached: &mut Vec<Media>,
    ) -> Result<(), AppError> {
        for upload in uploads {
            let Some(stored) = self.media_store.save(upload).await? else {
                continue;
            };

            let insert = MediaInsert {
                amenity_id,
                url: stored.url.clone(),
                media_type: stored.media_type,
            };

            match self.amenity_repo.add_media(&insert).await {
                Ok(media) => attached.push(media),
                Err(e) => {
                    // Row insert failed after the file landed in the store
                    if let Err(cleanup) = self.media_store.delete(&stored.url).await {
                        tracing::warn!(
                            "Failed to remove stored file {} after row insert failure: {}",
                            stored.url,
                            cleanup
                        );
                    }
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Best-effort compensation when creation fails part-way: stored files
    /// and the amenity row (with its media rows) are removed so the failed
    /// request leaves nothing behind.
    async fn unwind_creation(&self, amenity_id: Uuid, attached: &[Media]) {
        for media in attached {
            if let Err(e) = self.media_store.delete(&media.url).await {
                tracing::warn!(
                    "Failed to remove stored file {} while unwinding creation: {}",
                    media.url,
                    e
                );
            }
        }

        if let Err(e) = self.amenity_repo.delete_amenity(&amenity_id).await {
            tracing::warn!("Failed to remove amenity {} while unwinding creation: {}", amenity_id, e);
        }
    }
}
