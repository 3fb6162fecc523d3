use std::collections::HashSet;

use tokio::time::{interval, Duration};

use crate::{
    errors::AppError,
    infrastructure::media::store::{FsMediaStore, MediaStore},
    repositories::{amenity::AmenityRepository, sqlx_repo::SqlxAmenityRepo},
};

/// Store writes and media rows are not transactionally coupled, so a crash
/// between the two can leave a file on disk that no row references. The sweep
/// makes that window harmless: unreferenced files are removed periodically.
pub async fn start_orphan_sweep_task(repo: SqlxAmenityRepo, store: FsMediaStore) {
    let mut interval = interval(Duration::from_secs(60 * 60 * 24));

    loop {
        interval.tick().await;

        match sweep_orphaned_media(&repo, &store).await {
            Ok(count) => tracing::info!("Removed {} orphaned media files", count),
            Err(e) => tracing::error!("Orphan sweep failed: {}", e)
        }
    }
}

pub async fn sweep_orphaned_media<R: AmenityRepository>(
    repo: &R,
    store: &FsMediaStore,
) -> Result<u64, AppError> {
    let referenced: HashSet<String> = repo.list_all_media_urls().await?.into_iter().collect();

    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(store.root()).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !referenced.contains(&name) {
            store.delete(&name).await?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::amenity::{Amenity, AmenityInsert, UpdateAmenityRequest};
    use crate::entities::media::{Media, MediaInsert};
    use crate::infrastructure::media::store::UploadedImage;
    use mockall::mock;
    use uuid::Uuid;

    mock! {
        AmenityRepo {}

        #[async_trait::async_trait]
        impl AmenityRepository for AmenityRepo {
            async fn create_amenity(&self, amenity: &AmenityInsert) -> Result<Amenity, AppError>;
            async fn get_amenity(&self, id: &Uuid) -> Result<Option<Amenity>, AppError>;
            async fn list_amenities(&self) -> Result<Vec<Amenity>, AppError>;
            async fn list_amenities_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Amenity>, AppError>;
            async fn update_amenity(
                &self,
                id: &Uuid,
                changes: &UpdateAmenityRequest,
            ) -> Result<Amenity, AppError>;
            async fn delete_amenity(&self, id: &Uuid) -> Result<(), AppError>;
            async fn add_media(&self, media: &MediaInsert) -> Result<Media, AppError>;
            async fn list_media(&self, amenity_id: &Uuid) -> Result<Vec<Media>, AppError>;
            async fn list_media_for_amenities(&self, amenity_ids: &[Uuid]) -> Result<Vec<Media>, AppError>;
            async fn delete_media_for_amenity(&self, amenity_id: &Uuid) -> Result<u64, AppError>;
            async fn list_all_media_urls(&self) -> Result<Vec<String>, AppError>;
        }
    }

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

    #[tokio::test]
    async fn sweep_removes_only_unreferenced_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());

        let upload = UploadedImage {
            file_name: Some("loft.png".to_string()),
            content: PNG_HEADER.to_vec(),
        };
        let referenced = store.save(&upload).await.unwrap().unwrap();
        let orphaned = store.save(&upload).await.unwrap().unwrap();

        let mut repo = MockAmenityRepo::new();
        let kept = referenced.url.clone();
        repo.expect_list_all_media_urls()
            .returning(move || Ok(vec![kept.clone()]));

        let removed = sweep_orphaned_media(&repo, &store).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.root().join(&referenced.url).exists());
        assert!(!store.root().join(&orphaned.url).exists());
    }
}
