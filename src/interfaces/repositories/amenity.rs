use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::{
        amenity::{Amenity, AmenityInsert, UpdateAmenityRequest},
        media::{Media, MediaInsert},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxAmenityRepo,
};

#[async_trait]
pub trait AmenityRepository: Send + Sync {
    async fn create_amenity(&self, amenity: &AmenityInsert) -> Result<Amenity, AppError>;
    async fn get_amenity(&self, id: &Uuid) -> Result<Option<Amenity>, AppError>;
    async fn list_amenities(&self) -> Result<Vec<Amenity>, AppError>;
    async fn list_amenities_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Amenity>, AppError>;

    /// Partial update: `None` fields keep their stored value.
    async fn update_amenity(
        &self,
        id: &Uuid,
        changes: &UpdateAmenityRequest,
    ) -> Result<Amenity, AppError>;

    /// Removes the amenity's reviews, media rows, and the amenity row in one
    /// transaction. Backing media content must be dealt with first, while the
    /// rows are still enumerable.
    async fn delete_amenity(&self, id: &Uuid) -> Result<(), AppError>;

    async fn add_media(&self, media: &MediaInsert) -> Result<Media, AppError>;
    async fn list_media(&self, amenity_id: &Uuid) -> Result<Vec<Media>, AppError>;
    async fn list_media_for_amenities(&self, amenity_ids: &[Uuid]) -> Result<Vec<Media>, AppError>;
    async fn delete_media_for_amenity(&self, amenity_id: &Uuid) -> Result<u64, AppError>;

    /// Every stored media url, for orphan sweeping.
    async fn list_all_media_urls(&self) -> Result<Vec<String>, AppError>;
}

impl SqlxAmenityRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxAmenityRepo { pool }
    }
}

#[async_trait]
impl AmenityRepository for SqlxAmenityRepo {
    async fn create_amenity(&self, amenity: &AmenityInsert) -> Result<Amenity, AppError> {
        let created = sqlx::query_as::<_, Amenity>(
            r#"
            INSERT INTO amenities (
                name, description, price_per_hour, address,
                category_id, owner_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#
        )
        .bind(&amenity.name)
        .bind(&amenity.description)
        .bind(amenity.price_per_hour)
        .bind(&amenity.address)
        .bind(amenity.category_id)
        .bind(amenity.owner_id)
        .bind(amenity.created_at)
        .bind(amenity.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("amenities_category_id_fkey") {
                    return AppError::NotFound("Category not found".into());
                }
                if db_err.constraint() == Some("amenities_owner_id_fkey") {
                    return AppError::NotFound("Owner not found".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(created)
    }

    async fn get_amenity(&self, id: &Uuid) -> Result<Option<Amenity>, AppError> {
        sqlx::query_as::<_, Amenity>("SELECT * FROM amenities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_amenities(&self) -> Result<Vec<Amenity>, AppError> {
        sqlx::query_as::<_, Amenity>(
            "SELECT * FROM amenities ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_amenities_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Amenity>, AppError> {
        sqlx::query_as::<_, Amenity>(
            "SELECT * FROM amenities WHERE owner_id = $1 ORDER BY created_at DESC"
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn update_amenity(
        &self,
        id: &Uuid,
        changes: &UpdateAmenityRequest,
    ) -> Result<Amenity, AppError> {
        // COALESCE keeps the stored value for every absent field
        let updated = sqlx::query_as::<_, Amenity>(
            r#"
            UPDATE amenities SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                price_per_hour = COALESCE($3, price_per_hour),
                address = COALESCE($4, address),
                category_id = COALESCE($5, category_id),
                updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#
        )
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price_per_hour)
        .bind(&changes.address)
        .bind(changes.category_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("amenities_category_id_fkey") {
                    return AppError::NotFound("Category not found".into());
                }
            }
            AppError::from(e)
        })?;

        updated.ok_or_else(|| AppError::NotFound("Amenity not found".to_string()))
    }

    async fn delete_amenity(&self, id: &Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        sqlx::query("DELETE FROM reviews WHERE amenity_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        sqlx::query("DELETE FROM media WHERE amenity_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        let result = sqlx::query("DELETE FROM amenities WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Amenity not found".to_string()));
        }

        tx.commit().await.map_err(AppError::from)?;

        Ok(())
    }

    async fn add_media(&self, media: &MediaInsert) -> Result<Media, AppError> {
        let created = sqlx::query_as::<_, Media>(
            r#"
            INSERT INTO media (amenity_id, url, media_type)
            VALUES ($1, $2, $3)
            RETURNING *
            "#
        )
        .bind(media.amenity_id)
        .bind(&media.url)
        .bind(media.media_type)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(created)
    }

    async fn list_media(&self, amenity_id: &Uuid) -> Result<Vec<Media>, AppError> {
        sqlx::query_as::<_, Media>(
            "SELECT * FROM media WHERE amenity_id = $1 ORDER BY id"
        )
        .bind(amenity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_media_for_amenities(&self, amenity_ids: &[Uuid]) -> Result<Vec<Media>, AppError> {
        sqlx::query_as::<_, Media>(
            "SELECT * FROM media WHERE amenity_id = ANY($1) ORDER BY id"
        )
        .bind(amenity_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete_media_for_amenity(&self, amenity_id: &Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM media WHERE amenity_id = $1")
            .bind(amenity_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected())
    }

    async fn list_all_media_urls(&self) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT url FROM media")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }
}
