use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::password::validate_password_strength,
    entities::user::{validate_profile_url, UpdateUserRequest, UserResponse},
    errors::{AppError, FieldError},
    infrastructure::auth::password::hash_password,
    infrastructure::media::store::MediaStore,
    repositories::{amenity::AmenityRepository, user::UserRepository},
};

/// Profile reads/updates plus user deletion with its explicit cascade:
/// every owned amenity goes first (media content included), then the user's
/// reviews and the user row.
pub struct UserHandler<U, A, S>
where
    U: UserRepository,
    A: AmenityRepository,
    S: MediaStore,
{
    pub user_repo: U,
    pub amenity_repo: A,
    pub media_store: S,
}

impl<U, A, S> UserHandler<U, A, S>
where
    U: UserRepository,
    A: AmenityRepository,
    S: MediaStore,
{
    pub fn new(user_repo: U, amenity_repo: A, media_store: S) -> Self {
        UserHandler {
            user_repo,
            amenity_repo,
            media_store,
        }
    }

    /// Retrieves the caller's profile
    pub async fn get_profile(&self, user_id: &Uuid) -> Result<UserResponse, AppError> {
        let user = self
            .user_repo
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    /// Partial profile update: absent fields keep their stored value.
    pub async fn update_profile(
        &self,
        user_id: &Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        request.validate()?;

        if let Some(password) = &request.password {
            validate_password_strength(password).map_err(|e| {
                AppError::ValidationError(vec![FieldError {
                    field: "password".to_string(),
                    message: e
                        .message
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Password is too weak".to_string()),
                }])
            })?;
        }
        if let Some(profile) = &request.profile {
            validate_profile_url(profile).map_err(|e| {
                AppError::ValidationError(vec![FieldError {
                    field: "profile".to_string(),
                    message: e
                        .message
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Invalid profile URL".to_string()),
                }])
            })?;
        }

        let password_hash = match &request.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let user = self
            .user_repo
            .update_user(user_id, &request, password_hash)
            .await?;

        Ok(user.into())
    }

    /// Deletes a user. Only self-deletion is allowed. Owned amenities are
    /// removed one by one — backing media content first, then rows — before
    /// the user's reviews and the user row go in one transaction.
    pub async fn delete_user(&self, target_id: &Uuid, caller_id: &Uuid) -> Result<(), AppError> {
        if target_id != caller_id {
            return Err(AppError::ForbiddenAccess);
        }

        if !self.user_repo.user_exists(target_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let amenities = self.amenity_repo.list_amenities_by_owner(target_id).await?;
        for amenity in &amenities {
            let media = self.amenity_repo.list_media(&amenity.id).await?;
            for item in &media {
                if let Err(e) = self.media_store.delete(&item.url).await {
                    tracing::warn!("Failed to delete media file {}: {}", item.url, e);
                }
            }
            self.amenity_repo.delete_amenity(&amenity.id).await?;
        }

        self.user_repo.delete_user_with_reviews(target_id).await?;

        tracing::info!(
            user_id = %target_id,
            amenity_count = amenities.len(),
            "User deleted with owned amenities"
        );

        Ok(())
    }
}
