use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::user::{UpdateUserRequest, User, UserInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxUserRepo,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn user_exists(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
    async fn create_user(&self, user: &UserInsert) -> Result<Uuid, AppError>;

    /// Partial update: `None` fields keep their stored value. The password
    /// arrives pre-hashed or not at all.
    async fn update_user(
        &self,
        id: &Uuid,
        changes: &UpdateUserRequest,
        password_hash: Option<String>,
    ) -> Result<User, AppError>;

    /// Removes the user's reviews and the user row in one transaction.
    /// Owned amenities must already be gone (the caller cascades them first,
    /// because their media needs store-side cleanup).
    async fn delete_user_with_reviews(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxUserRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn user_exists(&self, id: &Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)"
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(exists)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(user)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create_user(&self, user: &UserInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (
                firstname,
                lastname,
                username,
                email,
                password_hash,
                profile,
                verified,
                is_owner,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#
        )
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile)
        .bind(user.verified)
        .bind(user.is_owner)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("users_email_key") {
                    return AppError::Conflict("User with this email already exists".into());
                }
                if db_err.constraint() == Some("users_username_key") {
                    return AppError::Conflict("Username is already taken".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(id)
    }

    async fn update_user(
        &self,
        id: &Uuid,
        changes: &UpdateUserRequest,
        password_hash: Option<String>,
    ) -> Result<User, AppError> {
        // COALESCE keeps the stored value for every absent field
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                firstname = COALESCE($1, firstname),
                lastname = COALESCE($2, lastname),
                username = COALESCE($3, username),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                profile = COALESCE($6, profile),
                updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#
        )
        .bind(&changes.firstname)
        .bind(&changes.lastname)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(password_hash)
        .bind(&changes.profile)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("users_email_key") {
                    return AppError::Conflict("User with this email already exists".into());
                }
                if db_err.constraint() == Some("users_username_key") {
                    return AppError::Conflict("Username is already taken".into());
                }
            }
            AppError::from(e)
        })?;

        user.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn delete_user_with_reviews(&self, id: &Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        sqlx::query("DELETE FROM reviews WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tx.commit().await.map_err(AppError::from)?;

        Ok(())
    }
}
