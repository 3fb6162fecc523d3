use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::{Validate, ValidationError};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile: Option<String>,
    pub verified: bool,
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct UserInsert {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile: Option<String>,
    pub verified: bool,
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct UserResponse {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub profile: Option<String>,
    pub verified: bool,
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            username: user.username,
            email: user.email,
            profile: user.profile,
            verified: user.verified,
            is_owner: user.is_owner,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 255, message = "First name is required"))]
    pub firstname: String,

    #[validate(length(min = 1, max = 255, message = "Last name is required"))]
    pub lastname: String,

    #[validate(length(min = 3, max = 100, message = "Username must be 3-100 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Must be at least 8 characters"))]
    pub password: String,

    pub profile: Option<String>,

    #[serde(default = "default_false")]
    pub is_owner: bool,
}

/// Returns false, used for serde default.
fn default_false() -> bool {
    false
}

impl NewUser {
    pub fn prepare_for_insert(&self, password_hash: String) -> UserInsert {
        UserInsert {
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            password_hash,
            profile: self.profile.clone(),
            verified: false,
            is_owner: self.is_owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Partial profile update: absent fields leave the stored value untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub firstname: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub lastname: Option<String>,

    #[validate(length(min = 3, max = 100))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Must be at least 8 characters"))]
    pub password: Option<String>,

    pub profile: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_noop(&self) -> bool {
        self.firstname.is_none()
            && self.lastname.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.profile.is_none()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct NewUserResponse {
    pub id: Uuid,
    pub message: String,
}

pub fn validate_profile_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        Ok(_) => {
            let mut err = ValidationError::new("invalid_url_scheme");
            err.message = Some("Profile URL must start with http:// or https://".into());
            Err(err)
        }
        Err(_) => {
            let mut err = ValidationError::new("invalid_url");
            err.message = Some("Invalid profile URL".into());
            Err(err)
        }
    }
}
