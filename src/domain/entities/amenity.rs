use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::media::Media;

const MAX_NAME_LENGTH: u64 = 255;
const MAX_ADDRESS_LENGTH: u64 = 512;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Amenity {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price_per_hour: f64,
    pub address: String,
    pub category_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AmenityInsert {
    pub name: String,
    pub description: String,
    pub price_per_hour: f64,
    pub address: String,
    pub category_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AmenityResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price_per_hour: f64,
    pub address: String,
    pub category_id: Uuid,
    pub owner_id: Uuid,
    pub images: Vec<Media>,
}

impl Amenity {
    pub fn into_response(self, images: Vec<Media>) -> AmenityResponse {
        AmenityResponse {
            id: self.id,
            name: self.name,
            description: self.description,
            price_per_hour: self.price_per_hour,
            address: self.address,
            category_id: self.category_id,
            owner_id: self.owner_id,
            images,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AmenityDeletedResponse {
    pub message: String,
}

// ───── Input & Validation Requests ──────────────────────────────────

/// Fields required to create an amenity. The category arrives as a *name*
/// and is resolved to an id before any row is written.
#[derive(Debug, Deserialize, Validate)]
pub struct NewAmenityRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 0.0, message = "Price must be non-negative"))]
    pub price_per_hour: f64,

    #[validate(length(min = 1, max = MAX_ADDRESS_LENGTH, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
}

impl NewAmenityRequest {
    pub fn prepare_for_insert(&self, category_id: Uuid, owner_id: Uuid) -> AmenityInsert {
        AmenityInsert {
            name: self.name.clone(),
            description: self.description.clone(),
            price_per_hour: self.price_per_hour,
            address: self.address.clone(),
            category_id,
            owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Partial update: absent fields leave the stored value untouched.
#[derive(Debug, Default)]
pub struct UpdateAmenityRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_per_hour: Option<f64>,
    pub address: Option<String>,
    pub category_id: Option<Uuid>,
}

impl UpdateAmenityRequest {
    pub fn is_noop(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price_per_hour.is_none()
            && self.address.is_none()
            && self.category_id.is_none()
    }
}

// ───── Multipart Forms ──────────────────────────────────────────────

#[derive(Debug, MultipartForm)]
pub struct NewAmenityForm {
    pub name: Text<String>,
    pub description: Text<String>,
    pub price_per_hour: Text<String>,
    pub address: Text<String>,
    pub category: Text<String>,

    #[multipart(rename = "images", limit = "10MB")]
    pub images: Vec<TempFile>,
}

impl NewAmenityForm {
    /// The price field arrives as form text; a value that does not parse is a
    /// hard validation error here, since creation requires it.
    pub fn to_request(&self) -> Result<NewAmenityRequest, crate::errors::AppError> {
        let price_per_hour = self
            .price_per_hour
            .trim()
            .parse::<f64>()
            .map_err(|_| crate::errors::AppError::InvalidInput(
                "price_per_hour must be a number".to_string(),
            ))?;

        Ok(NewAmenityRequest {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price_per_hour,
            address: self.address.trim().to_string(),
            category: self.category.trim().to_string(),
        })
    }
}

#[derive(Debug, MultipartForm)]
pub struct UpdateAmenityForm {
    pub name: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub price_per_hour: Option<Text<String>>,
    pub address: Option<Text<String>>,
    pub category_id: Option<Text<String>>,
    pub delete_all_images: Option<Text<String>>,

    #[multipart(rename = "images", limit = "10MB")]
    pub images: Vec<TempFile>,
}

impl UpdateAmenityForm {
    /// Lenient field extraction: a field that is absent, empty, or does not
    /// parse is treated as "leave unchanged" rather than failing the request.
    pub fn to_request(&self) -> UpdateAmenityRequest {
        UpdateAmenityRequest {
            name: non_empty(&self.name),
            description: non_empty(&self.description),
            price_per_hour: self
                .price_per_hour
                .as_ref()
                .and_then(|t| t.trim().parse::<f64>().ok())
                .filter(|p| p.is_finite() && *p >= 0.0),
            address: non_empty(&self.address),
            category_id: self
                .category_id
                .as_ref()
                .and_then(|t| Uuid::parse_str(t.trim()).ok()),
        }
    }

    /// Case-insensitive comparison against "true", per the form contract.
    pub fn wants_image_purge(&self) -> bool {
        self.delete_all_images
            .as_ref()
            .map(|flag| flag.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

fn non_empty(field: &Option<Text<String>>) -> Option<String> {
    field
        .as_ref()
        .map(|t| t.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_form(price: Option<&str>, flag: Option<&str>) -> UpdateAmenityForm {
        UpdateAmenityForm {
            name: None,
            description: None,
            price_per_hour: price.map(|p| Text(p.to_string())),
            address: None,
            category_id: None,
            delete_all_images: flag.map(|f| Text(f.to_string())),
            images: Vec::new(),
        }
    }

    #[test]
    fn malformed_price_leaves_field_unchanged() {
        let req = update_form(Some("not-a-number"), None).to_request();
        assert!(req.price_per_hour.is_none());
        assert!(req.is_noop());
    }

    #[test]
    fn parseable_price_is_applied() {
        let req = update_form(Some("15.5"), None).to_request();
        assert_eq!(req.price_per_hour, Some(15.5));
    }

    #[test]
    fn negative_price_is_ignored() {
        let req = update_form(Some("-3.0"), None).to_request();
        assert!(req.price_per_hour.is_none());
    }

    #[test]
    fn empty_text_fields_are_treated_as_absent() {
        let form = UpdateAmenityForm {
            name: Some(Text("   ".to_string())),
            description: Some(Text(String::new())),
            price_per_hour: None,
            address: None,
            category_id: Some(Text("not-a-uuid".to_string())),
            delete_all_images: None,
            images: Vec::new(),
        };

        assert!(form.to_request().is_noop());
    }

    #[test]
    fn purge_flag_is_case_insensitive() {
        assert!(update_form(None, Some("TRUE")).wants_image_purge());
        assert!(update_form(None, Some("true")).wants_image_purge());
        assert!(!update_form(None, Some("false")).wants_image_purge());
        assert!(!update_form(None, None).wants_image_purge());
    }
}
