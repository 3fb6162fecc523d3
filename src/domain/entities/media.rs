use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of content a media row points at, sniffed from the uploaded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "media_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Media {
    pub id: Uuid,
    pub amenity_id: Uuid,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

#[derive(Debug)]
pub struct MediaInsert {
    pub amenity_id: Uuid,
    pub url: String,
    pub media_type: MediaType,
}
