use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{web, HttpResponse, Responder};
use tokio::fs;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::amenity::{NewAmenityForm, UpdateAmenityForm},
    errors::AppError,
    infrastructure::media::store::UploadedImage,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_amenities(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let amenities = state.amenity_handler.list_amenities().await?;
    Ok(HttpResponse::Ok().json(amenities))
}

#[instrument(skip(amenity_id, state))]
pub async fn get_amenity(
    amenity_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let amenity = state.amenity_handler.get_amenity(&amenity_id).await?;
    Ok(HttpResponse::Ok().json(amenity))
}

#[instrument(skip(claims, state, form))]
pub async fn create_amenity(
    claims: AuthClaims,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<NewAmenityForm>,
) -> Result<impl Responder, AppError> {
    let owner_id = claims.user_id()?;
    let request = form.to_request()?;
    let uploads = collect_uploads(form.images).await?;

    let response = state
        .amenity_handler
        .create_amenity(owner_id, request, uploads)
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(claims, amenity_id, state, form))]
pub async fn update_amenity(
    claims: AuthClaims,
    amenity_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<UpdateAmenityForm>,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;
    let changes = form.to_request();
    let purge_images = form.wants_image_purge();
    let uploads = collect_uploads(form.images).await?;

    let response = state
        .amenity_handler
        .update_amenity(&amenity_id, caller_id, changes, purge_images, uploads)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(claims, amenity_id, state))]
pub async fn delete_amenity(
    claims: AuthClaims,
    amenity_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;

    let response = state
        .amenity_handler
        .delete_amenity(&amenity_id, caller_id)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Pulls each spooled upload off disk so the lifecycle handler can work with
/// plain bytes.
async fn collect_uploads(files: Vec<TempFile>) -> Result<Vec<UploadedImage>, AppError> {
    let mut uploads = Vec::with_capacity(files.len());
    for file in files {
        let content = fs::read(file.file.path()).await?;
        uploads.push(UploadedImage {
            file_name: file.file_name.clone(),
            content,
        });
    }
    Ok(uploads)
}
