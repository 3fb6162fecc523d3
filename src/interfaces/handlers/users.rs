use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::user::UpdateUserRequest,
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(claims, state))]
pub async fn me(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let profile = state.user_handler.get_profile(&user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(claims, state, data))]
pub async fn update_me(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<UpdateUserRequest>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let profile = state
        .user_handler
        .update_profile(&user_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn delete_user(
    claims: AuthClaims,
    user_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    let caller_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid user ID in claims"
        })),
    };

    match state.user_handler.delete_user(&user_id, &caller_id).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(AppError::ForbiddenAccess) => HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Forbidden"
        })),
        Err(AppError::NotFound(msg)) => HttpResponse::NotFound().json(serde_json::json!({
            "error": msg
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": e.to_string()
        })),
    }
}
