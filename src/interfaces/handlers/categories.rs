use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{errors::AppError, repositories::category::CategoryRepository, AppState};

#[instrument(skip(state))]
pub async fn list_categories(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let categories = state
        .amenity_handler
        .category_repo
        .list_categories()
        .await?;

    Ok(HttpResponse::Ok().json(categories))
}
