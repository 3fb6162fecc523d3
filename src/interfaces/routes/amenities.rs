use actix_web::web;

use crate::handlers::amenities;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/amenities")
            .service(
                web::resource("")
                    .route(web::get().to(amenities::list_amenities))
                    .route(web::post().to(amenities::create_amenity))
            )
            .service(
                web::resource("/{amenity_id}")
                    .route(web::get().to(amenities::get_amenity))
                    .route(web::put().to(amenities::update_amenity))
                    .route(web::delete().to(amenities::delete_amenity))
            )
    );
}
