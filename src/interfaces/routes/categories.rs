use actix_web::web;

use crate::handlers::categories;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .service(
                web::resource("")
                    .route(web::get().to(categories::list_categories))
            )
    );
}
