mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, media};

use auth::jwt::JwtService;
use media::store::FsMediaStore;
use repositories::sqlx_repo::{SqlxAmenityRepo, SqlxCategoryRepo, SqlxUserRepo};
use use_cases::{amenity::AmenityHandler, auth::AuthHandler, user::UserHandler};

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;
pub type AppAmenityHandler = AmenityHandler<SqlxAmenityRepo, SqlxCategoryRepo, FsMediaStore>;
pub type AppUserHandler = UserHandler<SqlxUserRepo, SqlxAmenityRepo, FsMediaStore>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub amenity_handler: AppAmenityHandler,
    pub user_handler: AppUserHandler,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let jwt_service = JwtService::new(config);
        let media_store = FsMediaStore::new(config.media_root.clone());

        let auth_handler = AuthHandler::new(SqlxUserRepo::new(pool.clone()), jwt_service);
        let amenity_handler = AmenityHandler::new(
            SqlxAmenityRepo::new(pool.clone()),
            SqlxCategoryRepo::new(pool.clone()),
            media_store.clone(),
        );
        let user_handler = UserHandler::new(
            SqlxUserRepo::new(pool.clone()),
            SqlxAmenityRepo::new(pool),
            media_store,
        );

        AppState {
            auth_handler,
            amenity_handler,
            user_handler,
        }
    }
}
