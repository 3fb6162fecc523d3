pub mod amenity;
pub mod category;
pub mod sqlx_repo;
pub mod token;
pub mod user;
