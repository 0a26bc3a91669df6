pub mod comment;
pub mod kv_repo;
pub mod media;
pub mod sqlx_repo;
pub mod user;
