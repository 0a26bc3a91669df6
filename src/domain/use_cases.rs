pub mod comment;
pub mod extractors;
pub mod media;
pub mod session;
pub mod upload;
pub mod user;
