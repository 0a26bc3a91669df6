pub mod comment;
pub mod media;
pub mod session;
pub mod token;
pub mod user;
