pub mod ids;
pub mod thumbnail;
