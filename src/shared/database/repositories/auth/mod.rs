// Auth repositories
pub mod user_repository;
pub mod refresh_token_repository;

pub use user_repository::*;
pub use refresh_token_repository::*;
