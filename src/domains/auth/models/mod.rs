// Auth domain models
pub mod auth;
pub mod identity;
pub mod jwt;
pub mod refresh_token;
pub mod user;

pub use auth::*;
pub use identity::*;
pub use jwt::*;
pub use refresh_token::*;
pub use user::*;
