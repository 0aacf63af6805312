// OAuth2 handlers module
pub mod oauth_handler;

pub use oauth_handler::*;
