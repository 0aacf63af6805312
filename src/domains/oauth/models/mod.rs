// OAuth2 domain models
pub mod callback;
pub mod provider;
pub mod user_info;

pub use callback::*;
pub use provider::*;
pub use user_info::*;
