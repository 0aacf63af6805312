// OAuth2 domain services
pub mod oauth_service;
pub mod provider_client;
pub mod state;
pub mod state_store;

pub use oauth_service::*;
pub use provider_client::*;
pub use state::*;
pub use state_store::*;
