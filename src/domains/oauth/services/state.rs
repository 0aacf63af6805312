// OAuth2 domain state
use std::sync::Arc;
use crate::domains::auth::services::AuthService;
use crate::domains::oauth::services::{OAuthService, OAuthStateStore, ProviderClient};
use crate::shared::config::OAuthConfig;

/// OAuth2 domain state
#[derive(Clone)]
pub struct OAuthState {
    pub oauth_service: OAuthService,
}

impl OAuthState {
    pub fn new(config: OAuthConfig, client: Arc<dyn ProviderClient>, auth_service: AuthService) -> Self {
        Self {
            oauth_service: OAuthService::new(config, Arc::new(OAuthStateStore::default()), client, auth_service),
        }
    }
}
