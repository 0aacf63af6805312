use anyhow::{Context, Result};
use axum::http::{header, HeaderName, HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth_server::domains::auth::models::*;
use auth_server::shared::middleware::auth::SESSION_HEADER;
use auth_server::{create_router, AppConfig, AppState, CredentialMode};

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        auth_server::domains::auth::handlers::auth_handler::signup,
        auth_server::domains::auth::handlers::auth_handler::login,
        auth_server::domains::auth::handlers::auth_handler::refresh,
        auth_server::domains::auth::handlers::auth_handler::logout,
        auth_server::domains::auth::handlers::auth_handler::get_me,
        auth_server::domains::admin::handlers::admin_handler::admin_page,
        auth_server::domains::oauth::handlers::oauth_handler::authorize,
        auth_server::domains::oauth::handlers::oauth_handler::callback
    ),
    components(schemas(
        SignupRequest,
        SignupResponse,
        LoginRequest,
        LoginResponse,
        RefreshTokenRequest,
        RefreshTokenResponse,
        MessageResponse,
        UserResponse,
        Identity,
        Role,
        AuthProvider
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Auth", description = "Signup, login, token refresh, logout"),
        (name = "Admin", description = "ADMIN-only endpoints"),
        (name = "OAuth2", description = "Social login (Google, GitHub, Kakao)")
    ),
    info(
        title = "Auth Server",
        description = "Authentication server: local accounts, JWT or session credentials, OAuth2 login",
        version = "1.0.0"
    )
)]
struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "SessionAuth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Session-Id"))),
            );
        }
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    // 설정 로드 (잘못된 값이면 시작 실패)
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let server_addr = config.server_addr;

    // AppState 생성 (모든 Service 초기화)
    let app_state = AppState::new(config).context("Failed to initialize AppState")?;
    app_state.bootstrap_admin().await?;

    // 토큰 모드일 때만 Refresh Token 정리
    if app_state.config.credential_mode == CredentialMode::Token {
        app_state.refresh_token_cleanup.start();
    }

    // CORS 설정
    let allowed_origin = app_state
        .config
        .cors_allowed_origin
        .parse::<HeaderValue>()
        .context("Invalid CORS_ALLOWED_ORIGIN")?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(SESSION_HEADER),
        ])
        .allow_credentials(true);

    // Router 생성
    let app = create_router(app_state.clone())
        .merge(
            SwaggerUi::new("/api")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state.clone());

    let listener = TcpListener::bind(server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", server_addr))?;

    tracing::info!(
        addr = %server_addr,
        mode = ?app_state.config.credential_mode,
        "Server running (Swagger UI at /api)"
    );

    // 서버 실행
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
