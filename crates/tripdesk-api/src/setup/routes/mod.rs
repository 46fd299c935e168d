//! Route configuration and setup.
//!
//! Admin route groups live in [domains](domains); health checks in [health](health).

mod domains;
mod health;

use crate::constants::{DEFAULT_HTTP_CONCURRENCY_LIMIT, MAX_REQUEST_BODY_BYTES};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tripdesk_core::Config;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_HTTP_CONCURRENCY_LIMIT)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = public_routes()
        .merge(domains::admin_routes(state.clone()))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        // Browsers send the session cookie only with credentials enabled.
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
    };
    Ok(cors)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health/live", get(health::liveness_check))
        .route(
            "/health/ready",
            get(|State(state): State<Arc<AppState>>| health::readiness_check(state)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripdesk_core::SignatureAlgorithm;

    fn config_with_origins(origins: &[&str]) -> Config {
        Config {
            server_port: 4000,
            environment: "development".to_string(),
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
            database_url: "postgres://localhost/tripdesk".to_string(),
            db_max_connections: 1,
            db_timeout_seconds: 1,
            run_migrations: false,
            session_jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            cdn_credentials: None,
            cdn_api_base_url: "http://127.0.0.1:9".to_string(),
            cdn_signature_algorithm: SignatureAlgorithm::Sha1,
            cdn_timeout_seconds: 1,
            cleanup_concurrency: 1,
            trusted_proxy_count: 0,
        }
    }

    #[test]
    fn test_cors_accepts_wildcard_and_origin_lists() {
        assert!(setup_cors(&config_with_origins(&["*"])).is_ok());
        assert!(setup_cors(&config_with_origins(&["https://admin.tripdesk.test"])).is_ok());
    }

    #[test]
    fn test_cors_rejects_unparseable_origin() {
        assert!(setup_cors(&config_with_origins(&["bad\norigin"])).is_err());
    }
}
