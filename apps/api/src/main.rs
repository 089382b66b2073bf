//! Marquee API composition root.

#![forbid(unsafe_code)]

mod auth;
mod dto;
mod error;
mod handlers;
mod state;
#[cfg(test)]
mod tests_support;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use marquee_application::{AccessService, CatalogService, DirectoryService};
use marquee_core::AppError;
use marquee_infrastructure::{
    HttpIdentityProvider, JwksTokenVerifier, PostgresCatalogRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let auth_domain = required_env("AUTH_DOMAIN")?;
    let auth_audience = required_env("AUTH_AUDIENCE")?;
    let mgmt_client_id = required_env("AUTH_MGMT_CLIENT_ID")?;
    let mgmt_client_secret = required_env("AUTH_MGMT_CLIENT_SECRET")?;

    let auth_bypass = env::var("AUTH_BYPASS")
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true");
    if auth_bypass {
        warn!("AUTH_BYPASS is enabled; every request is granted the full permission set");
    }

    let jwks_cache_ttl = env::var("JWKS_CACHE_TTL_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(300);

    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:4200".to_owned());
    let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let http_client = reqwest::Client::new();

    let token_verifier = Arc::new(JwksTokenVerifier::new(
        http_client.clone(),
        auth_domain.as_str(),
        auth_audience.as_str(),
        Duration::from_secs(jwks_cache_ttl),
    ));
    let identity_provider = Arc::new(HttpIdentityProvider::new(
        http_client,
        auth_domain.as_str(),
        mgmt_client_id,
        mgmt_client_secret,
    ));
    let catalog_repository = Arc::new(PostgresCatalogRepository::new(pool));

    let app_state = AppState {
        access_service: AccessService::new(token_verifier, auth_bypass),
        catalog_service: CatalogService::new(catalog_repository),
        directory_service: DirectoryService::new(identity_provider),
    };

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let app = Router::new()
        .route("/", get(handlers::health::index_handler))
        .route(
            "/movies",
            get(handlers::catalog::list_movies_handler)
                .post(handlers::catalog::create_movie_handler),
        )
        .route(
            "/movies/{movie_id}",
            get(handlers::catalog::get_movie_handler)
                .patch(handlers::catalog::update_movie_handler)
                .delete(handlers::catalog::delete_movie_handler),
        )
        .route(
            "/movies/{movie_id}/actors",
            get(handlers::catalog::movie_cast_handler),
        )
        .route(
            "/movies/{movie_id}/actors/{actor_id}",
            post(handlers::catalog::assign_cast_handler)
                .delete(handlers::catalog::unassign_cast_handler),
        )
        .route(
            "/actors",
            get(handlers::catalog::list_actors_handler)
                .post(handlers::catalog::create_actor_handler),
        )
        .route(
            "/actors/{actor_id}",
            get(handlers::catalog::get_actor_handler)
                .patch(handlers::catalog::update_actor_handler)
                .delete(handlers::catalog::delete_actor_handler),
        )
        .route(
            "/actors/{actor_id}/movies",
            get(handlers::catalog::actor_filmography_handler),
        )
        .route(
            "/users",
            get(handlers::directory::list_users_handler)
                .post(handlers::directory::create_user_handler),
        )
        .route(
            "/users/{user_id}",
            get(handlers::directory::get_user_handler)
                .patch(handlers::directory::update_user_handler)
                .delete(handlers::directory::delete_user_handler),
        )
        .route(
            "/users/{user_id}/roles",
            get(handlers::directory::user_roles_handler)
                .post(handlers::directory::assign_roles_handler),
        )
        .route("/roles", get(handlers::directory::list_roles_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "marquee-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::BadRequest(format!("{name} is required")))
}
