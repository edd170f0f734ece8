//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::{
    AuthConfig, AuthContext, AuthStore, InMemoryAuthStore, PgAuthRepository, TracingNotifier,
    auth_router_generic,
};
use axum::{
    Router, http,
    http::{Method, header},
};
use post::{InMemoryPostStore, PgPostRepository, PostStore, post_router_generic};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Auth and post routes over one session state
fn app_router<R, S>(auth_store: R, post_store: S, config: AuthConfig) -> anyhow::Result<Router>
where
    R: AuthStore,
    S: PostStore,
{
    let ctx = AuthContext::new(auth_store, config)?;
    let resolver = ctx.identity_resolver();

    Ok(auth_router_generic(ctx, post_store.clone(), TracingNotifier)
        .merge(post_router_generic(post_store, resolver)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,post=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing JWT_SECRET is fatal
    let config = AuthConfig::from_env()?;

    let routes = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            app_router(
                PgAuthRepository::new(pool.clone()),
                PgPostRepository::new(pool),
                config,
            )?
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            app_router(InMemoryAuthStore::new(), InMemoryPostStore::new(), config)?
        }
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3001,http://127.0.0.1:3001".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    // Build router
    let app = routes.layer(TraceLayer::new_for_http()).layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
