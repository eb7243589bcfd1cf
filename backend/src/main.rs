//! Kargo Back-Office - Backend Server
//!
//! Multi-tenant logistics back-office: four account types (superadmin,
//! forwarder admins, BCOs, customs brokers) manage a shared set of
//! company/contact/importer/supplier records, with messaging delegated to an
//! external chat directory.

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Json, Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod middleware;
mod routes;
mod services;

pub use config::Config;

use error::ErrorBody;
use external::{ChatDirectory, MailClient, StreamChatClient};
use services::{
    AccountService, CalendarService, CompanyService, DirectorySync, ImporterService,
    SupplierService, TokenService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub tokens: TokenService,
    pub chat: Arc<dyn ChatDirectory>,
    pub mail: MailClient,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, config: Arc<Config>, chat: Arc<dyn ChatDirectory>) -> Self {
        let tokens = TokenService::new(config.auth.clone());
        let mail = MailClient::new(&config.mail);
        Self {
            db,
            config,
            tokens,
            chat,
            mail,
        }
    }

    fn directory_sync(&self) -> DirectorySync {
        DirectorySync::new(self.chat.clone(), self.config.chat.welcome_user_id.clone())
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.db.clone(), self.tokens.clone(), self.directory_sync())
    }

    pub fn importers(&self) -> ImporterService {
        ImporterService::new(self.db.clone())
    }

    pub fn suppliers(&self) -> SupplierService {
        SupplierService::new(self.db.clone())
    }

    pub fn companies(&self) -> CompanyService {
        CompanyService::new(self.db.clone())
    }

    pub fn calendar(&self) -> CalendarService {
        CalendarService::new(self.db.clone())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kargo_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Kargo Back-Office Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Create application state
    let config = Arc::new(config);
    let chat_client = Arc::new(StreamChatClient::new(&config.chat));
    let state = AppState::new(db_pool, config.clone(), chat_client);

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS from the configured allow-list; an empty list opens the API up for
/// local development (no credentials in that mode).
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}

/// Unknown routes get the generic envelope, not axum's bare 404.
async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            success: false,
            message: "Route not found".to_string(),
        }),
    )
}
