//! # StockMaster API
//!
//! REST server for the StockMaster inventory tracker.
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Router                                        │
//! │                                                                         │
//! │  /health                           public                               │
//! │  /api/auth/{register,login}        public                               │
//! │  /api/auth/{request-otp,verify-otp,reset-password}   public             │
//! │  /api/auth/me                      bearer                               │
//! │  /api/products[/:id|/categories]   bearer                               │
//! │  /api/warehouses[/:id]             bearer (writes: manager / admin)     │
//! │  /api/locations[/:id]              bearer                               │
//! │  /api/stock[/:id]                  bearer                               │
//! │  /api/operations[/:id[/complete]]  bearer                               │
//! │  /api/dashboard/{stats,move-history}  bearer                            │
//! │  *                                 404 "Route not found"               │
//! │                                                                         │
//! │  Layers: TraceLayer (request spans) → CorsLayer (any origin)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bearer protection is per handler: any handler taking an
//! [`auth::AuthUser`] argument rejects requests without a valid token.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use stockmaster_db::Database;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::auth::JwtManager;
use crate::config::AppConfig;
use crate::error::ApiError;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs);

        AppState {
            db,
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        }
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    use handlers::{auth, dashboard, health, locations, operations, products, stock, warehouses};

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/request-otp", post(auth::request_otp))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/reset-password", post(auth::reset_password))
        .route("/me", get(auth::me));

    let product_routes = Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/categories", get(products::categories))
        .route(
            "/:id",
            get(products::get).put(products::update).delete(products::delete),
        );

    let warehouse_routes = Router::new()
        .route("/", get(warehouses::list).post(warehouses::create))
        .route(
            "/:id",
            get(warehouses::get).put(warehouses::update).delete(warehouses::delete),
        );

    let location_routes = Router::new()
        .route("/", get(locations::list).post(locations::create))
        .route(
            "/:id",
            get(locations::get).put(locations::update).delete(locations::delete),
        );

    let stock_routes = Router::new()
        .route("/", get(stock::list).post(stock::upsert))
        .route(
            "/:id",
            get(stock::get).put(stock::update_quantity).delete(stock::delete),
        );

    let operation_routes = Router::new()
        .route("/", get(operations::list).post(operations::create))
        .route(
            "/:id",
            get(operations::get).put(operations::update).delete(operations::delete),
        )
        .route("/:id/complete", post(operations::complete));

    let dashboard_routes = Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/move-history", get(dashboard::move_history));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/products", product_routes)
        .nest("/warehouses", warehouse_routes)
        .nest("/locations", location_routes)
        .nest("/stock", stock_routes)
        .nest("/operations", operation_routes)
        .nest("/dashboard", dashboard_routes);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG`, when set, overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
