use std::sync::Arc;

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers;
use crate::shared::data::dataset_loader::OrderLineSource;
use crate::system::middleware::request_logger::request_logger;

/// Shared handler state: where order lines come from
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn OrderLineSource + Send + Sync>,
}

/// Dashboard API routes with request logging and permissive CORS
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D410 SALES OVERVIEW DASHBOARD
        // ========================================
        .route(
            "/api/d410/years",
            get(handlers::d410_sales_overview::get_available_years),
        )
        .route(
            "/api/d410/categories",
            get(handlers::d410_sales_overview::get_categories),
        )
        .route(
            "/api/d410/overview",
            post(handlers::d410_sales_overview::get_sales_overview),
        )
        .route(
            "/api/d410/regions",
            post(handlers::d410_sales_overview::get_regions),
        )
        .with_state(state)
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
}
