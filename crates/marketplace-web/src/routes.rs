//! Route definitions for the web interface

use crate::{handlers::api, state::AppState};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Build the complete web application router
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Vendor directory
        .route("/api/vendors", get(api::vendors))
        .route("/api/vendors/refresh", post(api::refresh_vendors))
        .route("/api/countries", get(api::countries))
        // Super admin dashboard
        .route("/api/admin", get(api::admin))
        .route("/api/admin/refresh", post(api::refresh_admin))
        .route(
            "/api/admin/deleted-products/:id/restore",
            post(api::restore_deleted_product),
        )
        .route(
            "/api/admin/deleted-products/:id/permanent-delete",
            post(api::permanently_delete_product),
        )
        // Health check
        .route("/health", get(api::health_check))
}
