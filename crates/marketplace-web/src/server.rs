//! Web server setup

use crate::{routes::build_routes, state::AppState};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete web application with all routes and state
pub fn build_app(state: Arc<AppState>) -> Router {
    build_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
