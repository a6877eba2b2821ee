//! JSON endpoints over the two pages

use crate::components::{BreadcrumbItem, Crumb, build_trail};
use crate::notify::Toast;
use crate::pages::{ActionOutcome, AdminSnapshot};
use crate::state::AppState;
use crate::views::{VendorFilter, VendorView};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use marketplace_core::{COUNTRY_OPTIONS, CountryOption, SystemStats};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Route of the vendor directory page
pub const VENDORS_PATH: &str = "/vendors";

/// Route of the super admin page
pub const ADMIN_PATH: &str = "/admin";

/// Vendor directory payload
#[derive(Debug, Serialize)]
pub struct VendorsResponse {
    /// Filtered list, tab counts and total
    #[serde(flatten)]
    pub view: VendorView,
    /// Inputs the view was computed with
    pub filter: VendorFilter,
    /// Whether a fetch is running
    pub loading: bool,
    /// Navigation trail
    pub breadcrumbs: Vec<Crumb>,
    /// Notifications raised since the last response
    pub toasts: Vec<Toast>,
}

/// Super admin payload
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    /// Counters, buckets and deleted products
    #[serde(flatten)]
    pub snapshot: AdminSnapshot,
    /// Navigation trail
    pub breadcrumbs: Vec<Crumb>,
    /// Notifications raised since the last response
    pub toasts: Vec<Toast>,
}

/// Result of a restore or permanent delete
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    /// What happened
    pub outcome: ActionOutcome,
    /// Counters after the action
    pub stats: SystemStats,
    /// Notifications raised since the last response
    pub toasts: Vec<Toast>,
}

/// Body of a permanent delete; a missing or false `confirm` cancels
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmBody {
    /// Explicit agreement to an irreversible delete
    #[serde(default)]
    pub confirm: bool,
}

fn vendors_response(state: &AppState, filter: VendorFilter) -> VendorsResponse {
    VendorsResponse {
        view: state.vendors.view(&filter),
        filter,
        loading: state.vendors.is_loading(),
        breadcrumbs: build_trail(&[BreadcrumbItem::link("Vendors", VENDORS_PATH)], VENDORS_PATH),
        toasts: state.vendor_toasts.drain(),
    }
}

fn admin_response(state: &AppState) -> AdminResponse {
    AdminResponse {
        snapshot: state.admin.snapshot(),
        breadcrumbs: build_trail(&[BreadcrumbItem::link("Super Admin", ADMIN_PATH)], ADMIN_PATH),
        toasts: state.admin_toasts.drain(),
    }
}

fn action_response(state: &AppState, outcome: ActionOutcome) -> (StatusCode, Json<ActionResponse>) {
    let status = match outcome {
        ActionOutcome::Restored | ActionOutcome::Deleted | ActionOutcome::Cancelled => {
            StatusCode::OK
        }
        ActionOutcome::InFlight => StatusCode::CONFLICT,
        ActionOutcome::NotRestorable => StatusCode::UNPROCESSABLE_ENTITY,
        ActionOutcome::NotFound => StatusCode::NOT_FOUND,
        ActionOutcome::Failed => StatusCode::BAD_GATEWAY,
    };

    (
        status,
        Json(ActionResponse {
            outcome,
            stats: state.admin.stats(),
            toasts: state.admin_toasts.drain(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "marketplace-web",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Country tabs of the directory
pub async fn countries() -> Json<[CountryOption; 11]> {
    Json(COUNTRY_OPTIONS)
}

/// Filtered, sorted vendor directory
pub async fn vendors(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<VendorFilter>,
) -> Json<VendorsResponse> {
    Json(vendors_response(&state, filter))
}

/// Refetch the vendor directory
pub async fn refresh_vendors(State(state): State<Arc<AppState>>) -> Json<VendorsResponse> {
    state.vendors.load().await;
    Json(vendors_response(&state, VendorFilter::default()))
}

/// Super admin dashboard
pub async fn admin(State(state): State<Arc<AppState>>) -> Json<AdminResponse> {
    Json(admin_response(&state))
}

/// Refetch the super admin dashboard
pub async fn refresh_admin(State(state): State<Arc<AppState>>) -> Json<AdminResponse> {
    state.admin.load().await;
    Json(admin_response(&state))
}

/// Restore a deleted product
pub async fn restore_deleted_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<ActionResponse>) {
    let outcome = state.admin.restore(&id).await;
    action_response(&state, outcome)
}

/// Permanently delete a deleted product; needs `{"confirm": true}`
pub async fn permanently_delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<ConfirmBody>>,
) -> (StatusCode, Json<ActionResponse>) {
    let confirmed = body.is_some_and(|Json(body)| body.confirm);
    if !confirmed {
        info!(id = %id, "Permanent delete requested without confirmation");
    }
    let outcome = state
        .admin
        .permanently_delete(&id, &move |_: &str| confirmed)
        .await;
    action_response(&state, outcome)
}
