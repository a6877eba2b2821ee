//! Marketplace web views
//!
//! The public vendor directory and the super admin dashboard: pure view
//! pipelines, page controllers over the hosted backend, the breadcrumb
//! component, and a JSON server exposing both pages.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod components;
pub mod handlers;
pub mod notify;
pub mod pages;
pub mod routes;
pub mod server;
pub mod state;
pub mod views;

// Re-export the main entry points
pub use notify::{Notifier, Toast, ToastKind, ToastLog};
pub use pages::{ActionOutcome, Confirm, SuperAdminPage, VendorsPage};
pub use server::build_app;
pub use state::AppState;
pub use views::{SortKey, VendorFilter};
