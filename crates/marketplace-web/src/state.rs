//! Application state shared by the handlers

use crate::notify::ToastLog;
use crate::pages::{SuperAdminPage, VendorsPage};
use marketplace_backend::{Backend, RestBackend};
use marketplace_core::Config;
use std::sync::Arc;
use tracing::info;

/// Both pages, each with the toasts waiting for its next response
#[derive(Debug)]
pub struct AppState {
    /// Public vendor directory
    pub vendors: VendorsPage,
    /// Super admin dashboard
    pub admin: SuperAdminPage,
    /// Pending notifications of the vendor directory
    pub vendor_toasts: Arc<ToastLog>,
    /// Pending notifications of the admin dashboard
    pub admin_toasts: Arc<ToastLog>,
}

impl AppState {
    /// State over any backend
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Arc<Self> {
        let vendor_toasts = Arc::new(ToastLog::new());
        let admin_toasts = Arc::new(ToastLog::new());

        Arc::new(Self {
            vendors: VendorsPage::new(backend.clone(), vendor_toasts.clone()),
            admin: SuperAdminPage::new(backend, admin_toasts.clone()),
            vendor_toasts,
            admin_toasts,
        })
    }

    /// State over the hosted REST backend described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> marketplace_core::Result<Arc<Self>> {
        let backend = RestBackend::from_config(&config.backend)?;
        info!(url = %backend.base_url(), "Using hosted backend");
        Ok(Self::new(Arc::new(backend)))
    }

    /// Initial fetch of both pages
    pub async fn mount(&self) {
        tokio::join!(self.vendors.load(), self.admin.load());
    }
}
