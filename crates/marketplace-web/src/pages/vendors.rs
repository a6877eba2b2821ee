//! Public vendor directory

use crate::notify::Notifier;
use crate::views::{VendorFilter, VendorView, vendor_view};
use marketplace_backend::{Backend, Query, select_as};
use marketplace_core::{VendorRecord, VendorStatus};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info};

/// Toast shown when the directory cannot be fetched
pub const LOAD_FAILED: &str = "Failed to load vendors";

#[derive(Debug, Default)]
struct VendorsState {
    vendors: Vec<VendorRecord>,
    loading: bool,
}

/// Vendor directory page
pub struct VendorsPage {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<VendorsState>,
}

/// Approved, active vendor profiles, newest first
#[must_use]
pub fn vendor_query() -> Query {
    Query::table("profiles")
        .eq("is_vendor", true)
        .eq("vendor_status", VendorStatus::Approved.as_str())
        .eq("is_active", true)
        .order_desc("created_at")
}

impl std::fmt::Debug for VendorsPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorsPage")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl VendorsPage {
    /// Create an empty page
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            state: Mutex::new(VendorsState::default()),
        }
    }

    /// Fetch the directory, replacing the held list
    ///
    /// On failure the list is emptied and a toast is shown. Returns the
    /// number of vendors now held.
    pub async fn load(&self) -> usize {
        self.state.lock().loading = true;

        let fetched = select_as::<VendorRecord, _>(self.backend.as_ref(), &vendor_query()).await;

        let mut state = self.state.lock();
        state.loading = false;
        match fetched {
            Ok(vendors) => {
                info!(count = vendors.len(), backend = self.backend.name(), "Loaded vendors");
                state.vendors = vendors;
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch vendors");
                state.vendors.clear();
                self.notifier.show_error(LOAD_FAILED);
            }
        }
        state.vendors.len()
    }

    /// Filtered, sorted view of the held list
    #[must_use]
    pub fn view(&self, filter: &VendorFilter) -> VendorView {
        vendor_view(&self.state.lock().vendors, filter)
    }

    /// Whether a fetch is running
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Copy of the held list
    #[must_use]
    pub fn vendors(&self) -> Vec<VendorRecord> {
        self.state.lock().vendors.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::notify::{ToastKind, ToastLog};
    use crate::views::SortKey;
    use marketplace_backend::MockBackend;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn profiles() -> Vec<serde_json::Value> {
        vec![
            json!({"id": "v1", "username": "alice", "country": "US", "reputation_score": 5.0,
                   "is_vendor": true, "vendor_status": "approved", "is_active": true,
                   "created_at": "2024-01-01T00:00:00Z"}),
            json!({"id": "v2", "username": "bob", "country": "CA", "reputation_score": 9.0,
                   "is_vendor": true, "vendor_status": "approved", "is_active": true,
                   "created_at": "2024-02-01T00:00:00Z"}),
            json!({"id": "v3", "username": "carol", "country": "US",
                   "is_vendor": true, "vendor_status": "pending", "is_active": true,
                   "created_at": "2024-03-01T00:00:00Z"}),
            json!({"id": "v4", "username": "dave", "country": "US",
                   "is_vendor": false, "vendor_status": "approved", "is_active": true,
                   "created_at": "2024-04-01T00:00:00Z"}),
        ]
    }

    #[test]
    fn test_vendor_query_shape() {
        let pairs = vendor_query().to_query_pairs();
        assert!(pairs.contains(&("is_vendor".to_string(), "eq.true".to_string())));
        assert!(pairs.contains(&("vendor_status".to_string(), "eq.approved".to_string())));
        assert!(pairs.contains(&("is_active".to_string(), "eq.true".to_string())));
        assert!(pairs.contains(&("order".to_string(), "created_at.desc".to_string())));
    }

    #[tokio::test]
    async fn test_load_keeps_only_approved_vendors() {
        let backend = Arc::new(MockBackend::new().with_table("profiles", profiles()));
        let toasts = Arc::new(ToastLog::new());
        let page = VendorsPage::new(backend, toasts.clone());

        assert_eq!(page.load().await, 2);
        assert!(!page.is_loading());
        assert!(toasts.pending().is_empty());

        let held: Vec<_> = page.vendors().into_iter().map(|v| v.id).collect();
        assert_eq!(held, vec!["v2", "v1"]);

        let view = page.view(&VendorFilter {
            search: "A".to_string(),
            sort: SortKey::Reputation,
            ..VendorFilter::default()
        });
        assert_eq!(view.vendors.len(), 1);
        assert_eq!(view.vendors[0].id, "v1");
        assert_eq!(view.country_counts["US"], 1);
    }

    #[tokio::test]
    async fn test_failed_load_resets_list_and_toasts() {
        let backend = Arc::new(MockBackend::new().with_table("profiles", profiles()));
        let toasts = Arc::new(ToastLog::new());
        let page = VendorsPage::new(backend.clone(), toasts.clone());
        assert_eq!(page.load().await, 2);

        backend.fail_table("profiles");
        assert_eq!(page.load().await, 0);
        assert!(page.vendors().is_empty());
        assert!(!page.is_loading());
        assert_eq!(page.view(&VendorFilter::default()).country_counts["all"], 0);

        let shown = toasts.drain();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].kind, ToastKind::Error);
        assert_eq!(shown[0].message, LOAD_FAILED);
    }
}
