//! Super admin dashboard: counters, month buckets, deleted products

use crate::notify::Notifier;
use crate::pages::{ActionOutcome, Confirm};
use crate::views::{DeletedAction, DeletedProducts, bucket_products_local};
use marketplace_backend::{
    Backend, BackendResult, PERMANENTLY_DELETE_PRODUCT, Query, RESTORE_DELETED_PRODUCT,
    deleted_product_args, select_as,
};
use marketplace_core::types::RecordId;
use marketplace_core::{AdminPeriodBucket, AdminProduct, DeletedProductRecord, SystemStats};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Columns of the product read, with the owning vendor's username joined in
pub const PRODUCT_COLUMNS: &str =
    "id,title,category,created_at,is_active,vendor_id,vendor:profiles!vendor_id(username)";

const STATS_FAILED: &str = "Failed to load statistics";
const PRODUCTS_FAILED: &str = "Failed to load products";
const DELETED_FAILED: &str = "Failed to load deleted products";
const RESTORED: &str = "Product restored successfully";
const RESTORE_FAILED: &str = "Failed to restore product";
const DELETED: &str = "Product permanently deleted";
const DELETE_FAILED: &str = "Failed to permanently delete product";
const NOT_RESTORABLE: &str = "This product can no longer be restored";

#[derive(Debug, Deserialize)]
struct VendorRef {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    id: RecordId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    vendor_id: Option<RecordId>,
    #[serde(default)]
    vendor: Option<VendorRef>,
}

impl From<ProductRow> for AdminProduct {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            title: row.title.unwrap_or_default(),
            category: row.category,
            created_at: row.created_at,
            is_active: row.is_active,
            vendor_id: row.vendor_id,
            vendor_username: row.vendor.and_then(|vendor| vendor.username),
        }
    }
}

#[derive(Debug, Default)]
struct AdminState {
    stats: SystemStats,
    buckets: Vec<AdminPeriodBucket>,
    deleted: DeletedProducts,
    loading: bool,
}

/// Everything the dashboard renders
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminSnapshot {
    /// Dashboard counters
    pub stats: SystemStats,
    /// Products grouped by creation month, largest first
    pub buckets: Vec<AdminPeriodBucket>,
    /// Deleted products in server order
    pub deleted_products: Vec<DeletedProductRecord>,
    /// Deleted products with a pending action
    pub in_flight: Vec<RecordId>,
    /// Whether a load is running
    pub loading: bool,
}

/// Super admin page
pub struct SuperAdminPage {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<AdminState>,
}

impl std::fmt::Debug for SuperAdminPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuperAdminPage")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SuperAdminPage {
    /// Create an empty page
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            state: Mutex::new(AdminState::default()),
        }
    }

    /// Fetch counters, products and deleted products concurrently
    ///
    /// Each failing read resets its own part (counters to zero, lists to
    /// empty) and shows a toast; the others still apply.
    pub async fn load(&self) {
        self.state.lock().loading = true;

        let (stats, products, deleted) =
            tokio::join!(self.fetch_stats(), self.fetch_products(), self.fetch_deleted());

        let stats = stats.unwrap_or_else(|e| {
            error!(error = %e, "Failed to fetch system stats");
            self.notifier.show_error(STATS_FAILED);
            SystemStats::default()
        });
        let buckets = products.map_or_else(
            |e| {
                error!(error = %e, "Failed to fetch products");
                self.notifier.show_error(PRODUCTS_FAILED);
                Vec::new()
            },
            |products| bucket_products_local(&products),
        );
        let deleted = deleted.unwrap_or_else(|e| {
            error!(error = %e, "Failed to fetch deleted products");
            self.notifier.show_error(DELETED_FAILED);
            Vec::new()
        });

        info!(
            buckets = buckets.len(),
            deleted = deleted.len(),
            backend = self.backend.name(),
            "Loaded admin dashboard"
        );

        let mut state = self.state.lock();
        state.stats = stats;
        state.buckets = buckets;
        state.deleted.replace(deleted);
        state.loading = false;
    }

    async fn fetch_stats(&self) -> BackendResult<SystemStats> {
        let backend = self.backend.as_ref();
        let products = Query::table("products").eq("is_active", true);
        let users = Query::table("profiles");
        let vendors = Query::table("profiles").eq("is_vendor", true);
        let orders = Query::table("orders");
        let deleted = Query::table("deleted_products");
        let referrals = Query::table("referral_codes").eq("is_active", true);

        let (
            total_products,
            total_users,
            total_vendors,
            total_orders,
            deleted_products,
            active_referral_codes,
        ) = tokio::try_join!(
            backend.count(&products),
            backend.count(&users),
            backend.count(&vendors),
            backend.count(&orders),
            backend.count(&deleted),
            backend.count(&referrals)
        )?;

        Ok(SystemStats {
            total_products,
            total_users,
            total_vendors,
            total_orders,
            deleted_products,
            active_referral_codes,
        })
    }

    async fn fetch_products(&self) -> BackendResult<Vec<AdminProduct>> {
        let query = Query::table("products")
            .select(PRODUCT_COLUMNS)
            .order_desc("created_at");
        let rows = select_as::<ProductRow, _>(self.backend.as_ref(), &query).await?;
        Ok(rows.into_iter().map(AdminProduct::from).collect())
    }

    async fn fetch_deleted(&self) -> BackendResult<Vec<DeletedProductRecord>> {
        let query = Query::table("deleted_products").order_desc("deleted_at");
        select_as(self.backend.as_ref(), &query).await
    }

    /// Restore a deleted product
    ///
    /// The record leaves the list and the counters move only after the
    /// backend confirmed. A failure leaves the list as it was.
    pub async fn restore(&self, id: &str) -> ActionOutcome {
        let begun = self.state.lock().deleted.begin(id, DeletedAction::Restore);
        if let Err(refusal) = begun {
            warn!(id = %id, reason = %refusal, "Restore refused");
            let outcome = ActionOutcome::from(refusal);
            if outcome == ActionOutcome::NotRestorable {
                self.notifier.show_error(NOT_RESTORABLE);
            }
            return outcome;
        }

        let result = self
            .backend
            .rpc(RESTORE_DELETED_PRODUCT, deleted_product_args(id))
            .await;

        let mut state = self.state.lock();
        match result {
            Ok(_) => {
                // a refetch that landed first already counted the change
                if state.deleted.apply_restored(id).is_some() {
                    state.stats.record_restore();
                }
                drop(state);
                info!(id = %id, "Restored deleted product");
                self.notifier.show_success(RESTORED);
                ActionOutcome::Restored
            }
            Err(e) => {
                state.deleted.finish(id);
                drop(state);
                error!(id = %id, error = %e, "Failed to restore product");
                self.notifier.show_error(RESTORE_FAILED);
                ActionOutcome::Failed
            }
        }
    }

    /// Permanently delete a deleted product after `confirm` agreed
    ///
    /// A record with a pending action is refused before anyone is asked. A
    /// declined confirmation sends nothing. There is no undo once the
    /// backend confirmed.
    pub async fn permanently_delete(&self, id: &str, confirm: &impl Confirm) -> ActionOutcome {
        let title = {
            let state = self.state.lock();
            let Some(record) = state.deleted.get(id) else {
                return ActionOutcome::NotFound;
            };
            if state.deleted.is_in_flight(id) {
                drop(state);
                warn!(id = %id, "Permanent delete refused, action pending");
                return ActionOutcome::InFlight;
            }
            record.title().unwrap_or("this product").to_string()
        };

        let prompt = format!(
            "Are you sure you want to permanently delete \"{title}\"? This action cannot be undone."
        );
        if !confirm.confirm(&prompt) {
            info!(id = %id, "Permanent delete cancelled");
            return ActionOutcome::Cancelled;
        }

        let begun = self
            .state
            .lock()
            .deleted
            .begin(id, DeletedAction::PermanentDelete);
        if let Err(refusal) = begun {
            warn!(id = %id, reason = %refusal, "Permanent delete refused");
            return refusal.into();
        }

        let result = self
            .backend
            .rpc(PERMANENTLY_DELETE_PRODUCT, deleted_product_args(id))
            .await;

        let mut state = self.state.lock();
        match result {
            Ok(_) => {
                if state.deleted.apply_deleted(id).is_some() {
                    state.stats.record_permanent_delete();
                }
                drop(state);
                info!(id = %id, "Permanently deleted product");
                self.notifier.show_success(DELETED);
                ActionOutcome::Deleted
            }
            Err(e) => {
                state.deleted.finish(id);
                drop(state);
                error!(id = %id, error = %e, "Failed to permanently delete product");
                self.notifier.show_error(DELETE_FAILED);
                ActionOutcome::Failed
            }
        }
    }

    /// Current dashboard state
    #[must_use]
    pub fn snapshot(&self) -> AdminSnapshot {
        let state = self.state.lock();
        AdminSnapshot {
            stats: state.stats,
            buckets: state.buckets.clone(),
            deleted_products: state.deleted.records().to_vec(),
            in_flight: state.deleted.in_flight_ids(),
            loading: state.loading,
        }
    }

    /// Current counters
    #[must_use]
    pub fn stats(&self) -> SystemStats {
        self.state.lock().stats
    }

    /// Whether an action on `id` is pending
    #[must_use]
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.state.lock().deleted.is_in_flight(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::notify::{ToastKind, ToastLog};
    use marketplace_backend::{MockBackend, MockCall};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use async_trait::async_trait;
    use std::cell::{Cell, RefCell};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn seeded() -> MockBackend {
        MockBackend::new()
            .with_table(
                "products",
                vec![
                    json!({"id": "p1", "title": "Lamp", "is_active": true,
                           "created_at": "2024-01-20T12:00:00Z", "vendor": {"username": "alice"}}),
                    json!({"id": "p2", "title": "Desk", "is_active": true,
                           "created_at": "2024-01-15T12:00:00Z", "vendor": {"username": "bob"}}),
                    json!({"id": "p3", "title": "Rug", "is_active": false,
                           "created_at": "2023-11-15T12:00:00Z", "vendor": null}),
                ],
            )
            .with_table(
                "profiles",
                vec![
                    json!({"id": "u1", "is_vendor": true}),
                    json!({"id": "u2", "is_vendor": false}),
                ],
            )
            .with_table("orders", vec![json!({"id": "o1"})])
            .with_table(
                "referral_codes",
                vec![
                    json!({"id": "r1", "is_active": true}),
                    json!({"id": "r2", "is_active": false}),
                ],
            )
            .with_table(
                "deleted_products",
                vec![
                    json!({"id": "d1", "original_product_id": "p9", "product_data": {"title": "Chair"},
                           "deleted_at": "2024-02-02T00:00:00Z", "can_be_restored": true}),
                    json!({"id": "d2", "original_product_id": "p8", "product_data": {"title": "Sofa"},
                           "deleted_at": "2024-02-01T00:00:00Z", "can_be_restored": false}),
                ],
            )
    }

    /// Commits procedures at once but holds their responses until released
    #[derive(Debug, Default)]
    struct HeldResponses {
        inner: MockBackend,
        committed: Notify,
        release: Notify,
    }

    #[async_trait]
    impl Backend for HeldResponses {
        async fn select(&self, query: &Query) -> BackendResult<Vec<serde_json::Value>> {
            self.inner.select(query).await
        }

        async fn count(&self, query: &Query) -> BackendResult<u64> {
            self.inner.count(query).await
        }

        async fn rpc(&self, name: &str, args: serde_json::Value) -> BackendResult<serde_json::Value> {
            let result = self.inner.rpc(name, args).await;
            self.committed.notify_one();
            self.release.notified().await;
            result
        }

        fn name(&self) -> &str {
            "held"
        }
    }

    fn held() -> Arc<HeldResponses> {
        let inner = seeded().with_table(
            "deleted_products",
            vec![
                json!({"id": "d1", "original_product_id": "p9",
                       "product_data": {"title": "Chair", "is_active": true},
                       "deleted_at": "2024-02-02T00:00:00Z", "can_be_restored": true}),
                json!({"id": "d2", "original_product_id": "p8", "product_data": {"title": "Sofa"},
                       "deleted_at": "2024-02-01T00:00:00Z", "can_be_restored": false}),
            ],
        );
        Arc::new(HeldResponses {
            inner,
            ..HeldResponses::default()
        })
    }

    fn page(backend: &Arc<MockBackend>) -> (SuperAdminPage, Arc<ToastLog>) {
        let toasts = Arc::new(ToastLog::new());
        (SuperAdminPage::new(backend.clone(), toasts.clone()), toasts)
    }

    #[tokio::test]
    async fn test_load_fills_dashboard() {
        let backend = Arc::new(seeded());
        let (page, toasts) = page(&backend);
        page.load().await;

        let snapshot = page.snapshot();
        assert_eq!(
            snapshot.stats,
            SystemStats {
                total_products: 2,
                total_users: 2,
                total_vendors: 1,
                total_orders: 1,
                deleted_products: 2,
                active_referral_codes: 1,
            }
        );
        assert_eq!(snapshot.buckets.len(), 2);
        assert_eq!(snapshot.buckets[0].total_products, 2);
        assert_eq!(snapshot.buckets[0].products[0].id, "p1");
        assert_eq!(
            snapshot.buckets[0].products[0].vendor_username.as_deref(),
            Some("alice")
        );
        assert_eq!(snapshot.buckets[1].products[0].vendor_username, None);
        assert_eq!(snapshot.deleted_products.len(), 2);
        assert!(!snapshot.loading);
        assert!(toasts.pending().is_empty());
    }

    #[tokio::test]
    async fn test_failed_read_resets_only_its_part() {
        let backend = Arc::new(seeded().with_failing_table("deleted_products"));
        let (page, toasts) = page(&backend);
        page.load().await;

        let snapshot = page.snapshot();
        assert!(snapshot.deleted_products.is_empty());
        assert_eq!(snapshot.stats, SystemStats::default());
        assert_eq!(snapshot.buckets.len(), 2);

        let messages: Vec<_> = toasts.drain().into_iter().map(|t| t.message).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages.contains(&STATS_FAILED.to_string()));
        assert!(messages.contains(&DELETED_FAILED.to_string()));
    }

    #[tokio::test]
    async fn test_restore_removes_record_and_patches_counters() {
        let backend = Arc::new(seeded());
        let (page, toasts) = page(&backend);
        page.load().await;

        assert_eq!(page.restore("d1").await, ActionOutcome::Restored);

        let snapshot = page.snapshot();
        let ids: Vec<_> = snapshot.deleted_products.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d2"]);
        assert_eq!(snapshot.stats.deleted_products, 1);
        assert_eq!(snapshot.stats.total_products, 3);
        assert!(snapshot.in_flight.is_empty());
        assert_eq!(toasts.drain()[0].kind, ToastKind::Success);
        assert_eq!(backend.rows("deleted_products").len(), 1);
    }

    #[tokio::test]
    async fn test_restore_of_final_deletion_makes_no_call() {
        let backend = Arc::new(seeded());
        let (page, toasts) = page(&backend);
        page.load().await;

        assert_eq!(page.restore("d2").await, ActionOutcome::NotRestorable);
        assert_eq!(backend.rpc_count(), 0);
        assert_eq!(page.snapshot().deleted_products.len(), 2);
        assert_eq!(toasts.drain()[0].message, NOT_RESTORABLE);
    }

    #[tokio::test]
    async fn test_failed_restore_leaves_list_and_clears_marker() {
        let backend = Arc::new(seeded().with_failing_rpc(RESTORE_DELETED_PRODUCT, "boom"));
        let (page, toasts) = page(&backend);
        page.load().await;
        let before = page.snapshot();

        assert_eq!(page.restore("d1").await, ActionOutcome::Failed);

        let after = page.snapshot();
        assert_eq!(after.deleted_products, before.deleted_products);
        assert_eq!(after.stats, before.stats);
        assert!(!page.is_in_flight("d1"));
        assert_eq!(toasts.drain()[0].message, RESTORE_FAILED);

        backend.clear_failures();
        assert_eq!(page.restore("d1").await, ActionOutcome::Restored);
        assert_eq!(backend.rpc_count(), 2);
    }

    #[tokio::test]
    async fn test_declined_confirmation_sends_nothing() {
        let backend = Arc::new(seeded());
        let (page, _toasts) = page(&backend);
        page.load().await;

        let asked = RefCell::new(String::new());
        let outcome = page
            .permanently_delete("d2", &|prompt: &str| {
                asked.borrow_mut().push_str(prompt);
                false
            })
            .await;

        assert_eq!(outcome, ActionOutcome::Cancelled);
        assert!(asked.borrow().contains("\"Sofa\""));
        assert_eq!(backend.rpc_count(), 0);
        assert_eq!(page.snapshot().deleted_products.len(), 2);
    }

    #[tokio::test]
    async fn test_permanent_delete_after_confirmation() {
        let backend = Arc::new(seeded());
        let (page, _toasts) = page(&backend);
        page.load().await;

        let outcome = page.permanently_delete("d2", &|_: &str| true).await;

        assert_eq!(outcome, ActionOutcome::Deleted);
        assert_eq!(page.stats().deleted_products, 1);
        assert_eq!(page.stats().total_products, 2);
        assert_eq!(
            backend.calls().last(),
            Some(&MockCall::Rpc {
                name: PERMANENTLY_DELETE_PRODUCT.to_string(),
                args: json!({"deleted_product_id": "d2"}),
            })
        );
        assert_eq!(
            page.permanently_delete("d2", &|_: &str| true).await,
            ActionOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_double_submit_is_refused_while_pending() {
        let backend = Arc::new(seeded().with_delay(Duration::from_millis(50)));
        let (page, _toasts) = page(&backend);
        page.load().await;
        let page = Arc::new(page);

        let first = tokio::spawn({
            let page = page.clone();
            async move { page.restore("d1").await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(page.is_in_flight("d1"));
        assert_eq!(page.snapshot().in_flight, vec!["d1".to_string()]);
        assert_eq!(page.restore("d1").await, ActionOutcome::InFlight);

        let asked = Cell::new(false);
        let outcome = page
            .permanently_delete("d1", &|_: &str| {
                asked.set(true);
                true
            })
            .await;
        assert_eq!(outcome, ActionOutcome::InFlight);
        assert!(!asked.get());

        assert_eq!(first.await.unwrap(), ActionOutcome::Restored);
        assert!(!page.is_in_flight("d1"));
        assert_eq!(backend.rpc_count(), 1);
    }

    #[tokio::test]
    async fn test_different_records_run_concurrently() {
        let backend = Arc::new(seeded().with_delay(Duration::from_millis(20)));
        let (page, _toasts) = page(&backend);
        page.load().await;

        let (restored, deleted) = tokio::join!(
            page.restore("d1"),
            page.permanently_delete("d2", &|_: &str| true)
        );

        assert_eq!(restored, ActionOutcome::Restored);
        assert_eq!(deleted, ActionOutcome::Deleted);
        assert!(page.snapshot().deleted_products.is_empty());
        assert_eq!(page.stats().deleted_products, 0);
    }

    #[tokio::test]
    async fn test_refetch_before_restore_response_counts_once() {
        let backend = held();
        let page = Arc::new(SuperAdminPage::new(
            backend.clone(),
            Arc::new(ToastLog::new()),
        ));
        page.load().await;
        assert_eq!(page.stats().total_products, 2);

        let pending = tokio::spawn({
            let page = page.clone();
            async move { page.restore("d1").await }
        });
        backend.committed.notified().await;

        page.load().await;
        let refreshed = page.stats();
        assert_eq!(refreshed.total_products, 3);
        assert_eq!(refreshed.deleted_products, 1);

        backend.release.notify_one();
        assert_eq!(pending.await.unwrap(), ActionOutcome::Restored);

        let snapshot = page.snapshot();
        assert_eq!(snapshot.stats, refreshed);
        let ids: Vec<_> = snapshot.deleted_products.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d2"]);
        assert!(snapshot.in_flight.is_empty());
    }

    #[tokio::test]
    async fn test_refetch_before_delete_response_counts_once() {
        let backend = held();
        let page = Arc::new(SuperAdminPage::new(
            backend.clone(),
            Arc::new(ToastLog::new()),
        ));
        page.load().await;

        let pending = tokio::spawn({
            let page = page.clone();
            async move { page.permanently_delete("d2", &|_: &str| true).await }
        });
        backend.committed.notified().await;

        page.load().await;
        assert_eq!(page.stats().deleted_products, 1);

        backend.release.notify_one();
        assert_eq!(pending.await.unwrap(), ActionOutcome::Deleted);
        assert_eq!(page.stats().deleted_products, 1);
        assert_eq!(page.stats().total_products, 2);
        assert_eq!(page.snapshot().deleted_products.len(), 1);
    }
}
