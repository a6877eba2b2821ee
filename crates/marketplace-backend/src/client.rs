//! The backend collaborator: table reads, counts and named remote procedures

use crate::error::BackendResult;
use crate::query::Query;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Remote procedure that moves a deleted product back into `products`
pub const RESTORE_DELETED_PRODUCT: &str = "restore_deleted_product";

/// Remote procedure that drops a deleted product for good
pub const PERMANENTLY_DELETE_PRODUCT: &str = "permanently_delete_product";

/// Arguments shared by both deleted-product procedures
#[must_use]
pub fn deleted_product_args(deleted_product_id: &str) -> Value {
    json!({ "deleted_product_id": deleted_product_id })
}

/// Access to the hosted relational backend
///
/// Implementations must not retry: a failed call is reported once and the
/// caller decides what to show.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Rows of `query.table` matching every predicate, in the requested order
    async fn select(&self, query: &Query) -> BackendResult<Vec<Value>>;

    /// Number of rows matching every predicate
    async fn count(&self, query: &Query) -> BackendResult<u64>;

    /// Invoke a named remote procedure
    async fn rpc(&self, name: &str, args: Value) -> BackendResult<Value>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// [`Backend::select`] decoded into typed rows
///
/// # Errors
///
/// Returns the backend error, or a JSON error when a row does not fit `T`.
pub async fn select_as<T, B>(backend: &B, query: &Query) -> BackendResult<Vec<T>>
where
    T: DeserializeOwned,
    B: Backend + ?Sized,
{
    let rows = backend.select(query).await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(Into::into))
        .collect()
}
