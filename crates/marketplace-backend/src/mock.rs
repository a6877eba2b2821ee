//! In-memory backend for tests

use crate::client::{Backend, PERMANENTLY_DELETE_PRODUCT, RESTORE_DELETED_PRODUCT};
use crate::error::{BackendError, BackendResult};
use crate::query::Query;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::time::sleep;

/// A call recorded by [`MockBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    /// `select` on a table
    Select {
        /// Table name
        table: String,
    },
    /// `count` on a table
    Count {
        /// Table name
        table: String,
    },
    /// Remote procedure invocation
    Rpc {
        /// Procedure name
        name: String,
        /// Arguments as sent
        args: Value,
    },
}

#[derive(Debug, Default)]
struct MockState {
    tables: HashMap<String, Vec<Value>>,
    failing_tables: HashSet<String>,
    failing_procedures: HashMap<String, String>,
    calls: Vec<MockCall>,
}

/// Mock backend with tables of JSON rows
///
/// `restore_deleted_product` and `permanently_delete_product` behave like the
/// real procedures: both remove the `deleted_products` row, and restore puts
/// its `product_data` back into `products`.
#[derive(Debug, Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
    delay: Option<Duration>,
}

impl MockBackend {
    /// Create an empty mock backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table
    #[must_use]
    pub fn with_table(self, table: impl Into<String>, rows: Vec<Value>) -> Self {
        self.state.lock().tables.insert(table.into(), rows);
        self
    }

    /// Make every read of `table` fail
    #[must_use]
    pub fn with_failing_table(self, table: impl Into<String>) -> Self {
        self.fail_table(table);
        self
    }

    /// Make a procedure fail with `message`
    #[must_use]
    pub fn with_failing_rpc(self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.fail_rpc(name, message);
        self
    }

    /// Delay every call, to observe in-flight state
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every read of `table` fail from now on
    pub fn fail_table(&self, table: impl Into<String>) {
        self.state.lock().failing_tables.insert(table.into());
    }

    /// Make a procedure fail from now on
    pub fn fail_rpc(&self, name: impl Into<String>, message: impl Into<String>) {
        self.state
            .lock()
            .failing_procedures
            .insert(name.into(), message.into());
    }

    /// Remove every injected failure
    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.failing_tables.clear();
        state.failing_procedures.clear();
    }

    /// Current rows of a table
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// Every call received so far
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    /// Number of procedure invocations so far
    #[must_use]
    pub fn rpc_count(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, MockCall::Rpc { .. }))
            .count()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
    }

    fn read(&self, query: &Query, call: MockCall) -> BackendResult<Vec<Value>> {
        let mut state = self.state.lock();
        state.calls.push(call);

        let table = query.table_name();
        if state.failing_tables.contains(table) {
            return Err(BackendError::Injected(format!("read of {table} failed")));
        }

        let mut rows: Vec<Value> = state
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| query.matches(row)).cloned().collect())
            .unwrap_or_default();
        query.sort_rows(&mut rows);
        Ok(rows)
    }

    fn take_deleted(state: &mut MockState, id: &str) -> BackendResult<Value> {
        let deleted = state.tables.entry("deleted_products".to_string()).or_default();
        let position = deleted
            .iter()
            .position(|row| row.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| BackendError::Status {
                status: 404,
                operation: "rpc".to_string(),
                message: format!("deleted product {id} not found"),
            })?;
        Ok(deleted.remove(position))
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn select(&self, query: &Query) -> BackendResult<Vec<Value>> {
        self.pause().await;
        self.read(
            query,
            MockCall::Select {
                table: query.table_name().to_string(),
            },
        )
    }

    async fn count(&self, query: &Query) -> BackendResult<u64> {
        self.pause().await;
        let rows = self.read(
            query,
            MockCall::Count {
                table: query.table_name().to_string(),
            },
        )?;
        Ok(rows.len() as u64)
    }

    async fn rpc(&self, name: &str, args: Value) -> BackendResult<Value> {
        self.pause().await;

        let mut state = self.state.lock();
        state.calls.push(MockCall::Rpc {
            name: name.to_string(),
            args: args.clone(),
        });

        if let Some(message) = state.failing_procedures.get(name) {
            return Err(BackendError::Injected(message.clone()));
        }

        let deleted_id = args
            .get("deleted_product_id")
            .and_then(Value::as_str)
            .map(str::to_string);

        match (name, deleted_id) {
            (RESTORE_DELETED_PRODUCT, Some(id)) => {
                let row = Self::take_deleted(&mut state, &id)?;
                if row.get("can_be_restored").and_then(Value::as_bool) == Some(false) {
                    state
                        .tables
                        .entry("deleted_products".to_string())
                        .or_default()
                        .push(row);
                    return Err(BackendError::Status {
                        status: 400,
                        operation: format!("rpc/{name}"),
                        message: format!("deleted product {id} cannot be restored"),
                    });
                }
                let mut product = row.get("product_data").cloned().unwrap_or_else(|| json!({}));
                if let (Some(object), Some(original)) =
                    (product.as_object_mut(), row.get("original_product_id"))
                {
                    object.insert("id".to_string(), original.clone());
                }
                state
                    .tables
                    .entry("products".to_string())
                    .or_default()
                    .push(product);
                Ok(json!(true))
            }
            (PERMANENTLY_DELETE_PRODUCT, Some(id)) => {
                Self::take_deleted(&mut state, &id)?;
                Ok(json!(true))
            }
            (RESTORE_DELETED_PRODUCT | PERMANENTLY_DELETE_PRODUCT, None) => {
                Err(BackendError::Status {
                    status: 400,
                    operation: format!("rpc/{name}"),
                    message: "missing deleted_product_id".to_string(),
                })
            }
            _ => Err(BackendError::Status {
                status: 404,
                operation: format!("rpc/{name}"),
                message: format!("function {name} does not exist"),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
