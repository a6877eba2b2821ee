//! Read queries: a table, a column list and a conjunction of equality predicates

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Equality predicate on one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    /// Column name
    pub column: String,
    /// Value the column must equal; `null` means "is null"
    pub value: Value,
}

impl Filter {
    /// Operator expression understood by the REST layer (`eq.approved`, `is.null`)
    #[must_use]
    pub fn to_operator(&self) -> String {
        match &self.value {
            Value::Null => "is.null".to_string(),
            Value::String(s) => format!("eq.{s}"),
            other => format!("eq.{other}"),
        }
    }

    /// Whether a JSON row satisfies the predicate
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        let cell = row.get(&self.column).unwrap_or(&Value::Null);
        match (&self.value, cell) {
            (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
            (expected, actual) => expected == actual,
        }
    }
}

/// Sort order of a read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Column name
    pub column: String,
    /// Largest first when true
    pub descending: bool,
}

impl Order {
    /// Order expression understood by the REST layer (`created_at.desc`)
    #[must_use]
    pub fn to_expression(&self) -> String {
        let direction = if self.descending { "desc" } else { "asc" };
        format!("{}.{direction}", self.column)
    }
}

/// A read against one table
///
/// ```
/// use marketplace_backend::Query;
///
/// let query = Query::table("profiles")
///     .eq("is_vendor", true)
///     .eq("vendor_status", "approved")
///     .order_desc("created_at");
/// assert_eq!(query.filters().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    table: String,
    columns: String,
    filters: Vec<Filter>,
    order: Option<Order>,
}

impl Query {
    /// Start a query selecting every column of `table`
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    /// Replace the column list; embedded relations such as `profiles(username)` are allowed
    #[must_use]
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    /// Add an equality predicate
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Order by `column`, largest first
    #[must_use]
    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(Order {
            column: column.into(),
            descending: true,
        });
        self
    }

    /// Target table
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Column list
    #[must_use]
    pub fn columns(&self) -> &str {
        &self.columns
    }

    /// Equality predicates, all of which must hold
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Requested order, if any
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// Whether a row satisfies every predicate
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|filter| filter.matches(row))
    }

    /// Query-string pairs for the REST layer, unencoded
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 2);
        pairs.push(("select".to_string(), self.columns.clone()));
        for filter in &self.filters {
            pairs.push((filter.column.clone(), filter.to_operator()));
        }
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.to_expression()));
        }
        pairs
    }

    /// Sort rows in place the way the backend would; stable, nulls last
    pub fn sort_rows(&self, rows: &mut [Value]) {
        let Some(order) = &self.order else {
            return;
        };
        rows.sort_by(|a, b| {
            let left = a.get(&order.column).unwrap_or(&Value::Null);
            let right = b.get(&order.column).unwrap_or(&Value::Null);
            match (left.is_null(), right.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let ordering = compare_values(left, right);
                    if order.descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                }
            }
        });
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or(0.0)
            .total_cmp(&y.as_f64().unwrap_or(0.0)),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
