//! Record types consumed by the vendor directory and the admin dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::parse_timestamp;

/// Identifier of a row in the hosted backend (UUID text)
pub type RecordId = String;

/// Approval state of a vendor profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    /// Application submitted, not reviewed yet
    #[default]
    Pending,
    /// Vendor may sell
    Approved,
    /// Application rejected
    Rejected,
    /// Vendor temporarily blocked
    Suspended,
    /// Any status this build does not know about
    #[serde(other)]
    Other,
}

impl VendorStatus {
    /// Value used in backend equality filters
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Suspended => "suspended",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vendor profile row as fetched for the public directory
///
/// Snapshots are never mutated by the views; a refetch replaces the whole list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VendorRecord {
    /// Profile identifier
    pub id: RecordId,

    /// Public handle; some legacy profiles have none
    #[serde(default)]
    pub username: Option<String>,

    /// Shop description
    #[serde(default)]
    pub description: Option<String>,

    /// ISO 3166 alpha-2 country code
    #[serde(default)]
    pub country: Option<String>,

    /// Aggregated reputation
    #[serde(default)]
    pub reputation_score: Option<f64>,

    /// Lifetime sales
    #[serde(default)]
    pub total_sales: Option<f64>,

    /// Number of listed products
    #[serde(default)]
    pub products: Option<i64>,

    /// Creation timestamp as sent by the backend
    #[serde(default)]
    pub created_at: Option<String>,

    /// Whether the vendor passed verification
    #[serde(default)]
    pub is_verified: Option<bool>,

    /// Whether the account is active
    #[serde(default)]
    pub is_active: bool,

    /// Whether the profile is a vendor at all
    #[serde(default)]
    pub is_vendor: bool,

    /// Vendor approval state
    #[serde(default)]
    pub vendor_status: VendorStatus,
}

impl VendorRecord {
    /// Reputation with a missing value counted as zero
    #[must_use]
    pub fn reputation(&self) -> f64 {
        self.reputation_score.unwrap_or(0.0)
    }

    /// Sales with a missing value counted as zero
    #[must_use]
    pub fn sales(&self) -> f64 {
        self.total_sales.unwrap_or(0.0)
    }

    /// Product count with a missing value counted as zero
    #[must_use]
    pub fn product_count(&self) -> i64 {
        self.products.unwrap_or(0)
    }

    /// Parsed creation time, `None` when missing or unparseable
    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// One entry of the country tabs
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CountryOption {
    /// Country code, or `all` for "no filter"
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
    /// Flag emoji
    pub flag: &'static str,
}

/// Code of the synthetic "no filter" country option
pub const ALL_COUNTRIES: &str = "all";

/// Country tabs offered by the vendor directory, `all` first
pub const COUNTRY_OPTIONS: [CountryOption; 11] = [
    CountryOption { code: ALL_COUNTRIES, name: "All Countries", flag: "🌍" },
    CountryOption { code: "US", name: "United States", flag: "🇺🇸" },
    CountryOption { code: "GB", name: "United Kingdom", flag: "🇬🇧" },
    CountryOption { code: "CA", name: "Canada", flag: "🇨🇦" },
    CountryOption { code: "DE", name: "Germany", flag: "🇩🇪" },
    CountryOption { code: "FR", name: "France", flag: "🇫🇷" },
    CountryOption { code: "NL", name: "Netherlands", flag: "🇳🇱" },
    CountryOption { code: "AU", name: "Australia", flag: "🇦🇺" },
    CountryOption { code: "JP", name: "Japan", flag: "🇯🇵" },
    CountryOption { code: "BR", name: "Brazil", flag: "🇧🇷" },
    CountryOption { code: "IN", name: "India", flag: "🇮🇳" },
];

/// Product row consumed by the admin aggregation, vendor name already joined
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AdminProduct {
    /// Product identifier
    pub id: RecordId,
    /// Product title
    #[serde(default)]
    pub title: String,
    /// Category slug
    #[serde(default)]
    pub category: Option<String>,
    /// Creation timestamp as sent by the backend
    #[serde(default)]
    pub created_at: Option<String>,
    /// Whether the product is listed
    #[serde(default)]
    pub is_active: bool,
    /// Owning vendor profile
    #[serde(default)]
    pub vendor_id: Option<RecordId>,
    /// Owning vendor's username, resolved by the fetch join
    #[serde(default)]
    pub vendor_username: Option<String>,
}

impl AdminProduct {
    /// Parsed creation time, `None` when missing or unparseable
    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Product entry inside an [`AdminPeriodBucket`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketProduct {
    /// Product identifier
    pub id: RecordId,
    /// Product title
    pub title: String,
    /// Category slug
    pub category: Option<String>,
    /// Creation timestamp as sent by the backend
    pub created_at: Option<String>,
    /// Whether the product is listed
    pub is_active: bool,
    /// Owning vendor's username
    pub vendor_username: Option<String>,
}

impl From<&AdminProduct> for BucketProduct {
    fn from(product: &AdminProduct) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            category: product.category.clone(),
            created_at: product.created_at.clone(),
            is_active: product.is_active,
            vendor_username: product.vendor_username.clone(),
        }
    }
}

/// Products grouped by creation month
///
/// The source data has no record of which admin created a product, so the
/// month stands in for the admin identity. `username` is only a display label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminPeriodBucket {
    /// `YYYY-MM` of the products' creation, or `unknown`
    pub admin_id: String,
    /// Display label, `Admin (YYYY-MM)`
    pub username: String,
    /// Always equal to `products.len()`
    pub total_products: usize,
    /// Products in fetch order
    pub products: Vec<BucketProduct>,
}

/// A soft-deleted product kept by the backend for restore or purge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeletedProductRecord {
    /// Identifier of the deletion record
    pub id: RecordId,
    /// Identifier the product had before deletion
    #[serde(default)]
    pub original_product_id: Option<RecordId>,
    /// Snapshot of the product row at deletion time
    #[serde(default)]
    pub product_data: serde_json::Value,
    /// Profile that deleted it
    #[serde(default)]
    pub deleted_by: Option<RecordId>,
    /// Deletion timestamp as sent by the backend
    #[serde(default)]
    pub deleted_at: Option<String>,
    /// Free-form reason
    #[serde(default)]
    pub deletion_reason: Option<String>,
    /// Once false, restore is never offered again
    #[serde(default)]
    pub can_be_restored: bool,
}

impl DeletedProductRecord {
    fn snapshot_str(&self, key: &str) -> Option<&str> {
        self.product_data.get(key).and_then(serde_json::Value::as_str)
    }

    /// Title from the snapshot
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.snapshot_str("title")
    }
}

/// Dashboard counters fetched once per page load
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SystemStats {
    /// Active products
    pub total_products: u64,
    /// All profiles
    pub total_users: u64,
    /// Vendor profiles
    pub total_vendors: u64,
    /// Orders
    pub total_orders: u64,
    /// Rows in `deleted_products`
    pub deleted_products: u64,
    /// Referral codes still active
    pub active_referral_codes: u64,
}

impl SystemStats {
    /// Patch counters after a confirmed restore
    pub const fn record_restore(&mut self) {
        self.total_products = self.total_products.saturating_add(1);
        self.deleted_products = self.deleted_products.saturating_sub(1);
    }

    /// Patch counters after a confirmed permanent delete
    pub const fn record_permanent_delete(&mut self) {
        self.deleted_products = self.deleted_products.saturating_sub(1);
    }
}
