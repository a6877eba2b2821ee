//! Pure view pipelines
//!
//! Each function takes an immutable snapshot plus the UI inputs and returns a
//! fresh view model, so pages can recompute on every request.

pub mod admin;
pub mod deleted;
pub mod vendors;

pub use admin::{bucket_label, bucket_products, bucket_products_local};
pub use deleted::{DeletedAction, DeletedProducts, Refusal};
pub use vendors::{
    SortKey, VendorFilter, VendorView, country_counts, filter_vendors, sort_vendors, vendor_view,
};
