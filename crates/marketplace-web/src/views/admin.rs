//! Admin dashboard aggregation: products grouped by creation month
//!
//! Products carry no record of the admin who created them, so each month
//! stands in for an admin. The bucket label says so (`Admin (2024-01)`); this
//! is a known gap in the data, not real attribution.

use chrono::{Local, TimeZone};
use indexmap::IndexMap;
use marketplace_core::utils::month_key_of;
use marketplace_core::{AdminPeriodBucket, AdminProduct, BucketProduct};

/// Display label of a month bucket
#[must_use]
pub fn bucket_label(key: &str) -> String {
    format!("Admin ({key})")
}

/// Group products by creation month as seen in `tz`
///
/// Every product lands in exactly one bucket, unparseable timestamps in
/// `unknown`. Products keep their input order inside a bucket. Buckets are
/// ordered by size, largest first, ties in order of first appearance.
#[must_use]
pub fn bucket_products<Tz: TimeZone>(products: &[AdminProduct], tz: &Tz) -> Vec<AdminPeriodBucket> {
    let mut grouped: IndexMap<String, Vec<BucketProduct>> = IndexMap::new();
    for product in products {
        grouped
            .entry(month_key_of(product.created_at.as_deref(), tz))
            .or_default()
            .push(BucketProduct::from(product));
    }

    let mut buckets: Vec<AdminPeriodBucket> = grouped
        .into_iter()
        .map(|(key, products)| AdminPeriodBucket {
            username: bucket_label(&key),
            admin_id: key,
            total_products: products.len(),
            products,
        })
        .collect();
    buckets.sort_by(|a, b| b.total_products.cmp(&a.total_products));
    buckets
}

/// [`bucket_products`] in the process's local time zone
#[must_use]
pub fn bucket_products_local(products: &[AdminProduct]) -> Vec<AdminPeriodBucket> {
    bucket_products(products, &Local)
}
