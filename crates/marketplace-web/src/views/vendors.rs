//! Vendor directory pipeline: filter, sort, count per country

use indexmap::IndexMap;
use marketplace_core::types::{ALL_COUNTRIES, COUNTRY_OPTIONS};
use marketplace_core::VendorRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::convert::Infallible;
use std::str::FromStr;

/// Sort order of the directory
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Highest reputation first
    #[default]
    Reputation,
    /// Highest lifetime sales first
    Sales,
    /// Most listed products first
    Products,
    /// Most recently created first, unparseable dates last
    Newest,
    /// Keep fetch order
    #[serde(other)]
    Unsorted,
}

impl SortKey {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reputation => "reputation",
            Self::Sales => "sales",
            Self::Products => "products",
            Self::Newest => "newest",
            Self::Unsorted => "unsorted",
        }
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "reputation" => Self::Reputation,
            "sales" => Self::Sales,
            "products" => Self::Products,
            "newest" => Self::Newest,
            _ => Self::Unsorted,
        })
    }
}

/// The three live inputs of the directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VendorFilter {
    /// Case-insensitive username substring
    pub search: String,
    /// Country code, or `all`
    pub country: String,
    /// Sort order
    pub sort: SortKey,
}

impl Default for VendorFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            country: ALL_COUNTRIES.to_string(),
            sort: SortKey::default(),
        }
    }
}

/// What the directory renders
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VendorView {
    /// Filtered and sorted vendors
    pub vendors: Vec<VendorRecord>,
    /// Count per country tab, over the unfiltered list
    pub country_counts: IndexMap<String, usize>,
    /// Length of the unfiltered list
    pub total: usize,
}

/// Whether the username contains `search`, ignoring case
///
/// An empty search matches every vendor, even one without a username.
#[must_use]
pub fn matches_search(vendor: &VendorRecord, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    vendor
        .username
        .as_deref()
        .is_some_and(|username| username.to_lowercase().contains(&needle))
}

/// Whether the vendor belongs to the selected country tab
#[must_use]
pub fn matches_country(vendor: &VendorRecord, country: &str) -> bool {
    country == ALL_COUNTRIES || vendor.country.as_deref() == Some(country)
}

/// Vendors passing both the search and the country filter, in input order
#[must_use]
pub fn filter_vendors<'a>(
    vendors: &'a [VendorRecord],
    search: &str,
    country: &str,
) -> Vec<&'a VendorRecord> {
    vendors
        .iter()
        .filter(|vendor| matches_search(vendor, search) && matches_country(vendor, country))
        .collect()
}

/// Stable sort, descending on the chosen key
pub fn sort_vendors(vendors: &mut [&VendorRecord], key: SortKey) {
    match key {
        SortKey::Reputation => {
            vendors.sort_by(|a, b| b.reputation().total_cmp(&a.reputation()));
        }
        SortKey::Sales => vendors.sort_by(|a, b| b.sales().total_cmp(&a.sales())),
        SortKey::Products => vendors.sort_by_key(|vendor| Reverse(vendor.product_count())),
        SortKey::Newest => vendors.sort_by_cached_key(|vendor| {
            let created = vendor.created();
            (created.is_none(), Reverse(created))
        }),
        SortKey::Unsorted => {}
    }
}

/// Count per country option over the unfiltered list, `all` being the total
#[must_use]
pub fn country_counts(vendors: &[VendorRecord]) -> IndexMap<String, usize> {
    COUNTRY_OPTIONS
        .iter()
        .map(|option| {
            let count = if option.code == ALL_COUNTRIES {
                vendors.len()
            } else {
                vendors
                    .iter()
                    .filter(|vendor| vendor.country.as_deref() == Some(option.code))
                    .count()
            };
            (option.code.to_string(), count)
        })
        .collect()
}

/// Run the whole pipeline over one snapshot
#[must_use]
pub fn vendor_view(vendors: &[VendorRecord], filter: &VendorFilter) -> VendorView {
    let mut visible = filter_vendors(vendors, &filter.search, &filter.country);
    sort_vendors(&mut visible, filter.sort);

    VendorView {
        vendors: visible.into_iter().cloned().collect(),
        country_counts: country_counts(vendors),
        total: vendors.len(),
    }
}
