//! Reusable UI components

pub mod breadcrumbs;

pub use breadcrumbs::{BreadcrumbItem, Breadcrumbs, Crumb, build_trail, live_trail};
