//! Client for the hosted marketplace backend
//!
//! The backend exposes table reads filtered by equality predicates, exact
//! counts, and two remote procedures for deleted products. [`RestBackend`]
//! talks to the real service; [`MockBackend`] keeps everything in memory.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod client;
pub mod error;
pub mod mock;
pub mod query;
pub mod rest;

pub use client::{
    Backend, PERMANENTLY_DELETE_PRODUCT, RESTORE_DELETED_PRODUCT, deleted_product_args, select_as,
};
pub use error::{BackendError, BackendResult};
pub use mock::{MockBackend, MockCall};
pub use query::{Filter, Order, Query};
pub use rest::RestBackend;
