//! Page controllers: fetch on mount, hold the snapshot, derive views

pub mod super_admin;
pub mod vendors;

pub use super_admin::{AdminSnapshot, SuperAdminPage};
pub use vendors::VendorsPage;

use crate::views::Refusal;
use serde::Serialize;

/// Explicit human confirmation before a destructive call
pub trait Confirm {
    /// `true` when the user agreed to `prompt`
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a restore or permanent delete
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The product is back in the catalogue
    Restored,
    /// The product is gone for good
    Deleted,
    /// The user declined the confirmation, nothing was sent
    Cancelled,
    /// Another action on the record is still pending
    InFlight,
    /// The record's deletion is final
    NotRestorable,
    /// No listed record has that id
    NotFound,
    /// The backend call failed, the list is unchanged
    Failed,
}

impl From<Refusal> for ActionOutcome {
    fn from(refusal: Refusal) -> Self {
        match refusal {
            Refusal::NotFound => Self::NotFound,
            Refusal::InFlight => Self::InFlight,
            Refusal::NotRestorable => Self::NotRestorable,
        }
    }
}
