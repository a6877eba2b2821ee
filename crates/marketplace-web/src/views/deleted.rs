//! Deleted products list and its transitions
//!
//! A record is either listed or gone. Restore and permanent delete remove it
//! only once the backend confirmed; a failed call leaves the list untouched.
//! At most one action per record may be pending.

use marketplace_core::DeletedProductRecord;
use marketplace_core::types::RecordId;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Mutating action on a deleted product
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeletedAction {
    /// Put the product back into the catalogue
    Restore,
    /// Drop the product for good
    PermanentDelete,
}

/// Why an action could not start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// No listed record has that id
    NotFound,
    /// Another action on the record is pending
    InFlight,
    /// Restore asked for a record whose deletion is final
    NotRestorable,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "deleted product not found"),
            Self::InFlight => write!(f, "an action on this product is already pending"),
            Self::NotRestorable => write!(f, "this product can no longer be restored"),
        }
    }
}

/// Server-ordered deleted products plus the ids with a pending action
#[derive(Debug, Clone, Default)]
pub struct DeletedProducts {
    records: Vec<DeletedProductRecord>,
    in_flight: HashSet<RecordId>,
}

impl DeletedProducts {
    /// Wrap a freshly fetched list
    #[must_use]
    pub fn new(records: Vec<DeletedProductRecord>) -> Self {
        Self {
            records,
            in_flight: HashSet::new(),
        }
    }

    /// Replace the list after a refetch
    ///
    /// Markers of records still listed survive, so a pending action keeps its
    /// button disabled.
    pub fn replace(&mut self, records: Vec<DeletedProductRecord>) {
        self.in_flight
            .retain(|id| records.iter().any(|record| &record.id == id));
        self.records = records;
    }

    /// Listed records in server order
    #[must_use]
    pub fn records(&self) -> &[DeletedProductRecord] {
        &self.records
    }

    /// Number of listed records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is listed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Listed record by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DeletedProductRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Whether an action on `id` is pending
    #[must_use]
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    /// Ids with a pending action, in list order
    #[must_use]
    pub fn in_flight_ids(&self) -> Vec<RecordId> {
        self.records
            .iter()
            .filter(|record| self.in_flight.contains(&record.id))
            .map(|record| record.id.clone())
            .collect()
    }

    /// Mark `id` as pending for `action`
    ///
    /// # Errors
    ///
    /// Refuses unknown ids, ids already pending, and restores of records
    /// whose deletion is final.
    pub fn begin(&mut self, id: &str, action: DeletedAction) -> Result<(), Refusal> {
        let record = self.get(id).ok_or(Refusal::NotFound)?;
        if action == DeletedAction::Restore && !record.can_be_restored {
            return Err(Refusal::NotRestorable);
        }
        if !self.in_flight.insert(id.to_string()) {
            return Err(Refusal::InFlight);
        }
        Ok(())
    }

    /// Clear the pending marker without touching the list (failed call)
    pub fn finish(&mut self, id: &str) {
        self.in_flight.remove(id);
    }

    /// Remove a record whose restore the backend confirmed
    pub fn apply_restored(&mut self, id: &str) -> Option<DeletedProductRecord> {
        self.remove(id)
    }

    /// Remove a record whose permanent delete the backend confirmed
    pub fn apply_deleted(&mut self, id: &str) -> Option<DeletedProductRecord> {
        self.remove(id)
    }

    fn remove(&mut self, id: &str) -> Option<DeletedProductRecord> {
        self.in_flight.remove(id);
        let position = self.records.iter().position(|record| record.id == id)?;
        Some(self.records.remove(position))
    }
}
