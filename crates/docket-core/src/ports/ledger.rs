//! AvailabilityLedger port - the external tabular store of candidates.
//!
//! The ledger is the single source of truth for eligibility. The core never
//! caches availability beyond one fetched snapshot per assignment flow.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{CandidateRecord, Category};

/// Partition layout, 1-indexed columns, row 1 = header.
///
/// This mirrors the backing sheet exactly and the `+ 2` row offset is
/// load-bearing: updates address physical rows, not snapshot indices.
pub mod sheet {
    pub const COL_NAME: usize = 1;
    pub const COL_CONTACT: usize = 2;
    // column 3 is reserved
    pub const COL_LAST_ASSIGNED: usize = 4;
    pub const COL_STATUS: usize = 5;

    /// Physical row of the record at snapshot index `i`:
    /// header row + 1-based indexing.
    pub fn update_row(row_index: usize) -> usize {
        row_index + 2
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{cause}")]
    Unavailable { cause: String },
}

impl LedgerError {
    pub fn unavailable(cause: impl Into<String>) -> Self {
        LedgerError::Unavailable {
            cause: cause.into(),
        }
    }
}

/// Typed access to candidate records, keyed by category partition and row
/// position. Implemented by the real tabular store; the in-memory
/// implementation in `impls` serves tests and the demo CLI.
#[async_trait]
pub trait AvailabilityLedger: Send + Sync {
    /// Fetch the full partition in stored row order.
    async fn fetch_partition(&self, category: Category)
    -> Result<Vec<CandidateRecord>, LedgerError>;

    /// Conditionally mark the row Busy and stamp the assignment date.
    ///
    /// Returns `false` without writing when the row is no longer Free — the
    /// per-row optimistic lock that closes the fetch-then-offer race against
    /// concurrent writers.
    async fn claim(
        &self,
        category: Category,
        row_index: usize,
        date: NaiveDate,
    ) -> Result<bool, LedgerError>;

    /// Mark the row Free. Idempotent: releasing an already-Free row is a
    /// plain rewrite, not an error.
    async fn release(&self, category: Category, row_index: usize) -> Result<(), LedgerError>;
}
