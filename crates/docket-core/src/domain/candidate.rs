//! Candidate records: one row of a ledger partition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable contact handle for a person (candidate or requester).
///
/// The core never inspects the contents; the notification transport decides
/// what the handle means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactId(String);

impl ContactId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Availability status of a candidate. The sole authority for eligibility:
/// a record is a candidate only while `Free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Free,
    Busy,
}

impl Availability {
    /// Parse a ledger status cell ("Livre" / "Ocupado", any casing).
    pub fn parse_cell(cell: &str) -> Option<Availability> {
        match cell.trim().to_lowercase().as_str() {
            "livre" => Some(Availability::Free),
            "ocupado" => Some(Availability::Busy),
            _ => None,
        }
    }

    /// Canonical cell text written back to the ledger.
    pub fn as_cell(self) -> &'static str {
        match self {
            Availability::Free => "Livre",
            Availability::Busy => "Ocupado",
        }
    }
}

/// One row of a category partition.
///
/// Pre-populated externally; the engine only ever flips `availability`
/// (and stamps `last_assigned` on acceptance). `last_assigned` is an audit
/// trail, never a selection criterion — candidates are tried in row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub identity: ContactId,
    pub name: String,
    pub availability: Availability,
    pub last_assigned: Option<NaiveDate>,
}

impl CandidateRecord {
    pub fn is_free(&self) -> bool {
        self.availability == Availability::Free
    }
}
