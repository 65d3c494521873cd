//! In-memory ledger for tests and the demo CLI.
//!
//! Stores each partition as the literal cell grid of the backing sheet,
//! header row included, so reads and writes go through the same addressing
//! convention the real store uses (`sheet::update_row`, 1-indexed columns).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Availability, CandidateRecord, Category, ContactId};
use crate::ports::ledger::{AvailabilityLedger, LedgerError, sheet};

const DATE_FORMAT: &str = "%Y-%m-%d";
const HEADER: [&str; 5] = ["Nome", "Telegram_ID", "", "Ultima_Nomeacao", "Status"];

/// Dev-grade `AvailabilityLedger`: one cell grid per partition behind a
/// mutex. No await under the lock.
#[derive(Default)]
pub struct InMemorySheetLedger {
    partitions: Mutex<HashMap<&'static str, Vec<Vec<String>>>>,
}

impl InMemorySheetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a partition from typed records; renders the grid the way the
    /// external store would hold it.
    pub fn seed_partition(&self, category: Category, records: &[CandidateRecord]) {
        let mut grid = Vec::with_capacity(records.len() + 1);
        grid.push(HEADER.iter().map(|h| h.to_string()).collect());
        for rec in records {
            grid.push(vec![
                rec.name.clone(),
                rec.identity.as_str().to_string(),
                String::new(),
                rec.last_assigned
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default(),
                rec.availability.as_cell().to_string(),
            ]);
        }
        self.partitions
            .lock()
            .expect("ledger lock poisoned")
            .insert(category.partition_name(), grid);
    }

    /// Raw cell read (1-indexed row and column), for assertions on the
    /// physical layout.
    pub fn cell(&self, category: Category, row: usize, col: usize) -> Option<String> {
        let map = self.partitions.lock().expect("ledger lock poisoned");
        map.get(category.partition_name())?
            .get(row - 1)?
            .get(col - 1)
            .cloned()
    }

    fn with_row<R>(
        &self,
        category: Category,
        row_index: usize,
        f: impl FnOnce(&mut Vec<String>) -> R,
    ) -> Result<R, LedgerError> {
        let mut map = self.partitions.lock().expect("ledger lock poisoned");
        let grid = map.get_mut(category.partition_name()).ok_or_else(|| {
            LedgerError::unavailable(format!(
                "partition '{}' not found",
                category.partition_name()
            ))
        })?;
        let row = grid
            .get_mut(sheet::update_row(row_index) - 1)
            .ok_or_else(|| LedgerError::unavailable(format!("row index {row_index} out of range")))?;
        Ok(f(row))
    }
}

fn parse_record(row_number: usize, cells: &[String]) -> Result<CandidateRecord, LedgerError> {
    let cell = |col: usize| cells.get(col - 1).map(String::as_str).unwrap_or("");

    let availability = Availability::parse_cell(cell(sheet::COL_STATUS)).ok_or_else(|| {
        LedgerError::unavailable(format!(
            "row {row_number}: unrecognized status cell '{}'",
            cell(sheet::COL_STATUS)
        ))
    })?;
    let last_assigned = match cell(sheet::COL_LAST_ASSIGNED) {
        "" => None,
        raw => Some(NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
            LedgerError::unavailable(format!("row {row_number}: bad date cell '{raw}': {e}"))
        })?),
    };

    Ok(CandidateRecord {
        identity: ContactId::new(cell(sheet::COL_CONTACT)),
        name: cell(sheet::COL_NAME).to_string(),
        availability,
        last_assigned,
    })
}

#[async_trait]
impl AvailabilityLedger for InMemorySheetLedger {
    async fn fetch_partition(
        &self,
        category: Category,
    ) -> Result<Vec<CandidateRecord>, LedgerError> {
        let map = self.partitions.lock().expect("ledger lock poisoned");
        let grid = map.get(category.partition_name()).ok_or_else(|| {
            LedgerError::unavailable(format!(
                "partition '{}' not found",
                category.partition_name()
            ))
        })?;

        grid.iter()
            .enumerate()
            .skip(1) // header row
            .map(|(i, cells)| parse_record(i + 1, cells))
            .collect()
    }

    async fn claim(
        &self,
        category: Category,
        row_index: usize,
        date: NaiveDate,
    ) -> Result<bool, LedgerError> {
        self.with_row(category, row_index, |row| {
            let current = row.get(sheet::COL_STATUS - 1).map(String::as_str);
            if current.and_then(Availability::parse_cell) != Some(Availability::Free) {
                return false;
            }
            row[sheet::COL_STATUS - 1] = Availability::Busy.as_cell().to_string();
            row[sheet::COL_LAST_ASSIGNED - 1] = date.format(DATE_FORMAT).to_string();
            true
        })
    }

    async fn release(&self, category: Category, row_index: usize) -> Result<(), LedgerError> {
        self.with_row(category, row_index, |row| {
            row[sheet::COL_STATUS - 1] = Availability::Free.as_cell().to_string();
        })
    }
}
