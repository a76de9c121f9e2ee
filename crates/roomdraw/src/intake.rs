//! Dataset intake: raw rows → validated entries.
//!
//! This is the boundary the draw relies on. Every entry leaving here has a
//! trimmed non-empty employee id, a canonical gender, and a non-empty room
//! slot, and no employee id appears twice.

use std::collections::HashSet;
use std::io::Read;

use roomdraw_core::{Entry, Gender};
use serde::{Deserialize, Serialize};

use crate::RoomdrawError;

/// One row as it arrives from an upload, before validation.
///
/// Accepts both `snake_case` and `camelCase` field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(alias = "employeeId")]
    pub employee_id: String,
    pub gender: String,
    #[serde(alias = "roomSlot")]
    pub room_slot: String,
}

/// Validates rows in order.
///
/// Fails on the first invalid row. Later rows repeating an employee id are
/// dropped with a warning; the first occurrence wins.
pub fn entries_from_records<I>(records: I) -> Result<Vec<Entry>, RoomdrawError>
where
    I: IntoIterator<Item = EntryRecord>,
{
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        let row = index + 1;
        let entry = record
            .gender
            .parse::<Gender>()
            .and_then(|gender| Entry::new(&record.employee_id, gender, &record.room_slot))
            .map_err(|source| RoomdrawError::InvalidRecord { row, source })?;

        if !seen.insert(entry.employee_id().clone()) {
            tracing::warn!(
                row,
                employee_id = %entry.employee_id(),
                "duplicate employee id, row dropped"
            );
            continue;
        }
        entries.push(entry);
    }

    tracing::debug!(entries = entries.len(), "dataset validated");
    Ok(entries)
}

/// Parses a JSON array of [`EntryRecord`]s and validates it.
pub fn entries_from_json(json: &str) -> Result<Vec<Entry>, RoomdrawError> {
    let records: Vec<EntryRecord> = serde_json::from_str(json)?;
    entries_from_records(records)
}

/// Like [`entries_from_json`], reading from `reader`.
pub fn entries_from_reader<R: Read>(reader: R) -> Result<Vec<Entry>, RoomdrawError> {
    let records: Vec<EntryRecord> = serde_json::from_reader(reader)?;
    entries_from_records(records)
}
