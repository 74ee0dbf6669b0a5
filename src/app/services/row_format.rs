//! Row-format schema
//!
//! Holds the mapping from 1-based row position to [`RowRole`], validates
//! that metadata rows form a gapless block at the top of every sheet, and
//! answers position and role lookups for the sheet converter.

use crate::app::models::{RowFormatEntry, RowRole};
use crate::constants::{DEFAULT_COMMENT_ROW, DEFAULT_KEY_ROW, DEFAULT_VALUE_TYPE_ROW};
use crate::{Error, Result};
use std::collections::HashSet;
use tracing::debug;

/// Validated, read-only row-format schema
///
/// Built once from configuration and shared by every worker. Positions not
/// listed in the schema are implicitly [`RowRole::Data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFormatSchema {
    entries: Vec<RowFormatEntry>,
}

impl Default for RowFormatSchema {
    /// Key on row 1, value type on row 2, comment on row 3
    fn default() -> Self {
        Self {
            entries: vec![
                RowFormatEntry::new(DEFAULT_KEY_ROW, RowRole::Key),
                RowFormatEntry::new(DEFAULT_VALUE_TYPE_ROW, RowRole::ValueType),
                RowFormatEntry::new(DEFAULT_COMMENT_ROW, RowRole::Comment),
            ],
        }
    }
}

impl RowFormatSchema {
    /// Build a schema from explicitly configured entries
    ///
    /// Fails if the entries do not pass [`RowFormatSchema::validate`].
    pub fn new(mut entries: Vec<RowFormatEntry>) -> Result<Self> {
        Self::validate(&entries)?;
        entries.sort_by_key(|entry| entry.position);
        debug!("Row format schema loaded with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Check the structural consistency of a set of entries
    ///
    /// Positions are 1-based and listed at most once, each metadata role
    /// appears at most once, and the positions carrying metadata roles,
    /// sorted ascending, are exactly `1..=n`.
    pub fn validate(entries: &[RowFormatEntry]) -> Result<()> {
        let mut seen_positions = HashSet::new();
        let mut seen_roles = HashSet::new();

        for entry in entries {
            if entry.position == 0 {
                return Err(Error::schema(format!(
                    "row positions are 1-based, found position 0 with role '{}'",
                    entry.role
                )));
            }
            if !seen_positions.insert(entry.position) {
                return Err(Error::schema(format!(
                    "row position {} is assigned more than once",
                    entry.position
                )));
            }
            if entry.role.is_metadata() && !seen_roles.insert(entry.role) {
                return Err(Error::schema(format!(
                    "role '{}' is assigned to more than one row",
                    entry.role
                )));
            }
        }

        let mut metadata_positions: Vec<usize> = entries
            .iter()
            .filter(|entry| entry.role.is_metadata())
            .map(|entry| entry.position)
            .collect();
        metadata_positions.sort_unstable();

        for (expected, position) in (1..).zip(&metadata_positions) {
            if *position != expected {
                return Err(Error::schema(format!(
                    "metadata rows must be consecutive starting at row 1, \
                     expected row {expected} but found row {position} (rows: {metadata_positions:?})"
                )));
            }
        }

        Ok(())
    }

    /// Entry at a 1-based row position, implicitly `Data` when unlisted
    pub fn entry_by_position(&self, position: usize) -> RowFormatEntry {
        self.entries
            .iter()
            .find(|entry| entry.position == position)
            .copied()
            .unwrap_or_else(|| RowFormatEntry::new(position, RowRole::Data))
    }

    /// The entry carrying `role`
    pub fn entry_by_role(&self, role: RowRole) -> Result<RowFormatEntry> {
        self.entries
            .iter()
            .find(|entry| entry.role == role)
            .copied()
            .ok_or_else(|| Error::role_not_found(role))
    }

    /// Role of the row at a 1-based position
    pub fn role_at(&self, position: usize) -> RowRole {
        self.entry_by_position(position).role
    }

    /// Number of metadata rows at the top of each sheet
    pub fn metadata_row_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.role.is_metadata())
            .count()
    }

    pub fn entries(&self) -> &[RowFormatEntry] {
        &self.entries
    }
}
