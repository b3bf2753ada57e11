//! Column reconciliation: deciding which columns of two tables to compare
//!
//! When both tables carry an identical header sequence the comparison maps
//! columns one to one. Otherwise the caller builds a mapping draft pairing
//! source columns (left table) with target columns (right table) and
//! finalizes it, which projects the right table down to the mapped columns
//! under the left table's names.

use crate::error::{Error, Result, Side};
use crate::table::{Column, Row, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Outcome of header inspection for two tables
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// Header sequences are identical: compare every column pairwise
    Auto { compare_columns: Vec<String> },
    /// Headers differ: a mapping draft must be built and finalized
    Manual,
}

/// Decide whether two tables can be compared automatically
///
/// Automatic comparison requires the ordered header sequences to be exactly
/// equal: same names, same order, same count. Anything else needs a mapping.
pub fn reconcile(left: &Table, right: &Table) -> Reconciliation {
    let left_headers = left.header_names();
    if left_headers == right.header_names() {
        Reconciliation::Auto {
            compare_columns: left_headers.iter().map(|s| s.to_string()).collect(),
        }
    } else {
        Reconciliation::Manual
    }
}

/// One source/target pair in a mapping draft
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    /// Opaque identifier for addressing the entry while editing
    pub id: Uuid,
    /// Column name in the left table
    pub source: String,
    /// Column name in the right table
    pub target: String,
}

/// An editable collection of column mapping entries
///
/// Entries keep insertion order; that order becomes the compare-column
/// order of the finalized mapping. An empty draft is fine while editing
/// but is rejected by [`finalize_mapping`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingDraft {
    entries: Vec<MappingEntry>,
}

impl MappingDraft {
    /// Create an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source/target pair, returning the id of the new entry
    pub fn add_entry(&mut self, source: impl Into<String>, target: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.push(MappingEntry {
            id,
            source: source.into(),
            target: target.into(),
        });
        id
    }

    /// Remove an entry by id, returning it if present
    pub fn remove_entry(&mut self, id: Uuid) -> Option<MappingEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    /// The entries in insertion order
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the draft has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of finalizing a mapping draft against two tables
#[derive(Debug, Clone)]
pub struct FinalizedMapping {
    /// The right table projected to the mapped target columns, renamed to
    /// the matching source names, in entry order
    pub projected: Table,
    /// Columns to compare, in entry insertion order
    pub compare_columns: Vec<String>,
}

/// Validate a mapping draft and project the right table through it
///
/// The left table is never modified; it is consulted to check that every
/// source column exists. Unmapped columns of the right table are dropped
/// by the projection.
pub fn finalize_mapping(
    left: &Table,
    right: &Table,
    draft: &MappingDraft,
) -> Result<FinalizedMapping> {
    if draft.is_empty() {
        return Err(Error::EmptyMapping);
    }

    // Each source and each target may be used by at most one entry
    let mut seen_sources: HashSet<&str> = HashSet::new();
    let mut seen_targets: HashSet<&str> = HashSet::new();
    for entry in draft.entries() {
        if !seen_sources.insert(entry.source.as_str()) {
            return Err(Error::DuplicateMappingSource {
                column: entry.source.clone(),
            });
        }
        if !seen_targets.insert(entry.target.as_str()) {
            return Err(Error::DuplicateMappingTarget {
                column: entry.target.clone(),
            });
        }
    }

    // Every target must exist in the right table for the projection
    let mut target_indices: Vec<usize> = Vec::with_capacity(draft.len());
    for entry in draft.entries() {
        let idx = right
            .column_index(&entry.target)
            .ok_or_else(|| Error::InvalidColumnReference {
                column: entry.target.clone(),
                side: Side::Right,
            })?;
        target_indices.push(idx);
    }

    // Sources absent from the left table: all missing means there is
    // nothing to compare; partially missing is an error rather than a
    // silent drop of those entries
    let missing: Vec<&MappingEntry> = draft
        .entries()
        .iter()
        .filter(|e| left.column_index(&e.source).is_none())
        .collect();
    if missing.len() == draft.len() {
        return Err(Error::NoCommonColumns);
    }
    if let Some(entry) = missing.first() {
        return Err(Error::InvalidColumnReference {
            column: entry.source.clone(),
            side: Side::Left,
        });
    }

    let columns: Vec<Column> = draft
        .entries()
        .iter()
        .enumerate()
        .map(|(i, e)| Column::new(e.source.clone(), i))
        .collect();

    let mut projected = Table {
        columns,
        rows: Vec::with_capacity(right.row_count()),
        source_path: right.source_path.clone(),
    };
    for row in &right.rows {
        let cells = target_indices
            .iter()
            .map(|&idx| row.cells[idx].clone())
            .collect();
        projected.rows.push(Row::new(cells));
    }

    let compare_columns = draft.entries().iter().map(|e| e.source.clone()).collect();

    Ok(FinalizedMapping {
        projected,
        compare_columns,
    })
}

/// One persisted source/target pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingPair {
    /// Column name in the left table
    pub source: String,
    /// Column name in the right table
    pub target: String,
}

/// A saved column mapping (JSON)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingFile {
    /// Mapping pairs in compare order
    pub pairs: Vec<MappingPair>,
}

impl MappingFile {
    /// Create an empty mapping file
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source/target pair
    pub fn add_pair(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.pairs.push(MappingPair {
            source: source.into(),
            target: target.into(),
        });
    }

    /// Load a mapping file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the mapping file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Build an editable draft from the saved pairs
    pub fn to_draft(&self) -> MappingDraft {
        let mut draft = MappingDraft::new();
        for pair in &self.pairs {
            draft.add_entry(pair.source.clone(), pair.target.clone());
        }
        draft
    }
}
