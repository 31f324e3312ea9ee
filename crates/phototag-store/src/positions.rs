//! Catalog of predefined positions loaded from user files

use std::collections::BTreeMap;

use phototag_types::PositionRecord;

/// Append-only collection of named positions. Same-named positions from
/// different files coexist; removal happens per source file.
#[derive(Debug, Default)]
pub struct PositionCatalog {
    positions: Vec<PositionRecord>,
}

impl PositionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_records(&mut self, records: Vec<PositionRecord>) -> usize {
        let added = records.len();
        self.positions.extend(records);
        added
    }

    pub fn all(&self) -> &[PositionRecord] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn has_data(&self) -> bool {
        !self.positions.is_empty()
    }

    /// Remove exactly the records loaded from the given file; returns how
    /// many were dropped.
    pub fn remove_by_source_file(&mut self, source_file: &str) -> usize {
        let before = self.positions.len();
        self.positions.retain(|p| p.source_file != source_file);
        before - self.positions.len()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Group positions by the file they were loaded from.
    pub fn by_source_file(&self) -> BTreeMap<&str, Vec<&PositionRecord>> {
        let mut groups: BTreeMap<&str, Vec<&PositionRecord>> = BTreeMap::new();
        for position in &self.positions {
            groups
                .entry(position.source_file.as_str())
                .or_default()
                .push(position);
        }
        groups
    }
}
