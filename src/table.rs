//! Crate -> implementor list mapping for a single trait.

use crate::implementor::ImplementorRecord;
use std::collections::BTreeMap;

/// Implementors of one trait, grouped by the crate that provides the impl.
///
/// Crate keys are unique and iterate in name order, matching the order rustdoc
/// writes them. Records keep their insertion order within a crate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplementorTable {
    crates: BTreeMap<String, Vec<ImplementorRecord>>,
}

impl ImplementorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to a crate's list, creating the list if needed.
    pub fn push(&mut self, crate_name: impl Into<String>, record: ImplementorRecord) {
        self.crates.entry(crate_name.into()).or_default().push(record);
    }

    /// Replace a crate's whole list. Returns the previous list, if any.
    pub fn set_crate(
        &mut self,
        crate_name: impl Into<String>,
        records: Vec<ImplementorRecord>,
    ) -> Option<Vec<ImplementorRecord>> {
        self.crates.insert(crate_name.into(), records)
    }

    /// Records contributed by a crate.
    pub fn get(&self, crate_name: &str) -> Option<&[ImplementorRecord]> {
        self.crates.get(crate_name).map(Vec::as_slice)
    }

    pub fn contains_crate(&self, crate_name: &str) -> bool {
        self.crates.contains_key(crate_name)
    }

    pub fn crate_names(&self) -> impl Iterator<Item = &str> {
        self.crates.keys().map(String::as_str)
    }

    /// Number of crate keys.
    pub fn crate_count(&self) -> usize {
        self.crates.len()
    }

    /// Total number of records across all crates.
    pub fn len(&self) -> usize {
        self.crates.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.crates.values().all(Vec::is_empty)
    }

    /// Iterate crates with their records.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ImplementorRecord])> {
        self.crates
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Iterate every record together with its crate.
    pub fn records(&self) -> impl Iterator<Item = (&str, &ImplementorRecord)> {
        self.iter()
            .flat_map(|(name, records)| records.iter().map(move |record| (name, record)))
    }

    /// Merge another table in, replacing the lists of crates it mentions.
    ///
    /// This is how rustdoc combines the output of several `cargo doc` runs into
    /// one file: each crate owns its list, so merging the same table twice
    /// leaves the result unchanged.
    pub fn merge(&mut self, other: Self) {
        self.crates.extend(other.crates);
    }

    /// A copy restricted to one crate's records.
    pub fn filter_crate(&self, crate_name: &str) -> Self {
        let crates = self
            .crates
            .get_key_value(crate_name)
            .map(|(name, records)| (name.clone(), records.clone()))
            .into_iter()
            .collect();
        Self { crates }
    }
}

impl FromIterator<(String, Vec<ImplementorRecord>)> for ImplementorTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<ImplementorRecord>)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (crate_name, records) in iter {
            table.crates.entry(crate_name).or_default().extend(records);
        }
        table
    }
}
