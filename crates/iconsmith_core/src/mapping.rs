//! Canonical icon name to installed paths mapping (mapping.yaml)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Ordered association of canonical icon names to destination paths.
///
/// Destination paths are relative to a variant root and carry no extension.
/// The first destination of an entry is the physical render target, the rest
/// are aliases linked to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MappingTable {
    entries: IndexMap<String, Vec<String>>,
}

/// A borrowed view of one mapping entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingEntry<'a> {
    pub name: &'a str,
    pub destinations: &'a [String],
}

impl<'a> MappingEntry<'a> {
    /// The physical render target, `None` for an entry without destinations
    pub fn primary(&self) -> Option<&'a str> {
        self.destinations.first().map(String::as_str)
    }

    /// Destinations linked to the primary
    pub fn aliases(&self) -> &'a [String] {
        self.destinations.get(1..).unwrap_or_default()
    }
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a mapping document
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a mapping document
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        let table: MappingTable = serde_yaml::from_str(content)?;
        if let Some((name, _)) = table.entries.iter().find(|(_, dests)| dests.is_empty()) {
            return Err(ConfigError::EmptyEntry(name.clone()));
        }
        Ok(table)
    }

    /// Serialize in the same shape as the mapping document
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        if self.entries.is_empty() {
            return Ok(String::new());
        }
        serde_yaml::to_string(self)
    }

    /// Append a destination to `name`, creating the entry if needed
    pub fn push(&mut self, name: impl Into<String>, destination: impl Into<String>) {
        self.entries
            .entry(name.into())
            .or_default()
            .push(destination.into());
    }

    pub fn get(&self, name: &str) -> Option<MappingEntry<'_>> {
        self.entries
            .get_key_value(name)
            .map(|(name, destinations)| MappingEntry { name, destinations })
    }

    /// Entries in document order
    pub fn iter(&self) -> impl Iterator<Item = MappingEntry<'_>> {
        self.entries
            .iter()
            .map(|(name, destinations)| MappingEntry { name, destinations })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Entries without destinations are dropped, as a loaded document rejects them
impl FromIterator<(String, Vec<String>)> for MappingTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .filter(|(_, destinations)| !destinations.is_empty())
                .collect(),
        }
    }
}
