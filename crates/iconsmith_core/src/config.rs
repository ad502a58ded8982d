//! Theme configuration file handling

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// All configured themes (themes.toml), keyed by destination directory.
///
/// Table order in the document is the processing order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ThemeSet {
    themes: IndexMap<String, ThemeConfig>,
}

/// One destination theme package
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ThemeConfig {
    /// Display name written to `index.theme`
    pub name: String,
    /// Comment written to `index.theme`
    pub comment: String,
    /// Parent theme identifier written to `index.theme`
    pub inherits: String,
    /// Delete and regenerate the whole destination
    #[serde(default)]
    pub overwrite: bool,
    /// Packaging hint, not used by generation
    #[serde(default)]
    pub archive: bool,
    /// Color token present in the sources
    pub src_color: String,
    /// Replacement color for `src_color`
    #[serde(rename = "color")]
    pub dest_color: String,
    /// Stroke width multiplier
    #[serde(default = "default_line_weight")]
    pub line_weight: f64,
    /// Source directories, searched in order
    #[serde(default)]
    pub src_paths: Vec<PathBuf>,
}

fn default_line_weight() -> f64 {
    1.0
}

/// How an existing destination is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Delete the destination subtree, then generate everything
    Rebuild,
    /// Keep existing content, only add what is missing
    Incremental,
}

impl ThemeConfig {
    pub fn mode(&self) -> GenerationMode {
        if self.overwrite {
            GenerationMode::Rebuild
        } else {
            GenerationMode::Incremental
        }
    }
}

impl ThemeSet {
    /// Load and validate a theme configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a theme configuration document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let set: ThemeSet = toml::from_str(content)?;
        set.validate()?;
        Ok(set)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (destination, theme) in &self.themes {
            if !(theme.line_weight.is_finite() && theme.line_weight > 0.0) {
                return Err(ConfigError::InvalidLineWeight {
                    theme: destination.clone(),
                    value: theme.line_weight,
                });
            }
        }
        Ok(())
    }

    /// Themes in document order, as `(destination, config)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThemeConfig)> {
        self.themes.iter().map(|(dest, theme)| (dest.as_str(), theme))
    }

    pub fn get(&self, destination: &str) -> Option<&ThemeConfig> {
        self.themes.get(destination)
    }

    pub fn insert(&mut self, destination: impl Into<String>, theme: ThemeConfig) {
        self.themes.insert(destination.into(), theme);
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
