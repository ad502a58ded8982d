//! On-disk layout of a generated theme

use std::path::{Path, PathBuf};

/// Conventional size directories, each a link to `scalable`
pub const SIZE_DIRECTORIES: &[&str] = &[
    "8x8", "16x16", "16x16@2x", "18x18", "18x18@2x", "22x22", "22x22@2x", "24x24", "24x24@2x",
    "32x32", "32x32@2x", "42x42", "48x48", "48x48@2x", "64x64", "64x64@2x", "84x84", "96x96",
    "128x128",
];

/// Which artifact tree of a theme a path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// `scalable/<path>.svg`
    Vector,
    /// `symbolic/<path>-symbolic.svg`
    Symbolic,
}

impl Variant {
    /// Directory under the theme root
    pub fn root(self) -> &'static str {
        match self {
            Variant::Vector => "scalable",
            Variant::Symbolic => "symbolic",
        }
    }

    /// File name suffix appended to a mapping destination
    pub fn suffix(self) -> &'static str {
        match self {
            Variant::Vector => ".svg",
            Variant::Symbolic => "-symbolic.svg",
        }
    }

    /// Artifact path of a mapping destination inside `theme`
    pub fn artifact(self, theme: &Path, destination: &str) -> PathBuf {
        theme
            .join(self.root())
            .join(format!("{destination}{}", self.suffix()))
    }

    /// Artifact paths for every destination, in mapping order
    pub fn artifacts<S: AsRef<str>>(self, theme: &Path, destinations: &[S]) -> Vec<PathBuf> {
        destinations
            .iter()
            .map(|dest| self.artifact(theme, dest.as_ref()))
            .collect()
    }

    /// Mapping destination of a file name, or `None` if it lacks the suffix
    pub fn strip_suffix(self, file_name: &str) -> Option<&str> {
        file_name.strip_suffix(self.suffix())
    }
}
