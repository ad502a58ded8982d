//! Error types

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load the theme configuration, mapping or index template.
///
/// These are the only errors that stop a run, and they all happen before
/// generation starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The theme configuration is not valid TOML for the expected shape
    #[error("Failed to parse theme configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The mapping document is not valid YAML for the expected shape
    #[error("Failed to parse mapping: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A theme declares a line weight that is not a positive number
    #[error("Theme `{theme}` has invalid line_weight {value} (must be > 0)")]
    InvalidLineWeight { theme: String, value: f64 },

    /// A mapping entry has no destination paths
    #[error("Mapping entry `{0}` has no destinations")]
    EmptyEntry(String),

    /// The `index.theme` template is not a valid key-value document
    #[error("Failed to parse index template {}: {message}", .path.display())]
    Template { path: PathBuf, message: String },
}

/// Failure to generate a single mapping entry.
///
/// Entry errors are logged and counted, the run moves on to the next entry.
#[derive(Error, Debug)]
pub enum EntryError {
    /// No source document under any source path, in either name form
    #[error("`{0}` not found in any source path")]
    SourceNotFound(String),

    /// The source document has no (or an empty) `<style>` element
    #[error("{} has no style block", .0.display())]
    StyleBlockMissing(PathBuf),

    /// The source document is not well-formed XML
    #[error("Malformed SVG {}: {message}", .path.display())]
    Xml { path: PathBuf, message: String },

    /// No relative path leads from an alias back to its primary
    #[error("Cannot link {} to {}", .alias.display(), .primary.display())]
    UnreachableAlias { alias: PathBuf, primary: PathBuf },

    /// Reading the source or writing an artifact failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EntryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of the external stroke-to-path tool
#[derive(Error, Debug)]
pub enum ToolError {
    /// The tool could not be started
    #[error("Failed to run {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited unsuccessfully
    #[error("{} exited with {status}: {stderr}", .program.display())]
    Exit {
        program: PathBuf,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The converter did not leave an export behind
    #[error("No export produced at {}", .0.display())]
    MissingOutput(PathBuf),
}

/// Failure that leaves a theme incomplete.
///
/// Recorded in the theme's report; the run moves on to the next theme.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// Removing the destination in rebuild mode failed
    #[error("Failed to clear destination {}: {source}", .path.display())]
    Clear {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The `index.theme` template could not be rendered
    #[error("Failed to render index template {}: {message}", .path.display())]
    Template { path: PathBuf, message: String },

    /// Writing metadata or size directory links failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for theme-level operations
pub type Result<T> = std::result::Result<T, ThemeError>;
