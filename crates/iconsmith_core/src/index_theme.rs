//! `index.theme` metadata

use std::fs;
use std::path::{Path, PathBuf};

use ini::{EscapePolicy, Ini, ParseOption, WriteOption};

use crate::config::ThemeConfig;
use crate::error::{ConfigError, Result, ThemeError};

/// Section holding the theme metadata keys
pub const SECTION: &str = "Icon Theme";

/// The keys written into a theme's `index.theme`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeMetadata {
    pub name: String,
    pub comment: String,
    pub inherits: String,
}

impl From<&ThemeConfig> for ThemeMetadata {
    fn from(config: &ThemeConfig) -> Self {
        Self {
            name: config.name.clone(),
            comment: config.comment.clone(),
            inherits: config.inherits.clone(),
        }
    }
}

fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

/// A parsed `index.theme` template, shared by every theme of a run
#[derive(Debug, Clone)]
pub struct IndexTemplate {
    path: PathBuf,
    ini: Ini,
}

impl IndexTemplate {
    /// Read and parse the template
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parse template text; `path` is only used in messages
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> std::result::Result<Self, ConfigError> {
        let path = path.into();
        let ini = Ini::load_from_str_opt(content, parse_option()).map_err(|err| ConfigError::Template {
            path: path.clone(),
            message: err.to_string(),
        })?;
        Ok(Self { path, ini })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the template with `Name`, `Comment` and `Inherits` replaced.
    ///
    /// Every other section and key is kept with its original case.
    pub fn render(&self, metadata: &ThemeMetadata) -> Result<String> {
        let mut ini = self.ini.clone();
        ini.with_section(Some(SECTION))
            .set("Name", metadata.name.as_str())
            .set("Comment", metadata.comment.as_str())
            .set("Inherits", metadata.inherits.as_str());

        let template_error = |message: String| ThemeError::Template {
            path: self.path.clone(),
            message,
        };

        let mut out = Vec::new();
        ini.write_to_opt(
            &mut out,
            WriteOption {
                escape_policy: EscapePolicy::Nothing,
                kv_separator: "=",
                ..WriteOption::default()
            },
        )
        .map_err(|err| template_error(err.to_string()))?;
        String::from_utf8(out).map_err(|err| template_error(err.to_string()))
    }

    /// Write `<destination>/index.theme`.
    ///
    /// The file is left alone when its content would not change. Returns
    /// whether it was written.
    pub fn write(&self, destination: &Path, metadata: &ThemeMetadata) -> Result<bool> {
        let rendered = self.render(metadata)?;

        let target = destination.join("index.theme");
        if fs::read_to_string(&target).is_ok_and(|existing| existing == rendered) {
            return Ok(false);
        }

        fs::create_dir_all(destination).map_err(|source| ThemeError::Io {
            path: destination.to_path_buf(),
            source,
        })?;
        fs::write(&target, rendered).map_err(|source| ThemeError::Io {
            path: target.clone(),
            source,
        })?;
        Ok(true)
    }
}
