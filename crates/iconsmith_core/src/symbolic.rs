//! Monochrome "symbolic" variants through an external stroke-to-path tool
//!
//! The converter flattens every stroke of a rendered icon into filled
//! geometry. Its export is then minified with `usvg` and fanned out to the
//! same aliases as the vector icon.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, OnceLock};

use globset::{Glob, GlobMatcher};
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::link::link_aliases;

/// Converts all stroke paint of `input` to filled paths and exports to
/// `output`, overwriting it.
pub trait StrokeConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), ToolError>;
}

/// Inkscape driven through its action command line
#[derive(Debug, Clone)]
pub struct Inkscape {
    program: PathBuf,
}

impl Inkscape {
    /// Identifier the tool is discovered under
    pub const PROGRAM: &'static str = "org.inkscape.Inkscape";

    /// Look the tool up on `PATH`
    pub fn discover() -> Option<Self> {
        which::which(Self::PROGRAM)
            .ok()
            .map(|program| Self { program })
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl StrokeConverter for Inkscape {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let mut export = std::ffi::OsString::from("--export-filename=");
        export.push(output);

        let result = Command::new(&self.program)
            .arg("--actions=select-all;object-stroke-to-path")
            .arg(export)
            .arg("--export-overwrite")
            .arg(input)
            .output()
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ToolError::Exit {
                program: self.program.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// A symbolic export that did not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicFailure {
    /// Source document of the failed entry
    pub source: PathBuf,
    pub reason: String,
}

/// Result of one synthesis call, aggregated by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    Exported { aliases: usize },
    Failed(SymbolicFailure),
}

/// System fonts, loaded on first use and shared by every minification
fn system_fonts() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            debug!("Loaded {} font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Strip editor data and metadata by round-tripping through `usvg`.
///
/// `<text>` is written back as outlines using the system fonts. Text whose
/// font is not installed has no outline and is lost.
pub fn minify_svg(svg: &str) -> Result<String, usvg::Error> {
    let mut options = usvg::Options::default();
    options.fontdb = system_fonts();
    let tree = usvg::Tree::from_str(svg, &options)?;
    Ok(tree.to_string(&usvg::WriteOptions::default()))
}

/// Matcher for `<stem>*.0.svg`, the exports a crashed converter leaves behind
fn stray_matcher(stem: &str) -> Result<GlobMatcher, globset::Error> {
    let pattern = format!("{}*.0.svg", globset::escape(stem));
    Ok(Glob::new(&pattern)?.compile_matcher())
}

/// Delete `<stem>*.0.svg` leftovers of a crashed converter next to `primary`
pub fn remove_strays(primary: &Path) -> io::Result<usize> {
    let (Some(dir), Some(stem)) = (primary.parent(), primary.file_stem()) else {
        return Ok(0);
    };
    let matcher = stray_matcher(&stem.to_string_lossy())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if matcher.is_match(entry.file_name()) {
            fs::remove_file(entry.path())?;
            debug!("Removed stray export {}", entry.path().display());
            removed += 1;
        }
    }
    Ok(removed)
}

/// Produces the symbolic variant of rendered icons
pub struct Symbolizer<'a> {
    converter: &'a dyn StrokeConverter,
}

impl<'a> Symbolizer<'a> {
    pub fn new(converter: &'a dyn StrokeConverter) -> Self {
        Self { converter }
    }

    /// Export `primary` to `symbolic`, minify it, and link `aliases` to it.
    ///
    /// Never fails: problems are returned as [`SynthesisOutcome::Failed`] so
    /// the caller can keep going and report them at the end of the run.
    pub fn synthesize<P: AsRef<Path>>(
        &self,
        source: &Path,
        primary: &Path,
        symbolic: &Path,
        aliases: &[P],
    ) -> SynthesisOutcome {
        let fail = |reason: String| {
            SynthesisOutcome::Failed(SymbolicFailure {
                source: source.to_path_buf(),
                reason,
            })
        };

        if let Some(parent) = symbolic.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                return fail(format!("{}: {err}", parent.display()));
            }
        }

        let converted = self.converter.convert(primary, symbolic).and_then(|()| {
            if symbolic.is_file() {
                Ok(())
            } else {
                Err(ToolError::MissingOutput(symbolic.to_path_buf()))
            }
        });

        if let Err(err) = remove_strays(primary) {
            warn!("Failed to clean up after {}: {err}", primary.display());
        }

        if let Err(err) = converted {
            return fail(err.to_string());
        }

        match fs::read_to_string(symbolic) {
            Ok(exported) => match minify_svg(&exported) {
                Ok(minified) => {
                    if let Err(err) = fs::write(symbolic, minified) {
                        return fail(format!("{}: {err}", symbolic.display()));
                    }
                }
                Err(err) => warn!("Keeping unminified {}: {err}", symbolic.display()),
            },
            Err(err) => return fail(format!("{}: {err}", symbolic.display())),
        }

        match link_aliases(symbolic, aliases) {
            Ok(aliases) => SynthesisOutcome::Exported { aliases },
            Err(err) => fail(format!("linking aliases of {}: {err}", symbolic.display())),
        }
    }
}
