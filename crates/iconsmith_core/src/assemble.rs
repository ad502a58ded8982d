//! Theme generation: drives every mapping entry through resolution,
//! restyling, alias linking and symbolic synthesis, then writes the theme
//! metadata and size directories.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::config::{GenerationMode, ThemeConfig, ThemeSet};
use crate::error::{EntryError, Result, ThemeError};
use crate::index_theme::{IndexTemplate, ThemeMetadata};
use crate::layout::{Variant, SIZE_DIRECTORIES};
use crate::link::{ensure_link, link_aliases, link_target, LinkOutcome};
use crate::mapping::{MappingEntry, MappingTable};
use crate::resolve::resolve_source;
use crate::style::{StyleError, StyleTransform};
use crate::symbolic::{StrokeConverter, SymbolicFailure, Symbolizer, SynthesisOutcome};

/// What happened to one mapping entry
#[derive(Debug)]
pub enum EntryOutcome {
    /// Primary and every alias already existed; nothing was touched
    Skipped,
    Rendered {
        source: PathBuf,
        aliases: usize,
        /// `None` when symbolic generation is disabled for the run
        symbolic: Option<SynthesisOutcome>,
    },
    Failed(EntryError),
}

/// Summary of one generated theme
#[derive(Debug, Default)]
pub struct ThemeReport {
    pub destination: PathBuf,
    pub rendered: usize,
    pub skipped: usize,
    pub failed: Vec<(String, EntryError)>,
    pub symbolic_failures: Vec<SymbolicFailure>,
    /// Problems that left the theme incomplete (metadata, size links, clearing)
    pub errors: Vec<ThemeError>,
}

impl ThemeReport {
    /// Whether the theme was generated without theme-level errors
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Summary of a whole run
#[derive(Debug, Default)]
pub struct RunReport {
    pub themes: Vec<ThemeReport>,
}

impl RunReport {
    /// Symbolic failures across all themes, in the order they happened
    pub fn symbolic_failures(&self) -> impl Iterator<Item = &SymbolicFailure> {
        self.themes.iter().flat_map(|t| t.symbolic_failures.iter())
    }

    pub fn failed_entries(&self) -> usize {
        self.themes.iter().map(|t| t.failed.len()).sum()
    }

    /// Theme-level errors with the destination they happened in
    pub fn theme_errors(&self) -> impl Iterator<Item = (&Path, &ThemeError)> {
        self.themes
            .iter()
            .flat_map(|t| t.errors.iter().map(move |err| (t.destination.as_path(), err)))
    }
}

/// Generates theme packages from a mapping table
pub struct ThemeAssembler<'a> {
    mapping: &'a MappingTable,
    index_template: &'a IndexTemplate,
    symbolizer: Option<Symbolizer<'a>>,
}

impl<'a> ThemeAssembler<'a> {
    /// Vector-only assembler; see [`ThemeAssembler::with_converter`]
    pub fn new(mapping: &'a MappingTable, index_template: &'a IndexTemplate) -> Self {
        Self {
            mapping,
            index_template,
            symbolizer: None,
        }
    }

    /// Enable symbolic variants through `converter`
    pub fn with_converter(mut self, converter: &'a dyn StrokeConverter) -> Self {
        self.symbolizer = Some(Symbolizer::new(converter));
        self
    }

    /// Generate every theme of `themes` under `output_dir`, in order.
    ///
    /// A theme that hits a theme-level error is reported as incomplete and
    /// the run carries on with the next one.
    pub fn run(&self, themes: &ThemeSet, output_dir: &Path) -> RunReport {
        if self.symbolizer.is_none() {
            debug!("Symbolic generation disabled for this run");
        }

        let mut report = RunReport::default();
        for (section, config) in themes.iter() {
            let destination = output_dir.join(section);
            report
                .themes
                .push(self.assemble(&destination, config, config.mode()));
        }
        report
    }

    /// Generate one theme into `destination`
    pub fn assemble(&self, destination: &Path, config: &ThemeConfig, mode: GenerationMode) -> ThemeReport {
        let mut report = ThemeReport {
            destination: destination.to_path_buf(),
            ..ThemeReport::default()
        };

        match mode {
            GenerationMode::Rebuild => {
                if fs::symlink_metadata(destination).is_ok() {
                    info!("Destination \"{}\" is rebuilt from scratch", destination.display());
                    if let Err(source) = fs::remove_dir_all(destination) {
                        let err = ThemeError::Clear {
                            path: destination.to_path_buf(),
                            source,
                        };
                        error!("{err}");
                        report.errors.push(err);
                        return report;
                    }
                }
            }
            GenerationMode::Incremental => {
                if destination.exists() {
                    info!("Destination \"{}\" exists, trying to update", destination.display());
                }
            }
        }

        let transform = StyleTransform::from_config(config);
        for entry in self.mapping.iter() {
            match self.process_entry(destination, config, &transform, entry) {
                EntryOutcome::Skipped => report.skipped += 1,
                EntryOutcome::Rendered { symbolic, .. } => {
                    report.rendered += 1;
                    if let Some(SynthesisOutcome::Failed(failure)) = symbolic {
                        error!("{}: symbolic export failed: {}", entry.name, failure.reason);
                        report.symbolic_failures.push(failure);
                    }
                }
                EntryOutcome::Failed(err) => {
                    error!("{}: {err}", entry.name);
                    report.failed.push((entry.name.to_string(), err));
                }
            }
        }

        match self.index_template.write(destination, &ThemeMetadata::from(config)) {
            Ok(true) => debug!("Wrote {}", destination.join("index.theme").display()),
            Ok(false) => {}
            Err(err) => {
                error!("{err}");
                report.errors.push(err);
            }
        }

        if let Err(err) = link_size_directories(destination) {
            error!("{err}");
            report.errors.push(err);
        }

        info!(
            "{}: {} rendered, {} up to date, {} failed",
            destination.display(),
            report.rendered,
            report.skipped,
            report.failed.len()
        );
        report
    }

    /// Generate one mapping entry, isolating any failure to the entry
    pub fn process_entry(
        &self,
        destination: &Path,
        config: &ThemeConfig,
        transform: &StyleTransform,
        entry: MappingEntry<'_>,
    ) -> EntryOutcome {
        let targets = Variant::Vector.artifacts(destination, entry.destinations);
        let Some((primary, aliases)) = targets.split_first() else {
            debug!("{}: Skipping, no destinations", entry.name);
            return EntryOutcome::Skipped;
        };
        if targets.iter().all(|target| target.exists()) {
            debug!("{}: Skipping, all icons already exist", entry.name);
            return EntryOutcome::Skipped;
        }

        match self.render_entry(destination, config, transform, entry, primary, aliases) {
            Ok(outcome) => outcome,
            Err(err) => EntryOutcome::Failed(err),
        }
    }

    fn render_entry(
        &self,
        destination: &Path,
        config: &ThemeConfig,
        transform: &StyleTransform,
        entry: MappingEntry<'_>,
        primary: &Path,
        aliases: &[PathBuf],
    ) -> std::result::Result<EntryOutcome, EntryError> {
        let source = resolve_source(entry.name, &config.src_paths)?;
        let document = fs::read_to_string(&source).map_err(|err| EntryError::io(&source, err))?;

        let rendered = transform.apply(&document).map_err(|err| match err {
            StyleError::MissingStyleBlock => EntryError::StyleBlockMissing(source.clone()),
            StyleError::Xml(message) => EntryError::Xml {
                path: source.clone(),
                message,
            },
        })?;

        // Nothing is written for an entry with an alias that cannot link back
        for alias in aliases {
            link_target(primary, alias)?;
        }
        write_primary(primary, &rendered)?;
        let aliases = link_aliases(primary, aliases)?;
        info!("{}: {} -> {}", entry.name, source.display(), primary.display());

        let symbolic = self.symbolizer.as_ref().and_then(|symbolizer| {
            let symbolic_targets = Variant::Symbolic.artifacts(destination, entry.destinations);
            let (symbolic, symbolic_aliases) = symbolic_targets.split_first()?;
            Some(symbolizer.synthesize(&source, primary, symbolic, symbolic_aliases))
        });

        Ok(EntryOutcome::Rendered {
            source,
            aliases,
            symbolic,
        })
    }
}

/// Write a rendered icon, replacing a link that may occupy its path
fn write_primary(primary: &Path, rendered: &str) -> std::result::Result<(), EntryError> {
    if let Some(parent) = primary.parent() {
        fs::create_dir_all(parent).map_err(|err| EntryError::io(parent, err))?;
    }
    // Writing through a link left by an older mapping would clobber its target
    if fs::symlink_metadata(primary).is_ok_and(|meta| meta.file_type().is_symlink()) {
        fs::remove_file(primary).map_err(|err| EntryError::io(primary, err))?;
    }
    fs::write(primary, rendered).map_err(|err| EntryError::io(primary, err))
}

/// Link every conventional size directory of `destination` to `scalable`
pub fn link_size_directories(destination: &Path) -> Result<usize> {
    fs::create_dir_all(destination).map_err(|source| ThemeError::Io {
        path: destination.to_path_buf(),
        source,
    })?;

    let mut created = 0;
    for size in SIZE_DIRECTORIES {
        let link = destination.join(size);
        match ensure_link(Path::new(Variant::Vector.root()), &link) {
            Ok(LinkOutcome::Created) => created += 1,
            Ok(LinkOutcome::AlreadyPresent) => {}
            Err(source) => return Err(ThemeError::Io { path: link, source }),
        }
    }
    Ok(created)
}
