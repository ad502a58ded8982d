//! # iconsmith core
//!
//! Turns a library of per-icon SVG sources into installable icon themes.
//!
//! Each theme gets a recolor rule, a stroke weight multiplier and the shared
//! mapping table, which aliases one canonical icon to any number of installed
//! names:
//!
//! - [`resolve`]: find the source of a canonical name across source paths
//! - [`style`]: restyle strokes, endpoint dots and colors of a document
//! - [`link`]: fan a rendered icon out to its aliases through relative links
//! - [`symbolic`]: stroke-flattened monochrome variants via an external tool
//! - [`assemble`]: the per-theme pipeline, `index.theme` and size directories
//! - [`reconcile`]: rebuild a mapping table from an existing tree
//!
//! ## Usage
//!
//! ```ignore
//! use iconsmith_core::{IndexTemplate, Inkscape, MappingTable, ThemeAssembler, ThemeSet};
//!
//! let themes = ThemeSet::load("themes.toml".as_ref())?;
//! let mapping = MappingTable::load("mapping.yaml".as_ref())?;
//! let template = IndexTemplate::load("index.theme".as_ref())?;
//! let inkscape = Inkscape::discover();
//!
//! let mut assembler = ThemeAssembler::new(&mapping, &template);
//! if let Some(tool) = &inkscape {
//!     assembler = assembler.with_converter(tool);
//! }
//! let report = assembler.run(&themes, ".".as_ref());
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod index_theme;
pub mod layout;
pub mod link;
pub mod mapping;
pub mod reconcile;
pub mod resolve;
pub mod style;
pub mod symbolic;

pub use assemble::{EntryOutcome, RunReport, ThemeAssembler, ThemeReport};
pub use config::{GenerationMode, ThemeConfig, ThemeSet};
pub use error::{ConfigError, EntryError, ThemeError, ToolError};
pub use index_theme::{IndexTemplate, ThemeMetadata};
pub use layout::Variant;
pub use mapping::{MappingEntry, MappingTable};
pub use reconcile::reconcile;
pub use style::StyleTransform;
pub use symbolic::{Inkscape, StrokeConverter, SymbolicFailure, SynthesisOutcome};
