//! Subcommand implementations

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use iconsmith_core::{IndexTemplate, Inkscape, MappingTable, ThemeAssembler, ThemeSet, Variant};

/// Generate every configured theme
pub fn generate(
    config: &Path,
    mapping: &Path,
    index_template: &Path,
    output_dir: &Path,
    symbolic: bool,
) -> Result<()> {
    // Every input must load before anything is written
    let themes = ThemeSet::load(config)
        .with_context(|| format!("Failed to load theme configuration {}", config.display()))?;
    let mapping = MappingTable::load(mapping)
        .with_context(|| format!("Failed to load mapping {}", mapping.display()))?;
    let template = IndexTemplate::load(index_template)
        .with_context(|| format!("Failed to load index template {}", index_template.display()))?;

    tracing::info!(
        "Generating {} theme(s) from {} mapping entries",
        themes.len(),
        mapping.len()
    );

    let inkscape = if symbolic {
        let found = Inkscape::discover();
        if found.is_none() {
            tracing::warn!(
                "{} was not found, not creating symbolic icons",
                Inkscape::PROGRAM
            );
        }
        found
    } else {
        tracing::info!("Symbolic icons disabled");
        None
    };

    let mut assembler = ThemeAssembler::new(&mapping, &template);
    if let Some(tool) = &inkscape {
        tracing::debug!("Using {}", tool.program().display());
        assembler = assembler.with_converter(tool);
    }

    let report = assembler.run(&themes, output_dir);

    let failures: Vec<_> = report.symbolic_failures().collect();
    if !failures.is_empty() {
        tracing::warn!("{} symbolic export(s) failed:", failures.len());
        for failure in failures {
            println!("{}", failure.source.display());
        }
    }
    if report.failed_entries() > 0 {
        tracing::warn!("{} entries could not be generated", report.failed_entries());
    }

    let incomplete: Vec<_> = report.theme_errors().collect();
    if !incomplete.is_empty() {
        for (destination, err) in &incomplete {
            tracing::error!("{}: {err}", destination.display());
        }
        anyhow::bail!("{} theme error(s), see above", incomplete.len());
    }

    Ok(())
}

/// Print or write the mapping reconstructed from a theme tree
pub fn reconcile(theme: &Path, symbolic: bool, output: Option<&Path>) -> Result<()> {
    let variant = if symbolic {
        Variant::Symbolic
    } else {
        Variant::Vector
    };

    let root = theme.join(variant.root());
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let table = iconsmith_core::reconcile(theme, variant);
    let yaml = table.to_yaml().context("Failed to serialize mapping")?;

    match output {
        Some(path) => {
            fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} entries to {}", table.len(), path.display());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_writes_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let scalable = tmp.path().join("scalable/apps");
        fs::create_dir_all(&scalable).unwrap();
        fs::write(scalable.join("foo.svg"), "<svg/>").unwrap();
        std::os::unix::fs::symlink("foo.svg", scalable.join("bar.svg")).unwrap();

        let output = tmp.path().join("mapping.yaml");
        reconcile(tmp.path(), false, Some(&output)).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "foo:\n- apps/bar\n- apps/foo\n"
        );
    }

    #[test]
    fn test_reconcile_requires_variant_root() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(reconcile(tmp.path(), true, None).is_err());
    }

    #[test]
    fn test_generate_fails_before_writing_on_bad_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("themes.toml");
        fs::write(&config, "[light]\nname = 1\n").unwrap();
        let out = tmp.path().join("out");

        let result = generate(
            &config,
            &tmp.path().join("mapping.yaml"),
            &tmp.path().join("index.theme"),
            &out,
            false,
        );
        assert!(result.is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_generate_fails_before_writing_without_template() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            src.join("foo.svg"),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><style>.a{stroke:#fff;}</style></svg>",
        )
        .unwrap();

        let config = tmp.path().join("themes.toml");
        fs::write(
            &config,
            format!(
                "[light]\nname = \"Light\"\ncomment = \"\"\ninherits = \"\"\nsrc_color = \"#fff\"\ncolor = \"#000\"\nsrc_paths = [{:?}]\n",
                src.display().to_string()
            ),
        )
        .unwrap();
        let mapping = tmp.path().join("mapping.yaml");
        fs::write(&mapping, "foo:\n- apps/foo\n").unwrap();
        let out = tmp.path().join("out");

        let result = generate(&config, &mapping, &tmp.path().join("missing.theme"), &out, false);
        assert!(result.is_err());
        assert!(!out.exists());
    }
}
