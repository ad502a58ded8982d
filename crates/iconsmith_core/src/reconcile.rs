//! Reconstruct a mapping table from a generated theme tree.
//!
//! Every artifact either is a primary (a regular file) or links to one. Walking
//! the tree and resolving links recovers which installed paths belong to which
//! canonical name, in the same shape as `mapping.yaml`, so the result can be
//! diffed against the authoritative mapping.

use std::fs;
use std::path::{Component, Path};

use tracing::warn;
use walkdir::WalkDir;

use crate::layout::Variant;
use crate::mapping::MappingTable;

/// Group every `variant` artifact under `theme` by canonical name.
///
/// A link's canonical name is the file stem of its target. Anything that
/// cannot be read as a link counts as a primary named after itself.
pub fn reconcile(theme: &Path, variant: Variant) -> MappingTable {
    let root = theme.join(variant.root());
    let mut table = MappingTable::new();

    for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {err}");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            warn!("Skipping non UTF-8 path {}", entry.path().display());
            continue;
        };
        let Some(stem) = variant.strip_suffix(file_name) else {
            continue;
        };
        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };

        let canonical = match fs::read_link(entry.path()) {
            Ok(target) => canonical_from_target(&target, variant).unwrap_or_else(|| stem.to_string()),
            Err(_) => stem.to_string(),
        };

        table.push(canonical, destination_of(relative, stem));
    }

    table
}

fn canonical_from_target(target: &Path, variant: Variant) -> Option<String> {
    let file_name = target.file_name()?.to_str()?;
    variant
        .strip_suffix(file_name)
        .or_else(|| Path::new(file_name).file_stem().and_then(|stem| stem.to_str()))
        .map(str::to_string)
}

/// `/`-joined destination path with the variant suffix removed
fn destination_of(relative: &Path, stem: &str) -> String {
    let mut parts: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.push(stem.to_string());
    parts.join("/")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::link::link_aliases;
    use pretty_assertions::assert_eq;

    fn write(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<svg/>").unwrap();
    }

    #[test]
    fn test_groups_links_under_their_target() {
        let tmp = tempfile::tempdir().unwrap();
        let scalable = tmp.path().join("scalable");
        let primary = scalable.join("a/foo.svg");
        write(&primary);
        link_aliases(&primary, &[scalable.join("b/bar.svg")]).unwrap();
        write(&scalable.join("a/solo.svg"));

        let table = reconcile(tmp.path(), Variant::Vector);

        assert_eq!(table.get("foo").unwrap().destinations, ["a/foo", "b/bar"]);
        assert_eq!(table.get("solo").unwrap().destinations, ["a/solo"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_symbolic_suffix_is_stripped() {
        let tmp = tempfile::tempdir().unwrap();
        let symbolic = tmp.path().join("symbolic");
        let primary = symbolic.join("apps/foo-symbolic.svg");
        write(&primary);
        link_aliases(&primary, &[symbolic.join("apps/org.example.Foo-symbolic.svg")]).unwrap();

        let table = reconcile(tmp.path(), Variant::Symbolic);
        let foo = table.get("foo").unwrap();
        assert_eq!(foo.destinations.len(), 2);
        assert!(foo.destinations.contains(&"apps/foo".to_string()));
        assert!(foo.destinations.contains(&"apps/org.example.Foo".to_string()));
    }

    #[test]
    fn test_broken_link_uses_its_target_name() {
        let tmp = tempfile::tempdir().unwrap();
        let scalable = tmp.path().join("scalable");
        fs::create_dir_all(&scalable).unwrap();
        std::os::unix::fs::symlink("gone.svg", scalable.join("dangling.svg")).unwrap();

        let table = reconcile(tmp.path(), Variant::Vector);
        assert_eq!(table.get("gone").unwrap().destinations, ["dangling"]);
    }

    #[test]
    fn test_ignores_other_files_and_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(reconcile(tmp.path(), Variant::Vector).is_empty());

        write(&tmp.path().join("scalable/readme.txt"));
        assert!(reconcile(tmp.path(), Variant::Vector).is_empty());
    }
}
