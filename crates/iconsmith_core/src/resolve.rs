//! Source document lookup across ordered source directories

use std::path::{Path, PathBuf};

use crate::error::EntryError;

/// Find `<name>.svg` in the first source directory that has it.
///
/// When no directory has the exact name, the scan is repeated with
/// underscores replaced by hyphens. The substitution only affects the file
/// looked up, never the name used for output.
pub fn resolve_source<P: AsRef<Path>>(name: &str, src_paths: &[P]) -> Result<PathBuf, EntryError> {
    if let Some(found) = scan(name, src_paths) {
        return Ok(found);
    }

    if name.contains('_') {
        if let Some(found) = scan(&name.replace('_', "-"), src_paths) {
            return Ok(found);
        }
    }

    Err(EntryError::SourceNotFound(name.to_string()))
}

fn scan<P: AsRef<Path>>(file_stem: &str, src_paths: &[P]) -> Option<PathBuf> {
    let file_name = format!("{file_stem}.svg");
    src_paths
        .iter()
        .map(|dir| dir.as_ref().join(&file_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<svg/>").unwrap();
    }

    #[test]
    fn test_first_directory_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        touch(&second.join("foo.svg"));
        touch(&first.join("foo.svg"));

        let found = resolve_source("foo", &[&first, &second]).unwrap();
        assert_eq!(found, first.join("foo.svg"));
    }

    #[test]
    fn test_exact_name_beats_hyphenated_in_earlier_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        touch(&first.join("foo-bar.svg"));
        touch(&second.join("foo_bar.svg"));

        let found = resolve_source("foo_bar", &[&first, &second]).unwrap();
        assert_eq!(found, second.join("foo_bar.svg"));
    }

    #[test]
    fn test_hyphen_fallback() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("foo-bar-baz.svg"));

        let found = resolve_source("foo_bar_baz", &[tmp.path()]).unwrap();
        assert_eq!(found, tmp.path().join("foo-bar-baz.svg"));
    }

    #[test]
    fn test_missing_source() {
        let tmp = tempfile::tempdir().unwrap();
        let err = resolve_source("nothing_here", &[tmp.path()]).unwrap_err();
        assert!(matches!(err, EntryError::SourceNotFound(ref name) if name == "nothing_here"));
    }
}
