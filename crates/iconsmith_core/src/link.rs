//! Relative symlink fan-out from one artifact to its aliases

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::EntryError;

/// Result of an idempotent link request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    AlreadyPresent,
}

/// Resolve `.` and `..` components without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Path from the directory containing `link` to `target`.
///
/// Both paths must be expressed from the same base (both absolute or both
/// relative to the same directory), which holds for everything the assembler
/// builds from a theme root. `None` when the link's directory climbs above
/// that base, where no relative path can be formed.
pub fn relative_target(link: &Path, target: &Path) -> Option<PathBuf> {
    let dir = link.parent().unwrap_or(Path::new(""));
    pathdiff::diff_paths(normalize(target), normalize(dir))
}

/// [`relative_target`] for an alias of `primary`, as an entry error
pub fn link_target(primary: &Path, alias: &Path) -> Result<PathBuf, EntryError> {
    relative_target(alias, primary).ok_or_else(|| EntryError::UnreachableAlias {
        alias: alias.to_path_buf(),
        primary: primary.to_path_buf(),
    })
}

/// Point every alias at `primary` through a relative symlink.
///
/// Parent directories are created as needed. Whatever already occupies an
/// alias path (file or link) is removed first. Returns the number of links
/// created.
pub fn link_aliases<P: AsRef<Path>>(primary: &Path, aliases: &[P]) -> Result<usize, EntryError> {
    for alias in aliases {
        replace_with_link(primary, alias.as_ref())?;
    }
    Ok(aliases.len())
}

/// Replace whatever is at `alias` with a relative symlink to `primary`
pub fn replace_with_link(primary: &Path, alias: &Path) -> Result<(), EntryError> {
    let target = link_target(primary, alias)?;

    if let Some(parent) = alias.parent() {
        fs::create_dir_all(parent).map_err(|err| EntryError::io(parent, err))?;
    }

    match fs::symlink_metadata(alias) {
        Ok(meta) if meta.is_dir() => {
            return Err(EntryError::io(
                alias,
                io::Error::new(io::ErrorKind::AlreadyExists, "a directory occupies the alias path"),
            ));
        }
        Ok(_) => fs::remove_file(alias).map_err(|err| EntryError::io(alias, err))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(EntryError::io(alias, err)),
    }

    debug!("{} -> {}", alias.display(), target.display());
    symlink_file(&target, alias).map_err(|err| EntryError::io(alias, err))
}

/// Create `link` pointing at `target` unless something is already there.
///
/// `target` is written verbatim, so it should already be relative to the
/// link's directory. An existing occupant is reported as
/// [`LinkOutcome::AlreadyPresent`] and left untouched.
pub fn ensure_link(target: &Path, link: &Path) -> io::Result<LinkOutcome> {
    if fs::symlink_metadata(link).is_ok() {
        return Ok(LinkOutcome::AlreadyPresent);
    }
    match symlink_dir(target, link) {
        Ok(()) => Ok(LinkOutcome::Created),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(LinkOutcome::AlreadyPresent),
        Err(err) => Err(err),
    }
}

#[cfg(unix)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
