//! Read-only access to zip/jar containers.
//!
//! Every function opens the container, reads what it needs and drops the
//! handle before returning. Nothing here holds an archive open across calls,
//! so deep or wide traversals never accumulate file descriptors.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Path separator used inside archive entry names.
pub const SEPARATOR: char = '/';

/// A named entry inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full entry name relative to the archive root.
    pub name: String,
    /// Whether the entry is a directory record.
    pub is_dir: bool,
}

impl ArchiveEntry {
    fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: name.ends_with(SEPARATOR),
        }
    }
}

fn open(container: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(container)
        .map_err(|e| Error::archive_read(container.display().to_string(), e.to_string()))?;
    ZipArchive::new(file)
        .map_err(|e| Error::archive_read(container.display().to_string(), e.to_string()))
}

/// List every entry whose name starts with `prefix`, excluding the entry
/// named exactly `prefix`.
pub fn list_entries(container: &Path, prefix: &str) -> Result<Vec<ArchiveEntry>> {
    let archive = open(container)?;
    let entries = archive
        .file_names()
        .filter(|name| name.starts_with(prefix) && *name != prefix)
        .map(ArchiveEntry::from_name)
        .collect();
    Ok(entries)
}

/// Look up an entry by exact name.
///
/// Directory records are stored with a trailing separator, so `dir` also
/// matches a `dir/` record.
pub fn find_entry(container: &Path, name: &str) -> Result<Option<ArchiveEntry>> {
    let archive = open(container)?;
    let mut dir_match = None;

    for candidate in archive.file_names() {
        if candidate == name {
            return Ok(Some(ArchiveEntry::from_name(candidate)));
        }
        if !name.ends_with(SEPARATOR)
            && candidate.len() == name.len() + 1
            && candidate.starts_with(name)
            && candidate.ends_with(SEPARATOR)
        {
            dir_match = Some(ArchiveEntry::from_name(candidate));
        }
    }

    Ok(dir_match)
}

/// Upper bound on the buffer reserved up front for an entry.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Read the content of a file entry.
pub fn read_entry(container: &Path, name: &str) -> Result<Vec<u8>> {
    let mut archive = open(container)?;
    let mut file = archive
        .by_name(name)
        .map_err(|e| Error::archive_read(container.display().to_string(), format!("{}: {}", name, e)))?;

    // The declared size comes from the archive header and is not trusted
    let capacity = file.size().min(MAX_PREALLOCATION) as usize;
    let mut content = Vec::with_capacity(capacity);
    file.read_to_end(&mut content)?;
    Ok(content)
}

/// Derive the distinct immediate children of `prefix` from a listing.
///
/// A child is a directory if it has its own directory record or if any
/// deeper entry sits below it, so archives written without directory
/// records still nest correctly. Directory children keep a trailing
/// separator in their name. The result is ordered by name.
pub fn immediate_children(prefix: &str, entries: &[ArchiveEntry]) -> Vec<ArchiveEntry> {
    let mut children: BTreeMap<&str, bool> = BTreeMap::new();

    for entry in entries {
        let Some(rest) = entry.name.strip_prefix(prefix) else {
            continue;
        };
        let (segment, is_dir) = match rest.split_once(SEPARATOR) {
            Some((segment, _)) => (segment, true),
            None => (rest, entry.is_dir),
        };
        if segment.is_empty() {
            continue;
        }
        *children.entry(segment).or_insert(false) |= is_dir;
    }

    children
        .into_iter()
        .map(|(segment, is_dir)| ArchiveEntry {
            name: if is_dir {
                format!("{}{}{}", prefix, segment, SEPARATOR)
            } else {
                format!("{}{}", prefix, segment)
            },
            is_dir,
        })
        .collect()
}

/// Turn an entry name into a listing prefix (`""` for the archive root).
pub fn dir_prefix(entry: &str) -> String {
    let mut prefix = entry.to_string();
    if !prefix.is_empty() && !prefix.ends_with(SEPARATOR) {
        prefix.push(SEPARATOR);
    }
    prefix
}
