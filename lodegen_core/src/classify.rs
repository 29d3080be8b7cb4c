//! Container/leaf classification and child listing.

use crate::archive;
use crate::error::{Error, Result};
use crate::locator::Locator;
use std::fs;

/// A direct child of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub locator: Locator,
    pub is_container: bool,
}

/// A child whose kind could not be determined.
#[derive(Debug)]
pub struct Unclassified {
    pub locator: Locator,
    pub error: Error,
}

impl Locator {
    /// Check whether this locator denotes a container.
    ///
    /// - file: the path is a directory
    /// - archive: the entry exists and is a directory record
    /// - network: never
    pub fn is_container(&self) -> Result<bool> {
        match self {
            Locator::File { path } => fs::metadata(path)
                .map(|metadata| metadata.is_dir())
                .map_err(|e| Error::classification(self.address(), e.to_string())),
            Locator::Archive { container, entry } => {
                let found = archive::find_entry(container, entry)
                    .map_err(|e| Error::classification(self.address(), e.to_string()))?;
                match found {
                    Some(entry) => Ok(entry.is_dir),
                    None => Err(Error::classification(
                        self.address(),
                        "entry not found in archive",
                    )),
                }
            }
            Locator::Network { .. } => Ok(false),
        }
    }

    /// List the direct children of a container, ordered by name.
    ///
    /// The outer error means the container itself could not be listed. Each
    /// filesystem child is classified on its own, so an unreadable child shows
    /// up as an [`Unclassified`] entry without hiding its siblings.
    pub fn children(&self) -> Result<Vec<std::result::Result<Child, Unclassified>>> {
        match self {
            Locator::File { path } => {
                let walker = ignore::WalkBuilder::new(path)
                    .max_depth(Some(1)) // Only immediate children
                    .standard_filters(false) // Every entry, hidden or ignored
                    .sort_by_file_name(|a, b| a.cmp(b))
                    .build();

                let mut children = Vec::new();
                for entry in walker {
                    let entry = entry.map_err(|err| {
                        Error::classification(self.address(), Error::from(err).to_string())
                    })?;

                    // Skip the directory itself
                    if entry.depth() == 0 {
                        continue;
                    }

                    let locator = Locator::file(entry.path());
                    // Symlinks are followed to find out what they point at
                    let is_container = match entry.file_type() {
                        Some(file_type) if file_type.is_dir() => Ok(true),
                        Some(file_type) if file_type.is_file() => Ok(false),
                        _ => locator.is_container(),
                    };
                    children.push(match is_container {
                        Ok(is_container) => Ok(Child {
                            locator,
                            is_container,
                        }),
                        Err(error) => Err(Unclassified { locator, error }),
                    });
                }
                Ok(children)
            }
            Locator::Archive { container, entry } => {
                let prefix = archive::dir_prefix(entry);
                let entries = archive::list_entries(container, &prefix)?;

                Ok(archive::immediate_children(&prefix, &entries)
                    .into_iter()
                    .map(|child| {
                        Ok(Child {
                            locator: Locator::archive(container.clone(), child.name),
                            is_container: child.is_dir,
                        })
                    })
                    .collect())
            }
            Locator::Network { .. } => Ok(Vec::new()),
        }
    }
}
