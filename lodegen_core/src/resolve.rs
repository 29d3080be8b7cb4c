//! Turning address strings into locators.

use crate::archive;
use crate::locator::Locator;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves an address string to a locator.
pub trait Resolve {
    fn resolve(&self, address: &str) -> Option<Locator>;
}

impl<F> Resolve for F
where
    F: Fn(&str) -> Option<Locator>,
{
    fn resolve(&self, address: &str) -> Option<Locator> {
        self(address)
    }
}

/// Default resolver.
///
/// Tries, in order:
/// 1. an absolute address (`file:`, `jar:`/`zip:`, `http(s):`, `ftp:`)
/// 2. each resource root, in order: a directory containing the address, or a
///    `.jar`/`.zip` archive containing it as an entry
/// 3. an existing local file, relative to the working directory
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    resource_roots: Vec<PathBuf>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver searching the given resource roots.
    pub fn with_resource_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            resource_roots: roots,
        }
    }

    pub fn resource_roots(&self) -> &[PathBuf] {
        &self.resource_roots
    }

    fn find_resource(&self, address: &str) -> Option<Locator> {
        let relative = address.trim_start_matches('/');
        if relative.is_empty() {
            return None;
        }

        for root in &self.resource_roots {
            if root.is_dir() {
                let candidate = root.join(relative);
                if candidate.exists() {
                    return Some(Locator::file(candidate));
                }
            } else if is_archive_path(root) {
                match archive::find_entry(root, relative) {
                    Ok(Some(entry)) => return Some(Locator::archive(root.clone(), entry.name)),
                    Ok(None) => {}
                    Err(err) => debug!(root = %root.display(), "skipping resource root: {}", err),
                }
            }
        }

        None
    }
}

impl Resolve for Resolver {
    fn resolve(&self, address: &str) -> Option<Locator> {
        if let Some(locator) = Locator::parse(address) {
            return Some(locator);
        }

        if let Some(locator) = self.find_resource(address) {
            return Some(locator);
        }

        let path = Path::new(address);
        if path.exists() {
            let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
            return Some(Locator::file(path));
        }

        None
    }
}

fn is_archive_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("jar") | Some("zip")
    )
}
