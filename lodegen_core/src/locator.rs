//! Resource locators: filesystem paths, archive entries and network URLs.

use crate::archive;
use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Prefixes that introduce an archive-nested address (`jar:<container>!/<entry>`).
const ARCHIVE_PREFIXES: [&str; 2] = ["jar:", "zip:"];

/// URL schemes treated as network resources.
const NETWORK_PREFIXES: [&str; 3] = ["http://", "https://", "ftp://"];

/// Addressing scheme of a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    File,
    Archive,
    Network,
}

impl Scheme {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::File => "file",
            Scheme::Archive => "archive",
            Scheme::Network => "network",
        }
    }
}

/// An addressable resource.
///
/// Locators are immutable values; two locators are equal when their
/// normalized addresses are equal.
#[derive(Debug, Clone)]
pub enum Locator {
    /// A path on the local filesystem.
    File { path: PathBuf },
    /// An entry inside a zip/jar container. `entry` carries no leading separator.
    Archive { container: PathBuf, entry: String },
    /// A remote URL.
    Network { url: String },
}

impl Locator {
    /// Create a filesystem locator.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Locator::File { path: path.into() }
    }

    /// Create an archive entry locator. A leading separator on `entry` is dropped.
    pub fn archive(container: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        let mut entry: String = entry.into();
        if entry.starts_with(archive::SEPARATOR) {
            entry.remove(0);
        }
        Locator::Archive {
            container: container.into(),
            entry,
        }
    }

    /// Create a network locator.
    pub fn network(url: impl Into<String>) -> Self {
        Locator::Network { url: url.into() }
    }

    /// Parse an absolute address.
    ///
    /// Recognised forms:
    /// - `file:<path>` (also `file:///<path>`)
    /// - `jar:<container>!/<entry>` and `zip:<container>!/<entry>`, where the
    ///   container may itself be written as `file:<path>`
    /// - `http://`, `https://` and `ftp://` URLs
    ///
    /// Returns `None` for anything else, including bare relative paths.
    pub fn parse(address: &str) -> Option<Self> {
        let address = address.trim();

        for prefix in ARCHIVE_PREFIXES {
            if let Some(rest) = address.strip_prefix(prefix) {
                // The container is everything before the last '!'
                let (container, entry) = rest.rsplit_once('!')?;
                let container = container
                    .strip_prefix("file:")
                    .map(strip_authority)
                    .unwrap_or(container);
                if container.is_empty() {
                    return None;
                }
                return Some(Locator::archive(container, entry));
            }
        }

        if let Some(path) = address.strip_prefix("file:") {
            let path = strip_authority(path);
            if path.is_empty() {
                return None;
            }
            return Some(Locator::file(path));
        }

        if NETWORK_PREFIXES.iter().any(|p| address.starts_with(p)) {
            return Some(Locator::network(address));
        }

        None
    }

    /// Get the addressing scheme.
    pub fn scheme(&self) -> Scheme {
        match self {
            Locator::File { .. } => Scheme::File,
            Locator::Archive { .. } => Scheme::Archive,
            Locator::Network { .. } => Scheme::Network,
        }
    }

    /// Normalized address string.
    pub fn address(&self) -> String {
        match self {
            Locator::File { path } => format!("file:{}", path.display()),
            Locator::Archive { container, entry } => {
                format!("jar:file:{}!/{}", container.display(), entry)
            }
            Locator::Network { url } => url.clone(),
        }
    }

    /// Last non-empty segment of the address.
    ///
    /// For a directory-like archive entry (`dir/sub/`) this is `sub`; for the
    /// archive root it falls back to the container's file stem.
    pub fn name(&self) -> String {
        match self {
            Locator::File { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Locator::Archive { container, entry } => match last_segment(entry) {
                Some(name) => name.to_string(),
                None => container
                    .file_stem()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            },
            Locator::Network { url } => last_segment(url).unwrap_or(url).to_string(),
        }
    }

    /// Locator for a named child of this one.
    ///
    /// Archive directory children get a trailing separator so they can be
    /// listed as prefixes.
    pub fn child(&self, name: &str, is_dir: bool) -> Locator {
        match self {
            Locator::File { path } => Locator::file(path.join(name)),
            Locator::Archive { container, entry } => {
                let mut child = archive::dir_prefix(entry);
                child.push_str(name);
                if is_dir {
                    child.push(archive::SEPARATOR);
                }
                Locator::archive(container.clone(), child)
            }
            Locator::Network { url } => {
                Locator::network(format!("{}/{}", url.trim_end_matches('/'), name))
            }
        }
    }

    /// Read the full content of a leaf document.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Locator::File { path } => {
                fs::read(path).map_err(|e| Error::transform(self.address(), e.to_string()))
            }
            Locator::Archive { container, entry } => archive::read_entry(container, entry)
                .map_err(|e| Error::transform(self.address(), e.to_string())),
            Locator::Network { .. } => Err(Error::transform(
                self.address(),
                "remote fetch not supported",
            )),
        }
    }
}

/// Drop a `//authority` part from a `file:` URL path.
fn strip_authority(path: &str) -> &str {
    match path.strip_prefix("//") {
        Some(rest) => rest.find('/').map(|i| &rest[i..]).unwrap_or(""),
        None => path,
    }
}

fn last_segment(address: &str) -> Option<&str> {
    address
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}

impl PartialEq for Locator {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl Eq for Locator {}

impl Hash for Locator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_parse_file_url() {
        let loc = Locator::parse("file:///tmp/onto/test1.owl").unwrap();
        assert_eq!(loc, Locator::file("/tmp/onto/test1.owl"));
        assert_eq!(loc.scheme(), Scheme::File);

        let loc = Locator::parse("file:/tmp/x.ttl").unwrap();
        assert_eq!(loc.address(), "file:/tmp/x.ttl");
    }

    #[test]
    fn test_parse_jar_address() {
        let loc = Locator::parse("jar:file:/libs/mock.jar!/test2/").unwrap();
        match &loc {
            Locator::Archive { container, entry } => {
                assert_eq!(container, Path::new("/libs/mock.jar"));
                assert_eq!(entry, "test2/");
            }
            other => panic!("unexpected locator: {:?}", other),
        }
        assert_eq!(loc.address(), "jar:file:/libs/mock.jar!/test2/");
        assert_eq!(loc.scheme(), Scheme::Archive);
    }

    #[test]
    fn test_parse_archive_splits_on_last_bang() {
        let loc = Locator::parse("zip:/data/we!rd.zip!/a/b.owl").unwrap();
        assert_eq!(loc, Locator::archive("/data/we!rd.zip", "a/b.owl"));
    }

    #[test]
    fn test_parse_network_and_rejects_relative() {
        let loc = Locator::parse("http://www.w3.org/ns/prov-o.owl").unwrap();
        assert_eq!(loc.scheme(), Scheme::Network);
        assert_eq!(loc.name(), "prov-o.owl");

        assert!(Locator::parse("prov-o.rdf").is_none());
        assert!(Locator::parse("test/subDir").is_none());
        assert!(Locator::parse("jar:file:/missing-separator.jar").is_none());
        assert!(Locator::parse("file:").is_none());
    }

    #[test]
    fn test_names() {
        assert_eq!(Locator::file("/a/b/test").name(), "test");
        assert_eq!(Locator::archive("/m.jar", "/test2/subDir2/").name(), "subDir2");
        assert_eq!(Locator::archive("/m.jar", "test2/test3.owl").name(), "test3.owl");
        assert_eq!(Locator::archive("/libs/mock.jar", "").name(), "mock");
    }

    #[test]
    fn test_archive_child() {
        let dir = Locator::archive("/m.jar", "test2/");
        assert_eq!(
            dir.child("subDir2", true),
            Locator::archive("/m.jar", "test2/subDir2/")
        );
        assert_eq!(
            dir.child("test3.owl", false),
            Locator::archive("/m.jar", "test2/test3.owl")
        );
        // Missing trailing separator on the parent is tolerated
        assert_eq!(
            Locator::archive("/m.jar", "test2").child("a.ttl", false),
            Locator::archive("/m.jar", "test2/a.ttl")
        );
    }

    #[test]
    fn test_equality_by_address() {
        let a = Locator::archive("/m.jar", "/x/y.owl");
        let b = Locator::parse("jar:file:/m.jar!/x/y.owl").unwrap();
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_network_read_fails() {
        let loc = Locator::network("https://example.org/o.ttl");
        assert!(matches!(loc.read_bytes(), Err(Error::Transform { .. })));
    }
}
