//! Recursive discovery of ontology documents.
//!
//! A traversal starts at one top-level locator and yields a [`Leaf`] for every
//! ontology document reachable from it, depth first. Directories and archive
//! directories are always descended into; only leaves are filtered by suffix.
//! Failures on one child are recorded and its siblings are still visited.

use crate::classify::Unclassified;
use crate::locator::Locator;
use crate::report::Failures;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// File suffixes recognised as ontology documents (case-sensitive).
pub const ONTOLOGY_SUFFIXES: [&str; 5] = [".owl", ".ttl", ".ofn", ".rdf", ".rdfs"];

/// Check whether a name or address ends with a recognised ontology suffix.
pub fn is_ontology_name(name: &str) -> bool {
    ONTOLOGY_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Relative directory path accumulated while descending.
///
/// Contexts are never mutated; [`descend`](Self::descend) derives a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TraversalContext {
    segments: Vec<String>,
}

impl TraversalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context one level deeper.
    pub fn descend(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for TraversalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// How a leaf was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafOrigin {
    /// The leaf is the top-level input itself.
    TopLevel,
    /// The leaf was found by descending into a container.
    Discovered,
}

/// A discovered ontology document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub locator: Locator,
    /// Relative directory path at the moment of discovery.
    pub context: TraversalContext,
    /// The top-level input string this leaf descends from.
    pub input: String,
    /// Position of that input in the input list.
    pub input_index: usize,
    pub origin: LeafOrigin,
}

/// The top-level input a traversal belongs to.
struct Origin<'a> {
    input: &'a str,
    input_index: usize,
}

/// Traverse `locator`, the resolved form of the top-level `input` at
/// position `input_index`.
///
/// Returns the leaves in depth-first order. Failures are recorded into
/// `failures` and never stop the traversal.
pub fn traverse(
    locator: &Locator,
    input: &str,
    input_index: usize,
    failures: &mut Failures,
) -> Vec<Leaf> {
    let origin = Origin { input, input_index };
    let mut leaves = Vec::new();

    match locator.is_container() {
        Ok(true) => visit_container(
            locator,
            &TraversalContext::new(),
            &origin,
            failures,
            &mut leaves,
        ),
        Ok(false) => push_leaf(
            locator,
            &TraversalContext::new(),
            LeafOrigin::TopLevel,
            &origin,
            &mut leaves,
        ),
        Err(err) => failures.record(&locator.address(), &err),
    }

    leaves
}

/// Descend into a container.
fn visit_container(
    container: &Locator,
    parent: &TraversalContext,
    origin: &Origin<'_>,
    failures: &mut Failures,
    leaves: &mut Vec<Leaf>,
) {
    let context = parent.descend(container.name());
    debug!(container = %container, context = %context, "descending");

    let children = match container.children() {
        Ok(children) => children,
        Err(err) => {
            failures.record(&container.address(), &err);
            return;
        }
    };

    for child in children {
        match child {
            Ok(child) if child.is_container => {
                visit_container(&child.locator, &context, origin, failures, leaves)
            }
            Ok(child) => push_leaf(
                &child.locator,
                &context,
                LeafOrigin::Discovered,
                origin,
                leaves,
            ),
            // An unclassifiable child is only a failure if it could be a document
            Err(unclassified) if !is_ontology_name(&unclassified.locator.address()) => {
                debug!(resource = %unclassified.locator, "skipping unreadable non-ontology resource")
            }
            Err(Unclassified { locator, error }) => failures.record(&locator.address(), &error),
        }
    }
}

fn push_leaf(
    locator: &Locator,
    context: &TraversalContext,
    leaf_origin: LeafOrigin,
    origin: &Origin<'_>,
    leaves: &mut Vec<Leaf>,
) {
    if !is_ontology_name(&locator.address()) {
        debug!(resource = %locator, "skipping non-ontology resource");
        return;
    }

    leaves.push(Leaf {
        locator: locator.clone(),
        context: context.clone(),
        input: origin.input.to_string(),
        input_index: origin.input_index,
        origin: leaf_origin,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::write_zip;
    use crate::report::FailureKind;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// (context, name) pairs of a traversal, order-independent.
    fn shape(leaves: &[Leaf]) -> BTreeSet<(String, String)> {
        leaves
            .iter()
            .map(|l| (l.context.to_string(), l.locator.name()))
            .collect()
    }

    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("test/subDir/deeper.owl")).unwrap();
        fs::write(root.join("test/test1.owl"), b"").unwrap();
        fs::write(root.join("test/notes.txt"), b"").unwrap();
        fs::write(root.join("test/subDir/test2.owl"), b"").unwrap();
        fs::write(root.join("test/subDir/deeper.owl/inner.ttl"), b"").unwrap();
        fs::write(root.join("test/subDir/UPPER.OWL"), b"").unwrap();
    }

    #[test]
    fn test_suffixes() {
        for name in ["a.owl", "a.ttl", "a.ofn", "a.rdf", "a.rdfs"] {
            assert!(is_ontology_name(name), "{}", name);
        }
        for name in ["a.OWL", "a.xml", "a.owl.bak", "owl", "a.rd"] {
            assert!(!is_ontology_name(name), "{}", name);
        }
    }

    proptest! {
        #[test]
        fn prop_recognised_suffix_passes(stem in "[A-Za-z0-9_./-]{0,20}", index in 0..ONTOLOGY_SUFFIXES.len()) {
            let name = format!("{}{}", stem, ONTOLOGY_SUFFIXES[index]);
            prop_assert!(is_ontology_name(&name));
        }

        #[test]
        fn prop_trailing_character_fails(stem in "[a-z]{0,10}", index in 0..ONTOLOGY_SUFFIXES.len(), extra in "[a-z0-9_~]") {
            let suffix = ONTOLOGY_SUFFIXES[index];
            // ".rdf" + "s" is itself recognised
            prop_assume!(!(suffix == ".rdf" && extra == "s"));
            let name = format!("{}{}{}", stem, suffix, extra);
            prop_assert!(!is_ontology_name(&name));
        }

        #[test]
        fn prop_uppercase_suffix_fails(stem in "[a-z]{0,10}", index in 0..ONTOLOGY_SUFFIXES.len()) {
            let name = format!("{}{}", stem, ONTOLOGY_SUFFIXES[index].to_uppercase());
            prop_assert!(!is_ontology_name(&name));
        }
    }

    #[test]
    fn test_context_is_immutable() {
        let root = TraversalContext::new();
        let child = root.descend("test");
        let grandchild = child.descend("subDir");
        assert!(root.is_empty());
        assert_eq!(child.segments(), ["test"]);
        assert_eq!(grandchild.to_string(), "test/subDir");
    }

    #[test]
    fn test_single_leaf_input() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("prov-o.rdf");
        fs::write(&file, b"").unwrap();

        let mut failures = Failures::new();
        let leaves = traverse(&Locator::file(&file), "prov-o.rdf", 3, &mut failures);

        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].origin, LeafOrigin::TopLevel);
        assert_eq!(leaves[0].input_index, 3);
        assert!(leaves[0].context.is_empty());
        assert!(failures.is_empty());
    }

    #[test]
    fn test_unrecognised_top_level_leaf_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("readme.md");
        fs::write(&file, b"").unwrap();

        let mut failures = Failures::new();
        assert!(traverse(&Locator::file(&file), "readme.md", 0, &mut failures).is_empty());
        assert!(failures.is_empty());
    }

    #[test]
    fn test_directory_traversal_filters_leaves_not_directories() {
        let temp_dir = TempDir::new().unwrap();
        build_tree(temp_dir.path());

        let mut failures = Failures::new();
        let leaves = traverse(
            &Locator::file(temp_dir.path().join("test")),
            "test",
            0,
            &mut failures,
        );

        let expected: BTreeSet<(String, String)> = [
            ("test", "test1.owl"),
            ("test/subDir", "test2.owl"),
            // A directory named like an ontology is still descended into
            ("test/subDir/deeper.owl", "inner.ttl"),
        ]
        .into_iter()
        .map(|(c, n)| (c.to_string(), n.to_string()))
        .collect();

        assert_eq!(shape(&leaves), expected);
        assert!(leaves.iter().all(|l| l.origin == LeafOrigin::Discovered));
        assert!(leaves.iter().all(|l| l.input == "test"));
        assert!(failures.is_empty());
    }

    #[test]
    fn test_depth_first_order() {
        let temp_dir = TempDir::new().unwrap();
        build_tree(temp_dir.path());

        let mut failures = Failures::new();
        let leaves = traverse(
            &Locator::file(temp_dir.path().join("test")),
            "test",
            0,
            &mut failures,
        );
        let names: Vec<String> = leaves.iter().map(|l| l.locator.name()).collect();
        assert_eq!(names, vec!["inner.ttl", "test2.owl", "test1.owl"]);
    }

    #[test]
    fn test_archive_matches_filesystem() {
        let temp_dir = TempDir::new().unwrap();
        build_tree(temp_dir.path());

        let jar = temp_dir.path().join("mock.jar");
        write_zip(
            &jar,
            &[
                ("test/", ""),
                ("test/test1.owl", ""),
                ("test/notes.txt", ""),
                ("test/subDir/", ""),
                ("test/subDir/test2.owl", ""),
                ("test/subDir/UPPER.OWL", ""),
                ("test/subDir/deeper.owl/", ""),
                ("test/subDir/deeper.owl/inner.ttl", ""),
            ],
        );

        let mut failures = Failures::new();
        let from_dir = traverse(
            &Locator::file(temp_dir.path().join("test")),
            "test",
            0,
            &mut failures,
        );
        let from_jar = traverse(&Locator::archive(&jar, "/test/"), "jar", 0, &mut failures);

        assert_eq!(shape(&from_dir), shape(&from_jar));
        assert!(failures.is_empty());

        let leaf = from_jar.iter().find(|l| l.locator.name() == "test2.owl").unwrap();
        assert_eq!(leaf.locator, Locator::archive(&jar, "test/subDir/test2.owl"));
    }

    #[test]
    fn test_missing_archive_entry_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let jar = temp_dir.path().join("mock.jar");
        write_zip(&jar, &[("a/", ""), ("a/x.owl", "")]);

        let mut failures = Failures::new();
        let leaves = traverse(&Locator::archive(&jar, "/b/"), "b", 0, &mut failures);
        assert!(leaves.is_empty());

        let failures = failures.into_vec();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::Classification);
    }

    #[test]
    #[cfg(unix)]
    fn test_broken_child_does_not_stop_siblings() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("onto");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.owl"), b"").unwrap();
        fs::write(dir.join("c.owl"), b"").unwrap();
        std::os::unix::fs::symlink(dir.join("gone"), dir.join("b.owl")).unwrap();

        let mut failures = Failures::new();
        let leaves = traverse(&Locator::file(&dir), "onto", 0, &mut failures);

        let names: Vec<String> = leaves.iter().map(|l| l.locator.name()).collect();
        assert_eq!(names, vec!["a.owl", "c.owl"]);

        let failures = failures.into_vec();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::Classification);
        assert_eq!(failures[0].address, Locator::file(dir.join("b.owl")).address());
    }

    #[test]
    #[cfg(unix)]
    fn test_broken_non_ontology_child_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("onto");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.owl"), b"").unwrap();
        std::os::unix::fs::symlink(dir.join("gone"), dir.join("notes.txt")).unwrap();

        let mut failures = Failures::new();
        let leaves = traverse(&Locator::file(&dir), "onto", 0, &mut failures);

        assert_eq!(leaves.len(), 1);
        assert!(failures.is_empty());
    }

    #[test]
    fn test_traversal_is_repeatable() {
        let temp_dir = TempDir::new().unwrap();
        build_tree(temp_dir.path());
        let root = Locator::file(temp_dir.path().join("test"));

        let mut failures = Failures::new();
        let first = traverse(&root, "test", 0, &mut failures);
        let second = traverse(&root, "test", 0, &mut failures);
        assert_eq!(first, second);
    }
}
