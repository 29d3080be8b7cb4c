//! Output path mapping.
//!
//! Every leaf lands under the output root, below its traversal context. A
//! literal top-level input may be given an explicit output name by position;
//! anything discovered by descending into a container is named after its own
//! basename with the suffix replaced by `html`.

use crate::error::{Error, Result};
use crate::walk::{Leaf, LeafOrigin, TraversalContext};
use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

/// Extension given to generated documents.
pub const OUTPUT_EXTENSION: &str = "html";

/// Output root plus the optional per-input override names.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    overrides: Vec<String>,
}

impl OutputLayout {
    /// Create a layout for a run over `input_count` top-level inputs.
    ///
    /// Fails if `overrides` is neither empty nor exactly one name per input.
    pub fn new(
        root: impl Into<PathBuf>,
        overrides: Vec<String>,
        input_count: usize,
    ) -> Result<Self> {
        validate_overrides(input_count, &overrides)?;
        Ok(Self {
            root: root.into(),
            overrides,
        })
    }

    /// Output path for a discovered leaf.
    pub fn output_path(&self, leaf: &Leaf) -> PathBuf {
        map_output_path(
            &self.root,
            &leaf.context,
            &leaf.locator.name(),
            leaf.origin,
            leaf.input_index,
            &self.overrides,
        )
    }
}

/// Check that an override list lines up with the inputs.
pub fn validate_overrides(input_count: usize, overrides: &[String]) -> Result<()> {
    if !overrides.is_empty() && overrides.len() != input_count {
        return Err(Error::config(format!(
            "{} output names given for {} inputs (expected none or one per input)",
            overrides.len(),
            input_count
        )));
    }
    Ok(())
}

/// Compute the output path of a leaf.
///
/// The override at `input_index` is used only for [`LeafOrigin::TopLevel`]
/// leaves, appended verbatim (it may contain separators). Every other leaf is
/// named by [`replace_extension`] on `leaf_name`.
pub fn map_output_path(
    root: &Path,
    context: &TraversalContext,
    leaf_name: &str,
    origin: LeafOrigin,
    input_index: usize,
    overrides: &[String],
) -> PathBuf {
    let mut path = root.to_string_lossy().into_owned();

    for segment in context.segments() {
        let segment = segment.trim_matches(MAIN_SEPARATOR);
        if segment.is_empty() {
            continue;
        }
        if !path.is_empty() && !path.ends_with(MAIN_SEPARATOR) {
            path.push_str(MAIN_SEPARATOR_STR);
        }
        path.push_str(segment);
    }

    if !path.is_empty() && !path.ends_with(MAIN_SEPARATOR) {
        path.push_str(MAIN_SEPARATOR_STR);
    }

    match (origin, overrides.get(input_index)) {
        (LeafOrigin::TopLevel, Some(name)) => path.push_str(name),
        _ => path.push_str(&replace_extension(leaf_name)),
    }

    PathBuf::from(path)
}

/// Replace everything after the last `.` with `html`.
///
/// Names without a `.` get `.html` appended.
pub fn replace_extension(name: &str) -> String {
    let stem = match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    };
    format!("{}.{}", stem, OUTPUT_EXTENSION)
}
