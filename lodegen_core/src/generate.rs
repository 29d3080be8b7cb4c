//! Documentation generation runs.

use crate::error::{Error, Result};
use crate::layout::OutputLayout;
use crate::locator::Locator;
use crate::report::{Failure, FailureKind, Failures, Generated, Report};
use crate::resolve::Resolve;
use crate::transform::{TransformOptions, Transformer};
use crate::walk::{self, Leaf};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A leaf together with the path it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput {
    pub leaf: Leaf,
    pub output: PathBuf,
}

/// Result of a discovery-only run.
#[derive(Debug, Default)]
pub struct Plan {
    pub outputs: Vec<PlannedOutput>,
    pub failures: Vec<Failure>,
}

/// Drives resolution, traversal, transformation and writing.
pub struct Generator<R, T> {
    resolver: R,
    transformer: T,
    target_directory: PathBuf,
    target_file_names: Vec<String>,
    catalog: Option<String>,
    options: TransformOptions,
}

impl<R: Resolve, T: Transformer> Generator<R, T> {
    /// Create a generator writing below `target_directory`.
    pub fn new(resolver: R, transformer: T, target_directory: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            transformer,
            target_directory: target_directory.into(),
            target_file_names: Vec::new(),
            catalog: None,
            options: TransformOptions::default(),
        }
    }

    /// Explicit output names, one per top-level input.
    pub fn with_target_file_names(mut self, names: Vec<String>) -> Self {
        self.target_file_names = names;
        self
    }

    /// Address of the ontology catalog passed to the transformer.
    pub fn with_catalog(mut self, catalog: Option<String>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    /// Generate documentation for every input.
    ///
    /// Only configuration errors (no inputs, misaligned output names) fail the
    /// run. Every other failure is recorded in the report and processing goes
    /// on with the remaining resources.
    pub fn run(&self, inputs: &[String]) -> Result<Report> {
        let layout = self.layout(inputs)?;
        let catalog = self.resolve_catalog();

        let mut failures = Failures::new();
        let mut report = Report::default();

        for (index, input) in inputs.iter().enumerate() {
            for leaf in self.discover(input, index, &mut failures) {
                let output = layout.output_path(&leaf);
                match self.generate_one(&leaf, catalog.as_ref(), &output) {
                    Ok(()) => {
                        info!(source = %leaf.locator, output = %output.display(), "generated");
                        report.generated.push(Generated::new(&leaf, output));
                    }
                    Err(err) => failures.record(&leaf.locator.address(), &err),
                }
            }
        }

        report.failures = failures.into_vec();
        Ok(report)
    }

    /// Discover leaves and their output paths without transforming anything.
    pub fn plan(&self, inputs: &[String]) -> Result<Plan> {
        let layout = self.layout(inputs)?;

        let mut failures = Failures::new();
        let mut outputs = Vec::new();
        for (index, input) in inputs.iter().enumerate() {
            for leaf in self.discover(input, index, &mut failures) {
                let output = layout.output_path(&leaf);
                outputs.push(PlannedOutput { leaf, output });
            }
        }

        Ok(Plan {
            outputs,
            failures: failures.into_vec(),
        })
    }

    fn layout(&self, inputs: &[String]) -> Result<OutputLayout> {
        if inputs.is_empty() {
            return Err(Error::config("no inputs given"));
        }
        OutputLayout::new(
            &self.target_directory,
            self.target_file_names.clone(),
            inputs.len(),
        )
    }

    /// Resolve one top-level input and traverse it.
    fn discover(&self, input: &str, index: usize, failures: &mut Failures) -> Vec<Leaf> {
        match self.resolver.resolve(input) {
            Some(locator) => {
                debug!(input, locator = %locator, "resolved");
                walk::traverse(&locator, input, index, failures)
            }
            None => {
                failures.push(Failure::new(
                    FailureKind::Resolution,
                    input,
                    Error::resolution(input, "not a URL, resource or existing file").to_string(),
                ));
                Vec::new()
            }
        }
    }

    fn resolve_catalog(&self) -> Option<Locator> {
        let address = self.catalog.as_deref()?;
        let catalog = self.resolver.resolve(address);
        if catalog.is_none() {
            warn!(catalog = address, "catalog not found, continuing without it");
        }
        catalog
    }

    fn generate_one(&self, leaf: &Leaf, catalog: Option<&Locator>, output: &Path) -> Result<()> {
        let text = self
            .transformer
            .transform(&leaf.locator, catalog, &self.options)?;
        write_output(output, &text)
    }
}

/// Write `text` to `path`, creating parent directories as needed.
///
/// Directory creation is idempotent and the file is replaced atomically.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
    debug!(path = %path.display(), "writing");

    // Write atomically using tempfile
    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(|e| write_error(path, e))?;
    temp_file
        .write_all(text.as_bytes())
        .map_err(|e| write_error(path, e))?;
    temp_file.flush().map_err(|e| write_error(path, e))?;
    temp_file.persist(path).map_err(|e| write_error(path, e.error))?;

    Ok(())
}

fn write_error(path: &Path, err: impl fmt::Display) -> Error {
    Error::write(path.display().to_string(), err.to_string())
}
