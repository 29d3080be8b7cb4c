//! # lodegen Core
//!
//! Finds ontology documents in files, directories and zip/jar archives and
//! generates one HTML page per document, mirroring the discovered directory
//! structure below an output directory.
//!
//! ## Features
//!
//! - Uniform addressing of local files, archive entries (`jar:file:/x.jar!/dir/`)
//!   and network URLs
//! - Recursive traversal of directories and archive directories
//! - Recognised documents: `.owl`, `.ttl`, `.ofn`, `.rdf`, `.rdfs`
//! - Explicit output names for top-level inputs, `<name>.html` otherwise
//! - Per-resource failure reporting: one bad input never stops a run
//!
//! ## Example
//!
//! ```no_run
//! use lodegen_core::{Generator, PreviewTransformer, Resolver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = Generator::new(Resolver::new(), PreviewTransformer, "target/docs")
//!     .with_target_file_names(vec!["prov-o.html".to_string()]);
//!
//! let report = generator.run(&["prov-o.rdf".to_string()])?;
//! for generated in &report.generated {
//!     println!("{} -> {}", generated.source, generated.output.display());
//! }
//! for failure in &report.failures {
//!     eprintln!("{}: {}", failure.address, failure.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
mod classify;
mod config;
mod error;
mod generate;
mod layout;
mod locator;
mod report;
mod resolve;
mod transform;
mod walk;

pub use classify::{Child, Unclassified};
pub use config::{CommandConfig, GeneratorConfig};
pub use error::{Error, Result};
pub use generate::{Generator, Plan, PlannedOutput, write_output};
pub use layout::{OutputLayout, map_output_path, replace_extension, validate_overrides};
pub use locator::{Locator, Scheme};
pub use report::{Failure, FailureKind, Failures, Generated, Report};
pub use resolve::{Resolve, Resolver};
pub use transform::{
    CommandTransformer, DEFAULT_CSS_LOCATION, DEFAULT_LANGUAGE, PreviewTransformer,
    TransformOptions, Transformer,
};
pub use walk::{
    Leaf, LeafOrigin, ONTOLOGY_SUFFIXES, TraversalContext, is_ontology_name, traverse,
};
