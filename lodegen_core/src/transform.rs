//! The document transformer seam and its built-in implementations.

use crate::error::{Error, Result};
use crate::locator::Locator;
use serde::Deserialize;
use std::ffi::OsString;
use std::process::Command;

/// Default stylesheet location for generated pages.
pub const DEFAULT_CSS_LOCATION: &str = "http://eelst.cs.unibo.it/apps/LODE/";

/// Default documentation language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Options forwarded to a transformer for every document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Documentation language code.
    pub language: String,
    /// Location of the transformation stylesheet, if not the transformer's own.
    pub xslt_location: Option<String>,
    /// Location of the CSS referenced by generated pages.
    pub css_location: Option<String>,
    /// Parse with the OWL API.
    pub use_owlapi: bool,
    /// Include imported ontologies.
    pub consider_imported_ontologies: bool,
    /// Include the transitive closure of imported ontologies.
    pub consider_imported_closure: bool,
    /// Run a reasoner and document the inferred ontology.
    pub use_reasoner: bool,
    /// Merge all axioms of imports rather than only their annotations.
    pub deep_import: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            xslt_location: None,
            css_location: Some(DEFAULT_CSS_LOCATION.to_string()),
            use_owlapi: false,
            consider_imported_ontologies: false,
            consider_imported_closure: false,
            use_reasoner: false,
            deep_import: true,
        }
    }
}

/// Turns one ontology document into rendered text.
pub trait Transformer {
    fn transform(
        &self,
        document: &Locator,
        catalog: Option<&Locator>,
        options: &TransformOptions,
    ) -> Result<String>;
}

impl<T: Transformer + ?Sized> Transformer for &T {
    fn transform(
        &self,
        document: &Locator,
        catalog: Option<&Locator>,
        options: &TransformOptions,
    ) -> Result<String> {
        (**self).transform(document, catalog, options)
    }
}

impl<T: Transformer + ?Sized> Transformer for Box<T> {
    fn transform(
        &self,
        document: &Locator,
        catalog: Option<&Locator>,
        options: &TransformOptions,
    ) -> Result<String> {
        (**self).transform(document, catalog, options)
    }
}

/// Renders the raw document source as a standalone HTML page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewTransformer;

impl Transformer for PreviewTransformer {
    fn transform(
        &self,
        document: &Locator,
        catalog: Option<&Locator>,
        options: &TransformOptions,
    ) -> Result<String> {
        let bytes = document.read_bytes()?;
        let source = String::from_utf8_lossy(&bytes);
        let title = escape_html(&document.name());

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n");
        html.push_str(&format!(
            "<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n",
            escape_html(&options.language),
            title
        ));
        if let Some(css) = &options.css_location {
            html.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\">\n",
                escape_html(css)
            ));
        }
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", title));
        html.push_str(&format!(
            "<p class=\"source\">{}</p>\n",
            escape_html(&document.address())
        ));
        if let Some(catalog) = catalog {
            html.push_str(&format!(
                "<p class=\"catalog\">{}</p>\n",
                escape_html(&catalog.address())
            ));
        }
        html.push_str(&format!("<pre>{}</pre>\n", escape_html(&source)));
        html.push_str("</body>\n</html>\n");

        Ok(html)
    }
}

/// Runs an external program per document and returns its standard output.
///
/// The program is invoked as
/// `program [args..] <document-address> --language <code> [--catalog <address>]
/// [--xslt <location>] [--css <location>] [--use-owlapi] [--imported]
/// [--imported-closure] [--reasoner] [--no-deep-import]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTransformer {
    program: String,
    args: Vec<String>,
}

impl CommandTransformer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Full argument list for one document.
    pub fn arguments(
        &self,
        document: &Locator,
        catalog: Option<&Locator>,
        options: &TransformOptions,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        args.push(document.address().into());
        args.push("--language".into());
        args.push(options.language.clone().into());

        if let Some(catalog) = catalog {
            args.push("--catalog".into());
            args.push(catalog.address().into());
        }
        if let Some(xslt) = &options.xslt_location {
            args.push("--xslt".into());
            args.push(xslt.into());
        }
        if let Some(css) = &options.css_location {
            args.push("--css".into());
            args.push(css.into());
        }

        let flags = [
            (options.use_owlapi, "--use-owlapi"),
            (options.consider_imported_ontologies, "--imported"),
            (options.consider_imported_closure, "--imported-closure"),
            (options.use_reasoner, "--reasoner"),
            (!options.deep_import, "--no-deep-import"),
        ];
        args.extend(
            flags
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, flag)| OsString::from(flag)),
        );

        args
    }
}

impl Transformer for CommandTransformer {
    fn transform(
        &self,
        document: &Locator,
        catalog: Option<&Locator>,
        options: &TransformOptions,
    ) -> Result<String> {
        let output = Command::new(&self.program)
            .args(self.arguments(document, catalog, options))
            .output()
            .map_err(|e| {
                Error::transform(
                    document.address(),
                    format!("cannot run {}: {}", self.program, e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::transform(
                document.address(),
                format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        String::from_utf8(output.stdout).map_err(|_| {
            Error::transform(document.address(), "transformer output is not valid UTF-8")
        })
    }
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
