mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lodegen_core::{
    Generator, GeneratorConfig, PreviewTransformer, Resolver, TransformOptions, Transformer,
};
use output::{GenerateOutput, OutputWriter, PlannedInfo, ScanOutput, failure_lines};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Default target directory when none is configured.
const DEFAULT_TARGET_DIR: &str = "./lodegen-docs";

/// Environment variable naming the target directory.
const TARGET_DIR_ENV: &str = "LODEGEN_TARGET_DIR";

/// Result code when some resources failed.
const RESULT_PARTIAL: u8 = 1;

/// Result code for configuration and usage errors.
const RESULT_ERROR: u8 = 2;

/// lodegen - HTML documentation for ontology documents
#[derive(Parser)]
#[command(name = "lodegen")]
#[command(
    about = "Generate HTML documentation for ontologies in files, directories and archives",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Target directory (defaults to LODEGEN_TARGET_DIR env var, the config file, or ./lodegen-docs)
    #[arg(short = 'o', long, global = true)]
    target_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate documentation for every ontology document found
    Generate {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// List the documents that would be generated, without transforming them
    Scan {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Ontology documents, directories or archive directories (URL, resource name or path)
    inputs: Vec<String>,

    /// Output file name for each input, in input order
    #[arg(short = 'n', long = "name")]
    names: Vec<String>,

    /// Directory or jar/zip archive searched for relative addresses (repeatable)
    #[arg(short = 'L', long = "resource-path")]
    resource_path: Vec<PathBuf>,
}

#[derive(Args)]
struct TransformArgs {
    /// Ontology catalog address
    #[arg(long)]
    catalog: Option<String>,

    /// Documentation language
    #[arg(long)]
    language: Option<String>,

    /// Transformation stylesheet location
    #[arg(long)]
    xslt: Option<String>,

    /// CSS location referenced by generated pages
    #[arg(long)]
    css: Option<String>,

    /// Parse with the OWL API
    #[arg(long)]
    use_owlapi: bool,

    /// Include imported ontologies
    #[arg(long)]
    imported: bool,

    /// Include the transitive closure of imported ontologies
    #[arg(long)]
    imported_closure: bool,

    /// Document the inferred ontology
    #[arg(long)]
    reasoner: bool,

    /// Merge only annotations of imported ontologies
    #[arg(long)]
    no_deep_import: bool,

    /// External transformer program (the built-in preview is used otherwise)
    #[arg(long)]
    command: Option<String>,

    /// Argument passed to the transformer program before the document (repeatable)
    #[arg(long = "command-arg", allow_hyphen_values = true)]
    command_args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let writer = OutputWriter::new(cli.json);
    match run(cli, &writer) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            writer.write_error(&err, RESULT_ERROR);
            ExitCode::from(RESULT_ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}

fn run(cli: Cli, writer: &OutputWriter) -> Result<u8> {
    let config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    // Determine target directory: CLI arg > LODEGEN_TARGET_DIR env var > config > default
    let target_dir = cli
        .target_dir
        .or_else(|| std::env::var(TARGET_DIR_ENV).ok().map(PathBuf::from))
        .or_else(|| config.target_directory.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR));

    match cli.command {
        Commands::Generate { inputs, transform } => {
            cmd_generate(writer, config, target_dir, inputs, transform)
        }
        Commands::Scan { inputs } => cmd_scan(writer, config, target_dir, inputs),
    }
}

/// Inputs, output names and resolver, with CLI values taking precedence.
fn merge_inputs(config: &GeneratorConfig, args: InputArgs) -> (Vec<String>, Vec<String>, Resolver) {
    let inputs = if args.inputs.is_empty() {
        config.inputs.clone()
    } else {
        args.inputs
    };
    let names = if args.names.is_empty() {
        config.target_file_names.clone()
    } else {
        args.names
    };

    let mut roots = args.resource_path;
    roots.extend(config.resource_path.iter().cloned());

    (inputs, names, Resolver::with_resource_roots(roots))
}

fn merge_options(config: &GeneratorConfig, args: &TransformArgs) -> TransformOptions {
    let mut options = config.options.clone();
    if let Some(language) = &args.language {
        options.language = language.clone();
    }
    if let Some(xslt) = &args.xslt {
        options.xslt_location = Some(xslt.clone());
    }
    if let Some(css) = &args.css {
        options.css_location = Some(css.clone());
    }
    options.use_owlapi |= args.use_owlapi;
    options.consider_imported_ontologies |= args.imported;
    options.consider_imported_closure |= args.imported_closure;
    options.use_reasoner |= args.reasoner;
    if args.no_deep_import {
        options.deep_import = false;
    }
    options
}

fn cmd_generate(
    writer: &OutputWriter,
    config: GeneratorConfig,
    target_dir: PathBuf,
    inputs: InputArgs,
    transform: TransformArgs,
) -> Result<u8> {
    let options = merge_options(&config, &transform);
    let catalog = transform.catalog.clone().or_else(|| config.catalog.clone());

    let transformer: Box<dyn Transformer> = match (&transform.command, &config.command) {
        (Some(program), _) => Box::new(lodegen_core::CommandTransformer::new(
            program.clone(),
            transform.command_args.clone(),
        )),
        (None, Some(command)) => Box::new(command.transformer()),
        (None, None) => Box::new(PreviewTransformer),
    };

    let (inputs, names, resolver) = merge_inputs(&config, inputs);
    let generator = Generator::new(resolver, transformer, &target_dir)
        .with_target_file_names(names)
        .with_catalog(catalog)
        .with_options(options);

    let report = generator
        .run(&inputs)
        .with_context(|| format!("Failed to generate into {}", target_dir.display()))?;

    let result_code = if report.is_success() { 0 } else { RESULT_PARTIAL };
    let data = GenerateOutput {
        success: report.is_success(),
        result_code,
        target_directory: target_dir.display().to_string(),
        finished_at: chrono::Local::now().to_rfc3339(),
        generated: report.generated.clone(),
        failures: report.failures.clone(),
    };

    writer.write(&data, || {
        let mut text = String::new();
        for generated in &report.generated {
            text.push_str(&format!("{} -> {}\n", generated.source, generated.output.display()));
        }
        text.push_str(&failure_lines(&report.failures));
        text.push_str(&format!(
            "{} generated, {} failed\n",
            report.generated.len(),
            report.failures.len()
        ));
        text
    })?;

    Ok(result_code)
}

fn cmd_scan(
    writer: &OutputWriter,
    config: GeneratorConfig,
    target_dir: PathBuf,
    inputs: InputArgs,
) -> Result<u8> {
    let (inputs, names, resolver) = merge_inputs(&config, inputs);
    let generator = Generator::new(resolver, PreviewTransformer, &target_dir)
        .with_target_file_names(names);

    let plan = generator
        .plan(&inputs)
        .with_context(|| "Failed to scan inputs")?;

    let result_code = if plan.failures.is_empty() { 0 } else { RESULT_PARTIAL };
    let data = ScanOutput {
        success: plan.failures.is_empty(),
        result_code,
        outputs: plan.outputs.iter().map(PlannedInfo::from).collect(),
        failures: plan.failures.clone(),
    };

    writer.write(&data, || {
        let mut text = String::new();
        for planned in &plan.outputs {
            text.push_str(&format!(
                "{} -> {}\n",
                planned.leaf.locator,
                planned.output.display()
            ));
        }
        text.push_str(&failure_lines(&plan.failures));
        text
    })?;

    Ok(result_code)
}
