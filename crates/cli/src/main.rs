//! docs2oas CLI
//!
//! Command-line interface for converting markdown endpoint docs into an
//! OpenAPI document.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use docs2oas_common::{ConverterConfig, Node, NodeTree};
use docs2oas_generator::{
    render, ConversionReport, Converter, OpenApiDocument, OperationAssembler, OutputFormat,
    SchemaRegistry,
};
use docs2oas_parser::{DirectorySource, MarkdownParser};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "docs2oas")]
#[command(version, about = "Convert markdown endpoint docs into an OpenAPI document", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a directory of endpoint documents
    #[command(after_help = "EXAMPLES:\n  \
        # Print YAML to stdout\n  \
        docs2oas convert --input ./docs/api\n\n  \
        # Write JSON with a custom title\n  \
        docs2oas convert \\\n    \
        --input ./docs/api \\\n    \
        --output openapi.json \\\n    \
        --title \"Shop API\" \\\n    \
        --api-version 2.0.0\n\n  \
        # Fail the build when any document is rejected\n  \
        docs2oas convert --input ./docs/api --output openapi.yaml --strict")]
    Convert {
        /// Directory containing endpoint documents
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (from the output extension if not specified)
        #[arg(short, long)]
        format: Option<Format>,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// API title (overrides the configuration)
        #[arg(long)]
        title: Option<String>,

        /// API version (overrides the configuration)
        #[arg(long)]
        api_version: Option<String>,

        /// Exit with an error when any document fails to convert
        #[arg(long)]
        strict: bool,
    },

    /// Show how a single document is read and assembled
    Inspect {
        /// Path to the endpoint document
        #[arg(short, long)]
        file: PathBuf,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => OutputFormat::Yaml,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Options for the convert command
struct ConvertOptions {
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<Format>,
    config: Option<PathBuf>,
    title: Option<String>,
    api_version: Option<String>,
    strict: bool,
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("{} Verbose mode enabled", "→".cyan());
    }

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            config,
            title,
            api_version,
            strict,
        } => convert_command(ConvertOptions {
            input,
            output,
            format,
            config,
            title,
            api_version,
            strict,
            verbose: cli.verbose,
        }),
        Commands::Inspect { file, config } => {
            inspect_command(&file, config.as_deref(), cli.verbose)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Progress goes to stderr so stdout only ever carries the document
fn convert_command(options: ConvertOptions) -> Result<ExitCode> {
    let config = load_config(
        options.config.as_deref(),
        options.title,
        options.api_version,
    )?;

    if options.verbose {
        eprintln!("  Title: {}", config.title);
        eprintln!("  Version: {}", config.version);
        eprintln!("  Required parameters: {:?}", config.parameter_required);
    }

    eprintln!(
        "{} Scanning directory: {}",
        "→".cyan(),
        options.input.display()
    );
    let source = DirectorySource::new(&options.input);
    let converter = Converter::new(config);
    let report = converter
        .convert_source(&source)
        .context("Failed to read endpoint documents")?;

    if options.verbose {
        print_operations(&report);
    }
    print_failures(&report);

    let document = OpenApiDocument::from_spec(&report.document, converter.config());
    let format = resolve_format(options.format, options.output.as_deref());
    let text = render(&document, format).context("Failed to render OpenAPI document")?;

    match &options.output {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => print!("{}", text),
    }

    eprintln!(
        "\n{} Total: {} operations, {} schemas",
        "✓".green().bold(),
        report.document.operation_count(),
        report.document.schemas.len()
    );

    if !report.is_clean() {
        eprintln!(
            "{} Skipped {} document(s) due to errors",
            "⚠".yellow(),
            report.failures.len()
        );
        if options.strict {
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn inspect_command(file: &Path, config_path: Option<&Path>, verbose: bool) -> Result<()> {
    let config = load_config(config_path, None, None)?;

    println!("{} Reading document: {}", "→".cyan(), file.display());
    let tree = MarkdownParser::from_file(file)
        .context("Failed to load endpoint document")?
        .parse();

    println!("\n{}", "Outline:".bold());
    print_outline(&tree, verbose);

    let mut registry = SchemaRegistry::new();
    let assembler = OperationAssembler::new(config.parameter_required);
    match assembler.assemble(&tree, &mut registry) {
        Ok((endpoint, operation)) => {
            println!("\n{}", "✓ Assembly successful!".green().bold());
            println!("  Operation: {}", endpoint.to_string().yellow());
            println!("  Description: {}", operation.description);
            println!("  Parameters: {}", operation.parameters.len());
            println!(
                "  Request body: {}",
                if operation.request_body.is_some() {
                    "yes"
                } else {
                    "no"
                }
            );
            println!(
                "  Responses: {}",
                operation
                    .responses
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            println!("\n{}", "Schemas:".bold());
            for def in registry.iter() {
                println!(
                    "  • {} ({} properties, {} required)",
                    def.name.cyan(),
                    def.properties.len(),
                    def.required.len()
                );
            }
        }
        Err(e) => {
            eprintln!("\n{} {}: {}", "⚠".yellow(), tree.source, e);
        }
    }

    Ok(())
}

/// Load the configuration file, if any, then apply flag overrides
fn load_config(
    path: Option<&Path>,
    title: Option<String>,
    api_version: Option<String>,
) -> Result<ConverterConfig> {
    let mut config = match path {
        Some(path) => ConverterConfig::load(path).context("Failed to load configuration")?,
        None => ConverterConfig::default(),
    };

    if let Some(title) = title {
        config = config.with_title(title);
    }
    if let Some(version) = api_version {
        config = config.with_version(version);
    }
    Ok(config)
}

/// An explicit `--format` wins, then the output extension, then YAML
fn resolve_format(format: Option<Format>, output: Option<&Path>) -> OutputFormat {
    match (format, output) {
        (Some(format), _) => format.into(),
        (None, Some(path)) => OutputFormat::from_path(path),
        (None, None) => OutputFormat::default(),
    }
}

fn print_operations(report: &ConversionReport) {
    for (url, methods) in &report.document.paths {
        for (method, operation) in methods {
            eprintln!(
                "{} {} {} ({} parameters, {} responses)",
                "✓".green(),
                method.as_str().to_uppercase(),
                url.yellow(),
                operation.parameters.len(),
                operation.responses.len()
            );
        }
    }
}

fn print_failures(report: &ConversionReport) {
    for failure in &report.failures {
        eprintln!(
            "{} Skipping {}: {}",
            "⚠".yellow(),
            failure.source,
            failure.error
        );
    }
}

fn print_outline(tree: &NodeTree, verbose: bool) {
    for node in &tree.nodes {
        match node {
            Node::Heading { level, text } => {
                let indent = "  ".repeat(usize::from(level.saturating_sub(1)));
                println!("  {}{} {}", indent, "#".repeat(usize::from(*level)), text);
            }
            Node::Paragraph { text } => {
                if verbose {
                    println!("      {}", text.dimmed());
                }
            }
            Node::Table(table) => {
                println!(
                    "      [table: {} | {} rows]",
                    table.headers.join(", "),
                    table.rows.len()
                );
            }
        }
    }
}
