//! trellis CLI - model validation, semantic review, and test generation.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use trellis::graph::build_graph;
use trellis::output::{format_report, render_file_spec, ReportFormat};
use trellis::schema::{parse_model, SchemaError};
use trellis::semantic::{SemanticReviewer, DEFAULT_MODEL};
use trellis::synth::generate_tests_from_file;
use trellis::validators::{run_validators, validate_model_file, Report};

/// Graph-based analyzer and test synthesizer for declarative system models.
///
/// Exit codes:
///   0 - success (no errors found)
///   1 - model defects found
///   2 - file, schema, or API error
#[derive(Parser)]
#[command(
    name = "trellis",
    version,
    about = "Graph-based analyzer and test synthesizer for declarative system models"
)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a model file's structure
    Validate {
        /// Path to a YAML model file
        model_file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Run structural validation plus LLM-backed semantic review
    Analyze {
        /// Path to a YAML model file
        model_file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Anthropic API key (defaults to the ANTHROPIC_API_KEY env var)
        #[arg(long)]
        api_key: Option<String>,

        /// Model id used for the review
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Skip the structural validators and report semantic findings only
        #[arg(long)]
        no_structural: bool,
    },

    /// Generate Rust test stubs from a model
    #[command(name = "generate-tests")]
    GenerateTests {
        /// Path to a YAML model file
        model_file: PathBuf,

        /// Output directory for generated files
        #[arg(long, default_value = "./tests/generated")]
        output_dir: PathBuf,

        /// Print stubs to stdout or write them to --output-dir
        #[arg(long, value_enum, default_value = "text")]
        format: StubOutput,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StubOutput {
    /// Print all generated stubs to stdout
    Text,
    /// Write one file per entity into the output directory
    Files,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate {
            model_file,
            format,
            strict,
        } => cmd_validate(&model_file, format, strict),
        Commands::Analyze {
            model_file,
            format,
            api_key,
            model,
            no_structural,
        } => cmd_analyze(&model_file, format, api_key, model, no_structural),
        Commands::GenerateTests {
            model_file,
            output_dir,
            format,
        } => cmd_generate_tests(&model_file, &output_dir, format),
    }
}

fn report_schema_error(err: &SchemaError) {
    match err {
        SchemaError::Validation(inner) => eprintln!("Schema validation error: {inner}"),
        other => eprintln!("Error loading file: {other}"),
    }
}

fn cmd_validate(model_file: &PathBuf, format: OutputFormat, strict: bool) -> ExitCode {
    let report = match validate_model_file(model_file) {
        Ok(report) => report,
        Err(err) => {
            report_schema_error(&err);
            return ExitCode::from(2);
        }
    };

    println!("{}", format_report(&report, format.into()));

    if report.has_errors() || (strict && report.has_warnings()) {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn cmd_analyze(
    model_file: &PathBuf,
    format: OutputFormat,
    api_key: Option<String>,
    model_name: String,
    no_structural: bool,
) -> ExitCode {
    let model = match parse_model(model_file) {
        Ok(model) => model,
        Err(err) => {
            report_schema_error(&err);
            return ExitCode::from(2);
        }
    };
    let graph = build_graph(&model);

    let mut report = if no_structural {
        Report::new()
    } else {
        run_validators(&model, &graph)
    };

    let reviewer = match SemanticReviewer::new(api_key, Some(model_name)) {
        Ok(reviewer) => reviewer,
        Err(err) => {
            eprintln!("API key error: {err}");
            return ExitCode::from(2);
        }
    };
    match reviewer.review(&model) {
        Ok(semantic_report) => report.merge(semantic_report),
        Err(err) => {
            eprintln!("API error: {err}");
            return ExitCode::from(2);
        }
    }

    println!("{}", format_report(&report, format.into()));

    if report.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn cmd_generate_tests(
    model_file: &PathBuf,
    output_dir: &PathBuf,
    format: StubOutput,
) -> ExitCode {
    let suite = match generate_tests_from_file(model_file) {
        Ok(suite) => suite,
        Err(err) => {
            report_schema_error(&err);
            return ExitCode::from(2);
        }
    };

    if suite.files.is_empty() {
        println!("No tests to generate (model has no state machines or invariants)");
        return ExitCode::SUCCESS;
    }

    match format {
        StubOutput::Text => {
            for file in &suite.files {
                println!("// {}", "=".repeat(70));
                println!("// {}", file.filename);
                println!("// {}", "=".repeat(70));
                println!();
                println!("{}", render_file_spec(file));
            }
        }
        StubOutput::Files => {
            if let Err(err) = fs::create_dir_all(output_dir) {
                eprintln!("Cannot create {}: {err}", output_dir.display());
                return ExitCode::from(2);
            }
            for file in &suite.files {
                let path = output_dir.join(&file.filename);
                if let Err(err) = fs::write(&path, render_file_spec(file)) {
                    eprintln!("Cannot write {}: {err}", path.display());
                    return ExitCode::from(2);
                }
                println!("Generated: {}", path.display());
            }
        }
    }

    println!(
        "\nGenerated {} tests in {} files",
        suite.total_cases(),
        suite.files.len()
    );
    ExitCode::SUCCESS
}
