//! OpenAPI Dereferencer CLI
//!
//! Command-line interface for dereferencing and normalizing OpenAPI
//! documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use openapi_deref::{
    check, dereference, flatten_all_of, load_document, select_first_any_of, select_first_one_of,
    DerefOptions, DocumentFormat, Severity,
};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "openapi-deref")]
#[command(about = "Dereference $ref pointers and normalize schema composition")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inline internal $ref pointers, optionally scoped to a subtree
    Deref {
        /// Document to dereference (JSON or YAML)
        spec: PathBuf,

        /// Path expression selecting the subtree to dereference
        #[arg(long, default_value = "$")]
        start_at: String,

        /// Path expression for a subtree to leave untouched (repeatable)
        #[arg(long = "ignore")]
        ignore: Vec<String>,

        /// Maximum nesting depth before aborting
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the input's format)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Normalize composition keywords (allOf merge, oneOf/anyOf first pick)
    Normalize {
        /// Document to normalize (JSON or YAML)
        spec: PathBuf,

        /// Merge allOf members into a single object
        #[arg(long)]
        all_of: bool,

        /// Replace each oneOf node with its first alternative
        #[arg(long)]
        one_of: bool,

        /// Replace each anyOf node with its first alternative
        #[arg(long)]
        any_of: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the input's format)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Report broken refs and empty compositions without transforming
    Check {
        /// Document to check (JSON or YAML)
        spec: PathBuf,

        /// Output diagnostics as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

impl From<DocumentFormat> for OutputFormat {
    fn from(format: DocumentFormat) -> Self {
        match format {
            DocumentFormat::Json => OutputFormat::Json,
            DocumentFormat::Yaml => OutputFormat::Yaml,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Deref {
            spec,
            start_at,
            ignore,
            max_depth,
            output,
            format,
            pretty,
        } => run_deref(&spec, start_at, ignore, max_depth, output, format, pretty),

        Commands::Normalize {
            spec,
            all_of,
            one_of,
            any_of,
            output,
            format,
            pretty,
        } => run_normalize(&spec, all_of, one_of, any_of, output, format, pretty),

        Commands::Check { spec, json } => run_check(&spec, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_deref(
    spec: &Path,
    start_at: String,
    ignore: Vec<String>,
    max_depth: Option<usize>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    pretty: bool,
) -> Result<(), u8> {
    let document = load_input(spec)?;

    let mut options = DerefOptions::new().start_at(start_at).ignore(ignore);
    if let Some(depth) = max_depth {
        options = options.max_depth(depth);
    }

    let resolved = dereference(&document, &options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let format = format.unwrap_or_else(|| DocumentFormat::from_path(spec).into());
    write_output(&resolved, output, format, pretty)
}

fn run_normalize(
    spec: &Path,
    all_of: bool,
    one_of: bool,
    any_of: bool,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    pretty: bool,
) -> Result<(), u8> {
    if !all_of && !one_of && !any_of {
        eprintln!("Error: nothing to do: pass at least one of --all-of, --one-of, --any-of");
        return Err(2);
    }

    let mut document = load_input(spec)?;

    let apply = |doc: &Value, op: fn(&Value) -> Result<Value, openapi_deref::DerefError>| {
        op(doc).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })
    };

    if all_of {
        document = apply(&document, flatten_all_of)?;
    }
    if one_of {
        document = apply(&document, select_first_one_of)?;
    }
    if any_of {
        document = apply(&document, select_first_any_of)?;
    }

    let format = format.unwrap_or_else(|| DocumentFormat::from_path(spec).into());
    write_output(&document, output, format, pretty)
}

fn run_check(spec: &Path, json: bool) -> Result<(), u8> {
    let document = load_input(spec)?;
    let result = check(&document);

    if json {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        for diag in &result.diagnostics {
            let label = match diag.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            eprintln!("{}[{}]: {} - {}", label, diag.code, diag.path, diag.message);
        }
        if result.is_ok() {
            println!("OK: {} warning(s)", result.warnings);
        } else {
            eprintln!(
                "{} error(s), {} warning(s)",
                result.errors, result.warnings
            );
        }
    }

    if result.is_ok() {
        Ok(())
    } else {
        Err(1)
    }
}

fn load_input(spec: &Path) -> Result<Value, u8> {
    load_document(spec).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn write_output(
    document: &Value,
    output: Option<PathBuf>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), u8> {
    let rendered = match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(document)
            .map_err(|e| e.to_string()),
        OutputFormat::Json => serde_json::to_string(document).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(document).map_err(|e| e.to_string()),
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &rendered).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", rendered);
        }
    }

    Ok(())
}
