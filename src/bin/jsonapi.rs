//! JSON:API document CLI
//!
//! Command-line interface for checking documents and converting between
//! side-loaded and embedded forms.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jsonapi_codec::{load_document, load_json, validate_document, Document, ValidateError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsonapi")]
#[command(about = "Check and reshape JSON:API documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the structure of a document
    Check {
        /// Document file to check
        file: PathBuf,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Inline included resources into the relationships that reference them
    Embed {
        /// Side-loaded document file
        file: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Move nested resources into the included list
    Sideload {
        /// Embedded document file
        file: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    setup_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { file, json } => run_check(&file, json),
        Commands::Embed {
            file,
            output,
            pretty,
        } => run_reshape(&file, output, pretty, Document::embed),
        Commands::Sideload {
            file,
            output,
            pretty,
        } => run_reshape(&file, output, pretty, Document::sideload),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Log to stderr, filtered by `RUST_LOG` (warnings by default).
fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_check(path: &Path, json_output: bool) -> Result<(), u8> {
    let value = load_json(path).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    let checked = validate_document(&value)
        .and_then(|()| Document::from_value(value).map(|_| ()).map_err(ValidateError::from));

    match checked {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { issues }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": issues
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for issue in issues {
                    eprintln!("  {}", issue);
                }
            }
            Err(1)
        }
        Err(ValidateError::Decode(e)) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

fn run_reshape(
    path: &Path,
    output: Option<PathBuf>,
    pretty: bool,
    reshape: fn(Document) -> Document,
) -> Result<(), u8> {
    let document = load_document(path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let document = reshape(document);
    let json_output = if pretty {
        document.to_json_pretty()
    } else {
        document.to_json()
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({"valid": false, "error": msg}));
    } else {
        eprintln!("Error: {}", msg);
    }
}
