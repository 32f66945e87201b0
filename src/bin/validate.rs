use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use agent_sandbox::validation::{validate_workspace, ValidationFailure, ValidationOutcome};
use agent_sandbox::{logging, Config, DocumentParser, ParserMode};

#[derive(Parser)]
#[command(name = "validate-config")]
#[command(about = "Validate role and tool documents against their schemas", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, help = "Workspace root holding role/, tool/ and schemas/ (overrides AGENT_SANDBOX_ROOT)")]
    root: Option<PathBuf>,

    #[arg(long, value_enum, help = "Document parser to use (overrides AGENT_SANDBOX_PARSER)")]
    parser: Option<ParserMode>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let mut config = Config::from_env();
    if let Some(root) = &cli.root {
        config.workspace_root = root.clone();
    }
    if let Some(parser) = cli.parser {
        config.parser = parser;
    }

    println!("--- Running Configuration Validator ---");

    let parser = DocumentParser::new(config.parser);
    let report = validate_workspace(&config.workspace_root, &config.schema_dir(), &parser)
        .context("could not load schemas")?;

    for tree in &report.trees {
        println!("\nValidating {}s in {}...", tree.kind.dir_name(), tree.root.display());
        for result in &tree.results {
            match &result.outcome {
                ValidationOutcome::Valid => println!("  ✅ {}", result.path.display()),
                ValidationOutcome::Invalid(failure) => {
                    println!("  ❌ {} - Validation Failed!", result.path.display());
                    match failure {
                        ValidationFailure::Schema(violations) => {
                            for violation in violations {
                                println!("     {violation}");
                            }
                        }
                        other => println!("     {other}"),
                    }
                }
            }
        }
    }

    if report.is_success() {
        println!(
            "\n--- Validation Complete: All {} configuration files are valid! ---",
            report.scanned()
        );
    } else {
        println!(
            "\n--- Validation Complete: Found {} errors in {} files. ---",
            report.invalid(),
            report.scanned()
        );
    }

    Ok(report.is_success())
}
