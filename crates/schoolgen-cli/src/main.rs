mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use schoolgen_generate::{GenerateOptions, GenerationEngine, GenerationError, SchemaVariant};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "schoolgen", version, about = "Synthetic school dataset generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate every table of a schema variant as CSV.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Output schema: `app` (flat tables) or `bi` (dimension/fact tables).
    #[arg(long, default_value = "app")]
    variant: SchemaVariant,
    /// Directory receiving the CSV files and the run report.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Emit log lines as JSON.
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        variant,
        out_dir,
        log_json,
    } = args;

    logging::init_logging(log_json)?;

    let engine = GenerationEngine::new(GenerateOptions { out_dir, variant });
    let result = engine.run()?;

    tracing::info!(
        event = "run_finished",
        status = "success",
        out_dir = %result.out_dir.display(),
        tables = result.report.tables.len(),
        rows_total = result.report.rows_total,
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_defaults_to_the_app_schema() {
        let cli = Cli::try_parse_from(["schoolgen", "generate"]).expect("parse");
        let Command::Generate(args) = cli.command;
        assert_eq!(args.variant, SchemaVariant::App);
        assert_eq!(args.out_dir, PathBuf::from("."));
        assert!(!args.log_json);
    }

    #[test]
    fn generate_accepts_variant_and_out_dir() {
        let cli = Cli::try_parse_from([
            "schoolgen",
            "generate",
            "--variant",
            "bi",
            "--out-dir",
            "data",
            "--log-json",
        ])
        .expect("parse");
        let Command::Generate(args) = cli.command;
        assert_eq!(args.variant, SchemaVariant::Bi);
        assert_eq!(args.out_dir, PathBuf::from("data"));
        assert!(args.log_json);
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(Cli::try_parse_from(["schoolgen", "generate", "--variant", "olap"]).is_err());
    }
}
