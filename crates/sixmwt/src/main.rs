use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod inputs;

use commands::extract::ExtractArgs;
use commands::inspect::InspectArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Six-minute walk test extraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract subject records from walk-test exports into one flat table
    Extract(ExtractArgs),
    /// Show the scheme, boundaries and summaries found in a single export
    Inspect(InspectArgs),
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract(args) => commands::extract::run(args),
        Command::Inspect(args) => commands::inspect::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extract_accepts_layout_and_format() {
        let cli = Cli::try_parse_from([
            "sixmwt",
            "extract",
            "a.csv",
            "b.xml",
            "--format",
            "json",
            "--layout",
            "by-bucket",
        ])
        .expect("valid arguments");

        let Command::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.inputs, vec!["a.csv", "b.xml"]);
    }

    #[test]
    fn extract_accepts_xlsx_output() {
        let cli = Cli::try_parse_from([
            "sixmwt", "extract", "data/", "--format", "xlsx", "-o", "walks.xlsx",
        ])
        .expect("valid arguments");

        let Command::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.format, commands::extract::OutputFormat::Xlsx);
    }

    #[test]
    fn extract_requires_inputs() {
        assert!(Cli::try_parse_from(["sixmwt", "extract"]).is_err());
    }
}
