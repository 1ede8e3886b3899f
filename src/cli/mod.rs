//! CLI interface for poly-risk
//!
//! Provides subcommands for:
//! - `extract`: Show the search terms for a question
//! - `score`: Score and rank a batch of markets
//! - `sources`: List curated or discovered sources
//! - `config`: Show the effective configuration

mod extract;
mod score;
mod sources;

pub use extract::ExtractArgs;
pub use score::{load_inputs, render_table, OutputFormat, ScoreArgs};
pub use sources::SourcesArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "poly-risk")]
#[command(about = "Suspicious-activity risk scoring for Polymarket markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the search terms derived from a market question
    Extract(ExtractArgs),
    /// Score a JSON batch of markets and print them riskiest first
    Score(ScoreArgs),
    /// List mention sources
    Sources(SourcesArgs),
    /// Show the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_command() {
        let cli = Cli::try_parse_from([
            "poly-risk",
            "--config",
            "risk.toml",
            "score",
            "--input",
            "markets.json",
            "--derive-baseline",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config, "risk.toml");
        match cli.command {
            Commands::Score(args) => {
                assert!(args.derive_baseline);
                assert!(!args.count_trades);
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_extract_command() {
        let cli = Cli::try_parse_from(["poly-risk", "extract", "Arsenal vs Chelsea"]).unwrap();
        assert_eq!(cli.config, "config.toml");
        assert!(matches!(cli.command, Commands::Extract(ref a) if a.question == "Arsenal vs Chelsea"));
    }
}
