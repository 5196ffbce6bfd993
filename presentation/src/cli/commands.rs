//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every round with gate decisions, messages and versions
    Full,
    /// Verdict, score and final proposal
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for council_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => council_domain::OutputFormat::Full,
            OutputFormat::Summary => council_domain::OutputFormat::Summary,
            OutputFormat::Json => council_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for policy-council
#[derive(Parser, Debug)]
#[command(name = "policy-council")]
#[command(
    author,
    version,
    about = "Policy council - experts revise a proposal until weighted consensus"
)]
#[command(long_about = r#"
Policy council runs a multi-round deliberation over a policy proposal.

Each round:
1. Broadcast: the current proposal goes to every expert
2. Gate: each expert decides whether it has something to add
3. Contribute: speaking experts send feedback to the coordinator
4. Revise: the coordinator rewrites the proposal
5. Score: the whole discussion is scored for weighted consensus

The run stops once the score, round and revision gates all pass, or when
the round ceiling is hit.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./council.toml      Project-level config
3. ~/.config/policy-council/config.toml   Global config
4. COUNCIL_* environment variables (e.g. COUNCIL_RUN__SEED=7)

Example:
  policy-council "Open low-altitude corridors for urban drone delivery"
  policy-council --rounds 6 --seed 42 --transcript run.log "Subsidise vertiport construction"
  policy-council -o json --sequential "Cap night-time drone flights at 40 dB"
"#)]
pub struct Cli {
    /// The proposal to deliberate
    #[arg(required_unless_present = "show_config")]
    pub proposal: Option<String>,

    /// Round ceiling (raised to 3 if lower)
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Budget recorded with the outcome
    #[arg(long, value_name = "AMOUNT")]
    pub budget: Option<f64>,

    /// Minimum rounds before consensus can be declared
    #[arg(long, value_name = "N")]
    pub min_rounds: Option<u32>,

    /// Seed for the speaker cooldown draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run gate confirmations and contributions one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Write the line transcript to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Write one JSON line per completed round to this file
    #[arg(long, value_name = "PATH")]
    pub rounds_log: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "policy-council",
            "--rounds",
            "6",
            "--seed",
            "42",
            "--sequential",
            "-o",
            "json",
            "-vv",
            "Open drone corridors",
        ])
        .unwrap();
        assert_eq!(cli.proposal.as_deref(), Some("Open drone corridors"));
        assert_eq!(cli.rounds, Some(6));
        assert_eq!(cli.seed, Some(42));
        assert!(cli.sequential);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_proposal_required_unless_show_config() {
        assert!(Cli::try_parse_from(["policy-council"]).is_err());
        let cli = Cli::try_parse_from(["policy-council", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.proposal.is_none());
    }
}
