use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable summary
    Terminal,
    /// Machine-readable scorecards
    Json,
}

impl From<OutputFormat> for crate::io::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => crate::io::OutputFormat::Terminal,
            OutputFormat::Json => crate::io::OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "healthmap")]
#[command(about = "Team delivery health scoring and confidence aggregation", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score team assessments against the configured outcomes
    Score {
        /// Assessment JSON file: one team object or an array of teams
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to .healthmap.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// History file with previously recorded snapshots
        #[arg(long)]
        history: Option<PathBuf>,

        /// Record these scores into the history file after scoring
        #[arg(long, requires = "history")]
        record: bool,

        /// Period label to record under (e.g. "2026-Q3")
        #[arg(long)]
        period: Option<String>,
    },

    /// Print only the executive summary for each team
    Summary {
        /// Assessment JSON file: one team object or an array of teams
        input: PathBuf,

        /// Configuration file (defaults to .healthmap.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// History file with previously recorded snapshots
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Parse and validate a configuration file
    ValidateConfig {
        /// Configuration file to check
        config: PathBuf,
    },
}
