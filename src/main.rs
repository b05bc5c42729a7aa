use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Parser;
use healthmap::builders::{record_assessment, score_batch, TeamScorecard};
use healthmap::cli::{Cli, Commands};
use healthmap::config::HealthmapConfig;
use healthmap::history::{InMemoryStore, SnapshotStore};
use healthmap::io::{create_writer, read_assessments, read_history, write_history};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            input,
            format,
            output,
            config,
            history,
            record,
            period,
        } => handle_score(input, format, output, config, history, record, period),
        Commands::Summary {
            input,
            config,
            history,
        } => handle_summary(input, config, history),
        Commands::ValidateConfig { config } => {
            HealthmapConfig::load_from(&config)?;
            println!("{} is valid", config.display());
            Ok(())
        }
    }
}

/// Explicit path, else `.healthmap.toml` in the working directory, else
/// built-in defaults.
fn resolve_config(path: Option<PathBuf>) -> Result<HealthmapConfig> {
    let config = match path {
        Some(path) => HealthmapConfig::load_from(&path)?,
        None => {
            let default = Path::new(".healthmap.toml");
            if default.exists() {
                HealthmapConfig::load_from(default)?
            } else {
                HealthmapConfig::default()
            }
        }
    };
    let _ = healthmap::config::init_config(config.clone());
    Ok(config)
}

fn load_store(history: Option<&PathBuf>) -> Result<InMemoryStore> {
    Ok(match history {
        Some(path) => read_history(path)?,
        None => InMemoryStore::new(),
    })
}

fn score_all(
    config: &HealthmapConfig,
    input: &Path,
    store: &InMemoryStore,
) -> Result<Vec<TeamScorecard>> {
    let inputs = read_assessments(input)?;
    let scorecards = score_batch(config, &inputs, store)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(scorecards)
}

#[allow(clippy::too_many_arguments)]
fn handle_score(
    input: PathBuf,
    format: healthmap::cli::OutputFormat,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    history: Option<PathBuf>,
    record: bool,
    period: Option<String>,
) -> Result<()> {
    let config = resolve_config(config)?;
    let mut store = load_store(history.as_ref())?;
    let scorecards = score_all(&config, &input, &store)?;

    if record {
        let period = period.ok_or_else(|| anyhow!("--record requires --period"))?;
        let history_path = history.ok_or_else(|| anyhow!("--record requires --history"))?;
        let index = next_period_index(&store);
        let now = Utc::now();
        for scorecard in &scorecards {
            record_assessment(&mut store, scorecard, &period, index, now);
        }
        write_history(&history_path, &store)?;
        log::info!(
            "recorded {} scorecards under period {} (index {})",
            scorecards.len(),
            period,
            index
        );
    }

    let mut writer = create_writer(output, format.into())?;
    writer.write_scorecards(&scorecards)
}

fn handle_summary(
    input: PathBuf,
    config: Option<PathBuf>,
    history: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(config)?;
    let store = load_store(history.as_ref())?;

    for scorecard in score_all(&config, &input, &store)? {
        let summary = &scorecard.summary;
        println!("{}: overall {:.1}", scorecard.entity_id, scorecard.overall_score);
        if let Some(rank) = summary.team_rank {
            println!("  rank {} of {} similar teams", rank.rank, rank.cohort_size);
        }
        for highlight in &summary.strengths {
            println!("  strength: {} ({})", highlight.dimension_name, highlight.maturity_level.name());
        }
        for highlight in &summary.risks {
            println!("  risk: {} ({})", highlight.dimension_name, highlight.maturity_level.name());
        }
        println!("  trend delta: {:+.1}", summary.trend_delta);
        if let Some(gain) = &summary.biggest_gain {
            println!("  biggest gain: {} ({:+.1})", gain.dimension_key, gain.change);
        }
        if let Some(decline) = &summary.biggest_decline {
            println!("  biggest decline: {} ({:+.1})", decline.dimension_key, decline.change);
        }
    }
    Ok(())
}

fn next_period_index(store: &InMemoryStore) -> u32 {
    store
        .entity_ids()
        .iter()
        .flat_map(|id| store.get_history(id))
        .map(|snapshot| snapshot.period_index)
        .max()
        .map_or(1, |max| max + 1)
}
