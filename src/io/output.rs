//! Scorecard writers for the CLI: machine-readable JSON and a colored
//! terminal summary.

use crate::builders::TeamScorecard;
use crate::confidence::ConfidenceLevel;
use crate::maturity::MaturityLevel;
use colored::*;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_scorecards(&mut self, scorecards: &[TeamScorecard]) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_scorecards(&mut self, scorecards: &[TeamScorecard]) -> anyhow::Result<()> {
        let json = match scorecards {
            [single] => serde_json::to_string_pretty(single)?,
            many => serde_json::to_string_pretty(many)?,
        };
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_scorecard(&mut self, scorecard: &TeamScorecard) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} {}",
            "Team:".bold(),
            scorecard.entity_id.bold()
        )?;
        writeln!(
            self.writer,
            "  overall score {:.1}{}",
            scorecard.overall_score,
            match scorecard.summary.team_rank {
                Some(rank) => format!("  ({} of {} similar teams)", rank.rank, rank.cohort_size),
                None => String::new(),
            }
        )?;

        writeln!(self.writer, "  {}", "dimensions".underline())?;
        for report in &scorecard.dimensions {
            let adjusted = &report.risk_adjusted;
            let level = colored_level(adjusted.maturity_level);
            let marker = if adjusted.was_significantly_adjusted {
                " *"
            } else {
                ""
            };
            writeln!(
                self.writer,
                "    {:<24} {:>5.1}  {}{}",
                report.result.dimension_name,
                adjusted.adjusted_percentile,
                level,
                marker
            )?;
        }

        if !scorecard.outcomes.is_empty() {
            writeln!(self.writer, "  {}", "outcomes".underline())?;
            for outcome in &scorecard.outcomes {
                let gaps = if outcome.critical_gaps.is_empty() {
                    String::new()
                } else {
                    format!("  critical gaps: {}", outcome.critical_gaps.join(", "))
                        .red()
                        .to_string()
                };
                writeln!(
                    self.writer,
                    "    {:<24} {:>5.1} ±{:.1}  {}{}",
                    outcome.outcome_name,
                    outcome.final_score,
                    outcome.confidence_interval.high - outcome.final_score,
                    colored_confidence(outcome.confidence_level),
                    gaps
                )?;
            }
        }

        let summary = &scorecard.summary;
        if !summary.strengths.is_empty() {
            let names: Vec<_> = summary
                .strengths
                .iter()
                .map(|h| h.dimension_name.as_str())
                .collect();
            writeln!(self.writer, "  strengths: {}", names.join(", ").green())?;
        }
        if !summary.risks.is_empty() {
            let names: Vec<_> = summary
                .risks
                .iter()
                .map(|h| h.dimension_name.as_str())
                .collect();
            writeln!(self.writer, "  risks: {}", names.join(", ").red())?;
        }
        writeln!(self.writer, "  trend delta: {:+.1}", summary.trend_delta)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_scorecards(&mut self, scorecards: &[TeamScorecard]) -> anyhow::Result<()> {
        for (i, scorecard) in scorecards.iter().enumerate() {
            if i > 0 {
                writeln!(self.writer)?;
            }
            self.write_scorecard(scorecard)?;
        }
        Ok(())
    }
}

fn colored_level(level: MaturityLevel) -> ColoredString {
    let name = level.name();
    match level {
        MaturityLevel::NeedsAttention => name.red().bold(),
        MaturityLevel::BelowAverage => name.yellow(),
        MaturityLevel::Average => name.normal(),
        MaturityLevel::Good => name.green(),
        MaturityLevel::Excellent => name.green().bold(),
    }
}

fn colored_confidence(level: ConfidenceLevel) -> ColoredString {
    match level {
        ConfidenceLevel::Low => "low confidence".red(),
        ConfidenceLevel::Moderate => "moderate confidence".yellow(),
        ConfidenceLevel::High => "high confidence".green(),
        ConfidenceLevel::VeryHigh => "very high confidence".green().bold(),
    }
}

/// Build a writer for the requested format and destination. `None` writes
/// to stdout.
pub fn create_writer(
    output: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
    })
}
