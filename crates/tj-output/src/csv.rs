//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `episodes.csv`
//! - `team_summaries.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::stats::Stat;
use crate::writer::OutputWriter;
use crate::{EpisodeRow, OutputResult, TeamSummaryRow};

pub const EPISODE_HEADER: [&str; 8] =
    ["team", "episode", "steps", "collisions", "arrived", "crashed", "mean_wait", "reward"];

pub const TEAM_SUMMARY_HEADER: [&str; 12] = [
    "team",
    "episodes",
    "confidence",
    "steps_mean",
    "steps_std",
    "steps_half_width",
    "collisions_mean",
    "collisions_std",
    "collisions_half_width",
    "wait_mean",
    "wait_std",
    "wait_half_width",
];

/// Writes experiment results to two CSV files.
pub struct CsvWriter {
    episodes:  Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut episodes = Writer::from_path(dir.join("episodes.csv"))?;
        episodes.write_record(EPISODE_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("team_summaries.csv"))?;
        summaries.write_record(TEAM_SUMMARY_HEADER)?;

        Ok(Self {
            episodes,
            summaries,
            finished: false,
        })
    }
}

fn stat_fields(stat: &Stat) -> [String; 3] {
    [stat.mean.to_string(), stat.std.to_string(), stat.half_width.to_string()]
}

impl OutputWriter for CsvWriter {
    fn write_episode(&mut self, row: &EpisodeRow) -> OutputResult<()> {
        self.episodes.write_record(&[
            row.team.clone(),
            row.episode.to_string(),
            row.steps.to_string(),
            row.collisions.to_string(),
            row.arrived.to_string(),
            row.crashed.to_string(),
            row.mean_wait.to_string(),
            row.reward.to_string(),
        ])?;
        Ok(())
    }

    fn write_team_summary(&mut self, row: &TeamSummaryRow) -> OutputResult<()> {
        let mut record = vec![row.team.clone(), row.episodes.to_string(), row.confidence.to_string()];
        for stat in [&row.steps, &row.collisions, &row.mean_wait] {
            record.extend(stat_fields(stat));
        }
        self.summaries.write_record(&record)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.episodes.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
