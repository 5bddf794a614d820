//! Plain data row types written by output backends.

use tj_sim::EpisodeSummary;

use crate::stats::Stat;
use crate::OutputResult;

/// One finished episode of one team.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRow {
    pub team:       String,
    pub episode:    u32,
    pub steps:      u64,
    pub collisions: u32,
    pub arrived:    u32,
    pub crashed:    u32,
    /// Mean junction wait over the episode's traversals.
    pub mean_wait:  f64,
    pub reward:     f64,
}

impl EpisodeRow {
    pub fn new(team: &str, summary: &EpisodeSummary) -> Self {
        Self {
            team:       team.to_owned(),
            episode:    summary.episode.0,
            steps:      summary.steps,
            collisions: summary.collisions,
            arrived:    summary.arrived as u32,
            crashed:    summary.crashed as u32,
            mean_wait:  summary.mean_wait(),
            reward:     summary.reward,
        }
    }
}

/// Per-team aggregates over all of its episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSummaryRow {
    pub team:       String,
    pub episodes:   u32,
    pub confidence: f64,
    pub steps:      Stat,
    pub collisions: Stat,
    pub mean_wait:  Stat,
}

impl TeamSummaryRow {
    /// Aggregate `rows`, which all belong to `team`.
    pub fn from_episodes(team: &str, rows: &[EpisodeRow], confidence: f64) -> OutputResult<Self> {
        let column = |f: fn(&EpisodeRow) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
        Ok(Self {
            team:       team.to_owned(),
            episodes:   rows.len() as u32,
            confidence,
            steps:      Stat::of(&column(|r| r.steps as f64), confidence)?,
            collisions: Stat::of(&column(|r| r.collisions as f64), confidence)?,
            mean_wait:  Stat::of(&column(|r| r.mean_wait), confidence)?,
        })
    }
}
