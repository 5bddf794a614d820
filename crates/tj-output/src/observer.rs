//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tj_sim::{EpisodeSummary, SimObserver};
use tracing::debug;

use crate::row::{EpisodeRow, TeamSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes one row per episode and one aggregate row
/// per team to any [`OutputWriter`] backend.
///
/// One observer serves a whole experiment: call
/// [`begin_team`][Self::begin_team] before each team's `sim.run()`.  The
/// aggregate row is written when the run ends.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    confidence: f64,
    team:       String,
    rows:       Vec<EpisodeRow>,
    summaries:  Vec<TeamSummaryRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`; team intervals use
    /// `confidence` (0.90, 0.95 or 0.99).
    pub fn new(writer: W, confidence: f64) -> Self {
        Self {
            writer,
            confidence,
            team:       String::new(),
            rows:       Vec::new(),
            summaries:  Vec::new(),
            last_error: None,
        }
    }

    /// Label subsequent episodes with `team` and start a fresh aggregate.
    pub fn begin_team(&mut self, team: impl Into<String>) {
        self.team = team.into();
        self.rows.clear();
    }

    /// Aggregate rows written so far, one per finished team.
    pub fn summaries(&self) -> &[TeamSummaryRow] {
        &self.summaries
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  Returns the stored error first, if any.
    pub fn finish(&mut self) -> OutputResult<()> {
        let result = self.writer.finish();
        match self.last_error.take() {
            Some(e) => Err(e),
            None => result,
        }
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        let row = EpisodeRow::new(&self.team, summary);
        let result = self.writer.write_episode(&row);
        self.store_err(result);
        self.rows.push(row);
    }

    fn on_run_end(&mut self, episodes: u32) {
        debug!(team = %self.team, episodes, "writing team summary");
        let result = TeamSummaryRow::from_episodes(&self.team, &self.rows, self.confidence)
            .and_then(|row| {
                let written = self.writer.write_team_summary(&row);
                self.summaries.push(row);
                written
            });
        self.store_err(result);
    }
}
