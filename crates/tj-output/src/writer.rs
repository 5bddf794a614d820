//! The `OutputWriter` trait implemented by all backend writers.

use crate::{EpisodeRow, OutputResult, TeamSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors surface to the observer, which keeps the first one; retrieve it
/// with [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one episode row.
    fn write_episode(&mut self, row: &EpisodeRow) -> OutputResult<()>;

    /// Write one team's aggregate row.
    fn write_team_summary(&mut self, row: &TeamSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
