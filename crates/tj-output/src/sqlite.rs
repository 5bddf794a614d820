//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `results.db` file in the configured output directory with
//! two tables: `episodes` and `team_summaries`.

use std::fs;
use std::path::Path;

use rusqlite::{Connection, params};

use crate::writer::OutputWriter;
use crate::{EpisodeRow, OutputResult, TeamSummaryRow};

/// Writes experiment results to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `results.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("results.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS episodes (
                 team       TEXT    NOT NULL,
                 episode    INTEGER NOT NULL,
                 steps      INTEGER NOT NULL,
                 collisions INTEGER NOT NULL,
                 arrived    INTEGER NOT NULL,
                 crashed    INTEGER NOT NULL,
                 mean_wait  REAL    NOT NULL,
                 reward     REAL    NOT NULL,
                 PRIMARY KEY (team, episode)
             );
             CREATE TABLE IF NOT EXISTS team_summaries (
                 team                  TEXT PRIMARY KEY,
                 episodes              INTEGER NOT NULL,
                 confidence            REAL    NOT NULL,
                 steps_mean            REAL    NOT NULL,
                 steps_std             REAL    NOT NULL,
                 steps_half_width      REAL    NOT NULL,
                 collisions_mean       REAL    NOT NULL,
                 collisions_std        REAL    NOT NULL,
                 collisions_half_width REAL    NOT NULL,
                 wait_mean             REAL    NOT NULL,
                 wait_std              REAL    NOT NULL,
                 wait_half_width       REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_episode(&mut self, row: &EpisodeRow) -> OutputResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR REPLACE INTO episodes \
             (team, episode, steps, collisions, arrived, crashed, mean_wait, reward) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        stmt.execute(params![
            row.team,
            row.episode,
            row.steps as i64,
            row.collisions,
            row.arrived,
            row.crashed,
            row.mean_wait,
            row.reward,
        ])?;
        Ok(())
    }

    fn write_team_summary(&mut self, row: &TeamSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO team_summaries \
             (team, episodes, confidence, \
              steps_mean, steps_std, steps_half_width, \
              collisions_mean, collisions_std, collisions_half_width, \
              wait_mean, wait_std, wait_half_width) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                row.team,
                row.episodes,
                row.confidence,
                row.steps.mean,
                row.steps.std,
                row.steps.half_width,
                row.collisions.mean,
                row.collisions.std,
                row.collisions.half_width,
                row.mean_wait.mean,
                row.mean_wait.std,
                row.mean_wait.half_width,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
