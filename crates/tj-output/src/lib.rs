//! `tj-output` — result statistics and writers for the traffic-junction
//! simulator.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend     | Files created                          |
//! |-----------|-------------|----------------------------------------|
//! | *(none)*  | CSV         | `episodes.csv`, `team_summaries.csv`   |
//! | `sqlite`  | SQLite      | `results.db`                           |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `tj_sim::SimObserver`.  Team aggregates (mean, population
//! standard deviation and a z-table confidence interval per metric) come
//! from [`stats`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use tj_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, 0.95);
//! obs.begin_team("communicating");
//! sim.run(&mut obs)?;
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod stats;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{EpisodeRow, TeamSummaryRow};
pub use stats::Stat;
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
