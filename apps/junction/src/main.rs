//! junction — compare driver teams at a four-way junction.
//!
//! Runs every requested team for the same number of seeded episodes and
//! reports steps, collisions and mean junction wait per episode with a
//! confidence interval.  Per-episode rows and team aggregates are written to
//! the output directory.
//!
//! ```text
//! junction --teams greedy,convention,communicating --episodes 50 --out results
//! junction --config junction.toml --seed 7
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use tj_core::SimConfig;
use tj_output::{CsvWriter, OutputWriter, SimOutputObserver, Stat, TeamSummaryRow};
use tj_sim::{SimBuilder, Team};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    /// Requires the `sqlite` feature
    Sqlite,
}

#[derive(Parser, Debug)]
#[command(name = "junction")]
#[command(about = "Compare driver teams at a four-way junction")]
struct Cli {
    /// TOML file holding a run configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Teams to evaluate, in order
    #[arg(long, value_delimiter = ',', default_value = "random,greedy,convention,communicating")]
    teams: Vec<Team>,

    /// Episodes per team
    #[arg(long)]
    episodes: Option<u32>,

    /// Vehicle-agents per episode
    #[arg(long)]
    agents: Option<usize>,

    /// Side length of the square grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// Side length of each agent's observation window (odd)
    #[arg(long)]
    window_size: Option<usize>,

    /// Step budget per episode
    #[arg(long)]
    max_steps: Option<u64>,

    /// Per-tick arrival probability of an unspawned agent
    #[arg(long)]
    arrive_prob: Option<f64>,

    /// Master RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads for the decision phase
    #[arg(long)]
    threads: Option<usize>,

    /// Confidence level for the reported intervals (0.90, 0.95 or 0.99)
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,

    /// Output directory
    #[arg(long, default_value = "output")]
    out: PathBuf,

    /// Output backend
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,
}

impl Cli {
    /// The file configuration (or defaults) with every given flag applied.
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SimConfig::default(),
        };
        if let Some(v) = self.episodes    { config.episodes = v; }
        if let Some(v) = self.agents      { config.n_agents = v; }
        if let Some(v) = self.grid_size   { config.grid_size = v; }
        if let Some(v) = self.window_size { config.window_size = v; }
        if let Some(v) = self.max_steps   { config.max_steps = v; }
        if let Some(v) = self.arrive_prob { config.arrive_prob = v; }
        if let Some(v) = self.seed        { config.seed = v; }
        if self.threads.is_some() {
            config.num_threads = self.threads;
        }
        config.validate()?;
        // Reject an unsupported level before any episode runs.
        tj_output::stats::z_value(self.confidence)?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<SimConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// `RUST_LOG` overrides the default `info` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

// ── Experiment ────────────────────────────────────────────────────────────────

fn run_teams<W: OutputWriter>(
    writer: W,
    config: &SimConfig,
    teams:  &[Team],
    confidence: f64,
) -> Result<Vec<TeamSummaryRow>> {
    let mut observer = SimOutputObserver::new(writer, confidence);

    for &team in teams {
        let started = Instant::now();
        let mut sim = SimBuilder::new(config.clone())
            .team(team)
            .build()
            .with_context(|| format!("building team {team}"))?;

        observer.begin_team(team.as_str());
        sim.run(&mut observer)?;
        if let Some(e) = observer.take_error() {
            return Err(e).with_context(|| format!("writing results for team {team}"));
        }
        info!(%team, elapsed_ms = started.elapsed().as_millis() as u64, "team finished");
    }

    observer.finish()?;
    Ok(observer.summaries().to_vec())
}

fn interval(stat: &Stat) -> String {
    format!("{:.2} ± {:.2}", stat.mean, stat.half_width)
}

fn print_table(rows: &[TeamSummaryRow], confidence: f64) {
    println!();
    println!("Per-episode means with {:.0}% confidence half-widths", confidence * 100.0);
    println!("{:<14} {:>8}  {:>16}  {:>16}  {:>16}", "team", "episodes", "steps", "collisions", "wait");
    for row in rows {
        println!(
            "{:<14} {:>8}  {:>16}  {:>16}  {:>16}",
            row.team,
            row.episodes,
            interval(&row.steps),
            interval(&row.collisions),
            interval(&row.mean_wait),
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = cli.sim_config()?;

    info!(
        teams = cli.teams.len(),
        episodes = config.episodes,
        agents = config.n_agents,
        grid = config.grid_size,
        seed = config.seed,
        "starting experiment"
    );

    let summaries = match cli.format {
        Format::Csv => run_teams(CsvWriter::new(&cli.out)?, &config, &cli.teams, cli.confidence)?,
        #[cfg(feature = "sqlite")]
        Format::Sqlite => {
            run_teams(tj_output::SqliteWriter::new(&cli.out)?, &config, &cli.teams, cli.confidence)?
        }
        #[cfg(not(feature = "sqlite"))]
        Format::Sqlite => bail!("this build has no SQLite backend; rebuild with `--features sqlite`"),
    };

    print_table(&summaries, cli.confidence);
    info!(out = %cli.out.display(), "results written");
    Ok(())
}
