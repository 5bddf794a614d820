//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use tj_behavior::{ArbitrationConfig, CommunicationChannel, Driver};
use tj_core::SimConfig;
use tj_topology::JunctionTopology;
use tj_world::GridWorld;

use crate::{Sim, SimError, SimResult, Team};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — grid size, agent count, step budget, seed, …
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                        |
/// |---------------------|------------------------------------------------|
/// | `.topology(t)`      | `JunctionTopology::standard(config.grid_size)` |
/// | `.team(t)`          | `Team::Communicating`                          |
/// | `.arbitration(c)`   | `ArbitrationConfig::default()`                 |
/// | `.drivers(v)`       | built from the team                            |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .team(Team::Convention)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:      SimConfig,
    topology:    Option<JunctionTopology>,
    team:        Team,
    arbitration: ArbitrationConfig,
    drivers:     Option<Vec<Box<dyn Driver>>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            topology:    None,
            team:        Team::Communicating,
            arbitration: ArbitrationConfig::default(),
            drivers:     None,
        }
    }

    /// Use a custom (already validated) junction table.
    pub fn topology(mut self, topology: JunctionTopology) -> Self {
        self.topology = Some(topology);
        self
    }

    pub fn team(mut self, team: Team) -> Self {
        self.team = team;
        self
    }

    /// Fixed-priority indices for arbitrating teams.  The team decides the
    /// policy.
    pub fn arbitration(mut self, config: ArbitrationConfig) -> Self {
        self.arbitration = config;
        self
    }

    /// Supply hand-built drivers instead of a team.
    ///
    /// Must be length `n_agents`, with driver `i` reporting `AgentId(i)`.
    pub fn drivers(mut self, drivers: Vec<Box<dyn Driver>>) -> Self {
        self.drivers = Some(drivers);
        self
    }

    /// Validate inputs, build the world and drivers, and return a
    /// ready-to-run [`Sim`].
    ///
    /// # Errors
    ///
    /// An invalid configuration or junction table is refused here, before
    /// any episode runs.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let n = self.config.n_agents;

        let topology = Arc::new(match self.topology {
            Some(t) => t,
            None => JunctionTopology::standard(self.config.grid_size)?,
        });
        let world = GridWorld::new(self.config.clone(), Arc::clone(&topology))?;

        let team = if self.drivers.is_some() { None } else { Some(self.team) };
        let drivers = match self.drivers {
            Some(d) => {
                if d.len() != n {
                    return Err(SimError::AgentCountMismatch { expected: n, got: d.len(), what: "drivers" });
                }
                if let Some((index, driver)) = d.iter().enumerate().find(|(i, d)| d.id().index() != *i) {
                    return Err(SimError::DriverOrder { index, id: driver.id() });
                }
                d
            }
            None => self.team.drivers(n, &topology, self.arbitration, self.config.seed),
        };

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| SimError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Sim {
            config:       self.config,
            team,
            topology,
            world,
            drivers,
            channel:      CommunicationChannel::new(),
            observations: Vec::new(),
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
