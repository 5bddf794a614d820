//! Teams — named driver populations compared by the harness.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tj_behavior::{
    ArbitrationConfig, ArbitrationEngine, Driver, GreedyDriver, JunctionAgent, Policy, RandomDriver,
};
use tj_core::AgentId;
use tj_topology::JunctionTopology;

/// A homogeneous population of drivers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Team {
    /// Coin-flip advance/yield.
    Random,
    /// Always advance.
    Greedy,
    /// Static right-of-way only.
    Convention,
    /// Static right-of-way plus wait-time priority.
    Communicating,
}

impl Team {
    pub const ALL: [Team; 4] = [Team::Random, Team::Greedy, Team::Convention, Team::Communicating];

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Random        => "random",
            Team::Greedy        => "greedy",
            Team::Convention    => "convention",
            Team::Communicating => "communicating",
        }
    }

    /// `None` for the baselines that do not arbitrate.
    pub fn policy(self) -> Option<Policy> {
        match self {
            Team::Convention    => Some(Policy::StaticOnly),
            Team::Communicating => Some(Policy::StaticWithCommunication),
            Team::Random | Team::Greedy => None,
        }
    }

    /// One driver per agent, index = `AgentId`.
    ///
    /// Arbitrating teams share one engine built from `arbitration` with the
    /// team's policy.
    pub fn drivers(
        self,
        n_agents:    usize,
        topology:    &Arc<JunctionTopology>,
        arbitration: ArbitrationConfig,
        seed:        u64,
    ) -> Vec<Box<dyn Driver>> {
        let ids = (0..n_agents).map(|i| AgentId(i as u32));
        match self.policy() {
            Some(policy) => {
                let config = ArbitrationConfig { policy, ..arbitration };
                let engine = Arc::new(ArbitrationEngine::new(Arc::clone(topology), config));
                ids.map(|id| Box::new(JunctionAgent::new(id, Arc::clone(&engine))) as Box<dyn Driver>)
                    .collect()
            }
            None if self == Team::Greedy => ids
                .map(|id| Box::new(GreedyDriver::new(id, Arc::clone(topology))) as Box<dyn Driver>)
                .collect(),
            None => ids
                .map(|id| Box::new(RandomDriver::new(id, Arc::clone(topology), seed)) as Box<dyn Driver>)
                .collect(),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Team::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown team `{s}` (expected random, greedy, convention or communicating)"))
    }
}
