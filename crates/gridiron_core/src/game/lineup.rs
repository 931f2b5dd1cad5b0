use crate::data::TeamRoster;
use crate::error::{Result, SimError};
use crate::types::{EntityId, TeamId};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// A roster with its carry and target share samplers prepared.
#[derive(Debug, Clone)]
pub struct Lineup {
    roster: TeamRoster,
    carries: WeightedIndex<f64>,
    targets: WeightedIndex<f64>,
}

impl Lineup {
    /// Fails when either share vector has no positive weight or holds a
    /// negative or non-finite weight.
    pub fn new(roster: TeamRoster) -> Result<Self> {
        let invalid = |what: &str, e: rand::distributions::WeightedError| SimError::InvalidRoster {
            team: roster.team.clone(),
            reason: format!("{what}: {e}"),
        };
        let carries =
            WeightedIndex::new(roster.carry_shares).map_err(|e| invalid("carry shares", e))?;
        let targets =
            WeightedIndex::new(roster.target_shares).map_err(|e| invalid("target shares", e))?;
        Ok(Self { roster, carries, targets })
    }

    pub fn roster(&self) -> &TeamRoster {
        &self.roster
    }

    pub fn team(&self) -> &TeamId {
        &self.roster.team
    }

    pub fn pick_carrier<R: Rng + ?Sized>(&self, rng: &mut R) -> &EntityId {
        self.roster.carriers()[self.carries.sample(rng)]
    }

    pub fn pick_target<R: Rng + ?Sized>(&self, rng: &mut R) -> &EntityId {
        self.roster.targets()[self.targets.sample(rng)]
    }
}
