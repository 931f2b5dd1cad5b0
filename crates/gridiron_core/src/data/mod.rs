//! Historical inputs consumed by the engine.
//!
//! The engine reads three providers once, at construction:
//! - [`PlayRecordProvider`]: play-level observations keyed by player/team id
//! - [`RosterProvider`]: each team's positional players and coach
//! - [`PlaycallProvider`]: coach tendencies per down/distance/redzone
//!
//! [`Dataset`] implements all three in memory.

pub mod baselines;
pub mod dataset;
pub mod directory;
pub mod rates;

pub use dataset::Dataset;
pub use directory::PlayerDirectory;
pub use rates::{PassRates, RateTable};

use crate::error::Result;
use crate::playcall::PlaycallRow;
use crate::types::{Category, EntityId, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One category's numeric outcomes, keyed by entity.
#[derive(Debug, Clone)]
pub struct ObservationSet {
    category: Category,
    by_entity: HashMap<EntityId, Vec<f64>>,
    population: Vec<f64>,
}

impl ObservationSet {
    pub fn new(category: Category) -> Self {
        Self { category, by_entity: HashMap::new(), population: Vec::new() }
    }

    /// Builds a set from `(entity, value)` pairs. Non-finite values are dropped.
    pub fn from_pairs<I>(category: Category, pairs: I) -> Self
    where
        I: IntoIterator<Item = (EntityId, f64)>,
    {
        let mut set = Self::new(category);
        for (entity, value) in pairs {
            set.push(entity, value);
        }
        set
    }

    pub fn push(&mut self, entity: EntityId, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.by_entity.entry(entity).or_default().push(value);
        self.population.push(value);
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Observations for one entity; empty when the entity never appears.
    pub fn entity(&self, id: &EntityId) -> &[f64] {
        self.by_entity.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every observation of the category.
    pub fn population(&self) -> &[f64] {
        &self.population
    }

    pub fn entity_count(&self) -> usize {
        self.by_entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RushAttempt {
    pub rusher: EntityId,
    pub defense: TeamId,
    pub yards: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassAttempt {
    pub passer: EntityId,
    pub receiver: EntityId,
    pub defense: TeamId,
    pub complete: bool,
    pub interception: bool,
    pub air_yards: Option<f64>,
    pub yards_after_catch: Option<f64>,
    pub yards_gained: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuntRecord {
    pub punter: EntityId,
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldGoalAttempt {
    pub kicker: EntityId,
    /// Yards from the line of scrimmage to the goal line.
    pub distance: f64,
    pub made: bool,
}

/// Depth chart and team constants for one team.
///
/// Unfilled slots hold the league-average sentinel id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team: TeamId,
    pub coach: EntityId,
    pub qb: EntityId,
    pub rb_1: EntityId,
    pub rb_2: EntityId,
    pub wr_1: EntityId,
    pub wr_2: EntityId,
    pub wr_3: EntityId,
    pub wr_4: EntityId,
    pub te_1: EntityId,
    pub te_2: EntityId,
    pub kicker: EntityId,
    pub punter: EntityId,
    /// Carry weights for QB, RB1, RB2.
    pub carry_shares: [f64; 3],
    /// Target weights in [`TeamRoster::targets`] order.
    pub target_shares: [f64; 8],
    /// Offensive line yards before contact per carry.
    pub line_yards_before_contact: f64,
    /// Average punt return yards of this team's returners.
    pub punt_return_yards: f64,
}

impl TeamRoster {
    /// Ball carriers in carry-share order.
    pub fn carriers(&self) -> [&EntityId; 3] {
        [&self.qb, &self.rb_1, &self.rb_2]
    }

    /// Pass catchers in target-share order.
    pub fn targets(&self) -> [&EntityId; 8] {
        [
            &self.rb_1, &self.rb_2, &self.wr_1, &self.wr_2, &self.wr_3, &self.wr_4, &self.te_1,
            &self.te_2,
        ]
    }

    /// Skill-position players with their depth-chart labels.
    pub fn skill_players(&self) -> [(&'static str, &EntityId); 9] {
        [
            ("QB", &self.qb),
            ("RB", &self.rb_1),
            ("RB", &self.rb_2),
            ("WR", &self.wr_1),
            ("WR", &self.wr_2),
            ("WR", &self.wr_3),
            ("WR", &self.wr_4),
            ("TE", &self.te_1),
            ("TE", &self.te_2),
        ]
    }
}

/// Source of historical play records.
pub trait PlayRecordProvider {
    /// Yardage observations for one of [`Category::YARDAGE`].
    fn observations(&self, category: Category) -> Result<ObservationSet>;

    fn field_goal_attempts(&self) -> Result<Vec<FieldGoalAttempt>>;

    fn pass_attempts(&self) -> Result<Vec<PassAttempt>>;
}

pub trait RosterProvider {
    fn rosters(&self) -> Result<Vec<TeamRoster>>;
}

pub trait PlaycallProvider {
    fn playcall_rows(&self) -> Result<Vec<PlaycallRow>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_set_drops_non_finite() {
        let set = ObservationSet::from_pairs(
            Category::Rush,
            vec![
                (EntityId::from("a"), 3.0),
                (EntityId::from("a"), f64::NAN),
                (EntityId::from("b"), -2.0),
            ],
        );
        assert_eq!(set.entity(&EntityId::from("a")), &[3.0]);
        assert_eq!(set.population().len(), 2);
        assert_eq!(set.entity_count(), 2);
        assert!(set.entity(&EntityId::from("missing")).is_empty());
    }
}
