//! Per-entity success rates derived from pass attempts.

use super::PassAttempt;
use crate::types::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mean of a boolean outcome per entity.
///
/// Entities without history read the mean of all entity rates, the
/// league-average stand-in for rookies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTable {
    rates: HashMap<EntityId, f64>,
    mean: f64,
}

impl RateTable {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (EntityId, bool)>,
    {
        let mut tallies: HashMap<EntityId, (u32, u32)> = HashMap::new();
        for (entity, success) in outcomes {
            let tally = tallies.entry(entity).or_insert((0, 0));
            tally.0 += u32::from(success);
            tally.1 += 1;
        }

        let rates: HashMap<EntityId, f64> = tallies
            .into_iter()
            .map(|(entity, (hits, total))| (entity, hits as f64 / total as f64))
            .collect();
        let mean = if rates.is_empty() {
            0.0
        } else {
            rates.values().sum::<f64>() / rates.len() as f64
        };

        Self { rates, mean }
    }

    pub fn get(&self, entity: &EntityId) -> f64 {
        self.rates.get(entity).copied().unwrap_or(self.mean)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassRates {
    /// Completion rate per passer.
    pub completion: RateTable,
    /// Interception rate per passer.
    pub interception: RateTable,
    /// Catch rate per receiver.
    pub catch: RateTable,
    /// Interception rate per defense.
    pub defense_interception: RateTable,
}

impl PassRates {
    pub fn from_attempts(attempts: &[PassAttempt]) -> Self {
        Self {
            completion: RateTable::from_outcomes(
                attempts.iter().map(|a| (a.passer.clone(), a.complete)),
            ),
            interception: RateTable::from_outcomes(
                attempts.iter().map(|a| (a.passer.clone(), a.interception)),
            ),
            catch: RateTable::from_outcomes(
                attempts.iter().map(|a| (a.receiver.clone(), a.complete)),
            ),
            defense_interception: RateTable::from_outcomes(
                attempts.iter().map(|a| (a.defense.clone(), a.interception)),
            ),
        }
    }

    /// Interception probability for a passer against a defense.
    pub fn interception_probability(&self, passer: &EntityId, defense: &EntityId) -> f64 {
        (self.interception.get(passer) + self.defense_interception.get(defense)) / 2.0
    }

    /// Completion probability for a passer throwing to a receiver.
    pub fn completion_probability(&self, passer: &EntityId, receiver: &EntityId) -> f64 {
        (self.completion.get(passer) + self.catch.get(receiver)) / 2.0
    }
}
