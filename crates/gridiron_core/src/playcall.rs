//! Coach play-calling tendencies.
//!
//! A [`PlaycallBook`] is built once from the provider rows and answers every
//! (coach, down, distance bucket, redzone) lookup, falling back in order to:
//! 1. the coach's own row
//! 2. the league average of every coach's row for the same situation
//! 3. a neutral profile (downs 1-3 pass/run, 4th down kick)

use crate::types::{DistanceBucket, EntityId, PlayType};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// One row of the playcall tendency table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaycallRow {
    pub coach: EntityId,
    pub down: u8,
    pub bucket: DistanceBucket,
    pub redzone: bool,
    /// Pass, run, field goal, punt.
    pub probabilities: [f64; 4],
}

/// Normalized categorical distribution over [`PlayType::ALL`].
#[derive(Debug, Clone)]
pub struct PlaycallProfile {
    probabilities: [f64; 4],
    sampler: WeightedIndex<f64>,
}

impl PlaycallProfile {
    /// Normalizes `weights` to sum to 1. `None` when no weight is positive
    /// or any weight is negative or non-finite.
    pub fn new(weights: [f64; 4]) -> Option<Self> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }
        let probabilities = weights.map(|w| w / total);
        let sampler = WeightedIndex::new(probabilities).ok()?;
        Some(Self { probabilities, sampler })
    }

    /// Profile that always calls `play`.
    pub fn always(play: PlayType) -> Self {
        let mut weights = [0.0; 4];
        weights[play.index()] = 1.0;
        Self::new(weights).unwrap_or_else(|| unreachable!("one-hot weights are valid"))
    }

    /// Situation-only default used when no coach has a row for the situation.
    pub fn neutral(down: u8, redzone: bool) -> Self {
        match (down, redzone) {
            (4, true) => Self::always(PlayType::FieldGoal),
            (4, false) => Self::always(PlayType::Punt),
            _ => Self::new([0.55, 0.45, 0.0, 0.0])
                .unwrap_or_else(|| unreachable!("neutral weights are valid")),
        }
    }

    pub fn probabilities(&self) -> [f64; 4] {
        self.probabilities
    }

    pub fn probability(&self, play: PlayType) -> f64 {
        self.probabilities[play.index()]
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PlayType {
        PlayType::ALL[self.sampler.sample(rng)]
    }
}

/// Where a looked-up profile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    Coach,
    LeagueAverage,
    Neutral,
}

type SituationKey = (u8, DistanceBucket, bool);

#[derive(Debug, Clone, Default)]
pub struct PlaycallBook {
    coaches: HashMap<(EntityId, SituationKey), PlaycallProfile>,
    league: HashMap<SituationKey, PlaycallProfile>,
    neutral: HashMap<(u8, bool), PlaycallProfile>,
}

impl PlaycallBook {
    pub fn from_rows(rows: impl IntoIterator<Item = PlaycallRow>) -> Self {
        let mut coaches = HashMap::new();
        let mut sums: HashMap<SituationKey, ([f64; 4], usize)> = HashMap::new();

        for row in rows {
            let Some(profile) = PlaycallProfile::new(row.probabilities) else {
                warn!(
                    coach = %row.coach,
                    down = row.down,
                    bucket = row.bucket.as_str(),
                    redzone = row.redzone,
                    "skipping playcall row with invalid probabilities"
                );
                continue;
            };

            let situation = (row.down, row.bucket, row.redzone);
            let entry = sums.entry(situation).or_insert(([0.0; 4], 0));
            for (acc, p) in entry.0.iter_mut().zip(profile.probabilities) {
                *acc += p;
            }
            entry.1 += 1;
            coaches.insert((row.coach, situation), profile);
        }

        let league = sums
            .into_iter()
            .filter_map(|(situation, (sum, count))| {
                PlaycallProfile::new(sum.map(|s| s / count as f64)).map(|p| (situation, p))
            })
            .collect();

        let mut neutral = HashMap::new();
        for down in 1..=4 {
            for redzone in [false, true] {
                neutral.insert((down, redzone), PlaycallProfile::neutral(down, redzone));
            }
        }

        Self { coaches, league, neutral }
    }

    pub fn lookup(
        &self,
        coach: &EntityId,
        down: u8,
        bucket: DistanceBucket,
        redzone: bool,
    ) -> (&PlaycallProfile, ProfileSource) {
        let situation = (down, bucket, redzone);
        if let Some(profile) = self.coaches.get(&(coach.clone(), situation)) {
            return (profile, ProfileSource::Coach);
        }
        if let Some(profile) = self.league.get(&situation) {
            return (profile, ProfileSource::LeagueAverage);
        }
        match self.neutral.get(&(down.clamp(1, 4), redzone)) {
            Some(profile) => (profile, ProfileSource::Neutral),
            None => unreachable!("neutral profiles cover downs 1-4"),
        }
    }

    pub fn coach_row_count(&self) -> usize {
        self.coaches.len()
    }
}
