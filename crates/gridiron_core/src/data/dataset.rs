//! In-memory historical dataset.

use super::{
    FieldGoalAttempt, ObservationSet, PassAttempt, PlayRecordProvider, PlaycallProvider,
    PuntRecord, RosterProvider, RushAttempt, TeamRoster,
};
use crate::error::{Result, SimError};
use crate::playcall::PlaycallRow;
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Every table the engine reads, held in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub rushes: Vec<RushAttempt>,
    pub passes: Vec<PassAttempt>,
    pub punts: Vec<PuntRecord>,
    pub field_goals: Vec<FieldGoalAttempt>,
    pub rosters: Vec<TeamRoster>,
    pub playcalls: Vec<PlaycallRow>,
}

impl Dataset {
    /// Reads a dataset previously written with [`Dataset::to_json_file`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SimError::DatasetUnavailable(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SimError::DatasetUnavailable(format!("failed to parse {}: {e}", path.display()))
        })
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(self)
            .map_err(|e| SimError::DatasetUnavailable(format!("failed to encode dataset: {e}")))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Whether every play table has at least one record.
    pub fn has_play_records(&self) -> bool {
        !(self.rushes.is_empty()
            || self.passes.is_empty()
            || self.punts.is_empty()
            || self.field_goals.is_empty())
    }

    fn completed_passes(&self) -> impl Iterator<Item = &PassAttempt> {
        self.passes.iter().filter(|p| p.complete && !p.interception)
    }
}

impl PlayRecordProvider for Dataset {
    fn observations(&self, category: Category) -> Result<ObservationSet> {
        let set = match category {
            Category::Rush => ObservationSet::from_pairs(
                category,
                self.rushes.iter().map(|r| (r.rusher.clone(), r.yards)),
            ),
            Category::RushDefense => ObservationSet::from_pairs(
                category,
                self.rushes.iter().map(|r| (r.defense.clone(), r.yards)),
            ),
            Category::AirYards => ObservationSet::from_pairs(
                category,
                self.completed_passes()
                    .filter_map(|p| p.air_yards.map(|y| (p.passer.clone(), y))),
            ),
            Category::YardsAfterCatch => ObservationSet::from_pairs(
                category,
                self.completed_passes()
                    .filter_map(|p| p.yards_after_catch.map(|y| (p.receiver.clone(), y))),
            ),
            Category::PassDefense => ObservationSet::from_pairs(
                category,
                self.completed_passes()
                    .filter_map(|p| p.yards_gained.map(|y| (p.defense.clone(), y))),
            ),
            Category::Punt => ObservationSet::from_pairs(
                category,
                self.punts.iter().map(|p| (p.punter.clone(), p.distance)),
            ),
            Category::FieldGoal => {
                return Err(SimError::DatasetUnavailable(
                    "field goals are read through field_goal_attempts".into(),
                ))
            }
        };
        Ok(set)
    }

    fn field_goal_attempts(&self) -> Result<Vec<FieldGoalAttempt>> {
        Ok(self.field_goals.clone())
    }

    fn pass_attempts(&self) -> Result<Vec<PassAttempt>> {
        Ok(self.passes.clone())
    }
}

impl RosterProvider for Dataset {
    fn rosters(&self) -> Result<Vec<TeamRoster>> {
        Ok(self.rosters.clone())
    }
}

impl PlaycallProvider for Dataset {
    fn playcall_rows(&self) -> Result<Vec<PlaycallRow>> {
        Ok(self.playcalls.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityId;
    use tempfile::TempDir;

    fn pass(passer: &str, complete: bool, interception: bool) -> PassAttempt {
        PassAttempt {
            passer: passer.into(),
            receiver: "wr".into(),
            defense: "DAL".into(),
            complete,
            interception,
            air_yards: Some(8.0),
            yards_after_catch: complete.then_some(4.0),
            yards_gained: complete.then_some(12.0),
        }
    }

    #[test]
    fn test_pass_categories_use_completions_only() {
        let dataset = Dataset {
            passes: vec![pass("qb", true, false), pass("qb", false, false), pass("qb", false, true)],
            ..Dataset::default()
        };

        let air = dataset.observations(Category::AirYards).unwrap();
        assert_eq!(air.entity(&EntityId::from("qb")), &[8.0]);

        let defense = dataset.observations(Category::PassDefense).unwrap();
        assert_eq!(defense.entity(&EntityId::from("DAL")), &[12.0]);

        assert_eq!(dataset.pass_attempts().unwrap().len(), 3);
    }

    #[test]
    fn test_rush_categories_key_by_rusher_and_defense() {
        let dataset = Dataset {
            rushes: vec![
                RushAttempt { rusher: "rb".into(), defense: "DAL".into(), yards: 5.0 },
                RushAttempt { rusher: "rb".into(), defense: "NYG".into(), yards: -1.0 },
            ],
            ..Dataset::default()
        };
        let rush = dataset.observations(Category::Rush).unwrap();
        assert_eq!(rush.entity(&EntityId::from("rb")), &[5.0, -1.0]);
        let rush_def = dataset.observations(Category::RushDefense).unwrap();
        assert_eq!(rush_def.entity_count(), 2);
    }

    #[test]
    fn test_field_goal_category_is_not_a_yardage_set() {
        let err = Dataset::default().observations(Category::FieldGoal).unwrap_err();
        assert!(matches!(err, SimError::DatasetUnavailable(_)));
    }

    #[test]
    fn test_json_file_roundtrip_and_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dataset.json");

        let dataset = Dataset {
            punts: vec![PuntRecord { punter: "p".into(), distance: 47.0 }],
            ..Dataset::default()
        };
        dataset.to_json_file(&path).unwrap();
        let loaded = Dataset::from_json_file(&path).unwrap();
        assert_eq!(loaded.punts.len(), 1);
        assert!(!loaded.has_play_records());

        let err = Dataset::from_json_file(temp_dir.path().join("missing.json")).unwrap_err();
        assert!(err.is_fatal());
    }
}
