//! Shared identifiers and closed enums used across the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Id used for players missing from the id mapping (e.g. empty depth-chart slots).
pub const LEAGUE_AVERAGE_ID: &str = "LA";

/// Player (league id) or team (abbreviation) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

/// Teams are keyed by their abbreviation, which shares the id space with players.
pub type TeamId = EntityId;

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn league_average() -> Self {
        Self(LEAGUE_AVERAGE_ID.to_string())
    }

    /// Maps a blank or absent id onto the league-average sentinel.
    pub fn or_league_average(id: Option<&str>) -> Self {
        match id.map(str::trim) {
            Some(id) if !id.is_empty() => Self::new(id),
            _ => Self::league_average(),
        }
    }

    pub fn is_league_average(&self) -> bool {
        self.0 == LEAGUE_AVERAGE_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Parametric family used for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    Normal,
    GeneralizedExtremeValue,
    Logistic,
}

/// Historical observation category. Each one is fitted per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Rushing yards per carry, keyed by ball carrier.
    Rush,
    /// Rushing yards allowed per carry, keyed by defense.
    #[serde(rename = "rush_def")]
    RushDefense,
    /// Air yards per completion, keyed by passer.
    AirYards,
    /// Yards after catch, keyed by receiver.
    YardsAfterCatch,
    /// Passing yards allowed per completion, keyed by defense.
    #[serde(rename = "pass_def")]
    PassDefense,
    /// Gross punt distance, keyed by punter.
    Punt,
    /// Make/miss against distance-to-goal, keyed by kicker.
    FieldGoal,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Rush,
        Category::RushDefense,
        Category::AirYards,
        Category::YardsAfterCatch,
        Category::PassDefense,
        Category::Punt,
        Category::FieldGoal,
    ];

    /// Categories whose observations are yardage samples.
    pub const YARDAGE: [Category; 6] = [
        Category::Rush,
        Category::RushDefense,
        Category::AirYards,
        Category::YardsAfterCatch,
        Category::PassDefense,
        Category::Punt,
    ];

    pub fn family(self) -> ModelFamily {
        match self {
            Category::Punt => ModelFamily::Normal,
            Category::FieldGoal => ModelFamily::Logistic,
            _ => ModelFamily::GeneralizedExtremeValue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Rush => "rush",
            Category::RushDefense => "rush_def",
            Category::AirYards => "air_yards",
            Category::YardsAfterCatch => "yards_after_catch",
            Category::PassDefense => "pass_def",
            Category::Punt => "punt",
            Category::FieldGoal => "field_goal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Play call. Order matches the playcall probability vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Pass,
    Run,
    FieldGoal,
    Punt,
}

impl PlayType {
    pub const ALL: [PlayType; 4] =
        [PlayType::Pass, PlayType::Run, PlayType::FieldGoal, PlayType::Punt];

    pub fn index(self) -> usize {
        match self {
            PlayType::Pass => 0,
            PlayType::Run => 1,
            PlayType::FieldGoal => 2,
            PlayType::Punt => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayType::Pass => "pass",
            PlayType::Run => "run",
            PlayType::FieldGoal => "field_goal",
            PlayType::Punt => "punt",
        }
    }
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance-to-go bucket used by playcall tendencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DistanceBucket {
    All,
    Short,
    Mid,
    Long,
}

impl DistanceBucket {
    pub const ALL: [DistanceBucket; 4] =
        [DistanceBucket::All, DistanceBucket::Short, DistanceBucket::Mid, DistanceBucket::Long];

    pub fn classify(down: u8, distance: f64) -> Self {
        if down == 1 {
            DistanceBucket::All
        } else if distance < 4.0 {
            DistanceBucket::Short
        } else if distance > 6.0 {
            DistanceBucket::Long
        } else {
            DistanceBucket::Mid
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistanceBucket::All => "All",
            DistanceBucket::Short => "Short",
            DistanceBucket::Mid => "Mid",
            DistanceBucket::Long => "Long",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "All" => Some(DistanceBucket::All),
            "Short" => Some(DistanceBucket::Short),
            "Mid" => Some(DistanceBucket::Mid),
            "Long" => Some(DistanceBucket::Long),
            _ => None,
        }
    }
}

/// Per-player box-score statistic tracked by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    PassYards,
    PassTds,
    Interceptions,
    RushYards,
    RushTds,
    Receptions,
    RecYards,
    RecTds,
}

impl StatKind {
    pub const ALL: [StatKind; 8] = [
        StatKind::PassYards,
        StatKind::PassTds,
        StatKind::Interceptions,
        StatKind::RushYards,
        StatKind::RushTds,
        StatKind::Receptions,
        StatKind::RecYards,
        StatKind::RecTds,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::PassYards => "pass_yards",
            StatKind::PassTds => "pass_tds",
            StatKind::Interceptions => "interceptions",
            StatKind::RushYards => "rush_yards",
            StatKind::RushTds => "rush_tds",
            StatKind::Receptions => "receptions",
            StatKind::RecYards => "rec_yards",
            StatKind::RecTds => "rec_tds",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        StatKind::ALL.into_iter().find(|stat| stat.as_str() == label.trim())
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
