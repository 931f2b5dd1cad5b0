//! 2024 CSV tables → [`Dataset`]
//!
//! Expected files under the data directory:
//! - `2024_rushes.csv`, `2024_passes.csv`, `punts.csv`, `field_goals.csv`: play rows
//! - `teams.csv`: depth chart by player name, plus coach
//! - `rush_pct.csv`, `target_pct.csv`: carry and target shares per team
//! - `playcall_profiles.csv`: coach tendencies
//! - `player_ids.csv`: full name → league id
//!
//! Depth-chart names missing from `player_ids.csv` become the league-average id.

use anyhow::{bail, Context, Result};
use gridiron_core::data::{
    baselines, Dataset, FieldGoalAttempt, PassAttempt, PlayerDirectory, PuntRecord, RushAttempt,
    TeamRoster,
};
use gridiron_core::playcall::PlaycallRow;
use gridiron_core::types::{DistanceBucket, EntityId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const RUSHES_CSV: &str = "2024_rushes.csv";
pub const PASSES_CSV: &str = "2024_passes.csv";
pub const PUNTS_CSV: &str = "punts.csv";
pub const FIELD_GOALS_CSV: &str = "field_goals.csv";
pub const TEAMS_CSV: &str = "teams.csv";
pub const PLAYCALLS_CSV: &str = "playcall_profiles.csv";
pub const TARGETS_CSV: &str = "target_pct.csv";
pub const CARRIES_CSV: &str = "rush_pct.csv";
pub const PLAYER_IDS_CSV: &str = "player_ids.csv";

#[derive(Debug, Deserialize)]
struct RushRow {
    rusher_player_id: Option<String>,
    defteam: String,
    yards_gained_rush: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PassRow {
    passer_player_id: Option<String>,
    receiver_player_id: Option<String>,
    defteam: String,
    complete_pass: String,
    interception: String,
    air_yards: Option<f64>,
    yards_after_catch: Option<f64>,
    yards_gained_pass: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PuntRow {
    punter_player_id: Option<String>,
    kick_distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FieldGoalRow {
    kicker_player_id: Option<String>,
    yardline_100: f64,
    result: String,
}

#[derive(Debug, Deserialize)]
struct TeamRow {
    team: String,
    coach: String,
    qb: String,
    rb_1: String,
    rb_2: String,
    wr_1: String,
    wr_2: String,
    wr_3: String,
    wr_4: String,
    te_1: String,
    te_2: String,
    kicker: String,
    punter: String,
}

#[derive(Debug, Deserialize)]
struct CarryRow {
    team: String,
    qb: f64,
    rb_1: f64,
    rb_2: f64,
}

#[derive(Debug, Deserialize)]
struct TargetRow {
    team: String,
    rb_1: f64,
    rb_2: f64,
    wr_1: f64,
    wr_2: f64,
    wr_3: f64,
    wr_4: f64,
    te_1: f64,
    te_2: f64,
}

#[derive(Debug, Deserialize)]
struct PlaycallCsvRow {
    coach: String,
    down: u8,
    distance: String,
    red_zone: String,
    pass_prob: f64,
    run_prob: f64,
    fg_prob: f64,
    punt_prob: f64,
}

#[derive(Debug, Deserialize)]
struct PlayerIdRow {
    full_name: String,
    gsis_id: Option<String>,
}

/// Row counts of a parsed data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rushes: usize,
    pub passes: usize,
    pub punts: usize,
    pub field_goals: usize,
    pub teams: usize,
    pub playcalls: usize,
    pub players: usize,
    /// Play rows dropped for a missing yardage value.
    pub skipped: usize,
}

fn read_table<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>> {
    let path = dir.join(file);
    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(row, record)| {
            // header is line 1
            record.with_context(|| format!("{}: invalid row on line {}", path.display(), row + 2))
        })
        .collect()
}

/// pandas writes booleans as `True`/`False` and 0/1 flags as floats.
fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "1.0" | "true" | "made" | "good")
}

fn entity(id: Option<&String>) -> EntityId {
    EntityId::or_league_average(id.map(String::as_str))
}

pub fn load_directory(dir: &Path) -> Result<PlayerDirectory> {
    let mut directory = PlayerDirectory::new();
    for row in read_table::<PlayerIdRow>(dir, PLAYER_IDS_CSV)? {
        if let Some(id) = row.gsis_id.filter(|id| !id.trim().is_empty()) {
            directory.insert(row.full_name.trim(), EntityId::new(id.trim()));
        }
    }
    Ok(directory)
}

fn load_rosters(dir: &Path, directory: &PlayerDirectory) -> Result<Vec<TeamRoster>> {
    let carries: HashMap<String, CarryRow> = read_table::<CarryRow>(dir, CARRIES_CSV)?
        .into_iter()
        .map(|row| (row.team.clone(), row))
        .collect();
    let targets: HashMap<String, TargetRow> = read_table::<TargetRow>(dir, TARGETS_CSV)?
        .into_iter()
        .map(|row| (row.team.clone(), row))
        .collect();

    let mut rosters = Vec::new();
    for row in read_table::<TeamRow>(dir, TEAMS_CSV)? {
        let team = row.team.trim();
        let Some(carry) = carries.get(team) else {
            bail!("{CARRIES_CSV} has no row for team {team}");
        };
        let Some(target) = targets.get(team) else {
            bail!("{TARGETS_CSV} has no row for team {team}");
        };

        rosters.push(TeamRoster {
            team: team.into(),
            coach: EntityId::new(row.coach.trim()),
            qb: directory.id_for(&row.qb),
            rb_1: directory.id_for(&row.rb_1),
            rb_2: directory.id_for(&row.rb_2),
            wr_1: directory.id_for(&row.wr_1),
            wr_2: directory.id_for(&row.wr_2),
            wr_3: directory.id_for(&row.wr_3),
            wr_4: directory.id_for(&row.wr_4),
            te_1: directory.id_for(&row.te_1),
            te_2: directory.id_for(&row.te_2),
            kicker: directory.id_for(&row.kicker),
            punter: directory.id_for(&row.punter),
            carry_shares: [carry.qb, carry.rb_1, carry.rb_2],
            target_shares: [
                target.rb_1,
                target.rb_2,
                target.wr_1,
                target.wr_2,
                target.wr_3,
                target.wr_4,
                target.te_1,
                target.te_2,
            ],
            line_yards_before_contact: baselines::line_yards_before_contact(team),
            punt_return_yards: baselines::punt_return_yards(team),
        });
    }
    Ok(rosters)
}

fn load_playcalls(dir: &Path) -> Result<Vec<PlaycallRow>> {
    read_table::<PlaycallCsvRow>(dir, PLAYCALLS_CSV)?
        .into_iter()
        .map(|row| {
            let bucket = DistanceBucket::parse(&row.distance).with_context(|| {
                format!("{PLAYCALLS_CSV}: unknown distance bucket '{}'", row.distance)
            })?;
            Ok(PlaycallRow {
                coach: EntityId::new(row.coach.trim()),
                down: row.down,
                bucket,
                redzone: parse_flag(&row.red_zone),
                probabilities: [row.pass_prob, row.run_prob, row.fg_prob, row.punt_prob],
            })
        })
        .collect()
}

/// Parses every table under `dir`.
pub fn load_dataset(dir: &Path) -> Result<(Dataset, PlayerDirectory, LoadStats)> {
    let directory = load_directory(dir)?;
    let mut stats = LoadStats { players: directory.len(), ..LoadStats::default() };
    let mut dataset = Dataset::default();

    for row in read_table::<RushRow>(dir, RUSHES_CSV)? {
        let Some(yards) = row.yards_gained_rush else {
            stats.skipped += 1;
            continue;
        };
        dataset.rushes.push(RushAttempt {
            rusher: entity(row.rusher_player_id.as_ref()),
            defense: row.defteam.trim().into(),
            yards,
        });
    }

    for row in read_table::<PassRow>(dir, PASSES_CSV)? {
        dataset.passes.push(PassAttempt {
            passer: entity(row.passer_player_id.as_ref()),
            receiver: entity(row.receiver_player_id.as_ref()),
            defense: row.defteam.trim().into(),
            complete: parse_flag(&row.complete_pass),
            interception: parse_flag(&row.interception),
            air_yards: row.air_yards,
            yards_after_catch: row.yards_after_catch,
            yards_gained: row.yards_gained_pass,
        });
    }

    for row in read_table::<PuntRow>(dir, PUNTS_CSV)? {
        let Some(distance) = row.kick_distance else {
            stats.skipped += 1;
            continue;
        };
        dataset.punts.push(PuntRecord { punter: entity(row.punter_player_id.as_ref()), distance });
    }

    for row in read_table::<FieldGoalRow>(dir, FIELD_GOALS_CSV)? {
        dataset.field_goals.push(FieldGoalAttempt {
            kicker: entity(row.kicker_player_id.as_ref()),
            distance: row.yardline_100,
            made: parse_flag(&row.result),
        });
    }

    dataset.rosters = load_rosters(dir, &directory)?;
    dataset.playcalls = load_playcalls(dir)?;

    stats.rushes = dataset.rushes.len();
    stats.passes = dataset.passes.len();
    stats.punts = dataset.punts.len();
    stats.field_goals = dataset.field_goals.len();
    stats.teams = dataset.rosters.len();
    stats.playcalls = dataset.playcalls.len();

    Ok((dataset, directory, stats))
}
