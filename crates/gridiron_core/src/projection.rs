//! Season-level projections built from batches of matchup runs.

use crate::data::TeamRoster;
use crate::driver::RunOptions;
use crate::engine::Simulator;
use crate::error::Result;
use crate::export::{matchup_id, StatTable};
use crate::types::{EntityId, StatKind, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Week number → list of `(home, away)` matchups.
pub type Schedule = BTreeMap<u32, Vec<(TeamId, TeamId)>>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreProjection {
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonProjection {
    /// Week → `HOMEvAWAY` → mean scores.
    pub scores: BTreeMap<u32, BTreeMap<String, ScoreProjection>>,
    /// Player → statistic → one mean per matchup the player recorded it in,
    /// in schedule order.
    pub player_stats: BTreeMap<EntityId, BTreeMap<StatKind, Vec<f64>>>,
}

impl SeasonProjection {
    pub fn matchups(&self) -> usize {
        self.scores.values().map(BTreeMap::len).sum()
    }

    /// Mean of a player's per-matchup means; `0.0` when never recorded.
    pub fn season_mean(&self, player: &EntityId, stat: StatKind) -> f64 {
        match self.player_stats.get(player).and_then(|stats| stats.get(&stat)) {
            Some(means) if !means.is_empty() => means.iter().sum::<f64>() / means.len() as f64,
            _ => 0.0,
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self).map_err(std::io::Error::from)?;
        Ok(())
    }
}

/// Runs every scheduled matchup `games_per_matchup` times on the parallel path.
///
/// With a seed, matchup `k` (in schedule order) runs with `seed + k`, so a
/// projection replays exactly.
pub fn project_season(
    sim: &mut Simulator,
    schedule: &Schedule,
    games_per_matchup: usize,
    workers: Option<usize>,
    seed: Option<u64>,
) -> Result<SeasonProjection> {
    let mut projection = SeasonProjection::default();
    let mut matchup_index = 0_u64;

    for (&week, games) in schedule {
        for (home, away) in games {
            let mut options = RunOptions::new();
            if let Some(seed) = seed {
                options = options.seed(seed.wrapping_add(matchup_index));
            }
            matchup_index += 1;

            let summary = sim.run_parallel(home, away, games_per_matchup, workers, options)?;
            projection.scores.entry(week).or_default().insert(
                matchup_id(home, away),
                ScoreProjection {
                    home: summary.mean_home_score(),
                    away: summary.mean_away_score(),
                },
            );

            let table = sim.export_stats(home, away);
            for column in table.columns() {
                projection
                    .player_stats
                    .entry(column.player.clone())
                    .or_default()
                    .entry(column.stat)
                    .or_default()
                    .push(table.mean(column.stat, &column.player));
            }
        }
        info!(week, matchups = games.len(), "projected week");
    }

    Ok(projection)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player: EntityId,
    pub position: &'static str,
    pub means: BTreeMap<StatKind, f64>,
}

/// Mean of every statistic for a team's skill players, `0.0` where absent.
/// Empty depth-chart slots are skipped.
pub fn team_summary(roster: &TeamRoster, table: &StatTable) -> Vec<PlayerSummary> {
    roster
        .skill_players()
        .into_iter()
        .filter(|(_, player)| !player.is_league_average())
        .map(|(position, player)| PlayerSummary {
            player: player.clone(),
            position,
            means: StatKind::ALL.into_iter().map(|stat| (stat, table.mean(stat, player))).collect(),
        })
        .collect()
}
