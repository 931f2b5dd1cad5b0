//! Public entry point: construct once (fits or loads every model), then run
//! any number of matchups.

use crate::cache::ParameterStore;
use crate::config::SimConfig;
use crate::data::{Dataset, PlayRecordProvider, PlaycallProvider, RosterProvider};
use crate::driver::{self, RunOptions, RunOutput};
use crate::error::{Result, SimError};
use crate::export::StatTable;
use crate::game::{self, GameResult, Lineup};
use crate::models::ModelSet;
use crate::playcall::PlaycallBook;
use crate::stats::AggregateStatStore;
use crate::types::TeamId;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Scores of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub home: TeamId,
    pub away: TeamId,
    /// Master seed the run used; replaying with it reproduces the run.
    pub seed: u64,
    pub home_scores: Vec<u32>,
    pub away_scores: Vec<u32>,
    pub cancelled: bool,
}

fn mean(scores: &[u32]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64
    }
}

impl SimulationSummary {
    pub fn completed(&self) -> usize {
        self.home_scores.len()
    }

    pub fn mean_home_score(&self) -> f64 {
        mean(&self.home_scores)
    }

    pub fn mean_away_score(&self) -> f64 {
        mean(&self.away_scores)
    }

    /// Share of games the home side won outright.
    pub fn home_win_rate(&self) -> f64 {
        if self.home_scores.is_empty() {
            return 0.0;
        }
        let wins = self.home_scores.iter().zip(&self.away_scores).filter(|(h, a)| h > a).count();
        wins as f64 / self.home_scores.len() as f64
    }
}

pub struct Simulator {
    models: ModelSet,
    playcalls: PlaycallBook,
    lineups: BTreeMap<TeamId, Lineup>,
    config: SimConfig,
    stats: AggregateStatStore,
}

impl Simulator {
    /// Reads every provider, validates rosters, then fits or loads the models.
    pub fn new<P>(
        records: &P,
        rosters: &dyn RosterProvider,
        playcalls: &dyn PlaycallProvider,
        store: &dyn ParameterStore,
        config: SimConfig,
    ) -> Result<Self>
    where
        P: PlayRecordProvider + ?Sized,
    {
        config.validate()?;

        let rosters = rosters.rosters()?;
        let mut lineups = BTreeMap::new();
        for roster in &rosters {
            lineups.insert(roster.team.clone(), Lineup::new(roster.clone())?);
        }

        let playcalls = PlaycallBook::from_rows(playcalls.playcall_rows()?);
        let models = ModelSet::build(records, &rosters, store, &config)?;

        info!(
            teams = lineups.len(),
            playcall_rows = playcalls.coach_row_count(),
            origin = ?models.origin(),
            "simulator ready"
        );
        Ok(Self { models, playcalls, lineups, config, stats: AggregateStatStore::new() })
    }

    pub fn from_dataset(
        dataset: &Dataset,
        store: &dyn ParameterStore,
        config: SimConfig,
    ) -> Result<Self> {
        Self::new(dataset, dataset, dataset, store, config)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn models(&self) -> &ModelSet {
        &self.models
    }

    pub fn teams(&self) -> impl Iterator<Item = &TeamId> {
        self.lineups.keys()
    }

    pub fn lineup(&self, team: &TeamId) -> Result<&Lineup> {
        self.lineups.get(team).ok_or_else(|| SimError::UnknownTeam(team.clone()))
    }

    /// One game with the caller's random stream. Does not touch the aggregate store.
    pub fn simulate_game<R: Rng + ?Sized>(
        &self,
        home: &TeamId,
        away: &TeamId,
        rng: &mut R,
    ) -> Result<GameResult> {
        let (home, away) = (self.lineup(home)?, self.lineup(away)?);
        Ok(game::simulate_game(&self.models, &self.playcalls, &self.config, home, away, rng))
    }

    /// `n` games on the calling thread. Starts a fresh aggregate session.
    pub fn run_sequential(
        &mut self,
        home: &TeamId,
        away: &TeamId,
        n: usize,
        mut options: RunOptions<'_>,
    ) -> Result<SimulationSummary> {
        let seed = self.master_seed(&options);
        let output = {
            let (home_lineup, away_lineup) = (self.lineup(home)?, self.lineup(away)?);
            let (models, playcalls, config) = (&self.models, &self.playcalls, &self.config);
            driver::run_sequential(n, seed, &mut options, |rng| {
                game::simulate_game(models, playcalls, config, home_lineup, away_lineup, rng)
            })
        };
        Ok(self.collect(home, away, output))
    }

    /// `n` games on a pool of `workers` threads (default: config, then every core).
    /// Starts a fresh aggregate session.
    pub fn run_parallel(
        &mut self,
        home: &TeamId,
        away: &TeamId,
        n: usize,
        workers: Option<usize>,
        mut options: RunOptions<'_>,
    ) -> Result<SimulationSummary> {
        let seed = self.master_seed(&options);
        let workers = driver::effective_workers(workers.or(self.config.workers));
        let output = {
            let (home_lineup, away_lineup) = (self.lineup(home)?, self.lineup(away)?);
            let (models, playcalls, config) = (&self.models, &self.playcalls, &self.config);
            driver::run_parallel(n, workers, seed, &mut options, |rng| {
                game::simulate_game(models, playcalls, config, home_lineup, away_lineup, rng)
            })?
        };
        Ok(self.collect(home, away, output))
    }

    /// Per-game values of the last run, keyed by (statistic, player).
    pub fn sim_stats(&self) -> &AggregateStatStore {
        &self.stats
    }

    /// The last run's stats as a padded table named after the matchup.
    pub fn export_stats(&self, home: &TeamId, away: &TeamId) -> StatTable {
        StatTable::from_store(home, away, &self.stats)
    }

    fn master_seed(&self, options: &RunOptions<'_>) -> u64 {
        options.seed.or(self.config.seed).unwrap_or_else(|| OsRng.gen())
    }

    fn collect(&mut self, home: &TeamId, away: &TeamId, output: RunOutput) -> SimulationSummary {
        self.stats.clear();
        let mut home_scores = Vec::with_capacity(output.games.len());
        let mut away_scores = Vec::with_capacity(output.games.len());
        for game in &output.games {
            self.stats.merge(&game.stats);
            home_scores.push(game.home_score);
            away_scores.push(game.away_score);
        }

        let summary = SimulationSummary {
            home: home.clone(),
            away: away.clone(),
            seed: output.seed,
            home_scores,
            away_scores,
            cancelled: output.cancelled,
        };
        info!(
            home = %home,
            away = %away,
            games = summary.completed(),
            mean_home = summary.mean_home_score(),
            mean_away = summary.mean_away_score(),
            "matchup simulated"
        );
        summary
    }
}
