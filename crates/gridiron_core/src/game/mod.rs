//! # Game State Machine
//!
//! A game is a fixed number of snaps. Each snap:
//! 1. classifies down/distance/redzone and samples a play call
//! 2. dispatches to the play's resolver ([`resolve`])
//! 3. applies the result to [`GameState`] and the running [`PlayerStatLine`]
//!
//! Yardage plays resolve the series in a fixed order: touchdown, turnover on
//! downs, first down, next down. Interceptions, punts and field goals change
//! possession directly.

pub mod lineup;
pub mod resolve;
pub mod state;

pub use lineup::Lineup;
pub use resolve::{PlayContext, Resolution};
pub use state::{GameState, Side, Transition};

use crate::config::SimConfig;
use crate::models::ModelSet;
use crate::playcall::PlaycallBook;
use crate::stats::PlayerStatLine;
use crate::types::{EntityId, PlayType, StatKind, TeamId};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

pub const TOUCHDOWN_POINTS: u32 = 7;
pub const FIELD_GOAL_POINTS: u32 = 3;

/// Applied result of one snap.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayOutcome {
    pub resolution: Resolution,
    /// Yards credited after capping at the goal line.
    pub yards: f64,
    /// Points scored by the offense that ran the play.
    pub points: u32,
    pub possession_changed: bool,
}

impl PlayOutcome {
    pub fn play_type(&self) -> PlayType {
        self.resolution.play_type()
    }

    pub fn scored(&self) -> bool {
        self.points > 0
    }
}

/// Play-call and per-player involvement counts of one game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayCounts {
    calls: [u32; 4],
    pub carries: BTreeMap<EntityId, u32>,
    pub targets: BTreeMap<EntityId, u32>,
}

impl PlayCounts {
    fn record(&mut self, outcome: &PlayOutcome) {
        self.calls[outcome.play_type().index()] += 1;
        match &outcome.resolution {
            Resolution::Run { carrier, .. } => *self.carries.entry(carrier.clone()).or_insert(0) += 1,
            Resolution::Pass { target, .. } => *self.targets.entry(target.clone()).or_insert(0) += 1,
            Resolution::FieldGoal { .. } | Resolution::Punt { .. } => {}
        }
    }

    pub fn calls(&self, play: PlayType) -> u32 {
        self.calls[play.index()]
    }

    pub fn total(&self) -> u32 {
        self.calls.iter().sum()
    }
}

#[derive(Debug, Clone)]
pub struct GameResult {
    pub home: TeamId,
    pub away: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    pub stats: PlayerStatLine,
    pub counts: PlayCounts,
}

impl GameResult {
    pub fn plays(&self) -> u32 {
        self.counts.total()
    }
}

/// Plays one full game. Possession at kickoff is a coin flip.
pub fn simulate_game<R: Rng + ?Sized>(
    models: &ModelSet,
    playcalls: &PlaycallBook,
    config: &SimConfig,
    home: &Lineup,
    away: &Lineup,
    rng: &mut R,
) -> GameResult {
    let receiving = if rng.gen_bool(0.5) { Side::Home } else { Side::Away };
    let mut state = GameState::kickoff(receiving, config.kickoff_yardline);
    let mut scores = [0u32; 2];
    let mut stats = PlayerStatLine::new();
    let mut counts = PlayCounts::default();

    for snap in 0..config.snaps_per_game {
        let (offense, defense) = match state.offense {
            Side::Home => (home, away),
            Side::Away => (away, home),
        };
        let (profile, source) = playcalls.lookup(
            &offense.roster().coach,
            state.down,
            state.bucket(),
            state.is_redzone(),
        );
        let play = profile.sample(rng);

        let ctx = PlayContext { models, config, offense, defense };
        let resolution = resolve::resolve(play, &ctx, &state, rng);

        let side = state.offense;
        let (down, distance, yardline) = (state.down, state.distance, state.yardline);
        let outcome = apply(&mut state, resolution, config, &mut stats);
        scores[side.index()] += outcome.points;
        counts.record(&outcome);

        debug!(
            snap,
            offense = %offense.team(),
            down,
            distance,
            yardline,
            play = %play,
            ?source,
            yards = outcome.yards,
            points = outcome.points,
            turnover = outcome.possession_changed,
            "snap"
        );
    }

    GameResult {
        home: home.team().clone(),
        away: away.team().clone(),
        home_score: scores[Side::Home.index()],
        away_score: scores[Side::Away.index()],
        stats,
        counts,
    }
}

/// Applies a resolved play to the state and credits the stat line.
pub fn apply(
    state: &mut GameState,
    resolution: Resolution,
    config: &SimConfig,
    stats: &mut PlayerStatLine,
) -> PlayOutcome {
    let mut yards = 0.0;
    let mut points = 0;
    let possession_changed;

    match &resolution {
        Resolution::Run { carrier, yards: raw } => {
            let (transition, gained) = state.apply_gain(*raw);
            yards = gained;
            stats.add(StatKind::RushYards, carrier, gained);
            if transition == Transition::Touchdown {
                stats.add(StatKind::RushTds, carrier, 1.0);
                points = TOUCHDOWN_POINTS;
                state.kickoff_after_score(config.kickoff_yardline);
            }
            possession_changed = transition != Transition::FirstDown
                && transition != Transition::NextDown;
        }
        Resolution::Pass { passer, target, yards: raw, complete, intercepted: true } => {
            debug_assert!(!complete);
            stats.add(StatKind::PassYards, passer, 0.0);
            stats.add(StatKind::RecYards, target, 0.0);
            stats.add(StatKind::Interceptions, passer, 1.0);
            let spot = state.yardline - raw;
            state.turnover_at(spot, config.touchback_yardline);
            possession_changed = true;
        }
        Resolution::Pass { passer, target, yards: raw, complete, intercepted: false } => {
            let (transition, gained) = state.apply_gain(if *complete { *raw } else { 0.0 });
            yards = gained;
            stats.add(StatKind::PassYards, passer, gained);
            stats.add(StatKind::RecYards, target, gained);
            if *complete {
                stats.add(StatKind::Receptions, target, 1.0);
            }
            if transition == Transition::Touchdown {
                stats.add(StatKind::PassTds, passer, 1.0);
                stats.add(StatKind::RecTds, target, 1.0);
                points = TOUCHDOWN_POINTS;
                state.kickoff_after_score(config.kickoff_yardline);
            }
            possession_changed = transition != Transition::FirstDown
                && transition != Transition::NextDown;
        }
        Resolution::FieldGoal { made, .. } => {
            if *made {
                points = FIELD_GOAL_POINTS;
                state.kickoff_after_score(config.kickoff_yardline);
            } else {
                state.flip();
            }
            possession_changed = true;
        }
        Resolution::Punt { net_yards, .. } => {
            yards = *net_yards;
            let spot = state.yardline - net_yards;
            state.turnover_at(spot, config.touchback_yardline);
            possession_changed = true;
        }
    }

    PlayOutcome { resolution, yards, points, possession_changed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playcall::PlaycallProfile;
    use crate::testing;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(yards: f64) -> Resolution {
        Resolution::Run { carrier: "rb".into(), yards }
    }

    #[test]
    fn test_opening_possession_is_a_coin_flip() {
        let fixture = testing::engine_fixture();
        let always_run = PlaycallBook::from_rows(testing::uniform_playcalls(
            ["phi-coach", "dal-coach"],
            [0.0, 1.0, 0.0, 0.0],
        ));
        let config = SimConfig { snaps_per_game: 1, ..fixture.config.clone() };

        let games = 2000;
        let mut home_first = 0;
        for seed in 0..games {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = simulate_game(
                &fixture.models,
                &always_run,
                &config,
                &fixture.home,
                &fixture.away,
                &mut rng,
            );
            let (carrier, _) = result.counts.carries.iter().next().unwrap();
            if carrier.as_str().starts_with("phi-") {
                home_first += 1;
            }
        }
        let share = f64::from(home_first) / games as f64;
        assert!((0.45..0.55).contains(&share), "home share = {share}");
    }

    #[test]
    fn test_run_to_goal_line_scores_once() {
        let config = SimConfig::default();
        let mut state = GameState { down: 1, distance: 10.0, yardline: 7.0, offense: Side::Home };
        let mut stats = PlayerStatLine::new();

        let outcome = apply(&mut state, run(7.0), &config, &mut stats);
        assert_eq!(outcome.points, TOUCHDOWN_POINTS);
        assert_eq!(outcome.yards, 7.0);
        assert!(outcome.possession_changed);
        assert_eq!(stats.get(StatKind::RushTds, &"rb".into()), 1.0);
        assert_eq!(state, GameState::kickoff(Side::Away, config.kickoff_yardline));
    }

    #[test]
    fn test_long_run_credits_capped_yards() {
        let config = SimConfig::default();
        let mut state = GameState { down: 2, distance: 4.0, yardline: 30.0, offense: Side::Away };
        let mut stats = PlayerStatLine::new();
        apply(&mut state, run(55.0), &config, &mut stats);
        assert_eq!(stats.get(StatKind::RushYards, &"rb".into()), 30.0);
    }

    #[test]
    fn test_incomplete_pass_still_records_zero_yards() {
        let config = SimConfig::default();
        let mut state = GameState::kickoff(Side::Home, 65.0);
        let mut stats = PlayerStatLine::new();
        let resolution = Resolution::Pass {
            passer: "qb".into(),
            target: "wr".into(),
            yards: 0.0,
            complete: false,
            intercepted: false,
        };
        let outcome = apply(&mut state, resolution, &config, &mut stats);
        assert!(!outcome.possession_changed);
        assert!(stats.contains(StatKind::PassYards, &"qb".into()));
        assert!(stats.contains(StatKind::RecYards, &"wr".into()));
        assert!(!stats.contains(StatKind::Receptions, &"wr".into()));
        assert_eq!(state.down, 2);
    }

    #[test]
    fn test_interception_moves_ball_and_flips() {
        let config = SimConfig::default();
        let mut state = GameState { down: 3, distance: 7.0, yardline: 60.0, offense: Side::Home };
        let mut stats = PlayerStatLine::new();
        let resolution = Resolution::Pass {
            passer: "qb".into(),
            target: "wr".into(),
            yards: 25.0,
            complete: false,
            intercepted: true,
        };
        let outcome = apply(&mut state, resolution, &config, &mut stats);
        assert!(outcome.possession_changed);
        assert_eq!(stats.get(StatKind::Interceptions, &"qb".into()), 1.0);
        // dead at the 35 in the passer's frame, 65 for the new offense
        assert_eq!((state.offense, state.yardline), (Side::Away, 65.0));
    }

    #[test]
    fn test_field_goal_make_and_miss() {
        let config = SimConfig::default();
        let mut stats = PlayerStatLine::new();

        let mut state = GameState { down: 4, distance: 6.0, yardline: 18.0, offense: Side::Home };
        let made = Resolution::FieldGoal { kicker: "k".into(), made: true };
        assert_eq!(apply(&mut state, made, &config, &mut stats).points, FIELD_GOAL_POINTS);
        assert_eq!(state, GameState::kickoff(Side::Away, 65.0));

        let mut state = GameState { down: 4, distance: 6.0, yardline: 30.0, offense: Side::Home };
        let missed = Resolution::FieldGoal { kicker: "k".into(), made: false };
        let outcome = apply(&mut state, missed, &config, &mut stats);
        assert_eq!(outcome.points, 0);
        // no mirroring on a miss
        assert_eq!((state.offense, state.yardline, state.down), (Side::Away, 30.0, 1));
    }

    #[test]
    fn test_punt_into_end_zone_is_touchback() {
        let config = SimConfig::default();
        let mut stats = PlayerStatLine::new();
        let mut state = GameState { down: 4, distance: 9.0, yardline: 38.0, offense: Side::Away };
        let punt = Resolution::Punt { punter: "p".into(), net_yards: 45.0 };
        apply(&mut state, punt, &config, &mut stats);
        assert_eq!((state.offense, state.yardline), (Side::Home, config.touchback_yardline));
        assert!(stats.is_empty());
    }

    #[test]
    fn test_game_runs_fixed_snap_count() {
        let fixture = testing::engine_fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let result = simulate_game(
            &fixture.models,
            &fixture.playcalls,
            &fixture.config,
            &fixture.home,
            &fixture.away,
            &mut rng,
        );
        assert_eq!(result.plays(), fixture.config.snaps_per_game);
        assert_eq!(result.home.as_str(), "PHI");
        assert_eq!(result.away.as_str(), "DAL");
    }

    #[test]
    fn test_always_punting_never_scores() {
        let fixture = testing::engine_fixture();
        let book = PlaycallBook::from_rows(testing::uniform_playcalls(
            ["phi-coach", "dal-coach"],
            PlaycallProfile::always(PlayType::Punt).probabilities(),
        ));
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let result = simulate_game(
            &fixture.models,
            &book,
            &fixture.config,
            &fixture.home,
            &fixture.away,
            &mut rng,
        );
        assert_eq!((result.home_score, result.away_score), (0, 0));
        assert_eq!(result.counts.calls(PlayType::Punt), fixture.config.snaps_per_game);
    }

    fn is_sum_of_threes_and_sevens(score: u32) -> bool {
        (0..=score / 7).any(|sevens| (score - sevens * 7) % 3 == 0)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_scores_are_threes_and_sevens(seed in any::<u64>()) {
            let fixture = testing::engine_fixture();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = simulate_game(
                &fixture.models,
                &fixture.playcalls,
                &fixture.config,
                &fixture.home,
                &fixture.away,
                &mut rng,
            );
            prop_assert!(is_sum_of_threes_and_sevens(result.home_score));
            prop_assert!(is_sum_of_threes_and_sevens(result.away_score));
            prop_assert_eq!(result.plays(), fixture.config.snaps_per_game);
        }
    }
}
