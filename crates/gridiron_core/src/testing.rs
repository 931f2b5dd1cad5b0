//! Deterministic two-team league shared by the unit tests.

use crate::cache::MemoryParameterStore;
use crate::config::SimConfig;
use crate::data::{
    Dataset, FieldGoalAttempt, PassAttempt, PuntRecord, RushAttempt, TeamRoster,
};
use crate::fit::gev::Gev;
use crate::game::Lineup;
use crate::models::ModelSet;
use crate::playcall::{PlaycallBook, PlaycallRow};
use crate::types::{DistanceBucket, EntityId};
use rand::distributions::Distribution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use std::sync::OnceLock;

const TEAMS: [&str; 2] = ["PHI", "DAL"];

pub fn roster(team: &str) -> TeamRoster {
    let id = |slot: &str| EntityId::new(format!("{}-{slot}", team.to_lowercase()));
    TeamRoster {
        team: team.into(),
        coach: id("coach"),
        qb: id("qb"),
        rb_1: id("rb1"),
        rb_2: id("rb2"),
        wr_1: id("wr1"),
        wr_2: id("wr2"),
        wr_3: id("wr3"),
        wr_4: id("wr4"),
        te_1: id("te1"),
        te_2: id("te2"),
        kicker: id("k"),
        punter: id("p"),
        carry_shares: [0.1, 0.6, 0.3],
        target_shares: [0.08, 0.04, 0.24, 0.2, 0.12, 0.06, 0.18, 0.08],
        line_yards_before_contact: 2.0,
        punt_return_yards: 9.0,
    }
}

/// Pass/run split on early downs; kick on 4th down, field goal inside the redzone.
pub fn league_playcalls(coaches: [&str; 2]) -> Vec<PlaycallRow> {
    let mut rows = uniform_playcalls(coaches, [0.56, 0.44, 0.0, 0.0]);
    for row in rows.iter_mut().filter(|row| row.down == 4) {
        row.probabilities =
            if row.redzone { [0.1, 0.05, 0.85, 0.0] } else { [0.1, 0.05, 0.0, 0.85] };
    }
    rows
}

/// The same probabilities for every coach and situation.
pub fn uniform_playcalls(coaches: [&str; 2], probabilities: [f64; 4]) -> Vec<PlaycallRow> {
    let mut rows = Vec::new();
    for coach in coaches {
        for down in 1..=4 {
            for bucket in DistanceBucket::ALL {
                for redzone in [false, true] {
                    rows.push(PlaycallRow {
                        coach: coach.into(),
                        down,
                        bucket,
                        redzone,
                        probabilities,
                    });
                }
            }
        }
    }
    rows
}

fn yards<R: Rng>(dist: &Gev, rng: &mut R) -> f64 {
    dist.sample(rng).round()
}

/// PHI and DAL with a season of synthetic plays. `rb2` stays under the
/// default sample threshold so its rush fit falls back to the population.
pub fn league() -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let rosters: Vec<TeamRoster> = TEAMS.iter().map(|team| roster(team)).collect();

    let rush = Gev::new(-0.1, 2.5, 3.5).unwrap();
    let air = Gev::new(-0.15, 5.0, 6.0).unwrap();
    let after_catch = Gev::new(-0.2, 3.0, 3.5).unwrap();
    let punt = Normal::new(46.0_f64, 7.0).unwrap();

    let mut dataset = Dataset { rosters: rosters.clone(), ..Dataset::default() };
    for (index, offense) in rosters.iter().enumerate() {
        let defense = &rosters[1 - index].team;

        for (rusher, attempts) in [(&offense.qb, 20), (&offense.rb_1, 60), (&offense.rb_2, 4)] {
            for _ in 0..attempts {
                dataset.rushes.push(RushAttempt {
                    rusher: rusher.clone(),
                    defense: defense.clone(),
                    yards: yards(&rush, &mut rng),
                });
            }
        }

        let targets = offense.targets();
        for _ in 0..320 {
            let receiver = targets[rng.gen_range(0..targets.len())].clone();
            let interception = rng.gen_bool(0.025);
            let complete = !interception && rng.gen_bool(0.63);
            let (air_yards, yards_after_catch) = if complete {
                (yards(&air, &mut rng), yards(&after_catch, &mut rng))
            } else {
                (0.0, 0.0)
            };
            dataset.passes.push(PassAttempt {
                passer: offense.qb.clone(),
                receiver,
                defense: defense.clone(),
                complete,
                interception,
                air_yards: complete.then_some(air_yards),
                yards_after_catch: complete.then_some(yards_after_catch),
                yards_gained: Some(air_yards + yards_after_catch),
            });
        }

        for _ in 0..30 {
            dataset.punts.push(PuntRecord {
                punter: offense.punter.clone(),
                distance: punt.sample(&mut rng).round(),
            });
        }

        for _ in 0..60 {
            let distance = f64::from(rng.gen_range(2_u32..=45));
            let made = rng.gen_bool(1.0 / (1.0 + (-(6.0 - 0.12 * distance)).exp()));
            dataset.field_goals.push(FieldGoalAttempt {
                kicker: offense.kicker.clone(),
                distance,
                made,
            });
        }
    }

    let coaches = rosters.iter().map(|r| r.coach.as_str()).collect::<Vec<_>>();
    dataset.playcalls = league_playcalls([coaches[0], coaches[1]]);
    dataset
}

/// Fitted models and PHI (home) vs DAL (away) lineups, built once per test binary.
pub struct EngineFixture {
    pub models: ModelSet,
    pub playcalls: PlaycallBook,
    pub config: SimConfig,
    pub home: Lineup,
    pub away: Lineup,
}

pub fn engine_fixture() -> &'static EngineFixture {
    static FIXTURE: OnceLock<EngineFixture> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let dataset = league();
        let config = SimConfig::default();
        let models =
            ModelSet::build(&dataset, &dataset.rosters, &MemoryParameterStore::new(), &config)
                .expect("fixture models fit");
        EngineFixture {
            models,
            playcalls: PlaycallBook::from_rows(dataset.playcalls.clone()),
            config,
            home: Lineup::new(dataset.rosters[0].clone()).expect("home lineup"),
            away: Lineup::new(dataset.rosters[1].clone()).expect("away lineup"),
        }
    })
}
