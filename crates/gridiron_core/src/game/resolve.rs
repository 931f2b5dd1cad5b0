//! One resolver per play type. Resolvers only sample; the game loop applies
//! the result to the state and the stat line.

use super::lineup::Lineup;
use super::state::GameState;
use crate::config::SimConfig;
use crate::models::ModelSet;
use crate::types::{Category, EntityId, PlayType};
use rand::Rng;

/// Shared, read-only inputs of a resolver.
pub struct PlayContext<'a> {
    pub models: &'a ModelSet,
    pub config: &'a SimConfig,
    pub offense: &'a Lineup,
    pub defense: &'a Lineup,
}

/// Raw result of a play before field position is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Run {
        carrier: EntityId,
        yards: f64,
    },
    Pass {
        passer: EntityId,
        target: EntityId,
        /// Net yards of a completion, air yards of an interception, else 0.
        yards: f64,
        complete: bool,
        intercepted: bool,
    },
    FieldGoal {
        kicker: EntityId,
        made: bool,
    },
    Punt {
        punter: EntityId,
        net_yards: f64,
    },
}

impl Resolution {
    pub fn play_type(&self) -> PlayType {
        match self {
            Resolution::Run { .. } => PlayType::Run,
            Resolution::Pass { .. } => PlayType::Pass,
            Resolution::FieldGoal { .. } => PlayType::FieldGoal,
            Resolution::Punt { .. } => PlayType::Punt,
        }
    }
}

pub fn resolve<R: Rng + ?Sized>(
    play: PlayType,
    ctx: &PlayContext<'_>,
    state: &GameState,
    rng: &mut R,
) -> Resolution {
    match play {
        PlayType::Run => run(ctx, rng),
        PlayType::Pass => pass(ctx, rng),
        PlayType::FieldGoal => field_goal(ctx, state, rng),
        PlayType::Punt => punt(ctx, rng),
    }
}

pub fn run<R: Rng + ?Sized>(ctx: &PlayContext<'_>, rng: &mut R) -> Resolution {
    let carrier = ctx.offense.pick_carrier(rng).clone();
    let carrier_yards = ctx.models.draw(Category::Rush, &carrier, rng);
    let defense_yards = ctx.models.draw(Category::RushDefense, ctx.defense.team(), rng);
    let yards = ctx.config.run_blend.blend(
        carrier_yards,
        defense_yards,
        ctx.offense.roster().line_yards_before_contact,
    );
    Resolution::Run { carrier, yards }
}

pub fn pass<R: Rng + ?Sized>(ctx: &PlayContext<'_>, rng: &mut R) -> Resolution {
    let passer = ctx.offense.roster().qb.clone();
    let target = ctx.offense.pick_target(rng).clone();
    let rates = ctx.models.pass_rates();

    let interception = rates.interception_probability(&passer, ctx.defense.team());
    if rng.gen::<f64>() < interception {
        let air_yards = ctx.models.draw(Category::AirYards, &passer, rng);
        return Resolution::Pass {
            passer,
            target,
            yards: air_yards,
            complete: false,
            intercepted: true,
        };
    }

    let completion = rates.completion_probability(&passer, &target);
    if rng.gen::<f64>() < completion {
        let air_yards = ctx.models.draw(Category::AirYards, &passer, rng);
        let yac = ctx.models.draw(Category::YardsAfterCatch, &target, rng);
        let allowed = ctx.models.draw(Category::PassDefense, ctx.defense.team(), rng);
        let yards = ctx.config.pass_blend.blend(air_yards, yac, allowed);
        Resolution::Pass { passer, target, yards, complete: true, intercepted: false }
    } else {
        Resolution::Pass { passer, target, yards: 0.0, complete: false, intercepted: false }
    }
}

/// Distance-to-goal is the current yardline.
pub fn field_goal<R: Rng + ?Sized>(
    ctx: &PlayContext<'_>,
    state: &GameState,
    rng: &mut R,
) -> Resolution {
    let kicker = ctx.offense.roster().kicker.clone();
    let probability = ctx.models.field_goal(&kicker).make_probability(state.yardline);
    let made = probability >= rng.gen::<f64>();
    Resolution::FieldGoal { kicker, made }
}

pub fn punt<R: Rng + ?Sized>(ctx: &PlayContext<'_>, rng: &mut R) -> Resolution {
    let punter = ctx.offense.roster().punter.clone();
    let distance = ctx.models.draw(Category::Punt, &punter, rng);
    let blended = ctx.config.punt_blend.blend(ctx.defense.roster().punt_return_yards, distance);
    let net_yards = if blended > 0.0 { blended } else { ctx.config.punt_fallback_yards };
    Resolution::Punt { punter, net_yards }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Side;
    use crate::testing;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_resolvers_match_play_type() {
        let fixture = testing::engine_fixture();
        let ctx = PlayContext {
            models: &fixture.models,
            config: &fixture.config,
            offense: &fixture.home,
            defense: &fixture.away,
        };
        let state = GameState::kickoff(Side::Home, 65.0);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        for play in PlayType::ALL {
            assert_eq!(resolve(play, &ctx, &state, &mut rng).play_type(), play);
        }
    }

    #[test]
    fn test_punt_net_is_always_positive() {
        let fixture = testing::engine_fixture();
        let ctx = PlayContext {
            models: &fixture.models,
            config: &fixture.config,
            offense: &fixture.home,
            defense: &fixture.away,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..500 {
            match punt(&ctx, &mut rng) {
                Resolution::Punt { net_yards, .. } => assert!(net_yards > 0.0),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_pass_outcomes_are_consistent() {
        let fixture = testing::engine_fixture();
        let ctx = PlayContext {
            models: &fixture.models,
            config: &fixture.config,
            offense: &fixture.home,
            defense: &fixture.away,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut completions = 0;
        for _ in 0..1_000 {
            if let Resolution::Pass { yards, complete, intercepted, passer, .. } = pass(&ctx, &mut rng)
            {
                assert_eq!(passer.as_str(), "phi-qb");
                assert!(!(complete && intercepted));
                if !complete && !intercepted {
                    assert_eq!(yards, 0.0);
                }
                completions += usize::from(complete);
            }
        }
        assert!(completions > 300 && completions < 900, "completions = {completions}");
    }
}
