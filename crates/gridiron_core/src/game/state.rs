//! Possession and field position of one in-flight game.

use crate::types::DistanceBucket;
use serde::{Deserialize, Serialize};

pub const FIRST_DOWN_DISTANCE: f64 = 10.0;
pub const REDZONE_YARDLINE: f64 = 20.0;
/// Deepest spot the offense can be pushed back to (its own 1).
pub const OWN_GOAL_LIMIT: f64 = 99.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }
}

/// What a yardage play did to the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Touchdown,
    TurnoverOnDowns,
    FirstDown,
    NextDown,
}

/// `yardline` counts yards to the opponent's goal (0 = goal line, 100 = own goal).
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub down: u8,
    /// Yards to go. Negative after a gain past the marker.
    pub distance: f64,
    pub yardline: f64,
    pub offense: Side,
}

impl GameState {
    pub fn kickoff(offense: Side, kickoff_yardline: f64) -> Self {
        Self { down: 1, distance: FIRST_DOWN_DISTANCE, yardline: kickoff_yardline, offense }
    }

    pub fn defense(&self) -> Side {
        self.offense.opponent()
    }

    pub fn is_redzone(&self) -> bool {
        self.yardline <= REDZONE_YARDLINE
    }

    pub fn bucket(&self) -> DistanceBucket {
        DistanceBucket::classify(self.down, self.distance)
    }

    /// Hands the ball to the other side where it lies, first and ten.
    pub fn flip(&mut self) {
        self.offense = self.offense.opponent();
        self.down = 1;
        self.distance = FIRST_DOWN_DISTANCE;
    }

    /// Other side receives the kickoff after a score.
    pub fn kickoff_after_score(&mut self, kickoff_yardline: f64) {
        self.flip();
        self.yardline = kickoff_yardline;
    }

    /// Change of possession with the ball dead at `spot` (current offense's frame).
    ///
    /// The new offense's yardline is `100 - spot`. A ball dead at or past the
    /// goal line is a touchback.
    pub fn turnover_at(&mut self, spot: f64, touchback_yardline: f64) {
        self.flip();
        self.yardline = if spot <= 0.0 {
            touchback_yardline
        } else {
            (100.0 - spot).clamp(1.0, OWN_GOAL_LIMIT)
        };
    }

    /// Applies a yardage gain and resolves the series.
    ///
    /// The gain is capped at the goal line and losses stop at the offense's
    /// own 1. Returns the transition and the yards actually credited.
    /// On a touchdown the state is left at yardline 0 for the caller to reset.
    pub fn apply_gain(&mut self, yards: f64) -> (Transition, f64) {
        let gained = yards.min(self.yardline).max(self.yardline - OWN_GOAL_LIMIT);
        self.yardline -= gained;
        self.distance -= gained;

        let transition = if self.yardline <= 0.0 {
            self.yardline = 0.0;
            Transition::Touchdown
        } else if self.down == 4 && self.distance > 0.0 {
            let spot = self.yardline;
            self.flip();
            self.yardline = (100.0 - spot).min(OWN_GOAL_LIMIT);
            Transition::TurnoverOnDowns
        } else if self.distance <= 0.0 {
            self.down = 1;
            self.distance = FIRST_DOWN_DISTANCE;
            Transition::FirstDown
        } else {
            self.down += 1;
            Transition::NextDown
        };
        (transition, gained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(down: u8, distance: f64, yardline: f64) -> GameState {
        GameState { down, distance, yardline, offense: Side::Home }
    }

    #[test]
    fn test_gain_reaching_goal_line_exactly_is_touchdown() {
        let mut s = state(2, 8.0, 12.0);
        let (transition, gained) = s.apply_gain(12.0);
        assert_eq!(transition, Transition::Touchdown);
        assert_eq!(gained, 12.0);
        assert_eq!(s.yardline, 0.0);
    }

    #[test]
    fn test_gain_is_capped_at_goal_line() {
        let mut s = state(1, 10.0, 5.0);
        let (transition, gained) = s.apply_gain(37.5);
        assert_eq!(transition, Transition::Touchdown);
        assert_eq!(gained, 5.0);
    }

    #[test]
    fn test_touchdown_beats_fourth_down() {
        let mut s = state(4, 15.0, 3.0);
        assert_eq!(s.apply_gain(3.0).0, Transition::Touchdown);
    }

    #[test]
    fn test_turnover_on_downs_mirrors() {
        let mut s = state(4, 3.0, 40.0);
        let (transition, _) = s.apply_gain(1.0);
        assert_eq!(transition, Transition::TurnoverOnDowns);
        assert_eq!(s.offense, Side::Away);
        assert_eq!(s.yardline, 61.0);
        assert_eq!((s.down, s.distance), (1, FIRST_DOWN_DISTANCE));
    }

    #[test]
    fn test_first_down_and_next_down() {
        let mut s = state(3, 4.0, 50.0);
        assert_eq!(s.apply_gain(6.0).0, Transition::FirstDown);
        assert_eq!((s.down, s.distance, s.yardline), (1, 10.0, 44.0));

        let mut s = state(1, 10.0, 50.0);
        assert_eq!(s.apply_gain(-3.0).0, Transition::NextDown);
        assert_eq!((s.down, s.distance, s.yardline), (2, 13.0, 53.0));
    }

    #[test]
    fn test_loss_stops_at_own_one() {
        let mut s = state(1, 10.0, 95.0);
        let (_, gained) = s.apply_gain(-12.0);
        assert_eq!(gained, -4.0);
        assert_eq!(s.yardline, OWN_GOAL_LIMIT);
    }

    #[test]
    fn test_turnover_spot_mirrors_or_touchback() {
        let mut s = state(2, 10.0, 60.0);
        s.turnover_at(15.0, 80.0);
        assert_eq!((s.offense, s.yardline), (Side::Away, 85.0));

        let mut s = state(4, 10.0, 40.0);
        s.turnover_at(-6.0, 80.0);
        assert_eq!(s.yardline, 80.0);

        let mut s = state(4, 10.0, 95.0);
        s.turnover_at(104.0, 80.0);
        assert_eq!(s.yardline, 1.0);
    }

    #[test]
    fn test_kickoff_after_score_flips() {
        let mut s = state(3, 2.0, 0.0);
        s.kickoff_after_score(65.0);
        assert_eq!(s, GameState::kickoff(Side::Away, 65.0));
    }

    proptest! {
        #[test]
        fn prop_yardline_stays_on_field(
            start in 1.0f64..99.0,
            gains in proptest::collection::vec(-30.0f64..80.0, 1..40),
        ) {
            let mut s = state(1, 10.0, start);
            for gain in gains {
                let (transition, _) = s.apply_gain(gain);
                if transition == Transition::Touchdown {
                    prop_assert_eq!(s.yardline, 0.0);
                    s.kickoff_after_score(65.0);
                }
                prop_assert!(s.yardline > 0.0 && s.yardline <= OWN_GOAL_LIMIT);
                prop_assert!((1..=4).contains(&s.down));
            }
        }
    }
}
