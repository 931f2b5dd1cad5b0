//! Per-game stat lines and the session-wide aggregate store.

use crate::types::{EntityId, StatKind};
use std::collections::BTreeMap;

/// One game's box score, keyed by (statistic, player).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStatLine {
    values: BTreeMap<(StatKind, EntityId), f64>,
}

impl PlayerStatLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` to a player's running total. League-average stand-ins are
    /// not credited.
    pub fn add(&mut self, stat: StatKind, player: &EntityId, value: f64) {
        if player.is_league_average() {
            return;
        }
        *self.values.entry((stat, player.clone())).or_insert(0.0) += value;
    }

    /// Total for a player, `0.0` if never recorded.
    pub fn get(&self, stat: StatKind, player: &EntityId) -> f64 {
        self.values.get(&(stat, player.clone())).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, stat: StatKind, player: &EntityId) -> bool {
        self.values.contains_key(&(stat, player.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, &EntityId, f64)> {
        self.values.iter().map(|((stat, player), value)| (*stat, player, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-game values of every (statistic, player) across one session.
#[derive(Debug, Clone, Default)]
pub struct AggregateStatStore {
    series: BTreeMap<(StatKind, EntityId), Vec<f64>>,
    games: usize,
}

impl AggregateStatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.series.clear();
        self.games = 0;
    }

    /// Appends each recorded value of one finished game.
    pub fn merge(&mut self, line: &PlayerStatLine) {
        for (stat, player, value) in line.iter() {
            self.series.entry((stat, player.clone())).or_default().push(value);
        }
        self.games += 1;
    }

    pub fn series(&self, stat: StatKind, player: &EntityId) -> &[f64] {
        self.series.get(&(stat, player.clone())).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, &EntityId, &[f64])> {
        self.series.iter().map(|((stat, player), values)| (*stat, player, values.as_slice()))
    }

    /// Games merged since the last clear.
    pub fn games(&self) -> usize {
        self.games
    }

    /// Length of the longest series.
    pub fn max_len(&self) -> usize {
        self.series.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_line_accumulates_and_skips_sentinel() {
        let mut line = PlayerStatLine::new();
        let rb = EntityId::from("rb");
        line.add(StatKind::RushYards, &rb, 4.0);
        line.add(StatKind::RushYards, &rb, -1.5);
        line.add(StatKind::RushYards, &EntityId::league_average(), 10.0);

        assert_eq!(line.get(StatKind::RushYards, &rb), 2.5);
        assert_eq!(line.len(), 1);
        assert_eq!(line.get(StatKind::RushTds, &rb), 0.0);
    }

    #[test]
    fn test_store_appends_per_game_and_clears() {
        let qb = EntityId::from("qb");
        let mut store = AggregateStatStore::new();
        for yards in [210.0, 305.0] {
            let mut line = PlayerStatLine::new();
            line.add(StatKind::PassYards, &qb, yards);
            store.merge(&line);
        }
        store.merge(&PlayerStatLine::new());

        assert_eq!(store.series(StatKind::PassYards, &qb), &[210.0, 305.0]);
        assert_eq!(store.games(), 3);
        assert_eq!(store.max_len(), 2);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.games(), 0);
    }
}
