//! # Stats Exporter
//!
//! Reshapes the aggregate store into a rectangular table: one column per
//! (statistic, player), one row per game, shorter columns zero-padded at the
//! end. On disk the table is `{home}v{away}stats.csv` with two header rows
//! (statistic, then player id) and a leading game-index column.

use crate::error::{Result, SimError};
use crate::stats::AggregateStatStore;
use crate::types::{EntityId, StatKind, TeamId};
use std::path::{Path, PathBuf};

pub const FILE_SUFFIX: &str = "stats.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct StatColumn {
    pub stat: StatKind,
    pub player: EntityId,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatTable {
    matchup: String,
    rows: usize,
    columns: Vec<StatColumn>,
}

/// `{home}v{away}`
pub fn matchup_id(home: &TeamId, away: &TeamId) -> String {
    format!("{home}v{away}")
}

impl StatTable {
    /// Pads every series to the longest one (or to the game count, when larger).
    pub fn from_store(home: &TeamId, away: &TeamId, store: &AggregateStatStore) -> Self {
        let rows = store.max_len().max(store.games());
        let columns = store
            .iter()
            .map(|(stat, player, values)| {
                let mut values = values.to_vec();
                values.resize(rows, 0.0);
                StatColumn { stat, player: player.clone(), values }
            })
            .collect();
        Self { matchup: matchup_id(home, away), rows, columns }
    }

    pub fn matchup(&self) -> &str {
        &self.matchup
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[StatColumn] {
        &self.columns
    }

    pub fn column(&self, stat: StatKind, player: &EntityId) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.stat == stat && &c.player == player)
            .map(|c| c.values.as_slice())
    }

    /// Mean of a column; `0.0` when the player never recorded the stat.
    pub fn mean(&self, stat: StatKind, player: &EntityId) -> f64 {
        match self.column(stat, player) {
            Some(values) if !values.is_empty() => {
                values.iter().sum::<f64>() / values.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}{FILE_SUFFIX}", self.matchup)
    }

    /// Writes `dir/{matchup}stats.csv` and returns its path.
    pub fn write_csv(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());

        let mut writer = csv::Writer::from_path(&path)?;
        let stats = std::iter::once(String::new())
            .chain(self.columns.iter().map(|c| c.stat.as_str().to_string()));
        writer.write_record(stats)?;
        let players = std::iter::once(String::new())
            .chain(self.columns.iter().map(|c| c.player.to_string()));
        writer.write_record(players)?;

        for row in 0..self.rows {
            let record = std::iter::once(row.to_string())
                .chain(self.columns.iter().map(|c| c.values[row].to_string()));
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(path)
    }

    /// Reads a table written by [`StatTable::write_csv`].
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let matchup = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(FILE_SUFFIX))
            .unwrap_or_default()
            .to_string();

        let mut reader = csv::ReaderBuilder::new().has_headers(false).from_path(path)?;
        let mut records = reader.records();
        let malformed = |reason: &str| {
            SimError::DatasetUnavailable(format!("{}: {reason}", path.display()))
        };

        let stat_row = records.next().ok_or_else(|| malformed("missing header"))??;
        let player_row = records.next().ok_or_else(|| malformed("missing header"))??;

        let mut columns = Vec::with_capacity(stat_row.len().saturating_sub(1));
        for (label, player) in stat_row.iter().zip(player_row.iter()).skip(1) {
            let stat = StatKind::parse(label)
                .ok_or_else(|| malformed(&format!("unknown statistic '{label}'")))?;
            columns.push(StatColumn { stat, player: player.into(), values: Vec::new() });
        }

        let mut rows = 0;
        for record in records {
            let record = record?;
            for (column, field) in columns.iter_mut().zip(record.iter().skip(1)) {
                let value = field
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| malformed(&format!("bad value '{field}': {e}")))?;
                column.values.push(value);
            }
            rows += 1;
        }

        Ok(Self { matchup, rows, columns })
    }
}
