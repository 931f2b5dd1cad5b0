//! # gridiron_core - Play-by-play Monte Carlo engine for American football
//!
//! Fits per-player and per-team outcome distributions from a season of
//! historical plays, then simulates complete games between two rosters one
//! snap at a time and aggregates box-score statistics across many games.
//!
//! ## Features
//! - GEV/Normal/logistic fits with a league-average fallback for thin samples
//! - Persisted parameter cache (msgpack + lz4 + sha256), refitted when stale
//! - Sequential and rayon-parallel runs that agree exactly for a given seed
//! - Per-game stat export as `{home}v{away}stats.csv`
//!
//! ```no_run
//! use gridiron_core::cache::FileParameterStore;
//! use gridiron_core::config::SimConfig;
//! use gridiron_core::data::Dataset;
//! use gridiron_core::{RunOptions, Simulator};
//!
//! # fn main() -> gridiron_core::Result<()> {
//! let dataset = Dataset::from_json_file("data/2024.json")?;
//! let store = FileParameterStore::new("data/params.cache");
//! let mut sim = Simulator::from_dataset(&dataset, &store, SimConfig::from_env_or_default()?)?;
//!
//! let (home, away) = ("PHI".into(), "DAL".into());
//! let summary = sim.run_parallel(&home, &away, 1_000, None, RunOptions::new().seed(7))?;
//! println!("{:.1} - {:.1}", summary.mean_home_score(), summary.mean_away_score());
//! sim.export_stats(&home, &away).write_csv("out")?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod data;
pub mod driver;
pub mod engine;
pub mod error;
pub mod export;
pub mod fit;
pub mod game;
pub mod models;
pub mod playcall;
pub mod projection;
pub mod stats;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::SimConfig;
pub use driver::{CancellationToken, Progress, RunOptions};
pub use engine::{SimulationSummary, Simulator};
pub use error::{Result, SimError};
pub use export::StatTable;
pub use projection::{project_season, team_summary, SeasonProjection};
pub use types::{Category, EntityId, PlayType, StatKind, TeamId};
