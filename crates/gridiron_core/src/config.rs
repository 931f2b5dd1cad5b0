//! # Engine Configuration
//!
//! Every tuning constant of the simulator lives here so calibration runs can
//! swap them without touching the play resolvers.
//!
//! ```rust
//! use gridiron_core::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let seeded = SimConfig::seeded(7);
//! assert_eq!(seeded.seed, Some(7));
//! assert_eq!(config.snaps_per_game, 124);
//! ```

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::{env, fs};

/// Environment variable naming a JSON file that overrides the defaults.
pub const CONFIG_PATH_ENV: &str = "GRIDIRON_SIM_CONFIG_PATH";

/// Run play blend: `(carrier·c + defense·d + line·l) / (c + d + l)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunBlend {
    pub carrier: f64,
    pub defense: f64,
    /// Offensive line yards-before-contact weight. Disabled until calibrated.
    pub line: f64,
}

impl Default for RunBlend {
    fn default() -> Self {
        Self { carrier: 1.0, defense: 1.0, line: 0.0 }
    }
}

impl RunBlend {
    pub fn blend(&self, carrier: f64, defense: f64, line: f64) -> f64 {
        (self.carrier * carrier + self.defense * defense + self.line * line)
            / (self.carrier + self.defense + self.line)
    }
}

/// Completed pass blend: `(air·a + yac·y + defense·d) / (a/2 + y/2 + d)`
///
/// Air yards plus YAC form one offensive estimate of the total gain, which
/// is averaged against the defense's yards-allowed sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassBlend {
    pub air_yards: f64,
    pub yards_after_catch: f64,
    pub defense: f64,
}

impl Default for PassBlend {
    fn default() -> Self {
        Self { air_yards: 1.0, yards_after_catch: 1.0, defense: 1.0 }
    }
}

impl PassBlend {
    pub fn blend(&self, air_yards: f64, yards_after_catch: f64, defense: f64) -> f64 {
        (self.air_yards * air_yards
            + self.yards_after_catch * yards_after_catch
            + self.defense * defense)
            / (0.5 * self.air_yards + 0.5 * self.yards_after_catch + self.defense)
    }
}

/// Punt blend: `(return·r + punt·p) / (r + p)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuntBlend {
    pub returner: f64,
    pub punt: f64,
}

impl Default for PuntBlend {
    fn default() -> Self {
        Self { returner: 1.0, punt: 1.0 }
    }
}

impl PuntBlend {
    pub fn blend(&self, return_yards: f64, punt_yards: f64) -> f64 {
        (self.returner * return_yards + self.punt * punt_yards) / (self.returner + self.punt)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Plays per game (league-average offensive snaps, both teams).
    pub snaps_per_game: u32,
    /// Yardline assigned at game start and after every score.
    pub kickoff_yardline: f64,
    /// Yardline given to the receiving offense after a touchback.
    pub touchback_yardline: f64,
    /// Entities with this many observations or fewer use the population fit.
    pub min_entity_samples: usize,
    /// Net punt yards used when the blended punt is non-positive.
    pub punt_fallback_yards: f64,
    pub run_blend: RunBlend,
    pub pass_blend: PassBlend,
    pub punt_blend: PuntBlend,
    /// Worker count for parallel runs. `None` uses every available core.
    pub workers: Option<usize>,
    /// Master seed. `None` draws one from the OS per run.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            snaps_per_game: 124,
            kickoff_yardline: 65.0,
            touchback_yardline: 80.0,
            min_entity_samples: 6,
            punt_fallback_yards: 20.0,
            run_blend: RunBlend::default(),
            pass_blend: PassBlend::default(),
            punt_blend: PuntBlend::default(),
            workers: None,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Default tuning with a fixed master seed.
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    /// Enables the offensive-line term of the run blend.
    pub fn line_weighted() -> Self {
        let mut cfg = Self::default();
        cfg.run_blend.line = 1.0;
        cfg
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SimError::InvalidConfig(e.to_string()))
    }

    /// Loads the file named by [`CONFIG_PATH_ENV`] if set, else the defaults.
    pub fn from_env_or_default() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            SimError::InvalidConfig(format!("Failed to read {CONFIG_PATH_ENV}='{path}': {e}"))
        })?;
        let config = Self::from_json(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.snaps_per_game == 0 {
            return Err(SimError::InvalidConfig("snaps_per_game must be positive".into()));
        }
        for (name, yardline) in [
            ("kickoff_yardline", self.kickoff_yardline),
            ("touchback_yardline", self.touchback_yardline),
        ] {
            if !(yardline > 0.0 && yardline < 100.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must lie strictly inside the field, got {yardline}"
                )));
            }
        }
        if !(self.punt_fallback_yards.is_finite() && self.punt_fallback_yards > 0.0) {
            return Err(SimError::InvalidConfig("punt_fallback_yards must be positive".into()));
        }

        let weights = [
            ("run_blend.carrier", self.run_blend.carrier),
            ("run_blend.defense", self.run_blend.defense),
            ("run_blend.line", self.run_blend.line),
            ("pass_blend.air_yards", self.pass_blend.air_yards),
            ("pass_blend.yards_after_catch", self.pass_blend.yards_after_catch),
            ("pass_blend.defense", self.pass_blend.defense),
            ("punt_blend.returner", self.punt_blend.returner),
            ("punt_blend.punt", self.punt_blend.punt),
        ];
        for (name, weight) in weights {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {weight}"
                )));
            }
        }
        let denominators = [
            self.run_blend.carrier + self.run_blend.defense + self.run_blend.line,
            0.5 * self.pass_blend.air_yards
                + 0.5 * self.pass_blend.yards_after_catch
                + self.pass_blend.defense,
            self.punt_blend.returner + self.punt_blend.punt,
        ];
        if denominators.iter().any(|d| *d <= 0.0) {
            return Err(SimError::InvalidConfig("blend weights must not all be zero".into()));
        }

        if self.workers == Some(0) {
            return Err(SimError::InvalidConfig("workers must be at least 1".into()));
        }
        Ok(())
    }
}
