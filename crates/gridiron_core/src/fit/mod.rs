//! # Distribution Fitter
//!
//! Fits one parametric model per (category, entity):
//! - `punt`: Normal
//! - `rush`, `rush_def`, `air_yards`, `yards_after_catch`, `pass_def`: GEV
//! - `field_goal`: logistic regression on distance-to-goal
//!
//! Entities with too few observations (or the league-average sentinel) get
//! the category-wide population fit instead. The policy is an explicit
//! threshold check, see [`DistributionFitter::uses_population`].

pub mod gev;
pub mod logistic;
pub mod simplex;

pub use gev::Gev;
pub use logistic::FieldGoalModel;

use crate::data::{FieldGoalAttempt, ObservationSet};
use crate::error::{Result, SimError};
use crate::types::{Category, EntityId, ModelFamily};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Fitted parameters as persisted in the parameter cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelParams {
    Normal { mean: f64, std_dev: f64 },
    Gev { shape: f64, loc: f64, scale: f64 },
    Logistic { intercept: f64, coefficient: f64 },
}

impl ModelParams {
    pub fn family(&self) -> ModelFamily {
        match self {
            ModelParams::Normal { .. } => ModelFamily::Normal,
            ModelParams::Gev { .. } => ModelFamily::GeneralizedExtremeValue,
            ModelParams::Logistic { .. } => ModelFamily::Logistic,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Sampler {
    Normal(Normal<f64>),
    Gev(Gev),
}

/// A yardage distribution ready to draw from.
#[derive(Debug, Clone, Copy)]
pub struct FittedDistribution {
    params: ModelParams,
    sampler: Sampler,
}

impl FittedDistribution {
    pub fn params(&self) -> ModelParams {
        self.params
    }

    /// One independent variate.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match &self.sampler {
            Sampler::Normal(normal) => normal.sample(rng),
            Sampler::Gev(gev) => gev.sample(rng),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FittedModel {
    Distribution(FittedDistribution),
    FieldGoal(FieldGoalModel),
}

impl FittedModel {
    /// Rebuilds a model from stored parameters. `None` for invalid values.
    pub fn from_params(params: ModelParams) -> Option<Self> {
        let model = match params {
            ModelParams::Normal { mean, std_dev } => {
                // rand_distr accepts a negative spread
                if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
                    return None;
                }
                let normal = Normal::new(mean, std_dev).ok()?;
                FittedModel::Distribution(FittedDistribution {
                    params,
                    sampler: Sampler::Normal(normal),
                })
            }
            ModelParams::Gev { shape, loc, scale } => {
                FittedModel::Distribution(FittedDistribution {
                    params,
                    sampler: Sampler::Gev(Gev::new(shape, loc, scale)?),
                })
            }
            ModelParams::Logistic { intercept, coefficient } => {
                FittedModel::FieldGoal(FieldGoalModel::new(intercept, coefficient)?)
            }
        };
        Some(model)
    }

    pub fn params(&self) -> ModelParams {
        match self {
            FittedModel::Distribution(dist) => dist.params,
            FittedModel::FieldGoal(model) => ModelParams::Logistic {
                intercept: model.intercept,
                coefficient: model.coefficient,
            },
        }
    }

    pub fn as_distribution(&self) -> Option<&FittedDistribution> {
        match self {
            FittedModel::Distribution(dist) => Some(dist),
            FittedModel::FieldGoal(_) => None,
        }
    }

    pub fn as_field_goal(&self) -> Option<&FieldGoalModel> {
        match self {
            FittedModel::FieldGoal(model) => Some(model),
            FittedModel::Distribution(_) => None,
        }
    }
}

/// Historical observations for one category.
#[derive(Debug, Clone)]
pub enum CategoryObservations {
    Yardage(ObservationSet),
    FieldGoal(Vec<FieldGoalAttempt>),
}

impl CategoryObservations {
    fn entity_count(&self, entity: &EntityId) -> usize {
        match self {
            CategoryObservations::Yardage(set) => set.entity(entity).len(),
            CategoryObservations::FieldGoal(attempts) => {
                attempts.iter().filter(|a| &a.kicker == entity).count()
            }
        }
    }
}

/// Whether a fit used the entity's own sample or the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitSource {
    Entity,
    Population,
}

#[derive(Debug, Clone)]
pub struct DistributionFitter {
    min_entity_samples: usize,
}

impl DistributionFitter {
    pub fn new(min_entity_samples: usize) -> Self {
        Self { min_entity_samples }
    }

    pub fn min_entity_samples(&self) -> usize {
        self.min_entity_samples
    }

    /// Sentinel ids and entities with `min_entity_samples` observations or
    /// fewer are fitted on the whole category.
    pub fn uses_population(&self, entity: &EntityId, sample_count: usize) -> bool {
        entity.is_league_average() || sample_count <= self.min_entity_samples
    }

    /// Fits the model for one (category, entity) pair.
    pub fn fit(
        &self,
        category: Category,
        entity: &EntityId,
        observations: &CategoryObservations,
    ) -> Result<FittedModel> {
        let (params, source) = self.fit_params(category, entity, observations)?;
        debug!(%category, %entity, ?source, "fitted model");
        FittedModel::from_params(params).ok_or(SimError::EmptyPopulation { category })
    }

    /// Fits every entity in `entities`, sharing one population fit between
    /// all entities that fall back to it.
    pub fn fit_all<'a, I>(
        &self,
        category: Category,
        entities: I,
        observations: &CategoryObservations,
    ) -> Result<BTreeMap<EntityId, ModelParams>>
    where
        I: IntoIterator<Item = &'a EntityId>,
    {
        let mut population: Option<ModelParams> = None;
        let mut fitted = BTreeMap::new();
        let mut fallbacks = 0usize;

        for entity in entities {
            if fitted.contains_key(entity) {
                continue;
            }
            let count = observations.entity_count(entity);
            let params = if self.uses_population(entity, count) {
                fallbacks += 1;
                match population {
                    Some(params) => params,
                    None => {
                        let params = self.fit_population(category, observations)?;
                        population = Some(params);
                        params
                    }
                }
            } else {
                self.fit_entity(category, entity, observations)?
            };
            fitted.insert(entity.clone(), params);
        }

        debug!(%category, entities = fitted.len(), fallbacks, "fitted category");
        Ok(fitted)
    }

    fn fit_params(
        &self,
        category: Category,
        entity: &EntityId,
        observations: &CategoryObservations,
    ) -> Result<(ModelParams, FitSource)> {
        let count = observations.entity_count(entity);
        if self.uses_population(entity, count) {
            Ok((self.fit_population(category, observations)?, FitSource::Population))
        } else {
            Ok((self.fit_entity(category, entity, observations)?, FitSource::Entity))
        }
    }

    fn fit_entity(
        &self,
        category: Category,
        entity: &EntityId,
        observations: &CategoryObservations,
    ) -> Result<ModelParams> {
        match observations {
            CategoryObservations::Yardage(set) => fit_yardage(category, set.entity(entity)),
            CategoryObservations::FieldGoal(attempts) => {
                let samples: Vec<(f64, bool)> = attempts
                    .iter()
                    .filter(|a| &a.kicker == entity)
                    .map(|a| (a.distance, a.made))
                    .collect();
                fit_field_goal(category, &samples)
            }
        }
    }

    fn fit_population(
        &self,
        category: Category,
        observations: &CategoryObservations,
    ) -> Result<ModelParams> {
        match observations {
            CategoryObservations::Yardage(set) => fit_yardage(category, set.population()),
            CategoryObservations::FieldGoal(attempts) => {
                let samples: Vec<(f64, bool)> =
                    attempts.iter().map(|a| (a.distance, a.made)).collect();
                fit_field_goal(category, &samples)
            }
        }
    }
}

fn fit_yardage(category: Category, data: &[f64]) -> Result<ModelParams> {
    if data.is_empty() {
        return Err(SimError::EmptyPopulation { category });
    }
    match category.family() {
        ModelFamily::Normal => {
            let n = data.len() as f64;
            let mean = data.iter().sum::<f64>() / n;
            let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
            Ok(ModelParams::Normal { mean, std_dev: variance.sqrt() })
        }
        ModelFamily::GeneralizedExtremeValue => {
            let gev = Gev::fit(data).ok_or(SimError::EmptyPopulation { category })?;
            Ok(ModelParams::Gev { shape: gev.shape(), loc: gev.loc(), scale: gev.scale() })
        }
        ModelFamily::Logistic => Err(SimError::DatasetUnavailable(format!(
            "{category} observations are not yardage samples"
        ))),
    }
}

fn fit_field_goal(category: Category, samples: &[(f64, bool)]) -> Result<ModelParams> {
    let model = FieldGoalModel::fit(samples).ok_or(SimError::EmptyPopulation { category })?;
    Ok(ModelParams::Logistic { intercept: model.intercept, coefficient: model.coefficient })
}
