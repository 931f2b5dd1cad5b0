//! Read-only model set shared by every simulated game.
//!
//! Built once: loads the parameter cache if it covers every required
//! (category, entity) pair, otherwise fits all of them and persists the
//! result. Lookups for entities outside the set read the league-average
//! sentinel's model.

use crate::cache::{ParameterCache, ParameterStore};
use crate::config::SimConfig;
use crate::data::{PassRates, PlayRecordProvider, TeamRoster};
use crate::error::{Result, SimError};
use crate::fit::{
    CategoryObservations, DistributionFitter, FieldGoalModel, FittedDistribution, FittedModel,
    ModelParams,
};
use crate::types::{Category, EntityId};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{info, warn};

/// How the model set was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelOrigin {
    /// Loaded from the parameter store without fitting.
    Cache,
    /// Fitted from the historical records.
    Fitted,
}

#[derive(Debug, Clone)]
struct CategoryModels<M> {
    league: M,
    by_entity: HashMap<EntityId, M>,
}

impl<M> CategoryModels<M> {
    fn get(&self, entity: &EntityId) -> &M {
        self.by_entity.get(entity).unwrap_or(&self.league)
    }

    fn from_params<F>(entries: &BTreeMap<EntityId, ModelParams>, convert: F) -> Option<Self>
    where
        F: Fn(ModelParams) -> Option<M>,
    {
        let league = convert(*entries.get(&EntityId::league_average())?)?;
        let mut by_entity = HashMap::with_capacity(entries.len());
        for (entity, params) in entries {
            if !entity.is_league_average() {
                by_entity.insert(entity.clone(), convert(*params)?);
            }
        }
        Some(Self { league, by_entity })
    }
}

fn as_distribution(params: ModelParams) -> Option<FittedDistribution> {
    FittedModel::from_params(params)?.as_distribution().copied()
}

fn as_field_goal(params: ModelParams) -> Option<FieldGoalModel> {
    FittedModel::from_params(params)?.as_field_goal().copied()
}

#[derive(Debug, Clone)]
pub struct ModelSet {
    yardage: HashMap<Category, CategoryModels<FittedDistribution>>,
    field_goal: CategoryModels<FieldGoalModel>,
    pass_rates: PassRates,
    cache: ParameterCache,
    origin: ModelOrigin,
}

impl ModelSet {
    /// Loads or fits every model the given rosters need.
    ///
    /// Cache problems never fail the build: an unreadable, stale or
    /// incomplete cache is refitted, and a failed save is only logged.
    pub fn build<P>(
        records: &P,
        rosters: &[TeamRoster],
        store: &dyn ParameterStore,
        config: &SimConfig,
    ) -> Result<Self>
    where
        P: PlayRecordProvider + ?Sized,
    {
        let pass_rates = PassRates::from_attempts(&records.pass_attempts()?);
        let required = required_pairs(rosters);
        let threshold = config.min_entity_samples;

        match store.load() {
            Ok(Some(cache)) if !cache.is_compatible(threshold) => {
                info!(
                    version = cache.version,
                    threshold = cache.min_entity_samples,
                    "parameter cache was built with different settings, refitting"
                );
            }
            Ok(Some(cache)) => {
                let missing = cache.missing(&required);
                if !missing.is_empty() {
                    info!(missing = missing.len(), "parameter cache is incomplete, refitting");
                } else {
                    match Self::from_cache(cache, pass_rates.clone(), ModelOrigin::Cache) {
                        Ok(set) => {
                            info!(entries = set.cache.len(), "loaded fitted parameters from cache");
                            return Ok(set);
                        }
                        Err(category) => warn!(
                            %category,
                            "parameter cache holds invalid parameters, refitting"
                        ),
                    }
                }
            }
            Ok(None) => info!("no parameter cache found, fitting models"),
            Err(e) => warn!(
                error = %e,
                rebuildable = e.is_rebuildable(),
                "parameter cache unreadable, refitting"
            ),
        }

        let cache = fit_required(records, &required, threshold)?;
        if let Err(e) = store.save(&cache) {
            warn!(error = %e, "failed to persist parameter cache");
        }
        info!(entries = cache.len(), "fitted parameter cache");

        // freshly fitted parameters always convert; the error covers a
        // category whose population produced no usable fit
        Self::from_cache(cache, pass_rates, ModelOrigin::Fitted)
            .map_err(|category| SimError::EmptyPopulation { category })
    }

    /// Builds the set from stored parameters. Fails with the first category
    /// that lacks its league-average entry or holds invalid parameters.
    pub fn from_cache(
        cache: ParameterCache,
        pass_rates: PassRates,
        origin: ModelOrigin,
    ) -> std::result::Result<Self, Category> {
        let empty = BTreeMap::new();
        let mut yardage = HashMap::new();
        for category in Category::YARDAGE {
            let entries = cache.category(category).unwrap_or(&empty);
            let models = CategoryModels::from_params(entries, as_distribution).ok_or(category)?;
            yardage.insert(category, models);
        }
        let entries = cache.category(Category::FieldGoal).unwrap_or(&empty);
        let field_goal =
            CategoryModels::from_params(entries, as_field_goal).ok_or(Category::FieldGoal)?;

        Ok(Self { yardage, field_goal, pass_rates, cache, origin })
    }

    /// The yardage model for an entity, or the league-average model.
    /// `None` only for [`Category::FieldGoal`].
    pub fn distribution(
        &self,
        category: Category,
        entity: &EntityId,
    ) -> Option<&FittedDistribution> {
        self.yardage.get(&category).map(|models| models.get(entity))
    }

    /// One yardage draw; `0.0` for [`Category::FieldGoal`].
    pub fn draw<R: Rng + ?Sized>(&self, category: Category, entity: &EntityId, rng: &mut R) -> f64 {
        self.distribution(category, entity).map_or(0.0, |dist| dist.sample(rng))
    }

    pub fn field_goal(&self, kicker: &EntityId) -> &FieldGoalModel {
        self.field_goal.get(kicker)
    }

    pub fn pass_rates(&self) -> &PassRates {
        &self.pass_rates
    }

    pub fn cache(&self) -> &ParameterCache {
        &self.cache
    }

    pub fn origin(&self) -> ModelOrigin {
        self.origin
    }
}

/// Every (category, entity) pair the rosters can reach, plus the sentinel per category.
pub fn required_pairs(rosters: &[TeamRoster]) -> BTreeMap<Category, BTreeSet<EntityId>> {
    let mut required: BTreeMap<Category, BTreeSet<EntityId>> = BTreeMap::new();
    for category in Category::ALL {
        required.entry(category).or_default().insert(EntityId::league_average());
    }

    let mut add = |category: Category, entity: &EntityId| {
        required.entry(category).or_default().insert(entity.clone());
    };
    for roster in rosters {
        for carrier in roster.carriers() {
            add(Category::Rush, carrier);
        }
        add(Category::AirYards, &roster.qb);
        for target in roster.targets() {
            add(Category::YardsAfterCatch, target);
        }
        add(Category::Punt, &roster.punter);
        add(Category::FieldGoal, &roster.kicker);
        add(Category::RushDefense, &roster.team);
        add(Category::PassDefense, &roster.team);
    }
    required
}

fn fit_required<P>(
    records: &P,
    required: &BTreeMap<Category, BTreeSet<EntityId>>,
    threshold: usize,
) -> Result<ParameterCache>
where
    P: PlayRecordProvider + ?Sized,
{
    let fitter = DistributionFitter::new(threshold);
    let mut cache = ParameterCache::new(threshold);

    for (category, entities) in required {
        let observations = match category {
            Category::FieldGoal => CategoryObservations::FieldGoal(records.field_goal_attempts()?),
            _ => CategoryObservations::Yardage(records.observations(*category)?),
        };
        let fitted = fitter.fit_all(*category, entities, &observations)?;
        cache.extend(*category, fitted);
    }
    Ok(cache)
}
