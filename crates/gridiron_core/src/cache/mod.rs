//! Parameter cache: fitted (category, entity) → parameters.
//! MessagePack + LZ4 on disk with a SHA-256 integrity trailer.

pub mod error;
pub mod format;
pub mod store;

pub use error::CacheError;
pub use format::{checksum_hex, decode, encode};
pub use store::{FileParameterStore, MemoryParameterStore};

use crate::fit::ModelParams;
use crate::types::{Category, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Every fitted parameter set of one engine, written once after fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterCache {
    pub version: u32,
    /// Fallback threshold the entries were fitted with.
    pub min_entity_samples: usize,
    entries: BTreeMap<Category, BTreeMap<EntityId, ModelParams>>,
}

impl ParameterCache {
    pub fn new(min_entity_samples: usize) -> Self {
        Self { version: CACHE_SCHEMA_VERSION, min_entity_samples, entries: BTreeMap::new() }
    }

    pub fn insert(&mut self, category: Category, entity: EntityId, params: ModelParams) {
        self.entries.entry(category).or_default().insert(entity, params);
    }

    pub fn extend(&mut self, category: Category, fitted: BTreeMap<EntityId, ModelParams>) {
        self.entries.entry(category).or_default().extend(fitted);
    }

    pub fn get(&self, category: Category, entity: &EntityId) -> Option<ModelParams> {
        self.entries.get(&category)?.get(entity).copied()
    }

    pub fn category(&self, category: Category) -> Option<&BTreeMap<EntityId, ModelParams>> {
        self.entries.get(&category)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether entries were fitted under the current schema and threshold.
    pub fn is_compatible(&self, min_entity_samples: usize) -> bool {
        self.version == CACHE_SCHEMA_VERSION && self.min_entity_samples == min_entity_samples
    }

    /// Required pairs with no entry.
    pub fn missing<'a>(
        &self,
        required: &'a BTreeMap<Category, BTreeSet<EntityId>>,
    ) -> Vec<(Category, &'a EntityId)> {
        required
            .iter()
            .flat_map(|(category, entities)| entities.iter().map(move |e| (*category, e)))
            .filter(|(category, entity)| self.get(*category, entity).is_none())
            .collect()
    }
}

/// Persistent home of the [`ParameterCache`].
pub trait ParameterStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<ParameterCache>, CacheError>;

    fn save(&self, cache: &ParameterCache) -> Result<(), CacheError>;
}
