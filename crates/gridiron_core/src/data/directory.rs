use crate::types::EntityId;
use std::collections::HashMap;

/// Full-name ↔ league-id lookup.
///
/// Names missing from the directory resolve to the league-average sentinel,
/// which is how unfilled depth-chart slots reach the engine.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    by_name: HashMap<String, EntityId>,
    by_id: HashMap<EntityId, String>,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, id: EntityId) {
        let name = name.into();
        self.by_id.insert(id.clone(), name.clone());
        self.by_name.insert(name, id);
    }

    pub fn id_for(&self, name: &str) -> EntityId {
        self.by_name
            .get(name.trim())
            .cloned()
            .unwrap_or_else(EntityId::league_average)
    }

    pub fn ids_for<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<EntityId> {
        names.into_iter().map(|name| self.id_for(name)).collect()
    }

    pub fn name_for(&self, id: &EntityId) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    /// Display label: the player's name when known, else the raw id.
    pub fn label(&self, id: &EntityId) -> String {
        self.name_for(id).map(str::to_string).unwrap_or_else(|| id.to_string())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl FromIterator<(String, EntityId)> for PlayerDirectory {
    fn from_iter<T: IntoIterator<Item = (String, EntityId)>>(iter: T) -> Self {
        let mut directory = Self::new();
        for (name, id) in iter {
            directory.insert(name, id);
        }
        directory
    }
}
