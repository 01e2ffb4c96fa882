//! Entity catalog: the validated, deduplicated set of names from one load.

use std::collections::HashMap;
use std::sync::Arc;

use super::entity::{EntityId, NameEntity};

/// Full set of loaded names plus an id index.
///
/// Built once per successful load and replaced wholesale on reload.
/// Entities are shared via `Arc` with the deck and with snapshots.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    entities: Vec<Arc<NameEntity>>,
    index: HashMap<EntityId, usize>,
}

impl EntityCatalog {
    /// Build a catalog, keeping catalog order. A repeated id keeps its first occurrence.
    pub fn new(entities: impl IntoIterator<Item = NameEntity>) -> Self {
        let mut catalog = Self::default();
        for entity in entities {
            if catalog.index.contains_key(entity.id()) {
                continue;
            }
            catalog
                .index
                .insert(entity.id().clone(), catalog.entities.len());
            catalog.entities.push(Arc::new(entity));
        }
        catalog
    }

    pub fn get(&self, id: &EntityId) -> Option<&Arc<NameEntity>> {
        self.index.get(id).map(|&position| &self.entities[position])
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in catalog (input row) order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<NameEntity>> {
        self.entities.iter()
    }
}
