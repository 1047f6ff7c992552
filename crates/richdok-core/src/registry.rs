//! Entity registry
//!
//! An append-only table of the entities created during one compilation.
//! Ids are handed out in creation order starting at zero, so the table's
//! order is the document order of the entity nodes that produced it.

use std::collections::BTreeMap;
use std::fmt;

use richdok_ast::{Data, Mutability};
use serde::{Deserialize, Serialize};

/// Identifier of a registered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityInstance {
    /// Entity type, e.g. `LINK`
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mutability: Mutability,
    pub data: Data,
}

/// Snapshot of a registry, keyed by id
pub type EntityMap = BTreeMap<EntityId, EntityInstance>;

/// Append-only entity table for a single compilation run
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entries: Vec<EntityInstance>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new entity and return its id
    pub fn create(
        &mut self,
        entity_type: impl Into<String>,
        mutability: Mutability,
        data: Data,
    ) -> EntityId {
        let id = EntityId(self.entries.len() as u64);
        self.entries.push(EntityInstance {
            entity_type: entity_type.into(),
            mutability,
            data,
        });
        id
    }

    /// Id of the most recently created entity
    pub fn last_created_id(&self) -> Option<EntityId> {
        self.entries
            .len()
            .checked_sub(1)
            .map(|last| EntityId(last as u64))
    }

    /// Look up an entity
    pub fn get(&self, id: EntityId) -> Option<&EntityInstance> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.entries.get(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entities in creation order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &EntityInstance)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entity)| (EntityId(i as u64), entity))
    }

    /// Export the registry as an id-keyed table
    pub fn to_table(&self) -> EntityMap {
        self.iter()
            .map(|(id, entity)| (id, entity.clone()))
            .collect()
    }

    /// Consume the registry into an id-keyed table
    pub fn into_table(self) -> EntityMap {
        self.entries
            .into_iter()
            .enumerate()
            .map(|(i, entity)| (EntityId(i as u64), entity))
            .collect()
    }
}
