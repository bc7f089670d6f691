//! # Storage Layer
//!
//! The catalog does not implement persistence. It talks to an external
//! object store through the [`ObjectStore`] trait, which mirrors the
//! capabilities of an on-device object graph store:
//!
//! - `insert(entity)`: stage a create-or-replace
//! - `delete(key)`: stage a removal
//! - `save()`: commit everything staged, atomically from the caller's view
//! - `query(kind, predicate)`: read committed entities of one kind
//!
//! ## What Gets Stored
//!
//! Three record kinds, see [`Entity`]:
//!
//! | Record | Key | Carries relations |
//! |--------|-----|-------------------|
//! | `ClothingItem` | item id | no |
//! | [`CategoryRecord`] | category id | member item ids |
//! | [`DayRecord`] | date | worn item ids |
//!
//! Relations are persisted on the category/day side only. On load the
//! catalog rebuilds both directions of its link indexes from that single
//! side, so the stored graph cannot hold a half-mirrored pair.
//!
//! ## Failure Semantics
//!
//! A failed `save()` leaves the staged operations in place. Staging is
//! idempotent per key (last write wins), so the catalog simply stages its
//! pending changes again and retries on the next commit.
//!
//! ## Implementations
//!
//! - [`memory::MemStore`]: in-memory store for tests and embedders.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Category, ClothingItem, Day};

pub mod memory;

/// A category as persisted: the entity plus its member item ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default)]
    pub item_ids: Vec<Uuid>,
}

/// A day as persisted: the entity plus the ids of items worn that day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(flatten)]
    pub day: Day,
    #[serde(default)]
    pub item_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Item(ClothingItem),
    Category(CategoryRecord),
    Day(DayRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Item,
    Category,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKey {
    Item(Uuid),
    Category(Uuid),
    Day(NaiveDate),
}

impl EntityKey {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityKey::Item(_) => EntityKind::Item,
            EntityKey::Category(_) => EntityKind::Category,
            EntityKey::Day(_) => EntityKind::Day,
        }
    }
}

impl Entity {
    pub fn key(&self) -> EntityKey {
        match self {
            Entity::Item(item) => EntityKey::Item(item.id),
            Entity::Category(record) => EntityKey::Category(record.category.id),
            Entity::Day(record) => EntityKey::Day(record.day.date),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.key().kind()
    }
}

/// Optional query predicate over stored entities.
pub type EntityPredicate<'a> = &'a dyn Fn(&Entity) -> bool;

/// Abstract interface to the object store collaborator.
///
/// Implementations must apply staged operations in order on `save()` and
/// must not apply any of them if `save()` fails.
pub trait ObjectStore {
    /// Stage a create-or-replace of an entity
    fn insert(&mut self, entity: Entity);

    /// Stage the removal of an entity
    fn delete(&mut self, key: EntityKey);

    /// Commit all staged operations
    fn save(&mut self) -> Result<()>;

    /// List committed entities of one kind, in store iteration order
    fn query(&self, kind: EntityKind, predicate: Option<EntityPredicate<'_>>)
        -> Result<Vec<Entity>>;

    /// Whether any operations are staged but not yet saved
    fn has_changes(&self) -> bool;
}
