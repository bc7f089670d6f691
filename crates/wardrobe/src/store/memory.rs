use super::{Entity, EntityKey, EntityKind, EntityPredicate, ObjectStore};
use crate::error::{Result, WardrobeError};

enum StagedOp {
    Insert(Entity),
    Delete(EntityKey),
}

/// In-memory object store.
///
/// Committed entities are kept in insertion order; replacing an entity
/// keeps its original position.
#[derive(Default)]
pub struct MemStore {
    committed: Vec<Entity>,
    staged: Vec<StagedOp>,
    simulate_save_error: bool,
    saves: usize,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store whose committed state is the given entities.
    pub fn with_entities(entities: Vec<Entity>) -> Self {
        let mut store = Self::new();
        for entity in entities {
            store.apply(StagedOp::Insert(entity));
        }
        store
    }

    /// Enable save error simulation for testing error handling.
    pub fn set_simulate_save_error(&mut self, simulate: bool) {
        self.simulate_save_error = simulate;
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Number of committed entities of one kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.committed.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn get(&self, key: &EntityKey) -> Option<&Entity> {
        self.committed.iter().find(|e| e.key() == *key)
    }

    /// Serialize the committed state as a JSON array.
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.committed)?)
    }

    /// Load a store from a JSON array produced by [`MemStore::snapshot_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let entities: Vec<Entity> = serde_json::from_str(json)?;
        Ok(Self::with_entities(entities))
    }

    fn apply(&mut self, op: StagedOp) {
        match op {
            StagedOp::Insert(entity) => {
                let key = entity.key();
                match self.committed.iter_mut().find(|e| e.key() == key) {
                    Some(slot) => *slot = entity,
                    None => self.committed.push(entity),
                }
            }
            StagedOp::Delete(key) => self.committed.retain(|e| e.key() != key),
        }
    }
}

impl ObjectStore for MemStore {
    fn insert(&mut self, entity: Entity) {
        self.staged.push(StagedOp::Insert(entity));
    }

    fn delete(&mut self, key: EntityKey) {
        self.staged.push(StagedOp::Delete(key));
    }

    fn save(&mut self) -> Result<()> {
        if self.simulate_save_error {
            return Err(WardrobeError::Store("Simulated save error".to_string()));
        }
        for op in std::mem::take(&mut self.staged) {
            self.apply(op);
        }
        self.saves += 1;
        Ok(())
    }

    fn query(
        &self,
        kind: EntityKind,
        predicate: Option<EntityPredicate<'_>>,
    ) -> Result<Vec<Entity>> {
        Ok(self
            .committed
            .iter()
            .filter(|e| e.kind() == kind)
            .filter(|e| predicate.map_or(true, |p| p(e)))
            .cloned()
            .collect())
    }

    fn has_changes(&self) -> bool {
        !self.staged.is_empty()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Category, ClothingItem, Rgba, Size};
    use crate::store::CategoryRecord;

    /// Builds a `MemStore` with committed content.
    pub struct StoreFixture {
        pub store: MemStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: MemStore::new(),
            }
        }

        pub fn with_items(mut self, count: usize) -> Self {
            for i in 0..count {
                let item = ClothingItem::new(format!("Test Item {}", i + 1), Rgba::GRAY, Size::M);
                self.store.insert(Entity::Item(item));
            }
            self.store.save().unwrap();
            self
        }

        pub fn with_item(mut self, item: ClothingItem) -> Self {
            self.store.insert(Entity::Item(item));
            self.store.save().unwrap();
            self
        }

        /// Adds a category holding the given (already stored) item ids.
        pub fn with_category(mut self, name: &str, item_ids: Vec<uuid::Uuid>) -> Self {
            self.store.insert(Entity::Category(CategoryRecord {
                category: Category::new(name),
                item_ids,
            }));
            self.store.save().unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use crate::model::{ClothingItem, Day, Rgba, Size};
    use crate::store::DayRecord;
    use chrono::NaiveDate;

    fn item(name: &str) -> ClothingItem {
        ClothingItem::new(name, Rgba::RED, Size::S)
    }

    #[test]
    fn test_staged_ops_invisible_until_save() {
        let mut store = MemStore::new();
        store.insert(Entity::Item(item("Shirt")));
        assert!(store.has_changes());
        assert!(store.query(EntityKind::Item, None).unwrap().is_empty());

        store.save().unwrap();
        assert!(!store.has_changes());
        assert_eq!(store.query(EntityKind::Item, None).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_staged_ops() {
        let mut store = MemStore::new();
        store.set_simulate_save_error(true);
        store.insert(Entity::Item(item("Shirt")));

        match store.save() {
            Err(WardrobeError::Store(_)) => {}
            other => panic!("Expected Store error, got {:?}", other),
        }
        assert!(store.has_changes());
        assert_eq!(store.count(EntityKind::Item), 0);

        store.set_simulate_save_error(false);
        store.save().unwrap();
        assert_eq!(store.count(EntityKind::Item), 1);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let first = item("First");
        let second = item("Second");
        let mut store = MemStore::with_entities(vec![
            Entity::Item(first.clone()),
            Entity::Item(second.clone()),
        ]);

        let mut renamed = first.clone();
        renamed.name = "Renamed".into();
        store.insert(Entity::Item(renamed));
        store.save().unwrap();

        let names: Vec<String> = store
            .query(EntityKind::Item, None)
            .unwrap()
            .into_iter()
            .map(|e| match e {
                Entity::Item(i) => i.name,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["Renamed", "Second"]);
    }

    #[test]
    fn test_delete_and_query_predicate() {
        let keep = item("Keep");
        let drop = item("Drop");
        let mut store =
            MemStore::with_entities(vec![Entity::Item(keep.clone()), Entity::Item(drop.clone())]);

        store.delete(EntityKey::Item(drop.id));
        store.save().unwrap();
        assert!(store.get(&EntityKey::Item(drop.id)).is_none());

        let only_keep = |e: &Entity| matches!(e, Entity::Item(i) if i.name == "Keep");
        let found = store.query(EntityKind::Item, Some(&only_keep)).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_query_filters_by_kind() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let store = StoreFixture::new()
            .with_items(2)
            .with_category("Work", Vec::new())
            .store;
        let mut store = store;
        store.insert(Entity::Day(DayRecord {
            day: Day::new(date),
            item_ids: Vec::new(),
        }));
        store.save().unwrap();

        assert_eq!(store.count(EntityKind::Item), 2);
        assert_eq!(store.count(EntityKind::Category), 1);
        assert_eq!(store.count(EntityKind::Day), 1);
        assert_eq!(store.save_count(), 4);
    }

    #[test]
    fn test_snapshot_json_reload() {
        let shirt = item("Shirt");
        let store = StoreFixture::new()
            .with_item(shirt.clone())
            .with_category("Tops", vec![shirt.id])
            .store;

        let json = store.snapshot_json().unwrap();
        let reloaded = MemStore::from_json(&json).unwrap();

        assert_eq!(reloaded.count(EntityKind::Item), 1);
        match reloaded.get(&EntityKey::Item(shirt.id)) {
            Some(Entity::Item(i)) => assert_eq!(i, &shirt),
            other => panic!("Expected item, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        match MemStore::from_json("not json") {
            Err(WardrobeError::Serialization(_)) => {}
            Err(e) => panic!("Expected Serialization error, got {}", e),
            Ok(_) => panic!("Expected error"),
        }
    }
}
