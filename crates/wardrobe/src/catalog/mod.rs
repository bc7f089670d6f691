//! # Catalog
//!
//! The catalog is the in-memory object graph of a wardrobe: an indexed
//! arena of items, categories and days, plus two link indexes for the
//! many-to-many relations between them.
//!
//! ## Mirrored Relations
//!
//! | Relation | Index | Persisted on |
//! |----------|-------|--------------|
//! | category ↔ item | `LinkIndex<Uuid, Uuid>` | category record |
//! | day ↔ item | `LinkIndex<NaiveDate, Uuid>` | day record |
//!
//! Every mutating call updates both directions before returning, so no
//! caller can observe (or commit) a half-mirrored pair.
//!
//! ## Last Worn
//!
//! An item's `last_worn` is derived from its day links:
//! - linking to a day `d <= today` advances it to `d` if `d` is later;
//! - unlinking recomputes it as the latest remaining linked day `<= today`,
//!   or [`NEVER_WORN`] if there is none.
//!
//! ## Day Lifecycle
//!
//! Days are created lazily by [`Catalog::open_day`] (or by linking an item
//! to a date). A day with no notes and no items is *transient*: it is
//! pruned by [`Catalog::close_day`] and by every commit, and never reaches
//! the store. A stored day that becomes transient is deleted from the store.
//!
//! ## Commit
//!
//! Mutations only mark entities as changed. [`Catalog::commit`] stages
//! inserts/deletes on the [`ObjectStore`] and calls `save()`. If the save
//! fails, the in-memory state is kept as is and the pending changes stay
//! marked, so the next commit retries them. Inserts from a failed save stay
//! staged in the store, so anything removed since then gets an explicit
//! delete.

mod links;

pub use links::LinkIndex;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, WardrobeError};
use crate::model::{Category, ClothingItem, Day, ItemEntry, NEVER_WORN};
use crate::store::{CategoryRecord, DayRecord, Entity, EntityKey, EntityKind, ObjectStore};

/// What happens to member items when a category is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDeletion {
    /// Remove the category from its items; the items survive.
    DetachItems,
    /// Delete the category and every item in it.
    DeleteItems,
}

/// Counts of what a commit sent to the store.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CommitReport {
    pub written: usize,
    pub deleted: usize,
}

impl CommitReport {
    pub fn is_empty(&self) -> bool {
        self.written == 0 && self.deleted == 0
    }
}

#[derive(Debug, Default)]
struct ChangeSet {
    dirty: BTreeSet<EntityKey>,
    removed: BTreeSet<EntityKey>,
    persisted: HashSet<EntityKey>,
    /// Keys handed to the store by a save that has not succeeded yet.
    staged: HashSet<EntityKey>,
}

impl ChangeSet {
    fn mark_dirty(&mut self, key: EntityKey) {
        self.removed.remove(&key);
        self.dirty.insert(key);
    }

    fn mark_removed(&mut self, key: EntityKey) {
        self.dirty.remove(&key);
        self.removed.insert(key);
    }

    fn is_empty(&self) -> bool {
        self.dirty.is_empty() && self.removed.is_empty()
    }

    /// Whether the store holds (or will hold on its next save) this key.
    fn reached_store(&self, key: &EntityKey) -> bool {
        self.persisted.contains(key) || self.staged.contains(key)
    }
}

#[derive(Debug, Default)]
pub struct Catalog {
    items: HashMap<Uuid, ClothingItem>,
    item_order: Vec<Uuid>,
    categories: HashMap<Uuid, Category>,
    category_order: Vec<Uuid>,
    days: BTreeMap<NaiveDate, Day>,
    category_links: LinkIndex<Uuid, Uuid>,
    day_links: LinkIndex<NaiveDate, Uuid>,
    changes: ChangeSet,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from everything committed in the store.
    ///
    /// Relation ids pointing at items that no longer exist are dropped.
    pub fn load<S: ObjectStore>(store: &S) -> Result<Self> {
        let mut catalog = Self::new();

        for entity in store.query(EntityKind::Item, None)? {
            if let Entity::Item(item) = entity {
                catalog.changes.persisted.insert(EntityKey::Item(item.id));
                catalog.item_order.push(item.id);
                catalog.items.insert(item.id, item);
            }
        }

        for entity in store.query(EntityKind::Category, None)? {
            if let Entity::Category(CategoryRecord { category, item_ids }) = entity {
                let id = category.id;
                catalog.changes.persisted.insert(EntityKey::Category(id));
                catalog.category_order.push(id);
                catalog.categories.insert(id, category);
                for item_id in item_ids {
                    if catalog.items.contains_key(&item_id) {
                        catalog.category_links.link(id, item_id);
                    } else {
                        debug!(category = %id, item = %item_id, "dropping dangling category link");
                    }
                }
            }
        }

        for entity in store.query(EntityKind::Day, None)? {
            if let Entity::Day(DayRecord { day, item_ids }) = entity {
                let date = day.date;
                catalog.changes.persisted.insert(EntityKey::Day(date));
                catalog.days.insert(date, day);
                for item_id in item_ids {
                    if catalog.items.contains_key(&item_id) {
                        catalog.day_links.link(date, item_id);
                    } else {
                        debug!(%date, item = %item_id, "dropping dangling day link");
                    }
                }
            }
        }

        debug!(
            items = catalog.items.len(),
            categories = catalog.categories.len(),
            days = catalog.days.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    // --- Items ---

    pub fn item(&self, id: Uuid) -> Result<&ClothingItem> {
        self.items.get(&id).ok_or(WardrobeError::ItemNotFound(id))
    }

    pub fn contains_item(&self, id: Uuid) -> bool {
        self.items.contains_key(&id)
    }

    /// All items in catalog order.
    pub fn items(&self) -> impl Iterator<Item = &ClothingItem> {
        self.item_order.iter().filter_map(|id| self.items.get(id))
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn entry(&self, id: Uuid) -> Result<ItemEntry> {
        let item = self.item(id)?;
        Ok(ItemEntry::new(
            item.clone(),
            self.category_links.owners_of(id).to_vec(),
        ))
    }

    /// Snapshot of every item with its category ids, in catalog order.
    pub fn entries(&self) -> Vec<ItemEntry> {
        self.items()
            .map(|item| {
                ItemEntry::new(
                    item.clone(),
                    self.category_links.owners_of(item.id).to_vec(),
                )
            })
            .collect()
    }

    pub fn insert_item(&mut self, item: ClothingItem) -> Uuid {
        let id = item.id;
        if !self.items.contains_key(&id) {
            self.item_order.push(id);
        }
        self.items.insert(id, item);
        self.changes.mark_dirty(EntityKey::Item(id));
        id
    }

    /// Mutate an item in place and mark it changed.
    pub fn update_item<F>(&mut self, id: Uuid, update: F) -> Result<&ClothingItem>
    where
        F: FnOnce(&mut ClothingItem),
    {
        let item = self
            .items
            .get_mut(&id)
            .ok_or(WardrobeError::ItemNotFound(id))?;
        update(item);
        item.updated_at = Utc::now();
        self.changes.mark_dirty(EntityKey::Item(id));
        Ok(item)
    }

    /// Delete an item, detaching it from every category and day first.
    pub fn remove_item(&mut self, id: Uuid) -> Result<ClothingItem> {
        let item = self.items.remove(&id).ok_or(WardrobeError::ItemNotFound(id))?;
        self.item_order.retain(|other| *other != id);

        for category in self.category_links.remove_item(id) {
            self.changes.mark_dirty(EntityKey::Category(category));
        }
        for date in self.day_links.remove_item(id) {
            self.changes.mark_dirty(EntityKey::Day(date));
        }
        self.changes.mark_removed(EntityKey::Item(id));
        Ok(item)
    }

    // --- Categories ---

    pub fn category(&self, id: Uuid) -> Result<&Category> {
        self.categories
            .get(&id)
            .ok_or(WardrobeError::CategoryNotFound(id))
    }

    /// All categories in catalog order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.category_order
            .iter()
            .filter_map(|id| self.categories.get(id))
    }

    pub fn insert_category(&mut self, category: Category) -> Uuid {
        let id = category.id;
        if !self.categories.contains_key(&id) {
            self.category_order.push(id);
        }
        self.categories.insert(id, category);
        self.changes.mark_dirty(EntityKey::Category(id));
        id
    }

    pub fn update_category<F>(&mut self, id: Uuid, update: F) -> Result<&Category>
    where
        F: FnOnce(&mut Category),
    {
        let category = self
            .categories
            .get_mut(&id)
            .ok_or(WardrobeError::CategoryNotFound(id))?;
        update(category);
        self.changes.mark_dirty(EntityKey::Category(id));
        Ok(category)
    }

    /// Delete a category. Returns the category and the items deleted with it
    /// (always empty for [`CategoryDeletion::DetachItems`]).
    pub fn delete_category(
        &mut self,
        id: Uuid,
        mode: CategoryDeletion,
    ) -> Result<(Category, Vec<ClothingItem>)> {
        let category = self
            .categories
            .remove(&id)
            .ok_or(WardrobeError::CategoryNotFound(id))?;
        self.category_order.retain(|other| *other != id);
        self.changes.mark_removed(EntityKey::Category(id));

        let members = self.category_links.remove_owner(id);
        let mut deleted = Vec::new();
        match mode {
            CategoryDeletion::DetachItems => {
                debug!(category = %id, detached = members.len(), "category deleted");
            }
            CategoryDeletion::DeleteItems => {
                for item_id in members {
                    deleted.push(self.remove_item(item_id)?);
                }
                debug!(category = %id, deleted = deleted.len(), "category deleted with items");
            }
        }
        Ok((category, deleted))
    }

    /// Add an item to a category. Returns false if it was already a member.
    pub fn add_item_to_category(&mut self, item: Uuid, category: Uuid) -> Result<bool> {
        self.ensure_item_and_category(item, category)?;
        let added = self.category_links.link(category, item);
        if added {
            self.changes.mark_dirty(EntityKey::Category(category));
        }
        Ok(added)
    }

    /// Remove an item from a category. Returns false if it was not a member.
    pub fn remove_item_from_category(&mut self, item: Uuid, category: Uuid) -> Result<bool> {
        self.ensure_item_and_category(item, category)?;
        let removed = self.category_links.unlink(category, item);
        if removed {
            self.changes.mark_dirty(EntityKey::Category(category));
        }
        Ok(removed)
    }

    /// Flip membership. Returns true if the item is a member afterwards.
    pub fn toggle_item_in_category(&mut self, item: Uuid, category: Uuid) -> Result<bool> {
        self.ensure_item_and_category(item, category)?;
        let member = self.category_links.toggle(category, item);
        self.changes.mark_dirty(EntityKey::Category(category));
        Ok(member)
    }

    pub fn is_in_category(&self, item: Uuid, category: Uuid) -> bool {
        self.category_links.contains(category, item)
    }

    /// Category ids the item belongs to.
    pub fn categories_of(&self, item: Uuid) -> &[Uuid] {
        self.category_links.owners_of(item)
    }

    /// Items of a category, in the order they were added.
    pub fn items_in_category(&self, category: Uuid) -> Result<Vec<&ClothingItem>> {
        self.category(category)?;
        Ok(self
            .category_links
            .items_of(category)
            .iter()
            .filter_map(|id| self.items.get(id))
            .collect())
    }

    fn ensure_item_and_category(&self, item: Uuid, category: Uuid) -> Result<()> {
        self.item(item)?;
        self.category(category)?;
        Ok(())
    }

    // --- Days ---

    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        self.days.get(&date)
    }

    /// All days, in date order.
    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.days.values()
    }

    /// Get the day for a date, creating an empty one if needed.
    pub fn open_day(&mut self, date: NaiveDate) -> &Day {
        self.days.entry(date).or_insert_with(|| Day::new(date))
    }

    pub fn set_day_notes(&mut self, date: NaiveDate, notes: impl Into<String>) -> &Day {
        let day = self.days.entry(date).or_insert_with(|| Day::new(date));
        day.notes = notes.into();
        self.changes.mark_dirty(EntityKey::Day(date));
        day
    }

    /// Prune the day if it is transient. Returns true if it was removed.
    pub fn close_day(&mut self, date: NaiveDate) -> bool {
        if !self.is_transient_day(date) {
            return false;
        }
        self.days.remove(&date);
        self.changes.mark_removed(EntityKey::Day(date));
        true
    }

    /// Flip an item's association with a day.
    ///
    /// Returns true if the item is linked to the day afterwards. `today`
    /// bounds which days count towards `last_worn`.
    pub fn toggle_item_on_day(
        &mut self,
        date: NaiveDate,
        item: Uuid,
        today: NaiveDate,
    ) -> Result<bool> {
        self.item(item)?;
        self.open_day(date);
        let linked = self.day_links.toggle(date, item);
        self.changes.mark_dirty(EntityKey::Day(date));

        let current = self.item(item)?.last_worn;
        let last_worn = if linked {
            if date <= today && date > current {
                date
            } else {
                current
            }
        } else {
            self.day_links
                .owners_of(item)
                .iter()
                .copied()
                .filter(|d| *d <= today)
                .max()
                .unwrap_or(NEVER_WORN)
        };
        if last_worn != current {
            self.update_item(item, |i| i.last_worn = last_worn)?;
        }
        Ok(linked)
    }

    pub fn is_worn_on(&self, date: NaiveDate, item: Uuid) -> bool {
        self.day_links.contains(date, item)
    }

    /// Dates the item is associated with.
    pub fn days_of(&self, item: Uuid) -> &[NaiveDate] {
        self.day_links.owners_of(item)
    }

    pub fn items_on_day(&self, date: NaiveDate) -> Vec<&ClothingItem> {
        self.day_links
            .items_of(date)
            .iter()
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    fn is_transient_day(&self, date: NaiveDate) -> bool {
        match self.days.get(&date) {
            Some(day) => !day.has_notes() && self.day_links.items_of(date).is_empty(),
            None => false,
        }
    }

    // --- Persistence ---

    /// Whether there are changes not yet committed.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Send pending changes to the store and save.
    ///
    /// Transient days are pruned first. On failure nothing is rolled back
    /// and the changes stay pending.
    pub fn commit<S: ObjectStore>(&mut self, store: &mut S) -> Result<CommitReport> {
        let transient: Vec<NaiveDate> = self
            .days
            .keys()
            .copied()
            .filter(|date| self.is_transient_day(*date))
            .collect();
        for date in transient {
            self.close_day(date);
        }

        if self.changes.is_empty() {
            return Ok(CommitReport::default());
        }

        let mut report = CommitReport::default();
        for key in &self.changes.removed {
            if self.changes.reached_store(key) {
                store.delete(*key);
                report.deleted += 1;
            }
        }
        let mut inserted = Vec::new();
        for key in &self.changes.dirty {
            if let Some(entity) = self.entity(key) {
                store.insert(entity);
                inserted.push(*key);
                report.written += 1;
            }
        }

        if report.is_empty() {
            self.changes.dirty.clear();
            self.changes.removed.clear();
            return Ok(report);
        }
        self.changes.staged.extend(inserted);
        store.save()?;
        self.changes.staged.clear();

        let changes = std::mem::take(&mut self.changes.dirty);
        self.changes.persisted.extend(changes);
        for key in std::mem::take(&mut self.changes.removed) {
            self.changes.persisted.remove(&key);
        }
        info!(
            written = report.written,
            deleted = report.deleted,
            "catalog committed"
        );
        Ok(report)
    }

    fn entity(&self, key: &EntityKey) -> Option<Entity> {
        match key {
            EntityKey::Item(id) => self.items.get(id).cloned().map(Entity::Item),
            EntityKey::Category(id) => self.categories.get(id).map(|category| {
                Entity::Category(CategoryRecord {
                    category: category.clone(),
                    item_ids: self.category_links.items_of(*id).to_vec(),
                })
            }),
            EntityKey::Day(date) => self.days.get(date).map(|day| {
                Entity::Day(DayRecord {
                    day: day.clone(),
                    item_ids: self.day_links.items_of(*date).to_vec(),
                })
            }),
        }
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Rgba, Size};

    /// Builds a `Catalog` by name, remembering the ids it handed out.
    #[derive(Default)]
    pub struct CatalogFixture {
        pub catalog: Catalog,
        items: HashMap<String, Uuid>,
        categories: HashMap<String, Uuid>,
    }

    impl CatalogFixture {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_item(mut self, name: &str, color: Rgba, size: Size) -> Self {
            let id = self.catalog.insert_item(ClothingItem::new(name, color, size));
            self.items.insert(name.to_string(), id);
            self
        }

        pub fn with_items(mut self, count: usize) -> Self {
            for i in 0..count {
                self = self.with_item(&format!("Test Item {}", i + 1), Rgba::GRAY, Size::M);
            }
            self
        }

        /// Adds a category holding the named (already added) items.
        pub fn with_category(mut self, name: &str, members: &[&str]) -> Self {
            let id = self.catalog.insert_category(Category::new(name));
            self.categories.insert(name.to_string(), id);
            for member in members {
                let item = self.item(member);
                self.catalog.category_links.link(id, item);
            }
            self
        }

        pub fn item(&self, name: &str) -> Uuid {
            self.items[name]
        }

        pub fn category(&self, name: &str) -> Uuid {
            self.categories[name]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::CatalogFixture;
    use super::*;
    use crate::model::{Rgba, Size};
    use crate::store::memory::MemStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog_with_item(name: &str) -> (Catalog, Uuid) {
        let mut catalog = Catalog::new();
        let id = catalog.insert_item(ClothingItem::new(name, Rgba::RED, Size::M));
        (catalog, id)
    }

    #[test]
    fn test_add_to_category_is_mirrored() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let cat = catalog.insert_category(Category::new("Tops"));

        assert!(catalog.add_item_to_category(item, cat).unwrap());
        assert!(catalog.is_in_category(item, cat));
        assert_eq!(catalog.categories_of(item), &[cat]);
        assert_eq!(catalog.items_in_category(cat).unwrap()[0].id, item);

        assert!(catalog.remove_item_from_category(item, cat).unwrap());
        assert!(!catalog.is_in_category(item, cat));
        assert!(catalog.categories_of(item).is_empty());
        assert!(catalog.items_in_category(cat).unwrap().is_empty());
    }

    #[test]
    fn test_toggle_category_membership() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let cat = catalog.insert_category(Category::new("Tops"));

        assert!(catalog.toggle_item_in_category(item, cat).unwrap());
        assert!(!catalog.toggle_item_in_category(item, cat).unwrap());
        assert!(!catalog.is_in_category(item, cat));
    }

    #[test]
    fn test_category_ops_on_missing_entities() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let missing = Uuid::new_v4();
        match catalog.add_item_to_category(item, missing) {
            Err(WardrobeError::CategoryNotFound(id)) => assert_eq!(id, missing),
            other => panic!("Expected CategoryNotFound, got {:?}", other),
        }
        let cat = catalog.insert_category(Category::new("Tops"));
        match catalog.add_item_to_category(missing, cat) {
            Err(WardrobeError::ItemNotFound(id)) => assert_eq!(id, missing),
            other => panic!("Expected ItemNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_category_detach_keeps_items() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let cat = catalog.insert_category(Category::new("Tops"));
        catalog.add_item_to_category(item, cat).unwrap();

        let (_, deleted) = catalog
            .delete_category(cat, CategoryDeletion::DetachItems)
            .unwrap();
        assert!(deleted.is_empty());
        assert!(catalog.contains_item(item));
        assert!(catalog.categories_of(item).is_empty());
    }

    #[test]
    fn test_delete_category_with_items() {
        let (mut catalog, shirt) = catalog_with_item("Shirt");
        let other = catalog.insert_item(ClothingItem::new("Socks", Rgba::WHITE, Size::S));
        let tops = catalog.insert_category(Category::new("Tops"));
        let all = catalog.insert_category(Category::new("All"));
        catalog.add_item_to_category(shirt, tops).unwrap();
        catalog.add_item_to_category(shirt, all).unwrap();
        catalog.add_item_to_category(other, all).unwrap();

        let (_, deleted) = catalog
            .delete_category(tops, CategoryDeletion::DeleteItems)
            .unwrap();
        assert_eq!(deleted.len(), 1);
        assert!(!catalog.contains_item(shirt));
        assert!(catalog.contains_item(other));
        let remaining: Vec<Uuid> = catalog
            .items_in_category(all)
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(remaining, vec![other]);
    }

    #[test]
    fn test_remove_item_detaches_days() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let d = date(2024, 3, 1);
        catalog.toggle_item_on_day(d, item, date(2024, 3, 5)).unwrap();

        catalog.remove_item(item).unwrap();
        assert!(catalog.items_on_day(d).is_empty());
        assert!(catalog.days_of(item).is_empty());
    }

    #[test]
    fn test_last_worn_advances_to_later_past_day() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let today = date(2024, 6, 30);

        catalog.toggle_item_on_day(date(2024, 6, 1), item, today).unwrap();
        assert_eq!(catalog.item(item).unwrap().last_worn, date(2024, 6, 1));

        catalog.toggle_item_on_day(date(2024, 6, 10), item, today).unwrap();
        assert_eq!(catalog.item(item).unwrap().last_worn, date(2024, 6, 10));
    }

    #[test]
    fn test_last_worn_ignores_earlier_day() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let today = date(2024, 6, 30);
        catalog.toggle_item_on_day(date(2024, 6, 10), item, today).unwrap();

        catalog.toggle_item_on_day(date(2024, 6, 1), item, today).unwrap();
        assert_eq!(catalog.item(item).unwrap().last_worn, date(2024, 6, 10));

        // Same day as current
        catalog.update_item(item, |i| i.last_worn = date(2024, 6, 20)).unwrap();
        catalog.toggle_item_on_day(date(2024, 6, 20), item, today).unwrap();
        assert_eq!(catalog.item(item).unwrap().last_worn, date(2024, 6, 20));
    }

    #[test]
    fn test_last_worn_ignores_future_day() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        catalog
            .toggle_item_on_day(date(2024, 7, 1), item, date(2024, 6, 30))
            .unwrap();
        assert!(catalog.is_worn_on(date(2024, 7, 1), item));
        assert_eq!(catalog.item(item).unwrap().last_worn, NEVER_WORN);
    }

    #[test]
    fn test_last_worn_recomputed_on_unlink() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let today = date(2024, 6, 30);
        catalog.toggle_item_on_day(date(2024, 6, 1), item, today).unwrap();
        catalog.toggle_item_on_day(date(2024, 6, 10), item, today).unwrap();
        catalog.toggle_item_on_day(date(2024, 7, 4), item, today).unwrap();

        assert!(!catalog
            .toggle_item_on_day(date(2024, 6, 10), item, today)
            .unwrap());
        assert_eq!(catalog.item(item).unwrap().last_worn, date(2024, 6, 1));

        catalog.toggle_item_on_day(date(2024, 6, 1), item, today).unwrap();
        assert_eq!(catalog.item(item).unwrap().last_worn, NEVER_WORN);
    }

    #[test]
    fn test_close_untouched_day_is_never_persisted() {
        let mut catalog = Catalog::new();
        let mut store = MemStore::new();
        let d = date(2024, 1, 1);

        catalog.open_day(d);
        assert!(catalog.close_day(d));
        catalog.commit(&mut store).unwrap();
        assert_eq!(store.count(EntityKind::Day), 0);
        assert!(catalog.day(d).is_none());
    }

    #[test]
    fn test_day_with_item_is_persisted_once() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let mut store = MemStore::new();
        let d = date(2024, 1, 1);

        catalog.open_day(d);
        catalog.toggle_item_on_day(d, item, d).unwrap();
        assert!(!catalog.close_day(d));
        catalog.commit(&mut store).unwrap();
        assert_eq!(store.count(EntityKind::Day), 1);
        match store.get(&EntityKey::Day(d)) {
            Some(Entity::Day(record)) => assert_eq!(record.item_ids, vec![item]),
            other => panic!("Expected day record, got {:?}", other),
        }
    }

    #[test]
    fn test_emptied_day_is_deleted_from_store() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let mut store = MemStore::new();
        let d = date(2024, 1, 1);

        catalog.toggle_item_on_day(d, item, d).unwrap();
        catalog.commit(&mut store).unwrap();
        assert_eq!(store.count(EntityKind::Day), 1);

        catalog.toggle_item_on_day(d, item, d).unwrap();
        let report = catalog.commit(&mut store).unwrap();
        assert_eq!(report.deleted, 1);
        assert_eq!(store.count(EntityKind::Day), 0);
    }

    #[test]
    fn test_day_with_notes_survives_commit() {
        let mut catalog = Catalog::new();
        let mut store = MemStore::new();
        let d = date(2024, 2, 14);

        catalog.set_day_notes(d, "Dinner out");
        catalog.commit(&mut store).unwrap();
        assert_eq!(store.count(EntityKind::Day), 1);

        catalog.set_day_notes(d, "");
        catalog.commit(&mut store).unwrap();
        assert_eq!(store.count(EntityKind::Day), 0);
    }

    #[test]
    fn test_failed_commit_keeps_memory_and_retries() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let mut store = MemStore::new();
        store.set_simulate_save_error(true);

        assert!(catalog.commit(&mut store).is_err());
        assert!(catalog.contains_item(item));
        assert!(catalog.has_changes());

        store.set_simulate_save_error(false);
        let report = catalog.commit(&mut store).unwrap();
        assert_eq!(report.written, 1);
        assert!(!catalog.has_changes());
        assert_eq!(store.count(EntityKind::Item), 1);
    }

    #[test]
    fn test_day_emptied_after_failed_save_is_not_persisted() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let mut store = MemStore::new();
        let d = date(2024, 1, 1);

        catalog.toggle_item_on_day(d, item, d).unwrap();
        store.set_simulate_save_error(true);
        assert!(catalog.commit(&mut store).is_err());

        catalog.toggle_item_on_day(d, item, d).unwrap();
        store.set_simulate_save_error(false);
        catalog.commit(&mut store).unwrap();

        assert_eq!(store.count(EntityKind::Day), 0);
        let loaded = Catalog::load(&store).unwrap();
        assert!(!loaded.is_worn_on(d, item));
        assert_eq!(loaded.item(item).unwrap().last_worn, NEVER_WORN);
    }

    #[test]
    fn test_item_deleted_after_failed_save_stays_deleted() {
        let (mut catalog, ghost) = catalog_with_item("Shirt");
        let mut store = MemStore::new();
        store.set_simulate_save_error(true);
        assert!(catalog.commit(&mut store).is_err());

        catalog.remove_item(ghost).unwrap();
        let kept = catalog.insert_item(ClothingItem::new("Socks", Rgba::WHITE, Size::S));
        store.set_simulate_save_error(false);
        catalog.commit(&mut store).unwrap();

        assert!(store.get(&EntityKey::Item(ghost)).is_none());
        assert!(store.get(&EntityKey::Item(kept)).is_some());
        assert_eq!(store.count(EntityKind::Item), 1);
    }

    #[test]
    fn test_commit_without_changes_does_not_save() {
        let mut catalog = Catalog::new();
        let mut store = MemStore::new();
        let report = catalog.commit(&mut store).unwrap();
        assert!(report.is_empty());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_deleting_unsaved_item_sends_nothing() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let mut store = MemStore::new();
        catalog.remove_item(item).unwrap();
        let report = catalog.commit(&mut store).unwrap();
        assert_eq!(report, CommitReport::default());
    }

    #[test]
    fn test_load_rebuilds_links_from_store() {
        let (mut catalog, item) = catalog_with_item("Shirt");
        let cat = catalog.insert_category(Category::new("Tops"));
        let d = date(2024, 4, 4);
        catalog.add_item_to_category(item, cat).unwrap();
        catalog.toggle_item_on_day(d, item, d).unwrap();

        let mut store = MemStore::new();
        catalog.commit(&mut store).unwrap();

        let loaded = Catalog::load(&store).unwrap();
        assert!(loaded.is_in_category(item, cat));
        assert!(loaded.is_worn_on(d, item));
        assert_eq!(loaded.item(item).unwrap().last_worn, d);
        assert!(!loaded.has_changes());
    }

    #[test]
    fn test_load_drops_dangling_links() {
        let ghost = Uuid::new_v4();
        let store = MemStore::with_entities(vec![Entity::Category(CategoryRecord {
            category: Category::new("Tops"),
            item_ids: vec![ghost],
        })]);

        let catalog = Catalog::load(&store).unwrap();
        let cat = catalog.categories().next().unwrap().id;
        assert!(catalog.items_in_category(cat).unwrap().is_empty());
        assert!(catalog.categories_of(ghost).is_empty());
    }

    #[test]
    fn test_fixture_links_are_mirrored() {
        let fixture = CatalogFixture::new()
            .with_items(2)
            .with_category("Work", &["Test Item 2"]);
        let item = fixture.item("Test Item 2");
        let work = fixture.category("Work");
        assert_eq!(fixture.catalog.categories_of(item), &[work]);
        assert_eq!(fixture.catalog.items_in_category(work).unwrap()[0].id, item);
    }

    #[test]
    fn test_entries_carry_categories_in_item_order() {
        let (mut catalog, first) = catalog_with_item("First");
        let second = catalog.insert_item(ClothingItem::new("Second", Rgba::BLUE, Size::L));
        let cat = catalog.insert_category(Category::new("Tops"));
        catalog.add_item_to_category(second, cat).unwrap();

        let entries = catalog.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id(), first);
        assert!(entries[0].categories.is_empty());
        assert_eq!(entries[1].categories, vec![cat]);
    }
}
