//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the
//! single entry point for a UI session.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the session state**: the [`Catalog`], the [`Selection`] and the store
//! - **Dispatches** to the appropriate command function
//! - **Commits** the catalog to the store once per mutating call
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## Outcomes
//!
//! | Situation | Returned |
//! |-----------|----------|
//! | Success | `Ok(result)`, result committed |
//! | Item/category vanished | `Ok(result)` with a `Warning` message, nothing changed |
//! | Save failed | `Ok(result)` with an `Error` message, memory kept, retried on next commit |
//! | Invalid input | `Err(WardrobeError::Api)` |
//!
//! A vanished entity is expected in a UI: a stale list row or a selection
//! pointing at an item deleted on another screen.
//!
//! ## Generic Over ObjectStore
//!
//! `WardrobeApi<S: ObjectStore>` works with any store; tests use
//! [`MemStore`](crate::store::memory::MemStore).

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::catalog::{Catalog, CategoryDeletion};
use crate::commands::{self, CategoryUpdate, CmdMessage, CmdResult, ItemDraft, ItemUpdate};
use crate::config::WardrobeConfig;
use crate::error::Result;
use crate::filter::{FilterPipeline, FilterState};
use crate::model::{CleanState, ImagePayload, ItemEntry};
use crate::selection::Selection;
use crate::store::ObjectStore;
use crate::vision::{prepare_image, BackgroundRemover};

pub struct WardrobeApi<S: ObjectStore> {
    store: S,
    catalog: Catalog,
    config: WardrobeConfig,
    selection: Selection,
    remover: Option<Box<dyn BackgroundRemover>>,
}

impl<S: ObjectStore> WardrobeApi<S> {
    /// Load the catalog from `store`.
    pub fn open(store: S, config: WardrobeConfig) -> Result<Self> {
        let catalog = Catalog::load(&store)?;
        Ok(Self {
            store,
            catalog,
            config,
            selection: Selection::new(),
            remover: None,
        })
    }

    pub fn with_background_remover<R>(mut self, remover: R) -> Self
    where
        R: BackgroundRemover + 'static,
    {
        self.remover = Some(Box::new(remover));
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &WardrobeConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Snapshot of all items with their categories.
    pub fn entries(&self) -> Vec<ItemEntry> {
        self.catalog.entries()
    }

    /// Start a filter pipeline over the current items. Needs a tokio runtime.
    pub fn filter_pipeline(&self) -> FilterPipeline {
        FilterPipeline::spawn(self.catalog.entries(), &self.config)
    }

    // --- Items ---

    pub fn create_item(&mut self, mut draft: ItemDraft) -> Result<CmdResult> {
        if let Some(image) = draft.image.take() {
            let preference = self.category_preference(&draft.categories);
            draft.image = Some(self.prepare(image, preference));
        }
        self.run(|catalog| commands::items::create_item(catalog, draft))
    }

    pub fn update_item(&mut self, id: Uuid, mut update: ItemUpdate) -> Result<CmdResult> {
        if let Some(image) = update.image.take() {
            let preference = self.category_preference(self.catalog.categories_of(id));
            update.image = Some(self.prepare(image, preference));
        }
        self.run(|catalog| commands::items::update_item(catalog, id, update))
    }

    pub fn delete_item(&mut self, id: Uuid) -> Result<CmdResult> {
        let result = self.run(|catalog| commands::items::delete_item(catalog, id))?;
        self.selection.remove(id);
        Ok(result)
    }

    pub fn set_favorite(&mut self, ids: &[Uuid], favorite: bool) -> Result<CmdResult> {
        self.run(|catalog| commands::items::set_favorite(catalog, ids, favorite))
    }

    pub fn set_ironable(&mut self, ids: &[Uuid], ironable: bool) -> Result<CmdResult> {
        self.run(|catalog| commands::items::set_ironable(catalog, ids, ironable))
    }

    pub fn set_clean_state(&mut self, ids: &[Uuid], state: CleanState) -> Result<CmdResult> {
        self.run(|catalog| commands::items::set_clean_state(catalog, ids, state))
    }

    // --- Categories ---

    pub fn create_category(
        &mut self,
        name: &str,
        image: Option<ImagePayload>,
        remove_background: Option<bool>,
    ) -> Result<CmdResult> {
        let image = image.map(|image| self.prepare(image, remove_background));
        self.run(|catalog| {
            commands::categories::create_category(catalog, name, image, remove_background)
        })
    }

    pub fn update_category(&mut self, id: Uuid, mut update: CategoryUpdate) -> Result<CmdResult> {
        if let Some(image) = update.image.take() {
            let preference = match update.remove_background {
                Some(preference) => preference,
                None => self
                    .catalog
                    .category(id)
                    .ok()
                    .and_then(|category| category.remove_background),
            };
            update.image = Some(self.prepare(image, preference));
        }
        self.run(|catalog| commands::categories::update_category(catalog, id, update))
    }

    pub fn delete_category(&mut self, id: Uuid, mode: CategoryDeletion) -> Result<CmdResult> {
        let result = self.run(|catalog| commands::categories::delete_category(catalog, id, mode))?;
        for entry in &result.affected_items {
            self.selection.remove(entry.id());
        }
        Ok(result)
    }

    pub fn add_items_to_category(&mut self, category: Uuid, items: &[Uuid]) -> Result<CmdResult> {
        self.run(|catalog| commands::categories::add_items(catalog, category, items))
    }

    pub fn remove_items_from_category(
        &mut self,
        category: Uuid,
        items: &[Uuid],
    ) -> Result<CmdResult> {
        self.run(|catalog| commands::categories::remove_items(catalog, category, items))
    }

    pub fn toggle_item_in_category(&mut self, category: Uuid, item: Uuid) -> Result<CmdResult> {
        self.run(|catalog| commands::categories::toggle_item(catalog, category, item))
    }

    // --- Days ---

    /// Show a date. The day is created in memory only; it is not saved
    /// until something is recorded on it.
    pub fn open_day(&mut self, date: NaiveDate) -> CmdResult {
        commands::days::open_day(&mut self.catalog, date)
    }

    pub fn close_day(&mut self, date: NaiveDate) -> Result<CmdResult> {
        self.run(|catalog| Ok(commands::days::close_day(catalog, date)))
    }

    pub fn set_day_notes(&mut self, date: NaiveDate, notes: &str) -> Result<CmdResult> {
        self.run(|catalog| Ok(commands::days::set_day_notes(catalog, date, notes)))
    }

    pub fn toggle_item_on_day(
        &mut self,
        date: NaiveDate,
        item: Uuid,
        today: NaiveDate,
    ) -> Result<CmdResult> {
        self.run(|catalog| commands::days::toggle_item_on_day(catalog, date, item, today))
    }

    // --- Selection ---

    /// Mark every selected item as worn on `date`, then clear the selection.
    ///
    /// Selected items that no longer exist are dropped with a warning. The
    /// selection is kept if the save fails.
    pub fn assign_selection_to_day(&mut self, date: NaiveDate, today: NaiveDate) -> Result<CmdResult> {
        let Some((ids, mut notes)) = self.take_live_selection() else {
            return Ok(CmdResult::default().with_message(CmdMessage::info("No items selected")));
        };
        let mut result =
            self.run(|catalog| commands::days::assign_items_to_day(catalog, date, &ids, today))?;
        if !result.has_errors() && !result.has_warnings() {
            self.selection.clear();
        }
        notes.append(&mut result.messages);
        result.messages = notes;
        Ok(result)
    }

    /// Add every selected item to `category`, then clear the selection.
    ///
    /// The selection is kept if the save fails or the category is gone.
    pub fn assign_selection_to_category(&mut self, category: Uuid) -> Result<CmdResult> {
        let Some((ids, mut notes)) = self.take_live_selection() else {
            return Ok(CmdResult::default().with_message(CmdMessage::info("No items selected")));
        };
        let mut result =
            self.run(|catalog| commands::categories::add_items(catalog, category, &ids))?;
        if !result.has_errors() && !result.has_warnings() {
            self.selection.clear();
        }
        notes.append(&mut result.messages);
        result.messages = notes;
        Ok(result)
    }

    /// Drop selected ids whose items no longer exist. Returns the remaining
    /// ids and a warning per dropped id, or `None` if nothing is left.
    fn take_live_selection(&mut self) -> Option<(Vec<Uuid>, Vec<CmdMessage>)> {
        let mut notes = Vec::new();
        let catalog = &self.catalog;
        self.selection.retain(|id| {
            let live = catalog.contains_item(*id);
            if !live {
                notes.push(CmdMessage::warning(format!(
                    "Selected item {} no longer exists",
                    id
                )));
            }
            live
        });
        if self.selection.is_empty() {
            return None;
        }
        Some((self.selection.ids().to_vec(), notes))
    }

    // --- Listing ---

    pub fn list_items(&self, state: &FilterState) -> CmdResult {
        commands::list::list_items(&self.catalog, state)
    }

    pub fn list_favorites(&self) -> CmdResult {
        commands::list::list_favorites(&self.catalog)
    }

    pub fn list_categories(&self) -> CmdResult {
        commands::list::list_categories(&self.catalog)
    }

    pub fn category_items(&self, category: Uuid) -> Result<CmdResult> {
        commands::list::category_items(&self.catalog, category)
    }

    pub fn worn_dates(&self, item: Uuid) -> Result<Vec<NaiveDate>> {
        commands::list::worn_dates(&self.catalog, item)
    }

    // --- Persistence ---

    /// Commit anything still pending, e.g. after a failed save.
    pub fn save(&mut self) -> CmdResult {
        let mut result = CmdResult::default();
        if self.commit_into(&mut result) {
            result.add_message(CmdMessage::success("All changes saved"));
        }
        result
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.catalog.has_changes()
    }

    fn run<F>(&mut self, command: F) -> Result<CmdResult>
    where
        F: FnOnce(&mut Catalog) -> Result<CmdResult>,
    {
        let mut result = match command(&mut self.catalog) {
            Ok(result) => result,
            Err(e) if e.is_not_found() => {
                debug!(error = %e, "command target vanished");
                return Ok(CmdResult::default().with_message(CmdMessage::warning(e.to_string())));
            }
            Err(e) => return Err(e),
        };
        self.commit_into(&mut result);
        Ok(result)
    }

    /// Commit the catalog. On failure, report it in `result` and keep going.
    fn commit_into(&mut self, result: &mut CmdResult) -> bool {
        match self.catalog.commit(&mut self.store) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "save failed; changes kept in memory");
                result.add_message(CmdMessage::error(format!("Could not save changes: {}", e)));
                false
            }
        }
    }

    /// The first explicit background preference among `categories`.
    fn category_preference(&self, categories: &[Uuid]) -> Option<bool> {
        categories
            .iter()
            .find_map(|id| self.catalog.category(*id).ok()?.remove_background)
    }

    fn prepare(&self, image: ImagePayload, preference: Option<bool>) -> ImagePayload {
        let enabled = self.config.remove_background_for(preference);
        prepare_image(self.remover.as_deref(), image, enabled)
    }
}
