//! Listing commands.
//!
//! These never mutate the catalog. They are the synchronous counterpart of
//! [`FilterPipeline`](crate::filter::FilterPipeline): one filter pass over a
//! fresh snapshot.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::filter::{self, FilterState};

pub fn list_items(catalog: &Catalog, state: &FilterState) -> CmdResult {
    let entries = catalog.entries();
    let matched = filter::apply(&entries, state);

    let mut result = CmdResult::default();
    if matched.is_empty() && !entries.is_empty() {
        result.add_message(CmdMessage::info("No items match the current filters"));
    }
    result.with_listed_items(matched)
}

pub fn list_favorites(catalog: &Catalog) -> CmdResult {
    let favorites = catalog
        .entries()
        .into_iter()
        .filter(|entry| entry.item.is_favorite)
        .collect();
    CmdResult::default().with_listed_items(favorites)
}

pub fn list_categories(catalog: &Catalog) -> CmdResult {
    CmdResult::default().with_listed_categories(catalog.categories().cloned().collect())
}

pub fn category_items(catalog: &Catalog, category: Uuid) -> Result<CmdResult> {
    let items = catalog
        .items_in_category(category)?
        .into_iter()
        .map(|item| catalog.entry(item.id))
        .collect::<Result<Vec<_>>>()?;
    Ok(CmdResult::default().with_listed_items(items))
}

/// Dates an item was worn on, oldest first.
pub fn worn_dates(catalog: &Catalog, item: Uuid) -> Result<Vec<NaiveDate>> {
    catalog.item(item)?;
    let mut dates = catalog.days_of(item).to_vec();
    dates.sort();
    Ok(dates)
}
