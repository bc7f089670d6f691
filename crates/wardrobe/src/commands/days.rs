//! Day commands.
//!
//! A day is opened when the user looks at a date, and closed when they
//! leave it. Closing prunes the day if nothing was recorded on it.
//!
//! - `open_day`: Show a date's notes and worn items, creating the day lazily
//! - `close_day`: Leave a date
//! - `set_day_notes`: Replace a date's notes
//! - `toggle_item_on_day`: Mark an item worn / not worn on a date
//! - `assign_items_to_day`: Mark several items worn on a date

use chrono::NaiveDate;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;

fn day_result(catalog: &Catalog, date: NaiveDate) -> CmdResult {
    let mut result = CmdResult::default();
    if let Some(day) = catalog.day(date) {
        result.days.push(day.clone());
    }
    result.listed_items = catalog
        .items_on_day(date)
        .into_iter()
        .filter_map(|item| catalog.entry(item.id).ok())
        .collect();
    result
}

pub fn open_day(catalog: &mut Catalog, date: NaiveDate) -> CmdResult {
    catalog.open_day(date);
    day_result(catalog, date)
}

pub fn close_day(catalog: &mut Catalog, date: NaiveDate) -> CmdResult {
    let mut result = CmdResult::default();
    if catalog.close_day(date) {
        result.add_message(CmdMessage::info(format!("Nothing recorded on {}", date)));
    }
    result
}

pub fn set_day_notes(catalog: &mut Catalog, date: NaiveDate, notes: &str) -> CmdResult {
    catalog.set_day_notes(date, notes);
    let mut result = day_result(catalog, date);
    result.add_message(CmdMessage::success(format!("Saved notes for {}", date)));
    result
}

pub fn toggle_item_on_day(
    catalog: &mut Catalog,
    date: NaiveDate,
    item: Uuid,
    today: NaiveDate,
) -> Result<CmdResult> {
    let worn = catalog.toggle_item_on_day(date, item, today)?;
    let entry = catalog.entry(item)?;

    let mut result = day_result(catalog, date);
    let message = if worn {
        format!("Wore '{}' on {}", entry.item.name, date)
    } else {
        format!("Removed '{}' from {}", entry.item.name, date)
    };
    result.add_message(CmdMessage::success(message));
    result.affected_items.push(entry);
    Ok(result)
}

/// Mark items as worn on a date. Items already worn that day stay worn.
pub fn assign_items_to_day(
    catalog: &mut Catalog,
    date: NaiveDate,
    items: &[Uuid],
    today: NaiveDate,
) -> Result<CmdResult> {
    for item in items {
        catalog.item(*item)?;
    }

    let mut affected = Vec::new();
    for item in items {
        if !catalog.is_worn_on(date, *item) {
            catalog.toggle_item_on_day(date, *item, today)?;
            affected.push(catalog.entry(*item)?);
        }
    }

    let mut result = day_result(catalog, date);
    result.add_message(CmdMessage::success(format!(
        "Added {} item(s) to {}",
        affected.len(),
        date
    )));
    result.affected_items = affected;
    Ok(result)
}
