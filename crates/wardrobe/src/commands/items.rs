//! Item commands.
//!
//! - `create_item`: Add a new item, optionally into categories
//! - `update_item`: Apply a partial edit
//! - `delete_item`: Remove an item and all its relations
//! - `set_flag`: Set a boolean attribute (`favorite`, `ironable`, `dirty`, `washing`)
//! - `set_clean_state`: Move an item between Clean, Dirty and Washing

use uuid::Uuid;

use crate::attributes::{get_spec, AttrSideEffect, AttrValue, AttributeKind};
use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult, ItemDraft, ItemUpdate};
use crate::error::{Result, WardrobeError};
use crate::model::{CleanState, ClothingItem, ItemEntry};

pub fn create_item(catalog: &mut Catalog, draft: ItemDraft) -> Result<CmdResult> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(WardrobeError::Api("Item name cannot be empty".to_string()));
    }
    for category in &draft.categories {
        catalog.category(*category)?;
    }

    let mut item = ClothingItem::new(name, draft.color, draft.size);
    item.notes = draft.notes;
    item.set_seasons(&draft.seasons);
    item.ironable = draft.ironable;
    item.is_favorite = draft.is_favorite;
    item.set_clean_state(draft.state);
    item.image = draft.image;

    let id = catalog.insert_item(item);
    for category in &draft.categories {
        catalog.add_item_to_category(id, *category)?;
    }

    let entry = catalog.entry(id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added item '{}'",
        entry.item.name
    )));
    result.affected_items.push(entry);
    Ok(result)
}

pub fn update_item(catalog: &mut Catalog, id: Uuid, update: ItemUpdate) -> Result<CmdResult> {
    catalog.item(id)?;
    if update.is_empty() {
        return Ok(CmdResult::default().with_message(CmdMessage::info("Nothing to update")));
    }
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(WardrobeError::Api("Item name cannot be empty".to_string()));
        }
    }

    catalog.update_item(id, |item| {
        if let Some(name) = update.name {
            item.name = name.trim().to_string();
        }
        if let Some(notes) = update.notes {
            item.notes = notes;
        }
        if let Some(color) = update.color {
            item.color = color;
        }
        if let Some(size) = update.size {
            item.size = size;
        }
        if let Some(seasons) = update.seasons {
            item.set_seasons(&seasons);
        }
        if let Some(ironable) = update.ironable {
            item.ironable = ironable;
        }
        if let Some(favorite) = update.is_favorite {
            item.is_favorite = favorite;
        }
        if let Some(state) = update.state {
            item.set_clean_state(state);
        }
        if let Some(image) = update.image {
            item.image = Some(image);
        }
    })?;

    let entry = catalog.entry(id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Updated item '{}'",
        entry.item.name
    )));
    result.affected_items.push(entry);
    Ok(result)
}

pub fn delete_item(catalog: &mut Catalog, id: Uuid) -> Result<CmdResult> {
    let categories = catalog.categories_of(id).to_vec();
    let item = catalog.remove_item(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deleted item '{}'",
        item.name
    )));
    result.affected_items.push(ItemEntry::new(item, categories));
    Ok(result)
}

/// Set a boolean attribute on several items.
///
/// Coupled flags report what they cleared: marking a washing item dirty
/// takes it out of the wash.
pub fn set_flag(catalog: &mut Catalog, ids: &[Uuid], attr: &str, value: bool) -> Result<CmdResult> {
    match get_spec(attr) {
        Some(spec) if spec.kind == AttributeKind::Bool && !spec.derived => {}
        _ => {
            return Err(WardrobeError::Api(format!(
                "'{}' is not a settable flag",
                attr
            )))
        }
    }
    for id in ids {
        catalog.item(*id)?;
    }

    let mut result = CmdResult::default();
    for id in ids {
        let mut effect = None;
        catalog.update_item(*id, |item| {
            effect = item.set_attr(attr, AttrValue::Bool(value));
        })?;
        let entry = catalog.entry(*id)?;
        if let Some(AttrSideEffect::Cleared(other)) = effect {
            result.add_message(CmdMessage::info(format!(
                "'{}' is no longer {}",
                entry.item.name, other
            )));
        }
        result.affected_items.push(entry);
    }

    let verb = if value { "Set" } else { "Cleared" };
    result.add_message(CmdMessage::success(format!(
        "{} {} on {} item(s)",
        verb,
        attr,
        ids.len()
    )));
    Ok(result)
}

pub fn set_favorite(catalog: &mut Catalog, ids: &[Uuid], favorite: bool) -> Result<CmdResult> {
    set_flag(catalog, ids, "favorite", favorite)
}

pub fn set_ironable(catalog: &mut Catalog, ids: &[Uuid], ironable: bool) -> Result<CmdResult> {
    set_flag(catalog, ids, "ironable", ironable)
}

pub fn set_clean_state(
    catalog: &mut Catalog,
    ids: &[Uuid],
    state: CleanState,
) -> Result<CmdResult> {
    for id in ids {
        catalog.item(*id)?;
    }

    let mut result = CmdResult::default();
    for id in ids {
        catalog.update_item(*id, |item| item.set_clean_state(state))?;
        result.affected_items.push(catalog.entry(*id)?);
    }
    result.add_message(CmdMessage::success(format!(
        "Marked {} item(s) {:?}",
        ids.len(),
        state
    )));
    Ok(result)
}
