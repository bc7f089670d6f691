//! Category commands.
//!
//! - `create_category`: Add a new category
//! - `update_category`: Rename or change image / background preference
//! - `delete_category`: Remove a category, detaching or deleting its items
//! - `add_items`, `remove_items`, `toggle_item`: Membership changes

use uuid::Uuid;

use crate::catalog::{Catalog, CategoryDeletion};
use crate::commands::{CategoryUpdate, CmdMessage, CmdResult};
use crate::error::{Result, WardrobeError};
use crate::model::{Category, ImagePayload, ItemEntry};

pub fn create_category(
    catalog: &mut Catalog,
    name: &str,
    image: Option<ImagePayload>,
    remove_background: Option<bool>,
) -> Result<CmdResult> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WardrobeError::Api(
            "Category name cannot be empty".to_string(),
        ));
    }

    let mut category = Category::new(name);
    category.image = image;
    category.remove_background = remove_background;
    catalog.insert_category(category.clone());

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Created category '{}'", name)));
    result.affected_categories.push(category);
    Ok(result)
}

pub fn update_category(
    catalog: &mut Catalog,
    id: Uuid,
    update: CategoryUpdate,
) -> Result<CmdResult> {
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(WardrobeError::Api(
                "Category name cannot be empty".to_string(),
            ));
        }
    }

    let category = catalog.update_category(id, |category| {
        if let Some(name) = update.name {
            category.name = name.trim().to_string();
        }
        if let Some(image) = update.image {
            category.image = Some(image);
        }
        if let Some(preference) = update.remove_background {
            category.remove_background = preference;
        }
    })?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Updated category '{}'",
        category.name
    )));
    result.affected_categories.push(category.clone());
    Ok(result)
}

pub fn delete_category(
    catalog: &mut Catalog,
    id: Uuid,
    mode: CategoryDeletion,
) -> Result<CmdResult> {
    let (category, deleted) = catalog.delete_category(id, mode)?;

    let mut result = CmdResult::default();
    let message = match mode {
        CategoryDeletion::DetachItems => format!("Deleted category '{}'", category.name),
        CategoryDeletion::DeleteItems => format!(
            "Deleted category '{}' and {} item(s)",
            category.name,
            deleted.len()
        ),
    };
    result.add_message(CmdMessage::success(message));
    result.affected_items = deleted
        .into_iter()
        .map(|item| ItemEntry::new(item, Vec::new()))
        .collect();
    result.affected_categories.push(category);
    Ok(result)
}

/// Add items to a category. Items already in it are left alone.
pub fn add_items(catalog: &mut Catalog, category: Uuid, items: &[Uuid]) -> Result<CmdResult> {
    let name = catalog.category(category)?.name.clone();
    for item in items {
        catalog.item(*item)?;
    }

    let mut result = CmdResult::default();
    let mut added = 0;
    for item in items {
        if catalog.add_item_to_category(*item, category)? {
            added += 1;
            result.affected_items.push(catalog.entry(*item)?);
        }
    }

    if added == 0 {
        result.add_message(CmdMessage::info(format!(
            "All items already in '{}'",
            name
        )));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Added {} item(s) to '{}'",
            added, name
        )));
    }
    Ok(result)
}

/// Remove items from a category. Items not in it are left alone.
pub fn remove_items(catalog: &mut Catalog, category: Uuid, items: &[Uuid]) -> Result<CmdResult> {
    let name = catalog.category(category)?.name.clone();
    for item in items {
        catalog.item(*item)?;
    }

    let mut result = CmdResult::default();
    let mut removed = 0;
    for item in items {
        if catalog.remove_item_from_category(*item, category)? {
            removed += 1;
            result.affected_items.push(catalog.entry(*item)?);
        }
    }

    if removed == 0 {
        result.add_message(CmdMessage::info(format!("No items were in '{}'", name)));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Removed {} item(s) from '{}'",
            removed, name
        )));
    }
    Ok(result)
}

pub fn toggle_item(catalog: &mut Catalog, category: Uuid, item: Uuid) -> Result<CmdResult> {
    let member = catalog.toggle_item_in_category(item, category)?;
    let name = catalog.category(category)?.name.clone();
    let entry = catalog.entry(item)?;

    let message = if member {
        format!("Added '{}' to '{}'", entry.item.name, name)
    } else {
        format!("Removed '{}' from '{}'", entry.item.name, name)
    };
    Ok(CmdResult::default()
        .with_affected_items(vec![entry])
        .with_message(CmdMessage::success(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::{ClothingItem, Rgba, Size};

    fn setup() -> (Catalog, Uuid, Uuid) {
        let mut catalog = Catalog::new();
        let item = catalog.insert_item(ClothingItem::new("Shirt", Rgba::RED, Size::M));
        let result = create_category(&mut catalog, "Tops", None, None).unwrap();
        let category = result.affected_categories[0].id;
        (catalog, item, category)
    }

    #[test]
    fn test_create_category_rejects_empty_name() {
        let mut catalog = Catalog::new();
        assert!(matches!(
            create_category(&mut catalog, "  ", None, None),
            Err(WardrobeError::Api(_))
        ));
        assert_eq!(catalog.categories().count(), 0);
    }

    #[test]
    fn test_update_category_preference() {
        let (mut catalog, _, category) = setup();
        let update = CategoryUpdate {
            name: Some("Shirts".into()),
            remove_background: Some(Some(true)),
            ..Default::default()
        };
        update_category(&mut catalog, category, update).unwrap();

        let stored = catalog.category(category).unwrap();
        assert_eq!(stored.name, "Shirts");
        assert_eq!(stored.remove_background, Some(true));
    }

    #[test]
    fn test_add_items_is_idempotent() {
        let (mut catalog, item, category) = setup();
        let first = add_items(&mut catalog, category, &[item]).unwrap();
        assert_eq!(first.affected_items.len(), 1);

        let second = add_items(&mut catalog, category, &[item]).unwrap();
        assert!(second.affected_items.is_empty());
        assert_eq!(second.messages[0].level, MessageLevel::Info);
        assert_eq!(catalog.categories_of(item), &[category]);
    }

    #[test]
    fn test_remove_items() {
        let (mut catalog, item, category) = setup();
        add_items(&mut catalog, category, &[item]).unwrap();
        let result = remove_items(&mut catalog, category, &[item]).unwrap();
        assert_eq!(result.affected_items.len(), 1);
        assert!(!catalog.is_in_category(item, category));
    }

    #[test]
    fn test_toggle_item() {
        let (mut catalog, item, category) = setup();
        let result = toggle_item(&mut catalog, category, item).unwrap();
        assert_eq!(result.affected_items[0].categories, vec![category]);

        let result = toggle_item(&mut catalog, category, item).unwrap();
        assert!(result.affected_items[0].categories.is_empty());
    }

    #[test]
    fn test_delete_category_modes() {
        let (mut catalog, item, category) = setup();
        add_items(&mut catalog, category, &[item]).unwrap();
        let result = delete_category(&mut catalog, category, CategoryDeletion::DetachItems).unwrap();
        assert!(result.affected_items.is_empty());
        assert!(catalog.contains_item(item));

        let (mut catalog, item, category) = setup();
        add_items(&mut catalog, category, &[item]).unwrap();
        let result = delete_category(&mut catalog, category, CategoryDeletion::DeleteItems).unwrap();
        assert_eq!(result.affected_items.len(), 1);
        assert!(!catalog.contains_item(item));
    }
}
