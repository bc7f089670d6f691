//! # Command Layer
//!
//! This module contains the business operations of the wardrobe. Each group
//! of commands lives in its own submodule and works directly on a
//! [`Catalog`](crate::catalog::Catalog).
//!
//! ## Role and Responsibilities
//!
//! Commands:
//! - Validate input and resolve ids
//! - Mutate the catalog through its relationship-safe methods
//! - Return a structured [`CmdResult`] with affected/listed entities and messages
//!
//! Commands do not commit. Persisting is the API facade's job, which runs a
//! command and then commits the catalog to the store once.
//!
//! ## Structured Returns
//!
//! [`CmdResult`] carries:
//! - `affected_items`: Items that were modified, as [`ItemEntry`] snapshots
//! - `listed_items`: Items to display
//! - `affected_categories` / `listed_categories`: Same, for categories
//! - `days`: Days touched or requested
//! - `messages`: Structured messages with levels (info, success, warning, error)
//!
//! ## Command Modules
//!
//! - [`items`]: Create, update, delete items; favorite, cleanliness, ironable
//! - [`categories`]: Category CRUD and membership
//! - [`days`]: Day notes and worn-on associations
//! - [`list`]: Filtered listings

use serde::Serialize;
use uuid::Uuid;

use crate::model::{Category, CleanState, Day, ImagePayload, ItemEntry, Rgba, Season, Size};

pub mod categories;
pub mod days;
pub mod items;
pub mod list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_items: Vec<ItemEntry>,
    pub listed_items: Vec<ItemEntry>,
    pub affected_categories: Vec<Category>,
    pub listed_categories: Vec<Category>,
    pub days: Vec<Day>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_items(mut self, items: Vec<ItemEntry>) -> Self {
        self.affected_items = items;
        self
    }

    pub fn with_listed_items(mut self, items: Vec<ItemEntry>) -> Self {
        self.listed_items = items;
        self
    }

    pub fn with_listed_categories(mut self, categories: Vec<Category>) -> Self {
        self.listed_categories = categories;
        self
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// True if any message is at `Error` level.
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level == MessageLevel::Error)
    }

    /// True if any message is at `Warning` level.
    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}

/// Everything needed to create an item.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub name: String,
    pub notes: String,
    pub color: Rgba,
    pub size: Size,
    pub seasons: Vec<Season>,
    pub ironable: bool,
    pub is_favorite: bool,
    pub state: CleanState,
    pub image: Option<ImagePayload>,
    /// Categories to add the new item to.
    pub categories: Vec<Uuid>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, color: Rgba, size: Size) -> Self {
        Self {
            name: name.into(),
            color,
            size,
            ..Default::default()
        }
    }
}

/// A partial edit of an item. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub color: Option<Rgba>,
    pub size: Option<Size>,
    pub seasons: Option<Vec<Season>>,
    pub ironable: Option<bool>,
    pub is_favorite: Option<bool>,
    pub state: Option<CleanState>,
    pub image: Option<ImagePayload>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.notes.is_none()
            && self.color.is_none()
            && self.size.is_none()
            && self.seasons.is_none()
            && self.ironable.is_none()
            && self.is_favorite.is_none()
            && self.state.is_none()
            && self.image.is_none()
    }
}

/// A partial edit of a category. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub image: Option<ImagePayload>,
    pub remove_background: Option<Option<bool>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_levels() {
        let result = CmdResult::default()
            .with_message(CmdMessage::info("one"))
            .with_message(CmdMessage::warning("two"));
        assert!(result.has_warnings());
        assert!(!result.has_errors());
    }

    #[test]
    fn test_message_level_serializes_lowercase() {
        let json = serde_json::to_string(&CmdMessage::success("done")).unwrap();
        assert_eq!(json, r#"{"level":"success","content":"done"}"#);
    }

    #[test]
    fn test_empty_update() {
        assert!(ItemUpdate::default().is_empty());
        let update = ItemUpdate {
            ironable: Some(true),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
