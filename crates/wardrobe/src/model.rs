//! # Domain Model
//!
//! This module defines the core data structures of the wardrobe catalog:
//! [`ClothingItem`], [`Category`] and [`Day`], plus the small value types
//! they are built from ([`Rgba`], [`Size`], [`Season`], [`CleanState`]).
//!
//! ## Relationships Are Not Stored Here
//!
//! An item belongs to categories and is worn on days, but none of these
//! structs hold the other side of a relationship. Membership lives in the
//! catalog's link indexes (see [`crate::catalog`]), which update both
//! directions in a single call. The filter engine works on [`ItemEntry`],
//! a snapshot pairing an item with its category ids.
//!
//! ## Cleanliness
//!
//! The user-facing state is Clean / Dirty / Washing. It is stored as two
//! flags, `dirty` and `washing`, which are never both true:
//!
//! | State | `dirty` | `washing` |
//! |-------|---------|-----------|
//! | Clean | false | false |
//! | Dirty | true | false |
//! | Washing | false | true |
//!
//! ## Never Worn
//!
//! `last_worn` is a plain date. Items that were never worn carry the
//! sentinel [`NEVER_WORN`] (the minimum representable date), so a
//! "worn before X" filter naturally includes them.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attributes::{get_spec, AttrSideEffect, AttrValue};
use crate::error::{Result, WardrobeError};

/// Sentinel `last_worn` value for items that were never worn.
pub const NEVER_WORN: NaiveDate = NaiveDate::MIN;

/// An RGBA color with 8-bit channels.
///
/// Colors compare structurally: two colors are the same only if all four
/// channels are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const GREEN: Rgba = Rgba::rgb(0, 128, 0);
    pub const BLUE: Rgba = Rgba::rgb(0, 0, 255);
    pub const YELLOW: Rgba = Rgba::rgb(255, 255, 0);
    pub const GRAY: Rgba = Rgba::rgb(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Garment size, encoded as a 0-based code (XS=0 .. XL=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Size {
    XS,
    S,
    M,
    L,
    XL,
}

impl Size {
    pub const ALL: [Size; 5] = [Size::XS, Size::S, Size::M, Size::L, Size::XL];

    pub fn code(self) -> u8 {
        match self {
            Size::XS => 0,
            Size::S => 1,
            Size::M => 2,
            Size::L => 3,
            Size::XL => 4,
        }
    }

    pub fn from_code(code: u8) -> Result<Self> {
        Size::ALL
            .get(code as usize)
            .copied()
            .ok_or(WardrobeError::InvalidSize(code))
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::M
    }
}

impl TryFrom<u8> for Size {
    type Error = WardrobeError;

    fn try_from(code: u8) -> Result<Self> {
        Size::from_code(code)
    }
}

impl From<Size> for u8 {
    fn from(size: Size) -> u8 {
        size.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CleanState {
    Clean,
    Dirty,
    Washing,
}

impl Default for CleanState {
    fn default() -> Self {
        Self::Clean
    }
}

/// Encoded image bytes, opaque to the catalog.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload(pub Vec<u8>);

impl ImagePayload {
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImagePayload({} bytes)", self.0.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    pub color: Rgba,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default = "never_worn", with = "last_worn_format")]
    pub last_worn: NaiveDate,
    #[serde(default)]
    pub dirty: bool,
    #[serde(default)]
    pub washing: bool,
    #[serde(default)]
    pub ironable: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub image: Option<ImagePayload>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn never_worn() -> NaiveDate {
    NEVER_WORN
}

// The sentinel is stored as `null` rather than as an extreme date string.
mod last_worn_format {
    use super::NEVER_WORN;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        let stored = (*date != NEVER_WORN).then_some(*date);
        stored.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        Ok(Option::<NaiveDate>::deserialize(deserializer)?.unwrap_or(NEVER_WORN))
    }
}

impl ClothingItem {
    pub fn new(name: impl Into<String>, color: Rgba, size: Size) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            notes: String::new(),
            color,
            size,
            seasons: Vec::new(),
            last_worn: NEVER_WORN,
            dirty: false,
            washing: false,
            ironable: false,
            is_favorite: false,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_been_worn(&self) -> bool {
        self.last_worn != NEVER_WORN
    }

    pub fn clean_state(&self) -> CleanState {
        match (self.dirty, self.washing) {
            (true, _) => CleanState::Dirty,
            (false, true) => CleanState::Washing,
            (false, false) => CleanState::Clean,
        }
    }

    pub fn set_clean_state(&mut self, state: CleanState) {
        self.dirty = state == CleanState::Dirty;
        self.washing = state == CleanState::Washing;
        self.updated_at = Utc::now();
    }

    /// Replace the season tags, dropping duplicates but keeping first-seen order.
    pub fn set_seasons(&mut self, seasons: &[Season]) {
        self.seasons.clear();
        for season in seasons {
            if !self.seasons.contains(season) {
                self.seasons.push(*season);
            }
        }
        self.updated_at = Utc::now();
    }

    /// Get an attribute value by name.
    ///
    /// Returns `None` for unknown names. Relationship attributes
    /// (`categories`) are not known to the item; see [`ItemEntry::get_attr`].
    ///
    /// | Name | Value |
    /// |------|-------|
    /// | `"name"` | `Text` |
    /// | `"color"` | `Color` |
    /// | `"size"` | `Size` |
    /// | `"seasons"` | `List` of `Season` |
    /// | `"last_worn"` | `Date` |
    /// | `"state"` | `Enum` (Clean/Dirty/Washing) |
    /// | `"dirty"`, `"washing"`, `"ironable"`, `"favorite"` | `Bool` |
    pub fn get_attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "name" => Some(AttrValue::Text(self.name.clone())),
            "color" => Some(AttrValue::Color(self.color)),
            "size" => Some(AttrValue::Size(self.size)),
            "seasons" => Some(AttrValue::List(
                self.seasons.iter().copied().map(AttrValue::Season).collect(),
            )),
            "last_worn" => Some(AttrValue::Date(self.last_worn)),
            "state" => Some(AttrValue::Enum(format!("{:?}", self.clean_state()))),
            "dirty" => Some(AttrValue::Bool(self.dirty)),
            "washing" => Some(AttrValue::Bool(self.washing)),
            "ironable" => Some(AttrValue::Bool(self.ironable)),
            "favorite" => Some(AttrValue::Bool(self.is_favorite)),
            _ => None,
        }
    }

    /// Set an attribute value by name.
    ///
    /// Returns `None` if the name is unknown or the value has the wrong type.
    ///
    /// `dirty` and `washing` are coupled: setting one to true clears the
    /// other. Changing `last_worn` directly is not allowed here; it is
    /// derived from day associations.
    pub fn set_attr(&mut self, name: &str, value: AttrValue) -> Option<AttrSideEffect> {
        if get_spec(name).is_some_and(|spec| spec.derived) {
            return None;
        }
        let effect = match name {
            "name" => {
                self.name = value.as_text()?.to_string();
                AttrSideEffect::None
            }
            "color" => {
                self.color = value.as_color()?;
                AttrSideEffect::None
            }
            "size" => {
                self.size = value.as_size()?;
                AttrSideEffect::None
            }
            "seasons" => {
                let seasons: Option<Vec<Season>> =
                    value.as_list()?.iter().map(AttrValue::as_season).collect();
                self.set_seasons(&seasons?);
                AttrSideEffect::None
            }
            "state" => {
                let state = match value.as_enum()? {
                    "Clean" => CleanState::Clean,
                    "Dirty" => CleanState::Dirty,
                    "Washing" => CleanState::Washing,
                    _ => return None,
                };
                self.set_clean_state(state);
                AttrSideEffect::None
            }
            "dirty" => {
                let flag = value.as_bool()?;
                self.dirty = flag;
                if flag && self.washing {
                    self.washing = false;
                    AttrSideEffect::Cleared("washing")
                } else {
                    AttrSideEffect::None
                }
            }
            "washing" => {
                let flag = value.as_bool()?;
                self.washing = flag;
                if flag && self.dirty {
                    self.dirty = false;
                    AttrSideEffect::Cleared("dirty")
                } else {
                    AttrSideEffect::None
                }
            }
            "ironable" => {
                self.ironable = value.as_bool()?;
                AttrSideEffect::None
            }
            "favorite" => {
                self.is_favorite = value.as_bool()?;
                AttrSideEffect::None
            }
            _ => return None,
        };
        self.updated_at = Utc::now();
        Some(effect)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub image: Option<ImagePayload>,
    /// Whether images added through this category should have their
    /// background removed. `None` defers to the configured default.
    #[serde(default)]
    pub remove_background: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            image: None,
            remove_background: None,
            created_at: Utc::now(),
        }
    }
}

/// A calendar day with notes. Keyed by its date: at most one per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            notes: String::new(),
        }
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.trim().is_empty()
    }
}

/// An item together with the ids of the categories it belongs to.
///
/// This is the unit the filter engine works on. Entries are cheap,
/// self-contained snapshots that can be moved to a worker thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEntry {
    pub item: ClothingItem,
    pub categories: Vec<Uuid>,
}

impl ItemEntry {
    pub fn new(item: ClothingItem, categories: Vec<Uuid>) -> Self {
        Self { item, categories }
    }

    pub fn id(&self) -> Uuid {
        self.item.id
    }

    /// Get an attribute value by name, including relationship attributes.
    ///
    /// `"categories"` yields a `List` of `Ref`; everything else is
    /// delegated to [`ClothingItem::get_attr`].
    pub fn get_attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "categories" => Some(AttrValue::List(
                self.categories.iter().copied().map(AttrValue::Ref).collect(),
            )),
            _ => self.item.get_attr(name),
        }
    }
}
