//! Attribute value types and side effects.
//!
//! This module defines the runtime representation of item attribute values
//! and the side effects that can result from setting an attribute.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::model::{Rgba, Season, Size};

/// Runtime representation of an attribute value.
///
/// Used both for reading attributes through the unified API and as the
/// comparison operand of an [`AttrFilter`](super::AttrFilter).
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Simple boolean (e.g., `dirty`, `ironable`)
    Bool(bool),

    /// Free text (e.g., `name`)
    Text(String),

    /// Exact RGBA color
    Color(Rgba),

    /// Size code
    Size(Size),

    /// Calendar date (e.g., `last_worn`)
    Date(NaiveDate),

    /// A single season tag
    Season(Season),

    /// Enum value as string (e.g., `state` = "Clean" | "Dirty" | "Washing")
    Enum(String),

    /// Reference to another entity by id (e.g., a category)
    Ref(Uuid),

    /// List of values (e.g., `seasons`, `categories`, or a filter's choices)
    List(Vec<AttrValue>),
}

impl AttrValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            AttrValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<Size> {
        match self {
            AttrValue::Size(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            AttrValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_season(&self) -> Option<Season> {
        match self {
            AttrValue::Season(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttrValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(v) => Some(v),
            _ => None,
        }
    }
}

/// Side effects that result from setting an attribute.
///
/// `set_attr()` may change more than the named field. The caller uses
/// this to report or react to the extra change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrSideEffect {
    /// No additional change.
    None,

    /// A coupled flag was reset to false (e.g., setting `dirty` clears `washing`).
    Cleared(&'static str),
}
