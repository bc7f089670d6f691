//! Attribute specifications and registry.
//!
//! This module defines the schema for item attributes: what kind of value
//! each holds, whether the filter engine can select on it, and whether
//! the catalog derives it.

/// The kind of value an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Simple boolean (e.g., `ironable`)
    Bool,

    /// Free text (e.g., `name`)
    Text,

    /// RGBA color
    Color,

    /// Size code XS..XL
    Size,

    /// Calendar date (e.g., `last_worn`)
    Date,

    /// Enum with a fixed set of valid values (e.g., `state`)
    Enum,

    /// List of values (e.g., `seasons`)
    List,

    /// List of references to other entities (e.g., `categories`)
    Refs,
}

/// Specification for a single item attribute.
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    /// The attribute name used in the API (e.g., "color", "seasons")
    pub name: &'static str,

    /// The kind of value this attribute holds
    pub kind: AttributeKind,

    /// Whether an [`AttrFilter`](super::AttrFilter) may select on it
    pub filterable: bool,

    /// Whether the value is derived by the catalog and cannot be set directly
    pub derived: bool,
}

impl AttributeSpec {
    const fn new(name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            kind,
            filterable: false,
            derived: false,
        }
    }

    const fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    const fn derived(mut self) -> Self {
        self.derived = true;
        self
    }
}

/// Registry of all item attributes.
///
/// Adding a new attribute means adding an entry here and teaching
/// `ClothingItem::get_attr` about it.
pub const ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("name", AttributeKind::Text).filterable(),
    AttributeSpec::new("color", AttributeKind::Color).filterable(),
    AttributeSpec::new("size", AttributeKind::Size).filterable(),
    AttributeSpec::new("seasons", AttributeKind::List).filterable(),
    AttributeSpec::new("categories", AttributeKind::Refs)
        .filterable()
        .derived(),
    AttributeSpec::new("last_worn", AttributeKind::Date)
        .filterable()
        .derived(),
    AttributeSpec::new("ironable", AttributeKind::Bool).filterable(),
    AttributeSpec::new("washing", AttributeKind::Bool).filterable(),
    AttributeSpec::new("dirty", AttributeKind::Bool).filterable(),
    AttributeSpec::new("state", AttributeKind::Enum),
    AttributeSpec::new("favorite", AttributeKind::Bool),
];

/// Look up an attribute spec by name.
pub fn get_spec(name: &str) -> Option<&'static AttributeSpec> {
    ATTRIBUTES.iter().find(|spec| spec.name == name)
}

/// Whether filters on `name` can match at all.
pub fn is_filterable(name: &str) -> bool {
    get_spec(name).is_some_and(|spec| spec.filterable)
}
