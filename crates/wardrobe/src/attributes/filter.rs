//! Attribute filtering.
//!
//! An [`AttrFilter`] is one condition on one attribute. The filter engine
//! compiles each active axis of a `FilterState` into one of these and keeps
//! an entry only if every condition matches.

use super::{is_filterable, AttrValue};
use crate::model::ItemEntry;

/// Filter operation for comparing attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Exact equality match.
    Eq,
    /// Attribute value equals any value of the filter list.
    OneOf,
    /// Attribute list shares at least one value with the filter list.
    Intersects,
    /// Attribute date is on or before the filter date.
    OnOrBefore,
    /// Attribute text contains the filter text, ignoring case.
    ContainsText,
}

/// A filter condition on an attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrFilter {
    /// The attribute name (e.g., "color", "seasons", "dirty")
    pub attr: String,
    pub op: FilterOp,
    /// The value to compare against
    pub value: AttrValue,
}

impl AttrFilter {
    pub fn new(attr: impl Into<String>, op: FilterOp, value: AttrValue) -> Self {
        Self {
            attr: attr.into(),
            op,
            value,
        }
    }

    pub fn eq(attr: impl Into<String>, value: AttrValue) -> Self {
        Self::new(attr, FilterOp::Eq, value)
    }

    pub fn one_of(attr: impl Into<String>, values: Vec<AttrValue>) -> Self {
        Self::new(attr, FilterOp::OneOf, AttrValue::List(values))
    }

    pub fn intersects(attr: impl Into<String>, values: Vec<AttrValue>) -> Self {
        Self::new(attr, FilterOp::Intersects, AttrValue::List(values))
    }

    pub fn on_or_before(attr: impl Into<String>, date: chrono::NaiveDate) -> Self {
        Self::new(attr, FilterOp::OnOrBefore, AttrValue::Date(date))
    }

    /// The needle is lowercased once here rather than on every match.
    pub fn contains_text(attr: impl Into<String>, needle: &str) -> Self {
        Self::new(
            attr,
            FilterOp::ContainsText,
            AttrValue::Text(needle.to_lowercase()),
        )
    }

    /// Check if this filter matches the given entry.
    ///
    /// Returns `false` if the attribute doesn't exist, is not filterable, or
    /// the value kinds don't line up with the operation.
    pub fn matches(&self, entry: &ItemEntry) -> bool {
        if !is_filterable(&self.attr) {
            return false;
        }
        let Some(attr_value) = entry.get_attr(&self.attr) else {
            return false;
        };

        match self.op {
            FilterOp::Eq => attr_value == self.value,
            FilterOp::OneOf => self
                .value
                .as_list()
                .is_some_and(|choices| choices.contains(&attr_value)),
            FilterOp::Intersects => list_intersects(&attr_value, &self.value),
            FilterOp::OnOrBefore => match (attr_value.as_date(), self.value.as_date()) {
                (Some(date), Some(cutoff)) => date <= cutoff,
                _ => false,
            },
            FilterOp::ContainsText => match (attr_value.as_text(), self.value.as_text()) {
                (Some(haystack), Some(needle)) => haystack.to_lowercase().contains(needle),
                _ => false,
            },
        }
    }
}

fn list_intersects(attr_value: &AttrValue, filter_value: &AttrValue) -> bool {
    let (Some(attr_list), Some(filter_list)) = (attr_value.as_list(), filter_value.as_list())
    else {
        return false;
    };
    filter_list.iter().any(|v| attr_list.contains(v))
}
