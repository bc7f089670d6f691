use std::collections::BTreeSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::attributes::{AttrFilter, AttrValue};
use crate::model::{Rgba, Season, Size};

/// The query the user is building.
///
/// Set-valued axes match if the item hits any selected value; an empty set
/// means "don't filter on this". `None` flags work the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub categories: BTreeSet<Uuid>,
    pub colors: BTreeSet<Rgba>,
    pub sizes: BTreeSet<Size>,
    pub seasons: BTreeSet<Season>,
    /// Keep items last worn on or before this date (never-worn included).
    pub last_worn_before: Option<NaiveDate>,
    pub ironable: Option<bool>,
    pub washing: Option<bool>,
    pub dirty: Option<bool>,
    pub search: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no axis is active.
    pub fn is_empty(&self) -> bool {
        self.active_attrs().is_empty()
    }

    /// Attribute names of the active axes, in evaluation order.
    pub fn active_attrs(&self) -> Vec<&'static str> {
        let mut attrs = Vec::new();
        if !self.categories.is_empty() {
            attrs.push("categories");
        }
        if !self.colors.is_empty() {
            attrs.push("color");
        }
        if !self.sizes.is_empty() {
            attrs.push("size");
        }
        if !self.seasons.is_empty() {
            attrs.push("seasons");
        }
        if self.last_worn_before.is_some() {
            attrs.push("last_worn");
        }
        if self.ironable.is_some() {
            attrs.push("ironable");
        }
        if self.washing.is_some() {
            attrs.push("washing");
        }
        if self.dirty.is_some() {
            attrs.push("dirty");
        }
        if !self.search.is_empty() {
            attrs.push("name");
        }
        attrs
    }

    /// Compile every active axis into one attribute filter.
    pub fn to_filters(&self) -> Vec<AttrFilter> {
        let mut filters = Vec::new();

        if !self.categories.is_empty() {
            filters.push(AttrFilter::intersects(
                "categories",
                self.categories.iter().copied().map(AttrValue::Ref).collect(),
            ));
        }
        if !self.colors.is_empty() {
            filters.push(AttrFilter::one_of(
                "color",
                self.colors.iter().copied().map(AttrValue::Color).collect(),
            ));
        }
        if !self.sizes.is_empty() {
            filters.push(AttrFilter::one_of(
                "size",
                self.sizes.iter().copied().map(AttrValue::Size).collect(),
            ));
        }
        if !self.seasons.is_empty() {
            filters.push(AttrFilter::intersects(
                "seasons",
                self.seasons.iter().copied().map(AttrValue::Season).collect(),
            ));
        }
        if let Some(cutoff) = self.last_worn_before {
            filters.push(AttrFilter::on_or_before("last_worn", cutoff));
        }
        for (attr, flag) in [
            ("ironable", self.ironable),
            ("washing", self.washing),
            ("dirty", self.dirty),
        ] {
            if let Some(flag) = flag {
                filters.push(AttrFilter::eq(attr, AttrValue::Bool(flag)));
            }
        }
        if !self.search.is_empty() {
            filters.push(AttrFilter::contains_text("name", &self.search));
        }

        filters
    }

    /// Reset every axis.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
