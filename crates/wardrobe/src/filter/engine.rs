use tracing::debug;

use super::FilterState;
use crate::attributes::AttrFilter;
use crate::model::ItemEntry;

/// Filter entries against a state, keeping their relative order.
///
/// All active axes must match (AND); within an axis any selected value
/// matches (OR). An empty state returns the input unchanged.
pub fn apply(entries: &[ItemEntry], state: &FilterState) -> Vec<ItemEntry> {
    let filters = state.to_filters();
    let result = apply_filters(entries, &filters);
    debug!(
        active = ?state.active_attrs(),
        input = entries.len(),
        output = result.len(),
        "filter pass"
    );
    result
}

/// Keep entries matching every filter.
pub fn apply_filters(entries: &[ItemEntry], filters: &[AttrFilter]) -> Vec<ItemEntry> {
    if filters.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| filters.iter().all(|f| f.matches(entry)))
        .cloned()
        .collect()
}
