//! # Filtering
//!
//! Narrowing the item collection to what the user asked for.
//!
//! - [`FilterState`]: the query being built (selected categories, colors,
//!   sizes, seasons, last-worn cutoff, flags, search text).
//! - [`apply`]: a pure function from entries and state to the matching
//!   entries, order preserved.
//! - [`FilterPipeline`]: keeps a published [`FilteredView`] up to date as
//!   the state and the source change, off the caller's thread.
//!
//! ## Semantics
//!
//! | Axis | Attribute | Matches when |
//! |------|-----------|--------------|
//! | categories | `categories` | selection empty, or item is in any selected category |
//! | colors | `color` | selection empty, or exact RGBA match with any |
//! | sizes | `size` | selection empty, or size is selected |
//! | seasons | `seasons` | selection empty, or item shares a season with it |
//! | last worn | `last_worn` | no cutoff, or last worn on/before it |
//! | ironable / washing / dirty | same | unset, or the flag equals it |
//! | search | `name` | empty, or name contains it ignoring case |
//!
//! Axes are AND-combined. Each one compiles to an
//! [`AttrFilter`](crate::attributes::AttrFilter), so the engine itself is
//! a single `all()` over those filters.

mod engine;
mod pipeline;
mod state;

pub use engine::{apply, apply_filters};
pub use pipeline::{FilterPipeline, FilteredView};
pub use state::FilterState;
