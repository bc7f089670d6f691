//! # Attribute System
//!
//! A unified abstraction over clothing item attributes. Instead of handling
//! each field (color, size, seasons, cleanliness flags...) ad hoc, the
//! attribute system provides:
//!
//! - **Type definitions**: what kinds of values attributes can hold
//! - **Specifications**: metadata about each attribute (kind, filterable, derived)
//! - **Unified access**: `get_attr()` / `set_attr()` on items and entries
//! - **Filtering**: generic predicates that work with any attribute
//!
//! ## Attribute Types
//!
//! | Kind | Examples | Description |
//! |------|----------|-------------|
//! | `Bool` | `dirty`, `ironable` | Simple true/false |
//! | `Text` | `name` | Free text, searchable |
//! | `Color` | `color` | RGBA, exact match |
//! | `Size` | `size` | XS..XL |
//! | `Date` | `last_worn` | Day granularity |
//! | `List` | `seasons` | Subset of a closed set |
//! | `Refs` | `categories` | Ids of related entities |
//!
//! ## Usage
//!
//! ```ignore
//! let value = entry.get_attr("color");
//!
//! // Setting `dirty` also clears `washing`
//! let effect = item.set_attr("dirty", AttrValue::Bool(true));
//!
//! let filter = AttrFilter::one_of("size", vec![AttrValue::Size(Size::M)]);
//! if filter.matches(&entry) { ... }
//! ```

mod filter;
mod spec;
mod value;

pub use filter::{AttrFilter, FilterOp};
pub use spec::{get_spec, is_filterable, AttributeKind, AttributeSpec, ATTRIBUTES};
pub use value::{AttrSideEffect, AttrValue};
