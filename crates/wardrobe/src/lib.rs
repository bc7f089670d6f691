//! # Wardrobe
//!
//! The UI-independent core of a personal wardrobe catalog: clothing items,
//! user-defined categories, and calendar days recording what was worn.
//!
//! ## Architecture
//!
//! ```text
//! UI session
//!    │
//!    ▼
//! api::WardrobeApi ──► commands::* ──► catalog::Catalog ──commit──► store::ObjectStore
//!    │                                     │
//!    │                                     └─ entries() ──► filter::FilterPipeline ──► watch channel
//!    └─ selection::Selection, vision::BackgroundRemover
//! ```
//!
//! - [`model`]: Items, categories, days and their value types
//! - [`attributes`]: Named item attributes and the generic [`attributes::AttrFilter`]
//! - [`catalog`]: The in-memory object graph with mirrored relationships
//! - [`filter`]: The filter engine and its debounced, off-thread pipeline
//! - [`store`]: The object store interface and an in-memory implementation
//! - [`commands`]: Business operations returning structured results
//! - [`api`]: The facade a UI talks to
//! - [`selection`]: Items picked for a bulk action
//! - [`vision`]: Background-removal collaborator
//! - [`config`]: Layered configuration
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber; the
//! embedding application decides where they go.

pub mod api;
pub mod attributes;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod selection;
pub mod store;
pub mod vision;

pub use api::WardrobeApi;
pub use error::{Result, WardrobeError};
