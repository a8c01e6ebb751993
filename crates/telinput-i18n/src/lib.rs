#![forbid(unsafe_code)]

//! Country catalog and collation for telinput.
//!
//! Provides the immutable, locale-sorted list of (display name, calling
//! code, region) entries that backs the country picker, plus the collation
//! seam used to order it.
//!
//! # Role in telinput
//! `telinput-i18n` isolates localization concerns so the widget and the
//! formatter stay deterministic. A catalog is built once per locale and
//! shared read-only (`Arc`) across widget instances.
//!
//! # How it fits in the system
//! The picker state machine iterates the catalog in sorted order and
//! resolves regions to entries; the widget consults it to validate default
//! regions at setup. Nothing here depends on events, formatting, or any
//! runtime concern, keeping the localization layer reusable and testable.

pub mod catalog;
pub mod collate;
mod names;

pub use catalog::{CatalogEntry, CatalogError, CountryCatalog, EnglishNames, NameProvider};
pub use collate::{Collator, InvariantCollator};
