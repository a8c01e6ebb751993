#![forbid(unsafe_code)]

//! Core: canonical events, region identifiers, and turn-based deferral.
//!
//! # Role in telinput
//! `telinput-core` is the foundation layer. It owns the normalized input
//! event types the widget consumes, the `RegionCode` identifier shared by
//! the formatter and the country catalog, and the run-after-turn deferral
//! queue used for caret placement and blur re-checks.
//!
//! # Primary responsibilities
//! - **Event**: canonical input events (keys, paste, focus).
//! - **RegionCode**: validated ISO-3166 alpha-2 identifiers.
//! - **DeferQueue**: zero-delay callbacks with generation guarding.
//!
//! # How it fits in the system
//! The widget layer (`telinput-widgets`) consumes `telinput-core::Event`
//! values and schedules follow-up work on a `DeferQueue`. The formatter and
//! catalog crates only share `RegionCode`, keeping this crate free of any
//! phone-number or localization logic.

pub mod defer;
pub mod event;
pub mod region;

pub use defer::{DeferQueue, Generation};
pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PasteEvent};
pub use region::{InvalidRegionCode, RegionCode};
