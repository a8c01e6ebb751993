#![forbid(unsafe_code)]

//! Formatting: the as-you-type formatter contract and its E.164 backend.
//!
//! # Role in telinput
//! `telinput-format` owns the formatter seam of the system. The widget never
//! parses phone numbers itself; on every edit it resets a formatter, feeds
//! the full raw text, and reads back the display string, the canonical
//! value, the detected region, and the validity/type classification.
//!
//! # Primary responsibilities
//! - **AsYouTypeFormatter**: the collaborator contract (reset / input /
//!   value / number / country / validity).
//! - **E164Formatter**: the production implementation backed by the
//!   `phonenumber` metadata.
//!
//! # How it fits in the system
//! The editing engine in `telinput-widgets` drives this crate on every
//! keystroke. The reset-and-replay pattern is deliberate: re-feeding the
//! whole text keeps caret math and formatter internals from drifting, at
//! O(length) cost per keystroke, which is fine for phone-length input.

pub mod e164;
pub mod formatter;

pub use e164::E164Formatter;
pub use formatter::{AsYouTypeFormatter, NumberType, ParsedNumber};
