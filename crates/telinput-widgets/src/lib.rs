#![forbid(unsafe_code)]

//! Headless international phone-number input widget.
//!
//! # Role in telinput
//! `telinput-widgets` is the behavior layer: it owns the input editing
//! engine (as-you-type reformatting, caret recomputation, the pristine
//! transition), the country-picker state machine, and the validation gate.
//! It renders nothing; hosts read the widget state and draw it however they
//! like.
//!
//! # Primary responsibilities
//! - **PhoneInput**: one field instance — display text, caret, canonical
//!   value, host binding, event dispatch.
//! - **CountryPicker**: open/closed overlay state, wrap-around highlight
//!   navigation, commit, and the position-maintenance anchor lifecycle.
//! - **Validation**: the submit-time accept/reject gate with field-level
//!   messages.
//!
//! # How it fits in the system
//! Events arrive as `telinput-core::Event` values. Every text mutation is
//! replayed through a `telinput-format::AsYouTypeFormatter`, and the country
//! list comes from a shared `telinput-i18n::CountryCatalog`. The host field
//! (a form control, a TUI buffer, a test double) sits behind the
//! [`HostField`] trait and receives the canonical value on every change.

pub mod host;
pub mod input;
pub mod picker;
pub mod validate;

pub use host::{HostField, MemoryField, SetupError};
pub use input::{InputState, PhoneInput};
pub use picker::{AnchorGuard, CountryPicker, PickerOutcome, PickerState};
pub use validate::{INVALID_MOBILE_MESSAGE, INVALID_PHONE_MESSAGE};
