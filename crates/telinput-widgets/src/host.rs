#![forbid(unsafe_code)]

//! The host-field contract.
//!
//! The widget wraps exactly one host field: it reads the initial raw value
//! and configuration at construction, then keeps the field's value of
//! record (the canonical E.164 string) and validation message up to date.
//! The display text never reaches the host; it is presentation-only.

use std::fmt;

use telinput_core::RegionCode;
use telinput_i18n::CatalogError;

/// The form control (or test double) the widget is bound to.
pub trait HostField {
    /// The raw value present in the field when the widget attaches.
    fn initial_value(&self) -> String;

    /// The configured default region, if any.
    fn default_region(&self) -> Option<RegionCode>;

    /// Whether only mobile numbers are acceptable at submit time.
    fn mobile_only(&self) -> bool;

    /// Receive the submitted value of record (empty while incomplete).
    fn set_value(&mut self, canonical: &str);

    /// Receive the current validation message, or `None` when valid.
    fn set_validation_message(&mut self, message: Option<&str>);

    /// Change notification so host-side change tracking keeps working.
    fn notify_change(&mut self);
}

/// Fatal widget construction failure.
///
/// Keystroke-level problems degrade silently; a widget that cannot be set
/// up correctly must fail loudly instead of rendering a broken control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// The country catalog could not be built.
    Catalog(CatalogError),
    /// The host names a default region the catalog does not carry.
    UnknownDefaultRegion(RegionCode),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(err) => write!(f, "country catalog unavailable: {err}"),
            Self::UnknownDefaultRegion(region) => {
                write!(f, "default region {region} is not in the country catalog")
            }
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(err) => Some(err),
            Self::UnknownDefaultRegion(_) => None,
        }
    }
}

impl From<CatalogError> for SetupError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

/// In-memory host field for tests and embedding experiments.
#[derive(Debug, Clone, Default)]
pub struct MemoryField {
    initial_value: String,
    default_region: Option<RegionCode>,
    mobile_only: bool,
    value: String,
    validation_message: Option<String>,
    change_count: usize,
}

impl MemoryField {
    /// Create an empty field with no configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw value the widget reads at attach time (builder).
    #[must_use]
    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = value.into();
        self
    }

    /// Set the default region (builder).
    #[must_use]
    pub fn with_default_region(mut self, region: RegionCode) -> Self {
        self.default_region = Some(region);
        self
    }

    /// Restrict the field to mobile numbers (builder).
    #[must_use]
    pub fn with_mobile_only(mut self, mobile_only: bool) -> Self {
        self.mobile_only = mobile_only;
        self
    }

    /// The current value of record.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The current validation message, if any.
    #[must_use]
    pub fn validation_message(&self) -> Option<&str> {
        self.validation_message.as_deref()
    }

    /// How many change notifications have fired.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.change_count
    }
}

impl HostField for MemoryField {
    fn initial_value(&self) -> String {
        self.initial_value.clone()
    }

    fn default_region(&self) -> Option<RegionCode> {
        self.default_region
    }

    fn mobile_only(&self) -> bool {
        self.mobile_only
    }

    fn set_value(&mut self, canonical: &str) {
        canonical.clone_into(&mut self.value);
    }

    fn set_validation_message(&mut self, message: Option<&str>) {
        self.validation_message = message.map(str::to_owned);
    }

    fn notify_change(&mut self) {
        self.change_count += 1;
    }
}
