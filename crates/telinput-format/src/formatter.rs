#![forbid(unsafe_code)]

//! The as-you-type formatter contract.
//!
//! A formatter is fed the running input of digits, `+`, and punctuation and
//! produces a progressively formatted display string plus the machine-facing
//! views of the same text. It is not required to be internally append-safe
//! across edits: callers must `reset` and re-feed the full text on every
//! change.

use telinput_core::RegionCode;

/// Classification of a parsed number, reduced to the categories the widget
/// acts on. Everything the validation gate does not distinguish collapses
/// into [`NumberType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberType {
    /// A fixed-line (landline) number.
    FixedLine,
    /// A mobile number.
    Mobile,
    /// A number in a range shared by fixed-line and mobile plans.
    ///
    /// Regions that do not split their ranges (e.g. NANP) classify most
    /// numbers this way; the mobile-only gate accepts it as mobile.
    FixedLineOrMobile,
    /// A toll-free number.
    TollFree,
    /// A premium-rate number.
    PremiumRate,
    /// A VoIP number.
    Voip,
    /// Any other classified type.
    Other,
    /// The metadata could not classify the number.
    Unknown,
}

impl NumberType {
    /// Whether the mobile-only constraint accepts this type.
    #[must_use]
    pub fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile | Self::FixedLineOrMobile)
    }
}

/// The machine-facing view of the formatter's current parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNumber {
    /// The national significant number: the digits after the calling code,
    /// without trunk prefix or formatting.
    pub national_significant_number: String,
    /// The classified type of the number.
    pub number_type: NumberType,
}

/// The formatter collaborator contract.
///
/// Implementations must support being reset and re-fed from scratch on
/// every edit; the widget never feeds incremental appendixes.
pub trait AsYouTypeFormatter {
    /// Discard all fed text and any cached parse.
    fn reset(&mut self);

    /// Feed the full current text, returning the display rendering.
    ///
    /// Unparseable input degrades to a best-effort rendering; this method
    /// never fails.
    fn input(&mut self, text: &str) -> String;

    /// The canonical (E.164) value, or `None` while the number is
    /// incomplete or structurally invalid.
    fn number_value(&self) -> Option<String>;

    /// The national significant number and type of the current parse, or
    /// `None` when nothing parseable has been fed.
    fn number(&self) -> Option<ParsedNumber>;

    /// The detected region of the current parse, if any.
    fn country(&self) -> Option<RegionCode>;

    /// Whether the current parse is a complete, structurally valid number.
    fn is_valid(&self) -> bool;
}
