#![forbid(unsafe_code)]

//! E.164 formatter backed by the `phonenumber` metadata.
//!
//! The implementation is reset-and-replay: every call to `input` re-parses
//! the full text. Parseable text renders in international format (calling
//! code, spaced groups); text that does not parse yet renders as the
//! sanitized digits, so the user never sees their input rejected mid-entry.

use phonenumber::Mode;
use phonenumber::country::Id as CountryId;

use telinput_core::RegionCode;

use crate::formatter::{AsYouTypeFormatter, NumberType, ParsedNumber};

/// Production formatter: sanitize, parse, and render via `phonenumber`.
pub struct E164Formatter {
    default_region: Option<CountryId>,
    display: String,
    parsed: Option<phonenumber::PhoneNumber>,
}

impl E164Formatter {
    /// Create a formatter, optionally biased toward a default region.
    ///
    /// The region steers parsing of national-format input (no leading `+`);
    /// international input always wins over the default.
    #[must_use]
    pub fn new(default_region: Option<RegionCode>) -> Self {
        let default_region =
            default_region.and_then(|region| region.as_str().parse::<CountryId>().ok());
        Self {
            default_region,
            display: String::new(),
            parsed: None,
        }
    }

    /// Keep `+` (leading only) and ASCII digits, drop everything else.
    fn sanitize(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '+' if out.is_empty() => out.push('+'),
                '0'..='9' => out.push(c),
                _ => {}
            }
        }
        out
    }
}

impl AsYouTypeFormatter for E164Formatter {
    fn reset(&mut self) {
        self.display.clear();
        self.parsed = None;
    }

    fn input(&mut self, text: &str) -> String {
        let cleaned = Self::sanitize(text);
        self.parsed = if cleaned.is_empty() {
            None
        } else {
            phonenumber::parse(self.default_region, &cleaned).ok()
        };
        self.display = match &self.parsed {
            Some(number) => number.format().mode(Mode::International).to_string(),
            None => cleaned,
        };
        #[cfg(feature = "tracing")]
        {
            let _span = tracing::debug_span!(
                "format.input",
                len = self.display.len(),
                parsed = self.parsed.is_some()
            )
            .entered();
        }
        self.display.clone()
    }

    fn number_value(&self) -> Option<String> {
        let number = self.parsed.as_ref()?;
        phonenumber::is_valid(number).then(|| number.format().mode(Mode::E164).to_string())
    }

    fn number(&self) -> Option<ParsedNumber> {
        let number = self.parsed.as_ref()?;
        let e164 = number.format().mode(Mode::E164).to_string();
        let calling_code = number.country().code().to_string();
        let national_significant_number = e164
            .strip_prefix('+')
            .and_then(|rest| rest.strip_prefix(calling_code.as_str()))
            .unwrap_or_default()
            .to_owned();
        Some(ParsedNumber {
            national_significant_number,
            number_type: classify(number),
        })
    }

    fn country(&self) -> Option<RegionCode> {
        let id = self.parsed.as_ref()?.country().id()?;
        RegionCode::new(&format!("{id:?}"))
    }

    fn is_valid(&self) -> bool {
        self.parsed.as_ref().is_some_and(phonenumber::is_valid)
    }
}

fn classify(number: &phonenumber::PhoneNumber) -> NumberType {
    match number.number_type(&phonenumber::metadata::DATABASE) {
        phonenumber::Type::FixedLine => NumberType::FixedLine,
        phonenumber::Type::Mobile => NumberType::Mobile,
        phonenumber::Type::FixedLineOrMobile => NumberType::FixedLineOrMobile,
        phonenumber::Type::TollFree => NumberType::TollFree,
        phonenumber::Type::PremiumRate => NumberType::PremiumRate,
        phonenumber::Type::Voip => NumberType::Voip,
        phonenumber::Type::Unknown => NumberType::Unknown,
        _ => NumberType::Other,
    }
}
