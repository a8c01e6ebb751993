#![forbid(unsafe_code)]

//! Country-picker state machine.
//!
//! The picker is a modal overlay over the catalog: `Closed` or
//! `Open(highlighted)`. Opening acquires the position-maintenance
//! subscription (overlay geometry is a host concern; the widget only owns
//! the acquisition's lifecycle), and every transition back to `Closed`
//! releases it exactly once — Escape, outside click, digit entry, commit,
//! and blur all funnel through [`CountryPicker::close`].
//!
//! Keyboard handling returns a [`PickerOutcome`] instead of mutating the
//! input directly; the widget performs the resulting commit or forwarded
//! character so the picker stays independently testable.

use std::fmt;
use std::sync::Arc;

use telinput_core::{KeyCode, KeyEvent, RegionCode};
use telinput_i18n::{CatalogEntry, CountryCatalog};

/// Handle to the overlay position-maintenance loop.
///
/// The host's starter returns one per `open()`. Releasing runs the teardown
/// closure; dropping an unreleased guard releases it as a backstop, so the
/// loop can never be left dangling.
pub struct AnchorGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl AnchorGuard {
    /// A guard that runs `release` on teardown.
    #[must_use]
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A guard with no teardown work.
    #[must_use]
    pub fn noop() -> Self {
        Self { release: None }
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for AnchorGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorGuard")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

impl Drop for AnchorGuard {
    fn drop(&mut self) {
        self.release_now();
    }
}

/// Picker overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerState {
    /// No overlay.
    #[default]
    Closed,
    /// Overlay visible with an optional highlighted entry.
    Open {
        /// The highlighted region; always present in the catalog when set.
        highlighted: Option<RegionCode>,
    },
}

/// What the widget must do after the picker handled an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    /// The picker did not handle the event.
    Ignored,
    /// Handled internally; suppress default key behavior.
    Consumed,
    /// Closed; forward this character into the editing engine.
    Forward(char),
    /// Closed; commit this region's entry into the input.
    Commit {
        /// The chosen region.
        region: RegionCode,
    },
}

/// The country-picker overlay: highlight navigation and commit.
pub struct CountryPicker {
    catalog: Arc<CountryCatalog>,
    state: PickerState,
    anchor: Option<AnchorGuard>,
    starter: Option<Box<dyn FnMut() -> AnchorGuard>>,
    scroll_to: Option<usize>,
}

impl fmt::Debug for CountryPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountryPicker")
            .field("state", &self.state)
            .field("anchored", &self.anchor.is_some())
            .field("scroll_to", &self.scroll_to)
            .finish()
    }
}

impl CountryPicker {
    /// Create a closed picker over a shared catalog.
    #[must_use]
    pub fn new(catalog: Arc<CountryCatalog>) -> Self {
        Self {
            catalog,
            state: PickerState::Closed,
            anchor: None,
            starter: None,
            scroll_to: None,
        }
    }

    /// Install the host's position-maintenance starter.
    ///
    /// Called once per `open()`; the returned guard is released on close.
    pub fn set_anchor_starter(&mut self, starter: impl FnMut() -> AnchorGuard + 'static) {
        self.starter = Some(Box::new(starter));
    }

    /// Whether the overlay is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, PickerState::Open { .. })
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> PickerState {
        self.state
    }

    /// The highlighted region, if the picker is open and has one.
    #[must_use]
    pub fn highlighted(&self) -> Option<RegionCode> {
        match self.state {
            PickerState::Open { highlighted } => highlighted,
            PickerState::Closed => None,
        }
    }

    /// Sorted catalog position of the highlighted entry.
    #[must_use]
    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted()
            .and_then(|region| self.catalog.position(region))
    }

    /// The row the host should scroll into view, cleared on read.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.scroll_to.take()
    }

    /// Closed → Open. Highlights the detected region when the catalog
    /// carries it, and acquires the position-maintenance guard.
    ///
    /// Returns `false` when already open.
    pub fn open(&mut self, detected: Option<RegionCode>) -> bool {
        if self.is_open() {
            return false;
        }
        let highlighted = detected.filter(|region| self.catalog.contains(*region));
        self.state = PickerState::Open { highlighted };
        self.scroll_to = highlighted.and_then(|region| self.catalog.position(region));
        let guard = match self.starter.as_mut() {
            Some(start) => start(),
            None => AnchorGuard::noop(),
        };
        self.anchor = Some(guard);
        true
    }

    /// Any open state → Closed, without committing. Releases the anchor
    /// guard exactly once.
    ///
    /// Returns `false` when already closed.
    pub fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = PickerState::Closed;
        self.scroll_to = None;
        if let Some(mut guard) = self.anchor.take() {
            guard.release_now();
        }
        true
    }

    /// Move the highlight to the next entry in sorted order, wrapping.
    ///
    /// With no highlight the first entry counts as current, so a full cycle
    /// of N presses lands back on it. No-op when closed.
    pub fn highlight_next(&mut self) -> bool {
        let PickerState::Open { highlighted } = self.state else {
            return false;
        };
        let Some(entry) = self.catalog.next_after(self.effective_current(highlighted)) else {
            return false;
        };
        self.set_highlight(entry.region());
        true
    }

    /// Move the highlight to the previous entry in sorted order, wrapping.
    ///
    /// From the first entry (or no highlight) this lands on the last entry.
    /// No-op when closed.
    pub fn highlight_previous(&mut self) -> bool {
        let PickerState::Open { highlighted } = self.state else {
            return false;
        };
        let Some(entry) = self
            .catalog
            .previous_before(self.effective_current(highlighted))
        else {
            return false;
        };
        self.set_highlight(entry.region());
        true
    }

    /// Keyboard contract, active only while open.
    pub fn handle_key(&mut self, key: &KeyEvent) -> PickerOutcome {
        if !self.is_open() || !key.is_press() {
            return PickerOutcome::Ignored;
        }
        match key.code {
            KeyCode::Enter => match self.highlighted() {
                Some(region) => {
                    self.close();
                    PickerOutcome::Commit { region }
                }
                None => PickerOutcome::Consumed,
            },
            KeyCode::Escape => {
                self.close();
                PickerOutcome::Consumed
            }
            KeyCode::Down => {
                self.highlight_next();
                PickerOutcome::Consumed
            }
            KeyCode::Up => {
                self.highlight_previous();
                PickerOutcome::Consumed
            }
            KeyCode::Char(c) if c == '+' || c.is_ascii_digit() => {
                self.close();
                PickerOutcome::Forward(c)
            }
            _ => PickerOutcome::Ignored,
        }
    }

    /// Pointer click on a catalog row; equivalent to committing that row.
    pub fn click(&mut self, index: usize) -> PickerOutcome {
        if !self.is_open() {
            return PickerOutcome::Ignored;
        }
        match self.catalog.get(index).map(CatalogEntry::region) {
            Some(region) => {
                self.close();
                PickerOutcome::Commit { region }
            }
            None => PickerOutcome::Ignored,
        }
    }

    fn effective_current(&self, highlighted: Option<RegionCode>) -> Option<RegionCode> {
        highlighted.or_else(|| self.catalog.get(0).map(CatalogEntry::region))
    }

    fn set_highlight(&mut self, region: RegionCode) {
        self.state = PickerState::Open {
            highlighted: Some(region),
        };
        self.scroll_to = self.catalog.position(region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use telinput_core::Modifiers;
    use telinput_i18n::{InvariantCollator, NameProvider};

    fn region(code: &str) -> RegionCode {
        RegionCode::new(code).expect("test region")
    }

    struct ThreeCountries;

    impl NameProvider for ThreeCountries {
        fn entries(&self) -> Vec<(RegionCode, String, String)> {
            vec![
                (region("AT"), "43".to_owned(), "Austria".to_owned()),
                (region("DE"), "49".to_owned(), "Germany".to_owned()),
                (region("CH"), "41".to_owned(), "Switzerland".to_owned()),
            ]
        }
    }

    fn catalog() -> Arc<CountryCatalog> {
        Arc::new(CountryCatalog::build(&ThreeCountries, &InvariantCollator).expect("catalog"))
    }

    fn open_picker() -> CountryPicker {
        let mut picker = CountryPicker::new(catalog());
        assert!(picker.open(None));
        picker
    }

    #[test]
    fn open_highlights_detected_region() {
        let mut picker = CountryPicker::new(catalog());
        picker.open(Some(region("CH")));
        assert_eq!(picker.highlighted(), Some(region("CH")));
        assert_eq!(picker.take_scroll_request(), Some(2));
    }

    #[test]
    fn open_ignores_region_missing_from_catalog() {
        let mut picker = CountryPicker::new(catalog());
        picker.open(Some(region("FR")));
        assert_eq!(picker.highlighted(), None);
        assert_eq!(picker.take_scroll_request(), None);
    }

    #[test]
    fn full_cycle_of_downs_returns_to_first() {
        let mut picker = open_picker();
        for _ in 0..3 {
            picker.handle_key(&KeyEvent::new(KeyCode::Down));
        }
        assert_eq!(picker.highlighted(), Some(region("AT")));
    }

    #[test]
    fn up_from_first_wraps_to_last() {
        let mut picker = open_picker();
        picker.handle_key(&KeyEvent::new(KeyCode::Down));
        picker.handle_key(&KeyEvent::new(KeyCode::Down));
        picker.handle_key(&KeyEvent::new(KeyCode::Up));
        picker.handle_key(&KeyEvent::new(KeyCode::Up));
        assert_eq!(picker.highlighted(), Some(region("AT")));
        // AT is the first entry; the next Up wraps to the last.
        picker.handle_key(&KeyEvent::new(KeyCode::Up));
        assert_eq!(picker.highlighted(), Some(region("CH")));
    }

    #[test]
    fn arrows_scroll_highlight_into_view() {
        let mut picker = open_picker();
        picker.handle_key(&KeyEvent::new(KeyCode::Down));
        assert_eq!(picker.take_scroll_request(), Some(1));
        assert_eq!(picker.take_scroll_request(), None);
    }

    #[test]
    fn enter_commits_the_highlight() {
        let mut picker = open_picker();
        picker.handle_key(&KeyEvent::new(KeyCode::Down));
        let outcome = picker.handle_key(&KeyEvent::new(KeyCode::Enter));
        assert_eq!(
            outcome,
            PickerOutcome::Commit {
                region: region("DE")
            }
        );
        assert!(!picker.is_open());
    }

    #[test]
    fn enter_without_highlight_stays_open() {
        let mut picker = open_picker();
        let outcome = picker.handle_key(&KeyEvent::new(KeyCode::Enter));
        assert_eq!(outcome, PickerOutcome::Consumed);
        assert!(picker.is_open());
    }

    #[test]
    fn escape_closes_without_committing() {
        let mut picker = open_picker();
        let outcome = picker.handle_key(&KeyEvent::new(KeyCode::Escape));
        assert_eq!(outcome, PickerOutcome::Consumed);
        assert!(!picker.is_open());
    }

    #[test]
    fn digits_close_and_forward() {
        let mut picker = open_picker();
        let outcome = picker.handle_key(&KeyEvent::new(KeyCode::Char('4')));
        assert_eq!(outcome, PickerOutcome::Forward('4'));
        assert!(!picker.is_open());

        let mut picker = open_picker();
        let outcome = picker.handle_key(&KeyEvent::new(KeyCode::Char('+')));
        assert_eq!(outcome, PickerOutcome::Forward('+'));
    }

    #[test]
    fn letters_are_ignored_while_open() {
        let mut picker = open_picker();
        let outcome = picker.handle_key(&KeyEvent::new(KeyCode::Char('x')));
        assert_eq!(outcome, PickerOutcome::Ignored);
        assert!(picker.is_open());
        let shifted = KeyEvent::new(KeyCode::Down).with_modifiers(Modifiers::SHIFT);
        assert_eq!(picker.handle_key(&shifted), PickerOutcome::Consumed);
    }

    #[test]
    fn click_commits_that_row() {
        let mut picker = open_picker();
        let outcome = picker.click(2);
        assert_eq!(
            outcome,
            PickerOutcome::Commit {
                region: region("CH")
            }
        );
        assert!(!picker.is_open());
    }

    #[test]
    fn click_outside_rows_is_ignored() {
        let mut picker = open_picker();
        assert_eq!(picker.click(99), PickerOutcome::Ignored);
        assert!(picker.is_open());
    }

    #[test]
    fn keys_are_inert_while_closed() {
        let mut picker = CountryPicker::new(catalog());
        assert_eq!(
            picker.handle_key(&KeyEvent::new(KeyCode::Down)),
            PickerOutcome::Ignored
        );
        assert!(!picker.highlight_next());
    }

    #[test]
    fn anchor_released_exactly_once_per_open() {
        let releases = Rc::new(Cell::new(0u32));
        let mut picker = CountryPicker::new(catalog());
        let counter = Rc::clone(&releases);
        picker.set_anchor_starter(move || {
            let counter = Rc::clone(&counter);
            AnchorGuard::new(move || counter.set(counter.get() + 1))
        });

        picker.open(None);
        picker.handle_key(&KeyEvent::new(KeyCode::Escape));
        assert_eq!(releases.get(), 1);

        // Closing again must not double-release.
        picker.close();
        assert_eq!(releases.get(), 1);

        picker.open(None);
        picker.handle_key(&KeyEvent::new(KeyCode::Char('7')));
        assert_eq!(releases.get(), 2);

        picker.open(None);
        picker.click(0);
        assert_eq!(releases.get(), 3);
    }

    #[test]
    fn dropping_an_open_picker_releases_the_anchor() {
        let releases = Rc::new(Cell::new(0u32));
        {
            let mut picker = CountryPicker::new(catalog());
            let counter = Rc::clone(&releases);
            picker.set_anchor_starter(move || {
                let counter = Rc::clone(&counter);
                AnchorGuard::new(move || counter.set(counter.get() + 1))
            });
            picker.open(None);
        }
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn reopen_after_close_is_allowed() {
        let mut picker = open_picker();
        assert!(!picker.open(None));
        picker.close();
        assert!(picker.open(Some(region("DE"))));
        assert_eq!(picker.highlighted(), Some(region("DE")));
    }

    #[test]
    fn highlight_always_references_a_catalog_entry() {
        let shared = catalog();
        let mut picker = CountryPicker::new(Arc::clone(&shared));
        picker.open(None);
        for _ in 0..7 {
            picker.highlight_next();
            let highlighted = picker.highlighted().expect("highlight set");
            assert!(shared.contains(highlighted));
        }
    }
}
