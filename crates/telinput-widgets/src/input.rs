#![forbid(unsafe_code)]

//! The input editing engine.
//!
//! A single-line phone-number input. Every text mutation funnels through
//! [`PhoneInput::apply_edit`]: the formatter is reset and re-fed the full
//! text, the caret is recomputed against the fresh display string, and the
//! canonical value is pushed into the host field. Caret offsets are
//! grapheme-cluster indices for correct Unicode handling.
//!
//! The engine owns the pristine/dirty transition: the first edit into an
//! empty, unconfigured field is rewritten from trunk-prefix form into
//! international form (leading `0` dropped, `+` prepended) exactly once.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use telinput_core::{DeferQueue, Event, KeyCode, KeyEvent, Modifiers, RegionCode};
use telinput_format::{AsYouTypeFormatter, E164Formatter};
use telinput_i18n::CountryCatalog;

use crate::host::{HostField, SetupError};
use crate::picker::{AnchorGuard, CountryPicker, PickerOutcome};

/// The three synchronized views of the field plus the pristine flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    display_text: String,
    caret: usize,
    canonical: Option<String>,
    region: Option<RegionCode>,
    pristine: bool,
}

impl InputState {
    fn new() -> Self {
        Self {
            display_text: String::new(),
            caret: 0,
            canonical: None,
            region: None,
            pristine: true,
        }
    }

    /// The formatted, presentation-only text.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Caret offset as a grapheme index into the display text.
    #[must_use]
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// The canonical E.164 value, or `None` while incomplete.
    #[must_use]
    pub fn canonical(&self) -> Option<&str> {
        self.canonical.as_deref()
    }

    /// The region detected from the current text, if any.
    #[must_use]
    pub fn region(&self) -> Option<RegionCode> {
        self.region
    }

    /// Whether the field is still awaiting its first meaningful edit.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        self.pristine
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Work deferred to the end of the current event turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredAction {
    /// Re-place the caret after the display text has settled.
    PlaceCaretAtEnd,
    /// Distinguish a genuine blur from a transient overlay focus move.
    RecheckBlur,
}

/// A headless international phone-number input bound to one host field.
pub struct PhoneInput<H: HostField> {
    host: H,
    formatter: Box<dyn AsYouTypeFormatter>,
    catalog: Arc<CountryCatalog>,
    state: InputState,
    picker: CountryPicker,
    defer: DeferQueue<DeferredAction>,
    focused: bool,
    mobile_only: bool,
    default_region: Option<RegionCode>,
}

impl<H: HostField> fmt::Debug for PhoneInput<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneInput")
            .field("state", &self.state)
            .field("picker", &self.picker)
            .field("focused", &self.focused)
            .field("mobile_only", &self.mobile_only)
            .field("default_region", &self.default_region)
            .finish_non_exhaustive()
    }
}

impl<H: HostField> PhoneInput<H> {
    /// Bind a widget to a host field with an explicit formatter and catalog.
    ///
    /// Reads the host's configuration once. Fails loudly when the host
    /// names a default region the catalog does not carry.
    pub fn new(
        host: H,
        formatter: Box<dyn AsYouTypeFormatter>,
        catalog: Arc<CountryCatalog>,
    ) -> Result<Self, SetupError> {
        let default_region = host.default_region();
        if let Some(region) = default_region {
            if !catalog.contains(region) {
                return Err(SetupError::UnknownDefaultRegion(region));
            }
        }
        let mobile_only = host.mobile_only();
        let initial = host.initial_value();
        let mut input = Self {
            picker: CountryPicker::new(Arc::clone(&catalog)),
            host,
            formatter,
            catalog,
            state: InputState::new(),
            defer: DeferQueue::new(),
            focused: false,
            mobile_only,
            default_region,
        };
        if !initial.is_empty() {
            let caret = grapheme_len(&initial);
            input.apply_edit(&initial, caret);
        }
        Ok(input)
    }

    /// Bind a widget using the built-in English catalog and the E.164
    /// formatter, configured from the host.
    pub fn from_host(host: H) -> Result<Self, SetupError> {
        let catalog = Arc::new(CountryCatalog::english()?);
        let formatter = Box::new(E164Formatter::new(host.default_region()));
        Self::new(host, formatter, catalog)
    }

    // --- State access ---

    /// The current input state.
    #[must_use]
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// The country picker.
    #[must_use]
    pub fn picker(&self) -> &CountryPicker {
        &self.picker
    }

    /// The shared country catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<CountryCatalog> {
        &self.catalog
    }

    /// The bound host field.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Whether the mobile-only constraint is configured.
    #[must_use]
    pub fn mobile_only(&self) -> bool {
        self.mobile_only
    }

    /// Whether the field currently has focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Display-cell column of the caret, for hosts that draw a cursor.
    #[must_use]
    pub fn caret_display_column(&self) -> usize {
        let byte = byte_offset(&self.state.display_text, self.state.caret);
        self.state.display_text[..byte].width()
    }

    pub(crate) fn formatter(&self) -> &dyn AsYouTypeFormatter {
        self.formatter.as_ref()
    }

    pub(crate) fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Install the host's overlay position-maintenance starter.
    pub fn set_anchor_starter(&mut self, starter: impl FnMut() -> AnchorGuard + 'static) {
        self.picker.set_anchor_starter(starter);
    }

    // --- The editing engine ---

    /// Re-run the formatter over `raw_text` and recompute the caret.
    ///
    /// `caret_before` is the caret's grapheme offset within `raw_text`,
    /// i.e. after the native edit but before reformatting. Empty text is
    /// the reset path: it restores the pristine flag so the leading-`+`
    /// auto-insertion can trigger again on the next first edit.
    pub fn apply_edit(&mut self, raw_text: &str, caret_before: usize) -> &InputState {
        // A fresh edit supersedes any pending deferred caret placement.
        self.defer.invalidate();

        if raw_text.is_empty() {
            self.formatter.reset();
            self.state = InputState::new();
            self.push_value();
            #[cfg(feature = "tracing")]
            self.trace_edit("reset");
            return &self.state;
        }

        let text: Cow<'_, str> =
            if self.default_region.is_none() && self.state.pristine && !raw_text.starts_with('+') {
                // Trunk-prefix form is meaningless without a region; seed
                // international mode instead. One-time transition.
                let digits = raw_text.strip_prefix('0').unwrap_or(raw_text);
                Cow::Owned(format!("+{digits}"))
            } else {
                Cow::Borrowed(raw_text)
            };

        self.formatter.reset();
        let display = self.formatter.input(&text);

        let prev_len = grapheme_len(&self.state.display_text);
        let raw_len = grapheme_len(raw_text);
        let new_len = grapheme_len(&display);
        let caret = if caret_before >= raw_len {
            // Caret was at the end: keep it pinned there, past any
            // separator the formatter just appended.
            new_len
        } else {
            let bias = usize::from(caret_before == prev_len);
            (caret_before + bias).min(new_len)
        };

        self.state.display_text = display;
        self.state.caret = caret;
        self.state.canonical = self.formatter.number_value();
        self.state.region = self.formatter.country();
        self.state.pristine = false;
        self.push_value();
        #[cfg(feature = "tracing")]
        self.trace_edit("apply_edit");
        &self.state
    }

    /// Insert a character at the caret, if it belongs in a phone number.
    pub fn insert_char(&mut self, c: char) -> bool {
        if !is_acceptable(c) {
            return false;
        }
        let caret = self.state.caret;
        let at = byte_offset(&self.state.display_text, caret);
        let mut raw = self.state.display_text.clone();
        raw.insert(at, c);
        self.apply_edit(&raw, caret + 1);
        true
    }

    /// Insert pasted text at the caret, dropping foreign characters.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let filtered: String = text.chars().filter(|&c| is_acceptable(c)).collect();
        if filtered.is_empty() {
            return false;
        }
        let caret = self.state.caret;
        let at = byte_offset(&self.state.display_text, caret);
        let mut raw = self.state.display_text.clone();
        raw.insert_str(at, &filtered);
        let caret_before = caret + grapheme_len(&filtered);
        self.apply_edit(&raw, caret_before);
        true
    }

    /// Delete the grapheme before the caret.
    pub fn backspace(&mut self) -> bool {
        let caret = self.state.caret;
        if caret == 0 {
            return false;
        }
        let start = byte_offset(&self.state.display_text, caret - 1);
        let end = byte_offset(&self.state.display_text, caret);
        let mut raw = self.state.display_text.clone();
        raw.replace_range(start..end, "");
        self.apply_edit(&raw, caret - 1);
        true
    }

    /// Delete the grapheme at the caret.
    pub fn delete_forward(&mut self) -> bool {
        let caret = self.state.caret;
        if caret >= grapheme_len(&self.state.display_text) {
            return false;
        }
        let start = byte_offset(&self.state.display_text, caret);
        let end = byte_offset(&self.state.display_text, caret + 1);
        let mut raw = self.state.display_text.clone();
        raw.replace_range(start..end, "");
        self.apply_edit(&raw, caret);
        true
    }

    /// Move the caret one grapheme left.
    pub fn move_caret_left(&mut self) -> bool {
        if self.state.caret == 0 {
            return false;
        }
        self.state.caret -= 1;
        true
    }

    /// Move the caret one grapheme right.
    pub fn move_caret_right(&mut self) -> bool {
        if self.state.caret >= grapheme_len(&self.state.display_text) {
            return false;
        }
        self.state.caret += 1;
        true
    }

    /// Move the caret to the start of the text.
    pub fn move_caret_home(&mut self) -> bool {
        if self.state.caret == 0 {
            return false;
        }
        self.state.caret = 0;
        true
    }

    /// Move the caret to the end of the text.
    pub fn move_caret_end(&mut self) -> bool {
        let end = grapheme_len(&self.state.display_text);
        if self.state.caret == end {
            return false;
        }
        self.state.caret = end;
        true
    }

    // --- Picker integration ---

    /// Open the country picker, highlighting the detected region.
    pub fn open_picker(&mut self) -> bool {
        self.picker.open(self.state.region)
    }

    /// Close the picker without committing.
    pub fn close_picker(&mut self) -> bool {
        self.picker.close()
    }

    /// Toggle the picker.
    pub fn toggle_picker(&mut self) -> bool {
        if self.picker.is_open() {
            self.picker.close()
        } else {
            self.open_picker()
        }
    }

    /// Pointer click outside both field and overlay: dismiss the picker.
    pub fn pointer_outside(&mut self) -> bool {
        self.picker.close()
    }

    /// Pointer click on a picker row; commits that row's country.
    pub fn click_entry(&mut self, index: usize) -> bool {
        match self.picker.click(index) {
            PickerOutcome::Commit { region } => self.commit_country(region),
            _ => false,
        }
    }

    /// Row the host should scroll into view, cleared on read.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.picker.take_scroll_request()
    }

    /// Commit a country: rewrite the text to `+<calling code><NSN>` with
    /// the NSN taken from the formatter's current parse, caret at end.
    ///
    /// Closes the picker if it is still open. Returns `false` for a region
    /// the catalog does not carry.
    pub fn commit_country(&mut self, region: RegionCode) -> bool {
        let Some(entry) = self.catalog.entry(region) else {
            return false;
        };
        let calling_code = entry.calling_code().to_owned();
        self.picker.close();
        let nsn = self
            .formatter
            .number()
            .map(|n| n.national_significant_number)
            .unwrap_or_default();
        let text = format!("+{calling_code}{nsn}");
        let caret = grapheme_len(&text);
        self.apply_edit(&text, caret);
        // The editable region replaces its contents asynchronously; final
        // caret placement happens after this turn settles.
        self.defer.schedule(DeferredAction::PlaceCaretAtEnd);
        true
    }

    // --- Event dispatch ---

    /// Handle a host event.
    ///
    /// Returns `true` if the widget consumed the event; hosts suppress
    /// default key behavior for consumed events.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.is_press() => {
                if self.picker.is_open() {
                    self.handle_picker_key(key)
                } else {
                    self.handle_input_key(key)
                }
            }
            Event::Key(_) => false,
            Event::Paste(paste) => self.insert_text(&paste.text),
            Event::Focus(true) => {
                let was_focused = self.focused;
                self.focused = true;
                !was_focused
            }
            Event::Focus(false) => {
                self.focused = false;
                self.defer.schedule(DeferredAction::RecheckBlur);
                true
            }
        }
    }

    fn handle_picker_key(&mut self, key: &KeyEvent) -> bool {
        match self.picker.handle_key(key) {
            PickerOutcome::Commit { region } => {
                self.commit_country(region);
                true
            }
            PickerOutcome::Forward(c) => {
                self.insert_char(c);
                true
            }
            PickerOutcome::Consumed => true,
            PickerOutcome::Ignored => false,
        }
    }

    fn handle_input_key(&mut self, key: &KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::SUPER)
        {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.move_caret_left(),
            KeyCode::Right => self.move_caret_right(),
            KeyCode::Home => self.move_caret_home(),
            KeyCode::End => self.move_caret_end(),
            _ => false,
        }
    }

    /// Run work deferred to the end of the current event turn.
    ///
    /// Hosts call this once their own handler has returned. Stale entries
    /// superseded by a later edit are dropped (last write wins).
    pub fn run_deferred(&mut self) -> bool {
        let mut changed = false;
        for action in self.defer.take_ready() {
            match action {
                DeferredAction::PlaceCaretAtEnd => {
                    let end = grapheme_len(&self.state.display_text);
                    if self.state.caret != end {
                        self.state.caret = end;
                        changed = true;
                    }
                }
                DeferredAction::RecheckBlur => {
                    // Focus bounced through the overlay and came back; not
                    // a real blur.
                    if !self.focused && self.picker.close() {
                        changed = true;
                    }
                }
            }
        }
        changed
    }

    fn push_value(&mut self) {
        let value = self.state.canonical.clone().unwrap_or_default();
        self.host.set_value(&value);
        self.host.notify_change();
    }

    #[cfg(feature = "tracing")]
    fn trace_edit(&self, operation: &'static str) {
        let _span = tracing::debug_span!(
            "phone_input.edit",
            operation,
            caret = self.state.caret,
            pristine = self.state.pristine,
            has_value = self.state.canonical.is_some()
        )
        .entered();
    }
}

fn is_acceptable(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | ' ' | '(' | ')' | '-' | '.')
}

fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

fn byte_offset(text: &str, grapheme_index: usize) -> usize {
    text.grapheme_indices(true)
        .nth(grapheme_index)
        .map_or(text.len(), |(offset, _)| offset)
}
