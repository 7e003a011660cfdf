/// Per-image annotation editor
///
/// The interactive state machine behind the overlay. It owns the editable
/// field buffers for one image-visit and applies domain-level inputs (the
/// GUI layer maps raw key events to `Input`, so every transition here is
/// unit-testable without a display). Committing writes the state back into
/// the image's ledger entry; the editor itself never touches files.

use std::time::Duration;

use chrono::NaiveDate;

use crate::naming::compose::compose;
use crate::state::entry::ChangeEntry;

/// Delay before a held delete key starts auto-repeating.
const REPEAT_DELAY: Duration = Duration::from_millis(350);
/// Interval between auto-repeated deletions once repeating.
const REPEAT_INTERVAL: Duration = Duration::from_millis(60);
/// Deleting more than this many characters in one continuous hold clears
/// the whole field instead of continuing one character at a time.
const BULK_CLEAR_THRESHOLD: usize = 8;

/// The four editable fields, in focus-cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Prefix,
    Location,
    Description,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Date => Field::Prefix,
            Field::Prefix => Field::Location,
            Field::Location => Field::Description,
            Field::Description => Field::Date,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Field::Date => Field::Description,
            Field::Prefix => Field::Date,
            Field::Location => Field::Prefix,
            Field::Description => Field::Location,
        }
    }
}

/// Direction carried by a commit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Domain-level editor inputs, produced by the key-mapping layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    FocusNext,
    FocusPrevious,
    ToggleDate,
    TogglePrefix,
    ToggleLocation,
    ToggleDelete,
    ToggleOverlay,
    /// Re-seed the focused field from its external source
    ReloadField,
    Character(char),
    /// Delete key went down (one deletion now, auto-repeat while held)
    DeletePressed,
    DeleteReleased,
    CommitForward,
    CommitBackward,
    EndSession,
}

/// What the session controller must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Persist the editor into the ledger entry and move the index
    Commit(Direction),
    /// The deletion flag was just cleared; restore the entry's proposal
    Undelete,
    /// Commit the current image, then stop and emit the batch script
    EndSession,
}

/// Auto-repeat bookkeeping for a held delete key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeldDelete {
    /// Time the key has been held so far
    held: Duration,
    /// Hold time at which the next repeat fires
    next_fire: Duration,
    /// Characters deleted during this hold
    deleted: usize,
}

impl HeldDelete {
    fn new() -> Self {
        Self {
            held: Duration::ZERO,
            next_fire: REPEAT_DELAY,
            deleted: 0,
        }
    }
}

/// Editable state for one image-visit
///
/// Rebuilt every time the session moves to a different image, seeded from
/// the image's ledger entry so edits persist across re-visits.
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    pub focus: Field,
    /// Last successfully parsed date
    pub date: Option<NaiveDate>,
    /// Raw date text as typed; parsed on focus-exit or commit
    pub date_text: String,
    pub prefix: String,
    pub city: String,
    pub description: String,
    pub include_date: bool,
    pub include_prefix: bool,
    pub include_location: bool,
    pub delete: bool,
    pub location_edited: bool,
    /// Display-only; composition ignores it
    pub overlay_visible: bool,
    /// Latest external lookup results, kept for `ReloadField`
    pub external_date: Option<NaiveDate>,
    pub external_city: String,
    repeat: Option<HeldDelete>,
}

impl Editor {
    /// Build the editor for one image-visit, seeded from its ledger entry.
    pub fn from_entry(entry: &ChangeEntry) -> Self {
        Self {
            focus: Field::Description,
            date: entry.date,
            date_text: format_date(entry.date),
            prefix: entry.prefix.clone(),
            city: entry.city.clone(),
            description: entry.description.clone(),
            include_date: entry.include_date,
            include_prefix: entry.include_prefix,
            include_location: entry.include_location,
            delete: entry.delete,
            location_edited: entry.location_edited,
            overlay_visible: true,
            external_date: None,
            external_city: String::new(),
            repeat: None,
        }
    }

    /// Apply one input and report what (if anything) the session must do.
    pub fn apply(&mut self, input: Input) -> Option<Signal> {
        match input {
            Input::FocusNext => {
                self.leave_focus();
                self.focus = self.focus.next();
                None
            }
            Input::FocusPrevious => {
                self.leave_focus();
                self.focus = self.focus.previous();
                None
            }
            Input::ToggleDate => {
                self.include_date = !self.include_date;
                None
            }
            Input::TogglePrefix => {
                self.include_prefix = !self.include_prefix;
                None
            }
            Input::ToggleLocation => {
                self.include_location = !self.include_location;
                None
            }
            Input::ToggleOverlay => {
                self.overlay_visible = !self.overlay_visible;
                None
            }
            Input::ReloadField => {
                self.reload_focused();
                None
            }
            Input::Character(c) => {
                self.push_char(c);
                None
            }
            Input::DeletePressed => {
                // The OS auto-repeats key-down events; only the first one
                // of a hold counts, the accumulator drives the rest.
                if self.repeat.is_none() {
                    self.delete_char();
                    self.repeat = Some(HeldDelete::new());
                }
                None
            }
            Input::DeleteReleased => {
                self.repeat = None;
                None
            }
            Input::ToggleDelete => {
                self.delete = !self.delete;
                if self.delete {
                    // Deleting an image advances past it.
                    Some(Signal::Commit(Direction::Forward))
                } else {
                    Some(Signal::Undelete)
                }
            }
            Input::CommitForward => {
                self.leave_focus();
                Some(Signal::Commit(Direction::Forward))
            }
            Input::CommitBackward => {
                self.leave_focus();
                Some(Signal::Commit(Direction::Backward))
            }
            Input::EndSession => {
                self.leave_focus();
                Some(Signal::EndSession)
            }
        }
    }

    /// Advance the held-delete accumulator by the elapsed control-loop
    /// tick. Fires pending repeats; past the bulk threshold it clears the
    /// focused field outright.
    pub fn tick(&mut self, elapsed: Duration) {
        let (fired, total_deleted) = match self.repeat.as_mut() {
            Some(repeat) => {
                repeat.held += elapsed;
                let mut fired = 0usize;
                while repeat.held >= repeat.next_fire {
                    fired += 1;
                    repeat.next_fire += REPEAT_INTERVAL;
                }
                repeat.deleted += fired;
                (fired, repeat.deleted)
            }
            None => return,
        };

        if fired == 0 {
            return;
        }

        if total_deleted > BULK_CLEAR_THRESHOLD {
            self.clear_focused();
        } else {
            for _ in 0..fired {
                self.delete_char();
            }
        }
    }

    /// Whether a held delete key is currently auto-repeating; the GUI layer
    /// only runs the tick subscription while this is true.
    pub fn is_repeating(&self) -> bool {
        self.repeat.is_some()
    }

    /// Fold an asynchronous metadata lookup into a first visit: fill only
    /// fields the user has not touched. Re-visits use `set_external`.
    pub fn absorb_lookup(&mut self, date: Option<NaiveDate>, city: String) {
        self.set_external(date, city.clone());

        if self.date.is_none() && self.date_text.is_empty() {
            self.date = date;
            self.date_text = format_date(date);
        }
        if !self.location_edited && self.city.is_empty() {
            self.city = city;
        }
    }

    /// Record lookup results for `ReloadField` without touching any field.
    pub fn set_external(&mut self, date: Option<NaiveDate>, city: String) {
        self.external_date = date;
        self.external_city = city;
    }

    /// Persist the editor into the ledger entry and recompute its proposal.
    pub fn write_back(&self, entry: &mut ChangeEntry) {
        entry.date = self.date;
        entry.prefix = self.prefix.trim().to_string();
        entry.city = self.city.trim().to_string();
        entry.description = self.description.trim().to_string();
        entry.include_date = self.include_date;
        entry.include_prefix = self.include_prefix;
        entry.include_location = self.include_location;
        entry.location_edited = self.location_edited;
        entry.delete = self.delete;
        entry.visited = true;
        entry.recompose();
    }

    /// The filename the current field values would compose to.
    pub fn preview_name(&self, extension: &str) -> String {
        compose(
            self.date,
            &self.prefix,
            &self.city,
            &self.description,
            self.include_date,
            self.include_prefix,
            self.include_location,
            extension,
        )
    }

    fn leave_focus(&mut self) {
        if self.focus == Field::Date {
            self.parse_date_buffer();
        }
        // A focus change or commit ends any delete hold.
        self.repeat = None;
    }

    /// Parse the raw date buffer. An empty buffer clears the date; invalid
    /// text keeps the previous valid date and stays visible as typed so
    /// the user can correct it.
    fn parse_date_buffer(&mut self) {
        let raw = self.date_text.trim();
        if raw.is_empty() {
            self.date = None;
            return;
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y %m %d") {
            self.date = Some(date);
            self.date_text = format_date(self.date);
        }
    }

    fn push_char(&mut self, c: char) {
        match self.focus {
            Field::Date => self.date_text.push(c),
            Field::Prefix => self.prefix.push(c),
            Field::Location => {
                self.city.push(c);
                self.location_edited = true;
            }
            Field::Description => self.description.push(c),
        }
    }

    fn delete_char(&mut self) {
        match self.focus {
            Field::Date => {
                self.date_text.pop();
            }
            Field::Prefix => {
                self.prefix.pop();
            }
            Field::Location => {
                if self.city.pop().is_some() {
                    self.location_edited = true;
                }
            }
            Field::Description => {
                self.description.pop();
            }
        }
    }

    fn clear_focused(&mut self) {
        match self.focus {
            Field::Date => self.date_text.clear(),
            Field::Prefix => self.prefix.clear(),
            Field::Location => {
                if !self.city.is_empty() {
                    self.city.clear();
                    self.location_edited = true;
                }
            }
            Field::Description => self.description.clear(),
        }
    }

    fn reload_focused(&mut self) {
        match self.focus {
            Field::Date => {
                self.date = self.external_date;
                self.date_text = format_date(self.date);
            }
            Field::Location => {
                self.city = self.external_city.clone();
                self.location_edited = false;
            }
            // Prefix and description have no external source.
            Field::Prefix | Field::Description => {}
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%Y %m %d").to_string(),
        None => String::new(),
    }
}
