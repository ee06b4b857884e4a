use crate::date::format_date;
use crate::grid::DayCell;
use time::Date;

/// What happened when a day was picked
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PickOutcome {
    /// The day became the selection; carries its canonical form
    Selected(String),
    /// The already-selected day was picked again and the selection cleared
    Deselected,
    /// The day was disabled or outside the displayed month
    Ignored,
}

impl PickOutcome {
    /// The value to report to listeners, if any.  Clearing the selection is
    /// reported as the empty string.
    pub fn emission(&self) -> Option<&str> {
        match self {
            PickOutcome::Selected(s) => Some(s),
            PickOutcome::Deselected => Some(""),
            PickOutcome::Ignored => None,
        }
    }
}

/// The at-most-one selected date
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Selection(Option<Date>);

impl Selection {
    pub fn new() -> Selection {
        Selection(None)
    }

    pub fn date(&self) -> Option<Date> {
        self.0
    }

    pub fn is_selected(&self, date: Date) -> bool {
        self.0 == Some(date)
    }

    pub fn is_cell_selected(&self, cell: &DayCell) -> bool {
        cell.current && cell.date().is_some_and(|d| self.is_selected(d))
    }

    /// Replace the selection without any toggling
    pub fn set(&mut self, date: Option<Date>) {
        self.0 = date;
    }

    /// Select `date`, or clear the selection if `date` is already selected
    pub fn pick(&mut self, date: Date) -> PickOutcome {
        if self.is_selected(date) {
            self.0 = None;
            PickOutcome::Deselected
        } else {
            self.0 = Some(date);
            PickOutcome::Selected(format_date(date))
        }
    }

    /// Like [`pick()`][Selection::pick], but padding and disabled cells are
    /// ignored
    pub fn pick_cell(&mut self, cell: &DayCell) -> PickOutcome {
        if !cell.is_selectable() {
            return PickOutcome::Ignored;
        }
        match cell.date() {
            Some(date) => self.pick(date),
            None => PickOutcome::Ignored,
        }
    }

    /// The canonical form of the selection, if there is one
    pub fn confirm(&self) -> Option<String> {
        self.0.map(format_date)
    }
}
