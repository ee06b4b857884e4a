//! The year/month chooser: a tentative (year, month) that mirrors the
//! current page while open and is resolved back to a page on apply.
use crate::date::{month0, month_from0};
use crate::pages::{MonthPages, Page};
use time::Month;
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Draft {
    pub year: i32,
    pub month: Month,
}

impl From<Page> for Draft {
    fn from(page: Page) -> Draft {
        Draft {
            year: page.year(),
            month: page.month(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChooserInput {
    NextYear,
    PrevYear,
    NextMonth,
    PrevMonth,
    Year(i32),
    Month(Month),
    Apply,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChooserOutput {
    /// The draft changed
    Ok,
    /// The input had no effect
    Invalid,
    /// The chooser closed on a page in range
    Jump(usize),
    /// The chooser closed on a page out of range
    Closed,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Chooser {
    draft: Option<Draft>,
    /// First year of the year strip, as of opening
    first_year: i32,
}

impl Chooser {
    pub fn new() -> Chooser {
        Chooser::default()
    }

    /// Open on `current`, also locating its year in the year strip
    pub fn open(&mut self, current: Page, pages: &MonthPages) {
        self.first_year = *pages.years().start();
        self.draft = Some(Draft::from(current));
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<Draft> {
        self.draft
    }

    /// Index of the draft year within [`MonthPages::years()`]
    pub fn year_position(&self) -> usize {
        self.draft
            .and_then(|d| usize::try_from(d.year - self.first_year).ok())
            .unwrap_or(0)
    }

    pub fn set_year(&mut self, year: i32) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        let changed = draft.year != year;
        draft.year = year;
        changed
    }

    pub fn set_month(&mut self, month: Month) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        let changed = draft.month != month;
        draft.month = month;
        changed
    }

    /// Move the draft year by `delta`, staying inside the years the pages
    /// cover
    pub fn step_year(&mut self, delta: i32, pages: &MonthPages) -> bool {
        let Some(year) = self.draft.map(|d| d.year) else {
            return false;
        };
        let years = pages.years();
        let target = year.saturating_add(delta).clamp(*years.start(), *years.end());
        self.set_year(target)
    }

    /// Move the draft month by `delta`, wrapping within the year
    pub fn step_month(&mut self, delta: i8) -> bool {
        let Some(month) = self.draft.map(|d| d.month) else {
            return false;
        };
        let m0 = (i16::from(month0(month)) + i16::from(delta)).rem_euclid(12);
        match u8::try_from(m0).ok().and_then(month_from0) {
            Some(m) => self.set_month(m),
            None => false,
        }
    }

    /// Close the chooser, returning the index of the drafted page if it is in
    /// range
    pub fn apply(&mut self, pages: &MonthPages) -> Option<usize> {
        let draft = self.draft.take()?;
        let index = pages.index_of(draft.year, draft.month);
        debug!(year = draft.year, month = %draft.month, ?index, "Applying chooser");
        index
    }

    pub fn dismiss(&mut self) {
        self.draft = None;
    }

    pub fn handle_input(&mut self, input: ChooserInput, pages: &MonthPages) -> ChooserOutput {
        if !self.is_open() {
            return ChooserOutput::Invalid;
        }
        let changed = match input {
            ChooserInput::NextYear => self.step_year(1, pages),
            ChooserInput::PrevYear => self.step_year(-1, pages),
            ChooserInput::NextMonth => self.step_month(1),
            ChooserInput::PrevMonth => self.step_month(-1),
            ChooserInput::Year(y) => self.set_year(y),
            ChooserInput::Month(m) => self.set_month(m),
            ChooserInput::Apply => {
                return match self.apply(pages) {
                    Some(i) => ChooserOutput::Jump(i),
                    None => ChooserOutput::Closed,
                };
            }
        };
        if changed {
            ChooserOutput::Ok
        } else {
            ChooserOutput::Invalid
        }
    }
}
