//! Fixed-size month grids
use crate::config::PickerConfig;
use crate::date::{days_in_month, format_ymd, month0, next_month, previous_month};
use crate::marker::Marker;
use crate::pages::Page;
use std::iter::successors;
use time::{Date, Month};
use tracing::trace;

pub const DAYS_IN_WEEK: usize = 7;

/// Every grid has six full weeks of cells
pub const GRID_CELLS: usize = DAYS_IN_WEEK * 6;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DayCell {
    pub year: i32,
    pub month: Month,
    pub day: u8,
    /// `false` for padding days borrowed from the adjacent months
    pub current: bool,
    pub disabled: bool,
    pub markers: Vec<Marker>,
}

impl DayCell {
    fn padding(year: i32, month: Month, day: u8) -> DayCell {
        DayCell {
            year,
            month,
            day,
            current: false,
            disabled: true,
            markers: Vec::new(),
        }
    }

    /// Unique key of the form `"date-{year}-{month0}-{day}"`
    pub fn key(&self) -> String {
        format!("date-{}-{}-{}", self.year, month0(self.month), self.day)
    }

    pub fn date(&self) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, self.day).ok()
    }

    /// The canonical `YYYY-MM-DD` form of the cell's date
    pub fn canonical(&self) -> String {
        format_ymd(self.year, self.month, self.day)
    }

    pub fn is_selectable(&self) -> bool {
        self.current && !self.disabled
    }
}

/// Why a current-month date is disabled, in order of precedence
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DisabledBy {
    /// The date is in the explicit disabled set
    Explicit,
    /// The date is before the minimum or after the maximum
    Bounds,
    /// The caller's disable rule rejected the date
    Rule,
}

pub fn disabled_by(config: &PickerConfig, date: Date) -> Option<DisabledBy> {
    if config.is_explicitly_disabled(date) {
        Some(DisabledBy::Explicit)
    } else if !config.bounds().contains(date) {
        Some(DisabledBy::Bounds)
    } else if config.rule_disables(date) {
        Some(DisabledBy::Rule)
    } else {
        None
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
// Invariant: `cells.len() == GRID_CELLS`
pub struct MonthGrid {
    page: Page,
    leading: usize,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Lay out `page` as six weeks starting on the configured first day of
    /// the week.  Days before the 1st and after the last of the month are
    /// filled in from the neighbouring months; those are always disabled and
    /// unmarked.
    pub fn build(page: Page, config: &PickerConfig) -> MonthGrid {
        let first = page.first_day();
        let weekday = first.weekday().number_days_from_sunday();
        let leading = (weekday + 7 - config.first_day().offset()) % 7;
        let mut cells = Vec::with_capacity(GRID_CELLS);

        let (prev_year, prev_month) = previous_month(page.year(), page.month());
        let prev_len = days_in_month(prev_year, prev_month);
        cells.extend(
            (prev_len - leading + 1..=prev_len).map(|d| DayCell::padding(prev_year, prev_month, d)),
        );

        let month = page.month();
        for date in successors(Some(first), |d| d.next_day()).take_while(|d| d.month() == month)
        {
            let disabled = disabled_by(config, date).is_some();
            let markers = if disabled {
                Vec::new()
            } else {
                config.markers().resolve(date)
            };
            cells.push(DayCell {
                year: date.year(),
                month,
                day: date.day(),
                current: true,
                disabled,
                markers,
            });
        }

        let (next_year, next_month) = next_month(page.year(), page.month());
        let trailing = GRID_CELLS.saturating_sub(cells.len());
        cells.extend((1..).take(trailing).map(|d| DayCell::padding(next_year, next_month, d)));

        trace!(page = %page.key(), leading, trailing, "built month grid");
        MonthGrid {
            page,
            leading: usize::from(leading),
            cells,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// Number of padding cells before the 1st of the month
    pub fn leading(&self) -> usize {
        self.leading
    }

    /// The grid split into its six rows
    pub fn weeks(&self) -> std::slice::Chunks<'_, DayCell> {
        self.cells.chunks(DAYS_IN_WEEK)
    }

    /// Position in [`cells()`][MonthGrid::cells] of the given day of the
    /// current month
    pub fn position_of(&self, day: u8) -> Option<usize> {
        (1..=self.page.days())
            .contains(&day)
            .then(|| self.leading + usize::from(day) - 1)
    }

    pub fn cell(&self, day: u8) -> Option<&DayCell> {
        self.position_of(day).and_then(|i| self.cells.get(i))
    }
}
