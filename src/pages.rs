//! The ordered, gap-free sequence of (year, month) pages a picker can show
use crate::config::DateBounds;
use crate::date::{days_in_month, month0, next_month};
use std::ops::RangeInclusive;
use time::{Date, Month};

/// First year shown when no minimum date is configured
pub const DEFAULT_START_YEAR: i32 = 1950;

/// Last year shown when no maximum date is configured
pub const DEFAULT_END_YEAR: i32 = 2050;

/// One month of the calendar, identified by its first day
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Page(Date);

impl Page {
    pub fn new(year: i32, month: Month) -> Option<Page> {
        Date::from_calendar_date(year, month, 1).ok().map(Page)
    }

    pub fn containing(date: Date) -> Page {
        Page(date.replace_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> Month {
        self.0.month()
    }

    pub fn first_day(&self) -> Date {
        self.0
    }

    pub fn days(&self) -> u8 {
        days_in_month(self.year(), self.month())
    }

    /// Stable key of the form `"{year}-{month0}"`
    pub fn key(&self) -> String {
        format!("{}-{}", self.year(), month0(self.month()))
    }

    /// Months since year zero; consecutive pages differ by one
    fn ordinal(&self) -> i64 {
        i64::from(self.year()) * 12 + i64::from(month0(self.month()))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
// Invariant: never empty, strictly increasing with no gaps
pub struct MonthPages {
    pages: Vec<Page>,
}

impl MonthPages {
    /// Build the page sequence for the given bounds.
    ///
    /// The first page is the month of the minimum date (January
    /// [`DEFAULT_START_YEAR`] when open) and the last is the month of the
    /// maximum date (December [`DEFAULT_END_YEAR`] when open).  If only one
    /// bound is set and it lies beyond the default on the other side, the
    /// open side is widened to that bound's year.
    pub fn new(bounds: DateBounds) -> MonthPages {
        let start = match bounds.min() {
            Some(d) => Page::containing(d),
            None => {
                let year = bounds
                    .max()
                    .map_or(DEFAULT_START_YEAR, |d| d.year().min(DEFAULT_START_YEAR));
                january(year)
            }
        };
        let end = match bounds.max() {
            Some(d) => Page::containing(d),
            None => {
                let year = bounds
                    .min()
                    .map_or(DEFAULT_END_YEAR, |d| d.year().max(DEFAULT_END_YEAR));
                december(year).unwrap_or(start)
            }
        };
        let mut pages = Vec::new();
        let mut page = Some(start);
        while let Some(p) = page.filter(|p| *p <= end) {
            pages.push(p);
            let (year, month) = next_month(p.year(), p.month());
            page = Page::new(year, month);
        }
        if pages.is_empty() {
            pages.push(start);
        }
        MonthPages { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Page> {
        self.pages.get(index).copied()
    }

    pub fn first(&self) -> Page {
        self.pages.first().copied().unwrap_or_else(|| january(DEFAULT_START_YEAR))
    }

    pub fn last(&self) -> Page {
        self.pages.last().copied().unwrap_or_else(|| self.first())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }

    /// Index of the page for (`year`, `month`), or `None` if it is out of
    /// range
    pub fn index_of(&self, year: i32, month: Month) -> Option<usize> {
        let target = Page::new(year, month)?;
        let offset = target.ordinal() - self.first().ordinal();
        usize::try_from(offset)
            .ok()
            .filter(|&i| i < self.pages.len())
    }

    /// Index of the page nearest to the one containing `date`
    pub fn nearest_index(&self, date: Date) -> usize {
        let page = Page::containing(date).clamp(self.first(), self.last());
        self.index_of(page.year(), page.month()).unwrap_or(0)
    }

    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.pages.len().saturating_sub(1))
    }

    /// The inclusive span of years covered by the pages
    pub fn years(&self) -> RangeInclusive<i32> {
        self.first().year()..=self.last().year()
    }
}

impl<'a> IntoIterator for &'a MonthPages {
    type Item = &'a Page;
    type IntoIter = std::slice::Iter<'a, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

fn january(year: i32) -> Page {
    Page::new(year, Month::January).unwrap_or(Page(Date::MIN))
}

fn december(year: i32) -> Option<Page> {
    Page::new(year, Month::December)
}
