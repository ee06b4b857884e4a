//! The picker facade.  A renderer owns one [`DatePicker`], draws what it
//! exposes and feeds user actions back into it.
use crate::chooser::{Chooser, ChooserInput, ChooserOutput};
use crate::config::{ConfigError, DateBounds, PickerConfig};
use crate::date::format_date;
use crate::grid::{disabled_by, DayCell, MonthGrid};
use crate::navigation::{EdgeOfRange, Navigator, ScrollTo, Settled};
use crate::pages::{MonthPages, Page};
use crate::selection::Selection;
use std::num::NonZeroUsize;
use std::time::Instant;
use time::{Date, Month};
use tracing::debug;

/// Notifications for whoever embeds the picker
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum PickerEvent {
    /// The selection changed; the empty string means it was cleared
    Changed(String),
    /// The user confirmed the selection
    Confirmed(String),
    /// The user closed the picker
    Closed,
}

#[derive(Debug)]
pub struct DatePicker {
    config: PickerConfig,
    pages: MonthPages,
    nav: Navigator,
    selection: Selection,
    chooser: Chooser,
}

impl DatePicker {
    pub fn new(config: PickerConfig) -> DatePicker {
        let pages = MonthPages::new(config.bounds());
        let nav = Navigator::new(page_count(&pages));
        DatePicker {
            config,
            pages,
            nav,
            selection: Selection::new(),
            chooser: Chooser::new(),
        }
    }

    /// Pick the starting page: the initial date if one is configured (it is
    /// also selected), else the minimum date, else `today`.  Dates outside
    /// the range land on the nearest page.  The returned scroll is not
    /// animated.
    pub fn mount(&mut self, today: Date, now: Instant) -> ScrollTo {
        let target = if let Some(date) = self.config.initial_date() {
            self.selection.set(Some(date));
            date
        } else {
            self.config.bounds().min().unwrap_or(today)
        };
        let index = self.pages.nearest_index(target);
        debug!(%target, index, "Mounting picker");
        self.nav.jump_to(index, false, now)
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn pages(&self) -> &MonthPages {
        &self.pages
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn chooser(&self) -> &Chooser {
        &self.chooser
    }

    pub fn current_index(&self) -> usize {
        self.nav.index()
    }

    pub fn current_page(&self) -> Page {
        self.pages
            .get(self.nav.index())
            .unwrap_or_else(|| self.pages.first())
    }

    pub fn grid(&self, index: usize) -> Option<MonthGrid> {
        self.pages
            .get(index)
            .map(|page| MonthGrid::build(page, &self.config))
    }

    pub fn current_grid(&self) -> MonthGrid {
        MonthGrid::build(self.current_page(), &self.config)
    }

    pub fn is_selectable(&self, date: Date) -> bool {
        disabled_by(&self.config, date).is_none()
    }

    pub fn pick(&mut self, cell: &DayCell) -> Option<PickerEvent> {
        let outcome = self.selection.pick_cell(cell);
        debug!(cell = %cell.key(), ?outcome, "Picked day");
        outcome
            .emission()
            .map(|s| PickerEvent::Changed(s.to_owned()))
    }

    pub fn next(&mut self, now: Instant) -> Result<ScrollTo, EdgeOfRange> {
        self.nav.next(now)
    }

    pub fn prev(&mut self, now: Instant) -> Result<ScrollTo, EdgeOfRange> {
        self.nav.prev(now)
    }

    pub fn can_go_prev(&self) -> bool {
        !self.nav.is_at_start()
    }

    pub fn can_go_next(&self) -> bool {
        !self.nav.is_at_end()
    }

    pub fn view_settled(&mut self, observed: usize, now: Instant) -> Settled {
        self.nav.on_view_settled(observed, now)
    }

    /// Let time pass.  Returns `true` if a stale echo window was closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.nav.expire(now)
    }

    pub fn open_chooser(&mut self) {
        self.chooser.open(self.current_page(), &self.pages);
    }

    /// Open the chooser if it is closed, else dismiss it
    pub fn toggle_chooser(&mut self) {
        if self.chooser.is_open() {
            self.chooser.dismiss();
        } else {
            self.open_chooser();
        }
    }

    pub fn dismiss_chooser(&mut self) {
        self.chooser.dismiss();
    }

    pub fn set_draft_year(&mut self, year: i32) -> bool {
        self.chooser.set_year(year)
    }

    pub fn set_draft_month(&mut self, month: Month) -> bool {
        self.chooser.set_month(month)
    }

    /// Close the chooser, jumping to the drafted page if it is in range
    pub fn apply_chooser(&mut self, now: Instant) -> Option<ScrollTo> {
        self.chooser
            .apply(&self.pages)
            .map(|index| self.nav.jump_to(index, false, now))
    }

    /// Feed an input to the open chooser.  A jump is carried out on the
    /// navigator and the resulting scroll returned alongside the output.
    pub fn chooser_input(
        &mut self,
        input: ChooserInput,
        now: Instant,
    ) -> (ChooserOutput, Option<ScrollTo>) {
        let output = self.chooser.handle_input(input, &self.pages);
        let scroll = match output {
            ChooserOutput::Jump(index) => Some(self.nav.jump_to(index, false, now)),
            _ => None,
        };
        (output, scroll)
    }

    pub fn confirm(&self) -> Option<PickerEvent> {
        self.selection.confirm().map(PickerEvent::Confirmed)
    }

    pub fn close(&mut self) -> PickerEvent {
        self.chooser.dismiss();
        PickerEvent::Closed
    }

    /// Select preset `i` and scroll to its page if that is in range.
    /// Presets falling on disabled dates are ignored.
    pub fn apply_preset(
        &mut self,
        i: usize,
        now: Instant,
    ) -> Option<(PickerEvent, Option<ScrollTo>)> {
        let date = self.config.presets().get(i)?.date;
        if !self.is_selectable(date) {
            debug!(preset = i, %date, "Ignoring preset on disabled date");
            return None;
        }
        self.selection.set(Some(date));
        let event = PickerEvent::Changed(format_date(date));
        let scroll = self
            .pages
            .index_of(date.year(), date.month())
            .map(|index| self.nav.jump_to(index, true, now));
        debug!(preset = i, %date, "Applied preset");
        Some((event, scroll))
    }

    pub fn is_preset_active(&self, i: usize) -> bool {
        self.config
            .presets()
            .get(i)
            .is_some_and(|p| self.selection.is_selected(p.date))
    }

    /// Replace the date bounds, rebuilding the pages.  The month on display
    /// stays put if it is still in range, else the nearest month is shown.
    /// The returned scroll is not animated.
    pub fn set_bounds(
        &mut self,
        min: Option<Date>,
        max: Option<Date>,
        now: Instant,
    ) -> Result<ScrollTo, ConfigError> {
        let bounds = DateBounds::new(min, max)?;
        let shown = self.current_page();
        self.config.set_bounds(bounds);
        self.pages = MonthPages::new(bounds);
        self.nav.set_page_count(page_count(&self.pages));
        self.chooser.dismiss();
        let index = self.pages.nearest_index(shown.first_day());
        debug!(pages = self.pages.len(), shown = %shown.key(), index, "Bounds changed");
        Ok(self.nav.jump_to(index, false, now))
    }

    /// `"February 10, 2024"` for the selection, or the no-date label
    pub fn header_text(&self) -> String {
        match self.selection.date() {
            Some(date) => format!(
                "{} {}, {}",
                self.config.locale().month_name(date.month()),
                date.day(),
                date.year()
            ),
            None => self.config.labels().no_date.clone(),
        }
    }

    /// `"February 2024"` for the current page
    pub fn nav_title(&self) -> String {
        let page = self.current_page();
        format!(
            "{} {}",
            self.config.locale().month_name(page.month()),
            page.year()
        )
    }

    pub fn weekday_header(&self) -> Vec<&str> {
        self.config.locale().weekday_header(self.config.first_day())
    }
}

fn page_count(pages: &MonthPages) -> NonZeroUsize {
    NonZeroUsize::new(pages.len()).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FirstDayOfWeek;
    use std::time::Duration;
    use time::macros::date;

    fn first_quarter() -> DatePicker {
        DatePicker::new(
            PickerConfig::builder()
                .min_date(date!(2024 - 01 - 01))
                .max_date(date!(2024 - 03 - 31))
                .first_day(FirstDayOfWeek::Monday)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_mount_on_min_date() {
        let t0 = Instant::now();
        let mut picker = first_quarter();
        let scroll = picker.mount(date!(2025 - 06 - 01), t0);
        assert_eq!(
            scroll,
            ScrollTo {
                index: 0,
                animated: false
            }
        );
        assert_eq!(picker.nav_title(), "January 2024");
        assert_eq!(picker.selection().date(), None);
        assert_eq!(picker.header_text(), "No date selected");
        assert!(!picker.can_go_prev());
        assert!(picker.can_go_next());
    }

    #[test]
    fn test_mount_on_initial_date() {
        let t0 = Instant::now();
        let mut picker = DatePicker::new(
            PickerConfig::builder()
                .min_date(date!(2024 - 01 - 01))
                .max_date(date!(2024 - 03 - 31))
                .initial_date(date!(2024 - 02 - 10))
                .build()
                .unwrap(),
        );
        assert_eq!(picker.mount(date!(2025 - 06 - 01), t0).index, 1);
        assert_eq!(picker.selection().date(), Some(date!(2024 - 02 - 10)));
        assert_eq!(picker.header_text(), "February 10, 2024");
        assert_eq!(picker.nav_title(), "February 2024");
    }

    #[test]
    fn test_mount_on_today_clamped() {
        let t0 = Instant::now();
        let mut picker = DatePicker::new(
            PickerConfig::builder()
                .max_date(date!(2024 - 03 - 31))
                .build()
                .unwrap(),
        );
        let scroll = picker.mount(date!(2030 - 01 - 01), t0);
        assert_eq!(scroll.index, picker.pages().len() - 1);
        assert_eq!(picker.current_page(), Page::new(2024, Month::March).unwrap());
        let mut picker = DatePicker::new(PickerConfig::default());
        picker.mount(date!(2000 - 05 - 17), t0);
        assert_eq!(picker.nav_title(), "May 2000");
    }

    #[test]
    fn test_navigation_and_echo() {
        let t0 = Instant::now();
        let mut picker = first_quarter();
        picker.mount(date!(2024 - 01 - 15), t0);
        assert_eq!(picker.view_settled(0, t0), Settled::Echo);
        let scroll = picker.next(t0).unwrap();
        assert_eq!(scroll.index, 1);
        assert!(scroll.animated);
        assert_eq!(picker.view_settled(1, t0), Settled::Echo);
        picker.next(t0).unwrap();
        assert_eq!(picker.next(t0), Err(EdgeOfRange));
        assert_eq!(picker.current_index(), 2);
        assert!(!picker.can_go_next());
        assert!(picker.tick(t0 + Duration::from_secs(1)));
        assert_eq!(
            picker.view_settled(0, t0 + Duration::from_secs(1)),
            Settled::Moved(0)
        );
        assert_eq!(picker.nav_title(), "January 2024");
    }

    #[test]
    fn test_pick_from_grid() {
        let t0 = Instant::now();
        let mut picker = first_quarter();
        picker.mount(date!(2024 - 02 - 15), t0);
        picker.next(t0).unwrap();
        let grid = picker.current_grid();
        assert_eq!(grid.leading(), 3);
        let cell = grid.cell(10).unwrap().clone();
        assert_eq!(
            picker.pick(&cell),
            Some(PickerEvent::Changed(String::from("2024-02-10")))
        );
        assert_eq!(picker.header_text(), "February 10, 2024");
        assert_eq!(
            picker.confirm(),
            Some(PickerEvent::Confirmed(String::from("2024-02-10")))
        );
        assert_eq!(
            picker.pick(&cell),
            Some(PickerEvent::Changed(String::new()))
        );
        assert_eq!(picker.confirm(), None);
        assert_eq!(picker.pick(&grid.cells()[0]), None);
    }

    #[test]
    fn test_chooser_round_trip() {
        let t0 = Instant::now();
        let mut picker = first_quarter();
        picker.mount(date!(2024 - 01 - 15), t0);
        picker.toggle_chooser();
        assert!(picker.chooser().is_open());
        assert!(picker.set_draft_month(Month::March));
        let scroll = picker.apply_chooser(t0).unwrap();
        assert_eq!(
            scroll,
            ScrollTo {
                index: 2,
                animated: false
            }
        );
        assert!(!picker.chooser().is_open());
        assert_eq!(picker.nav_title(), "March 2024");

        picker.open_chooser();
        assert!(picker.set_draft_year(2023));
        assert_eq!(picker.apply_chooser(t0), None);
        assert_eq!(picker.current_index(), 2);

        picker.toggle_chooser();
        picker.toggle_chooser();
        assert!(!picker.chooser().is_open());
    }

    #[test]
    fn test_chooser_input() {
        let t0 = Instant::now();
        let mut picker = first_quarter();
        picker.mount(date!(2024 - 01 - 15), t0);
        picker.open_chooser();
        assert_eq!(
            picker.chooser_input(ChooserInput::NextMonth, t0),
            (ChooserOutput::Ok, None)
        );
        let (output, scroll) = picker.chooser_input(ChooserInput::Apply, t0);
        assert_eq!(output, ChooserOutput::Jump(1));
        assert_eq!(scroll.map(|s| s.index), Some(1));
        assert_eq!(picker.current_index(), 1);
    }

    #[test]
    fn test_presets() {
        let t0 = Instant::now();
        let mut picker = DatePicker::new(
            PickerConfig::builder()
                .min_date(date!(2024 - 01 - 01))
                .max_date(date!(2024 - 12 - 31))
                .disable_date(date!(2024 - 07 - 04))
                .preset("Valentine's", date!(2024 - 02 - 14))
                .preset("Holiday", date!(2024 - 07 - 04))
                .build()
                .unwrap(),
        );
        picker.mount(date!(2024 - 01 - 01), t0);
        assert!(!picker.is_preset_active(0));
        let (event, scroll) = picker.apply_preset(0, t0).unwrap();
        assert_eq!(event, PickerEvent::Changed(String::from("2024-02-14")));
        assert_eq!(scroll.map(|s| s.index), Some(1));
        assert!(picker.is_preset_active(0));
        assert_eq!(picker.apply_preset(1, t0), None);
        assert_eq!(picker.apply_preset(2, t0), None);
        assert!(picker.is_preset_active(0));
    }

    #[test]
    fn test_set_bounds() {
        let t0 = Instant::now();
        let mut picker = DatePicker::new(PickerConfig::default());
        picker.mount(date!(2040 - 01 - 01), t0);
        let scroll = picker
            .set_bounds(Some(date!(2024 - 01 - 01)), Some(date!(2024 - 06 - 30)), t0)
            .unwrap();
        assert_eq!(picker.pages().len(), 6);
        assert_eq!(
            scroll,
            ScrollTo {
                index: 5,
                animated: false
            }
        );
        assert_eq!(picker.current_index(), 5);
        assert_eq!(picker.nav_title(), "June 2024");
        let grid = picker.current_grid();
        assert!(grid.cell(30).unwrap().is_selectable());
        assert!(picker.grid(6).is_none());
        assert!(matches!(
            picker.set_bounds(Some(date!(2024 - 06 - 30)), Some(date!(2024 - 01 - 01)), t0),
            Err(ConfigError::InvertedBounds { .. })
        ));
        assert_eq!(picker.pages().len(), 6);
    }

    #[test]
    fn test_set_bounds_keeps_month_in_range() {
        let t0 = Instant::now();
        let mut picker = DatePicker::new(PickerConfig::default());
        picker.mount(date!(2040 - 01 - 15), t0);
        assert_eq!(picker.nav_title(), "January 2040");
        let scroll = picker
            .set_bounds(Some(date!(2024 - 01 - 01)), Some(date!(2060 - 12 - 31)), t0)
            .unwrap();
        assert_eq!(picker.nav_title(), "January 2040");
        assert_eq!(scroll.index, picker.current_index());
        assert_eq!(picker.current_index(), 16 * 12);
        assert_eq!(
            picker.view_settled(scroll.index, t0),
            Settled::Echo,
            "the renderer's settle after the jump is an echo"
        );
    }

    #[test]
    fn test_weekday_header_and_close() {
        let mut picker = DatePicker::new(
            PickerConfig::builder()
                .first_day(FirstDayOfWeek::Sunday)
                .build()
                .unwrap(),
        );
        assert_eq!(picker.weekday_header()[0], "Su");
        picker.open_chooser();
        assert_eq!(picker.close(), PickerEvent::Closed);
        assert!(!picker.chooser().is_open());
    }
}
