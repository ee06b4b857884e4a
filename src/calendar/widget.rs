use super::{marker_color, show};
use crate::theme::{ACTIVE_PRESET_STYLE, BASE_STYLE, LABEL_STYLE, TITLE_STYLE, WEEKDAY_STYLE};
use datepick::{grid::DayCell, DatePicker};
use ratatui::{prelude::*, widgets::*};
use time::Date;

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = 46;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Number of lines above the first week: title, weekday names, rule
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week: the days and their markers
const WEEK_LINES: u16 = 2;

const WEEKS: u16 = 6;

const FOOTER_LINE: u16 = HEADER_LINES + WEEKS * WEEK_LINES;

const MARKER: char = '•';

const ACS_HLINE: char = '─';
const PREV_ARROW: char = '‹';
const NEXT_ARROW: char = '›';

/// One page of the picker: the month at `index`, with `cursor` bracketed if
/// it falls within that month
#[derive(Clone, Copy, Debug)]
pub(crate) struct MonthView<'a> {
    picker: &'a DatePicker,
    index: usize,
    cursor: Option<Date>,
}

impl<'a> MonthView<'a> {
    pub(crate) fn new(picker: &'a DatePicker, index: usize, cursor: Option<Date>) -> Self {
        MonthView {
            picker,
            index,
            cursor,
        }
    }

    fn is_cursor(&self, cell: &DayCell) -> bool {
        cell.current && self.cursor.is_some_and(|c| cell.date() == Some(c))
    }
}

impl Widget for MonthView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(grid) = self.picker.grid(self.index) else {
            return;
        };
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let [_, area, _] = Layout::horizontal([
            Constraint::Length(left),
            Constraint::Length(MAIN_WIDTH.min(area.width)),
            Constraint::Min(0),
        ])
        .areas(area);
        let locale = self.picker.config().locale();
        let page = grid.page();
        let title = format!("{} {}", locale.month_name(page.month()), page.year());
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(
            &title,
            self.index > 0,
            self.index + 1 < self.picker.pages().len(),
        );
        canvas.draw_weekdays(&self.picker.weekday_header());
        let selection = self.picker.selection();
        for (i, week) in std::iter::zip(0u16.., grid.weeks()) {
            for (wd, cell) in std::iter::zip(0u16.., week) {
                let s = show(cell, selection.is_cell_selected(cell), self.is_cursor(cell));
                canvas.draw_day(i, wd, s);
                canvas.draw_markers(i, wd, cell);
            }
        }
        canvas.hline(FOOTER_LINE, 0, ACS_HLINE, MAIN_WIDTH);
        canvas.draw_status(
            &self.picker.config().labels().title,
            &self.picker.header_text(),
        );
        let presets = self.picker.config().presets();
        let mut x = 0;
        for (i, preset) in std::iter::zip(1u16..=9, presets) {
            let style = if self.picker.is_preset_active(usize::from(i - 1)) {
                ACTIVE_PRESET_STYLE
            } else {
                BASE_STYLE
            };
            let s = format!("{i} {}", preset.label);
            x = canvas
                .mvprint(FOOTER_LINE + 2, x, s, Some(style))
                .saturating_add(2);
        }
        let labels = self.picker.config().labels();
        canvas.draw_hints(&[
            ('c', &labels.confirm),
            ('g', &labels.edit),
            ('q', &labels.cancel),
        ]);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, title: &str, prev: bool, next: bool) {
        if prev {
            self.mvaddch(0, 0, PREV_ARROW);
        }
        let width = u16::try_from(Span::raw(title).width()).unwrap_or(u16::MAX);
        self.mvprint(
            0,
            MAIN_WIDTH.saturating_sub(width) / 2,
            title,
            Some(TITLE_STYLE),
        );
        if next {
            self.mvaddch(0, MAIN_WIDTH - 1, NEXT_ARROW);
        }
    }

    fn draw_weekdays(&mut self, names: &[&str]) {
        for (wd, name) in std::iter::zip(0u16.., names) {
            self.mvprint(1, DAY_WIDTH * wd + 1, name, Some(WEEKDAY_STYLE));
        }
        self.hline(2, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, wd: u16, s: Span<'_>) {
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES,
            DAY_WIDTH * wd,
            s.content,
            Some(s.style),
        );
    }

    // Up to three dots centred under the day's digits
    fn draw_markers(&mut self, week_no: u16, wd: u16, cell: &DayCell) {
        let y = week_no * WEEK_LINES + HEADER_LINES + 1;
        let n = u16::try_from(cell.markers.len().min(3)).unwrap_or(3);
        let start = DAY_WIDTH * wd + (4 - n) / 2;
        for (x, marker) in std::iter::zip(start.., cell.markers.iter().take(3)) {
            let style = BASE_STYLE.fg(marker_color(marker));
            self.mvprint(y, x, MARKER.to_string(), Some(style));
        }
    }

    fn draw_status(&mut self, label: &str, text: &str) {
        let label = format!("{label}:");
        let x = self.mvprint(FOOTER_LINE + 1, 0, label, Some(LABEL_STYLE));
        self.mvprint(FOOTER_LINE + 1, x + 1, text, None);
    }

    fn draw_hints(&mut self, hints: &[(char, &str)]) {
        let mut x = 0;
        for &(key, label) in hints {
            x = self.mvprint(FOOTER_LINE + 3, x, key.to_string(), Some(LABEL_STYLE));
            x = self
                .mvprint(FOOTER_LINE + 3, x + 1, label, None)
                .saturating_add(2);
        }
    }

    fn mvaddch(&mut self, y: u16, x: u16, ch: char) {
        if y < self.area.height && x < self.area.width {
            if let Some(cell) = self.buf.cell_mut((x + self.area.x, y + self.area.y)) {
                cell.set_char(ch);
            }
        }
    }

    /// Print `s` at (`y`, `x`), truncated to the canvas, and return the
    /// column just past it
    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) -> u16 {
        let text = Text::styled(s.as_ref(), style.unwrap_or_default());
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        if y < self.area.height && x < self.area.width {
            // The Rect passed to the Paragraph must lie entirely within the
            // frame lest a panic result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
        x.saturating_add(width)
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
