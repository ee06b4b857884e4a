use crate::calendar::MonthView;
use crate::carousel::Carousel;
use crate::help::Help;
use crate::theme::BASE_STYLE;
use crate::yearmonth::YearMonth;
use crossterm::event::{
    poll, read, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind,
};
use datepick::{
    chooser::{ChooserInput, ChooserOutput},
    navigation::{ScrollTo, Settled},
    pages::Page,
    DatePicker, PickerEvent,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::Widget,
    Terminal,
};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use time::{Date, Duration as DateDuration};
use tracing::debug;

/// How long a carousel frame lasts while it is gliding between pages
const FRAME: Duration = Duration::from_millis(40);

/// How long to wait for input when nothing is moving
const IDLE: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub(crate) struct App {
    picker: DatePicker,
    carousel: Carousel,
    cursor: Date,
    state: AppState,
    confirmed: Option<String>,
}

impl App {
    pub(crate) fn new(mut picker: DatePicker, today: Date, now: Instant) -> App {
        let scroll = picker.mount(today, now);
        let carousel = Carousel::new(picker.pages().len());
        let cursor = picker.selection().date().unwrap_or(today);
        let mut app = App {
            picker,
            carousel,
            cursor,
            state: AppState::Calendar,
            confirmed: None,
        };
        app.scroll(scroll, now);
        app
    }

    /// Run until the user quits, returning the confirmed date, if any
    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<Option<String>>
    where
        io::Error: From<B::Error>,
    {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
            self.advance(Instant::now());
        }
        Ok(self.confirmed)
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        io::Error: From<B::Error>,
    {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let timeout = if self.carousel.is_animating() {
            FRAME
        } else {
            IDLE
        };
        if !poll(timeout)? {
            return Ok(());
        }
        let event = read()?;
        let now = Instant::now();
        if let Event::Mouse(MouseEvent { kind, .. }) = event {
            match kind {
                MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => self.drag(1, now),
                MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => self.drag(-1, now),
                _ => (),
            }
            return Ok(());
        }
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.close();
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code, now) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    /// Let a frame's worth of time pass: close stale echo windows and move a
    /// gliding carousel along
    fn advance(&mut self, now: Instant) {
        self.picker.tick(now);
        if let Some(index) = self.carousel.step() {
            self.settled(index, now);
        }
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode, now: Instant) -> bool {
        match self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1, now),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1, now),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-7, now),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(7, now),
                KeyCode::Char(' ') | KeyCode::Enter => self.pick(),
                KeyCode::Char('n') | KeyCode::PageDown => match self.picker.next(now) {
                    Ok(scroll) => {
                        self.scroll(scroll, now);
                        true
                    }
                    Err(_) => false,
                },
                KeyCode::Char('p') | KeyCode::PageUp => match self.picker.prev(now) {
                    Ok(scroll) => {
                        self.scroll(scroll, now);
                        true
                    }
                    Err(_) => false,
                },
                KeyCode::Char('H') => {
                    self.drag(-1, now);
                    true
                }
                KeyCode::Char('L') => {
                    self.drag(1, now);
                    true
                }
                KeyCode::Char('g') => {
                    self.picker.open_chooser();
                    self.state = AppState::Choosing;
                    true
                }
                KeyCode::Char(c @ '1'..='9') => self.apply_preset(c, now),
                KeyCode::Char('c') => self.confirm(),
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.close();
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Choosing => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.picker.dismiss_chooser();
                    self.state = AppState::Calendar;
                    return true;
                }
                let input = match key {
                    KeyCode::Char('h') | KeyCode::Left => ChooserInput::PrevMonth,
                    KeyCode::Char('l') | KeyCode::Right => ChooserInput::NextMonth,
                    KeyCode::Char('k') | KeyCode::Up => ChooserInput::PrevYear,
                    KeyCode::Char('j') | KeyCode::Down => ChooserInput::NextYear,
                    KeyCode::Enter => ChooserInput::Apply,
                    _ => return false,
                };
                let (output, scroll) = self.picker.chooser_input(input, now);
                if let Some(scroll) = scroll {
                    self.scroll(scroll, now);
                }
                match output {
                    ChooserOutput::Ok => true,
                    ChooserOutput::Invalid => false,
                    ChooserOutput::Jump(_) | ChooserOutput::Closed => {
                        self.state = AppState::Calendar;
                        true
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    /// Hand a programmatic scroll to the carousel, reporting the settle if it
    /// lands at once
    fn scroll(&mut self, scroll: ScrollTo, now: Instant) {
        if let Some(index) = self.carousel.scroll_to(scroll) {
            self.settled(index, now);
        }
        self.follow_page();
    }

    fn drag(&mut self, delta: isize, now: Instant) {
        if let Some(index) = self.carousel.drag(delta) {
            self.settled(index, now);
        }
    }

    fn settled(&mut self, index: usize, now: Instant) {
        if let Settled::Moved(_) = self.picker.view_settled(index, now) {
            self.follow_page();
        }
    }

    /// Keep the cursor on the current page, preserving its day where possible
    fn follow_page(&mut self) {
        let page = self.picker.current_page();
        if Page::containing(self.cursor) != page {
            let day = self.cursor.day().min(page.days());
            self.cursor = page.first_day().replace_day(day).unwrap_or(page.first_day());
        }
    }

    fn move_cursor(&mut self, days: i64, now: Instant) -> bool {
        let Some(target) = self.cursor.checked_add(DateDuration::days(days)) else {
            return false;
        };
        let page = Page::containing(target);
        if page == self.picker.current_page() {
            self.cursor = target;
            return true;
        }
        let Some(index) = self.picker.pages().index_of(page.year(), page.month()) else {
            return false;
        };
        let scroll = if index > self.picker.current_index() {
            self.picker.next(now)
        } else {
            self.picker.prev(now)
        };
        match scroll {
            Ok(scroll) => {
                self.cursor = target;
                self.scroll(scroll, now);
                true
            }
            Err(_) => false,
        }
    }

    fn pick(&mut self) -> bool {
        let cell = self
            .picker
            .current_grid()
            .cell(self.cursor.day())
            .cloned();
        match cell.and_then(|c| self.picker.pick(&c)) {
            Some(event) => {
                emit(&event);
                true
            }
            None => false,
        }
    }

    fn apply_preset(&mut self, key: char, now: Instant) -> bool {
        let Some(i) = key.to_digit(10).and_then(|d| usize::try_from(d).ok()) else {
            return false;
        };
        let Some((event, scroll)) = self.picker.apply_preset(i - 1, now) else {
            return false;
        };
        emit(&event);
        if let Some(date) = self.picker.selection().date() {
            self.cursor = date;
        }
        if let Some(scroll) = scroll {
            self.scroll(scroll, now);
        }
        true
    }

    fn confirm(&mut self) -> bool {
        match self.picker.confirm() {
            Some(event) => {
                emit(&event);
                if let PickerEvent::Confirmed(date) = event {
                    self.confirmed = Some(date);
                }
                self.state = AppState::Quitting;
                true
            }
            None => false,
        }
    }

    fn close(&mut self) {
        let event = self.picker.close();
        emit(&event);
        self.state = AppState::Quitting;
    }
}

fn emit(event: &PickerEvent) {
    debug!(?event, "Picker event");
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        MonthView::new(&self.picker, self.carousel.shown(), Some(self.cursor)).render(area, buf);
        match self.state {
            AppState::Helping => Help(BASE_STYLE).render(area, buf),
            AppState::Choosing => YearMonth(&self.picker).render(area, buf),
            AppState::Calendar | AppState::Quitting => (),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Choosing,
    Helping,
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{
        DISABLED_STYLE, LABEL_STYLE, PADDING_STYLE, SELECTED_STYLE, TITLE_STYLE, WEEKDAY_STYLE,
    };
    use datepick::{locale::Labels, marker::Marker, FirstDayOfWeek, PickerConfig};
    use ratatui::style::Color;
    use time::macros::date;

    fn first_quarter(now: Instant) -> App {
        let config = PickerConfig::builder()
            .min_date(date!(2024 - 01 - 01))
            .max_date(date!(2024 - 03 - 31))
            .first_day(FirstDayOfWeek::Monday)
            .initial_date(date!(2024 - 02 - 10))
            .disable_date(date!(2024 - 02 - 14))
            .mark_date(date!(2024 - 02 - 20), vec![Marker::new("red")])
            .build()
            .unwrap();
        App::new(DatePicker::new(config), date!(2024 - 06 - 01), now)
    }

    #[test]
    fn test_render_february() {
        let app = first_quarter(Instant::now());
        let area = Rect::new(0, 0, 46, 18);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "‹               February 2024                ›",
            " Mo     Tu     We     Th     Fr     Sa     Su ",
            "──────────────────────────────────────────────",
            " 29     30     31      1      2      3      4 ",
            "                                              ",
            "  5      6      7      8      9    [10]    11 ",
            "                                              ",
            " 12     13     14     15     16     17     18 ",
            "                                              ",
            " 19     20     21     22     23     24     25 ",
            "        •                                     ",
            " 26     27     28     29      1      2      3 ",
            "                                              ",
            "  4      5      6      7      8      9     10 ",
            "                                              ",
            "──────────────────────────────────────────────",
            "Selected Date: February 10, 2024              ",
            "                                              ",
        ]);
        expected.set_style(*expected.area(), BASE_STYLE);
        expected.set_style(Rect::new(16, 0, 13, 1), TITLE_STYLE);
        for wd in 0..7 {
            expected.set_style(Rect::new(7 * wd + 1, 1, 2, 1), WEEKDAY_STYLE);
        }
        for x in [0, 7, 14] {
            expected.set_style(Rect::new(x, 3, 4, 1), PADDING_STYLE);
        }
        for x in [28, 35, 42] {
            expected.set_style(Rect::new(x, 11, 4, 1), PADDING_STYLE);
        }
        for wd in 0..7 {
            expected.set_style(Rect::new(7 * wd, 13, 4, 1), PADDING_STYLE);
        }
        expected.set_style(Rect::new(35, 5, 4, 1), SELECTED_STYLE);
        expected.set_style(Rect::new(14, 7, 4, 1), DISABLED_STYLE);
        expected.set_style(Rect::new(8, 10, 1, 1), BASE_STYLE.fg(Color::Red));
        expected.set_style(Rect::new(0, 16, 14, 1), LABEL_STYLE);
        assert_eq!(buffer, expected);
    }

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect::<String>()
            .trim_end()
            .to_owned()
    }

    #[test]
    fn test_render_key_hints() {
        let app = first_quarter(Instant::now());
        let area = Rect::new(0, 0, 46, 19);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert_eq!(row(&buffer, 18), "c Confirm  g Edit  q Close");
        assert_eq!(buffer[(0, 18)].style().add_modifier, LABEL_STYLE.add_modifier);
    }

    #[test]
    fn test_render_custom_labels() {
        let config = PickerConfig::builder()
            .labels(Labels {
                confirm: String::from("OK"),
                cancel: String::from("Quit"),
                ..Labels::default()
            })
            .build()
            .unwrap();
        let app = App::new(DatePicker::new(config), date!(2024 - 06 - 01), Instant::now());
        let area = Rect::new(0, 0, 46, 19);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert_eq!(row(&buffer, 16), "Selected Date: No date selected");
        assert_eq!(row(&buffer, 18), "c OK  g Edit  q Quit");
    }

    #[test]
    fn test_next_glides_and_echo_is_swallowed() {
        let t0 = Instant::now();
        let mut app = first_quarter(t0);
        assert_eq!(app.picker.current_index(), 1);
        assert!(app.handle_key(KeyCode::Char('n'), t0));
        assert_eq!(app.picker.current_index(), 2);
        assert!(app.carousel.is_animating());
        assert_eq!(app.carousel.shown(), 1);
        assert_eq!(app.cursor, date!(2024 - 03 - 10));
        app.advance(t0 + FRAME);
        assert!(!app.carousel.is_animating());
        assert_eq!(app.carousel.shown(), 2);
        assert!(!app.picker.navigator().echo_pending(t0 + FRAME));
        assert!(!app.handle_key(KeyCode::Char('n'), t0 + FRAME));
    }

    #[test]
    fn test_drag_moves_page() {
        let t0 = Instant::now();
        let mut app = first_quarter(t0);
        assert!(app.handle_key(KeyCode::Char('H'), t0));
        assert_eq!(app.picker.current_index(), 0);
        assert_eq!(app.cursor, date!(2024 - 01 - 10));
        assert!(app.handle_key(KeyCode::Char('H'), t0));
        assert_eq!(app.picker.current_index(), 0);
    }

    #[test]
    fn test_cursor_crosses_months() {
        let t0 = Instant::now();
        let mut app = first_quarter(t0);
        app.cursor = date!(2024 - 02 - 28);
        assert!(app.handle_key(KeyCode::Char('j'), t0));
        assert_eq!(app.cursor, date!(2024 - 03 - 06));
        assert_eq!(app.picker.current_index(), 2);
        app.advance(t0 + FRAME);
        app.cursor = date!(2024 - 03 - 28);
        assert!(!app.handle_key(KeyCode::Char('j'), t0 + FRAME));
        assert!(app.handle_key(KeyCode::Char('l'), t0 + FRAME));
        assert_eq!(app.cursor, date!(2024 - 03 - 29));
    }

    #[test]
    fn test_pick_and_confirm() {
        let t0 = Instant::now();
        let mut app = first_quarter(t0);
        // Deselect the initial date
        assert!(app.handle_key(KeyCode::Char(' '), t0));
        assert_eq!(app.picker.selection().date(), None);
        assert!(!app.handle_key(KeyCode::Char('c'), t0));
        app.cursor = date!(2024 - 02 - 14);
        assert!(!app.handle_key(KeyCode::Enter, t0));
        app.cursor = date!(2024 - 02 - 15);
        assert!(app.handle_key(KeyCode::Enter, t0));
        assert!(app.handle_key(KeyCode::Char('c'), t0));
        assert!(app.quitting());
        assert_eq!(app.confirmed.as_deref(), Some("2024-02-15"));
    }

    #[test]
    fn test_chooser() {
        let t0 = Instant::now();
        let mut app = first_quarter(t0);
        assert!(app.handle_key(KeyCode::Char('g'), t0));
        assert_eq!(app.state, AppState::Choosing);
        assert!(app.handle_key(KeyCode::Left, t0));
        assert!(app.handle_key(KeyCode::Enter, t0));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.picker.current_index(), 0);
        assert_eq!(app.carousel.shown(), 0);
        assert!(!app.carousel.is_animating());
        assert_eq!(app.cursor, date!(2024 - 01 - 10));

        assert!(app.handle_key(KeyCode::Char('g'), t0));
        assert!(app.handle_key(KeyCode::Esc, t0));
        assert_eq!(app.state, AppState::Calendar);
        assert!(!app.picker.chooser().is_open());
    }

    #[test]
    fn test_help_and_quit() {
        let t0 = Instant::now();
        let mut app = first_quarter(t0);
        assert!(app.handle_key(KeyCode::Char('?'), t0));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('x'), t0));
        assert_eq!(app.state, AppState::Calendar);
        assert!(!app.handle_key(KeyCode::Char('x'), t0));
        assert!(app.handle_key(KeyCode::Char('q'), t0));
        assert!(app.quitting());
        assert_eq!(app.confirmed, None);
    }
}
