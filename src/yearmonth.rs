use crate::theme::{
    yearmonth::{OUT_OF_RANGE_STYLE, READY_ENTER_STYLE},
    BASE_STYLE, LABEL_STYLE, TITLE_STYLE,
};
use datepick::{chooser::Draft, DatePicker};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, HorizontalAlignment, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Widget},
};

const OUTER_WIDTH: u16 = 28;
const OUTER_HEIGHT: u16 = 10;

/// The year/month chooser popup, drawn over the calendar while the picker's
/// chooser is open
#[derive(Clone, Copy, Debug)]
pub(crate) struct YearMonth<'a>(pub(crate) &'a DatePicker);

impl Widget for YearMonth<'_> {
    /*
     * ............................
     * .┌────────── Edit ────────┐.
     * .│      Select Year       │.
     * .│      ‹  2024  ›        │.
     * .│      Select Month      │.
     * .│  Jan ‹ February › Mar  │.
     * .│                        │.
     * .│   [ENTER]  [g] Cancel  │.
     * .└────────────────────────┘.
     * ............................
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(draft) = self.0.chooser().draft() else {
            return;
        };
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        let title = format!(" {} ", self.0.config().labels().edit);
        Block::bordered()
            .title(title)
            .title_alignment(HorizontalAlignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        self.to_text(draft).render(text_area, buf);
    }
}

impl YearMonth<'_> {
    fn to_text(self, draft: Draft) -> Text<'static> {
        let pages = self.0.pages();
        let years = pages.years();
        let last_year = usize::try_from(years.end() - years.start()).unwrap_or(0);
        let year_position = self.0.chooser().year_position();
        let in_range = pages.index_of(draft.year, draft.month).is_some();
        let labels = self.0.config().labels();
        let locale = self.0.config().locale();
        Text::from_iter([
            Line::styled(labels.select_year.clone(), LABEL_STYLE),
            Line::from_iter([
                arrow('‹', year_position > 0),
                Span::styled(format!("  {}  ", draft.year), TITLE_STYLE),
                arrow('›', year_position < last_year),
            ]),
            Line::styled(labels.select_month.clone(), LABEL_STYLE),
            Line::from_iter([
                Span::styled(
                    format!("{} ", locale.month_name_short(draft.month.previous())),
                    BASE_STYLE,
                ),
                arrow('‹', true),
                Span::styled(
                    format!(" {} ", locale.month_name(draft.month)),
                    TITLE_STYLE,
                ),
                arrow('›', true),
                Span::styled(
                    format!(" {}", locale.month_name_short(draft.month.next())),
                    BASE_STYLE,
                ),
            ]),
            Line::styled("", BASE_STYLE),
            // Only the "[ENTER]" text and not its centering padding should be
            // underlined, hence spans rather than a styled line
            Line::from_iter([
                Span::styled(
                    "[ENTER]",
                    if in_range {
                        READY_ENTER_STYLE
                    } else {
                        OUT_OF_RANGE_STYLE
                    },
                ),
                Span::styled(format!("  [g] {}", labels.cancel_edit), BASE_STYLE),
            ]),
        ])
        .centered()
    }
}

fn arrow(ch: char, enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled(ch.to_string(), BASE_STYLE)
    } else {
        Span::styled(" ", BASE_STYLE)
    }
}
