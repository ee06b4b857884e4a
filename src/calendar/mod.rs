mod widget;
pub(crate) use self::widget::MonthView;
use crate::theme::{
    BASE_STYLE, DISABLED_STYLE, FALLBACK_MARKER_COLOR, PADDING_STYLE, SELECTED_STYLE,
};
use datepick::{grid::DayCell, marker::Marker};
use ratatui::{
    style::{Color, Style},
    text::Span,
};
use std::str::FromStr;

/// Render a day as a four-column span: `" dd "`, or `"[dd]"` under the
/// cursor
fn show(cell: &DayCell, selected: bool, cursor: bool) -> Span<'static> {
    let s = if cursor {
        format!("[{:2}]", cell.day)
    } else {
        format!(" {:2} ", cell.day)
    };
    Span::styled(s, day_style(cell, selected))
}

fn day_style(cell: &DayCell, selected: bool) -> Style {
    if !cell.current {
        PADDING_STYLE
    } else if cell.disabled {
        DISABLED_STYLE
    } else if selected {
        SELECTED_STYLE
    } else {
        BASE_STYLE
    }
}

fn marker_color(marker: &Marker) -> Color {
    Color::from_str(marker.as_str()).unwrap_or(FALLBACK_MARKER_COLOR)
}
