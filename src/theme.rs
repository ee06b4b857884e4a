use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const LABEL_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

/// Days borrowed from the neighbouring months
pub(crate) const PADDING_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const DISABLED_STYLE: Style = BASE_STYLE
    .fg(Color::DarkGray)
    .add_modifier(Modifier::CROSSED_OUT);

pub(crate) const SELECTED_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightCyan)
    .add_modifier(Modifier::BOLD);

pub(crate) const ACTIVE_PRESET_STYLE: Style = BASE_STYLE
    .fg(Color::LightCyan)
    .add_modifier(Modifier::UNDERLINED);

/// Markers whose colour can't be parsed
pub(crate) const FALLBACK_MARKER_COLOR: Color = Color::Gray;

pub(crate) mod yearmonth {
    use super::*;

    pub(crate) const OUT_OF_RANGE_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
