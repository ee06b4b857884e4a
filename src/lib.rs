//! Core of a bounded, paginated single-date picker.
//!
//! The crate derives everything a renderer needs to draw a month-paged
//! calendar: the ordered list of selectable months ([`pages`]), a fixed
//! 42-cell grid per month ([`grid`]), per-day markers ([`marker`]), the
//! single-date [`selection`], the current page index with echo suppression
//! for view-driven settle events ([`navigation`]), and the year/month
//! [`chooser`].  [`picker::DatePicker`] ties them together behind one
//! event-driven facade.
//!
//! Dates are naive calendar dates ([`time::Date`]); at every boundary they
//! travel as canonical `YYYY-MM-DD` strings.
pub mod chooser;
pub mod config;
pub mod date;
pub mod grid;
pub mod locale;
pub mod marker;
pub mod navigation;
pub mod pages;
pub mod picker;
pub mod selection;

pub use crate::config::{ConfigError, FirstDayOfWeek, PickerConfig};
pub use crate::date::DateError;
pub use crate::picker::{DatePicker, PickerEvent};
