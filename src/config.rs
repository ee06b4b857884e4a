//! Picker configuration: date bounds, disabling rules, markers, locale and
//! presets, plus loading the same from a TOML file.
use crate::date::{format_date, parse_date, DateError};
use crate::locale::{Labels, Locale};
use crate::marker::{default_palette, Marker, MarkerSource};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{Date, Weekday};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum FirstDayOfWeek {
    Sunday,
    #[default]
    Monday,
}

impl FirstDayOfWeek {
    /// Convert the `0` (Sunday) / `1` (Monday) flag used in config files
    pub fn from_flag(flag: u8) -> Result<FirstDayOfWeek, ConfigError> {
        match flag {
            0 => Ok(FirstDayOfWeek::Sunday),
            1 => Ok(FirstDayOfWeek::Monday),
            n => Err(ConfigError::FirstDayOfWeek(n)),
        }
    }

    /// Days from Sunday, matching [`Weekday::number_days_from_sunday()`]
    pub fn offset(self) -> u8 {
        match self {
            FirstDayOfWeek::Sunday => 0,
            FirstDayOfWeek::Monday => 1,
        }
    }

    pub fn weekday(self) -> Weekday {
        match self {
            FirstDayOfWeek::Sunday => Weekday::Sunday,
            FirstDayOfWeek::Monday => Weekday::Monday,
        }
    }
}

/// Inclusive minimum and maximum selectable dates.  Either side may be open.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DateBounds {
    min: Option<Date>,
    max: Option<Date>,
}

impl DateBounds {
    pub fn new(min: Option<Date>, max: Option<Date>) -> Result<DateBounds, ConfigError> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(ConfigError::InvertedBounds {
                    min: format_date(lo),
                    max: format_date(hi),
                });
            }
        }
        Ok(DateBounds { min, max })
    }

    pub fn unbounded() -> DateBounds {
        DateBounds::default()
    }

    pub fn min(&self) -> Option<Date> {
        self.min
    }

    pub fn max(&self) -> Option<Date> {
        self.max
    }

    pub fn contains(&self, date: Date) -> bool {
        self.min.is_none_or(|lo| lo <= date) && self.max.is_none_or(|hi| date <= hi)
    }
}

/// A caller-supplied rule for disabling individual dates, consulted after
/// the explicit disabled set and the bounds
pub trait DisableRule {
    fn is_disabled(&self, date: Date) -> bool;
}

impl<F: Fn(Date) -> bool> DisableRule for F {
    fn is_disabled(&self, date: Date) -> bool {
        self(date)
    }
}

/// Disables Saturdays and Sundays
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Weekends;

impl DisableRule for Weekends {
    fn is_disabled(&self, date: Date) -> bool {
        matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
    }
}

/// A labelled quick-pick date
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Preset {
    pub label: String,
    pub date: Date,
}

pub struct PickerConfig {
    bounds: DateBounds,
    first_day: FirstDayOfWeek,
    disabled: HashSet<Date>,
    rule: Option<Box<dyn DisableRule>>,
    markers: MarkerSource,
    initial_date: Option<Date>,
    presets: Vec<Preset>,
    locale: Locale,
    labels: Labels,
}

impl PickerConfig {
    pub fn builder() -> PickerConfigBuilder {
        PickerConfigBuilder::default()
    }

    pub fn bounds(&self) -> DateBounds {
        self.bounds
    }

    pub(crate) fn set_bounds(&mut self, bounds: DateBounds) {
        self.bounds = bounds;
    }

    pub fn first_day(&self) -> FirstDayOfWeek {
        self.first_day
    }

    pub fn is_explicitly_disabled(&self, date: Date) -> bool {
        self.disabled.contains(&date)
    }

    pub fn rule_disables(&self, date: Date) -> bool {
        self.rule.as_ref().is_some_and(|r| r.is_disabled(date))
    }

    pub fn markers(&self) -> &MarkerSource {
        &self.markers
    }

    pub fn initial_date(&self) -> Option<Date> {
        self.initial_date
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }
}

impl Default for PickerConfig {
    fn default() -> PickerConfig {
        PickerConfig {
            bounds: DateBounds::unbounded(),
            first_day: FirstDayOfWeek::default(),
            disabled: HashSet::new(),
            rule: None,
            markers: MarkerSource::default(),
            initial_date: None,
            presets: Vec::new(),
            locale: Locale::default(),
            labels: Labels::default(),
        }
    }
}

impl fmt::Debug for PickerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerConfig")
            .field("bounds", &self.bounds)
            .field("first_day", &self.first_day)
            .field("disabled", &self.disabled)
            .field("rule", &self.rule.as_ref().map(|_| "<rule>"))
            .field("markers", &self.markers)
            .field("initial_date", &self.initial_date)
            .field("presets", &self.presets)
            .field("locale", &self.locale)
            .field("labels", &self.labels)
            .finish()
    }
}

#[derive(Default)]
pub struct PickerConfigBuilder {
    min: Option<Date>,
    max: Option<Date>,
    first_day: FirstDayOfWeek,
    disabled: HashSet<Date>,
    rule: Option<Box<dyn DisableRule>>,
    marked: Vec<(Date, Vec<Marker>)>,
    generated_markers: bool,
    palette: Option<Vec<Marker>>,
    initial_date: Option<Date>,
    presets: Vec<Preset>,
    locale: Locale,
    labels: Labels,
}

impl PickerConfigBuilder {
    pub fn min_date(mut self, date: Date) -> Self {
        self.min = Some(date);
        self
    }

    pub fn max_date(mut self, date: Date) -> Self {
        self.max = Some(date);
        self
    }

    pub fn first_day(mut self, first_day: FirstDayOfWeek) -> Self {
        self.first_day = first_day;
        self
    }

    pub fn disable_date(mut self, date: Date) -> Self {
        self.disabled.insert(date);
        self
    }

    pub fn disable_dates<I: IntoIterator<Item = Date>>(mut self, dates: I) -> Self {
        self.disabled.extend(dates);
        self
    }

    pub fn disable_rule<R: DisableRule + 'static>(mut self, rule: R) -> Self {
        self.rule = Some(Box::new(rule));
        self
    }

    pub fn mark_date(mut self, date: Date, markers: Vec<Marker>) -> Self {
        self.marked.push((date, markers));
        self
    }

    pub fn generated_markers(mut self, yes: bool) -> Self {
        self.generated_markers = yes;
        self
    }

    pub fn palette(mut self, palette: Vec<Marker>) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn initial_date(mut self, date: Date) -> Self {
        self.initial_date = Some(date);
        self
    }

    pub fn preset<S: Into<String>>(mut self, label: S, date: Date) -> Self {
        self.presets.push(Preset {
            label: label.into(),
            date,
        });
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn build(self) -> Result<PickerConfig, ConfigError> {
        let bounds = DateBounds::new(self.min, self.max)?;
        self.locale
            .check()
            .map_err(|(field, expected, actual)| ConfigError::Locale {
                field,
                expected,
                actual,
            })?;
        let mut markers = MarkerSource::new(self.palette.unwrap_or_else(default_palette));
        markers.set_generated(self.generated_markers);
        for (date, ms) in self.marked {
            markers.mark(date, ms);
        }
        Ok(PickerConfig {
            bounds,
            first_day: self.first_day,
            disabled: self.disabled,
            rule: self.rule,
            markers,
            initial_date: self.initial_date,
            presets: self.presets,
            locale: self.locale,
            labels: self.labels,
        })
    }
}

impl fmt::Debug for PickerConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerConfigBuilder")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("first_day", &self.first_day)
            .field("rule", &self.rule.as_ref().map(|_| "<rule>"))
            .finish_non_exhaustive()
    }
}

/// On-disk form of the configuration.  Dates are canonical `YYYY-MM-DD`
/// strings and are validated when converted into a builder.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub initial_date: Option<String>,
    pub first_day_of_week: Option<u8>,
    pub disabled_dates: Vec<String>,
    pub random_markers: bool,
    pub marker_colors: Option<Vec<Marker>>,
    pub marked_dates: BTreeMap<String, Vec<Marker>>,
    pub presets: Vec<PresetEntry>,
    pub locale: Option<Locale>,
    pub labels: Option<Labels>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct PresetEntry {
    pub label: String,
    pub date: String,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<ConfigFile, ConfigError> {
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&src).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn into_builder(self) -> Result<PickerConfigBuilder, ConfigError> {
        let mut builder = PickerConfig::builder();
        if let Some(s) = self.min_date {
            builder = builder.min_date(field_date("min_date", &s)?);
        }
        if let Some(s) = self.max_date {
            builder = builder.max_date(field_date("max_date", &s)?);
        }
        if let Some(s) = self.initial_date {
            builder = builder.initial_date(field_date("initial_date", &s)?);
        }
        if let Some(flag) = self.first_day_of_week {
            builder = builder.first_day(FirstDayOfWeek::from_flag(flag)?);
        }
        for s in self.disabled_dates {
            builder = builder.disable_date(field_date("disabled_dates", &s)?);
        }
        builder = builder.generated_markers(self.random_markers);
        if let Some(palette) = self.marker_colors {
            builder = builder.palette(palette);
        }
        for (s, markers) in self.marked_dates {
            builder = builder.mark_date(field_date("marked_dates", &s)?, markers);
        }
        for PresetEntry { label, date } in self.presets {
            builder = builder.preset(label, field_date("presets", &date)?);
        }
        if let Some(locale) = self.locale {
            builder = builder.locale(locale);
        }
        if let Some(labels) = self.labels {
            builder = builder.labels(labels);
        }
        Ok(builder)
    }
}

fn field_date(field: &'static str, s: &str) -> Result<Date, ConfigError> {
    parse_date(s).map_err(|source| ConfigError::Date { field, source })
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid date in {field}")]
    Date {
        field: &'static str,
        #[source]
        source: DateError,
    },
    #[error("minimum date {min} is after maximum date {max}")]
    InvertedBounds { min: String, max: String },
    #[error("first day of week must be 0 (Sunday) or 1 (Monday), not {0}")]
    FirstDayOfWeek(u8),
    #[error("locale field {field} must have {expected} entries, found {actual}")]
    Locale {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
