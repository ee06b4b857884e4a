//! Locale-provided names and user-facing labels.
use crate::config::FirstDayOfWeek;
use crate::date::month0;
use serde::Deserialize;
use time::Month;

static MONTHS_FULL: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Monday first
static WEEKDAYS_SHORT: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// Month and weekday names.  `day_names_short` is ordered Monday first and
/// is rotated for display when the week starts on Sunday.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Locale {
    pub month_names: Vec<String>,
    pub month_names_short: Vec<String>,
    pub day_names_short: Vec<String>,
}

impl Locale {
    /// Returns the name of the first list with the wrong number of entries,
    /// along with the expected and actual lengths
    pub(crate) fn check(&self) -> Result<(), (&'static str, usize, usize)> {
        for (field, names, expected) in [
            ("month_names", &self.month_names, 12),
            ("month_names_short", &self.month_names_short, 12),
            ("day_names_short", &self.day_names_short, 7),
        ] {
            if names.len() != expected {
                return Err((field, expected, names.len()));
            }
        }
        Ok(())
    }

    pub fn month_name(&self, month: Month) -> &str {
        name_at(&self.month_names, usize::from(month0(month)))
    }

    pub fn month_name_short(&self, month: Month) -> &str {
        name_at(&self.month_names_short, usize::from(month0(month)))
    }

    /// Weekday names in display order for a week starting on `first_day`
    pub fn weekday_header(&self, first_day: FirstDayOfWeek) -> Vec<&str> {
        let names = self.day_names_short.iter().map(String::as_str);
        match first_day {
            FirstDayOfWeek::Monday => names.collect(),
            FirstDayOfWeek::Sunday => {
                let mut header = names.collect::<Vec<_>>();
                header.rotate_right(1);
                header
            }
        }
    }
}

fn name_at(names: &[String], i: usize) -> &str {
    names.get(i).map_or("", String::as_str)
}

impl Default for Locale {
    fn default() -> Locale {
        Locale {
            month_names: MONTHS_FULL.iter().map(|&s| s.to_owned()).collect(),
            month_names_short: MONTHS_SHORT.iter().map(|&s| s.to_owned()).collect(),
            day_names_short: WEEKDAYS_SHORT.iter().map(|&s| s.to_owned()).collect(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Labels {
    pub title: String,
    pub select_year: String,
    pub select_month: String,
    pub confirm: String,
    pub cancel: String,
    pub edit: String,
    pub cancel_edit: String,
    pub no_date: String,
}

impl Default for Labels {
    fn default() -> Labels {
        Labels {
            title: String::from("Selected Date"),
            select_year: String::from("Select Year"),
            select_month: String::from("Select Month"),
            confirm: String::from("Confirm"),
            cancel: String::from("Close"),
            edit: String::from("Edit"),
            cancel_edit: String::from("Cancel"),
            no_date: String::from("No date selected"),
        }
    }
}
