//! Per-day visual markers: an explicit table keyed by date, with an optional
//! deterministic pseudo-random fallback for demo data.
use crate::date::month0;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use time::Date;

/// Probability-like cutoff above which a date gets no generated markers
const MARKER_CUTOFF: f64 = 0.4;

/// Most markers generated for a single day
const MAX_GENERATED: u32 = 3;

/// A marker colour, as understood by the renderer (e.g. `"#FF4D4D"` or
/// `"red"`)
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(transparent)]
pub struct Marker(String);

impl Marker {
    pub fn new<S: Into<String>>(colour: S) -> Marker {
        Marker(colour.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn default_palette() -> Vec<Marker> {
    ["#FF4D4D", "#70A1FF", "#2ED573", "#FFA502"]
        .into_iter()
        .map(Marker::new)
        .collect()
}

/// Deterministically derive a marker list for a day from its components.
///
/// `month0` is zero-based.  The same inputs always produce the same output;
/// roughly 60% of dates get no markers at all, the rest get one to three
/// colours drawn (with repetition) from `palette`.
pub fn stable_markers(day: u8, month0: u8, year: i32, palette: &[Marker]) -> Vec<Marker> {
    if palette.is_empty() {
        return Vec::new();
    }
    // Fused multiply-add would round differently and change the markers
    #[allow(clippy::suboptimal_flops)]
    let x = f64::from(year) * 10000.0 + f64::from(month0) * 100.0 + f64::from(day);
    let seed = x.sin() * 10000.0;
    let frac = seed - seed.floor();
    if frac > MARKER_CUTOFF {
        return Vec::new();
    }
    let count = floor_to_index((frac * 10.0) % f64::from(MAX_GENERATED)) + 1;
    (1..)
        .take(count)
        .map(|i: u32| {
            let idx = floor_to_index(frac * 100.0 * f64::from(i)) % palette.len();
            palette[idx].clone()
        })
        .collect()
}

// `x` is always a small non-negative value here
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_to_index(x: f64) -> usize {
    x.floor() as usize
}

/// Where a grid gets its per-day markers from
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarkerSource {
    explicit: HashMap<Date, Vec<Marker>>,
    generated: bool,
    palette: Vec<Marker>,
}

impl MarkerSource {
    pub fn new(palette: Vec<Marker>) -> MarkerSource {
        MarkerSource {
            explicit: HashMap::new(),
            generated: false,
            palette,
        }
    }

    /// Give `date` exactly these markers, overriding anything generated
    pub fn mark(&mut self, date: Date, markers: Vec<Marker>) {
        self.explicit.insert(date, markers);
    }

    pub fn set_generated(&mut self, generated: bool) {
        self.generated = generated;
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn palette(&self) -> &[Marker] {
        &self.palette
    }

    pub fn resolve(&self, date: Date) -> Vec<Marker> {
        if let Some(markers) = self.explicit.get(&date) {
            markers.clone()
        } else if self.generated {
            stable_markers(date.day(), month0(date.month()), date.year(), &self.palette)
        } else {
            Vec::new()
        }
    }
}

impl Default for MarkerSource {
    fn default() -> MarkerSource {
        MarkerSource::new(default_palette())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::{days_in_month, month_from0};
    use time::macros::date;

    fn all_days(year: i32) -> impl Iterator<Item = (u8, u8)> {
        (0..12u8).flat_map(move |m0| {
            let month = month_from0(m0).unwrap();
            (1..=days_in_month(year, month)).map(move |d| (d, m0))
        })
    }

    #[test]
    fn test_known_markers() {
        let palette = default_palette();
        let colours = |day| {
            stable_markers(day, 1, 2024, &palette)
                .iter()
                .map(|m| m.as_str().to_owned())
                .collect::<Vec<_>>()
        };
        assert!(colours(1).is_empty());
        assert_eq!(colours(4), ["#70A1FF", "#2ED573", "#FFA502"]);
        assert_eq!(colours(12), ["#FF4D4D"]);
        assert_eq!(colours(15), ["#70A1FF", "#FFA502"]);
        assert_eq!(colours(25), ["#2ED573"]);
    }

    #[test]
    fn test_deterministic() {
        let palette = default_palette();
        for (day, m0) in all_days(2024) {
            assert_eq!(
                stable_markers(day, m0, 2024, &palette),
                stable_markers(day, m0, 2024, &palette),
            );
        }
    }

    #[test]
    fn test_counts_and_colours() {
        let palette = default_palette();
        for (day, m0) in all_days(2023) {
            let markers = stable_markers(day, m0, 2023, &palette);
            assert!(markers.len() <= 3);
            assert!(markers.iter().all(|m| palette.contains(m)));
        }
    }

    #[test]
    fn test_roughly_sixty_percent_empty() {
        let palette = default_palette();
        let mut total = 0u32;
        let mut empty = 0u32;
        for year in 2000..2010 {
            for (day, m0) in all_days(year) {
                total += 1;
                if stable_markers(day, m0, year, &palette).is_empty() {
                    empty += 1;
                }
            }
        }
        let share = f64::from(empty) / f64::from(total);
        assert!((0.5..0.7).contains(&share), "empty share was {share}");
    }

    #[test]
    fn test_empty_palette() {
        for (day, m0) in all_days(2024) {
            assert!(stable_markers(day, m0, 2024, &[]).is_empty());
        }
    }

    #[test]
    fn test_explicit_overrides_generated() {
        let mut source = MarkerSource::default();
        source.set_generated(true);
        let d = date!(2024 - 02 - 14);
        source.mark(d, vec![Marker::new("pink")]);
        assert_eq!(source.resolve(d), vec![Marker::new("pink")]);
        source.mark(d, Vec::new());
        assert!(source.resolve(d).is_empty());
    }

    #[test]
    fn test_generated_off() {
        let source = MarkerSource::default();
        assert!(!source.is_generated());
        for (day, m0) in all_days(2024) {
            let month = month_from0(m0).unwrap();
            let d = Date::from_calendar_date(2024, month, day).unwrap();
            assert!(source.resolve(d).is_empty());
        }
    }

    #[test]
    fn test_generated_uses_zero_based_month() {
        let mut source = MarkerSource::default();
        source.set_generated(true);
        let d = date!(2024 - 03 - 05);
        assert_eq!(
            source.resolve(d),
            stable_markers(5, 2, 2024, &default_palette())
        );
    }
}
