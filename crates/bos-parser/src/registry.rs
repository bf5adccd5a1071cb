use chrono::{Month, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::model::{Classification, Period, SensorKind};

fn filename_pattern(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("filename pattern is valid")
}

static TEMPERATURE_NAME: Lazy<Regex> =
    Lazy::new(|| filename_pattern(r"^(temperature_.+?)_([A-Za-z]+)\s(\d{4})\.csv$"));
static WATER_NAME: Lazy<Regex> =
    Lazy::new(|| filename_pattern(r"^water_([A-Za-z]+)\s(\d{4})\.csv$"));
static ENERGY_NAME: Lazy<Regex> =
    Lazy::new(|| filename_pattern(r"^(energy_Power.+?)_([A-Za-z]+)\s(\d{4})\.csv$"));
static OCCUPANCY_NAME: Lazy<Regex> =
    Lazy::new(|| filename_pattern(r"^occupancy_([A-Za-z]+)\s(\d{4})\.csv$"));

fn pattern_for(kind: SensorKind) -> &'static Regex {
    match kind {
        SensorKind::Temperature => &TEMPERATURE_NAME,
        SensorKind::Water => &WATER_NAME,
        SensorKind::Energy => &ENERGY_NAME,
        SensorKind::Occupancy => &OCCUPANCY_NAME,
    }
}

fn has_prefix_ignore_case(name: &str, prefix: &str) -> bool {
    name.len() >= prefix.len()
        && name.is_char_boundary(prefix.len())
        && name[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Classify a raw filename. Kinds are tried in [`SensorKind::ALL`] order; a
/// kind whose prefix matches but whose full pattern does not falls through
/// to the next one.
pub fn classify_filename(name: &str) -> Option<Classification> {
    SensorKind::ALL
        .into_iter()
        .filter(|kind| has_prefix_ignore_case(name, kind.filename_prefix()))
        .find_map(|kind| classify_as(kind, name))
}

fn classify_as(kind: SensorKind, name: &str) -> Option<Classification> {
    let captures = pattern_for(kind).captures(name)?;
    let offset = usize::from(kind.has_base_label());
    let base = if kind.has_base_label() {
        Some(captures.get(1)?.as_str().to_string())
    } else {
        None
    };
    Some(Classification {
        kind,
        base,
        month_token: captures.get(1 + offset)?.as_str().to_string(),
        year_token: captures.get(2 + offset)?.as_str().to_string(),
    })
}

/// Turn `"<MonthName>"` / `"<Year>"` tokens into clean-filename components.
///
/// Only full English month names are accepted. When the tokens do not form a
/// valid date the month is `??` and the year is the 3rd and 4th characters of
/// the raw year token, copied as-is.
pub fn resolve_period(month_token: &str, year_token: &str) -> Period {
    match parse_month_year(month_token, year_token) {
        Some(date) => Period {
            month: date.format("%m").to_string(),
            year: date.format("%y").to_string(),
        },
        None => Period {
            month: "??".to_string(),
            year: year_token.chars().skip(2).take(2).collect(),
        },
    }
}

fn parse_month_year(month_token: &str, year_token: &str) -> Option<NaiveDate> {
    let month: Month = month_token.parse().ok()?;
    if !month.name().eq_ignore_ascii_case(month_token) {
        return None;
    }
    if year_token.len() != 4 || !year_token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year_token.parse().ok()?;
    if year < 1 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
}
