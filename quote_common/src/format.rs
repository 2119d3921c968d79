//! Cell formatting for the quote table.
//!
//! Prices follow the en-US number style: comma digit grouping, at most three
//! fraction digits, trailing zeros dropped, and a `$` prefix. Times are rendered
//! as a 12-hour time of day in the selected [`DisplayZone`].
use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use strum_macros::{Display, EnumString};

const TIME_FORMAT: &str = "%-I:%M:%S %p";

/// Zone used to render the Time column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display, EnumString)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DisplayZone {
    /// The machine's local time zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

/// Format a price as `$` followed by a grouped number, e.g. `$95,400.123`.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return format!("${}", price);
    }

    let fixed = format!("{:.3}", price.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    // Values that round to zero lose their sign.
    let negative = price < 0.0 && (integer != "0" || !fraction.is_empty());

    let mut out = String::from("$");
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Format an instant as a time of day, e.g. `10:13:20 PM`.
pub fn format_time(timestamp: &DateTime<Utc>, zone: DisplayZone) -> String {
    match zone {
        DisplayZone::Local => timestamp
            .with_timezone(&Local)
            .format(TIME_FORMAT)
            .to_string(),
        DisplayZone::Utc => timestamp.format(TIME_FORMAT).to_string(),
    }
}

/// Insert a comma every three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
