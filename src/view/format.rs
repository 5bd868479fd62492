//! Display formatting
//!
//! Fixed en-US conventions so output is stable regardless of host locale.

use crate::remote::{DailyReportEntry, ReportDate};

/// `5 January, 2024`
pub fn format_date(date: &ReportDate) -> String {
    date.datetime().format("%-d %B, %Y").to_string()
}

/// Absent dates render as an empty string
pub fn format_optional_date(date: Option<&ReportDate>) -> String {
    date.map(format_date).unwrap_or_default()
}

/// Compact chart-axis form: `5 Jan,24`
pub fn format_axis_date(date: &ReportDate) -> String {
    date.datetime().format("%-d %b,%y").to_string()
}

/// Integer with `,` thousands separators: `1,234,567`
pub fn format_number<N: Into<i128>>(n: N) -> String {
    let n: i128 = n.into();
    let digits = n.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Shortest decimal form: `60`, `62.5`
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}

/// Pie label for a single-day entry: `app: 1,234`
pub fn platform_count_label(entry: &DailyReportEntry) -> String {
    format!("{}: {}", entry.platform, format_number(entry.count))
}

/// Pie label for a percentage slice: `App: 60%`
pub fn percentage_label(name: &str, value: f64) -> String {
    format!("{}: {}%", name, format_value(value))
}
