//! Text rendering for cost reports
//!
//! Output format, per day in ascending order:
//!
//! ```text
//! date: 2023-05-01; represents $14.00 of the $14.00 total.
//!   Compute, 7 Hours @ $2 = $14.00
//! represents $14.00 of the $14.00 total.
//! ```
//!
//! Quantity and rate print as plain numbers; totals and costs as currency
//! with thousands separators and two decimals.

use crate::services::summarizer::{DaySummary, Report, ReportLine};
use num_format::{Locale, ToFormattedString};

/// Format a dollar amount: thousands-separated whole part, two decimals
pub fn format_currency(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let whole = (cents / 100).abs();
    let frac = (cents % 100).abs();
    format!("{}${}.{:02}", sign, whole.to_formatted_string(&Locale::en), frac)
}

fn render_line(line: &ReportLine) -> String {
    format!(
        "  {}, {} {} @ ${} = {}",
        line.name,
        line.quantity,
        line.unit,
        line.rate,
        format_currency(line.cost)
    )
}

fn render_day(day: &DaySummary) -> Vec<String> {
    let mut out = Vec::with_capacity(day.lines.len() + 1);
    out.push(format!(
        "date: {}; represents {} of the {} total.",
        day.day,
        format_currency(day.represented_total),
        format_currency(day.total)
    ));
    out.extend(day.lines.iter().map(render_line));
    out
}

/// Render the whole report as output lines: each day's summary followed by
/// its top entries, then the global summary
pub fn render(report: &Report) -> Vec<String> {
    let mut out = Vec::new();
    for day in &report.days {
        out.extend(render_day(day));
    }
    out.push(format!(
        "represents {} of the {} total.",
        format_currency(report.represented_total),
        format_currency(report.total)
    ));
    out
}
