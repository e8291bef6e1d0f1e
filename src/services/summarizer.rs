//! Range summarization service
//!
//! Filters day buckets to the requested window, ranks each day's entries by
//! cost descending, and accumulates per-day and global totals. The first
//! top-N entries of each day are "represented": their costs additionally
//! feed the represented totals and become report lines.

use crate::services::grouper::DayBucket;
use crate::types::DateWindow;
use chrono::NaiveDate;

/// Default number of entries shown per day
pub const DEFAULT_TOP_N: usize = 5;

/// One rendered-ready line item
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub rate: f64,
    pub cost: f64,
}

/// Per-day summary: every in-bucket entry counts toward `total`, only the
/// top-N toward `represented_total` and `lines`
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub day: NaiveDate,
    pub represented_total: f64,
    pub total: f64,
    pub lines: Vec<ReportLine>,
}

/// The full report: day summaries in ascending day order plus global totals
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub days: Vec<DaySummary>,
    pub represented_total: f64,
    pub total: f64,
}

/// Summarizes sorted day buckets over an inclusive date window
pub struct RangeSummarizer;

impl RangeSummarizer {
    /// Buckets outside the window contribute nothing. `top_n` is assumed
    /// positive; the caller validates.
    pub fn summarize(buckets: &[DayBucket], window: &DateWindow, top_n: usize) -> Report {
        let mut report = Report::default();

        for bucket in buckets {
            if !window.contains(bucket.day) {
                continue;
            }

            let mut ranked = bucket.entries.clone();
            ranked.sort_by(|a, b| b.cost().total_cmp(&a.cost()));

            let mut day = DaySummary {
                day: bucket.day,
                represented_total: 0.0,
                total: 0.0,
                lines: Vec::new(),
            };

            for (index, entry) in ranked.iter().enumerate() {
                let cost = entry.cost();
                day.total += cost;
                report.total += cost;
                if index < top_n {
                    day.represented_total += cost;
                    report.represented_total += cost;
                    day.lines.push(ReportLine {
                        name: entry.name.clone(),
                        quantity: entry.quantity,
                        unit: entry.unit.clone(),
                        rate: entry.rate,
                        cost,
                    });
                }
            }

            report.days.push(day);
        }

        report
    }
}
