//! Pipeline composition
//!
//! `build` is the pure core of azcost: a deterministic function of
//! (rate card, usage sequence, window, top-N). No I/O, no environment.

use crate::services::pricer::Diagnostic;
use crate::services::summarizer::Report;
use crate::services::{DateGrouper, RangeSummarizer, RateIndex, UsagePricer};
use crate::types::{DateWindow, RateCard, UsageRecord};

/// The computed report plus any per-record pricing diagnostics
#[derive(Debug)]
pub struct CostReport {
    pub report: Report,
    pub diagnostics: Vec<Diagnostic>,
}

/// Price, group, and summarize a usage sequence.
///
/// Grouping folds every priceable record regardless of the window; the
/// window filter applies only at summarization, so a day's entries are
/// always complete before it is totaled.
pub fn build(
    rate_card: &RateCard,
    usage: &[UsageRecord],
    window: &DateWindow,
    top_n: usize,
) -> CostReport {
    let index = RateIndex::from_rate_card(rate_card);
    let priced = UsagePricer::new(&index).price_all(usage);

    let mut grouper = DateGrouper::new();
    for record in &priced.priced {
        grouper.add(record);
    }

    let report = RangeSummarizer::summarize(&grouper.into_buckets(), window, top_n);

    CostReport {
        report,
        diagnostics: priced.diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::renderer;
    use crate::types::MeterRecord;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::collections::BTreeMap;

    fn make_card(meters: &[(&str, &str, f64)]) -> RateCard {
        RateCard {
            meters: meters
                .iter()
                .map(|(id, unit, rate)| MeterRecord {
                    meter_id: id.to_string(),
                    meter_name: format!("{} name", id),
                    unit: unit.to_string(),
                    meter_rates: BTreeMap::from([("0".to_string(), *rate)]),
                })
                .collect(),
        }
    }

    fn make_record(meter_id: &str, category: &str, quantity: f64, unit: &str, day: u32) -> UsageRecord {
        UsageRecord {
            name: "usage-row".into(),
            meter_id: meter_id.to_string(),
            meter_category: category.to_string(),
            meter_sub_category: None,
            meter_name: "meter".to_string(),
            quantity,
            unit: unit.to_string(),
            usage_start: Utc.with_ymd_and_hms(2023, 5, day, 6, 0, 0).unwrap(),
        }
    }

    fn may_first() -> DateWindow {
        let day = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        DateWindow::new(day, day)
    }

    #[test]
    fn test_end_to_end_single_meter() {
        // One meter, two records merging into a single entry of quantity 7
        let card = make_card(&[("M1", "Hours", 2.0)]);
        let usage = vec![
            make_record("M1", "Compute", 3.0, "Hours", 1),
            make_record("M1", "Compute", 4.0, "Hours", 1),
        ];

        let result = build(&card, &usage, &may_first(), 5);

        assert!(result.diagnostics.is_empty());
        assert_eq!(result.report.days.len(), 1);

        let day = &result.report.days[0];
        assert_eq!(day.lines.len(), 1);
        assert!((day.lines[0].quantity - 7.0).abs() < f64::EPSILON);
        assert!((day.lines[0].cost - 14.0).abs() < f64::EPSILON);
        assert!((day.total - 14.0).abs() < f64::EPSILON);
        assert!((day.represented_total - 14.0).abs() < f64::EPSILON);
        assert!((result.report.total - 14.0).abs() < f64::EPSILON);
        assert!((result.report.represented_total - 14.0).abs() < f64::EPSILON);

        let lines = renderer::render(&result.report);
        assert_eq!(lines[1], "  Compute, 7 Hours @ $2 = $14.00");
    }

    #[test]
    fn test_unmatched_meter_adds_diagnostic_not_cost() {
        let card = make_card(&[("M1", "Hours", 2.0)]);
        let usage = vec![
            make_record("M1", "Compute", 3.0, "Hours", 1),
            make_record("M1", "Compute", 4.0, "Hours", 1),
            make_record("M2", "Compute", 100.0, "Hours", 1),
        ];

        let result = build(&card, &usage, &may_first(), 5);

        assert_eq!(result.diagnostics.len(), 1);
        assert!((result.report.total - 14.0).abs() < f64::EPSILON);
        assert!((result.report.represented_total - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_usage_yields_empty_report() {
        let card = make_card(&[("M1", "Hours", 2.0)]);

        let result = build(&card, &[], &may_first(), 5);

        assert!(result.diagnostics.is_empty());
        assert!(result.report.days.is_empty());
        assert!((result.report.total - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grouping_spans_beyond_window() {
        // Out-of-window usage is grouped but contributes nothing to totals
        let card = make_card(&[("M1", "Hours", 2.0)]);
        let usage = vec![
            make_record("M1", "Compute", 3.0, "Hours", 1),
            make_record("M1", "Compute", 50.0, "Hours", 2),
        ];

        let result = build(&card, &usage, &may_first(), 5);

        assert_eq!(result.report.days.len(), 1);
        assert!((result.report.total - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let card = make_card(&[("M1", "Hours", 2.0), ("M2", "GB", 0.05)]);
        let usage = vec![
            make_record("M1", "Compute", 3.0, "Hours", 1),
            make_record("M2", "Bandwidth", 120.0, "GB", 1),
            make_record("M1", "Compute", 4.0, "Hours", 2),
            make_record("M3", "Other", 1.0, "Units", 1),
        ];
        let window = DateWindow::new(
            NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 5, 2).unwrap(),
        );

        let first = build(&card, &usage, &window, 1);
        let second = build(&card, &usage, &window, 1);

        assert_eq!(first.report, second.report);
        assert_eq!(first.diagnostics, second.diagnostics);
    }
}
