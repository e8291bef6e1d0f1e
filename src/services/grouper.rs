//! Date grouping service
//!
//! Folds priced records into per-day buckets, merging records that share a
//! (display name, rate, unit) triple into a single accumulated entry.
//! Grouping always runs over the entire fetched sequence; filtering to the
//! requested window happens later, at summarization.

use crate::types::{PricedRecord, UsageRecord};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// A merged line item: all records folded in share this exact
/// (name, rate, unit) triple. Cost is always derived, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub quantity: f64,
    pub rate: f64,
    pub unit: String,
}

impl Entry {
    pub fn cost(&self) -> f64 {
        self.quantity * self.rate
    }
}

/// One calendar day's entries, in insertion order
#[derive(Debug, Clone)]
pub struct DayBucket {
    pub day: NaiveDate,
    pub entries: Vec<Entry>,
}

/// Merge key: rate participates via exact bit equality, matching the strict
/// equality of the merge rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    name: String,
    rate_bits: u64,
    unit: String,
}

#[derive(Default)]
struct Bucket {
    entries: Vec<Entry>,
    by_key: HashMap<EntryKey, usize>,
}

/// Derive the display name for a usage record:
/// category, or "category - subCategory" when a sub-category is present;
/// Storage rows additionally carry the meter name.
pub fn display_name(record: &UsageRecord) -> String {
    let mut name = match &record.meter_sub_category {
        Some(sub) => format!("{} - {}", record.meter_category, sub),
        None => record.meter_category.clone(),
    };
    if record.meter_category == "Storage" {
        name.push_str(" - ");
        name.push_str(&record.meter_name);
    }
    name
}

/// Buckets priced records by UTC usage day
#[derive(Default)]
pub struct DateGrouper {
    buckets: BTreeMap<NaiveDate, Bucket>,
}

impl DateGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one priced record into its day bucket, created lazily on the
    /// first record for that day
    pub fn add(&mut self, priced: &PricedRecord) {
        let bucket = self.buckets.entry(priced.record.usage_day()).or_default();
        let key = EntryKey {
            name: display_name(&priced.record),
            rate_bits: priced.rate.to_bits(),
            unit: priced.record.unit.clone(),
        };

        match bucket.by_key.get(&key).copied() {
            Some(i) => bucket.entries[i].quantity += priced.record.quantity,
            None => {
                bucket.entries.push(Entry {
                    name: key.name.clone(),
                    quantity: priced.record.quantity,
                    rate: priced.rate,
                    unit: key.unit.clone(),
                });
                bucket.by_key.insert(key, bucket.entries.len() - 1);
            }
        }
    }

    /// Consume the grouper, yielding buckets in ascending day order
    pub fn into_buckets(self) -> Vec<DayBucket> {
        self.buckets
            .into_iter()
            .map(|(day, bucket)| DayBucket {
                day,
                entries: bucket.entries,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_priced(
        day: u32,
        category: &str,
        sub: Option<&str>,
        meter_name: &str,
        quantity: f64,
        rate: f64,
        unit: &str,
    ) -> PricedRecord {
        PricedRecord {
            record: UsageRecord {
                name: "usage-row".into(),
                meter_id: "m-1".into(),
                meter_category: category.to_string(),
                meter_sub_category: sub.map(String::from),
                meter_name: meter_name.to_string(),
                quantity,
                unit: unit.to_string(),
                usage_start: Utc.with_ymd_and_hms(2023, 5, day, 12, 0, 0).unwrap(),
            },
            rate,
            cost: quantity * rate,
        }
    }

    // ========== display_name() tests ==========

    #[test]
    fn test_display_name_category_only() {
        let priced = make_priced(1, "Compute", None, "D2 v3", 1.0, 2.0, "Hours");
        assert_eq!(display_name(&priced.record), "Compute");
    }

    #[test]
    fn test_display_name_with_sub_category() {
        let priced = make_priced(1, "Networking", Some("Gateway"), "VpnGw1", 1.0, 2.0, "Hours");
        assert_eq!(display_name(&priced.record), "Networking - Gateway");
    }

    #[test]
    fn test_display_name_storage_appends_meter_name() {
        let priced = make_priced(1, "Storage", Some("Tables"), "LRS Data Stored", 1.0, 2.0, "GB");
        assert_eq!(
            display_name(&priced.record),
            "Storage - Tables - LRS Data Stored"
        );
    }

    #[test]
    fn test_display_name_storage_without_sub_category() {
        let priced = make_priced(1, "Storage", None, "LRS Data Stored", 1.0, 2.0, "GB");
        assert_eq!(display_name(&priced.record), "Storage - LRS Data Stored");
    }

    // ========== merge tests ==========

    #[test]
    fn test_same_triple_merges_into_one_entry() {
        let mut grouper = DateGrouper::new();
        grouper.add(&make_priced(1, "Compute", None, "D2 v3", 3.0, 2.0, "Hours"));
        grouper.add(&make_priced(1, "Compute", None, "D2 v3", 4.0, 2.0, "Hours"));

        let buckets = grouper.into_buckets();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].entries.len(), 1);

        let entry = &buckets[0].entries[0];
        assert!((entry.quantity - 7.0).abs() < f64::EPSILON);
        assert!((entry.cost() - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_different_rate_does_not_merge() {
        let mut grouper = DateGrouper::new();
        grouper.add(&make_priced(1, "Compute", None, "D2 v3", 3.0, 2.0, "Hours"));
        grouper.add(&make_priced(1, "Compute", None, "D2 v3", 4.0, 2.5, "Hours"));

        let buckets = grouper.into_buckets();
        assert_eq!(buckets[0].entries.len(), 2);
    }

    #[test]
    fn test_different_unit_does_not_merge() {
        let mut grouper = DateGrouper::new();
        grouper.add(&make_priced(1, "Compute", None, "D2 v3", 3.0, 2.0, "Hours"));
        grouper.add(&make_priced(1, "Compute", None, "D2 v3", 4.0, 2.0, "GB"));

        let buckets = grouper.into_buckets();
        assert_eq!(buckets[0].entries.len(), 2);
    }

    #[test]
    fn test_different_day_creates_new_bucket() {
        let mut grouper = DateGrouper::new();
        grouper.add(&make_priced(1, "Compute", None, "D2 v3", 3.0, 2.0, "Hours"));
        grouper.add(&make_priced(2, "Compute", None, "D2 v3", 4.0, 2.0, "Hours"));

        let buckets = grouper.into_buckets();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].entries[0].quantity, 3.0);
        assert_eq!(buckets[1].entries[0].quantity, 4.0);
    }

    #[test]
    fn test_buckets_sorted_by_day_ascending() {
        let mut grouper = DateGrouper::new();
        grouper.add(&make_priced(20, "Compute", None, "D2 v3", 1.0, 2.0, "Hours"));
        grouper.add(&make_priced(1, "Compute", None, "D2 v3", 1.0, 2.0, "Hours"));
        grouper.add(&make_priced(10, "Compute", None, "D2 v3", 1.0, 2.0, "Hours"));

        let days: Vec<String> = grouper
            .into_buckets()
            .iter()
            .map(|b| b.day.to_string())
            .collect();
        assert_eq!(days, vec!["2023-05-01", "2023-05-10", "2023-05-20"]);
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut grouper = DateGrouper::new();
        grouper.add(&make_priced(1, "Compute", None, "D2 v3", 1.0, 2.0, "Hours"));
        grouper.add(&make_priced(1, "Bandwidth", None, "Egress", 5.0, 0.1, "GB"));
        grouper.add(&make_priced(1, "Compute", None, "D2 v3", 1.0, 2.0, "Hours"));

        let buckets = grouper.into_buckets();
        assert_eq!(buckets[0].entries[0].name, "Compute");
        assert_eq!(buckets[0].entries[1].name, "Bandwidth");
        assert!((buckets[0].entries[0].quantity - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merged_cost_equals_quantity_sum_times_rate() {
        let quantities = [0.25, 1.5, 3.0, 10.125];
        let mut grouper = DateGrouper::new();
        for q in quantities {
            grouper.add(&make_priced(1, "Compute", None, "D2 v3", q, 0.114, "Hours"));
        }

        let buckets = grouper.into_buckets();
        let entry = &buckets[0].entries[0];
        let quantity_sum: f64 = quantities.iter().sum();
        assert!((entry.quantity - quantity_sum).abs() < 1e-12);
        assert!((entry.cost() - quantity_sum * 0.114).abs() < 1e-12);
    }

    #[test]
    fn test_empty_grouper_yields_no_buckets() {
        assert!(DateGrouper::new().into_buckets().is_empty());
    }
}
