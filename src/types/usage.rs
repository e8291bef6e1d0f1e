//! Usage types for cost reporting

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One raw usage aggregate row, flattened from the Commerce API shape.
/// Immutable input; pricing produces a [`PricedRecord`] copy rather than
/// mutating in place, so a sequence can be re-priced against another card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageRecord {
    /// Provider row name; daily aggregate rows are marked by a name prefix
    pub name: String,
    pub meter_id: String,
    pub meter_category: String,
    /// None when the provider sent no sub-category (or an empty one)
    pub meter_sub_category: Option<String>,
    pub meter_name: String,
    pub quantity: f64,
    pub unit: String,
    pub usage_start: DateTime<Utc>,
}

impl UsageRecord {
    /// UTC calendar day this usage started on; the grouping key
    pub fn usage_day(&self) -> NaiveDate {
        self.usage_start.date_naive()
    }
}

/// A usage record with its matched rate and computed cost attached
#[derive(Debug, Clone, PartialEq)]
pub struct PricedRecord {
    pub record: UsageRecord,
    pub rate: f64,
    pub cost: f64,
}

/// Inclusive [from, to] window of UTC calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Both bounds are inclusive
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }
}
