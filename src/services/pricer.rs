//! Usage pricing service
//!
//! Attaches a rate and computed cost to each raw usage record. Records that
//! cannot be priced are excluded from aggregation: unit mismatches and
//! unmatched meters produce one diagnostic each, provider-emitted daily
//! aggregate rows are dropped silently.

use crate::services::RateIndex;
use crate::types::{PricedRecord, UsageRecord};
use std::fmt;

/// Name prefix of provider-emitted daily aggregate rows; these are summary
/// rows, not billable meters
pub const AGGREGATE_PREFIX: &str = "Daily_BRSDT_";

/// Non-fatal per-record condition reported to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Meter found but the rate card unit disagrees with the usage unit
    UnitMismatch {
        category: String,
        sub_category: Option<String>,
        meter_id: String,
        meter_unit: String,
        usage_unit: String,
    },
    /// No meter in the rate card matches the record
    Unrated {
        category: String,
        sub_category: Option<String>,
        meter_id: String,
    },
}

fn category_label(category: &str, sub_category: &Option<String>) -> String {
    match sub_category {
        Some(sub) => format!("{} - {}", category, sub),
        None => category.to_string(),
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnitMismatch {
                category,
                sub_category,
                meter_id,
                meter_unit,
                usage_unit,
            } => write!(
                f,
                "Unit mismatch for {} (meter {}): rate card is in {} vs. usage in {}.",
                category_label(category, sub_category),
                meter_id,
                meter_unit,
                usage_unit
            ),
            Diagnostic::Unrated {
                category,
                sub_category,
                meter_id,
            } => write!(
                f,
                "No rate found for {} (meter {}).",
                category_label(category, sub_category),
                meter_id
            ),
        }
    }
}

/// Outcome of pricing a single record
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Priced(PricedRecord),
    UnitMismatch(Diagnostic),
    /// Daily aggregate row: expected, excluded without a diagnostic
    AggregateIgnored,
    Unrated(Diagnostic),
}

/// Priced records plus the diagnostics raised along the way
#[derive(Debug, Default)]
pub struct PricedUsage {
    pub priced: Vec<PricedRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Prices usage records against a [`RateIndex`]
pub struct UsagePricer<'a> {
    index: &'a RateIndex,
}

impl<'a> UsagePricer<'a> {
    pub fn new(index: &'a RateIndex) -> Self {
        Self { index }
    }

    /// Price one record. Never fails; unpriceable records report their
    /// condition through the outcome.
    pub fn price(&self, record: &UsageRecord) -> Outcome {
        match self.index.lookup(&record.meter_id) {
            Some(meter) if meter.unit == record.unit => Outcome::Priced(PricedRecord {
                record: record.clone(),
                rate: meter.price,
                cost: record.quantity * meter.price,
            }),
            Some(meter) => Outcome::UnitMismatch(Diagnostic::UnitMismatch {
                category: record.meter_category.clone(),
                sub_category: record.meter_sub_category.clone(),
                meter_id: record.meter_id.clone(),
                meter_unit: meter.unit.clone(),
                usage_unit: record.unit.clone(),
            }),
            None if record.name.starts_with(AGGREGATE_PREFIX) => Outcome::AggregateIgnored,
            None => Outcome::Unrated(Diagnostic::Unrated {
                category: record.meter_category.clone(),
                sub_category: record.meter_sub_category.clone(),
                meter_id: record.meter_id.clone(),
            }),
        }
    }

    /// Price a whole usage sequence; processing continues past unpriceable
    /// records. An empty sequence yields an empty result.
    pub fn price_all(&self, records: &[UsageRecord]) -> PricedUsage {
        let mut result = PricedUsage::default();
        for record in records {
            match self.price(record) {
                Outcome::Priced(priced) => result.priced.push(priced),
                Outcome::UnitMismatch(diag) | Outcome::Unrated(diag) => {
                    result.diagnostics.push(diag)
                }
                Outcome::AggregateIgnored => {}
            }
        }
        result
    }
}
