//! Rate card types
//!
//! Mirrors the Azure Commerce RateCard document: a `Meters` collection where
//! each meter carries tiered rates keyed by quantity threshold ("0" is the
//! base tier, the only one used for pricing).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rate card document as returned by the Commerce RateCard API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCard {
    #[serde(rename = "Meters")]
    pub meters: Vec<MeterRecord>,
}

/// One meter as it appears in the rate card document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeterRecord {
    #[serde(rename = "MeterId")]
    pub meter_id: String,
    #[serde(rename = "MeterName", default)]
    pub meter_name: String,
    #[serde(rename = "Unit", default)]
    pub unit: String,
    /// Tiered rates keyed by quantity threshold; "0" is the base tier
    #[serde(rename = "MeterRates", default)]
    pub meter_rates: BTreeMap<String, f64>,
}

impl MeterRecord {
    /// Base (zeroth-tier) rate, if the meter has one
    pub fn base_rate(&self) -> Option<f64> {
        self.meter_rates.get("0").copied()
    }
}

/// A meter ready for pricing: identifier, billing unit, and base price.
/// Immutable once loaded into the rate index.
#[derive(Debug, Clone, PartialEq)]
pub struct Meter {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub price: f64,
}
