//! Meter lookup index built from a rate card
//!
//! Built once per run; lookup is exact meter-id equality. Meters without a
//! base-tier rate are not indexed, so their usage rows surface as unrated
//! diagnostics instead of disappearing silently.

use crate::types::{Meter, RateCard};
use std::collections::HashMap;

/// Immutable meter-id → [`Meter`] lookup
pub struct RateIndex {
    meters: HashMap<String, Meter>,
}

impl RateIndex {
    /// Build the index from a rate card, taking each meter's base-tier rate
    pub fn from_rate_card(card: &RateCard) -> Self {
        let mut meters = HashMap::with_capacity(card.meters.len());
        for record in &card.meters {
            if let Some(price) = record.base_rate() {
                meters.insert(
                    record.meter_id.clone(),
                    Meter {
                        id: record.meter_id.clone(),
                        name: record.meter_name.clone(),
                        unit: record.unit.clone(),
                        price,
                    },
                );
            }
        }
        Self { meters }
    }

    pub fn lookup(&self, meter_id: &str) -> Option<&Meter> {
        self.meters.get(meter_id)
    }

    /// Number of indexed meters
    pub fn len(&self) -> usize {
        self.meters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meters.is_empty()
    }
}
