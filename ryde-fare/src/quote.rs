use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The full set of computed prices for the current trip inputs, one per
/// vehicle class.
///
/// Always replaced wholesale when any pricing input changes; never patched
/// entry by entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Vehicle class id → price in pounds.
    pub prices: HashMap<String, f64>,
    /// Combined distance the quote was computed over (outbound + return
    /// when round-trip).
    pub distance_miles: f64,
    pub zone_surcharge_applied: bool,
    pub double_fare_applied: bool,
}

impl PriceQuote {
    pub fn price_for(&self, vehicle_id: &str) -> Option<f64> {
        self.prices.get(vehicle_id).copied()
    }
}
