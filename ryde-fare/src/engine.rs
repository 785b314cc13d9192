use std::collections::HashMap;

use chrono::NaiveDate;

use crate::quote::PriceQuote;
use crate::tariff::{distance_price, is_double_fare_date, ZONE_CHARGE};
use crate::zone::is_surcharge_zone;

/// Pricing inputs shared by every vehicle class.
#[derive(Debug, Clone, PartialEq)]
pub struct FareRequest {
    /// Combined distance: outbound + return miles when round-trip.
    pub distance_miles: f64,
    pub pickup_postcode: String,
    pub dropoff_postcode: String,
    pub booking_date: Option<NaiveDate>,
    /// Pass-through demand scaling factor; 1.0 unless surge pricing is in
    /// effect.
    pub surge_multiplier: f64,
    pub round_trip: bool,
}

impl FareRequest {
    fn zone_surcharge(&self) -> bool {
        is_surcharge_zone(&self.pickup_postcode) || is_surcharge_zone(&self.dropoff_postcode)
    }

    fn double_fare(&self) -> bool {
        self.booking_date.map(is_double_fare_date).unwrap_or(false)
    }
}

// Non-finite multipliers degrade to a zero contribution so the engine
// stays total over its whole input domain.
fn sanitize(multiplier: f64) -> f64 {
    if multiplier.is_finite() {
        multiplier
    } else {
        0.0
    }
}

/// Price a single vehicle class.
///
/// Applies, in order: tiered distance pricing, the vehicle multiplier, the
/// flat zone surcharge (once, however many endpoints match), the surge
/// multiplier, special-date doubling, and the 1.9 round-trip multiplier
/// (the return leg priced at 90% of a second one-way, over the combined
/// distance). The result is clamped to be non-negative.
pub fn compute_fare(request: &FareRequest, vehicle_multiplier: f64) -> f64 {
    let mut amount = distance_price(request.distance_miles);

    amount *= sanitize(vehicle_multiplier);

    if request.zone_surcharge() {
        amount += ZONE_CHARGE;
    }

    amount *= sanitize(request.surge_multiplier);

    if request.double_fare() {
        amount *= 2.0;
    }

    if request.round_trip {
        amount *= 1.9;
    }

    amount.max(0.0)
}

/// Price every vehicle class in the catalog.
///
/// The only entry point the booking workflow calls: returns an amount for
/// every catalog entry and is deterministic in its inputs.
pub fn compute_all_fares(request: &FareRequest) -> PriceQuote {
    let mut prices = HashMap::new();
    for vehicle in ryde_catalog::catalog() {
        prices.insert(
            vehicle.id.to_string(),
            compute_fare(request, vehicle.fare_multiplier),
        );
    }

    PriceQuote {
        prices,
        distance_miles: request.distance_miles,
        zone_surcharge_applied: request.zone_surcharge(),
        double_fare_applied: request.double_fare(),
    }
}
