use chrono::{Datelike, NaiveDate};

/// One distance band of the tariff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TariffBand {
    pub min_miles: f64,
    /// `None` marks the open-ended final band.
    pub max_miles: Option<f64>,
    /// Per-mile rate in pounds.
    pub rate: f64,
}

/// Ascending distance bands. Bands are priced as contiguous intervals: a
/// band contributes at most `max − previously assigned` miles, so no mile
/// is ever counted twice and no mile falls in a gap.
const TARIFF_BANDS: [TariffBand; 5] = [
    TariffBand {
        min_miles: 0.0,
        max_miles: Some(1.0),
        rate: 6.00,
    },
    TariffBand {
        min_miles: 2.0,
        max_miles: Some(20.0),
        rate: 3.00,
    },
    TariffBand {
        min_miles: 21.0,
        max_miles: Some(40.0),
        rate: 2.50,
    },
    TariffBand {
        min_miles: 41.0,
        max_miles: Some(72.0),
        rate: 2.25,
    },
    TariffBand {
        min_miles: 73.0,
        max_miles: None,
        rate: 2.00,
    },
];

/// Flat charge added when either endpoint sits in the surcharge zone.
pub const ZONE_CHARGE: f64 = 12.00;

/// Flat per-seat charge for a child seat, independent of distance.
pub const CHILD_SEAT_FEE: f64 = 10.00;

/// (month, day) pairs on which the fare doubles, any year.
const DOUBLE_FARE_DATES: [(u32, u32); 4] = [(12, 25), (12, 26), (12, 31), (1, 1)];

/// Price a distance across the tariff bands.
///
/// Zero, negative, or non-finite distances price at 0; the function never
/// fails.
pub fn distance_price(miles: f64) -> f64 {
    if !miles.is_finite() || miles <= 0.0 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut assigned = 0.0;

    for band in &TARIFF_BANDS {
        let remaining = miles - assigned;
        if remaining <= 0.0 {
            break;
        }
        let take = match band.max_miles {
            Some(upper) => remaining.min(upper - assigned),
            None => remaining,
        };
        if take > 0.0 {
            total += take * band.rate;
            assigned += take;
        }
    }

    total
}

/// Whether the fare doubles on this calendar date.
pub fn is_double_fare_date(date: NaiveDate) -> bool {
    DOUBLE_FARE_DATES
        .iter()
        .any(|&(month, day)| date.month() == month && date.day() == day)
}
