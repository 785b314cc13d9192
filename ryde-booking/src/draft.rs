use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ryde_core::{Coordinates, DistanceResult, Location};
use ryde_fare::PriceQuote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripType {
    #[serde(rename = "oneway")]
    OneWay,
    #[serde(rename = "round")]
    RoundTrip,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::OneWay => "oneway",
            TripType::RoundTrip => "round",
        }
    }
}

/// One leg of the journey as it is being captured.
///
/// Endpoints are replaced wholesale when re-selected; the distance result
/// is superseded, never merged, by any later recomputation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegDraft {
    pub pickup: Option<Location>,
    pub dropoff: Option<Location>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub distance: Option<DistanceResult>,
}

impl LegDraft {
    pub fn locations_set(&self) -> bool {
        self.pickup.is_some() && self.dropoff.is_some()
    }

    /// All inputs pricing needs from this leg.
    pub fn is_complete(&self) -> bool {
        self.locations_set() && self.scheduled_at.is_some()
    }

    pub fn route(&self) -> Option<(Coordinates, Coordinates)> {
        match (&self.pickup, &self.dropoff) {
            (Some(pickup), Some(dropoff)) => {
                Some((pickup.coordinates(), dropoff.coordinates()))
            }
            _ => None,
        }
    }
}

/// Flat-rate child seat add-on, independent of distance pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildSeatAddOn {
    pub required: bool,
    pub count: u32,
}

impl Default for ChildSeatAddOn {
    fn default() -> Self {
        Self {
            required: false,
            count: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassengerDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl PassengerDetails {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.phone.trim().is_empty()
            && !self.email.trim().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.phone.is_empty() && self.email.is_empty()
    }
}

/// Flight/train reference and arrival (or departure) time, used to monitor
/// delays and time the pickup. "N/A" when no flight is involved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightDetails {
    pub flight_number: String,
    pub arrival_time: String,
}

/// The in-progress booking, owned exclusively by the workflow until it is
/// handed to the submission gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub id: Uuid,
    pub trip_type: TripType,
    pub outbound: LegDraft,
    /// Present iff the trip type is round-trip.
    pub return_leg: Option<LegDraft>,
    pub passenger: PassengerDetails,
    pub flight: FlightDetails,
    pub child_seats: ChildSeatAddOn,
    pub special_requests: String,
    pub selected_vehicle: Option<String>,
    pub quote: Option<PriceQuote>,
    /// User-facing message when the last distance lookup failed.
    pub pricing_error: Option<String>,
}

impl BookingDraft {
    pub fn new(trip_type: TripType) -> Self {
        let return_leg = match trip_type {
            TripType::OneWay => None,
            TripType::RoundTrip => Some(LegDraft::default()),
        };
        Self {
            id: Uuid::new_v4(),
            trip_type,
            outbound: LegDraft::default(),
            return_leg,
            passenger: PassengerDetails::default(),
            flight: FlightDetails::default(),
            child_seats: ChildSeatAddOn::default(),
            special_requests: String::new(),
            selected_vehicle: None,
            quote: None,
            pricing_error: None,
        }
    }

    pub fn is_round_trip(&self) -> bool {
        self.trip_type == TripType::RoundTrip
    }

    /// Whether every leg the trip type requires has endpoints and a
    /// schedule, i.e. pricing may fire.
    pub fn pricing_inputs_complete(&self) -> bool {
        if !self.outbound.is_complete() {
            return false;
        }
        match (&self.trip_type, &self.return_leg) {
            (TripType::OneWay, _) => true,
            (TripType::RoundTrip, Some(leg)) => leg.is_complete(),
            (TripType::RoundTrip, None) => false,
        }
    }

    /// Combined miles across all priced legs, once every leg has a
    /// distance result.
    pub fn total_distance_miles(&self) -> Option<f64> {
        let outbound = self.outbound.distance?.miles;
        match (&self.trip_type, &self.return_leg) {
            (TripType::OneWay, _) => Some(outbound),
            (TripType::RoundTrip, Some(leg)) => Some(outbound + leg.distance?.miles),
            (TripType::RoundTrip, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(address: &str) -> Location {
        Location::new(address, 51.5, -0.1)
    }

    #[test]
    fn test_one_way_pricing_inputs() {
        let mut draft = BookingDraft::new(TripType::OneWay);
        assert!(!draft.pricing_inputs_complete());

        draft.outbound.pickup = Some(location("A, SW1A 1AA"));
        draft.outbound.dropoff = Some(location("B, M1 1AE"));
        assert!(!draft.pricing_inputs_complete());

        draft.outbound.scheduled_at = Some(Utc::now());
        assert!(draft.pricing_inputs_complete());
    }

    #[test]
    fn test_round_trip_waits_for_return_leg() {
        let mut draft = BookingDraft::new(TripType::RoundTrip);
        draft.outbound.pickup = Some(location("A"));
        draft.outbound.dropoff = Some(location("B"));
        draft.outbound.scheduled_at = Some(Utc::now());
        assert!(!draft.pricing_inputs_complete());

        let leg = draft.return_leg.as_mut().unwrap();
        leg.pickup = Some(location("B"));
        leg.dropoff = Some(location("A"));
        leg.scheduled_at = Some(Utc::now());
        assert!(draft.pricing_inputs_complete());
    }

    #[test]
    fn test_total_distance_sums_legs() {
        let mut draft = BookingDraft::new(TripType::RoundTrip);
        draft.outbound.distance = Some(DistanceResult {
            miles: 12.5,
            minutes: 20,
        });
        assert_eq!(draft.total_distance_miles(), None);

        draft.return_leg.as_mut().unwrap().distance = Some(DistanceResult {
            miles: 7.5,
            minutes: 14,
        });
        assert_eq!(draft.total_distance_miles(), Some(20.0));
    }
}
