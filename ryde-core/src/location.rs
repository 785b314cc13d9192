use serde::{Deserialize, Serialize};

use crate::postcode::extract_postcode;

/// A lat/lng pair as handed to the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A captured pickup or dropoff point.
///
/// Immutable once captured; re-selecting a location replaces the whole
/// value rather than patching fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Postcode derived from the address text; may be empty when the
    /// address carries none.
    pub postcode: String,
}

impl Location {
    /// Build a location from an address and coordinates, deriving the
    /// postcode from the address text.
    pub fn new(address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        let address = address.into();
        let postcode = extract_postcode(&address);
        Self {
            address,
            latitude,
            longitude,
            postcode,
        }
    }

    /// Build a location with a structured postcode already known.
    pub fn with_postcode(
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
        postcode: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            latitude,
            longitude,
            postcode: postcode.into(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.latitude,
            lng: self.longitude,
        }
    }
}
