use async_trait::async_trait;

use ryde_core::{Coordinates, DistanceError, DistanceProvider, DistanceResult};

const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Great-circle distance between two coordinates, in miles.
pub fn haversine_miles(origin: Coordinates, destination: Coordinates) -> f64 {
    let lat1 = origin.lat.to_radians();
    let lat2 = destination.lat.to_radians();
    let delta_lat = (destination.lat - origin.lat).to_radians();
    let delta_lng = (destination.lng - origin.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Offline distance provider.
///
/// Scales the great-circle distance by a road-winding factor and estimates
/// duration at 1.2 minutes per mile, the same heuristic the vehicle list
/// shows when the routing service returns no duration. A stand-in for the
/// routing service in development and tests, not a substitute for real
/// road distances.
#[derive(Debug, Clone, Copy)]
pub struct HaversineEstimator {
    road_factor: f64,
}

impl HaversineEstimator {
    pub fn new(road_factor: f64) -> Self {
        Self { road_factor }
    }
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self { road_factor: 1.25 }
    }
}

#[async_trait]
impl DistanceProvider for HaversineEstimator {
    async fn driving_distance(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<DistanceResult, DistanceError> {
        let miles = haversine_miles(origin, destination) * self.road_factor;
        if !miles.is_finite() {
            return Err(DistanceError::InvalidResponse(
                "non-finite coordinates".to_string(),
            ));
        }
        Ok(DistanceResult {
            miles,
            minutes: (miles * 1.2).ceil() as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: Coordinates = Coordinates {
        lat: 51.5074,
        lng: -0.1278,
    };
    const MANCHESTER: Coordinates = Coordinates {
        lat: 53.4808,
        lng: -2.2426,
    };

    #[test]
    fn test_london_to_manchester() {
        let miles = haversine_miles(LONDON, MANCHESTER);
        // Great-circle distance is roughly 163 miles.
        assert!(miles > 155.0 && miles < 170.0, "got {miles}");
    }

    #[test]
    fn test_zero_distance_to_self() {
        let miles = haversine_miles(LONDON, LONDON);
        assert!(miles.abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_estimator_applies_road_factor() {
        let flat = HaversineEstimator::new(1.0)
            .driving_distance(LONDON, MANCHESTER)
            .await
            .unwrap();
        let winding = HaversineEstimator::new(1.25)
            .driving_distance(LONDON, MANCHESTER)
            .await
            .unwrap();
        assert!((winding.miles - flat.miles * 1.25).abs() < 1e-9);
        assert_eq!(winding.minutes, (winding.miles * 1.2).ceil() as u32);
    }
}
