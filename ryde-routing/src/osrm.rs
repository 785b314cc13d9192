use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use ryde_core::{Coordinates, DistanceError, DistanceProvider, DistanceResult};

const MILES_PER_METER: f64 = 0.000621371;

/// Thin HTTP client for the OSRM route service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    client: Client,
    endpoint: String,
}

impl OsrmClient {
    /// Create a client for the given OSRM endpoint (e.g.
    /// `https://router.project-osrm.org`).
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, DistanceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|err| DistanceError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn route_url(&self, origin: Coordinates, destination: Coordinates) -> Result<Url, DistanceError> {
        // OSRM coordinate order is lng,lat.
        let path = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.endpoint, origin.lng, origin.lat, destination.lng, destination.lat
        );
        let mut url = Url::parse(&path)
            .map_err(|err| DistanceError::Transport(format!("failed to build OSRM URL: {err}")))?;
        url.query_pairs_mut().append_pair("overview", "false");
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}

fn decode(response: OsrmRouteResponse) -> Result<DistanceResult, DistanceError> {
    if response.code != "Ok" {
        return Err(DistanceError::NoRoute);
    }
    let route = response.routes.first().ok_or(DistanceError::NoRoute)?;

    if !route.distance.is_finite() || route.distance < 0.0 {
        return Err(DistanceError::InvalidResponse(format!(
            "bad distance {}",
            route.distance
        )));
    }

    Ok(DistanceResult {
        miles: route.distance * MILES_PER_METER,
        minutes: (route.duration / 60.0).ceil() as u32,
    })
}

#[async_trait]
impl DistanceProvider for OsrmClient {
    async fn driving_distance(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<DistanceResult, DistanceError> {
        let url = self.route_url(origin, destination)?;
        debug!(%url, "requesting OSRM route");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| DistanceError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(DistanceError::Transport(format!(
                "OSRM returned HTTP {}",
                response.status()
            )));
        }

        let parsed: OsrmRouteResponse = response
            .json()
            .await
            .map_err(|err| DistanceError::InvalidResponse(err.to_string()))?;

        decode(parsed)
    }
}
