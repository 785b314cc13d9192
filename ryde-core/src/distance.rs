use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::location::Coordinates;

/// Road distance and duration for a single leg.
///
/// A later recomputation for the same leg supersedes this value wholesale;
/// results are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    pub miles: f64,
    pub minutes: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum DistanceError {
    #[error("routing service request failed: {0}")]
    Transport(String),

    #[error("no route found between the given locations")]
    NoRoute,

    #[error("routing service returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Driving-distance lookup between two coordinates.
///
/// Implementations call out to a routing service; callers treat the whole
/// thing as an opaque success/failure outcome.
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    async fn driving_distance(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<DistanceResult, DistanceError>;
}
