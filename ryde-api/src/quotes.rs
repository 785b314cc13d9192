use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ryde_booking::{BookingWorkflow, PricingOutcome, TripType, WorkflowRules};
use ryde_catalog::VehicleClass;
use ryde_core::{DistanceResult, Location};
use ryde_fare::PriceQuote;

use crate::error::{workflow_error, AppError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/vehicles", get(list_vehicles))
        .route("/v1/quotes", post(create_quote))
}

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub postcode: Option<String>,
}

impl LocationRequest {
    pub fn to_location(&self) -> Location {
        match self.postcode.as_deref() {
            Some(postcode) if !postcode.trim().is_empty() => {
                Location::with_postcode(&self.address, self.lat, self.lng, postcode.trim())
            }
            _ => Location::new(&self.address, self.lat, self.lng),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LegRequest {
    pub pickup: LocationRequest,
    pub dropoff: LocationRequest,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub trip_type: TripType,
    pub outbound: LegRequest,
    #[serde(rename = "return")]
    pub return_leg: Option<LegRequest>,
}

#[derive(Debug, Serialize)]
struct QuoteResponse {
    quote: PriceQuote,
    outbound_distance: Option<DistanceResult>,
    return_distance: Option<DistanceResult>,
}

/// Build a workflow seeded with the journey details of a request, leaving
/// pricing to the caller.
pub(crate) fn journey_workflow(
    state: &AppState,
    trip_type: TripType,
    outbound: &LegRequest,
    return_leg: Option<&LegRequest>,
) -> Result<BookingWorkflow, AppError> {
    let rules = WorkflowRules {
        min_lead_hours: state.rules.min_lead_hours,
        child_seat_fee: state.rules.child_seat_fee,
        surge_multiplier: state.rules.surge_multiplier,
    };

    let mut workflow = BookingWorkflow::with_rules(trip_type, rules);
    workflow
        .set_outbound_pickup(outbound.pickup.to_location())
        .map_err(workflow_error)?;
    workflow
        .set_outbound_dropoff(outbound.dropoff.to_location())
        .map_err(workflow_error)?;
    workflow
        .set_outbound_schedule(outbound.scheduled_at)
        .map_err(workflow_error)?;

    if let Some(leg) = return_leg {
        workflow
            .set_return_pickup(leg.pickup.to_location())
            .map_err(workflow_error)?;
        workflow
            .set_return_dropoff(leg.dropoff.to_location())
            .map_err(workflow_error)?;
        workflow
            .set_return_schedule(leg.scheduled_at)
            .map_err(workflow_error)?;
    }

    Ok(workflow)
}

async fn create_quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let mut workflow =
        journey_workflow(&state, req.trip_type, &req.outbound, req.return_leg.as_ref())?;

    let outcome = workflow
        .refresh_pricing(state.distance.as_ref())
        .await
        .map_err(workflow_error)?;

    if outcome != PricingOutcome::Updated {
        return Err(AppError::ValidationError(
            "please complete the journey details".to_string(),
        ));
    }

    let draft = workflow.draft();
    let quote = draft
        .quote
        .clone()
        .ok_or_else(|| AppError::InternalServerError("quote missing after pricing".to_string()))?;

    Ok(Json(QuoteResponse {
        quote,
        outbound_distance: draft.outbound.distance,
        return_distance: draft.return_leg.as_ref().and_then(|leg| leg.distance),
    }))
}

async fn list_vehicles() -> Json<&'static [VehicleClass]> {
    Json(ryde_catalog::catalog())
}
