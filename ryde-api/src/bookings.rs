use axum::{
    extract::{Json, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use ryde_booking::{PassengerDetails, TripType};
use ryde_core::{BookingRecord, BookingStatus, RepositoryError};

use crate::error::{workflow_error, AppError};
use crate::quotes::{journey_workflow, LegRequest};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/track", get(track_booking))
}

#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    trip_type: TripType,
    outbound: LegRequest,
    #[serde(rename = "return")]
    return_leg: Option<LegRequest>,
    vehicle_id: String,
    passenger: PassengerRequest,
    flight_number: String,
    arrival_time: String,
    #[serde(default)]
    child_seats: bool,
    child_seats_count: Option<u32>,
    special_requests: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PassengerRequest {
    name: String,
    phone: String,
    email: String,
}

#[derive(Debug, Serialize)]
struct CreateBookingResponse {
    booking_id: Uuid,
    status: BookingStatus,
    base_price: f64,
    child_seats_price: f64,
    total_price: f64,
}

/// Create a booking. Distances and prices are recomputed here from the
/// journey details; the caller's own arithmetic is never trusted.
async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    let mut workflow =
        journey_workflow(&state, req.trip_type, &req.outbound, req.return_leg.as_ref())?;

    let outcome = workflow
        .refresh_pricing(state.distance.as_ref())
        .await
        .map_err(workflow_error)?;
    if outcome != ryde_booking::PricingOutcome::Updated {
        return Err(AppError::ValidationError(
            "please complete the journey details".to_string(),
        ));
    }

    workflow
        .select_vehicle(&req.vehicle_id)
        .map_err(workflow_error)?;
    workflow
        .set_passenger(PassengerDetails {
            name: req.passenger.name,
            phone: req.passenger.phone,
            email: req.passenger.email,
        })
        .map_err(workflow_error)?;
    workflow
        .set_flight_details(req.flight_number, req.arrival_time)
        .map_err(workflow_error)?;
    workflow
        .set_child_seats(req.child_seats, req.child_seats_count.unwrap_or(1))
        .map_err(workflow_error)?;
    if let Some(text) = req.special_requests {
        workflow.set_special_requests(text).map_err(workflow_error)?;
    }

    let base_price = workflow.base_price().map_err(workflow_error)?;
    let child_seats_price = workflow.child_seats_price();
    let total_price = workflow.total_price().map_err(workflow_error)?;

    let receipt = workflow
        .submit(state.bookings.as_ref())
        .await
        .map_err(workflow_error)?;

    info!(booking_id = %receipt.booking_id, "booking created");

    Ok(Json(CreateBookingResponse {
        booking_id: receipt.booking_id,
        status: receipt.status,
        base_price,
        child_seats_price,
        total_price,
    }))
}

#[derive(Debug, Deserialize)]
struct TrackQuery {
    booking_id: Uuid,
    passenger_name: String,
}

#[derive(Debug, Serialize)]
struct TrackResponse {
    booking: BookingRecord,
}

/// Look up a booking by identifier and passenger name. Purely a read
/// path; no pricing is involved.
async fn track_booking(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> Result<Json<TrackResponse>, AppError> {
    let booking = state
        .bookings
        .find_by_reference(query.booking_id, &query.passenger_name)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => AppError::NotFoundError(
                "Booking not found. Please check your details.".to_string(),
            ),
            other => AppError::InternalServerError(other.to_string()),
        })?;

    Ok(Json(TrackResponse { booking }))
}
