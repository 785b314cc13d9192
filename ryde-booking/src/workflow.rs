use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use ryde_core::{
    extract_postcode, BookingPayload, BookingRepository, Coordinates, DistanceError,
    DistanceProvider, DistanceResult, Location, SubmissionReceipt,
};
use ryde_fare::{compute_all_fares, FareRequest};

use crate::draft::{BookingDraft, LegDraft, PassengerDetails, TripType};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

const DISTANCE_FAILURE_MESSAGE: &str =
    "Could not calculate distance. Please check the addresses.";

/// Knobs the deployment may tune; everything else in pricing is fixed
/// tariff data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkflowRules {
    /// Minimum hours between "now" and a leg's scheduled time.
    pub min_lead_hours: i64,
    /// Flat charge per child seat.
    pub child_seat_fee: f64,
    /// Demand scaling factor passed through to the fare engine.
    pub surge_multiplier: f64,
}

impl Default for WorkflowRules {
    fn default() -> Self {
        Self {
            min_lead_hours: 3,
            child_seat_fee: 10.0,
            surge_multiplier: 1.0,
        }
    }
}

/// Where the draft currently sits in its lifecycle. Derived from field
/// completion, not stored: the workflow advances the moment the required
/// fields for a stage are satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CapturingOutbound,
    CapturingReturn,
    AwaitingDistance,
    PricingReady,
    VehicleSelected,
    CapturingPassenger,
    Validated,
    Submitted,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("bookings must be made at least {0} hours in advance")]
    LeadTimeTooShort(i64),

    #[error("return journey details only apply to round trips")]
    NotRoundTrip,

    #[error("please complete the journey locations")]
    IncompleteJourney,

    #[error("please select outbound date and time")]
    MissingOutboundSchedule,

    #[error("please select return date and time")]
    MissingReturnSchedule,

    #[error("please select a vehicle")]
    NoVehicleSelected,

    #[error("unknown vehicle class: {0}")]
    UnknownVehicle(String),

    #[error("please enter flight/train number")]
    MissingFlightNumber,

    #[error("please select arrival/departure time")]
    MissingArrivalTime,

    #[error("please provide passenger name, phone and email")]
    MissingPassengerDetails,

    #[error("please provide a valid email address")]
    InvalidEmail,

    #[error("could not calculate distance, please check the addresses")]
    DistanceUnavailable,

    #[error("prices have not been calculated for this journey yet")]
    QuoteUnavailable,

    #[error("this booking has already been submitted")]
    AlreadySubmitted,

    #[error("booking submission failed: {0}")]
    SubmissionFailed(String),
}

/// A generation-tagged batch of distance lookups. Completions carrying an
/// older generation than the workflow's current one are discarded, so a
/// superseded request can never overwrite newer state.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRequest {
    pub generation: u64,
    /// Origin/destination pairs, outbound first, return second when
    /// round-trip.
    pub legs: Vec<(Coordinates, Coordinates)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingOutcome {
    /// The quote was replaced wholesale.
    Updated,
    /// The completion belonged to a superseded request and was discarded.
    Stale,
    /// Pricing inputs are not complete yet; nothing was requested.
    NotReady,
}

/// Single owner of the booking draft.
///
/// Every mutation goes through an intention-revealing method; pricing is
/// recomputed deterministically from the current draft fields rather than
/// from scattered UI triggers.
#[derive(Debug)]
pub struct BookingWorkflow {
    draft: BookingDraft,
    rules: WorkflowRules,
    generation: u64,
    submitted: bool,
}

impl BookingWorkflow {
    pub fn new(trip_type: TripType) -> Self {
        Self::with_rules(trip_type, WorkflowRules::default())
    }

    pub fn with_rules(trip_type: TripType, rules: WorkflowRules) -> Self {
        Self {
            draft: BookingDraft::new(trip_type),
            rules,
            generation: 0,
            submitted: false,
        }
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn rules(&self) -> &WorkflowRules {
        &self.rules
    }

    pub fn stage(&self) -> Stage {
        if self.submitted {
            return Stage::Submitted;
        }
        if !self.draft.outbound.is_complete() {
            return Stage::CapturingOutbound;
        }
        if self.draft.is_round_trip() {
            match &self.draft.return_leg {
                Some(leg) if leg.is_complete() => {}
                _ => return Stage::CapturingReturn,
            }
        }
        if self.draft.quote.is_none() {
            return Stage::AwaitingDistance;
        }
        if self.draft.selected_vehicle.is_none() {
            return Stage::PricingReady;
        }
        if self.validate_for_submission().is_ok() {
            return Stage::Validated;
        }
        if self.draft.passenger.is_empty() && self.draft.flight.flight_number.is_empty() {
            return Stage::VehicleSelected;
        }
        Stage::CapturingPassenger
    }

    // ---- journey mutators -------------------------------------------------

    pub fn set_trip_type(&mut self, trip_type: TripType) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        if self.draft.trip_type == trip_type {
            return Ok(());
        }
        self.draft.trip_type = trip_type;
        self.draft.return_leg = match trip_type {
            TripType::OneWay => None,
            TripType::RoundTrip => Some(LegDraft::default()),
        };
        self.invalidate_quote();
        Ok(())
    }

    pub fn set_outbound_pickup(&mut self, location: Location) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        self.draft.outbound.pickup = Some(location);
        self.draft.outbound.distance = None;
        self.invalidate_quote();
        Ok(())
    }

    pub fn set_outbound_dropoff(&mut self, location: Location) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        self.draft.outbound.dropoff = Some(location);
        self.draft.outbound.distance = None;
        self.invalidate_quote();
        Ok(())
    }

    pub fn set_outbound_schedule(
        &mut self,
        scheduled_at: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        self.check_lead_time(scheduled_at)?;
        self.draft.outbound.scheduled_at = Some(scheduled_at);
        self.invalidate_quote();
        Ok(())
    }

    pub fn set_return_pickup(&mut self, location: Location) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        let leg = self.return_leg_mut()?;
        leg.pickup = Some(location);
        leg.distance = None;
        self.invalidate_quote();
        Ok(())
    }

    pub fn set_return_dropoff(&mut self, location: Location) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        let leg = self.return_leg_mut()?;
        leg.dropoff = Some(location);
        leg.distance = None;
        self.invalidate_quote();
        Ok(())
    }

    pub fn set_return_schedule(
        &mut self,
        scheduled_at: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        self.check_lead_time(scheduled_at)?;
        let leg = self.return_leg_mut()?;
        leg.scheduled_at = Some(scheduled_at);
        self.invalidate_quote();
        Ok(())
    }

    // ---- selection and passenger mutators ---------------------------------

    pub fn select_vehicle(&mut self, vehicle_id: &str) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        if ryde_catalog::find(vehicle_id).is_none() {
            return Err(WorkflowError::UnknownVehicle(vehicle_id.to_string()));
        }
        if self.draft.quote.is_none() {
            return Err(WorkflowError::QuoteUnavailable);
        }
        self.draft.selected_vehicle = Some(vehicle_id.to_string());
        Ok(())
    }

    pub fn set_passenger(&mut self, passenger: PassengerDetails) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        self.draft.passenger = passenger;
        Ok(())
    }

    pub fn set_flight_details(
        &mut self,
        flight_number: impl Into<String>,
        arrival_time: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        self.draft.flight.flight_number = flight_number.into();
        self.draft.flight.arrival_time = arrival_time.into();
        Ok(())
    }

    pub fn set_child_seats(&mut self, required: bool, count: u32) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        self.draft.child_seats.required = required;
        self.draft.child_seats.count = count.max(1);
        Ok(())
    }

    pub fn set_special_requests(&mut self, text: impl Into<String>) -> Result<(), WorkflowError> {
        self.ensure_mutable()?;
        self.draft.special_requests = text.into();
        Ok(())
    }

    // ---- pricing ----------------------------------------------------------

    /// Start a distance/pricing recomputation if every required input is
    /// present. Each call supersedes any request still in flight: only the
    /// newest generation's completion is accepted.
    pub fn begin_pricing(&mut self) -> Option<PricingRequest> {
        if self.submitted || !self.draft.pricing_inputs_complete() {
            return None;
        }

        let mut legs = Vec::with_capacity(2);
        legs.push(self.draft.outbound.route()?);
        if let Some(return_leg) = &self.draft.return_leg {
            legs.push(return_leg.route()?);
        }

        self.generation += 1;
        Some(PricingRequest {
            generation: self.generation,
            legs,
        })
    }

    /// Apply the results of a distance lookup batch.
    ///
    /// A failed leg withholds the quote entirely and surfaces a
    /// user-facing message; it is never priced as zero distance.
    pub fn complete_pricing(
        &mut self,
        generation: u64,
        results: Vec<Result<DistanceResult, DistanceError>>,
    ) -> Result<PricingOutcome, WorkflowError> {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                "discarding superseded distance results"
            );
            return Ok(PricingOutcome::Stale);
        }

        let expected = if self.draft.is_round_trip() { 2 } else { 1 };
        if results.len() != expected {
            return self.fail_pricing();
        }

        let mut distances = Vec::with_capacity(expected);
        for result in results {
            match result {
                Ok(distance) => distances.push(distance),
                Err(err) => {
                    warn!(error = %err, "distance lookup failed");
                    return self.fail_pricing();
                }
            }
        }

        self.draft.outbound.distance = Some(distances[0]);
        if let Some(return_leg) = self.draft.return_leg.as_mut() {
            return_leg.distance = Some(distances[1]);
        }

        let request = self.fare_request()?;
        self.draft.quote = Some(compute_all_fares(&request));
        self.draft.pricing_error = None;
        Ok(PricingOutcome::Updated)
    }

    /// Drive a full recomputation against a provider: begin, look up every
    /// leg, complete. Lookups are fire-and-await with no overlap.
    pub async fn refresh_pricing(
        &mut self,
        provider: &dyn DistanceProvider,
    ) -> Result<PricingOutcome, WorkflowError> {
        let request = match self.begin_pricing() {
            Some(request) => request,
            None => return Ok(PricingOutcome::NotReady),
        };

        let mut results = Vec::with_capacity(request.legs.len());
        for (origin, destination) in &request.legs {
            results.push(provider.driving_distance(*origin, *destination).await);
        }

        self.complete_pricing(request.generation, results)
    }

    // ---- submission -------------------------------------------------------

    /// Check every submission gate in order, returning the first failure as
    /// a user-facing message.
    pub fn validate_for_submission(&self) -> Result<(), WorkflowError> {
        if !self.draft.outbound.locations_set() {
            return Err(WorkflowError::IncompleteJourney);
        }
        if self.draft.outbound.scheduled_at.is_none() {
            return Err(WorkflowError::MissingOutboundSchedule);
        }
        if self.draft.is_round_trip() {
            match &self.draft.return_leg {
                Some(leg) if leg.locations_set() => {
                    if leg.scheduled_at.is_none() {
                        return Err(WorkflowError::MissingReturnSchedule);
                    }
                }
                _ => return Err(WorkflowError::IncompleteJourney),
            }
        }
        if self.draft.selected_vehicle.is_none() {
            return Err(WorkflowError::NoVehicleSelected);
        }
        if self.draft.flight.flight_number.trim().is_empty() {
            return Err(WorkflowError::MissingFlightNumber);
        }
        if self.draft.flight.arrival_time.trim().is_empty() {
            return Err(WorkflowError::MissingArrivalTime);
        }
        if !self.draft.passenger.is_complete() {
            return Err(WorkflowError::MissingPassengerDetails);
        }
        if !EMAIL.is_match(self.draft.passenger.email.trim()) {
            return Err(WorkflowError::InvalidEmail);
        }
        if self.draft.quote.is_none() {
            return Err(WorkflowError::QuoteUnavailable);
        }
        Ok(())
    }

    /// Quoted price for the selected vehicle, before add-ons.
    pub fn base_price(&self) -> Result<f64, WorkflowError> {
        let vehicle_id = self
            .draft
            .selected_vehicle
            .as_deref()
            .ok_or(WorkflowError::NoVehicleSelected)?;
        self.draft
            .quote
            .as_ref()
            .and_then(|quote| quote.price_for(vehicle_id))
            .ok_or(WorkflowError::QuoteUnavailable)
    }

    pub fn child_seats_price(&self) -> f64 {
        if self.draft.child_seats.required {
            f64::from(self.draft.child_seats.count) * self.rules.child_seat_fee
        } else {
            0.0
        }
    }

    pub fn total_price(&self) -> Result<f64, WorkflowError> {
        Ok(self.base_price()? + self.child_seats_price())
    }

    /// Assemble the immutable submission payload. Fails with the first
    /// unsatisfied gate; no partial payload is ever produced.
    pub fn build_payload(&self) -> Result<BookingPayload, WorkflowError> {
        self.validate_for_submission()?;

        let outbound = &self.draft.outbound;
        let pickup = outbound.pickup.as_ref().ok_or(WorkflowError::IncompleteJourney)?;
        let dropoff = outbound.dropoff.as_ref().ok_or(WorkflowError::IncompleteJourney)?;
        let outbound_date = outbound
            .scheduled_at
            .ok_or(WorkflowError::MissingOutboundSchedule)?;
        let outbound_distance = outbound
            .distance
            .ok_or(WorkflowError::QuoteUnavailable)?;

        let vehicle_id = self
            .draft
            .selected_vehicle
            .clone()
            .ok_or(WorkflowError::NoVehicleSelected)?;
        let vehicle = ryde_catalog::find(&vehicle_id)
            .ok_or_else(|| WorkflowError::UnknownVehicle(vehicle_id.clone()))?;

        let return_leg = self.draft.return_leg.as_ref();
        let base_price = self.base_price()?;
        let child_seats_price = self.child_seats_price();

        Ok(BookingPayload {
            trip_type: self.draft.trip_type.as_str().to_string(),
            outbound_pickup: pickup.address.clone(),
            outbound_dropoff: dropoff.address.clone(),
            outbound_date,
            outbound_distance_miles: outbound_distance.miles,
            return_pickup: return_leg
                .and_then(|leg| leg.pickup.as_ref())
                .map(|loc| loc.address.clone()),
            return_dropoff: return_leg
                .and_then(|leg| leg.dropoff.as_ref())
                .map(|loc| loc.address.clone()),
            return_date: return_leg.and_then(|leg| leg.scheduled_at),
            return_distance_miles: return_leg
                .and_then(|leg| leg.distance)
                .map(|distance| distance.miles),
            passenger_name: self.draft.passenger.name.trim().to_string(),
            passenger_phone: self.draft.passenger.phone.trim().to_string(),
            passenger_email: self.draft.passenger.email.trim().to_string(),
            flight_number: self.draft.flight.flight_number.trim().to_string(),
            arrival_time: self.draft.flight.arrival_time.trim().to_string(),
            child_seats: self.draft.child_seats.required,
            child_seats_count: if self.draft.child_seats.required {
                self.draft.child_seats.count as i32
            } else {
                0
            },
            special_requests: if self.draft.special_requests.trim().is_empty() {
                None
            } else {
                Some(self.draft.special_requests.trim().to_string())
            },
            vehicle_id,
            vehicle_name: vehicle.name.to_string(),
            base_price,
            child_seats_price,
            total_price: base_price + child_seats_price,
        })
    }

    /// Hand the draft to the submission gateway. On success the draft
    /// becomes read-only; on failure it is retained untouched so the user
    /// can retry without re-entering anything.
    pub async fn submit(
        &mut self,
        gateway: &dyn BookingRepository,
    ) -> Result<SubmissionReceipt, WorkflowError> {
        self.ensure_mutable()?;
        let payload = self.build_payload()?;

        match gateway.create_booking(&payload).await {
            Ok(receipt) => {
                self.submitted = true;
                info!(booking_id = %receipt.booking_id, "booking submitted");
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, "booking submission failed");
                Err(WorkflowError::SubmissionFailed(err.to_string()))
            }
        }
    }

    // ---- helpers ----------------------------------------------------------

    fn ensure_mutable(&self) -> Result<(), WorkflowError> {
        if self.submitted {
            Err(WorkflowError::AlreadySubmitted)
        } else {
            Ok(())
        }
    }

    fn check_lead_time(&self, scheduled_at: DateTime<Utc>) -> Result<(), WorkflowError> {
        let earliest = Utc::now() + Duration::hours(self.rules.min_lead_hours);
        if scheduled_at < earliest {
            return Err(WorkflowError::LeadTimeTooShort(self.rules.min_lead_hours));
        }
        Ok(())
    }

    fn return_leg_mut(&mut self) -> Result<&mut LegDraft, WorkflowError> {
        self.draft
            .return_leg
            .as_mut()
            .ok_or(WorkflowError::NotRoundTrip)
    }

    fn invalidate_quote(&mut self) {
        self.draft.quote = None;
        self.draft.pricing_error = None;
    }

    fn fail_pricing(&mut self) -> Result<PricingOutcome, WorkflowError> {
        self.draft.quote = None;
        self.draft.pricing_error = Some(DISTANCE_FAILURE_MESSAGE.to_string());
        Err(WorkflowError::DistanceUnavailable)
    }

    fn fare_request(&self) -> Result<FareRequest, WorkflowError> {
        let distance_miles = self
            .draft
            .total_distance_miles()
            .ok_or(WorkflowError::QuoteUnavailable)?;
        let outbound = &self.draft.outbound;
        let pickup = outbound.pickup.as_ref().ok_or(WorkflowError::IncompleteJourney)?;
        let dropoff = outbound.dropoff.as_ref().ok_or(WorkflowError::IncompleteJourney)?;

        Ok(FareRequest {
            distance_miles,
            pickup_postcode: postcode_of(pickup),
            dropoff_postcode: postcode_of(dropoff),
            booking_date: outbound.scheduled_at.map(|at| at.date_naive()),
            surge_multiplier: self.rules.surge_multiplier,
            round_trip: self.draft.is_round_trip(),
        })
    }
}

/// Structured postcode when captured, otherwise whatever the address text
/// yields.
fn postcode_of(location: &Location) -> String {
    if location.postcode.is_empty() {
        extract_postcode(&location.address)
    } else {
        location.postcode.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    use ryde_core::{BookingRecord, BookingStatus, RepositoryError};

    struct FixedDistance {
        miles: f64,
    }

    #[async_trait]
    impl DistanceProvider for FixedDistance {
        async fn driving_distance(
            &self,
            _origin: Coordinates,
            _destination: Coordinates,
        ) -> Result<DistanceResult, DistanceError> {
            Ok(DistanceResult {
                miles: self.miles,
                minutes: (self.miles * 1.2).ceil() as u32,
            })
        }
    }

    struct NoRouteProvider;

    #[async_trait]
    impl DistanceProvider for NoRouteProvider {
        async fn driving_distance(
            &self,
            _origin: Coordinates,
            _destination: Coordinates,
        ) -> Result<DistanceResult, DistanceError> {
            Err(DistanceError::NoRoute)
        }
    }

    /// Gateway that fails the first `fail_times` attempts, then accepts.
    struct FlakyGateway {
        attempts: AtomicUsize,
        fail_times: usize,
    }

    impl FlakyGateway {
        fn reliable() -> Self {
            Self {
                attempts: AtomicUsize::new(0),
                fail_times: 0,
            }
        }

        fn failing_once() -> Self {
            Self {
                attempts: AtomicUsize::new(0),
                fail_times: 1,
            }
        }
    }

    #[async_trait]
    impl BookingRepository for FlakyGateway {
        async fn create_booking(
            &self,
            _payload: &BookingPayload,
        ) -> Result<ryde_core::SubmissionReceipt, RepositoryError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.fail_times {
                return Err(RepositoryError::Storage("connection refused".to_string()));
            }
            Ok(ryde_core::SubmissionReceipt {
                booking_id: Uuid::new_v4(),
                status: BookingStatus::Pending,
            })
        }

        async fn find_by_reference(
            &self,
            _booking_id: Uuid,
            _passenger_name: &str,
        ) -> Result<BookingRecord, RepositoryError> {
            Err(RepositoryError::NotFound)
        }

        async fn update_status(
            &self,
            _booking_id: Uuid,
            _status: BookingStatus,
        ) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    // Far-future, non-holiday timestamps keep the lead-time and
    // special-date rules out of the way.
    fn outbound_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2031, 6, 10, 9, 30, 0).unwrap()
    }

    fn return_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2031, 6, 12, 18, 0, 0).unwrap()
    }

    fn zone_pickup() -> Location {
        Location::with_postcode("Buckingham Palace, London SW1A 1AA", 51.501, -0.142, "SW1A 1AA")
    }

    fn manchester_dropoff() -> Location {
        Location::with_postcode("Piccadilly, Manchester M1 1AE", 53.477, -2.233, "M1 1AE")
    }

    fn croydon() -> Location {
        Location::with_postcode("Croydon CR0 2YR", 51.376, -0.098, "CR0 2YR")
    }

    fn ready_one_way() -> BookingWorkflow {
        let mut workflow = BookingWorkflow::new(TripType::OneWay);
        workflow.set_outbound_pickup(zone_pickup()).unwrap();
        workflow.set_outbound_dropoff(manchester_dropoff()).unwrap();
        workflow.set_outbound_schedule(outbound_time()).unwrap();
        workflow
    }

    #[test]
    fn test_stage_starts_at_capturing_outbound() {
        let workflow = BookingWorkflow::new(TripType::OneWay);
        assert_eq!(workflow.stage(), Stage::CapturingOutbound);
    }

    #[test]
    fn test_lead_time_enforced() {
        let mut workflow = BookingWorkflow::new(TripType::OneWay);
        let too_soon = Utc::now() + Duration::hours(2);
        let err = workflow.set_outbound_schedule(too_soon).unwrap_err();
        assert!(matches!(err, WorkflowError::LeadTimeTooShort(3)));
        assert!(workflow.draft().outbound.scheduled_at.is_none());
    }

    #[test]
    fn test_pricing_not_triggered_while_incomplete() {
        let mut workflow = BookingWorkflow::new(TripType::OneWay);
        workflow.set_outbound_pickup(zone_pickup()).unwrap();
        assert!(workflow.begin_pricing().is_none());
    }

    #[test]
    fn test_round_trip_waits_for_return_leg() {
        let mut workflow = BookingWorkflow::new(TripType::RoundTrip);
        workflow.set_outbound_pickup(zone_pickup()).unwrap();
        workflow.set_outbound_dropoff(manchester_dropoff()).unwrap();
        workflow.set_outbound_schedule(outbound_time()).unwrap();
        assert!(workflow.begin_pricing().is_none());
        assert_eq!(workflow.stage(), Stage::CapturingReturn);
    }

    #[tokio::test]
    async fn test_refresh_pricing_one_way() {
        let mut workflow = ready_one_way();
        assert_eq!(workflow.stage(), Stage::AwaitingDistance);

        let outcome = workflow
            .refresh_pricing(&FixedDistance { miles: 15.0 })
            .await
            .unwrap();
        assert_eq!(outcome, PricingOutcome::Updated);
        assert_eq!(workflow.stage(), Stage::PricingReady);

        // 15 tiered miles + zone charge for the SW1A pickup.
        let quote = workflow.draft().quote.as_ref().unwrap();
        assert!(quote.zone_surcharge_applied);
        assert_close(quote.price_for("saloon").unwrap(), 60.00);
        assert_close(quote.price_for("executive").unwrap(), 48.0 * 1.5 + 12.0);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let mut workflow = ready_one_way();
        let provider = FixedDistance { miles: 15.0 };

        workflow.refresh_pricing(&provider).await.unwrap();
        let first = workflow.draft().quote.clone().unwrap();

        workflow.refresh_pricing(&provider).await.unwrap();
        let second = workflow.draft().quote.clone().unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_round_trip_prices_combined_distance() {
        let mut workflow = BookingWorkflow::new(TripType::RoundTrip);
        workflow.set_outbound_pickup(manchester_dropoff()).unwrap();
        workflow.set_outbound_dropoff(croydon()).unwrap();
        workflow.set_outbound_schedule(outbound_time()).unwrap();
        workflow.set_return_pickup(croydon()).unwrap();
        workflow.set_return_dropoff(manchester_dropoff()).unwrap();
        workflow.set_return_schedule(return_time()).unwrap();

        let outcome = workflow
            .refresh_pricing(&FixedDistance { miles: 10.0 })
            .await
            .unwrap();
        assert_eq!(outcome, PricingOutcome::Updated);

        let quote = workflow.draft().quote.as_ref().unwrap();
        assert_close(quote.distance_miles, 20.0);
        // 20 combined miles, no zone endpoints, times the 1.9 round-trip
        // multiplier.
        assert_close(quote.price_for("saloon").unwrap(), 63.0 * 1.9);
    }

    #[tokio::test]
    async fn test_distance_failure_withholds_quote() {
        let mut workflow = ready_one_way();
        let err = workflow.refresh_pricing(&NoRouteProvider).await.unwrap_err();
        assert!(matches!(err, WorkflowError::DistanceUnavailable));
        assert!(workflow.draft().quote.is_none());
        assert_eq!(
            workflow.draft().pricing_error.as_deref(),
            Some(DISTANCE_FAILURE_MESSAGE)
        );
        assert_eq!(workflow.stage(), Stage::AwaitingDistance);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut workflow = ready_one_way();

        let first = workflow.begin_pricing().unwrap();
        let second = workflow.begin_pricing().unwrap();
        assert!(second.generation > first.generation);

        let outcome = workflow
            .complete_pricing(
                first.generation,
                vec![Ok(DistanceResult {
                    miles: 10.0,
                    minutes: 12,
                })],
            )
            .unwrap();
        assert_eq!(outcome, PricingOutcome::Stale);
        assert!(workflow.draft().quote.is_none());

        let outcome = workflow
            .complete_pricing(
                second.generation,
                vec![Ok(DistanceResult {
                    miles: 20.0,
                    minutes: 24,
                })],
            )
            .unwrap();
        assert_eq!(outcome, PricingOutcome::Updated);
        assert_close(workflow.draft().quote.as_ref().unwrap().distance_miles, 20.0);
    }

    #[tokio::test]
    async fn test_submission_gates_checked_in_order() {
        let mut workflow = ready_one_way();
        workflow
            .refresh_pricing(&FixedDistance { miles: 15.0 })
            .await
            .unwrap();

        assert!(matches!(
            workflow.validate_for_submission().unwrap_err(),
            WorkflowError::NoVehicleSelected
        ));

        workflow.select_vehicle("saloon").unwrap();
        assert!(matches!(
            workflow.validate_for_submission().unwrap_err(),
            WorkflowError::MissingFlightNumber
        ));

        workflow.set_flight_details("BA123", "").unwrap();
        assert!(matches!(
            workflow.validate_for_submission().unwrap_err(),
            WorkflowError::MissingArrivalTime
        ));

        workflow.set_flight_details("BA123", "14:30").unwrap();
        assert!(matches!(
            workflow.validate_for_submission().unwrap_err(),
            WorkflowError::MissingPassengerDetails
        ));

        workflow
            .set_passenger(PassengerDetails {
                name: "Ada Lovelace".to_string(),
                phone: "+44 7700 900123".to_string(),
                email: "ada@invalid".to_string(),
            })
            .unwrap();
        assert!(matches!(
            workflow.validate_for_submission().unwrap_err(),
            WorkflowError::InvalidEmail
        ));

        workflow
            .set_passenger(PassengerDetails {
                name: "Ada Lovelace".to_string(),
                phone: "+44 7700 900123".to_string(),
                email: "ada@example.com".to_string(),
            })
            .unwrap();
        assert!(workflow.validate_for_submission().is_ok());
        assert_eq!(workflow.stage(), Stage::Validated);
    }

    #[tokio::test]
    async fn test_payload_totals_include_child_seats() {
        let mut workflow = ready_one_way();
        workflow
            .refresh_pricing(&FixedDistance { miles: 15.0 })
            .await
            .unwrap();
        workflow.select_vehicle("saloon").unwrap();
        workflow.set_flight_details("BA123", "14:30").unwrap();
        workflow.set_child_seats(true, 2).unwrap();
        workflow
            .set_passenger(PassengerDetails {
                name: "Ada Lovelace".to_string(),
                phone: "+44 7700 900123".to_string(),
                email: "ada@example.com".to_string(),
            })
            .unwrap();

        let payload = workflow.build_payload().unwrap();
        assert_eq!(payload.trip_type, "oneway");
        assert_eq!(payload.vehicle_name, "Saloon");
        assert_eq!(payload.child_seats_count, 2);
        assert_close(payload.base_price, 60.00);
        assert_close(payload.child_seats_price, 20.00);
        assert_close(payload.total_price, 80.00);
        assert!(payload.return_pickup.is_none());
    }

    #[tokio::test]
    async fn test_submit_makes_draft_read_only() {
        let mut workflow = ready_one_way();
        workflow
            .refresh_pricing(&FixedDistance { miles: 15.0 })
            .await
            .unwrap();
        workflow.select_vehicle("saloon").unwrap();
        workflow.set_flight_details("N/A", "09:00").unwrap();
        workflow
            .set_passenger(PassengerDetails {
                name: "Ada Lovelace".to_string(),
                phone: "+44 7700 900123".to_string(),
                email: "ada@example.com".to_string(),
            })
            .unwrap();

        let gateway = FlakyGateway::reliable();
        let receipt = workflow.submit(&gateway).await.unwrap();
        assert_eq!(receipt.status, BookingStatus::Pending);
        assert_eq!(workflow.stage(), Stage::Submitted);

        let err = workflow.set_special_requests("too late").unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadySubmitted));
    }

    #[tokio::test]
    async fn test_gateway_failure_retains_draft_for_retry() {
        let mut workflow = ready_one_way();
        workflow
            .refresh_pricing(&FixedDistance { miles: 15.0 })
            .await
            .unwrap();
        workflow.select_vehicle("saloon").unwrap();
        workflow.set_flight_details("BA123", "14:30").unwrap();
        workflow
            .set_passenger(PassengerDetails {
                name: "Ada Lovelace".to_string(),
                phone: "+44 7700 900123".to_string(),
                email: "ada@example.com".to_string(),
            })
            .unwrap();

        let gateway = FlakyGateway::failing_once();

        let err = workflow.submit(&gateway).await.unwrap_err();
        assert!(matches!(err, WorkflowError::SubmissionFailed(_)));
        assert_eq!(workflow.stage(), Stage::Validated);

        // Nothing was lost; a straight retry succeeds.
        let receipt = workflow.submit(&gateway).await.unwrap();
        assert_eq!(receipt.status, BookingStatus::Pending);
    }

    #[test]
    fn test_return_mutators_require_round_trip() {
        let mut workflow = BookingWorkflow::new(TripType::OneWay);
        let err = workflow.set_return_pickup(croydon()).unwrap_err();
        assert!(matches!(err, WorkflowError::NotRoundTrip));
    }

    #[test]
    fn test_select_vehicle_requires_quote() {
        let mut workflow = ready_one_way();
        let err = workflow.select_vehicle("saloon").unwrap_err();
        assert!(matches!(err, WorkflowError::QuoteUnavailable));

        let err = workflow.select_vehicle("hovercraft").unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownVehicle(_)));
    }

    #[tokio::test]
    async fn test_location_change_invalidates_quote() {
        let mut workflow = ready_one_way();
        workflow
            .refresh_pricing(&FixedDistance { miles: 15.0 })
            .await
            .unwrap();
        assert!(workflow.draft().quote.is_some());

        workflow.set_outbound_dropoff(croydon()).unwrap();
        assert!(workflow.draft().quote.is_none());
        assert!(workflow.draft().outbound.distance.is_none());
        assert_eq!(workflow.stage(), Stage::AwaitingDistance);
    }
}
