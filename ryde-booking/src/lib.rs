pub mod draft;
pub mod workflow;

pub use draft::{BookingDraft, ChildSeatAddOn, FlightDetails, LegDraft, PassengerDetails, TripType};
pub use workflow::{
    BookingWorkflow, PricingOutcome, PricingRequest, Stage, WorkflowError, WorkflowRules,
};
