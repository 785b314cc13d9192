pub mod booking;
pub mod distance;
pub mod location;
pub mod postcode;
pub mod repository;

pub use booking::{BookingPayload, BookingRecord, BookingStatus, SubmissionReceipt};
pub use distance::{DistanceError, DistanceProvider, DistanceResult};
pub use location::{Coordinates, Location};
pub use postcode::extract_postcode;
pub use repository::{BookingRepository, RepositoryError};
