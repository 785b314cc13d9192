use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::{BookingPayload, BookingRecord, BookingStatus, SubmissionReceipt};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("booking not found")]
    NotFound,

    #[error("invalid booking status: {0}")]
    InvalidStatus(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Booking persistence seam.
///
/// `create_booking` is the submission gateway: it accepts a fully assembled
/// payload and returns the generated identifier with initial status
/// `pending`. The remaining methods are the read/update paths used by the
/// tracking page and back office.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(
        &self,
        payload: &BookingPayload,
    ) -> Result<SubmissionReceipt, RepositoryError>;

    /// Look up a booking by identifier and passenger name. The name match
    /// is case-insensitive; a mismatch on either field is `NotFound`.
    async fn find_by_reference(
        &self,
        booking_id: Uuid,
        passenger_name: &str,
    ) -> Result<BookingRecord, RepositoryError>;

    async fn update_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<(), RepositoryError>;
}
