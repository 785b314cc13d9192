use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a persisted booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a stored or user-supplied status, rejecting anything outside
    /// the four valid values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// The fully assembled booking as handed to the submission gateway.
///
/// Assembled once by the booking workflow after all gates pass; immutable
/// from that point on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub trip_type: String,
    pub outbound_pickup: String,
    pub outbound_dropoff: String,
    pub outbound_date: DateTime<Utc>,
    pub outbound_distance_miles: f64,
    pub return_pickup: Option<String>,
    pub return_dropoff: Option<String>,
    pub return_date: Option<DateTime<Utc>>,
    pub return_distance_miles: Option<f64>,
    pub passenger_name: String,
    pub passenger_phone: String,
    pub passenger_email: String,
    pub flight_number: String,
    pub arrival_time: String,
    pub child_seats: bool,
    pub child_seats_count: i32,
    pub special_requests: Option<String>,
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub base_price: f64,
    pub child_seats_price: f64,
    pub total_price: f64,
}

/// A persisted booking as read back from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: BookingPayload,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub booking_id: Uuid,
    pub status: BookingStatus,
}
