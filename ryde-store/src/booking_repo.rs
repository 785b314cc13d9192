use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use ryde_core::{
    BookingPayload, BookingRecord, BookingRepository, BookingStatus, RepositoryError,
    SubmissionReceipt,
};

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    trip_type: String,
    pickup_location: String,
    dropoff_location: String,
    outbound_date: DateTime<Utc>,
    outbound_distance: f64,
    return_pickup_location: Option<String>,
    return_dropoff_location: Option<String>,
    return_date: Option<DateTime<Utc>>,
    return_distance: Option<f64>,
    passenger_name: String,
    passenger_phone: String,
    passenger_email: String,
    flight_number: String,
    arrival_time: String,
    child_seats: bool,
    child_seats_count: i32,
    special_requests: Option<String>,
    service_type: String,
    vehicle_id: String,
    base_price: f64,
    child_seats_price: f64,
    total_amount: f64,
    booking_status: String,
    created_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_record(self) -> Result<BookingRecord, RepositoryError> {
        let status = BookingStatus::parse(&self.booking_status)
            .ok_or_else(|| RepositoryError::InvalidStatus(self.booking_status.clone()))?;

        Ok(BookingRecord {
            id: self.id,
            status,
            created_at: self.created_at,
            payload: BookingPayload {
                trip_type: self.trip_type,
                outbound_pickup: self.pickup_location,
                outbound_dropoff: self.dropoff_location,
                outbound_date: self.outbound_date,
                outbound_distance_miles: self.outbound_distance,
                return_pickup: self.return_pickup_location,
                return_dropoff: self.return_dropoff_location,
                return_date: self.return_date,
                return_distance_miles: self.return_distance,
                passenger_name: self.passenger_name,
                passenger_phone: self.passenger_phone,
                passenger_email: self.passenger_email,
                flight_number: self.flight_number,
                arrival_time: self.arrival_time,
                child_seats: self.child_seats,
                child_seats_count: self.child_seats_count,
                special_requests: self.special_requests,
                vehicle_id: self.vehicle_id,
                vehicle_name: self.service_type,
                base_price: self.base_price,
                child_seats_price: self.child_seats_price,
                total_price: self.total_amount,
            },
        })
    }
}

fn storage_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        other => RepositoryError::Storage(other.to_string()),
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(
        &self,
        payload: &BookingPayload,
    ) -> Result<SubmissionReceipt, RepositoryError> {
        let booking_id = Uuid::new_v4();
        let status = BookingStatus::Pending;

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, trip_type, pickup_location, dropoff_location,
                outbound_date, outbound_distance,
                return_pickup_location, return_dropoff_location,
                return_date, return_distance,
                passenger_name, passenger_phone, passenger_email,
                flight_number, arrival_time,
                child_seats, child_seats_count, special_requests,
                service_type, vehicle_id,
                base_price, child_seats_price, total_amount,
                booking_status
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
            )
            "#,
        )
        .bind(booking_id)
        .bind(&payload.trip_type)
        .bind(&payload.outbound_pickup)
        .bind(&payload.outbound_dropoff)
        .bind(payload.outbound_date)
        .bind(payload.outbound_distance_miles)
        .bind(&payload.return_pickup)
        .bind(&payload.return_dropoff)
        .bind(payload.return_date)
        .bind(payload.return_distance_miles)
        .bind(&payload.passenger_name)
        .bind(&payload.passenger_phone)
        .bind(&payload.passenger_email)
        .bind(&payload.flight_number)
        .bind(&payload.arrival_time)
        .bind(payload.child_seats)
        .bind(payload.child_seats_count)
        .bind(&payload.special_requests)
        .bind(&payload.vehicle_name)
        .bind(&payload.vehicle_id)
        .bind(payload.base_price)
        .bind(payload.child_seats_price)
        .bind(payload.total_price)
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        info!(%booking_id, "booking persisted");

        Ok(SubmissionReceipt { booking_id, status })
    }

    async fn find_by_reference(
        &self,
        booking_id: Uuid,
        passenger_name: &str,
    ) -> Result<BookingRecord, RepositoryError> {
        let row: Option<BookingRow> = sqlx::query_as(
            r#"
            SELECT * FROM bookings
            WHERE id = $1 AND LOWER(passenger_name) = LOWER($2)
            "#,
        )
        .bind(booking_id)
        .bind(passenger_name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.ok_or(RepositoryError::NotFound)?.into_record()
    }

    async fn update_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE bookings SET booking_status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(booking_id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
