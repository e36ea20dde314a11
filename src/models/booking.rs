use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Canceled,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Canceled)
    }

    /// Bookings in these statuses hold their window on the freelancer's
    /// calendar and participate in conflict detection.
    pub fn blocks_calendar(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// The full transition table. Anything not listed here is rejected.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Canceled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
                | (BookingStatus::Confirmed, BookingStatus::Canceled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Canceled => "canceled",
        };
        write!(f, "{}", s)
    }
}

/// Status values accepted on the wire. `rejected` shares the canceled
/// representation in storage.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestedStatus {
    Confirmed,
    Canceled,
    Completed,
    Rejected,
}

impl RequestedStatus {
    pub fn normalize(self) -> BookingStatus {
        match self {
            RequestedStatus::Confirmed => BookingStatus::Confirmed,
            RequestedStatus::Canceled | RequestedStatus::Rejected => BookingStatus::Canceled,
            RequestedStatus::Completed => BookingStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub freelancer_id: Uuid,
    pub service_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub total_amount_cents: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(client_id: Uuid, request: &CreateBookingRequest, total_amount_cents: Option<i64>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            freelancer_id: request.freelancer_id,
            service_id: request.service_id,
            start_time: request.start_time,
            end_time: request.end_time,
            status: BookingStatus::Pending,
            total_amount_cents,
            notes: request.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Half-open interval overlap: `[s1, e1)` and `[s2, e2)` overlap iff
    /// `s1 < e2 && e1 > s2`. Adjacent intervals do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub freelancer_id: Uuid,
    pub service_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCreateBooking {
    #[serde(default, alias = "freelancerId")]
    freelancer_id: Option<Uuid>,
    #[serde(default, alias = "serviceId")]
    service_id: Option<Uuid>,
    #[serde(default, alias = "startTime")]
    start_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "endTime")]
    end_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "note")]
    notes: Option<String>,
}

impl CreateBookingRequest {
    /// Parses a request body, accepting both snake_case and camelCase field
    /// names.
    pub fn from_body(value: Value) -> Result<Self, ApiError> {
        let raw: RawCreateBooking =
            serde_json::from_value(value).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let (Some(freelancer_id), Some(start_time), Some(end_time)) =
            (raw.freelancer_id, raw.start_time, raw.end_time)
        else {
            return Err(ApiError::InvalidRequest(
                "freelancer_id, start_time, and end_time are required".to_string(),
            ));
        };
        Ok(Self {
            freelancer_id,
            service_id: raw.service_id,
            start_time,
            end_time,
            notes: raw.notes,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub booking_id: Uuid,
    pub status: RequestedStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUpdateBooking {
    #[serde(default, alias = "bookingId")]
    booking_id: Option<Uuid>,
    #[serde(default)]
    status: Option<RequestedStatus>,
    #[serde(default)]
    notes: Option<String>,
}

impl UpdateBookingStatusRequest {
    /// Parses a request body, accepting both a bare JSON object and a
    /// `{ "body": { ... } }` wrapper.
    pub fn from_body(value: Value) -> Result<Self, ApiError> {
        let value = match value {
            Value::Object(mut map) if map.contains_key("body") => {
                map.remove("body").unwrap_or(Value::Null)
            }
            other => other,
        };
        let raw: RawUpdateBooking =
            serde_json::from_value(value).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let (Some(booking_id), Some(status)) = (raw.booking_id, raw.status) else {
            return Err(ApiError::InvalidRequest(
                "booking_id and status are required".to_string(),
            ));
        };
        Ok(Self {
            booking_id,
            status,
            notes: raw.notes,
        })
    }
}

/// A booking joined with the display fields the caller renders immediately.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub client_name: String,
    pub freelancer_name: String,
    pub service_title: Option<String>,
}

/// Envelope for the two booking endpoints: `{ success, booking, message }`.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub booking: BookingDetails,
    pub message: String,
}

impl BookingResponse {
    pub fn new(booking: BookingDetails, message: impl Into<String>) -> Self {
        Self {
            success: true,
            booking,
            message: message.into(),
        }
    }
}

/// Outcome of a status update, carrying the message the handler echoes back
/// (distinguishes an applied transition from an idempotent no-op).
#[derive(Debug)]
pub struct StatusUpdate {
    pub booking: BookingDetails,
    pub message: String,
    pub applied: bool,
}
