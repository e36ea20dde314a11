use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::booking::BookingStatus;

/// A durable notification record targeted at one user. The event union is
/// flattened into the record, so the wire shape is
/// `{ id, user_id, type, payload, read, created_at }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub event: NotificationEvent,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification kinds with their typed payloads. Consumers switch on the
/// `type` tag; each variant owns its payload shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum NotificationEvent {
    BookingRequest(BookingRequestPayload),
    BookingConfirmed(BookingOutcomePayload),
    BookingCanceled(BookingOutcomePayload),
    BookingCompleted(BookingOutcomePayload),
    Generic(GenericPayload),
}

impl NotificationEvent {
    /// The booking this notification refers to, if any.
    pub fn booking_id(&self) -> Option<Uuid> {
        match self {
            NotificationEvent::BookingRequest(p) => Some(p.booking_id),
            NotificationEvent::BookingConfirmed(p)
            | NotificationEvent::BookingCanceled(p)
            | NotificationEvent::BookingCompleted(p) => Some(p.booking_id),
            NotificationEvent::Generic(_) => None,
        }
    }

    pub fn is_booking_request(&self) -> bool {
        matches!(self, NotificationEvent::BookingRequest(_))
    }

    /// Event announcing that a booking reached `status`. `pending` is never
    /// a transition target, so it has no event.
    pub fn booking_outcome(status: BookingStatus, payload: BookingOutcomePayload) -> Option<Self> {
        match status {
            BookingStatus::Confirmed => Some(NotificationEvent::BookingConfirmed(payload)),
            BookingStatus::Canceled => Some(NotificationEvent::BookingCanceled(payload)),
            BookingStatus::Completed => Some(NotificationEvent::BookingCompleted(payload)),
            BookingStatus::Pending => None,
        }
    }
}

/// Actionable inbox item for the freelancer: a client asked for a slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRequestPayload {
    pub booking_id: Uuid,
    pub client_name: String,
    pub service_title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Sent to the party that did not act when a booking changes status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingOutcomePayload {
    pub booking_id: Uuid,
    pub counterpart_name: String,
    pub service_title: String,
    pub status: BookingStatus,
    pub start_time: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenericPayload {
    pub title: String,
    pub message: String,
}
