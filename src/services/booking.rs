use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::booking::{
    Booking, BookingDetails, BookingStatus, CreateBookingRequest, StatusUpdate,
    UpdateBookingStatusRequest,
};
use crate::models::notification::{
    BookingOutcomePayload, BookingRequestPayload, NotificationEvent,
};
use crate::services::database::DatabaseService;
use crate::services::notification::NotificationService;
use crate::services::pricing;

/// Shown in notification payloads when no service listing is attached.
const CUSTOM_BOOKING_TITLE: &str = "Custom booking";

/// Orchestrates booking creation and the status state machine, including
/// notification side effects. Notification failures never fail the parent
/// operation.
#[derive(Clone)]
pub struct BookingService {
    db: DatabaseService,
    notifications: NotificationService,
}

impl BookingService {
    pub fn new(db: DatabaseService, notifications: NotificationService) -> Self {
        Self { db, notifications }
    }

    /// Creation path: validate interval, resolve and price the service,
    /// check the calendar, persist as `pending`, notify the freelancer.
    pub fn create_booking(
        &self,
        client_id: Uuid,
        request: CreateBookingRequest,
    ) -> Result<BookingDetails, ApiError> {
        if request.end_time <= request.start_time {
            return Err(ApiError::InvalidRequest(
                "end_time must be after start_time".to_string(),
            ));
        }

        let client = self
            .db
            .get_profile(&client_id)
            .ok_or(ApiError::NotFound("Profile"))?;
        let freelancer = self
            .db
            .get_profile(&request.freelancer_id)
            .ok_or(ApiError::NotFound("Freelancer"))?;

        let service = match request.service_id {
            Some(service_id) => Some(
                self.db
                    .get_active_service(&service_id, &request.freelancer_id)
                    .ok_or(ApiError::ServiceUnavailable)?,
            ),
            None => None,
        };
        let total_amount_cents = service.as_ref().and_then(|s| {
            let amount = pricing::amount_cents(s.price_cents, request.start_time, request.end_time);
            (amount > 0).then_some(amount)
        });

        if self
            .db
            .has_conflict(&request.freelancer_id, request.start_time, request.end_time)
        {
            return Err(ApiError::SlotUnavailable);
        }

        // the store re-checks under its write lock, so two racing requests
        // for overlapping windows cannot both get here and both succeed
        let booking = self
            .db
            .insert_booking_if_free(Booking::new(client_id, &request, total_amount_cents))?;

        if let Some(slot) =
            self.db
                .mark_slot_booked(&booking.freelancer_id, booking.start_time, booking.end_time)
        {
            log::debug!("booking {} consumed availability slot {}", booking.id, slot.id);
        }

        let service_title = service.map(|s| s.title);
        let event = NotificationEvent::BookingRequest(BookingRequestPayload {
            booking_id: booking.id,
            client_name: client.display_name.clone(),
            service_title: service_title
                .clone()
                .unwrap_or_else(|| CUSTOM_BOOKING_TITLE.to_string()),
            start_time: booking.start_time,
            end_time: booking.end_time,
        });
        if let Err(e) = self.notifications.notify(booking.freelancer_id, event) {
            log::warn!(
                "failed to notify freelancer {} of booking {}: {}",
                booking.freelancer_id,
                booking.id,
                e
            );
        }

        log::info!(
            "booking {} created for freelancer {} ({} to {})",
            booking.id,
            booking.freelancer_id,
            booking.start_time,
            booking.end_time
        );

        Ok(BookingDetails {
            client_name: client.display_name,
            freelancer_name: freelancer.display_name,
            service_title,
            booking,
        })
    }

    /// Transition path: permission, idempotence, transition table, role
    /// gates, guarded persist, then retraction and counterpart notification.
    pub fn update_booking_status(
        &self,
        actor_id: Uuid,
        request: UpdateBookingStatusRequest,
    ) -> Result<StatusUpdate, ApiError> {
        let target = request.status.normalize();
        let current = self
            .db
            .get_booking(&request.booking_id)
            .ok_or(ApiError::NotFound("Booking"))?;

        let is_freelancer = actor_id == current.freelancer_id;
        let is_client = actor_id == current.client_id;
        if !is_freelancer && !is_client {
            return Err(ApiError::Unauthorized(
                "You can only update your own bookings".to_string(),
            ));
        }

        // retried requests are answered with the stored state, no new side
        // effects
        if current.status == target {
            return Ok(StatusUpdate {
                message: format!("Booking is already {}", target),
                booking: self.join_details(current)?,
                applied: false,
            });
        }

        if !current.status.can_transition_to(target) {
            return Err(ApiError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }
        if target == BookingStatus::Confirmed && !is_freelancer {
            return Err(ApiError::Unauthorized(
                "Only freelancers can confirm bookings".to_string(),
            ));
        }
        if target == BookingStatus::Completed && current.status != BookingStatus::Confirmed {
            return Err(ApiError::NotConfirmed);
        }

        // compare-and-swap against the status read above; a concurrent
        // transition makes this request the losing racer
        let updated =
            self.db
                .update_booking_status_if(&current.id, current.status, target, request.notes)?;

        if is_freelancer && matches!(target, BookingStatus::Confirmed | BookingStatus::Canceled) {
            let removed = self
                .notifications
                .retract_booking_request(updated.freelancer_id, updated.id);
            if removed > 0 {
                log::debug!(
                    "retracted {} booking request notification(s) for booking {}",
                    removed,
                    updated.id
                );
            }
        }

        let details = self.join_details(updated)?;
        let (recipient, counterpart_name, payload_message) = if is_freelancer {
            (
                details.booking.client_id,
                details.freelancer_name.clone(),
                format!("Your booking has been {}", target),
            )
        } else {
            (
                details.booking.freelancer_id,
                details.client_name.clone(),
                format!("Booking has been {} by client", target),
            )
        };
        let payload = BookingOutcomePayload {
            booking_id: details.booking.id,
            counterpart_name,
            service_title: details
                .service_title
                .clone()
                .unwrap_or_else(|| CUSTOM_BOOKING_TITLE.to_string()),
            status: target,
            start_time: details.booking.start_time,
            message: payload_message,
        };
        if let Some(event) = NotificationEvent::booking_outcome(target, payload) {
            if let Err(e) = self.notifications.notify(recipient, event) {
                log::warn!(
                    "failed to notify user {} about booking {}: {}",
                    recipient,
                    details.booking.id,
                    e
                );
            }
        }

        log::info!("booking {} moved to {}", details.booking.id, target);

        Ok(StatusUpdate {
            message: format!("Booking {} successfully", target),
            booking: details,
            applied: true,
        })
    }

    /// The caller's bookings (either side), joined for display.
    pub fn bookings_for(&self, user_id: Uuid) -> Vec<BookingDetails> {
        self.db
            .bookings_for_user(&user_id)
            .into_iter()
            .filter_map(|booking| self.join_details(booking).ok())
            .collect()
    }

    fn join_details(&self, booking: Booking) -> Result<BookingDetails, ApiError> {
        let client = self
            .db
            .get_profile(&booking.client_id)
            .ok_or(ApiError::NotFound("Profile"))?;
        let freelancer = self
            .db
            .get_profile(&booking.freelancer_id)
            .ok_or(ApiError::NotFound("Profile"))?;
        let service_title = booking
            .service_id
            .and_then(|id| self.db.get_service(&id))
            .map(|s| s.title);
        Ok(BookingDetails {
            client_name: client.display_name,
            freelancer_name: freelancer.display_name,
            service_title,
            booking,
        })
    }
}
