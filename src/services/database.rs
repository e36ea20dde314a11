use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{
    availability::AvailabilitySlot,
    booking::{Booking, BookingStatus},
    notification::Notification,
    profile::Profile,
    service::Service,
};

/// In-process store backing the API. Bookings are the authoritative calendar;
/// everything that must be atomic with respect to concurrent requests
/// (conflict check + insert, guarded status updates) happens under a single
/// acquisition of the bookings lock.
#[derive(Clone)]
pub struct DatabaseService {
    profiles: Arc<Mutex<Vec<Profile>>>,
    services: Arc<Mutex<Vec<Service>>>,
    bookings: Arc<Mutex<Vec<Booking>>>,
    slots: Arc<Mutex<Vec<AvailabilitySlot>>>,
    notifications: Arc<Mutex<Vec<Notification>>>,
    sessions: Arc<Mutex<HashMap<String, Uuid>>>,
}

impl DatabaseService {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(Mutex::new(Vec::new())),
            services: Arc::new(Mutex::new(Vec::new())),
            bookings: Arc::new(Mutex::new(Vec::new())),
            slots: Arc::new(Mutex::new(Vec::new())),
            notifications: Arc::new(Mutex::new(Vec::new())),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // Profile operations

    pub fn insert_profile(&self, profile: Profile) -> Result<Profile, ApiError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.iter().any(|p| p.email == profile.email) {
            return Err(ApiError::InvalidRequest(
                "A profile with this email already exists".to_string(),
            ));
        }
        profiles.push(profile.clone());
        Ok(profile)
    }

    pub fn get_profile(&self, profile_id: &Uuid) -> Option<Profile> {
        let profiles = self.profiles.lock().unwrap();
        profiles.iter().find(|p| p.id == *profile_id).cloned()
    }

    // Session operations (narrow stand-in for the external identity provider;
    // keys are SHA-256 digests of bearer tokens)

    pub fn insert_session(&self, token_hash: String, user_id: Uuid) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(token_hash, user_id);
    }

    pub fn resolve_session(&self, token_hash: &str) -> Option<Uuid> {
        let sessions = self.sessions.lock().unwrap();
        sessions.get(token_hash).copied()
    }

    // Service listing operations

    pub fn insert_service(&self, service: Service) -> Service {
        let mut services = self.services.lock().unwrap();
        services.push(service.clone());
        service
    }

    pub fn get_service(&self, service_id: &Uuid) -> Option<Service> {
        let services = self.services.lock().unwrap();
        services.iter().find(|s| s.id == *service_id).cloned()
    }

    /// The lookup the booking path uses: the service must exist, belong to
    /// the requested freelancer, and be active.
    pub fn get_active_service(&self, service_id: &Uuid, freelancer_id: &Uuid) -> Option<Service> {
        let services = self.services.lock().unwrap();
        services
            .iter()
            .find(|s| s.id == *service_id && s.freelancer_id == *freelancer_id && s.is_active)
            .cloned()
    }

    pub fn services_for_freelancer(&self, freelancer_id: &Uuid) -> Vec<Service> {
        let services = self.services.lock().unwrap();
        services
            .iter()
            .filter(|s| s.freelancer_id == *freelancer_id)
            .cloned()
            .collect()
    }

    // Booking operations

    /// Pure conflict probe: does any non-terminal booking of this freelancer
    /// overlap `[start, end)`?
    pub fn has_conflict(
        &self,
        freelancer_id: &Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> bool {
        let bookings = self.bookings.lock().unwrap();
        bookings.iter().any(|b| {
            b.freelancer_id == *freelancer_id && b.status.blocks_calendar() && b.overlaps(start, end)
        })
    }

    /// Conflict check and insert under one lock acquisition. Two racing
    /// creations for overlapping windows cannot both succeed.
    pub fn insert_booking_if_free(&self, booking: Booking) -> Result<Booking, ApiError> {
        let mut bookings = self.bookings.lock().unwrap();
        let conflict = bookings.iter().any(|b| {
            b.freelancer_id == booking.freelancer_id
                && b.status.blocks_calendar()
                && b.overlaps(booking.start_time, booking.end_time)
        });
        if conflict {
            return Err(ApiError::SlotUnavailable);
        }
        bookings.push(booking.clone());
        Ok(booking)
    }

    pub fn get_booking(&self, booking_id: &Uuid) -> Option<Booking> {
        let bookings = self.bookings.lock().unwrap();
        bookings.iter().find(|b| b.id == *booking_id).cloned()
    }

    /// Bookings where the user is either party, newest first.
    pub fn bookings_for_user(&self, user_id: &Uuid) -> Vec<Booking> {
        let bookings = self.bookings.lock().unwrap();
        let mut mine: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.client_id == *user_id || b.freelancer_id == *user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine
    }

    /// Guarded status update: succeeds only if the stored status still equals
    /// `expected`. A concurrent transition that got there first makes the
    /// caller the losing racer.
    pub fn update_booking_status_if(
        &self,
        booking_id: &Uuid,
        expected: BookingStatus,
        next: BookingStatus,
        notes: Option<String>,
    ) -> Result<Booking, ApiError> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == *booking_id)
            .ok_or(ApiError::NotFound("Booking"))?;
        if booking.status != expected {
            return Err(ApiError::InvalidTransition {
                from: booking.status,
                to: next,
            });
        }
        booking.status = next;
        if let Some(notes) = notes {
            booking.notes = Some(notes);
        }
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    // Availability slot operations

    pub fn insert_slot(&self, slot: AvailabilitySlot) -> AvailabilitySlot {
        let mut slots = self.slots.lock().unwrap();
        slots.push(slot.clone());
        slot
    }

    pub fn slots_for_freelancer(&self, freelancer_id: &Uuid) -> Vec<AvailabilitySlot> {
        let slots = self.slots.lock().unwrap();
        let mut mine: Vec<AvailabilitySlot> = slots
            .iter()
            .filter(|s| s.freelancer_id == *freelancer_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        mine
    }

    pub fn delete_slot(&self, freelancer_id: &Uuid, slot_id: &Uuid) -> bool {
        let mut slots = self.slots.lock().unwrap();
        let before = slots.len();
        slots.retain(|s| !(s.id == *slot_id && s.freelancer_id == *freelancer_id));
        slots.len() < before
    }

    /// Flips the first unbooked slot that fully contains the interval.
    pub fn mark_slot_booked(
        &self,
        freelancer_id: &Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<AvailabilitySlot> {
        let mut slots = self.slots.lock().unwrap();
        let slot = slots
            .iter_mut()
            .find(|s| s.freelancer_id == *freelancer_id && !s.booked && s.contains(start, end))?;
        slot.booked = true;
        Some(slot.clone())
    }

    // Notification operations

    /// Fallible by contract: a poisoned notification store must not take the
    /// parent booking write down with it.
    pub fn insert_notification(&self, notification: Notification) -> Result<Notification> {
        let mut notifications = self
            .notifications
            .lock()
            .map_err(|_| anyhow!("notification store lock poisoned"))?;
        notifications.push(notification.clone());
        Ok(notification)
    }

    pub fn notifications_for_user(&self, user_id: &Uuid) -> Vec<Notification> {
        let notifications = self.notifications.lock().unwrap();
        let mut mine: Vec<Notification> = notifications
            .iter()
            .filter(|n| n.user_id == *user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine
    }

    /// Removes every `booking_request` notification addressed to `user_id`
    /// that references `booking_id`. Removing nothing is not an error.
    pub fn delete_booking_requests(&self, user_id: &Uuid, booking_id: &Uuid) -> usize {
        let mut notifications = self.notifications.lock().unwrap();
        let before = notifications.len();
        notifications.retain(|n| {
            !(n.user_id == *user_id
                && n.event.is_booking_request()
                && n.event.booking_id() == Some(*booking_id))
        });
        before - notifications.len()
    }

    pub fn mark_notification_read(
        &self,
        user_id: &Uuid,
        notification_id: &Uuid,
    ) -> Option<Notification> {
        let mut notifications = self.notifications.lock().unwrap();
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == *notification_id && n.user_id == *user_id)?;
        notification.read = true;
        Some(notification.clone())
    }
}

impl Default for DatabaseService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::availability::CreateSlotRequest;
    use crate::models::booking::CreateBookingRequest;
    use crate::models::notification::{BookingRequestPayload, NotificationEvent};
    use chrono::TimeZone;

    fn booking_at(freelancer_id: Uuid, start_hour: u32, end_hour: u32) -> Booking {
        Booking::new(
            Uuid::new_v4(),
            &CreateBookingRequest {
                freelancer_id,
                service_id: None,
                start_time: Utc.with_ymd_and_hms(2024, 5, 20, start_hour, 0, 0).unwrap(),
                end_time: Utc.with_ymd_and_hms(2024, 5, 20, end_hour, 0, 0).unwrap(),
                notes: None,
            },
            None,
        )
    }

    fn request_notification(user_id: Uuid, booking_id: Uuid) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            event: NotificationEvent::BookingRequest(BookingRequestPayload {
                booking_id,
                client_name: "Grace".to_string(),
                service_title: "Custom booking".to_string(),
                start_time: Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap(),
                end_time: Utc.with_ymd_and_hms(2024, 5, 20, 10, 0, 0).unwrap(),
            }),
            read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn overlapping_insert_is_rejected_adjacent_is_not() {
        let db = DatabaseService::new();
        let freelancer = Uuid::new_v4();

        db.insert_booking_if_free(booking_at(freelancer, 9, 10)).unwrap();
        assert_eq!(
            db.insert_booking_if_free(booking_at(freelancer, 9, 11)).unwrap_err(),
            ApiError::SlotUnavailable
        );
        // adjacency is allowed under half-open semantics
        db.insert_booking_if_free(booking_at(freelancer, 10, 11)).unwrap();
        // other freelancers are unaffected
        db.insert_booking_if_free(booking_at(Uuid::new_v4(), 9, 10)).unwrap();
    }

    #[test]
    fn terminal_bookings_release_their_window() {
        let db = DatabaseService::new();
        let freelancer = Uuid::new_v4();

        let first = db.insert_booking_if_free(booking_at(freelancer, 9, 10)).unwrap();
        db.update_booking_status_if(&first.id, BookingStatus::Pending, BookingStatus::Canceled, None)
            .unwrap();
        db.insert_booking_if_free(booking_at(freelancer, 9, 10)).unwrap();
    }

    #[test]
    fn guarded_update_rejects_stale_expectation() {
        let db = DatabaseService::new();
        let booking = db
            .insert_booking_if_free(booking_at(Uuid::new_v4(), 9, 10))
            .unwrap();

        db.update_booking_status_if(
            &booking.id,
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            None,
        )
        .unwrap();

        // a second updater that still believes the booking is pending loses
        let err = db
            .update_booking_status_if(
                &booking.id,
                BookingStatus::Pending,
                BookingStatus::Canceled,
                None,
            )
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::InvalidTransition {
                from: BookingStatus::Confirmed,
                to: BookingStatus::Canceled,
            }
        );
        assert_eq!(
            db.get_booking(&booking.id).unwrap().status,
            BookingStatus::Confirmed
        );
    }

    #[test]
    fn retraction_only_removes_matching_booking_requests() {
        let db = DatabaseService::new();
        let freelancer = Uuid::new_v4();
        let booking_id = Uuid::new_v4();
        let other_booking = Uuid::new_v4();

        db.insert_notification(request_notification(freelancer, booking_id)).unwrap();
        db.insert_notification(request_notification(freelancer, booking_id)).unwrap();
        db.insert_notification(request_notification(freelancer, other_booking)).unwrap();

        assert_eq!(db.delete_booking_requests(&freelancer, &booking_id), 2);
        assert_eq!(db.delete_booking_requests(&freelancer, &booking_id), 0);

        let remaining = db.notifications_for_user(&freelancer);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].event.booking_id(), Some(other_booking));
    }

    #[test]
    fn slot_flip_targets_first_containing_unbooked_slot() {
        let db = DatabaseService::new();
        let freelancer = Uuid::new_v4();
        let nine = Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap();
        let ten = Utc.with_ymd_and_hms(2024, 5, 20, 10, 0, 0).unwrap();
        let noon = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();

        let slot = db.insert_slot(AvailabilitySlot::new(
            freelancer,
            &CreateSlotRequest {
                start_time: nine,
                end_time: noon,
            },
        ));

        let flipped = db.mark_slot_booked(&freelancer, nine, ten).unwrap();
        assert_eq!(flipped.id, slot.id);
        assert!(flipped.booked);
        // already booked, nothing left to flip
        assert!(db.mark_slot_booked(&freelancer, ten, noon).is_none());
    }
}
