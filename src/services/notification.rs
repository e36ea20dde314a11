use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::notification::{Notification, NotificationEvent};
use crate::services::database::DatabaseService;

/// Creates and removes durable notification records. Inserts are best-effort
/// from the booking core's point of view: a failed insert is the caller's to
/// log, never to propagate.
#[derive(Clone)]
pub struct NotificationService {
    db: DatabaseService,
}

impl NotificationService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    pub fn notify(&self, user_id: Uuid, event: NotificationEvent) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id,
            event,
            read: false,
            created_at: Utc::now(),
        };
        self.db.insert_notification(notification)
    }

    /// Deletes every `booking_request` notification for this user that
    /// references the booking. Retracting nothing is fine.
    pub fn retract_booking_request(&self, freelancer_id: Uuid, booking_id: Uuid) -> usize {
        self.db.delete_booking_requests(&freelancer_id, &booking_id)
    }

    pub fn list_for_user(&self, user_id: Uuid) -> Vec<Notification> {
        self.db.notifications_for_user(&user_id)
    }

    pub fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<Notification, ApiError> {
        self.db
            .mark_notification_read(&user_id, &notification_id)
            .ok_or(ApiError::NotFound("Notification"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::GenericPayload;

    #[test]
    fn notify_inserts_unread_with_server_timestamp() {
        let service = NotificationService::new(DatabaseService::new());
        let user = Uuid::new_v4();

        let sent = service
            .notify(
                user,
                NotificationEvent::Generic(GenericPayload {
                    title: "Welcome".to_string(),
                    message: "Profile created".to_string(),
                }),
            )
            .unwrap();
        assert!(!sent.read);

        let inbox = service.list_for_user(user);
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].id, sent.id);
    }

    #[test]
    fn mark_read_is_scoped_to_the_recipient() {
        let service = NotificationService::new(DatabaseService::new());
        let user = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let sent = service
            .notify(
                user,
                NotificationEvent::Generic(GenericPayload {
                    title: "Hi".to_string(),
                    message: "there".to_string(),
                }),
            )
            .unwrap();

        assert_eq!(
            service.mark_read(stranger, sent.id).unwrap_err(),
            ApiError::NotFound("Notification")
        );
        assert!(service.mark_read(user, sent.id).unwrap().read);
    }
}
