use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freelancer-declared calendar hint. Advisory only: conflict detection is
/// computed from bookings, never from slots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub freelancer_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booked: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSlotRequest {
    #[serde(alias = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(alias = "endTime")]
    pub end_time: DateTime<Utc>,
}

impl AvailabilitySlot {
    pub fn new(freelancer_id: Uuid, request: &CreateSlotRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            freelancer_id,
            start_time: request.start_time,
            end_time: request.end_time,
            booked: false,
            created_at: Utc::now(),
        }
    }

    /// Whether this slot fully contains the given interval.
    pub fn contains(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time <= start && end <= self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn containment_is_inclusive_of_slot_edges() {
        let slot = AvailabilitySlot::new(
            Uuid::new_v4(),
            &CreateSlotRequest {
                start_time: Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap(),
                end_time: Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap(),
            },
        );
        let ten = Utc.with_ymd_and_hms(2024, 5, 20, 10, 0, 0).unwrap();
        let eleven = Utc.with_ymd_and_hms(2024, 5, 20, 11, 0, 0).unwrap();
        let one = Utc.with_ymd_and_hms(2024, 5, 20, 13, 0, 0).unwrap();

        assert!(slot.contains(slot.start_time, slot.end_time));
        assert!(slot.contains(ten, eleven));
        assert!(!slot.contains(ten, one));
        assert!(!slot.booked);
    }
}
