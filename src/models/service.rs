use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A freelancer's published offering. `price_cents` is the hourly rate in
/// minor currency units; `duration_minutes` is the default session length
/// shown to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub freelancer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 2, max = 120, message = "Title must be between 2 and 120 characters"))]
    pub title: String,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_cents: i64,

    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: i64,
}

fn default_duration_minutes() -> i64 {
    60
}

impl Service {
    pub fn new(freelancer_id: Uuid, request: CreateServiceRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            freelancer_id,
            title: request.title,
            description: request.description,
            price_cents: request.price_cents,
            duration_minutes: request.duration_minutes,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
