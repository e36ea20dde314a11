use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Freelancer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterProfileRequest {
    #[validate(length(min = 2, max = 100, message = "Display name must be between 2 and 100 characters"))]
    pub display_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

impl Profile {
    pub fn new(request: RegisterProfileRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            display_name: request.display_name,
            email: request.email.to_lowercase(),
            role: request.role,
            avatar_url: request.avatar_url,
            bio: request.bio,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Registration response: the profile plus the bearer token for subsequent
/// requests. The token is returned exactly once and stored only as a hash.
#[derive(Debug, Serialize)]
pub struct RegisteredProfile {
    pub profile: Profile,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(role: UserRole) -> RegisterProfileRequest {
        RegisterProfileRequest {
            display_name: "Ada Lovelace".to_string(),
            email: "ADA@Example.com".to_string(),
            role,
            avatar_url: None,
            bio: None,
        }
    }

    #[test]
    fn email_is_normalized_to_lowercase() {
        let profile = Profile::new(request(UserRole::Freelancer));
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.role, UserRole::Freelancer);
    }

    #[test]
    fn registration_request_validates_email() {
        let mut bad = request(UserRole::Client);
        bad.email = "not-an-email".to_string();
        assert!(bad.validate().is_err());
    }
}
