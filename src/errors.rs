use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::booking::BookingStatus;
use crate::models::common::ApiResponse;

/// Domain errors for the booking API.
///
/// Every variant renders as HTTP 400 with a `{success: false, error}` body;
/// callers are expected to read the error field rather than switch on status
/// codes.
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Service not found or inactive")]
    ServiceUnavailable,

    #[error("Freelancer is not available during the requested time")]
    SlotUnavailable,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Booking must be confirmed before marking as completed")]
    NotConfirmed,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.to_string()))
    }
}
