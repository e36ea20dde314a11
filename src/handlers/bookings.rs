use actix_web::web::{Data, Json};
use actix_web::{get, post, HttpRequest, HttpResponse};
use serde_json::Value;

use crate::errors::ApiError;
use crate::models::booking::{BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::models::common::ApiResponse;
use crate::services::auth;
use crate::services::booking::BookingService;
use crate::services::database::DatabaseService;

#[post("")]
pub async fn create_booking(
    req: HttpRequest,
    db: Data<DatabaseService>,
    bookings: Data<BookingService>,
    payload: Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let client_id = auth::authenticate(&req, &db)?;
    let request = CreateBookingRequest::from_body(payload.into_inner())?;
    let details = bookings.create_booking(client_id, request)?;
    Ok(HttpResponse::Created().json(BookingResponse::new(details, "Booking created successfully")))
}

#[post("/status")]
pub async fn update_booking_status(
    req: HttpRequest,
    db: Data<DatabaseService>,
    bookings: Data<BookingService>,
    payload: Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let actor_id = auth::authenticate(&req, &db)?;
    let request = UpdateBookingStatusRequest::from_body(payload.into_inner())?;
    let outcome = bookings.update_booking_status(actor_id, request)?;
    Ok(HttpResponse::Ok().json(BookingResponse::new(outcome.booking, outcome.message)))
}

#[get("")]
pub async fn list_my_bookings(
    req: HttpRequest,
    db: Data<DatabaseService>,
    bookings: Data<BookingService>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::authenticate(&req, &db)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(bookings.bookings_for(user_id))))
}
