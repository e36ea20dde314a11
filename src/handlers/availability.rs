use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::availability::{AvailabilitySlot, CreateSlotRequest};
use crate::models::common::ApiResponse;
use crate::models::profile::UserRole;
use crate::services::auth;
use crate::services::database::DatabaseService;

#[post("")]
pub async fn add_slot(
    req: HttpRequest,
    db: Data<DatabaseService>,
    payload: Json<CreateSlotRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::authenticate(&req, &db)?;
    let profile = db
        .get_profile(&user_id)
        .ok_or(ApiError::NotFound("Profile"))?;
    if profile.role != UserRole::Freelancer {
        return Err(ApiError::Unauthorized(
            "Only freelancers can declare availability".to_string(),
        ));
    }

    let request = payload.into_inner();
    if request.end_time <= request.start_time {
        return Err(ApiError::InvalidRequest(
            "end_time must be after start_time".to_string(),
        ));
    }

    let slot = db.insert_slot(AvailabilitySlot::new(user_id, &request));
    Ok(HttpResponse::Created().json(ApiResponse::success(slot)))
}

#[get("/freelancer/{freelancer_id}")]
pub async fn list_freelancer_slots(
    db: Data<DatabaseService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let slots = db.slots_for_freelancer(&path.into_inner());
    Ok(HttpResponse::Ok().json(ApiResponse::success(slots)))
}

#[delete("/{slot_id}")]
pub async fn remove_slot(
    req: HttpRequest,
    db: Data<DatabaseService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::authenticate(&req, &db)?;
    if !db.delete_slot(&user_id, &path.into_inner()) {
        return Err(ApiError::NotFound("Availability slot"));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message((), "Availability slot removed")))
}
