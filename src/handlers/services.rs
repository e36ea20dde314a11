use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ApiError;
use crate::models::common::ApiResponse;
use crate::models::profile::UserRole;
use crate::models::service::{CreateServiceRequest, Service};
use crate::services::auth;
use crate::services::database::DatabaseService;

#[post("")]
pub async fn create_service(
    req: HttpRequest,
    db: Data<DatabaseService>,
    payload: Json<CreateServiceRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::authenticate(&req, &db)?;
    let profile = db
        .get_profile(&user_id)
        .ok_or(ApiError::NotFound("Profile"))?;
    if profile.role != UserRole::Freelancer {
        return Err(ApiError::Unauthorized(
            "Only freelancers can offer services".to_string(),
        ));
    }

    let request = payload.into_inner();
    request
        .validate()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let service = db.insert_service(Service::new(user_id, request));
    Ok(HttpResponse::Created().json(ApiResponse::success(service)))
}

#[get("/freelancer/{freelancer_id}")]
pub async fn list_freelancer_services(
    db: Data<DatabaseService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let services = db.services_for_freelancer(&path.into_inner());
    Ok(HttpResponse::Ok().json(ApiResponse::success(services)))
}
