use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ApiError;
use crate::models::common::ApiResponse;
use crate::models::profile::{Profile, RegisterProfileRequest, RegisteredProfile};
use crate::services::auth;
use crate::services::database::DatabaseService;

#[post("/register")]
pub async fn register_profile(
    db: Data<DatabaseService>,
    payload: Json<RegisterProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    request
        .validate()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let profile = db.insert_profile(Profile::new(request))?;
    let token = auth::generate_token();
    db.insert_session(auth::hash_token(&token), profile.id);

    log::info!("profile {} registered", profile.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(RegisteredProfile {
        profile,
        access_token: token,
    })))
}

#[get("/{profile_id}")]
pub async fn get_profile(
    db: Data<DatabaseService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let profile = db
        .get_profile(&path.into_inner())
        .ok_or(ApiError::NotFound("Profile"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(profile)))
}
