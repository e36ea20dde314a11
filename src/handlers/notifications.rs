use actix_web::web::{Data, Path};
use actix_web::{get, post, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::common::ApiResponse;
use crate::services::auth;
use crate::services::database::DatabaseService;
use crate::services::notification::NotificationService;

#[get("")]
pub async fn list_notifications(
    req: HttpRequest,
    db: Data<DatabaseService>,
    notifications: Data<NotificationService>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::authenticate(&req, &db)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(notifications.list_for_user(user_id))))
}

#[post("/{notification_id}/read")]
pub async fn mark_notification_read(
    req: HttpRequest,
    db: Data<DatabaseService>,
    notifications: Data<NotificationService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::authenticate(&req, &db)?;
    let notification = notifications.mark_read(user_id, path.into_inner())?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        notification,
        "Notification marked as read",
    )))
}
