use actix_web::HttpRequest;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::services::database::DatabaseService;

const TOKEN_BYTES: usize = 32;

/// Generates an opaque bearer token: 32 random bytes, URL-safe base64
/// without padding. Only its hash is stored.
pub fn generate_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Resolves the caller identity from the `Authorization: Bearer` header.
/// Runs before any domain logic; the core only ever sees a resolved user id.
pub fn authenticate(req: &HttpRequest, db: &DatabaseService) -> Result<Uuid, ApiError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;
    let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthenticated)?;
    db.resolve_session(&hash_token(token))
        .ok_or(ApiError::Unauthenticated)
}
