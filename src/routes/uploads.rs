use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::state::SharedState;
use crate::storage;
use crate::validation::ValidatedJson;

#[derive(Deserialize, Validate)]
pub struct UploadRequest {
    #[validate(length(min = 1, max = 200, message = "Filename must be 1 to 200 characters"))]
    pub filename: String,
}

/// Hands the candidate a pre-signed PUT URL; the file itself never
/// passes through this service. The returned key goes on the profile
/// or on an application.
pub async fn resume_upload_url(
    auth: AuthUser,
    State(state): State<SharedState>,
    ValidatedJson(req): ValidatedJson<UploadRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_candidate()?;

    let key = storage::resume_key(auth.user_id, &req.filename);
    let upload_url = storage::signed_upload_url(&state.config.storage, &key);

    Ok(Json(serde_json::json!({
        "key": key,
        "upload_url": upload_url,
        "expires_in": state.config.storage.url_ttl_secs,
    })))
}
