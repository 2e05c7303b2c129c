use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Application, ApplicationStatus, UserRole};
use crate::state::SharedState;
use crate::storage;

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: ApplicationStatus,
}

/// Moves an application through the pipeline. Scoped to the recruiter
/// who owns the posting, so cross-recruiter probes read as not found.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Application>, AppError> {
    auth.require_recruiter()?;

    let application = db::applications::set_status(&state.pool, id, auth.user_id, req.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    Ok(Json(application))
}

pub async fn withdraw(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_candidate()?;

    let deleted = db::applications::withdraw(&state.pool, id, auth.user_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Application not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Application withdrawn" })))
}

/// A short-lived signed link to the resume attached to an application.
/// Visible to the applying candidate, the posting's recruiter, and
/// admins.
pub async fn resume_url(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let application = db::applications::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    let allowed = match auth.role {
        UserRole::Admin => true,
        UserRole::Candidate => application.candidate_id == auth.user_id,
        UserRole::Recruiter => {
            let job = db::jobs::find_by_id(&state.pool, application.job_id).await?;
            job.map(|j| j.recruiter_id == auth.user_id).unwrap_or(false)
        }
    };
    if !allowed {
        return Err(AppError::NotFound("Application not found".to_string()));
    }

    let resume_key = application
        .resume_key
        .ok_or_else(|| AppError::NotFound("No resume on file for this application".to_string()))?;

    let download_url = storage::signed_download_url(&state.config.storage, &resume_key);
    Ok(Json(serde_json::json!({
        "download_url": download_url,
        "expires_in": state.config.storage.url_ttl_secs,
    })))
}
