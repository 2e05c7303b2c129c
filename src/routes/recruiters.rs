use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Job, RecruiterProfile};
use crate::state::SharedState;
use crate::validation::ValidatedJson;

#[derive(Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 200, message = "Company name must be 1 to 200 characters"))]
    pub company_name: String,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(length(max = 4000, message = "About must be at most 4000 characters"))]
    pub about: Option<String>,
    #[validate(length(max = 120, message = "Location must be at most 120 characters"))]
    pub location: Option<String>,
}

pub async fn get_my_profile(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<RecruiterProfile>, AppError> {
    auth.require_recruiter()?;

    let profile = db::recruiter_profiles::find_by_user(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recruiter profile not set up yet".to_string()))?;
    Ok(Json(profile))
}

pub async fn update_my_profile(
    auth: AuthUser,
    State(state): State<SharedState>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<RecruiterProfile>, AppError> {
    auth.require_recruiter()?;

    let params = db::recruiter_profiles::RecruiterProfileParams {
        company_name: req.company_name,
        website: req.website,
        about: req.about,
        location: req.location,
    };

    let profile = db::recruiter_profiles::upsert(&state.pool, auth.user_id, &params).await?;
    Ok(Json(profile))
}

/// Every posting owned by the caller, open and closed alike.
pub async fn my_jobs(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Job>>, AppError> {
    auth.require_recruiter()?;

    let jobs = db::jobs::list_by_recruiter(&state.pool, auth.user_id).await?;
    Ok(Json(jobs))
}
