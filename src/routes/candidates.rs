use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{CandidateApplication, CandidateProfile, UserRole};
use crate::state::SharedState;
use crate::validation::ValidatedJson;

#[derive(Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 160, message = "Headline must be at most 160 characters"))]
    pub headline: Option<String>,
    #[validate(length(max = 4000, message = "Summary must be at most 4000 characters"))]
    pub summary: Option<String>,
    #[validate(length(max = 50, message = "At most 50 skills"))]
    #[serde(default)]
    pub skills: Vec<String>,
    #[validate(range(min = 0, max = 60, message = "Experience must be 0 to 60 years"))]
    pub experience_years: Option<i32>,
    #[validate(length(max = 300, message = "Education must be at most 300 characters"))]
    pub education: Option<String>,
    #[validate(length(max = 120, message = "Location must be at most 120 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 300, message = "Resume key must be at most 300 characters"))]
    pub resume_key: Option<String>,
}

pub async fn get_my_profile(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<CandidateProfile>, AppError> {
    auth.require_candidate()?;

    let profile = db::candidate_profiles::find_by_user(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate profile not set up yet".to_string()))?;
    Ok(Json(profile))
}

pub async fn update_my_profile(
    auth: AuthUser,
    State(state): State<SharedState>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<CandidateProfile>, AppError> {
    auth.require_candidate()?;

    let params = db::candidate_profiles::CandidateProfileParams {
        headline: req.headline,
        summary: req.summary,
        skills: req.skills,
        experience_years: req.experience_years,
        education: req.education,
        location: req.location,
        resume_key: req.resume_key,
    };

    let profile = db::candidate_profiles::upsert(&state.pool, auth.user_id, &params).await?;
    Ok(Json(profile))
}

/// Recruiters and admins may view any candidate's profile.
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<CandidateProfile>, AppError> {
    auth.require(&[UserRole::Recruiter, UserRole::Admin])?;

    let user = db::users::find_by_id(&state.pool, user_id)
        .await?
        .filter(|u| u.role == UserRole::Candidate)
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;

    let profile = db::candidate_profiles::find_by_user(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate profile not set up yet".to_string()))?;
    Ok(Json(profile))
}

pub async fn my_applications(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<CandidateApplication>>, AppError> {
    auth.require_candidate()?;

    let applications = db::applications::list_for_candidate(&state.pool, auth.user_id).await?;
    Ok(Json(applications))
}
