use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{
    Application, ApplicationStatus, ApplicationWithCandidate, Job, JobDetail, JobStatus, JobType,
    UserRole,
};
use crate::routes::csv_escape;
use crate::state::SharedState;
use crate::validation::ValidatedJson;

#[derive(Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Deserialize, Validate)]
pub struct JobRequest {
    #[validate(length(min = 1, max = 150, message = "Title must be 1 to 150 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 10000, message = "Description must be 1 to 10000 characters"))]
    pub description: String,
    #[validate(length(min = 1, max = 120, message = "Location must be 1 to 120 characters"))]
    pub location: String,
    pub job_type: JobType,
    #[validate(range(min = 0, message = "Salary must not be negative"))]
    pub salary_min: Option<i32>,
    #[validate(range(min = 0, message = "Salary must not be negative"))]
    pub salary_max: Option<i32>,
    #[validate(length(max = 50, message = "At most 50 skills"))]
    #[serde(default)]
    pub skills: Vec<String>,
    pub closes_at: Option<DateTime<Utc>>,
    /// Only honored on update; new postings always start open.
    pub status: Option<JobStatus>,
}

#[derive(Deserialize, Validate)]
pub struct ApplyRequest {
    #[validate(length(max = 5000, message = "Cover letter must be at most 5000 characters"))]
    pub cover_letter: Option<String>,
    #[validate(length(max = 300, message = "Resume key must be at most 300 characters"))]
    pub resume_key: Option<String>,
}

#[derive(Deserialize)]
pub struct ApplicationListParams {
    pub status: Option<ApplicationStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

/// Clamp client-supplied pagination. The page cap keeps the OFFSET
/// arithmetic inside i64 no matter what the query string says.
fn page_window(page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64) {
    const MAX_PAGE: i64 = 1_000_000;
    let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
    let per_page = per_page.unwrap_or(20).clamp(1, 100);
    (page, per_page, (page - 1) * per_page)
}

fn job_params(req: &JobRequest) -> Result<db::jobs::JobParams, AppError> {
    if let (Some(min), Some(max)) = (req.salary_min, req.salary_max) {
        if min > max {
            return Err(AppError::BadRequest(
                "salary_min must not exceed salary_max".to_string(),
            ));
        }
    }
    Ok(db::jobs::JobParams {
        title: req.title.clone(),
        description: req.description.clone(),
        location: req.location.clone(),
        job_type: req.job_type,
        salary_min: req.salary_min,
        salary_max: req.salary_max,
        skills: req.skills.clone(),
        closes_at: req.closes_at,
    })
}

/// Public board. No authentication; only open postings are listed.
pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (page, per_page, offset) = page_window(params.page, params.per_page);

    let filter = db::jobs::JobFilter {
        q: params.q,
        location: params.location,
        job_type: params.job_type,
        min_salary: params.min_salary,
        max_salary: params.max_salary,
        limit: per_page,
        offset,
    };

    let jobs = db::jobs::list_public(&state.pool, &filter).await?;
    let total = db::jobs::count_public(&state.pool, &filter).await?;

    Ok(Json(serde_json::json!({
        "jobs": jobs,
        "total": total,
        "page": page,
        "per_page": per_page,
        "total_pages": (total as f64 / per_page as f64).ceil() as i64,
    })))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobDetail>, AppError> {
    let job = db::jobs::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    ValidatedJson(req): ValidatedJson<JobRequest>,
) -> Result<Json<Job>, AppError> {
    auth.require_recruiter()?;

    let params = job_params(&req)?;
    let job = db::jobs::create(&state.pool, auth.user_id, &params).await?;
    Ok(Json(job))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<JobRequest>,
) -> Result<Json<Job>, AppError> {
    auth.require_recruiter()?;

    let params = job_params(&req)?;
    let job = db::jobs::update(&state.pool, id, auth.user_id, &params, req.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job))
}

/// Recruiters may delete their own postings; admins may delete any.
pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require(&[UserRole::Recruiter, UserRole::Admin])?;

    let deleted = if auth.is_admin() {
        db::jobs::delete_any(&state.pool, id).await?
    } else {
        db::jobs::delete(&state.pool, id, auth.user_id).await?
    };

    if deleted == 0 {
        return Err(AppError::NotFound("Job not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

pub async fn apply(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(job_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ApplyRequest>,
) -> Result<Json<Application>, AppError> {
    auth.require_candidate()?;

    let job = db::jobs::find_by_id(&state.pool, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    let past_deadline = job.closes_at.map(|t| t < Utc::now()).unwrap_or(false);
    if job.status != JobStatus::Open || past_deadline {
        return Err(AppError::BadRequest(
            "This job is no longer accepting applications".to_string(),
        ));
    }

    // Without an explicit resume key, the application snapshots the one
    // on the candidate's profile.
    let resume_key = match req.resume_key {
        Some(key) => Some(key),
        None => db::candidate_profiles::find_by_user(&state.pool, auth.user_id)
            .await?
            .and_then(|p| p.resume_key),
    };

    let application = db::applications::create(
        &state.pool,
        job.id,
        auth.user_id,
        req.cover_letter.as_deref(),
        resume_key.as_deref(),
    )
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("You have already applied to this job".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(Json(application))
}

/// The applicant list for a posting, visible to its recruiter and to
/// admins. Ownership misses read as missing jobs.
pub async fn list_applications(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<ApplicationListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require(&[UserRole::Recruiter, UserRole::Admin])?;

    let job = db::jobs::find_by_id(&state.pool, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    if !auth.is_admin() && job.recruiter_id != auth.user_id {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    let (page, per_page, offset) = page_window(params.page, params.per_page);

    let applications =
        db::applications::list_for_job(&state.pool, job_id, params.status, per_page, offset)
            .await?;
    let total = db::applications::count_for_job(&state.pool, job_id, params.status).await?;

    Ok(Json(serde_json::json!({
        "applications": applications,
        "total": total,
        "page": page,
        "per_page": per_page,
        "total_pages": (total as f64 / per_page as f64).ceil() as i64,
    })))
}

pub async fn export_applications(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    auth.require(&[UserRole::Recruiter, UserRole::Admin])?;

    let job = db::jobs::find_by_id(&state.pool, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    if !auth.is_admin() && job.recruiter_id != auth.user_id {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    let applications = db::applications::list_for_export(&state.pool, job_id).await?;

    match params.format.as_deref().unwrap_or("json") {
        "csv" => {
            let csv = export_csv(&applications);
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"applications.csv\"",
                    ),
                ],
                csv,
            )
                .into_response())
        }
        _ => Ok(Json(applications).into_response()),
    }
}

/// Cover letters run to thousands of characters; the CSV carries only
/// the opening of each one.
fn cover_excerpt(text: &str) -> String {
    const MAX_CHARS: usize = 200;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(MAX_CHARS).collect();
        cut.push_str("...");
        cut
    }
}

fn export_csv(applications: &[ApplicationWithCandidate]) -> String {
    use std::fmt::Write;
    let mut csv = String::new();

    let _ = writeln!(csv, "id,candidate_name,candidate_email,status,cover_letter,applied_at");
    for app in applications {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{}",
            app.id,
            csv_escape(&app.candidate_name),
            csv_escape(&app.candidate_email),
            app.status,
            csv_escape(&cover_excerpt(app.cover_letter.as_deref().unwrap_or(""))),
            app.created_at.to_rfc3339(),
        );
    }

    csv
}
