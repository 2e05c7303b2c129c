use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{ApprovalStatus, User, UserRole};
use crate::routes::csv_escape;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ListUsersParams {
    pub role: Option<UserRole>,
}

#[derive(Deserialize)]
pub struct ListRecruitersParams {
    pub status: Option<ApprovalStatus>,
}

#[derive(Deserialize)]
pub struct ApprovalRequest {
    pub status: ApprovalStatus,
}

#[derive(Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

pub async fn list_users(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<Vec<User>>, AppError> {
    auth.require_admin()?;
    let users = db::users::list(&state.pool, params.role).await?;
    Ok(Json(users))
}

pub async fn delete_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    if id == auth.user_id {
        return Err(AppError::BadRequest(
            "Administrators cannot delete their own account".to_string(),
        ));
    }

    let deleted = db::users::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

/// The approval queue. Defaults to pending recruiters.
pub async fn list_recruiters(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListRecruitersParams>,
) -> Result<Json<Vec<User>>, AppError> {
    auth.require_admin()?;

    let status = params.status.unwrap_or(ApprovalStatus::Pending);
    let recruiters = db::users::list_recruiters(&state.pool, status).await?;
    Ok(Json(recruiters))
}

/// A decision is final in shape: it may only move to approved or
/// rejected, never back to pending.
pub async fn set_recruiter_approval(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ApprovalRequest>,
) -> Result<Json<User>, AppError> {
    auth.require_admin()?;

    if req.status == ApprovalStatus::Pending {
        return Err(AppError::BadRequest(
            "Approval status must be approved or rejected".to_string(),
        ));
    }

    let user = db::users::set_approval_status(&state.pool, id, req.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Recruiter not found".to_string()))?;
    Ok(Json(user))
}

pub async fn analytics(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    let totals = db::analytics::totals(&state.pool).await?;
    let by_status = db::analytics::applications_by_status(&state.pool).await?;
    let by_month = db::analytics::placements_by_month(&state.pool).await?;

    // Every pipeline stage appears, zero-filled when empty.
    let mut status_counts = serde_json::Map::new();
    for status in crate::models::ApplicationStatus::ALL {
        let count = by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0);
        status_counts.insert(status.to_string(), serde_json::json!(count));
    }

    let months: Vec<serde_json::Value> = by_month
        .into_iter()
        .map(|(month, hires)| serde_json::json!({ "month": month, "hires": hires }))
        .collect();

    Ok(Json(serde_json::json!({
        "totals": totals,
        "applications_by_status": status_counts,
        "placements_by_month": months,
    })))
}

pub async fn export_placements(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    let placements = db::analytics::placements(&state.pool).await?;

    match params.format.as_deref().unwrap_or("json") {
        "csv" => {
            let csv = placements_csv(&placements);
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"placements.csv\"",
                    ),
                ],
                csv,
            )
                .into_response())
        }
        _ => Ok(Json(placements).into_response()),
    }
}

fn placements_csv(placements: &[db::analytics::PlacementRow]) -> String {
    use std::fmt::Write;
    let mut csv = String::new();

    let _ = writeln!(csv, "hired_at,candidate_name,candidate_email,job_title,company");
    for row in placements {
        let _ = writeln!(
            csv,
            "{},{},{},{},{}",
            row.hired_at.to_rfc3339(),
            csv_escape(&row.candidate_name),
            csv_escape(&row.candidate_email),
            csv_escape(&row.job_title),
            csv_escape(row.company_name.as_deref().unwrap_or("")),
        );
    }

    csv
}
