use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::models::ApplicationStatus;

#[derive(Debug, Serialize)]
pub struct PortalTotals {
    pub candidates: i64,
    pub recruiters: i64,
    pub pending_recruiters: i64,
    pub jobs: i64,
    pub open_jobs: i64,
    pub applications: i64,
    pub hires: i64,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct PlacementRow {
    pub hired_at: DateTime<Utc>,
    pub candidate_name: String,
    pub candidate_email: String,
    pub job_title: String,
    pub company_name: Option<String>,
}

pub async fn totals(pool: &PgPool) -> Result<PortalTotals, sqlx::Error> {
    let row: (i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
        "SELECT
             (SELECT COUNT(*) FROM users WHERE role = 'candidate'),
             (SELECT COUNT(*) FROM users WHERE role = 'recruiter'),
             (SELECT COUNT(*) FROM users WHERE role = 'recruiter' AND approval_status = 'pending'),
             (SELECT COUNT(*) FROM jobs),
             (SELECT COUNT(*) FROM jobs WHERE status = 'open'),
             (SELECT COUNT(*) FROM applications),
             (SELECT COUNT(*) FROM applications WHERE status = 'hired')",
    )
    .fetch_one(pool)
    .await?;

    Ok(PortalTotals {
        candidates: row.0,
        recruiters: row.1,
        pending_recruiters: row.2,
        jobs: row.3,
        open_jobs: row.4,
        applications: row.5,
        hires: row.6,
    })
}

pub async fn applications_by_status(
    pool: &PgPool,
) -> Result<Vec<(ApplicationStatus, i64)>, sqlx::Error> {
    sqlx::query_as("SELECT status, COUNT(*) FROM applications GROUP BY status")
        .fetch_all(pool)
        .await
}

/// Hire counts for the most recent twelve months that saw a hire. The
/// status row's `updated_at` records when the hire was made.
pub async fn placements_by_month(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT to_char(date_trunc('month', updated_at), 'YYYY-MM') AS month, COUNT(*)
         FROM applications
         WHERE status = 'hired'
         GROUP BY 1 ORDER BY 1 DESC LIMIT 12",
    )
    .fetch_all(pool)
    .await
}

pub async fn placements(pool: &PgPool) -> Result<Vec<PlacementRow>, sqlx::Error> {
    sqlx::query_as::<_, PlacementRow>(
        "SELECT a.updated_at AS hired_at, u.name AS candidate_name,
                u.email AS candidate_email, j.title AS job_title, rp.company_name
         FROM applications a
         JOIN users u ON u.id = a.candidate_id
         JOIN jobs j ON j.id = a.job_id
         LEFT JOIN recruiter_profiles rp ON rp.user_id = j.recruiter_id
         WHERE a.status = 'hired'
         ORDER BY a.updated_at DESC",
    )
    .fetch_all(pool)
    .await
}
