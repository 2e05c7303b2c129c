use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Application, ApplicationStatus, ApplicationWithCandidate, CandidateApplication};

pub async fn create(
    pool: &PgPool,
    job_id: Uuid,
    candidate_id: Uuid,
    cover_letter: Option<&str>,
    resume_key: Option<&str>,
) -> Result<Application, sqlx::Error> {
    sqlx::query_as::<_, Application>(
        "INSERT INTO applications (job_id, candidate_id, cover_letter, resume_key)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(job_id)
    .bind(candidate_id)
    .bind(cover_letter)
    .bind(resume_key)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_job(
    pool: &PgPool,
    job_id: Uuid,
    status: Option<ApplicationStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ApplicationWithCandidate>, sqlx::Error> {
    if let Some(status) = status {
        sqlx::query_as::<_, ApplicationWithCandidate>(
            "SELECT a.id, a.job_id, a.candidate_id, u.name AS candidate_name,
                    u.email AS candidate_email, a.cover_letter, a.status,
                    a.created_at, a.updated_at
             FROM applications a
             JOIN users u ON u.id = a.candidate_id
             WHERE a.job_id = $1 AND a.status = $4
             ORDER BY a.created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(job_id)
        .bind(limit)
        .bind(offset)
        .bind(status)
        .fetch_all(pool)
        .await
    } else {
        sqlx::query_as::<_, ApplicationWithCandidate>(
            "SELECT a.id, a.job_id, a.candidate_id, u.name AS candidate_name,
                    u.email AS candidate_email, a.cover_letter, a.status,
                    a.created_at, a.updated_at
             FROM applications a
             JOIN users u ON u.id = a.candidate_id
             WHERE a.job_id = $1
             ORDER BY a.created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(job_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}

pub async fn count_for_job(
    pool: &PgPool,
    job_id: Uuid,
    status: Option<ApplicationStatus>,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = if let Some(status) = status {
        sqlx::query_as("SELECT COUNT(*) FROM applications WHERE job_id = $1 AND status = $2")
            .bind(job_id)
            .bind(status)
            .fetch_one(pool)
            .await?
    } else {
        sqlx::query_as("SELECT COUNT(*) FROM applications WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(pool)
            .await?
    };
    Ok(row.0)
}

pub async fn list_for_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<CandidateApplication>, sqlx::Error> {
    sqlx::query_as::<_, CandidateApplication>(
        "SELECT a.id, a.job_id, j.title AS job_title, rp.company_name,
                a.status, a.created_at, a.updated_at
         FROM applications a
         JOIN jobs j ON j.id = a.job_id
         LEFT JOIN recruiter_profiles rp ON rp.user_id = j.recruiter_id
         WHERE a.candidate_id = $1
         ORDER BY a.created_at DESC",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}

/// Scoped to the recruiter who owns the posting; `None` when the
/// application is missing or belongs to another recruiter's job.
pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    recruiter_id: Uuid,
    status: ApplicationStatus,
) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>(
        "UPDATE applications a SET status = $3, updated_at = now()
         FROM jobs j
         WHERE a.id = $1 AND a.job_id = j.id AND j.recruiter_id = $2
         RETURNING a.*",
    )
    .bind(id)
    .bind(recruiter_id)
    .bind(status)
    .fetch_optional(pool)
    .await
}

pub async fn withdraw(pool: &PgPool, id: Uuid, candidate_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND candidate_id = $2")
        .bind(id)
        .bind(candidate_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_for_export(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<ApplicationWithCandidate>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationWithCandidate>(
        "SELECT a.id, a.job_id, a.candidate_id, u.name AS candidate_name,
                u.email AS candidate_email, a.cover_letter, a.status,
                a.created_at, a.updated_at
         FROM applications a
         JOIN users u ON u.id = a.candidate_id
         WHERE a.job_id = $1
         ORDER BY a.created_at DESC",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}
