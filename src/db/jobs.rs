use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{Job, JobDetail, JobListing, JobStatus, JobType};

pub struct JobParams {
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: JobType,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub skills: Vec<String>,
    pub closes_at: Option<DateTime<Utc>>,
}

pub struct JobFilter {
    pub q: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub limit: i64,
    pub offset: i64,
}

pub async fn create(
    pool: &PgPool,
    recruiter_id: Uuid,
    params: &JobParams,
) -> Result<Job, sqlx::Error> {
    sqlx::query_as::<_, Job>(
        "INSERT INTO jobs
             (recruiter_id, title, description, location, job_type, salary_min, salary_max, skills, closes_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(recruiter_id)
    .bind(&params.title)
    .bind(&params.description)
    .bind(&params.location)
    .bind(params.job_type)
    .bind(params.salary_min)
    .bind(params.salary_max)
    .bind(&params.skills)
    .bind(params.closes_at)
    .fetch_one(pool)
    .await
}

/// Scoped to the posting recruiter; `None` when the job is missing or
/// owned by someone else. A `None` status leaves the current one in
/// place.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    recruiter_id: Uuid,
    params: &JobParams,
    status: Option<JobStatus>,
) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>(
        "UPDATE jobs SET
             title = $3, description = $4, location = $5, job_type = $6,
             salary_min = $7, salary_max = $8, skills = $9, closes_at = $10,
             status = COALESCE($11, status), updated_at = now()
         WHERE id = $1 AND recruiter_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(recruiter_id)
    .bind(&params.title)
    .bind(&params.description)
    .bind(&params.location)
    .bind(params.job_type)
    .bind(params.salary_min)
    .bind(params.salary_max)
    .bind(&params.skills)
    .bind(params.closes_at)
    .bind(status)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_detail(pool: &PgPool, id: Uuid) -> Result<Option<JobDetail>, sqlx::Error> {
    sqlx::query_as::<_, JobDetail>(
        "SELECT j.id, j.recruiter_id, j.title, j.description, j.location, j.job_type,
                j.salary_min, j.salary_max, j.skills, j.status, rp.company_name,
                j.closes_at, j.created_at
         FROM jobs j
         LEFT JOIN recruiter_profiles rp ON rp.user_id = j.recruiter_id
         WHERE j.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_by_recruiter(
    pool: &PgPool,
    recruiter_id: Uuid,
) -> Result<Vec<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>(
        "SELECT * FROM jobs WHERE recruiter_id = $1 ORDER BY created_at DESC",
    )
    .bind(recruiter_id)
    .fetch_all(pool)
    .await
}

/// The public board shows open postings only. Salary bounds match on
/// range overlap; postings without salary data are excluded once a
/// salary filter is present.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    qb.push(" WHERE j.status = 'open'");
    if let Some(q) = &filter.q {
        let pattern = format!("%{q}%");
        qb.push(" AND (j.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR j.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(location) = &filter.location {
        qb.push(" AND j.location ILIKE ")
            .push_bind(format!("%{location}%"));
    }
    if let Some(job_type) = filter.job_type {
        qb.push(" AND j.job_type = ").push_bind(job_type);
    }
    if let Some(min) = filter.min_salary {
        qb.push(" AND COALESCE(j.salary_max, j.salary_min) >= ")
            .push_bind(min);
    }
    if let Some(max) = filter.max_salary {
        qb.push(" AND COALESCE(j.salary_min, j.salary_max) <= ")
            .push_bind(max);
    }
}

pub async fn list_public(
    pool: &PgPool,
    filter: &JobFilter,
) -> Result<Vec<JobListing>, sqlx::Error> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "SELECT j.id, j.title, j.location, j.job_type, j.salary_min, j.salary_max,
                j.skills, rp.company_name, j.closes_at, j.created_at
         FROM jobs j
         LEFT JOIN recruiter_profiles rp ON rp.user_id = j.recruiter_id",
    );
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY j.created_at DESC LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);

    qb.build_query_as::<JobListing>().fetch_all(pool).await
}

pub async fn count_public(pool: &PgPool, filter: &JobFilter) -> Result<i64, sqlx::Error> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM jobs j");
    push_filters(&mut qb, filter);

    let row: (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(row.0)
}

pub async fn delete(pool: &PgPool, id: Uuid, recruiter_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND recruiter_id = $2")
        .bind(id)
        .bind(recruiter_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_any(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
